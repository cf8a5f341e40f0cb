//! Executor wiring for the L-BFGS curve fit.
use crate::optimization::{
    errors::OptResult,
    least_squares::{FitOptions, FitOutcome, Grad, Objective, Theta, adapter::ArgMinAdapter},
};
use argmin::core::{CostFunction, Executor, IterState, Solver, State};
#[cfg(feature = "obs_slog")]
use argmin::core::observers::ObserverMode;
use tracing::trace;

type FitState = IterState<Theta, Grad, (), (), (), f64>;

/// Run `solver` on `problem` from `theta0` and collect a [`FitOutcome`].
///
/// `opts.tols.max_iter` caps the iteration count. With the `obs_slog`
/// feature and `opts.verbose`, a terminal slog observer reports every
/// iteration.
///
/// # Errors
/// - Argmin runtime failures, converted through `From<argmin::core::Error>`.
/// - Validation failures of the final state while building [`FitOutcome`].
pub fn run_lbfgs<'a, F, S>(
    theta0: Theta, opts: &FitOptions, problem: ArgMinAdapter<'a, F>, solver: S,
) -> OptResult<FitOutcome>
where
    F: Objective,
    S: Solver<ArgMinAdapter<'a, F>, FitState> + Send + 'static,
{
    if tracing::enabled!(tracing::Level::TRACE) {
        trace!(start = ?theta0.to_vec(), sse = problem.cost(&theta0)?, "starting curve fit");
    }

    let max_iter = opts.tols.max_iter;
    #[allow(unused_mut)]
    let mut executor = Executor::new(problem, solver).configure(|state| {
        let state = state.param(theta0);
        match max_iter {
            Some(n) => state.max_iters(n as u64),
            None => state,
        }
    });

    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        executor = executor.add_observer(argmin_observer_slog::SlogLogger::term_noblock(), ObserverMode::Always);
    }

    let mut state = executor.run()?.state().clone();
    let iterations = state.get_iter();
    let evaluations = state.get_func_counts().clone();
    let status = state.get_termination_status().clone();
    let gradient = state.take_gradient();

    FitOutcome::new(state.take_best_param(), state.get_best_cost(), status, iterations, evaluations, gradient)
}
