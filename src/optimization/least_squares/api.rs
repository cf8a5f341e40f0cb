//! High-level entry point for minimizing a user-provided [`Objective`].
use crate::optimization::{
    errors::OptResult,
    least_squares::{
        FitOutcome, Theta,
        adapter::ArgMinAdapter,
        builders::{build_optimizer_hager_zhang, build_optimizer_more_thuente},
        run::run_lbfgs,
        traits::{FitOptions, LineSearcher, Objective},
    },
};

/// Minimize `c(θ)` with L-BFGS and the line search chosen in `opts`.
///
/// # Behavior
/// - Validates the initial guess via `f.check(theta0, data)`.
/// - Wraps `(f, data)` in an [`ArgMinAdapter`].
/// - Builds the Hager–Zhang or More–Thuente variant and delegates to
///   [`run_lbfgs`].
///
/// # Errors
/// - Propagates any error from `f.check`.
/// - Propagates builder and runtime errors (e.g., line search failures).
///
/// # Example
/// ```no_run
/// use ndarray::array;
/// use rust_morris::optimization::errors::OptResult;
/// use rust_morris::optimization::least_squares::{minimize, FitOptions, Objective, Theta};
///
/// struct Bowl;
/// impl Objective for Bowl {
///     type Data = ();
///     fn value(&self, theta: &Theta, _: &()) -> OptResult<f64> {
///         Ok(theta.dot(theta))
///     }
///     fn check(&self, _: &Theta, _: &()) -> OptResult<()> {
///         Ok(())
///     }
/// }
///
/// let out = minimize(&Bowl, array![0.1, -0.2, 0.3], &(), &FitOptions::default())?;
/// println!("θ̂ = {:?}", out.theta_hat);
/// # Ok::<(), rust_morris::optimization::errors::OptError>(())
/// ```
pub fn minimize<F: Objective>(
    f: &F, theta0: Theta, data: &F::Data, opts: &FitOptions,
) -> OptResult<FitOutcome> {
    f.check(&theta0, data)?;
    let problem = ArgMinAdapter::new(f, data);
    match opts.line_searcher {
        LineSearcher::MoreThuente => {
            let solver = build_optimizer_more_thuente(opts)?;
            run_lbfgs(theta0, opts, problem, solver)
        }
        LineSearcher::HagerZhang => {
            let solver = build_optimizer_hager_zhang(opts)?;
            run_lbfgs(theta0, opts, problem, solver)
        }
    }
}
