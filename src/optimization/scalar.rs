//! optimization::scalar — bounded one-dimensional minimization.
//!
//! Purpose
//! -------
//! Minimize a scalar function on a closed interval with Brent's method
//! (`argmin::solver::brent::BrentOpt`). Used to locate the point of most
//! negative curvature on a fitted screening curve.
//!
//! Conventions
//! -----------
//! - The returned abscissa always lies inside `[lower, upper]`.
//! - Non-finite function values abort the search with
//!   `OptError::NonFiniteCost`.
use argmin::core::{
    CostFunction, Error, Executor, State, TerminationReason, TerminationStatus,
};
use argmin::solver::brent::BrentOpt;

use crate::optimization::errors::{OptError, OptResult};

/// Options for [`minimize_bounded`].
///
/// - `tol`: absolute tolerance on the abscissa (Brent's `t`).
/// - `max_iter`: hard cap on Brent iterations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScalarOptions {
    pub tol: f64,
    pub max_iter: usize,
}

impl ScalarOptions {
    /// # Errors
    /// - [`OptError::InvalidScalarTol`] for non-finite or non-positive `tol`.
    /// - [`OptError::InvalidMaxIter`] for `max_iter == 0`.
    pub fn new(tol: f64, max_iter: usize) -> OptResult<Self> {
        if !tol.is_finite() || tol <= 0.0 {
            return Err(OptError::InvalidScalarTol { tol });
        }
        if max_iter == 0 {
            return Err(OptError::InvalidMaxIter {
                max_iter,
                reason: "Maximum iterations must be greater than zero.",
            });
        }
        Ok(Self { tol, max_iter })
    }
}

impl Default for ScalarOptions {
    fn default() -> Self {
        Self { tol: 1.48e-8, max_iter: 500 }
    }
}

/// Result of a bounded scalar search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScalarOutcome {
    pub x: f64,
    pub value: f64,
    pub iterations: usize,
    pub converged: bool,
}

struct ScalarProblem<F> {
    f: F,
}

impl<F: Fn(f64) -> f64> CostFunction for ScalarProblem<F> {
    type Param = f64;
    type Output = f64;

    fn cost(&self, x: &f64) -> Result<f64, Error> {
        let value = (self.f)(*x);
        if !value.is_finite() {
            return Err(OptError::NonFiniteCost { value }.into());
        }
        Ok(value)
    }
}

/// Minimize `f` on `[lower, upper]` with Brent's method.
///
/// # Errors
/// - [`OptError::InvalidBracket`] unless `lower < upper` and both are finite.
/// - [`OptError::NonFiniteCost`] if `f` returns a non-finite value.
/// - Argmin backend errors, converted to `OptError`.
pub fn minimize_bounded<F>(
    f: F, lower: f64, upper: f64, opts: &ScalarOptions,
) -> OptResult<ScalarOutcome>
where
    F: Fn(f64) -> f64,
{
    if !(lower.is_finite() && upper.is_finite() && lower < upper) {
        return Err(OptError::InvalidBracket { lower, upper });
    }
    let solver = BrentOpt::new(lower, upper).set_tolerance(f64::EPSILON.sqrt(), opts.tol);
    let max_iters = opts.max_iter as u64;
    let result = Executor::new(ScalarProblem { f }, solver)
        .configure(|state| state.max_iters(max_iters))
        .run()?;

    let state = result.state();
    let x = *state.get_best_param().ok_or(OptError::MissingThetaHat)?;
    let value = state.get_best_cost();
    if !value.is_finite() {
        return Err(OptError::NonFiniteCost { value });
    }
    Ok(ScalarOutcome {
        x,
        value,
        iterations: state.get_iter() as usize,
        converged: matches!(
            state.get_termination_status(),
            TerminationStatus::Terminated(TerminationReason::SolverConverged)
        ),
    })
}
