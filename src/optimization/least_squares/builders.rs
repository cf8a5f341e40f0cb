//! least_squares::builders — L-BFGS solver construction helpers.
//!
//! Purpose
//! -------
//! Build L-BFGS solvers with either Hager–Zhang or More–Thuente line search
//! and apply the tolerances from [`FitOptions`]. Initial parameters and the
//! iteration cap are runtime concerns handled by [`run_lbfgs`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Solvers operate on the `(Theta, Grad, Cost)` triple from
//!   [`least_squares::types`](super::types).
//! - The L-BFGS memory is `opts.lbfgs_mem` or [`DEFAULT_LBFGS_MEM`].
//! - Tolerances rejected by Argmin surface as [`OptError`](crate::optimization::errors::OptError)
//!   through the crate’s `From<argmin::core::Error>` conversion.
//!
//! [`run_lbfgs`]: super::run::run_lbfgs
use argmin::solver::quasinewton::LBFGS;

use crate::optimization::{
    errors::OptResult,
    least_squares::{
        traits::FitOptions,
        types::{
            Cost, DEFAULT_LBFGS_MEM, Grad, HagerZhangLS, LbfgsHagerZhang, LbfgsMoreThuente,
            MoreThuenteLS, Theta,
        },
    },
};

/// Construct L-BFGS with Hager–Zhang line search.
///
/// # Errors
/// - `OptError` when Argmin rejects a configured tolerance.
pub fn build_optimizer_hager_zhang(opts: &FitOptions) -> OptResult<LbfgsHagerZhang> {
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    let lbfgs = LbfgsHagerZhang::new(HagerZhangLS::new(), mem);
    configure_lbfgs(lbfgs, opts)
}

/// Construct L-BFGS with More–Thuente line search.
///
/// # Errors
/// - `OptError` when Argmin rejects a configured tolerance.
pub fn build_optimizer_more_thuente(opts: &FitOptions) -> OptResult<LbfgsMoreThuente> {
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    let lbfgs = LbfgsMoreThuente::new(MoreThuenteLS::new(), mem);
    configure_lbfgs(lbfgs, opts)
}

/// Apply the optional gradient and cost-change tolerances to an L-BFGS solver.
///
/// A `None` tolerance leaves Argmin's default in place.
///
/// # Errors
/// - `OptError` when `with_tolerance_grad` or `with_tolerance_cost` fails.
pub fn configure_lbfgs<L>(
    mut solver: LBFGS<L, Theta, Grad, Cost>, opts: &FitOptions,
) -> OptResult<LBFGS<L, Theta, Grad, Cost>> {
    if let Some(g) = opts.tols.tol_grad {
        solver = solver.with_tolerance_grad(g)?;
    }
    if let Some(c) = opts.tols.tol_cost {
        solver = solver.with_tolerance_cost(c)?;
    }
    Ok(solver)
}
