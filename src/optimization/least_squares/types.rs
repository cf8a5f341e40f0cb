//! least_squares::types — shared numeric aliases and solver wiring.
//!
//! Purpose
//! -------
//! Centralize the numeric types and solver aliases used by the curve-fitting
//! minimizer so the rest of the optimization code stays agnostic to
//! `ndarray` and Argmin generics.
//!
//! Conventions
//! -----------
//! - `Theta` and `Grad` are column vectors with one entry per free curve
//!   parameter.
//! - `Cost` is a scalar `f64` that the solver minimizes directly; for curve
//!   fits this is the residual sum of squares.
//! - `DEFAULT_LBFGS_MEM` is the usual L-BFGS history size; callers may
//!   override it through `FitOptions::lbfgs_mem`.
//!
//! Testing notes
//! -------------
//! - Aliases and constants only; exercised by the surrounding modules.
use argmin::solver::{
    linesearch::{HagerZhangLineSearch, MoreThuenteLineSearch},
    quasinewton::LBFGS,
};
use ndarray::Array1;
use std::collections::HashMap;

/// Parameter vector `θ` of a fitted curve.
pub type Theta = Array1<f64>;

/// Gradient vector `∇c(θ)`, matching the shape of `Theta`.
pub type Grad = Array1<f64>;

/// Scalar objective value minimized by the solver.
pub type Cost = f64;

/// Function-evaluation counters as reported by the solver.
///
/// Maps human-readable counter names (e.g., `"cost_count"`) to counts.
pub type FnEvalMap = HashMap<String, u64>;

/// Default history size (`m`) for L-BFGS runs.
pub const DEFAULT_LBFGS_MEM: usize = 7;

/// Hager–Zhang line search specialized to this crate’s numeric types.
pub type HagerZhangLS = HagerZhangLineSearch<Theta, Grad, Cost>;

/// More–Thuente line search specialized to this crate’s numeric types.
pub type MoreThuenteLS = MoreThuenteLineSearch<Theta, Grad, Cost>;

/// L-BFGS solver wired to the Hager–Zhang line search.
pub type LbfgsHagerZhang = LBFGS<HagerZhangLS, Theta, Grad, Cost>;

/// L-BFGS solver wired to the More–Thuente line search.
pub type LbfgsMoreThuente = LBFGS<MoreThuenteLS, Theta, Grad, Cost>;
