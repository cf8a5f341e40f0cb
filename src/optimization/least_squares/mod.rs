//! least_squares — argmin-powered minimizer for curve fits.
//!
//! Purpose
//! -------
//! Provide a high-level, Argmin-backed layer for **minimizing** a scalar cost
//! `c(θ)`, typically the residual sum of squares of a parametric curve fitted
//! to sampled points. Callers implement [`Objective`] and invoke
//! [`minimize`] to run L-BFGS with a configurable line search, tolerances,
//! and finite-difference gradient fallbacks.
//!
//! Key behaviors
//! -------------
//! - Expose user objectives to Argmin via [`adapter::ArgMinAdapter`].
//! - Select an L-BFGS solver via [`builders`] based on [`LineSearcher`],
//!   execute it via [`run::run_lbfgs`], and normalize results into a
//!   [`FitOutcome`].
//! - Centralize configuration ([`Tolerances`], [`FitOptions`]) and validation
//!   ([`validation`]) so downstream code can assume sane, finite inputs.
//!
//! Invariants & assumptions
//! ------------------------
//! - The search is unconstrained in θ-space.
//! - [`Objective::value`] and [`Objective::grad`] treat invalid inputs as
//!   recoverable [`OptError`](crate::optimization::errors::OptError) values,
//!   not panics.
//! - Configuration types are validated on construction.
//!
//! Downstream usage
//! ----------------
//! - `screening::fit` implements [`Objective`] for the logistic-with-offset
//!   curve and calls [`minimize`] with the sorted, normalized effect curve as
//!   data.
//!
//! Testing notes
//! -------------
//! - Unit tests cover the adapter's FD fallback, builder wiring, option
//!   validation, and end-to-end minimization of quadratic bowls.

pub mod adapter;
pub mod api;
pub mod builders;
pub mod run;
pub mod traits;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::api::minimize;
pub use self::traits::{FitOptions, FitOutcome, LineSearcher, Objective, Tolerances};
pub use self::types::{Cost, DEFAULT_LBFGS_MEM, FnEvalMap, Grad, Theta};

pub mod prelude {
    pub use super::api::minimize;
    pub use super::traits::{FitOptions, FitOutcome, LineSearcher, Objective, Tolerances};
    pub use super::types::{Cost, Grad, Theta};
}
