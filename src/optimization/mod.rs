//! optimization — curve-fitting and scalar-search backends.
//!
//! Purpose
//! -------
//! Wrap Argmin behind two small, validated entry points:
//! - [`least_squares::minimize`]: L-BFGS minimization of a user
//!   [`Objective`](least_squares::Objective) with finite-difference gradient
//!   fallback, used to fit the logistic screening curve.
//! - [`scalar::minimize_bounded`]: Brent search on a closed interval, used to
//!   locate the knee of the fitted curve.
//!
//! Conventions
//! -----------
//! - Every fallible entry point returns [`OptResult<T>`](errors::OptResult);
//!   callers never see raw Argmin errors.
//! - No logging happens here; the screening layer reports fit results via
//!   `tracing`.
//!
//! Testing notes
//! -------------
//! - Submodules carry unit tests on toy problems with known minima.

pub mod errors;
pub mod least_squares;
pub mod scalar;

pub mod prelude {
    pub use super::errors::{OptError, OptResult};
    pub use super::least_squares::prelude::*;
    pub use super::scalar::{ScalarOptions, ScalarOutcome, minimize_bounded};
}
