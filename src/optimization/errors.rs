//! optimization::errors — errors of the curve fit and the knee search.
//!
//! Argmin errors are folded into [`OptError::Backend`] at the boundary.
use argmin::core::{ArgminError, Error};

/// Crate-wide result alias for optimizer operations.
pub type OptResult<T> = Result<T, OptError>;

#[derive(Debug, Clone, PartialEq)]
pub enum OptError {
    // ---- Gradient ----
    /// The objective has no analytic gradient; finite differences are used.
    GradientNotImplemented,

    /// Gradient dimensions do not match parameter dimensions.
    GradientDimMismatch { expected: usize, found: usize },

    /// Gradient elements need to be finite
    InvalidGradient { index: usize, value: f64, reason: &'static str },

    // ---- FitOptions ----
    /// Gradient tolerance needs to be positive and finite.
    InvalidTolGrad { tol: f64, reason: &'static str },
    /// Cost change tolerance needs to be positive and finite.
    InvalidTolCost { tol: f64, reason: &'static str },
    /// Maximum iterations needs to be positive.
    InvalidMaxIter { max_iter: usize, reason: &'static str },
    /// At least one tolerance must be provided.
    NoTolerancesProvided,

    /// Invalid line searcher name.
    InvalidLineSearch { name: String, reason: &'static str },

    /// lbfgs_mem needs to be at least 1.
    InvalidLBFGSMem { mem: usize, reason: &'static str },

    // ---- Scalar search ----
    /// Bracket for a bounded scalar search is empty or non-finite.
    InvalidBracket { lower: f64, upper: f64 },
    /// Relative tolerance of the scalar search must be positive and finite.
    InvalidScalarTol { tol: f64 },

    // ---- Cost function ----
    /// Cost function returned a non-finite value.
    NonFiniteCost { value: f64 },

    /// Data handed to an objective does not fit its expectations.
    InvalidObjectiveData { reason: String },

    // ---- Optimizer outcome ----
    /// Estimated parameters must be finite.
    InvalidThetaHat { index: usize, value: f64, reason: &'static str },

    /// Theta hat is missing
    MissingThetaHat,

    // ---- Argmin ----
    /// Error raised inside argmin; `kind` names the argmin error class.
    Backend { kind: &'static str, text: String },
}

impl std::error::Error for OptError {}

impl std::fmt::Display for OptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Gradient ----
            OptError::GradientNotImplemented => {
                write!(f, "Analytic gradient not implemented")
            }
            OptError::GradientDimMismatch { expected, found } => {
                write!(f, "Gradient dimension mismatch: expected {expected}, found {found}")
            }
            OptError::InvalidGradient { index, value, reason } => {
                write!(f, "Invalid gradient at index {index}: {value}: {reason}")
            }

            // ---- FitOptions ----
            OptError::InvalidTolGrad { tol, reason } => {
                write!(f, "Invalid gradient tolerance {tol}: {reason}")
            }
            OptError::InvalidTolCost { tol, reason } => {
                write!(f, "Invalid cost function change tolerance {tol}: {reason}")
            }
            OptError::InvalidMaxIter { max_iter, reason } => {
                write!(f, "Invalid maximum iterations {max_iter}: {reason}")
            }
            OptError::NoTolerancesProvided => {
                write!(f, "No tolerances provided")
            }
            OptError::InvalidLineSearch { name, reason } => {
                write!(f, "Invalid line searcher '{name}': {reason}")
            }
            OptError::InvalidLBFGSMem { mem, reason } => {
                write!(f, "Invalid L-BFGS memory {mem}: {reason}")
            }

            // ---- Scalar search ----
            OptError::InvalidBracket { lower, upper } => {
                write!(f, "Invalid search bracket [{lower}, {upper}]: need finite lower < upper")
            }
            OptError::InvalidScalarTol { tol } => {
                write!(f, "Invalid scalar search tolerance {tol}: must be finite and > 0")
            }

            // ---- Cost function ----
            OptError::NonFiniteCost { value } => {
                write!(f, "Non-finite cost value: {value}")
            }
            OptError::InvalidObjectiveData { reason } => {
                write!(f, "Invalid objective data: {reason}")
            }

            // ---- Optimizer outcome ----
            OptError::InvalidThetaHat { index, value, reason } => {
                write!(f, "Invalid estimated parameter at index {index}: {value}: {reason}")
            }
            OptError::MissingThetaHat => {
                write!(f, "Missing estimated parameters (theta hat)")
            }

            // ---- Argmin ----
            OptError::Backend { kind, text } => {
                write!(f, "Fitting backend failed ({kind}): {text}")
            }
        }
    }
}

impl From<Error> for OptError {
    fn from(original_err: Error) -> Self {
        // Cost closures raise `OptError`s that argmin boxes.
        let original_err = match original_err.downcast::<OptError>() {
            Ok(own) => return own,
            Err(err) => err,
        };
        let (kind, text) = match original_err.downcast::<ArgminError>() {
            Ok(ArgminError::InvalidParameter { text }) => ("invalid parameter", text),
            Ok(ArgminError::NotImplemented { text }) => ("not implemented", text),
            Ok(ArgminError::NotInitialized { text }) => ("not initialized", text),
            Ok(ArgminError::ConditionViolated { text }) => ("condition violated", text),
            Ok(ArgminError::CheckpointNotFound { text }) => ("checkpoint not found", text),
            Ok(ArgminError::PotentialBug { text }) => ("potential bug", text),
            Ok(ArgminError::ImpossibleError { text }) => ("impossible error", text),
            Ok(other) => ("argmin", other.to_string()),
            Err(err) => ("other", err.to_string()),
        };
        OptError::Backend { kind, text }
    }
}
