//! screening::errors — failures of the cutoff selection and combination.
use crate::{effects::errors::EffectsError, optimization::errors::OptError};

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

pub type ScreeningResult<T> = Result<T, ScreeningError>;

#[derive(Debug, Clone, PartialEq)]
pub enum ScreeningError {
    /// Automatic cutoffs need at least two included parameters.
    InsufficientParameters { included: usize },
    /// All effects of an objective are zero (or non-finite), so there is
    /// no curve to normalize.
    DegenerateEffects { objective: String },
    /// The logistic fit or curvature search failed.
    FitFailed { objective: String, reason: String },
    /// Explicit cutoffs must provide one value per objective.
    CutoffCountMismatch { expected: usize, found: usize },
    /// Cutoff values must be finite; the triangle rule also needs them `> 0`.
    InvalidCutoff { objective: String, value: f64 },
    /// Effect matrix rows must match the parameter table.
    ParamCountMismatch { params: usize, rows: usize },
    /// Knee ceiling must be finite and in `(0, 1]`.
    InvalidKneeCeiling { value: f64 },
    /// Initial logistic guess must be finite.
    InvalidInitialGuess,
    /// Unknown combination rule name.
    UnknownCombinationRule { name: String },
    /// Effects layer error.
    Effects(EffectsError),
}

impl std::error::Error for ScreeningError {}

impl std::fmt::Display for ScreeningError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScreeningError::InsufficientParameters { included } => write!(
                f,
                "Automatic cutoff needs at least 2 included parameters, got {included}"
            ),
            ScreeningError::DegenerateEffects { objective } => {
                write!(f, "Elementary effects of '{objective}' have no positive maximum")
            }
            ScreeningError::FitFailed { objective, reason } => {
                write!(f, "Cutoff fit failed for '{objective}': {reason}")
            }
            ScreeningError::CutoffCountMismatch { expected, found } => {
                write!(f, "Expected {expected} explicit cutoffs, got {found}")
            }
            ScreeningError::InvalidCutoff { objective, value } => {
                write!(f, "Invalid cutoff {value} for '{objective}'")
            }
            ScreeningError::ParamCountMismatch { params, rows } => write!(
                f,
                "Effect matrix has {rows} rows but the parameter table has {params} entries"
            ),
            ScreeningError::InvalidKneeCeiling { value } => {
                write!(f, "Knee ceiling {value} must be finite and in (0, 1]")
            }
            ScreeningError::InvalidInitialGuess => {
                write!(f, "Initial logistic parameters must be finite")
            }
            ScreeningError::UnknownCombinationRule { name } => write!(
                f,
                "Unknown combination rule '{name}': valid options are 'rectangle' or 'triangle'"
            ),
            ScreeningError::Effects(e) => write!(f, "{e}"),
        }
    }
}

impl From<EffectsError> for ScreeningError {
    fn from(err: EffectsError) -> Self {
        ScreeningError::Effects(err)
    }
}

impl ScreeningError {
    pub(crate) fn fit_failed(objective: &str, err: OptError) -> Self {
        ScreeningError::FitFailed { objective: objective.to_string(), reason: err.to_string() }
    }
}

#[cfg(feature = "python-bindings")]
impl From<ScreeningError> for PyErr {
    fn from(err: ScreeningError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
