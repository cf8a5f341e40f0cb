//! models::errors — failures of model evaluation.

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

pub type ModelResult<T> = Result<T, ModelError>;

#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    /// Parameter vector has the wrong length for the model.
    InputDimMismatch { expected: usize, found: usize },
    /// Model returned a different number of objectives than it declares.
    OutputDimMismatch { expected: usize, found: usize },
    /// Series outputs of one objective differ in length between runs.
    SeriesLengthMismatch { objective: String, row: usize, expected: usize, found: usize },
    /// A single evaluation failed (e.g. missing output of an external run).
    RunFailed { reason: String },
    /// Row `row` still failed after `attempts` tries.
    EvaluationFailed { row: usize, attempts: usize, reason: String },
    /// Retry policy needs at least one attempt.
    InvalidRetryPolicy { max_attempts: usize },
    /// Model constants must be finite.
    InvalidModelParameter { name: &'static str, value: f64 },
}

impl std::error::Error for ModelError {}

impl std::fmt::Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelError::InputDimMismatch { expected, found } => {
                write!(f, "Model expects {expected} parameters, got {found}")
            }
            ModelError::OutputDimMismatch { expected, found } => {
                write!(f, "Model declares {expected} objectives but returned {found}")
            }
            ModelError::SeriesLengthMismatch { objective, row, expected, found } => write!(
                f,
                "Objective '{objective}' returned a series of length {found} for parameter set {row}, expected {expected}"
            ),
            ModelError::RunFailed { reason } => write!(f, "Model run failed: {reason}"),
            ModelError::EvaluationFailed { row, attempts, reason } => write!(
                f,
                "Evaluation of parameter set {row} failed after {attempts} attempt(s): {reason}"
            ),
            ModelError::InvalidRetryPolicy { max_attempts } => {
                write!(f, "Retry policy needs at least one attempt, got {max_attempts}")
            }
            ModelError::InvalidModelParameter { name, value } => {
                write!(f, "Model constant {name} = {value} must be finite")
            }
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<ModelError> for PyErr {
    fn from(err: ModelError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
