//! parameters::errors — configuration errors for parameter specifications
//! and distribution-aware scaling.

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

/// Result alias for parameter handling.
pub type ParamResult<T> = Result<T, ParamError>;

#[derive(Debug, Clone, PartialEq)]
pub enum ParamError {
    /// Only "uniform" and "gaussian" (case-insensitive) are supported.
    UnsupportedDistribution { name: String },
    /// Uniform bounds must be finite with lower < upper.
    InvalidUniformRange { name: String, lower: f64, upper: f64 },
    /// Gaussian mean must be finite and standard deviation finite and > 0.
    InvalidGaussian { name: String, mean: f64, stddev: f64 },
    /// Default values must be finite.
    NonFiniteDefault { name: String, value: f64 },
    /// Parameter names must be non-empty and free of whitespace.
    InvalidName { name: String },
    /// Gaussian clamp must satisfy 0 < lo < hi < 1.
    InvalidClamp { lo: f64, hi: f64 },
    /// A parameter set needs at least one included parameter to sample.
    NoIncludedParameters,
    /// Width of a unit-space sample must equal the included parameter count.
    IncludedCountMismatch { expected: usize, found: usize },
    /// Mask length must equal the number of parameters.
    MaskLengthMismatch { expected: usize, found: usize },
    /// Changed-unit entry points outside the included parameters.
    ChangedIndexOutOfRange { index: usize, included: usize },
    /// Backend distribution construction failed.
    DistributionError { name: String, text: String },
}

impl std::error::Error for ParamError {}

impl std::fmt::Display for ParamError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParamError::UnsupportedDistribution { name } => write!(
                f,
                "Unsupported distribution '{name}': only 'uniform' and 'gaussian' are implemented"
            ),
            ParamError::InvalidUniformRange { name, lower, upper } => write!(
                f,
                "Invalid uniform range for '{name}': [{lower}, {upper}] must be finite with lower < upper"
            ),
            ParamError::InvalidGaussian { name, mean, stddev } => write!(
                f,
                "Invalid gaussian for '{name}': mean {mean} must be finite, stddev {stddev} finite and > 0"
            ),
            ParamError::NonFiniteDefault { name, value } => {
                write!(f, "Default value {value} of '{name}' must be finite")
            }
            ParamError::InvalidName { name } => {
                write!(f, "Invalid parameter name '{name}': must be non-empty without whitespace")
            }
            ParamError::InvalidClamp { lo, hi } => {
                write!(f, "Invalid gaussian clamp [{lo}, {hi}]: need 0 < lo < hi < 1")
            }
            ParamError::NoIncludedParameters => {
                write!(f, "No parameter is flagged for inclusion in the analysis")
            }
            ParamError::IncludedCountMismatch { expected, found } => write!(
                f,
                "Sample has {found} columns but {expected} parameters are included"
            ),
            ParamError::MaskLengthMismatch { expected, found } => {
                write!(f, "Mask has {found} entries for {expected} parameters")
            }
            ParamError::ChangedIndexOutOfRange { index, included } => write!(
                f,
                "Changed index {index} is out of range for {included} included parameters"
            ),
            ParamError::DistributionError { name, text } => {
                write!(f, "Distribution error for '{name}': {text}")
            }
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<ParamError> for PyErr {
    fn from(err: ParamError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
