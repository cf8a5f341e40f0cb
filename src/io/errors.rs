//! io::errors — file access and format errors for the text file layer.
use std::path::Path;

use crate::{effects::errors::EffectsError, parameters::errors::ParamError};

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

pub type IoResult<T> = Result<T, IoError>;

#[derive(Debug, Clone, PartialEq)]
pub enum IoError {
    /// Underlying filesystem failure.
    Io { path: String, message: String },
    /// A data line has the wrong number of columns.
    ColumnCount { path: String, line: usize, expected: usize, found: usize },
    /// A token could not be parsed.
    Parse { path: String, line: usize, message: String },
    /// The `header lines: N` marker is missing or malformed.
    Header { path: String, message: String },
    /// File holds no data rows.
    Empty { path: String },
    /// A parameter record failed validation.
    Param(ParamError),
    /// An effect matrix could not be assembled.
    Effects(EffectsError),
}

impl IoError {
    pub(crate) fn io(path: &Path, err: std::io::Error) -> Self {
        IoError::Io { path: path.display().to_string(), message: err.to_string() }
    }

    pub(crate) fn parse(path: &Path, line: usize, message: impl Into<String>) -> Self {
        IoError::Parse { path: path.display().to_string(), line, message: message.into() }
    }
}

impl std::error::Error for IoError {}

impl std::fmt::Display for IoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IoError::Io { path, message } => write!(f, "{path}: {message}"),
            IoError::ColumnCount { path, line, expected, found } => write!(
                f,
                "{path}:{line}: expected {expected} columns, found {found}"
            ),
            IoError::Parse { path, line, message } => write!(f, "{path}:{line}: {message}"),
            IoError::Header { path, message } => write!(f, "{path}: bad header: {message}"),
            IoError::Empty { path } => write!(f, "{path}: no data rows"),
            IoError::Param(e) => write!(f, "{e}"),
            IoError::Effects(e) => write!(f, "{e}"),
        }
    }
}

impl From<ParamError> for IoError {
    fn from(err: ParamError) -> Self {
        IoError::Param(err)
    }
}

impl From<EffectsError> for IoError {
    fn from(err: EffectsError) -> Self {
        IoError::Effects(err)
    }
}

#[cfg(feature = "python-bindings")]
impl From<IoError> for PyErr {
    fn from(err: IoError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
