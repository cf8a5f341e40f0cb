//! effects::errors — shape and degeneracy errors raised by the estimators.

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

pub type EffectsResult<T> = Result<T, EffectsError>;

#[derive(Debug, Clone, PartialEq)]
pub enum EffectsError {
    /// At least one objective is required.
    NoObjectives,
    /// An objective has a different number of rows than the sample.
    OutputRowMismatch { objective: String, rows: usize, expected: usize },
    /// Series outputs need at least one element per row.
    EmptySeries { objective: String },
    /// Changed vector must have one entry per sample row.
    ChangedLengthMismatch { rows: usize, changed: usize },
    /// Changed entry outside the valid unit/parameter range.
    ChangedIndexOutOfRange { row: usize, index: usize, limit: usize },
    /// A step is flagged on the last row of the sample, so it has no successor.
    DanglingStep { row: usize },
    /// The changed parameter did not move between two consecutive rows.
    ZeroParameterStep { row: usize, param: usize },
    /// Sample rows do not split into whole trajectories.
    RaggedSample { rows: usize, block_len: usize },
    /// Effect matrix columns and names disagree.
    ObjectiveNameMismatch { names: usize, columns: usize },
}

impl std::error::Error for EffectsError {}

impl std::fmt::Display for EffectsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EffectsError::NoObjectives => write!(f, "At least one model objective is required"),
            EffectsError::OutputRowMismatch { objective, rows, expected } => write!(
                f,
                "Objective '{objective}' has {rows} rows but the sample has {expected}"
            ),
            EffectsError::EmptySeries { objective } => {
                write!(f, "Objective '{objective}' has an empty output series")
            }
            EffectsError::ChangedLengthMismatch { rows, changed } => {
                write!(f, "Changed vector has {changed} entries for {rows} sample rows")
            }
            EffectsError::ChangedIndexOutOfRange { row, index, limit } => write!(
                f,
                "Changed index {index} at row {row} is out of range (limit {limit})"
            ),
            EffectsError::DanglingStep { row } => {
                write!(f, "Row {row} is flagged as a step but has no successor row")
            }
            EffectsError::ZeroParameterStep { row, param } => write!(
                f,
                "Parameter {param} does not change between rows {row} and {}",
                row + 1
            ),
            EffectsError::RaggedSample { rows, block_len } => write!(
                f,
                "Sample with {rows} rows does not split into blocks of {block_len}"
            ),
            EffectsError::ObjectiveNameMismatch { names, columns } => {
                write!(f, "{names} objective names given for {columns} effect columns")
            }
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<EffectsError> for PyErr {
    fn from(err: EffectsError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
