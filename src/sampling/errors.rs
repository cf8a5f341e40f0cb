//! sampling::errors — error surface for trajectory generation and selection.
//!
//! Purpose
//! -------
//! Describe every way trajectory sampling can fail: invalid grid or unit
//! configuration, malformed bounds, and a candidate pool that collapses below
//! the requested number of unique trajectories.
//!
//! Conventions
//! -----------
//! - Messages are phrased in terms of the sampling inputs (levels, bounds,
//!   groups) so they can be shown to users without further context.
//! - With `python-bindings`, [`SamplingError`] converts into `PyValueError`.

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

/// Result alias for trajectory sampling.
pub type SamplingResult<T> = Result<T, SamplingError>;

#[derive(Debug, Clone, PartialEq)]
pub enum SamplingError {
    // ---- Grid / options ----
    /// Number of grid levels must be at least 2.
    InvalidLevels { levels: usize },
    /// At least one factor is required.
    NoFactors,
    /// Requested trajectory count must be positive.
    InvalidTrajectoryCount { requested: usize },
    /// Candidate pool must be at least as large as the selection.
    CandidatePoolTooSmall { candidates: usize, selected: usize },

    // ---- Groups ----
    /// Group membership matrix row count does not match the factor count.
    GroupShapeMismatch { expected_factors: usize, found_rows: usize },
    /// A factor must belong to exactly one group.
    InvalidGroupMembership { factor: usize, memberships: usize },
    /// Every group needs at least one member.
    EmptyGroup { group: usize },
    /// Group names must match the number of groups.
    GroupNameMismatch { expected: usize, found: usize },

    // ---- Bounds ----
    /// Bound vectors must have one entry per factor.
    BoundsLengthMismatch { expected: usize, lower: usize, upper: usize },
    /// Lower bound must be finite and strictly below the upper bound.
    InvalidBounds { index: usize, lower: f64, upper: f64 },

    // ---- Trajectory sets ----
    /// Matrix width does not match the number of factors.
    FactorCountMismatch { expected: usize, found: usize },
    /// Rows are not a whole number of trajectory blocks.
    RaggedTrajectorySet { rows: usize, block_len: usize },
    /// Changed-unit vector must align with matrix rows.
    ChangedLengthMismatch { rows: usize, changed: usize },

    // ---- Degeneracy ----
    /// Duplicate removal left fewer unique trajectories than requested.
    InsufficientUniqueTrajectories { unique: usize, requested: usize },
}

impl std::error::Error for SamplingError {}

impl std::fmt::Display for SamplingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SamplingError::InvalidLevels { levels } => {
                write!(f, "Invalid number of grid levels {levels}: need at least 2")
            }
            SamplingError::NoFactors => write!(f, "At least one factor is required"),
            SamplingError::InvalidTrajectoryCount { requested } => {
                write!(f, "Invalid trajectory count {requested}: must be positive")
            }
            SamplingError::CandidatePoolTooSmall { candidates, selected } => {
                write!(
                    f,
                    "Candidate pool of {candidates} trajectories cannot supply {selected} selections"
                )
            }
            SamplingError::GroupShapeMismatch { expected_factors, found_rows } => {
                write!(
                    f,
                    "Group matrix has {found_rows} rows but there are {expected_factors} factors"
                )
            }
            SamplingError::InvalidGroupMembership { factor, memberships } => {
                write!(
                    f,
                    "Factor {factor} belongs to {memberships} groups; each factor needs exactly one"
                )
            }
            SamplingError::EmptyGroup { group } => {
                write!(f, "Group {group} has no member factors")
            }
            SamplingError::GroupNameMismatch { expected, found } => {
                write!(f, "Expected {expected} group names, found {found}")
            }
            SamplingError::BoundsLengthMismatch { expected, lower, upper } => {
                write!(
                    f,
                    "Bounds length mismatch: expected {expected}, lower has {lower}, upper has {upper}"
                )
            }
            SamplingError::InvalidBounds { index, lower, upper } => {
                write!(
                    f,
                    "Invalid bounds at index {index}: [{lower}, {upper}] must be finite with lower < upper"
                )
            }
            SamplingError::FactorCountMismatch { expected, found } => {
                write!(f, "Factor count mismatch: expected {expected} columns, found {found}")
            }
            SamplingError::RaggedTrajectorySet { rows, block_len } => {
                write!(f, "{rows} rows do not split into trajectory blocks of {block_len}")
            }
            SamplingError::ChangedLengthMismatch { rows, changed } => {
                write!(f, "Changed-unit vector has {changed} entries for {rows} rows")
            }
            SamplingError::InsufficientUniqueTrajectories { unique, requested } => {
                write!(
                    f,
                    "Insufficient trajectory diversity: {unique} unique trajectories, {requested} requested"
                )
            }
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<SamplingError> for PyErr {
    fn from(err: SamplingError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
