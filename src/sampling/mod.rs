//! sampling — optimized Morris trajectory design.
//!
//! Purpose
//! -------
//! Produce the one-at-a-time trajectories on which the model is evaluated:
//! random trajectories on a p-level grid, a spread-maximizing selection of
//! `r` out of `N` candidates, and optional diagnostics of how evenly the
//! selection covers the grid.
//!
//! Key behaviors
//! -------------
//! - [`grid::Grid`] fixes `p`, the step `Δ = p/(2(p−1))`, and start levels.
//! - [`units::Units`] abstracts factors versus groups of factors.
//! - [`trajectory::generate_trajectory`] draws one trajectory.
//! - [`optimizer::optimized_trajectories`] draws the pool, removes
//!   duplicates, selects `r` greedily, and rescales onto [`bounds::Bounds`].
//! - [`diagnostics::SamplingDiagnostics`] compares level occupancy of the
//!   optimized and the naive selection.
//!
//! Invariants & assumptions
//! ------------------------
//! - Consecutive points of a trajectory differ in exactly one unit.
//! - Unit-space coordinates lie in `[0, 1]`.
//! - The changed-unit vector has one entry per row, `None` closing each block.
//!
//! Conventions
//! -----------
//! - Randomness is injected (`&mut R: Rng`); [`options::SamplingOptions::rng`]
//!   builds a seeded `StdRng` when a seed is configured.
//! - Errors are reported as [`errors::SamplingError`].
//!
//! Downstream usage
//! ----------------
//! - `parameters::scaler` turns the unit-space selection into physical
//!   parameter values; `effects` consumes the same changed-unit vector.
//!
//! Testing notes
//! -------------
//! - Each submodule tests its own invariants; the end-to-end Ishigami flow
//!   lives in `tests/integration_morris_pipeline.rs`.

pub mod bounds;
pub mod diagnostics;
pub mod errors;
pub mod grid;
pub mod optimizer;
pub mod options;
pub mod trajectory;
pub mod units;

pub use self::bounds::Bounds;
pub use self::diagnostics::{LevelOccupancy, SamplingDiagnostics};
pub use self::errors::{SamplingError, SamplingResult};
pub use self::grid::Grid;
pub use self::optimizer::{OptimizedSample, Selection, optimized_trajectories};
pub use self::options::SamplingOptions;
pub use self::trajectory::{Trajectory, TrajectorySet, generate_trajectory};
pub use self::units::{GroupMatrix, Units};

pub mod prelude {
    pub use super::bounds::Bounds;
    pub use super::errors::{SamplingError, SamplingResult};
    pub use super::grid::Grid;
    pub use super::optimizer::{OptimizedSample, optimized_trajectories};
    pub use super::options::SamplingOptions;
    pub use super::trajectory::TrajectorySet;
    pub use super::units::{GroupMatrix, Units};
}
