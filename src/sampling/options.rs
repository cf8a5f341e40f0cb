//! sampling::options — configuration for optimized trajectory sampling.
//!
//! Purpose
//! -------
//! Collect the knobs of an optimized Morris sample in one validated value:
//! grid resolution, how many trajectories to keep, how many candidates to
//! draw them from, the RNG seed, and whether to compute level-occupancy
//! diagnostics.
//!
//! Conventions
//! -----------
//! - `seed = None` seeds from the operating system; `Some(s)` makes the
//!   whole sample reproducible.
//! - The candidate pool defaults to ten times the selection, the customary
//!   Morris ratio.
use rand::{SeedableRng, rngs::StdRng};

use crate::sampling::{
    errors::{SamplingError, SamplingResult},
    grid::Grid,
};

/// Default candidate-to-selection ratio.
pub const DEFAULT_CANDIDATE_FACTOR: usize = 10;

/// SamplingOptions — validated configuration for [`optimized_trajectories`].
///
/// Fields
/// ------
/// - `grid`: p-level grid (`p ≥ 2`).
/// - `n_selected`: `r`, trajectories kept after optimization (`≥ 1`).
/// - `n_candidates`: `N`, trajectories drawn before optimization (`≥ r`).
/// - `seed`: optional RNG seed.
/// - `diagnostics`: compute [`SamplingDiagnostics`] alongside the sample.
///
/// [`optimized_trajectories`]: crate::sampling::optimizer::optimized_trajectories
/// [`SamplingDiagnostics`]: crate::sampling::diagnostics::SamplingDiagnostics
#[derive(Debug, Clone, PartialEq)]
pub struct SamplingOptions {
    pub grid: Grid,
    pub n_selected: usize,
    pub n_candidates: usize,
    pub seed: Option<u64>,
    pub diagnostics: bool,
}

impl SamplingOptions {
    /// Build validated options.
    ///
    /// Parameters
    /// ----------
    /// - `levels`: number of grid levels `p`.
    /// - `n_selected`: `r`.
    /// - `n_candidates`: `N`; `None` uses `10 · r`.
    /// - `seed`: optional RNG seed.
    /// - `diagnostics`: whether to compute level-occupancy diagnostics.
    ///
    /// Errors
    /// ------
    /// - [`SamplingError::InvalidLevels`] for `levels < 2`.
    /// - [`SamplingError::InvalidTrajectoryCount`] for `n_selected == 0`.
    /// - [`SamplingError::CandidatePoolTooSmall`] for `n_candidates < n_selected`.
    pub fn new(
        levels: usize, n_selected: usize, n_candidates: Option<usize>, seed: Option<u64>,
        diagnostics: bool,
    ) -> SamplingResult<Self> {
        let grid = Grid::new(levels)?;
        if n_selected == 0 {
            return Err(SamplingError::InvalidTrajectoryCount { requested: n_selected });
        }
        let n_candidates = n_candidates.unwrap_or(DEFAULT_CANDIDATE_FACTOR * n_selected);
        if n_candidates < n_selected {
            return Err(SamplingError::CandidatePoolTooSmall {
                candidates: n_candidates,
                selected: n_selected,
            });
        }
        Ok(Self { grid, n_selected, n_candidates, seed, diagnostics })
    }

    /// RNG for this configuration: seeded when `seed` is set, OS entropy
    /// otherwise.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}

impl Default for SamplingOptions {
    fn default() -> Self {
        Self {
            grid: Grid::default(),
            n_selected: 10,
            n_candidates: DEFAULT_CANDIDATE_FACTOR * 10,
            seed: None,
            diagnostics: false,
        }
    }
}
