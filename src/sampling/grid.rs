//! sampling::grid — the p-level Morris grid on [0, 1].
//!
//! A grid with `p` levels has spacing `1/(p−1)` and Morris step
//! `Δ = p / (2(p−1))`. Starting points are drawn from the lower part of the
//! grid so that a `+Δ` step never leaves the unit interval.
use crate::sampling::errors::{SamplingError, SamplingResult};

/// Absolute slack used when enumerating start levels below `1 − Δ`.
const START_LEVEL_SLACK: f64 = 1e-8;

/// Default number of grid levels.
pub const DEFAULT_LEVELS: usize = 6;

/// Discretization of [0, 1] into `levels` equidistant values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    levels: usize,
}

impl Grid {
    /// # Errors
    /// - [`SamplingError::InvalidLevels`] when `levels < 2`.
    pub fn new(levels: usize) -> SamplingResult<Self> {
        if levels < 2 {
            return Err(SamplingError::InvalidLevels { levels });
        }
        Ok(Self { levels })
    }

    pub fn levels(&self) -> usize {
        self.levels
    }

    /// Morris step `Δ = p / (2(p−1))`.
    pub fn delta(&self) -> f64 {
        let p = self.levels as f64;
        p / (2.0 * (p - 1.0))
    }

    /// Distance between neighbouring levels, `1/(p−1)`.
    pub fn spacing(&self) -> f64 {
        1.0 / (self.levels as f64 - 1.0)
    }

    /// All `p` level values `0, 1/(p−1), …, 1`.
    pub fn level_values(&self) -> Vec<f64> {
        let h = self.spacing();
        (0..self.levels).map(|i| i as f64 * h).collect()
    }

    /// Candidate starting coordinates.
    ///
    /// Levels `≤ 1 − Δ`, truncated to the first `⌊p/2⌋`; every entry `x`
    /// satisfies `x + Δ ≤ 1` up to rounding.
    pub fn start_levels(&self) -> Vec<f64> {
        let h = self.spacing();
        let ceiling = 1.0 - self.delta() + START_LEVEL_SLACK;
        let max_count = (self.levels / 2).max(1);
        (0..self.levels)
            .map(|i| i as f64 * h)
            .take_while(|&x| x < ceiling)
            .take(max_count)
            .collect()
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self { levels: DEFAULT_LEVELS }
    }
}
