//! sampling::diagnostics — grid-level occupancy and sampling quality.
//!
//! For every trajectory and factor two values are recorded: the factor's
//! coordinate at the first point and the value it moves to. A well spread
//! sample visits every grid level equally often, i.e. `2r/p` times per
//! factor. The quality score
//!
//! ```text
//! 1 − Σ_f Σ_level |count − 2r/p| / ((2r/p) · p · k)
//! ```
//!
//! equals 1 for perfectly even occupancy and decreases as the sample clumps.
use ndarray::Array2;

use crate::sampling::{grid::Grid, trajectory::TrajectorySet};

/// Matching tolerance between a coordinate and a grid level.
pub const LEVEL_TOLERANCE: f64 = 1e-5;

/// Visit counts per factor (rows) and grid level (columns).
#[derive(Debug, Clone, PartialEq)]
pub struct LevelOccupancy {
    pub counts: Array2<usize>,
    pub n_trajectories: usize,
}

impl LevelOccupancy {
    /// Count level visits of a unit-space trajectory set.
    pub fn from_set(set: &TrajectorySet, grid: &Grid) -> Self {
        let levels = grid.level_values();
        let k = set.n_factors();
        let mut counts = Array2::<usize>::zeros((k, levels.len()));
        for t in 0..set.n_trajectories() {
            let block = set.block(t);
            for f in 0..k {
                let first = block[[0, f]];
                let moved = block.column(f).iter().rev().copied().find(|&x| x != first);
                for value in std::iter::once(first).chain(moved) {
                    let hit = levels.iter().position(|&l| (value - l).abs() < LEVEL_TOLERANCE);
                    if let Some(level) = hit {
                        counts[[f, level]] += 1;
                    }
                }
            }
        }
        Self { counts, n_trajectories: set.n_trajectories() }
    }

    /// Quality score in `(−∞, 1]`; 1 means perfectly even occupancy.
    pub fn quality(&self) -> f64 {
        let (k, p) = self.counts.dim();
        if k == 0 || p == 0 || self.n_trajectories == 0 {
            return 0.0;
        }
        let ideal = 2.0 * self.n_trajectories as f64 / p as f64;
        let deviation: f64 = self.counts.iter().map(|&c| (c as f64 - ideal).abs()).sum();
        1.0 - deviation / (ideal * p as f64 * k as f64)
    }
}

/// Occupancy of the optimized selection next to the naive alternative
/// (the first `r` candidates in draw order).
#[derive(Debug, Clone, PartialEq)]
pub struct SamplingDiagnostics {
    pub optimized: LevelOccupancy,
    pub original: LevelOccupancy,
    pub quality_optimized: f64,
    pub quality_original: f64,
}

impl SamplingDiagnostics {
    pub fn compare(optimized: &TrajectorySet, original: &TrajectorySet, grid: &Grid) -> Self {
        let optimized = LevelOccupancy::from_set(optimized, grid);
        let original = LevelOccupancy::from_set(original, grid);
        let quality_optimized = optimized.quality();
        let quality_original = original.quality();
        Self { optimized, original, quality_optimized, quality_original }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // Two trajectories on a 2-level grid that cover each level once per
    // factor give the perfect score.
    //
    // Given
    // -----
    // - k = 1, p = 2: trajectories 0→1 and 1→0.
    //
    // Expect
    // ------
    // - counts = [[2, 2]], quality = 1.
    fn even_occupancy_scores_one() {
        // Arrange
        let set = TrajectorySet::from_parts(
            array![[0.0], [1.0], [1.0], [0.0]],
            vec![Some(0), None, Some(0), None],
            2,
        )
        .expect("valid set");
        let grid = Grid::new(2).expect("grid");

        // Act
        let occ = LevelOccupancy::from_set(&set, &grid);

        // Assert
        assert_eq!(occ.counts, array![[2, 2]]);
        assert!((occ.quality() - 1.0).abs() < 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Identical trajectories pile onto the same levels and lower the score.
    //
    // Given
    // -----
    // - k = 1, p = 4: two copies of 0 → 2/3, so levels 1/3 and 1 stay empty.
    //
    // Expect
    // ------
    // - counts = [[2, 0, 2, 0]], quality = 0.
    fn clumped_occupancy_scores_below_one() {
        let set = TrajectorySet::from_parts(
            array![[0.0], [2.0 / 3.0], [0.0], [2.0 / 3.0]],
            vec![Some(0), None, Some(0), None],
            2,
        )
        .expect("valid set");
        let grid = Grid::new(4).expect("grid");
        let occ = LevelOccupancy::from_set(&set, &grid);
        assert_eq!(occ.counts, array![[2, 0, 2, 0]]);
        assert!(occ.quality().abs() < 1e-12);
    }
}
