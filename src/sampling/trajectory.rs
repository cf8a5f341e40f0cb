//! sampling::trajectory — one-at-a-time trajectories and flattened sets.
//!
//! Purpose
//! -------
//! Build single randomized Morris trajectories on the p-level grid and hold
//! collections of them in the flattened `(r·(n_units+1)) × k` layout used by
//! the scaler, the estimators, and the trajectory files.
//!
//! Key behaviors
//! -------------
//! - [`generate_trajectory`] draws a start point from the lower grid levels,
//!   a direction (±) per factor, and a random order of units, then walks
//!   one unit per step by `Δ`.
//! - [`TrajectorySet`] validates the block structure once and exposes
//!   per-trajectory views plus the aligned changed-unit vector.
//!
//! Invariants & assumptions
//! ------------------------
//! - A trajectory has `n_units + 1` rows; row `j + 1` differs from row `j`
//!   exactly in the factors of unit `changed[j]`, each by `±Δ`.
//! - `changed` has one entry per row; the final entry of every block is
//!   `None`, the end-of-trajectory sentinel.
//! - Unit-space coordinates stay inside `[0, 1]`.
//!
//! Conventions
//! -----------
//! - Randomness is always injected as `&mut R where R: Rng`, so identical
//!   seeds reproduce identical trajectories.
//! - Changed entries are *unit* indices; with groups they are group indices.
use ndarray::{Array2, ArrayView2, s};
use rand::{Rng, seq::SliceRandom};

use crate::sampling::{
    bounds::Bounds,
    errors::{SamplingError, SamplingResult},
    grid::Grid,
    units::Units,
};

/// One OAT trajectory: `n_units + 1` points plus the unit moved after each.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    points: Array2<f64>,
    changed: Vec<Option<usize>>,
}

impl Trajectory {
    /// # Errors
    /// - [`SamplingError::ChangedLengthMismatch`] when `changed` does not have
    ///   one entry per row.
    pub fn new(points: Array2<f64>, changed: Vec<Option<usize>>) -> SamplingResult<Self> {
        if points.nrows() != changed.len() {
            return Err(SamplingError::ChangedLengthMismatch {
                rows: points.nrows(),
                changed: changed.len(),
            });
        }
        Ok(Self { points, changed })
    }

    pub fn points(&self) -> &Array2<f64> {
        &self.points
    }

    pub fn changed(&self) -> &[Option<usize>] {
        &self.changed
    }

    pub fn len(&self) -> usize {
        self.points.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.points.nrows() == 0
    }
}

/// Draw one trajectory in `[0, 1]^k`.
///
/// Parameters
/// ----------
/// - `units`: factor or group layout; fixes `k` and the number of steps.
/// - `grid`: p-level grid providing `Δ` and the start levels.
/// - `rng`: source of randomness.
///
/// Returns
/// -------
/// A [`Trajectory`] with `units.block_len()` rows. Under grouping several
/// coordinates move in the same step.
///
/// Notes
/// -----
/// - Each factor `f` with start `x0_f` takes the values
///   `{x0_f, x0_f + Δ}`; an ascending factor starts low and ends high,
///   a descending one the reverse.
pub fn generate_trajectory<R>(units: &Units, grid: &Grid, rng: &mut R) -> Trajectory
where
    R: Rng + ?Sized,
{
    let k = units.n_factors();
    let n_units = units.n_units();
    let delta = grid.delta();
    let starts = grid.start_levels();

    let x0: Vec<f64> = (0..k).map(|_| starts[rng.random_range(0..starts.len())]).collect();
    let ascending: Vec<bool> = (0..k).map(|_| rng.random_bool(0.5)).collect();
    let mut order: Vec<usize> = (0..n_units).collect();
    order.shuffle(rng);

    let mut step_of_unit = vec![0usize; n_units];
    for (step, &unit) in order.iter().enumerate() {
        step_of_unit[unit] = step;
    }

    let mut points = Array2::<f64>::zeros((n_units + 1, k));
    for f in 0..k {
        let step = step_of_unit[units.unit_of(f)];
        let (before, after) =
            if ascending[f] { (x0[f], x0[f] + delta) } else { (x0[f] + delta, x0[f]) };
        for row in 0..=n_units {
            points[[row, f]] = if row > step { after } else { before };
        }
    }

    let changed = order.into_iter().map(Some).chain(std::iter::once(None)).collect();
    Trajectory { points, changed }
}

/// Draw one trajectory and map it affinely onto `bounds`.
///
/// # Errors
/// - [`SamplingError::FactorCountMismatch`] if `bounds` has the wrong length.
pub fn generate_trajectory_in<R>(
    units: &Units, grid: &Grid, bounds: &Bounds, rng: &mut R,
) -> SamplingResult<Trajectory>
where
    R: Rng + ?Sized,
{
    let unit = generate_trajectory(units, grid, rng);
    let points = bounds.rescale(&unit.points)?;
    Ok(Trajectory { points, changed: unit.changed })
}

/// Trajectories stacked row-wise with their aligned changed-unit vector.
#[derive(Debug, Clone, PartialEq)]
pub struct TrajectorySet {
    matrix: Array2<f64>,
    changed: Vec<Option<usize>>,
    block_len: usize,
}

impl TrajectorySet {
    /// Validate and wrap a flattened matrix.
    ///
    /// # Errors
    /// - [`SamplingError::RaggedTrajectorySet`] if `block_len < 2` or the
    ///   rows are not a multiple of `block_len`.
    /// - [`SamplingError::ChangedLengthMismatch`] if `changed` is misaligned.
    pub fn from_parts(
        matrix: Array2<f64>, changed: Vec<Option<usize>>, block_len: usize,
    ) -> SamplingResult<Self> {
        let rows = matrix.nrows();
        if block_len < 2 || rows == 0 || rows % block_len != 0 {
            return Err(SamplingError::RaggedTrajectorySet { rows, block_len });
        }
        if changed.len() != rows {
            return Err(SamplingError::ChangedLengthMismatch { rows, changed: changed.len() });
        }
        Ok(Self { matrix, changed, block_len })
    }

    /// Stack trajectories that share one shape.
    ///
    /// # Errors
    /// - [`SamplingError::InvalidTrajectoryCount`] for an empty slice.
    /// - [`SamplingError::FactorCountMismatch`] / [`SamplingError::RaggedTrajectorySet`]
    ///   when shapes differ.
    pub fn from_trajectories(trajectories: &[Trajectory]) -> SamplingResult<Self> {
        let first =
            trajectories.first().ok_or(SamplingError::InvalidTrajectoryCount { requested: 0 })?;
        let (block_len, k) = first.points.dim();
        let mut matrix = Array2::<f64>::zeros((block_len * trajectories.len(), k));
        let mut changed = Vec::with_capacity(block_len * trajectories.len());
        for (i, t) in trajectories.iter().enumerate() {
            let (rows, cols) = t.points.dim();
            if cols != k {
                return Err(SamplingError::FactorCountMismatch { expected: k, found: cols });
            }
            if rows != block_len {
                return Err(SamplingError::RaggedTrajectorySet { rows, block_len });
            }
            matrix.slice_mut(s![i * block_len..(i + 1) * block_len, ..]).assign(&t.points);
            changed.extend_from_slice(&t.changed);
        }
        Self::from_parts(matrix, changed, block_len)
    }

    pub fn matrix(&self) -> &Array2<f64> {
        &self.matrix
    }

    pub fn changed(&self) -> &[Option<usize>] {
        &self.changed
    }

    pub fn block_len(&self) -> usize {
        self.block_len
    }

    pub fn n_factors(&self) -> usize {
        self.matrix.ncols()
    }

    pub fn n_trajectories(&self) -> usize {
        self.matrix.nrows() / self.block_len
    }

    /// Points of trajectory `i`.
    pub fn block(&self, i: usize) -> ArrayView2<'_, f64> {
        self.matrix.slice(s![i * self.block_len..(i + 1) * self.block_len, ..])
    }

    /// Changed-unit entries of trajectory `i`.
    pub fn changed_block(&self, i: usize) -> &[Option<usize>] {
        &self.changed[i * self.block_len..(i + 1) * self.block_len]
    }

    /// Owned copy of trajectory `i`.
    pub fn trajectory(&self, i: usize) -> Trajectory {
        Trajectory { points: self.block(i).to_owned(), changed: self.changed_block(i).to_vec() }
    }

    /// New set made of the trajectories at `indices`, in that order.
    pub fn select(&self, indices: &[usize]) -> TrajectorySet {
        let b = self.block_len;
        let mut matrix = Array2::<f64>::zeros((indices.len() * b, self.n_factors()));
        let mut changed = Vec::with_capacity(indices.len() * b);
        for (slot, &i) in indices.iter().enumerate() {
            matrix.slice_mut(s![slot * b..(slot + 1) * b, ..]).assign(&self.block(i));
            changed.extend_from_slice(self.changed_block(i));
        }
        TrajectorySet { matrix, changed, block_len: b }
    }

    /// Copy with every column mapped affinely onto `bounds`.
    ///
    /// # Errors
    /// - [`SamplingError::FactorCountMismatch`] if `bounds` has the wrong length.
    pub fn rescaled(&self, bounds: &Bounds) -> SamplingResult<TrajectorySet> {
        Ok(TrajectorySet {
            matrix: bounds.rescale(&self.matrix)?,
            changed: self.changed.clone(),
            block_len: self.block_len,
        })
    }

    pub fn into_parts(self) -> (Array2<f64>, Vec<Option<usize>>, usize) {
        (self.matrix, self.changed, self.block_len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampling::units::GroupMatrix;
    use rand::{SeedableRng, rngs::StdRng};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // Structural validity of generated trajectories (with and without
    // groups), determinism under a fixed seed, and set assembly.
    // -------------------------------------------------------------------------

    fn moved_columns(t: &Trajectory, step: usize) -> Vec<usize> {
        let p = t.points();
        (0..p.ncols()).filter(|&c| (p[[step + 1, c]] - p[[step, c]]).abs() > 1e-12).collect()
    }

    #[test]
    // Purpose
    // -------
    // Consecutive points differ in exactly the changed factor by ±Δ and
    // stay in [0, 1].
    //
    // Given
    // -----
    // - k = 5, p = 4, 200 draws from a seeded RNG.
    //
    // Expect
    // ------
    // - Every step moves exactly `changed[j]` by Δ; the last entry is None;
    //   every unit appears once.
    fn generated_trajectories_are_valid_oat_paths() {
        let units = Units::factors(5).expect("units");
        let grid = Grid::new(4).expect("grid");
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let t = generate_trajectory(&units, &grid, &mut rng);
            assert_eq!(t.len(), 6);
            assert_eq!(t.changed()[5], None);
            let mut seen = vec![false; 5];
            for step in 0..5 {
                let unit = t.changed()[step].expect("valid step");
                assert_eq!(moved_columns(&t, step), vec![unit]);
                let d = (t.points()[[step + 1, unit]] - t.points()[[step, unit]]).abs();
                assert!((d - grid.delta()).abs() < 1e-12);
                seen[unit] = true;
            }
            assert!(seen.iter().all(|&s| s));
            assert!(t.points().iter().all(|&x| (-1e-12..=1.0 + 1e-12).contains(&x)));
        }
    }

    #[test]
    // Purpose
    // -------
    // Under grouping each step moves every factor of one group and nothing else.
    //
    // Given
    // -----
    // - 4 factors in groups {0, 3} and {1, 2}, p = 6.
    //
    // Expect
    // ------
    // - 3 rows; step j moves exactly the members of group `changed[j]`.
    fn grouped_steps_move_whole_groups() {
        let groups = GroupMatrix::from_assignment(vec![0, 1, 1, 0], 2).expect("groups");
        let units = Units::Groups(groups);
        let grid = Grid::new(6).expect("grid");
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..50 {
            let t = generate_trajectory(&units, &grid, &mut rng);
            assert_eq!(t.len(), 3);
            for step in 0..2 {
                let g = t.changed()[step].expect("valid step");
                assert_eq!(moved_columns(&t, step), units.members(g));
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // Identical seeds reproduce identical trajectories.
    //
    // Given
    // -----
    // - Two RNGs seeded with 42.
    //
    // Expect
    // ------
    // - Equal trajectories.
    fn generation_is_deterministic_under_seed() {
        let units = Units::factors(3).expect("units");
        let grid = Grid::new(6).expect("grid");
        let a = generate_trajectory(&units, &grid, &mut StdRng::seed_from_u64(42));
        let b = generate_trajectory(&units, &grid, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    // Purpose
    // -------
    // Sets stack blocks in order and `select` picks blocks by index.
    //
    // Given
    // -----
    // - Three generated trajectories; selection [2, 0].
    //
    // Expect
    // ------
    // - Selected block 0 equals original block 2; changed vector follows.
    fn trajectory_set_select_reorders_blocks() {
        let units = Units::factors(2).expect("units");
        let grid = Grid::new(4).expect("grid");
        let mut rng = StdRng::seed_from_u64(3);
        let ts: Vec<Trajectory> =
            (0..3).map(|_| generate_trajectory(&units, &grid, &mut rng)).collect();
        let set = TrajectorySet::from_trajectories(&ts).expect("set");
        assert_eq!(set.n_trajectories(), 3);

        let picked = set.select(&[2, 0]);
        assert_eq!(picked.n_trajectories(), 2);
        assert_eq!(picked.block(0), set.block(2));
        assert_eq!(picked.changed_block(1), set.changed_block(0));
    }

    #[test]
    // Purpose
    // -------
    // Ragged matrices are rejected.
    //
    // Given
    // -----
    // - 5 rows with block length 3.
    //
    // Expect
    // ------
    // - `RaggedTrajectorySet`.
    fn ragged_sets_are_rejected() {
        let res = TrajectorySet::from_parts(Array2::zeros((5, 2)), vec![None; 5], 3);
        assert_eq!(res, Err(SamplingError::RaggedTrajectorySet { rows: 5, block_len: 3 }));
    }
}
