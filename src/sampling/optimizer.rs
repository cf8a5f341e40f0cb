//! sampling::optimizer — spread-maximizing selection of Morris trajectories.
//!
//! Purpose
//! -------
//! Draw a pool of `N` candidate trajectories and keep the `r` that are
//! furthest apart, so that a small number of model runs still covers the
//! parameter space well.
//!
//! Key behaviors
//! -------------
//! - [`point_distances`] computes the Euclidean distance between every pair
//!   of points in the pool once; trajectory distances are block sums of
//!   this matrix.
//! - [`trajectory_distances`] flags a trajectory as a duplicate when its
//!   block against an earlier trajectory has exactly `n_units + 1` zero
//!   entries (every point shared). Point order does not matter, so a
//!   trajectory visiting the same points in reverse is a duplicate too.
//!   Duplicates are removed before selection.
//! - [`greedy_select`] grows a sequence from every possible start by
//!   repeatedly adding the unselected trajectory with the largest L2 norm of
//!   distances to the current selection, then keeps the sequence with the
//!   largest accumulated distance.
//!
//! Invariants & assumptions
//! ------------------------
//! - Ties resolve to the first maximal index, both when picking the next
//!   trajectory and when picking the winning start.
//! - The output never contains two identical trajectories.
//! - Fewer than `r` unique candidates is an error, never a silent shortfall.
//!
//! Conventions
//! -----------
//! - Candidates are generated and compared in `[0, 1]^k`; the selection is
//!   mapped onto caller bounds only at the end.
//! - With the `parallel` feature the point-distance rows are filled by rayon
//!   workers; results are identical to the sequential path.
//!
//! Testing notes
//! -------------
//! - Unit tests cover duplicate detection on hand-built pools, tie-breaking,
//!   the insufficient-diversity error, and the concrete k = 3, p = 6,
//!   N = 50, r = 5 layout. Spread versus random selection is exercised in
//!   the integration tests.
use ndarray::{Array2, ArrayView1, ArrayViewMut1, Axis, Zip, s};
use rand::Rng;
use tracing::{debug, info};

use crate::sampling::{
    bounds::Bounds,
    diagnostics::SamplingDiagnostics,
    errors::{SamplingError, SamplingResult},
    options::SamplingOptions,
    trajectory::{TrajectorySet, generate_trajectory},
    units::Units,
};

/// Pairwise distances between trajectories plus the duplicate mask.
#[derive(Debug, Clone, PartialEq)]
pub struct PairDistances {
    /// `N × N` symmetric matrix; zero on the diagonal and for duplicate pairs.
    pub distances: Array2<f64>,
    /// `duplicate[z]` is set when trajectory `z` repeats an earlier one.
    pub duplicate: Vec<bool>,
}

/// Best greedy sequence over a distance matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct GreedySelection {
    /// Indices into the distance matrix, in selection order.
    pub order: Vec<usize>,
    /// Distance gained at each step; the first entry is always 0.
    pub gains: Vec<f64>,
    /// Sum of `gains`.
    pub total: f64,
}

/// Outcome of selecting `r` trajectories from a candidate pool.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    /// Indices into the candidate pool, in selection order.
    pub indices: Vec<usize>,
    /// Accumulated greedy distance of the winning sequence.
    pub total_distance: f64,
    /// Number of candidates left after duplicate removal.
    pub unique: usize,
    /// Candidate indices dropped as duplicates.
    pub duplicates: Vec<usize>,
}

/// An optimized Morris sample.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizedSample {
    /// Selected trajectories in `[0, 1]^k`.
    pub unit_trajectories: TrajectorySet,
    /// Selected trajectories mapped onto the caller's bounds.
    pub trajectories: TrajectorySet,
    pub selection: Selection,
    pub diagnostics: Option<SamplingDiagnostics>,
}

/// Euclidean distance between every pair of rows.
pub fn point_distances(points: &Array2<f64>) -> Array2<f64> {
    let n = points.nrows();
    let mut out = Array2::<f64>::zeros((n, n));
    let fill = |mut row: ArrayViewMut1<'_, f64>, p: ArrayView1<'_, f64>| {
        for (j, q) in points.rows().into_iter().enumerate() {
            row[j] = p.iter().zip(q.iter()).map(|(a, b)| (a - b) * (a - b)).sum::<f64>().sqrt();
        }
    };
    let zip = Zip::from(out.rows_mut()).and(points.rows());
    #[cfg(feature = "parallel")]
    zip.par_for_each(fill);
    #[cfg(not(feature = "parallel"))]
    zip.for_each(fill);
    out
}

/// Block-sum distances between all trajectories of `set` and their
/// duplicate mask.
pub fn trajectory_distances(set: &TrajectorySet) -> PairDistances {
    let n = set.n_trajectories();
    let b = set.block_len();
    let points = point_distances(set.matrix());
    let mut distances = Array2::<f64>::zeros((n, n));
    let mut duplicate = vec![false; n];
    for j in 0..n {
        for z in (j + 1)..n {
            let block = points.slice(s![b * j..b * (j + 1), b * z..b * (z + 1)]);
            let zeros = block.iter().filter(|&&d| d == 0.0).count();
            let d = if zeros == b {
                duplicate[z] = true;
                0.0
            } else {
                block.sum()
            };
            distances[[j, z]] = d;
            distances[[z, j]] = d;
        }
    }
    PairDistances { distances, duplicate }
}

/// Greedy max-spread sequence of length `r` over a square distance matrix.
///
/// Every index serves once as the seed. From a seed, the next element is the
/// unselected index `c` maximizing `sqrt(Σ_{s ∈ selected} d(s, c)²)`; that
/// value is the step's gain. The sequence with the largest total gain wins.
///
/// # Errors
/// - [`SamplingError::InvalidTrajectoryCount`] for `r == 0`.
/// - [`SamplingError::InsufficientUniqueTrajectories`] for `r` larger than
///   the matrix.
pub fn greedy_select(distances: &Array2<f64>, r: usize) -> SamplingResult<GreedySelection> {
    let n = distances.nrows();
    if r == 0 {
        return Err(SamplingError::InvalidTrajectoryCount { requested: r });
    }
    if n < r {
        return Err(SamplingError::InsufficientUniqueTrajectories { unique: n, requested: r });
    }

    let mut best: Option<GreedySelection> = None;
    for seed in 0..n {
        let mut order = vec![seed];
        let mut gains = vec![0.0];
        let mut taken = vec![false; n];
        taken[seed] = true;
        let mut sq_sum: Vec<f64> = distances.row(seed).iter().map(|d| d * d).collect();

        for _ in 1..r {
            let mut pick: Option<(usize, f64)> = None;
            for c in (0..n).filter(|&c| !taken[c]) {
                let norm = sq_sum[c].sqrt();
                if pick.is_none_or(|(_, v)| norm > v) {
                    pick = Some((c, norm));
                }
            }
            let Some((c, gain)) = pick else { break };
            taken[c] = true;
            order.push(c);
            gains.push(gain);
            for (acc, d) in sq_sum.iter_mut().zip(distances.row(c).iter()) {
                *acc += d * d;
            }
        }

        let total: f64 = gains.iter().sum();
        if best.as_ref().is_none_or(|b| total > b.total) {
            best = Some(GreedySelection { order, gains, total });
        }
    }
    best.ok_or(SamplingError::InsufficientUniqueTrajectories { unique: n, requested: r })
}

/// Drop duplicates from `candidates` and greedily select `r` of the rest.
///
/// # Errors
/// - [`SamplingError::InsufficientUniqueTrajectories`] when fewer than `r`
///   unique candidates remain.
pub fn select_trajectories(candidates: &TrajectorySet, r: usize) -> SamplingResult<Selection> {
    let PairDistances { distances, duplicate } = trajectory_distances(candidates);
    let survivors: Vec<usize> = (0..duplicate.len()).filter(|&i| !duplicate[i]).collect();
    let duplicates: Vec<usize> = (0..duplicate.len()).filter(|&i| duplicate[i]).collect();
    debug!(
        candidates = candidates.n_trajectories(),
        duplicates = duplicates.len(),
        "trajectory pool screened for duplicates"
    );
    if survivors.len() < r {
        return Err(SamplingError::InsufficientUniqueTrajectories {
            unique: survivors.len(),
            requested: r,
        });
    }

    let reduced = distances.select(Axis(0), &survivors).select(Axis(1), &survivors);
    let greedy = greedy_select(&reduced, r)?;
    let indices = greedy.order.iter().map(|&i| survivors[i]).collect();
    Ok(Selection { indices, total_distance: greedy.total, unique: survivors.len(), duplicates })
}

/// Generate `N` candidates, select the `r` most spread-out, and map them
/// onto `bounds`.
///
/// Parameters
/// ----------
/// - `units`: factor or group layout.
/// - `bounds`: one interval per factor; use [`Bounds::unit`] to stay in
///   `[0, 1]^k`.
/// - `opts`: grid, `r`, `N`, and the diagnostics switch. The seed in `opts`
///   is not consulted; callers pass the RNG explicitly.
/// - `rng`: source of randomness.
///
/// Errors
/// ------
/// - [`SamplingError::FactorCountMismatch`] if `bounds` does not match the
///   factor count.
/// - [`SamplingError::InsufficientUniqueTrajectories`] if the pool is too
///   repetitive.
pub fn optimized_trajectories<R>(
    units: &Units, bounds: &Bounds, opts: &SamplingOptions, rng: &mut R,
) -> SamplingResult<OptimizedSample>
where
    R: Rng + ?Sized,
{
    if bounds.len() != units.n_factors() {
        return Err(SamplingError::FactorCountMismatch {
            expected: units.n_factors(),
            found: bounds.len(),
        });
    }
    let pool: Vec<_> =
        (0..opts.n_candidates).map(|_| generate_trajectory(units, &opts.grid, rng)).collect();
    let candidates = TrajectorySet::from_trajectories(&pool)?;

    let selection = select_trajectories(&candidates, opts.n_selected)?;
    info!(
        selected = ?selection.indices,
        unique = selection.unique,
        total_distance = selection.total_distance,
        "optimized trajectory set selected"
    );

    let unit_trajectories = candidates.select(&selection.indices);
    let trajectories = unit_trajectories.rescaled(bounds)?;

    let diagnostics = opts.diagnostics.then(|| {
        let first: Vec<usize> = (0..opts.n_selected).collect();
        let original = candidates.select(&first);
        let diag = SamplingDiagnostics::compare(&unit_trajectories, &original, &opts.grid);
        info!(
            quality_optimized = diag.quality_optimized,
            quality_original = diag.quality_original,
            "sampling quality"
        );
        diag
    });

    Ok(OptimizedSample { unit_trajectories, trajectories, selection, diagnostics })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampling::trajectory::Trajectory;
    use ndarray::array;
    use rand::{SeedableRng, rngs::StdRng};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // Distance and duplicate bookkeeping on hand-built pools, greedy
    // tie-breaking, error paths, and the canonical Ishigami layout.
    // -------------------------------------------------------------------------

    fn one_factor_pool(starts: &[(f64, f64)]) -> TrajectorySet {
        let ts: Vec<Trajectory> = starts
            .iter()
            .map(|&(a, b)| Trajectory::new(array![[a], [b]], vec![Some(0), None]).expect("traj"))
            .collect();
        TrajectorySet::from_trajectories(&ts).expect("set")
    }

    #[test]
    // Purpose
    // -------
    // Point distances are Euclidean and symmetric.
    //
    // Given
    // -----
    // - Points (0, 0), (3, 4).
    //
    // Expect
    // ------
    // - d = 5 off-diagonal, 0 on the diagonal.
    fn point_distances_are_euclidean() {
        let d = point_distances(&array![[0.0, 0.0], [3.0, 4.0]]);
        assert_eq!(d, array![[0.0, 5.0], [5.0, 0.0]]);
    }

    #[test]
    // Purpose
    // -------
    // Identical trajectories are flagged; only the later copy is dropped.
    //
    // Given
    // -----
    // - Pool: A = 0→1, B = 0.5→1, A again.
    //
    // Expect
    // ------
    // - duplicate = [false, false, true]; d(A, A') = 0; d(A, B) = 2.
    fn identical_trajectories_are_flagged_as_duplicates() {
        // Arrange
        let pool = one_factor_pool(&[(0.0, 1.0), (0.5, 1.0), (0.0, 1.0)]);

        // Act
        let pd = trajectory_distances(&pool);

        // Assert
        assert_eq!(pd.duplicate, vec![false, false, true]);
        assert_eq!(pd.distances[[0, 2]], 0.0);
        assert!((pd.distances[[0, 1]] - 2.0).abs() < 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // A trajectory walking the same points in reverse order is a duplicate.
    //
    // Given
    // -----
    // - k = 2: (0, 0) → (0.6, 0) → (0.6, 0.6) and the same points reversed.
    //
    // Expect
    // ------
    // - duplicate = [false, true] and a zero distance between the two.
    fn reversed_trajectory_is_a_duplicate() {
        // Arrange
        let forward = Trajectory::new(
            array![[0.0, 0.0], [0.6, 0.0], [0.6, 0.6]],
            vec![Some(0), Some(1), None],
        )
        .unwrap();
        let backward = Trajectory::new(
            array![[0.6, 0.6], [0.6, 0.0], [0.0, 0.0]],
            vec![Some(1), Some(0), None],
        )
        .unwrap();
        let pool = TrajectorySet::from_trajectories(&[forward, backward]).unwrap();

        // Act
        let pd = trajectory_distances(&pool);

        // Assert
        assert_eq!(pd.duplicate, vec![false, true]);
        assert_eq!(pd.distances[[0, 1]], 0.0);
    }

    #[test]
    // Purpose
    // -------
    // A pool that collapses below r fails loudly.
    //
    // Given
    // -----
    // - Three copies of the same trajectory, r = 2.
    //
    // Expect
    // ------
    // - `InsufficientUniqueTrajectories { unique: 1, requested: 2 }`.
    fn all_duplicate_pool_is_insufficient() {
        let pool = one_factor_pool(&[(0.0, 1.0), (0.0, 1.0), (0.0, 1.0)]);
        assert_eq!(
            select_trajectories(&pool, 2),
            Err(SamplingError::InsufficientUniqueTrajectories { unique: 1, requested: 2 })
        );
    }

    #[test]
    // Purpose
    // -------
    // Selection never returns both copies of a duplicated trajectory.
    //
    // Given
    // -----
    // - Pool A, A, B, C on a 1-factor line, r = 3.
    //
    // Expect
    // ------
    // - Index 1 (second A) never selected; three distinct indices.
    fn selection_excludes_duplicates() {
        let pool = one_factor_pool(&[(0.0, 0.5), (0.0, 0.5), (0.5, 1.0), (1.0, 0.75)]);
        let sel = select_trajectories(&pool, 3).expect("selection");
        assert!(!sel.indices.contains(&1));
        assert_eq!(sel.duplicates, vec![1]);
        let mut sorted = sel.indices.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), 3);
    }

    #[test]
    // Purpose
    // -------
    // Ties resolve to the first maximal index.
    //
    // Given
    // -----
    // - Four trajectories with all pairwise distances equal to 1, r = 2.
    //
    // Expect
    // ------
    // - Winning sequence [0, 1].
    fn greedy_ties_pick_first_index() {
        let mut d = Array2::<f64>::ones((4, 4));
        d.diag_mut().fill(0.0);
        let sel = greedy_select(&d, 2).expect("selection");
        assert_eq!(sel.order, vec![0, 1]);
        assert!((sel.total - 1.0).abs() < 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // The greedy rule prefers far-apart trajectories.
    //
    // Given
    // -----
    // - Distances: 0–1 close (1), 2 far from both (10 and 9), r = 2.
    //
    // Expect
    // ------
    // - The winning pair contains index 2 and index 0 (largest distance 10).
    fn greedy_prefers_distant_pairs() {
        let d = array![[0.0, 1.0, 10.0], [1.0, 0.0, 9.0], [10.0, 9.0, 0.0]];
        let sel = greedy_select(&d, 2).expect("selection");
        assert_eq!(sel.order, vec![0, 2]);
        assert!((sel.total - 10.0).abs() < 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Canonical Ishigami setup: k = 3, p = 6, N = 50, r = 5, bounds [−π, π]³.
    //
    // Given
    // -----
    // - Seeded RNG.
    //
    // Expect
    // ------
    // - 20 rows; every 4-row block changes {0, 1, 2} once each, then None;
    //   all values inside [−π, π].
    fn ishigami_layout_has_expected_shape() {
        // Arrange
        let pi = std::f64::consts::PI;
        let units = Units::factors(3).expect("units");
        let bounds = Bounds::uniform(3, -pi, pi).expect("bounds");
        let opts = SamplingOptions::new(6, 5, Some(50), Some(2024), true).expect("options");
        let mut rng = opts.rng();

        // Act
        let sample = optimized_trajectories(&units, &bounds, &opts, &mut rng).expect("sample");

        // Assert
        let set = &sample.trajectories;
        assert_eq!(set.matrix().dim(), (20, 3));
        assert_eq!(set.changed().len(), 20);
        for t in 0..5 {
            let block = set.changed_block(t);
            assert_eq!(block[3], None);
            let mut seen: Vec<usize> = block[..3].iter().map(|c| c.expect("step")).collect();
            seen.sort_unstable();
            assert_eq!(seen, vec![0, 1, 2]);
        }
        assert!(set.matrix().iter().all(|&x| x >= -pi - 1e-12 && x <= pi + 1e-12));
        assert!(sample.diagnostics.is_some());
    }

    #[test]
    // Purpose
    // -------
    // The same seed yields the same optimized sample.
    //
    // Given
    // -----
    // - Two runs with seed 5, k = 4, r = 3, N = 20.
    //
    // Expect
    // ------
    // - Identical trajectory matrices and selections.
    fn optimized_sampling_is_reproducible() {
        let units = Units::factors(4).expect("units");
        let bounds = Bounds::unit(4).expect("bounds");
        let opts = SamplingOptions::new(4, 3, Some(20), Some(5), false).expect("options");
        let a = optimized_trajectories(&units, &bounds, &opts, &mut StdRng::seed_from_u64(5))
            .expect("sample");
        let b = optimized_trajectories(&units, &bounds, &opts, &mut StdRng::seed_from_u64(5))
            .expect("sample");
        assert_eq!(a.trajectories, b.trajectories);
        assert_eq!(a.selection, b.selection);
    }
}
