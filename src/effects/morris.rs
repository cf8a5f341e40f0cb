//! effects::morris — Morris elementary effects (mu*, mu, sigma) per unit.
//!
//! Purpose
//! -------
//! Estimate per-unit sensitivity statistics from an optimized trajectory set
//! and model outputs evaluated at every trajectory point.
//!
//! Key behaviors
//! -------------
//! - For step `j` moving unit `u`, the effect is `Δy / Δ` oriented by the
//!   direction of the step: `(y[j+1] − y[j]) / Δ` when the coordinate of `u`
//!   increased, `(y[j] − y[j+1]) / Δ` otherwise.
//! - Grouped units and series outputs carry no orientation; their effect is
//!   the magnitude `|Δy| / Δ` (elementwise mean of magnitudes for series).
//! - Non-finite effects (e.g. a failed point reported as NaN) are not
//!   counted. Statistics use only valid observations.
//!
//! Invariants & assumptions
//! ------------------------
//! - `set` is the sample the model was evaluated on, restricted to the
//!   trajectory dimensions. `Δ` is the grid step, so a set that was affinely
//!   rescaled still yields effects per grid step.
//! - Changed entries are unit indices of `units`.
use tracing::debug;

use crate::{
    effects::{
        errors::{EffectsError, EffectsResult},
        output::{Objective, ObjectiveOutput},
        stats::{EffectStats, EffectTable},
        validation::{validate_changed, validate_objectives},
    },
    sampling::{grid::Grid, trajectory::TrajectorySet, units::Units},
};

/// Morris statistics for every objective.
///
/// # Errors
/// - [`EffectsError::RaggedSample`] when the set's block length does not
///   match `units`.
/// - Shape errors from [`validate_objectives`] and [`validate_changed`].
pub fn morris_effects(
    set: &TrajectorySet, units: &Units, grid: &Grid, objectives: &[Objective],
) -> EffectsResult<Vec<EffectTable>> {
    let rows = set.matrix().nrows();
    if set.block_len() != units.block_len() {
        return Err(EffectsError::RaggedSample { rows, block_len: units.block_len() });
    }
    validate_objectives(objectives, rows)?;
    validate_changed(set.changed(), rows, units.n_units())?;

    let delta = grid.delta();
    let grouped = units.is_grouped();
    let n_units = units.n_units();

    let tables = objectives
        .iter()
        .map(|obj| {
            let mut effects: Vec<Vec<f64>> = vec![Vec::new(); n_units];
            let mut skipped = 0usize;
            for (row, changed) in set.changed().iter().enumerate() {
                let Some(unit) = *changed else { continue };
                let dy = obj.output.difference(row, row + 1);
                let effect = if grouped || matches!(obj.output, ObjectiveOutput::Series(_)) {
                    dy.abs() / delta
                } else {
                    let m = set.matrix();
                    let dx = m[[row + 1, unit]] - m[[row, unit]];
                    if dx > 0.0 { dy / delta } else { -dy / delta }
                };
                if effect.is_finite() {
                    effects[unit].push(effect);
                } else {
                    skipped += 1;
                }
            }
            if skipped > 0 {
                debug!(objective = %obj.name, skipped, "ignored non-finite elementary effects");
            }
            let stats = effects.iter().map(|e| EffectStats::from_effects(e, !grouped)).collect();
            EffectTable { objective: obj.name.clone(), stats, effects, grouped }
        })
        .collect();

    Ok(tables)
}

#[cfg(test)]
mod tests {
    // Scope
    // -----
    // Orientation of effects, group magnitudes, NaN handling and unit
    // indexing.
    use super::*;
    use crate::{effects::output::Objective, sampling::units::GroupMatrix};
    use ndarray::{Array2, array};

    fn linear(points: &Array2<f64>, w: &[f64]) -> Vec<f64> {
        points.rows().into_iter().map(|r| r.iter().zip(w).map(|(x, c)| x * c).sum()).collect()
    }

    #[test]
    // Purpose
    // -------
    // A linear model recovers its coefficients regardless of step direction.
    //
    // Given
    // -----
    // - p = 4 (Δ = 2/3), y = x0 + 3·x1, one ascending and one descending
    //   trajectory.
    //
    // Expect
    // ------
    // - mu = mu* = [1, 3], sigma = 0, count = 2.
    fn linear_model_recovers_coefficients() {
        let d = 2.0 / 3.0;
        let matrix = array![[0.0, 0.0], [d, 0.0], [d, d], [d, d], [d, 0.0], [0.0, 0.0]];
        let set = TrajectorySet::from_parts(
            matrix.clone(),
            vec![Some(0), Some(1), None, Some(1), Some(0), None],
            3,
        )
        .unwrap();
        let obj = Objective::scalar("y", linear(&matrix, &[1.0, 3.0]));

        let tables =
            morris_effects(&set, &Units::factors(2).unwrap(), &Grid::new(4).unwrap(), &[obj])
                .unwrap();

        let t = &tables[0];
        for (unit, expected) in [(0, 1.0), (1, 3.0)] {
            let s = t.stats[unit];
            assert!((s.mu - expected).abs() < 1e-12, "unit {unit}: mu = {}", s.mu);
            assert!((s.abs_mu - expected).abs() < 1e-12);
            assert!(s.stdev.abs() < 1e-12);
            assert_eq!(s.count, 2);
        }
    }

    #[test]
    // Purpose
    // -------
    // Negative slopes keep their sign in mu but not in mu*.
    //
    // Given
    // -----
    // - y = −2·x0 on a single descending step.
    //
    // Expect
    // ------
    // - mu = −2, mu* = 2.
    fn sign_follows_model_slope() {
        let d = 2.0 / 3.0;
        let matrix = array![[d], [0.0]];
        let set = TrajectorySet::from_parts(matrix.clone(), vec![Some(0), None], 2).unwrap();
        let obj = Objective::scalar("y", linear(&matrix, &[-2.0]));
        let t = &morris_effects(&set, &Units::factors(1).unwrap(), &Grid::new(4).unwrap(), &[obj])
            .unwrap()[0];
        assert!((t.stats[0].mu + 2.0).abs() < 1e-12);
        assert!((t.stats[0].abs_mu - 2.0).abs() < 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Grouped units report only mu*.
    //
    // Given
    // -----
    // - Two factors in one group, y = x0 + x1, one step of Δ on both.
    //
    // Expect
    // ------
    // - mu* = 2, mu = sigma = 0, table marked grouped.
    fn groups_report_absolute_mean_only() {
        let d = 2.0 / 3.0;
        let matrix = array![[0.0, 0.0], [d, d]];
        let set = TrajectorySet::from_parts(matrix.clone(), vec![Some(0), None], 2).unwrap();
        let units = Units::Groups(GroupMatrix::from_assignment(vec![0, 0], 1).unwrap());
        let obj = Objective::scalar("y", linear(&matrix, &[1.0, 1.0]));
        let t = &morris_effects(&set, &units, &Grid::new(4).unwrap(), &[obj]).unwrap()[0];
        assert!(t.grouped);
        assert!((t.stats[0].abs_mu - 2.0).abs() < 1e-12);
        assert_eq!((t.stats[0].mu, t.stats[0].stdev), (0.0, 0.0));
    }

    #[test]
    // Purpose
    // -------
    // NaN outputs reduce the valid count instead of poisoning statistics.
    //
    // Given
    // -----
    // - Two trajectories of one factor; the second ends in NaN.
    //
    // Expect
    // ------
    // - count = 1 and finite statistics.
    fn nan_outputs_are_not_counted() {
        let d = 2.0 / 3.0;
        let matrix = array![[0.0], [d], [0.0], [d]];
        let set = TrajectorySet::from_parts(matrix, vec![Some(0), None, Some(0), None], 2).unwrap();
        let obj = Objective::scalar("y", vec![0.0, 1.0, 0.0, f64::NAN]);
        let t = &morris_effects(&set, &Units::factors(1).unwrap(), &Grid::new(4).unwrap(), &[obj])
            .unwrap()[0];
        assert_eq!(t.stats[0].count, 1);
        assert!((t.stats[0].mu - 1.5).abs() < 1e-12);
        assert_eq!(t.effects[0].len(), 1);
    }
}
