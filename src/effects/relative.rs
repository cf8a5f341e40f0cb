//! effects::relative — mean absolute relative sensitivity per parameter.
//!
//! For every step that moves parameter `p` between rows `j` and `j+1` of a
//! physical sample, accumulate `|y[j+1] − y[j]| / |x[j+1, p] − x[j, p]|`
//! (elementwise mean for series outputs) and divide by the number of such
//! steps. This works on outputs of arbitrary external simulators and on
//! full-width samples indexed by global parameter. Parameters never moved
//! report zero with count zero.
use ndarray::Array2;
use tracing::debug;

use crate::effects::{
    errors::{EffectsError, EffectsResult},
    output::Objective,
    stats::EffectMatrix,
    validation::{validate_changed, validate_objectives},
};

/// Mean |Δy|/|Δx| for every parameter column of `sample` and every objective.
///
/// # Errors
/// - [`EffectsError::ZeroParameterStep`] when a flagged step leaves its
///   parameter unchanged.
/// - Shape errors from [`validate_objectives`] and [`validate_changed`].
pub fn relative_effects(
    sample: &Array2<f64>, changed: &[Option<usize>], objectives: &[Objective],
) -> EffectsResult<EffectMatrix> {
    let (rows, n_params) = sample.dim();
    validate_objectives(objectives, rows)?;
    validate_changed(changed, rows, n_params)?;

    let mut values = Array2::<f64>::zeros((n_params, objectives.len()));
    let mut counts = Array2::<usize>::zeros((n_params, objectives.len()));

    for (j, obj) in objectives.iter().enumerate() {
        let mut skipped = 0usize;
        for (row, c) in changed.iter().enumerate() {
            let Some(param) = *c else { continue };
            let dx = (sample[[row + 1, param]] - sample[[row, param]]).abs();
            if dx == 0.0 {
                return Err(EffectsError::ZeroParameterStep { row, param });
            }
            let ratio = obj.output.difference(row, row + 1).abs() / dx;
            if ratio.is_finite() {
                values[[param, j]] += ratio;
                counts[[param, j]] += 1;
            } else {
                skipped += 1;
            }
        }
        if skipped > 0 {
            debug!(objective = %obj.name, skipped, "ignored non-finite relative effects");
        }
    }

    values.zip_mut_with(&counts, |v, &n| {
        if n > 0 {
            *v /= n as f64;
        }
    });

    let names = objectives.iter().map(|o| o.name.clone()).collect();
    EffectMatrix::new(names, values, counts)
}
