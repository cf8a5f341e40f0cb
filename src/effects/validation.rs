//! effects::validation — shared shape checks for the estimators.
use crate::effects::{
    errors::{EffectsError, EffectsResult},
    output::{Objective, ObjectiveOutput},
};

/// Every objective must cover exactly `rows` rows; series must be non-empty.
pub fn validate_objectives(objectives: &[Objective], rows: usize) -> EffectsResult<()> {
    if objectives.is_empty() {
        return Err(EffectsError::NoObjectives);
    }
    for obj in objectives {
        if obj.output.n_rows() != rows {
            return Err(EffectsError::OutputRowMismatch {
                objective: obj.name.clone(),
                rows: obj.output.n_rows(),
                expected: rows,
            });
        }
        if matches!(&obj.output, ObjectiveOutput::Series(m) if m.ncols() == 0) {
            return Err(EffectsError::EmptySeries { objective: obj.name.clone() });
        }
    }
    Ok(())
}

/// Changed entries must align with rows, stay below `limit`, and never sit
/// on the last row.
pub fn validate_changed(changed: &[Option<usize>], rows: usize, limit: usize) -> EffectsResult<()> {
    if changed.len() != rows {
        return Err(EffectsError::ChangedLengthMismatch { rows, changed: changed.len() });
    }
    for (row, c) in changed.iter().enumerate() {
        if let Some(index) = *c {
            if index >= limit {
                return Err(EffectsError::ChangedIndexOutOfRange { row, index, limit });
            }
            if row + 1 == rows {
                return Err(EffectsError::DanglingStep { row });
            }
        }
    }
    Ok(())
}
