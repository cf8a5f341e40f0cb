//! models::traits — the model interface used by a screening iteration.
use ndarray::{Array1, Array2};

use crate::{
    effects::output::ObjectiveOutput,
    models::errors::{ModelError, ModelResult},
};

/// Vector-valued function of a full parameter vector.
///
/// `evaluate` receives one value per parameter of the table (excluded
/// parameters at their defaults) and returns one output per objective, in
/// the order of [`Model::objective_names`]. Scalar models use
/// `Output = f64`; models producing a series per objective (e.g. a
/// simulated hydrograph) use `Output = Vec<f64>`.
pub trait Model {
    type Output: RunOutput;

    fn objective_names(&self) -> Vec<String>;

    fn evaluate(&self, params: &[f64]) -> ModelResult<Vec<Self::Output>>;
}

impl<M: Model + ?Sized> Model for &M {
    type Output = M::Output;

    fn objective_names(&self) -> Vec<String> {
        (**self).objective_names()
    }

    fn evaluate(&self, params: &[f64]) -> ModelResult<Vec<Self::Output>> {
        (**self).evaluate(params)
    }
}

/// One objective's value for a single run, stackable across sample rows.
pub trait RunOutput: Sized {
    /// Stack the per-row values of `objective` into an estimator input.
    ///
    /// # Errors
    /// - [`ModelError::SeriesLengthMismatch`] when series rows differ in length.
    fn stack(objective: &str, rows: Vec<Self>) -> ModelResult<ObjectiveOutput>;
}

impl RunOutput for f64 {
    fn stack(_objective: &str, rows: Vec<Self>) -> ModelResult<ObjectiveOutput> {
        Ok(ObjectiveOutput::Scalar(Array1::from(rows)))
    }
}

impl RunOutput for Vec<f64> {
    fn stack(objective: &str, rows: Vec<Self>) -> ModelResult<ObjectiveOutput> {
        let len = rows.first().map_or(0, Vec::len);
        if let Some((row, r)) = rows.iter().enumerate().find(|(_, r)| r.len() != len) {
            return Err(ModelError::SeriesLengthMismatch {
                objective: objective.to_string(),
                row,
                expected: len,
                found: r.len(),
            });
        }
        let n = rows.len();
        let flat: Vec<f64> = rows.into_iter().flatten().collect();
        Array2::from_shape_vec((n, len), flat)
            .map(ObjectiveOutput::Series)
            .map_err(|e| ModelError::RunFailed { reason: e.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // Series outputs stack row-wise and reject ragged runs.
    //
    // Given
    // -----
    // - Two runs of length 3; then a run of length 2 after one of length 3.
    //
    // Expect
    // ------
    // - A 2 × 3 series; then `SeriesLengthMismatch { row: 1, .. }`.
    fn series_rows_stack_or_fail() {
        let out = <Vec<f64>>::stack("q", vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();
        assert_eq!(out, ObjectiveOutput::Series(array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]));

        let err = <Vec<f64>>::stack("q", vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0]]).unwrap_err();
        assert!(matches!(err, ModelError::SeriesLengthMismatch { row: 1, expected: 3, found: 2, .. }));
    }
}
