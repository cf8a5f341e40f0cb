//! models::evaluate — batch evaluation of a sample with bounded retries.
//!
//! Each row of the physical sample is evaluated independently. A failing row
//! is retried up to the policy's attempt budget; a row that keeps failing
//! aborts the batch with its index. Failed rows are never replaced by
//! substitute values.
use ndarray::Array2;
use tracing::{debug, warn};

use crate::{
    effects::output::{Objective, ObjectiveOutput},
    models::{
        errors::{ModelError, ModelResult},
        traits::{Model, RunOutput},
    },
};

/// Attempts allowed per parameter set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: usize,
}

impl RetryPolicy {
    /// # Errors
    /// - [`ModelError::InvalidRetryPolicy`] for zero attempts.
    pub fn new(max_attempts: usize) -> ModelResult<Self> {
        if max_attempts == 0 {
            return Err(ModelError::InvalidRetryPolicy { max_attempts });
        }
        Ok(Self { max_attempts })
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_attempts: 1 }
    }
}

fn evaluate_row<M: Model + ?Sized>(
    model: &M, row: usize, params: &[f64], n_objectives: usize, policy: RetryPolicy,
) -> ModelResult<Vec<M::Output>> {
    let mut last = String::new();
    for attempt in 1..=policy.max_attempts {
        match model.evaluate(params) {
            Ok(out) if out.len() == n_objectives => return Ok(out),
            Ok(out) => {
                return Err(ModelError::OutputDimMismatch { expected: n_objectives, found: out.len() });
            }
            Err(e) => {
                if attempt < policy.max_attempts {
                    warn!(row, attempt, error = %e, "model evaluation failed, retrying");
                }
                last = e.to_string();
            }
        }
    }
    Err(ModelError::EvaluationFailed { row, attempts: policy.max_attempts, reason: last })
}

/// Evaluate every row of `sample` and collect one objective per model
/// output: scalar models give [`ObjectiveOutput::Scalar`], series models
/// [`ObjectiveOutput::Series`].
///
/// # Errors
/// - [`ModelError::EvaluationFailed`] for the first row that keeps failing.
/// - [`ModelError::OutputDimMismatch`] when a run returns the wrong number of
///   objectives.
/// - [`ModelError::SeriesLengthMismatch`] for ragged series outputs.
pub fn evaluate_sample<M: Model + ?Sized>(
    model: &M, sample: &Array2<f64>, policy: RetryPolicy,
) -> ModelResult<Vec<Objective>> {
    let names = model.objective_names();
    let mut columns: Vec<Vec<M::Output>> =
        names.iter().map(|_| Vec::with_capacity(sample.nrows())).collect();
    for (row, params) in sample.rows().into_iter().enumerate() {
        let params = params.to_vec();
        let out = evaluate_row(model, row, &params, names.len(), policy)?;
        for (column, value) in columns.iter_mut().zip(out) {
            column.push(value);
        }
    }
    debug!(rows = sample.nrows(), objectives = names.len(), "evaluated sample");
    names
        .into_iter()
        .zip(columns)
        .map(|(name, rows)| {
            let output = M::Output::stack(&name, rows)?;
            Ok(Objective::new(name, output))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    // Scope
    // -----
    // Retry budget, failure propagation with row index, output alignment.
    use super::*;
    use ndarray::array;
    use std::cell::Cell;

    /// Fails the first `failures` calls, then returns the parameter sum.
    struct Flaky {
        failures: Cell<usize>,
    }

    impl Model for Flaky {
        type Output = f64;

        fn objective_names(&self) -> Vec<String> {
            vec!["sum".to_string()]
        }

        fn evaluate(&self, params: &[f64]) -> ModelResult<Vec<f64>> {
            if self.failures.get() > 0 {
                self.failures.set(self.failures.get() - 1);
                return Err(ModelError::RunFailed { reason: "no output file".to_string() });
            }
            Ok(vec![params.iter().sum()])
        }
    }

    #[test]
    // Purpose
    // -------
    // Transient failures are absorbed by the retry budget.
    //
    // Given
    // -----
    // - Two failures and a budget of three attempts.
    //
    // Expect
    // ------
    // - Row sums in the single objective.
    fn retries_absorb_transient_failures() {
        let model = Flaky { failures: Cell::new(2) };
        let sample = array![[1.0, 2.0], [3.0, 4.0]];
        let out = evaluate_sample(&model, &sample, RetryPolicy::new(3).unwrap()).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].output, ObjectiveOutput::Scalar(array![3.0, 7.0]));
    }

    #[test]
    // Purpose
    // -------
    // Persistent failures surface with the failing row and attempt count.
    //
    // Given
    // -----
    // - Five failures and the default single attempt.
    //
    // Expect
    // ------
    // - `EvaluationFailed { row: 0, attempts: 1, .. }`.
    fn persistent_failures_propagate() {
        let model = Flaky { failures: Cell::new(5) };
        let err = evaluate_sample(&model, &array![[1.0]], RetryPolicy::default()).unwrap_err();
        assert!(matches!(err, ModelError::EvaluationFailed { row: 0, attempts: 1, .. }));
        assert!(RetryPolicy::new(0).is_err());
    }

    /// Two-step series `[Σp, 2·Σp]` per run.
    struct Doubling;

    impl Model for Doubling {
        type Output = Vec<f64>;

        fn objective_names(&self) -> Vec<String> {
            vec!["flow".to_string()]
        }

        fn evaluate(&self, params: &[f64]) -> ModelResult<Vec<Vec<f64>>> {
            let sum: f64 = params.iter().sum();
            Ok(vec![vec![sum, 2.0 * sum]])
        }
    }

    #[test]
    // Purpose
    // -------
    // Series models produce one series row per sample row.
    //
    // Given
    // -----
    // - Two parameter sets and a model returning a length-2 series.
    //
    // Expect
    // ------
    // - `ObjectiveOutput::Series` of shape 2 × 2.
    fn series_models_yield_series_objectives() {
        let sample = array![[1.0, 2.0], [3.0, 4.0]];
        let out = evaluate_sample(&Doubling, &sample, RetryPolicy::default()).unwrap();
        assert_eq!(out[0].name, "flow");
        assert_eq!(out[0].output, ObjectiveOutput::Series(array![[3.0, 6.0], [7.0, 14.0]]));
    }
}
