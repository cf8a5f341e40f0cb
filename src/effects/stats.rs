//! effects::stats — per-unit statistics and the per-parameter effect matrix.
//!
//! [`EffectStats`] summarizes the valid observations of one unit; units that
//! were never observed report zeros with `count == 0`. [`EffectMatrix`] is
//! the `n_params × n_objectives` view consumed by the threshold selector and
//! the results file.
use ndarray::{Array1, Array2, ArrayView1};

use crate::{
    effects::errors::{EffectsError, EffectsResult},
    sampling::units::Units,
};

/// mu*, mu and sigma of one unit's elementary effects.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EffectStats {
    pub abs_mu: f64,
    pub mu: f64,
    pub stdev: f64,
    pub count: usize,
}

impl EffectStats {
    /// Summarize `effects`. With `signed == false` only mu* is reported.
    ///
    /// `stdev` uses the `n − 1` denominator and is zero for fewer than two
    /// observations.
    pub fn from_effects(effects: &[f64], signed: bool) -> Self {
        let count = effects.len();
        if count == 0 {
            return Self::default();
        }
        let n = count as f64;
        let abs_mu = effects.iter().map(|e| e.abs()).sum::<f64>() / n;
        if !signed {
            return Self { abs_mu, mu: 0.0, stdev: 0.0, count };
        }
        let mu = effects.iter().sum::<f64>() / n;
        let stdev = if count > 1 {
            (effects.iter().map(|e| (e - mu).powi(2)).sum::<f64>() / (n - 1.0)).sqrt()
        } else {
            0.0
        };
        Self { abs_mu, mu, stdev, count }
    }
}

/// Morris statistics of one objective, indexed by unit.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectTable {
    pub objective: String,
    pub stats: Vec<EffectStats>,
    /// Valid elementary effects per unit, in trajectory order.
    pub effects: Vec<Vec<f64>>,
    pub grouped: bool,
}

impl EffectTable {
    pub fn n_units(&self) -> usize {
        self.stats.len()
    }

    pub fn abs_mu(&self) -> Array1<f64> {
        self.stats.iter().map(|s| s.abs_mu).collect()
    }

    pub fn mu(&self) -> Array1<f64> {
        self.stats.iter().map(|s| s.mu).collect()
    }

    pub fn stdev(&self) -> Array1<f64> {
        self.stats.iter().map(|s| s.stdev).collect()
    }
}

/// Effect magnitude and observation count for every parameter × objective.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectMatrix {
    objectives: Vec<String>,
    values: Array2<f64>,
    counts: Array2<usize>,
}

impl EffectMatrix {
    /// # Errors
    /// - [`EffectsError::ObjectiveNameMismatch`] when `objectives` does not
    ///   name every column, or `counts` has a different shape.
    pub fn new(
        objectives: Vec<String>, values: Array2<f64>, counts: Array2<usize>,
    ) -> EffectsResult<Self> {
        if objectives.len() != values.ncols() || counts.dim() != values.dim() {
            return Err(EffectsError::ObjectiveNameMismatch {
                names: objectives.len(),
                columns: values.ncols(),
            });
        }
        Ok(Self { objectives, values, counts })
    }

    /// Scatter mu* of unit-level Morris tables into global parameter rows.
    ///
    /// Factor `f` of `units` is parameter row `included[f]` and receives the
    /// statistics of its unit, so every member of a group carries the group's
    /// value. Rows outside `included` stay zero with count zero.
    ///
    /// # Errors
    /// - [`EffectsError::NoObjectives`] for an empty slice.
    /// - [`EffectsError::ChangedIndexOutOfRange`] when `included` does not
    ///   cover the factors or points past `n_params`.
    pub fn from_morris(
        tables: &[EffectTable], units: &Units, included: &[usize], n_params: usize,
    ) -> EffectsResult<Self> {
        if tables.is_empty() {
            return Err(EffectsError::NoObjectives);
        }
        if included.len() != units.n_factors() {
            return Err(EffectsError::ChangedIndexOutOfRange {
                row: 0,
                index: units.n_factors(),
                limit: included.len(),
            });
        }
        let mut values = Array2::zeros((n_params, tables.len()));
        let mut counts = Array2::zeros((n_params, tables.len()));
        for (factor, &row) in included.iter().enumerate() {
            if row >= n_params {
                return Err(EffectsError::ChangedIndexOutOfRange {
                    row: factor,
                    index: row,
                    limit: n_params,
                });
            }
            let unit = units.unit_of(factor);
            for (j, table) in tables.iter().enumerate() {
                let stat = table.stats.get(unit).copied().unwrap_or_default();
                values[[row, j]] = stat.abs_mu;
                counts[[row, j]] = stat.count;
            }
        }
        let objectives = tables.iter().map(|t| t.objective.clone()).collect();
        Ok(Self { objectives, values, counts })
    }

    pub fn objectives(&self) -> &[String] {
        &self.objectives
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    pub fn counts(&self) -> &Array2<usize> {
        &self.counts
    }

    pub fn n_params(&self) -> usize {
        self.values.nrows()
    }

    pub fn n_objectives(&self) -> usize {
        self.values.ncols()
    }

    pub fn column(&self, objective: usize) -> ArrayView1<'_, f64> {
        self.values.column(objective)
    }
}
