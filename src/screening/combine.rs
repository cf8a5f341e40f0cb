//! screening::combine — multi-objective partition into informative and
//! non-informative parameters.
//!
//! Purpose
//! -------
//! Apply per-objective cutoffs to the included parameters and build the
//! parameter table for the next screening iteration.
//!
//! Key behaviors
//! -------------
//! - `Rectangle`: a parameter is carried to the next iteration only if its
//!   effect is below the cutoff on every objective; exceeding any single
//!   cutoff makes it informative.
//! - `Triangle`: a parameter is carried over if
//!   `Σ_objectives effect_j / cutoff_j < 1`.
//! - Carried-over parameters are the included set of the returned table;
//!   everything else is excluded.
//!
//! Invariants & assumptions
//! ------------------------
//! - The effect matrix has one row per parameter of the table, in order.
//! - Excluded parameters never enter the next iteration.
use std::{fmt, str::FromStr};

use tracing::info;

use crate::{
    effects::stats::EffectMatrix,
    parameters::spec::ParameterSet,
    screening::{
        cutoff::{Cutoff, CutoffMode, auto_cutoff},
        errors::{ScreeningError, ScreeningResult},
    },
};

/// Rule combining per-objective cutoffs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CombinationRule {
    Rectangle,
    #[default]
    Triangle,
}

impl FromStr for CombinationRule {
    type Err = ScreeningError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rectangle" => Ok(CombinationRule::Rectangle),
            "triangle" => Ok(CombinationRule::Triangle),
            _ => Err(ScreeningError::UnknownCombinationRule { name: s.to_string() }),
        }
    }
}

impl fmt::Display for CombinationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CombinationRule::Rectangle => write!(f, "rectangle"),
            CombinationRule::Triangle => write!(f, "triangle"),
        }
    }
}

/// One cutoff per objective together with the combination rule.
#[derive(Debug, Clone, PartialEq)]
pub struct CutoffSet {
    pub objectives: Vec<String>,
    pub cutoffs: Vec<Cutoff>,
    pub rule: CombinationRule,
}

impl CutoffSet {
    pub fn values(&self) -> Vec<f64> {
        self.cutoffs.iter().map(|c| c.value).collect()
    }
}

/// Result of one screening decision.
#[derive(Debug, Clone, PartialEq)]
pub struct ScreeningOutcome {
    pub cutoffs: CutoffSet,
    /// Included parameters judged informative (global indices, ascending).
    pub informative: Vec<usize>,
    /// Included parameters carried to the next iteration (global indices,
    /// ascending).
    pub next_iteration: Vec<usize>,
    /// Parameter table with inclusion flags set to `next_iteration`.
    pub updated: ParameterSet,
}

/// Whether included parameter row `row` is carried to the next iteration.
fn carried_over(effects: &EffectMatrix, row: usize, cutoffs: &[f64], rule: CombinationRule) -> bool {
    let values = effects.values().row(row);
    match rule {
        CombinationRule::Rectangle => values.iter().zip(cutoffs).all(|(e, c)| e < c),
        CombinationRule::Triangle => values.iter().zip(cutoffs).map(|(e, c)| e / c).sum::<f64>() < 1.0,
    }
}

fn resolve_cutoffs(
    params: &ParameterSet, effects: &EffectMatrix, mode: &CutoffMode, rule: CombinationRule,
) -> ScreeningResult<Vec<Cutoff>> {
    let included = params.included_indices();
    let cutoffs = match mode {
        CutoffMode::Explicit(values) => {
            if values.len() != effects.n_objectives() {
                return Err(ScreeningError::CutoffCountMismatch {
                    expected: effects.n_objectives(),
                    found: values.len(),
                });
            }
            values.iter().map(|&v| Cutoff::explicit(v)).collect::<Vec<_>>()
        }
        CutoffMode::Auto(opts) => (0..effects.n_objectives())
            .map(|j| {
                let column = effects.column(j);
                let subset: Vec<f64> = included.iter().map(|&g| column[g]).collect();
                auto_cutoff(&effects.objectives()[j], &subset, opts)
            })
            .collect::<ScreeningResult<Vec<_>>>()?,
    };

    for (name, cut) in effects.objectives().iter().zip(&cutoffs) {
        let valid = cut.value.is_finite() && (rule == CombinationRule::Rectangle || cut.value > 0.0);
        if !valid {
            return Err(ScreeningError::InvalidCutoff { objective: name.clone(), value: cut.value });
        }
    }
    Ok(cutoffs)
}

/// Derive cutoffs and the next-iteration parameter table.
///
/// # Errors
/// - [`ScreeningError::ParamCountMismatch`] when the effect matrix does not
///   cover the table.
/// - [`ScreeningError::CutoffCountMismatch`] / [`ScreeningError::InvalidCutoff`]
///   for bad explicit cutoffs.
/// - Errors from [`auto_cutoff`] in automatic mode.
pub fn screen(
    params: &ParameterSet, effects: &EffectMatrix, mode: &CutoffMode, rule: CombinationRule,
) -> ScreeningResult<ScreeningOutcome> {
    if effects.n_params() != params.len() {
        return Err(ScreeningError::ParamCountMismatch {
            params: params.len(),
            rows: effects.n_params(),
        });
    }
    let cutoffs = resolve_cutoffs(params, effects, mode, rule)?;
    let values: Vec<f64> = cutoffs.iter().map(|c| c.value).collect();

    let (next_iteration, informative): (Vec<usize>, Vec<usize>) = params
        .included_indices()
        .into_iter()
        .partition(|&g| carried_over(effects, g, &values, rule));

    let mut mask = vec![false; params.len()];
    for &g in &next_iteration {
        mask[g] = true;
    }
    let updated = params.with_mask(&mask).map_err(|_| ScreeningError::ParamCountMismatch {
        params: params.len(),
        rows: mask.len(),
    })?;

    info!(
        %rule,
        cutoffs = ?values,
        informative = informative.len(),
        next_iteration = next_iteration.len(),
        "screened parameters"
    );

    Ok(ScreeningOutcome {
        cutoffs: CutoffSet { objectives: effects.objectives().to_vec(), cutoffs, rule },
        informative,
        next_iteration,
        updated,
    })
}

#[cfg(test)]
mod tests {
    // Scope
    // -----
    // Rule parsing, rectangle/triangle partitions with explicit cutoffs, and
    // the treatment of excluded parameters.
    use super::*;
    use crate::parameters::spec::{Distribution, ParameterSpec};
    use ndarray::{Array2, array};

    fn table(mask: &[bool]) -> ParameterSet {
        mask.iter()
            .enumerate()
            .map(|(i, &inc)| {
                ParameterSpec::new(format!("p{i}"), Distribution::Uniform, 0.0, 1.0, 0.5, inc)
                    .unwrap()
            })
            .collect()
    }

    fn matrix(values: Array2<f64>) -> EffectMatrix {
        let names = (0..values.ncols()).map(|j| format!("obj{j}")).collect();
        let counts = values.mapv(|_| 1usize);
        EffectMatrix::new(names, values, counts).unwrap()
    }

    #[test]
    // Purpose
    // -------
    // Rule names parse case-insensitively; triangle is the default rule.
    //
    // Given
    // -----
    // - "Rectangle", "TRIANGLE", "circle".
    //
    // Expect
    // ------
    // - Two rules, then `UnknownCombinationRule`; `default()` is `Triangle`.
    fn rule_parsing() {
        assert_eq!("Rectangle".parse::<CombinationRule>(), Ok(CombinationRule::Rectangle));
        assert_eq!("TRIANGLE".parse::<CombinationRule>(), Ok(CombinationRule::Triangle));
        assert!("circle".parse::<CombinationRule>().is_err());
        assert_eq!(CombinationRule::default(), CombinationRule::Triangle);
    }

    #[test]
    // Purpose
    // -------
    // Rectangle carries over only parameters below every cutoff.
    //
    // Given
    // -----
    // - Effects (2 objectives) for 4 parameters, cutoffs [1, 1].
    //
    // Expect
    // ------
    // - Only p0 (0.5, 0.5) is carried over; p1..p3 exceed at least one cutoff.
    fn rectangle_requires_all_objectives_below_cutoff() {
        let params = table(&[true, true, true, true]);
        let effects = matrix(array![[0.5, 0.5], [2.0, 0.1], [0.1, 2.0], [3.0, 3.0]]);

        let out = screen(&params, &effects, &CutoffMode::Explicit(vec![1.0, 1.0]), CombinationRule::Rectangle)
            .unwrap();

        assert_eq!(out.next_iteration, vec![0]);
        assert_eq!(out.informative, vec![1, 2, 3]);
        assert_eq!(out.updated.mask(), vec![true, false, false, false]);
        assert_eq!(out.cutoffs.values(), vec![1.0, 1.0]);
    }

    #[test]
    // Purpose
    // -------
    // Triangle combines normalized effects across objectives.
    //
    // Given
    // -----
    // - Same effects, cutoffs [1, 1].
    //
    // Expect
    // ------
    // - p0 and p3 sum below 1 and are carried over; p1 sums to exactly 1 and
    //   is informative like p2.
    fn triangle_uses_weighted_sum() {
        let params = table(&[true, true, true, true]);
        let effects = matrix(array![[0.4, 0.5], [0.5, 0.5], [0.1, 2.0], [0.0, 0.9]]);

        let out = screen(&params, &effects, &CutoffMode::Explicit(vec![1.0, 1.0]), CombinationRule::Triangle)
            .unwrap();

        assert_eq!(out.next_iteration, vec![0, 3]);
        assert_eq!(out.informative, vec![1, 2]);
    }

    #[test]
    // Purpose
    // -------
    // Excluded parameters never re-enter, whatever their effect.
    //
    // Given
    // -----
    // - p1 excluded with zero effect.
    //
    // Expect
    // ------
    // - p1 is neither informative nor carried over.
    fn excluded_parameters_stay_excluded() {
        let params = table(&[true, false, true]);
        let effects = matrix(array![[0.1], [0.0], [5.0]]);
        let out =
            screen(&params, &effects, &CutoffMode::Explicit(vec![1.0]), CombinationRule::Rectangle).unwrap();
        assert_eq!(out.next_iteration, vec![0]);
        assert_eq!(out.informative, vec![2]);
        assert!(!out.updated.mask()[1]);
    }

    #[test]
    // Purpose
    // -------
    // Larger cutoffs never enlarge the informative set (rectangle) and never
    // shrink the carried-over set (triangle).
    //
    // Given
    // -----
    // - Fixed effects and increasing cutoffs.
    //
    // Expect
    // ------
    // - Monotone set sizes.
    fn cutoff_monotonicity() {
        let params = table(&[true; 6]);
        let effects =
            matrix(array![[0.1, 0.3], [0.5, 0.2], [1.0, 1.5], [2.0, 0.1], [4.0, 3.0], [0.0, 0.05]]);
        let mut last_informative = usize::MAX;
        let mut last_carried = 0;
        for c in [0.05, 0.2, 0.6, 1.2, 2.5, 5.0] {
            let rect = screen(&params, &effects, &CutoffMode::Explicit(vec![c, c]), CombinationRule::Rectangle)
                .unwrap();
            assert!(rect.informative.len() <= last_informative);
            last_informative = rect.informative.len();

            let tri = screen(&params, &effects, &CutoffMode::Explicit(vec![c, c]), CombinationRule::Triangle)
                .unwrap();
            assert!(tri.next_iteration.len() >= last_carried);
            last_carried = tri.next_iteration.len();
        }
    }

    #[test]
    // Purpose
    // -------
    // Cutoff count and triangle positivity are enforced.
    //
    // Given
    // -----
    // - One cutoff for two objectives; a zero triangle cutoff.
    //
    // Expect
    // ------
    // - `CutoffCountMismatch`, then `InvalidCutoff`.
    fn explicit_cutoffs_are_validated() {
        let params = table(&[true, true]);
        let effects = matrix(array![[0.1, 0.2], [0.3, 0.4]]);
        assert!(matches!(
            screen(&params, &effects, &CutoffMode::Explicit(vec![1.0]), CombinationRule::Rectangle),
            Err(ScreeningError::CutoffCountMismatch { expected: 2, found: 1 })
        ));
        assert!(matches!(
            screen(&params, &effects, &CutoffMode::Explicit(vec![0.0, 1.0]), CombinationRule::Triangle),
            Err(ScreeningError::InvalidCutoff { .. })
        ));
    }
}
