//! screening::cutoff — automatic cutoff from the knee of the sorted effects.
//!
//! Purpose
//! -------
//! Pick, per objective, the effect magnitude separating informative from
//! non-informative parameters.
//!
//! Key behaviors
//! -------------
//! - Sort the included effects ascending and normalize: `x = rank/(n − 1)`,
//!   `y = effect / max`.
//! - Fit `L·σ(k(x − x0)) + a` by least squares from the configured guess.
//! - Locate the knee, the maximum of the signed curvature on
//!   `[x_first, x_last]`, by minimizing its negative with Brent's method;
//!   the fitted value there, times `max`, is the cutoff.
//! - Fallback: if the fitted value at the knee exceeds `max_fitted_knee`,
//!   the smallest observed effect is the cutoff. The bounded search never
//!   returns a knee left of the first abscissa.
//!
//! Invariants & assumptions
//! ------------------------
//! - At least two effects, all finite, with a positive maximum.
use ndarray::Array1;
use tracing::{debug, info, warn};

use crate::{
    optimization::{
        least_squares::{FitOptions, FitOutcome},
        scalar::{ScalarOptions, minimize_bounded},
    },
    screening::{
        errors::{ScreeningError, ScreeningResult},
        fit::{CurveData, fit_logistic},
        logistic::Logistic,
    },
};

/// Initial `[L, k, x0, a]` for the logistic fit.
pub const DEFAULT_INITIAL_GUESS: [f64; 4] = [1.0, 10.0, 0.5, 0.0];
/// Largest normalized fitted value accepted at the knee.
pub const DEFAULT_MAX_FITTED_KNEE: f64 = 0.2;

/// Configuration of the automatic cutoff.
#[derive(Debug, Clone, PartialEq)]
pub struct CutoffOptions {
    pub initial_guess: [f64; 4],
    pub max_fitted_knee: f64,
    pub fit: FitOptions,
    pub scalar: ScalarOptions,
}

impl CutoffOptions {
    /// # Errors
    /// - [`ScreeningError::InvalidInitialGuess`] for non-finite guesses.
    /// - [`ScreeningError::InvalidKneeCeiling`] unless `0 < max_fitted_knee ≤ 1`.
    pub fn new(
        initial_guess: [f64; 4], max_fitted_knee: f64, fit: FitOptions, scalar: ScalarOptions,
    ) -> ScreeningResult<Self> {
        if initial_guess.iter().any(|v| !v.is_finite()) {
            return Err(ScreeningError::InvalidInitialGuess);
        }
        if !(max_fitted_knee.is_finite() && max_fitted_knee > 0.0 && max_fitted_knee <= 1.0) {
            return Err(ScreeningError::InvalidKneeCeiling { value: max_fitted_knee });
        }
        Ok(Self { initial_guess, max_fitted_knee, fit, scalar })
    }
}

impl Default for CutoffOptions {
    fn default() -> Self {
        Self {
            initial_guess: DEFAULT_INITIAL_GUESS,
            max_fitted_knee: DEFAULT_MAX_FITTED_KNEE,
            fit: FitOptions::default(),
            scalar: ScalarOptions::default(),
        }
    }
}

/// How cutoffs are obtained.
#[derive(Debug, Clone, PartialEq)]
pub enum CutoffMode {
    /// Fit the knee of each objective's sorted effects.
    Auto(CutoffOptions),
    /// One cutoff per objective, in objective order.
    Explicit(Vec<f64>),
}

impl Default for CutoffMode {
    fn default() -> Self {
        CutoffMode::Auto(CutoffOptions::default())
    }
}

/// Details of an automatic cutoff.
#[derive(Debug, Clone, PartialEq)]
pub struct KneeFit {
    pub curve: Logistic,
    /// Normalized abscissa of the knee.
    pub knee_x: f64,
    /// Normalized fitted value used as cutoff (or `min / max` on fallback).
    pub knee_y: f64,
    pub fallback: bool,
    pub fit: FitOutcome,
}

/// Cutoff for one objective.
#[derive(Debug, Clone, PartialEq)]
pub struct Cutoff {
    pub value: f64,
    /// `None` for explicit cutoffs.
    pub knee: Option<KneeFit>,
}

impl Cutoff {
    pub fn explicit(value: f64) -> Self {
        Self { value, knee: None }
    }
}

/// Sorted, normalized effect curve.
fn normalized_curve(objective: &str, effects: &[f64]) -> ScreeningResult<(CurveData, f64, f64)> {
    let n = effects.len();
    if n < 2 {
        return Err(ScreeningError::InsufficientParameters { included: n });
    }
    let mut sorted = effects.to_vec();
    sorted.sort_by(f64::total_cmp);
    let (min, max) = (sorted[0], sorted[n - 1]);
    if sorted.iter().any(|v| !v.is_finite()) || max <= 0.0 {
        return Err(ScreeningError::DegenerateEffects { objective: objective.to_string() });
    }
    let x = Array1::from_iter((0..n).map(|i| i as f64 / (n - 1) as f64));
    let y = Array1::from_iter(sorted.iter().map(|v| v / max));
    Ok((CurveData { x, y }, min, max))
}

/// Automatic cutoff for one objective from its included effects.
///
/// # Errors
/// - [`ScreeningError::InsufficientParameters`] for fewer than two effects.
/// - [`ScreeningError::DegenerateEffects`] for non-finite effects or a
///   non-positive maximum.
/// - [`ScreeningError::FitFailed`] when the fit or the curvature search fails.
pub fn auto_cutoff(objective: &str, effects: &[f64], opts: &CutoffOptions) -> ScreeningResult<Cutoff> {
    let (data, min, max) = normalized_curve(objective, effects)?;

    let (curve, fit) = fit_logistic(&data, opts.initial_guess, &opts.fit)
        .map_err(|e| ScreeningError::fit_failed(objective, e))?;
    if !fit.converged {
        warn!(objective, status = %fit.status, "logistic fit did not report convergence");
    }
    debug!(objective, params = ?curve.to_array(), sse = fit.value, "fitted logistic curve");

    let x_first = data.x[0];
    let x_last = data.x[data.x.len() - 1];
    let knee = minimize_bounded(|x| -curve.curvature(x), x_first, x_last, &opts.scalar)
        .map_err(|e| ScreeningError::fit_failed(objective, e))?;

    let fitted_at_knee = curve.value(knee.x);
    let fallback = fitted_at_knee > opts.max_fitted_knee;
    let (knee_y, value) = if fallback {
        (min / max, min)
    } else {
        (fitted_at_knee, fitted_at_knee * max)
    };

    info!(objective, knee_x = knee.x, knee_y, cutoff = value, fallback, "selected cutoff");
    Ok(Cutoff { value, knee: Some(KneeFit { curve, knee_x: knee.x, knee_y, fallback, fit }) })
}

#[cfg(test)]
mod tests {
    // Scope
    // -----
    // Knee detection on a clear two-population curve, fallback behavior, and
    // input guards.
    use super::*;

    #[test]
    // Purpose
    // -------
    // A clear split between small and large effects yields a cutoff between
    // the two populations.
    //
    // Given
    // -----
    // - Seven near-zero effects and three large ones, unsorted.
    //
    // Expect
    // ------
    // - Cutoff above every small effect and below every large one.
    // - The knee lies inside the normalized abscissa range; no fallback.
    fn clear_split_places_cutoff_between_populations() {
        let effects = [0.02, 5.0, 0.01, 0.03, 0.015, 9.0, 0.025, 0.005, 7.5, 0.02];
        let cut = auto_cutoff("q", &effects, &CutoffOptions::default()).unwrap();
        assert!(cut.value > 0.03 && cut.value < 5.0, "cutoff = {}", cut.value);
        let knee = cut.knee.unwrap();
        assert!((0.0..=1.0).contains(&knee.knee_x), "knee_x = {}", knee.knee_x);
        assert!(!knee.fallback);
    }

    #[test]
    // Purpose
    // -------
    // A knee ceiling below every fitted value forces the fallback to the
    // smallest observed effect.
    //
    // Given
    // -----
    // - Linearly increasing effects from 1 to 10 and a tiny knee ceiling.
    //
    // Expect
    // ------
    // - Cutoff = 1 and `fallback == true`.
    fn fallback_uses_smallest_effect() {
        let effects: Vec<f64> = (1..=10).map(f64::from).collect();
        let opts = CutoffOptions { max_fitted_knee: 1e-6, ..CutoffOptions::default() };
        let cut = auto_cutoff("q", &effects, &opts).unwrap();
        assert_eq!(cut.value, 1.0);
        let knee = cut.knee.unwrap();
        assert!(knee.fallback);
        assert!((knee.knee_y - 0.1).abs() < 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Degenerate inputs fail loudly.
    //
    // Given
    // -----
    // - A single effect; all-zero effects; an invalid knee ceiling.
    //
    // Expect
    // ------
    // - `InsufficientParameters`, `DegenerateEffects`, `InvalidKneeCeiling`.
    fn degenerate_inputs_are_rejected() {
        let opts = CutoffOptions::default();
        assert_eq!(
            auto_cutoff("q", &[1.0], &opts),
            Err(ScreeningError::InsufficientParameters { included: 1 })
        );
        assert!(matches!(
            auto_cutoff("q", &[0.0, 0.0, 0.0], &opts),
            Err(ScreeningError::DegenerateEffects { .. })
        ));
        assert!(matches!(
            CutoffOptions::new(DEFAULT_INITIAL_GUESS, 0.0, FitOptions::default(), ScalarOptions::default()),
            Err(ScreeningError::InvalidKneeCeiling { .. })
        ));
    }
}
