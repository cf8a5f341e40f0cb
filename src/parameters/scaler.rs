//! parameters::scaler — map unit-space trajectories to physical parameters.
//!
//! Purpose
//! -------
//! Turn an optimized [`TrajectorySet`] over the *included* parameters into
//! two full-width matrices over *all* parameters: the unit-space coordinates
//! (for reporting) and the physical values (for driving model runs).
//!
//! Key behaviors
//! -------------
//! - Uniform: `lower + raw·(upper − lower)`.
//! - Gaussian: clamp `raw` to `lo + (hi − lo)·raw` and apply the normal
//!   quantile with mean `lower` and standard deviation `upper`.
//! - Excluded parameters hold their default in both matrices.
//! - Factor-level changed indices are translated to global parameter
//!   indices; group-level indices are passed through unchanged.
//!
//! Invariants & assumptions
//! ------------------------
//! - Unit-space input lies in `[0, 1]`; the clamp keeps Gaussian quantiles
//!   finite.
//! - Column `j` of the trajectory set corresponds to the `j`-th included
//!   parameter in ascending global order.
use ndarray::{Array2, Axis};
use statrs::distribution::{ContinuousCDF, Normal};
use tracing::debug;

use crate::{
    parameters::{
        errors::{ParamError, ParamResult},
        spec::{Distribution, ParameterSet, ParameterSpec},
    },
    sampling::{trajectory::TrajectorySet, units::Units},
};

/// Default clamp applied to Gaussian raw values before the quantile.
pub const DEFAULT_GAUSSIAN_CLAMP: (f64, f64) = (0.01, 0.99);

/// Scaler configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScalerOptions {
    pub gaussian_clamp: (f64, f64),
}

impl ScalerOptions {
    /// # Errors
    /// - [`ParamError::InvalidClamp`] unless `0 < lo < hi < 1`.
    pub fn new(lo: f64, hi: f64) -> ParamResult<Self> {
        if !(lo.is_finite() && hi.is_finite() && 0.0 < lo && lo < hi && hi < 1.0) {
            return Err(ParamError::InvalidClamp { lo, hi });
        }
        Ok(Self { gaussian_clamp: (lo, hi) })
    }

    fn clamp(&self, raw: f64) -> f64 {
        let (lo, hi) = self.gaussian_clamp;
        lo + (hi - lo) * raw
    }
}

impl Default for ScalerOptions {
    fn default() -> Self {
        Self { gaussian_clamp: DEFAULT_GAUSSIAN_CLAMP }
    }
}

/// Per-parameter transform, built once per scaling call.
enum Transform {
    Uniform { lower: f64, width: f64 },
    Gaussian(Normal),
}

impl Transform {
    fn for_spec(spec: &ParameterSpec) -> ParamResult<Self> {
        match spec.distribution {
            Distribution::Uniform => {
                Ok(Transform::Uniform { lower: spec.lower, width: spec.upper - spec.lower })
            }
            Distribution::Gaussian => Normal::new(spec.lower, spec.upper)
                .map(Transform::Gaussian)
                .map_err(|e| ParamError::DistributionError {
                    name: spec.name.clone(),
                    text: e.to_string(),
                }),
        }
    }

    fn apply(&self, raw: f64, opts: &ScalerOptions) -> f64 {
        match self {
            Transform::Uniform { lower, width } => raw * width + lower,
            Transform::Gaussian(normal) => normal.inverse_cdf(opts.clamp(raw)),
        }
    }
}

/// Map one unit-space value of `spec` to its physical value.
///
/// # Errors
/// - [`ParamError::DistributionError`] if the Gaussian cannot be built.
pub fn scale_value(spec: &ParameterSpec, raw: f64, opts: &ScalerOptions) -> ParamResult<f64> {
    Ok(Transform::for_spec(spec)?.apply(raw, opts))
}

/// Full-width sample ready for model evaluation and for the trajectory files.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaledSample {
    /// Unit-space coordinates, defaults in excluded columns.
    pub unscaled: Array2<f64>,
    /// Physical values, defaults in excluded columns.
    pub scaled: Array2<f64>,
    /// Global parameter index (or group index when `grouped`) moved after
    /// each row; `None` ends a trajectory.
    pub changed: Vec<Option<usize>>,
    pub block_len: usize,
    pub grouped: bool,
}

impl ScaledSample {
    pub fn n_rows(&self) -> usize {
        self.scaled.nrows()
    }

    pub fn n_trajectories(&self) -> usize {
        self.n_rows() / self.block_len
    }
}

/// Scale an included-parameter trajectory set into a full-width sample.
///
/// # Errors
/// - [`ParamError::NoIncludedParameters`] when nothing is included.
/// - [`ParamError::IncludedCountMismatch`] when the set width differs from
///   the number of included parameters.
/// - [`ParamError::ChangedIndexOutOfRange`] for a changed factor outside the
///   included subset.
/// - [`ParamError::DistributionError`] from Gaussian construction.
pub fn scale_trajectories(
    params: &ParameterSet, set: &TrajectorySet, units: &Units, opts: &ScalerOptions,
) -> ParamResult<ScaledSample> {
    let included = params.included_indices();
    if included.is_empty() {
        return Err(ParamError::NoIncludedParameters);
    }
    if set.n_factors() != included.len() {
        return Err(ParamError::IncludedCountMismatch {
            expected: included.len(),
            found: set.n_factors(),
        });
    }

    let transforms = included
        .iter()
        .map(|&g| Transform::for_spec(&params.specs()[g]))
        .collect::<ParamResult<Vec<_>>>()?;

    let rows = set.matrix().nrows();
    let defaults = ndarray::Array1::from(params.defaults());
    let mut unscaled = Array2::zeros((rows, params.len()));
    let mut scaled = Array2::zeros((rows, params.len()));
    for mut row in unscaled.axis_iter_mut(Axis(0)) {
        row.assign(&defaults);
    }
    for mut row in scaled.axis_iter_mut(Axis(0)) {
        row.assign(&defaults);
    }

    for (col, (&global, transform)) in included.iter().zip(&transforms).enumerate() {
        let raw = set.matrix().column(col);
        unscaled.column_mut(global).assign(&raw);
        scaled.column_mut(global).assign(&raw.mapv(|v| transform.apply(v, opts)));
    }

    let grouped = units.is_grouped();
    let changed = if grouped {
        set.changed().to_vec()
    } else {
        set.changed()
            .iter()
            .map(|c| match c {
                Some(u) => included
                    .get(*u)
                    .copied()
                    .map(Some)
                    .ok_or(ParamError::ChangedIndexOutOfRange { index: *u, included: included.len() }),
                None => Ok(None),
            })
            .collect::<ParamResult<Vec<_>>>()?
    };

    debug!(
        rows,
        n_params = params.len(),
        n_included = included.len(),
        grouped,
        "scaled trajectory set to parameter space"
    );

    Ok(ScaledSample { unscaled, scaled, changed, block_len: set.block_len(), grouped })
}

#[cfg(test)]
mod tests {
    // Scope
    // -----
    // Distribution-aware scaling: uniform endpoints, gaussian median, clamp
    // validation, full-width assembly with defaults and global indices.
    use super::*;
    use ndarray::array;

    fn params() -> ParameterSet {
        ParameterSet::new(vec![
            ParameterSpec::new("a", Distribution::Uniform, -2.0, 4.0, 1.0, true).unwrap(),
            ParameterSpec::new("b", Distribution::Uniform, 0.0, 1.0, 0.25, false).unwrap(),
            ParameterSpec::new("c", Distribution::Gaussian, 3.0, 2.0, 3.0, true).unwrap(),
        ])
    }

    #[test]
    // Purpose
    // -------
    // Uniform endpoints map exactly; the gaussian median maps to the mean.
    //
    // Given
    // -----
    // - Uniform[-2, 4] and Normal(3, 2).
    //
    // Expect
    // ------
    // - raw 0 → -2, raw 1 → 4, gaussian raw 0.5 → 3.
    fn uniform_endpoints_and_gaussian_median() {
        let p = params();
        let opts = ScalerOptions::default();
        assert_eq!(scale_value(p.get(0).unwrap(), 0.0, &opts).unwrap(), -2.0);
        assert_eq!(scale_value(p.get(0).unwrap(), 1.0, &opts).unwrap(), 4.0);
        let median = scale_value(p.get(2).unwrap(), 0.5, &opts).unwrap();
        assert!((median - 3.0).abs() < 1e-9, "median = {median}");
    }

    #[test]
    // Purpose
    // -------
    // Gaussian tails stay finite thanks to the clamp.
    //
    // Given
    // -----
    // - Normal(3, 2) with raw 0 and raw 1 under the default clamp.
    //
    // Expect
    // ------
    // - Finite values, symmetric around the mean.
    fn gaussian_clamp_keeps_tails_finite() {
        let p = params();
        let opts = ScalerOptions::default();
        let lo = scale_value(p.get(2).unwrap(), 0.0, &opts).unwrap();
        let hi = scale_value(p.get(2).unwrap(), 1.0, &opts).unwrap();
        assert!(lo.is_finite() && hi.is_finite());
        assert!(((hi - 3.0) - (3.0 - lo)).abs() < 1e-8);
        assert!(matches!(ScalerOptions::new(0.5, 0.5), Err(ParamError::InvalidClamp { .. })));
    }

    #[test]
    // Purpose
    // -------
    // Full-width assembly fills excluded columns with defaults and maps
    // changed factors to global indices.
    //
    // Given
    // -----
    // - One 2-factor trajectory over included params {0, 2}.
    //
    // Expect
    // ------
    // - Column 1 is 0.25 everywhere; changed becomes [Some(2), Some(0), None].
    fn full_width_assembly_uses_defaults_and_global_indices() {
        let p = params();
        let matrix = array![[0.0, 0.0], [0.0, 0.6], [0.6, 0.6]];
        let set = TrajectorySet::from_parts(matrix, vec![Some(1), Some(0), None], 3).unwrap();
        let units = Units::factors(2).unwrap();

        let out = scale_trajectories(&p, &set, &units, &ScalerOptions::default()).unwrap();

        assert_eq!(out.scaled.dim(), (3, 3));
        assert!(out.scaled.column(1).iter().all(|&v| v == 0.25));
        assert!(out.unscaled.column(1).iter().all(|&v| v == 0.25));
        assert_eq!(out.unscaled[[2, 0]], 0.6);
        assert!((out.scaled[[2, 0]] - (-2.0 + 0.6 * 6.0)).abs() < 1e-12);
        assert_eq!(out.changed, vec![Some(2), Some(0), None]);
        assert_eq!(out.n_trajectories(), 1);
    }

    #[test]
    // Purpose
    // -------
    // Width mismatch between the set and the included parameters fails.
    //
    // Given
    // -----
    // - A 3-factor set while 2 parameters are included.
    //
    // Expect
    // ------
    // - `IncludedCountMismatch`.
    fn width_mismatch_is_rejected() {
        let p = params();
        let set = TrajectorySet::from_parts(Array2::zeros((4, 3)), vec![Some(0), Some(1), Some(2), None], 4)
            .unwrap();
        let units = Units::factors(3).unwrap();
        let err = scale_trajectories(&p, &set, &units, &ScalerOptions::default()).unwrap_err();
        assert_eq!(err, ParamError::IncludedCountMismatch { expected: 2, found: 3 });
    }
}
