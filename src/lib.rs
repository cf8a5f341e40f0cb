//! rust_morris — Morris one-at-a-time screening with optional Python bindings.
//!
//! Purpose
//! -------
//! Screen model parameters for non-informativeness: sample optimized Morris
//! trajectories, scale them into physical parameter ranges, estimate
//! elementary effects from model outputs, and pick cutoffs that split
//! informative from non-informative parameters. With the `python-bindings`
//! feature this module also defines the `_rust_morris` extension module.
//!
//! Key behaviors
//! -------------
//! - `sampling`: grid, trajectory generator and the greedy spread optimizer.
//! - `parameters`: parameter table model and uniform/Gaussian scaling.
//! - `effects`: Morris (mu*, mu, sigma) and relative `|Δy|/|Δx|` estimators.
//! - `screening`: logistic knee fit, cutoff fallback, rectangle/triangle
//!   rules, next-iteration parameter table.
//! - `optimization`: argmin-backed L-BFGS and Brent minimizers.
//! - `io`, `models`, `workflow`: file formats, model interface, and one
//!   iteration end to end.
//!
//! Invariants & assumptions
//! ------------------------
//! - Randomness is always injected; identical seeds give identical samples.
//! - Statistics of parameters that were never moved are zero with a zero
//!   count, never NaN.
//! - Errors from core Rust code are typed per subtree and converted to
//!   `PyErr` values at the PyO3 boundary.
//!
//! Downstream usage
//! ----------------
//! - Native Rust code uses the inner modules or [`workflow::run_iteration`].
//! - The Python packaging layer imports `_rust_morris` and its `sampling`,
//!   `effects` and `screening` submodules.

pub mod effects;
pub mod io;
pub mod models;
pub mod optimization;
pub mod parameters;
pub mod sampling;
pub mod screening;
pub mod utils;
pub mod workflow;

#[cfg(feature = "python-bindings")]
use ndarray::Array1;

#[cfg(feature = "python-bindings")]
use numpy::{IntoPyArray, PyArray1, PyArray2};

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    effects::{
        morris::morris_effects as morris_estimator,
        output::{Objective, ObjectiveOutput},
        relative::relative_effects as relative_estimator,
    },
    sampling::{
        bounds::Bounds, grid::Grid, optimizer::OptimizedSample,
        optimizer::optimized_trajectories, options::SamplingOptions, trajectory::TrajectorySet,
        units::Units,
    },
    screening::cutoff::{CutoffOptions, auto_cutoff as knee_cutoff},
    utils::{changed_to_py, extract_changed, extract_f64_array, extract_f64_matrix},
};

/// MorrisSample — Python-facing optimized Morris sample.
///
/// Purpose
/// -------
/// Run the trajectory optimizer from Python and expose the selected
/// trajectories as numpy arrays.
///
/// Parameters
/// ----------
/// Constructed via `MorrisSample(n_factors, n_trajectories, levels=6,
/// n_candidates=None, seed=None, lower=None, upper=None, diagnostics=False)`:
/// - `lower`, `upper`: optional per-factor bounds; default `[0, 1]`.
/// - `n_candidates`: defaults to `10 · n_trajectories`.
///
/// Notes
/// -----
/// - `changed` uses `-1` for the end of each trajectory.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "rust_morris.sampling")]
pub struct MorrisSample {
    inner: OptimizedSample,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl MorrisSample {
    #[new]
    #[pyo3(
        signature = (
            n_factors,
            n_trajectories,
            levels = 6,
            n_candidates = None,
            seed = None,
            lower = None,
            upper = None,
            diagnostics = false,
        ),
        text_signature = "(n_factors, n_trajectories, /, levels=6, n_candidates=None, seed=None, \
                          lower=None, upper=None, diagnostics=False)"
    )]
    pub fn new<'py>(
        py: Python<'py>, n_factors: usize, n_trajectories: usize, levels: usize,
        n_candidates: Option<usize>, seed: Option<u64>, lower: Option<&Bound<'py, PyAny>>,
        upper: Option<&Bound<'py, PyAny>>, diagnostics: bool,
    ) -> PyResult<Self> {
        let units = Units::factors(n_factors)?;
        let bounds = match (lower, upper) {
            (None, None) => Bounds::unit(n_factors)?,
            (Some(lo), Some(hi)) => {
                let lo = extract_f64_array(py, lo)?.as_array().to_vec();
                let hi = extract_f64_array(py, hi)?.as_array().to_vec();
                Bounds::new(lo, hi)?
            }
            _ => return Err(PyValueError::new_err("lower and upper must be given together")),
        };
        let opts = SamplingOptions::new(levels, n_trajectories, n_candidates, seed, diagnostics)?;
        let mut rng = opts.rng();
        let inner = optimized_trajectories(&units, &bounds, &opts, &mut rng)?;
        Ok(MorrisSample { inner })
    }

    /// Selected trajectories mapped onto the bounds, `(r·(k+1), k)`.
    #[getter]
    pub fn matrix<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray2<f64>> {
        self.inner.trajectories.matrix().clone().into_pyarray(py)
    }

    /// Selected trajectories in `[0, 1]^k`.
    #[getter]
    pub fn unit_matrix<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray2<f64>> {
        self.inner.unit_trajectories.matrix().clone().into_pyarray(py)
    }

    #[getter]
    pub fn changed(&self) -> Vec<i64> {
        changed_to_py(self.inner.trajectories.changed())
    }

    #[getter]
    pub fn total_distance(&self) -> f64 {
        self.inner.selection.total_distance
    }

    #[getter]
    pub fn duplicates(&self) -> Vec<usize> {
        self.inner.selection.duplicates.clone()
    }

    /// `(optimized, first r candidates)` sampling quality, if requested.
    #[getter]
    pub fn quality(&self) -> Option<(f64, f64)> {
        self.inner.diagnostics.as_ref().map(|d| (d.quality_optimized, d.quality_original))
    }
}

#[cfg(feature = "python-bindings")]
fn extract_output(raw: &Bound<'_, PyAny>) -> PyResult<ObjectiveOutput> {
    if let Ok(values) = raw.extract::<Vec<f64>>() {
        return Ok(ObjectiveOutput::Scalar(Array1::from(values)));
    }
    Ok(ObjectiveOutput::Series(extract_f64_matrix(raw)?))
}

/// Morris statistics of one objective.
///
/// Returns `(mu_star, mu, sigma, counts)` per factor. `output` is a 1-D
/// array (scalar output per row) or a 2-D array (one series per row).
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (sample, changed, output, levels = 6))]
#[allow(clippy::type_complexity)]
pub fn morris_effects<'py>(
    py: Python<'py>, sample: &Bound<'py, PyAny>, changed: &Bound<'py, PyAny>,
    output: &Bound<'py, PyAny>, levels: usize,
) -> PyResult<(
    Bound<'py, PyArray1<f64>>,
    Bound<'py, PyArray1<f64>>,
    Bound<'py, PyArray1<f64>>,
    Vec<usize>,
)> {
    let matrix = extract_f64_matrix(sample)?;
    let units = Units::factors(matrix.ncols())?;
    let set = TrajectorySet::from_parts(matrix, extract_changed(changed)?, units.block_len())?;
    let objective = Objective::new("output", extract_output(output)?);
    let tables = morris_estimator(&set, &units, &Grid::new(levels)?, &[objective])?;
    let table = &tables[0];
    let counts = table.stats.iter().map(|s| s.count).collect();
    Ok((
        table.abs_mu().into_pyarray(py),
        table.mu().into_pyarray(py),
        table.stdev().into_pyarray(py),
        counts,
    ))
}

/// Mean `|Δy| / |Δx|` per parameter column of `sample`.
///
/// Returns `(effects, counts)`.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (sample, changed, output))]
pub fn relative_effects<'py>(
    py: Python<'py>, sample: &Bound<'py, PyAny>, changed: &Bound<'py, PyAny>,
    output: &Bound<'py, PyAny>,
) -> PyResult<(Bound<'py, PyArray1<f64>>, Vec<usize>)> {
    let matrix = extract_f64_matrix(sample)?;
    let objective = Objective::new("output", extract_output(output)?);
    let effects = relative_estimator(&matrix, &extract_changed(changed)?, &[objective])?;
    let counts = effects.counts().column(0).to_vec();
    Ok((effects.column(0).to_owned().into_pyarray(py), counts))
}

/// Automatic cutoff from the knee of the sorted effects.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (effects, max_fitted_knee = 0.2))]
pub fn auto_cutoff<'py>(
    py: Python<'py>, effects: &Bound<'py, PyAny>, max_fitted_knee: f64,
) -> PyResult<f64> {
    let arr = extract_f64_array(py, effects)?;
    let data = arr
        .as_slice()
        .map_err(|_| PyValueError::new_err("effects must be a contiguous 1-D float64 array"))?;
    let base = CutoffOptions::default();
    let opts = CutoffOptions::new(base.initial_guess, max_fitted_knee, base.fit, base.scalar)?;
    Ok(knee_cutoff("effects", data, &opts)?.value)
}

/// _rust_morris — PyO3 module initializer for the Python extension.
///
/// Creates the `sampling`, `effects` and `screening` submodules, attaches
/// them to `_rust_morris`, and registers them in `sys.modules` so dotted
/// imports work.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _rust_morris<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    let sampling_mod = PyModule::new(_py, "sampling")?;
    let effects_mod = PyModule::new(_py, "effects")?;
    let screening_mod = PyModule::new(_py, "screening")?;
    sampling_module(_py, m, &sampling_mod)?;
    effects_module(_py, m, &effects_mod)?;
    screening_module(_py, m, &screening_mod)?;

    let modules = _py.import("sys")?.getattr("modules")?;
    modules.set_item("rust_morris.sampling", sampling_mod)?;
    modules.set_item("rust_morris.effects", effects_mod)?;
    modules.set_item("rust_morris.screening", screening_mod)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn sampling_module<'py>(
    _py: Python, rust_morris: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_class::<MorrisSample>()?;
    rust_morris.add_submodule(m)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn effects_module<'py>(
    _py: Python, rust_morris: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(morris_effects, m)?)?;
    m.add_function(wrap_pyfunction!(relative_effects, m)?)?;
    rust_morris.add_submodule(m)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn screening_module<'py>(
    _py: Python, rust_morris: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(auto_cutoff, m)?)?;
    rust_morris.add_submodule(m)?;
    Ok(())
}
