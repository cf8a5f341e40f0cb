//! workflow — one screening iteration end to end.
//!
//! Purpose
//! -------
//! Chain the building blocks in the order a screening study runs them:
//! optimized sampling over the included parameters, distribution-aware
//! scaling, model evaluation, effect estimation and cutoff selection.
//!
//! Key behaviors
//! -------------
//! - The trajectory dimension is the number of included parameters (or the
//!   number of groups when a group matrix is supplied).
//! - [`Estimator::Relative`] measures `|Δy| / |Δx|` on the physical sample;
//!   [`Estimator::Morris`] measures mu* per grid step on the unit sample.
//! - The returned [`Iteration`] keeps every intermediate product and can
//!   write the sample, results, cutoff and updated parameter files.
//!
//! Invariants & assumptions
//! ------------------------
//! - The parameter table is not modified; the next iteration's table is
//!   `Iteration::screening.updated`.
use std::path::{Path, PathBuf};

use rand::Rng;
use tracing::info;

use crate::{
    effects::{
        errors::EffectsError,
        morris::morris_effects,
        output::Objective,
        relative::relative_effects,
        stats::{EffectMatrix, EffectTable},
    },
    io::{
        errors::IoError,
        params::{updated_table_path, write_parameter_table},
        results::{write_cutoffs, write_effects},
        samples::{SampleFiles, write_sample_files},
    },
    models::{
        errors::ModelError,
        evaluate::{RetryPolicy, evaluate_sample},
        traits::Model,
    },
    parameters::{
        errors::ParamError,
        scaler::{ScaledSample, ScalerOptions, scale_trajectories},
        spec::ParameterSet,
    },
    sampling::{
        bounds::Bounds,
        errors::SamplingError,
        optimizer::{OptimizedSample, optimized_trajectories},
        options::SamplingOptions,
        units::{GroupMatrix, Units},
    },
    screening::{
        combine::{CombinationRule, ScreeningOutcome, screen},
        cutoff::CutoffMode,
        errors::ScreeningError,
    },
};

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

pub type WorkflowResult<T> = Result<T, WorkflowError>;

#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowError {
    Sampling(SamplingError),
    Param(ParamError),
    Model(ModelError),
    Effects(EffectsError),
    Screening(ScreeningError),
    Io(IoError),
    /// The relative estimator needs one parameter per step.
    GroupedRelativeEstimator,
}

impl std::error::Error for WorkflowError {}

impl std::fmt::Display for WorkflowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkflowError::Sampling(e) => write!(f, "sampling: {e}"),
            WorkflowError::Param(e) => write!(f, "parameters: {e}"),
            WorkflowError::Model(e) => write!(f, "model: {e}"),
            WorkflowError::Effects(e) => write!(f, "effects: {e}"),
            WorkflowError::Screening(e) => write!(f, "screening: {e}"),
            WorkflowError::Io(e) => write!(f, "io: {e}"),
            WorkflowError::GroupedRelativeEstimator => write!(
                f,
                "The relative estimator cannot be used with grouped sampling; use the Morris estimator"
            ),
        }
    }
}

macro_rules! impl_from {
    ($($err:ty => $variant:ident),* $(,)?) => {
        $(impl From<$err> for WorkflowError {
            fn from(err: $err) -> Self {
                WorkflowError::$variant(err)
            }
        })*
    };
}

impl_from!(
    SamplingError => Sampling,
    ParamError => Param,
    ModelError => Model,
    EffectsError => Effects,
    ScreeningError => Screening,
    IoError => Io,
);

#[cfg(feature = "python-bindings")]
impl From<WorkflowError> for PyErr {
    fn from(err: WorkflowError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

/// Elementary-effect estimator used for screening.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Estimator {
    /// Mean `|Δy| / |Δx|` on the physical sample.
    #[default]
    Relative,
    /// Morris mu* on the unit sample.
    Morris,
}

/// Configuration of one iteration.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IterationConfig {
    pub sampling: SamplingOptions,
    pub scaler: ScalerOptions,
    pub retry: RetryPolicy,
    pub estimator: Estimator,
    pub cutoff: CutoffMode,
    pub rule: CombinationRule,
}

/// Every product of one iteration.
#[derive(Debug, Clone, PartialEq)]
pub struct Iteration {
    pub units: Units,
    pub sample: OptimizedSample,
    pub scaled: ScaledSample,
    pub objectives: Vec<Objective>,
    /// Unit-level Morris tables when [`Estimator::Morris`] was used.
    pub morris: Option<Vec<EffectTable>>,
    pub effects: EffectMatrix,
    pub screening: ScreeningOutcome,
}

fn units_for(n_included: usize, groups: Option<GroupMatrix>) -> WorkflowResult<Units> {
    match groups {
        None => Ok(Units::factors(n_included)?),
        Some(g) if g.n_factors() == n_included => Ok(Units::Groups(g)),
        Some(g) => Err(SamplingError::GroupShapeMismatch {
            expected_factors: n_included,
            found_rows: g.n_factors(),
        }
        .into()),
    }
}

/// Run one screening iteration.
///
/// # Errors
/// - [`WorkflowError::Param`] when nothing is included.
/// - [`WorkflowError::GroupedRelativeEstimator`] for groups with the
///   relative estimator.
/// - Errors of every stage, wrapped in the matching variant.
pub fn run_iteration<M, R>(
    params: &ParameterSet, model: &M, config: &IterationConfig, groups: Option<GroupMatrix>,
    rng: &mut R,
) -> WorkflowResult<Iteration>
where
    M: Model + ?Sized,
    R: Rng + ?Sized,
{
    let included = params.included_indices();
    if included.is_empty() {
        return Err(ParamError::NoIncludedParameters.into());
    }
    let units = units_for(included.len(), groups)?;
    if units.is_grouped() && config.estimator == Estimator::Relative {
        return Err(WorkflowError::GroupedRelativeEstimator);
    }

    let bounds = Bounds::unit(included.len())?;
    let sample = optimized_trajectories(&units, &bounds, &config.sampling, rng)?;
    let scaled = scale_trajectories(params, &sample.unit_trajectories, &units, &config.scaler)?;
    let objectives = evaluate_sample(model, &scaled.scaled, config.retry)?;

    let (morris, effects) = match config.estimator {
        Estimator::Relative => (None, relative_effects(&scaled.scaled, &scaled.changed, &objectives)?),
        Estimator::Morris => {
            let tables =
                morris_effects(&sample.unit_trajectories, &units, &config.sampling.grid, &objectives)?;
            let matrix = EffectMatrix::from_morris(&tables, &units, &included, params.len())?;
            (Some(tables), matrix)
        }
    };

    let screening = screen(params, &effects, &config.cutoff, config.rule)?;
    info!(
        included = included.len(),
        informative = screening.informative.len(),
        next_iteration = screening.next_iteration.len(),
        "screening iteration finished"
    );

    Ok(Iteration { units, sample, scaled, objectives, morris, effects, screening })
}

/// Paths written by [`Iteration::write_outputs`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IterationFiles {
    pub samples: SampleFiles,
    pub effects: PathBuf,
    pub cutoffs: Vec<PathBuf>,
    pub updated_table: PathBuf,
}

impl Iteration {
    /// Write sample files, the results file, cutoff files and the updated
    /// table into `dir`. `table` is the path the parameter table was read
    /// from; the updated table goes to `<dir>/<table file name>.new`.
    ///
    /// # Errors
    /// - [`WorkflowError::Io`] on any file failure.
    pub fn write_outputs(
        &self, dir: &Path, stem: &str, params: &ParameterSet, table: &Path,
    ) -> WorkflowResult<IterationFiles> {
        let samples = SampleFiles::new(dir, stem, 1, 1, params.n_included());
        write_sample_files(&samples, params, &self.scaled)?;

        let effects = dir.join(format!("{stem}_eee.dat"));
        write_effects(&effects, &params.names(), &self.effects)?;

        let cutoffs = write_cutoffs(dir, &self.screening.cutoffs)?;

        let file_name = table.file_name().map(PathBuf::from).unwrap_or_else(|| PathBuf::from("parameters.dat"));
        let updated_table = updated_table_path(&dir.join(file_name));
        write_parameter_table(&updated_table, &self.screening.updated)?;

        Ok(IterationFiles { samples, effects, cutoffs, updated_table })
    }
}

#[cfg(test)]
mod tests {
    // Scope
    // -----
    // Configuration guards of `run_iteration`; the full pipeline is covered
    // by the integration tests.
    use super::*;
    use crate::{
        models::ishigami::IshigamiHomma,
        parameters::spec::{Distribution, ParameterSpec},
    };
    use rand::{SeedableRng, rngs::StdRng};

    fn table(mask: &[bool]) -> ParameterSet {
        mask.iter()
            .enumerate()
            .map(|(i, &inc)| {
                ParameterSpec::new(format!("x_{}", i + 1), Distribution::Uniform, -3.0, 3.0, 0.0, inc)
                    .unwrap()
            })
            .collect()
    }

    #[test]
    // Purpose
    // -------
    // An empty inclusion mask and grouped relative estimation are rejected
    // before any sampling.
    //
    // Given
    // -----
    // - All parameters excluded; then groups with the default estimator.
    //
    // Expect
    // ------
    // - `Param(NoIncludedParameters)`, then `GroupedRelativeEstimator`.
    fn configuration_guards() {
        let model = IshigamiHomma::default();
        let config = IterationConfig::default();
        let mut rng = StdRng::seed_from_u64(1);

        let err = run_iteration(&table(&[false; 3]), &model, &config, None, &mut rng).unwrap_err();
        assert_eq!(err, WorkflowError::Param(ParamError::NoIncludedParameters));

        let groups = GroupMatrix::from_assignment(vec![0, 0, 1], 2).unwrap();
        let err = run_iteration(&table(&[true; 3]), &model, &config, Some(groups), &mut rng).unwrap_err();
        assert_eq!(err, WorkflowError::GroupedRelativeEstimator);
    }

    #[test]
    // Purpose
    // -------
    // Group matrices must cover exactly the included parameters.
    //
    // Given
    // -----
    // - Three included parameters and a two-factor group matrix.
    //
    // Expect
    // ------
    // - `Sampling(GroupShapeMismatch)`.
    fn group_shape_must_match_included() {
        let groups = GroupMatrix::from_assignment(vec![0, 1], 2).unwrap();
        let config = IterationConfig { estimator: Estimator::Morris, ..IterationConfig::default() };
        let err = run_iteration(
            &table(&[true; 3]),
            &IshigamiHomma::default(),
            &config,
            Some(groups),
            &mut StdRng::seed_from_u64(3),
        )
        .unwrap_err();
        assert!(matches!(err, WorkflowError::Sampling(SamplingError::GroupShapeMismatch { .. })));
    }
}
