//! effects — elementary-effect estimation.
//!
//! Purpose
//! -------
//! Turn model outputs evaluated along Morris trajectories into per-parameter
//! sensitivity measures.
//!
//! Key behaviors
//! -------------
//! - [`morris_effects`]: classic Morris statistics (mu*, mu, sigma) per
//!   changeable unit, oriented by the step direction on the grid.
//! - [`relative_effects`]: mean `|Δy| / |Δx|` per global parameter, for
//!   outputs of arbitrary simulators evaluated on physical samples.
//! - Both accept scalar and series objectives and report zero statistics with
//!   a zero count for parameters that were never moved.
//!
//! The two estimators are not interchangeable: Morris effects are measured
//! per grid step `Δ`, relative effects per physical unit of the parameter.
pub mod errors;
pub mod morris;
pub mod output;
pub mod relative;
pub mod stats;
pub mod validation;

pub use self::errors::{EffectsError, EffectsResult};
pub use self::morris::morris_effects;
pub use self::output::{Objective, ObjectiveOutput};
pub use self::relative::relative_effects;
pub use self::stats::{EffectMatrix, EffectStats, EffectTable};

pub mod prelude {
    pub use super::errors::{EffectsError, EffectsResult};
    pub use super::morris::morris_effects;
    pub use super::output::{Objective, ObjectiveOutput};
    pub use super::relative::relative_effects;
    pub use super::stats::{EffectMatrix, EffectStats, EffectTable};
}
