//! parameters — parameter table model and distribution-aware scaling.
//!
//! A screening iteration starts from an ordered [`ParameterSet`]. Only the
//! included parameters span trajectory dimensions; the rest are pinned to
//! their defaults. [`scale_trajectories`] turns a unit-space trajectory set
//! into full-width unscaled and physical matrices.
pub mod errors;
pub mod scaler;
pub mod spec;

pub use self::errors::{ParamError, ParamResult};
pub use self::scaler::{ScaledSample, ScalerOptions, scale_trajectories, scale_value};
pub use self::spec::{Distribution, ParameterSet, ParameterSpec};

pub mod prelude {
    pub use super::errors::{ParamError, ParamResult};
    pub use super::scaler::{ScaledSample, ScalerOptions, scale_trajectories};
    pub use super::spec::{Distribution, ParameterSet, ParameterSpec};
}
