//! screening — cutoff selection and informative/non-informative partition.
//!
//! Purpose
//! -------
//! Decide which parameters stay in the next screening iteration from the
//! per-parameter effect matrix.
//!
//! Key behaviors
//! -------------
//! - [`auto_cutoff`] fits a logistic-with-offset curve to the sorted,
//!   normalized effects of one objective and reads the cutoff at the knee.
//! - [`screen`] resolves one cutoff per objective (automatic or explicit)
//!   and combines objectives with the rectangle or triangle rule.
//!
//! Conventions
//! -----------
//! - "Next iteration" parameters are the non-informative ones; they become
//!   the included set of the updated parameter table.
pub mod combine;
pub mod cutoff;
pub mod errors;
pub mod fit;
pub mod logistic;

pub use self::combine::{CombinationRule, CutoffSet, ScreeningOutcome, screen};
pub use self::cutoff::{Cutoff, CutoffMode, CutoffOptions, KneeFit, auto_cutoff};
pub use self::errors::{ScreeningError, ScreeningResult};
pub use self::logistic::Logistic;

pub mod prelude {
    pub use super::combine::{CombinationRule, ScreeningOutcome, screen};
    pub use super::cutoff::{CutoffMode, CutoffOptions};
    pub use super::errors::{ScreeningError, ScreeningResult};
}
