//! models — model interface, reference test function, batch evaluation.
pub mod errors;
pub mod evaluate;
pub mod ishigami;
pub mod traits;

pub use self::errors::{ModelError, ModelResult};
pub use self::evaluate::{RetryPolicy, evaluate_sample};
pub use self::ishigami::IshigamiHomma;
pub use self::traits::{Model, RunOutput};
