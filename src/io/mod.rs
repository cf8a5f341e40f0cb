//! io — text file formats of a screening run.
//!
//! Parameter tables, trajectory sample files, elementary-effects results
//! and cutoff files. Everything is whitespace-delimited ASCII; readers report
//! the offending path and line on failure.
pub mod errors;
pub mod params;
pub mod results;
pub mod samples;
pub mod text;

pub use self::errors::{IoError, IoResult};
pub use self::params::{read_parameter_table, updated_table_path, write_parameter_table};
pub use self::results::{
    EffectsFile, cutoff_path, read_cutoff, read_effects, write_cutoff, write_cutoffs, write_effects,
};
pub use self::samples::{SampleFiles, read_changed, read_sample_matrix, write_sample_files};
