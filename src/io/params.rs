//! io::params — parameter table reader and writer.
//!
//! Format: whitespace-delimited, `#` starts a comment line. Columns are
//! `name distribution lower upper default flag`, where `lower`/`upper` hold
//! mean/stddev for Gaussian parameters and `flag == 1` includes the
//! parameter in the next sampling run.
use std::{io::Write, path::Path};

use crate::{
    io::{
        errors::{IoError, IoResult},
        text::{create, parse_f64, read_lines},
    },
    parameters::spec::{Distribution, ParameterSet, ParameterSpec},
};

const COLUMNS: usize = 6;

/// Read a parameter table.
///
/// # Errors
/// - [`IoError::Io`] on filesystem failure.
/// - [`IoError::ColumnCount`] / [`IoError::Parse`] for malformed lines.
/// - [`IoError::Param`] for unsupported distributions or invalid ranges.
/// - [`IoError::Empty`] when no parameter is listed.
pub fn read_parameter_table(path: &Path) -> IoResult<ParameterSet> {
    let lines = read_lines(path)?;
    let mut specs = Vec::new();
    for (i, raw) in lines.iter().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() != COLUMNS {
            return Err(IoError::ColumnCount {
                path: path.display().to_string(),
                line: i + 1,
                expected: COLUMNS,
                found: tokens.len(),
            });
        }
        let distribution: Distribution = tokens[1].parse()?;
        let lower = parse_f64(path, i + 1, tokens[2])?;
        let upper = parse_f64(path, i + 1, tokens[3])?;
        let default = parse_f64(path, i + 1, tokens[4])?;
        let included = parse_f64(path, i + 1, tokens[5])? == 1.0;
        specs.push(ParameterSpec::new(tokens[0], distribution, lower, upper, default, included)?);
    }
    if specs.is_empty() {
        return Err(IoError::Empty { path: path.display().to_string() });
    }
    Ok(ParameterSet::new(specs))
}

/// Write a parameter table in the format read by [`read_parameter_table`].
///
/// # Errors
/// - [`IoError::Io`] on filesystem failure.
pub fn write_parameter_table(path: &Path, params: &ParameterSet) -> IoResult<()> {
    let mut w = create(path)?;
    let io_err = |e| IoError::io(path, e);
    writeln!(w, "# para   dist       lower     upper     default   informative(0)_or_noninformative(1)")
        .map_err(io_err)?;
    writeln!(w, "#                   mean      stddev").map_err(io_err)?;
    for s in params.specs() {
        writeln!(
            w,
            "{} {} {} {} {} {}",
            s.name,
            s.distribution,
            s.lower,
            s.upper,
            s.default,
            u8::from(s.included)
        )
        .map_err(io_err)?;
    }
    w.flush().map_err(io_err)
}

/// Path of the updated table written next to `table`: `<table>.new`.
pub fn updated_table_path(table: &Path) -> std::path::PathBuf {
    let mut name = table.as_os_str().to_owned();
    name.push(".new");
    name.into()
}
