//! io::text — shared helpers for whitespace-delimited text files.
use std::{
    fs::{self, File},
    io::BufWriter,
    path::Path,
};

use crate::io::errors::{IoError, IoResult};

/// Marker on the first line of sample files.
pub const HEADER_MARKER: &str = "header lines:";

pub(crate) fn read_lines(path: &Path) -> IoResult<Vec<String>> {
    let text = fs::read_to_string(path).map_err(|e| IoError::io(path, e))?;
    Ok(text.lines().map(str::to_string).collect())
}

pub(crate) fn create(path: &Path) -> IoResult<BufWriter<File>> {
    File::create(path).map(BufWriter::new).map_err(|e| IoError::io(path, e))
}

/// Number of header lines: `skip` if given, else the `header lines: N`
/// marker on the first line.
pub fn header_len(path: &Path, lines: &[String], skip: Option<usize>) -> IoResult<usize> {
    if let Some(n) = skip {
        return Ok(n);
    }
    let first = lines.first().ok_or_else(|| IoError::Empty { path: path.display().to_string() })?;
    let rest = first.trim().strip_prefix(HEADER_MARKER).ok_or_else(|| IoError::Header {
        path: path.display().to_string(),
        message: format!("first line does not start with '{HEADER_MARKER}'"),
    })?;
    rest.trim().parse::<usize>().map_err(|e| IoError::Header {
        path: path.display().to_string(),
        message: format!("cannot parse header length '{}': {e}", rest.trim()),
    })
}

/// Parse a float token; `line` is 1-based.
pub(crate) fn parse_f64(path: &Path, line: usize, token: &str) -> IoResult<f64> {
    token.parse::<f64>().map_err(|e| IoError::parse(path, line, format!("'{token}': {e}")))
}

/// Data lines after `skip` header lines, with their 1-based line numbers;
/// blank lines are dropped.
pub(crate) fn data_lines(lines: &[String], skip: usize) -> impl Iterator<Item = (usize, &str)> {
    lines
        .iter()
        .enumerate()
        .skip(skip)
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty())
}
