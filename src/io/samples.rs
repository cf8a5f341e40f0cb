//! io::samples — trajectory sample files.
//!
//! Purpose
//! -------
//! Persist a [`ScaledSample`] as the three files consumed by model runners
//! and by the effect estimators, and read them back.
//!
//! Key behaviors
//! -------------
//! - `<stem>_para<k>_M.dat`: unit-space rows, `<stem>_scaled_para<k>_M.dat`:
//!   physical rows, `<stem>_para<k>_v.dat`: changed global index per row
//!   (`-1` ends a trajectory). `k` is the number of included parameters.
//! - Every file starts with `k + 5` header lines: the `header lines: N`
//!   marker, two description lines, `parameter ranges are:`, one line per
//!   included parameter, and a blank line.
//! - Readers honor the marker or an explicit `skip`.
use std::{
    io::Write,
    path::{Path, PathBuf},
};

use ndarray::Array2;

use crate::{
    io::{
        errors::{IoError, IoResult},
        text::{HEADER_MARKER, create, data_lines, header_len, parse_f64, read_lines},
    },
    parameters::{
        scaler::ScaledSample,
        spec::{Distribution, ParameterSet},
    },
};

/// Paths of the three sample files of one sampling run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleFiles {
    pub unscaled: PathBuf,
    pub scaled: PathBuf,
    pub changed: PathBuf,
}

impl SampleFiles {
    /// File names for run `file_id` (1-based) of `n_files`; ids are
    /// zero-padded to the width of `n_files`.
    pub fn new(dir: &Path, stem: &str, file_id: usize, n_files: usize, n_included: usize) -> Self {
        let width = n_files.max(1).to_string().len();
        let id = format!("{file_id:0width$}");
        let name = |mid: &str, suffix: &str| dir.join(format!("{stem}_{id}_{mid}para{n_included}_{suffix}.dat"));
        Self { unscaled: name("", "M"), scaled: name("scaled_", "M"), changed: name("", "v") }
    }
}

fn header_block(params: &ParameterSet) -> Vec<String> {
    let included = params.included_indices();
    let mut lines = Vec::with_capacity(included.len() + 5);
    lines.push(format!("{HEADER_MARKER} {}", included.len() + 5));
    lines.push("Morris sequences generated using rust_morris".to_string());
    lines.push(format!("first: reference set, then: {} lines OAT sample", included.len()));
    lines.push("parameter ranges are:".to_string());
    for &g in &included {
        let s = &params.specs()[g];
        let kind = match s.distribution {
            Distribution::Uniform => "Uniform",
            Distribution::Gaussian => "Gaussian",
        };
        lines.push(format!(
            "      p_{{{}}} = \"{}\" = {kind}[ {:.4} , {:.4} ]",
            g + 1,
            s.name,
            s.lower,
            s.upper
        ));
    }
    lines.push(String::new());
    lines
}

fn write_with_header<F>(path: &Path, header: &[String], mut body: F) -> IoResult<()>
where
    F: FnMut(&mut dyn Write) -> std::io::Result<()>,
{
    let mut w = create(path)?;
    let result = (|| {
        for line in header {
            writeln!(w, "{line}")?;
        }
        body(&mut w)?;
        w.flush()
    })();
    result.map_err(|e| IoError::io(path, e))
}

fn write_matrix(path: &Path, header: &[String], m: &Array2<f64>) -> IoResult<()> {
    write_with_header(path, header, |w| {
        for row in m.rows() {
            let tokens: Vec<String> = row.iter().map(|v| format!("{v:.8}")).collect();
            writeln!(w, "{}", tokens.join(" "))?;
        }
        Ok(())
    })
}

/// Write the three sample files.
///
/// # Errors
/// - [`IoError::Io`] on filesystem failure.
pub fn write_sample_files(files: &SampleFiles, params: &ParameterSet, sample: &ScaledSample) -> IoResult<()> {
    let header = header_block(params);
    write_matrix(&files.unscaled, &header, &sample.unscaled)?;
    write_matrix(&files.scaled, &header, &sample.scaled)?;
    write_with_header(&files.changed, &header, |w| {
        for c in &sample.changed {
            match c {
                Some(g) => writeln!(w, "{g}")?,
                None => writeln!(w, "-1")?,
            }
        }
        Ok(())
    })
}

/// Read a sample matrix, skipping the header.
///
/// # Errors
/// - [`IoError::Header`] when the marker is absent and `skip` is `None`.
/// - [`IoError::ColumnCount`] for ragged rows; [`IoError::Parse`] for bad
///   numbers; [`IoError::Empty`] without data rows.
pub fn read_sample_matrix(path: &Path, skip: Option<usize>) -> IoResult<Array2<f64>> {
    let lines = read_lines(path)?;
    let skip = header_len(path, &lines, skip)?;
    let mut values = Vec::new();
    let mut width = None;
    let mut rows = 0;
    for (line_no, line) in data_lines(&lines, skip) {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let expected = *width.get_or_insert(tokens.len());
        if tokens.len() != expected {
            return Err(IoError::ColumnCount {
                path: path.display().to_string(),
                line: line_no,
                expected,
                found: tokens.len(),
            });
        }
        for t in tokens {
            values.push(parse_f64(path, line_no, t)?);
        }
        rows += 1;
    }
    let cols = width.ok_or_else(|| IoError::Empty { path: path.display().to_string() })?;
    Array2::from_shape_vec((rows, cols), values)
        .map_err(|e| IoError::parse(path, skip + 1, e.to_string()))
}

/// Read a changed-index file; negative entries end a trajectory.
///
/// Integer and float spellings (`3`, `3.0`, `-1.0`) are accepted.
///
/// # Errors
/// - Header errors as in [`read_sample_matrix`]; [`IoError::Parse`] for
///   non-integral values.
pub fn read_changed(path: &Path, skip: Option<usize>) -> IoResult<Vec<Option<usize>>> {
    let lines = read_lines(path)?;
    let skip = header_len(path, &lines, skip)?;
    let changed = data_lines(&lines, skip)
        .map(|(line_no, line)| {
            let v = parse_f64(path, line_no, line)?;
            if v.fract() != 0.0 {
                return Err(IoError::parse(path, line_no, format!("'{line}' is not an index")));
            }
            Ok(if v < 0.0 { None } else { Some(v as usize) })
        })
        .collect::<IoResult<Vec<_>>>()?;
    if changed.is_empty() {
        return Err(IoError::Empty { path: path.display().to_string() });
    }
    Ok(changed)
}
