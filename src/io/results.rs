//! io::results — elementary-effects results file and cutoff files.
//!
//! Results layout:
//! ```text
//! # model output #1: <name>
//! # model output #2: <name>
//! # ii     para_name    elemeffect(ii),ii=1:<n>,jj=1:<m>      counter(ii),ii=1:<n>,jj=1:<m>
//! 0   x_1   0.53458196 0.12000000   5 5
//! ```
//! Cutoff files hold the literal `cutoff` followed by the value.
use std::{
    io::Write,
    path::{Path, PathBuf},
};

use ndarray::Array2;

use crate::{
    effects::stats::EffectMatrix,
    io::{
        errors::{IoError, IoResult},
        text::{create, parse_f64, read_lines},
    },
    screening::combine::CutoffSet,
};

const OBJECTIVE_PREFIX: &str = "# model output #";

/// Write the results file for `effects`, one row per parameter.
///
/// # Errors
/// - [`IoError::Io`] on filesystem failure.
/// - [`IoError::Parse`] when `names` does not name every parameter row.
pub fn write_effects(path: &Path, names: &[&str], effects: &EffectMatrix) -> IoResult<()> {
    if names.len() != effects.n_params() {
        return Err(IoError::parse(
            path,
            0,
            format!("{} parameter names for {} rows", names.len(), effects.n_params()),
        ));
    }
    let (n, m) = (effects.n_params(), effects.n_objectives());
    let mut w = create(path)?;
    let result = (|| {
        for (j, obj) in effects.objectives().iter().enumerate() {
            writeln!(w, "{OBJECTIVE_PREFIX}{}: {obj}", j + 1)?;
        }
        writeln!(
            w,
            "# ii     para_name    elemeffect(ii),ii=1:{n},jj=1:{m}      counter(ii),ii=1:{n},jj=1:{m}"
        )?;
        for (i, name) in names.iter().enumerate() {
            let ee: Vec<String> = effects.values().row(i).iter().map(|v| format!("{v:.8}")).collect();
            let counts: Vec<String> = effects.counts().row(i).iter().map(usize::to_string).collect();
            writeln!(w, "{i}   {name}   {}   {}", ee.join(" "), counts.join(" "))?;
        }
        w.flush()
    })();
    result.map_err(|e| IoError::io(path, e))
}

/// Parsed results file.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectsFile {
    pub names: Vec<String>,
    pub effects: EffectMatrix,
}

/// Read a results file written by [`write_effects`].
///
/// # Errors
/// - [`IoError::Header`] when no objective line is present.
/// - [`IoError::ColumnCount`] / [`IoError::Parse`] for malformed rows.
pub fn read_effects(path: &Path) -> IoResult<EffectsFile> {
    let lines = read_lines(path)?;
    let objectives: Vec<String> = lines
        .iter()
        .map_while(|l| l.strip_prefix(OBJECTIVE_PREFIX))
        .map(|rest| rest.split_once(':').map(|(_, name)| name.trim().to_string()).unwrap_or_default())
        .collect();
    let m = objectives.len();
    if m == 0 {
        return Err(IoError::Header {
            path: path.display().to_string(),
            message: format!("missing '{OBJECTIVE_PREFIX}' lines"),
        });
    }

    let mut names = Vec::new();
    let mut values = Vec::new();
    let mut counts = Vec::new();
    for (i, raw) in lines.iter().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() != 2 + 2 * m {
            return Err(IoError::ColumnCount {
                path: path.display().to_string(),
                line: i + 1,
                expected: 2 + 2 * m,
                found: tokens.len(),
            });
        }
        names.push(tokens[1].to_string());
        for t in &tokens[2..2 + m] {
            values.push(parse_f64(path, i + 1, t)?);
        }
        for t in &tokens[2 + m..] {
            let c = t.parse::<usize>().map_err(|e| IoError::parse(path, i + 1, format!("'{t}': {e}")))?;
            counts.push(c);
        }
    }
    if names.is_empty() {
        return Err(IoError::Empty { path: path.display().to_string() });
    }
    let n = names.len();
    let shape_err = |e: ndarray::ShapeError| IoError::parse(path, 0, e.to_string());
    let values = Array2::from_shape_vec((n, m), values).map_err(shape_err)?;
    let counts = Array2::from_shape_vec((n, m), counts).map_err(shape_err)?;
    Ok(EffectsFile { names, effects: EffectMatrix::new(objectives, values, counts)? })
}

/// Path of the cutoff file for objective `index` (0-based): `cutoff_<index+1>.dat`.
pub fn cutoff_path(dir: &Path, index: usize) -> PathBuf {
    dir.join(format!("cutoff_{}.dat", index + 1))
}

/// Write one cutoff file.
///
/// # Errors
/// - [`IoError::Io`] on filesystem failure.
pub fn write_cutoff(path: &Path, value: f64) -> IoResult<()> {
    let mut w = create(path)?;
    writeln!(w, "cutoff\n{value}").and_then(|_| w.flush()).map_err(|e| IoError::io(path, e))
}

/// Write every cutoff of `set` into `dir`, returning the written paths.
///
/// # Errors
/// - [`IoError::Io`] on filesystem failure.
pub fn write_cutoffs(dir: &Path, set: &CutoffSet) -> IoResult<Vec<PathBuf>> {
    set.cutoffs
        .iter()
        .enumerate()
        .map(|(j, c)| {
            let path = cutoff_path(dir, j);
            write_cutoff(&path, c.value).map(|_| path)
        })
        .collect()
}

/// Read a cutoff file.
///
/// # Errors
/// - [`IoError::Header`] when the first line is not `cutoff`.
/// - [`IoError::Parse`] / [`IoError::Empty`] for a missing or bad value.
pub fn read_cutoff(path: &Path) -> IoResult<f64> {
    let lines = read_lines(path)?;
    if lines.first().map(|l| l.trim()) != Some("cutoff") {
        return Err(IoError::Header {
            path: path.display().to_string(),
            message: "first line must be 'cutoff'".to_string(),
        });
    }
    let value = lines.get(1).ok_or_else(|| IoError::Empty { path: path.display().to_string() })?;
    parse_f64(path, 2, value.trim())
}
