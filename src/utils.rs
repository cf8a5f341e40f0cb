//! utils — conversion helpers for the Python surface.
//!
//! Inputs arrive as numpy arrays, pandas objects (via `to_numpy`) or plain
//! Python sequences. Each helper tries the zero-copy numpy path first and
//! falls back to extracting a Rust vector.
#[cfg(feature = "python-bindings")]
use ndarray::Array2;

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyTypeError, exceptions::PyValueError, prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use numpy::{
    IntoPyArray,    // Vec → PyArray
    PyArrayMethods, // .readonly()
    PyReadonlyArray1,
    PyReadonlyArray2,
};

#[cfg(feature = "python-bindings")]
#[inline]
pub fn extract_f64_array<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>,
) -> PyResult<PyReadonlyArray1<'py, f64>> {
    if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArray1<f64>>() {
        if arr_ro.as_slice().is_ok() {
            return Ok(arr_ro);
        }
    }

    if let Ok(obj) = raw_data.call_method("to_numpy", (false,), None) {
        if let Ok(series_ro) = obj.extract::<PyReadonlyArray1<f64>>() {
            if series_ro.as_slice().is_ok() {
                return Ok(series_ro);
            }
        }
    }

    let vec: Vec<f64> = raw_data.extract().map_err(|_| {
        PyTypeError::new_err("expected a 1-D numpy.ndarray, pandas.Series, or sequence of float64")
    })?;
    Ok(vec.into_pyarray(py).readonly())
}

/// Two-dimensional `f64` input as an owned matrix.
#[cfg(feature = "python-bindings")]
pub fn extract_f64_matrix(raw_data: &Bound<'_, PyAny>) -> PyResult<Array2<f64>> {
    if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArray2<f64>>() {
        return Ok(arr_ro.as_array().to_owned());
    }

    if let Ok(obj) = raw_data.call_method("to_numpy", (), None) {
        if let Ok(frame_ro) = obj.extract::<PyReadonlyArray2<f64>>() {
            return Ok(frame_ro.as_array().to_owned());
        }
    }

    let rows: Vec<Vec<f64>> = raw_data.extract().map_err(|_| {
        PyTypeError::new_err("expected a 2-D numpy.ndarray, pandas.DataFrame, or nested sequence of float64")
    })?;
    let n_cols = rows.first().map_or(0, Vec::len);
    if rows.iter().any(|r| r.len() != n_cols) {
        return Err(PyValueError::new_err("all rows must have the same length"));
    }
    let n_rows = rows.len();
    Array2::from_shape_vec((n_rows, n_cols), rows.into_iter().flatten().collect())
        .map_err(|e| PyValueError::new_err(e.to_string()))
}

/// Changed-index vector with negative entries as trajectory ends.
#[cfg(feature = "python-bindings")]
pub fn extract_changed(raw_data: &Bound<'_, PyAny>) -> PyResult<Vec<Option<usize>>> {
    let values: Vec<i64> = raw_data
        .extract()
        .map_err(|_| PyTypeError::new_err("expected a sequence of integers (-1 ends a trajectory)"))?;
    Ok(values.into_iter().map(|v| usize::try_from(v).ok()).collect())
}

/// Inverse of [`extract_changed`].
#[cfg(feature = "python-bindings")]
pub fn changed_to_py(changed: &[Option<usize>]) -> Vec<i64> {
    changed.iter().map(|c| c.map_or(-1, |v| v as i64)).collect()
}
