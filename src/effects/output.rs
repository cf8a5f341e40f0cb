//! effects::output — model outputs aligned with sample rows.
use ndarray::{Array1, Array2, Zip};

/// Values of one objective at every sample row.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectiveOutput {
    /// One number per row.
    Scalar(Array1<f64>),
    /// One series per row (`rows × len`), e.g. a simulated time series.
    Series(Array2<f64>),
}

impl ObjectiveOutput {
    pub fn n_rows(&self) -> usize {
        match self {
            ObjectiveOutput::Scalar(v) => v.len(),
            ObjectiveOutput::Series(m) => m.nrows(),
        }
    }

    pub fn is_series(&self) -> bool {
        matches!(self, ObjectiveOutput::Series(_))
    }

    /// Signed difference `y[to] − y[from]` for scalars; for series the
    /// elementwise mean of `|y[to] − y[from]|`, which carries no sign.
    pub(crate) fn difference(&self, from: usize, to: usize) -> f64 {
        match self {
            ObjectiveOutput::Scalar(v) => v[to] - v[from],
            ObjectiveOutput::Series(m) => {
                let mut acc = 0.0;
                Zip::from(m.row(to)).and(m.row(from)).for_each(|&a, &b| acc += (a - b).abs());
                acc / m.ncols() as f64
            }
        }
    }
}

/// Named objective.
#[derive(Debug, Clone, PartialEq)]
pub struct Objective {
    pub name: String,
    pub output: ObjectiveOutput,
}

impl Objective {
    pub fn new(name: impl Into<String>, output: ObjectiveOutput) -> Self {
        Self { name: name.into(), output }
    }

    pub fn scalar(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self::new(name, ObjectiveOutput::Scalar(Array1::from(values)))
    }
}
