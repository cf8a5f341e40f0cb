//! sampling::bounds — per-factor affine box used to rescale unit trajectories.
use ndarray::Array2;

use crate::sampling::errors::{SamplingError, SamplingResult};

/// Finite `[lower, upper]` box, one interval per factor.
#[derive(Debug, Clone, PartialEq)]
pub struct Bounds {
    lower: Vec<f64>,
    upper: Vec<f64>,
}

impl Bounds {
    /// # Errors
    /// - [`SamplingError::BoundsLengthMismatch`] for empty or unequal vectors.
    /// - [`SamplingError::InvalidBounds`] unless every pair is finite with
    ///   `lower < upper`.
    pub fn new(lower: Vec<f64>, upper: Vec<f64>) -> SamplingResult<Self> {
        if lower.is_empty() || lower.len() != upper.len() {
            return Err(SamplingError::BoundsLengthMismatch {
                expected: lower.len().max(upper.len()),
                lower: lower.len(),
                upper: upper.len(),
            });
        }
        for (index, (&lo, &hi)) in lower.iter().zip(upper.iter()).enumerate() {
            if !(lo.is_finite() && hi.is_finite() && lo < hi) {
                return Err(SamplingError::InvalidBounds { index, lower: lo, upper: hi });
            }
        }
        Ok(Self { lower, upper })
    }

    /// The unit hypercube `[0, 1]^k`.
    ///
    /// # Errors
    /// - [`SamplingError::NoFactors`] for `k == 0`.
    pub fn unit(k: usize) -> SamplingResult<Self> {
        if k == 0 {
            return Err(SamplingError::NoFactors);
        }
        Ok(Self { lower: vec![0.0; k], upper: vec![1.0; k] })
    }

    /// Same interval for every one of `k` factors.
    pub fn uniform(k: usize, lower: f64, upper: f64) -> SamplingResult<Self> {
        Self::new(vec![lower; k], vec![upper; k])
    }

    pub fn len(&self) -> usize {
        self.lower.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lower.is_empty()
    }

    pub fn lower(&self) -> &[f64] {
        &self.lower
    }

    pub fn upper(&self) -> &[f64] {
        &self.upper
    }

    /// Map unit coordinates column-wise: `lower_j + x_ij (upper_j − lower_j)`.
    ///
    /// # Errors
    /// - [`SamplingError::FactorCountMismatch`] if the matrix width differs
    ///   from the number of intervals.
    pub fn rescale(&self, unit: &Array2<f64>) -> SamplingResult<Array2<f64>> {
        if unit.ncols() != self.len() {
            return Err(SamplingError::FactorCountMismatch {
                expected: self.len(),
                found: unit.ncols(),
            });
        }
        let mut out = unit.clone();
        for (j, mut col) in out.columns_mut().into_iter().enumerate() {
            let (lo, width) = (self.lower[j], self.upper[j] - self.lower[j]);
            col.mapv_inplace(|x| lo + x * width);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // Rescaling maps 0 to lower and 1 to upper per column.
    //
    // Given
    // -----
    // - Bounds [-π, π] and [2, 4]; unit rows (0, 1) and (1, 0.5).
    //
    // Expect
    // ------
    // - Rows (-π, 4) and (π, 3).
    fn rescale_maps_unit_interval_onto_bounds() {
        let pi = std::f64::consts::PI;
        let b = Bounds::new(vec![-pi, 2.0], vec![pi, 4.0]).expect("valid bounds");
        let out = b.rescale(&array![[0.0, 1.0], [1.0, 0.5]]).expect("rescale");
        assert!((out[[0, 0]] + pi).abs() < 1e-12);
        assert!((out[[0, 1]] - 4.0).abs() < 1e-12);
        assert!((out[[1, 0]] - pi).abs() < 1e-12);
        assert!((out[[1, 1]] - 3.0).abs() < 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Inverted, non-finite, or ragged bounds are rejected.
    //
    // Given
    // -----
    // - [1, 0], [NaN, 1], and lengths 2 vs 1.
    //
    // Expect
    // ------
    // - `InvalidBounds`, `InvalidBounds`, `BoundsLengthMismatch`.
    fn invalid_bounds_are_rejected() {
        assert!(matches!(
            Bounds::new(vec![1.0], vec![0.0]),
            Err(SamplingError::InvalidBounds { index: 0, .. })
        ));
        assert!(matches!(
            Bounds::new(vec![f64::NAN], vec![1.0]),
            Err(SamplingError::InvalidBounds { .. })
        ));
        assert!(matches!(
            Bounds::new(vec![0.0, 0.0], vec![1.0]),
            Err(SamplingError::BoundsLengthMismatch { .. })
        ));
    }
}
