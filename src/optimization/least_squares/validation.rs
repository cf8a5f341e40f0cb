//! Validation helpers for the curve-fitting minimizer.
//!
//! - **Tolerance checks**: [`verify_tol_grad`], [`verify_tol_cost`] ensure
//!   numeric tolerances are finite and strictly positive when provided.
//! - **Gradient validation**: [`validate_grad`] enforces correct dimension
//!   and finite entries.
//! - **Parameter estimates**: [`validate_theta_hat`] ensures a candidate
//!   `theta_hat` exists and contains only finite values.
//! - **Objective values**: [`validate_value`] checks costs for finiteness.
use crate::optimization::{
    errors::{OptError, OptResult},
    least_squares::{Grad, Theta},
};

/// Validate the optional gradient‐norm tolerance.
///
/// # Errors
/// Returns [`OptError::InvalidTolGrad`] if the value is non-finite or ≤ 0.0.
pub fn verify_tol_grad(tol: Option<f64>) -> OptResult<()> {
    if let Some(tol) = tol {
        if !tol.is_finite() {
            return Err(OptError::InvalidTolGrad { tol, reason: "Tolerance must be finite." });
        }
        if tol <= 0.0 {
            return Err(OptError::InvalidTolGrad { tol, reason: "Tolerance must be positive." });
        }
    }
    Ok(())
}

/// Validate the optional cost‐change tolerance.
///
/// # Errors
/// Returns [`OptError::InvalidTolCost`] if the value is non-finite or ≤ 0.0.
pub fn verify_tol_cost(tol: Option<f64>) -> OptResult<()> {
    if let Some(tol) = tol {
        if !tol.is_finite() {
            return Err(OptError::InvalidTolCost { tol, reason: "Tolerance must be finite." });
        }
        if tol <= 0.0 {
            return Err(OptError::InvalidTolCost { tol, reason: "Tolerance must be positive." });
        }
    }
    Ok(())
}

/// Validate a gradient vector against dimension and finiteness.
///
/// # Errors
/// - [`OptError::GradientDimMismatch`] if length does not match `dim`.
/// - [`OptError::InvalidGradient`] with the index/value/reason of the first
///   offending element.
pub fn validate_grad(grad: &Grad, dim: usize) -> OptResult<()> {
    if grad.len() != dim {
        return Err(OptError::GradientDimMismatch { expected: dim, found: grad.len() });
    }
    if let Some((index, &value)) = grad.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(OptError::InvalidGradient {
            index,
            value,
            reason: "Gradient elements must be finite.",
        });
    }
    Ok(())
}

/// Validate and unwrap an estimated parameter vector (`theta_hat`).
///
/// # Errors
/// - [`OptError::MissingThetaHat`] if no vector was provided.
/// - [`OptError::InvalidThetaHat`] if any element is non-finite.
pub fn validate_theta_hat(theta_hat: Option<Theta>) -> OptResult<Theta> {
    let theta = theta_hat.ok_or(OptError::MissingThetaHat)?;
    if let Some((index, &value)) = theta.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(OptError::InvalidThetaHat {
            index,
            value,
            reason: "Parameter estimates must be finite.",
        });
    }
    Ok(theta)
}

/// Validate that a scalar cost is finite.
///
/// # Errors
/// Returns [`OptError::NonFiniteCost`] if the value is `NaN` or infinite.
pub fn validate_value(value: f64) -> OptResult<()> {
    if !value.is_finite() {
        return Err(OptError::NonFiniteCost { value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // Tolerance, gradient, estimate, and cost checks. Solver wiring is
    // covered in `builders` and `api`.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Non-positive or non-finite tolerances are rejected; `None` passes.
    //
    // Given
    // -----
    // - `Some(0.0)`, `Some(NaN)`, and `None` for both tolerance kinds.
    //
    // Expect
    // ------
    // - Errors for the first two, `Ok` for `None`.
    fn tolerance_checks_reject_invalid_values() {
        assert!(matches!(verify_tol_grad(Some(0.0)), Err(OptError::InvalidTolGrad { .. })));
        assert!(matches!(verify_tol_cost(Some(f64::NAN)), Err(OptError::InvalidTolCost { .. })));
        assert!(verify_tol_grad(None).is_ok());
        assert!(verify_tol_cost(None).is_ok());
    }

    #[test]
    // Purpose
    // -------
    // `validate_grad` reports the first non-finite entry and length mismatches.
    //
    // Given
    // -----
    // - A gradient with NaN at index 1 and a too-short gradient.
    //
    // Expect
    // ------
    // - `InvalidGradient { index: 1, .. }` and `GradientDimMismatch`.
    fn validate_grad_reports_offending_entry() {
        // Arrange
        let bad = array![0.0, f64::NAN, 1.0];
        let short = array![0.0];

        // Act / Assert
        assert!(matches!(validate_grad(&bad, 3), Err(OptError::InvalidGradient { index: 1, .. })));
        assert_eq!(
            validate_grad(&short, 3),
            Err(OptError::GradientDimMismatch { expected: 3, found: 1 })
        );
    }

    #[test]
    // Purpose
    // -------
    // Missing or non-finite estimates are surfaced as errors.
    //
    // Given
    // -----
    // - `None` and a vector containing `+∞`.
    //
    // Expect
    // ------
    // - `MissingThetaHat` and `InvalidThetaHat` respectively.
    fn validate_theta_hat_requires_finite_vector() {
        assert_eq!(validate_theta_hat(None), Err(OptError::MissingThetaHat));
        assert!(matches!(
            validate_theta_hat(Some(array![1.0, f64::INFINITY])),
            Err(OptError::InvalidThetaHat { index: 1, .. })
        ));
        assert!(validate_value(3.5).is_ok());
    }
}
