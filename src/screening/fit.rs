//! screening::fit — least-squares fit of the logistic-with-offset curve.
//!
//! The cost is the residual sum of squares `Σ (y_i − f(x_i; θ))²` over the
//! normalized sorted-effects curve, minimized without bounds by L-BFGS with
//! an analytic gradient.
use ndarray::Array1;

use crate::{
    optimization::{
        errors::{OptError, OptResult},
        least_squares::{Cost, FitOptions, FitOutcome, Grad, Objective, Theta, minimize},
    },
    screening::logistic::Logistic,
};

/// Abscissae and ordinates of the curve being fitted.
#[derive(Debug, Clone, PartialEq)]
pub struct CurveData {
    pub x: Array1<f64>,
    pub y: Array1<f64>,
}

/// Residual sum of squares of a [`Logistic`] against [`CurveData`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LogisticLeastSquares;

fn curve(theta: &Theta) -> OptResult<Logistic> {
    Logistic::from_slice(theta.as_slice().unwrap_or(&[])).ok_or_else(|| {
        OptError::InvalidObjectiveData {
            reason: format!("logistic curve needs 4 parameters, got {}", theta.len()),
        }
    })
}

impl Objective for LogisticLeastSquares {
    type Data = CurveData;

    fn value(&self, theta: &Theta, data: &CurveData) -> OptResult<Cost> {
        let c = curve(theta)?;
        Ok(data.x.iter().zip(&data.y).map(|(&x, &y)| (y - c.value(x)).powi(2)).sum())
    }

    fn check(&self, theta: &Theta, data: &CurveData) -> OptResult<()> {
        curve(theta)?;
        if theta.iter().any(|v| !v.is_finite()) {
            return Err(OptError::InvalidObjectiveData {
                reason: "initial logistic parameters must be finite".to_string(),
            });
        }
        if data.x.is_empty() || data.x.len() != data.y.len() {
            return Err(OptError::InvalidObjectiveData {
                reason: format!(
                    "curve needs matching non-empty x/y, got {} and {}",
                    data.x.len(),
                    data.y.len()
                ),
            });
        }
        if data.x.iter().chain(&data.y).any(|v| !v.is_finite()) {
            return Err(OptError::InvalidObjectiveData {
                reason: "curve values must be finite".to_string(),
            });
        }
        Ok(())
    }

    fn grad(&self, theta: &Theta, data: &CurveData) -> OptResult<Grad> {
        let c = curve(theta)?;
        let mut g = Grad::zeros(4);
        for (&x, &y) in data.x.iter().zip(&data.y) {
            let r = y - c.value(x);
            for (gi, di) in g.iter_mut().zip(c.parameter_gradient(x)) {
                *gi -= 2.0 * r * di;
            }
        }
        Ok(g)
    }
}

/// Fit the curve starting from `initial`.
///
/// # Errors
/// - [`OptError::InvalidObjectiveData`] for malformed data or guess.
/// - Optimizer errors from [`minimize`].
pub fn fit_logistic(
    data: &CurveData, initial: [f64; 4], opts: &FitOptions,
) -> OptResult<(Logistic, FitOutcome)> {
    let outcome = minimize(&LogisticLeastSquares, Array1::from(initial.to_vec()), data, opts)?;
    let fitted = curve(&outcome.theta_hat)?;
    Ok((fitted, outcome))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // A sampled logistic is recovered well enough to reproduce its values.
    //
    // Given
    // -----
    // - 15 points of L = 0.9, k = 12, x0 = 0.7, a = 0.05.
    //
    // Expect
    // ------
    // - Fitted values within 5e-3 of the truth on every abscissa.
    fn recovers_sampled_logistic() {
        let truth = Logistic { height: 0.9, steepness: 12.0, midpoint: 0.7, offset: 0.05 };
        let x = Array1::linspace(0.0, 1.0, 15);
        let y = x.mapv(|v| truth.value(v));
        let data = CurveData { x: x.clone(), y };

        let (fitted, outcome) =
            fit_logistic(&data, [1.0, 10.0, 0.5, 0.0], &FitOptions::default()).unwrap();

        assert!(outcome.value < 1e-5, "sse = {}", outcome.value);
        for &v in x.iter() {
            assert!((fitted.value(v) - truth.value(v)).abs() < 5e-3);
        }
    }

    #[test]
    // Purpose
    // -------
    // Mismatched data is rejected before optimizing.
    //
    // Given
    // -----
    // - x of length 3, y of length 2.
    //
    // Expect
    // ------
    // - `InvalidObjectiveData`.
    fn mismatched_data_is_rejected() {
        let data = CurveData { x: Array1::zeros(3), y: Array1::zeros(2) };
        let err = fit_logistic(&data, [1.0, 10.0, 0.5, 0.0], &FitOptions::default()).unwrap_err();
        assert!(matches!(err, OptError::InvalidObjectiveData { .. }));
    }
}
