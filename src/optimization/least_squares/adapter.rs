//! Adapter that exposes a user [`Objective`] as an `argmin` problem.
//!
//! The cost is passed through unchanged. When the objective has no analytic
//! gradient, the **cost** closure is finite-differenced: central differences
//! first, forward differences when a central probe fails or yields a
//! non-finite gradient.
use std::cell::RefCell;

use crate::optimization::{
    errors::OptError,
    least_squares::{
        traits::Objective,
        types::{Cost, Grad, Theta},
        validation::validate_grad,
    },
};
use argmin::core::{CostFunction, Error, Gradient};
use finitediff::FiniteDiff;

/// Bridges a user [`Objective`] to `argmin`'s `CostFunction` and `Gradient`.
#[derive(Debug, Clone)]
pub struct ArgMinAdapter<'a, F: Objective> {
    pub f: &'a F,
    pub data: &'a F::Data,
}

impl<'a, F: Objective> CostFunction for ArgMinAdapter<'a, F> {
    type Param = Theta;
    type Output = Cost;

    /// Evaluate `c(θ)` and reject non-finite values with `NonFiniteCost`.
    fn cost(&self, theta: &Self::Param) -> Result<Self::Output, Error> {
        let output = self.f.value(theta, self.data)?;
        if !output.is_finite() {
            return Err((OptError::NonFiniteCost { value: output }).into());
        }
        Ok(output)
    }
}

impl<'a, F: Objective> Gradient for ArgMinAdapter<'a, F> {
    type Param = Theta;
    type Gradient = Grad;

    /// Evaluate `∇c(θ)`.
    ///
    /// - An analytic gradient from `grad(θ, data)` is validated and returned.
    /// - On `GradientNotImplemented`, a central-difference gradient of the
    ///   cost is computed. If any probe failed (captured in `closure_err`)
    ///   or the result is non-finite, forward differences are tried once.
    ///
    /// The FD closure must return `f64`, so the first probe error is stashed
    /// in `closure_err` and the closure yields `NaN`.
    ///
    /// # Errors
    /// - Propagates user errors from `grad` other than `GradientNotImplemented`.
    /// - Propagates errors raised by cost evaluations during forward FD.
    /// - Returns validation errors for wrong dimension or non-finite entries.
    fn gradient(&self, theta: &Self::Param) -> Result<Self::Gradient, Error> {
        let dim = theta.len();
        match self.f.grad(theta, self.data) {
            Ok(g) => {
                validate_grad(&g, dim)?;
                Ok(g)
            }
            Err(OptError::GradientNotImplemented) => {
                let closure_err: RefCell<Option<Error>> = RefCell::new(None);
                let cost_func = |theta: &Theta| -> f64 {
                    match self.cost(theta) {
                        Ok(val) => val,
                        Err(e) => {
                            let mut slot = closure_err.borrow_mut();
                            if slot.is_none() {
                                *slot = Some(e);
                            }
                            f64::NAN
                        }
                    }
                };
                let fd_grad = theta.central_diff(&cost_func);
                if closure_err.borrow().is_some() || validate_grad(&fd_grad, dim).is_err() {
                    return run_forward_diff(theta, &cost_func, &closure_err);
                }
                Ok(fd_grad)
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl<'a, F: Objective> ArgMinAdapter<'a, F> {
    /// Construct a new adapter over a user objective and its data.
    pub fn new(f: &'a F, data: &'a F::Data) -> Self {
        Self { f, data }
    }
}

/// Forward-difference gradient of `func` at `theta`, with error capture.
///
/// # Errors
/// Returns any error captured during evaluation of `func` inside the FD
/// routine, or the validation error of the resulting gradient.
fn run_forward_diff<G: Fn(&Theta) -> f64>(
    theta: &Theta, func: &G, closure_err: &RefCell<Option<Error>>,
) -> Result<Grad, Error> {
    closure_err.replace(None);
    let fd_grad = theta.forward_diff(func);
    if let Some(err) = closure_err.take() {
        return Err(err);
    }
    validate_grad(&fd_grad, theta.len())?;
    Ok(fd_grad)
}
