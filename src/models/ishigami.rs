//! models::ishigami — Ishigami–Homma test function.
//!
//! `f(x) = sin x1 + a·sin² x2 + b·x3⁴·sin x1` on `[-π, π]³`. With `b > 0`
//! all three factors matter; `x3` acts only through its interaction with `x1`.
use crate::models::{
    errors::{ModelError, ModelResult},
    traits::Model,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IshigamiHomma {
    pub a: f64,
    pub b: f64,
}

impl IshigamiHomma {
    /// # Errors
    /// - [`ModelError::InvalidModelParameter`] for non-finite constants.
    pub fn new(a: f64, b: f64) -> ModelResult<Self> {
        if !a.is_finite() {
            return Err(ModelError::InvalidModelParameter { name: "a", value: a });
        }
        if !b.is_finite() {
            return Err(ModelError::InvalidModelParameter { name: "b", value: b });
        }
        Ok(Self { a, b })
    }

    pub fn value(&self, x1: f64, x2: f64, x3: f64) -> f64 {
        x1.sin() + self.a * x2.sin().powi(2) + self.b * x3.powi(4) * x1.sin()
    }
}

impl Default for IshigamiHomma {
    fn default() -> Self {
        Self { a: 2.0, b: 1.0 }
    }
}

impl Model for IshigamiHomma {
    type Output = f64;

    fn objective_names(&self) -> Vec<String> {
        vec!["ishigami-homma".to_string()]
    }

    fn evaluate(&self, params: &[f64]) -> ModelResult<Vec<f64>> {
        match *params {
            [x1, x2, x3] => Ok(vec![self.value(x1, x2, x3)]),
            _ => Err(ModelError::InputDimMismatch { expected: 3, found: params.len() }),
        }
    }
}
