//! screening::logistic — logistic-with-offset curve and its curvature.
//!
//! `f(x) = L·σ(k(x − x0)) + a` with `σ` the logistic sigmoid. Derivatives are
//! written through `σ(1 − σ)`, which equals `1 / (2(cosh z + 1))` but stays
//! finite for large `|z|`.

/// Parameters `[L, k, x0, a]` of the curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Logistic {
    pub height: f64,
    pub steepness: f64,
    pub midpoint: f64,
    pub offset: f64,
}

/// Stable logistic sigmoid.
pub fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

impl Logistic {
    pub fn from_slice(p: &[f64]) -> Option<Self> {
        match *p {
            [height, steepness, midpoint, offset] => {
                Some(Self { height, steepness, midpoint, offset })
            }
            _ => None,
        }
    }

    pub fn to_array(self) -> [f64; 4] {
        [self.height, self.steepness, self.midpoint, self.offset]
    }

    fn z(&self, x: f64) -> f64 {
        self.steepness * (x - self.midpoint)
    }

    pub fn value(&self, x: f64) -> f64 {
        self.height * sigmoid(self.z(x)) + self.offset
    }

    /// `f'(x) = k·L / (2(cosh z + 1))`.
    pub fn first_derivative(&self, x: f64) -> f64 {
        let s = sigmoid(self.z(x));
        self.steepness * self.height * s * (1.0 - s)
    }

    /// `f''(x) = −k²·L·sinh z / (2(cosh z + 1)²)`.
    pub fn second_derivative(&self, x: f64) -> f64 {
        let s = sigmoid(self.z(x));
        self.steepness.powi(2) * self.height * s * (1.0 - s) * (1.0 - 2.0 * s)
    }

    /// Signed curvature `f'' / (1 + f'²)^{3/2}`.
    pub fn curvature(&self, x: f64) -> f64 {
        let d1 = self.first_derivative(x);
        self.second_derivative(x) / (1.0 + d1 * d1).powf(1.5)
    }

    /// Partial derivatives of `f(x)` with respect to `[L, k, x0, a]`.
    pub fn parameter_gradient(&self, x: f64) -> [f64; 4] {
        let s = sigmoid(self.z(x));
        let ds = self.height * s * (1.0 - s);
        [s, ds * (x - self.midpoint), -ds * self.steepness, 1.0]
    }
}
