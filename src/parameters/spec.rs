//! parameters::spec — parameter records and the ordered parameter set.
//!
//! Purpose
//! -------
//! Represent the static parameter table a screening iteration starts from:
//! name, distribution, the two distribution arguments, default value, and
//! whether the parameter takes part in the current iteration.
//!
//! Invariants & assumptions
//! ------------------------
//! - Uniform: `lower < upper`, both finite.
//! - Gaussian: `lower` is the mean (finite), `upper` the standard
//!   deviation (finite, `> 0`).
//! - Defaults are finite; excluded parameters are pinned to them.
//! - A [`ParameterSet`] is never edited in place; inclusion updates return
//!   a new set.
use std::{fmt, str::FromStr};

use crate::parameters::errors::{ParamError, ParamResult};

/// Sampling distribution of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Distribution {
    /// `Uniform[lower, upper]`.
    Uniform,
    /// `Normal(mean = lower, stddev = upper)`.
    Gaussian,
}

impl FromStr for Distribution {
    type Err = ParamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "uniform" => Ok(Distribution::Uniform),
            "gaussian" => Ok(Distribution::Gaussian),
            _ => Err(ParamError::UnsupportedDistribution { name: s.to_string() }),
        }
    }
}

impl fmt::Display for Distribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Distribution::Uniform => write!(f, "uniform"),
            Distribution::Gaussian => write!(f, "gaussian"),
        }
    }
}

/// One row of the parameter table.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSpec {
    pub name: String,
    pub distribution: Distribution,
    pub lower: f64,
    pub upper: f64,
    pub default: f64,
    pub included: bool,
}

impl ParameterSpec {
    /// Build a validated record.
    ///
    /// # Errors
    /// - [`ParamError::InvalidName`] for empty or whitespace-containing names.
    /// - [`ParamError::InvalidUniformRange`] / [`ParamError::InvalidGaussian`]
    ///   when the distribution arguments violate the invariants.
    /// - [`ParamError::NonFiniteDefault`] for a non-finite default.
    pub fn new(
        name: impl Into<String>, distribution: Distribution, lower: f64, upper: f64,
        default: f64, included: bool,
    ) -> ParamResult<Self> {
        let name = name.into();
        if name.is_empty() || name.chars().any(char::is_whitespace) {
            return Err(ParamError::InvalidName { name });
        }
        match distribution {
            Distribution::Uniform => {
                if !(lower.is_finite() && upper.is_finite() && lower < upper) {
                    return Err(ParamError::InvalidUniformRange { name, lower, upper });
                }
            }
            Distribution::Gaussian => {
                if !(lower.is_finite() && upper.is_finite() && upper > 0.0) {
                    return Err(ParamError::InvalidGaussian { name, mean: lower, stddev: upper });
                }
            }
        }
        if !default.is_finite() {
            return Err(ParamError::NonFiniteDefault { name, value: default });
        }
        Ok(Self { name, distribution, lower, upper, default, included })
    }

    /// Shorthand for an included uniform parameter with default at the midpoint.
    pub fn uniform(name: impl Into<String>, lower: f64, upper: f64) -> ParamResult<Self> {
        Self::new(name, Distribution::Uniform, lower, upper, 0.5 * (lower + upper), true)
    }
}

/// Ordered list of parameter records; positions are the global indices.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParameterSet {
    specs: Vec<ParameterSpec>,
}

impl ParameterSet {
    pub fn new(specs: Vec<ParameterSpec>) -> Self {
        Self { specs }
    }

    pub fn specs(&self) -> &[ParameterSpec] {
        &self.specs
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ParameterSpec> {
        self.specs.get(index)
    }

    pub fn names(&self) -> Vec<&str> {
        self.specs.iter().map(|s| s.name.as_str()).collect()
    }

    /// Inclusion flag per parameter.
    pub fn mask(&self) -> Vec<bool> {
        self.specs.iter().map(|s| s.included).collect()
    }

    /// Global indices of included parameters, ascending.
    pub fn included_indices(&self) -> Vec<usize> {
        self.specs.iter().enumerate().filter(|(_, s)| s.included).map(|(i, _)| i).collect()
    }

    pub fn n_included(&self) -> usize {
        self.specs.iter().filter(|s| s.included).count()
    }

    /// Default value of every parameter.
    pub fn defaults(&self) -> Vec<f64> {
        self.specs.iter().map(|s| s.default).collect()
    }

    /// Copy with inclusion flags replaced by `mask`.
    ///
    /// # Errors
    /// - [`ParamError::MaskLengthMismatch`] for a mask of the wrong length.
    pub fn with_mask(&self, mask: &[bool]) -> ParamResult<ParameterSet> {
        if mask.len() != self.specs.len() {
            return Err(ParamError::MaskLengthMismatch {
                expected: self.specs.len(),
                found: mask.len(),
            });
        }
        let specs = self
            .specs
            .iter()
            .zip(mask)
            .map(|(s, &included)| ParameterSpec { included, ..s.clone() })
            .collect();
        Ok(ParameterSet { specs })
    }
}

impl FromIterator<ParameterSpec> for ParameterSet {
    fn from_iter<I: IntoIterator<Item = ParameterSpec>>(iter: I) -> Self {
        Self { specs: iter.into_iter().collect() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Distribution names parse case-insensitively; anything else fails loudly.
    //
    // Given
    // -----
    // - "Uniform", "GAUSSIAN", "lognormal".
    //
    // Expect
    // ------
    // - Two variants, then `UnsupportedDistribution`.
    fn distribution_parsing_is_case_insensitive() {
        assert_eq!("Uniform".parse::<Distribution>(), Ok(Distribution::Uniform));
        assert_eq!("GAUSSIAN".parse::<Distribution>(), Ok(Distribution::Gaussian));
        assert_eq!(
            "lognormal".parse::<Distribution>(),
            Err(ParamError::UnsupportedDistribution { name: "lognormal".to_string() })
        );
    }

    #[test]
    // Purpose
    // -------
    // Range invariants are enforced per distribution.
    //
    // Given
    // -----
    // - Uniform [2, 1]; Gaussian with stddev 0; Gaussian with negative mean.
    //
    // Expect
    // ------
    // - Errors for the first two; the third is valid.
    fn spec_validation_follows_distribution() {
        assert!(matches!(
            ParameterSpec::new("a", Distribution::Uniform, 2.0, 1.0, 1.5, true),
            Err(ParamError::InvalidUniformRange { .. })
        ));
        assert!(matches!(
            ParameterSpec::new("b", Distribution::Gaussian, 0.0, 0.0, 0.0, true),
            Err(ParamError::InvalidGaussian { .. })
        ));
        assert!(ParameterSpec::new("c", Distribution::Gaussian, -3.0, 0.5, -3.0, false).is_ok());
    }

    #[test]
    // Purpose
    // -------
    // `with_mask` returns a new set and leaves the original untouched.
    //
    // Given
    // -----
    // - Three included parameters and mask [true, false, true].
    //
    // Expect
    // ------
    // - New set includes {0, 2}; original still includes all three.
    fn with_mask_returns_new_set() {
        let set: ParameterSet = ["x1", "x2", "x3"]
            .iter()
            .map(|n| ParameterSpec::uniform(*n, 0.0, 1.0).expect("spec"))
            .collect();
        let next = set.with_mask(&[true, false, true]).expect("mask");
        assert_eq!(next.included_indices(), vec![0, 2]);
        assert_eq!(set.n_included(), 3);
        assert!(matches!(set.with_mask(&[true]), Err(ParamError::MaskLengthMismatch { .. })));
    }
}
