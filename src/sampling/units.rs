//! sampling::units — changeable units (single factors or groups of factors).
//!
//! Purpose
//! -------
//! Give the generator and the estimator one notion of "what moves in a
//! step": a *unit*. Without groups every factor is its own unit; with a
//! group membership matrix each unit is a named set of factors that move
//! together.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every factor belongs to exactly one unit.
//! - Every unit has at least one member factor.
//! - Unit indices run over `0..n_units()`, factor indices over
//!   `0..n_factors()`.
use ndarray::Array2;

use crate::sampling::errors::{SamplingError, SamplingResult};

/// Factor-to-group assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupMatrix {
    assignment: Vec<usize>,
    n_groups: usize,
    names: Option<Vec<String>>,
}

impl GroupMatrix {
    /// Build from a `k × g` 0/1 membership matrix (column = group).
    ///
    /// Entries greater than 0.5 count as membership.
    ///
    /// # Errors
    /// - [`SamplingError::InvalidGroupMembership`] if a row has zero or
    ///   several memberships.
    /// - [`SamplingError::EmptyGroup`] if a column has no members.
    pub fn from_membership(membership: &Array2<f64>) -> SamplingResult<Self> {
        let n_groups = membership.ncols();
        let mut assignment = Vec::with_capacity(membership.nrows());
        for (factor, row) in membership.rows().into_iter().enumerate() {
            let groups: Vec<usize> =
                row.iter().enumerate().filter(|(_, v)| **v > 0.5).map(|(g, _)| g).collect();
            if groups.len() != 1 {
                return Err(SamplingError::InvalidGroupMembership {
                    factor,
                    memberships: groups.len(),
                });
            }
            assignment.push(groups[0]);
        }
        Self::from_assignment(assignment, n_groups)
    }

    /// Build from the group index of every factor.
    ///
    /// # Errors
    /// - [`SamplingError::NoFactors`] for an empty assignment.
    /// - [`SamplingError::InvalidGroupMembership`] if an index is `≥ n_groups`.
    /// - [`SamplingError::EmptyGroup`] if some group receives no factor.
    pub fn from_assignment(assignment: Vec<usize>, n_groups: usize) -> SamplingResult<Self> {
        if assignment.is_empty() {
            return Err(SamplingError::NoFactors);
        }
        if let Some(factor) = assignment.iter().position(|&g| g >= n_groups) {
            return Err(SamplingError::InvalidGroupMembership { factor, memberships: 0 });
        }
        if let Some(group) = (0..n_groups).find(|g| !assignment.contains(g)) {
            return Err(SamplingError::EmptyGroup { group });
        }
        Ok(Self { assignment, n_groups, names: None })
    }

    /// Attach display names, one per group.
    ///
    /// # Errors
    /// - [`SamplingError::GroupNameMismatch`] when the count differs from
    ///   the number of groups.
    pub fn with_names(mut self, names: Vec<String>) -> SamplingResult<Self> {
        if names.len() != self.n_groups {
            return Err(SamplingError::GroupNameMismatch {
                expected: self.n_groups,
                found: names.len(),
            });
        }
        self.names = Some(names);
        Ok(self)
    }

    pub fn n_factors(&self) -> usize {
        self.assignment.len()
    }

    pub fn n_groups(&self) -> usize {
        self.n_groups
    }

    pub fn group_of(&self, factor: usize) -> usize {
        self.assignment[factor]
    }

    pub fn names(&self) -> Option<&[String]> {
        self.names.as_deref()
    }
}

/// What moves in a single OAT step.
#[derive(Debug, Clone, PartialEq)]
pub enum Units {
    /// Each of the `k` factors is its own unit.
    Factors(usize),
    /// Factors move together in groups.
    Groups(GroupMatrix),
}

impl Units {
    /// # Errors
    /// - [`SamplingError::NoFactors`] for `k == 0`.
    pub fn factors(k: usize) -> SamplingResult<Self> {
        if k == 0 {
            return Err(SamplingError::NoFactors);
        }
        Ok(Units::Factors(k))
    }

    pub fn n_factors(&self) -> usize {
        match self {
            Units::Factors(k) => *k,
            Units::Groups(g) => g.n_factors(),
        }
    }

    pub fn n_units(&self) -> usize {
        match self {
            Units::Factors(k) => *k,
            Units::Groups(g) => g.n_groups(),
        }
    }

    /// Rows per trajectory, `n_units() + 1`.
    pub fn block_len(&self) -> usize {
        self.n_units() + 1
    }

    pub fn unit_of(&self, factor: usize) -> usize {
        match self {
            Units::Factors(_) => factor,
            Units::Groups(g) => g.group_of(factor),
        }
    }

    /// Factor indices moved by `unit`, ascending.
    pub fn members(&self, unit: usize) -> Vec<usize> {
        match self {
            Units::Factors(_) => vec![unit],
            Units::Groups(g) => (0..g.n_factors()).filter(|&f| g.group_of(f) == unit).collect(),
        }
    }

    pub fn is_grouped(&self) -> bool {
        matches!(self, Units::Groups(_))
    }

    /// Display label for a unit: the group name if one was given, else
    /// `None`.
    pub fn unit_name(&self, unit: usize) -> Option<&str> {
        match self {
            Units::Factors(_) => None,
            Units::Groups(g) => g.names().and_then(|n| n.get(unit)).map(String::as_str),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // Construction and validation of group matrices and the unit mapping.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // A membership matrix maps every factor to its group and lists members.
    //
    // Given
    // -----
    // - 4 factors in 2 groups: {0, 2} and {1, 3}.
    //
    // Expect
    // ------
    // - n_units = 2, block_len = 3, members(1) = [1, 3].
    fn membership_matrix_defines_units() {
        // Arrange
        let m = array![[1.0, 0.0], [0.0, 1.0], [1.0, 0.0], [0.0, 1.0]];

        // Act
        let units = Units::Groups(GroupMatrix::from_membership(&m).expect("valid groups"));

        // Assert
        assert_eq!(units.n_factors(), 4);
        assert_eq!(units.n_units(), 2);
        assert_eq!(units.block_len(), 3);
        assert_eq!(units.unit_of(2), 0);
        assert_eq!(units.members(1), vec![1, 3]);
    }

    #[test]
    // Purpose
    // -------
    // Factors in zero or two groups, and empty groups, are rejected.
    //
    // Given
    // -----
    // - A row with two memberships; an assignment leaving group 1 empty.
    //
    // Expect
    // ------
    // - `InvalidGroupMembership` and `EmptyGroup`.
    fn invalid_memberships_are_rejected() {
        let twice = array![[1.0, 1.0], [0.0, 1.0]];
        assert_eq!(
            GroupMatrix::from_membership(&twice),
            Err(SamplingError::InvalidGroupMembership { factor: 0, memberships: 2 })
        );
        assert_eq!(
            GroupMatrix::from_assignment(vec![0, 0, 2], 3),
            Err(SamplingError::EmptyGroup { group: 1 })
        );
    }

    #[test]
    // Purpose
    // -------
    // Without groups, units and factors coincide.
    //
    // Given
    // -----
    // - `Units::factors(3)`.
    //
    // Expect
    // ------
    // - unit_of(f) == f, members(f) == [f], zero factors rejected.
    fn factor_units_are_identity() {
        let units = Units::factors(3).expect("valid units");
        assert_eq!(units.unit_of(2), 2);
        assert_eq!(units.members(1), vec![1]);
        assert!(!units.is_grouped());
        assert_eq!(Units::factors(0), Err(SamplingError::NoFactors));
    }
}
