//! Integration domains carried by the integral operators.
//!
//! A definite integral carries a concrete [`Interval`]; a symbolic integral carries a
//! [`SymbolicInterval`] placeholder that is bound to a concrete interval later through
//! interval substitution.

use std::fmt;

use crate::expr::same_constant;

/// A closed numeric interval `[lower, upper]`.
#[derive(Debug, Clone, Copy)]
pub struct Interval {
    pub lower: f64,
    pub upper: f64,
}

impl Interval {
    pub fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    /// Signed length `upper - lower`.
    pub fn length(&self) -> f64 {
        self.upper - self.lower
    }
}

impl PartialEq for Interval {
    fn eq(&self, other: &Interval) -> bool {
        same_constant(self.lower, other.lower) && same_constant(self.upper, other.upper)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.lower, self.upper)
    }
}

/// Placeholder integration domain, identified by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolicInterval {
    pub id: usize,
}

impl SymbolicInterval {
    pub fn new(id: usize) -> Self {
        Self { id }
    }
}

impl fmt::Display for SymbolicInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "I{}", self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_length() {
        assert_eq!(Interval::new(-1.0, 2.0).length(), 3.0);
        assert_eq!(Interval::new(2.0, 1.0).length(), -1.0);
    }

    #[test]
    fn test_display() {
        assert_eq!(Interval::new(0.0, 1.5).to_string(), "[0, 1.5]");
        assert_eq!(SymbolicInterval::new(3).to_string(), "I3");
    }
}
