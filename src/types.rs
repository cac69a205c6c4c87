use std::sync::Arc;

use crate::errors::ExprError;

/// Type alias for a black-box scalar function built from an expression tree.
///
/// This represents a function that:
/// - Takes a slice of input values indexed by variable id
/// - Returns the value of the expression at that point, or the evaluation error
/// - Is both Send and Sync so downstream solvers can share it freely
pub type ScalarFunction = Arc<dyn Fn(&[f64]) -> Result<f64, ExprError> + Send + Sync>;

/// Type alias for a function that evaluates several expressions into an output buffer.
///
/// This represents a function that:
/// - Takes a slice of input values indexed by variable id
/// - Takes a mutable slice to store the results, one per expression
/// - Fails on the first expression that cannot be evaluated
pub type CombinedFunction = Arc<dyn Fn(&[f64], &mut [f64]) -> Result<(), ExprError> + Send + Sync>;
