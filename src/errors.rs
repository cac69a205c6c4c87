//! Error types for the symexpr crate.
//!
//! This module defines the error types that can occur while evaluating, rewriting and
//! differentiating expression trees. The main error types are:
//!
//! - `ExprError`: Errors raised by the expression tree engine itself
//! - `EquationError`: High-level errors when working with equations and systems
//!
//! All failures are immediate: the engine never retries and never substitutes a
//! sentinel value for a result it cannot compute.

use thiserror::Error;

use crate::expr::Variable;

/// Errors raised by expression nodes and the manipulation routines built on them.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExprError {
    /// The node cannot produce a number (function symbols, vectors, unresolved integrals)
    #[error("expression cannot be evaluated: {0}")]
    NotEvaluable(String),
    /// A scalar value was demanded from a node that is not a constant
    #[error("expression is not a constant: {0}")]
    NotUnwrappable(String),
    /// The operator (or leaf) forbids differentiation
    #[error("expression is not differentiable: {0}")]
    NotDifferentiable(String),
    /// A variable id is not covered by the evaluation point
    #[error("variable index {id} is out of bounds for a point of length {len}")]
    IndexOutOfBounds { id: usize, len: usize },
    /// Division by an exact zero during evaluation or simplification
    #[error("division by zero in {0}")]
    DivisionByZero(String),
    /// Batched substitution was given search and replacement lists of different lengths
    #[error("{targets} substitution targets but {replacements} replacements")]
    ReplacementMismatch { targets: usize, replacements: usize },
    /// Differentiation was requested with respect to something that is neither a
    /// variable nor a function symbol
    #[error("cannot differentiate with respect to {0}")]
    InvalidDiffVariable(String),
    /// Two vector expressions of different length were combined elementwise
    #[error("vector dimensions do not match: {0} vs {1}")]
    DimensionMismatch(usize, usize),
    /// The fixed-point simplification driver exhausted its iteration budget
    #[error("simplification did not reach a fixed point after {0} iterations")]
    SimplifyDidNotConverge(usize),
}

/// High-level errors that can occur when working with equations and equation systems.
///
/// Wraps the lower-level expression errors raised while building residuals and
/// derivatives, and adds the input/output validation failures of the numeric API.
#[derive(Debug, Error)]
pub enum EquationError {
    /// Error raised by the expression engine while building or evaluating
    #[error("expression error: {0}")]
    Expr(#[from] ExprError),
    /// Error when trying to get a derivative for a variable the equation does not contain
    #[error("derivative not found for variable: {0}")]
    DerivativeNotFound(Variable),
    /// Error when an equation uses a variable missing from the declared variable list
    #[error("variable not declared: {0}")]
    VariableNotFound(Variable),
    /// Error when the input does not cover every variable of the equation
    #[error("invalid input length: expected at least {expected}, got {got}")]
    InvalidInputLength { expected: usize, got: usize },
    /// Error when the output buffer does not match the number of equations
    #[error("invalid output length: expected {expected}, got {got}")]
    InvalidOutputLength { expected: usize, got: usize },
}
