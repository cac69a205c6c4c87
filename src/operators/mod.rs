//! Operator objects for unary and binary expression nodes.
//!
//! Every composite node carries one operator. The operator kind is a closed enum, and each
//! behaviour that depends on it (application, rewrite rules, differentiation) is a single
//! `match` in this module that forwards to the per-operator hook functions living in the
//! submodules:
//!
//! - `arithmetic`: `+`, `-`, `*`, `/`, negation, identity and modulus
//! - `pow`: exponentiation
//! - `exp`, `ln`, `sqrt`, `trigonometric`: elementary functions
//! - `calculus`: gradient, divergence, partial derivative and integrals
//!
//! Simplification and the `can_simplify` predicate share one rule lookup
//! ([`unary_rule`] / [`binary_rule`]) so the two can never disagree.

use std::fmt;

use crate::derivative::Wrt;
use crate::errors::ExprError;
use crate::expr::Expr;
use crate::interval::{Interval, SymbolicInterval};

pub(crate) mod arithmetic;
pub(crate) mod calculus;
pub(crate) mod exp;
pub(crate) mod ln;
pub(crate) mod pow;
pub(crate) mod sqrt;
pub(crate) mod trigonometric;

/// Operator of a unary expression node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UnaryOp {
    /// Passes its operand through unchanged
    Identity,
    /// Arithmetic negation
    Neg,
    /// Exponential function
    Exp,
    /// Sine (radians)
    Sin,
    /// Cosine (radians)
    Cos,
    /// Tangent (radians)
    Tan,
    /// Modulus `|x|`
    Abs,
    /// Square root
    Sqrt,
    /// Natural logarithm
    Ln,
    /// Base-10 logarithm
    Log10,
    /// Spatial gradient of a field
    Gradient,
    /// Divergence of a vector field
    Divergence,
    /// Partial derivative with respect to the variable with the given id
    Partial(usize),
    /// Definite integral over an interval with respect to the variable with the given id
    Integral(Interval, usize),
    /// Integral over a placeholder domain that is bound later
    SymbolicIntegral(SymbolicInterval),
}

impl UnaryOp {
    /// Applies the operator to a number.
    ///
    /// Differential and integral operators act on functions, not numbers, and fail with
    /// `ExprError::NotEvaluable`.
    pub fn apply(&self, x: f64) -> Result<f64, ExprError> {
        match self {
            UnaryOp::Identity => Ok(x),
            UnaryOp::Neg => Ok(-x),
            UnaryOp::Exp => Ok(x.exp()),
            UnaryOp::Sin => Ok(x.sin()),
            UnaryOp::Cos => Ok(x.cos()),
            UnaryOp::Tan => Ok(x.tan()),
            UnaryOp::Abs => Ok(x.abs()),
            UnaryOp::Sqrt => Ok(x.sqrt()),
            UnaryOp::Ln => Ok(x.ln()),
            UnaryOp::Log10 => Ok(x.log10()),
            UnaryOp::Gradient
            | UnaryOp::Divergence
            | UnaryOp::Partial(_)
            | UnaryOp::Integral(..)
            | UnaryOp::SymbolicIntegral(_) => Err(ExprError::NotEvaluable(self.to_string())),
        }
    }

    /// Returns true for operators that map numbers to numbers.
    pub fn is_pointwise(&self) -> bool {
        !matches!(
            self,
            UnaryOp::Gradient
                | UnaryOp::Divergence
                | UnaryOp::Partial(_)
                | UnaryOp::Integral(..)
                | UnaryOp::SymbolicIntegral(_)
        )
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnaryOp::Identity => write!(f, "id"),
            UnaryOp::Neg => write!(f, "-"),
            UnaryOp::Exp => write!(f, "exp"),
            UnaryOp::Sin => write!(f, "sin"),
            UnaryOp::Cos => write!(f, "cos"),
            UnaryOp::Tan => write!(f, "tan"),
            UnaryOp::Abs => write!(f, "abs"),
            UnaryOp::Sqrt => write!(f, "sqrt"),
            UnaryOp::Ln => write!(f, "log"),
            UnaryOp::Log10 => write!(f, "log10"),
            UnaryOp::Gradient => write!(f, "grad"),
            UnaryOp::Divergence => write!(f, "div"),
            UnaryOp::Partial(id) => write!(f, "d/dx{id}"),
            UnaryOp::Integral(interval, id) => write!(f, "int{interval} dx{id}"),
            UnaryOp::SymbolicIntegral(domain) => write!(f, "int{domain}"),
        }
    }
}

/// Operator of a binary expression node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl BinaryOp {
    /// Applies the operator to two numbers.
    ///
    /// Division by an exact zero fails with `ExprError::DivisionByZero` instead of
    /// producing an infinity.
    pub fn apply(&self, lhs: f64, rhs: f64) -> Result<f64, ExprError> {
        match self {
            BinaryOp::Add => Ok(lhs + rhs),
            BinaryOp::Sub => Ok(lhs - rhs),
            BinaryOp::Mul => Ok(lhs * rhs),
            BinaryOp::Div if rhs == 0.0 => {
                Err(ExprError::DivisionByZero(format!("({lhs} / {rhs})")))
            }
            BinaryOp::Div => Ok(lhs / rhs),
            BinaryOp::Pow => Ok(lhs.powf(rhs)),
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Pow => "^",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Rewrite selected for a unary node.
///
/// The lookup only inspects the operand; building the rewritten tree is left to the
/// simplifier so that `can_simplify` stays allocation free.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum UnaryRewrite {
    Const(f64),
    /// Replace the node with its operand
    Operand,
    /// Replace the node with the operand of its (unary) operand
    InnerOperand,
}

/// Rewrite selected for a binary node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum BinaryRewrite {
    Const(f64),
    Lhs,
    Rhs,
    /// The node denotes a division by zero
    DivisionByZero,
}

/// Looks up the rewrite rule for a unary node, if any applies.
pub(crate) fn unary_rule(op: &UnaryOp, operand: &Expr) -> Option<UnaryRewrite> {
    match op {
        UnaryOp::Identity => Some(UnaryRewrite::Operand),
        UnaryOp::Neg => arithmetic::neg_rule(operand),
        UnaryOp::Abs => arithmetic::abs_rule(operand),
        UnaryOp::Exp => exp::exp_rule(operand),
        UnaryOp::Ln => ln::ln_rule(operand),
        UnaryOp::Log10 => ln::log10_rule(operand),
        UnaryOp::Sqrt => sqrt::sqrt_rule(operand),
        UnaryOp::Sin | UnaryOp::Cos | UnaryOp::Tan => trigonometric::trig_rule(op, operand),
        UnaryOp::Gradient | UnaryOp::Divergence | UnaryOp::Partial(_) => {
            calculus::differential_rule(operand)
        }
        UnaryOp::Integral(interval, _) => calculus::integral_rule(interval, operand),
        UnaryOp::SymbolicIntegral(_) => calculus::symbolic_integral_rule(operand),
    }
}

/// Looks up the rewrite rule for a binary node, if any applies.
pub(crate) fn binary_rule(op: BinaryOp, lhs: &Expr, rhs: &Expr) -> Option<BinaryRewrite> {
    match op {
        BinaryOp::Add => arithmetic::add_rule(lhs, rhs),
        BinaryOp::Sub => arithmetic::sub_rule(lhs, rhs),
        BinaryOp::Mul => arithmetic::mul_rule(lhs, rhs),
        BinaryOp::Div => arithmetic::div_rule(lhs, rhs),
        BinaryOp::Pow => pow::pow_rule(lhs, rhs),
    }
}

/// Differentiates `op(operand)` with respect to `wrt`.
pub(crate) fn differentiate_unary(
    op: &UnaryOp,
    operand: &Expr,
    wrt: &Wrt,
) -> Result<Expr, ExprError> {
    match op {
        UnaryOp::Identity => operand.derivative(wrt),
        UnaryOp::Neg => arithmetic::diff_neg(operand, wrt),
        UnaryOp::Abs => arithmetic::diff_abs(operand),
        UnaryOp::Exp => exp::diff_exp(operand, wrt),
        UnaryOp::Ln => ln::diff_ln(operand, wrt),
        UnaryOp::Log10 => ln::diff_log10(operand, wrt),
        UnaryOp::Sqrt => sqrt::diff_sqrt(operand, wrt),
        UnaryOp::Sin => trigonometric::diff_sin(operand, wrt),
        UnaryOp::Cos => trigonometric::diff_cos(operand, wrt),
        UnaryOp::Tan => trigonometric::diff_tan(operand, wrt),
        UnaryOp::Gradient => calculus::diff_gradient(operand, wrt),
        UnaryOp::Partial(id) => calculus::diff_partial(*id, operand, wrt),
        UnaryOp::Divergence | UnaryOp::Integral(..) | UnaryOp::SymbolicIntegral(_) => {
            Err(ExprError::NotDifferentiable(format!("{op}({operand})")))
        }
    }
}

/// Differentiates `lhs op rhs` with respect to `wrt`.
pub(crate) fn differentiate_binary(
    op: BinaryOp,
    lhs: &Expr,
    rhs: &Expr,
    wrt: &Wrt,
) -> Result<Expr, ExprError> {
    match op {
        BinaryOp::Add | BinaryOp::Sub => arithmetic::diff_sum(op, lhs, rhs, wrt),
        BinaryOp::Mul => arithmetic::diff_product(lhs, rhs, wrt),
        BinaryOp::Div => arithmetic::diff_quotient(lhs, rhs, wrt),
        BinaryOp::Pow => pow::diff_pow(lhs, rhs, wrt),
    }
}

/// Folds `op(c)` for a constant operand when the result is a finite number.
pub(crate) fn fold_constant(op: &UnaryOp, operand: &Expr) -> Option<UnaryRewrite> {
    match operand {
        Expr::Const(c) => op
            .apply(*c)
            .ok()
            .filter(|value| value.is_finite())
            .map(UnaryRewrite::Const),
        _ => None,
    }
}

/// Folds `lhs op rhs` for two constant operands.
///
/// Returns `None` when an operand is not constant or the result is not a finite number,
/// `Some(Err(..))` for a division by zero.
pub(crate) fn fold_binary(
    op: BinaryOp,
    lhs: &Expr,
    rhs: &Expr,
) -> Option<Result<f64, ExprError>> {
    match (lhs, rhs) {
        (Expr::Const(a), Expr::Const(b)) => match op.apply(*a, *b) {
            Ok(value) if !value.is_finite() => None,
            result => Some(result),
        },
        _ => None,
    }
}
