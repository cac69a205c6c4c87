//! Rewrite rules and derivatives for the arithmetic operators.
//!
//! Binary: `+`, `-`, `*`, `/`. Unary: negation and modulus. The identity operator has no
//! hooks of its own; it always rewrites to its operand.

use super::{BinaryOp, BinaryRewrite, UnaryOp, UnaryRewrite};
use crate::derivative::Wrt;
use crate::errors::ExprError;
use crate::expr::Expr;

pub(crate) fn sum(lhs: Expr, rhs: Expr) -> Expr {
    Expr::binary(BinaryOp::Add, lhs, rhs)
}

pub(crate) fn difference(lhs: Expr, rhs: Expr) -> Expr {
    Expr::binary(BinaryOp::Sub, lhs, rhs)
}

pub(crate) fn product(lhs: Expr, rhs: Expr) -> Expr {
    Expr::binary(BinaryOp::Mul, lhs, rhs)
}

pub(crate) fn quotient(lhs: Expr, rhs: Expr) -> Expr {
    Expr::binary(BinaryOp::Div, lhs, rhs)
}

pub(crate) fn negate(operand: Expr) -> Expr {
    Expr::unary(UnaryOp::Neg, operand)
}

// x + 0 -> x, 0 + x -> x; 0 + 0 resolves through the first arm
pub(crate) fn add_rule(lhs: &Expr, rhs: &Expr) -> Option<BinaryRewrite> {
    if lhs.is_zero() {
        Some(BinaryRewrite::Rhs)
    } else if rhs.is_zero() {
        Some(BinaryRewrite::Lhs)
    } else {
        None
    }
}

pub(crate) fn sub_rule(_lhs: &Expr, rhs: &Expr) -> Option<BinaryRewrite> {
    rhs.is_zero().then_some(BinaryRewrite::Lhs)
}

// Annihilator before identity, so 0 * 1 and 1 * 0 both give 0
pub(crate) fn mul_rule(lhs: &Expr, rhs: &Expr) -> Option<BinaryRewrite> {
    if lhs.is_zero() || rhs.is_zero() {
        Some(BinaryRewrite::Const(0.0))
    } else if lhs.is_one() {
        Some(BinaryRewrite::Rhs)
    } else if rhs.is_one() {
        Some(BinaryRewrite::Lhs)
    } else {
        None
    }
}

// A zero denominator wins over a zero numerator: 0 / 0 is an error, not 0
pub(crate) fn div_rule(lhs: &Expr, rhs: &Expr) -> Option<BinaryRewrite> {
    if rhs.is_zero() {
        Some(BinaryRewrite::DivisionByZero)
    } else if lhs.is_zero() {
        Some(BinaryRewrite::Const(0.0))
    } else if rhs.is_one() {
        Some(BinaryRewrite::Lhs)
    } else {
        None
    }
}

pub(crate) fn neg_rule(operand: &Expr) -> Option<UnaryRewrite> {
    match operand {
        Expr::Const(c) => Some(UnaryRewrite::Const(-c)),
        Expr::Unary(inner) if inner.op == UnaryOp::Neg => Some(UnaryRewrite::InnerOperand),
        _ => None,
    }
}

pub(crate) fn abs_rule(operand: &Expr) -> Option<UnaryRewrite> {
    match operand {
        Expr::Const(c) => Some(UnaryRewrite::Const(c.abs())),
        Expr::Unary(inner) if inner.op == UnaryOp::Abs => Some(UnaryRewrite::Operand),
        _ => None,
    }
}

/// `(u ± v)' = u' ± v'`
pub(crate) fn diff_sum(op: BinaryOp, lhs: &Expr, rhs: &Expr, wrt: &Wrt) -> Result<Expr, ExprError> {
    Ok(Expr::binary(op, lhs.derivative(wrt)?, rhs.derivative(wrt)?))
}

/// `(u v)' = u' v + u v'`
pub(crate) fn diff_product(lhs: &Expr, rhs: &Expr, wrt: &Wrt) -> Result<Expr, ExprError> {
    Ok(sum(
        product(lhs.derivative(wrt)?, rhs.clone()),
        product(lhs.clone(), rhs.derivative(wrt)?),
    ))
}

/// `(u / v)' = (u' v - u v') / (v v)`
pub(crate) fn diff_quotient(lhs: &Expr, rhs: &Expr, wrt: &Wrt) -> Result<Expr, ExprError> {
    Ok(quotient(
        difference(
            product(lhs.derivative(wrt)?, rhs.clone()),
            product(lhs.clone(), rhs.derivative(wrt)?),
        ),
        product(rhs.clone(), rhs.clone()),
    ))
}

pub(crate) fn diff_neg(operand: &Expr, wrt: &Wrt) -> Result<Expr, ExprError> {
    Ok(negate(operand.derivative(wrt)?))
}

pub(crate) fn diff_abs(operand: &Expr) -> Result<Expr, ExprError> {
    Err(ExprError::NotDifferentiable(format!("|{operand}|")))
}
