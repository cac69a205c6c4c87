//! Rewrite rules and derivatives for the natural and base-10 logarithms.

use std::f64::consts::LN_10;

use super::arithmetic::{product, quotient};
use super::{fold_constant, UnaryOp, UnaryRewrite};
use crate::derivative::Wrt;
use crate::errors::ExprError;
use crate::expr::Expr;

// ln(exp(x)) -> x holds for every real x
pub(crate) fn ln_rule(operand: &Expr) -> Option<UnaryRewrite> {
    match operand {
        Expr::Unary(inner) if inner.op == UnaryOp::Exp => Some(UnaryRewrite::InnerOperand),
        _ => fold_constant(&UnaryOp::Ln, operand),
    }
}

pub(crate) fn log10_rule(operand: &Expr) -> Option<UnaryRewrite> {
    fold_constant(&UnaryOp::Log10, operand)
}

/// d/dx(ln(u)) = 1/u * u'
pub(crate) fn diff_ln(operand: &Expr, wrt: &Wrt) -> Result<Expr, ExprError> {
    Ok(product(
        quotient(Expr::Const(1.0), operand.clone()),
        operand.derivative(wrt)?,
    ))
}

/// d/dx(log10(u)) = 1/(u * ln(10)) * u'
pub(crate) fn diff_log10(operand: &Expr, wrt: &Wrt) -> Result<Expr, ExprError> {
    Ok(product(
        quotient(
            Expr::Const(1.0),
            product(operand.clone(), Expr::Const(LN_10)),
        ),
        operand.derivative(wrt)?,
    ))
}
