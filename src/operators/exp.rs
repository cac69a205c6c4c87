//! Rewrite rules and derivative for the exponential function.

use super::arithmetic::product;
use super::{fold_constant, UnaryOp, UnaryRewrite};
use crate::derivative::Wrt;
use crate::errors::ExprError;
use crate::expr::Expr;

pub(crate) fn exp_rule(operand: &Expr) -> Option<UnaryRewrite> {
    fold_constant(&UnaryOp::Exp, operand)
}

/// d/dx(e^u) = e^u * u'
pub(crate) fn diff_exp(operand: &Expr, wrt: &Wrt) -> Result<Expr, ExprError> {
    Ok(product(
        Expr::unary(UnaryOp::Exp, operand.clone()),
        operand.derivative(wrt)?,
    ))
}
