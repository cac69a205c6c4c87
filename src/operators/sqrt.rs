//! Rewrite rules and derivative for the square root.

use super::arithmetic::{product, quotient};
use super::{fold_constant, UnaryOp, UnaryRewrite};
use crate::derivative::Wrt;
use crate::errors::ExprError;
use crate::expr::Expr;

pub(crate) fn sqrt_rule(operand: &Expr) -> Option<UnaryRewrite> {
    fold_constant(&UnaryOp::Sqrt, operand)
}

/// d/dx(sqrt(u)) = 1/(2 * sqrt(u)) * u'
pub(crate) fn diff_sqrt(operand: &Expr, wrt: &Wrt) -> Result<Expr, ExprError> {
    Ok(product(
        quotient(
            Expr::Const(1.0),
            product(
                Expr::Const(2.0),
                Expr::unary(UnaryOp::Sqrt, operand.clone()),
            ),
        ),
        operand.derivative(wrt)?,
    ))
}
