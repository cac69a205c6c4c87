//! Rewrite rules and derivatives for the trigonometric functions.
//!
//! All functions expect arguments in radians.

use super::arithmetic::{negate, product, quotient};
use super::{fold_constant, UnaryOp, UnaryRewrite};
use crate::derivative::Wrt;
use crate::errors::ExprError;
use crate::expr::Expr;

pub(crate) fn trig_rule(op: &UnaryOp, operand: &Expr) -> Option<UnaryRewrite> {
    fold_constant(op, operand)
}

/// d/dx(sin(u)) = cos(u) * u'
pub(crate) fn diff_sin(operand: &Expr, wrt: &Wrt) -> Result<Expr, ExprError> {
    Ok(product(
        Expr::unary(UnaryOp::Cos, operand.clone()),
        operand.derivative(wrt)?,
    ))
}

/// d/dx(cos(u)) = -sin(u) * u'
pub(crate) fn diff_cos(operand: &Expr, wrt: &Wrt) -> Result<Expr, ExprError> {
    Ok(product(
        negate(Expr::unary(UnaryOp::Sin, operand.clone())),
        operand.derivative(wrt)?,
    ))
}

/// d/dx(tan(u)) = 1/cos²(u) * u'
pub(crate) fn diff_tan(operand: &Expr, wrt: &Wrt) -> Result<Expr, ExprError> {
    let cos = Expr::unary(UnaryOp::Cos, operand.clone());
    Ok(product(
        quotient(Expr::Const(1.0), product(cos.clone(), cos)),
        operand.derivative(wrt)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::Variable;

    fn x() -> Expr {
        Expr::Var(Variable::new(0))
    }

    #[test]
    fn test_trig_derivative_values() {
        let wrt = Wrt::Var(Variable::new(0));
        let at = 0.3_f64;
        approx::assert_relative_eq!(
            diff_sin(&x(), &wrt).unwrap().evaluate(&at).unwrap(),
            at.cos()
        );
        approx::assert_relative_eq!(
            diff_cos(&x(), &wrt).unwrap().evaluate(&at).unwrap(),
            -at.sin()
        );
        approx::assert_relative_eq!(
            diff_tan(&x(), &wrt).unwrap().evaluate(&at).unwrap(),
            1.0 / (at.cos() * at.cos())
        );
    }

    #[test]
    fn test_trig_folding() {
        assert_eq!(
            trig_rule(&UnaryOp::Sin, &Expr::Const(0.0)),
            Some(UnaryRewrite::Const(0.0))
        );
        assert_eq!(
            trig_rule(&UnaryOp::Cos, &Expr::Const(0.0)),
            Some(UnaryRewrite::Const(1.0))
        );
        assert_eq!(trig_rule(&UnaryOp::Tan, &x()), None);
    }
}
