//! Differential and integral operators.
//!
//! Gradient, divergence and partial derivatives act on the function an expression
//! describes rather than on its value, so they only take part in symbolic rewriting.
//! Integrals carry their domain: a concrete interval plus integration variable, or a
//! placeholder domain to be bound later.

use super::{UnaryOp, UnaryRewrite};
use crate::derivative::Wrt;
use crate::errors::ExprError;
use crate::expr::Expr;
use crate::interval::Interval;

// The derivative of a constant field vanishes
pub(crate) fn differential_rule(operand: &Expr) -> Option<UnaryRewrite> {
    operand.is_constant().then_some(UnaryRewrite::Const(0.0))
}

pub(crate) fn integral_rule(interval: &Interval, operand: &Expr) -> Option<UnaryRewrite> {
    match operand {
        Expr::Const(c) => Some(UnaryRewrite::Const(c * interval.length())),
        _ => None,
    }
}

pub(crate) fn symbolic_integral_rule(operand: &Expr) -> Option<UnaryRewrite> {
    operand.is_zero().then_some(UnaryRewrite::Const(0.0))
}

/// Differentiates the operand and wraps the result back into `grad(...)`.
///
/// A derivative that simplifies to zero collapses the whole gradient to zero.
pub(crate) fn diff_gradient(operand: &Expr, wrt: &Wrt) -> Result<Expr, ExprError> {
    wrap_derivative(UnaryOp::Gradient, operand, wrt)
}

/// Same as [`diff_gradient`] for `d/dx_id(...)`; nested partial derivatives are rejected.
pub(crate) fn diff_partial(id: usize, operand: &Expr, wrt: &Wrt) -> Result<Expr, ExprError> {
    if let Expr::Unary(inner) = operand {
        if let UnaryOp::Partial(_) = inner.op {
            return Err(ExprError::NotDifferentiable(format!(
                "{}({operand})",
                UnaryOp::Partial(id)
            )));
        }
    }
    wrap_derivative(UnaryOp::Partial(id), operand, wrt)
}

fn wrap_derivative(op: UnaryOp, operand: &Expr, wrt: &Wrt) -> Result<Expr, ExprError> {
    let inner = operand.derivative(wrt)?.simplify_fully()?;
    if inner.is_zero() {
        Ok(Expr::Const(0.0))
    } else {
        Ok(Expr::unary(op, inner))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::{FunctionSymbol, Variable};
    use crate::operators::arithmetic::product;

    #[test]
    fn test_gradient_of_constant_collapses() {
        assert_eq!(differential_rule(&Expr::Const(3.0)), Some(UnaryRewrite::Const(0.0)));
        assert_eq!(differential_rule(&Expr::Var(Variable::new(0))), None);
    }

    #[test]
    fn test_integral_of_constant() {
        let interval = Interval::new(1.0, 4.0);
        assert_eq!(
            integral_rule(&interval, &Expr::Const(2.0)),
            Some(UnaryRewrite::Const(6.0))
        );
        assert_eq!(
            symbolic_integral_rule(&Expr::Const(0.0)),
            Some(UnaryRewrite::Const(0.0))
        );
        assert_eq!(symbolic_integral_rule(&Expr::Const(1.0)), None);
    }

    #[test]
    fn test_gateaux_derivative_of_gradient() {
        // d/du grad(2 u) = grad(2)
        let u = FunctionSymbol::new(0, 0);
        let operand = product(Expr::Const(2.0), Expr::Func(u));
        let derivative = diff_gradient(&operand, &Wrt::Func(u)).unwrap();
        assert_eq!(derivative, Expr::unary(UnaryOp::Gradient, Expr::Const(2.0)));
    }

    #[test]
    fn test_gradient_derivative_collapses_to_zero() {
        // grad(u) does not depend on the test function v
        let u = FunctionSymbol::new(0, 0);
        let v = FunctionSymbol::new(0, 1);
        let derivative = diff_gradient(&Expr::Func(u), &Wrt::Func(v)).unwrap();
        assert_eq!(derivative, Expr::Const(0.0));
    }

    #[test]
    fn test_partial_of_partial_is_not_differentiable() {
        let x = Expr::Var(Variable::new(0));
        let inner = Expr::unary(UnaryOp::Partial(0), x);
        assert!(matches!(
            diff_partial(1, &inner, &Wrt::Var(Variable::new(0))),
            Err(ExprError::NotDifferentiable(_))
        ));
    }
}
