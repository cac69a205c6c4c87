//! Rewrite rules and derivative for exponentiation `u ^ v`.

use super::arithmetic::{product, quotient, sum};
use super::{BinaryOp, BinaryRewrite, UnaryOp};
use crate::derivative::Wrt;
use crate::errors::ExprError;
use crate::expr::Expr;

// x^0 -> 1 (0^0 included, matching powf), x^1 -> x, 1^x -> 1
pub(crate) fn pow_rule(base: &Expr, exponent: &Expr) -> Option<BinaryRewrite> {
    if exponent.is_zero() || base.is_one() {
        Some(BinaryRewrite::Const(1.0))
    } else if exponent.is_one() {
        Some(BinaryRewrite::Lhs)
    } else {
        None
    }
}

/// Power rule for a constant exponent, general power rule otherwise:
/// - d/dx(u^n) = n * u^(n-1) * u'
/// - d/dx(u^v) = u^v * (v' * ln(u) + v * u' / u)
pub(crate) fn diff_pow(base: &Expr, exponent: &Expr, wrt: &Wrt) -> Result<Expr, ExprError> {
    if let Expr::Const(n) = exponent {
        return Ok(product(
            product(
                Expr::Const(*n),
                Expr::binary(BinaryOp::Pow, base.clone(), Expr::Const(n - 1.0)),
            ),
            base.derivative(wrt)?,
        ));
    }

    Ok(product(
        Expr::binary(BinaryOp::Pow, base.clone(), exponent.clone()),
        sum(
            product(
                exponent.derivative(wrt)?,
                Expr::unary(UnaryOp::Ln, base.clone()),
            ),
            product(exponent.clone(), quotient(base.derivative(wrt)?, base.clone())),
        ),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::Variable;

    #[test]
    fn test_pow_rule() {
        let x = Expr::Var(Variable::new(0));
        assert_eq!(pow_rule(&x, &Expr::Const(0.0)), Some(BinaryRewrite::Const(1.0)));
        assert_eq!(pow_rule(&x, &Expr::Const(1.0)), Some(BinaryRewrite::Lhs));
        assert_eq!(pow_rule(&Expr::Const(1.0), &x), Some(BinaryRewrite::Const(1.0)));
        assert_eq!(pow_rule(&x, &Expr::Const(2.0)), None);
    }

    #[test]
    fn test_constant_exponent_derivative_value() {
        // d/dx(x^3) = 3 * x^2
        let x = Expr::Var(Variable::new(0));
        let derivative = diff_pow(&x, &Expr::Const(3.0), &Wrt::Var(Variable::new(0))).unwrap();
        assert_eq!(derivative.evaluate(&2.0).unwrap(), 12.0);
    }

    #[test]
    fn test_variable_exponent_derivative_value() {
        // d/dx(x^x) = x^x * (ln(x) + 1)
        let x = Expr::Var(Variable::new(0));
        let derivative = diff_pow(&x, &x, &Wrt::Var(Variable::new(0))).unwrap();
        let at = 2.0_f64;
        let expected = at.powf(at) * (at.ln() + 1.0);
        approx::assert_relative_eq!(derivative.evaluate(&at).unwrap(), expected);
    }
}
