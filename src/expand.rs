//! Distributive expansion.
//!
//! Expansion pushes products, quotients and negations down through sums and differences:
//! - `(a ± b) * c → a * c ± b * c` and `c * (a ± b) → c * a ± c * b`
//! - `(a ± b) / c → a / c ± b / c`
//! - `-(a ± b) → (-a) ± (-b)`
//!
//! The result has the same value as the input at every point where both are defined. No
//! like terms are collected; run the simplifier afterwards to clean up.

use crate::expr::{BinaryExpr, Expr};
use crate::operators::{BinaryOp, UnaryOp};
use crate::visit::Manipulator;

struct Distribute;

impl Manipulator for Distribute {
    fn modifies(&mut self, node: &Expr) -> bool {
        match node {
            Expr::Binary(binary) => matches!(binary.op, BinaryOp::Mul | BinaryOp::Div),
            Expr::Unary(unary) => unary.op == UnaryOp::Neg,
            _ => false,
        }
    }

    fn apply(&mut self, node: &Expr) -> Expr {
        match node {
            Expr::Binary(binary) => {
                let lhs = binary.lhs.manipulate(self);
                let rhs = binary.rhs.manipulate(self);
                match binary.op {
                    BinaryOp::Mul => distribute_product(lhs, rhs),
                    BinaryOp::Div => distribute_quotient(lhs, rhs),
                    op => Expr::binary(op, lhs, rhs),
                }
            }
            Expr::Unary(unary) => distribute_negation(unary.child.manipulate(self)),
            other => other.clone(),
        }
    }
}

fn is_additive(node: &BinaryExpr) -> bool {
    matches!(node.op, BinaryOp::Add | BinaryOp::Sub)
}

fn distribute_product(lhs: Expr, rhs: Expr) -> Expr {
    match (lhs, rhs) {
        (Expr::Binary(sum), rhs) if is_additive(&sum) => Expr::binary(
            sum.op,
            distribute_product(*sum.lhs, rhs.clone()),
            distribute_product(*sum.rhs, rhs),
        ),
        (lhs, Expr::Binary(sum)) if is_additive(&sum) => Expr::binary(
            sum.op,
            distribute_product(lhs.clone(), *sum.lhs),
            distribute_product(lhs, *sum.rhs),
        ),
        (lhs, rhs) => Expr::binary(BinaryOp::Mul, lhs, rhs),
    }
}

fn distribute_quotient(numerator: Expr, denominator: Expr) -> Expr {
    match numerator {
        Expr::Binary(sum) if is_additive(&sum) => Expr::binary(
            sum.op,
            distribute_quotient(*sum.lhs, denominator.clone()),
            distribute_quotient(*sum.rhs, denominator),
        ),
        numerator => Expr::binary(BinaryOp::Div, numerator, denominator),
    }
}

fn distribute_negation(operand: Expr) -> Expr {
    match operand {
        Expr::Binary(sum) if is_additive(&sum) => Expr::binary(
            sum.op,
            distribute_negation(*sum.lhs),
            distribute_negation(*sum.rhs),
        ),
        operand => Expr::unary(UnaryOp::Neg, operand),
    }
}

impl Expr {
    /// Distributes products, quotients and negations over sums and differences.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use symexpr::prelude::*;
    ///
    /// let x = Expr::var(0);
    /// let expr = Expr::binary(
    ///     BinaryOp::Mul,
    ///     Expr::Const(2.0),
    ///     Expr::binary(BinaryOp::Add, x, Expr::Const(1.0)),
    /// );
    /// assert_eq!(expr.expand().to_string(), "((2 * x0) + (2 * 1))");
    /// ```
    pub fn expand(&self) -> Expr {
        self.manipulate(&mut Distribute)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x() -> Expr {
        Expr::var(0)
    }

    fn y() -> Expr {
        Expr::var(1)
    }

    fn bin(op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
        Expr::binary(op, lhs, rhs)
    }

    #[test]
    fn test_expand_binomial_product() {
        // (x + 1) * (y - 2)
        let expr = bin(
            BinaryOp::Mul,
            bin(BinaryOp::Add, x(), Expr::Const(1.0)),
            bin(BinaryOp::Sub, y(), Expr::Const(2.0)),
        );
        let expanded = expr.expand();
        assert_eq!(
            expanded.to_string(),
            "(((x0 * x1) - (x0 * 2)) + ((1 * x1) - (1 * 2)))"
        );
        for point in [[0.0, 0.0], [1.5, -2.0], [3.0, 7.0]] {
            assert_eq!(
                expanded.evaluate(&point).unwrap(),
                expr.evaluate(&point).unwrap()
            );
        }
    }

    #[test]
    fn test_expand_quotient_and_negation() {
        let quotient = bin(BinaryOp::Div, bin(BinaryOp::Sub, x(), y()), Expr::Const(2.0));
        assert_eq!(quotient.expand().to_string(), "((x0 / 2) - (x1 / 2))");

        let negation = Expr::unary(UnaryOp::Neg, bin(BinaryOp::Add, x(), y()));
        assert_eq!(negation.expand().to_string(), "(-(x0) + -(x1))");
    }

    #[test]
    fn test_expand_inside_functions() {
        // sin(x * (y + 1)) expands its argument
        let expr = Expr::unary(
            UnaryOp::Sin,
            bin(BinaryOp::Mul, x(), bin(BinaryOp::Add, y(), Expr::Const(1.0))),
        );
        assert_eq!(expr.expand().to_string(), "sin(((x0 * x1) + (x0 * 1)))");
    }

    #[test]
    fn test_expand_leaves_sums_alone() {
        let expr = bin(BinaryOp::Add, x(), y());
        assert_eq!(expr.expand(), expr);
    }
}
