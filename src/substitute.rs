//! Substitution of subtrees.
//!
//! Substitution compares each node against the search expressions with structural
//! equality. A matching node is replaced by a copy of its replacement and its children are
//! not visited; other nodes are rebuilt from substituted children.

use crate::errors::ExprError;
use crate::expr::{Expr, Variable};
use crate::interval::{Interval, SymbolicInterval};
use crate::operators::UnaryOp;
use crate::visit::Manipulator;

/// Replaces each target with the replacement at the same position.
///
/// `modifies` records the index of the matching target; `manipulate` calls `apply` only
/// right after `modifies` accepted the node, and the target and replacement lists have
/// equal length.
struct Substitution<'a, T> {
    targets: &'a [T],
    replacements: &'a [T],
    matched: usize,
}

impl<'a, T: AsRef<Expr>> Substitution<'a, T> {
    fn new(targets: &'a [T], replacements: &'a [T]) -> Self {
        Self {
            targets,
            replacements,
            matched: 0,
        }
    }
}

impl<T: AsRef<Expr>> Manipulator for Substitution<'_, T> {
    fn modifies(&mut self, node: &Expr) -> bool {
        match self.targets.iter().position(|target| target.as_ref() == node) {
            Some(index) => {
                self.matched = index;
                true
            }
            None => false,
        }
    }

    fn apply(&mut self, _node: &Expr) -> Expr {
        self.replacements[self.matched].as_ref().clone()
    }
}

/// Turns symbolic integrals over one placeholder domain into definite integrals.
struct IntervalBinding {
    domain: SymbolicInterval,
    interval: Interval,
    variable: Variable,
}

impl Manipulator for IntervalBinding {
    fn modifies(&mut self, node: &Expr) -> bool {
        matches!(node, Expr::Unary(unary) if unary.op == UnaryOp::SymbolicIntegral(self.domain))
    }

    fn apply(&mut self, node: &Expr) -> Expr {
        match node {
            Expr::Unary(unary) => {
                let child = unary.child.manipulate(self);
                Expr::unary(UnaryOp::Integral(self.interval, self.variable.id), child)
            }
            other => other.clone(),
        }
    }
}

impl Expr {
    /// Replaces every occurrence of `target` with a copy of `replacement`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use symexpr::prelude::*;
    ///
    /// // x + y - z with x := 1 - y
    /// let (x, y, z) = (Expr::var(0), Expr::var(1), Expr::var(2));
    /// let expr = Expr::binary(
    ///     BinaryOp::Sub,
    ///     Expr::binary(BinaryOp::Add, x.clone(), y.clone()),
    ///     z,
    /// );
    /// let result = expr.substitute(&x, &Expr::binary(BinaryOp::Sub, Expr::Const(1.0), y));
    /// assert_eq!(result.evaluate(&[0.0, 2.0, 3.0]).unwrap(), -2.0);
    /// ```
    pub fn substitute(&self, target: &Expr, replacement: &Expr) -> Expr {
        self.manipulate(&mut Substitution::new(
            std::slice::from_ref(target),
            std::slice::from_ref(replacement),
        ))
    }

    /// Replaces occurrences of `targets[i]` with `replacements[i]`, all in one pass.
    ///
    /// When a node matches several targets the first one in list order wins.
    ///
    /// # Returns
    /// The substituted tree, or `ExprError::ReplacementMismatch` if the two lists
    /// differ in length
    pub fn substitute_all<T: AsRef<Expr>>(
        &self,
        targets: &[T],
        replacements: &[T],
    ) -> Result<Expr, ExprError> {
        if targets.len() != replacements.len() {
            return Err(ExprError::ReplacementMismatch {
                targets: targets.len(),
                replacements: replacements.len(),
            });
        }
        Ok(self.manipulate(&mut Substitution::new(targets, replacements)))
    }

    /// Binds a placeholder integration domain: every `int{domain}(u)` becomes a definite
    /// integral of `u` over `interval` with respect to `variable`.
    pub fn substitute_interval(
        &self,
        domain: SymbolicInterval,
        interval: Interval,
        variable: Variable,
    ) -> Expr {
        self.manipulate(&mut IntervalBinding {
            domain,
            interval,
            variable,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operators::BinaryOp;

    fn x() -> Expr {
        Expr::var(0)
    }

    fn y() -> Expr {
        Expr::var(1)
    }

    #[test]
    fn test_substitute() {
        // x + y - z, x := 1 - y at (y=2, z=3) → -2
        let expr = Expr::binary(
            BinaryOp::Sub,
            Expr::binary(BinaryOp::Add, x(), y()),
            Expr::var(2),
        );
        let replacement = Expr::binary(BinaryOp::Sub, Expr::Const(1.0), y());
        let result = expr.substitute(&x(), &replacement);
        assert_eq!(result.to_string(), "(((1 - x1) + x1) - x2)");
        assert_eq!(result.evaluate(&[0.0, 2.0, 3.0]).unwrap(), -2.0);
        assert!(!result.variables().contains(&Variable::new(0)));
    }

    #[test]
    fn test_substitute_subtree() {
        // Replacing x * y in sin(x * y) + x * y
        let product = Expr::binary(BinaryOp::Mul, x(), y());
        let expr = Expr::binary(
            BinaryOp::Add,
            Expr::unary(UnaryOp::Sin, product.clone()),
            product.clone(),
        );
        let result = expr.substitute(&product, &Expr::var(2));
        assert_eq!(result.to_string(), "(sin(x2) + x2)");
    }

    #[test]
    fn test_substitute_all_first_match_wins() {
        let expr = Expr::binary(BinaryOp::Add, x(), y());
        let targets = [x(), x(), y()];
        let replacements = [Expr::Const(1.0), Expr::Const(2.0), Expr::Const(3.0)];
        let result = expr.substitute_all(&targets, &replacements).unwrap();
        assert_eq!(result.to_string(), "(1 + 3)");
    }

    #[test]
    fn test_substitute_all_is_simultaneous() {
        // Swapping x and y does not chain x → y → x
        let expr = Expr::binary(BinaryOp::Sub, x(), y());
        let result = expr.substitute_all(&[x(), y()], &[y(), x()]).unwrap();
        assert_eq!(result.to_string(), "(x1 - x0)");
    }

    #[test]
    fn test_substitute_nan_constant() {
        let nan = Expr::Const(f64::NAN);
        let expr = Expr::binary(BinaryOp::Mul, nan.clone(), x());
        let result = expr.substitute(&nan, &Expr::Const(2.0));
        assert_eq!(result.evaluate(&3.0).unwrap(), 6.0);
    }

    #[test]
    fn test_substitute_all_length_mismatch() {
        let expr = x();
        assert_eq!(
            expr.substitute_all(&[x(), y()], &[Expr::Const(1.0)]),
            Err(ExprError::ReplacementMismatch {
                targets: 2,
                replacements: 1
            })
        );
    }

    #[test]
    fn test_substitute_interval() {
        let domain = SymbolicInterval::new(0);
        let other = SymbolicInterval::new(1);
        let expr = Expr::binary(
            BinaryOp::Add,
            Expr::unary(UnaryOp::SymbolicIntegral(domain), x()),
            Expr::unary(UnaryOp::SymbolicIntegral(other), x()),
        );
        let result = expr.substitute_interval(domain, Interval::new(0.0, 2.0), Variable::new(0));
        assert_eq!(result.to_string(), "(int[0, 2](x0) dx0 + intI1(x0))");
    }

    #[test]
    fn test_nested_symbolic_integrals_are_bound() {
        let domain = SymbolicInterval::new(0);
        let expr = Expr::unary(
            UnaryOp::SymbolicIntegral(domain),
            Expr::unary(UnaryOp::SymbolicIntegral(domain), Expr::Const(3.0)),
        );
        let result = expr
            .substitute_interval(domain, Interval::new(0.0, 1.0), Variable::new(1))
            .simplify_fully()
            .unwrap();
        assert_eq!(result, Expr::Const(3.0));
    }
}
