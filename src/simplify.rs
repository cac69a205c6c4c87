//! Algebraic simplification.
//!
//! One simplification pass rewrites the tree top-down with the rules looked up in
//! [`crate::operators`]:
//! - Constant folding (e.g. 2 + 3 → 5)
//! - Identity rules (e.g. x + 0 → x, x * 1 → x, x / 1 → x)
//! - Annihilators (e.g. x * 0 → 0, 0 / x → 0)
//! - Exponent rules (e.g. x^0 → 1, x^1 → x, 1^x → 1)
//! - Special function rules (e.g. ln(exp(x)) → x, -(-x) → x, ||x|| → |x|)
//!
//! A single pass may leave new opportunities behind (`(x * 0) + y` becomes `0 + y`), so
//! [`Expr::simplify_fully`] repeats passes until [`Expr::can_simplify`] reports a fixed
//! point. Every rule removes at least one node, which bounds the number of passes by the
//! size of the tree.

use log::trace;

use crate::errors::ExprError;
use crate::expr::{BinaryExpr, Expr, UnaryExpr};
use crate::operators::{binary_rule, fold_binary, unary_rule, BinaryRewrite, UnaryRewrite};

/// Options for the fixed-point simplification driver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimplifyOptions {
    /// Maximum number of passes. `None` uses the node count of the input tree, which is
    /// always enough to reach the fixed point.
    pub max_iterations: Option<usize>,
}

impl SimplifyOptions {
    pub fn with_max_iterations(max_iterations: usize) -> Self {
        Self {
            max_iterations: Some(max_iterations),
        }
    }
}

impl Expr {
    /// Returns true if one more call to [`Expr::simplify`] would change the tree.
    pub fn can_simplify(&self) -> bool {
        match self {
            Expr::Const(_) | Expr::Var(_) | Expr::Func(_) => false,
            Expr::Unary(node) => {
                unary_rule(&node.op, &node.child).is_some() || node.child.can_simplify()
            }
            Expr::Binary(node) => {
                fold_binary(node.op, &node.lhs, &node.rhs).is_some()
                    || binary_rule(node.op, &node.lhs, &node.rhs).is_some()
                    || node.lhs.can_simplify()
                    || node.rhs.can_simplify()
            }
            Expr::Vector(vector) => vector.iter().any(Expr::can_simplify),
        }
    }

    /// Performs a single simplification pass.
    ///
    /// For a binary node: fold two constant operands, else apply the operator's rule,
    /// else simplify both operands and rebuild. Unary nodes work the same way with one
    /// operand; vectors are simplified elementwise.
    ///
    /// # Returns
    /// A new, simplified expression tree, or `ExprError::DivisionByZero` when the tree
    /// divides by an exact zero
    pub fn simplify(&self) -> Result<Expr, ExprError> {
        match self {
            Expr::Const(_) | Expr::Var(_) | Expr::Func(_) => Ok(self.clone()),
            Expr::Unary(node) => match unary_rule(&node.op, &node.child) {
                Some(rewrite) => Ok(rewrite_unary(rewrite, node)),
                None => Ok(Expr::unary(node.op, node.child.simplify()?)),
            },
            Expr::Binary(node) => {
                if let Some(folded) = fold_binary(node.op, &node.lhs, &node.rhs) {
                    return folded.map(Expr::Const);
                }
                match binary_rule(node.op, &node.lhs, &node.rhs) {
                    Some(rewrite) => rewrite_binary(rewrite, node),
                    None => Ok(Expr::binary(
                        node.op,
                        node.lhs.simplify()?,
                        node.rhs.simplify()?,
                    )),
                }
            }
            Expr::Vector(vector) => Ok(Expr::Vector(vector.try_map(Expr::simplify)?)),
        }
    }

    /// Simplifies until no rule applies any more, bounded by the node count of the tree.
    pub fn simplify_fully(&self) -> Result<Expr, ExprError> {
        self.simplify_with(SimplifyOptions::default())
    }

    /// Simplifies until no rule applies any more.
    ///
    /// # Arguments
    /// * `options` - Iteration budget of the driver
    ///
    /// # Returns
    /// The fixed point, or `ExprError::SimplifyDidNotConverge` if the budget runs out first
    pub fn simplify_with(&self, options: SimplifyOptions) -> Result<Expr, ExprError> {
        let budget = options
            .max_iterations
            .unwrap_or_else(|| self.node_count());
        let mut current = self.clone();
        let mut iterations = 0;
        while current.can_simplify() {
            if iterations == budget {
                return Err(ExprError::SimplifyDidNotConverge(iterations));
            }
            current = current.simplify()?;
            iterations += 1;
            trace!("simplify pass {iterations}: {current}");
        }
        Ok(current)
    }
}

fn rewrite_unary(rewrite: UnaryRewrite, node: &UnaryExpr) -> Expr {
    match rewrite {
        UnaryRewrite::Const(c) => Expr::Const(c),
        UnaryRewrite::Operand => (*node.child).clone(),
        UnaryRewrite::InnerOperand => match node.child.as_ref() {
            Expr::Unary(inner) => (*inner.child).clone(),
            other => other.clone(),
        },
    }
}

fn rewrite_binary(rewrite: BinaryRewrite, node: &BinaryExpr) -> Result<Expr, ExprError> {
    match rewrite {
        BinaryRewrite::Const(c) => Ok(Expr::Const(c)),
        BinaryRewrite::Lhs => Ok((*node.lhs).clone()),
        BinaryRewrite::Rhs => Ok((*node.rhs).clone()),
        BinaryRewrite::DivisionByZero => Err(ExprError::DivisionByZero(
            Expr::Binary(node.clone()).to_string(),
        )),
    }
}
