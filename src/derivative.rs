//! Symbolic differentiation.
//!
//! Expressions can be differentiated with respect to a [`Variable`] (ordinary partial
//! derivative) or a [`FunctionSymbol`] (Gateaux derivative, as used to derive weak forms:
//! the function symbol is treated as the unknown and every other symbol as independent).

use std::fmt;

use crate::errors::ExprError;
use crate::expr::{Expr, FunctionSymbol, Variable};
use crate::operators;

/// The symbol a derivative is taken with respect to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Wrt {
    Var(Variable),
    Func(FunctionSymbol),
}

impl From<Variable> for Wrt {
    fn from(var: Variable) -> Self {
        Wrt::Var(var)
    }
}

impl From<FunctionSymbol> for Wrt {
    fn from(func: FunctionSymbol) -> Self {
        Wrt::Func(func)
    }
}

impl TryFrom<&Expr> for Wrt {
    type Error = ExprError;

    /// Accepts variable and function symbol leaves; anything else cannot be
    /// differentiated against.
    fn try_from(expr: &Expr) -> Result<Self, Self::Error> {
        match expr {
            Expr::Var(var) => Ok(Wrt::Var(*var)),
            Expr::Func(func) => Ok(Wrt::Func(*func)),
            other => Err(ExprError::InvalidDiffVariable(other.to_string())),
        }
    }
}

impl fmt::Display for Wrt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Wrt::Var(var) => write!(f, "{var}"),
            Wrt::Func(func) => write!(f, "{func}"),
        }
    }
}

impl Expr {
    /// Computes the symbolic derivative of this expression.
    ///
    /// Recursively applies the rules of differentiation to build a new expression tree
    /// representing the derivative. The rules implemented are:
    /// - d/dx(c) = 0 for constants
    /// - d/dx(x) = 1 for the variable we're differentiating with respect to
    /// - d/dx(y) = 0 for other variables and d/du(x) = 0 for function symbols u
    /// - d/du(u) = 1, d/du(v) = 0 for function symbols
    /// - Sum, product, quotient, power and chain rules through the operator hooks
    /// - Vectors are differentiated elementwise
    ///
    /// The result is not simplified; see [`Expr::diff`].
    ///
    /// # Arguments
    /// * `wrt` - The variable or function symbol to differentiate with respect to
    ///
    /// # Returns
    /// A new expression tree representing the derivative, or `ExprError::NotDifferentiable`
    /// when some node forbids differentiation (`|x|`, divergence, integrals, a function
    /// symbol differentiated with respect to a variable)
    pub fn derivative(&self, wrt: &Wrt) -> Result<Expr, ExprError> {
        match self {
            Expr::Const(_) => Ok(Expr::Const(0.0)),

            Expr::Var(var) => match wrt {
                Wrt::Var(target) if target == var => Ok(Expr::Const(1.0)),
                _ => Ok(Expr::Const(0.0)),
            },

            Expr::Func(func) => match wrt {
                Wrt::Func(target) if target == func => Ok(Expr::Const(1.0)),
                Wrt::Func(_) => Ok(Expr::Const(0.0)),
                Wrt::Var(var) => Err(ExprError::NotDifferentiable(format!(
                    "{func} with respect to {var}"
                ))),
            },

            Expr::Unary(node) => operators::differentiate_unary(&node.op, &node.child, wrt),

            Expr::Binary(node) => {
                operators::differentiate_binary(node.op, &node.lhs, &node.rhs, wrt)
            }

            Expr::Vector(vector) => Ok(Expr::Vector(vector.try_map(|e| e.derivative(wrt))?)),
        }
    }

    /// Differentiates and simplifies the result to a fixed point.
    pub fn diff(&self, wrt: &Wrt) -> Result<Expr, ExprError> {
        self.derivative(wrt)?.simplify_fully()
    }
}
