//! The `Expression` handle.
//!
//! An `Expression` owns exactly one expression tree and is the type most code works with.
//! It provides:
//!
//! - Construction from numbers, variables, function symbols, nodes and vectors
//! - Arithmetic operator overloads (`+`, `-`, `*`, `/`, unary `-`) on owned and borrowed
//!   handles and with `f64` on either side, resolving vector operands (elementwise sums,
//!   scaling, dot products)
//! - Elementary and differential functions (`sin`, `exp`, `grad`, `integral`, ...)
//! - Free entry points (`eval`, `substitute`, `diff`, `simplify`, ...) mirroring the
//!   node methods
//!
//! # Example
//!
//! ```
//! use symexpr::prelude::*;
//!
//! let x = Expression::var(0);
//! let y = Expression::var(1);
//! let f = &x * &y + 8.0;
//!
//! assert_eq!(f.eval(&[2.0, 3.0]).unwrap(), 14.0);
//! assert_eq!(diff(&f, Variable::new(0)).unwrap(), y);
//! ```

use std::fmt;
use std::ops::{Add, Deref, Div, Mul, Neg, Sub};
use std::sync::Arc;

use crate::backends::point::Point;
use crate::derivative::Wrt;
use crate::errors::ExprError;
use crate::expr::{Expr, FunctionSymbol, Variable};
use crate::interval::{Interval, SymbolicInterval};
use crate::operators::{BinaryOp, UnaryOp};
use crate::simplify::SimplifyOptions;
use crate::types::ScalarFunction;
use crate::vector::VectorExpr;
use crate::visit::{Manipulator, Traverser};

/// An owning handle to an expression tree.
///
/// Dereferences to the root [`Expr`], so every node method is available on the handle.
/// Methods that build a new tree return a new `Expression`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Expression {
    root: Box<Expr>,
}

impl Expression {
    pub fn new(node: impl Into<Expr>) -> Self {
        Self {
            root: Box::new(node.into()),
        }
    }

    pub fn constant(value: f64) -> Self {
        Self::new(Expr::Const(value))
    }

    /// The variable with the given id, i.e. coordinate `id` of the evaluation point.
    pub fn var(id: usize) -> Self {
        Self::new(Expr::var(id))
    }

    pub fn function(id: usize, tag: usize) -> Self {
        Self::new(Expr::function(id, tag))
    }

    /// A vector expression with the given elements.
    pub fn vector(elements: Vec<Expression>) -> Self {
        Self::new(Expr::Vector(
            elements.into_iter().map(Expression::into_node).collect(),
        ))
    }

    /// A vector of `len` zero constants.
    pub fn zeros(len: usize) -> Self {
        Self::new(VectorExpr::zeros(len))
    }

    pub fn node(&self) -> &Expr {
        &self.root
    }

    pub fn into_node(self) -> Expr {
        *self.root
    }

    /// Replaces the owned tree; the previous tree is dropped.
    pub fn set(&mut self, node: impl Into<Expr>) {
        *self.root = node.into();
    }

    /// Evaluates the expression at a point.
    ///
    /// # Arguments
    /// * `point` - A scalar, slice, array, `Vec` or (with the matching feature) nalgebra /
    ///   ndarray vector, indexed by variable id
    ///
    /// # Returns
    /// The value of the expression, or the evaluation error
    pub fn eval<P: Point + ?Sized>(&self, point: &P) -> Result<f64, ExprError> {
        self.root.evaluate(point)
    }

    /// Symbolic derivative, without simplification.
    pub fn derivative(&self, wrt: impl Into<Wrt>) -> Result<Expression, ExprError> {
        Ok(Self::new(self.root.derivative(&wrt.into())?))
    }

    /// Symbolic derivative, simplified to a fixed point.
    pub fn diff(&self, wrt: impl Into<Wrt>) -> Result<Expression, ExprError> {
        Ok(Self::new(self.root.diff(&wrt.into())?))
    }

    /// Simplifies the expression to a fixed point.
    pub fn simplify(&self) -> Result<Expression, ExprError> {
        Ok(Self::new(self.root.simplify_fully()?))
    }

    pub fn substitute(&self, target: &Expression, replacement: &Expression) -> Expression {
        Self::new(self.root.substitute(target, replacement))
    }

    pub fn substitute_all(
        &self,
        targets: &[Expression],
        replacements: &[Expression],
    ) -> Result<Expression, ExprError> {
        Ok(Self::new(self.root.substitute_all(targets, replacements)?))
    }

    pub fn substitute_interval(
        &self,
        domain: SymbolicInterval,
        interval: Interval,
        variable: Variable,
    ) -> Expression {
        Self::new(self.root.substitute_interval(domain, interval, variable))
    }

    pub fn expand(&self) -> Expression {
        Self::new(self.root.expand())
    }

    pub fn manipulate<M: Manipulator + ?Sized>(&self, manipulator: &mut M) -> Expression {
        Self::new(self.root.manipulate(manipulator))
    }

    /// Raises the expression to the power `exponent`.
    pub fn pow(self, exponent: impl Into<Expression>) -> Expression {
        Self::new(Expr::binary(
            BinaryOp::Pow,
            self.into_node(),
            exponent.into().into_node(),
        ))
    }

    /// Wraps a copy of the tree into a thread-safe closure over a coordinate slice.
    pub fn to_function(&self) -> ScalarFunction {
        let root = self.root.clone();
        Arc::new(move |values: &[f64]| root.evaluate_at(values))
    }
}

impl Deref for Expression {
    type Target = Expr;

    fn deref(&self) -> &Expr {
        &self.root
    }
}

impl AsRef<Expr> for Expression {
    fn as_ref(&self) -> &Expr {
        &self.root
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root)
    }
}

impl From<Expr> for Expression {
    fn from(node: Expr) -> Self {
        Self::new(node)
    }
}

impl From<&Expression> for Expression {
    fn from(expression: &Expression) -> Self {
        expression.clone()
    }
}

impl From<f64> for Expression {
    fn from(value: f64) -> Self {
        Self::constant(value)
    }
}

impl From<i32> for Expression {
    fn from(value: i32) -> Self {
        Self::constant(f64::from(value))
    }
}

impl From<Variable> for Expression {
    fn from(var: Variable) -> Self {
        Self::new(var)
    }
}

impl From<FunctionSymbol> for Expression {
    fn from(func: FunctionSymbol) -> Self {
        Self::new(func)
    }
}

impl From<VectorExpr> for Expression {
    fn from(vector: VectorExpr) -> Self {
        Self::new(vector)
    }
}

impl From<Vec<Expression>> for Expression {
    fn from(elements: Vec<Expression>) -> Self {
        Self::vector(elements)
    }
}

impl From<Expression> for Expr {
    fn from(expression: Expression) -> Self {
        expression.into_node()
    }
}

impl TryFrom<&Expression> for Wrt {
    type Error = ExprError;

    fn try_from(expression: &Expression) -> Result<Self, Self::Error> {
        Wrt::try_from(expression.node())
    }
}

macro_rules! impl_binary_operator {
    ($trait:ident, $method:ident, $op:expr) => {
        impl<R: Into<Expression>> $trait<R> for Expression {
            type Output = Expression;

            fn $method(self, rhs: R) -> Expression {
                Expression::new(Expr::combine($op, self.into_node(), rhs.into().into_node()))
            }
        }

        impl<R: Into<Expression>> $trait<R> for &Expression {
            type Output = Expression;

            fn $method(self, rhs: R) -> Expression {
                $trait::$method(self.clone(), rhs)
            }
        }

        impl $trait<Expression> for f64 {
            type Output = Expression;

            fn $method(self, rhs: Expression) -> Expression {
                $trait::$method(Expression::constant(self), rhs)
            }
        }

        impl $trait<&Expression> for f64 {
            type Output = Expression;

            fn $method(self, rhs: &Expression) -> Expression {
                $trait::$method(Expression::constant(self), rhs)
            }
        }
    };
}

impl_binary_operator!(Add, add, BinaryOp::Add);
impl_binary_operator!(Sub, sub, BinaryOp::Sub);
impl_binary_operator!(Mul, mul, BinaryOp::Mul);
impl_binary_operator!(Div, div, BinaryOp::Div);

impl Neg for Expression {
    type Output = Expression;

    fn neg(self) -> Expression {
        Expression::new(self.into_node().negate())
    }
}

impl Neg for &Expression {
    type Output = Expression;

    fn neg(self) -> Expression {
        -self.clone()
    }
}

macro_rules! unary_function {
    ($(#[$doc:meta])* $name:ident, $op:expr) => {
        $(#[$doc])*
        pub fn $name(operand: impl Into<Expression>) -> Expression {
            Expression::new(Expr::unary($op, operand.into().into_node()))
        }
    };
}

unary_function!(
    /// Identity operator; simplification removes it.
    identity,
    UnaryOp::Identity
);
unary_function!(exp, UnaryOp::Exp);
unary_function!(sin, UnaryOp::Sin);
unary_function!(cos, UnaryOp::Cos);
unary_function!(tan, UnaryOp::Tan);
unary_function!(abs, UnaryOp::Abs);
unary_function!(sqrt, UnaryOp::Sqrt);
unary_function!(
    /// Natural logarithm.
    log,
    UnaryOp::Ln
);
unary_function!(log10, UnaryOp::Log10);
unary_function!(
    /// Spatial gradient; only meaningful for symbolic manipulation.
    grad,
    UnaryOp::Gradient
);
unary_function!(
    /// Divergence of a vector field; only meaningful for symbolic manipulation.
    div,
    UnaryOp::Divergence
);

pub fn pow(base: impl Into<Expression>, exponent: impl Into<Expression>) -> Expression {
    base.into().pow(exponent)
}

/// Partial derivative node `d/dx_id(operand)`, evaluated by differentiating on demand.
pub fn partial(operand: impl Into<Expression>, variable: Variable) -> Expression {
    Expression::new(Expr::unary(
        UnaryOp::Partial(variable.id),
        operand.into().into_node(),
    ))
}

/// Definite integral of `operand` over `interval` with respect to `variable`.
pub fn integral(
    operand: impl Into<Expression>,
    interval: Interval,
    variable: Variable,
) -> Expression {
    Expression::new(Expr::unary(
        UnaryOp::Integral(interval, variable.id),
        operand.into().into_node(),
    ))
}

/// Integral over a placeholder domain, bound later with [`substitute_interval`].
pub fn symbolic_integral(operand: impl Into<Expression>, domain: SymbolicInterval) -> Expression {
    Expression::new(Expr::unary(
        UnaryOp::SymbolicIntegral(domain),
        operand.into().into_node(),
    ))
}

/// Evaluates `expr` at `point`.
pub fn eval<P: Point + ?Sized>(expr: &Expression, point: &P) -> Result<f64, ExprError> {
    expr.eval(point)
}

/// Replaces every occurrence of `target` in `expr` with `replacement`.
pub fn substitute(target: &Expression, replacement: &Expression, expr: &Expression) -> Expression {
    expr.substitute(target, replacement)
}

/// Replaces `targets[i]` with `replacements[i]` in `expr`; the first matching target wins.
pub fn substitute_all(
    targets: &[Expression],
    replacements: &[Expression],
    expr: &Expression,
) -> Result<Expression, ExprError> {
    expr.substitute_all(targets, replacements)
}

/// Turns every integral over `domain` in `expr` into a definite integral.
pub fn substitute_interval(
    domain: SymbolicInterval,
    interval: Interval,
    variable: Variable,
    expr: &Expression,
) -> Expression {
    expr.substitute_interval(domain, interval, variable)
}

/// Simplified derivative of `expr` with respect to a variable or function symbol.
pub fn diff(expr: &Expression, wrt: impl Into<Wrt>) -> Result<Expression, ExprError> {
    expr.diff(wrt)
}

pub fn simplify(expr: &Expression) -> Result<Expression, ExprError> {
    expr.simplify()
}

/// Simplifies `expr` in place until no rule applies any more.
///
/// On error the expression is left untouched.
pub fn inplace_simplify(expr: &mut Expression) -> Result<(), ExprError> {
    inplace_simplify_with(expr, SimplifyOptions::default())
}

/// Same as [`inplace_simplify`] with an explicit iteration budget.
pub fn inplace_simplify_with(
    expr: &mut Expression,
    options: SimplifyOptions,
) -> Result<(), ExprError> {
    let simplified = expr.root.simplify_with(options)?;
    expr.set(simplified);
    Ok(())
}

pub fn expand(expr: &Expression) -> Expression {
    expr.expand()
}

pub fn manipulate<M: Manipulator + ?Sized>(expr: &Expression, manipulator: &mut M) -> Expression {
    expr.manipulate(manipulator)
}

pub fn traverse<T: Traverser + ?Sized>(expr: &Expression, traverser: &mut T) {
    expr.root.traverse(traverser)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn x() -> Expression {
        Expression::var(0)
    }

    fn y() -> Expression {
        Expression::var(1)
    }

    #[test]
    fn test_operator_overloads() {
        let f = (x() + 1.0) * (2.0 - &y()) / 4;
        assert_eq!(f.to_string(), "(((x0 + 1) * (2 - x1)) / 4)");
        assert_eq!(f.eval(&[3.0, -2.0]).unwrap(), 4.0);

        let g = -(&x() * &x());
        assert_eq!(g.eval(&3.0).unwrap(), -9.0);
    }

    #[test]
    fn test_literals_become_constants() {
        assert_eq!(Expression::from(3), Expression::constant(3.0));
        assert!(Expression::from(2.5).is_constant());
        assert_eq!(Expression::default().node(), &Expr::Const(0.0));
    }

    #[test]
    fn test_set_replaces_tree() {
        let mut expr = x() + y();
        expr.set(Expr::Const(1.0));
        assert_eq!(expr, Expression::constant(1.0));
    }

    #[test]
    fn test_vector_dispatch() {
        let v = Expression::vector(vec![x(), y()]);
        let w = Expression::vector(vec![Expression::from(1.0), Expression::from(2.0)]);

        // vector * vector is the dot product
        let dot = &v * &w;
        assert_eq!(dot.to_string(), "((x0 * 1) + (x1 * 2))");
        assert_eq!(dot.eval(&[3.0, 4.0]).unwrap(), 11.0);

        // vector + vector and scaling are elementwise
        assert_eq!((&v + &w).to_string(), "[(x0 + 1), (x1 + 2)]");
        assert_eq!((2.0 * &v).to_string(), "[(2 * x0), (2 * x1)]");
        assert_eq!((&v / 2.0).to_string(), "[(x0 / 2), (x1 / 2)]");
        assert_eq!((-&v).to_string(), "[-(x0), -(x1)]");

        // Vectors of different length fall back to a plain node
        let mismatched = &v + Expression::zeros(3);
        assert!(matches!(mismatched.node(), Expr::Binary(_)));
        assert!(matches!(
            mismatched.eval(&[1.0, 2.0]),
            Err(ExprError::NotEvaluable(_))
        ));
    }

    #[test]
    fn test_functions() {
        let at = 0.5_f64;
        assert_relative_eq!(exp(x()).eval(&at).unwrap(), at.exp());
        assert_relative_eq!(sin(x()).eval(&at).unwrap(), at.sin());
        assert_relative_eq!(cos(x()).eval(&at).unwrap(), at.cos());
        assert_relative_eq!(tan(x()).eval(&at).unwrap(), at.tan());
        assert_relative_eq!(sqrt(x()).eval(&at).unwrap(), at.sqrt());
        assert_relative_eq!(log(x()).eval(&at).unwrap(), at.ln());
        assert_relative_eq!(log10(x()).eval(&at).unwrap(), at.log10());
        assert_eq!(abs(-x()).eval(&at).unwrap(), at);
        assert_eq!(identity(x()).eval(&at).unwrap(), at);
        assert_eq!(pow(x(), 2).eval(&at).unwrap(), 0.25);
        assert!(matches!(grad(x()).eval(&at), Err(ExprError::NotEvaluable(_))));
        assert!(matches!(div(x()).eval(&at), Err(ExprError::NotEvaluable(_))));
    }

    #[test]
    fn test_partial_and_integrals() {
        let f = partial(&x() * &x() * &y(), Variable::new(0));
        assert_eq!(f.eval(&[3.0, 2.0]).unwrap(), 12.0);

        let domain = SymbolicInterval::new(0);
        let g = symbolic_integral(2.0, domain);
        let bound = substitute_interval(domain, Interval::new(1.0, 4.0), Variable::new(0), &g);
        assert_eq!(simplify(&bound).unwrap(), Expression::constant(6.0));

        let h = integral(x(), Interval::new(0.0, 1.0), Variable::new(0));
        assert!(matches!(h.eval(&0.0), Err(ExprError::NotEvaluable(_))));
    }

    #[test]
    fn test_entry_points() {
        // x + y - z with x := 1 - y at (y=2, z=3)
        let z = Expression::var(2);
        let f = x() + y() - &z;
        let substituted = substitute(&x(), &(1.0 - y()), &f);
        assert_eq!(eval(&substituted, &[0.0, 2.0, 3.0]).unwrap(), -2.0);

        let swapped = substitute_all(&[x(), y()], &[y(), x()], &(x() - y())).unwrap();
        assert_eq!(swapped.to_string(), "(x1 - x0)");

        assert_eq!(diff(&(x() + y()), Variable::new(0)).unwrap(), Expression::from(1.0));
        assert_eq!(diff(&sin(x()), Variable::new(0)).unwrap(), cos(x()));
        assert_eq!(diff(&Expression::from(4.0), Variable::new(0)).unwrap(), Expression::from(0.0));

        let expanded = expand(&(2.0 * (x() + y())));
        assert_eq!(expanded.to_string(), "((2 * x0) + (2 * x1))");
    }

    #[test]
    fn test_diff_with_respect_to_function_symbol() {
        let u = Expression::function(0, 0);
        let v = Expression::function(0, 1);
        // Weak form of u^2 * v, derived with respect to u
        let form = &u * &u * &v;
        let wrt = Wrt::try_from(&u).unwrap();
        assert_eq!(form.diff(wrt).unwrap().to_string(), "((f0[0] + f0[0]) * f0[1])");

        assert!(matches!(
            diff(&u, Variable::new(0)),
            Err(ExprError::NotDifferentiable(_))
        ));
        assert!(matches!(
            Wrt::try_from(&(x() + y())),
            Err(ExprError::InvalidDiffVariable(_))
        ));
    }

    #[test]
    fn test_inplace_simplify() {
        let mut f = (x() * 0.0 + y()) * 1.0;
        inplace_simplify(&mut f).unwrap();
        assert_eq!(f, y());

        let mut g = x() * 0.0 + y();
        let before = g.clone();
        assert_eq!(
            inplace_simplify_with(&mut g, SimplifyOptions::with_max_iterations(1)),
            Err(ExprError::SimplifyDidNotConverge(1))
        );
        assert_eq!(g, before);
    }

    #[test]
    fn test_to_function() {
        let f = (x() * &y()).to_function();
        assert_eq!(f(&[2.0, 3.0]).unwrap(), 6.0);
        assert!(matches!(
            f(&[2.0]),
            Err(ExprError::IndexOutOfBounds { id: 1, len: 1 })
        ));
    }

    #[test]
    fn test_traverse_and_manipulate_entry_points() {
        use crate::visit::{NodeCounter, Replace};

        let f = sin(x()) + 3.0;
        let mut counter = NodeCounter::default();
        traverse(&f, &mut counter);
        assert_eq!(counter.count, 4);

        let mut shift = Replace::new(Expr::is_constant, |_: &Expr| Expr::Const(1.0));
        assert_eq!(manipulate(&f, &mut shift).to_string(), "(sin(x0) + 1)");
    }
}
