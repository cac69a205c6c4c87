//! Conversion module for turning externally composed expressions into runtime trees.
//!
//! Code that builds expressions through its own (possibly statically typed) types can
//! implement [`ToExpr`] to hand them over to the runtime engine for substitution,
//! simplification or differentiation. The crate implements the trait for numbers,
//! leaves, nodes and handles; arrays, `Vec`s and tuples of up to four components become
//! vector expressions.
//!
//! The main entry point is the `build_expr` function, which converts any `ToExpr` value
//! into an [`Expression`].

use crate::expr::{Expr, FunctionSymbol, Variable};
use crate::expression::Expression;
use crate::vector::VectorExpr;

/// Conversion of a value into a runtime expression tree.
///
/// # Examples
///
/// ```rust
/// use symexpr::prelude::*;
///
/// /// A statically typed square `t * t`.
/// struct Square<T>(T);
///
/// impl<T: ToExpr> ToExpr for Square<T> {
///     fn to_expr(&self) -> Expr {
///         let inner = self.0.to_expr();
///         Expr::binary(BinaryOp::Mul, inner.clone(), inner)
///     }
/// }
///
/// let expr = build_expr(&Square(Variable::new(0)));
/// assert_eq!(expr.eval(&3.0).unwrap(), 9.0);
/// ```
pub trait ToExpr {
    fn to_expr(&self) -> Expr;
}

impl ToExpr for f64 {
    fn to_expr(&self) -> Expr {
        Expr::Const(*self)
    }
}

impl ToExpr for i32 {
    fn to_expr(&self) -> Expr {
        Expr::Const(f64::from(*self))
    }
}

impl ToExpr for Variable {
    fn to_expr(&self) -> Expr {
        Expr::Var(*self)
    }
}

impl ToExpr for FunctionSymbol {
    fn to_expr(&self) -> Expr {
        Expr::Func(*self)
    }
}

impl ToExpr for Expr {
    fn to_expr(&self) -> Expr {
        self.clone()
    }
}

impl ToExpr for VectorExpr {
    fn to_expr(&self) -> Expr {
        Expr::Vector(self.clone())
    }
}

impl ToExpr for Expression {
    fn to_expr(&self) -> Expr {
        self.node().clone()
    }
}

impl<T: ToExpr + ?Sized> ToExpr for &T {
    fn to_expr(&self) -> Expr {
        (**self).to_expr()
    }
}

impl<T: ToExpr> ToExpr for [T] {
    fn to_expr(&self) -> Expr {
        Expr::Vector(self.iter().map(ToExpr::to_expr).collect())
    }
}

impl<T: ToExpr, const N: usize> ToExpr for [T; N] {
    fn to_expr(&self) -> Expr {
        self.as_slice().to_expr()
    }
}

impl<T: ToExpr> ToExpr for Vec<T> {
    fn to_expr(&self) -> Expr {
        self.as_slice().to_expr()
    }
}

macro_rules! impl_to_expr_for_tuple {
    ($($name:ident),+) => {
        impl<$($name: ToExpr),+> ToExpr for ($($name,)+) {
            #[allow(non_snake_case)]
            fn to_expr(&self) -> Expr {
                let ($($name,)+) = self;
                Expr::Vector(VectorExpr::new(vec![$($name.to_expr()),+]))
            }
        }
    };
}

impl_to_expr_for_tuple!(A, B);
impl_to_expr_for_tuple!(A, B, C);
impl_to_expr_for_tuple!(A, B, C, D);

/// Converts any [`ToExpr`] value into an owned expression handle.
///
/// # Arguments
/// * `value` - The externally composed expression
///
/// # Returns
/// A new handle owning the converted tree
pub fn build_expr<T: ToExpr + ?Sized>(value: &T) -> Expression {
    Expression::new(value.to_expr())
}

impl Expression {
    /// Builds a handle from an externally composed expression; see [`build_expr`].
    pub fn from_symbolic<T: ToExpr + ?Sized>(value: &T) -> Self {
        build_expr(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derivative::Wrt;
    use crate::operators::{BinaryOp, UnaryOp};

    /// Statically typed sine node.
    struct Sin<T>(T);

    impl<T: ToExpr> ToExpr for Sin<T> {
        fn to_expr(&self) -> Expr {
            Expr::unary(UnaryOp::Sin, self.0.to_expr())
        }
    }

    /// Statically typed sum node.
    struct Plus<L, R>(L, R);

    impl<L: ToExpr, R: ToExpr> ToExpr for Plus<L, R> {
        fn to_expr(&self) -> Expr {
            Expr::binary(BinaryOp::Add, self.0.to_expr(), self.1.to_expr())
        }
    }

    #[test]
    fn test_numbers_and_leaves() {
        assert_eq!(2.5_f64.to_expr(), Expr::Const(2.5));
        assert_eq!(3_i32.to_expr(), Expr::Const(3.0));
        assert_eq!(Variable::new(1).to_expr(), Expr::var(1));
        assert_eq!(FunctionSymbol::new(0, 1).to_expr(), Expr::function(0, 1));
    }

    #[test]
    fn test_static_composition() {
        // sin(x0) + 1, composed through the static node types
        let composed = Plus(Sin(Variable::new(0)), 1.0_f64);
        let expr = Expression::from_symbolic(&composed);
        assert_eq!(expr.to_string(), "(sin(x0) + 1)");

        let derivative = expr.node().diff(&Wrt::Var(Variable::new(0))).unwrap();
        assert_eq!(derivative, Expr::unary(UnaryOp::Cos, Expr::var(0)));
    }

    #[test]
    fn test_static_vectors() {
        let tuple = (Variable::new(0), 2.0_f64, Sin(0.0_f64));
        assert_eq!(tuple.to_expr().to_string(), "[x0, 2, sin(0)]");

        let array = [Variable::new(0), Variable::new(1)];
        let Expr::Vector(vector) = array.to_expr() else {
            panic!("expected a vector");
        };
        assert_eq!(vector.evaluate_elements(&[4.0, 5.0]).unwrap(), vec![4.0, 5.0]);

        assert_eq!(vec![1_i32, 2].to_expr().to_string(), "[1, 2]");
    }
}
