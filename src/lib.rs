//! Runtime symbolic expression trees with substitution, simplification and differentiation.
//!
//! This crate builds mathematical expressions as trees at runtime and manipulates them
//! symbolically: substitution of subtrees, bounded rule-based simplification, symbolic
//! differentiation (including Gateaux derivatives with respect to function symbols) and
//! distributive expansion. Equations and equation systems on top of the trees hand
//! residuals, gradients, Hessians and Jacobians to downstream numerical code.
//!
//! # Features
//!
//! - Expression handles with natural operator syntax
//! - Visitor framework for custom tree rewrites and read-only walks
//! - Evaluation at scalars, slices, arrays, `Vec`s and (optionally) nalgebra / ndarray vectors
//! - Vector-valued expressions with elementwise arithmetic and dot products
//! - Bridge trait for statically composed expressions
//!
//! # Example
//!
//! ```rust
//! use symexpr::prelude::*;
//!
//! let x = Expression::var(0);
//! let y = Expression::var(1);
//!
//! // x * y + 8
//! let expr = &x * &y + 8.0;
//! assert_eq!(expr.eval(&[2.0, 3.0]).unwrap(), 14.0);
//!
//! // d/dx (x * y + 8) = y
//! let dx = diff(&expr, Variable::new(0)).unwrap();
//! assert_eq!(dx, y);
//!
//! // x := 1 - y
//! let substituted = expr.substitute(&x, &(1.0 - &y));
//! assert_eq!(substituted.eval(&[0.0, 2.0]).unwrap(), 6.0);
//! ```

pub use equation::{make_equation, Equation};
pub use system::EquationSystem;

pub mod prelude {
    pub use crate::backends::point::Point;
    pub use crate::convert::{build_expr, ToExpr};
    pub use crate::derivative::Wrt;
    pub use crate::equation::{make_equation, Equation};
    pub use crate::errors::{EquationError, ExprError};
    pub use crate::expr::{Expr, FunctionSymbol, Variable};
    pub use crate::expression::{
        abs, cos, diff, div, eval, exp, expand, grad, identity, inplace_simplify,
        inplace_simplify_with, integral, log, log10, manipulate, partial, pow, simplify, sin,
        sqrt, substitute, substitute_all, substitute_interval, symbolic_integral, tan, traverse,
        Expression,
    };
    pub use crate::interval::{Interval, SymbolicInterval};
    pub use crate::operators::{BinaryOp, UnaryOp};
    pub use crate::simplify::SimplifyOptions;
    pub use crate::system::EquationSystem;
    pub use crate::vector::VectorExpr;
    pub use crate::visit::{Manipulator, Replace, Traverser};
}

/// Evaluation points
pub mod backends {
    pub mod point;
}
/// Bridge from externally composed expressions
pub mod convert;
/// Symbolic differentiation
pub mod derivative;
/// High-level equation handling
pub mod equation;
/// Error types for the various failure modes
pub mod errors;
/// Distributive expansion
pub mod expand;
/// Expression tree nodes
pub mod expr;
/// Owning expression handle and free-function API
pub mod expression;
/// Integration domains
pub mod interval;
/// Unary and binary operators
pub mod operators;
/// Bounded fixed-point simplification
pub mod simplify;
/// Substitution of subtrees
pub mod substitute;
/// System of equations
pub mod system;
/// Closure types handed to numerical code
pub mod types;
/// Vector-valued expressions
pub mod vector;
/// Tree manipulation and traversal visitors
pub mod visit;
