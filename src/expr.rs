//! Expression module for representing mathematical expressions.
//!
//! This module defines the node types of the runtime expression tree. The main types are:
//!
//! - `Expr`: A closed sum type over every kind of node
//! - `Variable`: A free variable, identified by its index into the evaluation point
//! - `FunctionSymbol`: An abstract, non-evaluable function (unknown or test function)
//! - `UnaryExpr` / `BinaryExpr`: Composite nodes carrying an operator and their operands
//!
//! The tree is built recursively using `Box<Expr>` for nested expressions. Nodes are plain
//! values: no parent links, no sharing, every transformation returns a brand new tree.
//! A node can be:
//! - Evaluated at a point
//! - Symbolically differentiated (see [`crate::derivative`])
//! - Simplified using algebraic rules (see [`crate::simplify`])
//! - Rewritten or inspected through visitors (see [`crate::visit`])
//!
//! # Expression Tree Structure
//! - Leaf nodes: constants, variables and function symbols
//! - Unary nodes: identity, negation, elementary functions, differential and integral operators
//! - Binary nodes: `+`, `-`, `*`, `/`, `^`
//! - Vector nodes: fixed-size sequences of nodes (see [`crate::vector`])

use std::fmt;
use std::mem;

use crate::backends::point::Point;
use crate::derivative::Wrt;
use crate::errors::ExprError;
use crate::operators::{BinaryOp, UnaryOp};
use crate::vector::VectorExpr;

/// A free variable, identified by its index into the evaluation point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Variable {
    pub id: usize,
}

impl Variable {
    pub fn new(id: usize) -> Self {
        Self { id }
    }

    /// Reads the coordinate of this variable from `coordinates`.
    pub fn evaluate(&self, coordinates: &[f64]) -> Result<f64, ExprError> {
        coordinates
            .get(self.id)
            .copied()
            .ok_or(ExprError::IndexOutOfBounds {
                id: self.id,
                len: coordinates.len(),
            })
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}", self.id)
    }
}

/// An abstract function symbol such as an unknown field `u` or a test function `v`.
///
/// The `tag` separates families of symbols sharing the same id, so that `(0, 0)` and
/// `(0, 1)` are distinct. Function symbols can be differentiated against (Gateaux
/// derivatives) but never evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FunctionSymbol {
    pub id: usize,
    pub tag: usize,
}

impl FunctionSymbol {
    pub fn new(id: usize, tag: usize) -> Self {
        Self { id, tag }
    }
}

impl fmt::Display for FunctionSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "f{}[{}]", self.id, self.tag)
    }
}

/// A unary operator applied to a single child expression.
#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpr {
    pub op: UnaryOp,
    pub child: Box<Expr>,
}

/// A binary operator applied to a left and a right operand.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr {
    pub op: BinaryOp,
    pub lhs: Box<Expr>,
    pub rhs: Box<Expr>,
}

/// An expression tree node.
///
/// This enum represents every kind of node that can appear in an expression tree:
/// - Leaves: constants, variables and function symbols
/// - Composites: unary and binary operator applications
/// - Vectors of expressions
///
/// Each node exclusively owns its children, so cloning a node deep copies the whole subtree.
/// Equality is structural: constants compare by bit pattern as well as by value, so a tree
/// holding `NaN` still equals its own clone.
#[derive(Debug, Clone)]
pub enum Expr {
    /// A constant floating point value
    Const(f64),
    /// A reference to a coordinate of the evaluation point
    Var(Variable),
    /// An abstract, non-evaluable function
    Func(FunctionSymbol),
    /// A unary operator node
    Unary(UnaryExpr),
    /// A binary operator node
    Binary(BinaryExpr),
    /// A fixed-size vector of expressions
    Vector(VectorExpr),
}

/// Constant equality used by the tree: `0 == -0` and `NaN` equals an identical `NaN`.
pub(crate) fn same_constant(a: f64, b: f64) -> bool {
    a.to_bits() == b.to_bits() || a == b
}

impl PartialEq for Expr {
    fn eq(&self, other: &Expr) -> bool {
        match (self, other) {
            (Expr::Const(a), Expr::Const(b)) => same_constant(*a, *b),
            (Expr::Var(a), Expr::Var(b)) => a == b,
            (Expr::Func(a), Expr::Func(b)) => a == b,
            (Expr::Unary(a), Expr::Unary(b)) => a == b,
            (Expr::Binary(a), Expr::Binary(b)) => a == b,
            (Expr::Vector(a), Expr::Vector(b)) => a == b,
            _ => false,
        }
    }
}

impl Default for Expr {
    fn default() -> Self {
        Expr::Const(0.0)
    }
}

impl Expr {
    pub fn constant(value: f64) -> Self {
        Expr::Const(value)
    }

    pub fn var(id: usize) -> Self {
        Expr::Var(Variable::new(id))
    }

    pub fn function(id: usize, tag: usize) -> Self {
        Expr::Func(FunctionSymbol::new(id, tag))
    }

    /// Builds `op(child)`.
    pub fn unary(op: UnaryOp, child: Expr) -> Self {
        Expr::Unary(UnaryExpr {
            op,
            child: Box::new(child),
        })
    }

    /// Builds `lhs op rhs`.
    pub fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Self {
        Expr::Binary(BinaryExpr {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        })
    }

    /// Combines two expressions with a binary operator, resolving vector operands.
    ///
    /// - vector `+`/`-` vector of equal length: elementwise
    /// - vector `*` vector of equal length: dot product
    /// - vector `*`/`/` scalar and scalar `*` vector: elementwise
    /// - anything else: a plain binary node
    pub fn combine(op: BinaryOp, lhs: Expr, rhs: Expr) -> Self {
        match (lhs, rhs) {
            (Expr::Vector(a), Expr::Vector(b)) if a.len() == b.len() => match op {
                BinaryOp::Add | BinaryOp::Sub => Expr::Vector(a.zip_with(&b, op)),
                BinaryOp::Mul => a.dot_unchecked(&b),
                _ => Expr::binary(op, Expr::Vector(a), Expr::Vector(b)),
            },
            (Expr::Vector(a), scalar)
                if matches!(op, BinaryOp::Mul | BinaryOp::Div)
                    && !matches!(scalar, Expr::Vector(_)) =>
            {
                Expr::Vector(a.map(|e| Expr::combine(op, e.clone(), scalar.clone())))
            }
            (scalar, Expr::Vector(b))
                if op == BinaryOp::Mul && !matches!(scalar, Expr::Vector(_)) =>
            {
                Expr::Vector(b.map(|e| Expr::combine(op, scalar.clone(), e.clone())))
            }
            (lhs, rhs) => Expr::binary(op, lhs, rhs),
        }
    }

    /// Negates an expression; vectors are negated elementwise.
    pub fn negate(self) -> Self {
        match self {
            Expr::Vector(v) => Expr::Vector(v.map(|e| e.clone().negate())),
            other => Expr::unary(UnaryOp::Neg, other),
        }
    }

    /// Returns true only for constant leaves.
    pub fn is_constant(&self) -> bool {
        matches!(self, Expr::Const(_))
    }

    pub fn is_zero(&self) -> bool {
        matches!(self, Expr::Const(c) if *c == 0.0)
    }

    pub fn is_one(&self) -> bool {
        matches!(self, Expr::Const(c) if *c == 1.0)
    }

    pub fn as_const(&self) -> Option<f64> {
        match self {
            Expr::Const(c) => Some(*c),
            _ => None,
        }
    }

    /// Returns the value of a constant node.
    ///
    /// # Returns
    /// The constant, `ExprError::NotEvaluable` for function symbols and vectors, and
    /// `ExprError::NotUnwrappable` for every other node
    pub fn value(&self) -> Result<f64, ExprError> {
        match self {
            Expr::Const(c) => Ok(*c),
            Expr::Func(_) | Expr::Vector(_) => Err(ExprError::NotEvaluable(self.to_string())),
            _ => Err(ExprError::NotUnwrappable(self.to_string())),
        }
    }

    /// Evaluates the expression at a point.
    ///
    /// Variables read their coordinate by id, so the point must have at least
    /// `max id + 1` coordinates. A scalar is a one-coordinate point.
    ///
    /// # Arguments
    /// * `point` - The coordinates, indexed by variable id
    ///
    /// # Returns
    /// The value of the expression, or the first error raised by a node that cannot
    /// produce a number
    pub fn evaluate<P: Point + ?Sized>(&self, point: &P) -> Result<f64, ExprError> {
        self.evaluate_at(&point.coordinates())
    }

    pub(crate) fn evaluate_at(&self, coordinates: &[f64]) -> Result<f64, ExprError> {
        match self {
            Expr::Const(c) => Ok(*c),
            Expr::Var(var) => var.evaluate(coordinates),
            Expr::Func(_) | Expr::Vector(_) => Err(ExprError::NotEvaluable(self.to_string())),
            Expr::Unary(node) => match node.op {
                UnaryOp::Partial(id) => node
                    .child
                    .derivative(&Wrt::Var(Variable::new(id)))?
                    .evaluate_at(coordinates),
                op if op.is_pointwise() => op.apply(node.child.evaluate_at(coordinates)?),
                _ => Err(ExprError::NotEvaluable(self.to_string())),
            },
            Expr::Binary(node) => node.op.apply(
                node.lhs.evaluate_at(coordinates)?,
                node.rhs.evaluate_at(coordinates)?,
            ),
        }
    }

    /// Structural equality including every subtree and operator payload.
    pub fn deep_eq(&self, other: &Expr) -> bool {
        self == other
    }

    /// Compares only the kind of the two nodes, ignoring operators and children.
    pub fn shallow_eq(&self, other: &Expr) -> bool {
        mem::discriminant(self) == mem::discriminant(other)
    }

    /// Full rendering of the tree, identical to `Display`.
    pub fn deep_string(&self) -> String {
        self.to_string()
    }

    /// Renders the node kind and its operator, without children.
    pub fn shallow_string(&self) -> String {
        match self {
            Expr::Const(c) => format!("Const({c})"),
            Expr::Var(var) => format!("Var({})", var.id),
            Expr::Func(func) => format!("Func({}, {})", func.id, func.tag),
            Expr::Unary(node) => format!("Unary({})", node.op),
            Expr::Binary(node) => format!("Binary({})", node.op),
            Expr::Vector(vector) => format!("Vector({})", vector.len()),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Const(val) => write!(f, "{val}"),
            Expr::Var(var) => write!(f, "{var}"),
            Expr::Func(func) => write!(f, "{func}"),
            Expr::Unary(node) => {
                let child = &node.child;
                match node.op {
                    UnaryOp::Neg => write!(f, "-({child})"),
                    UnaryOp::Abs => write!(f, "|{child}|"),
                    UnaryOp::Integral(interval, id) => write!(f, "int{interval}({child}) dx{id}"),
                    op => write!(f, "{op}({child})"),
                }
            }
            Expr::Binary(node) => match node.op {
                BinaryOp::Pow => write!(f, "({}^{})", node.lhs, node.rhs),
                op => write!(f, "({} {op} {})", node.lhs, node.rhs),
            },
            Expr::Vector(vector) => write!(f, "{vector}"),
        }
    }
}

impl From<f64> for Expr {
    fn from(value: f64) -> Self {
        Expr::Const(value)
    }
}

impl From<Variable> for Expr {
    fn from(var: Variable) -> Self {
        Expr::Var(var)
    }
}

impl From<FunctionSymbol> for Expr {
    fn from(func: FunctionSymbol) -> Self {
        Expr::Func(func)
    }
}

impl From<VectorExpr> for Expr {
    fn from(vector: VectorExpr) -> Self {
        Expr::Vector(vector)
    }
}

impl AsRef<Expr> for Expr {
    fn as_ref(&self) -> &Expr {
        self
    }
}
