//! Traversal and manipulation of expression trees.
//!
//! Two visitor protocols are provided:
//!
//! - [`Manipulator`]: builds a new tree. At every node the manipulator is asked whether it
//!   wants to replace the node; if so its replacement is used as is (no descent into the
//!   original children), otherwise the node is rebuilt from manipulated children.
//! - [`Traverser`]: inspects the tree without building anything. Binary nodes are visited
//!   in-order (left subtree, node, right subtree), unary and vector nodes pre-order.
//!
//! A visitor that does not want to recurse into a composite returns `false` from
//! [`Traverser::step_into`]; the node itself is still visited.

use std::collections::BTreeSet;

use crate::expr::{Expr, FunctionSymbol, Variable};

/// A visitor that rebuilds an expression tree.
pub trait Manipulator {
    /// Returns true if `node` should be replaced by [`Manipulator::apply`].
    fn modifies(&mut self, node: &Expr) -> bool;

    /// Produces the replacement for a node accepted by [`Manipulator::modifies`].
    fn apply(&mut self, node: &Expr) -> Expr;
}

/// A visitor that walks an expression tree.
pub trait Traverser {
    /// Returns true to recurse into the children of a composite node.
    fn step_into(&mut self, node: &Expr) -> bool;

    /// Visits a node.
    fn apply(&mut self, node: &Expr);
}

impl Expr {
    /// Rebuilds the tree through a manipulator.
    ///
    /// # Arguments
    /// * `manipulator` - Decides which nodes to replace and with what
    ///
    /// # Returns
    /// A new expression tree with the replacements applied
    pub fn manipulate<M: Manipulator + ?Sized>(&self, manipulator: &mut M) -> Expr {
        if manipulator.modifies(self) {
            return manipulator.apply(self);
        }
        match self {
            Expr::Const(_) | Expr::Var(_) | Expr::Func(_) => self.clone(),
            Expr::Unary(node) => Expr::unary(node.op, node.child.manipulate(manipulator)),
            Expr::Binary(node) => Expr::binary(
                node.op,
                node.lhs.manipulate(manipulator),
                node.rhs.manipulate(manipulator),
            ),
            Expr::Vector(vector) => Expr::Vector(vector.map(|e| e.manipulate(manipulator))),
        }
    }

    /// Walks the tree with a traverser.
    pub fn traverse<T: Traverser + ?Sized>(&self, traverser: &mut T) {
        match self {
            Expr::Const(_) | Expr::Var(_) | Expr::Func(_) => traverser.apply(self),
            Expr::Unary(node) => {
                let step_into = traverser.step_into(self);
                traverser.apply(self);
                if step_into {
                    node.child.traverse(traverser);
                }
            }
            Expr::Binary(node) => {
                if traverser.step_into(self) {
                    node.lhs.traverse(traverser);
                    traverser.apply(self);
                    node.rhs.traverse(traverser);
                } else {
                    traverser.apply(self);
                }
            }
            Expr::Vector(vector) => {
                let step_into = traverser.step_into(self);
                traverser.apply(self);
                if step_into {
                    for element in vector {
                        element.traverse(traverser);
                    }
                }
            }
        }
    }

    /// Replaces every node matching `predicate` with a copy of `replacement`.
    ///
    /// Matched nodes are replaced whole; their children are not visited.
    ///
    /// # Arguments
    /// * `predicate` - A closure that determines which nodes to replace
    /// * `replacement` - The expression to insert where the predicate matches
    ///
    /// # Returns
    /// A new expression tree with the replacements applied
    pub fn insert<F>(&self, predicate: F, replacement: &Expr) -> Expr
    where
        F: FnMut(&Expr) -> bool,
    {
        self.manipulate(&mut Replace::new(predicate, |_: &Expr| replacement.clone()))
    }

    /// Returns the free variables of the expression, sorted by id.
    pub fn variables(&self) -> Vec<Variable> {
        let mut collector = VariableCollector::default();
        self.traverse(&mut collector);
        collector.variables.into_iter().collect()
    }

    /// Returns the function symbols of the expression, sorted by `(id, tag)`.
    pub fn function_symbols(&self) -> Vec<FunctionSymbol> {
        let mut collector = FunctionSymbolCollector::default();
        self.traverse(&mut collector);
        collector.symbols.into_iter().collect()
    }

    /// Number of nodes in the tree, counting vector nodes and their elements.
    pub fn node_count(&self) -> usize {
        let mut counter = NodeCounter::default();
        self.traverse(&mut counter);
        counter.count
    }
}

/// Collects the distinct variables of a tree.
#[derive(Debug, Default)]
pub struct VariableCollector {
    pub variables: BTreeSet<Variable>,
}

impl Traverser for VariableCollector {
    fn step_into(&mut self, _node: &Expr) -> bool {
        true
    }

    fn apply(&mut self, node: &Expr) {
        if let Expr::Var(var) = node {
            self.variables.insert(*var);
        }
    }
}

/// Collects the distinct function symbols of a tree.
#[derive(Debug, Default)]
pub struct FunctionSymbolCollector {
    pub symbols: BTreeSet<FunctionSymbol>,
}

impl Traverser for FunctionSymbolCollector {
    fn step_into(&mut self, _node: &Expr) -> bool {
        true
    }

    fn apply(&mut self, node: &Expr) {
        if let Expr::Func(func) = node {
            self.symbols.insert(*func);
        }
    }
}

#[derive(Debug, Default)]
pub struct NodeCounter {
    pub count: usize,
}

impl Traverser for NodeCounter {
    fn step_into(&mut self, _node: &Expr) -> bool {
        true
    }

    fn apply(&mut self, _node: &Expr) {
        self.count += 1;
    }
}

/// A manipulator driven by two closures: a predicate selecting nodes and a function
/// producing their replacement.
///
/// # Examples
///
/// ```rust
/// use symexpr::prelude::*;
/// use symexpr::visit::Replace;
///
/// // Double every constant
/// let expr = Expr::binary(BinaryOp::Add, Expr::var(0), Expr::Const(2.0));
/// let mut doubler = Replace::new(Expr::is_constant, |node: &Expr| {
///     Expr::Const(2.0 * node.value().unwrap())
/// });
/// assert_eq!(expr.manipulate(&mut doubler).to_string(), "(x0 + 4)");
/// ```
pub struct Replace<P, F> {
    predicate: P,
    replacement: F,
}

impl<P, F> Replace<P, F>
where
    P: FnMut(&Expr) -> bool,
    F: FnMut(&Expr) -> Expr,
{
    pub fn new(predicate: P, replacement: F) -> Self {
        Self {
            predicate,
            replacement,
        }
    }
}

impl<P, F> Manipulator for Replace<P, F>
where
    P: FnMut(&Expr) -> bool,
    F: FnMut(&Expr) -> Expr,
{
    fn modifies(&mut self, node: &Expr) -> bool {
        (self.predicate)(node)
    }

    fn apply(&mut self, node: &Expr) -> Expr {
        (self.replacement)(node)
    }
}
