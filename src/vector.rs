//! Vector expressions.
//!
//! A `VectorExpr` is an ordered, fixed-size sequence of expression nodes. Vectors support
//! elementwise `+` and `-`, scaling by a scalar expression and the dot product. They
//! cannot be evaluated to a single number; use [`VectorExpr::evaluate_elements`] instead.

use std::fmt;
use std::slice;

use itertools::Itertools;

use crate::backends::point::Point;
use crate::errors::ExprError;
use crate::expr::Expr;
use crate::operators::BinaryOp;

/// A fixed-size vector of expressions.
///
/// # Examples
///
/// ```rust
/// use symexpr::prelude::*;
///
/// let v = VectorExpr::new(vec![Expr::var(0), Expr::Const(2.0)]);
/// assert_eq!(v.len(), 2);
/// assert_eq!(v.evaluate_elements(&[3.0]).unwrap(), vec![3.0, 2.0]);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VectorExpr {
    elements: Vec<Expr>,
}

impl VectorExpr {
    pub fn new(elements: Vec<Expr>) -> Self {
        Self { elements }
    }

    /// Creates a vector of `len` zero constants.
    pub fn zeros(len: usize) -> Self {
        Self {
            elements: vec![Expr::Const(0.0); len],
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Expr> {
        self.elements.get(index)
    }

    /// Replaces the element at `index`; the vector never grows.
    pub fn set(&mut self, index: usize, element: Expr) -> Result<(), ExprError> {
        let len = self.elements.len();
        let slot = self
            .elements
            .get_mut(index)
            .ok_or(ExprError::IndexOutOfBounds { id: index, len })?;
        *slot = element;
        Ok(())
    }

    pub fn iter(&self) -> slice::Iter<'_, Expr> {
        self.elements.iter()
    }

    pub fn elements(&self) -> &[Expr] {
        &self.elements
    }

    pub fn into_elements(self) -> Vec<Expr> {
        self.elements
    }

    /// Builds a new vector by applying `f` to every element.
    pub fn map<F>(&self, f: F) -> VectorExpr
    where
        F: FnMut(&Expr) -> Expr,
    {
        VectorExpr::new(self.elements.iter().map(f).collect())
    }

    /// Same as [`VectorExpr::map`] for fallible element transformations.
    pub fn try_map<F>(&self, f: F) -> Result<VectorExpr, ExprError>
    where
        F: FnMut(&Expr) -> Result<Expr, ExprError>,
    {
        Ok(VectorExpr::new(
            self.elements.iter().map(f).collect::<Result<_, _>>()?,
        ))
    }

    /// Elementwise sum; fails when the lengths differ.
    pub fn try_add(&self, other: &VectorExpr) -> Result<VectorExpr, ExprError> {
        self.check_dimension(other)?;
        Ok(self.zip_with(other, BinaryOp::Add))
    }

    /// Elementwise difference; fails when the lengths differ.
    pub fn try_sub(&self, other: &VectorExpr) -> Result<VectorExpr, ExprError> {
        self.check_dimension(other)?;
        Ok(self.zip_with(other, BinaryOp::Sub))
    }

    /// Multiplies every element by `factor`.
    pub fn scale(&self, factor: &Expr) -> VectorExpr {
        self.map(|e| Expr::combine(BinaryOp::Mul, e.clone(), factor.clone()))
    }

    /// Divides every element by `divisor`.
    pub fn div_scalar(&self, divisor: &Expr) -> VectorExpr {
        self.map(|e| Expr::combine(BinaryOp::Div, e.clone(), divisor.clone()))
    }

    /// Dot product `a0 * b0 + a1 * b1 + ...`; the empty dot product is zero.
    pub fn dot(&self, other: &VectorExpr) -> Result<Expr, ExprError> {
        self.check_dimension(other)?;
        Ok(self.dot_unchecked(other))
    }

    /// Evaluates every element at `point`.
    pub fn evaluate_elements<P: Point + ?Sized>(&self, point: &P) -> Result<Vec<f64>, ExprError> {
        let coordinates = point.coordinates();
        self.elements
            .iter()
            .map(|e| e.evaluate_at(&coordinates))
            .collect()
    }

    pub(crate) fn zip_with(&self, other: &VectorExpr, op: BinaryOp) -> VectorExpr {
        VectorExpr::new(
            self.elements
                .iter()
                .zip(&other.elements)
                .map(|(a, b)| Expr::combine(op, a.clone(), b.clone()))
                .collect(),
        )
    }

    pub(crate) fn dot_unchecked(&self, other: &VectorExpr) -> Expr {
        self.elements
            .iter()
            .zip(&other.elements)
            .map(|(a, b)| Expr::combine(BinaryOp::Mul, a.clone(), b.clone()))
            .reduce(|acc, term| Expr::binary(BinaryOp::Add, acc, term))
            .unwrap_or(Expr::Const(0.0))
    }

    fn check_dimension(&self, other: &VectorExpr) -> Result<(), ExprError> {
        if self.len() == other.len() {
            Ok(())
        } else {
            Err(ExprError::DimensionMismatch(self.len(), other.len()))
        }
    }
}

impl FromIterator<Expr> for VectorExpr {
    fn from_iter<I: IntoIterator<Item = Expr>>(iter: I) -> Self {
        VectorExpr::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a VectorExpr {
    type Item = &'a Expr;
    type IntoIter = slice::Iter<'a, Expr>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for VectorExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.elements.iter().join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xy() -> VectorExpr {
        VectorExpr::new(vec![Expr::var(0), Expr::var(1)])
    }

    #[test]
    fn test_zeros() {
        let v = VectorExpr::zeros(3);
        assert_eq!(v.len(), 3);
        assert!(v.iter().all(Expr::is_zero));
        assert!(VectorExpr::zeros(0).is_empty());
    }

    #[test]
    fn test_set_stays_in_bounds() {
        let mut v = VectorExpr::zeros(2);
        v.set(1, Expr::var(0)).unwrap();
        assert_eq!(v.get(1), Some(&Expr::var(0)));
        assert_eq!(
            v.set(2, Expr::Const(1.0)),
            Err(ExprError::IndexOutOfBounds { id: 2, len: 2 })
        );
    }

    #[test]
    fn test_elementwise_arithmetic() {
        let point = [2.0, 3.0];
        let ones = VectorExpr::new(vec![Expr::Const(1.0), Expr::Const(1.0)]);

        let sum = xy().try_add(&ones).unwrap();
        assert_eq!(sum.evaluate_elements(&point).unwrap(), vec![3.0, 4.0]);

        let diff = xy().try_sub(&ones).unwrap();
        assert_eq!(diff.evaluate_elements(&point).unwrap(), vec![1.0, 2.0]);

        let scaled = xy().scale(&Expr::Const(3.0));
        assert_eq!(scaled.evaluate_elements(&point).unwrap(), vec![6.0, 9.0]);

        let halved = xy().div_scalar(&Expr::Const(2.0));
        assert_eq!(halved.evaluate_elements(&point).unwrap(), vec![1.0, 1.5]);
    }

    #[test]
    fn test_dimension_mismatch() {
        assert_eq!(
            xy().try_add(&VectorExpr::zeros(3)),
            Err(ExprError::DimensionMismatch(2, 3))
        );
        assert!(matches!(
            xy().dot(&VectorExpr::zeros(1)),
            Err(ExprError::DimensionMismatch(2, 1))
        ));
    }

    #[test]
    fn test_dot() {
        let dot = xy().dot(&xy()).unwrap();
        assert_eq!(dot.to_string(), "((x0 * x0) + (x1 * x1))");
        assert_eq!(dot.evaluate(&[3.0, 4.0]).unwrap(), 25.0);
        assert_eq!(
            VectorExpr::default().dot(&VectorExpr::default()).unwrap(),
            Expr::Const(0.0)
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(xy().to_string(), "[x0, x1]");
        assert_eq!(VectorExpr::default().to_string(), "[]");
    }
}
