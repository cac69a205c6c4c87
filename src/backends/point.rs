use std::borrow::Cow;

/// A trait for types that can be used as an evaluation point.
///
/// An evaluation point is an ordered sequence of coordinates indexed by variable id.
/// A bare scalar is a point with a single coordinate, so it can only feed expressions
/// whose free variables are `{x0}`.
///
/// # Examples
///
/// ```rust
/// use symexpr::prelude::Point;
///
/// let point = vec![1.0, 2.0, 3.0];
/// assert_eq!(point.coordinates()[1], 2.0);
/// assert_eq!(Point::len(&point), 3);
///
/// // A scalar is a one-dimensional point
/// assert_eq!(Point::len(&4.0), 1);
/// ```
pub trait Point {
    /// Returns the coordinates of the point, borrowing them where the layout allows.
    fn coordinates(&self) -> Cow<'_, [f64]>;

    /// Returns the number of coordinates.
    fn len(&self) -> usize {
        self.coordinates().len()
    }

    /// Checks if the point has no coordinates.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Point for f64 {
    fn coordinates(&self) -> Cow<'_, [f64]> {
        Cow::Borrowed(std::slice::from_ref(self))
    }
}

impl Point for [f64] {
    fn coordinates(&self) -> Cow<'_, [f64]> {
        Cow::Borrowed(self)
    }
}

impl<const N: usize> Point for [f64; N] {
    fn coordinates(&self) -> Cow<'_, [f64]> {
        Cow::Borrowed(self.as_slice())
    }
}

/// Implementation of Point for standard Vec<f64>.
///
/// ```rust
/// use symexpr::prelude::*;
///
/// let x = Expression::var(0);
/// let y = Expression::var(1);
/// let sum = x + y;
/// assert_eq!(sum.eval(&vec![1.0, 2.0]).unwrap(), 3.0);
/// ```
impl Point for Vec<f64> {
    fn coordinates(&self) -> Cow<'_, [f64]> {
        Cow::Borrowed(self.as_slice())
    }
}

impl<P: Point + ?Sized> Point for &P {
    fn coordinates(&self) -> Cow<'_, [f64]> {
        (**self).coordinates()
    }
}

/// Implementation of Point for ndarray's Array1<f64>.
///
/// Contiguous arrays are borrowed; strided views are copied into an owned buffer.
///
/// # Examples
///
/// ```rust
/// use symexpr::prelude::*;
/// use ndarray::Array1;
///
/// let point = Array1::from_vec(vec![1.0, 2.0]);
/// let expr = Expression::var(0) * Expression::var(1);
/// assert_eq!(expr.eval(&point).unwrap(), 2.0);
/// ```
#[cfg(feature = "ndarray")]
impl Point for ndarray::Array1<f64> {
    fn coordinates(&self) -> Cow<'_, [f64]> {
        match self.as_slice() {
            Some(slice) => Cow::Borrowed(slice),
            None => Cow::Owned(self.to_vec()),
        }
    }
}

/// Implementation of Point for nalgebra's DVector<f64>.
///
/// # Examples
///
/// ```rust
/// use symexpr::prelude::*;
/// use nalgebra::DVector;
///
/// let point = DVector::from_vec(vec![3.0, 4.0]);
/// let expr = Expression::var(0) - Expression::var(1);
/// assert_eq!(expr.eval(&point).unwrap(), -1.0);
/// ```
#[cfg(feature = "nalgebra")]
impl Point for nalgebra::DVector<f64> {
    fn coordinates(&self) -> Cow<'_, [f64]> {
        Cow::Borrowed(self.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_point() {
        assert_eq!(Point::len(&2.5), 1);
        assert_eq!(2.5.coordinates().as_ref(), &[2.5]);
    }

    #[test]
    fn test_slice_and_array_points() {
        let array = [1.0, 2.0, 3.0];
        assert_eq!(Point::len(&array), 3);
        assert_eq!(array[..].coordinates().as_ref(), &[1.0, 2.0, 3.0]);
        let empty: Vec<f64> = Vec::new();
        assert!(Point::is_empty(&empty));
    }

    #[cfg(feature = "ndarray")]
    #[test]
    fn test_ndarray_inverted_array_is_copied() {
        use ndarray::{Array1, Axis};

        let mut array = Array1::from_vec(vec![0.0, 1.0, 2.0, 3.0]);
        array.invert_axis(Axis(0));
        assert_eq!(array.coordinates().as_ref(), &[3.0, 2.0, 1.0, 0.0]);
    }
}
