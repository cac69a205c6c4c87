//! Scalar equations and their derivatives.
//!
//! This module provides the `Equation` type, the bridge between the symbolic engine and
//! downstream numerical code. An equation `lhs = rhs` is stored as its simplified residual
//! `lhs - rhs`; the first and second order partial derivatives of the residual are derived
//! symbolically on creation so evaluating them later only walks the trees.
//!
//! # Features
//!
//! - Residual evaluation at any [`Point`]
//! - Gradient and Hessian over the sorted variable set
//! - Higher-order derivatives, as a single expression or stacked into a system
//! - Black-box closure for solvers that only need `f(x)`
//!
//! # Example
//!
//! ```
//! use symexpr::prelude::*;
//!
//! let x = Expression::var(0);
//! let y = Expression::var(1);
//!
//! // 2x + y^2 = 0
//! let eq = Equation::new(&x * 2.0 + &y * &y, 0.0).unwrap();
//! assert_eq!(eq.eval(&[1.0, 2.0]).unwrap(), 6.0);
//! assert_eq!(eq.gradient(&[1.0, 2.0]).unwrap(), vec![2.0, 4.0]);
//! assert_eq!(
//!     eq.hessian(&[1.0, 2.0]).unwrap(),
//!     vec![vec![0.0, 0.0], vec![0.0, 2.0]]
//! );
//! ```
//!
//! # Variable Handling
//!
//! Inputs are indexed by variable id, not by position in the sorted variable list: an
//! equation over `x0` and `x2` needs at least three input values.

use std::collections::HashMap;
use std::fmt;

use colored::Colorize;
use itertools::Itertools;
use log::debug;

use crate::backends::point::Point;
use crate::errors::{EquationError, ExprError};
use crate::expr::Variable;
use crate::expression::Expression;
use crate::system::EquationSystem;
use crate::types::ScalarFunction;

/// Represents an equation `lhs = rhs` that can be evaluated and differentiated.
///
/// This struct holds both sides of the equation and, derived from their residual:
/// - A black-box evaluation closure
/// - The first order partial derivatives, one per variable
/// - The second order partial derivatives (Hessian), in sorted variable order
///
/// All derivatives are simplified when the equation is created.
#[derive(Clone)]
pub struct Equation {
    lhs: Expression,
    rhs: Expression,
    residual: Expression,
    fun: ScalarFunction,
    derivatives_first_order: HashMap<Variable, Expression>,
    derivatives_second_order: Vec<Vec<Expression>>,
    sorted_variables: Vec<Variable>,
}

impl fmt::Debug for Equation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{{\n")?;
        writeln!(f, "    {}: {} = {}\n", "Equation".cyan(), self.lhs, self.rhs)?;
        writeln!(f, "    {}: {}\n", "Residual".cyan(), self.residual)?;
        writeln!(
            f,
            "    {}: [{}]\n",
            "Sorted Variables".cyan(),
            self.sorted_variables.iter().join(", ")
        )?;
        writeln!(f, "}}")?;
        Ok(())
    }
}

impl fmt::Display for Equation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.lhs, self.rhs)
    }
}

impl Equation {
    /// Creates a new `Equation` from its two sides.
    ///
    /// The variables are collected from the simplified residual and sorted by id.
    ///
    /// # Arguments
    /// * `lhs` - Left-hand side
    /// * `rhs` - Right-hand side
    ///
    /// # Returns
    /// The equation, or the expression error raised while simplifying or differentiating
    /// the residual
    ///
    /// # Example
    /// ```
    /// # use symexpr::prelude::*;
    /// let x = Expression::var(0);
    /// let eq = Equation::new(&x * &x, 4.0).unwrap();
    /// assert_eq!(eq.eval(&2.0).unwrap(), 0.0);
    /// ```
    pub fn new(
        lhs: impl Into<Expression>,
        rhs: impl Into<Expression>,
    ) -> Result<Self, EquationError> {
        let lhs = lhs.into();
        let rhs = rhs.into();
        let residual = (lhs.clone() - rhs.clone()).simplify()?;
        Self::build(lhs, rhs, residual)
    }

    /// Creates a new `Equation` `residual = 0`.
    pub fn from_residual(residual: impl Into<Expression>) -> Result<Self, EquationError> {
        let lhs = residual.into();
        let residual = lhs.simplify()?;
        Self::build(lhs, Expression::constant(0.0), residual)
    }

    fn build(
        lhs: Expression,
        rhs: Expression,
        residual: Expression,
    ) -> Result<Self, EquationError> {
        let sorted_variables = residual.variables();

        let mut derivatives_first_order = HashMap::with_capacity(sorted_variables.len());
        for var in &sorted_variables {
            derivatives_first_order.insert(*var, residual.diff(*var)?);
        }

        let derivatives_second_order = sorted_variables
            .iter()
            .map(|row_var| {
                let first = &derivatives_first_order[row_var];
                sorted_variables
                    .iter()
                    .map(|col_var| first.diff(*col_var))
                    .collect::<Result<Vec<_>, ExprError>>()
            })
            .collect::<Result<Vec<_>, ExprError>>()?;

        debug!(
            "built equation {} = {} over [{}] with {} first order derivatives",
            lhs,
            rhs,
            sorted_variables.iter().join(", "),
            derivatives_first_order.len()
        );

        let fun = residual.to_function();
        Ok(Self {
            lhs,
            rhs,
            residual,
            fun,
            derivatives_first_order,
            derivatives_second_order,
            sorted_variables,
        })
    }

    /// Evaluates the residual `lhs - rhs` at the given point.
    ///
    /// # Arguments
    /// * `point` - Values indexed by variable id
    ///
    /// # Errors
    /// Returns `EquationError::InvalidInputLength` if the point does not cover every
    /// variable.
    pub fn eval<P: Point + ?Sized>(&self, point: &P) -> Result<f64, EquationError> {
        let coordinates = point.coordinates();
        let values: &[f64] = &coordinates;
        self.validate_input_length(values)?;
        Ok((self.fun)(values)?)
    }

    /// Computes the gradient (all first order partial derivatives) at the given point.
    ///
    /// # Returns
    /// * `Result<Vec<f64>, EquationError>` - Vector of partial derivatives in sorted
    ///   variable order
    pub fn gradient(&self, values: &[f64]) -> Result<Vec<f64>, EquationError> {
        self.validate_input_length(values)?;
        self.sorted_variables
            .iter()
            .map(|var| {
                self.derivatives_first_order[var]
                    .eval(values)
                    .map_err(EquationError::from)
            })
            .collect()
    }

    /// Computes the Hessian matrix (all second order partial derivatives) at the given point.
    ///
    /// # Returns
    /// * `Result<Vec<Vec<f64>>, EquationError>` - Hessian matrix; entry `[i][j]` is
    ///   `∂²f/∂v_i∂v_j` in sorted variable order
    pub fn hessian(&self, values: &[f64]) -> Result<Vec<Vec<f64>>, EquationError> {
        self.validate_input_length(values)?;
        self.derivatives_second_order
            .iter()
            .map(|row| {
                row.iter()
                    .map(|derivative| derivative.eval(values).map_err(EquationError::from))
                    .collect()
            })
            .collect()
    }

    /// Returns the first order derivative with respect to a variable.
    ///
    /// # Errors
    /// Returns `EquationError::DerivativeNotFound` if the equation does not contain the
    /// variable.
    pub fn derivative(&self, variable: Variable) -> Result<&Expression, EquationError> {
        self.derivatives_first_order
            .get(&variable)
            .ok_or(EquationError::DerivativeNotFound(variable))
    }

    /// Computes the higher-order partial derivative with respect to several variables.
    ///
    /// The residual is differentiated successively with respect to each variable in the
    /// given order.
    ///
    /// # Example
    /// ```
    /// # use symexpr::prelude::*;
    /// let (x, y) = (Expression::var(0), Expression::var(1));
    /// let eq = Equation::from_residual(&x * &x * &y).unwrap();
    ///
    /// // ∂³f/∂x²∂y = 2
    /// let d = eq.derive_wrt(&[Variable::new(0), Variable::new(0), Variable::new(1)]).unwrap();
    /// assert_eq!(d.eval(&[5.0, 7.0]).unwrap(), 2.0);
    /// ```
    ///
    /// # Errors
    /// Returns `EquationError::DerivativeNotFound` if a variable is not part of the equation.
    pub fn derive_wrt(&self, variables: &[Variable]) -> Result<Expression, EquationError> {
        self.check_variables(variables)?;
        Ok(variables
            .iter()
            .try_fold(self.residual.clone(), |expr, var| expr.diff(*var))?)
    }

    /// Stacks the first order derivatives with respect to `variables` into a system.
    ///
    /// The system shares the variable set of this equation, so its inputs are the same.
    pub fn derive_wrt_stack(&self, variables: &[Variable]) -> Result<EquationSystem, EquationError> {
        self.check_variables(variables)?;
        let derivatives = variables
            .iter()
            .map(|var| self.derivatives_first_order[var].clone())
            .collect();
        EquationSystem::with_variables(derivatives, &self.sorted_variables)
    }

    /// Returns the left-hand side.
    pub fn lhs(&self) -> &Expression {
        &self.lhs
    }

    /// Returns the right-hand side.
    pub fn rhs(&self) -> &Expression {
        &self.rhs
    }

    /// Returns the simplified residual `lhs - rhs`.
    pub fn residual(&self) -> &Expression {
        &self.residual
    }

    /// Returns the evaluation closure of the residual.
    pub fn fun(&self) -> &ScalarFunction {
        &self.fun
    }

    /// Returns the sorted variables.
    pub fn sorted_variables(&self) -> &[Variable] {
        &self.sorted_variables
    }

    /// Number of inputs needed to cover every variable: the largest id plus one.
    pub fn input_len(&self) -> usize {
        self.sorted_variables.last().map_or(0, |var| var.id + 1)
    }

    fn check_variables(&self, variables: &[Variable]) -> Result<(), EquationError> {
        match variables
            .iter()
            .find(|var| !self.derivatives_first_order.contains_key(var))
        {
            Some(missing) => Err(EquationError::DerivativeNotFound(*missing)),
            None => Ok(()),
        }
    }

    /// Validates that the inputs cover every variable of the equation.
    ///
    /// # Returns
    /// * `Ok(())` if the inputs are long enough
    /// * `Err(EquationError::InvalidInputLength)` otherwise
    fn validate_input_length(&self, values: &[f64]) -> Result<(), EquationError> {
        let expected = self.input_len();
        if values.len() < expected {
            return Err(EquationError::InvalidInputLength {
                expected,
                got: values.len(),
            });
        }
        Ok(())
    }
}

/// Creates the equation `lhs = rhs` from anything convertible into an expression.
///
/// Shorthand for [`Equation::new`].
pub fn make_equation(
    lhs: impl Into<Expression>,
    rhs: impl Into<Expression>,
) -> Result<Equation, EquationError> {
    Equation::new(lhs, rhs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::{pow, sin};

    fn x() -> Expression {
        Expression::var(0)
    }

    fn y() -> Expression {
        Expression::var(1)
    }

    fn z() -> Expression {
        Expression::var(2)
    }

    #[test]
    fn test_equation() {
        let eq = Equation::new(2.0 * x() + y() * y(), 0.0).unwrap();
        assert_eq!(eq.eval(&[1.0, 2.0]).unwrap(), 6.0);
        assert_eq!(eq.sorted_variables(), &[Variable::new(0), Variable::new(1)]);
    }

    #[test]
    fn test_residual_of_both_sides() {
        // x^2 = y + 1
        let eq = make_equation(x() * x(), y() + 1.0).unwrap();
        assert_eq!(eq.eval(&[3.0, 2.0]).unwrap(), 6.0);
        assert_eq!(eq.to_string(), "(x0 * x0) = (x1 + 1)");
    }

    #[test]
    fn test_gradient() {
        let eq = Equation::from_residual(2.0 * x() + y() * y()).unwrap();
        let gradient = eq.gradient(&[1.0, 2.0]).unwrap();
        assert_eq!(gradient, vec![2.0, 4.0]);
    }

    #[test]
    fn test_hessian() {
        let eq = Equation::from_residual(x() * x() * y() + y() * y()).unwrap();
        let hessian = eq.hessian(&[3.0, 2.0]).unwrap();
        assert_eq!(
            hessian,
            vec![
                vec![4.0, 6.0], // [∂²f/∂x², ∂²f/∂x∂y]
                vec![6.0, 2.0], // [∂²f/∂y∂x, ∂²f/∂y²]
            ]
        );
    }

    #[test]
    fn test_derivative() {
        let eq = Equation::from_residual(x() * y() + 8.0).unwrap();
        let dx = eq.derivative(Variable::new(0)).unwrap();
        assert_eq!(dx.node(), y().node());

        let dy = eq.derivative(Variable::new(1)).unwrap();
        assert_eq!(dy.eval(&[4.0, 0.0]).unwrap(), 4.0);
    }

    #[test]
    fn test_derivative_not_found() {
        let eq = Equation::from_residual(x() + 1.0).unwrap();
        assert!(matches!(
            eq.derivative(Variable::new(1)),
            Err(EquationError::DerivativeNotFound(var)) if var == Variable::new(1)
        ));
    }

    #[test]
    fn test_derive_wrt() {
        let eq = Equation::from_residual(pow(x(), 3) * y()).unwrap();
        let d = eq
            .derive_wrt(&[Variable::new(0), Variable::new(0), Variable::new(1)])
            .unwrap();
        // ∂³/∂x²∂y (x^3 y) = 6x
        approx::assert_relative_eq!(d.eval(&[2.0, 5.0]).unwrap(), 12.0);
    }

    #[test]
    #[should_panic]
    fn test_derive_wrt_invalid_variable() {
        let eq = Equation::from_residual(x() + y()).unwrap();
        let _ = eq.derive_wrt(&[Variable::new(2)]).unwrap();
    }

    #[test]
    fn test_derive_wrt_stack() -> Result<(), Box<dyn std::error::Error>> {
        let eq = Equation::from_residual(x() * x() * y() + sin(z()))?;
        let system = eq.derive_wrt_stack(&[Variable::new(0), Variable::new(1)])?;
        assert_eq!(system.len(), 2);
        assert_eq!(system.sorted_variables(), eq.sorted_variables());

        // [2xy, x^2] at (3, 2, 0)
        assert_eq!(system.eval(&[3.0, 2.0, 0.0])?, vec![12.0, 9.0]);
        Ok(())
    }

    #[test]
    #[should_panic]
    fn test_invalid_input_length() {
        let eq = Equation::from_residual(x() + z()).unwrap();
        // x2 needs three inputs
        let _ = eq.eval(&[1.0, 2.0]).unwrap();
    }

    #[test]
    fn test_sparse_variable_ids() {
        let eq = Equation::from_residual(x() + z()).unwrap();
        assert_eq!(eq.input_len(), 3);
        assert_eq!(eq.gradient(&[0.0, 100.0, 0.0]).unwrap(), vec![1.0, 1.0]);
        assert!(matches!(
            eq.gradient(&[1.0]),
            Err(EquationError::InvalidInputLength {
                expected: 3,
                got: 1
            })
        ));
    }

    #[test]
    fn test_constant_equation() {
        // Accepted, but there is nothing to differentiate
        let eq = make_equation(3.0, 3.0).unwrap();
        assert!(eq.sorted_variables().is_empty());
        assert_eq!(eq.eval(&0.0).unwrap(), 0.0);
        assert!(eq.gradient(&[]).unwrap().is_empty());
        assert!(eq.hessian(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_all_backends() {
        let eq = Equation::from_residual(x() * 2.0 + y()).unwrap();
        assert_eq!(eq.eval(&[1.0, 2.0]).unwrap(), 4.0);
        assert_eq!(eq.eval(&vec![1.0, 2.0]).unwrap(), 4.0);
        assert_eq!(eq.eval([1.0, 2.0].as_slice()).unwrap(), 4.0);

        #[cfg(feature = "nalgebra")]
        {
            let point = nalgebra::DVector::from_vec(vec![1.0, 2.0]);
            assert_eq!(eq.eval(&point).unwrap(), 4.0);
        }

        #[cfg(feature = "ndarray")]
        {
            let point = ndarray::Array1::from_vec(vec![1.0, 2.0]);
            assert_eq!(eq.eval(&point).unwrap(), 4.0);
        }
    }

    #[test]
    fn test_debug_and_display_formatting() {
        let eq = make_equation(x() + y(), 1.0).unwrap();

        let debug_output = format!("{:?}", eq);
        assert!(debug_output.contains("Equation"));
        assert!(debug_output.contains("(x0 + x1) = 1"));
        assert!(debug_output.contains("Sorted Variables"));
        assert!(debug_output.contains("x0, x1"));

        assert_eq!(format!("{}", eq), "(x0 + x1) = 1");
    }

    #[test]
    fn test_equation_clone() {
        let eq = Equation::from_residual(x() * y()).unwrap();
        let cloned = eq.clone();
        assert_eq!(cloned.eval(&[2.0, 3.0]).unwrap(), 6.0);
        assert_eq!(cloned.gradient(&[2.0, 3.0]).unwrap(), vec![3.0, 2.0]);
    }

    #[test]
    fn test_accessor_methods() {
        let eq = make_equation(x(), y()).unwrap();
        assert_eq!(eq.lhs(), &x());
        assert_eq!(eq.rhs(), &y());
        assert_eq!(eq.residual().to_string(), "(x0 - x1)");
        assert_eq!((eq.fun())(&[5.0, 2.0]).unwrap(), 3.0);
    }
}
