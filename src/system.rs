//! Systems of equations.
//!
//! This module provides the vector-valued counterpart of [`crate::Equation`]: several
//! residual expressions over one shared, sorted variable set, evaluated together. The
//! symbolic Jacobian is derived once on construction, so repeated evaluations (e.g. the
//! iterations of a Newton solver) only walk the trees.
//!
//! # Features
//!
//! - Consistent variable ordering across equations
//! - Evaluation into a caller-provided buffer
//! - Symbolic Jacobian, evaluated as a whole or one variable column at a time
//! - Higher-order derivatives of every equation
//!
//! # Example
//!
//! ```
//! use symexpr::prelude::*;
//!
//! let x = Expression::var(0);
//! let y = Expression::var(1);
//! let system = EquationSystem::new(vec![&x * 2.0 + &y, &x * &x]).unwrap();
//!
//! let results = system.eval(&[1.0, 2.0]).unwrap();
//! assert_eq!(results, vec![4.0, 1.0]);
//!
//! let dx = system.gradient(&[1.0, 2.0], Variable::new(0)).unwrap();
//! assert_eq!(dx, vec![2.0, 2.0]);
//! ```

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use colored::Colorize;
use itertools::Itertools;
use log::debug;

use crate::errors::{EquationError, ExprError};
use crate::expr::Variable;
use crate::expression::Expression;
use crate::types::CombinedFunction;

/// Represents a system of equations `f_i(x) = 0` that are evaluated together.
#[derive(Clone)]
pub struct EquationSystem {
    /// The simplified residual of every equation
    equations: Vec<Expression>,
    /// Variables in sorted order; inputs are indexed by variable id
    sorted_variables: Vec<Variable>,
    /// Jacobian of the system: one row per equation, one column per sorted variable
    jacobian: Vec<Vec<Expression>>,
    /// Closure evaluating all equations into an output buffer
    combined_fun: CombinedFunction,
}

impl fmt::Debug for EquationSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{{\n")?;
        for (i, equation) in self.equations.iter().enumerate() {
            writeln!(f, "    {} {}: {}\n", "Equation".cyan(), i, equation)?;
        }
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

impl EquationSystem {
    /// Creates a new equation system from residual expressions.
    ///
    /// The variables of all equations are collected and sorted by id. Each residual is
    /// simplified and its symbolic Jacobian row is derived up front.
    ///
    /// # Arguments
    /// * `equations` - The residuals `f_i` of the equations `f_i(x) = 0`
    ///
    /// # Returns
    /// The system, or the expression error raised while simplifying or differentiating
    ///
    /// # Example
    /// ```
    /// # use symexpr::prelude::*;
    /// let x = Expression::var(0);
    /// let z = Expression::var(2);
    /// let system = EquationSystem::new(vec![&x * &x, &z - 1.0]).unwrap();
    /// assert_eq!(system.sorted_variables(), &[Variable::new(0), Variable::new(2)]);
    /// ```
    pub fn new(equations: Vec<Expression>) -> Result<Self, EquationError> {
        let variables: BTreeSet<Variable> = equations
            .iter()
            .flat_map(|equation| equation.variables())
            .collect();
        Self::build(equations, variables.into_iter().collect())
    }

    /// Creates a new equation system over an explicit variable list.
    ///
    /// Useful when the system must share its variable set with other code, e.g. when some
    /// equations do not depend on every variable.
    ///
    /// # Errors
    /// Returns `EquationError::VariableNotFound` if an equation uses a variable missing
    /// from `variables`.
    pub fn with_variables(
        equations: Vec<Expression>,
        variables: &[Variable],
    ) -> Result<Self, EquationError> {
        for equation in &equations {
            if let Some(missing) = equation
                .variables()
                .into_iter()
                .find(|var| !variables.contains(var))
            {
                return Err(EquationError::VariableNotFound(missing));
            }
        }
        let sorted_variables = variables.iter().copied().sorted().dedup().collect();
        Self::build(equations, sorted_variables)
    }

    fn build(
        equations: Vec<Expression>,
        sorted_variables: Vec<Variable>,
    ) -> Result<Self, EquationError> {
        let equations = equations
            .iter()
            .map(Expression::simplify)
            .collect::<Result<Vec<_>, ExprError>>()?;

        let jacobian = equations
            .iter()
            .map(|equation| {
                sorted_variables
                    .iter()
                    .map(|var| equation.diff(*var))
                    .collect::<Result<Vec<_>, ExprError>>()
            })
            .collect::<Result<Vec<_>, ExprError>>()?;

        debug!(
            "built system of {} equations over [{}]",
            equations.len(),
            sorted_variables.iter().join(", ")
        );

        let combined_fun = build_combined_function(&equations);
        Ok(Self {
            equations,
            sorted_variables,
            jacobian,
            combined_fun,
        })
    }

    /// Evaluates all equations into a pre-allocated buffer.
    ///
    /// # Arguments
    /// * `inputs` - Input values indexed by variable id
    /// * `results` - Buffer receiving one value per equation
    ///
    /// # Returns
    /// Reference to the results slice containing the evaluated values
    ///
    /// # Errors
    /// Returns `EquationError::InvalidInputLength` if the inputs do not cover every
    /// variable and `EquationError::InvalidOutputLength` if the buffer size does not
    /// match the number of equations.
    ///
    /// # Example
    /// ```
    /// # use symexpr::prelude::*;
    /// let (x, y) = (Expression::var(0), Expression::var(1));
    /// let system = EquationSystem::new(vec![&x + &y, &x * &y]).unwrap();
    ///
    /// let mut results = vec![0.0; 2];
    /// system.eval_into(&[2.0, 3.0], &mut results).unwrap();
    /// assert_eq!(results, vec![5.0, 6.0]);
    /// ```
    pub fn eval_into<'a>(
        &self,
        inputs: &[f64],
        results: &'a mut [f64],
    ) -> Result<&'a [f64], EquationError> {
        self.validate_input_length(inputs)?;
        if results.len() != self.equations.len() {
            return Err(EquationError::InvalidOutputLength {
                expected: self.equations.len(),
                got: results.len(),
            });
        }
        (self.combined_fun)(inputs, results)?;
        Ok(results)
    }

    /// Evaluates all equations, allocating the result vector.
    pub fn eval(&self, inputs: &[f64]) -> Result<Vec<f64>, EquationError> {
        let mut results = vec![0.0; self.equations.len()];
        self.eval_into(inputs, &mut results)?;
        Ok(results)
    }

    /// Computes the partial derivatives of every equation with respect to one variable.
    ///
    /// # Returns
    /// One column of the Jacobian: `[∂f_0/∂x, ∂f_1/∂x, ...]`
    ///
    /// # Errors
    /// Returns `EquationError::VariableNotFound` if the variable is not part of the system.
    pub fn gradient(&self, inputs: &[f64], variable: Variable) -> Result<Vec<f64>, EquationError> {
        self.validate_input_length(inputs)?;
        let column = self
            .sorted_variables
            .iter()
            .position(|var| *var == variable)
            .ok_or(EquationError::VariableNotFound(variable))?;
        self.jacobian
            .iter()
            .map(|row| row[column].eval(inputs).map_err(EquationError::from))
            .collect()
    }

    /// Computes the Jacobian matrix at the given input values.
    ///
    /// Each row corresponds to an equation, and each column to a variable in sorted order.
    ///
    /// # Example
    /// ```
    /// # use symexpr::prelude::*;
    /// let (x, y) = (Expression::var(0), Expression::var(1));
    /// let system = EquationSystem::new(vec![&x * &x * &y, &x * &y * &y]).unwrap();
    ///
    /// let jacobian = system.jacobian(&[2.0, 3.0]).unwrap();
    /// assert_eq!(jacobian, vec![vec![12.0, 4.0], vec![9.0, 12.0]]);
    /// ```
    pub fn jacobian(&self, inputs: &[f64]) -> Result<Vec<Vec<f64>>, EquationError> {
        self.validate_input_length(inputs)?;
        self.jacobian
            .iter()
            .map(|row| {
                row.iter()
                    .map(|derivative| derivative.eval(inputs).map_err(EquationError::from))
                    .collect()
            })
            .collect()
    }

    /// Returns the symbolic Jacobian: one row per equation, one column per variable.
    pub fn jacobian_exprs(&self) -> &[Vec<Expression>] {
        &self.jacobian
    }

    /// Differentiates every equation successively with respect to `variables`.
    ///
    /// # Returns
    /// A new system over the same variables holding `∂^n f_i / ∂v_0 ... ∂v_n`
    ///
    /// # Errors
    /// Returns `EquationError::VariableNotFound` if a variable is not part of the system.
    pub fn derive_wrt(&self, variables: &[Variable]) -> Result<EquationSystem, EquationError> {
        if let Some(missing) = variables
            .iter()
            .find(|var| !self.sorted_variables.contains(var))
        {
            return Err(EquationError::VariableNotFound(*missing));
        }

        let derivatives = self
            .equations
            .iter()
            .map(|equation| {
                variables
                    .iter()
                    .try_fold(equation.clone(), |expr, var| expr.diff(*var))
            })
            .collect::<Result<Vec<_>, ExprError>>()?;

        Self::build(derivatives, self.sorted_variables.clone())
    }

    /// Returns the sorted variables.
    pub fn sorted_variables(&self) -> &[Variable] {
        &self.sorted_variables
    }

    /// Returns the simplified residuals.
    pub fn equations(&self) -> &[Expression] {
        &self.equations
    }

    /// Returns the closure evaluating all equations into a buffer.
    pub fn fun(&self) -> &CombinedFunction {
        &self.combined_fun
    }

    pub fn len(&self) -> usize {
        self.equations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.equations.is_empty()
    }

    /// Number of inputs needed to cover every variable: the largest id plus one.
    pub fn input_len(&self) -> usize {
        self.sorted_variables.last().map_or(0, |var| var.id + 1)
    }

    fn validate_input_length(&self, inputs: &[f64]) -> Result<(), EquationError> {
        let expected = self.input_len();
        if inputs.len() < expected {
            return Err(EquationError::InvalidInputLength {
                expected,
                got: inputs.len(),
            });
        }
        Ok(())
    }
}

fn build_combined_function(equations: &[Expression]) -> CombinedFunction {
    let equations = equations.to_vec();
    Arc::new(move |inputs: &[f64], results: &mut [f64]| {
        for (result, equation) in results.iter_mut().zip(&equations) {
            *result = equation.evaluate_at(inputs)?;
        }
        Ok(())
    })
}
