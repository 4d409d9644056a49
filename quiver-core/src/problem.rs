use thiserror::Error;

use crate::vector::{Vector, VectorError};

/// Selects which operand a partial derivative is taken with respect to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variable {
    /// Differentiate by an argument coordinate.
    Args,
    /// Differentiate by a parameter coordinate.
    Params,
}

/// The contract an optimization problem exposes to algorithms.
///
/// A problem is a goal function over two operands: the `args` vector the
/// algorithm searches over, and the `params` vector configuring the
/// problem instance. Both dimensions are fixed per problem.
///
/// Either operand can be bound to the problem with [`Problem::set_args`] /
/// [`Problem::set_params`], enabling the `by_args` / `by_params`
/// convenience forms that supply the bound vector for the missing operand.
///
/// Derivatives are exact analytic partials. Order 0 is the goal function
/// itself, and any order beyond the function's polynomial degree in the
/// selected variable is exactly zero, not an error — so algorithms can
/// probe curvature without knowing the degree up front.
pub trait Problem {
    /// The dimension of the argument vector.
    fn args_dim(&self) -> usize;

    /// The dimension of the parameter vector.
    fn params_dim(&self) -> usize;

    /// Evaluates the goal function at `args` with `params`.
    ///
    /// # Errors
    ///
    /// Returns a dimension-mismatch error if either operand has the wrong
    /// dimension.
    fn goal(&self, args: &Vector, params: &Vector) -> Result<f64, ProblemError>;

    /// Binds a clone of `args` as the problem's current argument operand.
    ///
    /// # Errors
    ///
    /// Returns [`ProblemError::ArgsDimensionMismatch`] if `args` has the
    /// wrong dimension.
    fn set_args(&mut self, args: &Vector) -> Result<(), ProblemError>;

    /// Binds a clone of `params` as the problem's current parameter
    /// operand.
    ///
    /// # Errors
    ///
    /// Returns [`ProblemError::ParamsDimensionMismatch`] if `params` has
    /// the wrong dimension.
    fn set_params(&mut self, params: &Vector) -> Result<(), ProblemError>;

    /// Evaluates the goal function at `args` with the bound parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ProblemError::ParamsNotBound`] if no parameters were
    /// bound, plus the errors of [`Problem::goal`].
    fn goal_by_args(&self, args: &Vector) -> Result<f64, ProblemError>;

    /// Evaluates the goal function at the bound arguments with `params`.
    ///
    /// # Errors
    ///
    /// Returns [`ProblemError::ArgsNotBound`] if no arguments were bound,
    /// plus the errors of [`Problem::goal`].
    fn goal_by_params(&self, params: &Vector) -> Result<f64, ProblemError>;

    /// Evaluates the partial derivative of the given order by the
    /// coordinate `index` of the selected operand.
    ///
    /// Order 0 is the goal function itself. Orders beyond the polynomial
    /// degree in the selected variable evaluate to exactly zero.
    ///
    /// # Errors
    ///
    /// Returns [`ProblemError::IndexOutOfRange`] if `index` exceeds the
    /// selected operand's dimension, plus the errors of [`Problem::goal`].
    fn derivative(
        &self,
        order: usize,
        index: usize,
        with_respect_to: Variable,
        args: &Vector,
        params: &Vector,
    ) -> Result<f64, ProblemError>;

    /// Like [`Problem::derivative`], with the bound parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ProblemError::ParamsNotBound`] if no parameters were
    /// bound, plus the errors of [`Problem::derivative`].
    fn derivative_by_args(
        &self,
        order: usize,
        index: usize,
        with_respect_to: Variable,
        args: &Vector,
    ) -> Result<f64, ProblemError>;

    /// Like [`Problem::derivative`], with the bound arguments.
    ///
    /// # Errors
    ///
    /// Returns [`ProblemError::ArgsNotBound`] if no arguments were bound,
    /// plus the errors of [`Problem::derivative`].
    fn derivative_by_params(
        &self,
        order: usize,
        index: usize,
        with_respect_to: Variable,
        params: &Vector,
    ) -> Result<f64, ProblemError>;
}

/// Errors a [`Problem`] implementation can report.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProblemError {
    /// The argument vector has the wrong dimension.
    #[error("args dimension mismatch: expected {expected}, got {actual}")]
    ArgsDimensionMismatch { expected: usize, actual: usize },

    /// The parameter vector has the wrong dimension.
    #[error("params dimension mismatch: expected {expected}, got {actual}")]
    ParamsDimensionMismatch { expected: usize, actual: usize },

    /// The derivative coordinate index exceeds the selected operand's
    /// dimension.
    #[error("coordinate index {index} is out of range for {variable:?} of dimension {dim}")]
    IndexOutOfRange {
        index: usize,
        dim: usize,
        variable: Variable,
    },

    /// A `by_args` form was called before any parameters were bound.
    #[error("no params bound; call set_params first")]
    ParamsNotBound,

    /// A `by_params` form was called before any arguments were bound.
    #[error("no args bound; call set_args first")]
    ArgsNotBound,

    /// A vector operation failed while evaluating the problem.
    #[error("vector operation failed")]
    Vector(#[from] VectorError),
}
