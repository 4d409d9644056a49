use quiver_core::{Problem, ProblemError, Variable, Vector};
use quiver_plugin::{CapabilityKind, CapabilityRef, Extension};

const ARGS_DIM: usize = 2;
const PARAMS_DIM: usize = 3;

/// The quadratic goal function `f(a, p) = p₀a₀² + p₁a₁² + p₂a₁`.
///
/// Two arguments, three parameters. Quadratic in each argument and linear
/// in each parameter, so derivatives by args vanish from order 3 and
/// derivatives by params vanish from order 2.
#[derive(Debug, Default)]
pub struct QuadraticProblem {
    args: Option<Vector>,
    params: Option<Vector>,
}

impl QuadraticProblem {
    /// Creates a problem with no operands bound.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn check_args(&self, args: &Vector) -> Result<(), ProblemError> {
        if args.dim() == ARGS_DIM {
            Ok(())
        } else {
            Err(ProblemError::ArgsDimensionMismatch {
                expected: ARGS_DIM,
                actual: args.dim(),
            })
        }
    }

    fn check_params(&self, params: &Vector) -> Result<(), ProblemError> {
        if params.dim() == PARAMS_DIM {
            Ok(())
        } else {
            Err(ProblemError::ParamsDimensionMismatch {
                expected: PARAMS_DIM,
                actual: params.dim(),
            })
        }
    }

    fn bound_args(&self) -> Result<&Vector, ProblemError> {
        self.args.as_ref().ok_or(ProblemError::ArgsNotBound)
    }

    fn bound_params(&self) -> Result<&Vector, ProblemError> {
        self.params.as_ref().ok_or(ProblemError::ParamsNotBound)
    }

    fn derivative_by_arg(
        &self,
        order: usize,
        index: usize,
        args: &Vector,
        params: &Vector,
    ) -> Result<f64, ProblemError> {
        if index >= ARGS_DIM {
            return Err(ProblemError::IndexOutOfRange {
                index,
                dim: ARGS_DIM,
                variable: Variable::Args,
            });
        }

        if order == 0 {
            return self.goal(args, params);
        }
        if order >= 3 {
            return Ok(0.0);
        }

        let a = args.as_slice();
        let p = params.as_slice();
        let value = match (index, order) {
            (0, 1) => 2.0 * p[0] * a[0],
            (0, 2) => 2.0 * p[0],
            (1, 1) => 2.0 * p[1] * a[1] + p[2],
            _ => 2.0 * p[1],
        };
        Ok(value)
    }

    fn derivative_by_param(
        &self,
        order: usize,
        index: usize,
        args: &Vector,
        params: &Vector,
    ) -> Result<f64, ProblemError> {
        if index >= PARAMS_DIM {
            return Err(ProblemError::IndexOutOfRange {
                index,
                dim: PARAMS_DIM,
                variable: Variable::Params,
            });
        }

        if order == 0 {
            return self.goal(args, params);
        }
        if order >= 2 {
            return Ok(0.0);
        }

        let a = args.as_slice();
        let value = match index {
            0 => a[0] * a[0],
            1 => a[1] * a[1],
            _ => a[1],
        };
        Ok(value)
    }
}

impl Problem for QuadraticProblem {
    fn args_dim(&self) -> usize {
        ARGS_DIM
    }

    fn params_dim(&self) -> usize {
        PARAMS_DIM
    }

    fn goal(&self, args: &Vector, params: &Vector) -> Result<f64, ProblemError> {
        self.check_args(args)?;
        self.check_params(params)?;

        let a = args.as_slice();
        let p = params.as_slice();
        Ok(p[0] * a[0] * a[0] + p[1] * a[1] * a[1] + p[2] * a[1])
    }

    fn set_args(&mut self, args: &Vector) -> Result<(), ProblemError> {
        self.check_args(args)?;
        self.args = Some(args.clone());
        Ok(())
    }

    fn set_params(&mut self, params: &Vector) -> Result<(), ProblemError> {
        self.check_params(params)?;
        self.params = Some(params.clone());
        Ok(())
    }

    fn goal_by_args(&self, args: &Vector) -> Result<f64, ProblemError> {
        self.goal(args, self.bound_params()?)
    }

    fn goal_by_params(&self, params: &Vector) -> Result<f64, ProblemError> {
        self.goal(self.bound_args()?, params)
    }

    fn derivative(
        &self,
        order: usize,
        index: usize,
        with_respect_to: Variable,
        args: &Vector,
        params: &Vector,
    ) -> Result<f64, ProblemError> {
        self.check_args(args)?;
        self.check_params(params)?;

        match with_respect_to {
            Variable::Args => self.derivative_by_arg(order, index, args, params),
            Variable::Params => self.derivative_by_param(order, index, args, params),
        }
    }

    fn derivative_by_args(
        &self,
        order: usize,
        index: usize,
        with_respect_to: Variable,
        args: &Vector,
    ) -> Result<f64, ProblemError> {
        self.derivative(order, index, with_respect_to, args, self.bound_params()?)
    }

    fn derivative_by_params(
        &self,
        order: usize,
        index: usize,
        with_respect_to: Variable,
        params: &Vector,
    ) -> Result<f64, ProblemError> {
        self.derivative(order, index, with_respect_to, self.bound_args()?, params)
    }
}

/// The extension object the quadratic plugin's factory constructs.
///
/// Owns the problem and hands it out through the capability query.
#[derive(Debug, Default)]
pub struct QuadraticExtension {
    problem: QuadraticProblem,
}

impl QuadraticExtension {
    /// Creates an extension wrapping a fresh [`QuadraticProblem`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Extension for QuadraticExtension {
    fn supports(&self, kind: CapabilityKind) -> bool {
        matches!(kind, CapabilityKind::Problem)
    }

    fn query(&mut self, kind: CapabilityKind) -> Option<CapabilityRef<'_>> {
        match kind {
            CapabilityKind::Problem => Some(CapabilityRef::Problem(&mut self.problem)),
        }
    }
}

/// Constructs the extension the plugin factory exports.
#[must_use]
pub fn extension_factory() -> Option<Box<dyn Extension>> {
    Some(Box::new(QuadraticExtension::new()))
}
