//! Adapter that exposes a user [`SumOfSquares`] objective as an argmin
//! problem.
//!
//! The objective is already a minimization target, so the cost passes
//! through unchanged. If the user does not provide an analytic gradient,
//! the cost closure is finite-differenced (central first, falling back to
//! forward differences when the central stencil fails or produces an
//! invalid gradient).
use std::cell::RefCell;

use crate::optimization::{
    errors::OptError,
    least_squares::{
        traits::SumOfSquares,
        types::{Cost, Grad, Theta},
        validation::validate_grad,
    },
};
use argmin::core::{CostFunction, Error, Gradient};
use finitediff::FiniteDiff;

/// Bridges a user [`SumOfSquares`] to argmin's `CostFunction` and
/// `Gradient`.
#[derive(Debug, Clone)]
pub struct ArgMinAdapter<'a, F: SumOfSquares> {
    pub f: &'a F,
    pub data: &'a F::Data,
}

impl<'a, F: SumOfSquares> CostFunction for ArgMinAdapter<'a, F> {
    type Param = Theta;
    type Output = Cost;

    /// Evaluate the cost `c(θ)`.
    ///
    /// # Errors
    /// Propagates any `OptError` from the user's `value`, and rejects
    /// non-finite cost values with `OptError::NonFiniteCost`.
    fn cost(&self, theta: &Self::Param) -> Result<Self::Output, Error> {
        let output = self.f.value(theta, self.data)?;
        if !output.is_finite() {
            return Err((OptError::NonFiniteCost { value: output }).into());
        }
        Ok(output)
    }
}

impl<'a, F: SumOfSquares> Gradient for ArgMinAdapter<'a, F> {
    type Param = Theta;
    type Gradient = Grad;

    /// Evaluate the gradient of the cost at `θ`.
    ///
    /// Behavior:
    /// - If the user implements `grad(θ, data)`, validate and return it.
    /// - Otherwise compute a finite-difference gradient of the cost:
    ///   central differences first; if any cost evaluation inside the
    ///   stencil failed (captured via `closure_err`) or the result fails
    ///   validation, retry once with forward differences.
    ///
    /// The FD closure must return `f64`, so errors raised by the cost
    /// cannot use `?` inside it; the first error is captured in a cell and
    /// the closure returns NaN, which is turned back into a real error (or
    /// a forward-difference retry) after the stencil completes.
    fn gradient(&self, theta: &Self::Param) -> Result<Self::Gradient, Error> {
        let dim = theta.len();
        match self.f.grad(theta, self.data) {
            Ok(g) => {
                validate_grad(&g, dim)?;
                Ok(g)
            }
            Err(e) => {
                let closure_err: RefCell<Option<Error>> = RefCell::new(None);
                match e {
                    OptError::GradientNotImplemented => {
                        let cost_func = |theta: &Theta| -> f64 {
                            match self.cost(theta) {
                                Ok(val) => val,
                                Err(e) => {
                                    let mut slot = closure_err.borrow_mut();
                                    if slot.is_none() {
                                        *slot = Some(e);
                                    }
                                    f64::NAN
                                }
                            }
                        };
                        let mut fd_grad = theta.central_diff(&cost_func);
                        if closure_err.borrow().is_some() {
                            fd_grad = run_fd_diff(theta, &cost_func, &closure_err)?;
                            return Ok(fd_grad);
                        }
                        match validate_grad(&fd_grad, dim) {
                            Ok(()) => Ok(fd_grad),
                            Err(_) => {
                                fd_grad = run_fd_diff(theta, &cost_func, &closure_err)?;
                                Ok(fd_grad)
                            }
                        }
                    }
                    _ => Err(e.into()),
                }
            }
        }
    }
}

impl<'a, F: SumOfSquares> ArgMinAdapter<'a, F> {
    /// Construct a new adapter over a user objective and its data.
    pub fn new(f: &'a F, data: &'a F::Data) -> Self {
        Self { f, data }
    }
}

/// Compute a forward-difference gradient of `func` at `theta`, with error
/// capture mirroring the central-difference path.
///
/// # Errors
/// Returns any error captured during evaluation of `func` inside the FD
/// routine, or a validation error for the resulting gradient.
fn run_fd_diff<G: Fn(&Theta) -> f64>(
    theta: &Theta, func: &G, closure_err: &RefCell<Option<Error>>,
) -> Result<Grad, Error> {
    closure_err.replace(None);
    let fd_grad = theta.forward_diff(func);
    let dim = theta.len();
    if let Some(err) = closure_err.take() {
        return Err(err);
    }
    validate_grad(&fd_grad, dim)?;
    Ok(fd_grad)
}
