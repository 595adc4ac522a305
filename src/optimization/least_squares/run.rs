//! Execution helper that runs an argmin solver on a least-squares problem
//! and returns a crate-friendly [`FitOutcome`].
use crate::optimization::{
    errors::OptResult,
    least_squares::{adapter::ArgMinAdapter, FitOptions, FitOutcome, Grad, SumOfSquares, Theta},
};
use argmin::core::{Executor, State};

/// Run an argmin optimization for a least-squares problem.
///
/// Shared runner used by both line-search variants. Wires up the user
/// model via [`ArgMinAdapter`], the chosen solver, the initial parameter
/// vector, and the optional iteration cap, then executes the solver and
/// converts the result into a [`FitOutcome`].
///
/// # Errors
/// - Propagates argmin runtime errors (solver errors, line-search
///   failures) via the crate's `From<argmin::core::Error>` conversion.
/// - Propagates validation errors from [`FitOutcome::new`].
pub fn run_lbfgs<'a, F, S>(
    theta0: Theta, opts: &FitOptions, problem: ArgMinAdapter<'a, F>, solver: S,
) -> OptResult<FitOutcome>
where
    F: SumOfSquares,
    S: argmin::core::Solver<
            ArgMinAdapter<'a, F>,
            argmin::core::IterState<Theta, Grad, (), (), (), f64>,
        > + Send
        + 'static,
{
    let mut optimizer = Executor::new(problem, solver);
    optimizer = optimizer.configure(|state| state.param(theta0));
    if let Some(max_iter) = opts.tols.max_iter {
        optimizer = optimizer.configure(|state| state.max_iters(max_iter as u64));
    }

    let mut result = optimizer.run()?.state().clone();
    let iterations = result.get_iter();
    let function_counts = result.get_func_counts().clone();
    let termination = result.get_termination_status().clone();
    let grad = result.take_gradient();
    FitOutcome::new(
        result.take_best_param(),
        result.get_best_cost(),
        termination,
        iterations,
        function_counts,
        grad,
    )
}
