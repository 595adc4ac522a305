//! High-level entry point for minimizing a user [`SumOfSquares`]
//! objective.
//!
//! Selects an L-BFGS solver with either Hager–Zhang or More–Thuente line
//! search, wraps the model in an [`ArgMinAdapter`], and delegates the run
//! to `run_lbfgs`.
use crate::optimization::{
    errors::OptResult,
    least_squares::{
        adapter::ArgMinAdapter,
        builders::{build_solver_hager_zhang, build_solver_more_thuente},
        run::run_lbfgs,
        traits::{FitOptions, LineSearcher, SumOfSquares},
        FitOutcome, Theta,
    },
};

/// Minimize a sum-of-squares objective `c(θ)` with L-BFGS.
///
/// # Behavior
/// - Validates the initial guess via `f.check(theta0, data)`.
/// - Builds an L-BFGS solver with the line search selected by
///   `opts.line_searcher`.
/// - Runs the solver and returns a normalized [`FitOutcome`]. A run that
///   exhausts `max_iter` still yields `Ok`, with
///   `FitOutcome::converged == false`; callers decide how to treat
///   non-convergence.
///
/// # Errors
/// - Propagates any error from `f.check`.
/// - Propagates builder errors and runtime solver errors.
pub fn minimize<F: SumOfSquares>(
    f: &F, theta0: Theta, data: &F::Data, opts: &FitOptions,
) -> OptResult<FitOutcome> {
    f.check(&theta0, data)?;
    let problem = ArgMinAdapter::new(f, data);
    match opts.line_searcher {
        LineSearcher::MoreThuente => {
            let solver = build_solver_more_thuente(opts)?;
            run_lbfgs(theta0, opts, problem, solver)
        }
        LineSearcher::HagerZhang => {
            let solver = build_solver_hager_zhang(opts)?;
            run_lbfgs(theta0, opts, problem, solver)
        }
    }
}
