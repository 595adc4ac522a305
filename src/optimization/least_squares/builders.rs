//! L-BFGS solver construction helpers.
//!
//! Small, focused builders that hide argmin's generic wiring and apply
//! crate-level options (tolerances, history size) so higher-level code
//! can request a configured solver without touching argmin types. The
//! initial parameter vector and iteration cap are runtime concerns left
//! to the runner.
use argmin::solver::quasinewton::LBFGS;

use crate::optimization::{
    errors::OptResult,
    least_squares::{
        traits::FitOptions,
        types::{
            Cost, Grad, HagerZhangLS, LbfgsHagerZhang, LbfgsMoreThuente, MoreThuenteLS, Theta,
            DEFAULT_LBFGS_MEM,
        },
    },
};

/// Construct L-BFGS with a Hager–Zhang line search.
///
/// # Errors
/// Propagates argmin configuration errors for invalid tolerances.
pub fn build_solver_hager_zhang(opts: &FitOptions) -> OptResult<LbfgsHagerZhang> {
    let hager_zhang = HagerZhangLS::new();
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    let lbfgs = LbfgsHagerZhang::new(hager_zhang, mem);
    configure_lbfgs(lbfgs, opts)
}

/// Construct L-BFGS with a More–Thuente line search.
///
/// # Errors
/// Propagates argmin configuration errors for invalid tolerances.
pub fn build_solver_more_thuente(opts: &FitOptions) -> OptResult<LbfgsMoreThuente> {
    let more_thuente = MoreThuenteLS::new();
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    let lbfgs = LbfgsMoreThuente::new(more_thuente, mem);
    configure_lbfgs(lbfgs, opts)
}

/// Apply optional gradient and cost-change tolerances to a solver.
fn configure_lbfgs<L>(
    mut lbfgs: LBFGS<L, Theta, Grad, Cost>, opts: &FitOptions,
) -> OptResult<LBFGS<L, Theta, Grad, Cost>> {
    if let Some(tol_grad) = opts.tols.tol_grad {
        lbfgs = lbfgs.with_tolerance_grad(tol_grad)?;
    }
    if let Some(tol_cost) = opts.tols.tol_cost {
        lbfgs = lbfgs.with_tolerance_cost(tol_cost)?;
    }
    Ok(lbfgs)
}
