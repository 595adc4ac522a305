//! least_squares — argmin-powered sum-of-squares minimizer.
//!
//! Purpose
//! -------
//! Provide a high-level L-BFGS layer for **minimizing residual
//! objectives** `c(θ)`. Callers implement a single trait,
//! [`SumOfSquares`], and invoke [`minimize`] to run L-BFGS with a
//! configurable line search, tolerances, and finite-difference fallbacks.
//!
//! Key behaviors
//! -------------
//! - Bridge user objectives into argmin via [`adapter::ArgMinAdapter`].
//! - Expose a single entry point, [`minimize`], that validates the
//!   initial guess, builds the configured solver, executes it, and
//!   normalizes the result into a [`FitOutcome`].
//! - Fall back to robust finite-difference gradients when no analytic
//!   gradient is implemented.
//!
//! Invariants & assumptions
//! ------------------------
//! - The solver always *minimizes* the user objective directly; there is
//!   no log-likelihood sign convention in this crate.
//! - [`SumOfSquares::value`] treats invalid inputs as recoverable
//!   [`errors::OptError`](crate::optimization::errors::OptError) values,
//!   not panics.
//! - Configuration types ([`Tolerances`], [`FitOptions`]) are validated
//!   on construction and treated as internally consistent afterwards.
//!
//! Downstream usage
//! ----------------
//! - The Stepp completeness analysis implements [`SumOfSquares`] for its
//!   bilinear residual model and calls [`minimize`] once per magnitude
//!   bin, mapping non-converged outcomes to NaN table entries.
//! - Box constraints are handled by the caller through the transforms in
//!   [`crate::optimization::numerical_stability`]; the solver itself is
//!   unconstrained.

pub mod adapter;
pub mod api;
pub mod builders;
pub mod run;
pub mod traits;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::api::minimize;
pub use self::traits::{FitOptions, FitOutcome, LineSearcher, SumOfSquares, Tolerances};
pub use self::types::{Cost, FnEvalMap, Grad, Theta, DEFAULT_LBFGS_MEM};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::errors::{OptError, OptResult};
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - End-to-end minimization of a smooth quadratic objective with both
    //   line searches and a finite-difference gradient.
    // - Convergence classification in FitOutcome (converged vs iteration
    //   exhaustion).
    // - Config validation in Tolerances and FitOptions.
    //
    // They intentionally DO NOT cover:
    // - Solver internals (argmin's own test suite covers those).
    // -------------------------------------------------------------------------

    struct Paraboloid;

    impl SumOfSquares for Paraboloid {
        type Data = (f64, f64);

        fn value(&self, theta: &Theta, data: &Self::Data) -> OptResult<Cost> {
            let (a, b) = *data;
            Ok((theta[0] - a).powi(2) + 3.0 * (theta[1] - b).powi(2))
        }

        fn check(&self, theta: &Theta, _data: &Self::Data) -> OptResult<()> {
            if theta.iter().all(|v| v.is_finite()) {
                Ok(())
            } else {
                Err(OptError::InvalidThetaHat {
                    index: 0,
                    value: theta[0],
                    reason: "Initial guess must be finite.",
                })
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // Minimizing a shifted paraboloid recovers the shift with both line
    // searches, using finite-difference gradients.
    fn minimize_recovers_paraboloid_minimum() {
        let data = (1.5, -2.0);
        for ls in [LineSearcher::MoreThuente, LineSearcher::HagerZhang] {
            // Gradient tolerance kept above the finite-difference noise
            // floor of a near-zero cost surface.
            let opts = FitOptions::new(
                Tolerances::new(Some(1e-8), None, Some(200)).unwrap(),
                ls,
                None,
            )
            .unwrap();
            let out = minimize(&Paraboloid, array![0.0, 0.0], &data, &opts)
                .expect("smooth quadratic should minimize");
            assert!(out.converged, "status: {}", out.status);
            assert!((out.theta_hat[0] - 1.5).abs() < 1e-5);
            assert!((out.theta_hat[1] + 2.0).abs() < 1e-5);
            assert!(out.value < 1e-9);
        }
    }

    #[test]
    // Purpose
    // -------
    // A run capped to a single iteration terminates without convergence,
    // and the outcome records that distinction.
    fn minimize_reports_non_convergence_on_iteration_cap() {
        let opts = FitOptions::new(
            Tolerances::new(Some(1e-16), None, Some(1)).unwrap(),
            LineSearcher::MoreThuente,
            None,
        )
        .unwrap();
        let out = minimize(&Paraboloid, array![50.0, -30.0], &(1.5, -2.0), &opts)
            .expect("run should complete");
        assert!(!out.converged, "status: {}", out.status);
    }

    #[test]
    // Purpose
    // -------
    // Tolerances and FitOptions reject malformed configuration before any
    // solver work.
    fn config_validation_rejects_bad_values() {
        assert!(matches!(
            Tolerances::new(None, None, None),
            Err(OptError::NoTolerancesProvided)
        ));
        assert!(matches!(
            Tolerances::new(Some(-1.0), None, Some(10)),
            Err(OptError::InvalidTolGrad { .. })
        ));
        assert!(matches!(
            Tolerances::new(None, Some(0.0), Some(10)),
            Err(OptError::InvalidTolCost { .. })
        ));
        assert!(matches!(
            Tolerances::new(Some(1e-6), None, Some(0)),
            Err(OptError::InvalidMaxIter { .. })
        ));
        let tols = Tolerances::new(Some(1e-6), None, Some(10)).unwrap();
        assert!(matches!(
            FitOptions::new(tols, LineSearcher::MoreThuente, Some(0)),
            Err(OptError::InvalidLBFGSMem { .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Line-searcher names parse case-insensitively and unknown names
    // surface a descriptive error.
    fn line_searcher_parses_case_insensitive() {
        assert_eq!("morethuente".parse::<LineSearcher>().unwrap(), LineSearcher::MoreThuente);
        assert_eq!("HAGERZHANG".parse::<LineSearcher>().unwrap(), LineSearcher::HagerZhang);
        assert!(matches!(
            "newton".parse::<LineSearcher>(),
            Err(OptError::InvalidLineSearch { .. })
        ));
    }
}
