//! Numerical optimization layer for the completeness fitting routines.
//!
//! Purpose
//! -------
//! Provide an argmin-backed L-BFGS minimizer for sum-of-squared-residual
//! objectives, together with the numeric aliases, validation helpers, and
//! bounded parameter transforms the fitting code relies on. The Stepp
//! completeness analysis is the primary consumer; the layer itself is
//! model-agnostic.
//!
//! Key behaviors
//! -------------
//! - [`least_squares`] exposes a single trait, [`least_squares::SumOfSquares`],
//!   and an entry point [`least_squares::minimize`] that runs L-BFGS with a
//!   configurable line search, tolerances, and finite-difference gradient
//!   fallback.
//! - [`numerical_stability`] provides box-constraint transforms that stand
//!   in for bounded solvers: parameters optimized in unconstrained space
//!   are mapped into an open interval before the objective is evaluated.
//! - [`errors`] centralizes optimizer error reporting as [`errors::OptError`].
//!
//! Conventions
//! -----------
//! - The optimizer always *minimizes*; objectives return the cost
//!   directly (no sign flipping).
//! - Non-convergence is visible on [`least_squares::FitOutcome::converged`];
//!   callers that treat non-convergence as a NaN sentinel (rather than an
//!   error) inspect that flag.

pub mod errors;
pub mod least_squares;
pub mod numerical_stability;
