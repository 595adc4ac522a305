//! Numerical stability utilities for the optimization layer.
//!
//! Hosts the guarded nonlinear transforms used to express box constraints
//! through an unconstrained solver; see [`transformations`].

pub mod transformations;

pub use transformations::{bounded_transform, bounded_transform_inv, GENERAL_TOL};
