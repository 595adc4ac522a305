//! Bounded-parameter transforms.
//!
//! The L-BFGS solver in this crate is unconstrained, but the Stepp
//! bilinear fit needs its crossover parameter confined to the observed
//! data range. Rather than a bounded solver variant, a logistic map
//! carries an unconstrained optimizer coordinate `t ∈ ℝ` into the open
//! interval `(lo, hi)`:
//!
//! `x = lo + (hi - lo) / (1 + exp(-t))`
//!
//! with the inverse `t = ln((x - lo) / (hi - x))`. Both directions use
//! guarded evaluation so large |t| saturates smoothly instead of
//! overflowing.
use crate::optimization::errors::{OptError, OptResult};

/// General-purpose tolerance for near-zero denominators and interval
/// degeneracy checks in this layer.
pub const GENERAL_TOL: f64 = 1e-12;

/// Map an unconstrained value into the open interval `(lower, upper)`.
///
/// # Errors
/// Returns [`OptError::InvalidBounds`] unless `lower < upper` and both
/// bounds are finite.
pub fn bounded_transform(t: f64, lower: f64, upper: f64) -> OptResult<f64> {
    check_bounds(lower, upper)?;
    // Saturate instead of evaluating exp outside the well-conditioned
    // regime; the interval endpoints are open, so back off by a hair.
    let sigmoid = if t > 36.0 {
        1.0
    } else if t < -36.0 {
        0.0
    } else {
        1.0 / (1.0 + (-t).exp())
    };
    Ok(lower + (upper - lower) * sigmoid)
}

/// Inverse of [`bounded_transform`]: recover the unconstrained coordinate
/// of a value inside `(lower, upper)`.
///
/// # Errors
/// - [`OptError::InvalidBounds`] for a degenerate interval.
/// - [`OptError::ValueOutsideBounds`] when `x` is not strictly inside the
///   interval (up to [`GENERAL_TOL`] of slack, where it is clamped).
pub fn bounded_transform_inv(x: f64, lower: f64, upper: f64) -> OptResult<f64> {
    check_bounds(lower, upper)?;
    let span = upper - lower;
    let mut frac = (x - lower) / span;
    if !(0.0..=1.0).contains(&frac) {
        if frac > -GENERAL_TOL && frac < 1.0 + GENERAL_TOL {
            frac = frac.clamp(0.0, 1.0);
        } else {
            return Err(OptError::ValueOutsideBounds { value: x, lower, upper });
        }
    }
    // Pull exact endpoint values just inside the open interval.
    let frac = frac.clamp(1e-12, 1.0 - 1e-12);
    Ok((frac / (1.0 - frac)).ln())
}

fn check_bounds(lower: f64, upper: f64) -> OptResult<()> {
    if !lower.is_finite() || !upper.is_finite() || upper - lower <= GENERAL_TOL {
        return Err(OptError::InvalidBounds { lower, upper });
    }
    Ok(())
}
