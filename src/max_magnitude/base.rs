//! Shared helpers for the maximum-magnitude estimators.
//!
//! Hosts the observed-mmax resolution rules, the magnitude-floor
//! resolution, and the fixed-point driver common to the Kijko variants.
use crate::catalogue::Catalogue;
use crate::max_magnitude::{
    errors::{MmaxError, MmaxResult},
    MmaxConfig,
};
use crate::utils::BIN_OFFSET;

/// Resolve the observed maximum magnitude and its uncertainty.
///
/// Precedence:
/// 1. A configured `input_mmax` wins, and then `input_mmax_uncertainty`
///    is mandatory.
/// 2. Otherwise the catalogue maximum is used. Its uncertainty comes
///    from the `sigma_magnitude` column when that is present, non-empty
///    for this catalogue, and not entirely NaN; a NaN at the maximum's
///    own position falls back to the largest finite sigma in the
///    column.
/// 3. Failing the column, a configured `input_mmax_uncertainty` is
///    used.
///
/// # Errors
/// [`MmaxError::MissingMmaxUncertainty`] when no uncertainty can be
/// resolved by the rules above.
pub fn observed_mmax(catalogue: &Catalogue, config: &MmaxConfig) -> MmaxResult<(f64, f64)> {
    if let Some(mmax) = config.input_mmax {
        return match config.input_mmax_uncertainty {
            Some(sigma) => Ok((mmax, sigma)),
            None => Err(MmaxError::MissingMmaxUncertainty),
        };
    }
    let mut max_location = 0usize;
    for i in 1..catalogue.len() {
        if catalogue.magnitude[i] > catalogue.magnitude[max_location] {
            max_location = i;
        }
    }
    let obsmax = catalogue.magnitude[max_location];

    let usable_column = catalogue
        .sigma_magnitude
        .as_ref()
        .filter(|sigma| !sigma.is_empty() && !sigma.iter().all(|v| v.is_nan()));
    if let Some(sigma) = usable_column {
        let at_max = sigma[max_location];
        if !at_max.is_nan() {
            return Ok((obsmax, at_max));
        }
        let largest_finite =
            sigma.iter().cloned().filter(|v| !v.is_nan()).fold(f64::NEG_INFINITY, f64::max);
        return Ok((obsmax, largest_finite));
    }
    match config.input_mmax_uncertainty {
        Some(sigma) => Ok((obsmax, sigma)),
        None => Err(MmaxError::MissingMmaxUncertainty),
    }
}

/// Resolve the magnitude floor and the number of events above it.
///
/// A configured `input_mmin` below the observed minimum is clamped up
/// to the observed minimum (the integral is insensitive to a floor with
/// no events above it, and an unclamped floor destabilizes the
/// fixed-point iteration). Counting applies the shared bin-edge offset.
pub fn magnitude_vector_properties(catalogue: &Catalogue, config: &MmaxConfig) -> (f64, f64) {
    let (obs_min, _) = catalogue.magnitude_range();
    let mmin = match config.input_mmin {
        Some(input) if input > obs_min => input,
        _ => obs_min,
    };
    let neq =
        catalogue.magnitude.iter().filter(|&&m| m >= mmin - BIN_OFFSET).count() as f64;
    (neq, mmin)
}

/// Fixed-point driver shared by the Kijko estimators.
///
/// Iterates `mmax <- observed_mmax + delta(mmax)` until the change
/// drops to `tolerance` or below. Exhausting the iteration ceiling
/// prints a diagnostic and returns the last estimate; a NaN delta ends
/// the iteration immediately with a NaN estimate (every comparison with
/// NaN fails), matching the degraded-result contract.
pub fn fixed_point_mmax<F>(
    obsmax: f64, tolerance: f64, maximum_iterations: usize, estimator: &str, mut delta: F,
) -> MmaxResult<f64>
where
    F: FnMut(f64) -> MmaxResult<f64>,
{
    let mut mmax = obsmax;
    let mut d_t = f64::INFINITY;
    let mut iterations = 0usize;
    while d_t > tolerance {
        let tmmax = obsmax + delta(mmax)?;
        d_t = (tmmax - mmax).abs();
        mmax = tmmax;
        iterations += 1;
        if iterations > maximum_iterations {
            eprintln!(
                "{estimator} reached maximum number of iterations; returning last estimate"
            );
            break;
        }
    }
    Ok(mmax)
}

/// Uncertainty composition shared by the Kijko estimators.
pub fn mmax_uncertainty(obsmax: f64, obsmax_sigma: f64, mmax: f64) -> f64 {
    (obsmax_sigma * obsmax_sigma + (mmax - obsmax) * (mmax - obsmax)).sqrt()
}
