//! Maximum-magnitude estimators.
//!
//! Purpose
//! -------
//! Estimate the largest magnitude a catalogue's source is believed
//! capable of producing, with an uncertainty. Four estimators are
//! provided:
//!
//! - [`CumulativeMoment`]: inverts the largest deviation between
//!   observed and trend cumulative seismic-moment release, optionally
//!   bootstrap-resampled over magnitude uncertainties.
//! - [`KijkoSellevolFixedB`]: truncated-exponential integral with a
//!   fixed b-value.
//! - [`KijkoSellevolBayes`]: the same structure with a Gaussian prior
//!   on beta.
//! - [`KijkoNonParametricGaussian`]: kernel-density (Silverman
//!   bandwidth, Hastings Gaussian CDF) integral evaluated by Simpson's
//!   rule over exponentially spaced magnitudes.
//!
//! Key behaviors
//! -------------
//! - The three Kijko variants share one convergence state machine:
//!   iterate `mmax <- observed_mmax + integral(mmax)` until the change
//!   drops below `tolerance`; exhausting `maximum_iterations` prints a
//!   diagnostic and returns the last estimate rather than failing
//!   ([`base::fixed_point_mmax`]).
//! - Degenerate inputs (`mmin >= mmax` inside an integrand) are errors;
//!   an undefined model (negative beta in the Bayes variant) is a NaN
//!   no-op; absent bootstrapping every estimator is deterministic.
use crate::catalogue::Catalogue;

pub mod base;
pub mod cumulative_moment;
pub mod errors;
pub mod kijko_nonparametric_gaussian;
pub mod kijko_sellevol_bayes;
pub mod kijko_sellevol_fixed_b;

pub use cumulative_moment::CumulativeMoment;
pub use errors::{MmaxError, MmaxResult};
pub use kijko_nonparametric_gaussian::KijkoNonParametricGaussian;
pub use kijko_sellevol_bayes::KijkoSellevolBayes;
pub use kijko_sellevol_fixed_b::KijkoSellevolFixedB;

/// Maximum-magnitude estimate with one standard deviation.
///
/// NaN fields mean "no estimate" (undefined model), mirroring the
/// recurrence sentinel convention.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MmaxEstimate {
    pub mmax: f64,
    pub sigma_mmax: f64,
}

impl MmaxEstimate {
    /// The NaN-filled "no estimate" sentinel.
    pub fn nan() -> Self {
        Self { mmax: f64::NAN, sigma_mmax: f64::NAN }
    }
}

/// Shared estimator configuration; each estimator consumes its subset.
///
/// Fields
/// ------
/// - `b_value`, `sigma_b`: Gutenberg-Richter slope and its uncertainty
///   (fixed-b uses only the former; Bayes uses both).
/// - `input_mmin`: magnitude floor override; values below the observed
///   minimum are clamped up to it.
/// - `input_mmax`, `input_mmax_uncertainty`: observed-mmax override.
///   Supplying `input_mmax` without its uncertainty is an error.
/// - `tolerance`, `maximum_iterations`: fixed-point controls.
/// - `number_bootstraps`: Gaussian resamples for the cumulative-moment
///   sigma; 0 and 1 both mean "deterministic, sigma 0".
/// - `number_earthquakes`: largest-events subset size for the
///   non-parametric estimator.
/// - `number_samples`: integration grid size for the non-parametric
///   estimator.
/// - `seed`: RNG seed for reproducible bootstraps.
#[derive(Debug, Clone, PartialEq)]
pub struct MmaxConfig {
    pub b_value: f64,
    pub sigma_b: f64,
    pub input_mmin: Option<f64>,
    pub input_mmax: Option<f64>,
    pub input_mmax_uncertainty: Option<f64>,
    pub tolerance: f64,
    pub maximum_iterations: usize,
    pub number_bootstraps: usize,
    pub number_earthquakes: usize,
    pub number_samples: usize,
    pub seed: Option<u64>,
}

impl Default for MmaxConfig {
    fn default() -> Self {
        Self {
            b_value: 1.0,
            sigma_b: 0.05,
            input_mmin: None,
            input_mmax: None,
            input_mmax_uncertainty: None,
            tolerance: 1e-3,
            maximum_iterations: 1000,
            number_bootstraps: 1,
            number_earthquakes: 100,
            number_samples: 51,
            seed: None,
        }
    }
}

impl MmaxConfig {
    /// Validate the numeric controls shared by the iterative
    /// estimators.
    ///
    /// # Errors
    /// The matching `Invalid*` variant of [`MmaxError`] when a control
    /// is out of range.
    pub fn validate(&self) -> MmaxResult<()> {
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(MmaxError::InvalidTolerance { value: self.tolerance });
        }
        if self.maximum_iterations == 0 {
            return Err(MmaxError::InvalidMaxIterations);
        }
        if self.number_samples < 3 {
            return Err(MmaxError::InvalidSampleCount { value: self.number_samples });
        }
        Ok(())
    }
}

/// Maximum-magnitude estimator selector: one variant per implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MmaxEstimator {
    CumulativeMoment,
    KijkoSellevolFixedB,
    KijkoSellevolBayes,
    KijkoNonParametricGaussian,
}

impl MmaxEstimator {
    /// Run the selected estimator.
    pub fn get_mmax(
        &self, catalogue: &Catalogue, config: &MmaxConfig,
    ) -> MmaxResult<MmaxEstimate> {
        match self {
            MmaxEstimator::CumulativeMoment => CumulativeMoment.get_mmax(catalogue, config),
            MmaxEstimator::KijkoSellevolFixedB => {
                KijkoSellevolFixedB.get_mmax(catalogue, config)
            }
            MmaxEstimator::KijkoSellevolBayes => KijkoSellevolBayes.get_mmax(catalogue, config),
            MmaxEstimator::KijkoNonParametricGaussian => {
                KijkoNonParametricGaussian.get_mmax(catalogue, config)
            }
        }
    }
}
