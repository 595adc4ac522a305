//! Gutenberg-Richter recurrence parameter estimators.
//!
//! Purpose
//! -------
//! Fit the magnitude-frequency relation of a (typically declustered)
//! catalogue: the b-value, its standard error, and an annual activity
//! rate above a reference magnitude, accounting for time-varying
//! completeness. Three estimators with distinct statistical derivations
//! are provided:
//!
//! - [`AkiMaxLikelihood`]: the classic maximum-likelihood b-value with
//!   the Bender binned-data variance, over the catalogue above a single
//!   completeness threshold.
//! - [`Weichert`]: a joint likelihood across magnitude bins with
//!   per-bin observation durations, solved by Newton-Raphson on beta.
//! - [`KijkoSmit`]: per-completeness-interval Aki estimates combined by
//!   a count-weighted harmonic mean. Deliberately distinct from the
//!   Weichert joint likelihood; the two must not be conflated.
//!
//! Conventions
//! -----------
//! - All histogram binning offsets bin edges by the shared 1e-7 epsilon
//!   ([`crate::utils::binned_counts`]) so grid-aligned magnitudes land
//!   in the bin starting at their nominal edge.
//! - Anticipated numerical failure (Weichert non-convergence, fewer
//!   than two events for Aki) produces a NaN-filled
//!   [`RecurrenceEstimate`]; contract violations (missing completeness,
//!   empty completeness intervals) are errors.
use crate::catalogue::Catalogue;
use crate::completeness::CompletenessTable;

pub mod aki;
pub mod errors;
pub mod kijko_smit;
pub mod utils;
pub mod weichert;

pub use aki::AkiMaxLikelihood;
pub use errors::{RecurrenceError, RecurrenceResult};
pub use kijko_smit::KijkoSmit;
pub use weichert::Weichert;

/// Fitted Gutenberg-Richter parameters with uncertainties.
///
/// `rate` is the annual rate of events at or above the configured
/// reference magnitude. NaN fields mean "no estimate" (anticipated
/// numerical failure), never a silent zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecurrenceEstimate {
    pub b_value: f64,
    pub sigma_b: f64,
    pub rate: f64,
    pub sigma_rate: f64,
}

impl RecurrenceEstimate {
    /// The NaN-filled "no estimate" sentinel.
    pub fn nan() -> Self {
        Self { b_value: f64::NAN, sigma_b: f64::NAN, rate: f64::NAN, sigma_rate: f64::NAN }
    }

    /// `true` when every field is a usable number.
    pub fn is_valid(&self) -> bool {
        self.b_value.is_finite()
            && self.sigma_b.is_finite()
            && self.rate.is_finite()
            && self.sigma_rate.is_finite()
    }
}

/// Shared estimator configuration.
///
/// Fields
/// ------
/// - `reference_magnitude`: magnitude for the reported activity rate
///   (default 0.0).
/// - `magnitude_interval`: histogram bin width (default 0.1).
/// - `b_value_initial`, `tolerance`, `max_iterations`: Newton-Raphson
///   controls, consumed by [`Weichert`] only.
#[derive(Debug, Clone, PartialEq)]
pub struct RecurrenceConfig {
    pub reference_magnitude: f64,
    pub magnitude_interval: f64,
    pub b_value_initial: f64,
    pub tolerance: f64,
    pub max_iterations: usize,
}

impl Default for RecurrenceConfig {
    fn default() -> Self {
        Self {
            reference_magnitude: 0.0,
            magnitude_interval: 0.1,
            b_value_initial: 1.0,
            tolerance: 1e-5,
            max_iterations: 1000,
        }
    }
}

impl RecurrenceConfig {
    /// Construct a validated configuration.
    ///
    /// # Errors
    /// One of the `Invalid*` variants of [`RecurrenceError`] when a field
    /// is out of range.
    pub fn new(
        reference_magnitude: f64, magnitude_interval: f64, b_value_initial: f64, tolerance: f64,
        max_iterations: usize,
    ) -> RecurrenceResult<Self> {
        if !reference_magnitude.is_finite() {
            return Err(RecurrenceError::InvalidReferenceMagnitude {
                value: reference_magnitude,
            });
        }
        if !magnitude_interval.is_finite() || magnitude_interval <= 0.0 {
            return Err(RecurrenceError::InvalidMagnitudeInterval { value: magnitude_interval });
        }
        if !tolerance.is_finite() || tolerance <= 0.0 {
            return Err(RecurrenceError::InvalidTolerance { value: tolerance });
        }
        if max_iterations == 0 {
            return Err(RecurrenceError::InvalidMaxIterations);
        }
        Ok(Self {
            reference_magnitude,
            magnitude_interval,
            b_value_initial,
            tolerance,
            max_iterations,
        })
    }
}

/// Recurrence estimator selector: one variant per implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecurrenceEstimator {
    AkiMaxLikelihood,
    Weichert,
    KijkoSmit,
}

impl RecurrenceEstimator {
    /// Run the selected estimator.
    ///
    /// `completeness` is optional for [`AkiMaxLikelihood`] (whole
    /// catalogue assumed complete when absent) and required for the
    /// other two.
    pub fn calculate(
        &self, catalogue: &Catalogue, config: &RecurrenceConfig,
        completeness: Option<&CompletenessTable>,
    ) -> RecurrenceResult<RecurrenceEstimate> {
        match self {
            RecurrenceEstimator::AkiMaxLikelihood => {
                AkiMaxLikelihood.calculate(catalogue, config, completeness)
            }
            RecurrenceEstimator::Weichert => {
                let table = completeness.ok_or(RecurrenceError::MissingCompleteness {
                    estimator: "Weichert",
                })?;
                Weichert.calculate(catalogue, config, table)
            }
            RecurrenceEstimator::KijkoSmit => {
                let table = completeness.ok_or(RecurrenceError::MissingCompleteness {
                    estimator: "KijkoSmit",
                })?;
                KijkoSmit.calculate(catalogue, config, table)
            }
        }
    }
}
