//! Catalogue completeness analysis.
//!
//! Purpose
//! -------
//! Determine, per magnitude bin, the historical year from which a
//! catalogue can be treated as statistically complete. The engine is the
//! Stepp (1971) bilinear-fit procedure in [`stepp`]; its product is a
//! [`CompletenessTable`] consumed read-only by the recurrence and
//! maximum-magnitude estimators.
//!
//! Key behaviors
//! -------------
//! - [`CompletenessTable`] validates its shape on construction and keeps
//!   rows in ascending magnitude order. Years may be NaN: a NaN row means
//!   "no completeness estimate for this bin" and downstream consumers
//!   skip such rows rather than erroring.
//! - [`CompletenessTable::apply_increment_lock`] repairs monotonicity
//!   violations by propagating each bin's year forward through violating
//!   or NaN-valued higher-magnitude bins.
//! - [`CompletenessTable::whole_catalogue`] builds the trivial
//!   single-row table ("complete from the first year at the smallest
//!   magnitude") used when no analysis result is supplied.
use ndarray::Array1;

use crate::catalogue::Catalogue;

pub mod errors;
pub mod stepp;

pub use errors::{CompletenessError, CompletenessResult};
pub use stepp::{Stepp1971, SteppConfig, TimeBin};

/// Ordered (year, magnitude) completeness rows: the catalogue is complete
/// for events of at least `magnitude[i]` from `year[i]` onward.
///
/// Invariants
/// ----------
/// - Columns share a positive length.
/// - Magnitudes are finite and strictly increasing.
/// - Years may be NaN (a failed fit for that bin); for realistic
///   catalogues non-NaN years are non-increasing with magnitude, and
///   [`CompletenessTable::apply_increment_lock`] enforces exactly that.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletenessTable {
    years: Array1<f64>,
    magnitudes: Array1<f64>,
}

impl CompletenessTable {
    /// Construct a validated table.
    ///
    /// # Errors
    /// - [`CompletenessError::EmptyTable`] for zero rows.
    /// - [`CompletenessError::TableShapeMismatch`] for unequal columns.
    /// - [`CompletenessError::UnorderedTableMagnitudes`] unless the
    ///   magnitudes are finite and strictly increasing.
    pub fn new(years: Array1<f64>, magnitudes: Array1<f64>) -> CompletenessResult<Self> {
        if years.is_empty() {
            return Err(CompletenessError::EmptyTable);
        }
        if years.len() != magnitudes.len() {
            return Err(CompletenessError::TableShapeMismatch {
                years: years.len(),
                magnitudes: magnitudes.len(),
            });
        }
        for i in 0..magnitudes.len() {
            if !magnitudes[i].is_finite() {
                return Err(CompletenessError::UnorderedTableMagnitudes);
            }
            if i > 0 && magnitudes[i] <= magnitudes[i - 1] {
                return Err(CompletenessError::UnorderedTableMagnitudes);
            }
        }
        Ok(Self { years, magnitudes })
    }

    /// Trivial single-row table: the whole catalogue treated as complete
    /// at its smallest observed magnitude from its first year.
    pub fn whole_catalogue(catalogue: &Catalogue) -> Self {
        let (mmin, _) = catalogue.magnitude_range();
        Self {
            years: Array1::from_elem(1, catalogue.start_year() as f64),
            magnitudes: Array1::from_elem(1, mmin),
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.years.len()
    }

    /// `true` when the table has no rows (construction rejects this).
    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    /// Completeness years, ascending-magnitude order.
    pub fn years(&self) -> &Array1<f64> {
        &self.years
    }

    /// Magnitude thresholds, ascending.
    pub fn magnitudes(&self) -> &Array1<f64> {
        &self.magnitudes
    }

    /// Rows with a usable (non-NaN) completeness year.
    pub fn valid_rows(&self) -> Vec<(f64, f64)> {
        (0..self.len())
            .filter(|&i| !self.years[i].is_nan())
            .map(|i| (self.years[i], self.magnitudes[i]))
            .collect()
    }

    /// Completeness year governing a given magnitude: the year of the
    /// highest valid threshold not exceeding `magnitude`, if any.
    pub fn year_for_magnitude(&self, magnitude: f64) -> Option<f64> {
        let mut chosen = None;
        for (year, threshold) in self.valid_rows() {
            if magnitude >= threshold {
                chosen = Some(year);
            }
        }
        chosen
    }

    /// Monotonicity repair: walking up in magnitude, any year later than
    /// its predecessor (or NaN) is clamped to the predecessor's year.
    ///
    /// Higher-magnitude bins see complete recording at least as far back
    /// as lower-magnitude bins; fitted tables can violate this on sparse
    /// bins, and this pass repairs the violation without re-fitting.
    pub fn apply_increment_lock(&mut self) {
        for i in 1..self.years.len() {
            if self.years[i].is_nan() || self.years[i] > self.years[i - 1] {
                self.years[i] = self.years[i - 1];
            }
        }
    }
}
