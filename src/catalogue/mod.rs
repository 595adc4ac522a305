//! Earthquake catalogue container.
//!
//! Purpose
//! -------
//! Provide a validated, in-memory representation of an earthquake
//! catalogue: parallel per-event columns for origin time, hypocentre, and
//! magnitude, plus optional uncertainty columns. All analysis algorithms
//! in this crate consume a [`Catalogue`] immutably and compute derived
//! columns (decimal time, elapsed days) on demand.
//!
//! Key behaviors
//! -------------
//! - [`Catalogue::new`] enforces equal column lengths, non-emptiness,
//!   finite coordinates/magnitudes, and in-range calendar components.
//! - Optional columns (`sigma_magnitude`, `horiz_error`, `depth_error`)
//!   are attached through checked setters and validated against the
//!   event count.
//! - [`Catalogue::decimal_time`] and [`Catalogue::elapsed_days`] derive
//!   the two time representations the declustering and completeness
//!   algorithms operate on.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every per-event column has length `len()`.
//! - Longitude, latitude, depth, and magnitude entries are finite.
//! - Events are *not* required to be time-ordered; algorithms that need
//!   an ordering either sort internally (Gardner-Knopoff, Afteran) or
//!   check the precondition explicitly (Reasenberg).
//!
//! Downstream usage
//! ----------------
//! - Declusterers read coordinates, magnitudes, and derived times.
//! - The completeness and recurrence estimators read magnitudes, years,
//!   and decimal times.
//! - How a catalogue is populated (CSV, database, network) is out of
//!   scope for this crate; tests build catalogues directly from arrays.
use ndarray::Array1;

use crate::utils::{days_from_civil, decimal_time, SECONDS_PER_DAY};

pub mod errors;

pub use errors::{CatalogueError, CatalogueResult};

/// Validated earthquake catalogue with parallel per-event columns.
///
/// Fields
/// ------
/// - `year` .. `second`: origin-time components. Month/day values of zero
///   are accepted as missing-data markers and read as January / the 1st.
/// - `longitude`, `latitude`: epicentre in decimal degrees.
/// - `depth`: hypocentral depth in km (positive down).
/// - `magnitude`: event magnitudes.
/// - `sigma_magnitude`: optional per-event magnitude standard deviations
///   (NaN entries allowed, meaning unknown).
/// - `horiz_error`, `depth_error`: optional location errors in km.
///
/// Invariants
/// ----------
/// - All columns (including attached optional columns) share the same
///   length, which is at least 1.
/// - Coordinates, depths, and magnitudes are finite.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalogue {
    pub year: Array1<i32>,
    pub month: Array1<u32>,
    pub day: Array1<u32>,
    pub hour: Array1<u32>,
    pub minute: Array1<u32>,
    pub second: Array1<f64>,
    pub longitude: Array1<f64>,
    pub latitude: Array1<f64>,
    pub depth: Array1<f64>,
    pub magnitude: Array1<f64>,
    pub sigma_magnitude: Option<Array1<f64>>,
    pub horiz_error: Option<Array1<f64>>,
    pub depth_error: Option<Array1<f64>>,
}

impl Catalogue {
    /// Construct a validated catalogue from its mandatory columns.
    ///
    /// # Errors
    /// - [`CatalogueError::EmptyCatalogue`] when `year` is empty.
    /// - [`CatalogueError::ColumnLengthMismatch`] when any column differs
    ///   in length from `year`.
    /// - [`CatalogueError::NonFiniteValue`] when a coordinate, depth,
    ///   magnitude, or second entry is NaN or infinite.
    /// - [`CatalogueError::InvalidDateComponent`] when a month exceeds 12
    ///   or a day exceeds 31.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        year: Array1<i32>, month: Array1<u32>, day: Array1<u32>, hour: Array1<u32>,
        minute: Array1<u32>, second: Array1<f64>, longitude: Array1<f64>,
        latitude: Array1<f64>, depth: Array1<f64>, magnitude: Array1<f64>,
    ) -> CatalogueResult<Self> {
        let n = year.len();
        if n == 0 {
            return Err(CatalogueError::EmptyCatalogue);
        }
        check_len("month", month.len(), n)?;
        check_len("day", day.len(), n)?;
        check_len("hour", hour.len(), n)?;
        check_len("minute", minute.len(), n)?;
        check_len("second", second.len(), n)?;
        check_len("longitude", longitude.len(), n)?;
        check_len("latitude", latitude.len(), n)?;
        check_len("depth", depth.len(), n)?;
        check_len("magnitude", magnitude.len(), n)?;
        check_finite("second", &second)?;
        check_finite("longitude", &longitude)?;
        check_finite("latitude", &latitude)?;
        check_finite("depth", &depth)?;
        check_finite("magnitude", &magnitude)?;
        for (index, &value) in month.iter().enumerate() {
            if value > 12 {
                return Err(CatalogueError::InvalidDateComponent { column: "month", index, value });
            }
        }
        for (index, &value) in day.iter().enumerate() {
            if value > 31 {
                return Err(CatalogueError::InvalidDateComponent { column: "day", index, value });
            }
        }
        Ok(Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
            longitude,
            latitude,
            depth,
            magnitude,
            sigma_magnitude: None,
            horiz_error: None,
            depth_error: None,
        })
    }

    /// Attach per-event magnitude uncertainties. NaN entries are allowed
    /// and mean "unknown for this event".
    pub fn with_sigma_magnitude(mut self, sigma: Array1<f64>) -> CatalogueResult<Self> {
        check_len("sigma_magnitude", sigma.len(), self.len())?;
        self.sigma_magnitude = Some(sigma);
        Ok(self)
    }

    /// Attach per-event horizontal and depth location errors (km).
    pub fn with_location_errors(
        mut self, horiz_error: Array1<f64>, depth_error: Array1<f64>,
    ) -> CatalogueResult<Self> {
        check_len("horiz_error", horiz_error.len(), self.len())?;
        check_len("depth_error", depth_error.len(), self.len())?;
        check_finite("horiz_error", &horiz_error)?;
        check_finite("depth_error", &depth_error)?;
        self.horiz_error = Some(horiz_error);
        self.depth_error = Some(depth_error);
        Ok(self)
    }

    /// Number of events.
    pub fn len(&self) -> usize {
        self.year.len()
    }

    /// `true` when the catalogue holds no events. Construction rejects
    /// this state; the method exists for slice-style call sites.
    pub fn is_empty(&self) -> bool {
        self.year.is_empty()
    }

    /// Decimal-year representation of every event time.
    pub fn decimal_time(&self) -> Array1<f64> {
        decimal_time(&self.year, &self.month, &self.day, &self.hour, &self.minute, &self.second)
    }

    /// Days elapsed since the first event in the catalogue, from a civil
    /// day count plus the intra-day fraction.
    ///
    /// The reference is the chronologically earliest event, so entries
    /// are non-negative for time-ordered catalogues; out-of-order inputs
    /// produce a non-monotonic vector, which the Reasenberg precondition
    /// check relies on.
    pub fn elapsed_days(&self) -> Array1<f64> {
        let n = self.len();
        let mut days = Array1::<f64>::zeros(n);
        for i in 0..n {
            let whole =
                days_from_civil(self.year[i], self.month[i].max(1), self.day[i].max(1)) as f64;
            let frac = (3600.0 * self.hour[i] as f64
                + 60.0 * self.minute[i] as f64
                + self.second[i])
                / SECONDS_PER_DAY;
            days[i] = whole + frac;
        }
        let first = days.iter().cloned().fold(f64::INFINITY, f64::min);
        days.mapv_inplace(|d| d - first);
        days
    }

    /// Earliest event year in the catalogue.
    pub fn start_year(&self) -> i32 {
        *self.year.iter().min().expect("catalogue is non-empty")
    }

    /// Latest event year in the catalogue.
    pub fn end_year(&self) -> i32 {
        *self.year.iter().max().expect("catalogue is non-empty")
    }

    /// Minimum and maximum observed magnitude.
    pub fn magnitude_range(&self) -> (f64, f64) {
        let mmin = self.magnitude.iter().cloned().fold(f64::INFINITY, f64::min);
        let mmax = self.magnitude.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        (mmin, mmax)
    }
}

fn check_len(column: &'static str, actual: usize, expected: usize) -> CatalogueResult<()> {
    if actual != expected {
        return Err(CatalogueError::ColumnLengthMismatch { column, expected, actual });
    }
    Ok(())
}

fn check_finite(column: &'static str, values: &Array1<f64>) -> CatalogueResult<()> {
    for (index, &value) in values.iter().enumerate() {
        if !value.is_finite() {
            return Err(CatalogueError::NonFiniteValue { column, index, value });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn small_catalogue() -> Catalogue {
        Catalogue::new(
            array![1990, 1994, 2000],
            array![3, 6, 1],
            array![10, 15, 1],
            array![0, 12, 6],
            array![0, 30, 0],
            array![0.0, 0.0, 30.0],
            array![10.0, 10.1, 10.2],
            array![45.0, 45.1, 45.2],
            array![10.0, 12.0, 8.0],
            array![5.0, 6.1, 4.4],
        )
        .expect("valid catalogue")
    }

    #[test]
    // Purpose
    // -------
    // Happy-path construction keeps columns and reports basic properties.
    fn catalogue_new_valid_columns() {
        let cat = small_catalogue();
        assert_eq!(cat.len(), 3);
        assert_eq!(cat.start_year(), 1990);
        assert_eq!(cat.end_year(), 2000);
        let (mmin, mmax) = cat.magnitude_range();
        assert!((mmin - 4.4).abs() < 1e-12);
        assert!((mmax - 6.1).abs() < 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Mismatched column lengths and empty inputs are rejected with the
    // dedicated error variants.
    fn catalogue_new_rejects_bad_shapes() {
        let err = Catalogue::new(
            array![1990, 1991],
            array![1],
            array![1, 1],
            array![0, 0],
            array![0, 0],
            array![0.0, 0.0],
            array![0.0, 0.0],
            array![0.0, 0.0],
            array![0.0, 0.0],
            array![5.0, 5.5],
        )
        .unwrap_err();
        assert!(matches!(err, CatalogueError::ColumnLengthMismatch { column: "month", .. }));

        let err = Catalogue::new(
            Array1::<i32>::zeros(0),
            Array1::<u32>::zeros(0),
            Array1::<u32>::zeros(0),
            Array1::<u32>::zeros(0),
            Array1::<u32>::zeros(0),
            Array1::<f64>::zeros(0),
            Array1::<f64>::zeros(0),
            Array1::<f64>::zeros(0),
            Array1::<f64>::zeros(0),
            Array1::<f64>::zeros(0),
        )
        .unwrap_err();
        assert_eq!(err, CatalogueError::EmptyCatalogue);
    }

    #[test]
    // Purpose
    // -------
    // Non-finite magnitudes are rejected at construction time.
    fn catalogue_new_rejects_non_finite_magnitude() {
        let err = Catalogue::new(
            array![1990],
            array![1],
            array![1],
            array![0],
            array![0],
            array![0.0],
            array![0.0],
            array![0.0],
            array![0.0],
            array![f64::NAN],
        )
        .unwrap_err();
        assert!(matches!(err, CatalogueError::NonFiniteValue { column: "magnitude", .. }));
    }

    #[test]
    // Purpose
    // -------
    // elapsed_days is zero at the earliest event and grows with true
    // calendar day differences, including leap days.
    fn elapsed_days_spans_leap_years() {
        let cat = small_catalogue();
        let days = cat.elapsed_days();
        assert!((days[0] - 0.0).abs() < 1e-12);
        // 1990-03-10 to 1994-06-15 12:30: 1558 days plus half a day.
        let expected =
            (days_from_civil(1994, 6, 15) - days_from_civil(1990, 3, 10)) as f64 + 12.5 / 24.0;
        assert!((days[1] - expected).abs() < 1e-9);
        assert!(days[2] > days[1]);
    }

    #[test]
    // Purpose
    // -------
    // Optional columns validate their length against the event count.
    fn optional_columns_validate_length() {
        let cat = small_catalogue();
        let err = cat.clone().with_sigma_magnitude(array![0.1, 0.2]).unwrap_err();
        assert!(matches!(
            err,
            CatalogueError::ColumnLengthMismatch { column: "sigma_magnitude", .. }
        ));
        let ok = cat.with_sigma_magnitude(array![0.1, 0.2, 0.3]).unwrap();
        assert!(ok.sigma_magnitude.is_some());
    }
}
