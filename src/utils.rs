//! Shared time, geodesy, and numerical helpers for catalogue analysis.
//!
//! This module provides:
//! - Calendar conversions: [`decimal_time`] (decimal-year event times,
//!   leap-year aware) and [`days_from_civil`] (proleptic Gregorian day
//!   count used to order events by elapsed days).
//! - [`haversine`] great-circle distances between one reference location
//!   and a vector of locations, in kilometres.
//! - [`binned_counts`], a histogram that offsets every bin edge by
//!   [`BIN_OFFSET`] so values sitting exactly on an edge are counted in
//!   the bin *starting* at that edge regardless of floating-point noise.
//! - [`sample_gaussian_vector`] for (optionally truncated) Gaussian
//!   perturbation of observations, used by bootstrap resampling.
//! - [`simpson_nonuniform`], composite Simpson integration over
//!   irregularly spaced samples.
//!
//! Conventions:
//! - Longitudes/latitudes are in decimal degrees unless stated otherwise.
//! - Time windows and elapsed times are expressed in days or decimal
//!   years; the conversion constant between the two lives with the
//!   distance-time window models.
use ndarray::Array1;
use rand::Rng;
use rand_distr::StandardNormal;
use statrs::distribution::{ContinuousCDF, Normal};

/// Cumulative day count at the start of each month, non-leap years.
pub const MARKER_NORMAL: [f64; 12] =
    [0.0, 31.0, 59.0, 90.0, 120.0, 151.0, 181.0, 212.0, 243.0, 273.0, 304.0, 334.0];

/// Cumulative day count at the start of each month, leap years.
pub const MARKER_LEAP: [f64; 12] =
    [0.0, 31.0, 60.0, 91.0, 121.0, 152.0, 182.0, 213.0, 244.0, 274.0, 305.0, 335.0];

/// Seconds per day.
pub const SECONDS_PER_DAY: f64 = 86400.0;

/// Mean Earth radius used by [`haversine`], in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.227;

/// Offset subtracted from histogram bin edges in [`binned_counts`].
///
/// Magnitudes are conventionally reported on a 0.1 grid, and bin edges are
/// generated on the same grid; floating-point representation puts a value
/// like 4.1 randomly on either side of the edge 4.1. Shifting every edge
/// down by this amount pins edge values to the bin starting at that edge.
pub const BIN_OFFSET: f64 = 1.0e-7;

/// Returns `true` when `year` is a Gregorian leap year.
pub fn leap_check(year: i32) -> bool {
    (year % 4 == 0) && (year % 100 != 0 || year % 400 == 0)
}

/// Convert event date-times to decimal years.
///
/// Month and day values of zero (missing data markers) are treated as
/// January / the 1st. The fraction of the year accounts for leap years by
/// switching both the month marker table and the year length.
///
/// # Arguments
/// - `year`, `month`, `day`, `hour`, `minute`: integer time components.
/// - `second`: seconds, fractional values allowed.
///
/// # Returns
/// One decimal-year value per event.
///
/// # Panics
/// Panics if the component arrays differ in length; callers hold the
/// equal-length invariant (enforced by the catalogue constructor).
pub fn decimal_time(
    year: &Array1<i32>, month: &Array1<u32>, day: &Array1<u32>, hour: &Array1<u32>,
    minute: &Array1<u32>, second: &Array1<f64>,
) -> Array1<f64> {
    let n = year.len();
    assert!(
        month.len() == n
            && day.len() == n
            && hour.len() == n
            && minute.len() == n
            && second.len() == n,
        "time component arrays must have equal length"
    );
    let mut dtime = Array1::<f64>::zeros(n);
    for i in 0..n {
        let tmo = month[i].max(1) as usize - 1;
        let tda = day[i].max(1) as f64;
        let leap = leap_check(year[i]);
        let marker = if leap { &MARKER_LEAP } else { &MARKER_NORMAL };
        let day_count = marker[tmo] + tda - 1.0;
        let year_secs = day_count * SECONDS_PER_DAY
            + second[i]
            + 60.0 * minute[i] as f64
            + 3600.0 * hour[i] as f64;
        let year_len = if leap { 366.0 } else { 365.0 };
        dtime[i] = year[i] as f64 + year_secs / (year_len * SECONDS_PER_DAY);
    }
    dtime
}

/// Days since 1970-01-01 for a proleptic Gregorian calendar date.
///
/// Used to build true elapsed-day vectors (leap years included) for
/// algorithms that order and window events by days rather than decimal
/// years.
pub fn days_from_civil(year: i32, month: u32, day: u32) -> i64 {
    let y = i64::from(year) - i64::from(month <= 2);
    let era = if y >= 0 { y } else { y - 399 } / 400;
    let yoe = y - era * 400;
    let m = i64::from(month);
    let doy = (153 * (m + if m > 2 { -3 } else { 9 }) + 2) / 5 + i64::from(day) - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146097 + doe - 719468
}

/// Great-circle distances from one reference point to a set of points.
///
/// # Arguments
/// - `lon`, `lat`: coordinate vectors of the target points, degrees.
/// - `lon0`, `lat0`: reference point, degrees.
///
/// # Returns
/// Distances in kilometres, one per target point.
pub fn haversine(lon: &Array1<f64>, lat: &Array1<f64>, lon0: f64, lat0: f64) -> Array1<f64> {
    let cfact = std::f64::consts::PI / 180.0;
    let lat0_r = cfact * lat0;
    let lon0_r = cfact * lon0;
    let mut out = Array1::<f64>::zeros(lon.len());
    for i in 0..lon.len() {
        let dlat = cfact * lat[i] - lat0_r;
        let dlon = cfact * lon[i] - lon0_r;
        let aval = (dlat / 2.0).sin().powi(2)
            + (cfact * lat[i]).cos() * lat0_r.cos() * (dlon / 2.0).sin().powi(2);
        out[i] = 2.0 * EARTH_RADIUS_KM * aval.sqrt().atan2((1.0 - aval).sqrt());
    }
    out
}

/// Count values per bin with edges shifted down by [`BIN_OFFSET`].
///
/// Bin `i` counts values in `[edges[i] - offset, edges[i + 1] - offset)`,
/// so a value lying exactly on `edges[i]` (up to representation noise
/// smaller than the offset) always lands in bin `i`.
///
/// # Arguments
/// - `values`: data values.
/// - `edges`: ascending bin edges, `len >= 2`.
///
/// # Returns
/// Counts as `f64`, `edges.len() - 1` entries.
pub fn binned_counts(values: &Array1<f64>, edges: &Array1<f64>) -> Array1<f64> {
    let nbins = edges.len() - 1;
    let mut counter = Array1::<f64>::zeros(nbins);
    for i in 0..nbins {
        let lo = edges[i] - BIN_OFFSET;
        let hi = edges[i + 1] - BIN_OFFSET;
        let count = values.iter().filter(|&&v| v >= lo && v < hi).count();
        counter[i] = count as f64;
    }
    counter
}

/// Perturb each observation with Gaussian noise of its own standard
/// deviation, optionally truncated to a bounded data range.
///
/// With `bounds = Some((lower, upper))` the perturbation is drawn from a
/// standard normal truncated (per element) so that the perturbed value
/// stays inside the interval; either side may be `None` for one-sided
/// truncation. The truncated draw uses inverse-CDF sampling.
///
/// # Arguments
/// - `data`: observed values.
/// - `sigma`: per-observation standard deviations (same length).
/// - `bounds`: optional `(lower, upper)` bounds on the perturbed values.
/// - `rng`: random number generator (seedable by the caller for
///   reproducible bootstraps).
pub fn sample_gaussian_vector<R: Rng>(
    data: &Array1<f64>, sigma: &Array1<f64>, bounds: Option<(Option<f64>, Option<f64>)>,
    rng: &mut R,
) -> Array1<f64> {
    let n = data.len();
    let mut out = Array1::<f64>::zeros(n);
    let std_norm = Normal::new(0.0, 1.0).expect("unit normal");
    for i in 0..n {
        let z: f64 = match bounds {
            None => rng.sample(StandardNormal),
            Some((lower, upper)) => {
                if sigma[i] == 0.0 {
                    0.0
                } else {
                    let a = lower.map_or(0.0, |lo| std_norm.cdf((lo - data[i]) / sigma[i]));
                    let b = upper.map_or(1.0, |hi| std_norm.cdf((hi - data[i]) / sigma[i]));
                    let u: f64 = rng.gen_range(0.0..1.0);
                    std_norm.inverse_cdf(a + u * (b - a))
                }
            }
        };
        out[i] = data[i] + sigma[i] * z;
    }
    out
}

/// Composite Simpson integration over irregularly spaced samples.
///
/// Integrates pairs of consecutive intervals with the non-uniform Simpson
/// weights; when the number of intervals is odd the final interval is
/// closed with the trapezoid rule.
///
/// # Arguments
/// - `y`: sample values.
/// - `x`: strictly increasing sample positions, same length as `y`,
///   `len >= 2`.
pub fn simpson_nonuniform(y: &Array1<f64>, x: &Array1<f64>) -> f64 {
    let n = x.len();
    debug_assert!(n >= 2 && y.len() == n);
    let mut total = 0.0;
    let mut i = 0;
    while i + 2 < n {
        let h0 = x[i + 1] - x[i];
        let h1 = x[i + 2] - x[i + 1];
        let common = (h0 + h1) / 6.0;
        total += common
            * ((2.0 - h1 / h0) * y[i]
                + (h0 + h1).powi(2) / (h0 * h1) * y[i + 1]
                + (2.0 - h0 / h1) * y[i + 2]);
        i += 2;
    }
    if i + 2 == n {
        // Odd interval count: close the last interval with a trapezoid.
        total += 0.5 * (x[n - 1] - x[n - 2]) * (y[n - 1] + y[n - 2]);
    }
    total
}
