//! Binning helpers shared by the recurrence estimators.
//!
//! Both helpers count with the shared offset histogram
//! ([`crate::utils::binned_counts`]): bin edges sit on the conventional
//! 0.1-magnitude grid and the 1e-7 offset keeps grid-aligned magnitudes
//! in the bin starting at their nominal edge.
use ndarray::Array1;

use crate::catalogue::Catalogue;
use crate::completeness::CompletenessTable;
use crate::recurrence::errors::{RecurrenceError, RecurrenceResult};
use crate::utils::{binned_counts, BIN_OFFSET};

/// Magnitude-frequency table over the full catalogue duration.
///
/// One row per magnitude bin: central magnitude, event count, reverse
/// cumulative count, annual rate, and reverse cumulative annual rate.
#[derive(Debug, Clone, PartialEq)]
pub struct RecurrenceTable {
    pub magnitudes: Array1<f64>,
    pub counts: Array1<f64>,
    pub cum_counts: Array1<f64>,
    pub rates: Array1<f64>,
    pub cum_rates: Array1<f64>,
}

/// Build a magnitude-frequency table at `dmag` spacing.
///
/// The bin grid spans `floor(10 mmin)/10` to the first edge beyond the
/// observed maximum; the observation period is `max(year) - min(year) +
/// 1` years.
pub fn recurrence_table(
    magnitude: &Array1<f64>, dmag: f64, year: &Array1<i32>,
) -> RecurrenceTable {
    let num_years =
        (*year.iter().max().expect("non-empty") - *year.iter().min().expect("non-empty")) as f64
            + 1.0;
    let mmin = magnitude.iter().cloned().fold(f64::INFINITY, f64::min);
    let mmax = magnitude.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let lower = (10.0 * mmin).floor() / 10.0;
    let mut edges = vec![lower];
    let mut edge = lower;
    while edge <= mmax {
        edge += dmag;
        edges.push(edge);
    }
    let edges = Array1::from_vec(edges);
    let counts = binned_counts(magnitude, &edges);
    let nbins = counts.len();
    let magnitudes: Array1<f64> = (0..nbins).map(|i| edges[i] + dmag / 2.0).collect();
    let mut cum_counts = Array1::<f64>::zeros(nbins);
    let mut running = 0.0;
    for i in (0..nbins).rev() {
        running += counts[i];
        cum_counts[i] = running;
    }
    let rates = counts.mapv(|c| c / num_years);
    let cum_rates = cum_counts.mapv(|c| c / num_years);
    RecurrenceTable { magnitudes, counts, cum_counts, rates, cum_rates }
}

/// Per-bin observation spans under a completeness schedule.
///
/// Bins of width `dmag` run from the smallest usable completeness
/// threshold up to the observed maximum magnitude. Each bin's
/// completeness year is that of the highest threshold at or below the
/// bin's lower edge; its duration runs from that year to the catalogue
/// end (inclusive), and its count covers events inside the bin occurring
/// at or after the completeness year.
///
/// # Returns
/// `(central_magnitudes, durations_years, counts)`.
///
/// # Errors
/// - [`RecurrenceError::NoUsableCompleteness`] when every table row is
///   NaN.
/// - [`RecurrenceError::NoCompleteEvents`] when no event passes its
///   bin's completeness filter.
pub fn get_completeness_counts(
    catalogue: &Catalogue, completeness: &CompletenessTable, dmag: f64,
) -> RecurrenceResult<(Array1<f64>, Array1<f64>, Array1<f64>)> {
    let rows = completeness.valid_rows();
    if rows.is_empty() {
        return Err(RecurrenceError::NoUsableCompleteness);
    }
    let dtime = catalogue.decimal_time();
    let end_year = catalogue.end_year() as f64;
    let (_, mmax_obs) = catalogue.magnitude_range();

    let first_threshold = rows.iter().map(|&(_, m)| m).fold(f64::INFINITY, f64::min);
    let lower = (10.0 * first_threshold).round() / 10.0;
    let mut edges = vec![lower];
    let mut edge = lower;
    while edge <= mmax_obs {
        edge += dmag;
        edges.push(edge);
    }

    let nbins = edges.len() - 1;
    let mut cent_mag = Array1::<f64>::zeros(nbins);
    let mut t_per = Array1::<f64>::zeros(nbins);
    let mut n_obs = Array1::<f64>::zeros(nbins);
    for b in 0..nbins {
        let lo = edges[b];
        let hi = edges[b + 1];
        cent_mag[b] = lo + dmag / 2.0;
        // The threshold governing this bin: highest completeness
        // magnitude at or below the bin's lower edge (rows are in
        // ascending magnitude order, so the last match wins; the shared
        // offset lets a threshold equal to the edge match).
        let mut comp_year = f64::NAN;
        for &(year, threshold) in &rows {
            if lo >= threshold - BIN_OFFSET {
                comp_year = year;
            }
        }
        if comp_year.is_nan() {
            // Bin below every threshold: treated as complete only over
            // the most recent (largest) completeness year.
            comp_year = rows.iter().map(|&(y, _)| y).fold(f64::NEG_INFINITY, f64::max);
        }
        t_per[b] = end_year - comp_year + 1.0;
        n_obs[b] = (0..catalogue.len())
            .filter(|&i| {
                catalogue.magnitude[i] >= lo - BIN_OFFSET
                    && catalogue.magnitude[i] < hi - BIN_OFFSET
                    && dtime[i] >= comp_year
            })
            .count() as f64;
    }
    if n_obs.sum() == 0.0 {
        return Err(RecurrenceError::NoCompleteEvents);
    }
    Ok((cent_mag, t_per, n_obs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn flat_catalogue(years: Vec<i32>, mags: Vec<f64>) -> Catalogue {
        let n = years.len();
        Catalogue::new(
            Array1::from_vec(years),
            Array1::from_elem(n, 6),
            Array1::from_elem(n, 15),
            Array1::zeros(n),
            Array1::zeros(n),
            Array1::zeros(n),
            Array1::zeros(n),
            Array1::zeros(n),
            Array1::from_elem(n, 10.0),
            Array1::from_vec(mags),
        )
        .unwrap()
    }

    #[test]
    // Purpose
    // -------
    // The recurrence table bins on the 0.1 grid, counts edge-sitting
    // magnitudes in the upper bin, and accumulates counts from the top.
    fn recurrence_table_counts_and_cumulates() {
        let cat = flat_catalogue(
            vec![2000, 2001, 2002, 2003, 2004],
            vec![4.0, 4.0999999999, 4.1, 4.2, 4.5],
        );
        let table = recurrence_table(&cat.magnitude, 0.1, &cat.year);
        // Bin centred on 4.05 holds only the exact 4.0; the two
        // 4.1-representations share the 4.15 bin.
        assert_eq!(table.counts[0], 1.0);
        assert_eq!(table.counts[1], 2.0);
        assert_eq!(table.cum_counts[0], 5.0);
        assert!((table.magnitudes[0] - 4.05).abs() < 1e-9);
        // Five years of observation.
        assert!((table.rates[0] - 1.0 / 5.0).abs() < 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Completeness counts assign each bin the duration of its governing
    // threshold and only count events after the completeness year.
    //
    // Given
    // -----
    // - Completeness: magnitude 4.0 from 1990, magnitude 5.0 from 1950.
    // - Catalogue 1940-2009 with a 4.2 event in 1980 (incomplete era)
    //   and one in 1995, plus 5.5 events in 1960 and 1995.
    //
    // Expect
    // ------
    // - The 4.2 bin spans 2009 - 1990 + 1 = 20 years and counts one
    //   event; the 5.5 bin spans 60 years and counts two.
    fn completeness_counts_respect_thresholds() {
        let cat = flat_catalogue(
            vec![1940, 1980, 1995, 1960, 1995, 2009],
            vec![4.0, 4.2, 4.2, 5.5, 5.5, 4.05],
        );
        let table = CompletenessTable::new(array![1990.0, 1950.0], array![4.0, 5.0]).unwrap();
        let (cent, tper, nobs) = get_completeness_counts(&cat, &table, 0.1).unwrap();
        // Bin [4.2, 4.3).
        let b42 = (0..cent.len()).find(|&i| (cent[i] - 4.25).abs() < 1e-9).unwrap();
        assert!((tper[b42] - 20.0).abs() < 1e-9);
        assert_eq!(nobs[b42], 1.0);
        // Bin [5.5, 5.6).
        let b55 = (0..cent.len()).find(|&i| (cent[i] - 5.55).abs() < 1e-9).unwrap();
        assert!((tper[b55] - 60.0).abs() < 1e-9);
        assert_eq!(nobs[b55], 2.0);
    }

    #[test]
    // Purpose
    // -------
    // A table with only NaN rows is a contract violation, as is a
    // catalogue with no events after its completeness years.
    fn completeness_counts_error_paths() {
        let cat = flat_catalogue(vec![1980, 1985], vec![4.5, 4.6]);
        let nan_table =
            CompletenessTable::new(array![f64::NAN], array![4.0]).unwrap();
        assert!(matches!(
            get_completeness_counts(&cat, &nan_table, 0.1),
            Err(RecurrenceError::NoUsableCompleteness)
        ));
        let late_table = CompletenessTable::new(array![1990.0], array![4.0]).unwrap();
        assert!(matches!(
            get_completeness_counts(&cat, &late_table, 0.1),
            Err(RecurrenceError::NoCompleteEvents)
        ));
    }
}
