//! Stepp (1971) completeness analysis.
//!
//! Purpose
//! -------
//! Estimate, per magnitude bin, the duration over which the catalogue
//! behaves as a stationary Poisson process. For a complete record the
//! standard deviation of the annual rate decays as `T^-0.5` with window
//! length `T`; once a window reaches back into the incomplete era the
//! decay changes slope. The break point of a two-segment fit in log-log
//! space is the completeness duration.
//!
//! Key behaviors
//! -------------
//! - Builds magnitude bins spanning the observed (2-dp rounded) range and
//!   a set of receding time windows (from a step width, or an explicit
//!   newest-to-oldest list).
//! - For every (window, bin) cell computes `sigma = sqrt(n/T)/sqrt(T)`.
//! - Fits, per bin with at least 3 positive-sigma points, a piecewise
//!   linear model of `log10 sigma` against `log10 T` whose first slope is
//!   fixed at -0.5, minimizing squared residuals with the crate's L-BFGS
//!   layer; the crossover is kept inside the observed `log10 T` range by
//!   a bounded transform.
//! - Converts each fitted break duration into a completeness year
//!   (`floor(end_year - duration)`). Non-convergence and sparse bins
//!   yield NaN years, never errors.
//! - Optionally repairs monotonicity across bins (`increment_lock`).
//!
//! Conventions
//! -----------
//! - Diagnostic state (`sigma`, `magnitude_bins`, `time_values`,
//!   `model_fits`, `end_year`) is written once per `completeness` call
//!   and kept for inspection; it is never read by the algorithm itself.
use ndarray::{Array1, Array2};

use crate::catalogue::Catalogue;
use crate::completeness::{
    errors::{CompletenessError, CompletenessResult},
    CompletenessTable,
};
use crate::optimization::{
    errors::OptResult,
    least_squares::{minimize, Cost, FitOptions, LineSearcher, SumOfSquares, Theta, Tolerances},
    numerical_stability::{bounded_transform, bounded_transform_inv},
};
use crate::utils::BIN_OFFSET;

/// Time-window scheme for the Stepp analysis.
#[derive(Debug, Clone, PartialEq)]
pub enum TimeBin {
    /// Receding windows generated from the catalogue end at this step
    /// width (years).
    Step(f64),
    /// Explicit window start years, ordered newest to oldest.
    Windows(Vec<f64>),
}

/// Stepp analysis configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct SteppConfig {
    magnitude_bin: f64,
    time_bin: TimeBin,
    increment_lock: bool,
}

impl SteppConfig {
    /// Construct a validated configuration.
    ///
    /// # Errors
    /// - [`CompletenessError::InvalidMagnitudeBin`] for a non-positive
    ///   magnitude bin width.
    /// - [`CompletenessError::InvalidTimeBin`] for a non-positive step.
    /// - [`CompletenessError::EmptyTimeWindows`] for an empty window
    ///   list.
    /// - [`CompletenessError::UnorderedTimeWindows`] unless an explicit
    ///   list is strictly decreasing (newest to oldest).
    pub fn new(
        magnitude_bin: f64, time_bin: TimeBin, increment_lock: bool,
    ) -> CompletenessResult<Self> {
        if !magnitude_bin.is_finite() || magnitude_bin <= 0.0 {
            return Err(CompletenessError::InvalidMagnitudeBin { value: magnitude_bin });
        }
        match &time_bin {
            TimeBin::Step(step) => {
                if !step.is_finite() || *step <= 0.0 {
                    return Err(CompletenessError::InvalidTimeBin { value: *step });
                }
            }
            TimeBin::Windows(windows) => {
                if windows.is_empty() {
                    return Err(CompletenessError::EmptyTimeWindows);
                }
                if windows.windows(2).any(|w| w[1] >= w[0]) {
                    return Err(CompletenessError::UnorderedTimeWindows);
                }
            }
        }
        Ok(Self { magnitude_bin, time_bin, increment_lock })
    }
}

/// Fitted bilinear model for one magnitude bin.
///
/// `crossover` is the break point in `log10` duration space; `residual`
/// is the minimized sum of squared residuals.
#[derive(Debug, Clone, PartialEq)]
pub struct BilinearFit {
    pub second_slope: f64,
    pub crossover: f64,
    pub intercept: f64,
    pub residual: f64,
}

/// Stepp (1971) completeness engine with write-once diagnostics.
#[derive(Debug, Clone, Default)]
pub struct Stepp1971 {
    /// Magnitude bin edges from the last run.
    pub magnitude_bins: Option<Array1<f64>>,
    /// Rate standard deviations, one row per time window, one column per
    /// magnitude bin.
    pub sigma: Option<Array2<f64>>,
    /// Window durations (years) from the last run.
    pub time_values: Option<Array1<f64>>,
    /// Per-bin fit results; `None` marks a sparse or non-converged bin.
    pub model_fits: Option<Vec<Option<BilinearFit>>>,
    /// Catalogue end year from the last run.
    pub end_year: Option<f64>,
}

impl Stepp1971 {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the Stepp analysis.
    ///
    /// # Errors
    /// - [`CompletenessError::MagnitudeBinTooWide`] when the bin spacing
    ///   exceeds the observed magnitude range.
    /// - [`CompletenessError::TimeBinTooWide`] when the step exceeds the
    ///   catalogue duration.
    /// - Window-list validation errors from [`SteppConfig::new`] callers
    ///   that bypass it are surfaced identically here.
    ///
    /// Numerical non-convergence of a bin's fit is *not* an error: the
    /// bin's completeness year is NaN and processing continues.
    pub fn completeness(
        &mut self, catalogue: &Catalogue, config: &SteppConfig,
    ) -> CompletenessResult<CompletenessTable> {
        // Magnitudes rounded to 2 dp to stabilize bin membership.
        let mag = catalogue.magnitude.mapv(|m| (100.0 * m).round() / 100.0);
        let dyear = catalogue.decimal_time();
        let end_year = catalogue.end_year() as f64;
        let start_year = catalogue.start_year() as f64;

        let edges = magnitude_edges(&mag, config.magnitude_bin)?;
        let window_starts = time_window_starts(&config.time_bin, start_year, end_year)?;

        let n_windows = window_starts.len();
        let n_bins = edges.len() - 1;
        let mut sigma = Array2::<f64>::zeros((n_windows, n_bins));
        let mut durations = Array1::<f64>::zeros(n_windows);
        for (w, &t0) in window_starts.iter().enumerate() {
            let duration = end_year - t0 + 1.0;
            durations[w] = duration;
            for b in 0..n_bins {
                let lo = edges[b] - BIN_OFFSET;
                let hi = edges[b + 1] - BIN_OFFSET;
                let n_obs = (0..catalogue.len())
                    .filter(|&i| mag[i] >= lo && mag[i] < hi && dyear[i] >= t0)
                    .count() as f64;
                let rate = n_obs / duration;
                sigma[[w, b]] = rate.sqrt() / duration.sqrt();
            }
        }

        let mut years = Array1::<f64>::from_elem(n_bins, f64::NAN);
        let mut fits: Vec<Option<BilinearFit>> = vec![None; n_bins];
        for b in 0..n_bins {
            let mut xdata = Vec::new();
            let mut ydata = Vec::new();
            for w in 0..n_windows {
                if sigma[[w, b]] > 0.0 {
                    xdata.push(durations[w].log10());
                    ydata.push(sigma[[w, b]].log10());
                }
            }
            if xdata.len() < 3 {
                continue;
            }
            if let Some(fit) = fit_bilinear(&xdata, &ydata)? {
                let duration = 10.0_f64.powf(fit.crossover);
                years[b] = (end_year - duration).floor();
                fits[b] = Some(fit);
            }
        }

        self.magnitude_bins = Some(edges.clone());
        self.sigma = Some(sigma);
        self.time_values = Some(durations);
        self.model_fits = Some(fits);
        self.end_year = Some(end_year);

        let bin_magnitudes: Array1<f64> = edges.iter().take(n_bins).cloned().collect();
        let mut table = CompletenessTable::new(years, bin_magnitudes)?;
        if config.increment_lock {
            table.apply_increment_lock();
        }
        Ok(table)
    }
}

/// Magnitude bin edges covering the observed range at the given spacing.
fn magnitude_edges(mag: &Array1<f64>, delta_m: f64) -> CompletenessResult<Array1<f64>> {
    let mmin = mag.iter().cloned().fold(f64::INFINITY, f64::min);
    let mmax = mag.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    if (mmax - mmin) < delta_m {
        return Err(CompletenessError::MagnitudeBinTooWide);
    }
    let lower = (10.0 * mmin).floor() / 10.0;
    let mut edges = vec![lower];
    let mut edge = lower;
    while edge <= mmax {
        edge += delta_m;
        edges.push(edge);
    }
    Ok(Array1::from_vec(edges))
}

/// Window start years, newest to oldest.
fn time_window_starts(
    time_bin: &TimeBin, start_year: f64, end_year: f64,
) -> CompletenessResult<Vec<f64>> {
    match time_bin {
        TimeBin::Step(step) => {
            if (end_year - start_year) < *step {
                return Err(CompletenessError::TimeBinTooWide);
            }
            let mut starts = Vec::new();
            let mut t = end_year - step;
            while t >= start_year {
                starts.push(t);
                t -= step;
            }
            Ok(starts)
        }
        TimeBin::Windows(windows) => {
            if windows.is_empty() {
                return Err(CompletenessError::EmptyTimeWindows);
            }
            if windows.windows(2).any(|w| w[1] >= w[0]) {
                return Err(CompletenessError::UnorderedTimeWindows);
            }
            Ok(windows.clone())
        }
    }
}

/// Two-segment residual model with the first slope fixed at -0.5.
///
/// Parameters, in unconstrained optimizer space:
/// `[second_slope, crossover (bounded to the data range), intercept]`.
/// Continuity at the crossover determines the second segment's
/// intercept.
struct BilinearResiduals {
    crossover_bounds: (f64, f64),
}

struct BilinearData {
    x: Vec<f64>,
    y: Vec<f64>,
}

const FIRST_SLOPE: f64 = -0.5;

impl SumOfSquares for BilinearResiduals {
    type Data = BilinearData;

    fn value(&self, theta: &Theta, data: &Self::Data) -> OptResult<Cost> {
        let slope2 = theta[0];
        let (lo, hi) = self.crossover_bounds;
        let xc = bounded_transform(theta[1], lo, hi)?;
        let c0 = theta[2];
        let c1 = c0 + (FIRST_SLOPE - slope2) * xc;
        let mut total = 0.0;
        for (&x, &y) in data.x.iter().zip(data.y.iter()) {
            let model = if x <= xc { FIRST_SLOPE * x + c0 } else { slope2 * x + c1 };
            total += (y - model) * (y - model);
        }
        Ok(total)
    }

    fn check(&self, theta: &Theta, data: &Self::Data) -> OptResult<()> {
        debug_assert_eq!(theta.len(), 3);
        debug_assert!(data.x.len() == data.y.len() && data.x.len() >= 3);
        Ok(())
    }
}

/// Fit the bilinear model to one bin's `(log10 T, log10 sigma)` points.
///
/// Returns `Ok(None)` when the solver fails to converge within its
/// iteration budget; hard optimizer failures (bad configuration, adapter
/// errors) propagate as `Err`.
fn fit_bilinear(xdata: &[f64], ydata: &[f64]) -> CompletenessResult<Option<BilinearFit>> {
    let xmin = xdata.iter().cloned().fold(f64::INFINITY, f64::min);
    let xmax = xdata.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let bounds = (xmin, xmax);
    let model = BilinearResiduals { crossover_bounds: bounds };
    let data = BilinearData { x: xdata.to_vec(), y: ydata.to_vec() };

    // Steeper decay beyond the completeness duration is the usual
    // geometry, so the second slope starts below the fixed first slope;
    // the crossover starts mid-range.
    let xc0 = 0.5 * (xmin + xmax);
    let theta0 = ndarray::array![
        -1.0,
        bounded_transform_inv(xc0, bounds.0, bounds.1)?,
        ydata[0] - FIRST_SLOPE * xdata[0]
    ];
    // The gradient tolerance sits above the finite-difference noise
    // floor; the cost-change tolerance gives near-exact fits a second
    // convergence path when the residual bottoms out.
    let opts = FitOptions::new(
        Tolerances::new(Some(1e-7), Some(1e-12), Some(500))?,
        LineSearcher::MoreThuente,
        None,
    )?;
    let outcome = match minimize(&model, theta0, &data, &opts) {
        Ok(outcome) => outcome,
        // A line-search failure on a degenerate surface is treated like
        // non-convergence for this bin.
        Err(_) => return Ok(None),
    };
    if !outcome.converged {
        return Ok(None);
    }
    let crossover = bounded_transform(outcome.theta_hat[1], bounds.0, bounds.1)?;
    Ok(Some(BilinearFit {
        second_slope: outcome.theta_hat[0],
        crossover,
        intercept: outcome.theta_hat[2],
        residual: outcome.value,
    }))
}
