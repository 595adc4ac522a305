//! Kijko non-parametric Gaussian maximum-magnitude estimator.
//!
//! Purpose
//! -------
//! Estimate mmax without assuming a Gutenberg-Richter form: the
//! magnitude CDF is estimated by a Gaussian kernel density over the
//! largest events (Silverman's rule bandwidth), and the usual
//! fixed-point increment integral is evaluated by Simpson's rule over
//! exponentially spaced magnitude samples.
//!
//! Conventions
//! -----------
//! - The Gaussian CDF uses the Hastings rational-polynomial
//!   approximation with its published coefficients; its (poor) tail
//!   behaviour is part of the method and is preserved rather than
//!   replaced by an exact CDF.
//! - The sample grid is the natural log of linearly spaced `exp(m)`
//!   values, densifying samples toward the top of the range where the
//!   integrand varies fastest.
use ndarray::Array1;

use crate::catalogue::Catalogue;
use crate::max_magnitude::{
    base::{fixed_point_mmax, mmax_uncertainty, observed_mmax},
    errors::{MmaxError, MmaxResult},
    MmaxConfig, MmaxEstimate,
};
use crate::utils::simpson_nonuniform;

/// Kijko non-parametric Gaussian estimator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KijkoNonParametricGaussian;

impl KijkoNonParametricGaussian {
    /// Estimate `(mmax, sigma_mmax)` from the largest
    /// `number_earthquakes` events.
    ///
    /// # Errors
    /// - Configuration validation errors from [`MmaxConfig::validate`].
    /// - [`MmaxError::TooFewEvents`] when fewer than two events are
    ///   available.
    /// - Observed-mmax resolution errors.
    pub fn get_mmax(
        &self, catalogue: &Catalogue, config: &MmaxConfig,
    ) -> MmaxResult<MmaxEstimate> {
        config.validate()?;
        let (obsmax, obsmax_sigma) = observed_mmax(catalogue, config)?;

        // Largest events, descending.
        let mut mags: Vec<f64> = catalogue.magnitude.to_vec();
        mags.sort_by(|a, b| b.partial_cmp(a).expect("finite magnitudes"));
        let n_evts = config.number_earthquakes.min(mags.len());
        if n_evts < 2 {
            return Err(MmaxError::TooFewEvents { count: n_evts });
        }
        let mags = Array1::from_vec(mags[..n_evts].to_vec());
        let neq = n_evts as f64;
        let mmin = mags.iter().cloned().fold(f64::INFINITY, f64::min);
        let h_fact = h_smooth(&mags);

        let mmax = fixed_point_mmax(
            obsmax,
            config.tolerance,
            config.maximum_iterations,
            "Kijko non-parametric Gaussian estimator",
            |current| {
                let mvals = exponential_spaced_values(mmin, current, config.number_samples);
                Ok(npg_intfunc_simps(&mvals, &mags, current, h_fact, neq))
            },
        )?;
        Ok(MmaxEstimate { mmax, sigma_mmax: mmax_uncertainty(obsmax, obsmax_sigma, mmax) })
    }
}

/// Silverman's rule kernel bandwidth, rounded to 2 decimals.
///
/// `h = 0.9 min(std, IQR / 1.349) n^(-1/5)`; a single-event or
/// zero-spread sample yields 0.
pub fn h_smooth(mag: &Array1<f64>) -> f64 {
    let neq = mag.len() as f64;
    let mean = mag.sum() / neq;
    let std = (mag.iter().map(|&m| (m - mean) * (m - mean)).sum::<f64>() / neq).sqrt();
    let iqr = percentile(mag, 75.0) - percentile(mag, 25.0);
    let hfact = 0.9 * std.min(iqr / 1.349) * neq.powf(-0.2);
    (100.0 * hfact).round() / 100.0
}

/// Linear-interpolation percentile over a copy of the data.
fn percentile(values: &Array1<f64>, q: f64) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).expect("finite magnitudes"));
    let pos = q / 100.0 * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    if lower == upper {
        sorted[lower]
    } else {
        let frac = pos - lower as f64;
        sorted[lower] * (1.0 - frac) + sorted[upper] * frac
    }
}

/// Hastings rational-polynomial approximation of the standard normal
/// CDF, mirrored for negative arguments.
pub fn gauss_cdf_hastings(x: f64) -> f64 {
    const A_1: f64 = 0.196854;
    const A_2: f64 = -0.115194;
    const A_3: f64 = 0.000344;
    const A_4: f64 = 0.019527;
    let x_a = x.abs();
    let poly = 1.0 + A_1 * x_a + A_2 * x_a * x_a + A_3 * x_a.powi(3) + A_4 * x_a.powi(4);
    let yval = 1.0 - 0.5 * poly.powi(-4);
    if x < 0.0 {
        1.0 - yval
    } else {
        yval
    }
}

/// Exponentially spaced magnitude samples: the natural log of linearly
/// spaced `exp(m)` values, with the final sample pinned to `max_mag`.
pub fn exponential_spaced_values(min_mag: f64, max_mag: f64, count: usize) -> Array1<f64> {
    let lhs_min = min_mag.exp();
    let lhs_max = max_mag.exp();
    let step = (lhs_max - lhs_min) / (count - 1) as f64;
    let mut out = Array1::<f64>::zeros(count);
    for i in 0..count - 1 {
        out[i] = (lhs_min + step * i as f64).ln();
    }
    out[count - 1] = max_mag;
    out
}

/// Kernel-CDF integrand evaluated on the sample grid and integrated by
/// Simpson's rule.
pub fn npg_intfunc_simps(
    mvals: &Array1<f64>, mag: &Array1<f64>, mmax: f64, h_fact: f64, neq: f64,
) -> f64 {
    let mmin = mag.iter().cloned().fold(f64::INFINITY, f64::min);
    let p_min: Vec<f64> =
        mag.iter().map(|&m| gauss_cdf_hastings((mmin - m) / h_fact)).collect();
    let p_max: Vec<f64> =
        mag.iter().map(|&m| gauss_cdf_hastings((mmax - m) / h_fact)).collect();
    let denom: f64 = p_max.iter().zip(p_min.iter()).map(|(&hi, &lo)| hi - lo).sum();

    let mut cdf_func = Array1::<f64>::zeros(mvals.len());
    for (i, &mval) in mvals.iter().enumerate() {
        let numer: f64 = mag
            .iter()
            .zip(p_min.iter())
            .map(|(&m, &lo)| gauss_cdf_hastings((mval - m) / h_fact) - lo)
            .sum();
        cdf_func[i] = (numer / denom).powf(neq);
    }
    simpson_nonuniform(&cdf_func, mvals)
}
