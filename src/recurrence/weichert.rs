//! Weichert (1980) maximum-likelihood recurrence estimation.
//!
//! Purpose
//! -------
//! Fit the Gutenberg-Richter beta by maximum likelihood over magnitude
//! bins with *unequal observation periods*: each bin is observed only
//! from its completeness year onward, and the joint likelihood weights
//! every bin by its own duration. The solve is Newton-Raphson on beta;
//! standard errors come from the observed Fisher information (second
//! derivative of the log-likelihood).
//!
//! Key behaviors
//! -------------
//! - Non-convergence (iteration budget exhausted, or a non-finite
//!   intermediate from an extreme beta excursion) prints a diagnostic
//!   and returns the NaN estimate; callers looping over many branches
//!   continue past it.
//! - At convergence the annual rate of events at or above the reference
//!   magnitude is reported with its Poisson-scaled standard error.
use crate::catalogue::Catalogue;
use crate::completeness::CompletenessTable;
use crate::recurrence::{
    errors::RecurrenceResult,
    utils::get_completeness_counts,
    RecurrenceConfig, RecurrenceEstimate,
};

/// Weichert (1980) estimator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Weichert;

impl Weichert {
    /// Estimate `(b, sigma_b, rate, sigma_rate)` under a completeness
    /// schedule.
    ///
    /// # Errors
    /// Propagates the completeness-count contract violations
    /// ([`crate::recurrence::RecurrenceError::NoUsableCompleteness`],
    /// [`crate::recurrence::RecurrenceError::NoCompleteEvents`]).
    /// Numerical non-convergence is reported through the NaN estimate
    /// instead.
    pub fn calculate(
        &self, catalogue: &Catalogue, config: &RecurrenceConfig,
        completeness: &CompletenessTable,
    ) -> RecurrenceResult<RecurrenceEstimate> {
        let (cent_mag, t_per, n_obs) =
            get_completeness_counts(catalogue, completeness, config.magnitude_interval)?;
        Ok(weichert_algorithm(
            &t_per.to_vec(),
            &cent_mag.to_vec(),
            &n_obs.to_vec(),
            config.magnitude_interval,
            config.reference_magnitude,
            config.b_value_initial,
            config.tolerance,
            config.max_iterations,
        ))
    }
}

/// Newton-Raphson solve for beta over duration-weighted magnitude bins.
///
/// # Arguments
/// - `tper`: observation period per bin, years.
/// - `fmag`: central magnitude per bin.
/// - `nobs`: event count per bin (fractional counts are accepted, which
///   the round-trip tests exploit).
/// - `dmag`: bin width.
/// - `mrate`: reference magnitude for the reported rate.
/// - `bval`: starting b-value for the iteration.
/// - `itstab`: convergence threshold on `|delta beta|`.
/// - `maxiter`: iteration ceiling.
#[allow(clippy::too_many_arguments)]
pub fn weichert_algorithm(
    tper: &[f64], fmag: &[f64], nobs: &[f64], dmag: f64, mrate: f64, bval: f64, itstab: f64,
    maxiter: usize,
) -> RecurrenceEstimate {
    let ln10 = std::f64::consts::LN_10;
    let mut beta = bval * ln10;
    let snm: f64 = nobs.iter().zip(fmag.iter()).map(|(&n, &m)| n * m).sum();
    let nkount: f64 = nobs.iter().sum();
    let mut iteration = 0usize;
    loop {
        let beta_exp: Vec<f64> = fmag.iter().map(|&m| (-beta * m).exp()).collect();
        let tjexp: Vec<f64> =
            tper.iter().zip(beta_exp.iter()).map(|(&t, &e)| t * e).collect();
        let tmexp: Vec<f64> = tjexp.iter().zip(fmag.iter()).map(|(&te, &m)| te * m).collect();
        let sumexp: f64 = beta_exp.iter().sum();
        let stmex: f64 = tmexp.iter().sum();
        let sumtex: f64 = tjexp.iter().sum();
        let stm2x: f64 = fmag.iter().zip(tmexp.iter()).map(|(&m, &tm)| m * tm).sum();
        if !stmex.is_finite() || !stm2x.is_finite() || sumtex == 0.0 {
            eprintln!("Weichert iteration produced a non-finite likelihood term; no estimate");
            return RecurrenceEstimate::nan();
        }
        let dldb_mean = stmex / sumtex;
        let d2ldb2 = nkount * (dldb_mean * dldb_mean - stm2x / sumtex);
        let dldb = dldb_mean * nkount - snm;
        let betl = beta;
        beta -= dldb / d2ldb2;
        let sigbeta = (-1.0 / d2ldb2).sqrt();
        if (beta - betl).abs() <= itstab {
            // Converged: recover the annual rates from the stationary
            // likelihood terms.
            let fngtm0 = nkount * (sumexp / sumtex);
            let rate = fngtm0 * (-beta * (mrate - (fmag[0] - dmag / 2.0))).exp();
            let sigma_rate = rate / nkount.sqrt();
            return RecurrenceEstimate {
                b_value: beta / ln10,
                sigma_b: sigbeta / ln10,
                rate,
                sigma_rate,
            };
        }
        iteration += 1;
        if iteration > maxiter {
            eprintln!("Weichert estimator reached maximum number of iterations; no estimate");
            return RecurrenceEstimate::nan();
        }
    }
}
