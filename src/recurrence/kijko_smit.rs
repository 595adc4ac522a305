//! Kijko & Smit (2012) recurrence estimation.
//!
//! Purpose
//! -------
//! Combine per-completeness-interval Aki b-values into a joint estimate:
//! the catalogue is partitioned into sub-periods by the completeness
//! schedule, each sub-period contributes `beta_i = 1 / (mean(M_i) -
//! mmin_i)` over its own magnitude floor, and the joint beta is the
//! count-weighted *harmonic mean* `beta = N / sum(n_i / beta_i)`.
//!
//! This combination rule follows a different theoretical derivation from
//! the Weichert joint likelihood and the two are deliberately kept as
//! separate estimators.
//!
//! Key behaviors
//! -------------
//! - An empty completeness sub-period is a caller contract violation
//!   (the schedule claims data that is not there) and errors; it is not
//!   a NaN case.
//! - The annual rate above the reference magnitude uses the
//!   equivalent-duration sum `T_eff = sum(T_i 10^(-b (mc_i - m_ref)))`,
//!   the paper's effective-span correction.
use crate::catalogue::Catalogue;
use crate::completeness::CompletenessTable;
use crate::recurrence::{
    errors::{RecurrenceError, RecurrenceResult},
    RecurrenceConfig, RecurrenceEstimate,
};
use crate::utils::BIN_OFFSET;

/// Kijko & Smit (2012) estimator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KijkoSmit;

impl KijkoSmit {
    /// Estimate `(b, sigma_b, rate, sigma_rate)` under a completeness
    /// schedule.
    ///
    /// # Errors
    /// - [`RecurrenceError::NoUsableCompleteness`] for an all-NaN table.
    /// - [`RecurrenceError::EmptyCompletenessInterval`] when a
    ///   sub-period holds no qualifying events.
    pub fn calculate(
        &self, catalogue: &Catalogue, config: &RecurrenceConfig,
        completeness: &CompletenessTable,
    ) -> RecurrenceResult<RecurrenceEstimate> {
        let mut rows = completeness.valid_rows();
        if rows.is_empty() {
            return Err(RecurrenceError::NoUsableCompleteness);
        }
        // Sub-periods ordered most recent first; each spans from its
        // completeness year to the start of the next more recent period
        // (the first extends to the catalogue end).
        rows.sort_by(|a, b| b.0.partial_cmp(&a.0).expect("finite completeness years"));
        let dtime = catalogue.decimal_time();
        let end_year = catalogue.end_year() as f64;

        let ln10 = std::f64::consts::LN_10;
        let mut total_n = 0.0;
        let mut harmonic_sum = 0.0;
        let mut intervals: Vec<(f64, f64, f64)> = Vec::new(); // (n, duration, mc)
        for (idx, &(year, mc)) in rows.iter().enumerate() {
            let upper_time = if idx == 0 { f64::INFINITY } else { rows[idx - 1].0 };
            let duration =
                if idx == 0 { end_year - year + 1.0 } else { rows[idx - 1].0 - year };
            let mut count = 0.0;
            let mut mag_sum = 0.0;
            for i in 0..catalogue.len() {
                if dtime[i] >= year
                    && dtime[i] < upper_time
                    && catalogue.magnitude[i] >= mc - BIN_OFFSET
                {
                    count += 1.0;
                    mag_sum += catalogue.magnitude[i];
                }
            }
            if count == 0.0 {
                return Err(RecurrenceError::EmptyCompletenessInterval { index: idx });
            }
            let mean_mag = mag_sum / count;
            let beta_i = 1.0 / (mean_mag - mc);
            total_n += count;
            harmonic_sum += count / beta_i;
            intervals.push((count, duration, mc));
        }

        let beta = total_n / harmonic_sum;
        let sigma_beta = beta / total_n.sqrt();
        let b_value = beta / ln10;
        let sigma_b = sigma_beta / ln10;

        // Equivalent duration at the reference magnitude.
        let m_ref = config.reference_magnitude;
        let t_eff: f64 = intervals
            .iter()
            .map(|&(_, t, mc)| t * 10.0_f64.powf(-b_value * (mc - m_ref)))
            .sum();
        let rate = total_n / t_eff;
        let sigma_rate = rate / total_n.sqrt();
        Ok(RecurrenceEstimate { b_value, sigma_b, rate, sigma_rate })
    }
}
