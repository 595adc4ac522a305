//! Afteran declustering.
//!
//! Like Gardner-Knopoff, events are visited in descending magnitude
//! order and dependents are searched inside the magnitude-dependent
//! space radius. The time test differs: the window *rolls*. Walking
//! forward through candidate aftershocks in time order, each accepted
//! event must lie within `time_window` of the **previously accepted**
//! event, not of the mainshock; the chain terminates at the first gap
//! exceeding the window. Foreshocks are collected symmetrically walking
//! backwards. A cluster is created only when at least one dependent
//! event was found.
use ndarray::Array1;

use crate::catalogue::Catalogue;
use crate::declustering::{
    errors::{DeclusterError, DeclusterResult},
    windows::{TimeDistanceWindow, DAYS_PER_YEAR},
    ClusterAssignment,
};
use crate::utils::haversine;

/// Afteran declustering configuration.
///
/// Fields
/// ------
/// - `window`: distance-time window calibration; only its spatial radii
///   are consumed, the temporal behaviour being governed by
///   `time_window_days`.
/// - `time_window_days`: rolling time window, days.
#[derive(Debug, Clone, PartialEq)]
pub struct Afteran {
    window: TimeDistanceWindow,
    time_window_days: f64,
}

impl Afteran {
    /// Construct a validated configuration.
    ///
    /// # Errors
    /// [`DeclusterError::NonPositiveDuration`] when `time_window_days` is
    /// not positive and finite.
    pub fn new(window: TimeDistanceWindow, time_window_days: f64) -> DeclusterResult<Self> {
        if !time_window_days.is_finite() || time_window_days <= 0.0 {
            return Err(DeclusterError::NonPositiveDuration {
                name: "time_window",
                value: time_window_days,
            });
        }
        Ok(Self { window, time_window_days })
    }

    /// Partition the catalogue into clusters.
    pub fn decluster(&self, catalogue: &Catalogue) -> DeclusterResult<ClusterAssignment> {
        let neq = catalogue.len();
        let (sw_space, _) = self.window.calc(&catalogue.magnitude, None);
        let time_window = self.time_window_days / DAYS_PER_YEAR;
        let year_dec = catalogue.decimal_time();

        let mut order: Vec<usize> = (0..neq).collect();
        order.sort_by(|&a, &b| {
            catalogue.magnitude[b].partial_cmp(&catalogue.magnitude[a]).expect("finite magnitudes")
        });

        let lon: Array1<f64> = order.iter().map(|&j| catalogue.longitude[j]).collect();
        let lat: Array1<f64> = order.iter().map(|&j| catalogue.latitude[j]).collect();
        let space: Vec<f64> = order.iter().map(|&j| sw_space[j]).collect();
        let year: Vec<f64> = order.iter().map(|&j| year_dec[j]).collect();

        let mut vcl = vec![0u32; neq];
        let mut flag = vec![0i8; neq];
        let mut clust_index = 0u32;

        for i in 0..neq.saturating_sub(1) {
            if vcl[i] != 0 {
                continue;
            }
            let dist = haversine(&lon, &lat, lon[i], lat[i]);

            let mut after: Vec<usize> = (0..neq)
                .filter(|&j| vcl[j] == 0 && dist[j] <= space[i] && year[j] > year[i])
                .collect();
            after.sort_by(|&a, &b| year[a].partial_cmp(&year[b]).expect("finite times"));
            let aftershocks = walk_chain(&after, year[i], &year, time_window, true);

            let mut before: Vec<usize> = (0..neq)
                .filter(|&j| vcl[j] == 0 && dist[j] <= space[i] && year[j] < year[i])
                .collect();
            before.sort_by(|&a, &b| year[b].partial_cmp(&year[a]).expect("finite times"));
            let foreshocks = walk_chain(&before, year[i], &year, time_window, false);

            if !aftershocks.is_empty() || !foreshocks.is_empty() {
                clust_index += 1;
                vcl[i] = clust_index;
                flag[i] = 0;
                for j in aftershocks {
                    vcl[j] = clust_index;
                    flag[j] = 1;
                }
                for j in foreshocks {
                    vcl[j] = clust_index;
                    flag[j] = -1;
                }
            }
        }

        let mut cluster_id = Array1::<u32>::zeros(neq);
        let mut event_role = Array1::<i8>::zeros(neq);
        for (pos, &orig) in order.iter().enumerate() {
            cluster_id[orig] = vcl[pos];
            event_role[orig] = flag[pos];
        }
        Ok(ClusterAssignment { cluster_id, event_role })
    }
}

/// Walk time-sorted candidates with a rolling window.
///
/// `candidates` must be sorted by increasing time distance from the
/// mainshock (ascending time for aftershocks, descending for
/// foreshocks). Each candidate is accepted while its separation from the
/// previously accepted event stays within `time_window`; the first
/// larger gap ends the chain.
fn walk_chain(
    candidates: &[usize], t0: f64, year: &[f64], time_window: f64, forward: bool,
) -> Vec<usize> {
    let mut accepted = Vec::new();
    let mut reference = t0;
    for &j in candidates {
        let gap = if forward { year[j] - reference } else { reference - year[j] };
        if gap <= time_window {
            accepted.push(j);
            reference = year[j];
        } else {
            break;
        }
    }
    accepted
}
