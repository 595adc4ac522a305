//! Gardner-Knopoff Type 1 declustering.
//!
//! Events are visited in descending magnitude order. Each unclustered
//! event opens a combined space/time window around itself; every other
//! still-unclustered event inside both windows is pulled into a fresh
//! cluster. The backward (foreshock) half of the time window is scaled by
//! `fs_time_prop`, the forward half is used unscaled. Events are visited
//! once: anything already claimed by a larger-magnitude event is skipped
//! via a single `cluster_id == 0` guard, while a claimed event that has
//! not yet been visited never opens its own window.
use ndarray::Array1;

use crate::catalogue::Catalogue;
use crate::declustering::{
    errors::{DeclusterError, DeclusterResult},
    windows::{TimeDistanceWindow, DAYS_PER_YEAR},
    ClusterAssignment,
};
use crate::utils::haversine;

/// Gardner-Knopoff Type 1 declustering configuration.
///
/// Fields
/// ------
/// - `window`: distance-time window calibration.
/// - `fs_time_prop`: fraction of the time window applied backwards in
///   time to capture foreshocks, in `[0, 1]`.
/// - `time_cutoff`: optional ceiling (days) on the time window.
#[derive(Debug, Clone, PartialEq)]
pub struct GardnerKnopoffType1 {
    window: TimeDistanceWindow,
    fs_time_prop: f64,
    time_cutoff: Option<f64>,
}

impl GardnerKnopoffType1 {
    /// Construct a validated configuration.
    ///
    /// # Errors
    /// - [`DeclusterError::InvalidFsTimeProp`] when `fs_time_prop` is not
    ///   a finite value in `[0, 1]`.
    /// - [`DeclusterError::NonPositiveDuration`] when a supplied
    ///   `time_cutoff` is not positive and finite.
    pub fn new(
        window: TimeDistanceWindow, fs_time_prop: f64, time_cutoff: Option<f64>,
    ) -> DeclusterResult<Self> {
        if !fs_time_prop.is_finite() || !(0.0..=1.0).contains(&fs_time_prop) {
            return Err(DeclusterError::InvalidFsTimeProp { value: fs_time_prop });
        }
        if let Some(cutoff) = time_cutoff {
            if !cutoff.is_finite() || cutoff <= 0.0 {
                return Err(DeclusterError::NonPositiveDuration {
                    name: "time_cutoff",
                    value: cutoff,
                });
            }
        }
        Ok(Self { window, fs_time_prop, time_cutoff })
    }

    /// Partition the catalogue into clusters.
    ///
    /// Returns one cluster id and role flag per event, in the original
    /// catalogue order. Roles: 0 mainshock/independent, +1 events at or
    /// after the mainshock time, −1 events before it.
    pub fn decluster(&self, catalogue: &Catalogue) -> DeclusterResult<ClusterAssignment> {
        let neq = catalogue.len();
        let (sw_space, sw_time_days) =
            self.window.calc(&catalogue.magnitude, self.time_cutoff);
        let sw_time = sw_time_days.mapv(|d| d / DAYS_PER_YEAR);
        let year_dec = catalogue.decimal_time();

        // Descending magnitude order; ties keep catalogue order.
        let mut order: Vec<usize> = (0..neq).collect();
        order.sort_by(|&a, &b| {
            catalogue.magnitude[b].partial_cmp(&catalogue.magnitude[a]).expect("finite magnitudes")
        });

        let lon: Array1<f64> = order.iter().map(|&j| catalogue.longitude[j]).collect();
        let lat: Array1<f64> = order.iter().map(|&j| catalogue.latitude[j]).collect();
        let space: Vec<f64> = order.iter().map(|&j| sw_space[j]).collect();
        let time: Vec<f64> = order.iter().map(|&j| sw_time[j]).collect();
        let year: Vec<f64> = order.iter().map(|&j| year_dec[j]).collect();

        let mut vcl = vec![0u32; neq];
        let mut flag = vec![0i8; neq];
        let mut clust_index = 0u32;

        for i in 0..neq.saturating_sub(1) {
            if vcl[i] != 0 {
                continue;
            }
            // Time window test, asymmetric backwards.
            let mut candidates: Vec<usize> = Vec::new();
            for j in 0..neq {
                if vcl[j] != 0 {
                    continue;
                }
                let dt = year[j] - year[i];
                if dt >= -time[i] * self.fs_time_prop && dt <= time[i] {
                    candidates.push(j);
                }
            }
            // Space window test among the time-selected events.
            let cand_lon: Array1<f64> = candidates.iter().map(|&j| lon[j]).collect();
            let cand_lat: Array1<f64> = candidates.iter().map(|&j| lat[j]).collect();
            let dist = haversine(&cand_lon, &cand_lat, lon[i], lat[i]);
            let kept: Vec<usize> = candidates
                .iter()
                .zip(dist.iter())
                .filter(|&(_, &d)| d <= space[i])
                .map(|(&j, _)| j)
                .collect();

            if kept.iter().any(|&j| j != i) {
                clust_index += 1;
                for &j in &kept {
                    vcl[j] = clust_index;
                    flag[j] = if year[j] - year[i] < 0.0 { -1 } else { 1 };
                }
                flag[i] = 0;
            }
        }

        // Map back to the original catalogue order.
        let mut cluster_id = Array1::<u32>::zeros(neq);
        let mut event_role = Array1::<i8>::zeros(neq);
        for (pos, &orig) in order.iter().enumerate() {
            cluster_id[orig] = vcl[pos];
            event_role[orig] = flag[pos];
        }
        Ok(ClusterAssignment { cluster_id, event_role })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn three_event_catalogue() -> Catalogue {
        // Three events on consecutive days, metres apart, with the middle
        // event the largest: a textbook single cluster.
        Catalogue::new(
            array![1990, 1990, 1990],
            array![6, 6, 6],
            array![10, 11, 12],
            array![0, 0, 0],
            array![0, 0, 0],
            array![0.0, 0.0, 0.0],
            array![30.0, 30.001, 30.002],
            array![40.0, 40.001, 40.002],
            array![10.0, 10.0, 10.0],
            array![4.8, 6.0, 5.0],
        )
        .unwrap()
    }

    #[test]
    // Purpose
    // -------
    // Three nearby events within each other's Gardner-Knopoff windows
    // collapse to a single cluster with exactly one mainshock (the
    // largest magnitude) and position-dependent +/-1 flags.
    //
    // Given
    // -----
    // - The three-event catalogue above, fs_time_prop = 1.0.
    //
    // Expect
    // ------
    // - All cluster ids equal 1.
    // - Role vector: event 0 (before the mainshock) = -1, event 1
    //   (mainshock) = 0, event 2 (after) = +1.
    fn three_events_form_single_cluster() {
        let alg =
            GardnerKnopoffType1::new(TimeDistanceWindow::GardnerKnopoff, 1.0, None).unwrap();
        let out = alg.decluster(&three_event_catalogue()).unwrap();
        assert_eq!(out.cluster_id, array![1, 1, 1]);
        assert_eq!(out.event_role, array![-1, 0, 1]);
        assert_eq!(out.poisson_mask(), array![false, true, false]);
    }

    #[test]
    // Purpose
    // -------
    // With the backward window disabled (fs_time_prop = 0) the foreshock
    // is no longer reachable from the mainshock and stays independent.
    fn zero_fs_time_prop_excludes_foreshocks() {
        let alg =
            GardnerKnopoffType1::new(TimeDistanceWindow::GardnerKnopoff, 0.0, None).unwrap();
        let out = alg.decluster(&three_event_catalogue()).unwrap();
        assert_eq!(out.cluster_id[0], 0);
        assert_eq!(out.event_role[0], 0);
        assert_eq!(out.cluster_id[1], out.cluster_id[2]);
        assert!(out.cluster_id[1] > 0);
    }

    #[test]
    // Purpose
    // -------
    // Distant, well-separated events stay independent: ids all zero,
    // roles all zero.
    fn isolated_events_stay_independent() {
        let cat = Catalogue::new(
            array![1950, 1970, 1990],
            array![1, 1, 1],
            array![1, 1, 1],
            array![0, 0, 0],
            array![0, 0, 0],
            array![0.0, 0.0, 0.0],
            array![10.0, 60.0, 110.0],
            array![0.0, 30.0, -30.0],
            array![10.0, 10.0, 10.0],
            array![5.0, 5.5, 6.0],
        )
        .unwrap();
        let alg =
            GardnerKnopoffType1::new(TimeDistanceWindow::GardnerKnopoff, 1.0, None).unwrap();
        let out = alg.decluster(&cat).unwrap();
        assert_eq!(out.cluster_id, array![0, 0, 0]);
        assert_eq!(out.event_role, array![0, 0, 0]);
    }

    #[test]
    // Purpose
    // -------
    // Conservation: every event is exactly one of independent, mainshock,
    // foreshock, or aftershock, and cluster_id == 0 iff the event is
    // independent.
    fn role_partition_is_conserved() {
        let cat = three_event_catalogue();
        let alg =
            GardnerKnopoffType1::new(TimeDistanceWindow::GardnerKnopoff, 0.5, None).unwrap();
        let out = alg.decluster(&cat).unwrap();
        for i in 0..out.len() {
            let role = out.event_role[i];
            assert!((-1..=1).contains(&role));
            if out.cluster_id[i] == 0 {
                assert_eq!(role, 0, "independent events carry role 0");
            }
        }
        // Exactly one role-0 member per non-zero cluster.
        let ids: Vec<u32> =
            out.cluster_id.iter().cloned().filter(|&c| c > 0).collect::<std::collections::BTreeSet<_>>().into_iter().collect();
        for id in ids {
            let mains = (0..out.len())
                .filter(|&i| out.cluster_id[i] == id && out.event_role[i] == 0)
                .count();
            assert_eq!(mains, 1);
        }
    }

    #[test]
    // Purpose
    // -------
    // Config validation rejects out-of-range fs_time_prop and
    // non-positive cutoffs before any computation.
    fn config_validation() {
        assert!(matches!(
            GardnerKnopoffType1::new(TimeDistanceWindow::GardnerKnopoff, 1.5, None),
            Err(DeclusterError::InvalidFsTimeProp { .. })
        ));
        assert!(matches!(
            GardnerKnopoffType1::new(TimeDistanceWindow::GardnerKnopoff, 0.5, Some(0.0)),
            Err(DeclusterError::NonPositiveDuration { .. })
        ));
    }
}
