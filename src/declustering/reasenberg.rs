//! Reasenberg (1985) declustering.
//!
//! Purpose
//! -------
//! Implement the Reasenberg second-order-moment declustering algorithm:
//! clusters grow through an interaction zone whose radius and look-ahead
//! time both adapt over the life of a cluster, and two clusters merge
//! when a new event links them.
//!
//! Key behaviors
//! -------------
//! - The look-ahead time is `taumin` for unclustered events and for a
//!   cluster's (equal-)largest member, and otherwise grows with the time
//!   since the cluster's largest event, clipped to `[taumin, taumax]`.
//! - The spatial test uses a tight radius (`zone_noclust`) around
//!   isolated events and a widened radius (`rfact` times larger,
//!   `zone_clust`) once events are cluster members, plus a test against
//!   the cluster's largest event.
//! - Cluster identity is dynamic: when a scan's candidates tie into other
//!   clusters, every event of every involved cluster is relabelled to
//!   the lowest participating id, and the merged cluster's largest-event
//!   bookkeeping (`cluster_max_magnitude`, `cluster_biggest_event`) is
//!   recomputed over the union.
//! - Final cluster ids are renumbered contiguously from 1 in order of
//!   first appearance; the role vector marks one mainshock per cluster
//!   (largest magnitude, last occurrence on ties).
//!
//! Invariants & assumptions
//! ------------------------
//! - Input events must be in ascending time order; violating the
//!   precondition is an error, never silently repaired.
//! - Hypocentral separations are reduced additively by the horizontal
//!   and depth location errors of both events (config overrides take
//!   precedence over catalogue columns) and floored at zero.
use std::collections::BTreeSet;
use std::str::FromStr;

use ndarray::Array1;

use crate::catalogue::Catalogue;
use crate::declustering::{
    errors::{DeclusterError, DeclusterResult},
    ClusterAssignment,
};
use crate::utils::haversine;

/// Interaction-radius formula for the tight (unclustered) zone.
///
/// - `Reasenberg1985`: `0.011 * 10^(0.4 M)` km.
/// - `WellsCoppersmith1994`: `0.01 * 10^(0.5 M)` km.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionFormula {
    Reasenberg1985,
    WellsCoppersmith1994,
}

impl InteractionFormula {
    /// Interaction radius in km for a magnitude.
    pub fn radius_km(&self, magnitude: f64) -> f64 {
        match self {
            InteractionFormula::Reasenberg1985 => 0.011 * 10.0_f64.powf(0.4 * magnitude),
            InteractionFormula::WellsCoppersmith1994 => 0.01 * 10.0_f64.powf(0.5 * magnitude),
        }
    }
}

impl FromStr for InteractionFormula {
    type Err = DeclusterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "reasenberg1985" => Ok(InteractionFormula::Reasenberg1985),
            "wellscoppersmith1994" => Ok(InteractionFormula::WellsCoppersmith1994),
            _ => Err(DeclusterError::UnknownName {
                kind: "interaction formula",
                name: s.to_string(),
            }),
        }
    }
}

/// Reasenberg declustering configuration.
///
/// Fields
/// ------
/// - `taumin`: look-ahead time for unclustered events, days.
/// - `taumax`: maximum look-ahead time for clustered events, days.
/// - `p`: confidence that the next event in a sequence is observed
///   within the look-ahead time.
/// - `xk`: factor applied with `xmeff` to raise the effective magnitude
///   cutoff during clusters.
/// - `xmeff`: effective magnitude cutoff of the catalogue.
/// - `rfact`: scale factor between the unclustered and in-cluster
///   interaction radii.
/// - `horiz_error`, `depth_error`: epicentre/depth error overrides, km.
///   `None` pulls per-event values from the catalogue columns (zero when
///   the catalogue carries none).
/// - `interaction_formula`: tight-zone radius formula.
/// - `max_interaction_dist`: ceiling on both radii, km (some studies
///   limit it to a crustal thickness).
#[derive(Debug, Clone, PartialEq)]
pub struct Reasenberg {
    taumin: f64,
    taumax: f64,
    p: f64,
    xk: f64,
    xmeff: f64,
    rfact: f64,
    horiz_error: Option<f64>,
    depth_error: Option<f64>,
    interaction_formula: InteractionFormula,
    max_interaction_dist: f64,
}

impl Default for Reasenberg {
    fn default() -> Self {
        Self {
            taumin: 1.0,
            taumax: 10.0,
            p: 0.95,
            xk: 0.5,
            xmeff: 1.5,
            rfact: 10.0,
            horiz_error: Some(1.5),
            depth_error: Some(2.0),
            interaction_formula: InteractionFormula::Reasenberg1985,
            max_interaction_dist: f64::INFINITY,
        }
    }
}

impl Reasenberg {
    /// Construct a validated configuration.
    ///
    /// # Errors
    /// - [`DeclusterError::InvalidLookAheadRange`] unless
    ///   `0 < taumin <= taumax`.
    /// - [`DeclusterError::InvalidProbability`] unless `p` lies strictly
    ///   inside `(0, 1)`.
    /// - [`DeclusterError::NonPositiveFactor`] for a non-positive `rfact`
    ///   or `max_interaction_dist`.
    /// - [`DeclusterError::InvalidLocationError`] for negative error
    ///   overrides.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        taumin: f64, taumax: f64, p: f64, xk: f64, xmeff: f64, rfact: f64,
        horiz_error: Option<f64>, depth_error: Option<f64>,
        interaction_formula: InteractionFormula, max_interaction_dist: f64,
    ) -> DeclusterResult<Self> {
        if !taumin.is_finite() || !taumax.is_finite() || taumin <= 0.0 || taumax < taumin {
            return Err(DeclusterError::InvalidLookAheadRange { taumin, taumax });
        }
        if !p.is_finite() || p <= 0.0 || p >= 1.0 {
            return Err(DeclusterError::InvalidProbability { value: p });
        }
        if !rfact.is_finite() || rfact <= 0.0 {
            return Err(DeclusterError::NonPositiveFactor { name: "rfact", value: rfact });
        }
        if max_interaction_dist <= 0.0 || max_interaction_dist.is_nan() {
            return Err(DeclusterError::NonPositiveFactor {
                name: "max_interaction_dist",
                value: max_interaction_dist,
            });
        }
        for (name, err) in [("horiz_error", horiz_error), ("depth_error", depth_error)] {
            if let Some(value) = err {
                if !value.is_finite() || value < 0.0 {
                    return Err(DeclusterError::InvalidLocationError { name, value });
                }
            }
        }
        Ok(Self {
            taumin,
            taumax,
            p,
            xk,
            xmeff,
            rfact,
            horiz_error,
            depth_error,
            interaction_formula,
            max_interaction_dist,
        })
    }

    /// Look-ahead time (days) for events already tied to a cluster.
    ///
    /// # Arguments
    /// - `mag_big`: largest magnitude in the cluster.
    /// - `dt_big`: days between the cluster's largest event and the
    ///   current event.
    ///
    /// # Returns
    /// Unclipped look-ahead time; the caller clamps to
    /// `[taumin, taumax]`.
    pub fn clust_look_ahead_time(&self, mag_big: f64, dt_big: f64) -> f64 {
        let mut deltam = (1.0 - self.xk) * mag_big - self.xmeff;
        if deltam < 0.0 {
            deltam = 0.0;
        }
        // Expected aftershock rate at the effective cutoff.
        let denom = 10.0_f64.powf((deltam - 1.0) * 2.0 / 3.0);
        let top = -(1.0 - self.p).ln() * dt_big;
        top / denom
    }

    fn zone_noclust(&self, magnitude: f64) -> f64 {
        self.interaction_formula.radius_km(magnitude).min(self.max_interaction_dist)
    }

    fn zone_clust(&self, magnitude: f64) -> f64 {
        (self.rfact * self.interaction_formula.radius_km(magnitude))
            .min(self.max_interaction_dist)
    }

    /// Partition the catalogue into clusters.
    ///
    /// # Errors
    /// [`DeclusterError::UnorderedCatalogue`] when the events are not in
    /// ascending time order.
    pub fn decluster(&self, catalogue: &Catalogue) -> DeclusterResult<ClusterAssignment> {
        let neq = catalogue.len();
        let elapsed = catalogue.elapsed_days();
        if elapsed.windows(2).into_iter().any(|w| w[1] < w[0]) {
            return Err(DeclusterError::UnorderedCatalogue);
        }
        let elapsed = elapsed.to_vec();
        let mags = &catalogue.magnitude;

        // Config overrides win; otherwise catalogue columns; otherwise zero.
        let horiz_err = per_event_errors(self.horiz_error, catalogue.horiz_error.as_ref(), neq);
        let depth_err = per_event_errors(self.depth_error, catalogue.depth_error.as_ref(), neq);

        let mut vcl = vec![0u32; neq];
        let mut k = 0u32;
        // Arena bookkeeping indexed by cluster id: the magnitude of the
        // largest member seen so far and that event's index.
        let mut clusmaxmag = vec![f64::NEG_INFINITY; neq + 1];
        let mut clus_biggest_idx = vec![0usize; neq + 1];

        for i in 0..neq.saturating_sub(1) {
            let my_mag = mags[i];
            let mut my_cluster = vcl[i] as usize;
            let not_classified = my_cluster == 0;

            let look_ahead_days = if not_classified {
                self.taumin
            } else if my_mag >= clusmaxmag[my_cluster] {
                // Now the biggest of its cluster; the cluster range
                // collapses into this event's radius.
                clusmaxmag[my_cluster] = my_mag;
                clus_biggest_idx[my_cluster] = i;
                self.taumin
            } else {
                let idx_biggest = clus_biggest_idx[my_cluster];
                let days_since_biggest = elapsed[i] - elapsed[idx_biggest];
                self.clust_look_ahead_time(clusmaxmag[my_cluster], days_since_biggest)
                    .clamp(self.taumin, self.taumax)
            };

            // Events inside the interaction time window, strictly after i.
            let max_elapsed = elapsed[i] + look_ahead_days;
            let next_event = i + 1;
            let last_event =
                next_event + elapsed[next_event..].partition_point(|&e| e < max_elapsed);
            let mut temporal: Vec<usize> = (next_event..last_event).collect();
            if my_cluster != 0 {
                temporal.retain(|&j| vcl[j] as usize != my_cluster);
            }
            if temporal.is_empty() {
                continue;
            }

            // Compare in space to (a) the most recent event and (b) the
            // largest event in the cluster.
            let bg_ev = if not_classified { i } else { clus_biggest_idx[my_cluster] };
            let dist_recent =
                self.event_distances(catalogue, i, &temporal, &horiz_err, &depth_err);
            let dist_biggest =
                self.event_distances(catalogue, bg_ev, &temporal, &horiz_err, &depth_err);

            let candidates: Vec<usize> = if look_ahead_days == self.taumin {
                temporal
                    .iter()
                    .zip(dist_recent.iter())
                    .filter(|&(_, &d)| d <= self.zone_noclust(my_mag))
                    .map(|(&j, _)| j)
                    .collect()
            } else {
                let zone_big = self.zone_noclust(clusmaxmag[my_cluster]);
                let zone_recent = self.zone_clust(my_mag);
                temporal
                    .iter()
                    .enumerate()
                    .filter(|&(t, _)| {
                        dist_biggest[t] <= zone_big || dist_recent[t] <= zone_recent
                    })
                    .map(|(_, &j)| j)
                    .collect()
            };
            if candidates.is_empty() {
                continue;
            }

            let in_any_cluster: Vec<usize> =
                candidates.iter().cloned().filter(|&j| vcl[j] != 0).collect();
            let in_no_cluster: Vec<usize> =
                candidates.iter().cloned().filter(|&j| vcl[j] == 0).collect();

            if !in_any_cluster.is_empty() {
                // Merge every related cluster into the lowest id and
                // recompute the biggest-event bookkeeping over the union.
                let mut related: BTreeSet<u32> =
                    in_any_cluster.iter().map(|&j| vcl[j]).collect();
                if !not_classified {
                    related.insert(my_cluster as u32);
                }
                let lowest = *related.iter().next().expect("non-empty merge set");
                my_cluster = lowest as usize;
                vcl[i] = lowest;
                for &j in &candidates {
                    vcl[j] = lowest;
                }
                for &clustnum in &related {
                    for entry in vcl.iter_mut() {
                        if *entry == clustnum {
                            *entry = lowest;
                        }
                    }
                }
                let mut biggest_mag = f64::NEG_INFINITY;
                let mut biggest_idx = 0usize;
                for j in 0..neq {
                    if vcl[j] == lowest && mags[j] >= biggest_mag {
                        biggest_mag = mags[j];
                        biggest_idx = j;
                    }
                }
                for &clustnum in &related {
                    clusmaxmag[clustnum as usize] = f64::NEG_INFINITY;
                    clus_biggest_idx[clustnum as usize] = 0;
                }
                clusmaxmag[my_cluster] = biggest_mag;
                clus_biggest_idx[my_cluster] = biggest_idx;
            } else if my_cluster == 0 {
                k += 1;
                my_cluster = k as usize;
                vcl[i] = k;
                clusmaxmag[my_cluster] = my_mag;
                clus_biggest_idx[my_cluster] = i;
            }
            // Attach candidates not yet related to any cluster.
            for &j in &in_no_cluster {
                vcl[j] = my_cluster as u32;
            }
        }

        Ok(finalize_assignment(&vcl, mags))
    }

    /// Error-adjusted hypocentral distances from a source event to a set
    /// of target events.
    fn event_distances(
        &self, catalogue: &Catalogue, src: usize, targets: &[usize], horiz_err: &Array1<f64>,
        depth_err: &Array1<f64>,
    ) -> Vec<f64> {
        let lon: Array1<f64> = targets.iter().map(|&j| catalogue.longitude[j]).collect();
        let lat: Array1<f64> = targets.iter().map(|&j| catalogue.latitude[j]).collect();
        let epi = haversine(&lon, &lat, catalogue.longitude[src], catalogue.latitude[src]);
        targets
            .iter()
            .enumerate()
            .map(|(t, &j)| {
                let h = (epi[t] - (horiz_err[src] + horiz_err[j])).max(0.0);
                let dz = ((catalogue.depth[src] - catalogue.depth[j]).abs()
                    - (depth_err[src] + depth_err[j]))
                    .max(0.0);
                (h * h + dz * dz).sqrt()
            })
            .collect()
    }
}

fn per_event_errors(
    override_value: Option<f64>, column: Option<&Array1<f64>>, neq: usize,
) -> Array1<f64> {
    match override_value {
        Some(v) => Array1::from_elem(neq, v),
        None => column.cloned().unwrap_or_else(|| Array1::zeros(neq)),
    }
}

/// Renumber cluster ids contiguously from 1 (in order of first
/// appearance) and assign roles: one mainshock per cluster (largest
/// magnitude, last occurrence on ties), dependents split into foreshocks
/// and aftershocks by position relative to the mainshock. Unclustered
/// events keep id 0 and role 0, each counting as its own mainshock.
fn finalize_assignment(vcl: &[u32], mags: &Array1<f64>) -> ClusterAssignment {
    let neq = vcl.len();
    let mut remap: Vec<u32> = Vec::new();
    let mut cluster_id = Array1::<u32>::zeros(neq);
    for i in 0..neq {
        if vcl[i] == 0 {
            continue;
        }
        let new_id = match remap.iter().position(|&old| old == vcl[i]) {
            Some(pos) => pos as u32 + 1,
            None => {
                remap.push(vcl[i]);
                remap.len() as u32
            }
        };
        cluster_id[i] = new_id;
    }

    let mut event_role = Array1::<i8>::zeros(neq);
    for id in 1..=remap.len() as u32 {
        let mut biggest_mag = f64::NEG_INFINITY;
        let mut biggest_idx = 0usize;
        for i in 0..neq {
            if cluster_id[i] == id && mags[i] >= biggest_mag {
                biggest_mag = mags[i];
                biggest_idx = i;
            }
        }
        for i in 0..neq {
            if cluster_id[i] == id && i != biggest_idx {
                event_role[i] = if i < biggest_idx { -1 } else { 1 };
            }
        }
    }
    ClusterAssignment { cluster_id, event_role }
}
