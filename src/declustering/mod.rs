//! Catalogue declustering engine.
//!
//! Purpose
//! -------
//! Partition a catalogue into mainshock/aftershock clusters with one of
//! three interchangeable algorithms: Gardner-Knopoff Type 1, Afteran, and
//! Reasenberg. Each consumes a catalogue plus a validated configuration
//! and produces a [`ClusterAssignment`]: a cluster-id vector and an
//! event-role vector.
//!
//! Key behaviors
//! -------------
//! - Every algorithm validates its configuration at construction time;
//!   `decluster` never returns partial results.
//! - Gardner-Knopoff and Afteran sort internally by descending magnitude
//!   and accept catalogues in any order; Reasenberg requires ascending
//!   time order and errors otherwise.
//! - Role encoding is shared across algorithms: 0 marks a mainshock (or
//!   an independent event, when `cluster_id == 0`), +1 an aftershock,
//!   −1 a foreshock.
//!
//! Downstream usage
//! ----------------
//! - Completeness and recurrence analyses typically thin a catalogue to
//!   events where [`ClusterAssignment::poisson_mask`] is `true` before
//!   fitting, approximating an independent-event process.
use ndarray::Array1;

use crate::catalogue::Catalogue;

pub mod afteran;
pub mod errors;
pub mod gardner_knopoff;
pub mod reasenberg;
pub mod windows;

pub use afteran::Afteran;
pub use errors::{DeclusterError, DeclusterResult};
pub use gardner_knopoff::GardnerKnopoffType1;
pub use reasenberg::{InteractionFormula, Reasenberg};
pub use windows::TimeDistanceWindow;

/// Result of a declustering run: parallel cluster-id and event-role
/// vectors.
///
/// Invariants
/// ----------
/// - `cluster_id.len() == event_role.len()` = number of catalogue events.
/// - `cluster_id[i] == 0` marks an independent event; positive ids group
///   events into clusters. Reasenberg renumbers its final ids to be
///   contiguous from 1.
/// - `event_role[i]` is 0 for mainshocks and independent events, +1 for
///   aftershocks, −1 for foreshocks; every cluster carries exactly one
///   role-0 member.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterAssignment {
    pub cluster_id: Array1<u32>,
    pub event_role: Array1<i8>,
}

impl ClusterAssignment {
    /// Number of classified events.
    pub fn len(&self) -> usize {
        self.cluster_id.len()
    }

    /// `true` when no events were classified.
    pub fn is_empty(&self) -> bool {
        self.cluster_id.is_empty()
    }

    /// Mask of events that survive declustering: independent events and
    /// cluster mainshocks.
    pub fn poisson_mask(&self) -> Array1<bool> {
        let n = self.len();
        let mut mask = Array1::from_elem(n, false);
        for i in 0..n {
            mask[i] = self.event_role[i] == 0;
        }
        mask
    }
}

/// Declustering algorithm selector: one variant per implementation, each
/// carrying its validated configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum Declusterer {
    GardnerKnopoff(GardnerKnopoffType1),
    Afteran(Afteran),
    Reasenberg(Reasenberg),
}

impl Declusterer {
    /// Run the selected algorithm on a catalogue.
    pub fn decluster(&self, catalogue: &Catalogue) -> DeclusterResult<ClusterAssignment> {
        match self {
            Declusterer::GardnerKnopoff(alg) => alg.decluster(catalogue),
            Declusterer::Afteran(alg) => alg.decluster(catalogue),
            Declusterer::Reasenberg(alg) => alg.decluster(catalogue),
        }
    }
}
