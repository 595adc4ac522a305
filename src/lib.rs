//! rust_seismicity — earthquake catalogue declustering, completeness,
//! and recurrence analysis.
//!
//! Purpose
//! -------
//! Provide the scientific core of a seismic hazard toolkit's catalogue
//! pipeline: partition a raw earthquake catalogue into mainshock and
//! aftershock clusters, estimate the time-varying magnitude of
//! completeness, and fit Gutenberg-Richter recurrence parameters and
//! maximum-magnitude estimates that account for that completeness.
//!
//! Key behaviors
//! -------------
//! - [`catalogue`] holds the validated in-memory event container and its
//!   derived time columns.
//! - [`declustering`] implements three interchangeable cluster
//!   algorithms (Gardner-Knopoff Type 1, Afteran, Reasenberg) over the
//!   published distance-time window models.
//! - [`completeness`] implements the Stepp (1971) bilinear completeness
//!   analysis on top of the crate's L-BFGS layer ([`optimization`]).
//! - [`recurrence`] fits (b, sigma_b, rate, sigma_rate) via the
//!   Aki/Bender, Weichert, and Kijko-Smit estimators.
//! - [`max_magnitude`] estimates (mmax, sigma_mmax) via cumulative
//!   moment release and three Kijko fixed-point estimators.
//! - [`registry`] lists every algorithm with its declared configuration
//!   schema for name-based selection.
//!
//! Invariants & assumptions
//! ------------------------
//! - All algorithms are synchronous, single-threaded, pure computations
//!   over in-memory arrays; the only process-wide state is the
//!   read-only algorithm registry.
//! - Configuration errors surface before any numerical work begins;
//!   anticipated numerical failure (optimizer non-convergence,
//!   undefined models) degrades to NaN sentinels that callers can skip.
//!
//! Downstream usage
//! ----------------
//! - A typical pipeline declusters a catalogue, thins it to the
//!   mainshock mask, derives a completeness table, and feeds both into
//!   the recurrence and maximum-magnitude estimators; the integration
//!   tests exercise exactly this flow.
//! - Parallelism, persistence, and serialization are host concerns:
//!   every entry point is independently invocable and stateless across
//!   calls.

pub mod catalogue;
pub mod completeness;
pub mod declustering;
pub mod max_magnitude;
pub mod optimization;
pub mod recurrence;
pub mod registry;
pub mod utils;

pub use catalogue::Catalogue;
pub use completeness::{CompletenessTable, Stepp1971, SteppConfig, TimeBin};
pub use declustering::{
    Afteran, ClusterAssignment, Declusterer, GardnerKnopoffType1, Reasenberg,
    TimeDistanceWindow,
};
pub use max_magnitude::{MmaxConfig, MmaxEstimate, MmaxEstimator};
pub use recurrence::{RecurrenceConfig, RecurrenceEstimate, RecurrenceEstimator};
