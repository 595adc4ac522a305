//! Integration tests for the catalogue analysis pipeline.
//!
//! Purpose
//! -------
//! - Validate the end-to-end flow: raw catalogue -> declustering ->
//!   mainshock thinning -> completeness analysis -> recurrence and
//!   maximum-magnitude estimation.
//! - Exercise realistic parameter regimes (multi-decade catalogues,
//!   staged completeness, aftershock sequences) rather than toy edge
//!   cases only.
//!
//! Coverage
//! --------
//! - `declustering`:
//!   - Gardner-Knopoff Type 1 cluster extraction over a synthetic
//!     mainshock/aftershock catalogue and the mainshock thinning mask.
//!   - Reasenberg on the same catalogue, including its ascending-time
//!     precondition on a reordered copy.
//! - `completeness::Stepp1971`:
//!   - Completeness-year recovery on a catalogue with known truncation,
//!     with the monotonicity lock applied.
//! - `recurrence`:
//!   - Weichert through the fitted completeness table; Kijko-Smit and
//!     Aki on a clean schedule.
//! - `max_magnitude`:
//!   - Cumulative-moment and Kijko fixed-b estimates on the thinned
//!     catalogue, including determinism without bootstrapping.
//!
//! Exclusions
//! ----------
//! - Fine-grained validation of low-level building blocks (window
//!   formulas, binning helpers, optimizer plumbing) — covered by unit
//!   tests in the library modules.
//! - Statistical power studies over random catalogues — the synthetic
//!   inputs here are deterministic by construction.
use ndarray::Array1;
use rust_seismicity::{
    declustering::DeclusterError,
    max_magnitude::CumulativeMoment,
    recurrence::{AkiMaxLikelihood, KijkoSmit, Weichert},
    Catalogue, CompletenessTable, Declusterer, GardnerKnopoffType1, MmaxConfig, MmaxEstimator,
    Reasenberg, RecurrenceConfig, Stepp1971, SteppConfig, TimeBin, TimeDistanceWindow,
};

/// Build a clustered synthetic catalogue: one mainshock per year from
/// 1970 to 1999 on a slowly rising magnitude ladder (M5.30 to M5.88),
/// alternating between two distant sites, each followed by M4.2 and
/// M4.0 aftershocks half a day and 1.25 days later within a couple of
/// kilometres.
fn clustered_catalogue() -> Catalogue {
    let mut year = Vec::new();
    let mut month = Vec::new();
    let mut day = Vec::new();
    let mut hour = Vec::new();
    let mut lon = Vec::new();
    let mut lat = Vec::new();
    let mut mag = Vec::new();
    for i in 0..30 {
        let y = 1970 + i as i32;
        let mainshock_mag = 5.3 + 0.02 * i as f64;
        let (site_lon, site_lat) = if i % 2 == 0 { (20.0, 40.0) } else { (60.0, 10.0) };
        for (d, h, m, dlon, dlat) in [
            (1u32, 0u32, mainshock_mag, 0.0, 0.0),
            (1, 12, 4.2, 0.01, 0.0),
            (2, 6, 4.0, 0.0, 0.02),
        ] {
            year.push(y);
            month.push(6u32);
            day.push(d);
            hour.push(h);
            lon.push(site_lon + dlon);
            lat.push(site_lat + dlat);
            mag.push(m);
        }
    }
    let n = mag.len();
    Catalogue::new(
        Array1::from_vec(year),
        Array1::from_vec(month),
        Array1::from_vec(day),
        Array1::from_vec(hour),
        Array1::zeros(n),
        Array1::zeros(n),
        Array1::from_vec(lon),
        Array1::from_vec(lat),
        Array1::from_elem(n, 10.0),
        Array1::from_vec(mag),
    )
    .expect("synthetic catalogue columns are consistent")
}

/// Keep only the events selected by a boolean mask.
fn thin_catalogue(catalogue: &Catalogue, mask: &Array1<bool>) -> Catalogue {
    let keep: Vec<usize> = (0..catalogue.len()).filter(|&i| mask[i]).collect();
    let pick_i32 = |col: &Array1<i32>| -> Array1<i32> { keep.iter().map(|&i| col[i]).collect() };
    let pick_u32 = |col: &Array1<u32>| -> Array1<u32> { keep.iter().map(|&i| col[i]).collect() };
    let pick_f64 = |col: &Array1<f64>| -> Array1<f64> { keep.iter().map(|&i| col[i]).collect() };
    Catalogue::new(
        pick_i32(&catalogue.year),
        pick_u32(&catalogue.month),
        pick_u32(&catalogue.day),
        pick_u32(&catalogue.hour),
        pick_u32(&catalogue.minute),
        pick_f64(&catalogue.second),
        pick_f64(&catalogue.longitude),
        pick_f64(&catalogue.latitude),
        pick_f64(&catalogue.depth),
        pick_f64(&catalogue.magnitude),
    )
    .expect("thinned catalogue keeps at least one event")
}

/// Build a catalogue with known staged completeness: one M4.5 event per
/// year from 1970 to 2000, one M5.5 event every second year from 1930,
/// and a lone M5.5 event anchoring 1900.
fn staged_history_catalogue() -> Catalogue {
    let mut year = vec![1900];
    let mut mag = vec![5.5];
    for y in 1970..=2000 {
        year.push(y);
        mag.push(4.5);
    }
    for y in (1930..=2000).step_by(2) {
        year.push(y);
        mag.push(5.5);
    }
    let n = mag.len();
    Catalogue::new(
        Array1::from_vec(year),
        Array1::from_elem(n, 1),
        Array1::from_elem(n, 1),
        Array1::zeros(n),
        Array1::zeros(n),
        Array1::zeros(n),
        Array1::zeros(n),
        Array1::zeros(n),
        Array1::from_elem(n, 10.0),
        Array1::from_vec(mag),
    )
    .expect("history catalogue columns are consistent")
}

#[test]
// Purpose
// -------
// Run the full pipeline: decluster the clustered catalogue, keep the
// mainshocks, and estimate maximum magnitude on the thinned result.
//
// Given
// -----
// - 30 mainshock/aftershock triplets over 30 years at two distant
//   sites, mainshock magnitudes rising from 5.30 to 5.88.
//
// Expect
// ------
// - Exactly 30 clusters, each with one role-0 mainshock and two
//   aftershocks flagged +1.
// - The thinned catalogue holds the 30 mainshocks.
// - The cumulative-moment estimate is finite and of the order of the
//   mainshock sizes; the Kijko fixed-b estimate sits at or above the
//   observed maximum; both are deterministic.
fn declustering_to_mmax_pipeline() {
    let catalogue = clustered_catalogue();
    let declusterer = Declusterer::GardnerKnopoff(
        GardnerKnopoffType1::new(TimeDistanceWindow::GardnerKnopoff, 1.0, None)
            .expect("valid configuration"),
    );
    let assignment = declusterer.decluster(&catalogue).expect("declustering succeeds");

    let max_cluster = assignment.cluster_id.iter().cloned().max().unwrap();
    assert_eq!(max_cluster, 30, "one cluster per mainshock");
    let mainshocks =
        (0..assignment.len()).filter(|&i| assignment.event_role[i] == 0).count();
    assert_eq!(mainshocks, 30);
    let aftershocks =
        (0..assignment.len()).filter(|&i| assignment.event_role[i] == 1).count();
    assert_eq!(aftershocks, 60);
    // Every cluster id is non-zero: no event escaped its triplet.
    assert!(assignment.cluster_id.iter().all(|&c| c > 0));

    let thinned = thin_catalogue(&catalogue, &assignment.poisson_mask());
    assert_eq!(thinned.len(), 30);
    assert!(thinned.magnitude.iter().all(|&m| m >= 5.29));
    let obs_max = 5.3 + 0.02 * 29.0;

    // Maximum magnitude on the thinned catalogue.
    let config = MmaxConfig {
        b_value: 1.0,
        input_mmax_uncertainty: Some(0.2),
        ..MmaxConfig::default()
    };
    let moment = MmaxEstimator::CumulativeMoment
        .get_mmax(&thinned, &config)
        .expect("cumulative moment succeeds");
    assert!(moment.mmax.is_finite());
    assert!(
        moment.mmax > 5.0 && moment.mmax < 7.0,
        "excursion magnitude {} out of range",
        moment.mmax
    );
    assert_eq!(moment.sigma_mmax, 0.0, "no bootstrapping requested");

    let fixed_b = MmaxEstimator::KijkoSellevolFixedB
        .get_mmax(&thinned, &config)
        .expect("fixed-b estimator succeeds");
    assert!(fixed_b.mmax >= obs_max - 1e-9, "mmax = {}", fixed_b.mmax);
    assert!(fixed_b.mmax < 7.5);
    // Determinism: both estimators repeat bit-for-bit.
    assert_eq!(
        MmaxEstimator::CumulativeMoment.get_mmax(&thinned, &config).unwrap(),
        moment
    );
    assert_eq!(
        MmaxEstimator::KijkoSellevolFixedB.get_mmax(&thinned, &config).unwrap(),
        fixed_b
    );
}

#[test]
// Purpose
// -------
// Fit completeness on the staged history and push the resulting table
// through all three recurrence estimators.
//
// Given
// -----
// - The staged history catalogue: M4.5 complete from 1970 at 1.0
//   events/year, M5.5 complete from 1930 at 0.5 events/year.
//
// Expect
// ------
// - Stepp recovers completeness years near the truncation years, with
//   non-increasing years after the lock.
// - Weichert through the fitted table yields a valid b-value in a band
//   around the per-bin rate ratio (log10(~1.94) ~ 0.29 per magnitude
//   unit for this two-class ladder).
// - Kijko-Smit and Aki produce valid positive estimates on a clean
//   schedule.
fn completeness_to_recurrence_pipeline() {
    let history = staged_history_catalogue();
    let stepp_config = SteppConfig::new(0.5, TimeBin::Step(5.0), true)
        .expect("valid Stepp configuration");
    let mut engine = Stepp1971::new();
    let table = engine.completeness(&history, &stepp_config).expect("analysis succeeds");

    let years = table.years();
    assert!((years[0] - 1969.0).abs() <= 10.0, "M4.5 completeness year {}", years[0]);
    for i in 1..table.len() {
        assert!(years[i] <= years[i - 1], "increment lock must hold");
    }

    let recurrence_config = RecurrenceConfig {
        reference_magnitude: 4.5,
        ..RecurrenceConfig::default()
    };
    let weichert = Weichert
        .calculate(&history, &recurrence_config, &table)
        .expect("Weichert accepts the fitted table");
    assert!(weichert.is_valid(), "Weichert estimate: {weichert:?}");
    assert!(
        weichert.b_value > 0.2 && weichert.b_value < 0.45,
        "b = {}",
        weichert.b_value
    );
    assert!(weichert.rate > 0.0);

    // A clean two-row schedule for the interval-partitioned estimator.
    let clean_table = CompletenessTable::new(
        ndarray::array![1970.0, 1930.0],
        ndarray::array![4.5, 5.0],
    )
    .expect("valid completeness table");
    let kijko_smit = KijkoSmit
        .calculate(&history, &recurrence_config, &clean_table)
        .expect("Kijko-Smit accepts the schedule");
    assert!(kijko_smit.is_valid(), "Kijko-Smit estimate: {kijko_smit:?}");
    assert!(kijko_smit.b_value > 0.0);

    let aki = AkiMaxLikelihood
        .calculate(&history, &recurrence_config, Some(&clean_table))
        .expect("Aki accepts the schedule");
    assert!(aki.b_value > 0.0);
    assert!(aki.sigma_b > 0.0);
}

#[test]
// Purpose
// -------
// Reasenberg at the pipeline level: the chronological catalogue
// declusters to one mainshock per triplet, while a magnitude-sorted
// (hence time-shuffled) copy violates the ascending-time precondition
// and errors before any clustering.
fn reasenberg_requires_chronological_input() {
    let catalogue = clustered_catalogue();
    let assignment = Declusterer::Reasenberg(Reasenberg::default())
        .decluster(&catalogue)
        .expect("chronological catalogue is accepted");
    assert_eq!(assignment.len(), catalogue.len());
    let survivors = assignment.poisson_mask().iter().filter(|&&m| m).count();
    assert_eq!(survivors, 30, "one mainshock per triplet");

    // Magnitude-descending order breaks the time ordering.
    let mut order: Vec<usize> = (0..catalogue.len()).collect();
    order.sort_by(|&a, &b| {
        catalogue.magnitude[b].partial_cmp(&catalogue.magnitude[a]).unwrap()
    });
    let shuffled = Catalogue::new(
        order.iter().map(|&i| catalogue.year[i]).collect(),
        order.iter().map(|&i| catalogue.month[i]).collect(),
        order.iter().map(|&i| catalogue.day[i]).collect(),
        order.iter().map(|&i| catalogue.hour[i]).collect(),
        order.iter().map(|&i| catalogue.minute[i]).collect(),
        order.iter().map(|&i| catalogue.second[i]).collect(),
        order.iter().map(|&i| catalogue.longitude[i]).collect(),
        order.iter().map(|&i| catalogue.latitude[i]).collect(),
        order.iter().map(|&i| catalogue.depth[i]).collect(),
        order.iter().map(|&i| catalogue.magnitude[i]).collect(),
    )
    .expect("reordered columns stay consistent");
    let err = Declusterer::Reasenberg(Reasenberg::default()).decluster(&shuffled).unwrap_err();
    assert_eq!(err, DeclusterError::UnorderedCatalogue);

    // Cumulative moment accumulates by calendar year, so it is
    // indifferent to event order.
    let a = CumulativeMoment.get_mmax(&catalogue, &MmaxConfig::default()).unwrap();
    let b = CumulativeMoment.get_mmax(&shuffled, &MmaxConfig::default()).unwrap();
    assert_eq!(a, b);
}
