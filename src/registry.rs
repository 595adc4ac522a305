//! Static algorithm registry.
//!
//! Purpose
//! -------
//! One read-only lookup table describing every algorithm the crate
//! ships: its family, and its configuration schema (field names, which
//! are required, and the documented defaults). The table is built once
//! on first access and never mutated, replacing runtime reflection with
//! an explicit listing; the typed config constructors remain the
//! enforcement point for the "validate required keys, apply declared
//! defaults" behaviour, while this table serves discovery and
//! name-based selection.
//!
//! Key behaviors
//! -------------
//! - [`registry`] returns the full table; [`find`] looks an algorithm
//!   up by case-insensitive name.
//! - The kind enums ([`DeclustererKind`], [`CompletenessKind`],
//!   [`RecurrenceKind`], [`MmaxKind`]) parse from strings with
//!   descriptive errors, for config-file-driven selection.
use std::str::FromStr;
use std::sync::OnceLock;

/// Algorithm family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    Declustering,
    Completeness,
    Recurrence,
    MaxMagnitude,
}

/// One configuration field: name, whether it must be supplied, and the
/// documented default (as display text) when it need not be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub required: bool,
    pub default: Option<&'static str>,
}

/// Registry row: an algorithm name, its family, and its config schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlgorithmSpec {
    pub name: &'static str,
    pub family: Family,
    pub fields: &'static [FieldSpec],
}

const fn required(name: &'static str) -> FieldSpec {
    FieldSpec { name, required: true, default: None }
}

const fn optional(name: &'static str, default: &'static str) -> FieldSpec {
    FieldSpec { name, required: false, default: Some(default) }
}

// Field schemas live in consts so the registry rows can borrow them for
// the 'static lifetime.
const GARDNER_KNOPOFF_FIELDS: &[FieldSpec] = &[
    required("time_distance_window"),
    required("fs_time_prop"),
    optional("time_cutoff", "None"),
];

const AFTERAN_FIELDS: &[FieldSpec] =
    &[required("time_distance_window"), required("time_window")];

const REASENBERG_FIELDS: &[FieldSpec] = &[
    optional("taumin", "1.0"),
    optional("taumax", "10.0"),
    optional("P", "0.95"),
    optional("xk", "0.5"),
    optional("xmeff", "1.5"),
    optional("rfact", "10.0"),
    optional("horiz_error", "1.5"),
    optional("depth_error", "2.0"),
    optional("interaction_formula", "Reasenberg1985"),
    optional("max_interaction_dist", "inf"),
];

const STEPP_FIELDS: &[FieldSpec] = &[
    required("magnitude_bin"),
    required("time_bin"),
    optional("increment_lock", "false"),
];

const AKI_FIELDS: &[FieldSpec] = &[
    optional("reference_magnitude", "0.0"),
    optional("magnitude_interval", "0.1"),
];

const WEICHERT_FIELDS: &[FieldSpec] = &[
    required("completeness"),
    optional("reference_magnitude", "0.0"),
    optional("magnitude_interval", "0.1"),
    optional("bvalue", "1.0"),
    optional("itstab", "1e-5"),
    optional("maxiter", "1000"),
];

const KIJKO_SMIT_FIELDS: &[FieldSpec] = &[
    required("completeness"),
    optional("reference_magnitude", "0.0"),
    optional("magnitude_interval", "0.1"),
];

const CUMULATIVE_MOMENT_FIELDS: &[FieldSpec] =
    &[optional("number_bootstraps", "1"), optional("seed", "None")];

const KIJKO_SELLEVOL_FIELDS: &[FieldSpec] = &[
    required("b-value"),
    optional("input_mmin", "observed minimum"),
    optional("input_mmax", "observed maximum"),
    optional("input_mmax_uncertainty", "from catalogue"),
    optional("tolerance", "1e-3"),
    optional("maximum_iterations", "1000"),
];

const KIJKO_SELLEVOL_BAYES_FIELDS: &[FieldSpec] = &[
    required("b-value"),
    required("sigma-b"),
    optional("input_mmin", "observed minimum"),
    optional("input_mmax", "observed maximum"),
    optional("input_mmax_uncertainty", "from catalogue"),
    optional("tolerance", "1e-3"),
    optional("maximum_iterations", "1000"),
];

const KIJKO_NPG_FIELDS: &[FieldSpec] = &[
    optional("number_earthquakes", "100"),
    optional("number_samples", "51"),
    optional("tolerance", "0.05"),
    optional("maximum_iterations", "1000"),
];

static REGISTRY: OnceLock<Vec<AlgorithmSpec>> = OnceLock::new();

/// The full algorithm table, built on first access.
pub fn registry() -> &'static [AlgorithmSpec] {
    REGISTRY
        .get_or_init(|| {
            vec![
                AlgorithmSpec {
                    name: "GardnerKnopoffType1",
                    family: Family::Declustering,
                    fields: GARDNER_KNOPOFF_FIELDS,
                },
                AlgorithmSpec {
                    name: "Afteran",
                    family: Family::Declustering,
                    fields: AFTERAN_FIELDS,
                },
                AlgorithmSpec {
                    name: "Reasenberg",
                    family: Family::Declustering,
                    fields: REASENBERG_FIELDS,
                },
                AlgorithmSpec {
                    name: "Stepp1971",
                    family: Family::Completeness,
                    fields: STEPP_FIELDS,
                },
                AlgorithmSpec {
                    name: "AkiMaxLikelihood",
                    family: Family::Recurrence,
                    fields: AKI_FIELDS,
                },
                AlgorithmSpec {
                    name: "Weichert",
                    family: Family::Recurrence,
                    fields: WEICHERT_FIELDS,
                },
                AlgorithmSpec {
                    name: "KijkoSmit",
                    family: Family::Recurrence,
                    fields: KIJKO_SMIT_FIELDS,
                },
                AlgorithmSpec {
                    name: "CumulativeMoment",
                    family: Family::MaxMagnitude,
                    fields: CUMULATIVE_MOMENT_FIELDS,
                },
                AlgorithmSpec {
                    name: "KijkoSellevolFixedb",
                    family: Family::MaxMagnitude,
                    fields: KIJKO_SELLEVOL_FIELDS,
                },
                AlgorithmSpec {
                    name: "KijkoSellevolBayes",
                    family: Family::MaxMagnitude,
                    fields: KIJKO_SELLEVOL_BAYES_FIELDS,
                },
                AlgorithmSpec {
                    name: "KijkoNonParametricGaussian",
                    family: Family::MaxMagnitude,
                    fields: KIJKO_NPG_FIELDS,
                },
            ]
        })
        .as_slice()
}

/// Look an algorithm up by case-insensitive name.
pub fn find(name: &str) -> Option<&'static AlgorithmSpec> {
    registry().iter().find(|spec| spec.name.eq_ignore_ascii_case(name))
}

/// Declustering algorithm names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclustererKind {
    GardnerKnopoffType1,
    Afteran,
    Reasenberg,
}

/// Completeness algorithm names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletenessKind {
    Stepp1971,
}

/// Recurrence estimator names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecurrenceKind {
    AkiMaxLikelihood,
    Weichert,
    KijkoSmit,
}

/// Maximum-magnitude estimator names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MmaxKind {
    CumulativeMoment,
    KijkoSellevolFixedb,
    KijkoSellevolBayes,
    KijkoNonParametricGaussian,
}

/// Error for unknown registry names, carrying the family that was
/// searched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownAlgorithm {
    pub family: &'static str,
    pub name: String,
}

impl std::error::Error for UnknownAlgorithm {}

impl std::fmt::Display for UnknownAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Unknown {} algorithm '{}'", self.family, self.name)
    }
}

impl FromStr for DeclustererKind {
    type Err = UnknownAlgorithm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gardnerknopofftype1" => Ok(Self::GardnerKnopoffType1),
            "afteran" => Ok(Self::Afteran),
            "reasenberg" => Ok(Self::Reasenberg),
            _ => Err(UnknownAlgorithm { family: "declustering", name: s.to_string() }),
        }
    }
}

impl FromStr for CompletenessKind {
    type Err = UnknownAlgorithm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "stepp1971" => Ok(Self::Stepp1971),
            _ => Err(UnknownAlgorithm { family: "completeness", name: s.to_string() }),
        }
    }
}

impl FromStr for RecurrenceKind {
    type Err = UnknownAlgorithm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "akimaxlikelihood" => Ok(Self::AkiMaxLikelihood),
            "weichert" => Ok(Self::Weichert),
            "kijkosmit" => Ok(Self::KijkoSmit),
            _ => Err(UnknownAlgorithm { family: "recurrence", name: s.to_string() }),
        }
    }
}

impl FromStr for MmaxKind {
    type Err = UnknownAlgorithm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cumulativemoment" => Ok(Self::CumulativeMoment),
            "kijkosellevolfixedb" => Ok(Self::KijkoSellevolFixedb),
            "kijkosellevolbayes" => Ok(Self::KijkoSellevolBayes),
            "kijkononparametricgaussian" => Ok(Self::KijkoNonParametricGaussian),
            _ => Err(UnknownAlgorithm { family: "maximum magnitude", name: s.to_string() }),
        }
    }
}
