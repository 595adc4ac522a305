use crate::optimization::errors::OptError;

/// Result alias for completeness analysis.
pub type CompletenessResult<T> = Result<T, CompletenessError>;

#[derive(Debug, Clone, PartialEq)]
pub enum CompletenessError {
    /// Magnitude bin spacing exceeds the observed magnitude range.
    MagnitudeBinTooWide,

    /// Time bin step exceeds the catalogue duration.
    TimeBinTooWide,

    /// An explicit time-window list is not ordered newest to oldest.
    UnorderedTimeWindows,

    /// Magnitude bin spacing must be positive and finite.
    InvalidMagnitudeBin {
        value: f64,
    },

    /// Time bin step must be positive and finite.
    InvalidTimeBin {
        value: f64,
    },

    /// An explicit time-window list must contain at least one window.
    EmptyTimeWindows,

    /// A completeness table needs at least one row.
    EmptyTable,

    /// Completeness table columns must have equal length.
    TableShapeMismatch {
        years: usize,
        magnitudes: usize,
    },

    /// Completeness table magnitudes must be finite and strictly
    /// increasing.
    UnorderedTableMagnitudes,

    /// Optimizer plumbing failure while fitting (distinct from benign
    /// non-convergence, which yields NaN table entries instead).
    Optimization(OptError),
}

impl std::error::Error for CompletenessError {}

impl std::fmt::Display for CompletenessError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompletenessError::MagnitudeBinTooWide => {
                write!(f, "Bin width greater than magnitude range!")
            }
            CompletenessError::TimeBinTooWide => {
                write!(f, "Catalogue duration smaller than time bin width")
            }
            CompletenessError::UnorderedTimeWindows => {
                write!(f, "Configuration time windows must be ordered from recent to oldest")
            }
            CompletenessError::InvalidMagnitudeBin { value } => {
                write!(f, "Magnitude bin width must be positive, got {value}")
            }
            CompletenessError::InvalidTimeBin { value } => {
                write!(f, "Time bin width must be positive, got {value}")
            }
            CompletenessError::EmptyTimeWindows => {
                write!(f, "Time window list must not be empty")
            }
            CompletenessError::EmptyTable => {
                write!(f, "Completeness table must contain at least one row")
            }
            CompletenessError::TableShapeMismatch { years, magnitudes } => {
                write!(
                    f,
                    "Completeness table columns differ in length: {years} years, {magnitudes} magnitudes"
                )
            }
            CompletenessError::UnorderedTableMagnitudes => {
                write!(f, "Completeness table magnitudes must be strictly increasing")
            }
            CompletenessError::Optimization(err) => {
                write!(f, "Completeness fit failed: {err}")
            }
        }
    }
}

impl From<OptError> for CompletenessError {
    fn from(err: OptError) -> Self {
        CompletenessError::Optimization(err)
    }
}
