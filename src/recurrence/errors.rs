/// Result alias for recurrence estimation.
pub type RecurrenceResult<T> = Result<T, RecurrenceError>;

#[derive(Debug, Clone, PartialEq)]
pub enum RecurrenceError {
    /// The estimator needs a completeness table and none was supplied.
    MissingCompleteness {
        estimator: &'static str,
    },

    /// Magnitude interval must be positive and finite.
    InvalidMagnitudeInterval {
        value: f64,
    },

    /// Reference magnitude must be finite.
    InvalidReferenceMagnitude {
        value: f64,
    },

    /// Iteration tolerance must be positive and finite.
    InvalidTolerance {
        value: f64,
    },

    /// Iteration cap must be positive.
    InvalidMaxIterations,

    /// The completeness table has no usable (non-NaN) rows.
    NoUsableCompleteness,

    /// A completeness sub-period holds no events above its threshold,
    /// so no per-interval b-value exists.
    EmptyCompletenessInterval {
        index: usize,
    },

    /// No catalogue events survive the completeness filtering.
    NoCompleteEvents,
}

impl std::error::Error for RecurrenceError {}

impl std::fmt::Display for RecurrenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecurrenceError::MissingCompleteness { estimator } => {
                write!(f, "{estimator} requires a completeness table")
            }
            RecurrenceError::InvalidMagnitudeInterval { value } => {
                write!(f, "Magnitude interval must be positive, got {value}")
            }
            RecurrenceError::InvalidReferenceMagnitude { value } => {
                write!(f, "Reference magnitude must be finite, got {value}")
            }
            RecurrenceError::InvalidTolerance { value } => {
                write!(f, "Iteration tolerance must be positive, got {value}")
            }
            RecurrenceError::InvalidMaxIterations => {
                write!(f, "Maximum iterations must be greater than zero")
            }
            RecurrenceError::NoUsableCompleteness => {
                write!(f, "Completeness table contains no usable rows")
            }
            RecurrenceError::EmptyCompletenessInterval { index } => {
                write!(f, "Completeness interval {index} contains no events")
            }
            RecurrenceError::NoCompleteEvents => {
                write!(f, "No events remain above the completeness thresholds")
            }
        }
    }
}
