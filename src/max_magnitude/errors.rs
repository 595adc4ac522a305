/// Result alias for maximum-magnitude estimation.
pub type MmaxResult<T> = Result<T, MmaxError>;

#[derive(Debug, Clone, PartialEq)]
pub enum MmaxError {
    /// An observed-mmax uncertainty could not be resolved from either
    /// the configuration or the catalogue.
    MissingMmaxUncertainty,

    /// The truncated-exponential integrand is undefined for
    /// `mmin >= mmax`.
    MminAboveMmax,

    /// Iteration tolerance must be positive and finite.
    InvalidTolerance {
        value: f64,
    },

    /// Iteration cap must be positive.
    InvalidMaxIterations,

    /// The sample grid for the non-parametric integrand needs at least
    /// three points.
    InvalidSampleCount {
        value: usize,
    },

    /// The non-parametric estimator needs at least two events.
    TooFewEvents {
        count: usize,
    },
}

impl std::error::Error for MmaxError {}

impl std::fmt::Display for MmaxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MmaxError::MissingMmaxUncertainty => {
                write!(f, "Input mmax uncertainty must be specified!")
            }
            MmaxError::MminAboveMmax => {
                write!(
                    f,
                    "Maximum magnitude smaller than minimum magnitude in Kijko & Sellevol \
                     (Fixed-b) integral"
                )
            }
            MmaxError::InvalidTolerance { value } => {
                write!(f, "Iteration tolerance must be positive, got {value}")
            }
            MmaxError::InvalidMaxIterations => {
                write!(f, "Maximum iterations must be greater than zero")
            }
            MmaxError::InvalidSampleCount { value } => {
                write!(f, "Sample count must be at least 3, got {value}")
            }
            MmaxError::TooFewEvents { count } => {
                write!(f, "Estimator needs at least two events, got {count}")
            }
        }
    }
}
