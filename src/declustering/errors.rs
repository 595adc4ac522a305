/// Result alias for declustering operations.
pub type DeclusterResult<T> = Result<T, DeclusterError>;

#[derive(Debug, Clone, PartialEq)]
pub enum DeclusterError {
    /// Foreshock time-window proportion must lie in [0, 1].
    InvalidFsTimeProp {
        value: f64,
    },

    /// A duration parameter must be positive and finite.
    NonPositiveDuration {
        name: &'static str,
        value: f64,
    },

    /// A scaling factor must be positive and finite.
    NonPositiveFactor {
        name: &'static str,
        value: f64,
    },

    /// Confidence level must lie strictly inside (0, 1).
    InvalidProbability {
        value: f64,
    },

    /// Look-ahead bounds must satisfy 0 < taumin <= taumax.
    InvalidLookAheadRange {
        taumin: f64,
        taumax: f64,
    },

    /// A location-error override must be non-negative and finite.
    InvalidLocationError {
        name: &'static str,
        value: f64,
    },

    /// Unknown window or interaction-formula name.
    UnknownName {
        kind: &'static str,
        name: String,
    },

    /// The Reasenberg algorithm requires events in ascending time order.
    UnorderedCatalogue,
}

impl std::error::Error for DeclusterError {}

impl std::fmt::Display for DeclusterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeclusterError::InvalidFsTimeProp { value } => {
                write!(f, "Foreshock time proportion {value} outside [0, 1]")
            }
            DeclusterError::NonPositiveDuration { name, value } => {
                write!(f, "Duration '{name}' must be positive, got {value}")
            }
            DeclusterError::NonPositiveFactor { name, value } => {
                write!(f, "Factor '{name}' must be positive, got {value}")
            }
            DeclusterError::InvalidProbability { value } => {
                write!(f, "Confidence level {value} outside (0, 1)")
            }
            DeclusterError::InvalidLookAheadRange { taumin, taumax } => {
                write!(f, "Look-ahead bounds must satisfy 0 < taumin <= taumax, got ({taumin}, {taumax})")
            }
            DeclusterError::InvalidLocationError { name, value } => {
                write!(f, "Location error '{name}' must be non-negative, got {value}")
            }
            DeclusterError::UnknownName { kind, name } => {
                write!(f, "Unknown {kind} '{name}'")
            }
            DeclusterError::UnorderedCatalogue => {
                write!(f, "catalogue needs to be in ascending date order")
            }
        }
    }
}
