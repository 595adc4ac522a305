/// Result alias for catalogue construction and access.
pub type CatalogueResult<T> = Result<T, CatalogueError>;

#[derive(Debug, Clone, PartialEq)]
pub enum CatalogueError {
    /// The catalogue must contain at least one event.
    EmptyCatalogue,

    /// A per-event column does not match the number of events.
    ColumnLengthMismatch {
        column: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A numeric column contains a NaN or infinite entry.
    NonFiniteValue {
        column: &'static str,
        index: usize,
        value: f64,
    },

    /// A calendar component is outside its valid range.
    InvalidDateComponent {
        column: &'static str,
        index: usize,
        value: u32,
    },
}

impl std::error::Error for CatalogueError {}

impl std::fmt::Display for CatalogueError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogueError::EmptyCatalogue => {
                write!(f, "Catalogue must contain at least one event")
            }
            CatalogueError::ColumnLengthMismatch { column, expected, actual } => {
                write!(
                    f,
                    "Column '{column}' length mismatch: expected {expected}, actual {actual}"
                )
            }
            CatalogueError::NonFiniteValue { column, index, value } => {
                write!(f, "Column '{column}' has non-finite value {value} at index {index}")
            }
            CatalogueError::InvalidDateComponent { column, index, value } => {
                write!(f, "Column '{column}' has invalid value {value} at index {index}")
            }
        }
    }
}
