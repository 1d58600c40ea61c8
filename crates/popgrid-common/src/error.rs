//! Error types for popgrid queries.

use thiserror::Error;

/// Result type alias using PopError.
pub type PopResult<T> = Result<T, PopError>;

/// Errors reported by projection and query entry points.
///
/// The aggregation engine itself never produces these; they come from the
/// eager validation done before a polygon reaches it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PopError {
    // === Input validation ===
    #[error("Coordinate out of range: {0}")]
    OutOfRange(String),

    #[error("Too few points: got {got}, need at least {required}")]
    InsufficientPoints { got: usize, required: usize },

    #[error("Grid width must be positive, got {0}")]
    InvalidWidth(i64),

    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Grid too large: {cells} cells exceeds limit of {limit}")]
    GridTooLarge { cells: u64, limit: u64 },

    // === Infrastructure ===
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PopError {
    /// Create an OutOfRange error.
    pub fn out_of_range(msg: impl Into<String>) -> Self {
        Self::OutOfRange(msg.into())
    }

    /// Create a MalformedInput error.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedInput(msg.into())
    }

    /// Stable error kind name reported to clients.
    pub fn error_code(&self) -> &'static str {
        match self {
            PopError::OutOfRange(_) => "RangeError",
            PopError::InsufficientPoints { .. } => "InsufficientPointsError",
            PopError::InvalidWidth(_) => "InvalidWidthError",
            PopError::MalformedInput(_) => "MalformedInputError",
            PopError::GridTooLarge { .. } => "GridTooLargeError",
            PopError::Internal(_) => "InternalError",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            PopError::OutOfRange(_)
            | PopError::InsufficientPoints { .. }
            | PopError::InvalidWidth(_)
            | PopError::MalformedInput(_) => 400,

            PopError::GridTooLarge { .. } => 413,

            PopError::Internal(_) => 500,
        }
    }
}

impl From<serde_json::Error> for PopError {
    fn from(err: serde_json::Error) -> Self {
        PopError::MalformedInput(format!("JSON error: {}", err))
    }
}
