use thiserror::Error;

/// Itemised rejection of a vehicle record. Every problem found is listed,
/// so callers can surface them together.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Validation failed: {}", .errors.join("; "))]
pub struct ValidationError {
    pub errors: Vec<String>,
}

#[derive(Debug, Error)]
pub enum MarginError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Date error: {0}")]
    DateError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for MarginError {
    fn from(e: serde_json::Error) -> Self {
        MarginError::SerializationError(e.to_string())
    }
}
