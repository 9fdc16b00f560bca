//! Error taxonomy for cycle-time computation.

/// Errors produced while computing or exporting cycle-time records.
///
/// Per-issue failures (`MalformedTimestamp`) fail a single issue; the batch
/// layer decides whether to skip it or abort.
#[derive(Debug, thiserror::Error)]
pub enum CycleTimeError {
    #[error("malformed timestamp in {field}: {value:?} ({reason})")]
    MalformedTimestamp {
        field: String,
        value: String,
        reason: String,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("source error: {0}")]
    Source(#[from] SourceError),

    #[error("worker task failed: {0}")]
    Worker(String),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl CycleTimeError {
    /// Build a `MalformedTimestamp` for the given field and raw value.
    pub fn malformed(field: &str, value: &str, reason: impl Into<String>) -> Self {
        CycleTimeError::MalformedTimestamp {
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// Errors raised by an [`IssueSource`](crate::source::IssueSource).
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("source unavailable: {0}")]
    Unavailable(String),

    #[error("invalid source payload: {0}")]
    InvalidPayload(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for cycle-time operations.
pub type Result<T> = std::result::Result<T, CycleTimeError>;
