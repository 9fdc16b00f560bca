//! Error types for jira-source

use cycletime_core::SourceError;
use thiserror::Error;

/// Errors that can occur while talking to Jira
#[derive(Error, Debug)]
pub enum JiraError {
    /// Transport-level failure (DNS, TLS, connection reset, timeout)
    #[error("HTTP error: {0}")]
    Http(String),

    /// Non-success response that is not retried
    #[error("Jira returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Every attempt failed
    #[error("request failed after {attempts} attempts: {last_error}")]
    RetriesExhausted { attempts: u32, last_error: String },

    /// Response JSON is missing a field we need
    #[error("missing field in Jira response: {0}")]
    MissingField(String),

    /// Client configuration is unusable
    #[error("Jira is not configured: {0}")]
    Config(String),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<reqwest::Error> for JiraError {
    fn from(err: reqwest::Error) -> Self {
        JiraError::Http(err.to_string())
    }
}

impl From<JiraError> for SourceError {
    fn from(err: JiraError) -> Self {
        match err {
            JiraError::Json(_) | JiraError::MissingField(_) => {
                SourceError::InvalidPayload(err.to_string())
            }
            other => SourceError::Unavailable(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_display() {
        let err = JiraError::Status {
            status: 401,
            body: "Unauthorized".to_string(),
        };
        assert_eq!(err.to_string(), "Jira returned 401: Unauthorized");
    }

    #[test]
    fn payload_errors_map_to_invalid_payload() {
        let err: SourceError = JiraError::MissingField("fields.created".to_string()).into();
        assert!(matches!(err, SourceError::InvalidPayload(_)));

        let err: SourceError = JiraError::Http("connection refused".to_string()).into();
        assert!(matches!(err, SourceError::Unavailable(_)));
    }
}
