//! Status transition events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single status transition taken from an issue changelog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChangeEvent {
    /// When the transition happened (UTC).
    pub timestamp: DateTime<Utc>,

    /// Status the issue left.
    pub from_status: String,

    /// Status the issue entered.
    pub to_status: String,
}

impl StatusChangeEvent {
    pub fn new(
        timestamp: DateTime<Utc>,
        from_status: impl Into<String>,
        to_status: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            from_status: from_status.into(),
            to_status: to_status.into(),
        }
    }
}
