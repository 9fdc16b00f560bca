//! Raw issue records as delivered by a data source.

use serde::{Deserialize, Serialize};

use crate::domain::event::StatusChangeEvent;
use crate::error::Result;
use crate::timestamp::parse_timestamp;

/// Changelog field name carrying status transitions.
pub const STATUS_FIELD: &str = "status";

/// One field change from an issue changelog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawChangelogEntry {
    /// ISO-8601 datetime of the change.
    pub timestamp: String,
    pub field: String,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
}

/// Issue with its full changelog, timestamps still unparsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawIssue {
    pub key: String,
    #[serde(default)]
    pub summary: String,
    /// Current status name.
    pub status: String,
    /// ISO-8601 creation datetime.
    pub created: String,
    /// ISO-8601 resolution datetime, absent while unresolved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved: Option<String>,
    #[serde(default)]
    pub changelog: Vec<RawChangelogEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_type: Option<String>,
}

impl RawIssue {
    /// Minimal issue with no changelog; mostly useful for tests and fakes.
    pub fn new(key: &str, summary: &str, status: &str, created: &str) -> Self {
        Self {
            key: key.to_string(),
            summary: summary.to_string(),
            status: status.to_string(),
            created: created.to_string(),
            resolved: None,
            changelog: Vec::new(),
            assignee: None,
            priority: None,
            issue_type: None,
        }
    }

    pub fn with_resolved(mut self, resolved: &str) -> Self {
        self.resolved = Some(resolved.to_string());
        self
    }

    /// Append a status transition to the changelog.
    pub fn with_transition(mut self, timestamp: &str, from: &str, to: &str) -> Self {
        self.changelog.push(RawChangelogEntry {
            timestamp: timestamp.to_string(),
            field: STATUS_FIELD.to_string(),
            from: Some(from.to_string()),
            to: Some(to.to_string()),
        });
        self
    }

    /// Parse the status transitions out of the changelog, in source order.
    ///
    /// Entries for other fields are ignored. A missing `from`/`to` becomes an
    /// empty status name rather than an error.
    pub fn status_events(&self) -> Result<Vec<StatusChangeEvent>> {
        self.changelog
            .iter()
            .filter(|entry| entry.field == STATUS_FIELD)
            .map(|entry| {
                let timestamp = parse_timestamp("changelog.timestamp", &entry.timestamp)?;
                Ok(StatusChangeEvent::new(
                    timestamp,
                    entry.from.clone().unwrap_or_default(),
                    entry.to.clone().unwrap_or_default(),
                ))
            })
            .collect()
    }
}
