//! Per-issue cycle-time record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::interval::StatusInterval;

/// Computed cycle-time metric for one issue.
///
/// Produced once by the aggregator and consumed read-only by sinks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleTimeRecord {
    pub key: String,
    pub summary: String,
    pub cycle_time_hours: f64,
    pub cycle_time_days: f64,
    /// Current status name.
    pub status: String,
    pub created: DateTime<Utc>,
    pub resolved: Option<DateTime<Utc>>,
    /// Full status history. Exported only by the detailed JSON sink.
    pub intervals: Vec<StatusInterval>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_type: Option<String>,
}

impl CycleTimeRecord {
    pub fn is_resolved(&self) -> bool {
        self.resolved.is_some()
    }

    /// Attach the descriptive fields a source may carry alongside the issue.
    pub fn with_details(
        mut self,
        assignee: Option<String>,
        priority: Option<String>,
        issue_type: Option<String>,
    ) -> Self {
        self.assignee = assignee;
        self.priority = priority;
        self.issue_type = issue_type;
        self
    }
}
