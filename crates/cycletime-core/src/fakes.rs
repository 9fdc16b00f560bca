//! In-memory fakes for the source trait (testing only)

use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::RawIssue;
use crate::error::SourceError;
use crate::source::{IssueSource, SourceResult};

/// In-memory issue source backed by a `Vec<RawIssue>`.
///
/// Records every query it receives; can be switched into a failing mode to
/// exercise batch-level error paths.
#[derive(Debug, Default)]
pub struct MemoryIssueSource {
    issues: Vec<RawIssue>,
    fail_with: Option<String>,
    queries: Mutex<Vec<String>>,
}

impl MemoryIssueSource {
    pub fn new(issues: Vec<RawIssue>) -> Self {
        Self {
            issues,
            ..Self::default()
        }
    }

    /// A source whose every fetch fails with `SourceError::Unavailable`.
    pub fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            ..Self::default()
        }
    }

    /// Queries received so far, in call order.
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl IssueSource for MemoryIssueSource {
    async fn fetch(&self, query: &str, max_results: usize) -> SourceResult<Vec<RawIssue>> {
        self.queries.lock().unwrap().push(query.to_string());
        if let Some(message) = &self.fail_with {
            return Err(SourceError::Unavailable(message.clone()));
        }
        Ok(self.issues.iter().take(max_results).cloned().collect())
    }
}
