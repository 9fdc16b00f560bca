//! Issue source abstraction.
//!
//! The core never talks to a tracker. Anything that can hand over raw issue
//! records implements [`IssueSource`]; the pipeline only sees `RawIssue`
//! values. In-memory fakes are provided for testing via the `fakes` module.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::info;

use crate::domain::RawIssue;
use crate::error::SourceError;

/// Result type for source operations.
pub type SourceResult<T> = std::result::Result<T, SourceError>;

/// Supplier of raw issue records.
#[async_trait]
pub trait IssueSource: Send + Sync {
    /// Return up to `max_results` issues matching `query`, changelogs
    /// included. The query language is source-specific.
    async fn fetch(&self, query: &str, max_results: usize) -> SourceResult<Vec<RawIssue>>;
}

/// Reads a JSON array of [`RawIssue`] from disk.
///
/// The query is ignored; the file already represents one query's results.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl IssueSource for JsonFileSource {
    async fn fetch(&self, _query: &str, max_results: usize) -> SourceResult<Vec<RawIssue>> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        let mut issues: Vec<RawIssue> = serde_json::from_str(&content).map_err(|e| {
            SourceError::InvalidPayload(format!("{}: {}", self.path.display(), e))
        })?;
        issues.truncate(max_results);
        info!(path = %self.path.display(), issues = issues.len(), "loaded issues from file");
        Ok(issues)
    }
}

/// Write raw issues as pretty JSON in the format [`JsonFileSource`] reads.
pub fn write_raw_issues(path: &Path, issues: &[RawIssue]) -> crate::error::Result<()> {
    let content = serde_json::to_string_pretty(issues)?;
    std::fs::write(path, content)?;
    Ok(())
}
