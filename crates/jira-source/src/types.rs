//! Jira REST API v3 response shapes and their mapping to [`RawIssue`].
//!
//! Only the fields the cycle-time computation and the detailed export need
//! are modelled; everything else in the payload is ignored.

use cycletime_core::{RawChangelogEntry, RawIssue};
use serde::Deserialize;

use crate::error::JiraError;
use crate::Result;

/// Fields requested from every search/issue endpoint.
pub const ISSUE_FIELDS: &str = "key,summary,status,created,resolutiondate,assignee,priority,issuetype";

/// Page from `GET /rest/api/3/search/jql` (token-paginated, ids only).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JqlSearchPage {
    #[serde(default)]
    pub issues: Vec<IssueRef>,
    #[serde(default)]
    pub is_last: Option<bool>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// Issue reference returned by the JQL search endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct IssueRef {
    pub id: String,
}

/// Page from `GET /rest/api/3/search` (offset-paginated, full issues).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage {
    #[serde(default)]
    pub issues: Vec<JiraIssue>,
    #[serde(default)]
    pub total: usize,
    #[serde(default)]
    pub start_at: usize,
}

/// Issue as returned with `expand=changelog`.
#[derive(Debug, Clone, Deserialize)]
pub struct JiraIssue {
    #[serde(default)]
    pub id: Option<String>,
    pub key: String,
    pub fields: JiraFields,
    #[serde(default)]
    pub changelog: Option<Changelog>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct JiraFields {
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub status: Option<Named>,
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default)]
    pub resolutiondate: Option<String>,
    #[serde(default)]
    pub assignee: Option<Person>,
    #[serde(default)]
    pub priority: Option<Named>,
    #[serde(default)]
    pub issuetype: Option<Named>,
}

/// Any Jira object identified by a display `name` (status, priority, type).
#[derive(Debug, Clone, Deserialize)]
pub struct Named {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    #[serde(default)]
    pub display_name: Option<String>,
}

// TODO: page through /rest/api/3/issue/{id}/changelog when `total` exceeds the
// histories embedded by `expand=changelog`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Changelog {
    #[serde(default)]
    pub histories: Vec<History>,
}

/// One changelog entry; all items share its timestamp.
#[derive(Debug, Clone, Deserialize)]
pub struct History {
    pub created: String,
    #[serde(default)]
    pub items: Vec<HistoryItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HistoryItem {
    pub field: String,
    #[serde(default, rename = "fromString")]
    pub from: Option<String>,
    #[serde(default, rename = "toString")]
    pub to: Option<String>,
}

impl TryFrom<JiraIssue> for RawIssue {
    type Error = JiraError;

    /// Flatten a Jira issue into the source-neutral record.
    ///
    /// Timestamps are passed through untouched; parsing (and rejecting
    /// malformed values) is the pipeline's job. A missing status name fails
    /// the conversion since no fallback exists for it.
    fn try_from(issue: JiraIssue) -> Result<Self> {
        let fields = issue.fields;
        let status = fields
            .status
            .map(|s| s.name)
            .ok_or_else(|| JiraError::MissingField(format!("{}: fields.status.name", issue.key)))?;

        let changelog = issue
            .changelog
            .unwrap_or_default()
            .histories
            .into_iter()
            .flat_map(|history| {
                let timestamp = history.created;
                history.items.into_iter().map(move |item| RawChangelogEntry {
                    timestamp: timestamp.clone(),
                    field: item.field,
                    from: item.from,
                    to: item.to,
                })
            })
            .collect();

        Ok(RawIssue {
            key: issue.key,
            summary: fields.summary.unwrap_or_default(),
            status,
            created: fields.created.unwrap_or_default(),
            resolved: fields.resolutiondate,
            changelog,
            assignee: fields.assignee.and_then(|a| a.display_name),
            priority: fields.priority.map(|p| p.name),
            issue_type: fields.issuetype.map(|t| t.name),
        })
    }
}
