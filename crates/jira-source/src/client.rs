//! Jira REST client
//!
//! Fetches issues with their changelogs from Jira Cloud (REST API v3),
//! pacing requests client-side and retrying transient failures.

use std::time::Duration;

use async_trait::async_trait;
use cycletime_core::{IssueSource, RawIssue, SourceResult};
use rand::Rng;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::config::JiraConfig;
use crate::error::JiraError;
use crate::types::{JiraIssue, JqlSearchPage, SearchPage, ISSUE_FIELDS};
use crate::Result;

/// Wait used for a 429 without a usable `Retry-After` header.
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Jira client for issue + changelog retrieval
pub struct JiraClient {
    config: JiraConfig,
    http_client: reqwest::Client,
    last_request: Mutex<Option<Instant>>,
}

impl JiraClient {
    /// Create a new Jira client
    pub fn new(config: JiraConfig) -> Result<Self> {
        config.validate()?;
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("cycletime-jira-source/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(60))
            .build()?;

        Ok(JiraClient {
            config,
            http_client,
            last_request: Mutex::new(None),
        })
    }

    /// Create client from environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(JiraConfig::from_env())
    }

    pub fn config(&self) -> &JiraConfig {
        &self.config
    }

    /// Fetch up to `max_results` issues matching `jql`, changelogs included.
    ///
    /// Uses the token-paginated JQL endpoint and falls back to the
    /// offset-paginated search endpoint if it fails.
    pub async fn fetch_issues(&self, jql: &str, max_results: usize) -> Result<Vec<RawIssue>> {
        info!(jql = %jql, max_results = max_results, "fetching issues");
        match self.search_jql(jql, max_results).await {
            Ok(issues) => Ok(issues),
            Err(err) => {
                warn!(error = %err, "JQL search endpoint failed, falling back to search API");
                self.search_legacy(jql, max_results).await
            }
        }
    }

    /// `GET /rest/api/3/search/jql`, then one detail request per issue.
    pub async fn search_jql(&self, jql: &str, max_results: usize) -> Result<Vec<RawIssue>> {
        let mut issues = Vec::new();
        let mut next_page_token: Option<String> = None;

        while issues.len() < max_results {
            let remaining = max_results - issues.len();
            let mut params = vec![
                ("jql", jql.to_string()),
                ("maxResults", remaining.min(self.config.page_size).to_string()),
                ("expand", "changelog".to_string()),
                ("fields", ISSUE_FIELDS.to_string()),
            ];
            if let Some(token) = &next_page_token {
                params.push(("nextPageToken", token.clone()));
            }

            let page: JqlSearchPage = self.get_json("/rest/api/3/search/jql", &params).await?;
            debug!(issues = page.issues.len(), is_last = ?page.is_last, "jql page");
            if page.issues.is_empty() {
                break;
            }

            for issue_ref in page.issues.iter().take(remaining) {
                match self.get_issue(&issue_ref.id).await {
                    Ok(issue) => issues.push(issue),
                    Err(err) => {
                        warn!(issue_id = %issue_ref.id, error = %err, "skipping issue detail");
                    }
                }
            }

            match page.next_page_token {
                Some(token) if !page.is_last.unwrap_or(true) => next_page_token = Some(token),
                _ => break,
            }
        }

        info!(issues = issues.len(), "fetched issues via JQL endpoint");
        Ok(issues)
    }

    /// `GET /rest/api/3/search` with `startAt` paging; issues arrive with
    /// their changelogs embedded.
    pub async fn search_legacy(&self, jql: &str, max_results: usize) -> Result<Vec<RawIssue>> {
        let mut issues = Vec::new();
        let mut start_at = 0usize;

        while issues.len() < max_results {
            let remaining = max_results - issues.len();
            let params = vec![
                ("jql", jql.to_string()),
                ("maxResults", remaining.min(self.config.page_size).to_string()),
                ("startAt", start_at.to_string()),
                ("expand", "changelog".to_string()),
                ("fields", ISSUE_FIELDS.to_string()),
            ];

            let page: SearchPage = self.get_json("/rest/api/3/search", &params).await?;
            let page_len = page.issues.len();
            debug!(issues = page_len, start_at = start_at, total = page.total, "search page");
            if page_len == 0 {
                break;
            }

            for issue in page.issues.into_iter().take(remaining) {
                let key = issue.key.clone();
                match RawIssue::try_from(issue) {
                    Ok(raw) => issues.push(raw),
                    Err(err) => warn!(key = %key, error = %err, "skipping unmappable issue"),
                }
            }

            start_at += page_len;
            if page.total <= start_at {
                break;
            }
        }

        info!(issues = issues.len(), "fetched issues via search endpoint");
        Ok(issues)
    }

    /// `GET /rest/api/3/issue/{id}?expand=changelog`
    pub async fn get_issue(&self, id_or_key: &str) -> Result<RawIssue> {
        let params = vec![
            ("expand", "changelog".to_string()),
            ("fields", ISSUE_FIELDS.to_string()),
        ];
        let issue: JiraIssue = self
            .get_json(&format!("/rest/api/3/issue/{}", id_or_key), &params)
            .await?;
        RawIssue::try_from(issue)
    }

    /// Hold the caller until the configured request spacing has elapsed.
    async fn rate_limit(&self) {
        let interval = self.config.request_interval();
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < interval {
                tokio::time::sleep(interval - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }

    /// GET `path` with basic auth and decode the JSON body, retrying 429,
    /// 5xx and transport failures.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let url = format!("{}{}", self.config.base_url, path);
        let max_retries = self.config.max_retries;
        let mut last_error = String::new();

        for attempt in 0..max_retries {
            self.rate_limit().await;

            let response = self
                .http_client
                .get(&url)
                .basic_auth(&self.config.username, Some(&self.config.api_token))
                .query(params)
                .send()
                .await;

            match response {
                Ok(resp) if resp.status() == StatusCode::TOO_MANY_REQUESTS => {
                    let retry_after = resp
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|v| v.trim().parse::<u64>().ok())
                        .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
                    let wait = Duration::from_secs(retry_after) + jitter(0.1, 0.5);
                    warn!(
                        wait_secs = wait.as_secs_f64(),
                        attempt = attempt + 1,
                        max_retries = max_retries,
                        "rate limited (429)"
                    );
                    last_error = "429 Too Many Requests".to_string();
                    tokio::time::sleep(wait).await;
                }
                Ok(resp) if resp.status().is_server_error() => {
                    let status = resp.status();
                    let body = resp.text().await.unwrap_or_default();
                    if attempt + 1 == max_retries {
                        return Err(JiraError::Status {
                            status: status.as_u16(),
                            body,
                        });
                    }
                    let wait = self.backoff(attempt);
                    warn!(
                        status = status.as_u16(),
                        wait_secs = wait.as_secs_f64(),
                        attempt = attempt + 1,
                        max_retries = max_retries,
                        "server error, retrying"
                    );
                    last_error = format!("{} {}", status.as_u16(), body);
                    tokio::time::sleep(wait).await;
                }
                Ok(resp) if !resp.status().is_success() => {
                    let status = resp.status().as_u16();
                    let body = resp.text().await.unwrap_or_default();
                    return Err(JiraError::Status { status, body });
                }
                Ok(resp) => {
                    let body = resp.text().await?;
                    return Ok(serde_json::from_str(&body)?);
                }
                Err(err) => {
                    if attempt + 1 == max_retries {
                        return Err(JiraError::RetriesExhausted {
                            attempts: max_retries,
                            last_error: err.to_string(),
                        });
                    }
                    let wait = self.backoff(attempt);
                    warn!(
                        error = %err,
                        wait_secs = wait.as_secs_f64(),
                        attempt = attempt + 1,
                        max_retries = max_retries,
                        "request failed, retrying"
                    );
                    last_error = err.to_string();
                    tokio::time::sleep(wait).await;
                }
            }
        }

        Err(JiraError::RetriesExhausted {
            attempts: max_retries,
            last_error,
        })
    }

    /// `base * 2^attempt` plus up to one `base` of jitter.
    fn backoff(&self, attempt: u32) -> Duration {
        let base = self.config.base_backoff.as_secs_f64();
        let exp = base * 2f64.powi(attempt as i32);
        Duration::from_secs_f64(exp) + jitter(0.0, base)
    }
}

/// Uniform random delay in `[low, high)` seconds.
fn jitter(low: f64, high: f64) -> Duration {
    if high <= low {
        return Duration::from_secs_f64(low.max(0.0));
    }
    Duration::from_secs_f64(rand::rng().random_range(low..high))
}

#[async_trait]
impl IssueSource for JiraClient {
    async fn fetch(&self, query: &str, max_results: usize) -> SourceResult<Vec<RawIssue>> {
        Ok(self.fetch_issues(query, max_results).await?)
    }
}
