//! Jira connection settings.

use std::time::Duration;

use crate::error::JiraError;
use crate::Result;

/// Largest page the Jira search endpoints accept.
pub const MAX_PAGE_SIZE: usize = 100;

/// Jira connection and request-pacing configuration
#[derive(Debug, Clone)]
pub struct JiraConfig {
    /// Base URL, e.g. `https://your-company.atlassian.net`
    pub base_url: String,
    /// Account e-mail used for basic auth
    pub username: String,
    /// API token (not the account password)
    pub api_token: String,
    /// Client-side request budget
    pub requests_per_minute: u32,
    /// Attempts per request, including the first
    pub max_retries: u32,
    /// First backoff step; doubles on every retry
    pub base_backoff: Duration,
    /// Issues requested per search page
    pub page_size: usize,
}

impl Default for JiraConfig {
    fn default() -> Self {
        JiraConfig {
            base_url: std::env::var("JIRA_URL").unwrap_or_default(),
            username: std::env::var("JIRA_USERNAME").unwrap_or_default(),
            api_token: std::env::var("JIRA_API_TOKEN").unwrap_or_default(),
            requests_per_minute: 60,
            max_retries: 5,
            base_backoff: Duration::from_secs(1),
            page_size: MAX_PAGE_SIZE,
        }
    }
}

impl JiraConfig {
    /// Create a new config from environment variables
    pub fn from_env() -> Self {
        Self::default()
    }

    /// Create config for a specific site and account
    pub fn new(base_url: &str, username: &str, api_token: &str) -> Self {
        JiraConfig {
            base_url: base_url.trim_end_matches('/').to_string(),
            username: username.to_string(),
            api_token: api_token.to_string(),
            ..Self::default()
        }
    }

    /// Set the request budget
    pub fn with_rate_limit(mut self, requests_per_minute: u32) -> Self {
        self.requests_per_minute = requests_per_minute;
        self
    }

    /// Set retry attempts and the first backoff step
    pub fn with_retries(mut self, max_retries: u32, base_backoff: Duration) -> Self {
        self.max_retries = max_retries;
        self.base_backoff = base_backoff;
        self
    }

    /// Set the search page size (clamped to `1..=100`)
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        self
    }

    /// Minimum spacing between two requests
    pub fn request_interval(&self) -> Duration {
        Duration::from_secs_f64(60.0 / f64::from(self.requests_per_minute.max(1)))
    }

    /// Reject configs that cannot produce a working client
    pub fn validate(&self) -> Result<()> {
        if self.base_url.is_empty() {
            return Err(JiraError::Config("base URL is empty (set JIRA_URL or --url)".into()));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(JiraError::Config(format!(
                "base URL must start with http:// or https://: {}",
                self.base_url
            )));
        }
        if self.username.is_empty() {
            return Err(JiraError::Config(
                "username is empty (set JIRA_USERNAME or --username)".into(),
            ));
        }
        if self.api_token.is_empty() {
            return Err(JiraError::Config(
                "API token required (set JIRA_API_TOKEN or --token)".into(),
            ));
        }
        if self.requests_per_minute == 0 {
            return Err(JiraError::Config("rate limit must be at least 1 request/minute".into()));
        }
        if self.max_retries == 0 {
            return Err(JiraError::Config("max retries must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_trims_trailing_slash() {
        let config = JiraConfig::new("https://example.atlassian.net/", "me@example.com", "tok");
        assert_eq!(config.base_url, "https://example.atlassian.net");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn request_interval_follows_rate_limit() {
        let config = JiraConfig::new("https://x", "u", "t").with_rate_limit(120);
        assert_eq!(config.request_interval(), Duration::from_millis(500));
    }

    #[test]
    fn missing_token_is_rejected() {
        let config = JiraConfig::new("https://x", "u", "");
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("API token required"));
    }

    #[test]
    fn bad_scheme_is_rejected() {
        let config = JiraConfig::new("example.atlassian.net", "u", "t");
        assert!(matches!(config.validate(), Err(JiraError::Config(_))));
    }

    #[test]
    fn page_size_is_clamped() {
        let config = JiraConfig::new("https://x", "u", "t").with_page_size(500);
        assert_eq!(config.page_size, MAX_PAGE_SIZE);
        let config = config.with_page_size(0);
        assert_eq!(config.page_size, 1);
    }
}
