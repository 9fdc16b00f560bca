//! Jira Source
//!
//! Fetches issues and their status changelogs from the Jira Cloud REST API
//! and hands them to the cycle-time pipeline as [`cycletime_core::RawIssue`]s.
//!
//! ## Features
//!
//! - Token-paginated `/search/jql` with fallback to offset-paginated `/search`
//! - Client-side request pacing
//! - Retry with exponential backoff and jitter on 5xx and transport errors
//! - `Retry-After` handling for 429 responses

mod client;
pub mod config;
pub mod error;
pub mod types;

pub use client::JiraClient;
pub use config::{JiraConfig, MAX_PAGE_SIZE};
pub use error::JiraError;

/// Result type for Jira operations
pub type Result<T> = std::result::Result<T, JiraError>;
