//! Cycletime Core Library
//!
//! Reconstructs per-status time intervals from an issue changelog and sums
//! the time spent in a configured set of active-work statuses.
//!
//! ## Pipeline
//!
//! data source → [`ChangelogIntervalBuilder`] → [`CycleTimeAggregator`] → sink
//!
//! Every stage communicates through the plain records in [`domain`]; the
//! evaluation instant `now` is always passed in explicitly.

pub mod aggregate;
pub mod config;
pub mod domain;
pub mod error;
pub mod export;
pub mod fakes;
pub mod intervals;
pub mod metrics;
pub mod obs;
pub mod pipeline;
pub mod source;
pub mod telemetry;
pub mod timestamp;

pub use aggregate::{round_to, CycleTimeAggregator};
pub use config::{CycleStatuses, CycleTimeConfig, DEFAULT_CYCLE_STATUSES, DEFAULT_PRECISION};
pub use domain::{
    CycleTimeRecord, RawChangelogEntry, RawIssue, StatusChangeEvent, StatusInterval, STATUS_FIELD,
};
pub use error::{CycleTimeError, Result, SourceError};
pub use export::{
    json_path_for, write_csv, write_csv_file, write_json, write_json_file,
    DetailedRecordArtifact, IntervalArtifact, CSV_COLUMNS,
};
pub use intervals::ChangelogIntervalBuilder;
pub use pipeline::{BatchOutcome, BatchSummary, CycleTimePipeline, IssueFailure};
pub use source::{write_raw_issues, IssueSource, JsonFileSource, SourceResult};
pub use timestamp::{parse_optional_timestamp, parse_timestamp};

pub use metrics::METRICS;
pub use obs::{
    emit_batch_finished, emit_batch_started, emit_export_written, emit_issue_computed,
    emit_issue_skipped, BatchSpan,
};
pub use telemetry::init_tracing;

/// Cycletime version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
