//! Domain records for cycle-time computation.
//!
//! Canonical definitions for the records that flow through the pipeline:
//! - `RawIssue`: issue + changelog as delivered by a data source
//! - `StatusChangeEvent`: a parsed, UTC-normalized status transition
//! - `StatusInterval`: a span of time an issue held one status
//! - `CycleTimeRecord`: the per-issue metric handed to sinks

pub mod event;
pub mod interval;
pub mod issue;
pub mod record;

pub use event::StatusChangeEvent;
pub use interval::StatusInterval;
pub use issue::{RawChangelogEntry, RawIssue, STATUS_FIELD};
pub use record::CycleTimeRecord;
