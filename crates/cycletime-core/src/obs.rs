//! Structured observability hooks for batch and issue lifecycle events.
//!
//! - Batch-scoped tracing spans via the `BatchSpan` RAII guard
//! - Emission functions for batch start/finish and per-issue outcomes
//!
//! Filter with `RUST_LOG`; JSON output is selected by the CLI's
//! `--json-logs` flag.

use tracing::info;

/// RAII guard that enters a batch-scoped span for the duration of a run.
///
/// ```ignore
/// let _span = BatchSpan::enter("project = PROJ");
/// // tracing calls below are associated with query = "project = PROJ"
/// ```
pub struct BatchSpan {
    _span: tracing::span::EnteredSpan,
}

impl BatchSpan {
    pub fn enter(query: &str) -> Self {
        let span = tracing::info_span!("cycletime.batch", query = %query);
        Self {
            _span: span.entered(),
        }
    }
}

/// Emit event: batch started with the number of fetched issues.
pub fn emit_batch_started(issue_count: usize, evaluated_at: &str) {
    info!(event = "batch.started", issues = issue_count, now = %evaluated_at);
}

/// Emit event: batch finished.
pub fn emit_batch_finished(records: usize, skipped: usize, duration_ms: u64) {
    info!(
        event = "batch.finished",
        records = records,
        skipped = skipped,
        duration_ms = duration_ms,
    );
}

/// Emit event: one issue computed.
pub fn emit_issue_computed(key: &str, cycle_time_hours: f64, intervals: usize) {
    tracing::debug!(
        event = "issue.computed",
        key = %key,
        cycle_time_hours = cycle_time_hours,
        intervals = intervals,
    );
}

/// Emit event: one issue skipped (warning level).
pub fn emit_issue_skipped(key: &str, error: &dyn std::fmt::Display) {
    tracing::warn!(event = "issue.skipped", key = %key, error = %error);
}

/// Emit event: records written to a sink.
pub fn emit_export_written(path: &str, format: &str, records: usize) {
    info!(event = "export.written", path = %path, format = %format, records = records);
}
