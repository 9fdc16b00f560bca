//! Per-issue and batch cycle-time processing.
//!
//! Wires the stages together: raw record → parsed timestamps and events →
//! [`ChangelogIntervalBuilder`] → [`CycleTimeAggregator`] → record. Issues
//! are independent; a failing issue is skipped and logged while the rest of
//! the batch continues.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;

use crate::aggregate::{round_to, CycleTimeAggregator};
use crate::config::{CycleStatuses, CycleTimeConfig};
use crate::domain::{CycleTimeRecord, RawIssue};
use crate::error::{CycleTimeError, Result};
use crate::intervals::ChangelogIntervalBuilder;
use crate::metrics::METRICS;
use crate::obs::{emit_batch_finished, emit_batch_started, emit_issue_computed, emit_issue_skipped};
use crate::source::IssueSource;
use crate::timestamp::{parse_optional_timestamp, parse_timestamp};

/// An issue that could not be computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueFailure {
    pub key: String,
    pub error: String,
}

/// Records and skipped issues from one batch, both in input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchOutcome {
    pub records: Vec<CycleTimeRecord>,
    pub failures: Vec<IssueFailure>,
}

impl BatchOutcome {
    pub fn total(&self) -> usize {
        self.records.len() + self.failures.len()
    }
}

/// Closing summary of a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total_issues: usize,
    pub computed: usize,
    pub skipped: usize,
    pub average_cycle_time_hours: f64,
    pub average_cycle_time_days: f64,
    pub statuses: Vec<String>,
}

impl BatchSummary {
    pub fn new(outcome: &BatchOutcome, statuses: &CycleStatuses) -> Self {
        let computed = outcome.records.len();
        let average_hours = if computed == 0 {
            0.0
        } else {
            outcome
                .records
                .iter()
                .map(|r| r.cycle_time_hours)
                .sum::<f64>()
                / computed as f64
        };

        Self {
            total_issues: outcome.total(),
            computed,
            skipped: outcome.failures.len(),
            average_cycle_time_hours: round_to(average_hours, 1),
            average_cycle_time_days: round_to(average_hours / 24.0, 1),
            statuses: statuses.names().to_vec(),
        }
    }

    /// Human-readable summary block for terminal output.
    pub fn render(&self) -> String {
        let mut out = String::from("Summary:\n");
        out.push_str(&format!("Total issues: {}\n", self.total_issues));
        if self.skipped > 0 {
            out.push_str(&format!("Skipped issues: {}\n", self.skipped));
        }
        out.push_str(&format!(
            "Average cycle time: {:.1} hours ({:.1} days)\n",
            self.average_cycle_time_hours, self.average_cycle_time_days
        ));
        out.push_str(&format!("Cycle time statuses: {}\n", self.statuses.join(", ")));
        out
    }
}

/// Cycle-time computation over raw issue records.
#[derive(Debug, Clone)]
pub struct CycleTimePipeline {
    aggregator: CycleTimeAggregator,
}

impl CycleTimePipeline {
    pub fn new(config: &CycleTimeConfig) -> Self {
        Self {
            aggregator: CycleTimeAggregator::new(config),
        }
    }

    pub fn statuses(&self) -> &CycleStatuses {
        self.aggregator.statuses()
    }

    /// Compute the record for one issue as of `now`.
    ///
    /// Fails with `MalformedTimestamp` when `created`, `resolved` or any
    /// status transition timestamp is unparseable or lacks an offset.
    pub fn process_issue(&self, raw: &RawIssue, now: DateTime<Utc>) -> Result<CycleTimeRecord> {
        let created = parse_timestamp("created", &raw.created)?;
        let resolved = parse_optional_timestamp("resolved", raw.resolved.as_deref())?;
        let events = raw.status_events()?;

        let intervals = ChangelogIntervalBuilder::build(created, &raw.status, events, resolved, now);
        let record = self
            .aggregator
            .aggregate(
                &raw.key,
                &raw.summary,
                intervals,
                &raw.status,
                created,
                resolved,
            )
            .with_details(
                raw.assignee.clone(),
                raw.priority.clone(),
                raw.issue_type.clone(),
            );

        METRICS.inc_issues_processed();
        METRICS.add_intervals_built(record.intervals.len() as u64);
        emit_issue_computed(&record.key, record.cycle_time_hours, record.intervals.len());
        Ok(record)
    }

    /// Compute every issue sequentially, skipping and logging failures.
    pub fn process_batch(&self, raws: &[RawIssue], now: DateTime<Utc>) -> BatchOutcome {
        let started = Instant::now();
        emit_batch_started(raws.len(), &now.to_rfc3339());

        let results = raws
            .iter()
            .map(|raw| (raw.key.clone(), self.process_issue(raw, now)))
            .collect();
        let outcome = collect_outcome(results);

        emit_batch_finished(
            outcome.records.len(),
            outcome.failures.len(),
            started.elapsed().as_millis() as u64,
        );
        outcome
    }

    /// Compute a batch on up to `workers` blocking tasks.
    ///
    /// Produces the same outcome, in the same order, as [`process_batch`].
    ///
    /// [`process_batch`]: CycleTimePipeline::process_batch
    pub async fn process_batch_concurrent(
        self: Arc<Self>,
        raws: Vec<RawIssue>,
        now: DateTime<Utc>,
        workers: usize,
    ) -> Result<BatchOutcome> {
        let started = Instant::now();
        emit_batch_started(raws.len(), &now.to_rfc3339());

        let workers = workers.max(1);
        let chunk_size = raws.len().div_ceil(workers).max(1);

        let mut chunks: Vec<Vec<RawIssue>> = Vec::new();
        let mut iter = raws.into_iter();
        loop {
            let chunk: Vec<RawIssue> = iter.by_ref().take(chunk_size).collect();
            if chunk.is_empty() {
                break;
            }
            chunks.push(chunk);
        }

        let mut tasks: Vec<JoinHandle<Vec<(String, Result<CycleTimeRecord>)>>> = Vec::new();
        for chunk in chunks {
            let pipeline = Arc::clone(&self);
            tasks.push(tokio::task::spawn_blocking(move || {
                chunk
                    .iter()
                    .map(|raw| (raw.key.clone(), pipeline.process_issue(raw, now)))
                    .collect()
            }));
        }

        let mut results = Vec::new();
        for task in tasks {
            let chunk_results = task
                .await
                .map_err(|e| CycleTimeError::Worker(e.to_string()))?;
            results.extend(chunk_results);
        }
        let outcome = collect_outcome(results);

        emit_batch_finished(
            outcome.records.len(),
            outcome.failures.len(),
            started.elapsed().as_millis() as u64,
        );
        Ok(outcome)
    }

    /// Fetch issues from `source` and compute them sequentially.
    ///
    /// Source failures abort; per-issue failures are skipped.
    pub async fn process_source(
        &self,
        source: &dyn IssueSource,
        query: &str,
        max_results: usize,
        now: DateTime<Utc>,
    ) -> Result<BatchOutcome> {
        let raws = source.fetch(query, max_results).await?;
        Ok(self.process_batch(&raws, now))
    }
}

fn collect_outcome(results: Vec<(String, Result<CycleTimeRecord>)>) -> BatchOutcome {
    let mut outcome = BatchOutcome::default();
    for (key, result) in results {
        match result {
            Ok(record) => outcome.records.push(record),
            Err(err) => {
                METRICS.inc_issues_skipped();
                emit_issue_skipped(&key, &err);
                outcome.failures.push(IssueFailure {
                    key,
                    error: err.to_string(),
                });
            }
        }
    }
    outcome
}
