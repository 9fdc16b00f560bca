//! Cycle-time aggregation over status intervals.

use chrono::{DateTime, Duration, Utc};

use crate::config::{CycleStatuses, CycleTimeConfig};
use crate::domain::{CycleTimeRecord, StatusInterval};

const HOURS_PER_DAY: f64 = 24.0;

/// Sums time spent in the configured cycle statuses.
#[derive(Debug, Clone)]
pub struct CycleTimeAggregator {
    statuses: CycleStatuses,
    precision: u32,
}

impl CycleTimeAggregator {
    pub fn new(config: &CycleTimeConfig) -> Self {
        Self {
            statuses: config.statuses.clone(),
            precision: config.precision,
        }
    }

    pub fn statuses(&self) -> &CycleStatuses {
        &self.statuses
    }

    /// Total time spent in cycle statuses. The open trailing interval already
    /// ends at the evaluation instant.
    pub fn cycle_duration(&self, intervals: &[StatusInterval]) -> Duration {
        intervals
            .iter()
            .filter(|iv| self.statuses.contains(&iv.status))
            .fold(Duration::zero(), |acc, iv| acc + iv.duration())
    }

    /// Produce the per-issue record.
    ///
    /// The cycle status set is the one this aggregator was built with, so it
    /// is fixed for a whole batch rather than passed on every call.
    ///
    /// Hours are rounded to the configured precision; days are derived from
    /// the unrounded hours and rounded the same way.
    pub fn aggregate(
        &self,
        issue_key: &str,
        summary: &str,
        intervals: Vec<StatusInterval>,
        current_status: &str,
        created: DateTime<Utc>,
        resolved: Option<DateTime<Utc>>,
    ) -> CycleTimeRecord {
        let total = self.cycle_duration(&intervals);
        let hours = total.num_milliseconds().max(0) as f64 / 3_600_000.0;

        CycleTimeRecord {
            key: issue_key.to_string(),
            summary: summary.to_string(),
            cycle_time_hours: round_to(hours, self.precision),
            cycle_time_days: round_to(hours / HOURS_PER_DAY, self.precision),
            status: current_status.to_string(),
            created,
            resolved,
            intervals,
            assignee: None,
            priority: None,
            issue_type: None,
        }
    }
}

/// Round half away from zero to `precision` decimal places.
pub fn round_to(value: f64, precision: u32) -> f64 {
    let factor = 10f64.powi(precision as i32);
    let rounded = (value * factor).round() / factor;
    // Normalize -0.0 so output never shows a negative zero.
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}
