//! Status interval reconstruction from an issue changelog.
//!
//! Trackers record transitions, not spans. This module turns the creation
//! time, the transitions and the issue's end state into a contiguous list of
//! `[start, end)` intervals, one per status held:
//!
//! ```text
//! created          e0            e1                 resolved / now
//!    |--- from(e0) --|--- to(e0) --|----- to(e1) -------|
//! ```
//!
//! The tracker never records the status an issue was created in; it is
//! inferred as the `from_status` of the earliest transition, falling back to
//! the current status when the issue never moved.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::domain::{StatusChangeEvent, StatusInterval};

/// Builds the interval sequence for a single issue.
pub struct ChangelogIntervalBuilder;

impl ChangelogIntervalBuilder {
    /// Reconstruct the status intervals covering `[created, resolved)` for a
    /// resolved issue, or `[created, now)` for an open one.
    ///
    /// `events` may arrive in any order; they are stably sorted by timestamp,
    /// so transitions sharing a timestamp keep their fetch order.
    ///
    /// Each transition is trusted on its own: the span it closes is labelled
    /// with its `from_status`, even when that disagrees with the status the
    /// previous transition moved into. The mismatch is logged, not corrected.
    pub fn build(
        created: DateTime<Utc>,
        current_status: &str,
        mut events: Vec<StatusChangeEvent>,
        resolved: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Vec<StatusInterval> {
        events.sort_by_key(|e| e.timestamp);

        let mut boundary_status = match events.first() {
            Some(first) => first.from_status.clone(),
            None => current_status.to_string(),
        };
        let mut boundary_start = created;
        let mut intervals = Vec::with_capacity(events.len() + 1);

        for event in events {
            if event.from_status != boundary_status {
                debug!(
                    expected = %boundary_status,
                    recorded = %event.from_status,
                    at = %event.timestamp,
                    "changelog discontinuity"
                );
            }
            intervals.push(StatusInterval::closed(
                event.from_status,
                boundary_start,
                event.timestamp,
            ));
            boundary_status = event.to_status;
            boundary_start = event.timestamp;
        }

        let trailing = match resolved {
            Some(end) => StatusInterval::closed(boundary_status, boundary_start, end),
            None => StatusInterval::open(boundary_status, boundary_start, now),
        };
        intervals.push(trailing);
        intervals
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, hour, 0, 0).unwrap()
    }

    fn ev(at: DateTime<Utc>, from: &str, to: &str) -> StatusChangeEvent {
        StatusChangeEvent::new(at, from, to)
    }

    #[test]
    fn zero_events_yields_single_open_interval() {
        let intervals = ChangelogIntervalBuilder::build(t(1, 0), "Done", vec![], None, t(3, 0));
        assert_eq!(
            intervals,
            vec![StatusInterval::open("Done", t(1, 0), t(3, 0))]
        );
    }

    #[test]
    fn zero_events_resolved_closes_at_resolution() {
        let intervals =
            ChangelogIntervalBuilder::build(t(1, 0), "Done", vec![], Some(t(2, 0)), t(5, 0));
        assert_eq!(
            intervals,
            vec![StatusInterval::closed("Done", t(1, 0), t(2, 0))]
        );
    }

    #[test]
    fn single_transition_splits_lifetime() {
        let intervals = ChangelogIntervalBuilder::build(
            t(1, 0),
            "Doing",
            vec![ev(t(2, 0), "To Do", "Doing")],
            None,
            t(3, 0),
        );
        assert_eq!(
            intervals,
            vec![
                StatusInterval::closed("To Do", t(1, 0), t(2, 0)),
                StatusInterval::open("Doing", t(2, 0), t(3, 0)),
            ]
        );
    }

    #[test]
    fn unsorted_events_are_sorted() {
        let intervals = ChangelogIntervalBuilder::build(
            t(1, 0),
            "Done",
            vec![
                ev(t(4, 0), "Review", "Done"),
                ev(t(2, 0), "To Do", "Doing"),
                ev(t(3, 0), "Doing", "Review"),
            ],
            Some(t(4, 0)),
            t(9, 0),
        );
        let statuses: Vec<&str> = intervals.iter().map(|i| i.status.as_str()).collect();
        assert_eq!(statuses, vec!["To Do", "Doing", "Review", "Done"]);
        for pair in intervals.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
    }

    #[test]
    fn equal_timestamps_keep_fetch_order() {
        let intervals = ChangelogIntervalBuilder::build(
            t(1, 0),
            "Review",
            vec![
                ev(t(2, 0), "To Do", "Doing"),
                ev(t(2, 0), "Doing", "Review"),
            ],
            None,
            t(3, 0),
        );
        let statuses: Vec<&str> = intervals.iter().map(|i| i.status.as_str()).collect();
        assert_eq!(statuses, vec!["To Do", "Doing", "Review"]);
        assert_eq!(intervals[1].duration(), chrono::Duration::zero());
    }

    #[test]
    fn discontinuity_trusts_event_from_status() {
        let intervals = ChangelogIntervalBuilder::build(
            t(1, 0),
            "Done",
            vec![
                ev(t(2, 0), "To Do", "Doing"),
                // Tracker claims the issue left "Review" although it entered "Doing".
                ev(t(3, 0), "Review", "Done"),
            ],
            None,
            t(4, 0),
        );
        assert_eq!(
            intervals,
            vec![
                StatusInterval::closed("To Do", t(1, 0), t(2, 0)),
                StatusInterval::closed("Review", t(2, 0), t(3, 0)),
                StatusInterval::open("Done", t(3, 0), t(4, 0)),
            ]
        );
        assert_eq!(intervals[1].status, "Review");
        assert_eq!(intervals[1].end, intervals[2].start);
    }

    #[test]
    fn first_interval_starts_at_creation() {
        let intervals = ChangelogIntervalBuilder::build(
            t(1, 5),
            "Doing",
            vec![ev(t(2, 0), "Backlog", "Doing")],
            None,
            t(3, 0),
        );
        assert_eq!(intervals[0].start, t(1, 5));
        assert_eq!(intervals[0].status, "Backlog");
    }
}
