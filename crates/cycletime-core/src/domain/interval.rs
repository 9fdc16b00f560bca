//! Status intervals.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Half-open span `[start, end)` during which an issue held `status`.
///
/// The trailing interval of an unresolved issue is `open`: its `end` is the
/// evaluation instant rather than a historical timestamp, so evaluating the
/// same issue later yields a longer interval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusInterval {
    pub status: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default)]
    pub open: bool,
}

impl StatusInterval {
    /// Interval with a fixed historical end.
    pub fn closed(status: impl Into<String>, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            status: status.into(),
            start,
            end,
            open: false,
        }
    }

    /// Ongoing interval, measured up to `now`.
    pub fn open(status: impl Into<String>, start: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        Self {
            status: status.into(),
            start,
            end: now,
            open: true,
        }
    }

    /// Length of the interval. Never negative.
    pub fn duration(&self) -> Duration {
        let span = self.end - self.start;
        if span < Duration::zero() {
            Duration::zero()
        } else {
            span
        }
    }

    /// Length in fractional hours, unrounded.
    pub fn hours(&self) -> f64 {
        self.duration().num_milliseconds() as f64 / 3_600_000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, hour, 0, 0).unwrap()
    }

    #[test]
    fn closed_interval_duration() {
        let iv = StatusInterval::closed("Doing", t(1, 0), t(1, 6));
        assert!(!iv.open);
        assert_eq!(iv.duration(), Duration::hours(6));
        assert!((iv.hours() - 6.0).abs() < f64::EPSILON);
    }

    #[test]
    fn open_interval_ends_at_now() {
        let iv = StatusInterval::open("Doing", t(1, 0), t(3, 0));
        assert!(iv.open);
        assert_eq!(iv.end, t(3, 0));
        assert_eq!(iv.duration(), Duration::hours(48));
    }

    #[test]
    fn inverted_interval_has_zero_duration() {
        let iv = StatusInterval::closed("Doing", t(2, 0), t(1, 0));
        assert_eq!(iv.duration(), Duration::zero());
        assert_eq!(iv.hours(), 0.0);
    }
}
