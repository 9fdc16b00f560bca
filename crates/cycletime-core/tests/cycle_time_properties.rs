//! Behavioural properties of interval reconstruction and aggregation.
//!
//! Fixed scenarios pin the documented examples; the proptest blocks check
//! coverage and non-negativity across generated changelogs.

use chrono::{DateTime, Duration, TimeZone, Utc};
use cycletime_core::{
    ChangelogIntervalBuilder, CycleStatuses, CycleTimeAggregator, CycleTimeConfig,
    CycleTimePipeline, RawIssue, StatusChangeEvent, StatusInterval,
};
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn jan(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, day, hour, 0, 0).unwrap()
}

fn aggregator(statuses: &[&str]) -> CycleTimeAggregator {
    let config = CycleTimeConfig::new(CycleStatuses::new(statuses.iter().copied()), 2)
        .expect("valid config");
    CycleTimeAggregator::new(&config)
}

const STATUSES: [&str; 6] = ["To Do", "Doing", "Blocked", "Review", "Done", "doing"];

// ---------------------------------------------------------------------------
// Documented scenarios
// ---------------------------------------------------------------------------

#[test]
fn zero_event_identity() {
    let intervals = ChangelogIntervalBuilder::build(jan(1, 0), "Done", vec![], None, jan(2, 0));
    assert_eq!(intervals.len(), 1);
    assert_eq!(intervals[0].status, "Done");
    assert_eq!(intervals[0].start, jan(1, 0));
    assert_eq!(intervals[0].end, jan(2, 0));
}

#[test]
fn single_transition_open_issue() {
    let events = vec![StatusChangeEvent::new(jan(2, 0), "To Do", "Doing")];
    let intervals = ChangelogIntervalBuilder::build(jan(1, 0), "Doing", events, None, jan(3, 0));
    assert_eq!(
        intervals,
        vec![
            StatusInterval::closed("To Do", jan(1, 0), jan(2, 0)),
            StatusInterval::open("Doing", jan(2, 0), jan(3, 0)),
        ]
    );

    let record = aggregator(&["Doing"]).aggregate(
        "PROJ-1",
        "single transition",
        intervals,
        "Doing",
        jan(1, 0),
        None,
    );
    assert_eq!(record.cycle_time_hours, 24.0);
    assert!(record.resolved.is_none());
}

#[test]
fn resolved_issue_closes_at_resolution_not_now() {
    let events = vec![
        StatusChangeEvent::new(jan(2, 0), "To Do", "Doing"),
        StatusChangeEvent::new(jan(2, 12), "Doing", "Done"),
    ];
    let intervals =
        ChangelogIntervalBuilder::build(jan(1, 0), "Done", events, Some(jan(2, 12)), jan(3, 0));
    let last = intervals.last().unwrap();
    assert_eq!(last.end, jan(2, 12));
    assert!(!last.open);

    let record = aggregator(&["Doing"]).aggregate(
        "PROJ-1",
        "resolved",
        intervals,
        "Done",
        jan(1, 0),
        Some(jan(2, 12)),
    );
    assert_eq!(record.cycle_time_hours, 12.0);
    assert_eq!(record.cycle_time_days, 0.5);
    assert_eq!(record.resolved, Some(jan(2, 12)));
}

#[test]
fn same_inputs_same_now_are_identical() {
    let raw = RawIssue::new("PROJ-9", "idempotent", "Review", "2024-01-01T00:00:00.000+0000")
        .with_transition("2024-01-01T09:13:27.512+0000", "To Do", "Doing")
        .with_transition("2024-01-02T17:45:00.001+0000", "Doing", "Review");
    let pipeline = CycleTimePipeline::new(&CycleTimeConfig::default());

    let a = pipeline.process_issue(&raw, jan(5, 0)).unwrap();
    let b = pipeline.process_issue(&raw, jan(5, 0)).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.cycle_time_hours.to_bits(), b.cycle_time_hours.to_bits());
    assert_eq!(a.cycle_time_days.to_bits(), b.cycle_time_days.to_bits());
}

#[test]
fn open_interval_grows_on_later_evaluation() {
    let raw = RawIssue::new("PROJ-10", "ongoing", "Doing", "2024-01-01T00:00:00Z")
        .with_transition("2024-01-02T00:00:00Z", "To Do", "Doing");
    let pipeline = CycleTimePipeline::new(&CycleTimeConfig::default());

    let early = pipeline.process_issue(&raw, jan(3, 0)).unwrap();
    let late = pipeline.process_issue(&raw, jan(4, 0)).unwrap();
    assert_eq!(early.cycle_time_hours, 24.0);
    assert_eq!(late.cycle_time_hours, 48.0);
}

#[test]
fn lowercase_status_is_not_a_member() {
    let raw = RawIssue::new("PROJ-11", "case", "doing", "2024-01-01T00:00:00Z")
        .with_transition("2024-01-02T00:00:00Z", "To Do", "doing");
    let pipeline = CycleTimePipeline::new(&CycleTimeConfig::default().with_statuses(["Doing"]));
    let record = pipeline.process_issue(&raw, jan(3, 0)).unwrap();
    assert_eq!(record.cycle_time_hours, 0.0);
    assert_eq!(record.cycle_time_days, 0.0);
}

#[test]
fn mixed_offsets_are_normalized_before_ordering() {
    // 10:00+02:00 is 08:00Z, earlier than 09:00Z despite the larger wall clock.
    let raw = RawIssue::new("PROJ-12", "tz", "Review", "2024-01-01T00:00:00Z")
        .with_transition("2024-01-01T09:00:00Z", "Doing", "Review")
        .with_transition("2024-01-01T10:00:00+02:00", "To Do", "Doing");
    let pipeline = CycleTimePipeline::new(&CycleTimeConfig::default().with_statuses(["Doing"]));
    let record = pipeline.process_issue(&raw, jan(2, 0)).unwrap();
    let statuses: Vec<&str> = record.intervals.iter().map(|i| i.status.as_str()).collect();
    assert_eq!(statuses, vec!["To Do", "Doing", "Review"]);
    assert_eq!(record.cycle_time_hours, 1.0);
}

#[test]
fn transition_before_creation_contributes_nothing_negative() {
    let events = vec![StatusChangeEvent::new(jan(1, 0), "Doing", "Done")];
    let intervals =
        ChangelogIntervalBuilder::build(jan(2, 0), "Done", events, Some(jan(3, 0)), jan(4, 0));
    let record = aggregator(&["Doing"]).aggregate(
        "PROJ-13",
        "",
        intervals,
        "Done",
        jan(2, 0),
        Some(jan(3, 0)),
    );
    assert_eq!(record.cycle_time_hours, 0.0);
}

#[test]
fn inconsistent_changelog_counts_span_under_event_from_status() {
    // The second transition says the issue left "Review", although the first
    // one moved it into "Doing". The span it closes is counted as "Review".
    let events = vec![
        StatusChangeEvent::new(jan(2, 0), "To Do", "Doing"),
        StatusChangeEvent::new(jan(3, 0), "Review", "Done"),
    ];
    let intervals = ChangelogIntervalBuilder::build(jan(1, 0), "Done", events, None, jan(4, 0));
    let statuses: Vec<&str> = intervals.iter().map(|i| i.status.as_str()).collect();
    assert_eq!(statuses, vec!["To Do", "Review", "Done"]);

    let record = aggregator(&["Review"]).aggregate(
        "PROJ-14",
        "inconsistent changelog",
        intervals.clone(),
        "Done",
        jan(1, 0),
        None,
    );
    assert_eq!(record.cycle_time_hours, 24.0);
    assert_eq!(record.cycle_time_days, 1.0);

    let record = aggregator(&["Doing"]).aggregate(
        "PROJ-14",
        "inconsistent changelog",
        intervals,
        "Done",
        jan(1, 0),
        None,
    );
    assert_eq!(record.cycle_time_hours, 0.0);
}

#[test]
fn inconsistent_changelog_through_pipeline() {
    let raw = RawIssue::new("PROJ-15", "pipeline", "Done", "2024-01-01T00:00:00Z")
        .with_transition("2024-01-02T00:00:00Z", "To Do", "Doing")
        .with_transition("2024-01-03T00:00:00Z", "Review", "Done");
    let config = CycleTimeConfig::default().with_statuses(["Review"]);
    let record = CycleTimePipeline::new(&config)
        .process_issue(&raw, jan(4, 0))
        .unwrap();
    assert_eq!(record.cycle_time_hours, 24.0);
}

// ---------------------------------------------------------------------------
// Generated changelogs
// ---------------------------------------------------------------------------

fn event_strategy() -> impl Strategy<Value = Vec<(i64, usize, usize)>> {
    prop::collection::vec((0i64..10_000, 0..STATUSES.len(), 0..STATUSES.len()), 0..12)
}

fn to_events(base: DateTime<Utc>, raw: &[(i64, usize, usize)]) -> Vec<StatusChangeEvent> {
    raw.iter()
        .map(|(minutes, from, to)| {
            StatusChangeEvent::new(base + Duration::minutes(*minutes), STATUSES[*from], STATUSES[*to])
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_intervals_cover_lifetime_without_gaps(
        raw in event_strategy(),
        tail_minutes in 0i64..5_000,
    ) {
        let created = jan(1, 0);
        let events = to_events(created, &raw);
        let last_event = events.iter().map(|e| e.timestamp).max().unwrap_or(created);
        let now = last_event + Duration::minutes(tail_minutes);

        let intervals = ChangelogIntervalBuilder::build(created, "Doing", events.clone(), None, now);

        prop_assert_eq!(intervals.len(), events.len() + 1);
        prop_assert_eq!(intervals[0].start, created);
        prop_assert_eq!(intervals.last().unwrap().end, now);
        prop_assert!(intervals.last().unwrap().open);
        for pair in intervals.windows(2) {
            prop_assert_eq!(pair[0].end, pair[1].start);
            prop_assert!(pair[0].start <= pair[1].start);
        }
        let covered = intervals
            .iter()
            .fold(Duration::zero(), |acc, iv| acc + iv.duration());
        prop_assert_eq!(covered, now - created);
    }

    #[test]
    fn prop_closed_spans_take_event_from_status(
        raw in event_strategy(),
    ) {
        let created = jan(1, 0);
        let events = to_events(created, &raw);
        let now = created + Duration::minutes(20_000);

        let intervals = ChangelogIntervalBuilder::build(created, "Doing", events.clone(), None, now);

        let mut sorted = events;
        sorted.sort_by_key(|e| e.timestamp);
        for (interval, event) in intervals.iter().zip(sorted.iter()) {
            prop_assert_eq!(&interval.status, &event.from_status);
            prop_assert_eq!(interval.end, event.timestamp);
        }
        if let Some(last) = sorted.last() {
            prop_assert_eq!(&intervals.last().unwrap().status, &last.to_status);
        }
    }

    #[test]
    fn prop_metrics_non_negative_and_consistent(
        raw in prop::collection::vec((-5_000i64..10_000, 0..STATUSES.len(), 0..STATUSES.len()), 0..12),
        now_offset in -2_000i64..20_000,
        resolved_offset in prop::option::of(-2_000i64..20_000),
    ) {
        let created = jan(10, 0);
        let events = to_events(created, &raw);
        let now = created + Duration::minutes(now_offset);
        let resolved = resolved_offset.map(|m| created + Duration::minutes(m));

        let intervals = ChangelogIntervalBuilder::build(created, "Review", events, resolved, now);
        let record = aggregator(&["Doing", "Blocked", "Review"])
            .aggregate("PROP-1", "", intervals, "Review", created, resolved);

        prop_assert!(record.cycle_time_hours >= 0.0);
        prop_assert!(record.cycle_time_days >= 0.0);
        prop_assert!((record.cycle_time_hours - record.cycle_time_days * 24.0).abs() <= 0.13);
    }
}
