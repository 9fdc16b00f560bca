//! Timestamp parsing and UTC normalization.
//!
//! Trackers emit offsets in two shapes: RFC 3339 (`Z` / `+01:00`) and the
//! compact `+0100` form Jira uses. Both normalize to UTC. Values without an
//! offset are rejected; comparing them against aware instants would silently
//! assume a timezone.

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::error::{CycleTimeError, Result};

const COMPACT_OFFSET_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f%z";
const NAIVE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Parse a tracker timestamp into a UTC instant.
///
/// `field` names the source field and is only used for error reporting.
pub fn parse_timestamp(field: &str, value: &str) -> Result<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CycleTimeError::malformed(field, value, "empty value"));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(trimmed, COMPACT_OFFSET_FORMAT) {
        return Ok(dt.with_timezone(&Utc));
    }
    if NaiveDateTime::parse_from_str(trimmed, NAIVE_FORMAT).is_ok() {
        return Err(CycleTimeError::malformed(
            field,
            value,
            "naive timestamp without timezone offset",
        ));
    }

    Err(CycleTimeError::malformed(
        field,
        value,
        "not an ISO-8601 datetime",
    ))
}

/// Parse an optional timestamp; `None` and blank strings map to `None`.
pub fn parse_optional_timestamp(field: &str, value: Option<&str>) -> Result<Option<DateTime<Utc>>> {
    match value {
        Some(v) if !v.trim().is_empty() => parse_timestamp(field, v).map(Some),
        _ => Ok(None),
    }
}
