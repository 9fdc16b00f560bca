//! Record sinks: CSV summary and detailed JSON.
//!
//! - CSV: one row per issue, columns
//!   `key, summary, cycle_time_hours, cycle_time_days, status, created, resolved`
//! - JSON: the same records plus their full interval sequence, for auditing
//!   how a number was reached

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{CycleTimeRecord, StatusInterval};
use crate::error::Result;
use crate::obs::emit_export_written;

/// CSV column order.
pub const CSV_COLUMNS: [&str; 7] = [
    "key",
    "summary",
    "cycle_time_hours",
    "cycle_time_days",
    "status",
    "created",
    "resolved",
];

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    key: &'a str,
    summary: &'a str,
    cycle_time_hours: f64,
    cycle_time_days: f64,
    status: &'a str,
    created: String,
    resolved: String,
}

impl<'a> From<&'a CycleTimeRecord> for CsvRow<'a> {
    fn from(record: &'a CycleTimeRecord) -> Self {
        CsvRow {
            key: &record.key,
            summary: &record.summary,
            cycle_time_hours: record.cycle_time_hours,
            cycle_time_days: record.cycle_time_days,
            status: &record.status,
            created: format_instant(&record.created),
            resolved: record
                .resolved
                .as_ref()
                .map(format_instant)
                .unwrap_or_default(),
        }
    }
}

/// One interval in the detailed export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalArtifact {
    pub status: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub open: bool,
    pub duration_hours: f64,
}

impl From<&StatusInterval> for IntervalArtifact {
    fn from(iv: &StatusInterval) -> Self {
        IntervalArtifact {
            status: iv.status.clone(),
            start: iv.start,
            end: iv.end,
            open: iv.open,
            duration_hours: crate::aggregate::round_to(iv.hours(), 4),
        }
    }
}

/// Detailed per-issue record written by [`write_json`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailedRecordArtifact {
    pub key: String,
    pub summary: String,
    pub status: String,
    pub created: DateTime<Utc>,
    pub resolved: Option<DateTime<Utc>>,
    pub assignee: Option<String>,
    pub priority: Option<String>,
    pub issue_type: Option<String>,
    pub cycle_time_hours: f64,
    pub cycle_time_days: f64,
    pub evaluated_at: DateTime<Utc>,
    pub intervals: Vec<IntervalArtifact>,
}

impl DetailedRecordArtifact {
    pub fn new(record: &CycleTimeRecord, evaluated_at: DateTime<Utc>) -> Self {
        Self {
            key: record.key.clone(),
            summary: record.summary.clone(),
            status: record.status.clone(),
            created: record.created,
            resolved: record.resolved,
            assignee: record.assignee.clone(),
            priority: record.priority.clone(),
            issue_type: record.issue_type.clone(),
            cycle_time_hours: record.cycle_time_hours,
            cycle_time_days: record.cycle_time_days,
            evaluated_at,
            intervals: record.intervals.iter().map(IntervalArtifact::from).collect(),
        }
    }
}

fn format_instant(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Write the CSV summary (header included) to `writer`.
pub fn write_csv<W: Write>(writer: W, records: &[CycleTimeRecord]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    if records.is_empty() {
        csv_writer.write_record(CSV_COLUMNS)?;
    }
    for record in records {
        csv_writer.serialize(CsvRow::from(record))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write the detailed JSON array to `writer`.
pub fn write_json<W: Write>(
    mut writer: W,
    records: &[CycleTimeRecord],
    evaluated_at: DateTime<Utc>,
) -> Result<()> {
    let artifacts: Vec<DetailedRecordArtifact> = records
        .iter()
        .map(|r| DetailedRecordArtifact::new(r, evaluated_at))
        .collect();
    serde_json::to_writer_pretty(&mut writer, &artifacts)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Create or overwrite `path` with the CSV summary.
pub fn write_csv_file(path: &Path, records: &[CycleTimeRecord]) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_csv(std::io::BufWriter::new(file), records)?;
    emit_export_written(&path.display().to_string(), "csv", records.len());
    Ok(())
}

/// Create or overwrite `path` with the detailed JSON export.
pub fn write_json_file(
    path: &Path,
    records: &[CycleTimeRecord],
    evaluated_at: DateTime<Utc>,
) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_json(std::io::BufWriter::new(file), records, evaluated_at)?;
    emit_export_written(&path.display().to_string(), "json", records.len());
    Ok(())
}

/// Detailed JSON path paired with a CSV output path: same stem, `.json`.
pub fn json_path_for(csv_path: &Path) -> PathBuf {
    csv_path.with_extension("json")
}
