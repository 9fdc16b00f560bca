//! Cycle-time configuration.
//!
//! The status set and rounding precision are plain immutable values handed to
//! the aggregator; nothing here is global.

use serde::{Deserialize, Serialize};

use crate::error::{CycleTimeError, Result};

/// Statuses counted as active work when no set is configured.
pub const DEFAULT_CYCLE_STATUSES: [&str; 5] = ["Doing", "Blocked", "Review", "In Progress", "In Review"];

/// Decimal places kept in `cycle_time_hours` / `cycle_time_days`.
pub const DEFAULT_PRECISION: u32 = 2;

const MAX_PRECISION: u32 = 9;

/// Ordered set of status names that count toward cycle time.
///
/// Membership is exact and case-sensitive: `"doing"` does not match
/// `"Doing"`. Names must match the tracker's workflow configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleStatuses(Vec<String>);

impl CycleStatuses {
    /// Build a set from names, dropping duplicates while keeping first-seen
    /// order.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for name in names {
            let name = name.into();
            if !unique.contains(&name) {
                unique.push(name);
            }
        }
        CycleStatuses(unique)
    }

    pub fn contains(&self, status: &str) -> bool {
        self.0.iter().any(|s| s == status)
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl Default for CycleStatuses {
    fn default() -> Self {
        CycleStatuses::new(DEFAULT_CYCLE_STATUSES)
    }
}

impl std::fmt::Display for CycleStatuses {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.join(", "))
    }
}

/// Settings for a cycle-time computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleTimeConfig {
    pub statuses: CycleStatuses,
    /// Decimal places for the reported metrics.
    pub precision: u32,
}

impl Default for CycleTimeConfig {
    fn default() -> Self {
        CycleTimeConfig {
            statuses: CycleStatuses::default(),
            precision: DEFAULT_PRECISION,
        }
    }
}

impl CycleTimeConfig {
    /// Create a validated config.
    pub fn new(statuses: CycleStatuses, precision: u32) -> Result<Self> {
        if precision > MAX_PRECISION {
            return Err(CycleTimeError::InvalidConfig(format!(
                "precision {} exceeds maximum of {}",
                precision, MAX_PRECISION
            )));
        }
        if statuses.is_empty() {
            tracing::warn!("no cycle statuses configured; every issue will report 0 hours");
        }
        Ok(CycleTimeConfig {
            statuses,
            precision,
        })
    }

    /// Read overrides from `CYCLETIME_STATUSES` (comma-separated) and
    /// `CYCLETIME_PRECISION`, falling back to defaults.
    pub fn from_env() -> Result<Self> {
        let statuses = match std::env::var("CYCLETIME_STATUSES") {
            Ok(raw) => CycleStatuses::new(
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string),
            ),
            Err(_) => CycleStatuses::default(),
        };
        let precision = match std::env::var("CYCLETIME_PRECISION") {
            Ok(raw) => raw.trim().parse::<u32>().map_err(|_| {
                CycleTimeError::InvalidConfig(format!("CYCLETIME_PRECISION is not a number: {raw}"))
            })?,
            Err(_) => DEFAULT_PRECISION,
        };
        Self::new(statuses, precision)
    }

    /// Override the status set.
    pub fn with_statuses<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.statuses = CycleStatuses::new(names);
        self
    }
}
