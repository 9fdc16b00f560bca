//! Process-wide counters for cycle-time runs.
//!
//! Counters are incremented silently at the call site. Call
//! [`Metrics::flush`] to emit current values as a single
//! `tracing::info!` event (e.g. at the end of a batch).

use std::sync::atomic::{AtomicU64, Ordering};

/// Global metrics singleton.
pub static METRICS: Metrics = Metrics::new();

/// Lightweight atomic counters: no allocations, no locking.
pub struct Metrics {
    issues_processed: AtomicU64,
    issues_skipped: AtomicU64,
    intervals_built: AtomicU64,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub const fn new() -> Self {
        Self {
            issues_processed: AtomicU64::new(0),
            issues_skipped: AtomicU64::new(0),
            intervals_built: AtomicU64::new(0),
        }
    }

    /// Count one issue that produced a record.
    pub fn inc_issues_processed(&self) {
        self.issues_processed.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "issues_processed", "counter incremented");
    }

    /// Count one issue dropped from a batch.
    pub fn inc_issues_skipped(&self) {
        self.issues_skipped.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "issues_skipped", "counter incremented");
    }

    /// Add the number of intervals reconstructed for one issue.
    pub fn add_intervals_built(&self, n: u64) {
        self.intervals_built.fetch_add(n, Ordering::Relaxed);
    }

    /// Emit all current counter values as a single `info!` event.
    pub fn flush(&self) {
        tracing::info!(
            metric = "flush",
            issues_processed = self.issues_processed(),
            issues_skipped = self.issues_skipped(),
            intervals_built = self.intervals_built(),
        );
    }

    pub fn issues_processed(&self) -> u64 {
        self.issues_processed.load(Ordering::Relaxed)
    }

    pub fn issues_skipped(&self) -> u64 {
        self.issues_skipped.load(Ordering::Relaxed)
    }

    pub fn intervals_built(&self) -> u64 {
        self.intervals_built.load(Ordering::Relaxed)
    }

    /// Reset all counters to zero (useful in tests).
    pub fn reset(&self) {
        self.issues_processed.store(0, Ordering::Relaxed);
        self.issues_skipped.store(0, Ordering::Relaxed);
        self.intervals_built.store(0, Ordering::Relaxed);
    }
}
