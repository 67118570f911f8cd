//! Counters for membership store operations
//!
//! ## Usage
//!
//! ```
//! use metrics_meta_filter::metrics::Metrics;
//!
//! let metrics = Metrics::new();
//! metrics.record_test_and_insert(false);
//! metrics.record_test_and_insert(true);
//!
//! let snapshot = metrics.snapshot();
//! assert_eq!(snapshot.hits, 1);
//! assert_eq!(snapshot.misses, 1);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics collector for membership store operations
///
/// Thread-safe counters, cheap enough to bump on every record.
#[derive(Debug, Default)]
pub struct Metrics {
    /// Plain insertions (`update`)
    pub inserts: AtomicU64,
    /// Plain membership tests (`contains`)
    pub lookups: AtomicU64,
    /// Test-and-insert calls that found the key
    pub hits: AtomicU64,
    /// Test-and-insert calls that inserted the key
    pub misses: AtomicU64,
    /// Shard flushes performed by the rotation scheduler
    pub flushes: AtomicU64,
    /// Elements dropped by flushes
    pub elements_forgotten: AtomicU64,
}

impl Metrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_insert(&self) {
        self.inserts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_lookup(&self) {
        self.lookups.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a test-and-insert outcome
    pub fn record_test_and_insert(&self, hit: bool) {
        if hit {
            self.hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Record one shard flush
    pub fn record_flush(&self, elements_forgotten: usize) {
        self.flushes.fetch_add(1, Ordering::Relaxed);
        self.elements_forgotten
            .fetch_add(elements_forgotten as u64, Ordering::Relaxed);
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            inserts: self.inserts.load(Ordering::Relaxed),
            lookups: self.lookups.load(Ordering::Relaxed),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            flushes: self.flushes.load(Ordering::Relaxed),
            elements_forgotten: self.elements_forgotten.load(Ordering::Relaxed),
        }
    }

    /// Ratio of hits to test-and-insert calls
    ///
    /// Includes false positives, so it overstates the true duplicate rate by
    /// at most the configured false positive rate.
    pub fn observed_hit_rate(&self) -> f64 {
        let hits = self.hits.load(Ordering::Relaxed);
        let total = hits + self.misses.load(Ordering::Relaxed);
        if total > 0 {
            hits as f64 / total as f64
        } else {
            0.0
        }
    }
}

/// Point-in-time metrics snapshot
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub inserts: u64,
    pub lookups: u64,
    pub hits: u64,
    pub misses: u64,
    pub flushes: u64,
    pub elements_forgotten: u64,
}
