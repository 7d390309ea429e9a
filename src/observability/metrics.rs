//! Metrics registry for shelfdb
//!
//! - Counters only
//! - Monotonic increase for the lifetime of a database instance
//! - Atomic, so read-only operations can count through `&self`

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Operational counters of one database instance
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    /// Successful public operations
    operations_executed: AtomicU64,
    /// Operations that failed validation
    operations_rejected: AtomicU64,
    tables_created: AtomicU64,
    tables_dropped: AtomicU64,
    records_inserted: AtomicU64,
    records_selected: AtomicU64,
    records_updated: AtomicU64,
    records_deleted: AtomicU64,
}

impl MetricsRegistry {
    /// Create a new metrics registry with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_executed(&self) {
        self.operations_executed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_rejected(&self) {
        self.operations_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_tables_created(&self) {
        self.tables_created.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_tables_dropped(&self) {
        self.tables_dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_inserted(&self, count: u64) {
        self.records_inserted.fetch_add(count, Ordering::Relaxed);
    }

    pub fn add_selected(&self, count: u64) {
        self.records_selected.fetch_add(count, Ordering::Relaxed);
    }

    pub fn add_updated(&self, count: u64) {
        self.records_updated.fetch_add(count, Ordering::Relaxed);
    }

    pub fn add_deleted(&self, count: u64) {
        self.records_deleted.fetch_add(count, Ordering::Relaxed);
    }

    /// Get all metrics as a snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            operations_executed: self.operations_executed.load(Ordering::Relaxed),
            operations_rejected: self.operations_rejected.load(Ordering::Relaxed),
            tables_created: self.tables_created.load(Ordering::Relaxed),
            tables_dropped: self.tables_dropped.load(Ordering::Relaxed),
            records_inserted: self.records_inserted.load(Ordering::Relaxed),
            records_selected: self.records_selected.load(Ordering::Relaxed),
            records_updated: self.records_updated.load(Ordering::Relaxed),
            records_deleted: self.records_deleted.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time snapshot of all metrics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub operations_executed: u64,
    pub operations_rejected: u64,
    pub tables_created: u64,
    pub tables_dropped: u64,
    pub records_inserted: u64,
    pub records_selected: u64,
    pub records_updated: u64,
    pub records_deleted: u64,
}
