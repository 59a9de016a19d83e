//! Import counters

use std::sync::atomic::{AtomicU64, Ordering};

/// Process-wide counters for connector imports
#[derive(Debug, Default)]
pub struct Metrics {
    items_imported: AtomicU64,
    items_failed: AtomicU64,
    attachments_fetched: AtomicU64,
    attachments_skipped: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn item_imported(&self) {
        self.items_imported.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "items_imported", "Metric incremented");
    }

    pub fn item_failed(&self) {
        self.items_failed.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "items_failed", "Metric incremented");
    }

    pub fn attachment_fetched(&self) {
        self.attachments_fetched.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "attachments_fetched", "Metric incremented");
    }

    pub fn attachment_skipped(&self) {
        self.attachments_skipped.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "attachments_skipped", "Metric incremented");
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            items_imported: self.items_imported.load(Ordering::Relaxed),
            items_failed: self.items_failed.load(Ordering::Relaxed),
            attachments_fetched: self.attachments_fetched.load(Ordering::Relaxed),
            attachments_skipped: self.attachments_skipped.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub items_imported: u64,
    pub items_failed: u64,
    pub attachments_fetched: u64,
    pub attachments_skipped: u64,
}
