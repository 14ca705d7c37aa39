//! Global atomic counters for addon-index runs.
//!
//! Counters are incremented silently at the call site. Call
//! [`Metrics::flush`] to emit current values as a single
//! `tracing::info!` event at the end of a run.

use std::sync::atomic::{AtomicU64, Ordering};

/// Global metrics singleton.
pub static METRICS: Metrics = Metrics::new();

/// Lightweight atomic counters, no allocations, no locking.
pub struct Metrics {
    pages_fetched: AtomicU64,
    candidates_discovered: AtomicU64,
    details_fetched: AtomicU64,
    details_failed: AtomicU64,
    snapshots_published: AtomicU64,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub const fn new() -> Self {
        Self {
            pages_fetched: AtomicU64::new(0),
            candidates_discovered: AtomicU64::new(0),
            details_fetched: AtomicU64::new(0),
            details_failed: AtomicU64::new(0),
            snapshots_published: AtomicU64::new(0),
        }
    }

    pub fn inc_pages_fetched(&self) {
        self.pages_fetched.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "pages_fetched", "counter incremented");
    }

    /// Add `n` raw search hits.
    pub fn add_candidates_discovered(&self, n: u64) {
        self.candidates_discovered.fetch_add(n, Ordering::Relaxed);
        tracing::trace!(metric = "candidates_discovered", n, "counter incremented");
    }

    pub fn inc_details_fetched(&self) {
        self.details_fetched.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "details_fetched", "counter incremented");
    }

    pub fn inc_details_failed(&self) {
        self.details_failed.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "details_failed", "counter incremented");
    }

    pub fn inc_snapshots_published(&self) {
        self.snapshots_published.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "snapshots_published", "counter incremented");
    }

    /// Emit all current counter values as a single `info!` event.
    pub fn flush(&self) {
        tracing::info!(
            metric = "flush",
            pages_fetched = self.pages_fetched(),
            candidates_discovered = self.candidates_discovered(),
            details_fetched = self.details_fetched(),
            details_failed = self.details_failed(),
            snapshots_published = self.snapshots_published(),
        );
    }

    pub fn pages_fetched(&self) -> u64 {
        self.pages_fetched.load(Ordering::Relaxed)
    }

    pub fn candidates_discovered(&self) -> u64 {
        self.candidates_discovered.load(Ordering::Relaxed)
    }

    pub fn details_fetched(&self) -> u64 {
        self.details_fetched.load(Ordering::Relaxed)
    }

    pub fn details_failed(&self) -> u64 {
        self.details_failed.load(Ordering::Relaxed)
    }

    pub fn snapshots_published(&self) -> u64 {
        self.snapshots_published.load(Ordering::Relaxed)
    }

    /// Reset all counters to zero (useful in tests).
    pub fn reset(&self) {
        self.pages_fetched.store(0, Ordering::Relaxed);
        self.candidates_discovered.store(0, Ordering::Relaxed);
        self.details_fetched.store(0, Ordering::Relaxed);
        self.details_failed.store(0, Ordering::Relaxed);
        self.snapshots_published.store(0, Ordering::Relaxed);
    }
}
