//! Structured observability hooks for the update run lifecycle.
//!
//! - `RunSpan` RAII guard tagging every line of one run with its `run_id`
//! - emit functions for start, page fetch, gate, detail failure, publish,
//!   finish and failure
//!
//! Events are emitted at `info!` level except failures, which use `warn!`
//! or `error!`.

use tracing::{error, info, warn};

/// RAII guard that enters a run-scoped tracing span for the duration of a run.
pub struct RunSpan {
    _span: tracing::span::EnteredSpan,
}

impl RunSpan {
    /// Create and enter a span tagged with the run_id.
    pub fn enter(run_id: &str) -> Self {
        let span = tracing::info_span!("addon_index.run", run_id = %run_id);
        Self {
            _span: span.entered(),
        }
    }
}

pub fn emit_run_started(run_id: &str) {
    info!(event = "run.started", run_id = %run_id);
}

/// One search page came back.
pub fn emit_page_fetched(offset: usize, results: usize) {
    info!(event = "discovery.page_fetched", offset = offset, results = results);
}

/// Gate verdict. `previous` is `None` on the first run.
pub fn emit_gate_evaluated(
    run_id: &str,
    mode: &str,
    current: usize,
    previous: Option<u64>,
    proceed: bool,
) {
    info!(
        event = "gate.evaluated",
        run_id = %run_id,
        mode = %mode,
        current = current,
        previous = ?previous,
        proceed = proceed,
    );
}

/// A single package could not be enriched; the run continues.
pub fn emit_detail_failed(name: &str, reason: &dyn std::fmt::Display) {
    warn!(event = "enrich.detail_failed", name = %name, reason = %reason);
}

pub fn emit_snapshot_published(location: &str, entries: usize, digest: &str) {
    info!(
        event = "snapshot.published",
        location = %location,
        entries = entries,
        digest = %digest,
    );
}

/// Emit event: run finished with duration and outcome.
pub fn emit_run_finished(run_id: &str, duration_ms: u64, entries: usize, published: bool) {
    info!(
        event = "run.finished",
        run_id = %run_id,
        duration_ms = duration_ms,
        entries = entries,
        published = published,
    );
}

pub fn emit_run_failed(run_id: &str, duration_ms: u64, error: &dyn std::fmt::Display) {
    error!(
        event = "run.failed",
        run_id = %run_id,
        duration_ms = duration_ms,
        error = %error,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_span_create() {
        let _span = RunSpan::enter("test-run-id");
        emit_run_started("test-run-id");
        emit_gate_evaluated("test-run-id", "count", 3, None, true);
    }
}
