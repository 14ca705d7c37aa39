//! Update pipeline orchestration.
//!
//! One run: discover → filter → gate → recency → quality data → enrich →
//! join scores → dedupe + sort → publish → record metrics.
//!
//! Quality data is fetched before enrichment so that an unavailable rating
//! service aborts the run without spending any registry lookups. Metrics are
//! recorded only after the snapshot is durably published, so a failed run
//! never suppresses the next one at the gate.

use std::sync::Arc;

use addon_store::{MetricStore, SnapshotReceipt, SnapshotSink, METRIC_CANDIDATES, METRIC_TOTAL};
use chrono::{DateTime, Utc};
use registry_client::{QualityService, RegistryService, SearchService};
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::{debug, info};
use uuid::Uuid;

use crate::discovery::{discover, DiscoveryConfig};
use crate::domain::{PipelineError, Result};
use crate::enrich::{enrich, EnrichmentFailure, DEFAULT_CONCURRENCY};
use crate::filter::{filter_candidates, AnyNonEmpty, DenyList, NameValidator};
use crate::gate::{ChangeGate, GateDecision, GateMode};
use crate::metrics::METRICS;
use crate::obs::{self, RunSpan};
use crate::recency::{RecencyWindow, DEFAULT_WINDOW_DAYS};
use crate::scoring::join_scores;
use crate::snapshot::{DedupPolicy, Snapshot};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub discovery: DiscoveryConfig,
    pub window_days: u32,
    /// Concurrent registry lookups; 1 is strictly sequential.
    pub concurrency: usize,
    pub dedup: DedupPolicy,
    pub gate_mode: GateMode,
    pub deny_list: DenyList,
    /// Skip the change gate.
    pub force: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            discovery: DiscoveryConfig::default(),
            window_days: DEFAULT_WINDOW_DAYS,
            concurrency: DEFAULT_CONCURRENCY,
            dedup: DedupPolicy::default(),
            gate_mode: GateMode::default(),
            deny_list: DenyList::historical(),
            force: false,
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<()> {
        self.discovery.validate()?;
        if self.concurrency == 0 {
            return Err(PipelineError::Config(
                "concurrency must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Run outcome
// ---------------------------------------------------------------------------

/// The gate found nothing new; nothing was fetched or written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkipReport {
    pub run_id: String,
    pub discovered: usize,
    pub gate: GateDecision,
    pub duration_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishReport {
    pub run_id: String,
    /// Raw search hits across all pages.
    pub discovered: usize,
    pub gate: GateDecision,
    /// Candidates inside the recency window.
    pub recent: usize,
    pub enriched: usize,
    pub failures: Vec<EnrichmentFailure>,
    /// Entries in the published snapshot.
    pub entries: usize,
    pub receipt: SnapshotReceipt,
    pub duration_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RunOutcome {
    Skipped(SkipReport),
    Published(PublishReport),
}

impl RunOutcome {
    pub fn run_id(&self) -> &str {
        match self {
            RunOutcome::Skipped(r) => &r.run_id,
            RunOutcome::Published(r) => &r.run_id,
        }
    }

    pub fn duration_ms(&self) -> u64 {
        match self {
            RunOutcome::Skipped(r) => r.duration_ms,
            RunOutcome::Published(r) => r.duration_ms,
        }
    }

    pub fn is_published(&self) -> bool {
        matches!(self, RunOutcome::Published(_))
    }

    pub fn gate(&self) -> &GateDecision {
        match self {
            RunOutcome::Skipped(r) => &r.gate,
            RunOutcome::Published(r) => &r.gate,
        }
    }
}

// ---------------------------------------------------------------------------
// UpdatePipeline
// ---------------------------------------------------------------------------

/// Services and settings for one batch job.
pub struct UpdatePipeline {
    search: Arc<dyn SearchService>,
    registry: Arc<dyn RegistryService>,
    quality: Arc<dyn QualityService>,
    metrics: Arc<dyn MetricStore>,
    sink: Arc<dyn SnapshotSink>,
    validator: Arc<dyn NameValidator>,
    config: PipelineConfig,
}

impl UpdatePipeline {
    pub fn new(
        search: Arc<dyn SearchService>,
        registry: Arc<dyn RegistryService>,
        quality: Arc<dyn QualityService>,
        metrics: Arc<dyn MetricStore>,
        sink: Arc<dyn SnapshotSink>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            search,
            registry,
            quality,
            metrics,
            sink,
            validator: Arc::new(AnyNonEmpty),
            config,
        }
    }

    /// Replace the default non-empty name validator.
    pub fn with_validator(mut self, validator: Arc<dyn NameValidator>) -> Self {
        self.validator = validator;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Execute one run with `now` as the recency reference time.
    pub async fn run(&self, now: DateTime<Utc>) -> Result<RunOutcome> {
        let run_id = Uuid::new_v4().to_string();
        let _span = RunSpan::enter(&run_id);
        let started = Instant::now();
        obs::emit_run_started(&run_id);

        let result = self.execute(&run_id, now, started).await;
        match &result {
            Ok(RunOutcome::Published(report)) => {
                obs::emit_run_finished(&run_id, report.duration_ms, report.entries, true);
            }
            Ok(RunOutcome::Skipped(report)) => {
                obs::emit_run_finished(&run_id, report.duration_ms, 0, false);
            }
            Err(e) => obs::emit_run_failed(&run_id, elapsed_ms(started), e),
        }
        METRICS.flush();
        result
    }

    async fn execute(
        &self,
        run_id: &str,
        now: DateTime<Utc>,
        started: Instant,
    ) -> Result<RunOutcome> {
        self.config.validate()?;

        let discovered = discover(self.search.as_ref(), &self.config.discovery).await?;
        let discovered_count = discovered.len();
        debug!(
            deny_patterns = ?self.config.deny_list.patterns().collect::<Vec<_>>(),
            "filtering candidates"
        );
        let candidates =
            filter_candidates(discovered, &self.config.deny_list, self.validator.as_ref());

        let previous = self
            .metrics
            .latest(METRIC_CANDIDATES)
            .await
            .map_err(PipelineError::MetricStore)?;
        let gate = ChangeGate::new(self.config.gate_mode)
            .forced(self.config.force)
            .evaluate(&candidates, previous.as_ref());
        obs::emit_gate_evaluated(
            run_id,
            &gate.mode.to_string(),
            gate.current_count,
            gate.previous_count,
            gate.proceed,
        );

        if !gate.proceed {
            info!(candidates = gate.current_count, "no update needed");
            return Ok(RunOutcome::Skipped(SkipReport {
                run_id: run_id.to_string(),
                discovered: discovered_count,
                gate,
                duration_ms: elapsed_ms(started),
            }));
        }

        let window = RecencyWindow::new(self.config.window_days, now);
        let recent = window.apply(candidates);
        info!(recent = recent.len(), window_days = window.days(), "recency window applied");

        let quality = self
            .quality
            .fetch_all()
            .await
            .map_err(PipelineError::Scoring)?;

        let enrichment = enrich(self.registry.as_ref(), &recent, self.config.concurrency).await;
        let enriched = enrichment.details.len();
        let addons = join_scores(enrichment.details, &quality);
        let snapshot = Snapshot::assemble(addons, self.config.dedup);

        let document = snapshot.to_document()?;
        let receipt = self
            .sink
            .publish(&document)
            .await
            .map_err(PipelineError::Persistence)?;
        METRICS.inc_snapshots_published();
        obs::emit_snapshot_published(&receipt.location, receipt.entries, receipt.digest.short());

        self.metrics
            .record(
                METRIC_CANDIDATES,
                gate.current_count as u64,
                Some(gate.digest.clone()),
            )
            .await
            .map_err(PipelineError::MetricStore)?;
        self.metrics
            .record(METRIC_TOTAL, snapshot.len() as u64, Some(receipt.digest.clone()))
            .await
            .map_err(PipelineError::MetricStore)?;

        Ok(RunOutcome::Published(PublishReport {
            run_id: run_id.to_string(),
            discovered: discovered_count,
            gate,
            recent: recent.len(),
            enriched,
            failures: enrichment.failures,
            entries: snapshot.len(),
            receipt,
            duration_ms: elapsed_ms(started),
        }))
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert_eq!(config.window_days, 60);
        assert_eq!(config.concurrency, 5);
        assert_eq!(config.discovery.page_size, 250);
        assert_eq!(config.discovery.max_offset, 5000);
        assert_eq!(config.dedup, DedupPolicy::FirstSeen);
        assert_eq!(config.gate_mode, GateMode::Count);
        assert_eq!(config.deny_list.len(), 3);
        assert!(!config.force);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let config = PipelineConfig {
            concurrency: 0,
            ..PipelineConfig::default()
        };
        assert!(matches!(config.validate(), Err(PipelineError::Config(_))));
    }
}
