//! Addon-Index Core Library
//!
//! ## Layer 2 - Domain
//!
//! The discovery, enrichment and scoring pipeline that produces the addon
//! snapshot:
//!
//! discovery → deny-list + name validator → change gate → recency window →
//! detail enrichment → score join → dedupe → sort → snapshot sink
//!
//! External services come in through `registry_client` traits and durable
//! state goes out through `addon_store` traits, so every stage can be run
//! against in-memory fakes.

pub mod discovery;
pub mod domain;
pub mod enrich;
pub mod filter;
pub mod gate;
pub mod metrics;
pub mod obs;
pub mod pipeline;
pub mod recency;
pub mod scoring;
pub mod snapshot;
pub mod stats;
pub mod telemetry;

pub use discovery::{discover, DiscoveryConfig, DEFAULT_MAX_OFFSET, DEFAULT_PAGE_SIZE};
pub use domain::{Candidate, EnrichedAddon, PipelineError, Result, Score};
pub use enrich::{enrich, EnrichmentFailure, EnrichmentReport, DEFAULT_CONCURRENCY};
pub use filter::{filter_candidates, AnyNonEmpty, DenyList, NameValidator, HISTORICAL_PATTERNS};
pub use gate::{candidate_digest, ChangeGate, GateDecision, GateMode, GateReason};
pub use pipeline::{PipelineConfig, PublishReport, RunOutcome, SkipReport, UpdatePipeline};
pub use recency::{RecencyWindow, DEFAULT_WINDOW_DAYS};
pub use scoring::{join_scores, score_for};
pub use snapshot::{dedupe, sort_by_modified, DedupPolicy, Snapshot};
pub use stats::{render, render_csv, render_json, StatsFormat};
pub use telemetry::init_tracing;
