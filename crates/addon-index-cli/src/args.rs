//! Command-line arguments.
//!
//! Every flag can also be set through an `ADDON_INDEX_*` environment
//! variable, including from a `.env` file loaded at startup.

use std::path::PathBuf;
use std::time::Duration;

use addon_index_core::{
    DedupPolicy, DenyList, DiscoveryConfig, GateMode, PipelineConfig, StatsFormat,
    DEFAULT_CONCURRENCY, DEFAULT_MAX_OFFSET, DEFAULT_PAGE_SIZE, DEFAULT_WINDOW_DAYS,
};
use addon_store::fs_sink::{DEFAULT_MARKER_FILE, DEFAULT_SNAPSHOT_FILE};
use addon_store::METRIC_TOTAL;
use clap::{Args, Parser, Subcommand};
use registry_client::{
    ServiceEndpoints, DEFAULT_QUALITY_URL, DEFAULT_REGISTRY_URL, DEFAULT_SEARCH_QUERY,
    DEFAULT_SEARCH_URL,
};

/// Default metric store location.
pub const DEFAULT_DB_URL: &str = "surrealkv://.addon-index/db";

#[derive(Debug, Parser)]
#[command(name = "addon-index")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Discover, score and publish the ecosystem addon index", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, env = "ADDON_INDEX_VERBOSE")]
    pub verbose: bool,

    /// Emit JSON-formatted log lines and reports
    #[arg(long, global = true, env = "ADDON_INDEX_JSON")]
    pub json: bool,

    /// Metric store URL (mem://, surrealkv://path, ws://host:port)
    #[arg(long, global = true, env = "ADDON_INDEX_DB_URL", default_value = DEFAULT_DB_URL)]
    pub db_url: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run one discovery, enrichment and publish cycle
    Update(UpdateArgs),

    /// Print the recorded history of a metric
    Stats(StatsArgs),
}

#[derive(Debug, Args)]
pub struct UpdateArgs {
    /// Directory receiving the snapshot and last-updated marker
    #[arg(long, env = "ADDON_INDEX_OUT_DIR", default_value = ".")]
    pub out_dir: PathBuf,

    #[arg(long, env = "ADDON_INDEX_SNAPSHOT_FILE", default_value = DEFAULT_SNAPSHOT_FILE)]
    pub snapshot_file: String,

    #[arg(long, env = "ADDON_INDEX_MARKER_FILE", default_value = DEFAULT_MARKER_FILE)]
    pub marker_file: String,

    #[command(flatten)]
    pub services: ServiceArgs,

    #[command(flatten)]
    pub pipeline: PipelineArgs,
}

#[derive(Debug, Args)]
pub struct ServiceArgs {
    #[arg(long, env = "ADDON_INDEX_SEARCH_URL", default_value = DEFAULT_SEARCH_URL)]
    pub search_url: String,

    /// Search term selecting the plugin family
    #[arg(long, env = "ADDON_INDEX_SEARCH_QUERY", default_value = DEFAULT_SEARCH_QUERY)]
    pub search_query: String,

    #[arg(long, env = "ADDON_INDEX_REGISTRY_URL", default_value = DEFAULT_REGISTRY_URL)]
    pub registry_url: String,

    #[arg(long, env = "ADDON_INDEX_QUALITY_URL", default_value = DEFAULT_QUALITY_URL)]
    pub quality_url: String,

    /// Per-request timeout in seconds (none by default)
    #[arg(long, env = "ADDON_INDEX_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Args)]
pub struct PipelineArgs {
    #[arg(long, env = "ADDON_INDEX_PAGE_SIZE", default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: usize,

    /// Last search offset requested (inclusive)
    #[arg(long, env = "ADDON_INDEX_MAX_OFFSET", default_value_t = DEFAULT_MAX_OFFSET)]
    pub max_offset: usize,

    /// Recency window in days
    #[arg(long, env = "ADDON_INDEX_WINDOW_DAYS", default_value_t = DEFAULT_WINDOW_DAYS)]
    pub window_days: u32,

    /// Concurrent registry lookups (1 = sequential)
    #[arg(long, env = "ADDON_INDEX_CONCURRENCY", default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Which duplicate survives: first-seen or last-seen
    #[arg(long, env = "ADDON_INDEX_DEDUP", default_value = "first-seen")]
    pub dedup: DedupPolicy,

    /// Change gate: count or content-digest
    #[arg(long, env = "ADDON_INDEX_GATE", default_value = "count")]
    pub gate: GateMode,

    /// Deny-list pattern (repeatable). Replaces the built-in list when given.
    #[arg(long = "deny-pattern", env = "ADDON_INDEX_DENY_PATTERNS", value_delimiter = ',')]
    pub deny_patterns: Vec<String>,

    /// Disable name deny-listing entirely
    #[arg(long, conflicts_with = "deny_patterns")]
    pub no_deny_list: bool,

    /// Publish even when the change gate finds nothing new
    #[arg(long, env = "ADDON_INDEX_FORCE")]
    pub force: bool,
}

#[derive(Debug, Args)]
pub struct StatsArgs {
    /// Metric name
    #[arg(long, default_value = METRIC_TOTAL)]
    pub metric: String,

    /// Output format: json or csv
    #[arg(long, default_value = "json")]
    pub format: StatsFormat,
}

impl ServiceArgs {
    pub fn endpoints(&self) -> ServiceEndpoints {
        let endpoints = ServiceEndpoints::default()
            .with_search_url(&self.search_url)
            .with_search_query(&self.search_query)
            .with_registry_url(&self.registry_url)
            .with_quality_url(&self.quality_url);
        match self.timeout_secs {
            Some(secs) => endpoints.with_timeout(Duration::from_secs(secs)),
            None => endpoints,
        }
    }
}

impl PipelineArgs {
    pub fn pipeline_config(&self) -> addon_index_core::Result<PipelineConfig> {
        let deny_list = if self.no_deny_list {
            DenyList::empty()
        } else if self.deny_patterns.is_empty() {
            DenyList::historical()
        } else {
            DenyList::new(&self.deny_patterns)?
        };

        let config = PipelineConfig {
            discovery: DiscoveryConfig {
                page_size: self.page_size,
                max_offset: self.max_offset,
            },
            window_days: self.window_days,
            concurrency: self.concurrency,
            dedup: self.dedup,
            gate_mode: self.gate,
            deny_list,
            force: self.force,
        };
        config.validate()?;
        Ok(config)
    }
}
