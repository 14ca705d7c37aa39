//! Subcommand implementations.

use std::sync::Arc;

use addon_index_core::{render, PipelineError, RunOutcome, UpdatePipeline};
use addon_store::{FsSnapshotSink, MetricStore, SurrealMetricStore};
use anyhow::{Context, Result};
use chrono::Utc;
use registry_client::{HttpQualityClient, HttpRegistryClient, HttpSearchClient};
use tracing::info;

use crate::args::{StatsArgs, UpdateArgs};

/// Open the metric store named by `db_url` (or the SURREALDB_* cloud settings).
pub async fn open_metric_store(db_url: &str) -> Result<SurrealMetricStore> {
    SurrealMetricStore::from_env_or(db_url)
        .await
        .map_err(PipelineError::MetricStore)
        .with_context(|| format!("Failed to open metric store at {db_url}"))
}

pub async fn cmd_update(args: UpdateArgs, db_url: &str, json: bool) -> Result<()> {
    let config = args
        .pipeline
        .pipeline_config()
        .context("Invalid pipeline configuration")?;

    let endpoints = args.services.endpoints();
    let http = endpoints
        .http_client()
        .map_err(|e| PipelineError::Config(e.to_string()))
        .context("Failed to build HTTP client")?;
    let search = HttpSearchClient::with_client(http.clone(), &endpoints);
    let registry = HttpRegistryClient::with_client(http.clone(), &endpoints)
        .map_err(|e| PipelineError::Config(e.to_string()))
        .context("Invalid registry URL")?;
    let quality = HttpQualityClient::with_client(http, &endpoints);

    let metrics = open_metric_store(db_url).await?;
    let sink = FsSnapshotSink::new(&args.out_dir)
        .with_snapshot_file(args.snapshot_file.as_str())
        .with_marker_file(args.marker_file.as_str());
    info!(
        snapshot = %sink.snapshot_path().display(),
        search = %endpoints.search_url,
        "starting update"
    );

    let pipeline = UpdatePipeline::new(
        Arc::new(search),
        Arc::new(registry),
        Arc::new(quality),
        Arc::new(metrics),
        Arc::new(sink),
        config,
    );

    let outcome = pipeline.run(Utc::now()).await?;
    print_outcome(&outcome, json)
}

fn print_outcome(outcome: &RunOutcome, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(outcome)?);
        return Ok(());
    }

    match outcome {
        RunOutcome::Skipped(report) => {
            println!(
                "No update needed: {} candidates (gate: {})",
                report.gate.current_count, report.gate.mode
            );
        }
        RunOutcome::Published(report) => {
            println!(
                "Published {} addons to {} ({})",
                report.entries,
                report.receipt.location,
                report.receipt.digest.short()
            );
            for failure in &report.failures {
                println!("  skipped {}: {}", failure.name, failure.reason);
            }
        }
    }
    println!("Duration: {}ms", outcome.duration_ms());
    Ok(())
}

pub async fn cmd_stats(args: StatsArgs, db_url: &str) -> Result<()> {
    let store = open_metric_store(db_url).await?;
    let history = store
        .history(&args.metric)
        .await
        .map_err(PipelineError::MetricStore)
        .with_context(|| format!("Failed to read metric {}", args.metric))?;

    let rendered = render(&history, args.format)?;
    print!("{rendered}");
    if !rendered.ends_with('\n') {
        println!();
    }
    Ok(())
}
