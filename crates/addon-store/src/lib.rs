//! Addon-Store: persistence layer for addon-index
//!
//! This crate owns everything the update pipeline writes durably:
//!
//! ## Layer 0 - Data/Persistence
//!
//! Focus: whole-document replacement and a small append-only metric log.
//!
//! ## Key Components
//!
//! - `SnapshotSink`: accepts one serialized snapshot and replaces the previous one
//! - `FsSnapshotSink`: filesystem sink with temp-file + rename semantics
//! - `MetricStore`: append-only log of per-run counters (`candidates`, `total`)
//! - `SurrealMetricStore`: SurrealDB-backed metric store
//! - `fakes`: in-memory implementations for tests

mod error;
pub mod fakes;
pub mod fs_sink;
mod migrations;
mod schema;
pub mod storage_traits;
pub mod surreal_metrics;

pub use error::StorageError;
pub use fs_sink::FsSnapshotSink;
pub use storage_traits::{
    ContentDigest, MetricRecord, MetricStore, SnapshotDocument, SnapshotReceipt, SnapshotSink,
    StorageResult, METRIC_CANDIDATES, METRIC_TOTAL,
};
pub use surreal_metrics::{CloudConfig, SurrealMetricStore};
