//! In-memory fakes for storage traits (testing only)
//!
//! Provides `MemoryMetricStore` and `MemorySnapshotSink` that satisfy the
//! trait contracts without any external dependencies.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use crate::error::StorageError;
use crate::storage_traits::*;

// ---------------------------------------------------------------------------
// MemoryMetricStore
// ---------------------------------------------------------------------------

/// In-memory metric log backed by a `HashMap<name, Vec<record>>`.
///
/// Records are kept oldest first internally. `failing()` builds a store
/// whose every call is rejected.
#[derive(Debug, Default)]
pub struct MemoryMetricStore {
    metrics: Mutex<HashMap<String, Vec<MetricRecord>>>,
    fail: bool,
}

impl MemoryMetricStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            metrics: Mutex::new(HashMap::new()),
            fail: true,
        }
    }

    fn check(&self) -> StorageResult<()> {
        if self.fail {
            return Err(StorageError::Backend(
                "metric store configured to fail".to_string(),
            ));
        }
        Ok(())
    }

    /// Store pre-seeded with one value for `name`.
    pub fn with_value(name: &str, value: u64, digest: Option<ContentDigest>) -> Self {
        let store = Self::default();
        store.metrics.lock().unwrap().insert(
            name.to_string(),
            vec![MetricRecord {
                name: name.to_string(),
                value,
                digest,
                recorded_at: Utc::now(),
            }],
        );
        store
    }
}

#[async_trait]
impl MetricStore for MemoryMetricStore {
    async fn latest(&self, name: &str) -> StorageResult<Option<MetricRecord>> {
        self.check()?;
        let metrics = self.metrics.lock().unwrap();
        Ok(metrics.get(name).and_then(|records| records.last().cloned()))
    }

    async fn record(
        &self,
        name: &str,
        value: u64,
        digest: Option<ContentDigest>,
    ) -> StorageResult<MetricRecord> {
        self.check()?;
        let record = MetricRecord {
            name: name.to_string(),
            value,
            digest,
            recorded_at: Utc::now(),
        };
        let mut metrics = self.metrics.lock().unwrap();
        metrics
            .entry(name.to_string())
            .or_default()
            .push(record.clone());
        Ok(record)
    }

    async fn history(&self, name: &str) -> StorageResult<Vec<MetricRecord>> {
        self.check()?;
        let metrics = self.metrics.lock().unwrap();
        Ok(metrics
            .get(name)
            .map(|records| records.iter().rev().cloned().collect())
            .unwrap_or_default())
    }
}

// ---------------------------------------------------------------------------
// MemorySnapshotSink
// ---------------------------------------------------------------------------

/// In-memory sink that keeps every published document.
///
/// The "current" snapshot is the last element; `failing()` builds a sink
/// whose every publish is rejected, for exercising the persistence error path.
#[derive(Debug, Default)]
pub struct MemorySnapshotSink {
    published: Mutex<Vec<SnapshotDocument>>,
    fail: bool,
}

impl MemorySnapshotSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            published: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    /// Number of successful publishes.
    pub fn publish_count(&self) -> usize {
        self.published.lock().unwrap().len()
    }

    /// The most recently published document.
    pub fn current(&self) -> Option<SnapshotDocument> {
        self.published.lock().unwrap().last().cloned()
    }

    /// The most recently published document parsed as JSON.
    pub fn current_json(&self) -> Option<serde_json::Value> {
        self.current()
            .and_then(|doc| serde_json::from_slice(&doc.body).ok())
    }
}

#[async_trait]
impl SnapshotSink for MemorySnapshotSink {
    async fn publish(&self, document: &SnapshotDocument) -> StorageResult<SnapshotReceipt> {
        if self.fail {
            return Err(StorageError::SnapshotWrite {
                location: "memory".to_string(),
                reason: "sink configured to fail".to_string(),
            });
        }
        let receipt = SnapshotReceipt {
            location: "memory".to_string(),
            digest: document.digest(),
            entries: document.entries,
            bytes: document.body.len(),
            published_at: Utc::now(),
        };
        self.published.lock().unwrap().push(document.clone());
        Ok(receipt)
    }
}
