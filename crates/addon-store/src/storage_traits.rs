//! Storage trait definitions for addon-index
//!
//! These traits define the two durable outputs of an update run:
//! - `SnapshotSink`: whole-document replacement of the published snapshot
//! - `MetricStore`: append-only per-run counters read back by the change gate
//!
//! All traits are async and backend-agnostic. In-memory fakes are provided
//! for testing via the `fakes` module.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::error::StorageError;

/// Result type for storage operations
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Metric holding the size (and name digest) of the filtered candidate set.
pub const METRIC_CANDIDATES: &str = "candidates";

/// Metric holding the number of entries in the published snapshot.
pub const METRIC_TOTAL: &str = "total";

// ---------------------------------------------------------------------------
// ContentDigest
// ---------------------------------------------------------------------------

/// Content digest (SHA-256 hex string).
///
/// The inner field is private to guarantee the string is always valid
/// lowercase hex produced by `from_bytes` or validated via `TryFrom<String>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub struct ContentDigest(String);

impl ContentDigest {
    /// Compute the SHA-256 digest of the given bytes.
    pub fn from_bytes(data: &[u8]) -> Self {
        use sha2::Digest;
        let mut hasher = Sha256::new();
        hasher.update(data);
        ContentDigest(hex::encode(hasher.finalize()))
    }

    /// Return the full hex string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short form (first 12 hex chars).
    pub fn short(&self) -> &str {
        &self.0[..12.min(self.0.len())]
    }
}

impl TryFrom<String> for ContentDigest {
    type Error = StorageError;

    fn try_from(s: String) -> std::result::Result<Self, Self::Error> {
        if s.len() != 64 || !s.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(StorageError::InvalidDigest { digest: s });
        }
        Ok(ContentDigest(s.to_ascii_lowercase()))
    }
}

impl std::fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// SnapshotSink: whole-document publication
// ---------------------------------------------------------------------------

/// A fully serialized snapshot ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotDocument {
    /// JSON array bytes, exactly as they will be stored.
    pub body: Vec<u8>,
    /// Number of addon entries in `body`.
    pub entries: usize,
}

impl SnapshotDocument {
    pub fn new(body: Vec<u8>, entries: usize) -> Self {
        Self { body, entries }
    }

    /// Digest of the serialized body.
    pub fn digest(&self) -> ContentDigest {
        ContentDigest::from_bytes(&self.body)
    }
}

/// What a sink reports back after a successful publish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotReceipt {
    /// Where the snapshot now lives (path or backend-specific key)
    pub location: String,
    /// Digest of the stored bytes
    pub digest: ContentDigest,
    /// Number of addon entries
    pub entries: usize,
    /// Size of the stored document in bytes
    pub bytes: usize,
    /// When the snapshot was published
    pub published_at: DateTime<Utc>,
}

/// Durable destination for the published snapshot.
///
/// Guarantees:
/// - `publish` replaces any prior snapshot wholesale.
/// - A failed `publish` leaves the prior snapshot untouched; readers never
///   observe a partially written document.
/// - No retries are performed here; failures propagate to the caller.
#[async_trait]
pub trait SnapshotSink: Send + Sync {
    /// Replace the current snapshot with `document`.
    async fn publish(&self, document: &SnapshotDocument) -> StorageResult<SnapshotReceipt>;
}

// ---------------------------------------------------------------------------
// MetricStore: per-run counters
// ---------------------------------------------------------------------------

/// One recorded value of a named metric.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricRecord {
    /// Metric name (e.g. `candidates`, `total`)
    pub name: String,
    /// Recorded value
    pub value: u64,
    /// Optional content digest describing what was counted
    pub digest: Option<ContentDigest>,
    /// When the value was recorded
    pub recorded_at: DateTime<Utc>,
}

/// Append-only metric log.
///
/// Semantics:
/// - `record` appends a new value; earlier values are never modified.
/// - `latest` returns the most recently recorded value, if any.
/// - `history` returns all values newest first.
#[async_trait]
pub trait MetricStore: Send + Sync {
    /// Most recent record for `name`, or `None` if nothing was recorded yet.
    async fn latest(&self, name: &str) -> StorageResult<Option<MetricRecord>>;

    /// Append a value for `name`.
    async fn record(
        &self,
        name: &str,
        value: u64,
        digest: Option<ContentDigest>,
    ) -> StorageResult<MetricRecord>;

    /// Full history for `name` (newest first).
    async fn history(&self, name: &str) -> StorageResult<Vec<MetricRecord>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_sha256_hex() {
        let digest = ContentDigest::from_bytes(b"addons");
        assert_eq!(digest.as_str().len(), 64);
        assert_eq!(digest.short().len(), 12);
        assert!(digest.as_str().starts_with(digest.short()));
    }

    #[test]
    fn digest_try_from_rejects_garbage() {
        let err = ContentDigest::try_from("not-a-digest".to_string()).unwrap_err();
        assert!(matches!(err, StorageError::InvalidDigest { .. }));
    }

    #[test]
    fn digest_try_from_normalizes_case() {
        let upper = "A".repeat(64);
        let digest = ContentDigest::try_from(upper).unwrap();
        assert_eq!(digest.as_str(), "a".repeat(64));
    }

    #[test]
    fn digest_deserialize_is_validated() {
        let digest = ContentDigest::from_bytes(b"ember");
        let json = serde_json::to_string(&digest).unwrap();
        let back: ContentDigest = serde_json::from_str(&json).unwrap();
        assert_eq!(back, digest);

        assert!(serde_json::from_str::<ContentDigest>(r#""not-hex""#).is_err());

        let record = serde_json::json!({
            "name": "candidates",
            "value": 3,
            "digest": "zz",
            "recorded_at": "2026-01-01T00:00:00Z",
        });
        assert!(serde_json::from_value::<MetricRecord>(record).is_err());
    }

    #[test]
    fn snapshot_document_digest_matches_body() {
        let doc = SnapshotDocument::new(b"[]".to_vec(), 0);
        assert_eq!(doc.digest(), ContentDigest::from_bytes(b"[]"));
    }
}
