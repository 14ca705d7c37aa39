//! Schema definitions for addon-index SurrealDB tables
//!
//! Tables:
//! - metrics: append-only per-run counters

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::storage_traits::{ContentDigest, MetricRecord, StorageResult};

/// Module for serializing chrono DateTime to SurrealDB datetime format
mod surreal_datetime {
    use chrono::{DateTime, Utc};
    use serde::{self, Deserialize, Deserializer, Serializer};
    use surrealdb::sql::Datetime as SurrealDatetime;

    pub fn serialize<S>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let sd = SurrealDatetime::from(*date);
        serde::Serialize::serialize(&sd, serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let sd = SurrealDatetime::deserialize(deserializer)?;
        Ok(DateTime::from(sd))
    }
}

/// Row of the `metrics` table.
///
/// `seq` is per-metric and strictly increasing; it orders rows whose
/// `recorded_at` values collide.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DbMetricRecord {
    pub name: String,
    pub value: u64,
    pub digest: Option<String>,
    pub seq: u64,
    #[serde(with = "surreal_datetime")]
    pub recorded_at: DateTime<Utc>,
}

impl DbMetricRecord {
    pub fn new(name: &str, value: u64, digest: Option<&ContentDigest>, seq: u64) -> Self {
        Self {
            name: name.to_string(),
            value,
            digest: digest.map(|d| d.as_str().to_string()),
            seq,
            recorded_at: Utc::now(),
        }
    }

    /// Convert the DB row into the trait-level record, validating the digest.
    pub fn into_metric_record(self) -> StorageResult<MetricRecord> {
        Ok(MetricRecord {
            name: self.name,
            value: self.value,
            digest: self.digest.map(ContentDigest::try_from).transpose()?,
            recorded_at: self.recorded_at,
        })
    }
}

/// Projection used when looking up the next sequence number.
#[derive(Debug, Deserialize)]
pub struct SeqRow {
    pub seq: u64,
}
