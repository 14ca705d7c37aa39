//! SurrealDB-backed MetricStore implementation
//!
//! Uses `schema::DbMetricRecord` for persistence, converting to/from
//! `storage_traits::MetricRecord` at the boundary.

use async_trait::async_trait;
use surrealdb::engine::any::Any;
use surrealdb::opt::auth::{Database, Root};
use surrealdb::Surreal;
use tracing::{debug, info, instrument};

use crate::error::StorageError;
use crate::migrations;
use crate::schema::{DbMetricRecord, SeqRow};
use crate::storage_traits::{ContentDigest, MetricRecord, MetricStore, StorageResult};

const DEFAULT_NAMESPACE: &str = "addon_index";
const DEFAULT_DATABASE: &str = "main";

/// Configuration for an authenticated SurrealDB connection
#[derive(Debug, Clone)]
pub struct CloudConfig {
    /// WebSocket endpoint URL (e.g., "wss://xxx.aws-use1.surrealdb.cloud")
    pub endpoint: String,
    /// Database username
    pub username: String,
    /// Database password
    pub password: String,
    /// Namespace (default: "addon_index")
    pub namespace: String,
    /// Database name (default: "main")
    pub database: String,
    /// Whether this is a root user (true) or database user (false)
    pub is_root: bool,
}

impl CloudConfig {
    /// Create from environment variables
    ///
    /// Reads:
    /// - SURREALDB_ENDPOINT (required)
    /// - SURREALDB_USERNAME (required)
    /// - SURREALDB_PASSWORD (required)
    /// - SURREALDB_NAMESPACE (optional, default: "addon_index")
    /// - SURREALDB_DATABASE (optional, default: "main")
    /// - SURREALDB_ROOT (optional, default: "false")
    pub fn from_env() -> std::result::Result<Self, String> {
        let endpoint =
            std::env::var("SURREALDB_ENDPOINT").map_err(|_| "SURREALDB_ENDPOINT not set")?;
        let username =
            std::env::var("SURREALDB_USERNAME").map_err(|_| "SURREALDB_USERNAME not set")?;
        let password =
            std::env::var("SURREALDB_PASSWORD").map_err(|_| "SURREALDB_PASSWORD not set")?;
        let namespace = std::env::var("SURREALDB_NAMESPACE")
            .unwrap_or_else(|_| DEFAULT_NAMESPACE.to_string());
        let database =
            std::env::var("SURREALDB_DATABASE").unwrap_or_else(|_| DEFAULT_DATABASE.to_string());
        let is_root = std::env::var("SURREALDB_ROOT")
            .map(|v| v.to_lowercase() == "true")
            .unwrap_or(false);

        Ok(Self {
            endpoint,
            username,
            password,
            namespace,
            database,
            is_root,
        })
    }
}

/// SurrealDB-backed implementation of [`MetricStore`].
#[derive(Clone, Debug)]
pub struct SurrealMetricStore {
    db: Surreal<Any>,
}

impl SurrealMetricStore {
    /// Create an in-memory instance for testing.
    pub async fn in_memory() -> StorageResult<Self> {
        Self::connect("mem://").await
    }

    /// Connect to any SurrealDB URL without authentication
    /// (`mem://`, `surrealkv://path`, `ws://host:port`).
    ///
    /// Local `surrealkv://` directories are created if missing.
    #[instrument(skip_all, fields(url = %url))]
    pub async fn connect(url: &str) -> StorageResult<Self> {
        if let Some(path) = url.strip_prefix("surrealkv://") {
            std::fs::create_dir_all(path).map_err(|e| {
                StorageError::Connection(format!(
                    "Failed to create database directory {}: {}",
                    path, e
                ))
            })?;
        }

        let db = surrealdb::engine::any::connect(url)
            .await
            .map_err(|e| StorageError::Connection(format!("Failed to connect to {url}: {e}")))?;

        db.use_ns(DEFAULT_NAMESPACE)
            .use_db(DEFAULT_DATABASE)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        migrations::init_schema(&db).await?;
        info!("SurrealMetricStore connected ({})", url);
        Ok(Self { db })
    }

    /// Connect with credentials.
    #[instrument(skip(config), fields(endpoint = %config.endpoint, namespace = %config.namespace))]
    pub async fn connect_cloud(config: CloudConfig) -> StorageResult<Self> {
        let db = surrealdb::engine::any::connect(&config.endpoint)
            .await
            .map_err(|e| {
                StorageError::Connection(format!(
                    "Failed to connect to {}: {}",
                    config.endpoint, e
                ))
            })?;

        if config.is_root {
            db.signin(Root {
                username: &config.username,
                password: &config.password,
            })
            .await
            .map_err(|e| StorageError::Connection(format!("Root auth failed: {e}")))?;
        } else {
            db.signin(Database {
                namespace: &config.namespace,
                database: &config.database,
                username: &config.username,
                password: &config.password,
            })
            .await
            .map_err(|e| StorageError::Connection(format!("DB auth failed: {e}")))?;
        }

        db.use_ns(&config.namespace)
            .use_db(&config.database)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        migrations::init_schema(&db).await?;
        info!("SurrealMetricStore connected (cloud)");
        Ok(Self { db })
    }

    /// Connect using environment variables, falling back to `default_url`.
    ///
    /// If SURREALDB_ENDPOINT (plus credentials) is set, connects with auth.
    /// Otherwise connects to `url` without authentication.
    pub async fn from_env_or(url: &str) -> StorageResult<Self> {
        if let Ok(config) = CloudConfig::from_env() {
            return Self::connect_cloud(config).await;
        }
        Self::connect(url).await
    }

    // -- private helpers -----------------------------------------------------

    async fn next_seq(&self, name: &str) -> StorageResult<u64> {
        let mut res = self
            .db
            .query("SELECT seq FROM metrics WHERE name = $name ORDER BY seq DESC LIMIT 1")
            .bind(("name", name.to_string()))
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))?;

        let rows: Vec<SeqRow> = res
            .take(0)
            .map_err(|e| StorageError::Backend(e.to_string()))?;

        Ok(rows.first().map(|r| r.seq + 1).unwrap_or(1))
    }
}

#[async_trait]
impl MetricStore for SurrealMetricStore {
    #[instrument(skip(self))]
    async fn latest(&self, name: &str) -> StorageResult<Option<MetricRecord>> {
        let mut res = self
            .db
            .query("SELECT * FROM metrics WHERE name = $name ORDER BY seq DESC LIMIT 1")
            .bind(("name", name.to_string()))
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))?;

        let rows: Vec<DbMetricRecord> = res
            .take(0)
            .map_err(|e| StorageError::Backend(e.to_string()))?;

        rows.into_iter()
            .next()
            .map(DbMetricRecord::into_metric_record)
            .transpose()
    }

    #[instrument(skip(self, digest))]
    async fn record(
        &self,
        name: &str,
        value: u64,
        digest: Option<ContentDigest>,
    ) -> StorageResult<MetricRecord> {
        let seq = self.next_seq(name).await?;
        let row = DbMetricRecord::new(name, value, digest.as_ref(), seq);

        let created: Option<DbMetricRecord> = self
            .db
            .create("metrics")
            .content(row)
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))?;

        debug!(name, value, seq, "metric recorded");

        created
            .ok_or_else(|| StorageError::Backend("failed to create metric record".to_string()))?
            .into_metric_record()
    }

    #[instrument(skip(self))]
    async fn history(&self, name: &str) -> StorageResult<Vec<MetricRecord>> {
        let mut res = self
            .db
            .query("SELECT * FROM metrics WHERE name = $name ORDER BY seq DESC")
            .bind(("name", name.to_string()))
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))?;

        let rows: Vec<DbMetricRecord> = res
            .take(0)
            .map_err(|e| StorageError::Backend(e.to_string()))?;

        rows.into_iter()
            .map(DbMetricRecord::into_metric_record)
            .collect()
    }
}
