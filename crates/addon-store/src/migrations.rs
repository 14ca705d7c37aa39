//! SurrealDB schema initialization
//!
//! Sets up the `metrics` table and its indexes. Safe to call on every
//! connection (idempotent).

use surrealdb::engine::any::Any;
use surrealdb::Surreal;
use tracing::{debug, info};

use crate::error::StorageError;
use crate::storage_traits::StorageResult;

/// Initialize all addon-index tables in SurrealDB
pub async fn init_schema(db: &Surreal<Any>) -> StorageResult<()> {
    info!("Initializing addon-index SurrealDB schema");
    init_metrics_table(db).await?;
    info!("addon-index schema initialization complete");
    Ok(())
}

/// Initialize `metrics` table with indexes
///
/// Schema:
/// ```text
/// TABLE metrics {
///   name:         STRING (indexed)
///   value:        INT
///   digest:       STRING?
///   seq:          INT (unique per name)
///   recorded_at:  DATETIME
/// }
/// ```
///
/// Rows are append-only (enforced via permissions: no update, no delete).
async fn init_metrics_table(db: &Surreal<Any>) -> StorageResult<()> {
    debug!("Initializing metrics table");

    let sql = r#"
        DEFINE TABLE IF NOT EXISTS metrics
            SCHEMALESS
            PERMISSIONS
                FOR create FULL
                FOR read FULL
                FOR update NONE
                FOR delete NONE;

        DEFINE INDEX IF NOT EXISTS idx_metric_name ON TABLE metrics COLUMNS name;
        DEFINE INDEX IF NOT EXISTS idx_metric_seq ON TABLE metrics COLUMNS name, seq UNIQUE;
    "#;

    db.query(sql)
        .await
        .map_err(|e| StorageError::Backend(format!("Failed to define metrics table: {e}")))?
        .check()
        .map_err(|e| StorageError::Backend(format!("Metrics schema rejected: {e}")))?;

    Ok(())
}
