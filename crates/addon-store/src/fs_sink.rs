//! Filesystem snapshot sink
//!
//! Writes the snapshot document and a small last-updated marker next to it.
//! Both files are replaced with a temp-file-then-rename so a reader sees
//! either the previous document or the new one, never a partial write.
//! Both temp files are staged before either rename, and a failed marker
//! rename puts the previous snapshot back.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::error::StorageError;
use crate::storage_traits::{
    ContentDigest, SnapshotDocument, SnapshotReceipt, SnapshotSink, StorageResult,
};

/// Default file name of the published snapshot.
pub const DEFAULT_SNAPSHOT_FILE: &str = "addons.json";

/// Default file name of the last-updated marker.
pub const DEFAULT_MARKER_FILE: &str = "last_updated.json";

/// Contents of the last-updated marker file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastUpdated {
    pub date: DateTime<Utc>,
    pub entries: usize,
    pub digest: ContentDigest,
}

/// Snapshot sink backed by a directory on the local filesystem.
///
/// Layout: `<dir>/<snapshot_file>` and `<dir>/<marker_file>`
#[derive(Debug, Clone)]
pub struct FsSnapshotSink {
    dir: PathBuf,
    snapshot_file: String,
    marker_file: String,
}

impl FsSnapshotSink {
    /// Create a sink writing `addons.json` and `last_updated.json` into `dir`.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            snapshot_file: DEFAULT_SNAPSHOT_FILE.to_string(),
            marker_file: DEFAULT_MARKER_FILE.to_string(),
        }
    }

    /// Override the snapshot file name
    pub fn with_snapshot_file(mut self, name: impl Into<String>) -> Self {
        self.snapshot_file = name.into();
        self
    }

    /// Override the marker file name
    pub fn with_marker_file(mut self, name: impl Into<String>) -> Self {
        self.marker_file = name.into();
        self
    }

    pub fn snapshot_path(&self) -> PathBuf {
        self.dir.join(&self.snapshot_file)
    }

    pub fn marker_path(&self) -> PathBuf {
        self.dir.join(&self.marker_file)
    }

    /// Read back the marker written by the last successful publish.
    pub fn read_marker(&self) -> StorageResult<Option<LastUpdated>> {
        match read_existing(&self.marker_path())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }
}

/// Write `data` to a synced temp file next to `path`, without renaming it.
fn stage(path: &Path, data: &[u8]) -> StorageResult<NamedTempFile> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(data)?;
    tmp.as_file().sync_all()?;
    Ok(tmp)
}

fn persist(tmp: NamedTempFile, path: &Path) -> StorageResult<()> {
    tmp.persist(path).map_err(|e| StorageError::SnapshotWrite {
        location: path.display().to_string(),
        reason: e.error.to_string(),
    })?;
    Ok(())
}

/// Atomic write: write to a temp file in the same directory, then rename.
fn write_atomic(path: &Path, data: &[u8]) -> StorageResult<()> {
    persist(stage(path, data)?, path)
}

fn read_existing(path: &Path) -> StorageResult<Option<Vec<u8>>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(StorageError::Io(e)),
    }
}

/// Replace the snapshot and its marker as one unit.
///
/// Every fallible step before the snapshot rename leaves the directory as it
/// was. If the marker rename fails afterwards, the previous snapshot (or its
/// absence) is restored before the error is returned.
fn replace_pair(
    snapshot_path: &Path,
    body: &[u8],
    marker_path: &Path,
    marker: &[u8],
) -> StorageResult<()> {
    let snapshot_tmp = stage(snapshot_path, body)?;
    let marker_tmp = stage(marker_path, marker)?;
    let previous = read_existing(snapshot_path)?;

    persist(snapshot_tmp, snapshot_path)?;
    if let Err(err) = persist(marker_tmp, marker_path) {
        let restored = match &previous {
            Some(bytes) => write_atomic(snapshot_path, bytes),
            None => fs::remove_file(snapshot_path).map_err(StorageError::from),
        };
        if let Err(restore_err) = restored {
            warn!(
                path = %snapshot_path.display(),
                error = %restore_err,
                "failed to restore previous snapshot"
            );
        }
        return Err(err);
    }
    Ok(())
}

#[async_trait]
impl SnapshotSink for FsSnapshotSink {
    async fn publish(&self, document: &SnapshotDocument) -> StorageResult<SnapshotReceipt> {
        let snapshot_path = self.snapshot_path();
        let marker_path = self.marker_path();
        let digest = document.digest();
        let published_at = Utc::now();

        let marker = LastUpdated {
            date: published_at,
            entries: document.entries,
            digest: digest.clone(),
        };
        let marker_bytes = serde_json::to_vec(&marker)?;
        let body = document.body.clone();
        let target = snapshot_path.clone();

        debug!(path = %snapshot_path.display(), bytes = body.len(), "writing snapshot");

        tokio::task::spawn_blocking(move || {
            replace_pair(&target, &body, &marker_path, &marker_bytes)
        })
        .await
        .map_err(|e| StorageError::Backend(format!("snapshot writer task failed: {e}")))??;

        info!(
            path = %snapshot_path.display(),
            entries = document.entries,
            digest = %digest.short(),
            "snapshot published"
        );

        Ok(SnapshotReceipt {
            location: snapshot_path.display().to_string(),
            digest,
            entries: document.entries,
            bytes: document.body.len(),
            published_at,
        })
    }
}
