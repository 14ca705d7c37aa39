//! Service trait definitions for registry-client
//!
//! These traits are the seams the update pipeline talks through:
//! - `SearchService`: paginated candidate discovery
//! - `RegistryService`: exact-name package metadata lookup
//! - `QualityService`: one-shot quality-data download
//!
//! All traits are async and transport-agnostic. Reqwest-backed clients live
//! in `search`, `registry` and `quality`; in-memory fakes in `fakes`.

use async_trait::async_trait;

use crate::models::{QualityRecord, RegistryDetail, SearchPage};
use crate::package_id::PackageId;
use crate::Result;

/// Paginated search over the ecosystem's package index.
#[async_trait]
pub trait SearchService: Send + Sync {
    /// Fetch `size` results starting at offset `from`.
    async fn search_page(&self, from: usize, size: usize) -> Result<SearchPage>;
}

/// Authoritative package registry.
#[async_trait]
pub trait RegistryService: Send + Sync {
    /// Fetch metadata for exactly `id`.
    ///
    /// Returns `ClientError::NotFound` when the registry has no such package.
    async fn package(&self, id: &PackageId) -> Result<RegistryDetail>;
}

/// External quality rating service.
#[async_trait]
pub trait QualityService: Send + Sync {
    /// Download every quality record in one request.
    async fn fetch_all(&self) -> Result<Vec<QualityRecord>>;
}
