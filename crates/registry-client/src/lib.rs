//! Registry-Client: external service clients for addon-index
//!
//! ## Layer 1 - Service Access
//!
//! Three read-only services feed the update pipeline:
//!
//! - `SearchService`: paginated full-text search yielding candidate names
//! - `RegistryService`: authoritative package metadata by exact identifier
//! - `QualityService`: one-shot download of curated quality scores
//!
//! Each trait has a reqwest-backed client and an in-memory fake.

mod config;
mod error;
pub mod fakes;
pub mod models;
mod package_id;
pub mod quality;
pub mod registry;
pub mod search;
pub mod service_traits;

pub use config::{
    ServiceEndpoints, DEFAULT_QUALITY_URL, DEFAULT_REGISTRY_URL, DEFAULT_SEARCH_QUERY,
    DEFAULT_SEARCH_URL,
};
pub use error::ClientError;
pub use models::{
    PackageTime, QualityRecord, QualityResponse, RegistryDetail, SearchPackage, SearchPage,
    SearchResult,
};
pub use package_id::PackageId;
pub use quality::HttpQualityClient;
pub use registry::HttpRegistryClient;
pub use search::HttpSearchClient;
pub use service_traits::{QualityService, RegistryService, SearchService};

/// Result type for service calls
pub type Result<T> = std::result::Result<T, ClientError>;
