//! Registry client
//!
//! Looks up one package document by exact identifier. The identifier is
//! appended to the base URL as a single percent-encoded path segment, so
//! `@scope/pkg` becomes `<base>/@scope%2Fpkg` and is never read as a
//! version specifier.

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde_json::{Map, Value};
use tracing::debug;

use crate::config::ServiceEndpoints;
use crate::error::ClientError;
use crate::models::RegistryDetail;
use crate::package_id::PackageId;
use crate::service_traits::RegistryService;
use crate::Result;

/// Reqwest-backed [`RegistryService`].
#[derive(Debug, Clone)]
pub struct HttpRegistryClient {
    http_client: reqwest::Client,
    base_url: Url,
}

impl HttpRegistryClient {
    pub fn new(endpoints: &ServiceEndpoints) -> Result<Self> {
        Self::with_client(endpoints.http_client()?, endpoints)
    }

    /// Reuse an existing HTTP client.
    pub fn with_client(http_client: reqwest::Client, endpoints: &ServiceEndpoints) -> Result<Self> {
        let base_url =
            Url::parse(&endpoints.registry_url).map_err(|e| ClientError::InvalidUrl {
                url: endpoints.registry_url.clone(),
                reason: e.to_string(),
            })?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl {
                url: endpoints.registry_url.clone(),
                reason: "URL cannot be a base".to_string(),
            });
        }
        Ok(Self {
            http_client,
            base_url,
        })
    }

    /// URL of the package document for `id`.
    pub fn package_url(&self, id: &PackageId) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl {
                url: self.base_url.to_string(),
                reason: "URL cannot be a base".to_string(),
            })?
            .pop_if_empty()
            .push(id.as_str());
        Ok(url)
    }
}

#[async_trait]
impl RegistryService for HttpRegistryClient {
    async fn package(&self, id: &PackageId) -> Result<RegistryDetail> {
        let url = self.package_url(id)?;
        debug!(package = %id, url = %url, "requesting package document");

        let response = self.http_client.get(url.clone()).send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound(id.to_string()));
        }
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let doc: Map<String, Value> =
            response.json().await.map_err(|e| ClientError::Decode {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        RegistryDetail::from_document(doc).map_err(|reason| ClientError::Decode {
            url: url.to_string(),
            reason,
        })
    }
}
