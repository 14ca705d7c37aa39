//! Quality-data client

use async_trait::async_trait;
use tracing::debug;

use crate::config::ServiceEndpoints;
use crate::error::ClientError;
use crate::models::{QualityRecord, QualityResponse};
use crate::service_traits::QualityService;
use crate::Result;

/// Reqwest-backed [`QualityService`].
#[derive(Debug, Clone)]
pub struct HttpQualityClient {
    http_client: reqwest::Client,
    quality_url: String,
}

impl HttpQualityClient {
    pub fn new(endpoints: &ServiceEndpoints) -> Result<Self> {
        Ok(Self::with_client(endpoints.http_client()?, endpoints))
    }

    /// Reuse an existing HTTP client.
    pub fn with_client(http_client: reqwest::Client, endpoints: &ServiceEndpoints) -> Self {
        Self {
            http_client,
            quality_url: endpoints.quality_url.clone(),
        }
    }
}

#[async_trait]
impl QualityService for HttpQualityClient {
    async fn fetch_all(&self) -> Result<Vec<QualityRecord>> {
        debug!(url = %self.quality_url, "requesting quality data");

        let response = self.http_client.get(&self.quality_url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                url: self.quality_url.clone(),
            });
        }

        let body: QualityResponse = response.json().await.map_err(|e| ClientError::Decode {
            url: self.quality_url.clone(),
            reason: e.to_string(),
        })?;

        Ok(body.addons)
    }
}
