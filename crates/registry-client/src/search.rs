//! Search service client
//!
//! Issues `GET <search_url>?q=<query>&size=<size>&from=<offset>` and decodes
//! `{ results: [{ package: { name, date } }] }`. No retries: a failed page is
//! reported to the caller as-is.

use async_trait::async_trait;
use tracing::debug;

use crate::config::ServiceEndpoints;
use crate::error::ClientError;
use crate::models::SearchPage;
use crate::service_traits::SearchService;
use crate::Result;

/// Reqwest-backed [`SearchService`].
#[derive(Debug, Clone)]
pub struct HttpSearchClient {
    http_client: reqwest::Client,
    search_url: String,
    query: String,
}

impl HttpSearchClient {
    pub fn new(endpoints: &ServiceEndpoints) -> Result<Self> {
        Ok(Self {
            http_client: endpoints.http_client()?,
            search_url: endpoints.search_url.clone(),
            query: endpoints.search_query.clone(),
        })
    }

    /// Reuse an existing HTTP client.
    pub fn with_client(http_client: reqwest::Client, endpoints: &ServiceEndpoints) -> Self {
        Self {
            http_client,
            search_url: endpoints.search_url.clone(),
            query: endpoints.search_query.clone(),
        }
    }
}

#[async_trait]
impl SearchService for HttpSearchClient {
    async fn search_page(&self, from: usize, size: usize) -> Result<SearchPage> {
        debug!(from, size, query = %self.query, "requesting search page");

        let size_param = size.to_string();
        let from_param = from.to_string();
        let response = self
            .http_client
            .get(&self.search_url)
            .query(&[
                ("q", self.query.as_str()),
                ("size", size_param.as_str()),
                ("from", from_param.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                url: self.search_url.clone(),
            });
        }

        response
            .json::<SearchPage>()
            .await
            .map_err(|e| ClientError::Decode {
                url: self.search_url.clone(),
                reason: e.to_string(),
            })
    }
}
