//! Service endpoint configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ClientError;
use crate::Result;

/// Default search endpoint (npms.io).
pub const DEFAULT_SEARCH_URL: &str = "https://api.npms.io/v2/search";

/// Default search query identifying the plugin family.
pub const DEFAULT_SEARCH_QUERY: &str = "ember";

/// Default registry base URL.
pub const DEFAULT_REGISTRY_URL: &str = "https://registry.npmjs.org/";

/// Default quality-data endpoint (Ember Observer).
pub const DEFAULT_QUALITY_URL: &str = "https://www.emberobserver.com/api/v2/autocomplete_data";

/// Endpoints and transport settings for the three external services.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceEndpoints {
    /// Search endpoint, queried as `?q=<query>&size=<n>&from=<offset>`
    pub search_url: String,
    /// Search term selecting the ecosystem family
    pub search_query: String,
    /// Registry base URL; the package id is appended as one path segment
    pub registry_url: String,
    /// Quality-data endpoint returning `{ addons: [...] }`
    pub quality_url: String,
    /// User agent sent with every request
    pub user_agent: String,
    /// Per-request timeout. `None` waits indefinitely.
    #[serde(default, with = "optional_secs")]
    pub timeout: Option<Duration>,
}

impl Default for ServiceEndpoints {
    fn default() -> Self {
        ServiceEndpoints {
            search_url: DEFAULT_SEARCH_URL.to_string(),
            search_query: DEFAULT_SEARCH_QUERY.to_string(),
            registry_url: DEFAULT_REGISTRY_URL.to_string(),
            quality_url: DEFAULT_QUALITY_URL.to_string(),
            user_agent: format!("addon-index/{}", env!("CARGO_PKG_VERSION")),
            timeout: None,
        }
    }
}

impl ServiceEndpoints {
    pub fn with_search_url(mut self, url: &str) -> Self {
        self.search_url = url.to_string();
        self
    }

    pub fn with_search_query(mut self, query: &str) -> Self {
        self.search_query = query.to_string();
        self
    }

    pub fn with_registry_url(mut self, url: &str) -> Self {
        self.registry_url = url.to_string();
        self
    }

    pub fn with_quality_url(mut self, url: &str) -> Self {
        self.quality_url = url.to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the shared HTTP client for these settings.
    pub fn http_client(&self) -> Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder().user_agent(&self.user_agent);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        builder
            .build()
            .map_err(|e| ClientError::Http(format!("Failed to build HTTP client: {e}")))
    }
}

mod optional_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(d) => serializer.serialize_some(&d.as_secs()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_secs))
    }
}
