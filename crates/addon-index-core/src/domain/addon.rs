//! Enriched addon: registry metadata plus its score.

use chrono::{DateTime, Utc};
use registry_client::RegistryDetail;
use serde::{Deserialize, Serialize};

use super::score::Score;

/// Final unit of output.
///
/// Serializes as the flat registry document with one extra
/// `emberObserver` key carrying the legacy score encoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedAddon {
    #[serde(flatten)]
    pub detail: RegistryDetail,
    #[serde(rename = "emberObserver")]
    pub score: Score,
}

impl EnrichedAddon {
    pub fn new(detail: RegistryDetail, score: Score) -> Self {
        Self { detail, score }
    }

    pub fn name(&self) -> &str {
        &self.detail.name
    }

    pub fn modified(&self) -> DateTime<Utc> {
        self.detail.modified()
    }
}
