//! Discovered package names.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A name reported by the search service, not yet confirmed or enriched.
///
/// `discovered_at` is the search service's last-publish date; it is `None`
/// when the service omitted it or sent something unparsable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub name: String,
    pub discovered_at: Option<DateTime<Utc>>,
}

impl Candidate {
    pub fn new(name: impl Into<String>, discovered_at: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            discovered_at: Some(discovered_at),
        }
    }

    pub fn undated(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            discovered_at: None,
        }
    }
}
