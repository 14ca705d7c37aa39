//! Wire models for the three external services.
//!
//! - search service: `{ results: [{ package: { name, date } }] }`
//! - registry: one package document with `time.modified`
//! - quality data: `{ addons: [{ name, score, is_wip }] }`

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// Search service
// ---------------------------------------------------------------------------

/// One page of search results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchPage {
    #[serde(default)]
    pub results: Vec<SearchResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub package: SearchPackage,
}

/// Name and last-publish date of one search hit.
///
/// Both fields are lenient: a missing or null name becomes `""` and a date
/// that is neither RFC 3339 text nor epoch milliseconds becomes `None`, so
/// one odd record never fails the whole page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchPackage {
    #[serde(default, deserialize_with = "lenient_name")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub date: Option<DateTime<Utc>>,
}

impl SearchPage {
    /// Convenience constructor used by fakes and tests.
    pub fn from_packages(packages: Vec<SearchPackage>) -> Self {
        Self {
            results: packages
                .into_iter()
                .map(|package| SearchResult { package })
                .collect(),
        }
    }
}

fn lenient_name<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::String(name)) => name,
        _ => String::new(),
    })
}

fn lenient_datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::String(s)) => DateTime::parse_from_rfc3339(&s)
            .ok()
            .map(|d| d.with_timezone(&Utc)),
        Some(Value::Number(n)) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    })
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Top-level package document keys that are not carried into the snapshot.
///
/// `versions` and `readme` dominate document size; `users` and
/// `_attachments` are never descriptive. `time` is re-added in typed form.
pub const DROPPED_FIELDS: &[&str] = &["versions", "readme", "users", "_attachments", "time"];

/// Publication timestamps of a package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageTime {
    pub modified: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
}

/// Registry metadata for one package.
///
/// `name` and `time.modified` are typed; every other descriptive field of
/// the package document is kept verbatim in `fields`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryDetail {
    pub name: String,
    pub time: PackageTime,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl RegistryDetail {
    /// Build from a raw package document.
    ///
    /// Returns a description of the problem when `name` or `time.modified`
    /// is missing or malformed.
    pub fn from_document(mut doc: Map<String, Value>) -> Result<Self, String> {
        let name = match doc.remove("name") {
            Some(Value::String(name)) if !name.is_empty() => name,
            _ => return Err("missing package name".to_string()),
        };
        let time: PackageTime = match doc.get("time") {
            Some(time) => serde_json::from_value(time.clone())
                .map_err(|e| format!("invalid time block: {e}"))?,
            None => return Err("missing time block".to_string()),
        };
        for key in DROPPED_FIELDS {
            doc.remove(*key);
        }
        Ok(Self {
            name,
            time,
            fields: doc,
        })
    }

    /// Last modification time reported by the registry.
    pub fn modified(&self) -> DateTime<Utc> {
        self.time.modified
    }

    /// Minimal detail, handy for tests and fakes.
    pub fn minimal(name: impl Into<String>, modified: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            time: PackageTime {
                modified,
                created: None,
            },
            fields: Map::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Quality-data service
// ---------------------------------------------------------------------------

/// Body of the quality-data endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QualityResponse {
    #[serde(default)]
    pub addons: Vec<QualityRecord>,
}

/// Quality entry for one addon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityRecord {
    pub name: String,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub is_wip: Option<bool>,
}

impl QualityRecord {
    pub fn new(name: impl Into<String>, score: Option<f64>, is_wip: bool) -> Self {
        Self {
            name: name.into(),
            score,
            is_wip: Some(is_wip),
        }
    }
}
