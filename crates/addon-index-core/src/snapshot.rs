//! Deduplication, ordering and the published snapshot.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use addon_store::SnapshotDocument;
use serde::{Deserialize, Serialize};

use crate::domain::{EnrichedAddon, PipelineError, Result};

/// Which entry survives when a name appears more than once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DedupPolicy {
    #[default]
    FirstSeen,
    LastSeen,
}

impl fmt::Display for DedupPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DedupPolicy::FirstSeen => write!(f, "first-seen"),
            DedupPolicy::LastSeen => write!(f, "last-seen"),
        }
    }
}

impl FromStr for DedupPolicy {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "first-seen" | "first" => Ok(DedupPolicy::FirstSeen),
            "last-seen" | "last" => Ok(DedupPolicy::LastSeen),
            other => Err(PipelineError::Config(format!(
                "unknown dedup policy {other:?} (expected first-seen or last-seen)"
            ))),
        }
    }
}

/// Collapse entries sharing a name to one, per `policy`.
///
/// Survivors keep the relative order of their chosen occurrence.
pub fn dedupe(addons: Vec<EnrichedAddon>, policy: DedupPolicy) -> Vec<EnrichedAddon> {
    fn keep_first(addons: impl Iterator<Item = EnrichedAddon>) -> Vec<EnrichedAddon> {
        let mut seen = HashSet::new();
        addons
            .filter(|addon| seen.insert(addon.name().to_string()))
            .collect()
    }

    match policy {
        DedupPolicy::FirstSeen => keep_first(addons.into_iter()),
        DedupPolicy::LastSeen => {
            let mut kept = keep_first(addons.into_iter().rev());
            kept.reverse();
            kept
        }
    }
}

/// Most recently modified first; equal timestamps fall back to name ascending.
pub fn sort_by_modified(addons: &mut [EnrichedAddon]) {
    addons.sort_by(|a, b| {
        b.modified()
            .cmp(&a.modified())
            .then_with(|| a.name().cmp(b.name()))
    });
}

/// Final ordered, deduplicated, scored set for one run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    entries: Vec<EnrichedAddon>,
}

impl Snapshot {
    /// Deduplicate then sort.
    pub fn assemble(addons: Vec<EnrichedAddon>, policy: DedupPolicy) -> Self {
        let mut entries = dedupe(addons, policy);
        sort_by_modified(&mut entries);
        Self { entries }
    }

    pub fn entries(&self) -> &[EnrichedAddon] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(EnrichedAddon::name).collect()
    }

    /// Compact JSON array of all entries.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(&self.entries)?)
    }

    /// Serialized form handed to the snapshot sink.
    pub fn to_document(&self) -> Result<SnapshotDocument> {
        Ok(SnapshotDocument::new(self.to_json()?, self.len()))
    }
}
