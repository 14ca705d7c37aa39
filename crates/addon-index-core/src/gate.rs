//! Change-detection gate.
//!
//! Decides after filtering whether a run is worth continuing. The previous
//! run's filtered candidate count (and digest of the name set) is read from
//! the metric store by the caller and passed in.
//!
//! Two modes:
//! - `Count`: proceed when the candidate count differs. Same-count churn
//!   (one package replaced by another) goes unnoticed.
//! - `ContentDigest`: proceed when the sorted, deduplicated name set differs.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use addon_store::{ContentDigest, MetricRecord};
use serde::{Deserialize, Serialize};

use crate::domain::{Candidate, PipelineError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GateMode {
    #[default]
    Count,
    ContentDigest,
}

impl fmt::Display for GateMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GateMode::Count => write!(f, "count"),
            GateMode::ContentDigest => write!(f, "content-digest"),
        }
    }
}

impl FromStr for GateMode {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "count" => Ok(GateMode::Count),
            "content-digest" | "digest" => Ok(GateMode::ContentDigest),
            other => Err(PipelineError::Config(format!(
                "unknown gate mode {other:?} (expected count or content-digest)"
            ))),
        }
    }
}

/// Why the gate decided the way it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateReason {
    /// Nothing recorded yet.
    FirstRun,
    Forced,
    CountChanged,
    CountUnchanged,
    DigestChanged,
    DigestUnchanged,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateDecision {
    pub proceed: bool,
    pub reason: GateReason,
    pub mode: GateMode,
    /// Size of the filtered candidate set.
    pub current_count: usize,
    pub previous_count: Option<u64>,
    /// Digest of the filtered candidate names.
    pub digest: ContentDigest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChangeGate {
    mode: GateMode,
    force: bool,
}

impl ChangeGate {
    pub fn new(mode: GateMode) -> Self {
        Self { mode, force: false }
    }

    /// Always proceed, still reporting counts.
    pub fn forced(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn evaluate(&self, candidates: &[Candidate], previous: Option<&MetricRecord>) -> GateDecision {
        let current_count = candidates.len();
        let digest = candidate_digest(candidates);
        let previous_count = previous.map(|r| r.value);

        let (proceed, reason) = match previous {
            _ if self.force => (true, GateReason::Forced),
            None => (true, GateReason::FirstRun),
            Some(prev) => match self.mode {
                GateMode::Count if prev.value == current_count as u64 => {
                    (false, GateReason::CountUnchanged)
                }
                GateMode::Count => (true, GateReason::CountChanged),
                GateMode::ContentDigest if prev.digest.as_ref() == Some(&digest) => {
                    (false, GateReason::DigestUnchanged)
                }
                GateMode::ContentDigest => (true, GateReason::DigestChanged),
            },
        };

        GateDecision {
            proceed,
            reason,
            mode: self.mode,
            current_count,
            previous_count,
            digest,
        }
    }
}

/// SHA-256 of the sorted, deduplicated candidate names joined by `\n`.
pub fn candidate_digest(candidates: &[Candidate]) -> ContentDigest {
    let names: BTreeSet<&str> = candidates.iter().map(|c| c.name.as_str()).collect();
    let joined = names.into_iter().collect::<Vec<_>>().join("\n");
    ContentDigest::from_bytes(joined.as_bytes())
}
