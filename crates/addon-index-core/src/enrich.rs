//! Per-package detail enrichment.
//!
//! Runs registry lookups through a bounded pool of `concurrency` in-flight
//! requests. Results come back in candidate order regardless of completion
//! order, and one failing lookup never affects the others.

use futures::stream::{self, StreamExt};
use registry_client::{PackageId, RegistryDetail, RegistryService};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::Candidate;
use crate::metrics::METRICS;
use crate::obs;

/// Default number of concurrent registry lookups.
pub const DEFAULT_CONCURRENCY: usize = 5;

/// A candidate that could not be enriched and was dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichmentFailure {
    pub name: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnrichmentReport {
    /// Successful lookups, in candidate order.
    pub details: Vec<RegistryDetail>,
    pub failures: Vec<EnrichmentFailure>,
}

impl EnrichmentReport {
    pub fn attempted(&self) -> usize {
        self.details.len() + self.failures.len()
    }
}

/// Look up every candidate by its exact name.
///
/// `concurrency` of 1 gives strictly sequential lookups; 0 is treated as 1.
pub async fn enrich(
    registry: &dyn RegistryService,
    candidates: &[Candidate],
    concurrency: usize,
) -> EnrichmentReport {
    let width = concurrency.max(1);
    debug!(candidates = candidates.len(), width, "enriching candidates");

    let outcomes: Vec<_> = stream::iter(candidates)
        .map(|candidate| async move {
            let outcome = match PackageId::new(candidate.name.as_str()) {
                Ok(id) => registry.package(&id).await,
                Err(e) => Err(e),
            };
            (candidate.name.as_str(), outcome)
        })
        .buffered(width)
        .collect()
        .await;

    let mut report = EnrichmentReport::default();
    for (name, outcome) in outcomes {
        match outcome {
            Ok(detail) => {
                METRICS.inc_details_fetched();
                report.details.push(detail);
            }
            Err(e) => {
                METRICS.inc_details_failed();
                obs::emit_detail_failed(name, &e);
                report.failures.push(EnrichmentFailure {
                    name: name.to_string(),
                    reason: e.to_string(),
                });
            }
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use registry_client::fakes::FakeRegistryService;

    fn detail(name: &str, day: u32) -> RegistryDetail {
        RegistryDetail::minimal(name, Utc.with_ymd_and_hms(2026, 10, day, 0, 0, 0).unwrap())
    }

    #[tokio::test]
    async fn test_one_failure_yields_n_minus_one_details() {
        let registry = FakeRegistryService::new()
            .with_detail(detail("a", 1))
            .with_detail(detail("c", 3))
            .failing("b");
        let candidates = vec![
            Candidate::undated("a"),
            Candidate::undated("b"),
            Candidate::undated("c"),
        ];

        let report = enrich(&registry, &candidates, DEFAULT_CONCURRENCY).await;

        assert_eq!(report.details.len(), 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].name, "b");
        assert_eq!(report.attempted(), 3);
    }

    #[tokio::test]
    async fn test_not_found_is_recorded_as_failure() {
        let registry = FakeRegistryService::new();
        let report = enrich(&registry, &[Candidate::undated("ghost")], 1).await;
        assert!(report.details.is_empty());
        assert!(report.failures[0].reason.contains("not found"));
    }

    #[tokio::test]
    async fn test_order_follows_candidates_at_any_width() {
        let names = ["e", "d", "c", "b", "a", "f", "g"];
        let mut registry = FakeRegistryService::new();
        for (i, n) in names.iter().enumerate() {
            registry = registry.with_detail(detail(n, i as u32 + 1));
        }
        let candidates: Vec<_> = names.iter().map(|n| Candidate::undated(*n)).collect();

        for width in [0, 1, 3, 5, 16] {
            let report = enrich(&registry, &candidates, width).await;
            let got: Vec<_> = report.details.iter().map(|d| d.name.as_str()).collect();
            assert_eq!(got, names.to_vec(), "width {width}");
        }
    }

    #[tokio::test]
    async fn test_scoped_names_are_requested_verbatim() {
        let registry = FakeRegistryService::new().with_detail(RegistryDetail::minimal(
            "@ember/test-helpers",
            Utc::now() - Duration::days(1),
        ));

        let report = enrich(&registry, &[Candidate::undated("@ember/test-helpers")], 1).await;

        assert_eq!(report.details.len(), 1);
        assert_eq!(registry.requested()[0].as_str(), "@ember/test-helpers");
    }
}
