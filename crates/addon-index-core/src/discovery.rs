//! Paginated candidate discovery.

use registry_client::SearchService;
use serde::{Deserialize, Serialize};

use crate::domain::{Candidate, PipelineError, Result};
use crate::metrics::METRICS;
use crate::obs;

pub const DEFAULT_PAGE_SIZE: usize = 250;

/// Highest offset requested, inclusive.
pub const DEFAULT_MAX_OFFSET: usize = 5000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    pub page_size: usize,
    pub max_offset: usize,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            max_offset: DEFAULT_MAX_OFFSET,
        }
    }
}

impl DiscoveryConfig {
    /// Offsets `0, page_size, ..` up to and including `max_offset`.
    pub fn offsets(&self) -> impl Iterator<Item = usize> {
        (0..=self.max_offset).step_by(self.page_size.max(1))
    }

    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(PipelineError::Config(
                "page size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Fetch every page in order and flatten the hits into candidates.
///
/// Pages are requested one at a time. The first failing page aborts
/// discovery; there are no retries. The result is neither filtered nor
/// deduplicated.
pub async fn discover(search: &dyn SearchService, config: &DiscoveryConfig) -> Result<Vec<Candidate>> {
    config.validate()?;

    let mut candidates = Vec::new();
    for offset in config.offsets() {
        let page = search
            .search_page(offset, config.page_size)
            .await
            .map_err(|source| PipelineError::Discovery { offset, source })?;

        METRICS.inc_pages_fetched();
        METRICS.add_candidates_discovered(page.results.len() as u64);
        obs::emit_page_fetched(offset, page.results.len());

        candidates.extend(page.results.into_iter().map(|hit| Candidate {
            name: hit.package.name,
            discovered_at: hit.package.date,
        }));
    }

    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use registry_client::fakes::FakeSearchService;
    use registry_client::{SearchPackage, SearchPage};

    fn page(names: &[&str]) -> SearchPage {
        SearchPage::from_packages(
            names
                .iter()
                .map(|n| SearchPackage {
                    name: n.to_string(),
                    date: Some(Utc.with_ymd_and_hms(2026, 10, 1, 0, 0, 0).unwrap()),
                })
                .collect(),
        )
    }

    #[test]
    fn test_default_offsets_cover_zero_to_5000_inclusive() {
        let offsets: Vec<usize> = DiscoveryConfig::default().offsets().collect();
        assert_eq!(offsets.len(), 21);
        assert_eq!(offsets.first(), Some(&0));
        assert_eq!(offsets.last(), Some(&5000));
        assert!(offsets.windows(2).all(|w| w[1] - w[0] == 250));
    }

    #[tokio::test]
    async fn test_discover_requests_pages_in_order_and_flattens() {
        let search = FakeSearchService::new()
            .with_page(0, page(&["a", "b"]))
            .with_page(2, page(&["a"]));
        let config = DiscoveryConfig {
            page_size: 2,
            max_offset: 4,
        };

        let candidates = discover(&search, &config).await.unwrap();

        assert_eq!(search.requested_offsets(), vec![0, 2, 4]);
        let names: Vec<_> = candidates.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "a"]);
    }

    #[tokio::test]
    async fn test_discover_failing_page_is_fatal() {
        let search = FakeSearchService::new()
            .with_page(0, page(&["a"]))
            .failing_at(250);

        let err = discover(&search, &DiscoveryConfig::default())
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::Discovery { offset: 250, .. }));
        assert_eq!(search.requested_offsets(), vec![0, 250]);
    }

    #[tokio::test]
    async fn test_zero_page_size_is_config_error() {
        let search = FakeSearchService::new();
        let config = DiscoveryConfig {
            page_size: 0,
            max_offset: 10,
        };
        let err = discover(&search, &config).await.unwrap_err();
        assert!(matches!(err, PipelineError::Config(_)));
        assert!(search.requested_offsets().is_empty());
    }
}
