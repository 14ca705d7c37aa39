//! In-memory fakes for service traits (testing only)
//!
//! Each fake serves canned data and records what it was asked for, so
//! pipeline tests can assert on request order and counts.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::ClientError;
use crate::models::{QualityRecord, RegistryDetail, SearchPage};
use crate::package_id::PackageId;
use crate::service_traits::{QualityService, RegistryService, SearchService};
use crate::Result;

// ---------------------------------------------------------------------------
// FakeSearchService
// ---------------------------------------------------------------------------

/// Serves pages keyed by offset. Unknown offsets return an empty page.
#[derive(Debug, Default)]
pub struct FakeSearchService {
    pages: HashMap<usize, SearchPage>,
    failing_offset: Option<usize>,
    requested: Mutex<Vec<usize>>,
}

impl FakeSearchService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, from: usize, page: SearchPage) -> Self {
        self.pages.insert(from, page);
        self
    }

    /// Fail the request at `from` with a 503.
    pub fn failing_at(mut self, from: usize) -> Self {
        self.failing_offset = Some(from);
        self
    }

    /// Offsets requested so far, in call order.
    pub fn requested_offsets(&self) -> Vec<usize> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchService for FakeSearchService {
    async fn search_page(&self, from: usize, _size: usize) -> Result<SearchPage> {
        self.requested.lock().unwrap().push(from);
        if self.failing_offset == Some(from) {
            return Err(ClientError::Status {
                status: 503,
                url: format!("fake://search?from={from}"),
            });
        }
        Ok(self.pages.get(&from).cloned().unwrap_or_default())
    }
}

// ---------------------------------------------------------------------------
// FakeRegistryService
// ---------------------------------------------------------------------------

/// Serves package details by exact name.
///
/// Names registered with `failing` answer with a transport error; names not
/// registered at all answer `NotFound`. Several details registered under one
/// name are served in order, and the last one repeats.
#[derive(Debug, Default)]
pub struct FakeRegistryService {
    details: HashMap<String, Vec<RegistryDetail>>,
    failing: HashSet<String>,
    requested: Mutex<Vec<PackageId>>,
}

impl FakeRegistryService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_detail(mut self, detail: RegistryDetail) -> Self {
        self.details
            .entry(detail.name.clone())
            .or_default()
            .push(detail);
        self
    }

    pub fn failing(mut self, name: &str) -> Self {
        self.failing.insert(name.to_string());
        self
    }

    /// Identifiers requested so far, in call order.
    pub fn requested(&self) -> Vec<PackageId> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl RegistryService for FakeRegistryService {
    async fn package(&self, id: &PackageId) -> Result<RegistryDetail> {
        let previous_calls = {
            let mut requested = self.requested.lock().unwrap();
            let count = requested.iter().filter(|r| *r == id).count();
            requested.push(id.clone());
            count
        };
        if self.failing.contains(id.as_str()) {
            return Err(ClientError::Http(format!("connection reset fetching {id}")));
        }
        let served = self
            .details
            .get(id.as_str())
            .ok_or_else(|| ClientError::NotFound(id.to_string()))?;
        let index = previous_calls.min(served.len() - 1);
        Ok(served[index].clone())
    }
}

// ---------------------------------------------------------------------------
// FakeQualityService
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct FakeQualityService {
    records: Vec<QualityRecord>,
    fail: bool,
    calls: Mutex<usize>,
}

impl FakeQualityService {
    pub fn new(records: Vec<QualityRecord>) -> Self {
        Self {
            records,
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn call_count(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl QualityService for FakeQualityService {
    async fn fetch_all(&self) -> Result<Vec<QualityRecord>> {
        *self.calls.lock().unwrap() += 1;
        if self.fail {
            return Err(ClientError::Status {
                status: 500,
                url: "fake://quality".to_string(),
            });
        }
        Ok(self.records.clone())
    }
}
