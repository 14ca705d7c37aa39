//! Rolling recency window.

use chrono::{DateTime, Utc};

use crate::domain::Candidate;

/// Default window length in days.
pub const DEFAULT_WINDOW_DAYS: u32 = 60;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Keeps candidates dated within `days` of `now`.
///
/// Age is measured in fractional days and the boundary is inclusive, so a
/// candidate exactly `days` old is kept. Undated candidates are dropped;
/// dates in the future are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecencyWindow {
    days: u32,
    now: DateTime<Utc>,
}

impl RecencyWindow {
    pub fn new(days: u32, now: DateTime<Utc>) -> Self {
        Self { days, now }
    }

    pub fn days(&self) -> u32 {
        self.days
    }

    pub fn retains(&self, candidate: &Candidate) -> bool {
        match candidate.discovered_at {
            Some(at) => {
                let age_days = (self.now - at).num_milliseconds() as f64 / MILLIS_PER_DAY;
                age_days <= f64::from(self.days)
            }
            None => false,
        }
    }

    pub fn apply(&self, candidates: Vec<Candidate>) -> Vec<Candidate> {
        candidates.into_iter().filter(|c| self.retains(c)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-10-19T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_exactly_sixty_days_is_retained() {
        let window = RecencyWindow::new(DEFAULT_WINDOW_DAYS, now());
        let candidate = Candidate::new("a", now() - Duration::days(60));
        assert!(window.retains(&candidate));
    }

    #[test]
    fn test_sixty_point_one_days_is_excluded() {
        let window = RecencyWindow::new(DEFAULT_WINDOW_DAYS, now());
        // 0.1 day = 2h 24m
        let candidate = Candidate::new("a", now() - Duration::days(60) - Duration::minutes(144));
        assert!(!window.retains(&candidate));
    }

    #[test]
    fn test_one_millisecond_past_boundary_is_excluded() {
        let window = RecencyWindow::new(DEFAULT_WINDOW_DAYS, now());
        let candidate =
            Candidate::new("a", now() - Duration::days(60) - Duration::milliseconds(1));
        assert!(!window.retains(&candidate));
    }

    #[test]
    fn test_future_and_undated() {
        let window = RecencyWindow::new(DEFAULT_WINDOW_DAYS, now());
        assert!(window.retains(&Candidate::new("future", now() + Duration::days(3))));
        assert!(!window.retains(&Candidate::undated("undated")));
    }

    #[test]
    fn test_apply_preserves_order() {
        let window = RecencyWindow::new(7, now());
        let kept = window.apply(vec![
            Candidate::new("new-1", now() - Duration::days(1)),
            Candidate::new("old", now() - Duration::days(30)),
            Candidate::new("new-2", now() - Duration::days(6)),
        ]);
        let names: Vec<_> = kept.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["new-1", "new-2"]);
    }
}
