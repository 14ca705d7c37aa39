//! Name filtering: deny-list patterns and the name validator.
//!
//! A candidate survives when its name is non-empty, matches no deny pattern
//! and is accepted by the validator. Both checks are pure, so their order
//! does not change the result.

use regex::Regex;

use crate::domain::{Candidate, PipelineError, Result};

/// Patterns of known junk and test packages rejected by earlier releases.
pub const HISTORICAL_PATTERNS: &[&str] = &[
    "fill-murray-?",
    "fill-murry",
    "test-addonasdasdcxvsdfsfsbsdfscxvcvxdvsdfsdfsdfxcvxcvs12431123mvhxcvxcvx",
];

// ---------------------------------------------------------------------------
// DenyList
// ---------------------------------------------------------------------------

/// Externally supplied list of unanchored name patterns.
#[derive(Debug, Clone, Default)]
pub struct DenyList {
    patterns: Vec<Regex>,
}

impl DenyList {
    /// Compile `patterns`. An invalid pattern is a configuration error.
    pub fn new<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| {
                Regex::new(p.as_ref()).map_err(|e| {
                    PipelineError::Config(format!("invalid deny pattern {:?}: {e}", p.as_ref()))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    /// The default list, [`HISTORICAL_PATTERNS`].
    pub fn historical() -> Self {
        Self {
            patterns: HISTORICAL_PATTERNS
                .iter()
                .filter_map(|p| Regex::new(p).ok())
                .collect(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_denied(&self, name: &str) -> bool {
        self.patterns.iter().any(|re| re.is_match(name))
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(Regex::as_str)
    }
}

// ---------------------------------------------------------------------------
// NameValidator
// ---------------------------------------------------------------------------

/// Decides whether a name belongs to the target plugin family.
pub trait NameValidator: Send + Sync {
    fn accepts(&self, name: &str) -> bool;
}

/// Accepts every non-empty name.
///
/// The search query already restricts results to the family; this is the
/// validator used when nothing stricter is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyNonEmpty;

impl NameValidator for AnyNonEmpty {
    fn accepts(&self, name: &str) -> bool {
        !name.is_empty()
    }
}

impl<F> NameValidator for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn accepts(&self, name: &str) -> bool {
        self(name)
    }
}

/// Keep candidates that pass both the deny list and the validator.
///
/// Empty names are always dropped. Input order is preserved.
pub fn filter_candidates(
    candidates: Vec<Candidate>,
    deny: &DenyList,
    validator: &dyn NameValidator,
) -> Vec<Candidate> {
    candidates
        .into_iter()
        .filter(|c| !c.name.is_empty() && !deny.is_denied(&c.name) && validator.accepts(&c.name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(candidates: &[Candidate]) -> Vec<&str> {
        candidates.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn test_historical_list_compiles_every_pattern() {
        assert_eq!(DenyList::historical().len(), HISTORICAL_PATTERNS.len());
    }

    #[test]
    fn test_historical_patterns_are_unanchored() {
        let deny = DenyList::historical();
        assert!(deny.is_denied("fill-murray"));
        assert!(deny.is_denied("ember-fill-murray-placeholder"));
        assert!(deny.is_denied("fill-murry"));
        assert!(deny.is_denied(
            "test-addonasdasdcxvsdfsfsbsdfscxvcvxdvsdfsdfsdfxcvxcvs12431123mvhxcvxcvx"
        ));
        assert!(!deny.is_denied("ember-power-select"));
    }

    #[test]
    fn test_invalid_pattern_is_config_error() {
        let err = DenyList::new(["ok", "(unclosed"]).unwrap_err();
        assert!(matches!(err, PipelineError::Config(_)));
    }

    #[test]
    fn test_filter_drops_denied_empty_and_rejected() {
        let candidates = vec![
            Candidate::undated("ember-a"),
            Candidate::undated(""),
            Candidate::undated("fill-murray-ember"),
            Candidate::undated("react-thing"),
            Candidate::undated("ember-b"),
        ];
        let deny = DenyList::historical();
        let validator = |name: &str| name.starts_with("ember");

        let kept = filter_candidates(candidates, &deny, &validator);

        assert_eq!(names(&kept), vec!["ember-a", "ember-b"]);
    }

    #[test]
    fn test_filter_output_never_matches_deny_list() {
        let deny = DenyList::new(["^tmp-", "junk"]).unwrap();
        let candidates: Vec<Candidate> = [
            "tmp-a", "a-tmp-", "junkyard", "ember-junk", "fine", "tmp", "also-fine",
        ]
        .into_iter()
        .map(Candidate::undated)
        .collect();

        let kept = filter_candidates(candidates, &deny, &AnyNonEmpty);

        assert!(kept.iter().all(|c| !deny.is_denied(&c.name)));
        assert!(kept.iter().all(|c| AnyNonEmpty.accepts(&c.name)));
        assert_eq!(names(&kept), vec!["a-tmp-", "fine", "tmp", "also-fine"]);
    }

    #[test]
    fn test_empty_deny_list_keeps_duplicates() {
        let candidates = vec![Candidate::undated("x"), Candidate::undated("x")];
        let kept = filter_candidates(candidates, &DenyList::empty(), &AnyNonEmpty);
        assert_eq!(kept.len(), 2);
    }
}
