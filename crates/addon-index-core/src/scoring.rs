//! Joining registry details with quality data.

use std::collections::HashMap;

use registry_client::{QualityRecord, RegistryDetail};

use crate::domain::{EnrichedAddon, Score};

/// Score for one addon given its quality record, if any.
///
/// - no record: `NotReviewed`
/// - `is_wip` true: `WorkInProgress`, whatever the score says
/// - missing, zero or negative score: `NotReviewed`
/// - positive score: `Reviewed(score)`
pub fn score_for(record: Option<&QualityRecord>) -> Score {
    match record {
        None => Score::NotReviewed,
        Some(r) if r.is_wip == Some(true) => Score::WorkInProgress,
        Some(r) => match r.score {
            Some(score) if score > 0.0 => Score::Reviewed(score),
            _ => Score::NotReviewed,
        },
    }
}

/// Attach a score to every detail. When the quality data lists a name more
/// than once, the first record wins.
pub fn join_scores(details: Vec<RegistryDetail>, records: &[QualityRecord]) -> Vec<EnrichedAddon> {
    let mut by_name: HashMap<&str, &QualityRecord> = HashMap::with_capacity(records.len());
    for record in records {
        by_name.entry(record.name.as_str()).or_insert(record);
    }

    details
        .into_iter()
        .map(|detail| {
            let score = score_for(by_name.get(detail.name.as_str()).copied());
            EnrichedAddon::new(detail, score)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_no_record_is_not_reviewed() {
        assert_eq!(score_for(None), Score::NotReviewed);
    }

    #[test]
    fn test_wip_ignores_score() {
        let record = QualityRecord::new("a", Some(9.0), true);
        assert_eq!(score_for(Some(&record)), Score::WorkInProgress);
    }

    #[test]
    fn test_zero_and_missing_scores_are_not_reviewed() {
        assert_eq!(
            score_for(Some(&QualityRecord::new("a", Some(0.0), false))),
            Score::NotReviewed
        );
        assert_eq!(
            score_for(Some(&QualityRecord::new("a", None, false))),
            Score::NotReviewed
        );
        let unknown_wip = QualityRecord {
            name: "a".to_string(),
            score: None,
            is_wip: None,
        };
        assert_eq!(score_for(Some(&unknown_wip)), Score::NotReviewed);
    }

    #[test]
    fn test_positive_score_is_reviewed() {
        let record = QualityRecord::new("a", Some(7.0), false);
        assert_eq!(score_for(Some(&record)), Score::Reviewed(7.0));
    }

    #[test]
    fn test_join_matches_by_exact_name_first_record_wins() {
        let details = vec![
            RegistryDetail::minimal("ember-a", Utc::now()),
            RegistryDetail::minimal("ember-b", Utc::now()),
            RegistryDetail::minimal("Ember-A", Utc::now()),
        ];
        let records = vec![
            QualityRecord::new("ember-a", Some(5.0), false),
            QualityRecord::new("ember-a", Some(1.0), false),
            QualityRecord::new("ember-b", Some(3.0), true),
        ];

        let joined = join_scores(details, &records);

        assert_eq!(joined[0].score, Score::Reviewed(5.0));
        assert_eq!(joined[1].score, Score::WorkInProgress);
        assert_eq!(joined[2].score, Score::NotReviewed);
    }
}
