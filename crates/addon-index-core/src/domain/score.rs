//! Tri-state quality score.
//!
//! In memory a score is always one of three variants. On disk it keeps the
//! historical `{ "score": n }` shape, where `-1` marks work in progress and
//! `-2` marks an addon nobody has reviewed yet.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Legacy on-disk value for [`Score::WorkInProgress`].
pub const LEGACY_WIP: i64 = -1;

/// Legacy on-disk value for [`Score::NotReviewed`].
pub const LEGACY_NOT_REVIEWED: i64 = -2;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Score {
    /// Reviewed with a positive score.
    Reviewed(f64),
    /// Flagged as work in progress by the rating service.
    WorkInProgress,
    /// No usable rating.
    #[default]
    NotReviewed,
}

impl Score {
    /// Numeric value written to the persisted document.
    pub fn legacy_value(&self) -> f64 {
        match self {
            Score::Reviewed(score) => *score,
            Score::WorkInProgress => LEGACY_WIP as f64,
            Score::NotReviewed => LEGACY_NOT_REVIEWED as f64,
        }
    }

    /// Decode a persisted value.
    pub fn from_legacy(value: f64) -> Self {
        if value > 0.0 {
            Score::Reviewed(value)
        } else if value == LEGACY_WIP as f64 {
            Score::WorkInProgress
        } else {
            Score::NotReviewed
        }
    }
}

#[derive(Serialize, Deserialize)]
struct LegacyScore {
    score: serde_json::Number,
}

impl Serialize for Score {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let value = self.legacy_value();
        // Integral scores stay integers so existing consumers see `7`, not `7.0`.
        let score = if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
            serde_json::Number::from(value as i64)
        } else {
            serde_json::Number::from_f64(value)
                .ok_or_else(|| serde::ser::Error::custom("score is not a finite number"))?
        };
        LegacyScore { score }.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Score {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let legacy = LegacyScore::deserialize(deserializer)?;
        let value = legacy
            .score
            .as_f64()
            .ok_or_else(|| serde::de::Error::custom("score is not a number"))?;
        Ok(Score::from_legacy(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_score_legacy_encoding() {
        assert_eq!(
            serde_json::to_value(Score::Reviewed(7.0)).unwrap(),
            json!({ "score": 7 })
        );
        assert_eq!(
            serde_json::to_value(Score::Reviewed(7.5)).unwrap(),
            json!({ "score": 7.5 })
        );
        assert_eq!(
            serde_json::to_value(Score::WorkInProgress).unwrap(),
            json!({ "score": -1 })
        );
        assert_eq!(
            serde_json::to_value(Score::NotReviewed).unwrap(),
            json!({ "score": -2 })
        );
    }

    #[test]
    fn test_score_reads_legacy_documents() {
        let wip: Score = serde_json::from_value(json!({ "score": -1 })).unwrap();
        let none: Score = serde_json::from_value(json!({ "score": -2 })).unwrap();
        let rated: Score = serde_json::from_value(json!({ "score": 9 })).unwrap();
        assert_eq!(wip, Score::WorkInProgress);
        assert_eq!(none, Score::NotReviewed);
        assert_eq!(rated, Score::Reviewed(9.0));
    }

    #[test]
    fn test_default_is_not_reviewed() {
        assert_eq!(Score::default(), Score::NotReviewed);
    }
}
