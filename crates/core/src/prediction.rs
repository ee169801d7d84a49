//! Wait-time predictions and the recommendation rules derived from them

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Action advice shown next to a predicted wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    #[serde(rename = "Go Now")]
    GoNow,
    #[serde(rename = "Wait")]
    Wait,
    #[serde(rename = "Consider Alternatives")]
    ConsiderAlternatives,
}

impl Recommendation {
    /// Wait under 30 minutes: go now. Under an hour: wait. Otherwise
    /// look elsewhere. The frontend mirrors these exact thresholds.
    pub fn from_wait(wait_minutes: u32) -> Self {
        if wait_minutes < 30 {
            Recommendation::GoNow
        } else if wait_minutes < 60 {
            Recommendation::Wait
        } else {
            Recommendation::ConsiderAlternatives
        }
    }
}

/// Severity bucket for map markers and card accents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaitBucket {
    Low,
    Medium,
    High,
}

impl WaitBucket {
    /// Same cut points as [`Recommendation::from_wait`].
    pub fn from_wait(wait_minutes: u32) -> Self {
        if wait_minutes < 30 {
            WaitBucket::Low
        } else if wait_minutes < 60 {
            WaitBucket::Medium
        } else {
            WaitBucket::High
        }
    }
}

/// How a prediction was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PredictionMethod {
    /// Parsed from a language-model reply.
    Ai,
    /// Deterministic heuristic, used whenever the model is unavailable
    /// or its reply cannot be parsed.
    Fallback,
}

/// A single hospital's predicted ER wait.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub hospital_id: String,
    pub wait_minutes: u32,
    /// 0-100 self-reported confidence.
    pub confidence: u8,
    /// Human-readable factors that drove the estimate.
    pub factors: Vec<String>,
    pub recommendation: Recommendation,
    pub bucket: WaitBucket,
    pub method: PredictionMethod,
    pub generated_at: DateTime<Utc>,
}

impl Prediction {
    /// Builds a prediction from a final wait number, deriving the
    /// recommendation and bucket so the three can never disagree.
    pub fn from_wait(
        hospital_id: impl Into<String>,
        wait_minutes: u32,
        confidence: u8,
        factors: Vec<String>,
        method: PredictionMethod,
    ) -> Self {
        Self {
            hospital_id: hospital_id.into(),
            wait_minutes,
            confidence,
            factors,
            recommendation: Recommendation::from_wait(wait_minutes),
            bucket: WaitBucket::from_wait(wait_minutes),
            method,
            generated_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_at_boundaries() {
        assert_eq!(Recommendation::from_wait(29), Recommendation::GoNow);
        assert_eq!(Recommendation::from_wait(30), Recommendation::Wait);
        assert_eq!(Recommendation::from_wait(59), Recommendation::Wait);
        assert_eq!(
            Recommendation::from_wait(60),
            Recommendation::ConsiderAlternatives
        );
    }

    #[test]
    fn bucket_tracks_recommendation() {
        for wait in [0, 29, 30, 59, 60, 240] {
            let p = Prediction::from_wait("h1", wait, 70, vec![], PredictionMethod::Fallback);
            let expected = match p.recommendation {
                Recommendation::GoNow => WaitBucket::Low,
                Recommendation::Wait => WaitBucket::Medium,
                Recommendation::ConsiderAlternatives => WaitBucket::High,
            };
            assert_eq!(p.bucket, expected);
        }
    }

    #[test]
    fn recommendation_serializes_as_display_text() {
        let json = serde_json::to_string(&Recommendation::GoNow).unwrap();
        assert_eq!(json, "\"Go Now\"");
        let json = serde_json::to_string(&Recommendation::ConsiderAlternatives).unwrap();
        assert_eq!(json, "\"Consider Alternatives\"");
    }
}
