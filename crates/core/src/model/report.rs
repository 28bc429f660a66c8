use serde::{Deserialize, Serialize};

/// Result record returned by the grading backend.
///
/// Fields other than `success` are optional on the wire; a failure response
/// typically carries only `success: false` and `error`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionResult {
    pub success: bool,
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub correct_answers: u32,
    #[serde(default)]
    pub total_questions: u32,
    #[serde(default)]
    pub strong_points: Vec<String>,
    #[serde(default)]
    pub weak_points: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_id: Option<u64>,
}

impl SubmissionResult {
    #[must_use]
    pub fn band(&self) -> ScoreBand {
        ScoreBand::from_score(self.score)
    }

    #[must_use]
    pub fn has_weak_points(&self) -> bool {
        !self.weak_points.is_empty()
    }
}

/// Coarse grading of a score, used to pick result messaging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    Excellent,
    Good,
    KeepPracticing,
}

impl ScoreBand {
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            Self::Excellent
        } else if score >= 60.0 {
            Self::Good
        } else {
            Self::KeepPracticing
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_response_parses_with_defaults() {
        let raw = r#"{"success": false, "error": "invalid session"}"#;
        let result: SubmissionResult = serde_json::from_str(raw).unwrap();
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("invalid session"));
        assert!(result.strong_points.is_empty());
        assert_eq!(result.result_id, None);
    }

    #[test]
    fn band_boundaries() {
        assert_eq!(ScoreBand::from_score(80.0), ScoreBand::Excellent);
        assert_eq!(ScoreBand::from_score(79.99), ScoreBand::Good);
        assert_eq!(ScoreBand::from_score(60.0), ScoreBand::Good);
        assert_eq!(ScoreBand::from_score(12.5), ScoreBand::KeepPracticing);
    }
}
