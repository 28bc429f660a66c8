use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Age-presentation variant of the quiz.
///
/// Selects presentation thresholds only; every variant runs the same session logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AgeGroup {
    #[default]
    #[serde(rename = "6-8")]
    Young,
    #[serde(rename = "9-11")]
    Middle,
    #[serde(rename = "12-14")]
    Older,
}

impl AgeGroup {
    /// Map a child's age to its group. Ages outside 6..=14 fall back to `Young`.
    #[must_use]
    pub fn from_age(age: u8) -> Self {
        match age {
            9..=11 => Self::Middle,
            12..=14 => Self::Older,
            _ => Self::Young,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Young => "6-8",
            Self::Middle => "9-11",
            Self::Older => "12-14",
        }
    }

    #[must_use]
    pub fn thresholds(self) -> TimerThresholds {
        match self {
            Self::Young => TimerThresholds {
                caution_below: Some(10 * 60),
                warning_below: 5 * 60,
                alert_at: Some(5 * 60),
            },
            Self::Middle | Self::Older => TimerThresholds {
                caution_below: None,
                warning_below: 5 * 60,
                alert_at: None,
            },
        }
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseAgeGroupError {
    raw: String,
}

impl fmt::Display for ParseAgeGroupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown age group: {}", self.raw)
    }
}

impl std::error::Error for ParseAgeGroupError {}

impl FromStr for AgeGroup {
    type Err = ParseAgeGroupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "6-8" => Ok(Self::Young),
            "9-11" => Ok(Self::Middle),
            "12-14" => Ok(Self::Older),
            other => Err(ParseAgeGroupError {
                raw: other.to_owned(),
            }),
        }
    }
}

/// How urgently the countdown should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TimerLevel {
    Normal,
    Caution,
    Warning,
}

/// Countdown thresholds, in seconds remaining.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerThresholds {
    pub caution_below: Option<u32>,
    pub warning_below: u32,
    /// Remaining time at which a one-shot alert is raised.
    pub alert_at: Option<u32>,
}

impl TimerThresholds {
    #[must_use]
    pub fn level(&self, remaining_secs: u32) -> TimerLevel {
        if remaining_secs < self.warning_below {
            TimerLevel::Warning
        } else if self
            .caution_below
            .is_some_and(|caution| remaining_secs < caution)
        {
            TimerLevel::Caution
        } else {
            TimerLevel::Normal
        }
    }

    #[must_use]
    pub fn is_alert(&self, remaining_secs: u32) -> bool {
        self.alert_at == Some(remaining_secs)
    }
}
