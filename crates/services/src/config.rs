use std::env;
use std::time::Duration;

use quiz_core::Clock;
use quiz_core::model::{AgeGroup, ChildId};

/// Length of one test attempt (30 minutes).
pub const DEFAULT_TEST_DURATION_SECS: u32 = 30 * 60;

/// Period of the countdown tick.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(1);

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Per-session parameters that would otherwise leak in from the page environment.
#[derive(Debug, Clone)]
pub struct QuizConfig {
    child_id: ChildId,
    age_group: AgeGroup,
    duration_secs: u32,
    tick_interval: Duration,
    clock: Clock,
}

impl QuizConfig {
    #[must_use]
    pub fn new(child_id: ChildId, age_group: AgeGroup) -> Self {
        Self {
            child_id,
            age_group,
            duration_secs: DEFAULT_TEST_DURATION_SECS,
            tick_interval: DEFAULT_TICK_INTERVAL,
            clock: Clock::default(),
        }
    }

    /// Override the countdown length. Values below one second are raised to one.
    #[must_use]
    pub fn with_duration_secs(mut self, secs: u32) -> Self {
        self.duration_secs = secs.max(1);
        self
    }

    #[must_use]
    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn child_id(&self) -> ChildId {
        self.child_id
    }

    #[must_use]
    pub fn age_group(&self) -> AgeGroup {
        self.age_group
    }

    #[must_use]
    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }

    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }
}

/// Where and how to reach the grading backend.
#[derive(Clone, Debug)]
pub struct SubmissionConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl SubmissionConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Read `QUIZ_API_BASE_URL` and `QUIZ_API_TIMEOUT_SECS`, falling back to defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let base_url = env::var("QUIZ_API_BASE_URL")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.into());
        let timeout = env::var("QUIZ_API_TIMEOUT_SECS")
            .ok()
            .and_then(|value| value.trim().parse::<u64>().ok())
            .map_or(DEFAULT_TIMEOUT, Duration::from_secs);
        Self { base_url, timeout }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiz_config_defaults_to_thirty_minutes() {
        let config = QuizConfig::new(ChildId::new(1), AgeGroup::Middle);
        assert_eq!(config.duration_secs(), 1800);
        assert_eq!(config.tick_interval(), Duration::from_secs(1));
    }

    #[test]
    fn zero_duration_is_raised_to_one_second() {
        let config = QuizConfig::new(ChildId::new(1), AgeGroup::Young).with_duration_secs(0);
        assert_eq!(config.duration_secs(), 1);
    }
}
