use quiz_core::model::{AgeGroup, Question, TimerLevel};

use super::service::SessionStatus;

/// Per-question marker for the question-index picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestionIndicator {
    pub index: usize,
    pub is_current: bool,
    pub is_answered: bool,
}

/// Presentation-agnostic view of the session after a state change.
///
/// No pre-formatted strings; the UI decides labels and layout.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub question: Option<Question>,
    pub index: usize,
    pub total: usize,
    pub selection: Option<usize>,
    /// `(index + 1) / total`, in `(0, 1]`.
    pub progress: f64,
    pub time_remaining: u32,
    pub time_taken: u32,
    pub timer_level: TimerLevel,
    pub can_go_back: bool,
    pub can_navigate: bool,
    pub is_last: bool,
    pub answered: usize,
    pub status: SessionStatus,
    pub age_group: AgeGroup,
    pub indicators: Vec<QuestionIndicator>,
}
