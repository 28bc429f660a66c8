//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::QuestionSetError;

use crate::quiz::SessionStatus;

/// Transport-level failures talking to the submission endpoint.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SubmitError {
    #[error("submission endpoint returned status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error("malformed submission response: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    /// Failure reported by a `SubmissionEndpoint` that does not speak HTTP.
    #[error("submission transport failed: {0}")]
    Transport(String),
}

/// What the user should be offered after a failed submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    /// Stay on the quiz and allow a manual resubmission.
    Retry,
    /// Leave the quiz for the fallback (dashboard) view.
    ReturnToDashboard,
}

/// Errors emitted by the quiz session controller.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no questions available")]
    EmptyQuestionSet,
    #[error(transparent)]
    InvalidQuestions(QuestionSetError),
    #[error("question index {index} out of range (0..{total})")]
    InvalidIndex { index: usize, total: usize },
    #[error("option index {index} out of range (0..{len})")]
    InvalidOption { index: usize, len: usize },
    #[error("session is not active (status: {status:?})")]
    NotActive { status: SessionStatus },
    #[error("a submission is already in flight")]
    SubmissionInFlight,
    #[error("submission task was cancelled")]
    SubmissionCancelled,
    #[error("session already completed")]
    AlreadyCompleted,
    #[error("network error while submitting: {0}")]
    Network(#[source] SubmitError),
    #[error("server rejected submission: {0}")]
    Server(String),
}

impl SessionError {
    /// Recovery offered to the user, for errors that are recoverable at submit.
    #[must_use]
    pub fn recovery(&self) -> Option<Recovery> {
        match self {
            Self::Network(_) => Some(Recovery::Retry),
            Self::Server(_) => Some(Recovery::ReturnToDashboard),
            _ => None,
        }
    }
}

impl From<QuestionSetError> for SessionError {
    fn from(err: QuestionSetError) -> Self {
        match err {
            QuestionSetError::Empty => Self::EmptyQuestionSet,
            other => Self::InvalidQuestions(other),
        }
    }
}
