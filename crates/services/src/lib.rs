#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod quiz;
pub mod submission;

pub use quiz_core::Clock;

pub use config::{DEFAULT_TEST_DURATION_SECS, QuizConfig, SubmissionConfig};
pub use error::{Recovery, SessionError, SubmitError};
pub use quiz::{
    Navigation, NextOutcome, QuestionIndicator, QuizRunner, QuizSession, SessionEvent,
    SessionSnapshot, SessionStatus, TickOutcome,
};
pub use submission::{
    HttpSubmissionEndpoint, SubmissionEndpoint, SubmissionPayload, SubmissionRequest,
};
