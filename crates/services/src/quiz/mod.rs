mod progress;
mod service;
mod timer;
mod workflow;

// Public API of the quiz session subsystem.
pub use crate::error::SessionError;
pub use progress::{QuestionIndicator, SessionSnapshot};
pub use service::{Navigation, QuizSession, SessionStatus, TickOutcome};
pub use workflow::{NextOutcome, QuizRunner, SessionEvent};
