use chrono::{DateTime, Utc};
use std::fmt;
use tracing::{debug, info, warn};

use quiz_core::model::{
    Answer, AnswerSheet, Question, QuestionSet, SubmissionResult, TimerLevel,
};

use super::progress::{QuestionIndicator, SessionSnapshot};
use crate::config::QuizConfig;
use crate::error::{SessionError, SubmitError};
use crate::submission::{SubmissionEndpoint, SubmissionPayload, SubmissionRequest};

//
// ─── STATE ─────────────────────────────────────────────────────────────────────
//

/// Lifecycle of one quiz attempt.
///
/// `Active` is the only state that permits navigation, selection and ticks.
/// `Errored` may go back to `Submitting` through a manual retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Active,
    Submitting,
    Completed,
    Errored,
}

/// Outcome of a navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    NavigatedTo(usize),
    /// `advance()` on the last question; the caller must submit.
    SubmissionRequested,
    /// `retreat()` on the first question.
    NoOp,
}

/// Outcome of one countdown tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Continue {
        remaining: u32,
        /// The age group's one-shot time alert fires on this tick.
        alert: bool,
    },
    /// Time ran out; the session is now `Submitting` and must be submitted.
    Expired,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// In-memory controller for one quiz attempt.
///
/// Owns the question set, the answer sheet and the countdown. Every transition
/// goes through `&mut self`, so callers serialize mutations by construction.
pub struct QuizSession {
    config: QuizConfig,
    questions: QuestionSet,
    current: usize,
    answers: AnswerSheet,
    time_remaining: u32,
    status: SessionStatus,
    in_flight: bool,
    started_at: DateTime<Utc>,
    finished_at: Option<DateTime<Utc>>,
    result: Option<SubmissionResult>,
}

impl QuizSession {
    /// Start a session over `questions`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptyQuestionSet` when `questions` is empty and
    /// `SessionError::InvalidQuestions` when two questions share an id.
    pub fn initialize(config: QuizConfig, questions: Vec<Question>) -> Result<Self, SessionError> {
        let questions = QuestionSet::new(questions)?;
        let started_at = config.clock().now();
        info!(
            child_id = %config.child_id(),
            age_group = %config.age_group(),
            total = questions.len(),
            "quiz session started"
        );

        Ok(Self {
            time_remaining: config.duration_secs(),
            config,
            questions,
            current: 0,
            answers: AnswerSheet::new(),
            status: SessionStatus::Active,
            in_flight: false,
            started_at,
            finished_at: None,
            result: None,
        })
    }

    #[must_use]
    pub fn config(&self) -> &QuizConfig {
        &self.config
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn questions(&self) -> &QuestionSet {
        &self.questions
    }

    #[must_use]
    pub fn answers(&self) -> &AnswerSheet {
        &self.answers
    }

    #[must_use]
    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    /// Seconds used so far.
    #[must_use]
    pub fn time_taken(&self) -> u32 {
        self.config.duration_secs().saturating_sub(self.time_remaining)
    }

    #[must_use]
    pub fn timer_level(&self) -> TimerLevel {
        self.config.age_group().thresholds().level(self.time_remaining)
    }

    /// The countdown only runs while the session is `Active`.
    #[must_use]
    pub fn is_timer_running(&self) -> bool {
        self.status == SessionStatus::Active
    }

    #[must_use]
    pub fn is_submission_in_flight(&self) -> bool {
        self.in_flight
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    #[must_use]
    pub fn result(&self) -> Option<&SubmissionResult> {
        self.result.as_ref()
    }

    #[must_use]
    pub fn is_last_question(&self) -> bool {
        self.current + 1 == self.questions.len()
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.question_at(self.current)
    }

    /// Look up a question for display. A missing index is logged and yields `None`.
    #[must_use]
    pub fn question_at(&self, index: usize) -> Option<&Question> {
        let question = self.questions.get(index);
        if question.is_none() {
            warn!(index, total = self.questions.len(), "question not found at index");
        }
        question
    }

    /// Previously recorded option for the question at `index`, if any.
    ///
    /// Restoring a selection after navigation goes through here, never through
    /// `select_answer`, so replays carry no side effects.
    #[must_use]
    pub fn selection_for(&self, index: usize) -> Option<usize> {
        let question = self.questions.get(index)?;
        self.answers
            .get(question.id())
            .map(|answer| answer.option_index)
    }

    #[must_use]
    pub fn current_selection(&self) -> Option<usize> {
        self.selection_for(self.current)
    }

    /// Record `option_index` as the answer to the current question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotActive` outside `Active` and
    /// `SessionError::InvalidOption` when the index is outside the options.
    pub fn select_answer(&mut self, option_index: usize) -> Result<Answer, SessionError> {
        self.ensure_active()?;
        let question = self
            .questions
            .get(self.current)
            .ok_or(SessionError::InvalidIndex {
                index: self.current,
                total: self.questions.len(),
            })?;
        let answer =
            Answer::for_option(question, option_index).ok_or(SessionError::InvalidOption {
                index: option_index,
                len: question.options().len(),
            })?;

        let stored = self.answers.upsert(answer).clone();
        debug!(
            question_id = %stored.question_id,
            option_index,
            answered = self.answers.len(),
            "answer recorded"
        );
        Ok(stored)
    }

    /// Move to the next question, or request submission on the last one.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotActive` outside `Active`.
    pub fn advance(&mut self) -> Result<Navigation, SessionError> {
        self.ensure_active()?;
        if self.is_last_question() {
            return Ok(Navigation::SubmissionRequested);
        }
        self.current += 1;
        debug!(index = self.current, "advanced");
        Ok(Navigation::NavigatedTo(self.current))
    }

    /// Move to the previous question. A no-op on the first question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotActive` outside `Active`.
    pub fn retreat(&mut self) -> Result<Navigation, SessionError> {
        self.ensure_active()?;
        if self.current == 0 {
            return Ok(Navigation::NoOp);
        }
        self.current -= 1;
        debug!(index = self.current, "retreated");
        Ok(Navigation::NavigatedTo(self.current))
    }

    /// Jump straight to `index`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotActive` outside `Active` and
    /// `SessionError::InvalidIndex` when `index` is out of range.
    pub fn jump_to(&mut self, index: usize) -> Result<Navigation, SessionError> {
        self.ensure_active()?;
        if index >= self.questions.len() {
            return Err(SessionError::InvalidIndex {
                index,
                total: self.questions.len(),
            });
        }
        self.current = index;
        debug!(index, "jumped");
        Ok(Navigation::NavigatedTo(index))
    }

    /// Count down one second.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotActive` once the session left `Active`; the
    /// tick source must be stopped at that point.
    pub fn tick(&mut self) -> Result<TickOutcome, SessionError> {
        self.ensure_active()?;
        self.time_remaining = self.time_remaining.saturating_sub(1);

        if self.time_remaining == 0 {
            self.status = SessionStatus::Submitting;
            info!(answered = self.answers.len(), "time expired; submitting");
            return Ok(TickOutcome::Expired);
        }

        let alert = self
            .config
            .age_group()
            .thresholds()
            .is_alert(self.time_remaining);
        Ok(TickOutcome::Continue {
            remaining: self.time_remaining,
            alert,
        })
    }

    /// Freeze the answers and build the request for the submission endpoint.
    ///
    /// Halts navigation and the countdown by moving to `Submitting`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::SubmissionInFlight` while an earlier request is
    /// pending and `SessionError::AlreadyCompleted` after a successful submit.
    pub fn begin_submission(&mut self) -> Result<SubmissionRequest, SessionError> {
        if self.in_flight {
            warn!("submission suppressed; one is already in flight");
            return Err(SessionError::SubmissionInFlight);
        }
        if self.status == SessionStatus::Completed {
            return Err(SessionError::AlreadyCompleted);
        }

        self.status = SessionStatus::Submitting;
        self.in_flight = true;
        let payload = SubmissionPayload {
            answers: self.answers.as_slice().to_vec(),
            time_taken: self.time_taken(),
        };
        info!(
            answers = payload.answers.len(),
            time_taken = payload.time_taken,
            "submitting answers"
        );

        Ok(SubmissionRequest {
            child_id: self.config.child_id(),
            payload,
        })
    }

    /// Apply the endpoint's answer to a submission started by `begin_submission`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Server` for a well-formed `success: false` record
    /// and `SessionError::Network` for transport failures; both leave the
    /// session `Errored`.
    pub fn finish_submission(
        &mut self,
        outcome: Result<SubmissionResult, SubmitError>,
    ) -> Result<SubmissionResult, SessionError> {
        self.in_flight = false;

        match outcome {
            Ok(result) if result.success => {
                self.status = SessionStatus::Completed;
                self.finished_at = Some(self.config.clock().now());
                self.result = Some(result.clone());
                info!(
                    score = result.score,
                    correct = result.correct_answers,
                    total = result.total_questions,
                    "submission completed"
                );
                Ok(result)
            }
            Ok(result) => {
                self.status = SessionStatus::Errored;
                let message = result
                    .error
                    .unwrap_or_else(|| "submission was rejected".to_string());
                warn!(%message, "server rejected submission");
                Err(SessionError::Server(message))
            }
            Err(err) => {
                self.status = SessionStatus::Errored;
                warn!(error = %err, "submission failed");
                Err(SessionError::Network(err))
            }
        }
    }

    /// Submit the frozen answers and wait for the grade.
    ///
    /// No automatic retry: after a failure the session is `Errored` and a
    /// later call resubmits.
    ///
    /// # Errors
    ///
    /// See `begin_submission` and `finish_submission`.
    pub async fn submit(
        &mut self,
        endpoint: &dyn SubmissionEndpoint,
    ) -> Result<SubmissionResult, SessionError> {
        let request = self.begin_submission()?;
        let pending = PendingSubmission {
            session: self,
            settled: false,
        };
        let outcome = endpoint.submit(&request).await;
        pending.settle(outcome)
    }

    /// Give up on a request whose response will never be applied.
    fn abandon_submission(&mut self) {
        self.in_flight = false;
        self.status = SessionStatus::Errored;
        warn!("submission dropped before a response arrived");
    }

    /// Everything the rendering layer needs to redraw.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn snapshot(&self) -> SessionSnapshot {
        let total = self.questions.len();
        let active = self.status == SessionStatus::Active;
        let indicators = self
            .questions
            .iter()
            .enumerate()
            .map(|(index, question)| QuestionIndicator {
                index,
                is_current: index == self.current,
                is_answered: self.answers.is_answered(question.id()),
            })
            .collect();

        SessionSnapshot {
            question: self.current_question().cloned(),
            index: self.current,
            total,
            selection: self.current_selection(),
            progress: (self.current + 1) as f64 / total as f64,
            time_remaining: self.time_remaining,
            time_taken: self.time_taken(),
            timer_level: self.timer_level(),
            can_go_back: active && self.current > 0,
            can_navigate: active,
            is_last: self.is_last_question(),
            answered: self.answers.len(),
            status: self.status,
            age_group: self.config.age_group(),
            indicators,
        }
    }

    fn ensure_active(&self) -> Result<(), SessionError> {
        if self.status == SessionStatus::Active {
            Ok(())
        } else {
            Err(SessionError::NotActive {
                status: self.status,
            })
        }
    }
}

/// Moves the session to `Errored` if dropped before `settle` runs.
struct PendingSubmission<'a> {
    session: &'a mut QuizSession,
    settled: bool,
}

impl PendingSubmission<'_> {
    fn settle(
        mut self,
        outcome: Result<SubmissionResult, SubmitError>,
    ) -> Result<SubmissionResult, SessionError> {
        self.settled = true;
        self.session.finish_submission(outcome)
    }
}

impl Drop for PendingSubmission<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.session.abandon_submission();
        }
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("child_id", &self.config.child_id())
            .field("questions_len", &self.questions.len())
            .field("current", &self.current)
            .field("answers_len", &self.answers.len())
            .field("time_remaining", &self.time_remaining)
            .field("status", &self.status)
            .field("in_flight", &self.in_flight)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
