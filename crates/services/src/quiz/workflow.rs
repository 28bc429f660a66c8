use std::ops::ControlFlow;
use std::sync::{Arc, Mutex as StdMutex, PoisonError, Weak};

use tokio::sync::{Mutex, mpsc};
use tracing::{info, warn};

use quiz_core::model::{Answer, Question, SubmissionResult, TimerLevel};

use super::progress::SessionSnapshot;
use super::service::{Navigation, QuizSession, SessionStatus, TickOutcome};
use super::timer::TickTimer;
use crate::config::QuizConfig;
use crate::error::{Recovery, SessionError};
use crate::submission::{SubmissionEndpoint, SubmissionRequest};

/// Asynchronous notifications pushed to the view while a session runs.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Tick { remaining: u32, level: TimerLevel },
    TimeAlert { remaining: u32 },
    /// Time ran out; an automatic submission follows.
    Expired,
    Submitted(SubmissionResult),
    SubmissionFailed { message: String, recovery: Recovery },
}

/// Result of the "next" button: either a move or a finished submission attempt.
#[derive(Debug)]
pub enum NextOutcome {
    NavigatedTo(usize),
    Submitted(Result<SubmissionResult, SessionError>),
}

/// Drives a `QuizSession` with a live countdown and a submission endpoint.
///
/// All mutations, including timer ticks, go through one async mutex, so a
/// tick never interleaves with navigation or submission. The countdown task is
/// cancelled when the session leaves `Active` and when the runner is dropped.
pub struct QuizRunner {
    shared: Arc<Shared>,
}

struct Shared {
    session: Mutex<QuizSession>,
    endpoint: Arc<dyn SubmissionEndpoint>,
    timer: StdMutex<TickTimer>,
    events: mpsc::UnboundedSender<SessionEvent>,
}

impl QuizRunner {
    /// Initialize a session and start its countdown.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptyQuestionSet` when there are no questions; no
    /// timer is started in that case.
    pub fn start(
        config: QuizConfig,
        questions: Vec<Question>,
        endpoint: Arc<dyn SubmissionEndpoint>,
    ) -> Result<(Self, mpsc::UnboundedReceiver<SessionEvent>), SessionError> {
        let period = config.tick_interval();
        let session = QuizSession::initialize(config, questions)?;
        let (events, receiver) = mpsc::unbounded_channel();

        let shared = Arc::new(Shared {
            session: Mutex::new(session),
            endpoint,
            timer: StdMutex::new(TickTimer::default()),
            events,
        });

        let weak: Weak<Shared> = Arc::downgrade(&shared);
        let timer = TickTimer::spawn(period, move || {
            let weak = weak.clone();
            async move {
                match weak.upgrade() {
                    Some(shared) => shared.on_tick().await,
                    None => ControlFlow::Break(()),
                }
            }
        });
        *shared.lock_timer() = timer;

        Ok((Self { shared }, receiver))
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.shared.session.lock().await.snapshot()
    }

    pub async fn status(&self) -> SessionStatus {
        self.shared.session.lock().await.status()
    }

    /// # Errors
    ///
    /// See `QuizSession::select_answer`.
    pub async fn select_answer(&self, option_index: usize) -> Result<Answer, SessionError> {
        self.shared.session.lock().await.select_answer(option_index)
    }

    /// # Errors
    ///
    /// See `QuizSession::advance`.
    pub async fn advance(&self) -> Result<Navigation, SessionError> {
        self.shared.session.lock().await.advance()
    }

    /// # Errors
    ///
    /// See `QuizSession::retreat`.
    pub async fn retreat(&self) -> Result<Navigation, SessionError> {
        self.shared.session.lock().await.retreat()
    }

    /// # Errors
    ///
    /// See `QuizSession::jump_to`.
    pub async fn jump_to(&self, index: usize) -> Result<Navigation, SessionError> {
        self.shared.session.lock().await.jump_to(index)
    }

    /// Advance, submitting when already on the last question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotActive` when the session cannot navigate.
    pub async fn next(&self) -> Result<NextOutcome, SessionError> {
        match self.advance().await? {
            Navigation::NavigatedTo(index) => Ok(NextOutcome::NavigatedTo(index)),
            Navigation::SubmissionRequested => Ok(NextOutcome::Submitted(self.submit().await)),
            Navigation::NoOp => {
                let index = self.shared.session.lock().await.current_index();
                Ok(NextOutcome::NavigatedTo(index))
            }
        }
    }

    /// Submit the answers now. Concurrent calls while one is pending are rejected.
    ///
    /// # Errors
    ///
    /// See `QuizSession::begin_submission` and `QuizSession::finish_submission`.
    pub async fn submit(&self) -> Result<SubmissionResult, SessionError> {
        Arc::clone(&self.shared).submit().await
    }

    #[must_use]
    pub fn is_timer_running(&self) -> bool {
        self.shared.lock_timer().is_running()
    }

    /// Tear the session down, stopping the countdown.
    pub fn abandon(self) {
        info!("quiz session abandoned");
    }
}

impl Drop for QuizRunner {
    fn drop(&mut self) {
        self.shared.cancel_timer();
    }
}

impl Shared {
    fn lock_timer(&self) -> std::sync::MutexGuard<'_, TickTimer> {
        self.timer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn cancel_timer(&self) {
        self.lock_timer().cancel();
    }

    fn emit(&self, event: SessionEvent) {
        // The view may have gone away; events are then irrelevant.
        let _ = self.events.send(event);
    }

    async fn on_tick(self: Arc<Self>) -> ControlFlow<()> {
        let (outcome, level) = {
            let mut session = self.session.lock().await;
            let outcome = session.tick();
            (outcome, session.timer_level())
        };

        match outcome {
            Ok(TickOutcome::Continue { remaining, alert }) => {
                self.emit(SessionEvent::Tick { remaining, level });
                if alert {
                    self.emit(SessionEvent::TimeAlert { remaining });
                }
                ControlFlow::Continue(())
            }
            Ok(TickOutcome::Expired) => {
                self.emit(SessionEvent::Tick {
                    remaining: 0,
                    level,
                });
                self.emit(SessionEvent::Expired);
                let shared = Arc::clone(&self);
                tokio::spawn(async move {
                    if let Err(err) = shared.submit().await {
                        warn!(error = %err, "automatic submission failed");
                    }
                });
                ControlFlow::Break(())
            }
            Err(_) => ControlFlow::Break(()),
        }
    }

    async fn submit(self: Arc<Self>) -> Result<SubmissionResult, SessionError> {
        let request = self.session.lock().await.begin_submission()?;
        self.cancel_timer();

        // The request settles on its own task; a caller that stops waiting
        // must not leave the session in flight.
        let task = tokio::spawn(async move { self.settle(request).await });
        match task.await {
            Ok(result) => result,
            Err(err) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
            Err(_) => Err(SessionError::SubmissionCancelled),
        }
    }

    async fn settle(&self, request: SubmissionRequest) -> Result<SubmissionResult, SessionError> {
        let outcome = self.endpoint.submit(&request).await;
        let result = self.session.lock().await.finish_submission(outcome);

        match &result {
            Ok(report) => self.emit(SessionEvent::Submitted(report.clone())),
            Err(err) => {
                if let Some(recovery) = err.recovery() {
                    self.emit(SessionEvent::SubmissionFailed {
                        message: err.to_string(),
                        recovery,
                    });
                }
            }
        }
        result
    }
}
