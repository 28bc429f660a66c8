use std::sync::Arc;

use quiz_core::model::Question;
use services::{
    NextOutcome, QuizConfig, QuizRunner, SessionError, SessionEvent, SubmissionEndpoint,
};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::warn;

use crate::state::ViewError;
use crate::vm::quiz_vm::QuizVm;
use crate::vm::result_vm::ResultVm;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuizIntent {
    Select(usize),
    Next,
    Prev,
    Jump(usize),
    Submit,
}

#[derive(Clone, Debug, PartialEq)]
pub enum QuizOutcome {
    Continue(QuizVm),
    Completed(ResultVm),
    Failed(ViewError),
}

/// View-side owner of one running quiz.
pub struct QuizScreen {
    runner: QuizRunner,
    events: UnboundedReceiver<SessionEvent>,
}

impl QuizScreen {
    #[must_use]
    pub fn new(runner: QuizRunner, events: UnboundedReceiver<SessionEvent>) -> Self {
        Self { runner, events }
    }

    /// Next pushed event (tick, alert, auto-submission result), if any is queued.
    pub fn poll_event(&mut self) -> Option<SessionEvent> {
        self.events.try_recv().ok()
    }

    pub async fn view(&self) -> QuizVm {
        QuizVm::from_snapshot(&self.runner.snapshot().await)
    }

    /// Apply a user intent and describe what the screen should show next.
    pub async fn apply(&self, intent: QuizIntent) -> QuizOutcome {
        let step = match intent {
            QuizIntent::Select(index) => self.runner.select_answer(index).await.map(|_| ()),
            QuizIntent::Prev => self.runner.retreat().await.map(|_| ()),
            QuizIntent::Jump(index) => self.runner.jump_to(index).await.map(|_| ()),
            QuizIntent::Next => match self.runner.next().await {
                Ok(NextOutcome::NavigatedTo(_)) => Ok(()),
                Ok(NextOutcome::Submitted(result)) => return self.finish(result).await,
                Err(err) => Err(err),
            },
            QuizIntent::Submit => {
                let result = self.runner.submit().await;
                return self.finish(result).await;
            }
        };

        match step {
            Ok(()) => QuizOutcome::Continue(self.view().await),
            Err(err) => {
                warn!(error = %err, ?intent, "quiz intent rejected");
                QuizOutcome::Failed(ViewError::from(&err))
            }
        }
    }

    async fn finish(
        &self,
        result: Result<quiz_core::model::SubmissionResult, SessionError>,
    ) -> QuizOutcome {
        match result {
            Ok(report) => {
                let time_taken = self.runner.snapshot().await.time_taken;
                QuizOutcome::Completed(ResultVm::new(&report, time_taken))
            }
            Err(err) => QuizOutcome::Failed(ViewError::from(&err)),
        }
    }
}

/// # Errors
///
/// Returns `ViewError::EmptyQuestionSet` when there are no questions.
/// Returns `ViewError::Unknown` for other failures.
pub fn start_quiz(
    config: QuizConfig,
    questions: Vec<Question>,
    endpoint: Arc<dyn SubmissionEndpoint>,
) -> Result<QuizScreen, ViewError> {
    let (runner, events) = match QuizRunner::start(config, questions, endpoint) {
        Ok(started) => started,
        Err(SessionError::EmptyQuestionSet) => return Err(ViewError::EmptyQuestionSet),
        Err(_) => return Err(ViewError::Unknown),
    };
    Ok(QuizScreen::new(runner, events))
}
