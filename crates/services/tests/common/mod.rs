#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use quiz_core::model::{Question, QuestionId, SubmissionResult};
use services::{SubmissionEndpoint, SubmissionRequest, SubmitError};
use tokio::sync::Notify;

/// Route `tracing` output through the test harness; safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

pub fn questions(n: u64) -> Vec<Question> {
    (1..=n)
        .map(|id| {
            Question::new(
                QuestionId::new(id),
                "Logical Deduction",
                "logical_deduction",
                3,
                format!("Question {id}"),
                vec!["red".into(), "blue".into(), "green".into()],
            )
            .unwrap()
        })
        .collect()
}

pub fn success_result() -> SubmissionResult {
    SubmissionResult {
        success: true,
        score: 80.0,
        correct_answers: 4,
        total_questions: 5,
        strong_points: vec!["patterns".into()],
        weak_points: Vec::new(),
        error: None,
        result_id: None,
    }
}

pub fn rejected_result(message: &str) -> SubmissionResult {
    SubmissionResult {
        success: false,
        score: 0.0,
        correct_answers: 0,
        total_questions: 0,
        strong_points: Vec::new(),
        weak_points: Vec::new(),
        error: Some(message.into()),
        result_id: None,
    }
}

/// Replays canned responses in order and records every request.
#[derive(Default)]
pub struct ScriptedEndpoint {
    responses: Mutex<VecDeque<Result<SubmissionResult, SubmitError>>>,
    requests: Mutex<Vec<SubmissionRequest>>,
    gate: Option<Notify>,
}

impl ScriptedEndpoint {
    pub fn new(responses: Vec<Result<SubmissionResult, SubmitError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    /// Responses are held back until `release()` is called.
    pub fn gated(responses: Vec<Result<SubmissionResult, SubmitError>>) -> Self {
        Self {
            gate: Some(Notify::new()),
            ..Self::new(responses)
        }
    }

    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }

    pub fn requests(&self) -> Vec<SubmissionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl SubmissionEndpoint for ScriptedEndpoint {
    async fn submit(&self, request: &SubmissionRequest) -> Result<SubmissionResult, SubmitError> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(SubmitError::Transport("no scripted response".into())))
    }
}
