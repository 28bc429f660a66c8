use serde::{Deserialize, Serialize};

use crate::model::ids::QuestionId;
use crate::model::question::Question;

/// The recorded choice for one question.
///
/// Carries the option text alongside its index so a recorded answer stays
/// meaningful even if options are later reordered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub question_id: QuestionId,
    pub answer: String,
    pub option_index: usize,
    pub category: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub difficulty: u8,
}

impl Answer {
    /// Build the answer for `option_index` of `question`.
    ///
    /// Returns `None` when the index is outside the question's options.
    #[must_use]
    pub fn for_option(question: &Question, option_index: usize) -> Option<Self> {
        let text = question.option(option_index)?;
        Some(Self {
            question_id: question.id(),
            answer: text.to_owned(),
            option_index,
            category: question.category().to_owned(),
            kind: question.kind().to_owned(),
            difficulty: question.difficulty(),
        })
    }
}

/// Answers keyed by question id, kept in insertion order.
///
/// Holds at most one answer per question id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AnswerSheet {
    answers: Vec<Answer>,
}

impl AnswerSheet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `answer`, replacing any existing answer for the same question in place.
    ///
    /// Returns the stored answer.
    pub fn upsert(&mut self, answer: Answer) -> &Answer {
        let position = self
            .answers
            .iter()
            .position(|existing| existing.question_id == answer.question_id);
        let slot = match position {
            Some(index) => {
                self.answers[index] = answer;
                index
            }
            None => {
                self.answers.push(answer);
                self.answers.len() - 1
            }
        };
        &self.answers[slot]
    }

    #[must_use]
    pub fn get(&self, question_id: QuestionId) -> Option<&Answer> {
        self.answers
            .iter()
            .find(|answer| answer.question_id == question_id)
    }

    #[must_use]
    pub fn is_answered(&self, question_id: QuestionId) -> bool {
        self.get(question_id).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.answers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Answer] {
        &self.answers
    }
}
