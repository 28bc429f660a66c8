use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use crate::model::ids::QuestionId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question {id} needs at least two options, got {len}")]
    TooFewOptions { id: QuestionId, len: usize },

    #[error("question {id} has difficulty 0; difficulty must be > 0")]
    ZeroDifficulty { id: QuestionId },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionSetError {
    #[error("question set is empty")]
    Empty,

    #[error("question id {0} appears more than once")]
    DuplicateId(QuestionId),
}

//
// ─── WIRE SHAPE ────────────────────────────────────────────────────────────────
//

/// Question as it arrives from the question source.
///
/// Extra fields (such as the grading key) are ignored on deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub id: QuestionId,
    pub category: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub difficulty: u8,
    pub question: String,
    pub options: Vec<String>,
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A validated, immutable quiz question.
///
/// Options are addressed by their 0-based position for the whole session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "QuestionRecord", into = "QuestionRecord")]
pub struct Question {
    id: QuestionId,
    category: String,
    kind: String,
    difficulty: u8,
    text: String,
    options: Vec<String>,
}

impl Question {
    /// Build a question from its parts.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::TooFewOptions` when fewer than two options are given.
    /// Returns `QuestionError::ZeroDifficulty` when `difficulty` is 0.
    pub fn new(
        id: QuestionId,
        category: impl Into<String>,
        kind: impl Into<String>,
        difficulty: u8,
        text: impl Into<String>,
        options: Vec<String>,
    ) -> Result<Self, QuestionError> {
        if options.len() < 2 {
            return Err(QuestionError::TooFewOptions {
                id,
                len: options.len(),
            });
        }
        if difficulty == 0 {
            return Err(QuestionError::ZeroDifficulty { id });
        }

        Ok(Self {
            id,
            category: category.into(),
            kind: kind.into(),
            difficulty,
            text: text.into(),
            options,
        })
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Question type tag, e.g. `color_sequence` or `matrix_logic`.
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    #[must_use]
    pub fn difficulty(&self) -> u8 {
        self.difficulty
    }

    /// Raw question text, line-break markers included.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Question text split on `\n` and `<br>` markers.
    #[must_use]
    pub fn lines(&self) -> Vec<&str> {
        self.text
            .split('\n')
            .flat_map(|line| line.split("<br>"))
            .map(str::trim_end)
            .collect()
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn option(&self, index: usize) -> Option<&str> {
        self.options.get(index).map(String::as_str)
    }
}

impl TryFrom<QuestionRecord> for Question {
    type Error = QuestionError;

    fn try_from(record: QuestionRecord) -> Result<Self, Self::Error> {
        Self::new(
            record.id,
            record.category,
            record.kind,
            record.difficulty,
            record.question,
            record.options,
        )
    }
}

impl From<Question> for QuestionRecord {
    fn from(question: Question) -> Self {
        Self {
            id: question.id,
            category: question.category,
            kind: question.kind,
            difficulty: question.difficulty,
            question: question.text,
            options: question.options,
        }
    }
}

//
// ─── QUESTION SET ──────────────────────────────────────────────────────────────
//

/// Fixed, ordered, non-empty list of questions for one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionSet {
    questions: Vec<Question>,
}

impl QuestionSet {
    /// # Errors
    ///
    /// Returns `QuestionSetError::Empty` for an empty list and
    /// `QuestionSetError::DuplicateId` when two questions share an id.
    pub fn new(questions: Vec<Question>) -> Result<Self, QuestionSetError> {
        if questions.is_empty() {
            return Err(QuestionSetError::Empty);
        }
        let mut seen = HashSet::with_capacity(questions.len());
        for question in &questions {
            if !seen.insert(question.id()) {
                return Err(QuestionSetError::DuplicateId(question.id()));
            }
        }
        Ok(Self { questions })
    }

    /// Parse the JSON array embedded by the quiz page.
    ///
    /// # Errors
    ///
    /// Returns `Error::Json` for malformed input or invalid questions, and
    /// `Error::QuestionSet` for empty or duplicated sets.
    pub fn from_json(raw: &str) -> Result<Self, crate::Error> {
        let questions: Vec<Question> = serde_json::from_str(raw)?;
        Ok(Self::new(questions)?)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Always false; kept for clippy's `len_without_is_empty`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Question] {
        &self.questions
    }

    pub fn iter(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter()
    }
}
