use thiserror::Error;

use crate::model::{QuestionError, QuestionSetError};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    QuestionSet(#[from] QuestionSetError),
    #[error("malformed question source: {0}")]
    Json(#[from] serde_json::Error),
}
