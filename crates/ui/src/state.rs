use services::SessionError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViewError {
    /// No questions could be loaded; navigation stays disabled.
    EmptyQuestionSet,
    /// Submission could not reach the server; the user may resubmit.
    Network,
    /// The server refused the submission; offer the way back to the dashboard.
    Server(String),
    Unknown,
}

impl ViewError {
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::EmptyQuestionSet => "No questions available. Please try again.".to_string(),
            Self::Network => {
                "Network error. Please check your connection and try again.".to_string()
            }
            Self::Server(reason) => format!("Error submitting test: {reason}"),
            Self::Unknown => "Something went wrong. Please try again.".to_string(),
        }
    }

    #[must_use]
    pub fn can_retry(&self) -> bool {
        matches!(self, Self::Network)
    }
}

impl From<&SessionError> for ViewError {
    fn from(err: &SessionError) -> Self {
        match err {
            SessionError::EmptyQuestionSet => Self::EmptyQuestionSet,
            SessionError::Network(_) => Self::Network,
            SessionError::Server(reason) => Self::Server(reason.clone()),
            _ => Self::Unknown,
        }
    }
}
