use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;

use quiz_core::model::{Answer, ChildId, SubmissionResult};

use crate::config::SubmissionConfig;
use crate::error::SubmitError;

/// JSON body posted to the grading backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionPayload {
    pub answers: Vec<Answer>,
    pub time_taken: u32,
}

/// A frozen answer set addressed to one child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionRequest {
    pub child_id: ChildId,
    pub payload: SubmissionPayload,
}

/// Grades a submitted answer set.
///
/// Implementations return the backend's result record as-is; interpreting
/// `success: false` is the controller's job.
#[async_trait]
pub trait SubmissionEndpoint: Send + Sync {
    async fn submit(&self, request: &SubmissionRequest) -> Result<SubmissionResult, SubmitError>;
}

/// `POST {base_url}/submit_test/{child_id}` over HTTP.
#[derive(Clone)]
pub struct HttpSubmissionEndpoint {
    client: Client,
    config: SubmissionConfig,
}

impl HttpSubmissionEndpoint {
    /// # Errors
    ///
    /// Returns `SubmitError::Http` when the HTTP client cannot be built.
    pub fn new(config: SubmissionConfig) -> Result<Self, SubmitError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    /// # Errors
    ///
    /// Returns `SubmitError::Http` when the HTTP client cannot be built.
    pub fn from_env() -> Result<Self, SubmitError> {
        Self::new(SubmissionConfig::from_env())
    }

    #[must_use]
    pub fn url_for(&self, child_id: ChildId) -> String {
        format!(
            "{}/submit_test/{}",
            self.config.base_url.trim_end_matches('/'),
            child_id
        )
    }
}

#[async_trait]
impl SubmissionEndpoint for HttpSubmissionEndpoint {
    async fn submit(&self, request: &SubmissionRequest) -> Result<SubmissionResult, SubmitError> {
        let response = self
            .client
            .post(self.url_for(request.child_id))
            .json(&request.payload)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;
        decode_response(status, &body)
    }
}

/// Interpret a raw endpoint response. Non-2xx and malformed bodies are transport failures.
///
/// # Errors
///
/// Returns `SubmitError::HttpStatus` for non-success statuses and
/// `SubmitError::Malformed` when the body is not a result record.
pub fn decode_response(status: StatusCode, body: &[u8]) -> Result<SubmissionResult, SubmitError> {
    if !status.is_success() {
        return Err(SubmitError::HttpStatus(status));
    }
    Ok(serde_json::from_slice(body)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_accepts_success_record() {
        let body = br#"{"success": true, "score": 80.0, "correct_answers": 4,
            "total_questions": 5, "strong_points": ["patterns"], "weak_points": []}"#;
        let result = decode_response(StatusCode::OK, body).unwrap();
        assert!(result.success);
        assert_eq!(result.correct_answers, 4);
        assert_eq!(result.strong_points, vec!["patterns".to_string()]);
    }

    #[test]
    fn decode_rejects_non_success_status() {
        let body = br#"{"error": "Unauthorized"}"#;
        let err = decode_response(StatusCode::FORBIDDEN, body).unwrap_err();
        assert!(matches!(err, SubmitError::HttpStatus(StatusCode::FORBIDDEN)));
    }

    #[test]
    fn decode_rejects_malformed_body() {
        let err = decode_response(StatusCode::OK, b"<html>oops</html>").unwrap_err();
        assert!(matches!(err, SubmitError::Malformed(_)));
    }

    #[test]
    fn url_trims_trailing_slash() {
        let endpoint =
            HttpSubmissionEndpoint::new(SubmissionConfig::new("http://quiz.local/")).unwrap();
        assert_eq!(
            endpoint.url_for(ChildId::new(12)),
            "http://quiz.local/submit_test/12"
        );
    }
}
