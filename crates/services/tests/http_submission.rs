mod common;

use common::questions;
use quiz_core::model::{AgeGroup, ChildId};
use services::{
    HttpSubmissionEndpoint, QuizConfig, QuizSession, SessionError, SessionStatus,
    SubmissionConfig, SubmitError,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Serve one canned HTTP response and hand back the raw request text.
async fn serve_once(status_line: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut raw = Vec::new();
        let mut buf = [0_u8; 4096];
        loop {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            raw.extend_from_slice(&buf[..n]);
            if request_complete(&raw) {
                break;
            }
        }

        let response = format!(
            "HTTP/1.1 {status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();
        String::from_utf8_lossy(&raw).into_owned()
    });

    (base_url, handle)
}

fn request_complete(raw: &[u8]) -> bool {
    let text = String::from_utf8_lossy(raw);
    let Some(header_end) = text.find("\r\n\r\n") else {
        return false;
    };
    let content_length = text[..header_end]
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            name.eq_ignore_ascii_case("content-length")
                .then(|| value.trim().parse::<usize>().ok())
                .flatten()
        })
        .unwrap_or(0);
    raw.len() >= header_end + 4 + content_length
}

fn session() -> QuizSession {
    QuizSession::initialize(
        QuizConfig::new(ChildId::new(42), AgeGroup::Young),
        questions(3),
    )
    .unwrap()
}

#[tokio::test]
async fn posts_answers_to_child_endpoint() {
    let (base_url, server) = serve_once(
        "200 OK",
        r#"{"success": true, "score": 66.67, "correct_answers": 2, "total_questions": 3,
            "strong_points": [], "weak_points": ["Logical Deduction"], "result_id": 9}"#,
    )
    .await;
    let endpoint = HttpSubmissionEndpoint::new(SubmissionConfig::new(base_url)).unwrap();

    let mut session = session();
    session.select_answer(1).unwrap();
    let result = session.submit(&endpoint).await.unwrap();

    assert_eq!(result.correct_answers, 2);
    assert_eq!(result.result_id, Some(9));
    assert_eq!(session.status(), SessionStatus::Completed);

    let request = server.await.unwrap();
    assert!(request.starts_with("POST /submit_test/42 "));
    assert!(request.contains(r#""time_taken":0"#));
    assert!(request.contains(r#""answer":"blue""#));
    assert!(request.contains(r#""type":"logical_deduction""#));
}

#[tokio::test]
async fn non_success_status_is_a_network_error() {
    let (base_url, server) = serve_once("403 Forbidden", r#"{"error": "Unauthorized"}"#).await;
    let endpoint = HttpSubmissionEndpoint::new(SubmissionConfig::new(base_url)).unwrap();

    let mut session = session();
    let err = session.submit(&endpoint).await.unwrap_err();

    assert!(matches!(
        err,
        SessionError::Network(SubmitError::HttpStatus(status)) if status.as_u16() == 403
    ));
    assert_eq!(session.status(), SessionStatus::Errored);
    server.await.unwrap();
}

#[tokio::test]
async fn unreachable_endpoint_is_a_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let endpoint = HttpSubmissionEndpoint::new(SubmissionConfig::new(base_url)).unwrap();
    let mut session = session();
    let err = session.submit(&endpoint).await.unwrap_err();

    assert!(matches!(err, SessionError::Network(SubmitError::Http(_))));
    assert_eq!(session.status(), SessionStatus::Errored);
}
