//! Submission of survey responses to the backend

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::errors::SubmissionError;
use crate::models::{FormState, SubmissionResult};

/// Stores a completed form somewhere and reports back
#[async_trait]
pub trait SubmitResponse: Send + Sync {
    async fn submit_response(&self, form: &FormState) -> Result<SubmissionResult, SubmissionError>;
}

/// Posts the form as JSON to the configured endpoint
#[derive(Debug, Clone)]
pub struct HttpSubmitter {
    client: Client,
    api_url: String,
}

/// Error payload returned by the backend on non-2xx responses
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

impl HttpSubmitter {
    pub fn new(config: &Config) -> Result<Self, SubmissionError> {
        let client = Client::builder()
            .user_agent(&config.http.user_agent)
            .timeout(config.http_timeout())
            .build()?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }
}

#[async_trait]
impl SubmitResponse for HttpSubmitter {
    async fn submit_response(&self, form: &FormState) -> Result<SubmissionResult, SubmissionError> {
        info!("Posting survey response to {}", self.api_url);

        let response = self.client.post(&self.api_url).json(form).send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!("Backend answered {} with {} bytes", status, body.len());

        if !status.is_success() {
            let message = rejection_message(&body);
            warn!("Submission rejected (status {}): {}", status.as_u16(), message);
            return Err(SubmissionError::rejected(status.as_u16(), message));
        }

        let result: SubmissionResult = serde_json::from_str(&body)?;
        if !result.is_success() {
            return Err(SubmissionError::MissingName);
        }
        Ok(result)
    }
}

/// Pull the human-readable reason out of an error body.
///
/// JSON bodies carry it in `message` or `error`; anything else is used as is.
fn rejection_message(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody { message: Some(m), .. }) => m,
        Ok(ErrorBody { error: Some(e), .. }) => e,
        _ => body.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve exactly one HTTP request with a canned response and hand back
    /// the request body that was received.
    async fn serve_once(status_line: &'static str, body: &'static str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/api/responses", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut received = Vec::new();
            let mut buf = [0u8; 4096];

            // Read headers, then as much body as Content-Length announces
            let body_start = loop {
                let n = socket.read(&mut buf).await.unwrap();
                received.extend_from_slice(&buf[..n]);
                if let Some(pos) = received.windows(4).position(|w| w == b"\r\n\r\n") {
                    break pos + 4;
                }
            };
            let headers = String::from_utf8_lossy(&received[..body_start]).to_lowercase();
            let content_length = headers
                .lines()
                .find_map(|l| l.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            while received.len() < body_start + content_length {
                let n = socket.read(&mut buf).await.unwrap();
                received.extend_from_slice(&buf[..n]);
            }

            let response = format!(
                "{}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();

            String::from_utf8_lossy(&received[body_start..]).to_string()
        });

        (url, handle)
    }

    fn submitter_for(url: String) -> HttpSubmitter {
        let mut config = Config::default();
        config.api_url = url;
        HttpSubmitter::new(&config).unwrap()
    }

    fn filled_form() -> FormState {
        FormState {
            name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            age: "25-34".to_string(),
            education: "Bachelor's degree".to_string(),
            answers: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_successful_post_returns_result_and_sends_form() {
        let (url, server) = serve_once("HTTP/1.1 201 Created", r#"{"name":"Jane Doe","id":"abc"}"#).await;

        let result = submitter_for(url).submit_response(&filled_form()).await.unwrap();
        assert_eq!(result.name.as_deref(), Some("Jane Doe"));

        let sent: FormState = serde_json::from_str(&server.await.unwrap()).unwrap();
        assert_eq!(sent, filled_form());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejection() {
        let (url, _server) = serve_once(
            "HTTP/1.1 409 Conflict",
            r#"{"message":"Email already exists"}"#,
        )
        .await;

        let err = submitter_for(url).submit_response(&filled_form()).await.unwrap_err();
        assert!(matches!(err, SubmissionError::DuplicateEmail));
    }

    #[tokio::test]
    async fn test_other_rejection_keeps_status_and_message() {
        let (url, _server) = serve_once(
            "HTTP/1.1 500 Internal Server Error",
            r#"{"error":"database unavailable"}"#,
        )
        .await;

        let err = submitter_for(url).submit_response(&filled_form()).await.unwrap_err();
        match err {
            SubmissionError::Rejected { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "database unavailable");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_success_without_name_is_an_error() {
        let (url, _server) = serve_once("HTTP/1.1 200 OK", r#"{"id":"abc"}"#).await;

        let err = submitter_for(url).submit_response(&filled_form()).await.unwrap_err();
        assert!(matches!(err, SubmissionError::MissingName));
    }

    #[test]
    fn test_rejection_message_falls_back_to_plain_text() {
        assert_eq!(rejection_message("  Email already exists\n"), "Email already exists");
        assert_eq!(rejection_message(r#"{"message":"nope"}"#), "nope");
    }
}
