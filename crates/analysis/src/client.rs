//! Completion client for the external analysis API.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::{COMPLETION_MODEL, COMPLETION_TEMPERATURE, MAX_COMPLETION_TOKENS};
use crate::prompt::{build_prompt, SYSTEM_PROMPT};
use crate::{AnalysisConfig, AnalysisError, AnalysisRequest};

/// Literal returned when a successful upstream payload lacks the expected
/// completion shape.
pub const ANALYSIS_UNAVAILABLE: &str = "Analysis unavailable";

/// Seam for producing an analysis from a validated request.
///
/// The REST layer holds a trait object so tests can substitute a recording
/// fake for the real HTTP client.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, request: &AnalysisRequest) -> Result<String, AnalysisError>;
}

/// Chat-completion request body (OpenAI wire format).
#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

/// Chat-completion response, deserialized permissively: a success payload
/// without the expected shape degrades to [`ANALYSIS_UNAVAILABLE`] instead of
/// failing.
#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    #[serde(default)]
    message: Option<ChatMessageBody>,
}

#[derive(Deserialize)]
struct ChatMessageBody {
    #[serde(default)]
    content: Option<String>,
}

/// HTTP client for the chat-completion API.
///
/// Stateless between calls: each invocation issues one outbound request with
/// the fixed model, system instruction, token cap and temperature. No timeout
/// is configured beyond the platform default and nothing is retried.
pub struct CompletionClient {
    client: reqwest::Client,
    config: AnalysisConfig,
}

impl CompletionClient {
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    async fn request_completion(&self, request: &AnalysisRequest) -> Result<String, AnalysisError> {
        let api_key = self.config.api_key().ok_or(AnalysisError::MissingCredential)?;

        let chat_request = ChatRequest {
            model: COMPLETION_MODEL.to_string(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: build_prompt(request),
                },
            ],
            max_tokens: MAX_COMPLETION_TOKENS,
            temperature: COMPLETION_TEMPERATURE,
        };

        let url = format!("{}/chat/completions", self.config.base_url());
        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&chat_request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(%status, %body, "chat completion request failed");
            return Err(AnalysisError::UpstreamStatus);
        }

        let chat_response: ChatResponse = response.json().await?;
        let analysis = chat_response
            .choices
            .first()
            .and_then(|choice| choice.message.as_ref())
            .and_then(|message| message.content.as_deref())
            .map(str::trim)
            .filter(|content| !content.is_empty())
            .unwrap_or(ANALYSIS_UNAVAILABLE)
            .to_string();

        Ok(analysis)
    }
}

#[async_trait]
impl CompletionBackend for CompletionClient {
    async fn complete(&self, request: &AnalysisRequest) -> Result<String, AnalysisError> {
        self.request_completion(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> AnalysisRequest {
        AnalysisRequest {
            resource_type: Some("Patient".to_string()),
            summary: Some("Patient John Doe...".to_string()),
            patient_id: Some("P001".to_string()),
            status: "PROCESSING_STATE_COMPLETED".to_string(),
            fhir_version: Some("FHIR_VERSION_R4".to_string()),
        }
    }

    fn client_for(server: &mockito::Server, api_key: Option<&str>) -> CompletionClient {
        CompletionClient::new(AnalysisConfig::new(
            api_key.map(str::to_string),
            server.url(),
        ))
    }

    #[tokio::test]
    async fn test_success_returns_trimmed_completion_text() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer test-key")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[{"message":{"content":"  Routine admission record.  "}}]}"#)
            .create_async()
            .await;

        let client = client_for(&server, Some("test-key"));
        let analysis = client.complete(&request()).await.unwrap();
        assert_eq!(analysis, "Routine admission record.");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_outbound_body_carries_fixed_parameters() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "model": "gpt-3.5-turbo",
                "max_tokens": 200,
                "temperature": 0.3,
            })))
            .with_status(200)
            .with_body(r#"{"choices":[{"message":{"content":"ok"}}]}"#)
            .create_async()
            .await;

        let client = client_for(&server, Some("test-key"));
        client.complete(&request()).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_missing_credential_fails_without_outbound_call() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .expect(0)
            .create_async()
            .await;

        let client = client_for(&server, None);
        let error = client.complete(&request()).await.unwrap_err();
        assert!(matches!(error, AnalysisError::MissingCredential));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_upstream_error_status_is_not_echoed() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(429)
            .with_body(r#"{"error":{"message":"rate limited, secret details"}}"#)
            .create_async()
            .await;

        let client = client_for(&server, Some("test-key"));
        let error = client.complete(&request()).await.unwrap_err();
        assert!(matches!(error, AnalysisError::UpstreamStatus));
        assert!(!error.to_string().contains("secret"));
    }

    #[tokio::test]
    async fn test_malformed_success_payload_degrades_to_fallback() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id":"cmpl-1"}"#)
            .create_async()
            .await;

        let client = client_for(&server, Some("test-key"));
        let analysis = client.complete(&request()).await.unwrap();
        assert_eq!(analysis, ANALYSIS_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_choice_without_content_degrades_to_fallback() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(r#"{"choices":[{"message":{}}]}"#)
            .create_async()
            .await;

        let client = client_for(&server, Some("test-key"));
        let analysis = client.complete(&request()).await.unwrap();
        assert_eq!(analysis, ANALYSIS_UNAVAILABLE);
    }
}
