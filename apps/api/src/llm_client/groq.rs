//! Secondary backend: Groq's hosted, OpenAI-compatible chat completions API.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::llm_client::{BackendDescriptor, Completion, GenerationBackend, LlmError, Usage};
use crate::models::chat::ConversationTurn;

pub const GROQ_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "llama-3.1-70b-versatile";
const TEMPERATURE: f32 = 0.7;
const MAX_TOKENS: u32 = 2048;

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ConversationTurn],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    model: Option<String>,
    choices: Vec<Choice>,
    usage: Option<CompletionUsage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CompletionUsage {
    prompt_tokens: Option<u32>,
    completion_tokens: Option<u32>,
    total_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct GroqError {
    error: GroqErrorBody,
}

#[derive(Debug, Deserialize)]
struct GroqErrorBody {
    message: String,
}

#[derive(Clone)]
pub struct GroqBackend {
    client: Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl GroqBackend {
    pub fn new(client: Client, api_key: String, model: String) -> Self {
        Self {
            client,
            api_key,
            model,
            endpoint: GROQ_API_URL.to_string(),
        }
    }

    #[cfg(test)]
    fn with_endpoint(client: Client, api_key: String, endpoint: String) -> Self {
        Self {
            endpoint,
            ..Self::new(client, api_key, DEFAULT_MODEL.to_string())
        }
    }
}

#[async_trait]
impl GenerationBackend for GroqBackend {
    fn descriptor(&self) -> BackendDescriptor {
        BackendDescriptor {
            provider: "groq",
            model: self.model.clone(),
        }
    }

    async fn complete(&self, messages: &[ConversationTurn]) -> Result<Completion, LlmError> {
        let request_body = ChatCompletionRequest {
            model: &self.model,
            messages,
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GroqError>(&body)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| format!("Groq API error: {}", status.as_u16()));
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: ChatCompletionResponse = response.json().await?;
        into_completion(body, &self.model)
    }
}

fn into_completion(
    body: ChatCompletionResponse,
    requested_model: &str,
) -> Result<Completion, LlmError> {
    let content = body
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .filter(|c| !c.trim().is_empty())
        .ok_or(LlmError::EmptyContent)?;

    let usage = body
        .usage
        .map(|u| Usage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
            total_duration_ns: None,
        })
        .unwrap_or_default();

    Ok(Completion {
        content,
        model: body.model.unwrap_or_else(|| requested_model.to_string()),
        usage,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_carries_sampling_settings() {
        let messages = vec![ConversationTurn::user("hello")];
        let body = ChatCompletionRequest {
            model: DEFAULT_MODEL,
            messages: &messages,
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["model"], DEFAULT_MODEL);
        assert_eq!(json["max_tokens"], 2048);
        assert!((json["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
        assert_eq!(json["messages"][0]["role"], "user");
    }

    #[test]
    fn test_response_maps_to_completion() {
        let body: ChatCompletionResponse = serde_json::from_str(
            r#"{
                "id": "chatcmpl-1",
                "model": "llama-3.1-70b-versatile",
                "choices": [{"index": 0, "message": {"role": "assistant", "content": "Answer"}}],
                "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
            }"#,
        )
        .unwrap();

        let completion = into_completion(body, DEFAULT_MODEL).unwrap();
        assert_eq!(completion.content, "Answer");
        assert_eq!(completion.usage.total_tokens, Some(15));
    }

    #[test]
    fn test_missing_model_falls_back_to_requested() {
        let body: ChatCompletionResponse = serde_json::from_str(
            r#"{"choices": [{"message": {"content": "ok"}}]}"#,
        )
        .unwrap();
        let completion = into_completion(body, "custom-model").unwrap();
        assert_eq!(completion.model, "custom-model");
        assert_eq!(completion.usage, Usage::default());
    }

    #[test]
    fn test_no_choices_is_empty_content() {
        let body: ChatCompletionResponse =
            serde_json::from_str(r#"{"model": "m", "choices": []}"#).unwrap();
        assert!(matches!(
            into_completion(body, DEFAULT_MODEL),
            Err(LlmError::EmptyContent)
        ));
    }

    #[test]
    fn test_error_body_parses() {
        let err: GroqError =
            serde_json::from_str(r#"{"error": {"message": "Invalid API Key", "type": "x"}}"#)
                .unwrap();
        assert_eq!(err.error.message, "Invalid API Key");
    }

    // ── HTTP round trips against a local mock server ─────────────────────

    fn backend_for(server: &mockito::ServerGuard) -> GroqBackend {
        GroqBackend::with_endpoint(
            Client::new(),
            "gsk_test".to_string(),
            format!("{}/openai/v1/chat/completions", server.url()),
        )
    }

    #[tokio::test]
    async fn test_complete_sends_bearer_and_parses_reply() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/openai/v1/chat/completions")
            .match_header("authorization", "Bearer gsk_test")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"model": "llama-3.1-70b-versatile",
                    "choices": [{"message": {"role": "assistant", "content": "Hello!"}}],
                    "usage": {"prompt_tokens": 3, "completion_tokens": 2, "total_tokens": 5}}"#,
            )
            .create_async()
            .await;

        let completion = backend_for(&server)
            .complete(&[ConversationTurn::user("hi")])
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(completion.content, "Hello!");
        assert_eq!(completion.usage.total_tokens, Some(5));
    }

    #[tokio::test]
    async fn test_error_status_surfaces_api_message() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/openai/v1/chat/completions")
            .with_status(401)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error": {"message": "Invalid API Key", "type": "invalid_request_error"}}"#)
            .create_async()
            .await;

        let result = backend_for(&server)
            .complete(&[ConversationTurn::user("hi")])
            .await;

        match result {
            Err(LlmError::Api { status, message }) => {
                assert_eq!(status, 401);
                assert_eq!(message, "Invalid API Key");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_error_status_without_json_body_names_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/openai/v1/chat/completions")
            .with_status(503)
            .with_body("upstream unavailable")
            .create_async()
            .await;

        let result = backend_for(&server)
            .complete(&[ConversationTurn::user("hi")])
            .await;

        assert!(matches!(
            result,
            Err(LlmError::Api { status: 503, ref message }) if message == "Groq API error: 503"
        ));
    }
}
