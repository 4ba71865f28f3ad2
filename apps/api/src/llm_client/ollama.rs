//! Primary backend: a local Ollama inference server (`POST /api/chat`).

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::llm_client::{BackendDescriptor, Completion, GenerationBackend, LlmError, Usage};
use crate::models::chat::ConversationTurn;

pub const DEFAULT_MODEL: &str = "mistral";

#[derive(Debug, Serialize)]
struct OllamaChatRequest<'a> {
    model: &'a str,
    messages: &'a [ConversationTurn],
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    model: String,
    message: OllamaMessage,
    total_duration: Option<u64>,
    prompt_eval_count: Option<u32>,
    eval_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct OllamaMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct OllamaError {
    error: String,
}

#[derive(Clone)]
pub struct OllamaBackend {
    client: Client,
    base_url: String,
    model: String,
}

impl OllamaBackend {
    pub fn new(client: Client, base_url: String, model: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
        }
    }

    fn chat_url(&self) -> String {
        format!("{}/api/chat", self.base_url)
    }
}

#[async_trait]
impl GenerationBackend for OllamaBackend {
    fn descriptor(&self) -> BackendDescriptor {
        BackendDescriptor {
            provider: "ollama",
            model: self.model.clone(),
        }
    }

    async fn complete(&self, messages: &[ConversationTurn]) -> Result<Completion, LlmError> {
        debug!("Using Ollama model: {}", self.model);

        let request_body = OllamaChatRequest {
            model: &self.model,
            messages,
            stream: false,
        };

        let response = self
            .client
            .post(self.chat_url())
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<OllamaError>(&body)
                .map(|e| e.error)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: OllamaChatResponse = response.json().await?;
        into_completion(body)
    }
}

fn into_completion(body: OllamaChatResponse) -> Result<Completion, LlmError> {
    if body.message.content.trim().is_empty() {
        return Err(LlmError::EmptyContent);
    }

    let total_tokens = match (body.prompt_eval_count, body.eval_count) {
        (Some(p), Some(e)) => Some(p + e),
        _ => None,
    };

    Ok(Completion {
        content: body.message.content,
        model: body.model,
        usage: Usage {
            prompt_tokens: body.prompt_eval_count,
            completion_tokens: body.eval_count,
            total_tokens,
            total_duration_ns: body.total_duration,
        },
    })
}
