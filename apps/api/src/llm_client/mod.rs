/// LLM Client: the single point of entry for all text-generation calls.
///
/// ARCHITECTURAL RULE: No other module may call a generation API directly.
/// Chat goes through `LlmGateway`, which walks an ordered list of
/// `GenerationBackend`s built here from config.
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::config::{Config, Provider};
use crate::models::chat::ConversationTurn;

pub mod gateway;
pub mod groq;
pub mod ollama;

pub use gateway::{FailureKind, GenerationResult, LlmGateway};

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// Token and timing counters. Backends fill what they report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Usage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_tokens: Option<u32>,
    /// Wall time reported by the backend, in nanoseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_duration_ns: Option<u64>,
}

/// A successful completion from one backend.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub content: String,
    pub model: String,
    pub usage: Usage,
}

/// What a backend is, for logs and the models endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackendDescriptor {
    pub provider: &'static str,
    pub model: String,
}

/// A text-generation service the gateway can dispatch to.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    fn descriptor(&self) -> BackendDescriptor;

    /// One call, no retries. The gateway owns fallback.
    async fn complete(&self, messages: &[ConversationTurn]) -> Result<Completion, LlmError>;
}

/// Builds the outbound HTTP client shared by every backend.
pub fn build_http_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .context("Failed to build HTTP client")
}

/// Instantiates the configured backends in preference order. Providers
/// listed in `LLM_PROVIDERS` but lacking credentials are skipped.
pub fn build_backends(config: &Config, client: &Client) -> Vec<Arc<dyn GenerationBackend>> {
    let mut backends: Vec<Arc<dyn GenerationBackend>> = Vec::new();

    for provider in &config.llm_providers {
        match provider {
            Provider::Ollama => match &config.ollama_api_url {
                Some(url) => backends.push(Arc::new(ollama::OllamaBackend::new(
                    client.clone(),
                    url.clone(),
                    config.ollama_model.clone(),
                ))),
                None => info!("Ollama listed but OLLAMA_API_URL is not set; skipping"),
            },
            Provider::Groq => match &config.groq_api_key {
                Some(key) => backends.push(Arc::new(groq::GroqBackend::new(
                    client.clone(),
                    key.clone(),
                    config.groq_model.clone(),
                ))),
                None => info!("Groq listed but GROQ_API_KEY is not set; skipping"),
            },
        }
    }

    backends
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}
