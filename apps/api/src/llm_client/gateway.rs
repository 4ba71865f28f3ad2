//! LLM Gateway: dispatches a conversation to an ordered list of backends.
//!
//! Backends are tried once each, in order, sequentially. The first success
//! wins. A failure with another backend behind it is logged and falls
//! through; failure of the last backend ends the chain with
//! `success: false`. An empty list is reported as "not configured", never
//! as a connectivity failure. `generate` never returns `Err` and never panics.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error, info, warn};

use crate::llm_client::{BackendDescriptor, Completion, GenerationBackend, LlmError, Usage};
use crate::models::chat::ConversationTurn;

pub const NOT_CONFIGURED_MESSAGE: &str = "No AI service configured (Ollama or Groq).";
pub const NOT_CONFIGURED_ERROR: &str = "Configuration missing";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    NotConfigured,
    BackendFailed,
}

/// Outcome of one gateway dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationResult {
    pub success: bool,
    pub message: String,
    pub model: Option<String>,
    pub usage: Option<Usage>,
    pub error: Option<String>,
    pub failure: Option<FailureKind>,
}

impl GenerationResult {
    fn not_configured() -> Self {
        Self {
            success: false,
            message: NOT_CONFIGURED_MESSAGE.to_string(),
            model: None,
            usage: None,
            error: Some(NOT_CONFIGURED_ERROR.to_string()),
            failure: Some(FailureKind::NotConfigured),
        }
    }

    fn completed(completion: Completion) -> Self {
        Self {
            success: true,
            message: completion.content,
            model: Some(completion.model),
            usage: Some(completion.usage),
            error: None,
            failure: None,
        }
    }

    fn exhausted(attempted: usize, detail: String) -> Self {
        let message = if attempted > 1 {
            format!("All {attempted} configured AI backends failed. Please check server logs.")
        } else {
            "The configured AI backend failed. Please check server logs.".to_string()
        };
        Self {
            success: false,
            message,
            model: None,
            usage: None,
            error: Some(detail),
            failure: Some(FailureKind::BackendFailed),
        }
    }
}

#[derive(Clone, Default)]
pub struct LlmGateway {
    backends: Vec<Arc<dyn GenerationBackend>>,
}

impl LlmGateway {
    pub fn new(backends: Vec<Arc<dyn GenerationBackend>>) -> Self {
        Self { backends }
    }

    pub fn is_configured(&self) -> bool {
        !self.backends.is_empty()
    }

    /// Configured backends, in preference order.
    pub fn descriptors(&self) -> Vec<BackendDescriptor> {
        self.backends.iter().map(|b| b.descriptor()).collect()
    }

    /// Sends `[system] ++ history ++ [user]` down the backend chain.
    pub async fn generate(
        &self,
        system_prompt: &str,
        history: &[ConversationTurn],
        user_message: &str,
    ) -> GenerationResult {
        let Some((last, fallbacks)) = self.backends.split_last() else {
            warn!("Generation requested but no AI backend is configured");
            return GenerationResult::not_configured();
        };

        let messages = assemble_messages(system_prompt, history, user_message);

        for backend in fallbacks {
            match attempt(backend.as_ref(), &messages).await {
                Ok(completion) => return GenerationResult::completed(completion),
                Err(e) => warn!(
                    "{} backend failed, falling back to next backend: {e}",
                    backend.descriptor().provider
                ),
            }
        }

        match attempt(last.as_ref(), &messages).await {
            Ok(completion) => GenerationResult::completed(completion),
            Err(e) => {
                error!(
                    "{} backend failed and no fallback remains: {e}",
                    last.descriptor().provider
                );
                GenerationResult::exhausted(self.backends.len(), e.to_string())
            }
        }
    }
}

/// One timed call to one backend.
async fn attempt(
    backend: &dyn GenerationBackend,
    messages: &[ConversationTurn],
) -> Result<Completion, LlmError> {
    let started = Instant::now();
    let completion = backend.complete(messages).await?;
    info!(
        "Generated reply via {} ({}) in {}ms",
        backend.descriptor().provider,
        completion.model,
        started.elapsed().as_millis()
    );
    debug!("Usage: {:?}", completion.usage);
    Ok(completion)
}

/// Prepends the system prompt and appends the user message to the history.
pub fn assemble_messages(
    system_prompt: &str,
    history: &[ConversationTurn],
    user_message: &str,
) -> Vec<ConversationTurn> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(ConversationTurn::system(system_prompt));
    messages.extend_from_slice(history);
    messages.push(ConversationTurn::user(user_message));
    messages
}
