//! Chat service: the caller-facing entry point of the chatbot.
//!
//! Flow: validate → (resume review) ATS baseline → assemble system prompt →
//!       gateway dispatch → (resume review) detect a structured report reply.
//!
//! Only input validation produces `Err`. Backend trouble comes back inside
//! the `GenerationResult`, for the caller to present.

use serde::Deserialize;
use tracing::{debug, info, info_span, Instrument};
use uuid::Uuid;

use crate::ats::report::AtsReport;
use crate::ats::scorer::AtsScorer;
use crate::chatbot::assembler::build_system_prompt_with_baseline;
use crate::errors::AppError;
use crate::llm_client::{strip_json_fences, GenerationResult, LlmGateway};
use crate::models::chat::{ConversationTurn, Mode};

/// Used when a document was uploaded without a message.
pub const DEFAULT_DOCUMENT_PROMPT: &str = "Please analyze this document.";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub conversation_history: Vec<ConversationTurn>,
    #[serde(default)]
    pub mode: Mode,
    /// Text extracted from an uploaded document; `Some` whenever a file
    /// was uploaded.
    #[serde(default)]
    pub document_text: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ChatReply {
    pub result: GenerationResult,
    /// Structured review, when the model answered a resume review with a
    /// report-shaped JSON object.
    pub report: Option<AtsReport>,
}

pub async fn respond(
    gateway: &LlmGateway,
    ats_scorer: &dyn AtsScorer,
    request: ChatRequest,
) -> Result<ChatReply, AppError> {
    let span = info_span!("chat", request_id = %Uuid::new_v4(), mode = %request.mode);
    respond_inner(gateway, ats_scorer, request)
        .instrument(span)
        .await
}

async fn respond_inner(
    gateway: &LlmGateway,
    ats_scorer: &dyn AtsScorer,
    request: ChatRequest,
) -> Result<ChatReply, AppError> {
    // An upload satisfies the message requirement even if it held no text.
    let uploaded = request.document_text.is_some();
    let context = request.document_text.as_deref().unwrap_or_default();

    let message = match (request.message.trim().is_empty(), uploaded) {
        (false, _) => request.message.as_str(),
        (true, true) => DEFAULT_DOCUMENT_PROMPT,
        (true, false) => {
            return Err(AppError::Validation(
                "Message is required unless uploading a file".to_string(),
            ))
        }
    };

    let baseline = if request.mode == Mode::ResumeReview {
        let report = ats_scorer.score(context).await;
        debug!(
            "ATS baseline via {}: {:?}",
            ats_scorer.backend(),
            report.as_ref().map(|r| r.overall_score)
        );
        report
    } else {
        None
    };

    // Retrieval ranks against what the user asked; the default prompt is not a query.
    let system_prompt = build_system_prompt_with_baseline(
        request.mode,
        context,
        &request.message,
        baseline.as_ref(),
    );
    info!(
        "Dispatching chat: history={}, document_chars={}, prompt_chars={}",
        request.conversation_history.len(),
        context.chars().count(),
        system_prompt.chars().count()
    );

    let result = gateway
        .generate(&system_prompt, &request.conversation_history, message)
        .await;

    let report = match request.mode {
        Mode::ResumeReview if result.success => parse_structured_report(&result.message),
        _ => None,
    };

    Ok(ChatReply { result, report })
}

/// Parses a reply as an ATS report. Free-text replies yield `None`.
pub fn parse_structured_report(reply: &str) -> Option<AtsReport> {
    serde_json::from_str(strip_json_fences(reply)).ok()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::ats::heuristics::analyze;
    use crate::ats::scorer::HeuristicAtsScorer;
    use crate::chatbot::retriever::CHUNK_SEPARATOR;
    use crate::llm_client::gateway::tests::FakeBackend;
    use crate::llm_client::{FailureKind, GenerationBackend};
    use crate::models::chat::Role;

    const RESUME: &str = "Summary\nEngineer. jane@example.com +1 555 123 4567\nSkills: Rust";

    fn gateway_with(backend: Arc<FakeBackend>) -> LlmGateway {
        LlmGateway::new(vec![backend as Arc<dyn GenerationBackend>])
    }

    #[tokio::test]
    async fn test_empty_message_without_document_is_rejected() {
        let backend = FakeBackend::ok("ollama", "unused");
        let gw = gateway_with(backend.clone());

        let err = respond(&gw, &HeuristicAtsScorer, ChatRequest::default())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_document_without_message_uses_default_prompt() {
        let backend = FakeBackend::ok("ollama", "summary");
        let gw = gateway_with(backend.clone());

        let reply = respond(
            &gw,
            &HeuristicAtsScorer,
            ChatRequest {
                mode: Mode::PdfQa,
                document_text: Some("Cells divide by mitosis.".to_string()),
                ..ChatRequest::default()
            },
        )
        .await
        .unwrap();

        assert!(reply.result.success);
        let sent = backend.last_messages.lock().unwrap().clone();
        assert_eq!(sent.last().unwrap().content, DEFAULT_DOCUMENT_PROMPT);
        assert!(sent[0].content.contains("Cells divide by mitosis."));
    }

    #[tokio::test]
    async fn test_upload_without_message_embeds_long_document_verbatim() {
        let backend = FakeBackend::ok("ollama", "review");
        let gw = gateway_with(backend.clone());
        let document = (0..8)
            .map(|i| format!("section{i} {}", "worked on coursework projects ".repeat(33)))
            .collect::<Vec<_>>()
            .join("\n\n");
        assert!(document.chars().count() > 6000);

        respond(
            &gw,
            &HeuristicAtsScorer,
            ChatRequest {
                mode: Mode::ResumeReview,
                document_text: Some(document.clone()),
                ..ChatRequest::default()
            },
        )
        .await
        .unwrap();

        let sent = backend.last_messages.lock().unwrap().clone();
        assert!(sent[0].content.contains(&document));
        assert!(!sent[0].content.contains(CHUNK_SEPARATOR));
        assert_eq!(sent.last().unwrap().content, DEFAULT_DOCUMENT_PROMPT);
    }

    #[tokio::test]
    async fn test_history_is_forwarded_between_system_and_user() {
        let backend = FakeBackend::ok("ollama", "ok");
        let gw = gateway_with(backend.clone());

        respond(
            &gw,
            &HeuristicAtsScorer,
            ChatRequest {
                message: "and then?".to_string(),
                conversation_history: vec![
                    ConversationTurn::user("tell me a story"),
                    ConversationTurn::assistant("once upon a time"),
                ],
                mode: Mode::StudentHelper,
                document_text: None,
            },
        )
        .await
        .unwrap();

        let sent = backend.last_messages.lock().unwrap().clone();
        assert_eq!(sent.len(), 4);
        assert_eq!(sent[0].role, Role::System);
        assert_eq!(sent[2].content, "once upon a time");
    }

    #[tokio::test]
    async fn test_resume_review_embeds_baseline_and_parses_report_reply() {
        let report = analyze(RESUME).unwrap();
        let reply_json = format!("```json\n{}\n```", serde_json::to_string(&report).unwrap());
        let backend = FakeBackend::ok("ollama", &reply_json);
        let gw = gateway_with(backend.clone());

        let reply = respond(
            &gw,
            &HeuristicAtsScorer,
            ChatRequest {
                message: "Review my resume".to_string(),
                mode: Mode::ResumeReview,
                document_text: Some(RESUME.to_string()),
                ..ChatRequest::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(reply.report, Some(report));
        let sent = backend.last_messages.lock().unwrap().clone();
        assert!(sent[0].content.contains("\"overallScore\""));
    }

    #[tokio::test]
    async fn test_resume_review_free_text_reply_has_no_report() {
        let backend = FakeBackend::ok("ollama", "Your summary could be shorter.");
        let gw = gateway_with(backend);

        let reply = respond(
            &gw,
            &HeuristicAtsScorer,
            ChatRequest {
                message: "Is my summary too long?".to_string(),
                mode: Mode::ResumeReview,
                document_text: Some(RESUME.to_string()),
                ..ChatRequest::default()
            },
        )
        .await
        .unwrap();

        assert!(reply.result.success);
        assert!(reply.report.is_none());
    }

    #[tokio::test]
    async fn test_gateway_failure_is_returned_not_raised() {
        let reply = respond(
            &LlmGateway::default(),
            &HeuristicAtsScorer,
            ChatRequest {
                message: "hello".to_string(),
                ..ChatRequest::default()
            },
        )
        .await
        .unwrap();

        assert!(!reply.result.success);
        assert_eq!(reply.result.failure, Some(FailureKind::NotConfigured));
    }

    #[test]
    fn test_request_deserializes_camel_case_with_defaults() {
        let request: ChatRequest = serde_json::from_str(
            r#"{"message": "hi", "conversationHistory": [{"role": "user", "content": "x"}], "mode": "bogus"}"#,
        )
        .unwrap();
        assert_eq!(request.mode, Mode::StudentHelper);
        assert_eq!(request.conversation_history.len(), 1);
        assert!(request.document_text.is_none());
    }
}
