use axum::{
    extract::{FromRequest, Multipart, Request, State},
    Json,
};
use serde::Serialize;
use tracing::debug;

use crate::ats::report::AtsReport;
use crate::chatbot::service::{respond, ChatReply, ChatRequest};
use crate::documents::{extract_upload_text, is_multipart, multipart_error};
use crate::errors::AppError;
use crate::llm_client::{BackendDescriptor, FailureKind, Usage};
use crate::models::api::ApiResponse;
use crate::models::chat::Mode;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ChatData {
    pub response: String,
    pub model: String,
    pub usage: Usage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<AtsReport>,
}

#[derive(Debug, Serialize)]
pub struct ModelsData {
    pub models: Vec<BackendDescriptor>,
    pub recommended: Option<&'static str>,
}

/// POST /api/chatbot/chat
/// Accepts a multipart form (with an optional PDF `file`) or a JSON body.
pub async fn handle_chat(
    State(state): State<AppState>,
    request: Request,
) -> Result<Json<ApiResponse<ChatData>>, AppError> {
    let chat_request = if is_multipart(request.headers()) {
        let multipart = Multipart::from_request(request, &state)
            .await
            .map_err(|e| AppError::Validation(e.body_text()))?;
        read_chat_form(multipart).await?
    } else {
        let Json(body) = Json::<ChatRequest>::from_request(request, &state)
            .await
            .map_err(|e| AppError::Validation(e.body_text()))?;
        body
    };

    let ChatReply { result, report } =
        respond(&state.gateway, state.ats_scorer.as_ref(), chat_request).await?;

    if !result.success {
        return Err(match result.failure {
            Some(FailureKind::NotConfigured) => AppError::NotConfigured(result.message),
            _ => AppError::Llm {
                message: result.message,
                detail: result.error,
            },
        });
    }

    Ok(Json(ApiResponse::ok(ChatData {
        response: result.message,
        model: result.model.unwrap_or_else(|| "unknown".to_string()),
        usage: result.usage.unwrap_or_default(),
        report,
    })))
}

/// GET /api/chatbot/models
pub async fn handle_models(State(state): State<AppState>) -> Json<ApiResponse<ModelsData>> {
    let models = state.gateway.descriptors();
    let recommended = models.first().map(|d| d.provider);
    Json(ApiResponse::ok(ModelsData {
        models,
        recommended,
    }))
}

/// Reads `message`, `mode`, `conversationHistory` (a JSON string) and an
/// optional PDF `file`. Unknown fields are ignored.
async fn read_chat_form(mut multipart: Multipart) -> Result<ChatRequest, AppError> {
    let mut request = ChatRequest::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "message" => request.message = field.text().await.map_err(multipart_error)?,
            "mode" => {
                request.mode = Mode::from_tag(field.text().await.map_err(multipart_error)?.trim())
            }
            "conversationHistory" => {
                let raw = field.text().await.map_err(multipart_error)?;
                if !raw.trim().is_empty() {
                    request.conversation_history = serde_json::from_str(&raw).map_err(|e| {
                        AppError::Validation(format!(
                            "conversationHistory must be a JSON array of messages: {e}"
                        ))
                    })?;
                }
            }
            "file" => {
                let content_type = field.content_type().map(str::to_string);
                let data = field.bytes().await.map_err(multipart_error)?;
                request.document_text =
                    Some(extract_upload_text(content_type.as_deref(), data).await?);
            }
            other => debug!("Ignoring multipart field '{other}'"),
        }
    }

    Ok(request)
}
