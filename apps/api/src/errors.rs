use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("Document parse error: {0}")]
    DocumentParse(String),

    #[error("Unprocessable entity: {0}")]
    UnprocessableEntity(String),

    #[error("Not configured: {0}")]
    NotConfigured(String),

    #[error("LLM error: {message}")]
    Llm {
        message: String,
        detail: Option<String>,
    },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, detail) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg, None),
            AppError::UnsupportedMediaType(msg) => {
                (StatusCode::BAD_REQUEST, "UNSUPPORTED_MEDIA_TYPE", msg, None)
            }
            AppError::DocumentParse(msg) => {
                tracing::warn!("Document parse error: {msg}");
                (
                    StatusCode::BAD_REQUEST,
                    "DOCUMENT_PARSE_ERROR",
                    "Failed to parse PDF file".to_string(),
                    Some(msg),
                )
            }
            AppError::UnprocessableEntity(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "UNPROCESSABLE_ENTITY",
                msg,
                None,
            ),
            AppError::NotConfigured(msg) => {
                tracing::error!("Service not configured: {msg}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "NOT_CONFIGURED",
                    msg,
                    None,
                )
            }
            AppError::Llm { message, detail } => {
                tracing::error!("LLM error: {message} ({detail:?})");
                (StatusCode::BAD_GATEWAY, "LLM_ERROR", message, detail)
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg, None),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                    None,
                )
            }
        };

        let mut body = json!({
            "success": false,
            "message": message,
            "error": code,
        });
        if let Some(detail) = detail {
            body["detail"] = json!(detail);
        }

        (status, Json(body)).into_response()
    }
}
