use axum::{
    extract::{FromRequest, Multipart, Request, State},
    Json,
};
use serde::Deserialize;
use tracing::{debug, info};

use crate::ats::report::AtsReport;
use crate::documents::{extract_upload_text, is_multipart, multipart_error};
use crate::errors::AppError;
use crate::models::api::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub text: String,
}

/// POST /api/ats/analyze
/// Scores a resume given as a multipart PDF `file` or a JSON `{ "text": ... }` body.
pub async fn handle_analyze(
    State(state): State<AppState>,
    request: Request,
) -> Result<Json<ApiResponse<AtsReport>>, AppError> {
    let text = if is_multipart(request.headers()) {
        let multipart = Multipart::from_request(request, &state)
            .await
            .map_err(|e| AppError::Validation(e.body_text()))?;
        read_resume_upload(multipart).await?
    } else {
        let Json(body) = Json::<AnalyzeRequest>::from_request(request, &state)
            .await
            .map_err(|e| AppError::Validation(e.body_text()))?;
        body.text
    };

    let report = state.ats_scorer.score(&text).await.ok_or_else(|| {
        AppError::UnprocessableEntity("Resume contains no text: no analysis available".to_string())
    })?;

    info!(
        "ATS analysis via {}: overall={}, issues={}",
        state.ats_scorer.backend(),
        report.overall_score,
        report.issues_count
    );
    Ok(Json(ApiResponse::ok(report)))
}

async fn read_resume_upload(mut multipart: Multipart) -> Result<String, AppError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some("file") {
            debug!("Ignoring multipart field {:?}", field.name());
            continue;
        }
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await.map_err(multipart_error)?;
        return extract_upload_text(content_type.as_deref(), data).await;
    }

    Err(AppError::Validation("A resume file is required".to_string()))
}
