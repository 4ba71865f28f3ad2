//! Uploaded document handling: type check and PDF text extraction.

use axum::extract::multipart::MultipartError;
use axum::http::{header, HeaderMap, StatusCode};
use bytes::Bytes;
use tracing::debug;

use crate::errors::AppError;

pub const MIME_PDF: &str = "application/pdf";

/// Upload limit enforced on routes that accept files.
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Extracts plain text from an uploaded file. Only PDFs are accepted.
pub async fn extract_upload_text(content_type: Option<&str>, data: Bytes) -> Result<String, AppError> {
    match content_type {
        Some(ct) if is_pdf(ct) => extract_pdf_text(data).await,
        _ => Err(AppError::UnsupportedMediaType(
            "Only PDF files are currently supported".to_string(),
        )),
    }
}

/// Runs the extractor off the async executor. Extractor panics on malformed
/// input surface as parse errors.
pub async fn extract_pdf_text(data: Bytes) -> Result<String, AppError> {
    let size = data.len();
    let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&data))
        .await
        .map_err(|e| AppError::DocumentParse(format!("PDF extractor aborted: {e}")))?
        .map_err(|e| AppError::DocumentParse(e.to_string()))?;

    debug!("Extracted {} chars from {} byte PDF", text.chars().count(), size);
    Ok(text)
}

/// Whether a request carries a multipart form (file upload) rather than JSON.
pub fn is_multipart(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.trim_start().to_ascii_lowercase().starts_with("multipart/form-data"))
        .unwrap_or(false)
}

/// Maps a multipart read failure, including an upload over the body limit.
pub fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::Validation(format!(
            "File too large (max {} MB)",
            MAX_UPLOAD_BYTES / (1024 * 1024)
        ))
    } else {
        AppError::Validation(e.body_text())
    }
}

fn is_pdf(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .map(|essence| essence.trim().eq_ignore_ascii_case(MIME_PDF))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_pdf_accepts_parameters_and_case() {
        assert!(is_pdf("application/pdf"));
        assert!(is_pdf("Application/PDF; charset=binary"));
        assert!(!is_pdf("text/plain"));
    }

    #[test]
    fn test_is_multipart_reads_content_type() {
        let mut headers = HeaderMap::new();
        assert!(!is_multipart(&headers));

        headers.insert(
            header::CONTENT_TYPE,
            "multipart/form-data; boundary=X".parse().unwrap(),
        );
        assert!(is_multipart(&headers));

        headers.insert(header::CONTENT_TYPE, "application/json".parse().unwrap());
        assert!(!is_multipart(&headers));
    }

    #[tokio::test]
    async fn test_non_pdf_upload_is_rejected() {
        let err = extract_upload_text(Some("text/plain"), Bytes::from_static(b"hello"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UnsupportedMediaType(_)));

        let err = extract_upload_text(None, Bytes::from_static(b"hello"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UnsupportedMediaType(_)));
    }

    #[tokio::test]
    async fn test_invalid_pdf_is_parse_error() {
        let err = extract_pdf_text(Bytes::from_static(b"not a pdf"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::DocumentParse(_)));
    }
}
