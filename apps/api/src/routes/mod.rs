pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderName, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::ats::handlers as ats;
use crate::chatbot::handlers as chatbot;
use crate::config::Config;
use crate::documents::MAX_UPLOAD_BYTES;
use crate::errors::AppError;
use crate::state::AppState;

/// Origins always allowed in addition to `FRONTEND_URL`.
pub const DEFAULT_ALLOWED_ORIGINS: [&str; 2] = [
    "http://localhost:5173",
    "https://studybuddy-project.vercel.app",
];

async fn not_found() -> AppError {
    AppError::NotFound("Route not found".to_string())
}

pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/health", get(health::health_handler))
        // Chatbot
        .route("/api/chatbot/chat", post(chatbot::handle_chat))
        .route("/api/chatbot/models", get(chatbot::handle_models))
        // ATS
        .route("/api/ats/analyze", post(ats::handle_analyze))
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(cors)
        .with_state(state)
}

/// CORS for the web frontend. Origins are compared without trailing slashes.
pub fn cors_layer(config: &Config) -> CorsLayer {
    let allowed = allowed_origins(config);

    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(move |origin: &HeaderValue, _| {
            origin
                .to_str()
                .map(|o| allowed.iter().any(|a| a == normalize_origin(o)))
                .unwrap_or(false)
        }))
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
            Method::PATCH,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-requested-with"),
        ])
        .expose_headers([header::AUTHORIZATION])
}

fn allowed_origins(config: &Config) -> Vec<String> {
    DEFAULT_ALLOWED_ORIGINS
        .iter()
        .copied()
        .chain(config.frontend_url.as_deref())
        .map(|o| normalize_origin(o).to_string())
        .collect()
}

fn normalize_origin(origin: &str) -> &str {
    origin.trim().trim_end_matches('/')
}
