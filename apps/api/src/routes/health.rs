use axum::Json;
use chrono::Utc;
use serde_json::{json, Value};

/// GET /api/health (also served at /health)
/// Liveness check with service version and server time.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "OK",
        "message": "StudyBuddy API is running",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": Utc::now(),
    }))
}
