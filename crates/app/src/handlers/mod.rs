use axum::Json;
use serde_json::{Value, json};

pub mod media;
pub mod sessions;

pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Soft message for a feature that is not available on this page.
pub(crate) fn notice(message: impl Into<String>) -> Json<Value> {
    Json(json!({ "notice": message.into() }))
}
