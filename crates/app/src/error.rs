use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use services::StoryError;
use story_core::model::ParseLevelError;
use thiserror::Error;
use uuid::Uuid;

/// Errors surfaced by HTTP handlers.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ShellError {
    #[error("session {0} not found")]
    UnknownSession(Uuid),
    #[error(transparent)]
    Level(#[from] ParseLevelError),
    #[error(transparent)]
    Story(#[from] StoryError),
}

impl ShellError {
    fn status(&self) -> StatusCode {
        match self {
            ShellError::UnknownSession(_) => StatusCode::NOT_FOUND,
            ShellError::Level(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ShellError::Story(StoryError::Storage(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ShellError::Story(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

impl IntoResponse for ShellError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
