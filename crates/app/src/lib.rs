#![forbid(unsafe_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::routing::{get, post};
use services::AppServices;
use tower_http::trace::TraceLayer;

pub mod config;
pub mod error;
pub mod handlers;
pub mod sessions;

pub use config::{Cli, Command, Settings};
pub use error::ShellError;
pub use sessions::SessionRegistry;

/// Shared state behind every handler.
pub struct AppState {
    pub services: AppServices,
    pub sessions: SessionRegistry,
}

impl AppState {
    #[must_use]
    pub fn new(services: AppServices, session_idle_timeout: Duration) -> Self {
        Self {
            services,
            sessions: SessionRegistry::new(session_idle_timeout),
        }
    }
}

pub fn create_router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/sessions", post(handlers::sessions::create_session))
        .route(
            "/sessions/{id}",
            get(handlers::sessions::get_session).delete(handlers::sessions::end_session),
        )
        .route("/sessions/{id}/next", post(handlers::sessions::next_page))
        .route("/sessions/{id}/prev", post(handlers::sessions::prev_page))
        .route("/sessions/{id}/answer", post(handlers::sessions::submit_answer))
        .route("/sessions/{id}/parent", get(handlers::sessions::parent_report))
        .route("/sessions/{id}/audio", get(handlers::media::page_audio))
        .route(
            "/sessions/{id}/illustration",
            get(handlers::media::page_illustration),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
