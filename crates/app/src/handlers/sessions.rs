use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};
use services::{PageView, ParentReport, QuizOutcome};
use story_core::SessionState;
use story_core::model::{AnswerChoice, Level};
use uuid::Uuid;

use crate::AppState;
use crate::error::ShellError;

#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    pub name: String,
    pub level: String,
    #[serde(default)]
    pub parent_email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub answer: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_id: Uuid,
    pub state: SessionState,
    pub view: PageView,
    pub notice: Option<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct AnswerResponse {
    pub outcome: QuizOutcome,
    pub message: &'static str,
    pub view: PageView,
}

pub(crate) async fn load(app: &AppState, id: Uuid) -> Result<SessionState, ShellError> {
    app.sessions
        .get(id)
        .await
        .ok_or(ShellError::UnknownSession(id))
}

async fn store(app: &AppState, id: Uuid, state: SessionState) -> Result<(), ShellError> {
    if app.sessions.replace(id, state).await {
        Ok(())
    } else {
        Err(ShellError::UnknownSession(id))
    }
}

async fn respond(app: &AppState, id: Uuid, state: SessionState) -> SessionResponse {
    let view = app.services.story().page_view(&state).await;
    SessionResponse {
        session_id: id,
        notice: view.notice(),
        state,
        view,
    }
}

pub async fn create_session(
    State(app): State<Arc<AppState>>,
    Json(req): Json<CreateSessionRequest>,
) -> Result<impl IntoResponse, ShellError> {
    let level: Level = req.level.parse()?;
    let state = app
        .services
        .story()
        .submit_profile(SessionState::NoProfile, &req.name, level, req.parent_email)
        .await?;

    let id = app.sessions.insert(state.clone()).await;
    tracing::info!(session_id = %id, %level, "session started");
    Ok((StatusCode::CREATED, Json(respond(&app, id, state).await)))
}

pub async fn get_session(
    State(app): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, ShellError> {
    let state = load(&app, id).await?;
    Ok(Json(respond(&app, id, state).await))
}

pub async fn next_page(
    State(app): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, ShellError> {
    let state = load(&app, id).await?;
    let state = app.services.story().next(state).await;
    store(&app, id, state.clone()).await?;
    Ok(Json(respond(&app, id, state).await))
}

pub async fn prev_page(
    State(app): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, ShellError> {
    let state = load(&app, id).await?;
    let state = app.services.story().prev(state);
    store(&app, id, state.clone()).await?;
    Ok(Json(respond(&app, id, state).await))
}

pub async fn submit_answer(
    State(app): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<AnswerRequest>,
) -> Result<Json<AnswerResponse>, ShellError> {
    let state = load(&app, id).await?;
    let story = app.services.story();
    let outcome = story
        .submit_answer(&state, &AnswerChoice::parse(&req.answer))
        .await?;
    let view = story.page_view(&state).await;
    Ok(Json(AnswerResponse {
        message: outcome.message(),
        outcome,
        view,
    }))
}

pub async fn parent_report(
    State(app): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ParentReport>, ShellError> {
    let state = load(&app, id).await?;
    let report = app.services.story().parent_report(&state).await?;
    Ok(Json(report))
}

pub async fn end_session(
    State(app): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ShellError> {
    app.sessions
        .remove(id)
        .await
        .ok_or(ShellError::UnknownSession(id))?;
    tracing::info!(session_id = %id, "session ended");
    Ok(StatusCode::NO_CONTENT)
}
