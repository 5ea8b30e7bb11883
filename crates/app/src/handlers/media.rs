use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use services::{Illustration, Narration};
use uuid::Uuid;

use super::notice;
use super::sessions::load;
use crate::AppState;
use crate::error::ShellError;

const NO_SENTENCE: &str = "There is no sentence on this page.";

pub async fn page_audio(
    State(app): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Response, ShellError> {
    let state = load(&app, id).await?;
    let view = app.services.story().page_view(&state).await;

    let response = match app.services.media().narrate(&view).await {
        Narration::Ready(clip) => {
            ([(header::CONTENT_TYPE, clip.content_type)], clip.bytes).into_response()
        }
        Narration::Unavailable(reason) => {
            notice(format!("Audio is not available right now: {reason}")).into_response()
        }
        Narration::NotApplicable => notice(NO_SENTENCE).into_response(),
    };
    Ok(response)
}

pub async fn page_illustration(
    State(app): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Response, ShellError> {
    let state = load(&app, id).await?;
    let view = app.services.story().page_view(&state).await;

    let response = match app.services.media().illustrate(&view).await {
        Illustration::Ready(image) => {
            ([(header::CONTENT_TYPE, image.content_type)], image.bytes).into_response()
        }
        Illustration::Unavailable(reason) => {
            notice(format!("Illustration is not available right now: {reason}")).into_response()
        }
        Illustration::NotApplicable => notice(NO_SENTENCE).into_response(),
    };
    Ok(response)
}
