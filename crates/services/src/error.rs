//! Shared error types for the services crate.

use thiserror::Error;

use story_core::model::{ChildError, Page};
use storage::catalog::SeedError;
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by `StoryService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StoryError {
    #[error("no profile has been submitted for this session")]
    NoProfile,
    #[error("page {page} has no quiz")]
    NoQuiz { page: Page },
    #[error("`{0}` is not one of the quiz options")]
    UnknownOption(String),
    #[error(transparent)]
    Child(#[from] ChildError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by speech synthesizers.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SpeechError {
    #[error("nothing to read aloud")]
    EmptyText,
    #[error("speech service returned no audio")]
    EmptyAudio,
    #[error("speech request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error("invalid speech endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Seed(#[from] SeedError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}
