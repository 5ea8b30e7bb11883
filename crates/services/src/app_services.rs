use std::sync::Arc;

use storage::catalog::seed_catalog;
use storage::repository::{ContentRepository, Storage};

use crate::Clock;
use crate::error::AppServicesError;
use crate::media::{
    GoogleTranslateTts, ImageConfig, ImageGenerator, MediaService, OpenAiImages, SpeechConfig,
    SpeechSynthesizer,
};
use crate::story::StoryService;

/// Assembles app-facing services over one storage backend.
#[derive(Clone)]
pub struct AppServices {
    story: Arc<StoryService>,
    media: Arc<MediaService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage and the HTTP media clients.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization, catalog seeding,
    /// or HTTP client setup fails.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        speech: SpeechConfig,
        images: ImageConfig,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        let speech: Arc<dyn SpeechSynthesizer> = Arc::new(GoogleTranslateTts::new(speech)?);
        let images: Arc<dyn ImageGenerator> = Arc::new(OpenAiImages::new(images)?);
        Self::from_storage(storage, clock, speech, images).await
    }

    /// Build services over an existing storage and media collaborators.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the catalog cannot be seeded.
    pub async fn from_storage(
        storage: Storage,
        clock: Clock,
        speech: Arc<dyn SpeechSynthesizer>,
        images: Arc<dyn ImageGenerator>,
    ) -> Result<Self, AppServicesError> {
        ensure_catalog(storage.content.as_ref()).await?;

        let story = Arc::new(StoryService::new(
            clock,
            Arc::clone(&storage.content),
            Arc::clone(&storage.learners),
        ));
        let media = Arc::new(MediaService::new(speech, images));
        Ok(Self { story, media })
    }

    #[must_use]
    pub fn story(&self) -> Arc<StoryService> {
        Arc::clone(&self.story)
    }

    #[must_use]
    pub fn media(&self) -> Arc<MediaService> {
        Arc::clone(&self.media)
    }
}

async fn ensure_catalog(content: &dyn ContentRepository) -> Result<(), AppServicesError> {
    if content.count_sentences().await? > 0 {
        return Ok(());
    }
    let report = seed_catalog(content).await?;
    tracing::info!(
        sentences = report.sentences,
        questions = report.questions,
        "seeded empty story catalog"
    );
    Ok(())
}
