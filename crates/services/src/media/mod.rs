//! Speech and illustration for story pages.
//!
//! Both collaborators are optional extras: their failures become notices for
//! the shell and never affect the session.

mod illustration;
mod speech;

use std::sync::Arc;

pub use illustration::{
    DEFAULT_IMAGE_BASE_URL, DEFAULT_IMAGE_MODEL, DEFAULT_IMAGE_SIZE, GeneratedImage, ImageConfig,
    ImageGenerator, ImageResult, OpenAiImages, UnavailableReason,
};
pub use speech::{
    AudioClip, DEFAULT_TIMEOUT, DEFAULT_TTS_URL, GoogleTranslateTts, SpeechConfig,
    SpeechSynthesizer,
};

use crate::story::PageView;

/// Language the story sentences are read in.
pub const STORY_LANGUAGE: &str = "en";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Narration {
    Ready(AudioClip),
    Unavailable(String),
    /// The page has no sentence to read.
    NotApplicable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Illustration {
    Ready(GeneratedImage),
    Unavailable(UnavailableReason),
    NotApplicable,
}

#[derive(Clone)]
pub struct MediaService {
    speech: Arc<dyn SpeechSynthesizer>,
    images: Arc<dyn ImageGenerator>,
}

impl MediaService {
    #[must_use]
    pub fn new(speech: Arc<dyn SpeechSynthesizer>, images: Arc<dyn ImageGenerator>) -> Self {
        Self { speech, images }
    }

    /// Read the page sentence aloud. Only story pages are narrated.
    pub async fn narrate(&self, view: &PageView) -> Narration {
        let Some(text) = view.speech_text() else {
            return Narration::NotApplicable;
        };
        match self.speech.synthesize(text, STORY_LANGUAGE).await {
            Ok(clip) => Narration::Ready(clip),
            Err(err) => {
                tracing::warn!(error = %err, "speech unavailable");
                Narration::Unavailable(err.to_string())
            }
        }
    }

    /// Draw the page from its prompt. Only story pages are illustrated.
    pub async fn illustrate(&self, view: &PageView) -> Illustration {
        let Some(prompt) = view.image_prompt() else {
            return Illustration::NotApplicable;
        };
        match self.images.generate(prompt).await {
            ImageResult::Ready(image) => Illustration::Ready(image),
            ImageResult::Unavailable(reason) => {
                if reason != UnavailableReason::MissingCredential {
                    tracing::warn!(%reason, "illustration unavailable");
                }
                Illustration::Unavailable(reason)
            }
        }
    }
}
