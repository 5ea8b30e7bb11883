#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod media;
pub mod story;

pub use story_core::Clock;

pub use app_services::AppServices;
pub use error::{AppServicesError, SpeechError, StoryError};
pub use media::{Illustration, MediaService, Narration};
pub use story::{PageView, ParentReport, QuizOutcome, StoryService};
