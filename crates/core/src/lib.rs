#![forbid(unsafe_code)]

pub mod error;
pub mod model;
pub mod progression;
pub mod prompt;
pub mod time;

pub use error::Error;
pub use progression::{ActiveSession, SessionState, StoryLength};
pub use prompt::build_prompt;
pub use time::Clock;
