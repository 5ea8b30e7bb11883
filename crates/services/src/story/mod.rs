mod report;
mod service;
mod view;

pub use crate::error::StoryError;
pub use report::ParentReport;
pub use service::{QuizOutcome, StoryService};
pub use view::{PageHeader, PageView, QuizOptionView, QuizView, StoryPage};
