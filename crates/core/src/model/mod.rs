mod child;
mod ids;
mod level;
mod page;
mod progress;
mod question;
mod sentence;

pub use child::{Child, ChildError, ChildName, NewChild};
pub use ids::{ChildId, ParseIdError, ProgressId, SentenceId};
pub use level::{Level, ParseLevelError};
pub use page::{Page, PageError};
pub use progress::{
    LevelRecommendation, NewProgressRecord, ProgressRecord, ProgressSummary,
    CORRECT_ANSWERS_FOR_NEXT_LEVEL,
};
pub use question::{AnswerChoice, OptionLabel, ParseLabelError, Question, QuestionError};
pub use sentence::{Sentence, SentenceError};
