use std::sync::Arc;

use serde::Serialize;
use story_core::model::{
    AnswerChoice, ChildName, Level, NewChild, NewProgressRecord, OptionLabel, Page, ProgressId,
    Question, Sentence,
};
use story_core::{ActiveSession, Clock, SessionState, StoryLength, build_prompt};
use storage::repository::{ContentRepository, LearnerRepository};

use super::report::ParentReport;
use super::view::{PageHeader, PageView, QuizView, StoryPage};
use crate::error::StoryError;

/// Result of a quiz submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizOutcome {
    pub answer: OptionLabel,
    pub is_correct: bool,
    /// `None` when the attempt could not be written to the store.
    pub recorded: Option<ProgressId>,
}

impl QuizOutcome {
    #[must_use]
    pub fn message(&self) -> &'static str {
        if self.is_correct {
            "Correct! Great job!"
        } else {
            "Not correct. Try again."
        }
    }
}

/// Drives one learner session against the content and learner stores.
///
/// The service holds no session state itself; callers pass the current
/// `SessionState` in and keep whatever comes back.
#[derive(Clone)]
pub struct StoryService {
    clock: Clock,
    content: Arc<dyn ContentRepository>,
    learners: Arc<dyn LearnerRepository>,
}

impl StoryService {
    #[must_use]
    pub fn new(
        clock: Clock,
        content: Arc<dyn ContentRepository>,
        learners: Arc<dyn LearnerRepository>,
    ) -> Self {
        Self {
            clock,
            content,
            learners,
        }
    }

    /// Register (or find) the child and start the story at page 1.
    ///
    /// # Errors
    ///
    /// Returns `StoryError::Child` for an invalid name and
    /// `StoryError::Storage` if the profile cannot be stored.
    pub async fn submit_profile(
        &self,
        state: SessionState,
        name: &str,
        level: Level,
        parent_email: Option<String>,
    ) -> Result<SessionState, StoryError> {
        let child_name = ChildName::parse(name)?;
        let new_child = NewChild::new(child_name.clone(), level, parent_email, self.clock.now());
        let child_id = self.learners.get_or_create_child(&new_child).await?;

        tracing::info!(%child_id, child = %child_name, %level, "profile submitted");
        Ok(state.submit_profile(child_id, child_name, level))
    }

    #[must_use]
    pub fn prev(&self, state: SessionState) -> SessionState {
        let state = state.prev();
        tracing::debug!(page = ?state.page(), "previous page");
        state
    }

    /// Advance one page, bounded by the level's authored content.
    pub async fn next(&self, state: SessionState) -> SessionState {
        let Some(active) = state.active() else {
            return state;
        };
        let length = match self.content.last_page(active.level).await {
            Ok(last) => StoryLength::Authored(last),
            Err(err) => {
                tracing::warn!(level = %active.level, error = %err, "story length unavailable");
                StoryLength::Unknown
            }
        };
        let state = state.next(length);
        tracing::debug!(page = ?state.page(), "next page");
        state
    }

    /// Describe what the current page should show.
    ///
    /// Storage failures degrade to `PageView::Unavailable`, or to a story
    /// page without its quiz when only the question lookup fails.
    pub async fn page_view(&self, state: &SessionState) -> PageView {
        let Some(active) = state.active() else {
            return PageView::Welcome;
        };

        let last_page = match self.content.last_page(active.level).await {
            Ok(last) => last,
            Err(err) => {
                tracing::warn!(level = %active.level, error = %err, "last page lookup failed");
                None
            }
        };
        let header = PageHeader {
            child_name: active.child_name.to_string(),
            level: active.level,
            page: active.page,
            last_page,
        };

        let sentence = match self.content.get_sentence(active.level, active.page).await {
            Ok(Some(sentence)) => sentence,
            Ok(None) => return fallback_view(header),
            Err(err) => {
                tracing::warn!(
                    level = %active.level,
                    page = %active.page,
                    error = %err,
                    "sentence lookup failed"
                );
                return PageView::Unavailable { header };
            }
        };

        let quiz = match self.content.get_question(sentence.id()).await {
            Ok(question) => question.as_ref().map(QuizView::from),
            Err(err) => {
                tracing::warn!(sentence_id = %sentence.id(), error = %err, "quiz lookup failed");
                None
            }
        };
        let prompt = build_prompt(
            active.child_name.as_str(),
            active.level,
            active.page,
            sentence.text_en(),
        );

        PageView::Story(StoryPage::new(header, &sentence, prompt, quiz))
    }

    /// Check an answer for the current page's quiz and log the attempt.
    ///
    /// The page does not change. A failed write is logged and reported as
    /// `recorded: None`.
    ///
    /// # Errors
    ///
    /// Returns `StoryError::NoProfile` without an active session,
    /// `StoryError::NoQuiz` when the page has no quiz and
    /// `StoryError::UnknownOption` when the answer matches no option.
    pub async fn submit_answer(
        &self,
        state: &SessionState,
        choice: &AnswerChoice,
    ) -> Result<QuizOutcome, StoryError> {
        let active = state.active().ok_or(StoryError::NoProfile)?;
        let (sentence, question) = self.current_quiz(active).await?;

        let answer = question
            .resolve(choice)
            .ok_or_else(|| StoryError::UnknownOption(choice_text(choice)))?;
        let is_correct = question.is_correct(answer);

        let record = NewProgressRecord::quiz_attempt(
            active.child_id,
            sentence.id(),
            answer,
            is_correct,
            self.clock.now(),
        );
        let recorded = match self.learners.save_progress(&record).await {
            Ok(id) => Some(id),
            Err(err) => {
                tracing::warn!(child_id = %active.child_id, error = %err, "progress not saved");
                None
            }
        };

        tracing::info!(
            child_id = %active.child_id,
            page = %active.page,
            %answer,
            is_correct,
            "quiz answered"
        );
        Ok(QuizOutcome {
            answer,
            is_correct,
            recorded,
        })
    }

    /// Summarise the child's logged attempts for a parent.
    ///
    /// # Errors
    ///
    /// Returns `StoryError::NoProfile` without an active session and
    /// `StoryError::Storage` if the progress log cannot be read.
    pub async fn parent_report(&self, state: &SessionState) -> Result<ParentReport, StoryError> {
        let active = state.active().ok_or(StoryError::NoProfile)?;
        let records = self.learners.progress_for_child(active.child_id).await?;
        Ok(ParentReport::new(active, &records))
    }

    async fn current_quiz(
        &self,
        active: &ActiveSession,
    ) -> Result<(Sentence, Question), StoryError> {
        let no_quiz = || StoryError::NoQuiz { page: active.page };
        let sentence = self
            .content
            .get_sentence(active.level, active.page)
            .await?
            .ok_or_else(no_quiz)?;
        let question = self
            .content
            .get_question(sentence.id())
            .await?
            .ok_or_else(no_quiz)?;
        Ok((sentence, question))
    }
}

fn fallback_view(header: PageHeader) -> PageView {
    match header.last_page {
        Some(last) if header.page > last => PageView::StoryComplete { header },
        _ => PageView::NotYetAuthored { header },
    }
}

fn choice_text(choice: &AnswerChoice) -> String {
    match choice {
        AnswerChoice::Label(label) => label.to_string(),
        AnswerChoice::Text(text) => text.clone(),
    }
}
