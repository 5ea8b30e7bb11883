//! Progression state machine for one learner session.
//!
//! The state is a plain value: every event consumes the current state and
//! returns the next one, so the shell decides where sessions live.

use serde::{Deserialize, Serialize};

use crate::model::{ChildId, ChildName, Level, Page};

/// Profile and position of an active session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveSession {
    pub child_id: ChildId,
    pub child_name: ChildName,
    pub level: Level,
    pub page: Page,
    /// Forward page turns taken in this session.
    pub pages_read: u32,
    /// Times this session stepped onto the story-complete page.
    #[serde(default)]
    pub stories_completed: u32,
}

/// How much content a level has, as far as navigation is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoryLength {
    /// Could not be determined; `next` is not limited.
    Unknown,
    /// Highest authored page, `None` when the level has no content yet.
    Authored(Option<Page>),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionState {
    #[default]
    NoProfile,
    Active(ActiveSession),
}

impl SessionState {
    /// Profile submission. Always (re)starts at page 1.
    #[must_use]
    pub fn submit_profile(self, child_id: ChildId, child_name: ChildName, level: Level) -> Self {
        Self::Active(ActiveSession {
            child_id,
            child_name,
            level,
            page: Page::FIRST,
            pages_read: 0,
            stories_completed: 0,
        })
    }

    /// Go back one page, clamped at page 1.
    #[must_use]
    pub fn prev(self) -> Self {
        match self {
            Self::Active(mut active) => {
                active.page = active.page.previous();
                Self::Active(active)
            }
            Self::NoProfile => Self::NoProfile,
        }
    }

    /// Go forward one page.
    ///
    /// The learner may step one page past the last authored page (the
    /// "story complete" page) and no further. There is no wraparound.
    /// Each step onto that page counts as a completed story.
    #[must_use]
    pub fn next(self, length: StoryLength) -> Self {
        match self {
            Self::Active(mut active) => {
                let last = match length {
                    StoryLength::Unknown => None,
                    StoryLength::Authored(Some(last)) => Some(last),
                    StoryLength::Authored(None) => return Self::Active(active),
                };
                if last.is_some_and(|last| active.page > last) {
                    return Self::Active(active);
                }
                active.page = active.page.next();
                active.pages_read = active.pages_read.saturating_add(1);
                if last.is_some_and(|last| active.page > last) {
                    active.stories_completed = active.stories_completed.saturating_add(1);
                }
                Self::Active(active)
            }
            Self::NoProfile => Self::NoProfile,
        }
    }

    #[must_use]
    pub fn active(&self) -> Option<&ActiveSession> {
        match self {
            Self::Active(active) => Some(active),
            Self::NoProfile => None,
        }
    }

    #[must_use]
    pub fn page(&self) -> Option<Page> {
        self.active().map(|a| a.page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started() -> SessionState {
        SessionState::NoProfile.submit_profile(
            ChildId::new(7),
            ChildName::parse("Mira").unwrap(),
            Level::Beginner,
        )
    }

    fn page(n: u32) -> Page {
        Page::new(n).unwrap()
    }

    #[test]
    fn submit_starts_at_first_page() {
        let state = started();
        let active = state.active().unwrap();
        assert_eq!(active.page, Page::FIRST);
        assert_eq!(active.child_id, ChildId::new(7));
        assert_eq!(active.pages_read, 0);
    }

    #[test]
    fn prev_from_first_page_stays_put() {
        let state = started().prev().prev();
        assert_eq!(state.page(), Some(Page::FIRST));
    }

    #[test]
    fn next_then_prev_returns_to_start() {
        let state = started().next(StoryLength::Authored(Some(page(10)))).prev();
        assert_eq!(state.page(), Some(Page::FIRST));
        assert_eq!(state.active().unwrap().pages_read, 1);
    }

    #[test]
    fn next_stops_one_past_last_authored_page() {
        let mut state = started();
        for _ in 0..20 {
            state = state.next(StoryLength::Authored(Some(page(3))));
        }
        assert_eq!(state.page(), Some(page(4)));
        assert_eq!(state.active().unwrap().pages_read, 3);
        assert_eq!(state.active().unwrap().stories_completed, 1);
    }

    #[test]
    fn returning_to_the_end_counts_another_completion() {
        let length = StoryLength::Authored(Some(page(2)));
        let state = started()
            .next(length)
            .next(length)
            .prev()
            .next(length)
            .next(length);
        assert_eq!(state.page(), Some(page(3)));
        assert_eq!(state.active().unwrap().stories_completed, 2);
    }

    #[test]
    fn next_with_unknown_length_is_unbounded() {
        let mut state = started();
        for _ in 0..12 {
            state = state.next(StoryLength::Unknown);
        }
        assert_eq!(state.page(), Some(page(13)));
        assert_eq!(state.active().unwrap().stories_completed, 0);
    }

    #[test]
    fn next_on_empty_level_stays_on_first_page() {
        let state = started().next(StoryLength::Authored(None));
        assert_eq!(state.page(), Some(Page::FIRST));
    }

    #[test]
    fn events_without_profile_are_ignored() {
        assert_eq!(
            SessionState::NoProfile.next(StoryLength::Unknown),
            SessionState::NoProfile
        );
        assert_eq!(SessionState::NoProfile.prev(), SessionState::NoProfile);
    }

    #[test]
    fn resubmitting_restarts_the_story() {
        let state = started()
            .next(StoryLength::Unknown)
            .next(StoryLength::Unknown)
            .submit_profile(
                ChildId::new(8),
                ChildName::parse("Mira").unwrap(),
                Level::Intermediate,
            );
        let active = state.active().unwrap();
        assert_eq!(active.page, Page::FIRST);
        assert_eq!(active.level, Level::Intermediate);
    }
}
