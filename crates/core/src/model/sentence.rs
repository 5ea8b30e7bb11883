use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{Level, Page, SentenceId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SentenceError {
    #[error("sentence text cannot be empty")]
    EmptyText,
}

/// One page of a leveled story: the English sentence and its Turkish gloss.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentence {
    id: SentenceId,
    level: Level,
    page: Page,
    text_en: String,
    text_tr: String,
}

impl Sentence {
    /// # Errors
    ///
    /// Returns `SentenceError::EmptyText` if the English text is blank.
    pub fn new(
        id: SentenceId,
        level: Level,
        page: Page,
        text_en: impl Into<String>,
        text_tr: impl Into<String>,
    ) -> Result<Self, SentenceError> {
        let text_en = text_en.into().trim().to_owned();
        if text_en.is_empty() {
            return Err(SentenceError::EmptyText);
        }
        Ok(Self {
            id,
            level,
            page,
            text_en,
            text_tr: text_tr.into().trim().to_owned(),
        })
    }

    #[must_use]
    pub fn id(&self) -> SentenceId {
        self.id
    }

    #[must_use]
    pub fn level(&self) -> Level {
        self.level
    }

    #[must_use]
    pub fn page(&self) -> Page {
        self.page
    }

    #[must_use]
    pub fn text_en(&self) -> &str {
        &self.text_en
    }

    #[must_use]
    pub fn text_tr(&self) -> &str {
        &self.text_tr
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_text_is_rejected() {
        let err = Sentence::new(SentenceId::new(1), Level::Beginner, Page::FIRST, "  ", "")
            .unwrap_err();
        assert_eq!(err, SentenceError::EmptyText);
    }

    #[test]
    fn text_is_trimmed() {
        let s = Sentence::new(
            SentenceId::new(1),
            Level::Beginner,
            Page::FIRST,
            " This is a cat. ",
            "Bu bir kedi.",
        )
        .unwrap();
        assert_eq!(s.text_en(), "This is a cat.");
    }
}
