use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PageError {
    #[error("pages are numbered from 1")]
    Zero,
}

/// 1-based position inside a level's story.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Page(u32);

impl Page {
    pub const FIRST: Page = Page(1);

    /// # Errors
    ///
    /// Returns `PageError::Zero` for page 0.
    pub fn new(number: u32) -> Result<Self, PageError> {
        if number == 0 {
            return Err(PageError::Zero);
        }
        Ok(Self(number))
    }

    #[must_use]
    pub fn value(self) -> u32 {
        self.0
    }

    /// Zero-based offset, handy for cyclic lookups.
    #[must_use]
    pub fn index(self) -> usize {
        (self.0 - 1) as usize
    }

    /// Previous page, never below page 1.
    #[must_use]
    pub fn previous(self) -> Self {
        Self(self.0.saturating_sub(1).max(1))
    }

    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::FIRST
    }
}

impl TryFrom<u32> for Page {
    type Error = PageError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Page> for u32 {
    fn from(page: Page) -> Self {
        page.0
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
