use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown level: {raw}")]
pub struct ParseLevelError {
    raw: String,
}

/// Difficulty tier of a story. Controls sentence complexity and quiz coverage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Level {
    Beginner,
    Intermediate,
    Advanced,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::Beginner, Level::Intermediate, Level::Advanced];

    /// Stable storage/display name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Beginner => "Beginner",
            Level::Intermediate => "Intermediate",
            Level::Advanced => "Advanced",
        }
    }

    /// The tier a child moves up to, if any.
    #[must_use]
    pub fn next(self) -> Option<Level> {
        match self {
            Level::Beginner => Some(Level::Intermediate),
            Level::Intermediate => Some(Level::Advanced),
            Level::Advanced => None,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Level::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseLevelError { raw: s.to_owned() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!("beginner".parse::<Level>().unwrap(), Level::Beginner);
        assert_eq!(" Advanced ".parse::<Level>().unwrap(), Level::Advanced);
        assert!("Expert".parse::<Level>().is_err());
    }

    #[test]
    fn next_stops_at_advanced() {
        assert_eq!(Level::Beginner.next(), Some(Level::Intermediate));
        assert_eq!(Level::Intermediate.next(), Some(Level::Advanced));
        assert_eq!(Level::Advanced.next(), None);
    }
}
