use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{ChildId, Level};

const MAX_NAME_CHARS: usize = 64;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ChildError {
    #[error("child name cannot be empty")]
    EmptyName,

    #[error("child name is longer than {MAX_NAME_CHARS} characters")]
    NameTooLong,
}

/// Trimmed, non-empty display name of a child.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ChildName(String);

impl ChildName {
    /// # Errors
    ///
    /// Returns `ChildError` if the name is blank or too long.
    pub fn parse(raw: impl Into<String>) -> Result<Self, ChildError> {
        let name = raw.into().trim().to_owned();
        if name.is_empty() {
            return Err(ChildError::EmptyName);
        }
        if name.chars().count() > MAX_NAME_CHARS {
            return Err(ChildError::NameTooLong);
        }
        Ok(Self(name))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChildName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ChildName {
    type Error = ChildError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<ChildName> for String {
    fn from(name: ChildName) -> Self {
        name.0
    }
}

/// Profile submission: `(name, level)` is the natural key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewChild {
    pub name: ChildName,
    pub level: Level,
    pub parent_email: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl NewChild {
    #[must_use]
    pub fn new(
        name: ChildName,
        level: Level,
        parent_email: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        let parent_email = parent_email
            .map(|email| email.trim().to_owned())
            .filter(|email| !email.is_empty());
        Self {
            name,
            level,
            parent_email,
            created_at,
        }
    }
}

/// Persisted child profile. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Child {
    pub id: ChildId,
    pub name: ChildName,
    pub level: Level,
    pub created_at: DateTime<Utc>,
    pub parent_email: Option<String>,
}
