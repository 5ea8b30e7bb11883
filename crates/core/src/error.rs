use thiserror::Error;

use crate::model::{ChildError, PageError, ParseLevelError, QuestionError, SentenceError};

/// Aggregate validation error for the domain model.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Level(#[from] ParseLevelError),
    #[error(transparent)]
    Page(#[from] PageError),
    #[error(transparent)]
    Sentence(#[from] SentenceError),
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Child(#[from] ChildError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ChildName, Level, Page};

    fn validate(level: &str, page: u32, name: &str) -> Result<(), Error> {
        level.parse::<Level>()?;
        Page::new(page)?;
        ChildName::parse(name)?;
        Ok(())
    }

    #[test]
    fn validation_errors_convert_into_the_aggregate() {
        assert!(validate("advanced", 3, "Ada").is_ok());
        assert!(matches!(validate("expert", 3, "Ada"), Err(Error::Level(_))));
        assert!(matches!(validate("beginner", 0, "Ada"), Err(Error::Page(_))));
        assert!(matches!(validate("beginner", 1, " "), Err(Error::Child(_))));
    }
}
