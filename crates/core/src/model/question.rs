use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::SentenceId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text cannot be empty")]
    EmptyQuestion,

    #[error("option {0} cannot be empty")]
    EmptyOption(OptionLabel),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid option label: {raw}")]
pub struct ParseLabelError {
    raw: String,
}

/// Positional label of a quiz option. Persisted as `"A" | "B" | "C"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionLabel {
    A,
    B,
    C,
}

impl OptionLabel {
    pub const ALL: [OptionLabel; 3] = [OptionLabel::A, OptionLabel::B, OptionLabel::C];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            OptionLabel::A => "A",
            OptionLabel::B => "B",
            OptionLabel::C => "C",
        }
    }

    fn position(self) -> usize {
        match self {
            OptionLabel::A => 0,
            OptionLabel::B => 1,
            OptionLabel::C => 2,
        }
    }
}

impl fmt::Display for OptionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OptionLabel {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "A" | "a" => Ok(OptionLabel::A),
            "B" | "b" => Ok(OptionLabel::B),
            "C" | "c" => Ok(OptionLabel::C),
            _ => Err(ParseLabelError { raw: s.to_owned() }),
        }
    }
}

/// What the child picked: either the label itself or the option text shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerChoice {
    Label(OptionLabel),
    Text(String),
}

impl AnswerChoice {
    /// Reads a label when the input is exactly one, otherwise keeps the text.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        raw.parse::<OptionLabel>()
            .map_or_else(|_| Self::Text(raw.trim().to_owned()), Self::Label)
    }
}

/// Three-option quiz attached to a single sentence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    sentence_id: SentenceId,
    question_text: String,
    options: [String; 3],
    correct_option: OptionLabel,
}

impl Question {
    /// # Errors
    ///
    /// Returns `QuestionError` if the question or any option is blank.
    pub fn new(
        sentence_id: SentenceId,
        question_text: impl Into<String>,
        options: [String; 3],
        correct_option: OptionLabel,
    ) -> Result<Self, QuestionError> {
        let question_text = question_text.into().trim().to_owned();
        if question_text.is_empty() {
            return Err(QuestionError::EmptyQuestion);
        }
        let options = options.map(|o| o.trim().to_owned());
        for label in OptionLabel::ALL {
            if options[label.position()].is_empty() {
                return Err(QuestionError::EmptyOption(label));
            }
        }
        Ok(Self {
            sentence_id,
            question_text,
            options,
            correct_option,
        })
    }

    #[must_use]
    pub fn sentence_id(&self) -> SentenceId {
        self.sentence_id
    }

    #[must_use]
    pub fn question_text(&self) -> &str {
        &self.question_text
    }

    #[must_use]
    pub fn option(&self, label: OptionLabel) -> &str {
        &self.options[label.position()]
    }

    /// Options paired with their labels, in display order.
    pub fn labelled_options(&self) -> impl Iterator<Item = (OptionLabel, &str)> {
        OptionLabel::ALL
            .into_iter()
            .map(|label| (label, self.option(label)))
    }

    #[must_use]
    pub fn correct_option(&self) -> OptionLabel {
        self.correct_option
    }

    #[must_use]
    pub fn is_correct(&self, label: OptionLabel) -> bool {
        self.correct_option == label
    }

    /// Maps a choice to its label; option text matches ignoring ASCII case.
    #[must_use]
    pub fn resolve(&self, choice: &AnswerChoice) -> Option<OptionLabel> {
        match choice {
            AnswerChoice::Label(label) => Some(*label),
            AnswerChoice::Text(text) => {
                let wanted = text.trim();
                self.labelled_options()
                    .find(|(_, option)| option.eq_ignore_ascii_case(wanted))
                    .map(|(label, _)| label)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cat_question() -> Question {
        Question::new(
            SentenceId::new(1),
            "What animal is this?",
            ["Cat".into(), "Dog".into(), "Bird".into()],
            OptionLabel::A,
        )
        .unwrap()
    }

    #[test]
    fn resolves_option_text_to_label() {
        let q = cat_question();
        assert_eq!(q.resolve(&AnswerChoice::parse("Cat")), Some(OptionLabel::A));
        assert_eq!(q.resolve(&AnswerChoice::parse("dog")), Some(OptionLabel::B));
        assert_eq!(q.resolve(&AnswerChoice::parse("Fish")), None);
    }

    #[test]
    fn single_letters_are_labels() {
        assert_eq!(AnswerChoice::parse("c"), AnswerChoice::Label(OptionLabel::C));
    }

    #[test]
    fn correctness_follows_label() {
        let q = cat_question();
        assert!(q.is_correct(OptionLabel::A));
        assert!(!q.is_correct(OptionLabel::B));
    }

    #[test]
    fn blank_option_is_rejected() {
        let err = Question::new(
            SentenceId::new(1),
            "Q?",
            ["Cat".into(), " ".into(), "Bird".into()],
            OptionLabel::A,
        )
        .unwrap_err();
        assert_eq!(err, QuestionError::EmptyOption(OptionLabel::B));
    }
}
