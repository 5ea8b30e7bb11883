use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::{ChildId, Level, OptionLabel, ProgressId, SentenceId};

/// Correct answers after which a parent is told the child may move up a level.
pub const CORRECT_ANSWERS_FOR_NEXT_LEVEL: u32 = 8;

const PERCENT_PER_CORRECT_ANSWER: u32 = 5;
const PERCENT_PER_COMPLETED_STORY: u32 = 10;

/// A quiz attempt waiting to be appended to the progress log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProgressRecord {
    pub child_id: ChildId,
    pub sentence_id: SentenceId,
    pub is_completed: bool,
    pub quiz_answer: Option<OptionLabel>,
    pub is_correct: Option<bool>,
    pub answered_at: DateTime<Utc>,
}

impl NewProgressRecord {
    /// A completed page with a graded quiz answer.
    #[must_use]
    pub fn quiz_attempt(
        child_id: ChildId,
        sentence_id: SentenceId,
        answer: OptionLabel,
        is_correct: bool,
        answered_at: DateTime<Utc>,
    ) -> Self {
        Self {
            child_id,
            sentence_id,
            is_completed: true,
            quiz_answer: Some(answer),
            is_correct: Some(is_correct),
            answered_at,
        }
    }
}

/// Append-only log entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressRecord {
    pub id: ProgressId,
    pub child_id: ChildId,
    pub sentence_id: SentenceId,
    pub is_completed: bool,
    pub quiz_answer: Option<OptionLabel>,
    pub is_correct: Option<bool>,
    pub answered_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "level", rename_all = "snake_case")]
pub enum LevelRecommendation {
    StayAt(Level),
    MoveUpTo(Level),
}

/// Aggregate of a child's progress log for the parent view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressSummary {
    pub attempts: u32,
    pub correct_answers: u32,
    pub sentences_mastered: u32,
    pub progress_percent: u32,
    pub recommendation: LevelRecommendation,
}

impl ProgressSummary {
    /// Progress is 5% per correct answer plus 10% per completed story,
    /// capped at 100.
    #[must_use]
    pub fn from_records(level: Level, records: &[ProgressRecord], stories_completed: u32) -> Self {
        let mut attempts = 0_u32;
        let mut correct_answers = 0_u32;
        let mut mastered = HashSet::new();

        for record in records {
            attempts = attempts.saturating_add(1);
            if record.is_correct == Some(true) {
                correct_answers = correct_answers.saturating_add(1);
                mastered.insert(record.sentence_id);
            }
        }

        let progress_percent = correct_answers
            .saturating_mul(PERCENT_PER_CORRECT_ANSWER)
            .saturating_add(stories_completed.saturating_mul(PERCENT_PER_COMPLETED_STORY))
            .min(100);

        let recommendation = match level.next() {
            Some(next) if correct_answers >= CORRECT_ANSWERS_FOR_NEXT_LEVEL => {
                LevelRecommendation::MoveUpTo(next)
            }
            _ => LevelRecommendation::StayAt(level),
        };

        Self {
            attempts,
            correct_answers,
            sentences_mastered: u32::try_from(mastered.len()).unwrap_or(u32::MAX),
            progress_percent,
            recommendation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    fn record(id: u64, sentence: u64, correct: bool) -> ProgressRecord {
        ProgressRecord {
            id: ProgressId::new(id),
            child_id: ChildId::new(1),
            sentence_id: SentenceId::new(sentence),
            is_completed: true,
            quiz_answer: Some(OptionLabel::A),
            is_correct: Some(correct),
            answered_at: fixed_now(),
        }
    }

    #[test]
    fn counts_retries_separately_from_mastered_sentences() {
        let records = vec![record(1, 1, false), record(2, 1, true), record(3, 1, true)];
        let summary = ProgressSummary::from_records(Level::Beginner, &records, 0);
        assert_eq!(summary.attempts, 3);
        assert_eq!(summary.correct_answers, 2);
        assert_eq!(summary.sentences_mastered, 1);
        assert_eq!(summary.progress_percent, 10);
        assert_eq!(
            summary.recommendation,
            LevelRecommendation::StayAt(Level::Beginner)
        );
    }

    #[test]
    fn recommends_next_level_after_enough_correct_answers() {
        let records: Vec<_> = (1..=8).map(|i| record(i, i, true)).collect();
        let summary = ProgressSummary::from_records(Level::Intermediate, &records, 0);
        assert_eq!(
            summary.recommendation,
            LevelRecommendation::MoveUpTo(Level::Advanced)
        );
    }

    #[test]
    fn completed_stories_add_to_progress() {
        let records = vec![record(1, 1, true), record(2, 2, false)];
        let summary = ProgressSummary::from_records(Level::Beginner, &records, 1);
        assert_eq!(summary.correct_answers, 1);
        assert_eq!(summary.progress_percent, 15);

        let summary = ProgressSummary::from_records(Level::Beginner, &records, 12);
        assert_eq!(summary.progress_percent, 100);
    }

    #[test]
    fn advanced_never_moves_up_and_percent_caps() {
        let records: Vec<_> = (1..=30).map(|i| record(i, i, true)).collect();
        let summary = ProgressSummary::from_records(Level::Advanced, &records, 3);
        assert_eq!(summary.progress_percent, 100);
        assert_eq!(
            summary.recommendation,
            LevelRecommendation::StayAt(Level::Advanced)
        );
    }
}
