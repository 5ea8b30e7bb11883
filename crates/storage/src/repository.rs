use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use story_core::model::{
    Child, ChildId, Level, NewChild, NewProgressRecord, Page, ProgressId, ProgressRecord,
    Question, Sentence, SentenceId,
};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("invalid content: {0}")]
    InvalidContent(String),

    #[error("referenced {0} does not exist")]
    MissingReference(&'static str),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Authored sentence before it has a row id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSentenceRecord {
    pub level: Level,
    pub page: Page,
    pub text_en: String,
    pub text_tr: String,
}

impl NewSentenceRecord {
    /// Trimmed English text.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidContent` if the text is blank.
    pub fn english(&self) -> Result<&str, StorageError> {
        let text = self.text_en.trim();
        if text.is_empty() {
            return Err(StorageError::InvalidContent(format!(
                "{} page {} has no English text",
                self.level, self.page
            )));
        }
        Ok(text)
    }
}

/// Read access to leveled story content, plus the upserts used for seeding.
///
/// Missing content is `Ok(None)`, never an error.
#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// Sentence authored for `(level, page)`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` only when the backend fails.
    async fn get_sentence(&self, level: Level, page: Page)
    -> Result<Option<Sentence>, StorageError>;

    /// Quiz attached to a sentence, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` only when the backend fails.
    async fn get_question(&self, sentence_id: SentenceId)
    -> Result<Option<Question>, StorageError>;

    /// Highest authored page for a level, `None` if the level has no content.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` only when the backend fails.
    async fn last_page(&self, level: Level) -> Result<Option<Page>, StorageError>;

    /// Number of authored sentences across all levels.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` only when the backend fails.
    async fn count_sentences(&self) -> Result<u64, StorageError>;

    /// Insert or replace the sentence at `(level, page)`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the sentence cannot be stored.
    async fn upsert_sentence(&self, sentence: &NewSentenceRecord)
    -> Result<SentenceId, StorageError>;

    /// Insert or replace the quiz of `question.sentence_id()`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::MissingReference` if the sentence does not exist.
    async fn upsert_question(&self, question: &Question) -> Result<(), StorageError>;
}

/// Child profiles and the append-only progress log.
#[async_trait]
pub trait LearnerRepository: Send + Sync {
    /// Resolve the child with the same `(name, level)`, creating it if absent.
    ///
    /// An existing row is returned unchanged; a different `parent_email` is ignored.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the lookup or insert fails.
    async fn get_or_create_child(&self, child: &NewChild) -> Result<ChildId, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` only when the backend fails.
    async fn get_child(&self, id: ChildId) -> Result<Option<Child>, StorageError>;

    /// Append one quiz attempt. Never updates earlier rows.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::MissingReference` if the child or sentence does not exist.
    async fn save_progress(&self, record: &NewProgressRecord) -> Result<ProgressId, StorageError>;

    /// All attempts of a child, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` only when the backend fails.
    async fn progress_for_child(
        &self,
        child_id: ChildId,
    ) -> Result<Vec<ProgressRecord>, StorageError>;
}

#[derive(Default)]
struct MemoryTables {
    sentences: HashMap<(Level, Page), Sentence>,
    questions: HashMap<SentenceId, Question>,
    children: Vec<Child>,
    progress: Vec<ProgressRecord>,
    next_sentence_id: u64,
}

impl MemoryTables {
    fn sentence_exists(&self, id: SentenceId) -> bool {
        self.sentences.values().any(|s| s.id() == id)
    }
}

/// In-memory repository for tests and prototyping.
///
/// All tables sit behind one lock so check-then-insert sequences are atomic.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    tables: Arc<Mutex<MemoryTables>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryTables>, StorageError> {
        self.tables
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))
    }

    /// Number of child rows; lets tests assert deduplication.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn child_count(&self) -> Result<usize, StorageError> {
        Ok(self.lock()?.children.len())
    }
}

#[async_trait]
impl ContentRepository for InMemoryRepository {
    async fn get_sentence(
        &self,
        level: Level,
        page: Page,
    ) -> Result<Option<Sentence>, StorageError> {
        Ok(self.lock()?.sentences.get(&(level, page)).cloned())
    }

    async fn get_question(
        &self,
        sentence_id: SentenceId,
    ) -> Result<Option<Question>, StorageError> {
        Ok(self.lock()?.questions.get(&sentence_id).cloned())
    }

    async fn last_page(&self, level: Level) -> Result<Option<Page>, StorageError> {
        Ok(self
            .lock()?
            .sentences
            .keys()
            .filter(|(l, _)| *l == level)
            .map(|(_, page)| *page)
            .max())
    }

    async fn count_sentences(&self) -> Result<u64, StorageError> {
        Ok(self.lock()?.sentences.len() as u64)
    }

    async fn upsert_sentence(
        &self,
        sentence: &NewSentenceRecord,
    ) -> Result<SentenceId, StorageError> {
        let text_en = sentence.english()?;
        let mut tables = self.lock()?;
        let key = (sentence.level, sentence.page);
        let existing = tables.sentences.get(&key).map(Sentence::id);
        let id = match existing {
            Some(id) => id,
            None => {
                tables.next_sentence_id += 1;
                SentenceId::new(tables.next_sentence_id)
            }
        };
        let row = Sentence::new(
            id,
            sentence.level,
            sentence.page,
            text_en,
            sentence.text_tr.clone(),
        )
        .map_err(|e| StorageError::InvalidContent(e.to_string()))?;
        tables.sentences.insert(key, row);
        Ok(id)
    }

    async fn upsert_question(&self, question: &Question) -> Result<(), StorageError> {
        let mut tables = self.lock()?;
        if !tables.sentence_exists(question.sentence_id()) {
            return Err(StorageError::MissingReference("sentence"));
        }
        tables
            .questions
            .insert(question.sentence_id(), question.clone());
        Ok(())
    }
}

#[async_trait]
impl LearnerRepository for InMemoryRepository {
    async fn get_or_create_child(&self, child: &NewChild) -> Result<ChildId, StorageError> {
        let mut tables = self.lock()?;
        if let Some(existing) = tables
            .children
            .iter()
            .find(|c| c.name == child.name && c.level == child.level)
        {
            return Ok(existing.id);
        }
        let id = ChildId::new(tables.children.len() as u64 + 1);
        tables.children.push(Child {
            id,
            name: child.name.clone(),
            level: child.level,
            created_at: child.created_at,
            parent_email: child.parent_email.clone(),
        });
        Ok(id)
    }

    async fn get_child(&self, id: ChildId) -> Result<Option<Child>, StorageError> {
        Ok(self.lock()?.children.iter().find(|c| c.id == id).cloned())
    }

    async fn save_progress(&self, record: &NewProgressRecord) -> Result<ProgressId, StorageError> {
        let mut tables = self.lock()?;
        if !tables.children.iter().any(|c| c.id == record.child_id) {
            return Err(StorageError::MissingReference("child"));
        }
        if !tables.sentence_exists(record.sentence_id) {
            return Err(StorageError::MissingReference("sentence"));
        }
        let id = ProgressId::new(tables.progress.len() as u64 + 1);
        tables.progress.push(ProgressRecord {
            id,
            child_id: record.child_id,
            sentence_id: record.sentence_id,
            is_completed: record.is_completed,
            quiz_answer: record.quiz_answer,
            is_correct: record.is_correct,
            answered_at: record.answered_at,
        });
        Ok(id)
    }

    async fn progress_for_child(
        &self,
        child_id: ChildId,
    ) -> Result<Vec<ProgressRecord>, StorageError> {
        let tables = self.lock()?;
        let mut records: Vec<_> = tables
            .progress
            .iter()
            .filter(|r| r.child_id == child_id)
            .cloned()
            .collect();
        records.sort_by_key(|r| (r.answered_at, r.id));
        Ok(records)
    }
}

/// Repositories behind trait objects so backends can be swapped.
#[derive(Clone)]
pub struct Storage {
    pub content: Arc<dyn ContentRepository>,
    pub learners: Arc<dyn LearnerRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        Self::from_repository(repo)
    }

    /// Uses one value for both roles.
    #[must_use]
    pub fn from_repository<R>(repo: R) -> Self
    where
        R: ContentRepository + LearnerRepository + Clone + 'static,
    {
        let content: Arc<dyn ContentRepository> = Arc::new(repo.clone());
        let learners: Arc<dyn LearnerRepository> = Arc::new(repo);
        Self { content, learners }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use story_core::model::{ChildName, OptionLabel};
    use story_core::time::fixed_now;

    fn new_child(name: &str, level: Level, email: Option<&str>) -> NewChild {
        NewChild::new(
            ChildName::parse(name).unwrap(),
            level,
            email.map(str::to_owned),
            fixed_now(),
        )
    }

    async fn seed_sentence(repo: &InMemoryRepository, page: u32) -> SentenceId {
        repo.upsert_sentence(&NewSentenceRecord {
            level: Level::Beginner,
            page: Page::new(page).unwrap(),
            text_en: format!("Sentence {page}."),
            text_tr: String::new(),
        })
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn get_or_create_child_deduplicates_by_name_and_level() {
        let repo = InMemoryRepository::new();
        let first = repo
            .get_or_create_child(&new_child("Ada", Level::Beginner, Some("a@example.com")))
            .await
            .unwrap();
        let second = repo
            .get_or_create_child(&new_child("Ada", Level::Beginner, Some("b@example.com")))
            .await
            .unwrap();
        assert_eq!(first, second);
        assert_eq!(repo.child_count().unwrap(), 1);

        let stored = repo.get_child(first).await.unwrap().unwrap();
        assert_eq!(stored.parent_email.as_deref(), Some("a@example.com"));

        let other_level = repo
            .get_or_create_child(&new_child("Ada", Level::Advanced, None))
            .await
            .unwrap();
        assert_ne!(first, other_level);
    }

    #[tokio::test]
    async fn upsert_sentence_keeps_id_for_same_page() {
        let repo = InMemoryRepository::new();
        let first = seed_sentence(&repo, 1).await;
        let again = seed_sentence(&repo, 1).await;
        assert_eq!(first, again);
        assert_eq!(repo.count_sentences().await.unwrap(), 1);
        assert_eq!(
            repo.last_page(Level::Beginner).await.unwrap(),
            Some(Page::FIRST)
        );
        assert_eq!(repo.last_page(Level::Advanced).await.unwrap(), None);
    }

    #[tokio::test]
    async fn blank_sentence_is_invalid_content() {
        let repo = InMemoryRepository::new();
        let err = repo
            .upsert_sentence(&NewSentenceRecord {
                level: Level::Beginner,
                page: Page::FIRST,
                text_en: " ".into(),
                text_tr: String::new(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::InvalidContent(_)));
        assert_eq!(repo.count_sentences().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn save_progress_rejects_unknown_references() {
        let repo = InMemoryRepository::new();
        let sentence = seed_sentence(&repo, 1).await;
        let record = NewProgressRecord::quiz_attempt(
            ChildId::new(99),
            sentence,
            OptionLabel::A,
            true,
            fixed_now(),
        );
        let err = repo.save_progress(&record).await.unwrap_err();
        assert!(matches!(err, StorageError::MissingReference("child")));

        let child = repo
            .get_or_create_child(&new_child("Ada", Level::Beginner, None))
            .await
            .unwrap();
        let record = NewProgressRecord::quiz_attempt(
            child,
            SentenceId::new(404),
            OptionLabel::A,
            true,
            fixed_now(),
        );
        let err = repo.save_progress(&record).await.unwrap_err();
        assert!(matches!(err, StorageError::MissingReference("sentence")));
    }

    #[tokio::test]
    async fn progress_is_append_only() {
        let repo = InMemoryRepository::new();
        let sentence = seed_sentence(&repo, 1).await;
        let child = repo
            .get_or_create_child(&new_child("Ada", Level::Beginner, None))
            .await
            .unwrap();

        for (answer, correct) in [(OptionLabel::B, false), (OptionLabel::A, true)] {
            let record =
                NewProgressRecord::quiz_attempt(child, sentence, answer, correct, fixed_now());
            repo.save_progress(&record).await.unwrap();
        }

        let records = repo.progress_for_child(child).await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].quiz_answer, Some(OptionLabel::B));
        assert_eq!(records[1].is_correct, Some(true));
    }
}
