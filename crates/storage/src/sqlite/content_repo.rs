use story_core::model::{Level, Page, Question, Sentence, SentenceId};

use super::SqliteRepository;
use super::mapping::{
    conn, id_to_i64, map_question_row, map_sentence_row, page_from_i64, sentence_id_from_i64,
};
use crate::repository::{ContentRepository, NewSentenceRecord, StorageError};

#[async_trait::async_trait]
impl ContentRepository for SqliteRepository {
    async fn get_sentence(
        &self,
        level: Level,
        page: Page,
    ) -> Result<Option<Sentence>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT id, level, page, text_en, text_tr
            FROM sentences
            WHERE level = ?1 AND page = ?2
            ",
        )
        .bind(level.as_str())
        .bind(i64::from(page.value()))
        .fetch_optional(&self.pool)
        .await
        .map_err(conn)?;

        row.as_ref().map(map_sentence_row).transpose()
    }

    async fn get_question(
        &self,
        sentence_id: SentenceId,
    ) -> Result<Option<Question>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT sentence_id, question, option_a, option_b, option_c, correct_opt
            FROM questions
            WHERE sentence_id = ?1
            ",
        )
        .bind(id_to_i64("sentence_id", sentence_id.value())?)
        .fetch_optional(&self.pool)
        .await
        .map_err(conn)?;

        row.as_ref().map(map_question_row).transpose()
    }

    async fn last_page(&self, level: Level) -> Result<Option<Page>, StorageError> {
        let max: Option<i64> =
            sqlx::query_scalar("SELECT MAX(page) FROM sentences WHERE level = ?1")
                .bind(level.as_str())
                .fetch_one(&self.pool)
                .await
                .map_err(conn)?;

        max.map(page_from_i64).transpose()
    }

    async fn count_sentences(&self) -> Result<u64, StorageError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sentences")
            .fetch_one(&self.pool)
            .await
            .map_err(conn)?;
        u64::try_from(count).map_err(|_| StorageError::Serialization("negative count".into()))
    }

    async fn upsert_sentence(
        &self,
        sentence: &NewSentenceRecord,
    ) -> Result<SentenceId, StorageError> {
        let text_en = sentence.english()?;
        let id: i64 = sqlx::query_scalar(
            r"
            INSERT INTO sentences (level, page, text_en, text_tr)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(level, page) DO UPDATE SET
                text_en = excluded.text_en,
                text_tr = excluded.text_tr
            RETURNING id
            ",
        )
        .bind(sentence.level.as_str())
        .bind(i64::from(sentence.page.value()))
        .bind(text_en)
        .bind(sentence.text_tr.trim())
        .fetch_one(&self.pool)
        .await
        .map_err(conn)?;

        sentence_id_from_i64(id)
    }

    async fn upsert_question(&self, question: &Question) -> Result<(), StorageError> {
        let sentence_id = id_to_i64("sentence_id", question.sentence_id().value())?;
        let mut tx = self.pool.begin().await.map_err(conn)?;

        let exists = sqlx::query("SELECT 1 FROM sentences WHERE id = ?1")
            .bind(sentence_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(conn)?;
        if exists.is_none() {
            return Err(StorageError::MissingReference("sentence"));
        }

        let [a, b, c] = story_core::model::OptionLabel::ALL.map(|label| question.option(label));
        sqlx::query(
            r"
            INSERT INTO questions (sentence_id, question, option_a, option_b, option_c, correct_opt)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(sentence_id) DO UPDATE SET
                question = excluded.question,
                option_a = excluded.option_a,
                option_b = excluded.option_b,
                option_c = excluded.option_c,
                correct_opt = excluded.correct_opt
            ",
        )
        .bind(sentence_id)
        .bind(question.question_text())
        .bind(a)
        .bind(b)
        .bind(c)
        .bind(question.correct_option().as_str())
        .execute(&mut *tx)
        .await
        .map_err(conn)?;

        tx.commit().await.map_err(conn)?;
        Ok(())
    }
}
