use story_core::model::{Child, ChildId, NewChild, NewProgressRecord, ProgressId, ProgressRecord};

use super::SqliteRepository;
use super::mapping::{
    child_id_from_i64, conn, id_to_i64, map_child_row, map_progress_row, progress_id_from_i64,
};
use crate::repository::{LearnerRepository, StorageError};

#[async_trait::async_trait]
impl LearnerRepository for SqliteRepository {
    async fn get_or_create_child(&self, child: &NewChild) -> Result<ChildId, StorageError> {
        // No-op update on conflict so RETURNING yields the existing row's id.
        let id: i64 = sqlx::query_scalar(
            r"
            INSERT INTO children (parent_email, name, level, created_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(name, level) DO UPDATE SET name = children.name
            RETURNING id
            ",
        )
        .bind(child.parent_email.as_deref())
        .bind(child.name.as_str())
        .bind(child.level.as_str())
        .bind(child.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(conn)?;

        child_id_from_i64(id)
    }

    async fn get_child(&self, id: ChildId) -> Result<Option<Child>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT id, parent_email, name, level, created_at
            FROM children
            WHERE id = ?1
            ",
        )
        .bind(id_to_i64("child_id", id.value())?)
        .fetch_optional(&self.pool)
        .await
        .map_err(conn)?;

        row.as_ref().map(map_child_row).transpose()
    }

    async fn save_progress(&self, record: &NewProgressRecord) -> Result<ProgressId, StorageError> {
        let child_id = id_to_i64("child_id", record.child_id.value())?;
        let sentence_id = id_to_i64("sentence_id", record.sentence_id.value())?;

        let mut tx = self.pool.begin().await.map_err(conn)?;

        let child = sqlx::query("SELECT 1 FROM children WHERE id = ?1")
            .bind(child_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(conn)?;
        if child.is_none() {
            return Err(StorageError::MissingReference("child"));
        }

        let sentence = sqlx::query("SELECT 1 FROM sentences WHERE id = ?1")
            .bind(sentence_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(conn)?;
        if sentence.is_none() {
            return Err(StorageError::MissingReference("sentence"));
        }

        let res = sqlx::query(
            r"
            INSERT INTO progress (
                child_id, sentence_id, is_completed, quiz_answer, is_correct, answered_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ",
        )
        .bind(child_id)
        .bind(sentence_id)
        .bind(record.is_completed)
        .bind(record.quiz_answer.map(|label| label.as_str()))
        .bind(record.is_correct)
        .bind(record.answered_at)
        .execute(&mut *tx)
        .await
        .map_err(conn)?;

        tx.commit().await.map_err(conn)?;

        progress_id_from_i64(res.last_insert_rowid())
    }

    async fn progress_for_child(
        &self,
        child_id: ChildId,
    ) -> Result<Vec<ProgressRecord>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, child_id, sentence_id, is_completed, quiz_answer, is_correct, answered_at
            FROM progress
            WHERE child_id = ?1
            ORDER BY answered_at ASC, id ASC
            ",
        )
        .bind(id_to_i64("child_id", child_id.value())?)
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(map_progress_row(&row)?);
        }
        Ok(out)
    }
}
