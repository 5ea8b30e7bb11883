use chrono::{DateTime, Utc};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;
use story_core::model::{
    Child, ChildId, ChildName, Level, OptionLabel, Page, ProgressId, ProgressRecord, Question,
    Sentence, SentenceId,
};

use crate::repository::StorageError;

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn conn(e: sqlx::Error) -> StorageError {
    StorageError::Connection(e.to_string())
}

pub(crate) fn id_to_i64(field: &'static str, v: u64) -> Result<i64, StorageError> {
    i64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} overflow")))
}

fn i64_to_u64(field: &'static str, v: i64) -> Result<u64, StorageError> {
    u64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} sign overflow")))
}

pub(crate) fn sentence_id_from_i64(v: i64) -> Result<SentenceId, StorageError> {
    Ok(SentenceId::new(i64_to_u64("sentence_id", v)?))
}

pub(crate) fn child_id_from_i64(v: i64) -> Result<ChildId, StorageError> {
    Ok(ChildId::new(i64_to_u64("child_id", v)?))
}

pub(crate) fn progress_id_from_i64(v: i64) -> Result<ProgressId, StorageError> {
    Ok(ProgressId::new(i64_to_u64("progress_id", v)?))
}

pub(crate) fn page_from_i64(v: i64) -> Result<Page, StorageError> {
    let raw =
        u32::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid page: {v}")))?;
    Page::new(raw).map_err(ser)
}

pub(crate) fn parse_level(s: &str) -> Result<Level, StorageError> {
    s.parse::<Level>().map_err(ser)
}

pub(crate) fn parse_label(s: &str) -> Result<OptionLabel, StorageError> {
    s.parse::<OptionLabel>().map_err(ser)
}

pub(crate) fn map_sentence_row(row: &SqliteRow) -> Result<Sentence, StorageError> {
    let level: String = row.try_get("level").map_err(ser)?;
    Sentence::new(
        sentence_id_from_i64(row.try_get::<i64, _>("id").map_err(ser)?)?,
        parse_level(&level)?,
        page_from_i64(row.try_get::<i64, _>("page").map_err(ser)?)?,
        row.try_get::<String, _>("text_en").map_err(ser)?,
        row.try_get::<String, _>("text_tr").map_err(ser)?,
    )
    .map_err(ser)
}

pub(crate) fn map_question_row(row: &SqliteRow) -> Result<Question, StorageError> {
    let correct: String = row.try_get("correct_opt").map_err(ser)?;
    Question::new(
        sentence_id_from_i64(row.try_get::<i64, _>("sentence_id").map_err(ser)?)?,
        row.try_get::<String, _>("question").map_err(ser)?,
        [
            row.try_get::<String, _>("option_a").map_err(ser)?,
            row.try_get::<String, _>("option_b").map_err(ser)?,
            row.try_get::<String, _>("option_c").map_err(ser)?,
        ],
        parse_label(&correct)?,
    )
    .map_err(ser)
}

pub(crate) fn map_child_row(row: &SqliteRow) -> Result<Child, StorageError> {
    let level: String = row.try_get("level").map_err(ser)?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(ser)?;
    Ok(Child {
        id: child_id_from_i64(row.try_get::<i64, _>("id").map_err(ser)?)?,
        name: ChildName::parse(row.try_get::<String, _>("name").map_err(ser)?).map_err(ser)?,
        level: parse_level(&level)?,
        created_at,
        parent_email: row.try_get("parent_email").map_err(ser)?,
    })
}

pub(crate) fn map_progress_row(row: &SqliteRow) -> Result<ProgressRecord, StorageError> {
    let quiz_answer = row
        .try_get::<Option<String>, _>("quiz_answer")
        .map_err(ser)?
        .as_deref()
        .map(parse_label)
        .transpose()?;

    Ok(ProgressRecord {
        id: progress_id_from_i64(row.try_get::<i64, _>("id").map_err(ser)?)?,
        child_id: child_id_from_i64(row.try_get::<i64, _>("child_id").map_err(ser)?)?,
        sentence_id: sentence_id_from_i64(row.try_get::<i64, _>("sentence_id").map_err(ser)?)?,
        is_completed: row.try_get::<bool, _>("is_completed").map_err(ser)?,
        quiz_answer,
        is_correct: row.try_get::<Option<bool>, _>("is_correct").map_err(ser)?,
        answered_at: row.try_get("answered_at").map_err(ser)?,
    })
}
