use chrono::Utc;
use sqlx::SqlitePool;

use super::SqliteInitError;

const SCHEMA_V1: &[&str] = &[
    r"
        CREATE TABLE IF NOT EXISTS sentences (
            id INTEGER PRIMARY KEY,
            level TEXT NOT NULL CHECK (level IN ('Beginner', 'Intermediate', 'Advanced')),
            page INTEGER NOT NULL CHECK (page >= 1),
            text_en TEXT NOT NULL CHECK (length(trim(text_en)) > 0),
            text_tr TEXT NOT NULL DEFAULT '',
            UNIQUE (level, page)
        );
    ",
    r"
        CREATE TABLE IF NOT EXISTS questions (
            sentence_id INTEGER PRIMARY KEY,
            question TEXT NOT NULL,
            option_a TEXT NOT NULL,
            option_b TEXT NOT NULL,
            option_c TEXT NOT NULL,
            correct_opt TEXT NOT NULL CHECK (correct_opt IN ('A', 'B', 'C')),
            FOREIGN KEY (sentence_id) REFERENCES sentences(id) ON DELETE CASCADE
        );
    ",
    r"
        CREATE TABLE IF NOT EXISTS children (
            id INTEGER PRIMARY KEY,
            parent_email TEXT,
            name TEXT NOT NULL,
            level TEXT NOT NULL CHECK (level IN ('Beginner', 'Intermediate', 'Advanced')),
            created_at TEXT NOT NULL,
            UNIQUE (name, level)
        );
    ",
    r"
        CREATE TABLE IF NOT EXISTS progress (
            id INTEGER PRIMARY KEY,
            child_id INTEGER NOT NULL,
            sentence_id INTEGER NOT NULL,
            is_completed INTEGER NOT NULL CHECK (is_completed IN (0, 1)),
            quiz_answer TEXT CHECK (quiz_answer IS NULL OR quiz_answer IN ('A', 'B', 'C')),
            is_correct INTEGER CHECK (is_correct IS NULL OR is_correct IN (0, 1)),
            answered_at TEXT NOT NULL,
            FOREIGN KEY (child_id) REFERENCES children(id),
            FOREIGN KEY (sentence_id) REFERENCES sentences(id)
        );
    ",
    r"
        CREATE INDEX IF NOT EXISTS idx_progress_child_answered
            ON progress (child_id, answered_at, id);
    ",
];

/// Applies the schema once, tracked in `schema_migrations`.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), SqliteInitError> {
    async fn is_applied(pool: &SqlitePool, version: i64) -> Result<bool, sqlx::Error> {
        let row = sqlx::query("SELECT 1 FROM schema_migrations WHERE version = ?1")
            .bind(version)
            .fetch_optional(pool)
            .await?;
        Ok(row.is_some())
    }

    sqlx::query(
        r"
            CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL
            );
            ",
    )
    .execute(pool)
    .await?;

    // Version 1: content + learner tables.
    if !is_applied(pool, 1).await? {
        let mut tx = pool.begin().await?;

        for statement in SCHEMA_V1 {
            sqlx::query(*statement).execute(&mut *tx).await?;
        }

        sqlx::query(
            r"
                INSERT INTO schema_migrations (version, applied_at)
                VALUES (?1, ?2)
                ON CONFLICT(version) DO NOTHING
            ",
        )
        .bind(1_i64)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
    }

    Ok(())
}
