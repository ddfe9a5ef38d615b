use chrono::Utc;
use sqlx::SqlitePool;

use super::SqliteInitError;

/// Runs the versioned migrations for the learner progress schema.
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

    // Version 1: chapter progress and learner counters.
    if !is_applied(pool, 1).await? {
        let mut tx = pool.begin().await?;

        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS chapter_progress (
                    username TEXT NOT NULL,
                    story_id TEXT NOT NULL,
                    position INTEGER NOT NULL CHECK (position >= 0),
                    total_checkpoints INTEGER NOT NULL CHECK (total_checkpoints >= 0),
                    visited_checkpoints INTEGER NOT NULL CHECK (visited_checkpoints >= 0),
                    is_chapter_complete INTEGER NOT NULL CHECK (is_chapter_complete IN (0, 1)),
                    updated_at TEXT NOT NULL,
                    PRIMARY KEY (username, story_id, position)
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS learner_progress (
                    username TEXT PRIMARY KEY,
                    completed_chapters_count INTEGER NOT NULL
                        CHECK (completed_chapters_count >= 0),
                    updated_at TEXT NOT NULL
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

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
        tracing::info!(version = 1, "applied progress schema migration");
    }

    Ok(())
}
