use async_trait::async_trait;
use chrono::Utc;
use lesson_core::model::{ChapterProgressSummary, StoryId, Username};
use sqlx::Row;

use super::SqliteRepository;
use super::mapping::{map_chapter_row, ser, u32_from_i64};
use crate::repository::{ChapterProgressRepository, LearnerProgressRepository, StorageError};

#[async_trait]
impl ChapterProgressRepository for SqliteRepository {
    async fn fetch_story_progress(
        &self,
        username: &Username,
        story_id: &StoryId,
    ) -> Result<Vec<ChapterProgressSummary>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT total_checkpoints, visited_checkpoints, is_chapter_complete
            FROM chapter_progress
            WHERE username = ?1 AND story_id = ?2
            ORDER BY position ASC
            ",
        )
        .bind(username.as_str())
        .bind(story_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        rows.iter().map(map_chapter_row).collect()
    }

    async fn upsert_chapter_progress(
        &self,
        username: &Username,
        story_id: &StoryId,
        position: u32,
        summary: ChapterProgressSummary,
    ) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO chapter_progress (
                username,
                story_id,
                position,
                total_checkpoints,
                visited_checkpoints,
                is_chapter_complete,
                updated_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ON CONFLICT(username, story_id, position) DO UPDATE SET
                total_checkpoints = excluded.total_checkpoints,
                visited_checkpoints = excluded.visited_checkpoints,
                is_chapter_complete = excluded.is_chapter_complete,
                updated_at = excluded.updated_at
            ",
        )
        .bind(username.as_str())
        .bind(story_id.as_str())
        .bind(i64::from(position))
        .bind(i64::from(summary.total_checkpoints))
        .bind(i64::from(summary.visited_checkpoints))
        .bind(summary.is_chapter_complete)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(())
    }
}

#[async_trait]
impl LearnerProgressRepository for SqliteRepository {
    async fn completed_chapters_count(&self, username: &Username) -> Result<u32, StorageError> {
        let row = sqlx::query(
            r"
            SELECT completed_chapters_count
            FROM learner_progress
            WHERE username = ?1
            ",
        )
        .bind(username.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let Some(row) = row else {
            return Ok(0);
        };
        let count: i64 = row.try_get("completed_chapters_count").map_err(ser)?;
        u32_from_i64("completed_chapters_count", count)
    }

    async fn set_completed_chapters_count(
        &self,
        username: &Username,
        count: u32,
    ) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO learner_progress (username, completed_chapters_count, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(username) DO UPDATE SET
                completed_chapters_count = excluded.completed_chapters_count,
                updated_at = excluded.updated_at
            ",
        )
        .bind(username.as_str())
        .bind(i64::from(count))
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(())
    }
}
