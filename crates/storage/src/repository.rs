use async_trait::async_trait;
use lesson_core::model::{ChapterProgressSummary, StoryId, Username};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Per-chapter checkpoint progress of learners, grouped by story.
#[async_trait]
pub trait ChapterProgressRepository: Send + Sync {
    /// Fetch a learner's progress for every chapter of a story, in chapter order.
    ///
    /// Stories the learner never started yield an empty list.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be queried.
    async fn fetch_story_progress(
        &self,
        username: &Username,
        story_id: &StoryId,
    ) -> Result<Vec<ChapterProgressSummary>, StorageError>;

    /// Persist or update progress for the chapter at `position` within a story.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be stored.
    async fn upsert_chapter_progress(
        &self,
        username: &Username,
        story_id: &StoryId,
        position: u32,
        summary: ChapterProgressSummary,
    ) -> Result<(), StorageError>;
}

/// Aggregate learner counters shown on the dashboard.
#[async_trait]
pub trait LearnerProgressRepository: Send + Sync {
    /// Number of chapters the learner has completed; zero for unknown learners.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be queried.
    async fn completed_chapters_count(&self, username: &Username) -> Result<u32, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` if the count cannot be stored.
    async fn set_completed_chapters_count(
        &self,
        username: &Username,
        count: u32,
    ) -> Result<(), StorageError>;
}

type StoryKey = (Username, StoryId);

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    chapters: Arc<Mutex<HashMap<StoryKey, BTreeMap<u32, ChapterProgressSummary>>>>,
    completed: Arc<Mutex<HashMap<Username, u32>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ChapterProgressRepository for InMemoryRepository {
    async fn fetch_story_progress(
        &self,
        username: &Username,
        story_id: &StoryId,
    ) -> Result<Vec<ChapterProgressSummary>, StorageError> {
        let guard = self
            .chapters
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let key = (username.clone(), story_id.clone());
        Ok(guard
            .get(&key)
            .map(|chapters| chapters.values().copied().collect())
            .unwrap_or_default())
    }

    async fn upsert_chapter_progress(
        &self,
        username: &Username,
        story_id: &StoryId,
        position: u32,
        summary: ChapterProgressSummary,
    ) -> Result<(), StorageError> {
        let mut guard = self
            .chapters
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard
            .entry((username.clone(), story_id.clone()))
            .or_default()
            .insert(position, summary);
        Ok(())
    }
}

#[async_trait]
impl LearnerProgressRepository for InMemoryRepository {
    async fn completed_chapters_count(&self, username: &Username) -> Result<u32, StorageError> {
        let guard = self
            .completed
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(username).copied().unwrap_or(0))
    }

    async fn set_completed_chapters_count(
        &self,
        username: &Username,
        count: u32,
    ) -> Result<(), StorageError> {
        let mut guard = self
            .completed
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(username.clone(), count);
        Ok(())
    }
}

/// Aggregates progress repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub chapter_progress: Arc<dyn ChapterProgressRepository>,
    pub learner_progress: Arc<dyn LearnerProgressRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let chapter_progress: Arc<dyn ChapterProgressRepository> = Arc::new(repo.clone());
        let learner_progress: Arc<dyn LearnerProgressRepository> = Arc::new(repo);
        Self {
            chapter_progress,
            learner_progress,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn learner() -> Username {
        Username::new("learner")
    }

    #[tokio::test]
    async fn story_progress_is_returned_in_chapter_order() {
        let repo = InMemoryRepository::new();
        let story = StoryId::new("story_1");
        repo.upsert_chapter_progress(&learner(), &story, 2, ChapterProgressSummary::new(3, 1, false))
            .await
            .unwrap();
        repo.upsert_chapter_progress(&learner(), &story, 0, ChapterProgressSummary::new(4, 4, true))
            .await
            .unwrap();
        repo.upsert_chapter_progress(&learner(), &story, 1, ChapterProgressSummary::new(5, 3, false))
            .await
            .unwrap();

        let chapters = repo.fetch_story_progress(&learner(), &story).await.unwrap();
        assert_eq!(
            chapters,
            vec![
                ChapterProgressSummary::new(4, 4, true),
                ChapterProgressSummary::new(5, 3, false),
                ChapterProgressSummary::new(3, 1, false),
            ]
        );
    }

    #[tokio::test]
    async fn unknown_story_is_empty() {
        let repo = InMemoryRepository::new();
        let chapters = repo
            .fetch_story_progress(&learner(), &StoryId::new("nope"))
            .await
            .unwrap();
        assert!(chapters.is_empty());
    }

    #[tokio::test]
    async fn upsert_replaces_existing_chapter() {
        let repo = InMemoryRepository::new();
        let story = StoryId::new("story_1");
        repo.upsert_chapter_progress(&learner(), &story, 0, ChapterProgressSummary::new(4, 1, false))
            .await
            .unwrap();
        repo.upsert_chapter_progress(&learner(), &story, 0, ChapterProgressSummary::new(4, 2, false))
            .await
            .unwrap();
        let chapters = repo.fetch_story_progress(&learner(), &story).await.unwrap();
        assert_eq!(chapters, vec![ChapterProgressSummary::new(4, 2, false)]);
    }

    #[tokio::test]
    async fn completed_count_defaults_to_zero() {
        let storage = Storage::in_memory();
        let count = storage
            .learner_progress
            .completed_chapters_count(&learner())
            .await
            .unwrap();
        assert_eq!(count, 0);

        storage
            .learner_progress
            .set_completed_chapters_count(&learner(), 7)
            .await
            .unwrap();
        let count = storage
            .learner_progress
            .completed_chapters_count(&learner())
            .await
            .unwrap();
        assert_eq!(count, 7);
    }
}
