use std::sync::Arc;

use lesson_core::model::Username;
use storage::repository::LearnerProgressRepository;
use tracing::info;

use crate::error::ProgressServiceError;

/// Keeps the learner's completed-chapter count and notices first completions.
pub struct ChapterCompletionTracker {
    repo: Arc<dyn LearnerProgressRepository>,
    completed_chapters_count: Option<u32>,
    completed_for_first_time: bool,
}

impl ChapterCompletionTracker {
    #[must_use]
    pub fn new(repo: Arc<dyn LearnerProgressRepository>) -> Self {
        Self {
            repo,
            completed_chapters_count: None,
            completed_for_first_time: false,
        }
    }

    /// Refetch the completed-chapter count.
    ///
    /// With `check_for_first_time_completion`, any change from the previously
    /// known count (including having no previous count) flags the chapter as
    /// completed for the first time.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if the count cannot be read.
    pub async fn refresh_completed_chapters_count(
        &mut self,
        username: &Username,
        check_for_first_time_completion: bool,
    ) -> Result<u32, ProgressServiceError> {
        let new_count = self.repo.completed_chapters_count(username).await?;

        if check_for_first_time_completion && self.completed_chapters_count != Some(new_count) {
            self.completed_for_first_time = true;
            info!(username = %username, count = new_count, "chapter completed for the first time");
        }

        self.completed_chapters_count = Some(new_count);
        Ok(new_count)
    }

    #[must_use]
    pub fn completed_chapters_count(&self) -> Option<u32> {
        self.completed_chapters_count
    }

    pub fn set_completed_chapters_count(&mut self, count: u32) {
        self.completed_chapters_count = Some(count);
    }

    #[must_use]
    pub fn chapter_completed_for_first_time(&self) -> bool {
        self.completed_for_first_time
    }

    pub fn set_chapter_completed_for_first_time(&mut self, completed: bool) {
        self.completed_for_first_time = completed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::repository::InMemoryRepository;

    #[tokio::test]
    async fn unchanged_count_is_not_a_first_completion() {
        let repo = InMemoryRepository::new();
        let learner = Username::new("learner");
        repo.set_completed_chapters_count(&learner, 2).await.unwrap();

        let mut tracker = ChapterCompletionTracker::new(Arc::new(repo));
        tracker.set_completed_chapters_count(2);
        let count = tracker
            .refresh_completed_chapters_count(&learner, true)
            .await
            .unwrap();
        assert_eq!(count, 2);
        assert!(!tracker.chapter_completed_for_first_time());
    }

    #[tokio::test]
    async fn changed_count_flags_first_completion() {
        let repo = InMemoryRepository::new();
        let learner = Username::new("learner");
        let mut tracker = ChapterCompletionTracker::new(Arc::new(repo.clone()));
        tracker
            .refresh_completed_chapters_count(&learner, false)
            .await
            .unwrap();
        assert!(!tracker.chapter_completed_for_first_time());

        repo.set_completed_chapters_count(&learner, 1).await.unwrap();
        tracker
            .refresh_completed_chapters_count(&learner, true)
            .await
            .unwrap();
        assert!(tracker.chapter_completed_for_first_time());
        assert_eq!(tracker.completed_chapters_count(), Some(1));

        tracker.set_chapter_completed_for_first_time(false);
        assert!(!tracker.chapter_completed_for_first_time());
    }

    #[tokio::test]
    async fn first_fetch_with_check_counts_as_change() {
        let mut tracker = ChapterCompletionTracker::new(Arc::new(InMemoryRepository::new()));
        tracker
            .refresh_completed_chapters_count(&Username::new("learner"), true)
            .await
            .unwrap();
        assert!(tracker.chapter_completed_for_first_time());
    }
}
