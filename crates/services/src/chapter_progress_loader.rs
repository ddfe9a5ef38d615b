use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use lesson_core::model::{ChapterProgressSummary, ExplorationId, StoryId, Username};
use storage::repository::ChapterProgressRepository;
use tracing::{debug, error, info};

use crate::error::ProgressServiceError;

/// Cached lesson completion percentages keyed by exploration.
///
/// Each entry remembers the story it belongs to (when known) so a story can be
/// invalidated as a unit when fresh progress for it is loaded.
#[derive(Debug, Clone, Default)]
pub struct LessonProgressCache {
    values: HashMap<ExplorationId, i64>,
    owners: HashMap<ExplorationId, StoryId>,
}

impl LessonProgressCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, id: &ExplorationId) -> Option<i64> {
        self.values.get(id).copied()
    }

    pub fn insert(&mut self, id: ExplorationId, value: i64) {
        self.values.insert(id, value);
    }

    /// Associate an exploration with its story for later invalidation.
    pub fn assign_story(&mut self, id: ExplorationId, story_id: StoryId) {
        self.owners.insert(id, story_id);
    }

    /// Remove a single cached value.
    pub fn remove(&mut self, id: &ExplorationId) {
        self.values.remove(id);
    }

    /// Drop every cached value belonging to `story_id`. Returns how many were removed.
    pub fn invalidate_story(&mut self, story_id: &StoryId) -> usize {
        let ids: Vec<ExplorationId> = self
            .owners
            .iter()
            .filter(|(_, owner)| *owner == story_id)
            .map(|(id, _)| id.clone())
            .collect();
        let mut removed = 0;
        for id in &ids {
            self.owners.remove(id);
            if self.values.remove(id).is_some() {
                removed += 1;
            }
        }
        removed
    }

    #[must_use]
    pub fn values(&self) -> &HashMap<ExplorationId, i64> {
        &self.values
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Loads per-chapter checkpoint progress for stories and derives the
/// dashboard completion percentage of each lesson.
pub struct ChapterProgressLoader {
    repo: Arc<dyn ChapterProgressRepository>,
    cache: LessonProgressCache,
    summaries: HashMap<ExplorationId, ChapterProgressSummary>,
    story_chapters: HashMap<StoryId, Vec<ExplorationId>>,
    loaded_stories: HashSet<StoryId>,
}

impl ChapterProgressLoader {
    #[must_use]
    pub fn new(repo: Arc<dyn ChapterProgressRepository>) -> Self {
        Self {
            repo,
            cache: LessonProgressCache::new(),
            summaries: HashMap::new(),
            story_chapters: HashMap::new(),
            loaded_stories: HashSet::new(),
        }
    }

    /// Fetch and remember chapter progress for a story.
    ///
    /// Summaries are paired with `exploration_ids` by chapter position; any
    /// summaries beyond the given ids are ignored. Stories already loaded are
    /// skipped. Loading a story clears cached percentages of its lessons.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::NotLoggedIn` without a username (a blank
    /// one counts as missing), or a storage error if the fetch fails.
    pub async fn load_story(
        &mut self,
        username: Option<&Username>,
        story_id: &StoryId,
        exploration_ids: &[ExplorationId],
    ) -> Result<(), ProgressServiceError> {
        if self.loaded_stories.contains(story_id) {
            debug!(story_id = %story_id, "chapter progress already loaded");
            return Ok(());
        }

        let Some(username) = username.filter(|name| !name.as_str().trim().is_empty()) else {
            error!(story_id = %story_id, "cannot load chapter progress: user not logged in");
            return Err(ProgressServiceError::NotLoggedIn);
        };

        let summaries = self
            .repo
            .fetch_story_progress(username, story_id)
            .await
            .inspect_err(|err| {
                error!(story_id = %story_id, error = %err, "error loading chapter progress");
            })?;

        self.cache.invalidate_story(story_id);
        let mut chapters = Vec::with_capacity(exploration_ids.len());
        for (exploration_id, summary) in exploration_ids.iter().zip(summaries) {
            self.cache.remove(exploration_id);
            self.cache
                .assign_story(exploration_id.clone(), story_id.clone());
            self.summaries.insert(exploration_id.clone(), summary);
            chapters.push(exploration_id.clone());
        }
        self.story_chapters.insert(story_id.clone(), chapters);
        self.loaded_stories.insert(story_id.clone());

        info!(
            story_id = %story_id,
            chapters = exploration_ids.len(),
            "loaded chapter progress"
        );
        Ok(())
    }

    /// Forget everything known about a story so the next load refetches it.
    pub fn invalidate_story(&mut self, story_id: &StoryId) {
        let removed = self.cache.invalidate_story(story_id);
        for exploration_id in self.story_chapters.remove(story_id).unwrap_or_default() {
            self.summaries.remove(&exploration_id);
        }
        self.loaded_stories.remove(story_id);
        debug!(story_id = %story_id, removed, "invalidated story progress");
    }

    /// Drop cached state for a story and load it again.
    ///
    /// # Errors
    ///
    /// Same as [`ChapterProgressLoader::load_story`].
    pub async fn reload_story(
        &mut self,
        username: Option<&Username>,
        story_id: &StoryId,
        exploration_ids: &[ExplorationId],
    ) -> Result<(), ProgressServiceError> {
        self.invalidate_story(story_id);
        self.load_story(username, story_id, exploration_ids).await
    }

    #[must_use]
    pub fn chapter_progress_summary(&self, id: &ExplorationId) -> Option<ChapterProgressSummary> {
        self.summaries.get(id).copied()
    }

    /// Completion percentage of a lesson, computed once and then cached.
    ///
    /// Lessons without loaded progress report zero and are not cached.
    pub fn compute_lesson_progress(&mut self, id: &ExplorationId) -> i64 {
        if let Some(value) = self.cache.get(id) {
            return value;
        }

        let Some(summary) = self.summaries.get(id) else {
            debug!(exploration_id = %id, "no chapter progress loaded for lesson");
            return 0;
        };
        let progress = summary.completion_percentage();
        self.cache.insert(id.clone(), progress);
        progress
    }

    /// Previously computed percentage, or zero.
    #[must_use]
    pub fn lesson_progress(&self, id: &ExplorationId) -> i64 {
        self.cache.get(id).unwrap_or(0)
    }

    #[must_use]
    pub fn all_progress(&self) -> &HashMap<ExplorationId, i64> {
        self.cache.values()
    }

    #[must_use]
    pub fn is_chapter_completed(&self, id: &ExplorationId) -> bool {
        self.summaries
            .get(id)
            .is_some_and(|summary| summary.is_chapter_complete)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::repository::InMemoryRepository;

    fn ids(raw: &[&str]) -> Vec<ExplorationId> {
        raw.iter().map(|id| ExplorationId::new(*id)).collect()
    }

    async fn seeded_repo() -> InMemoryRepository {
        let repo = InMemoryRepository::new();
        let learner = Username::new("learner");
        let story = StoryId::new("story_1");
        repo.upsert_chapter_progress(&learner, &story, 0, ChapterProgressSummary::new(4, 4, true))
            .await
            .unwrap();
        repo.upsert_chapter_progress(&learner, &story, 1, ChapterProgressSummary::new(5, 3, false))
            .await
            .unwrap();
        repo.upsert_chapter_progress(&learner, &story, 2, ChapterProgressSummary::new(0, 1, false))
            .await
            .unwrap();
        repo
    }

    #[test]
    fn cache_invalidates_only_its_story() {
        let mut cache = LessonProgressCache::new();
        cache.assign_story(ExplorationId::new("a"), StoryId::new("s1"));
        cache.assign_story(ExplorationId::new("b"), StoryId::new("s2"));
        cache.insert(ExplorationId::new("a"), 10);
        cache.insert(ExplorationId::new("b"), 20);
        cache.insert(ExplorationId::new("loose"), 30);

        assert_eq!(cache.invalidate_story(&StoryId::new("s1")), 1);
        assert_eq!(cache.get(&ExplorationId::new("a")), None);
        assert_eq!(cache.get(&ExplorationId::new("b")), Some(20));
        assert_eq!(cache.get(&ExplorationId::new("loose")), Some(30));
    }

    #[tokio::test]
    async fn computes_percentages_from_loaded_story() {
        let repo = seeded_repo().await;
        let mut loader = ChapterProgressLoader::new(Arc::new(repo));
        let chapters = ids(&["exp_a", "exp_b", "exp_c"]);
        loader
            .load_story(
                Some(&Username::new("learner")),
                &StoryId::new("story_1"),
                &chapters,
            )
            .await
            .unwrap();

        assert_eq!(loader.compute_lesson_progress(&chapters[0]), 100);
        assert_eq!(loader.compute_lesson_progress(&chapters[1]), 40);
        assert_eq!(loader.compute_lesson_progress(&chapters[2]), 0);
        assert!(loader.is_chapter_completed(&chapters[0]));
        assert!(!loader.is_chapter_completed(&chapters[1]));
        assert_eq!(loader.all_progress().len(), 3);
    }

    #[tokio::test]
    async fn unknown_lesson_is_zero_and_not_cached() {
        let mut loader = ChapterProgressLoader::new(Arc::new(InMemoryRepository::new()));
        for raw in ["missing_1", "missing_2", "missing_1"] {
            let id = ExplorationId::new(raw);
            assert_eq!(loader.lesson_progress(&id), 0);
            assert_eq!(loader.compute_lesson_progress(&id), 0);
            assert_eq!(loader.chapter_progress_summary(&id), None);
        }
        assert!(loader.all_progress().is_empty());
    }

    #[tokio::test]
    async fn extra_summaries_are_ignored() {
        let repo = seeded_repo().await;
        let mut loader = ChapterProgressLoader::new(Arc::new(repo));
        let chapters = ids(&["exp_a"]);
        loader
            .load_story(
                Some(&Username::new("learner")),
                &StoryId::new("story_1"),
                &chapters,
            )
            .await
            .unwrap();
        assert!(loader.chapter_progress_summary(&chapters[0]).is_some());
        assert!(
            loader
                .chapter_progress_summary(&ExplorationId::new("exp_b"))
                .is_none()
        );
    }

    #[tokio::test]
    async fn missing_user_loads_nothing() {
        let repo = seeded_repo().await;
        let mut loader = ChapterProgressLoader::new(Arc::new(repo));
        let chapters = ids(&["exp_a"]);
        let err = loader
            .load_story(None, &StoryId::new("story_1"), &chapters)
            .await
            .unwrap_err();
        assert!(matches!(err, ProgressServiceError::NotLoggedIn));
        assert!(loader.chapter_progress_summary(&chapters[0]).is_none());
    }

    #[tokio::test]
    async fn blank_user_is_not_logged_in() {
        let repo = seeded_repo().await;
        repo.upsert_chapter_progress(
            &Username::new(" "),
            &StoryId::new("story_1"),
            0,
            ChapterProgressSummary::new(2, 2, true),
        )
        .await
        .unwrap();
        let mut loader = ChapterProgressLoader::new(Arc::new(repo));
        let chapters = ids(&["exp_a"]);
        for blank in ["", " ", "\t"] {
            let err = loader
                .load_story(Some(&Username::new(blank)), &StoryId::new("story_1"), &chapters)
                .await
                .unwrap_err();
            assert!(matches!(err, ProgressServiceError::NotLoggedIn));
        }
        assert!(loader.chapter_progress_summary(&chapters[0]).is_none());
    }

    #[tokio::test]
    async fn second_load_is_skipped_until_invalidated() {
        let repo = seeded_repo().await;
        let learner = Username::new("learner");
        let story = StoryId::new("story_1");
        let mut loader = ChapterProgressLoader::new(Arc::new(repo.clone()));
        let chapters = ids(&["exp_a", "exp_b"]);

        loader
            .load_story(Some(&learner), &story, &chapters)
            .await
            .unwrap();
        assert_eq!(loader.compute_lesson_progress(&chapters[1]), 40);

        repo.upsert_chapter_progress(&learner, &story, 1, ChapterProgressSummary::new(5, 5, false))
            .await
            .unwrap();
        loader
            .load_story(Some(&learner), &story, &chapters)
            .await
            .unwrap();
        assert_eq!(loader.compute_lesson_progress(&chapters[1]), 40);

        loader
            .reload_story(Some(&learner), &story, &chapters)
            .await
            .unwrap();
        assert_eq!(loader.compute_lesson_progress(&chapters[1]), 80);
    }

    #[tokio::test]
    async fn loading_clears_values_computed_before_load() {
        let repo = seeded_repo().await;
        let mut loader = ChapterProgressLoader::new(Arc::new(repo));
        let chapters = ids(&["exp_a"]);

        assert_eq!(loader.compute_lesson_progress(&chapters[0]), 0);
        loader
            .load_story(
                Some(&Username::new("learner")),
                &StoryId::new("story_1"),
                &chapters,
            )
            .await
            .unwrap();
        assert_eq!(loader.compute_lesson_progress(&chapters[0]), 100);
    }

    #[tokio::test]
    async fn invalidation_forgets_summaries() {
        let repo = seeded_repo().await;
        let mut loader = ChapterProgressLoader::new(Arc::new(repo));
        let story = StoryId::new("story_1");
        let chapters = ids(&["exp_a"]);
        loader
            .load_story(Some(&Username::new("learner")), &story, &chapters)
            .await
            .unwrap();
        assert!(loader.is_chapter_completed(&chapters[0]));

        loader.invalidate_story(&story);
        assert!(!loader.is_chapter_completed(&chapters[0]));
        assert_eq!(loader.compute_lesson_progress(&chapters[0]), 0);
    }
}
