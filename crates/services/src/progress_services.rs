use lesson_core::Clock;
use storage::repository::Storage;

use crate::chapter_completion::ChapterCompletionTracker;
use crate::chapter_label_service::ChapterLabelService;
use crate::chapter_progress_loader::ChapterProgressLoader;
use crate::config::ProgressConfig;
use crate::error::ProgressServicesError;

/// Assembles the learner-facing progress services over one storage backend.
pub struct ProgressServices {
    pub chapter_progress: ChapterProgressLoader,
    pub chapter_completion: ChapterCompletionTracker,
    pub chapter_labels: ChapterLabelService,
}

impl ProgressServices {
    #[must_use]
    pub fn new(storage: &Storage, clock: Clock, config: &ProgressConfig) -> Self {
        Self {
            chapter_progress: ChapterProgressLoader::new(storage.chapter_progress.clone()),
            chapter_completion: ChapterCompletionTracker::new(storage.learner_progress.clone()),
            chapter_labels: ChapterLabelService::new(clock, config),
        }
    }

    /// Build services backed by `SQLite` at `config.db_url`.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServicesError` if storage initialization fails.
    pub async fn new_sqlite(
        config: &ProgressConfig,
        clock: Clock,
    ) -> Result<Self, ProgressServicesError> {
        let storage = Storage::sqlite(&config.db_url).await?;
        Ok(Self::new(&storage, clock, config))
    }

    /// Read configuration from the environment and open its database.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServicesError` for bad configuration or storage failures.
    pub async fn from_env(clock: Clock) -> Result<Self, ProgressServicesError> {
        let config = ProgressConfig::from_env()?;
        tracing::info!(db_url = %config.db_url, "starting progress services");
        Self::new_sqlite(&config, clock).await
    }
}
