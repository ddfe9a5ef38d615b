use lesson_core::Clock;
use lesson_core::chapter_label::{ChapterListing, is_new_chapter_label_visible};

use crate::config::ProgressConfig;

/// Decides whether story chapters get the "new" badge.
#[derive(Debug, Clone, Copy)]
pub struct ChapterLabelService {
    clock: Clock,
    window_days: u32,
}

impl ChapterLabelService {
    #[must_use]
    pub fn new(clock: Clock, config: &ProgressConfig) -> Self {
        Self {
            clock,
            window_days: config.new_chapter_window_days,
        }
    }

    #[must_use]
    pub fn is_new_chapter_label_visible<S: AsRef<str>>(
        &self,
        chapter: &ChapterListing,
        visited_chapter_titles: &[S],
    ) -> bool {
        is_new_chapter_label_visible(
            chapter,
            visited_chapter_titles,
            self.clock.now(),
            self.window_days,
        )
    }
}
