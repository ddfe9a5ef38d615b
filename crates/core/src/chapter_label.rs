//! "New chapter" badge visibility.

use chrono::{DateTime, Duration, Utc};

/// Days a freshly published chapter keeps its "new" label.
pub const DEFAULT_NEW_CHAPTER_WINDOW_DAYS: u32 = 28;

/// Publication facts about one chapter of a story.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterListing {
    pub title: String,
    pub first_published_at: Option<DateTime<Utc>>,
}

/// The label shows while the chapter is younger than `window_days` and the
/// learner has not visited it. Unpublished chapters never show it.
#[must_use]
pub fn is_new_chapter_label_visible<S: AsRef<str>>(
    chapter: &ChapterListing,
    visited_chapter_titles: &[S],
    now: DateTime<Utc>,
    window_days: u32,
) -> bool {
    let Some(published_at) = chapter.first_published_at else {
        return false;
    };
    let recently_published = now - published_at < Duration::days(i64::from(window_days));
    let unvisited = !visited_chapter_titles
        .iter()
        .any(|title| title.as_ref() == chapter.title);
    recently_published && unvisited
}
