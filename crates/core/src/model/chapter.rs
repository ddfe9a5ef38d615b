use serde::{Deserialize, Serialize};

/// Learner progress through one chapter, as reported by the progress backend.
///
/// `visited_checkpoints` includes the initial checkpoint, so a learner who has
/// just opened the chapter reports one visited checkpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterProgressSummary {
    pub total_checkpoints: u32,
    pub visited_checkpoints: u32,
    pub is_chapter_complete: bool,
}

impl ChapterProgressSummary {
    #[must_use]
    pub fn new(total_checkpoints: u32, visited_checkpoints: u32, is_chapter_complete: bool) -> Self {
        Self {
            total_checkpoints,
            visited_checkpoints,
            is_chapter_complete,
        }
    }

    /// Ratio-based completion percentage for dashboard summaries.
    #[must_use]
    pub fn completion_percentage(&self) -> i64 {
        crate::progress::compute_lesson_completion_percentage(
            i64::from(self.total_checkpoints),
            i64::from(self.visited_checkpoints),
            self.is_chapter_complete,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completion_percentage_excludes_initial_checkpoint() {
        let summary = ChapterProgressSummary::new(5, 3, false);
        assert_eq!(summary.completion_percentage(), 40);
    }

    #[test]
    fn deserializes_from_backend_shape() {
        let summary: ChapterProgressSummary = serde_json::from_str(
            r#"{"total_checkpoints":4,"visited_checkpoints":2,"is_chapter_complete":false}"#,
        )
        .unwrap();
        assert_eq!(summary, ChapterProgressSummary::new(4, 2, false));
    }
}
