mod chapter;
mod checkpoint;
mod ids;
mod lesson;

pub use chapter::ChapterProgressSummary;
pub use checkpoint::{CheckpointIndexSet, CheckpointStatus};
pub use ids::{ExplorationId, ParseIdError, StoryId, Username};
pub use lesson::{LessonGraph, LessonGraphError, LessonState};
