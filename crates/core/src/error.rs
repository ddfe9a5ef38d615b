use thiserror::Error;

use crate::checkpoint::CheckpointError;
use crate::mode::ModeError;
use crate::model::{LessonGraphError, ParseIdError};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    LessonGraph(#[from] LessonGraphError),
    #[error(transparent)]
    Checkpoint(#[from] CheckpointError),
    #[error(transparent)]
    Mode(#[from] ModeError),
    #[error(transparent)]
    ParseId(#[from] ParseIdError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkpoint::CheckpointTracker;
    use crate::model::{LessonGraph, LessonState, StoryId};

    fn first_checkpoint(raw_story: &str) -> Result<String, Error> {
        let _story: StoryId = raw_story.parse()?;
        let graph = LessonGraph::new("Intro", vec![LessonState::new("Intro").checkpoint()], &[])?;
        let mut tracker = CheckpointTracker::new();
        tracker.set_most_recently_reached_checkpoint(graph.init_state())?;
        Ok(tracker.most_recently_reached_checkpoint()?.to_owned())
    }

    #[test]
    fn domain_errors_convert() {
        assert_eq!(first_checkpoint("story").unwrap(), "Intro");
        assert!(matches!(first_checkpoint(" "), Err(Error::ParseId(_))));
    }
}
