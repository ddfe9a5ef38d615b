//! Tracking of checkpoints reached during a single lesson playthrough.

use thiserror::Error;

use crate::model::LessonGraph;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CheckpointError {
    #[error("checkpoint state name cannot be empty")]
    EmptyStateName,
    #[error("last completed checkpoint is not set")]
    NotSet,
    #[error("no checkpoints have been visited yet")]
    NoneVisited,
}

/// Checkpoints the learner has reached in the current playthrough.
#[derive(Debug, Clone, Default)]
pub struct CheckpointTracker {
    most_recently_reached: Option<String>,
    visited: Vec<String>,
}

impl CheckpointTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the checkpoint state the learner most recently reached.
    ///
    /// # Errors
    ///
    /// Returns `CheckpointError::EmptyStateName` for a blank name.
    pub fn set_most_recently_reached_checkpoint(
        &mut self,
        state_name: &str,
    ) -> Result<(), CheckpointError> {
        let name = non_blank(state_name)?;
        self.most_recently_reached = Some(name.to_owned());
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `CheckpointError::NotSet` before any checkpoint was recorded.
    pub fn most_recently_reached_checkpoint(&self) -> Result<&str, CheckpointError> {
        self.most_recently_reached
            .as_deref()
            .ok_or(CheckpointError::NotSet)
    }

    /// Add a checkpoint to the visited list; repeats are ignored.
    ///
    /// # Errors
    ///
    /// Returns `CheckpointError::EmptyStateName` for a blank name.
    pub fn mark_visited(&mut self, state_name: &str) -> Result<(), CheckpointError> {
        let name = non_blank(state_name)?;
        if !self.visited.iter().any(|visited| visited == name) {
            self.visited.push(name.to_owned());
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `CheckpointError::EmptyStateName` for a blank name.
    pub fn is_visited(&self, state_name: &str) -> Result<bool, CheckpointError> {
        let name = non_blank(state_name)?;
        Ok(self.visited.iter().any(|visited| visited == name))
    }

    /// Visited checkpoint names in the order they were first reached.
    ///
    /// # Errors
    ///
    /// Returns `CheckpointError::NoneVisited` when the list is empty.
    pub fn visited_checkpoint_names(&self) -> Result<&[String], CheckpointError> {
        if self.visited.is_empty() {
            return Err(CheckpointError::NoneVisited);
        }
        Ok(&self.visited)
    }

    pub fn reset_visited(&mut self) {
        self.visited.clear();
    }
}

/// Number of checkpoint cards in the learner's transcript.
///
/// `transcript` lists the state names of the cards shown so far, in order.
/// Unknown state names are not checkpoints.
#[must_use]
pub fn most_recently_reached_checkpoint_index<S: AsRef<str>>(
    transcript: &[S],
    graph: &LessonGraph,
) -> usize {
    transcript
        .iter()
        .filter(|name| graph.is_checkpoint(name.as_ref()))
        .count()
}

fn non_blank(state_name: &str) -> Result<&str, CheckpointError> {
    if state_name.trim().is_empty() {
        return Err(CheckpointError::EmptyStateName);
    }
    Ok(state_name)
}
