use lesson_core::model::{CheckpointIndexSet, CheckpointStatus, LessonGraph};
use lesson_core::progress::{
    compute_checkpoint_statuses, compute_progress_percentage, terminal_slot_completed,
};
use tracing::{debug, info};

/// Snapshot of the learner's place in the lesson, taken whenever the active
/// card changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerPosition {
    pub displayed_card_index: i64,
    pub is_terminal: bool,
    /// Checkpoint cards seen so far in the transcript.
    pub most_recently_reached_checkpoint_index: usize,
}

/// State behind the in-lesson checkpoint progress bar.
#[derive(Debug, Clone)]
pub struct CheckpointBar {
    checkpoint_indexes: CheckpointIndexSet,
    checkpoint_count: usize,
    max_depth: i64,
    completed_count: usize,
    ended: bool,
    statuses: Vec<CheckpointStatus>,
    progress: f64,
}

impl CheckpointBar {
    #[must_use]
    pub fn new(graph: &LessonGraph) -> Self {
        Self::from_parts(
            graph.checkpoint_indexes(),
            graph.checkpoint_count(),
            graph.max_depth(),
        )
    }

    #[must_use]
    pub fn from_parts(
        checkpoint_indexes: CheckpointIndexSet,
        checkpoint_count: usize,
        max_depth: i64,
    ) -> Self {
        Self {
            checkpoint_indexes,
            checkpoint_count,
            max_depth,
            completed_count: 0,
            ended: false,
            statuses: compute_checkpoint_statuses(checkpoint_count, 0, false),
            progress: 0.0,
        }
    }

    /// Recompute the bar for a new position.
    ///
    /// Once the terminal card has been reached the completed count is frozen,
    /// so navigating back through earlier cards keeps the lesson finished.
    pub fn update(&mut self, position: PlayerPosition) {
        self.progress = compute_progress_percentage(
            self.checkpoint_indexes.as_slice(),
            self.checkpoint_count,
            position.displayed_card_index,
            position.is_terminal,
            self.max_depth,
        );

        let reached_end =
            terminal_slot_completed(position.is_terminal, position.displayed_card_index);
        if !self.ended {
            self.completed_count = position
                .most_recently_reached_checkpoint_index
                .saturating_sub(1);
            if reached_end {
                self.completed_count += 1;
                self.ended = true;
                info!(
                    checkpoints = self.checkpoint_count,
                    "lesson reached its terminal state"
                );
            }
        }

        self.statuses =
            compute_checkpoint_statuses(self.checkpoint_count, self.completed_count, reached_end);
        debug!(
            card = position.displayed_card_index,
            progress = self.progress,
            completed = self.completed_count,
            "checkpoint bar updated"
        );
    }

    /// Latest bar width in percent; `NaN` when the lesson has no checkpoints.
    #[must_use]
    pub fn progress_percentage(&self) -> f64 {
        self.progress
    }

    #[must_use]
    pub fn statuses(&self) -> &[CheckpointStatus] {
        &self.statuses
    }

    #[must_use]
    pub fn has_ended(&self) -> bool {
        self.ended
    }

    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.completed_count
    }

    /// Card index to jump back to for a completed checkpoint.
    #[must_use]
    pub fn return_target(&self, checkpoint_number: usize) -> Option<i64> {
        match self.statuses.get(checkpoint_number) {
            Some(CheckpointStatus::Completed) => self.checkpoint_indexes.get(checkpoint_number),
            _ => None,
        }
    }
}
