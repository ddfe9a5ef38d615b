//! Lesson progress arithmetic.
//!
//! Two independent measures live here:
//!
//! - [`compute_progress_percentage`] interpolates the learner's position between
//!   checkpoints and drives the in-lesson progress bar.
//! - [`compute_lesson_completion_percentage`] is the coarser ratio of visited
//!   checkpoints used for cross-lesson summaries.
//!
//! None of these functions fail. Degenerate input produces `NaN`, negative, or
//! over-100 values which callers must check before rendering.

use crate::model::CheckpointStatus;

/// Percentage of the lesson completed at `current_position`.
///
/// Each checkpoint owns an equal share (`100 / checkpoint_count`) of the bar;
/// within a share the learner's position is linearly interpolated between the
/// checkpoint and the next one (or `max_depth` after the last checkpoint).
///
/// Returns `NaN` when `checkpoint_count` is zero. Being exactly at the first
/// checkpoint always yields `0.0`, even for a terminal state; otherwise a
/// terminal state yields `100.0`. Results are not clamped.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn compute_progress_percentage(
    checkpoint_indexes: &[i64],
    checkpoint_count: usize,
    current_position: i64,
    is_terminal: bool,
    max_depth: i64,
) -> f64 {
    if checkpoint_count == 0 {
        return f64::NAN;
    }
    let segment_width = 100.0 / checkpoint_count as f64;

    if checkpoint_indexes.first() == Some(&current_position) {
        return 0.0;
    }
    if is_terminal {
        return 100.0;
    }

    let segment = current_segment(checkpoint_indexes, current_position);
    let segment_start = checkpoint_indexes.get(segment).copied().unwrap_or(0);
    let segment_end = checkpoint_indexes
        .get(segment + 1)
        .copied()
        .unwrap_or(max_depth);

    // Subtract in f64: extreme depths must not overflow i64.
    let total_steps = segment_end as f64 - segment_start as f64;
    let fraction_in_segment = if total_steps > 0.0 {
        (current_position as f64 - segment_start as f64) / total_steps
    } else {
        0.0
    };

    segment as f64 * segment_width + fraction_in_segment * segment_width
}

/// Index of the checkpoint segment containing `position`.
///
/// At or past the last checkpoint the final (open-ended) segment is used;
/// positions before the first checkpoint fall back to segment zero.
fn current_segment(checkpoint_indexes: &[i64], position: i64) -> usize {
    let Some(&last) = checkpoint_indexes.last() else {
        return 0;
    };
    if position >= last {
        return checkpoint_indexes.len() - 1;
    }
    checkpoint_indexes
        .windows(2)
        .position(|pair| pair[0] <= position && position < pair[1])
        .unwrap_or(0)
}

/// Status of every checkpoint plus the trailing "lesson complete" slot.
///
/// The returned vector always has `checkpoint_count + 1` entries. Slot zero is
/// always completed; `completed_count` larger than `checkpoint_count` clamps
/// every checkpoint slot to completed.
#[must_use]
pub fn compute_checkpoint_statuses(
    checkpoint_count: usize,
    completed_count: usize,
    is_terminal_completed: bool,
) -> Vec<CheckpointStatus> {
    let mut statuses = Vec::with_capacity(checkpoint_count + 1);

    for slot in 0..checkpoint_count {
        let status = if slot == 0 || slot < completed_count {
            CheckpointStatus::Completed
        } else if slot == completed_count {
            CheckpointStatus::InProgress
        } else {
            CheckpointStatus::Incomplete
        };
        statuses.push(status);
    }

    statuses.push(if is_terminal_completed {
        CheckpointStatus::Completed
    } else {
        CheckpointStatus::Incomplete
    });

    statuses
}

/// Whether the trailing "lesson complete" slot counts as reached.
///
/// A terminal state only completes the lesson once the learner has moved past
/// the very first card.
#[must_use]
pub fn terminal_slot_completed(is_terminal: bool, displayed_card_index: i64) -> bool {
    is_terminal && displayed_card_index > 0
}

/// Ratio-based completion used by dashboard summaries.
///
/// The initial checkpoint is the 0% baseline, so it is excluded from
/// `visited_checkpoints` before taking the floor of the ratio.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub fn compute_lesson_completion_percentage(
    total_checkpoints: i64,
    visited_checkpoints: i64,
    is_chapter_complete: bool,
) -> i64 {
    if is_chapter_complete {
        return 100;
    }
    if total_checkpoints <= 0 {
        return 0;
    }
    let ratio = (visited_checkpoints as f64 - 1.0) / total_checkpoints as f64;
    (ratio * 100.0).floor() as i64
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
