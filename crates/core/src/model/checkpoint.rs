use serde::{Deserialize, Serialize};
use std::fmt;

//
// ─── CHECKPOINT INDEX SET ─────────────────────────────────────────────────────
//

/// Depths of the checkpoint states within a linearized lesson graph.
///
/// The set is expected to be sorted ascending. Construction through [`new`]
/// keeps the caller's order untouched; use [`from_unsorted`] when the
/// positions come from an unordered source.
///
/// [`new`]: CheckpointIndexSet::new
/// [`from_unsorted`]: CheckpointIndexSet::from_unsorted
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CheckpointIndexSet(Vec<i64>);

impl CheckpointIndexSet {
    #[must_use]
    pub fn new(indexes: Vec<i64>) -> Self {
        Self(indexes)
    }

    /// Builds a set from positions in arbitrary order, sorting them ascending.
    #[must_use]
    pub fn from_unsorted(mut indexes: Vec<i64>) -> Self {
        indexes.sort_unstable();
        Self(indexes)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[i64] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn first(&self) -> Option<i64> {
        self.0.first().copied()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<i64> {
        self.0.get(index).copied()
    }

    /// Returns true when the positions are non-decreasing.
    #[must_use]
    pub fn is_sorted(&self) -> bool {
        self.0.windows(2).all(|pair| pair[0] <= pair[1])
    }
}

impl From<Vec<i64>> for CheckpointIndexSet {
    fn from(indexes: Vec<i64>) -> Self {
        Self::new(indexes)
    }
}

//
// ─── CHECKPOINT STATUS ────────────────────────────────────────────────────────
//

/// Where a learner stands relative to a single checkpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CheckpointStatus {
    Completed,
    /// The next checkpoint the learner is working towards.
    InProgress,
    Incomplete,
}

impl CheckpointStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            CheckpointStatus::Completed => "completed",
            CheckpointStatus::InProgress => "in-progress",
            CheckpointStatus::Incomplete => "incomplete",
        }
    }

    #[must_use]
    pub fn is_completed(self) -> bool {
        matches!(self, CheckpointStatus::Completed)
    }
}

impl fmt::Display for CheckpointStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_keeps_caller_order() {
        let set = CheckpointIndexSet::new(vec![3, 1, 2]);
        assert_eq!(set.as_slice(), &[3, 1, 2]);
        assert!(!set.is_sorted());
    }

    #[test]
    fn from_unsorted_sorts_ascending() {
        let set = CheckpointIndexSet::from_unsorted(vec![3, 1, 2, 1]);
        assert_eq!(set.as_slice(), &[1, 1, 2, 3]);
        assert!(set.is_sorted());
    }

    #[test]
    fn empty_set_has_no_first() {
        let set = CheckpointIndexSet::default();
        assert!(set.is_empty());
        assert_eq!(set.first(), None);
        assert!(set.is_sorted());
    }

    #[test]
    fn status_serializes_kebab_case() {
        let json = serde_json::to_string(&CheckpointStatus::InProgress).unwrap();
        assert_eq!(json, "\"in-progress\"");
        assert_eq!(CheckpointStatus::Incomplete.to_string(), "incomplete");
    }
}
