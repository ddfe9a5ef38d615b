use std::collections::{HashMap, HashSet, VecDeque};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::checkpoint::CheckpointIndexSet;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LessonGraphError {
    #[error("init state {0:?} is not part of the lesson")]
    UnknownInitState(String),
    #[error("transition references unknown state {0:?}")]
    UnknownState(String),
    #[error("state {0:?} is defined more than once")]
    DuplicateState(String),
}

//
// ─── LESSON STATE ─────────────────────────────────────────────────────────────
//

/// One content state of a lesson.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonState {
    pub name: String,
    pub is_checkpoint: bool,
    pub is_terminal: bool,
}

impl LessonState {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_checkpoint: false,
            is_terminal: false,
        }
    }

    #[must_use]
    pub fn checkpoint(mut self) -> Self {
        self.is_checkpoint = true;
        self
    }

    #[must_use]
    pub fn terminal(mut self) -> Self {
        self.is_terminal = true;
        self
    }
}

//
// ─── LESSON GRAPH ─────────────────────────────────────────────────────────────
//

/// Directed graph of lesson states rooted at the init state.
///
/// Depth of a state is its shortest distance from the init state; this is the
/// linearized position used by the progress calculator.
#[derive(Debug, Clone)]
pub struct LessonGraph {
    init_state: String,
    states: Vec<LessonState>,
    by_name: HashMap<String, usize>,
    transitions: HashMap<String, Vec<String>>,
}

impl LessonGraph {
    /// Build a graph from its states and `(from, to)` transitions.
    ///
    /// # Errors
    ///
    /// Returns `LessonGraphError` when a state name repeats, the init state is
    /// missing, or a transition names an unknown state.
    pub fn new(
        init_state: impl Into<String>,
        states: Vec<LessonState>,
        transitions: &[(&str, &str)],
    ) -> Result<Self, LessonGraphError> {
        let init_state = init_state.into();
        let mut by_name = HashMap::with_capacity(states.len());
        for (idx, state) in states.iter().enumerate() {
            if by_name.insert(state.name.clone(), idx).is_some() {
                return Err(LessonGraphError::DuplicateState(state.name.clone()));
            }
        }
        if !by_name.contains_key(&init_state) {
            return Err(LessonGraphError::UnknownInitState(init_state));
        }

        let mut adjacency: HashMap<String, Vec<String>> = HashMap::new();
        for (from, to) in transitions {
            for name in [from, to] {
                if !by_name.contains_key(*name) {
                    return Err(LessonGraphError::UnknownState((*name).to_owned()));
                }
            }
            adjacency
                .entry((*from).to_owned())
                .or_default()
                .push((*to).to_owned());
        }

        Ok(Self {
            init_state,
            states,
            by_name,
            transitions: adjacency,
        })
    }

    #[must_use]
    pub fn init_state(&self) -> &str {
        &self.init_state
    }

    #[must_use]
    pub fn states(&self) -> &[LessonState] {
        &self.states
    }

    #[must_use]
    pub fn state(&self, name: &str) -> Option<&LessonState> {
        self.by_name.get(name).map(|idx| &self.states[*idx])
    }

    /// Returns false for unknown states.
    #[must_use]
    pub fn is_terminal(&self, name: &str) -> bool {
        self.state(name).is_some_and(|state| state.is_terminal)
    }

    #[must_use]
    pub fn is_checkpoint(&self, name: &str) -> bool {
        self.state(name).is_some_and(|state| state.is_checkpoint)
    }

    /// Shortest depth of every state reachable from the init state.
    #[must_use]
    pub fn depth_graph(&self) -> HashMap<&str, i64> {
        let mut depths: HashMap<&str, i64> = HashMap::new();
        let mut seen: HashSet<&str> = HashSet::new();
        let mut queue: VecDeque<(&str, i64)> = VecDeque::new();

        seen.insert(self.init_state.as_str());
        queue.push_back((self.init_state.as_str(), 0));

        while let Some((name, depth)) = queue.pop_front() {
            depths.insert(name, depth);
            let Some(next) = self.transitions.get(name) else {
                continue;
            };
            for dest in next {
                if seen.insert(dest.as_str()) {
                    queue.push_back((dest.as_str(), depth + 1));
                }
            }
        }

        depths
    }

    /// Largest depth in the graph; zero for a single-state lesson.
    #[must_use]
    pub fn max_depth(&self) -> i64 {
        self.depth_graph().values().copied().max().unwrap_or(0)
    }

    /// Depths of reachable checkpoint states, sorted ascending.
    #[must_use]
    pub fn checkpoint_indexes(&self) -> CheckpointIndexSet {
        let depths = self.depth_graph();
        let indexes = self
            .states
            .iter()
            .filter(|state| state.is_checkpoint)
            .filter_map(|state| depths.get(state.name.as_str()).copied())
            .collect();
        CheckpointIndexSet::from_unsorted(indexes)
    }

    /// Number of states flagged as checkpoints, reachable or not.
    #[must_use]
    pub fn checkpoint_count(&self) -> usize {
        self.states.iter().filter(|state| state.is_checkpoint).count()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
