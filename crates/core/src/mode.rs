use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModeError {
    #[error("invalid mode received: {0}")]
    InvalidMode(ExplorationMode),
}

/// Path segments under which the player can run.
const PLAYER_PATH_SEGMENTS: [&str; 5] = ["explore", "create", "skill_editor", "embed", "lesson"];

/// Which player engine backs the current lesson.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineKind {
    Exploration,
    QuestionPlayer,
    DiagnosticTestPlayer,
}

/// The context the lesson player is running in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExplorationMode {
    DiagnosticTestPlayer,
    Exploration,
    EditorPreview,
    LessonPlayer,
    Pretest,
    QuestionPlayer,
    StoryChapter,
}

/// Page-level facts needed to pick an initial mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageContext {
    pub in_exploration_editor: bool,
    pub in_question_player: bool,
}

impl ExplorationMode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ExplorationMode::DiagnosticTestPlayer => "diagnostic_test_player",
            ExplorationMode::Exploration => "exploration",
            ExplorationMode::EditorPreview => "editor_preview",
            ExplorationMode::LessonPlayer => "lesson_player",
            ExplorationMode::Pretest => "pretest",
            ExplorationMode::QuestionPlayer => "question_player",
            ExplorationMode::StoryChapter => "story_chapter",
        }
    }

    /// Engine that serves this mode. Editor preview and the lesson player
    /// shell pick their engine later through an explicit mode switch.
    #[must_use]
    pub fn engine_kind(self) -> Option<EngineKind> {
        match self {
            ExplorationMode::Exploration | ExplorationMode::StoryChapter => {
                Some(EngineKind::Exploration)
            }
            ExplorationMode::Pretest | ExplorationMode::QuestionPlayer => {
                Some(EngineKind::QuestionPlayer)
            }
            ExplorationMode::DiagnosticTestPlayer => Some(EngineKind::DiagnosticTestPlayer),
            ExplorationMode::EditorPreview | ExplorationMode::LessonPlayer => None,
        }
    }

    /// Initial mode for a page, derived from its path.
    ///
    /// Only pages under a player path segment get a mode, and then only when
    /// the page context identifies the editor or the question player.
    #[must_use]
    pub fn detect(pathname: &str, context: PageContext) -> Option<Self> {
        let in_player = pathname
            .split('/')
            .any(|segment| PLAYER_PATH_SEGMENTS.contains(&segment));
        if !in_player {
            return None;
        }
        if context.in_exploration_editor {
            Some(ExplorationMode::EditorPreview)
        } else if context.in_question_player {
            Some(ExplorationMode::QuestionPlayer)
        } else {
            None
        }
    }

    /// Story chapter mode when both `story_url_fragment` and `node_id` are
    /// present as query parameters, plain exploration otherwise.
    #[must_use]
    pub fn from_url(url: &Url) -> Self {
        let mut has_story = false;
        let mut has_node = false;
        for (key, _) in url.query_pairs() {
            match key.as_ref() {
                "story_url_fragment" => has_story = true,
                "node_id" => has_node = true,
                _ => {}
            }
        }
        if has_story && has_node {
            ExplorationMode::StoryChapter
        } else {
            ExplorationMode::Exploration
        }
    }

    #[must_use]
    pub fn is_in_question_mode(self) -> bool {
        matches!(
            self,
            ExplorationMode::Pretest | ExplorationMode::QuestionPlayer
        )
    }

    /// Whether only questions, without lesson content, are presented.
    ///
    /// # Errors
    ///
    /// Returns `ModeError::InvalidMode` for modes that do not present a lesson
    /// (editor preview and the lesson player shell).
    pub fn is_presenting_isolated_questions(self) -> Result<bool, ModeError> {
        match self {
            ExplorationMode::QuestionPlayer
            | ExplorationMode::DiagnosticTestPlayer
            | ExplorationMode::Pretest => Ok(true),
            ExplorationMode::Exploration | ExplorationMode::StoryChapter => Ok(false),
            ExplorationMode::EditorPreview | ExplorationMode::LessonPlayer => {
                Err(ModeError::InvalidMode(self))
            }
        }
    }
}

impl fmt::Display for ExplorationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
