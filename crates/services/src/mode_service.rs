use lesson_core::mode::{EngineKind, ExplorationMode, PageContext};
use tracing::info;
use url::Url;

use crate::error::ProgressServiceError;

/// Tracks which mode the player runs in and which engine serves it.
///
/// The engine is always derived from the selected mode, never assigned on
/// its own.
#[derive(Debug, Clone, Default)]
pub struct ExplorationModeService {
    mode: Option<ExplorationMode>,
    engine: Option<EngineKind>,
}

impl ExplorationModeService {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the mode from the page the player is embedded in.
    pub fn init(&mut self, pathname: &str, context: PageContext) {
        if let Some(mode) = ExplorationMode::detect(pathname, context) {
            self.select(mode);
        }
    }

    #[must_use]
    pub fn current_mode(&self) -> Option<ExplorationMode> {
        self.mode
    }

    #[must_use]
    pub fn current_engine(&self) -> Option<EngineKind> {
        self.engine
    }

    pub fn set_exploration_mode(&mut self) {
        self.select(ExplorationMode::Exploration);
    }

    pub fn set_pretest_mode(&mut self) {
        self.select(ExplorationMode::Pretest);
    }

    pub fn set_question_player_mode(&mut self) {
        self.select(ExplorationMode::QuestionPlayer);
    }

    pub fn set_diagnostic_test_player_mode(&mut self) {
        self.select(ExplorationMode::DiagnosticTestPlayer);
    }

    pub fn set_story_chapter_mode(&mut self) {
        self.select(ExplorationMode::StoryChapter);
    }

    pub fn set_mode_from_url(&mut self, url: &Url) {
        self.select(ExplorationMode::from_url(url));
    }

    #[must_use]
    pub fn is_in_question_mode(&self) -> bool {
        self.mode.is_some_and(ExplorationMode::is_in_question_mode)
    }

    #[must_use]
    pub fn is_in_question_player_mode(&self) -> bool {
        self.mode == Some(ExplorationMode::QuestionPlayer)
    }

    #[must_use]
    pub fn is_in_diagnostic_test_player_mode(&self) -> bool {
        self.mode == Some(ExplorationMode::DiagnosticTestPlayer)
    }

    #[must_use]
    pub fn is_in_story_chapter_mode(&self) -> bool {
        self.mode == Some(ExplorationMode::StoryChapter)
    }

    /// # Errors
    ///
    /// Returns `ProgressServiceError::ModeNotSet` before a mode is selected,
    /// or `ProgressServiceError::Mode` for modes that present no lesson.
    pub fn is_presenting_isolated_questions(&self) -> Result<bool, ProgressServiceError> {
        let mode = self.mode.ok_or(ProgressServiceError::ModeNotSet)?;
        Ok(mode.is_presenting_isolated_questions()?)
    }

    fn select(&mut self, mode: ExplorationMode) {
        self.mode = Some(mode);
        self.engine = mode.engine_kind();
        info!(mode = %mode, engine = ?self.engine, "exploration mode selected");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_without_mode() {
        let service = ExplorationModeService::new();
        assert_eq!(service.current_mode(), None);
        assert!(!service.is_in_question_mode());
        assert!(matches!(
            service.is_presenting_isolated_questions(),
            Err(ProgressServiceError::ModeNotSet)
        ));
    }

    #[test]
    fn setters_pick_matching_engine() {
        let mut service = ExplorationModeService::new();

        service.set_pretest_mode();
        assert_eq!(service.current_engine(), Some(EngineKind::QuestionPlayer));
        assert!(service.is_in_question_mode());
        assert!(!service.is_in_question_player_mode());

        service.set_diagnostic_test_player_mode();
        assert_eq!(
            service.current_engine(),
            Some(EngineKind::DiagnosticTestPlayer)
        );
        assert!(service.is_in_diagnostic_test_player_mode());

        service.set_story_chapter_mode();
        assert_eq!(service.current_engine(), Some(EngineKind::Exploration));
        assert!(service.is_in_story_chapter_mode());
        assert!(!service.is_presenting_isolated_questions().unwrap());
    }

    #[test]
    fn init_detects_editor_preview() {
        let mut service = ExplorationModeService::new();
        service.init(
            "/create/exp_1",
            PageContext {
                in_exploration_editor: true,
                in_question_player: false,
            },
        );
        assert_eq!(service.current_mode(), Some(ExplorationMode::EditorPreview));
        assert_eq!(service.current_engine(), None);
        assert!(matches!(
            service.is_presenting_isolated_questions(),
            Err(ProgressServiceError::Mode(_))
        ));
    }

    #[test]
    fn mode_from_url() {
        let mut service = ExplorationModeService::new();
        let url =
            Url::parse("https://example.org/explore/e1?story_url_fragment=s&node_id=node_2")
                .unwrap();
        service.set_mode_from_url(&url);
        assert!(service.is_in_story_chapter_mode());

        service.set_mode_from_url(&Url::parse("https://example.org/explore/e1").unwrap());
        assert_eq!(service.current_mode(), Some(ExplorationMode::Exploration));
    }
}
