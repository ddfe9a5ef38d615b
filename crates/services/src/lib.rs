#![forbid(unsafe_code)]

pub mod chapter_completion;
pub mod chapter_label_service;
pub mod chapter_progress_loader;
pub mod checkpoint_bar;
pub mod config;
pub mod error;
pub mod mode_service;
pub mod progress_services;

pub use lesson_core::Clock;

pub use chapter_completion::ChapterCompletionTracker;
pub use chapter_label_service::ChapterLabelService;
pub use chapter_progress_loader::{ChapterProgressLoader, LessonProgressCache};
pub use checkpoint_bar::{CheckpointBar, PlayerPosition};
pub use config::ProgressConfig;
pub use error::{ConfigError, ProgressServiceError, ProgressServicesError};
pub use mode_service::ExplorationModeService;
pub use progress_services::ProgressServices;
