//! Shared error types for the services crate.

use thiserror::Error;

use lesson_core::mode::ModeError;
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by the progress services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressServiceError {
    #[error("cannot load chapter progress: user not logged in")]
    NotLoggedIn,
    #[error("exploration mode has not been selected")]
    ModeNotSet,
    #[error(transparent)]
    Mode(#[from] ModeError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while reading configuration.
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("LESSON_DB_URL must not be empty")]
    EmptyDbUrl,
    #[error("invalid LESSON_NEW_CHAPTER_WINDOW_DAYS value: {raw}")]
    InvalidWindowDays { raw: String },
}

/// Errors emitted while bootstrapping progress services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressServicesError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
}
