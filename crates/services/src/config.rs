use std::env;

use lesson_core::chapter_label::DEFAULT_NEW_CHAPTER_WINDOW_DAYS;

use crate::error::ConfigError;

const DEFAULT_DB_URL: &str = "sqlite::memory:";

/// Runtime knobs for the progress services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressConfig {
    pub db_url: String,
    pub new_chapter_window_days: u32,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            db_url: DEFAULT_DB_URL.into(),
            new_chapter_window_days: DEFAULT_NEW_CHAPTER_WINDOW_DAYS,
        }
    }
}

impl ProgressConfig {
    /// Read `LESSON_DB_URL` and `LESSON_NEW_CHAPTER_WINDOW_DAYS` from the environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a variable is set but unusable.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`ProgressConfig::from_env`] with a custom variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a variable is set but unusable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(raw) = lookup("LESSON_DB_URL") {
            if raw.trim().is_empty() {
                return Err(ConfigError::EmptyDbUrl);
            }
            config.db_url = normalize_sqlite_url(raw);
        }

        if let Some(raw) = lookup("LESSON_NEW_CHAPTER_WINDOW_DAYS") {
            let parsed = raw.trim().parse::<u32>().ok().filter(|days| *days > 0);
            config.new_chapter_window_days =
                parsed.ok_or(ConfigError::InvalidWindowDays { raw })?;
        }

        Ok(config)
    }
}

/// Turn a bare or relative `SQLite` path into an absolute `sqlite://` URL.
#[must_use]
pub fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") || raw.starts_with("sqlite:file:")
    {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}
