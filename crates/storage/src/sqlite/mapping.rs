use lesson_core::model::ChapterProgressSummary;
use sqlx::Row;

use crate::repository::StorageError;

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn u32_from_i64(field: &'static str, v: i64) -> Result<u32, StorageError> {
    u32::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid {field}: {v}")))
}

pub(crate) fn map_chapter_row(
    row: &sqlx::sqlite::SqliteRow,
) -> Result<ChapterProgressSummary, StorageError> {
    let total_checkpoints = u32_from_i64(
        "total_checkpoints",
        row.try_get::<i64, _>("total_checkpoints").map_err(ser)?,
    )?;
    let visited_checkpoints = u32_from_i64(
        "visited_checkpoints",
        row.try_get::<i64, _>("visited_checkpoints").map_err(ser)?,
    )?;
    let is_chapter_complete: bool = row.try_get("is_chapter_complete").map_err(ser)?;

    Ok(ChapterProgressSummary::new(
        total_checkpoints,
        visited_checkpoints,
        is_chapter_complete,
    ))
}
