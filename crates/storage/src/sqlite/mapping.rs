use sat_core::model::{Prompt, PromptId, QuestionCategory, ResponseLogEntry, UserId};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use crate::repository::StorageError;

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

pub(crate) fn parse_category(s: &str) -> Result<QuestionCategory, StorageError> {
    s.parse().map_err(ser)
}

pub(crate) fn map_prompt_row(row: &SqliteRow) -> Result<Prompt, StorageError> {
    let id: PromptId = row
        .try_get::<String, _>("id")
        .map_err(ser)?
        .parse()
        .map_err(ser)?;
    let category = parse_category(&row.try_get::<String, _>("type").map_err(ser)?)?;
    let is_default: i64 = row.try_get("is_default").map_err(ser)?;

    Prompt::from_persisted(
        id,
        category,
        row.try_get("content").map_err(ser)?,
        is_default != 0,
        row.try_get("created_at").map_err(ser)?,
        row.try_get("updated_at").map_err(ser)?,
    )
    .map_err(ser)
}

pub(crate) fn map_response_row(row: &SqliteRow) -> Result<ResponseLogEntry, StorageError> {
    let questions: String = row.try_get("questions").map_err(ser)?;
    let user_id = row
        .try_get::<Option<String>, _>("user_id")
        .map_err(ser)?
        .map(|raw| raw.parse::<UserId>())
        .transpose()
        .map_err(ser)?;

    Ok(ResponseLogEntry {
        question_type: parse_category(&row.try_get::<String, _>("question_type").map_err(ser)?)?,
        passage: row.try_get("passage").map_err(ser)?,
        questions: serde_json::from_str(&questions).map_err(ser)?,
        user_id,
        created_at: row.try_get("created_at").map_err(ser)?,
    })
}
