use sat_core::model::ResponseLogEntry;

use super::SqliteRepository;
use super::mapping::{conn, map_response_row, ser};
use crate::repository::{ResponseLogRepository, StorageError};

#[async_trait::async_trait]
impl ResponseLogRepository for SqliteRepository {
    async fn append_response(&self, entry: &ResponseLogEntry) -> Result<i64, StorageError> {
        let questions = serde_json::to_string(&entry.questions).map_err(ser)?;

        let res = sqlx::query(
            r"
            INSERT INTO responses (question_type, passage, questions, user_id, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ",
        )
        .bind(entry.question_type.as_str())
        .bind(entry.passage.as_deref())
        .bind(questions)
        .bind(entry.user_id.map(|id| id.to_string()))
        .bind(entry.created_at)
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        Ok(res.last_insert_rowid())
    }

    async fn recent_responses(&self, limit: u32) -> Result<Vec<ResponseLogEntry>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT question_type, passage, questions, user_id, created_at
            FROM responses
            ORDER BY id DESC
            LIMIT ?1
            ",
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        rows.iter().map(map_response_row).collect()
    }
}
