use sat_core::model::{Prompt, PromptId, QuestionCategory};

use super::SqliteRepository;
use super::mapping::{conn, map_prompt_row};
use crate::repository::{PromptRepository, StorageError, sort_prompts};

#[async_trait::async_trait]
impl PromptRepository for SqliteRepository {
    async fn list_prompts(&self) -> Result<Vec<Prompt>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, type, content, is_default, created_at, updated_at
            FROM prompts
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        // Stored tags sort alphabetically; the listing follows category order instead.
        let mut prompts = rows
            .iter()
            .map(map_prompt_row)
            .collect::<Result<Vec<_>, _>>()?;
        sort_prompts(&mut prompts);
        Ok(prompts)
    }

    async fn prompt_for_category(
        &self,
        category: QuestionCategory,
    ) -> Result<Option<Prompt>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT id, type, content, is_default, created_at, updated_at
            FROM prompts
            WHERE type = ?1
            ORDER BY created_at ASC
            LIMIT 1
            ",
        )
        .bind(category.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(conn)?;

        row.as_ref().map(map_prompt_row).transpose()
    }

    async fn get_prompt(&self, id: PromptId) -> Result<Prompt, StorageError> {
        let row = sqlx::query(
            r"
            SELECT id, type, content, is_default, created_at, updated_at
            FROM prompts
            WHERE id = ?1
            ",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(conn)?
        .ok_or(StorageError::NotFound)?;

        map_prompt_row(&row)
    }

    async fn insert_prompt(&self, prompt: &Prompt) -> Result<(), StorageError> {
        let res = sqlx::query(
            r"
            INSERT INTO prompts (id, type, content, is_default, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(id) DO NOTHING
            ",
        )
        .bind(prompt.id().to_string())
        .bind(prompt.category().as_str())
        .bind(prompt.content())
        .bind(i64::from(prompt.is_default()))
        .bind(prompt.created_at())
        .bind(prompt.updated_at())
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        if res.rows_affected() == 0 {
            return Err(StorageError::Conflict);
        }
        Ok(())
    }

    async fn update_prompt(&self, prompt: &Prompt) -> Result<(), StorageError> {
        let res = sqlx::query(
            r"
            UPDATE prompts
            SET content = ?2, updated_at = ?3
            WHERE id = ?1
            ",
        )
        .bind(prompt.id().to_string())
        .bind(prompt.content())
        .bind(prompt.updated_at())
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        if res.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }
}
