use sat_core::model::UserId;

use super::SqliteRepository;
use super::mapping::conn;
use crate::repository::{AdminRepository, StorageError};

#[async_trait::async_trait]
impl AdminRepository for SqliteRepository {
    async fn is_admin(&self, user: UserId) -> Result<bool, StorageError> {
        let row = sqlx::query("SELECT 1 FROM admin_users WHERE user_id = ?1")
            .bind(user.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(conn)?;
        Ok(row.is_some())
    }

    async fn add_admin(&self, user: UserId) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO admin_users (user_id)
            VALUES (?1)
            ON CONFLICT(user_id) DO NOTHING
            ",
        )
        .bind(user.to_string())
        .execute(&self.pool)
        .await
        .map_err(conn)?;
        Ok(())
    }
}
