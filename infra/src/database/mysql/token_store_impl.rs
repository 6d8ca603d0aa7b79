//! MySQL implementation of the TokenStore trait.
//!
//! Tokens live in the `persistent_token` table keyed by `series`. Every call
//! is a single statement, so each one is atomic on its own.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use sl_core::domain::entities::token::PersistentToken;
use sl_core::errors::DomainError;
use sl_core::repositories::TokenStore;

use crate::storage_error;

/// Series bound per `DELETE ... IN (...)` statement, well under the
/// prepared statement placeholder limit
pub const DELETE_BATCH_SIZE: usize = 1000;

const SELECT_COLUMNS: &str =
    "SELECT series, token_value, user_id, token_date, ip_address, user_agent FROM persistent_token";

/// MySQL implementation of TokenStore
pub struct MySqlTokenStore {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlTokenStore {
    /// Create a new MySQL token store
    ///
    /// # Arguments
    /// * `pool` - MySQL connection pool from SQLx
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert database row to PersistentToken entity
    fn row_to_token(row: &sqlx::mysql::MySqlRow) -> Result<PersistentToken, DomainError> {
        let user_id: String = row
            .try_get("user_id")
            .map_err(|e| storage_error("Failed to get user_id", e))?;

        Ok(PersistentToken {
            series: row
                .try_get("series")
                .map_err(|e| storage_error("Failed to get series", e))?,
            token_value: row
                .try_get("token_value")
                .map_err(|e| storage_error("Failed to get token_value", e))?,
            user_id: Uuid::parse_str(&user_id).map_err(|e| DomainError::Storage {
                message: format!("Invalid user UUID: {}", e),
            })?,
            token_date: row
                .try_get::<NaiveDate, _>("token_date")
                .map_err(|e| storage_error("Failed to get token_date", e))?,
            ip_address: row
                .try_get("ip_address")
                .map_err(|e| storage_error("Failed to get ip_address", e))?,
            user_agent: row
                .try_get("user_agent")
                .map_err(|e| storage_error("Failed to get user_agent", e))?,
        })
    }

    fn rows_to_tokens(rows: &[sqlx::mysql::MySqlRow]) -> Result<Vec<PersistentToken>, DomainError> {
        rows.iter().map(Self::row_to_token).collect()
    }
}

#[async_trait]
impl TokenStore for MySqlTokenStore {
    async fn find_by_owner(&self, user_id: Uuid) -> Result<Vec<PersistentToken>, DomainError> {
        let query = format!("{} WHERE user_id = ?", SELECT_COLUMNS);

        let rows = sqlx::query(&query)
            .bind(user_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| storage_error("Failed to find tokens by owner", e))?;

        Self::rows_to_tokens(&rows)
    }

    async fn find_issued_before(&self, date: NaiveDate) -> Result<Vec<PersistentToken>, DomainError> {
        let query = format!("{} WHERE token_date < ?", SELECT_COLUMNS);

        let rows = sqlx::query(&query)
            .bind(date)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| storage_error("Failed to find expired tokens", e))?;

        Self::rows_to_tokens(&rows)
    }

    async fn find_by_series(&self, series: &str) -> Result<Option<PersistentToken>, DomainError> {
        let query = format!("{} WHERE series = ? LIMIT 1", SELECT_COLUMNS);

        let result = sqlx::query(&query)
            .bind(series)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| storage_error("Failed to find token by series", e))?;

        match result {
            Some(row) => Ok(Some(Self::row_to_token(&row)?)),
            None => Ok(None),
        }
    }

    async fn save(&self, token: PersistentToken) -> Result<PersistentToken, DomainError> {
        let query = r#"
            INSERT INTO persistent_token (
                series, token_value, user_id, token_date, ip_address, user_agent
            ) VALUES (?, ?, ?, ?, ?, ?) AS new
            ON DUPLICATE KEY UPDATE
                token_value = new.token_value,
                user_id = new.user_id,
                token_date = new.token_date,
                ip_address = new.ip_address,
                user_agent = new.user_agent
        "#;

        sqlx::query(query)
            .bind(&token.series)
            .bind(&token.token_value)
            .bind(token.user_id.to_string())
            .bind(token.token_date)
            .bind(&token.ip_address)
            .bind(&token.user_agent)
            .execute(&self.pool)
            .await
            .map_err(|e| storage_error("Failed to save persistent token", e))?;

        Ok(token)
    }

    async fn delete_by_series(&self, series: &str) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM persistent_token WHERE series = ?")
            .bind(series)
            .execute(&self.pool)
            .await
            .map_err(|e| storage_error("Failed to delete persistent token", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_all(&self, tokens: &[PersistentToken]) -> Result<usize, DomainError> {
        let mut deleted = 0;

        for batch in tokens.chunks(DELETE_BATCH_SIZE) {
            let query = delete_batch_query(batch.len());

            let mut statement = sqlx::query(&query);
            for token in batch {
                statement = statement.bind(&token.series);
            }

            let result = statement
                .execute(&self.pool)
                .await
                .map_err(|e| storage_error("Failed to delete persistent tokens", e))?;

            deleted += result.rows_affected() as usize;
        }

        Ok(deleted)
    }
}

fn delete_batch_query(len: usize) -> String {
    let placeholders = vec!["?"; len].join(", ");
    format!("DELETE FROM persistent_token WHERE series IN ({})", placeholders)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delete_batch_query_placeholders() {
        assert_eq!(
            delete_batch_query(3),
            "DELETE FROM persistent_token WHERE series IN (?, ?, ?)"
        );
        assert_eq!(delete_batch_query(DELETE_BATCH_SIZE).matches('?').count(), DELETE_BATCH_SIZE);
    }
}
