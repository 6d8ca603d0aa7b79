//! MySQL implementation of the UserDirectory trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use sl_core::domain::entities::user::User;
use sl_core::errors::DomainError;
use sl_core::repositories::UserDirectory;

use crate::storage_error;

/// MySQL implementation of UserDirectory
///
/// The authenticated principal is not stored in the database; it is attached
/// per request with [`MySqlUserDirectory::with_principal`], which shares the
/// pool.
#[derive(Clone)]
pub struct MySqlUserDirectory {
    /// Database connection pool
    pool: MySqlPool,
    /// Login of the authenticated caller, if any
    principal: Option<String>,
}

impl MySqlUserDirectory {
    /// Create a new directory with no authenticated principal
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool, principal: None }
    }

    /// Directory scoped to a request made by `login`
    pub fn with_principal(&self, login: impl Into<String>) -> Self {
        Self {
            pool: self.pool.clone(),
            principal: Some(login.into()),
        }
    }

    /// Convert database row to User entity
    fn row_to_user(row: &sqlx::mysql::MySqlRow) -> Result<User, DomainError> {
        let id: String = row
            .try_get("id")
            .map_err(|e| storage_error("Failed to get id", e))?;

        Ok(User {
            id: Uuid::parse_str(&id).map_err(|e| DomainError::Storage {
                message: format!("Invalid user UUID: {}", e),
            })?,
            login: row
                .try_get("login")
                .map_err(|e| storage_error("Failed to get login", e))?,
            email: row
                .try_get("email")
                .map_err(|e| storage_error("Failed to get email", e))?,
            activated: row
                .try_get("activated")
                .map_err(|e| storage_error("Failed to get activated", e))?,
            reset_key: row
                .try_get("reset_key")
                .map_err(|e| storage_error("Failed to get reset_key", e))?,
            reset_date: row
                .try_get::<Option<DateTime<Utc>>, _>("reset_date")
                .map_err(|e| storage_error("Failed to get reset_date", e))?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| storage_error("Failed to get created_at", e))?,
        })
    }

    /// Insert a user row
    pub async fn create(&self, user: User) -> Result<User, DomainError> {
        let query = r#"
            INSERT INTO app_user (
                id, login, email, activated, reset_key, reset_date, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(user.id.to_string())
            .bind(&user.login)
            .bind(&user.email)
            .bind(user.activated)
            .bind(&user.reset_key)
            .bind(user.reset_date)
            .bind(user.created_at)
            .execute(&self.pool)
            .await
            .map_err(|e| storage_error("Failed to create user", e))?;

        Ok(user)
    }
}

#[async_trait]
impl UserDirectory for MySqlUserDirectory {
    async fn resolve_current_user(&self) -> Result<Option<String>, DomainError> {
        Ok(self.principal.clone())
    }

    async fn find_by_login(&self, login: &str) -> Result<Option<User>, DomainError> {
        let query = r#"
            SELECT id, login, email, activated, reset_key, reset_date, created_at
            FROM app_user
            WHERE login = ?
            LIMIT 1
        "#;

        let result = sqlx::query(query)
            .bind(login)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| storage_error("Failed to find user by login", e))?;

        match result {
            Some(row) => Ok(Some(Self::row_to_user(&row)?)),
            None => Ok(None),
        }
    }
}
