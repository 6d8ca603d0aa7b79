//! In-memory implementation of UserDirectory

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::user::User;
use crate::errors::DomainError;

use super::r#trait::UserDirectory;

/// User directory holding users by login plus the current principal
#[derive(Clone, Default)]
pub struct InMemoryUserDirectory {
    users: Arc<RwLock<HashMap<String, User>>>,
    current_login: Arc<RwLock<Option<String>>>,
}

impl InMemoryUserDirectory {
    /// Create a new, empty directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a user
    pub async fn insert(&self, user: User) -> User {
        let mut users = self.users.write().await;
        users.insert(user.login.clone(), user.clone());
        user
    }

    /// Remove a user, as if the account was deleted
    pub async fn remove(&self, login: &str) -> Option<User> {
        self.users.write().await.remove(login)
    }

    /// Set or clear the authenticated principal
    pub async fn set_current_login(&self, login: Option<&str>) {
        *self.current_login.write().await = login.map(str::to_string);
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn resolve_current_user(&self) -> Result<Option<String>, DomainError> {
        Ok(self.current_login.read().await.clone())
    }

    async fn find_by_login(&self, login: &str) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users.get(login).cloned())
    }
}
