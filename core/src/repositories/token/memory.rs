//! In-memory implementation of TokenStore, used by tests and local runs

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::token::PersistentToken;
use crate::errors::DomainError;

use super::r#trait::TokenStore;

/// Token store backed by a map keyed by series
#[derive(Clone, Default)]
pub struct InMemoryTokenStore {
    tokens: Arc<RwLock<HashMap<String, PersistentToken>>>,
}

impl InMemoryTokenStore {
    /// Create a new, empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored tokens
    pub async fn len(&self) -> usize {
        self.tokens.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.tokens.read().await.is_empty()
    }
}

#[async_trait]
impl TokenStore for InMemoryTokenStore {
    async fn find_by_owner(&self, user_id: Uuid) -> Result<Vec<PersistentToken>, DomainError> {
        let tokens = self.tokens.read().await;
        Ok(tokens
            .values()
            .filter(|t| t.belongs_to(user_id))
            .cloned()
            .collect())
    }

    async fn find_issued_before(&self, date: NaiveDate) -> Result<Vec<PersistentToken>, DomainError> {
        let tokens = self.tokens.read().await;
        Ok(tokens
            .values()
            .filter(|t| t.is_expired(date))
            .cloned()
            .collect())
    }

    async fn find_by_series(&self, series: &str) -> Result<Option<PersistentToken>, DomainError> {
        let tokens = self.tokens.read().await;
        Ok(tokens.get(series).cloned())
    }

    async fn save(&self, token: PersistentToken) -> Result<PersistentToken, DomainError> {
        let mut tokens = self.tokens.write().await;
        tokens.insert(token.series.clone(), token.clone());
        Ok(token)
    }

    async fn delete_by_series(&self, series: &str) -> Result<bool, DomainError> {
        let mut tokens = self.tokens.write().await;
        Ok(tokens.remove(series).is_some())
    }
}
