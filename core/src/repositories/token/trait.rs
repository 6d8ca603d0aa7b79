//! Token store trait defining the interface for persistent token persistence.

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::entities::token::PersistentToken;
use crate::errors::DomainError;

/// Storage contract for persistent (remember-me) tokens.
///
/// Records are keyed by `series`. Only per-call atomicity is expected; there is
/// no cross-token transaction. Storage failures are returned as
/// [`DomainError::Storage`] and are never retried here.
///
/// # Example
/// ```no_run
/// # use chrono::Utc;
/// # use uuid::Uuid;
/// # use sl_core::repositories::TokenStore;
/// # use sl_core::domain::entities::token::PersistentToken;
/// # async fn example(store: &impl TokenStore) -> Result<(), Box<dyn std::error::Error>> {
/// let owner = Uuid::new_v4();
/// let token = PersistentToken::issue(owner, Utc::now().date_naive(), Some("127.0.0.1"), None);
/// store.save(token).await?;
///
/// for token in store.find_by_owner(owner).await? {
///     println!("session {} from {:?}", token.series, token.ip_address);
/// }
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Find every token owned by a user, in no particular order
    async fn find_by_owner(&self, user_id: Uuid) -> Result<Vec<PersistentToken>, DomainError>;

    /// Find every token whose date is strictly before `date`
    async fn find_issued_before(&self, date: NaiveDate) -> Result<Vec<PersistentToken>, DomainError>;

    /// Find a token by its series
    ///
    /// # Returns
    /// * `Ok(Some(PersistentToken))` - Token found
    /// * `Ok(None)` - No token stored under that series
    /// * `Err(DomainError)` - Storage error occurred
    async fn find_by_series(&self, series: &str) -> Result<Option<PersistentToken>, DomainError>;

    /// Insert or replace the token stored under `token.series`
    async fn save(&self, token: PersistentToken) -> Result<PersistentToken, DomainError>;

    /// Delete the token with the given series
    ///
    /// # Returns
    /// * `Ok(true)` - A row was deleted
    /// * `Ok(false)` - Nothing was stored under that series (not an error)
    /// * `Err(DomainError)` - Deletion failed
    async fn delete_by_series(&self, series: &str) -> Result<bool, DomainError>;

    /// Delete a batch of tokens.
    ///
    /// The default runs independent per-row deletes and returns how many rows
    /// were actually removed; rows already gone are skipped silently.
    async fn delete_all(&self, tokens: &[PersistentToken]) -> Result<usize, DomainError> {
        let mut deleted = 0;
        for token in tokens {
            if self.delete_by_series(&token.series).await? {
                deleted += 1;
            }
        }
        Ok(deleted)
    }
}
