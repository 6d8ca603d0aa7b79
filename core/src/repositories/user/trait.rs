//! User directory trait: read-only identity lookups for the session manager.

use async_trait::async_trait;

use crate::domain::entities::user::User;
use crate::errors::DomainError;

/// Read-only view of the authentication subsystem.
///
/// Implementations are request-scoped: `resolve_current_user` answers for the
/// principal of the call being served.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Login of the authenticated caller
    ///
    /// # Returns
    /// * `Ok(Some(login))` - Caller is authenticated
    /// * `Ok(None)` - Anonymous caller
    /// * `Err(DomainError)` - Lookup failed
    async fn resolve_current_user(&self) -> Result<Option<String>, DomainError>;

    /// Find a user by login (logins are stored lower-cased)
    async fn find_by_login(&self, login: &str) -> Result<Option<User>, DomainError>;
}
