//! Session lifecycle manager: the rules governing remember-me tokens,
//! independent of how they are persisted or transported.

use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};

use sl_shared::config::SessionConfig;
use sl_shared::validation::normalize_login;

use crate::domain::entities::token::{retention_cutoff, PersistentToken};
use crate::domain::entities::user::User;
use crate::errors::{DomainError, DomainResult, TokenError};
use crate::repositories::{TokenStore, UserDirectory};

/// Attempts at drawing a series that is not already stored
const MAX_SERIES_ATTEMPTS: usize = 5;

/// Issues, validates and revokes persistent tokens and purges expired ones.
///
/// Holds no locks of its own; every operation is a short sequence of
/// single-row store calls, so it is safe to share across tasks and to run
/// alongside the sweep.
pub struct SessionLifecycleManager<T, U>
where
    T: TokenStore,
    U: UserDirectory,
{
    tokens: Arc<T>,
    users: Arc<U>,
    config: SessionConfig,
}

impl<T, U> SessionLifecycleManager<T, U>
where
    T: TokenStore,
    U: UserDirectory,
{
    /// Create a new session lifecycle manager
    pub fn new(tokens: Arc<T>, users: Arc<U>, config: SessionConfig) -> Self {
        Self { tokens, users, config }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Oldest token date still retained as of `today`
    ///
    /// # Errors
    /// * `DomainError::Validation` - The configured window does not fit the calendar
    pub fn retention_cutoff(&self, today: NaiveDate) -> DomainResult<NaiveDate> {
        retention_cutoff(today, self.config.retention_days).ok_or_else(|| DomainError::Validation {
            message: format!(
                "Retention window of {} days is out of range",
                self.config.retention_days
            ),
        })
    }

    /// All tokens owned by the user with this login, in no particular order.
    ///
    /// # Errors
    /// * `DomainError::NotFound` - No such user; never an empty list
    pub async fn list_sessions(&self, login: &str) -> DomainResult<Vec<PersistentToken>> {
        let user = self.find_user(login).await?;
        self.tokens.find_by_owner(user.id).await
    }

    /// Sessions of the authenticated caller
    pub async fn current_sessions(&self) -> DomainResult<Vec<PersistentToken>> {
        let login = self.current_login().await?;
        self.list_sessions(&login).await
    }

    /// Delete one of the user's sessions by series.
    ///
    /// Only a token owned by this user is ever deleted. A series that does not
    /// exist, or belongs to someone else, is a silent no-op so the caller
    /// cannot probe for other users' sessions. The client may keep using an
    /// already-established session until it ends; only automatic login through
    /// this token stops working.
    ///
    /// `series` is matched exactly and must already be URL-decoded.
    pub async fn revoke_session(&self, login: &str, series: &str) -> DomainResult<()> {
        let user = self.find_user(login).await?;
        let owned = self.tokens.find_by_owner(user.id).await?;

        match owned.iter().find(|t| t.series == series) {
            Some(token) => {
                self.tokens.delete_by_series(&token.series).await?;
                info!("Revoked persistent session for user {}", user.login);
            }
            None => debug!("No matching session to revoke for user {}", user.login),
        }
        Ok(())
    }

    /// Delete one of the authenticated caller's sessions
    pub async fn revoke_current_session(&self, series: &str) -> DomainResult<()> {
        let login = self.current_login().await?;
        self.revoke_session(&login, series).await
    }

    /// Delete every session of a user, e.g. after a password change
    pub async fn revoke_all_sessions(&self, login: &str) -> DomainResult<usize> {
        let user = self.find_user(login).await?;
        let owned = self.tokens.find_by_owner(user.id).await?;
        let deleted = self.tokens.delete_all(&owned).await?;
        info!("Revoked {} persistent sessions for user {}", deleted, user.login);
        Ok(deleted)
    }

    /// Delete every token whose date is strictly before `cutoff`.
    ///
    /// Idempotent: a second run with the same cutoff deletes nothing.
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of tokens actually deleted
    pub async fn purge_expired_tokens(&self, cutoff: NaiveDate) -> DomainResult<usize> {
        let expired = self.tokens.find_issued_before(cutoff).await?;
        if expired.is_empty() {
            return Ok(0);
        }
        let deleted = self.tokens.delete_all(&expired).await?;
        debug!("Purged {} of {} tokens issued before {}", deleted, expired.len(), cutoff);
        Ok(deleted)
    }

    /// Issue a remember-me token for an activated user, dated today
    pub async fn issue_token(
        &self,
        login: &str,
        ip_address: Option<&str>,
        user_agent: Option<&str>,
    ) -> DomainResult<PersistentToken> {
        self.issue_token_at(login, ip_address, user_agent, today()).await
    }

    /// Issue a remember-me token dated `today`
    pub async fn issue_token_at(
        &self,
        login: &str,
        ip_address: Option<&str>,
        user_agent: Option<&str>,
        today: NaiveDate,
    ) -> DomainResult<PersistentToken> {
        let user = self.find_user(login).await?;
        if !user.activated {
            return Err(DomainError::Validation {
                message: format!("User {} was not activated", user.login),
            });
        }

        for _ in 0..MAX_SERIES_ATTEMPTS {
            let token = PersistentToken::issue(user.id, today, ip_address, user_agent);
            if self.tokens.find_by_series(&token.series).await?.is_none() {
                let saved = self.tokens.save(token).await?;
                info!("Issued persistent token for user {}", user.login);
                return Ok(saved);
            }
            warn!("Generated series already in use, drawing another");
        }

        Err(DomainError::Internal {
            message: "Could not generate an unused token series".to_string(),
        })
    }

    /// Validate a presented credential and rotate its value
    pub async fn auto_login(&self, series: &str, token_value: &str) -> DomainResult<PersistentToken> {
        self.auto_login_at(series, token_value, today()).await
    }

    /// Validate a presented credential as of `today`.
    ///
    /// * unknown series - `TokenError::InvalidToken`
    /// * value mismatch - every token of the owner is deleted, `TokenError::TokenTheft`
    /// * outside the retention window - token deleted, `TokenError::TokenExpired`
    ///
    /// On success the token keeps its series, gets a new value and today's
    /// date, and is saved before being returned.
    pub async fn auto_login_at(
        &self,
        series: &str,
        token_value: &str,
        today: NaiveDate,
    ) -> DomainResult<PersistentToken> {
        let mut token = self
            .tokens
            .find_by_series(series)
            .await?
            .ok_or(TokenError::InvalidToken)?;

        if !token.matches_value(token_value) {
            let owned = self.tokens.find_by_owner(token.user_id).await?;
            let deleted = self.tokens.delete_all(&owned).await?;
            warn!(
                "Persistent token value mismatch for user {}, invalidated {} sessions",
                token.user_id, deleted
            );
            return Err(TokenError::TokenTheft.into());
        }

        if token.is_expired(self.retention_cutoff(today)?) {
            self.tokens.delete_by_series(&token.series).await?;
            debug!("Rejected expired persistent token dated {}", token.token_date);
            return Err(TokenError::TokenExpired.into());
        }

        token.rotate(today);
        self.tokens.save(token).await
    }

    async fn find_user(&self, login: &str) -> DomainResult<User> {
        // A login that cannot be normalized cannot exist either
        let login = normalize_login(login).map_err(|_| DomainError::user_not_found())?;
        self.users
            .find_by_login(&login)
            .await?
            .ok_or_else(DomainError::user_not_found)
    }

    async fn current_login(&self) -> DomainResult<String> {
        self.users
            .resolve_current_user()
            .await?
            .ok_or_else(|| DomainError::NotFound {
                resource: "Current user login".to_string(),
            })
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}
