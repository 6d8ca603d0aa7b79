//! User entity, referenced by the session lifecycle only through its identity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User entity representing a registered account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier for the user
    pub id: Uuid,

    /// Login name, stored lower-cased
    pub login: String,

    /// Contact email
    pub email: Option<String>,

    /// Whether the account has been activated
    pub activated: bool,

    /// Key issued by the password reset flow
    #[serde(skip_serializing)]
    pub reset_key: Option<String>,

    /// When the reset key was issued
    pub reset_date: Option<DateTime<Utc>>,

    /// Timestamp when the user was created
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Creates a new, not yet activated user
    pub fn new(login: &str, email: Option<&str>) -> Self {
        Self {
            id: Uuid::new_v4(),
            login: login.trim().to_lowercase(),
            email: email.map(|e| e.trim().to_lowercase()),
            activated: false,
            reset_key: None,
            reset_date: None,
            created_at: Utc::now(),
        }
    }

    /// Marks the account as activated
    pub fn activate(&mut self) {
        self.activated = true;
    }

    /// Builder-style activation, handy for fixtures
    pub fn activated(mut self) -> Self {
        self.activate();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_normalizes_login() {
        let user = User::new(" JohnDoe ", Some("JohnDoe@Localhost"));
        assert_eq!(user.login, "johndoe");
        assert_eq!(user.email.as_deref(), Some("johndoe@localhost"));
        assert!(!user.activated);
        assert!(user.reset_key.is_none());
    }

    #[test]
    fn test_activation() {
        let user = User::new("johndoe", None).activated();
        assert!(user.activated);
    }
}
