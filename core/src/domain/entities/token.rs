//! Persistent (remember-me) token entity.

use chrono::{Days, NaiveDate};
use constant_time_eq::constant_time_eq;
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Length of a generated series identifier
pub const SERIES_LENGTH: usize = 20;

/// Length of a generated token value
pub const TOKEN_VALUE_LENGTH: usize = 20;

/// Column width for the recorded origin address (fits IPv6)
pub const MAX_IP_ADDRESS_LENGTH: usize = 39;

/// Column width for the recorded client descriptor
pub const MAX_USER_AGENT_LENGTH: usize = 255;

/// A remember-me credential record, keyed by `series`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistentToken {
    /// Unique, stable identifier of one login session
    pub series: String,

    /// Secret rotated on every successful auto-login; never sent back to clients
    #[serde(skip_serializing, default)]
    pub token_value: String,

    /// Owner of this token
    pub user_id: Uuid,

    /// Date the token was issued or last refreshed
    pub token_date: NaiveDate,

    /// Origin address recorded at issuance
    pub ip_address: Option<String>,

    /// Client descriptor recorded at issuance
    pub user_agent: Option<String>,
}

impl PersistentToken {
    /// Issues a token with a fresh series and value
    pub fn issue(
        user_id: Uuid,
        token_date: NaiveDate,
        ip_address: Option<&str>,
        user_agent: Option<&str>,
    ) -> Self {
        Self {
            series: generate_random(SERIES_LENGTH),
            token_value: generate_random(TOKEN_VALUE_LENGTH),
            user_id,
            token_date,
            ip_address: clip(ip_address, MAX_IP_ADDRESS_LENGTH),
            user_agent: clip(user_agent, MAX_USER_AGENT_LENGTH),
        }
    }

    /// Replaces the secret and refreshes the date, keeping the series
    pub fn rotate(&mut self, today: NaiveDate) {
        self.token_value = generate_random(TOKEN_VALUE_LENGTH);
        self.token_date = today;
    }

    /// A token is expired when its date is strictly before the cutoff
    pub fn is_expired(&self, cutoff: NaiveDate) -> bool {
        self.token_date < cutoff
    }

    /// Compares the presented secret without leaking timing
    pub fn matches_value(&self, presented: &str) -> bool {
        constant_time_eq(self.token_value.as_bytes(), presented.as_bytes())
    }

    pub fn belongs_to(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }
}

/// Oldest date a token may carry and still be retained.
///
/// `None` for a negative window or one reaching past the earliest
/// representable date.
pub fn retention_cutoff(today: NaiveDate, retention_days: i64) -> Option<NaiveDate> {
    let days = u64::try_from(retention_days).ok()?;
    today.checked_sub_days(Days::new(days))
}

fn generate_random(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

fn clip(value: Option<&str>, max: usize) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(|v| v.chars().take(max).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_issue_generates_series_and_value() {
        let user_id = Uuid::new_v4();
        let token = PersistentToken::issue(user_id, date(2024, 3, 1), Some("127.0.0.1"), Some("Test agent"));

        assert_eq!(token.series.len(), SERIES_LENGTH);
        assert_eq!(token.token_value.len(), TOKEN_VALUE_LENGTH);
        assert!(token.series.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(token.series, token.token_value);
        assert!(token.belongs_to(user_id));
        assert_eq!(token.ip_address.as_deref(), Some("127.0.0.1"));
        assert_eq!(token.user_agent.as_deref(), Some("Test agent"));
    }

    #[test]
    fn test_issue_never_reuses_series() {
        let user_id = Uuid::new_v4();
        let a = PersistentToken::issue(user_id, date(2024, 3, 1), None, None);
        let b = PersistentToken::issue(user_id, date(2024, 3, 1), None, None);
        assert_ne!(a.series, b.series);
    }

    #[test]
    fn test_audit_fields_are_clipped() {
        let long_agent = "x".repeat(MAX_USER_AGENT_LENGTH + 40);
        let token = PersistentToken::issue(Uuid::new_v4(), date(2024, 3, 1), Some("  "), Some(&long_agent));

        assert_eq!(token.ip_address, None);
        assert_eq!(token.user_agent.unwrap().len(), MAX_USER_AGENT_LENGTH);
    }

    #[test]
    fn test_rotate_keeps_series() {
        let mut token = PersistentToken::issue(Uuid::new_v4(), date(2024, 1, 1), None, None);
        let series = token.series.clone();
        let old_value = token.token_value.clone();

        token.rotate(date(2024, 2, 1));

        assert_eq!(token.series, series);
        assert_ne!(token.token_value, old_value);
        assert_eq!(token.token_date, date(2024, 2, 1));
    }

    #[test]
    fn test_expiry_is_strictly_before_cutoff() {
        let cutoff = date(2024, 2, 1);
        let mut token = PersistentToken::issue(Uuid::new_v4(), cutoff, None, None);
        assert!(!token.is_expired(cutoff));

        token.token_date = date(2024, 1, 31);
        assert!(token.is_expired(cutoff));
    }

    #[test]
    fn test_retention_cutoff() {
        assert_eq!(retention_cutoff(date(2024, 3, 2), 31), Some(date(2024, 1, 31)));
        assert_eq!(retention_cutoff(date(2024, 3, 2), 0), Some(date(2024, 3, 2)));
    }

    #[test]
    fn test_retention_cutoff_out_of_range() {
        assert_eq!(retention_cutoff(date(2024, 3, 2), 100_000_000), None);
        assert_eq!(retention_cutoff(date(2024, 3, 2), i64::MAX), None);
        assert_eq!(retention_cutoff(date(2024, 3, 2), -1), None);
    }

    #[test]
    fn test_matches_value() {
        let token = PersistentToken::issue(Uuid::new_v4(), date(2024, 1, 1), None, None);
        let presented = token.token_value.clone();
        assert!(token.matches_value(&presented));
        assert!(!token.matches_value("wrong"));
        assert!(!token.matches_value(""));
    }

    #[test]
    fn test_serialization_hides_token_value() {
        let token = PersistentToken::issue(Uuid::new_v4(), date(2024, 1, 1), Some("10.0.0.1"), None);
        let json = serde_json::to_string(&token).unwrap();

        assert!(json.contains(&token.series));
        assert!(!json.contains(&token.token_value));
        assert!(!json.contains("token_value"));
    }
}
