//! Persistent token retention and sweep configuration

use serde::{Deserialize, Serialize};

/// Days a token may go unrefreshed before the sweep removes it
pub const DEFAULT_RETENTION_DAYS: i64 = 31;

/// Longest retention window accepted from configuration (about a century)
pub const MAX_RETENTION_DAYS: i64 = 36_500;

/// Sweep cadence in seconds (daily)
pub const DEFAULT_SWEEP_INTERVAL_SECONDS: u64 = 86_400;

/// Persistent token configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    /// Tokens whose date is strictly before `today - retention_days` are expired
    #[serde(default = "default_retention_days")]
    pub retention_days: i64,

    /// How often the sweep runs (in seconds)
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_seconds: u64,

    /// Whether the background sweep runs at all
    #[serde(default = "default_sweep_enabled")]
    pub sweep_enabled: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            retention_days: DEFAULT_RETENTION_DAYS,
            sweep_interval_seconds: DEFAULT_SWEEP_INTERVAL_SECONDS,
            sweep_enabled: true,
        }
    }
}

impl SessionConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            retention_days: std::env::var("TOKEN_RETENTION_DAYS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|days: &i64| (1..=MAX_RETENTION_DAYS).contains(days))
                .unwrap_or(defaults.retention_days),
            sweep_interval_seconds: std::env::var("TOKEN_SWEEP_INTERVAL_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|secs: &u64| *secs > 0)
                .unwrap_or(defaults.sweep_interval_seconds),
            sweep_enabled: std::env::var("TOKEN_SWEEP_ENABLED")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.sweep_enabled),
        }
    }

    /// Check the values a sweep depends on.
    ///
    /// `retention_days` must be within `1..=MAX_RETENTION_DAYS` and the sweep
    /// interval must be non-zero.
    pub fn validate(&self) -> Result<(), String> {
        if !(1..=MAX_RETENTION_DAYS).contains(&self.retention_days) {
            return Err(format!(
                "TOKEN_RETENTION_DAYS must be between 1 and {}, got {}",
                MAX_RETENTION_DAYS, self.retention_days
            ));
        }
        if self.sweep_interval_seconds == 0 {
            return Err("TOKEN_SWEEP_INTERVAL_SECONDS must be positive".to_string());
        }
        Ok(())
    }

    /// Set the retention window in days
    pub fn with_retention_days(mut self, days: i64) -> Self {
        self.retention_days = days;
        self
    }

    /// Set the sweep interval in seconds
    pub fn with_sweep_interval(mut self, seconds: u64) -> Self {
        self.sweep_interval_seconds = seconds;
        self
    }
}

fn default_retention_days() -> i64 {
    DEFAULT_RETENTION_DAYS
}

fn default_sweep_interval() -> u64 {
    DEFAULT_SWEEP_INTERVAL_SECONDS
}

fn default_sweep_enabled() -> bool {
    true
}
