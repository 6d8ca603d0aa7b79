//! Scheduled sweep that purges persistent tokens past the retention window

use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

use crate::errors::DomainResult;
use crate::repositories::{TokenStore, UserDirectory};

use super::manager::SessionLifecycleManager;

/// Runs `purge_expired_tokens(today - retention_days)` on a fixed interval
pub struct TokenSweepService<T, U>
where
    T: TokenStore + 'static,
    U: UserDirectory + 'static,
{
    manager: Arc<SessionLifecycleManager<T, U>>,
}

impl<T, U> TokenSweepService<T, U>
where
    T: TokenStore + 'static,
    U: UserDirectory + 'static,
{
    /// Create a new sweep service; cadence and retention come from the manager's config
    pub fn new(manager: Arc<SessionLifecycleManager<T, U>>) -> Self {
        Self { manager }
    }

    /// Run a single sweep for the current date
    pub async fn run_sweep(&self) -> DomainResult<SweepResult> {
        self.run_sweep_at(Utc::now().date_naive()).await
    }

    /// Run a single sweep as of `today`.
    ///
    /// Storage failures are returned to the caller; nothing is retried here.
    pub async fn run_sweep_at(&self, today: NaiveDate) -> DomainResult<SweepResult> {
        let cutoff = self.manager.retention_cutoff(today)?;
        info!("Starting persistent token sweep, cutoff {}", cutoff);

        let tokens_deleted = self.manager.purge_expired_tokens(cutoff).await?;

        info!("Persistent token sweep completed - deleted {} tokens", tokens_deleted);
        Ok(SweepResult { cutoff, tokens_deleted })
    }

    /// Start the sweep as a background task.
    ///
    /// The first cycle runs immediately, then once per configured interval. A
    /// failed cycle is logged and the loop keeps going. Returns `None` when
    /// the sweep is disabled or its interval is zero.
    pub fn start_background_task(self: Arc<Self>) -> Option<JoinHandle<()>> {
        let config = self.manager.config();
        if !config.sweep_enabled {
            warn!("Persistent token sweep is disabled");
            return None;
        }
        if config.sweep_interval_seconds == 0 {
            error!("Persistent token sweep interval is zero, not starting");
            return None;
        }

        let interval_seconds = config.sweep_interval_seconds;
        let period = Duration::from_secs(interval_seconds);

        Some(tokio::spawn(async move {
            info!(
                "Persistent token sweep started - will run every {} seconds",
                interval_seconds
            );

            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;

                if let Err(e) = self.run_sweep().await {
                    error!("Persistent token sweep failed: {}", e);
                }
            }
        }))
    }
}

/// Outcome of one sweep
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepResult {
    /// Tokens dated strictly before this were eligible
    pub cutoff: NaiveDate,
    /// Number of tokens deleted
    pub tokens_deleted: usize,
}

impl SweepResult {
    pub fn is_noop(&self) -> bool {
        self.tokens_deleted == 0
    }
}
