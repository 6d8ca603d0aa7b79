//! Persistent token session lifecycle
//!
//! - Listing and revoking a user's remember-me sessions
//! - Issuing tokens and validating them with value rotation
//! - Purging tokens older than the retention window, on demand or on a schedule

mod manager;
mod sweep;


pub use manager::SessionLifecycleManager;
pub use sl_shared::config::SessionConfig;
pub use sweep::{SweepResult, TokenSweepService};
