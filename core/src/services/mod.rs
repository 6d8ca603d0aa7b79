//! Business services containing domain logic and use cases.

pub mod session;

// Re-export commonly used types
pub use session::{SessionConfig, SessionLifecycleManager, SweepResult, TokenSweepService};
