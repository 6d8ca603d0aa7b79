//! # Session Lifecycle Core
//!
//! Domain layer for persistent (remember-me) login tokens.
//! This crate contains the token and user entities, the storage contracts with
//! in-memory implementations, the session lifecycle manager, the expiry sweep,
//! and the error types shared by every layer above it.

pub mod domain;
pub mod services;
pub mod repositories;
pub mod errors;

// Re-export commonly used types for convenience
pub use domain::*;
pub use services::*;
pub use repositories::*;
pub use errors::*;
