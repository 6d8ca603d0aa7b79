//! Shared utilities and common types for the session lifecycle workspace
//!
//! This crate provides functionality used by every other crate:
//! - Configuration types loaded from the environment
//! - Input validation and series decoding

pub mod config;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{AppConfig, DatabaseConfig, Environment, LoggingConfig, SessionConfig};
pub use utils::validation;
