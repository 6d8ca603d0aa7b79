//! # Infrastructure Layer
//!
//! This crate implements the infrastructure layer for the session lifecycle
//! service. It provides concrete storage for the contracts defined in
//! `sl_core`.
//!
//! ## Architecture
//!
//! The infrastructure layer contains:
//! - **Database**: MySQL connection pool, schema and SQLx implementations of
//!   `TokenStore` and `UserDirectory`
//!
//! ## Features
//!
//! - `mysql`: Enable MySQL database support (default)

// Re-export core types for convenience
pub use sl_core::errors::*;

/// Database module - MySQL implementations using SQLx
#[cfg(feature = "mysql")]
pub mod database;

/// Configuration module for infrastructure services
pub mod config {
    //! Configuration management for infrastructure services

    // Re-export shared configs
    pub use sl_shared::config::{AppConfig, DatabaseConfig, SessionConfig};
}

/// Load configuration from the environment.
///
/// Reads a `.env` file first if one is present, then composes the shared
/// config loaders.
pub fn load_config() -> Result<config::AppConfig, InfrastructureError> {
    dotenvy::dotenv().ok();

    let config = config::AppConfig::from_env();

    if config.database.url.is_empty() {
        return Err(InfrastructureError::Config("DATABASE_URL is empty".to_string()));
    }
    config.session.validate().map_err(InfrastructureError::Config)?;

    Ok(config)
}

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Domain operation failed during startup
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),
}

/// Map a SQLx failure onto the domain storage error
#[cfg(feature = "mysql")]
pub(crate) fn storage_error(context: &str, e: sqlx::Error) -> DomainError {
    DomainError::Storage {
        message: format!("{}: {}", context, e),
    }
}
