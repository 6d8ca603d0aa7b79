//! MySQL-specific database implementations
//!
//! This module contains MySQL implementations of the storage contracts
//! using SQLx for database operations.

pub mod token_store_impl;
pub mod user_directory_impl;

// Re-export the MySQL implementations
pub use token_store_impl::MySqlTokenStore;
pub use user_directory_impl::MySqlUserDirectory;
