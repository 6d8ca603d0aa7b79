//! Persistent token errors

use thiserror::Error;

/// Errors raised while validating a presented remember-me credential
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// No token is stored under the presented series
    #[error("Invalid persistent token")]
    InvalidToken,

    /// The token outlived the retention window
    #[error("Persistent token expired")]
    TokenExpired,

    /// Series matched but the value did not; the credential was likely copied
    #[error("Persistent token mismatch, possible theft")]
    TokenTheft,
}

impl TokenError {
    pub fn error_code(&self) -> &'static str {
        match self {
            TokenError::InvalidToken => "TOKEN_INVALID",
            TokenError::TokenExpired => "TOKEN_EXPIRED",
            TokenError::TokenTheft => "TOKEN_THEFT",
        }
    }
}
