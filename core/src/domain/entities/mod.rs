//! Domain entities representing core business objects.

pub mod token;
pub mod user;

pub use token::{
    retention_cutoff, PersistentToken, MAX_IP_ADDRESS_LENGTH, MAX_USER_AGENT_LENGTH, SERIES_LENGTH,
    TOKEN_VALUE_LENGTH,
};
pub use user::User;
