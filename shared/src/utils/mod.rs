//! Common utility functions

pub mod validation;

pub use validation::{decode_series, normalize_login, ValidationError};
