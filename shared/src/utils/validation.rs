//! Input validation for values that arrive from the transport layer

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// Column width of a persistent token series
pub const MAX_SERIES_LENGTH: usize = 20;

/// Column width of a user login
pub const MAX_LOGIN_LENGTH: usize = 50;

static SERIES_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9+/=_-]+$").expect("valid series pattern"));

static LOGIN_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[a-zA-Z0-9!$&*+=?^_`{|}~.-]+@[a-zA-Z0-9-]+(?:\.[a-zA-Z0-9-]+)*|[_.@A-Za-z0-9-]+)$")
        .expect("valid login pattern")
});

/// Validation error with field-level details
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    pub code: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            code: code.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Decode a URL-encoded series identifier taken from a request path.
///
/// Uses form decoding (`+` is a space), so a literal plus has to arrive as
/// `%2B`. Malformed escapes and anything that cannot be a stored series are
/// rejected before the value reaches the session manager.
pub fn decode_series(raw: &str) -> Result<String, ValidationError> {
    check_escapes(raw)?;

    let decoded = urlencoding::decode(&raw.replace('+', " "))
        .map_err(|_| ValidationError::new("series", "series is not valid UTF-8", "INVALID_ENCODING"))?
        .into_owned();

    if decoded.is_empty() {
        return Err(ValidationError::new("series", "series is required", "REQUIRED"));
    }
    if decoded.chars().count() > MAX_SERIES_LENGTH {
        return Err(ValidationError::new(
            "series",
            format!("series exceeds {} characters", MAX_SERIES_LENGTH),
            "TOO_LONG",
        ));
    }
    if !SERIES_PATTERN.is_match(&decoded) {
        return Err(ValidationError::new("series", "series contains invalid characters", "INVALID_FORMAT"));
    }

    Ok(decoded)
}

/// Normalize a login the way it is stored (trimmed, lower-cased).
pub fn normalize_login(login: &str) -> Result<String, ValidationError> {
    let login = login.trim().to_lowercase();
    if login.is_empty() {
        return Err(ValidationError::new("login", "login is required", "REQUIRED"));
    }
    if login.chars().count() > MAX_LOGIN_LENGTH {
        return Err(ValidationError::new(
            "login",
            format!("login exceeds {} characters", MAX_LOGIN_LENGTH),
            "TOO_LONG",
        ));
    }
    if !LOGIN_PATTERN.is_match(&login) {
        return Err(ValidationError::new("login", "login contains invalid characters", "INVALID_FORMAT"));
    }
    Ok(login)
}

// Every '%' must start a two-digit hex escape.
fn check_escapes(raw: &str) -> Result<(), ValidationError> {
    let bytes = raw.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let valid = bytes.len() > i + 2
                && bytes[i + 1].is_ascii_hexdigit()
                && bytes[i + 2].is_ascii_hexdigit();
            if !valid {
                return Err(ValidationError::new("series", "malformed percent escape", "INVALID_ENCODING"));
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_plain_series() {
        assert_eq!(decode_series("1111-1111").unwrap(), "1111-1111");
    }

    #[test]
    fn test_decode_escaped_series() {
        assert_eq!(decode_series("abc%2Bdef").unwrap(), "abc+def");
        assert_eq!(decode_series("YWJj%3D%3D").unwrap(), "YWJj==");
    }

    #[test]
    fn test_plus_is_a_space_and_rejected() {
        let err = decode_series("abc+def").unwrap_err();
        assert_eq!(err.code, "INVALID_FORMAT");
    }

    #[test]
    fn test_malformed_escape() {
        assert_eq!(decode_series("abc%2").unwrap_err().code, "INVALID_ENCODING");
        assert_eq!(decode_series("abc%zz").unwrap_err().code, "INVALID_ENCODING");
        assert_eq!(decode_series("%").unwrap_err().code, "INVALID_ENCODING");
    }

    #[test]
    fn test_invalid_utf8() {
        assert_eq!(decode_series("%FF%FE").unwrap_err().code, "INVALID_ENCODING");
    }

    #[test]
    fn test_empty_and_long_series() {
        assert_eq!(decode_series("").unwrap_err().code, "REQUIRED");
        let long = "a".repeat(MAX_SERIES_LENGTH + 1);
        assert_eq!(decode_series(&long).unwrap_err().code, "TOO_LONG");
    }

    #[test]
    fn test_control_characters_rejected() {
        assert_eq!(decode_series("abc%0Adef").unwrap_err().code, "INVALID_FORMAT");
    }

    #[test]
    fn test_normalize_login() {
        assert_eq!(normalize_login("  JohnDoe ").unwrap(), "johndoe");
        assert_eq!(normalize_login("john.doe@localhost").unwrap(), "john.doe@localhost");
        assert_eq!(normalize_login("").unwrap_err().code, "REQUIRED");
        assert_eq!(normalize_login("john doe").unwrap_err().code, "INVALID_FORMAT");
    }
}
