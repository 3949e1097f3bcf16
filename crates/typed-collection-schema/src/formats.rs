//! Format checks for string fields
//!
//! Regexes are compiled once on first use.

use once_cell::sync::Lazy;
use regex::Regex;

/// RFC 5322, simplified
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap()
});

static URL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https?://[^\s/$.?#].[^\s]*$").unwrap()
});

/// Any version, hyphenated
static UUID_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .unwrap()
});

/// `mongodb://` or `mongodb+srv://` followed by a non-empty host part
static CONNECTION_STRING_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^mongodb(\+srv)?://[^\s/]+(/[^\s]*)?$").unwrap()
});

/// Validate email format
///
/// # Example
/// ```
/// use typed_collection_schema::formats::validate_email;
///
/// assert!(validate_email("billing@example.com"));
/// assert!(!validate_email("billing"));
/// ```
pub fn validate_email(value: &str) -> bool {
    EMAIL_REGEX.is_match(value)
}

pub fn validate_url(value: &str) -> bool {
    URL_REGEX.is_match(value)
}

pub fn validate_uuid(value: &str) -> bool {
    UUID_REGEX.is_match(value)
}

/// Validate the shape of a MongoDB connection string
///
/// Only the scheme and host part are checked here; the driver parses the
/// options.
///
/// # Example
/// ```
/// use typed_collection_schema::formats::validate_connection_string;
///
/// assert!(validate_connection_string("mongodb://host/db"));
/// assert!(validate_connection_string("mongodb+srv://cluster0.example.net"));
/// assert!(!validate_connection_string("postgres://host/db"));
/// ```
pub fn validate_connection_string(value: &str) -> bool {
    CONNECTION_STRING_REGEX.is_match(value)
}
