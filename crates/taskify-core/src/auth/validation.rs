use std::sync::OnceLock;

use regex::Regex;
use sha2::{Digest, Sha256};

use crate::error::ValidationError;

const EMAIL_PATTERN: &str = r#"^(([^<>()\[\]\\.,;:\s@"]+(\.[^<>()\[\]\\.,;:\s@"]+)*)|(".+"))@((\[[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\])|(([a-zA-Z\-0-9]+\.)+[a-zA-Z]{2,}))$"#;

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("email pattern compiles"))
}

/// Lowercase hex SHA-256 of the password. Unsalted.
pub fn hash_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

/// # Errors
/// Returns [`ValidationError::InvalidEmail`] when `email` does not look like
/// `local@domain.tld` (or a bracketed IPv4 domain).
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email_regex().is_match(&email.to_lowercase()) {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail(email.to_string()))
    }
}

/// At least 8 characters, one ASCII letter and one digit.
///
/// # Errors
/// Returns [`ValidationError::WeakPassword`] otherwise.
pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    let long_enough = password.chars().count() >= 8;
    let has_letter = password.chars().any(|c| c.is_ascii_alphabetic());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    if long_enough && has_letter && has_digit {
        Ok(())
    } else {
        Err(ValidationError::WeakPassword)
    }
}
