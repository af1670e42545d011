//! Input validation helpers
//!
//! Centralized length/range constants and validation functions.
//! SQLite TEXT has no built-in length enforcement, so every write path
//! validates here first.

use crate::utils::AppError;

// ── Field limits ────────────────────────────────────────────────────

/// Café and staff display names
pub const MAX_NAME_LEN: usize = 255;

/// City names
pub const MAX_CITY_LEN: usize = 100;

/// Street addresses
pub const MIN_ADDRESS_LEN: usize = 5;
pub const MAX_ADDRESS_LEN: usize = 255;

/// Free-form café descriptions
pub const MAX_DESCRIPTION_LEN: usize = 1000;

/// Passwords (before hashing)
pub const MIN_PASSWORD_LEN: usize = 6;
pub const MAX_PASSWORD_LEN: usize = 128;

/// Shift headcount bounds
pub const MIN_CAPACITY: i64 = 1;
pub const MAX_CAPACITY: i64 = 5;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

/// Validate a street address (minimum length matters here)
pub fn validate_address(value: &str) -> Result<(), AppError> {
    validate_required_text(value, "address", MAX_ADDRESS_LEN)?;
    if value.trim().len() < MIN_ADDRESS_LEN {
        return Err(AppError::validation(format!(
            "address is too short (min {MIN_ADDRESS_LEN} chars)"
        )));
    }
    Ok(())
}

/// Validate a phone number: optional leading '+', then 10-15 digits.
pub fn validate_phone(value: &str, field: &str) -> Result<(), AppError> {
    let digits = value.strip_prefix('+').unwrap_or(value);
    if digits.len() < 10 || digits.len() > 15 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(AppError::validation(format!(
            "{field} must be 10-15 digits, optionally prefixed with '+' (got {value:?})"
        )));
    }
    Ok(())
}

/// Validate a raw password before hashing.
pub fn validate_password(value: &str) -> Result<(), AppError> {
    if value.len() < MIN_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    if value.len() > MAX_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "password is too long (max {MAX_PASSWORD_LEN} characters)"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phone_accepts_plain_and_plus_prefixed() {
        assert!(validate_phone("89001234567", "phone").is_ok());
        assert!(validate_phone("+34600123456", "phone").is_ok());
        assert!(validate_phone("12345", "phone").is_err());
        assert!(validate_phone("+3460012345a", "phone").is_err());
    }

    #[test]
    fn address_needs_some_substance() {
        assert!(validate_address("1 Roast Street").is_ok());
        assert!(validate_address("x").is_err());
        assert!(validate_address("   ").is_err());
    }
}
