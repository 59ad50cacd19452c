//! Input validation helpers
//!
//! Centralized text length constants and validation functions used by
//! the CRUD handlers. The document store has no built-in length
//! enforcement, so limits are applied here.

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: customer, account, master item, sub item
pub const MAX_NAME_LEN: usize = 200;

/// Short identifiers: codes, mobile/whatsapp numbers, categories
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Notes and descriptions
pub const MAX_NOTE_LEN: usize = 500;

/// Addresses
pub const MAX_ADDRESS_LEN: usize = 500;

/// Image paths / URLs
pub const MAX_URL_LEN: usize = 2048;

/// Upper bound for any single monetary amount
pub const MAX_AMOUNT: f64 = 10_000_000.0;

// ── Validation helpers (CRUD handlers) ──────────────────────────────

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

/// Validate a monetary amount: finite, strictly positive, bounded.
pub fn validate_amount(value: f64, field: &str) -> Result<(), AppError> {
    if !value.is_finite() {
        return Err(AppError::validation(format!(
            "{field} must be a finite number, got {value}"
        )));
    }
    if value <= 0.0 {
        return Err(AppError::validation(format!(
            "{field} must be positive, got {value}"
        )));
    }
    if value > MAX_AMOUNT {
        return Err(AppError::validation(format!(
            "{field} exceeds maximum allowed ({MAX_AMOUNT}), got {value}"
        )));
    }
    Ok(())
}

/// Validate a non-negative monetary amount (totals may legitimately be zero).
pub fn validate_non_negative_amount(value: f64, field: &str) -> Result<(), AppError> {
    if !value.is_finite() {
        return Err(AppError::validation(format!(
            "{field} must be a finite number, got {value}"
        )));
    }
    if value < 0.0 {
        return Err(AppError::validation(format!(
            "{field} must be non-negative, got {value}"
        )));
    }
    if value > MAX_AMOUNT {
        return Err(AppError::validation(format!(
            "{field} exceeds maximum allowed ({MAX_AMOUNT}), got {value}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_required_text() {
        assert!(validate_required_text("  ", "name", MAX_NAME_LEN).is_err());
        assert!(validate_required_text("Lehenga", "name", MAX_NAME_LEN).is_ok());
    }

    #[test]
    fn rejects_non_positive_amounts() {
        assert!(validate_amount(-1.0, "amount").is_err());
        assert!(validate_amount(0.0, "amount").is_err());
        assert!(validate_amount(f64::NAN, "amount").is_err());
        assert!(validate_amount(500.0, "amount").is_ok());
        assert!(validate_non_negative_amount(0.0, "total_amount").is_ok());
    }
}
