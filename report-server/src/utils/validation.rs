//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! SQLite TEXT has no built-in length enforcement.

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Site names, chief names, staff names
pub const MAX_NAME_LEN: usize = 200;

/// Short identifiers: site code, location
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Return reasons, free comments
pub const MAX_NOTE_LEN: usize = 500;

/// Report body text written by each role
pub const MAX_CONTENT_LEN: usize = 10_000;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty"))
            .with_detail("field", field.to_string()));
    }
    if value.chars().count() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.chars().count()
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
        && v.chars().count() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.chars().count()
        )));
    }
    Ok(())
}

/// Same as [`validate_optional_text`] for partial-update fields.
pub fn validate_patch_text(
    value: &Option<Option<String>>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    match value {
        Some(inner) => validate_optional_text(inner, field, max_len),
        None => Ok(()),
    }
}
