//! Unified error codes for the report workflow service
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 2xxx: Permission errors
//! - 4xxx: Report errors
//! - 5xxx: Workflow errors
//! - 6xxx: Assignment errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Specific role required
    RoleRequired = 2002,

    // ==================== 4xxx: Report ====================
    /// Report not found (deleted or never existed)
    ReportNotFound = 4001,
    /// Another report already owns the date + site natural key
    ReportKeyConflict = 4002,
    /// Staff entry not found
    StaffEntryNotFound = 4003,

    // ==================== 5xxx: Workflow ====================
    /// Unknown status literal
    InvalidStatus = 5001,
    /// Transition rejected by the guarded adjacency table
    TransitionNotAllowed = 5002,

    // ==================== 6xxx: Assignment ====================
    /// External assignment data could not be fetched
    AssignmentSourceUnavailable = 6001,

    // ==================== 9xxx: System ====================
    /// Database error
    DatabaseError = 9002,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the default message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field missing",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::RoleRequired => "Role required",

            // Report
            ErrorCode::ReportNotFound => "Report no longer exists",
            ErrorCode::ReportKeyConflict => "A report for this date and site already exists",
            ErrorCode::StaffEntryNotFound => "Staff entry not found",

            // Workflow
            ErrorCode::InvalidStatus => "Unknown report status",
            ErrorCode::TransitionNotAllowed => "Status transition not allowed",

            // Assignment
            ErrorCode::AssignmentSourceUnavailable => "Assignment data unavailable",

            // System
            ErrorCode::DatabaseError => "Database error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::RoleRequired),

            // Report
            4001 => Ok(ErrorCode::ReportNotFound),
            4002 => Ok(ErrorCode::ReportKeyConflict),
            4003 => Ok(ErrorCode::StaffEntryNotFound),

            // Workflow
            5001 => Ok(ErrorCode::InvalidStatus),
            5002 => Ok(ErrorCode::TransitionNotAllowed),

            // Assignment
            6001 => Ok(ErrorCode::AssignmentSourceUnavailable),

            // System
            9002 => Ok(ErrorCode::DatabaseError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
