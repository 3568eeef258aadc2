//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // 404 Not Found
            Self::NotFound | Self::ReportNotFound | Self::StaffEntryNotFound => {
                StatusCode::NOT_FOUND
            }

            // 409 Conflict
            Self::ReportKeyConflict | Self::TransitionNotAllowed => StatusCode::CONFLICT,

            // 403 Forbidden
            Self::PermissionDenied | Self::RoleRequired => StatusCode::FORBIDDEN,

            // 503 Service Unavailable (transient errors, client can retry)
            Self::AssignmentSourceUnavailable => StatusCode::SERVICE_UNAVAILABLE,

            // 500 Internal Server Error
            Self::DatabaseError => StatusCode::INTERNAL_SERVER_ERROR,

            // 400 Bad Request
            Self::ValidationFailed
            | Self::InvalidFormat
            | Self::RequiredField
            | Self::InvalidStatus => StatusCode::BAD_REQUEST,
        }
    }
}
