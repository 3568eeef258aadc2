//! Report Comment Model (append-only audit trail)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum CommentType {
    /// Free comment written by an actor
    Comment,
    /// Reason attached to a transition
    ReturnReason,
    /// Written on every status change
    StatusChange,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ReportComment {
    pub id: i64,
    pub report_id: i64,
    pub comment_type: CommentType,
    pub comment_text: String,
    pub created_by: Option<String>,
    pub created_at: i64,
}

/// Free comment payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentCreate {
    pub text: String,
}
