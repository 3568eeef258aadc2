//! Repository Module
//!
//! SQLite data access as free functions over a pool, a connection or an
//! open transaction (`&mut *tx`). Multi-statement invariants are enforced
//! one level up, in the workflow service.

pub mod comment;
pub mod photo;
pub mod report;
pub mod report_time;
pub mod site;
pub mod staff_entry;

use shared::error::{AppError, ErrorCode};
use sqlx::{Sqlite, SqlitePool, Transaction};
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    /// The report row no longer exists
    #[error("Report {0} not found")]
    ReportNotFound(i64),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    /// Referenced parent row is missing (SQLite code 787)
    #[error("Foreign key violation: {0}")]
    ForeignKey(String),
}

impl RepoError {
    /// A child-row write whose parent report was deleted concurrently
    pub fn for_report(self, report_id: i64) -> Self {
        match self {
            RepoError::ForeignKey(_) => RepoError::ReportNotFound(report_id),
            other => other,
        }
    }
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => RepoError::NotFound("row".into()),
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                RepoError::Duplicate(db.message().to_string())
            }
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                RepoError::ForeignKey(db.message().to_string())
            }
            _ => RepoError::Database(err.to_string()),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::ReportNotFound(id) => AppError::report_not_found(id),
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
            RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::ReportKeyConflict, msg),
            RepoError::Database(msg) => AppError::database(msg),
            RepoError::ForeignKey(msg) => AppError::validation(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Open a transaction holding the write lock from its first statement
///
/// A deferred transaction that reads before writing fails with
/// `SQLITE_BUSY_SNAPSHOT` once another connection commits in between, and
/// `busy_timeout` does not retry that case.
pub async fn begin_write(pool: &SqlitePool) -> RepoResult<Transaction<'static, Sqlite>> {
    Ok(pool.begin_with("BEGIN IMMEDIATE").await?)
}
