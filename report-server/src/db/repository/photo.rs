//! Report Photo Repository
//!
//! Read side only; rows are written by the upload collaborator.

use super::RepoResult;
use shared::models::ReportPhoto;
use sqlx::SqliteExecutor;

/// Photos not yet expired at `now`
pub async fn list_active<'e, E>(exec: E, report_id: i64, now: i64) -> RepoResult<Vec<ReportPhoto>>
where
    E: SqliteExecutor<'e>,
{
    let photos = sqlx::query_as::<_, ReportPhoto>(
        "SELECT * FROM report_photo WHERE report_id = ? \
         AND (expires_at IS NULL OR expires_at > ?) ORDER BY created_at, id",
    )
    .bind(report_id)
    .bind(now)
    .fetch_all(exec)
    .await?;
    Ok(photos)
}

pub async fn count_active<'e, E>(exec: E, report_id: i64, now: i64) -> RepoResult<i64>
where
    E: SqliteExecutor<'e>,
{
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM report_photo WHERE report_id = ? \
         AND (expires_at IS NULL OR expires_at > ?)",
    )
    .bind(report_id)
    .bind(now)
    .fetch_one(exec)
    .await?;
    Ok(count)
}

pub async fn delete_for_report<'e, E>(exec: E, report_id: i64) -> RepoResult<Vec<ReportPhoto>>
where
    E: SqliteExecutor<'e>,
{
    let removed = sqlx::query_as::<_, ReportPhoto>(
        "DELETE FROM report_photo WHERE report_id = ? RETURNING *",
    )
    .bind(report_id)
    .fetch_all(exec)
    .await?;
    Ok(removed)
}
