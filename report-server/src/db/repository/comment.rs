//! Report Comment Repository (append-only)

use super::RepoResult;
use shared::models::{CommentType, ReportComment};
use sqlx::SqliteExecutor;

pub async fn insert<'e, E>(
    exec: E,
    report_id: i64,
    comment_type: CommentType,
    text: &str,
    created_by: &str,
    now: i64,
) -> RepoResult<ReportComment>
where
    E: SqliteExecutor<'e>,
{
    let comment = sqlx::query_as::<_, ReportComment>(
        "INSERT INTO report_comment (report_id, comment_type, comment_text, created_by, created_at) \
         VALUES (?, ?, ?, ?, ?) RETURNING *",
    )
    .bind(report_id)
    .bind(comment_type)
    .bind(text)
    .bind(created_by)
    .bind(now)
    .fetch_one(exec)
    .await?;
    Ok(comment)
}

/// Chronological (insertion) order
pub async fn list_for_report<'e, E>(exec: E, report_id: i64) -> RepoResult<Vec<ReportComment>>
where
    E: SqliteExecutor<'e>,
{
    let comments = sqlx::query_as::<_, ReportComment>(
        "SELECT * FROM report_comment WHERE report_id = ? ORDER BY created_at, id",
    )
    .bind(report_id)
    .fetch_all(exec)
    .await?;
    Ok(comments)
}

pub async fn delete_for_report<'e, E>(exec: E, report_id: i64) -> RepoResult<u64>
where
    E: SqliteExecutor<'e>,
{
    let result = sqlx::query("DELETE FROM report_comment WHERE report_id = ?")
        .bind(report_id)
        .execute(exec)
        .await?;
    Ok(result.rows_affected())
}
