//! Report Time Repository (1:1, created lazily)

use super::{RepoError, RepoResult};
use shared::models::{ReportTime, ReportTimeUpdate};
use sqlx::{QueryBuilder, Sqlite, SqliteExecutor, SqlitePool};

pub async fn find<'e, E>(exec: E, report_id: i64) -> RepoResult<Option<ReportTime>>
where
    E: SqliteExecutor<'e>,
{
    let time = sqlx::query_as::<_, ReportTime>("SELECT * FROM report_time WHERE report_id = ?")
        .bind(report_id)
        .fetch_optional(exec)
        .await?;
    Ok(time)
}

/// First call creates the row, later calls update only the provided columns
pub async fn upsert(
    pool: &SqlitePool,
    report_id: i64,
    data: &ReportTimeUpdate,
    now: i64,
) -> RepoResult<ReportTime> {
    let columns = data.columns();

    let mut qb = QueryBuilder::<Sqlite>::new("INSERT INTO report_time (report_id, updated_at");
    for (column, _) in &columns {
        qb.push(", ").push(*column);
    }
    qb.push(") VALUES (");
    {
        let mut values = qb.separated(", ");
        values.push_bind(report_id);
        values.push_bind(now);
        for (_, value) in &columns {
            values.push_bind(*value);
        }
    }
    qb.push(") ON CONFLICT (report_id) DO UPDATE SET updated_at = excluded.updated_at");
    for (column, _) in &columns {
        qb.push(format!(", {column} = excluded.{column}"));
    }
    qb.push(" RETURNING *");

    qb.build_query_as::<ReportTime>()
        .fetch_optional(pool)
        .await?
        .ok_or(RepoError::ReportNotFound(report_id))
}

pub async fn delete_for_report<'e, E>(exec: E, report_id: i64) -> RepoResult<u64>
where
    E: SqliteExecutor<'e>,
{
    let result = sqlx::query("DELETE FROM report_time WHERE report_id = ?")
        .bind(report_id)
        .execute(exec)
        .await?;
    Ok(result.rows_affected())
}
