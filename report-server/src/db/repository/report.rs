//! Report Repository

use super::{RepoError, RepoResult};
use shared::models::{Report, ReportStatus, ReportUpdate};
use sqlx::{QueryBuilder, Sqlite, SqliteExecutor, SqlitePool};

/// Insert payload after validation and site resolution
#[derive(Debug, Clone)]
pub struct NewReport {
    pub report_date: String,
    pub site_id: Option<i64>,
    pub site_code: Option<String>,
    pub site_name: String,
    pub site_key: String,
    pub location: Option<String>,
    pub chief_name: Option<String>,
    pub created_by: String,
}

/// List filter; `statuses` is the role view, `status` an explicit filter
#[derive(Debug, Clone, Default)]
pub struct ReportFilter {
    pub statuses: Option<Vec<ReportStatus>>,
    pub status: Option<ReportStatus>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    /// Normalized substring of the site name
    pub site_key: Option<String>,
    pub site_code: Option<String>,
    pub location: Option<String>,
    pub chief_name: Option<String>,
    pub limit: i64,
    pub offset: i64,
}

pub async fn find_by_id<'e, E>(exec: E, id: i64) -> RepoResult<Option<Report>>
where
    E: SqliteExecutor<'e>,
{
    let report = sqlx::query_as::<_, Report>("SELECT * FROM report WHERE id = ?")
        .bind(id)
        .fetch_optional(exec)
        .await?;
    Ok(report)
}

pub async fn find_by_key<'e, E>(exec: E, report_date: &str, site_key: &str) -> RepoResult<Option<Report>>
where
    E: SqliteExecutor<'e>,
{
    let report = sqlx::query_as::<_, Report>(
        "SELECT * FROM report WHERE report_date = ? AND site_key = ?",
    )
    .bind(report_date)
    .bind(site_key)
    .fetch_optional(exec)
    .await?;
    Ok(report)
}

/// Insert unless the natural key is taken; returns the new id
pub async fn insert_if_absent<'e, E>(exec: E, data: &NewReport, now: i64) -> RepoResult<Option<i64>>
where
    E: SqliteExecutor<'e>,
{
    let id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO report (
            report_date, site_id, site_code, site_name, site_key, location, chief_name,
            status, created_by, updated_by, created_at, updated_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, 'draft', ?, ?, ?, ?)
        ON CONFLICT (report_date, site_key) DO NOTHING
        RETURNING id
        "#,
    )
    .bind(&data.report_date)
    .bind(data.site_id)
    .bind(&data.site_code)
    .bind(&data.site_name)
    .bind(&data.site_key)
    .bind(&data.location)
    .bind(&data.chief_name)
    .bind(&data.created_by)
    .bind(&data.created_by)
    .bind(now)
    .bind(now)
    .fetch_optional(exec)
    .await?;
    Ok(id)
}

/// Insert-then-select on conflict; never check-then-insert.
///
/// Returns the report and whether this call created it. A supplied
/// `site_code` that disagrees with the existing row is a conflict.
pub async fn find_or_create(pool: &SqlitePool, data: &NewReport, now: i64) -> RepoResult<(Report, bool)> {
    if let Some(id) = insert_if_absent(pool, data, now).await? {
        let report = find_by_id(pool, id)
            .await?
            .ok_or(RepoError::ReportNotFound(id))?;
        return Ok((report, true));
    }

    let existing = find_by_key(pool, &data.report_date, &data.site_key)
        .await?
        .ok_or_else(|| {
            // Only reachable if the winner was deleted between our insert and select
            RepoError::Database(format!(
                "Report for {} / {} vanished during find-or-create",
                data.report_date, data.site_name
            ))
        })?;

    if let (Some(wanted), Some(stored)) = (&data.site_code, &existing.site_code)
        && wanted.trim() != stored.trim()
    {
        return Err(RepoError::Duplicate(format!(
            "Report {} for {} already uses site code {}",
            existing.id, data.report_date, stored
        )));
    }

    Ok((existing, false))
}

/// Apply a partial update; only provided columns are touched.
///
/// `site_key` must accompany `data.site_name`. Audit columns are always written.
pub async fn update_fields<'e, E>(
    exec: E,
    id: i64,
    data: &ReportUpdate,
    site_key: Option<&str>,
    updated_by: &str,
    now: i64,
) -> RepoResult<u64>
where
    E: SqliteExecutor<'e>,
{
    let mut qb = QueryBuilder::<Sqlite>::new("UPDATE report SET updated_by = ");
    qb.push_bind(updated_by);
    qb.push(", updated_at = ").push_bind(now);

    if let Some(v) = data.site_id {
        qb.push(", site_id = ").push_bind(v);
    }
    if let Some(v) = &data.site_code {
        qb.push(", site_code = ").push_bind(v.as_deref());
    }
    if let Some(name) = &data.site_name {
        qb.push(", site_name = ").push_bind(name.as_str());
        if let Some(key) = site_key {
            qb.push(", site_key = ").push_bind(key);
        }
    }
    let text_columns = [
        ("location", &data.location),
        ("chief_name", &data.chief_name),
        ("staff_report_content", &data.staff_report_content),
        ("chief_report_content", &data.chief_report_content),
        ("sales_comment", &data.sales_comment),
        ("accounting_comment", &data.accounting_comment),
    ];
    for (column, value) in text_columns {
        if let Some(v) = value {
            qb.push(format!(", {column} = ")).push_bind(v.as_deref());
        }
    }

    qb.push(" WHERE id = ").push_bind(id);
    let result = qb.build().execute(exec).await?;
    Ok(result.rows_affected())
}

/// Write status, return reason and audit columns
pub async fn update_status<'e, E>(
    exec: E,
    id: i64,
    status: ReportStatus,
    return_reason: Option<&str>,
    updated_by: &str,
    now: i64,
) -> RepoResult<u64>
where
    E: SqliteExecutor<'e>,
{
    let result = sqlx::query(
        "UPDATE report SET status = ?, return_reason = ?, updated_by = ?, updated_at = ? WHERE id = ?",
    )
    .bind(status.as_str())
    .bind(return_reason)
    .bind(updated_by)
    .bind(now)
    .bind(id)
    .execute(exec)
    .await?;
    Ok(result.rows_affected())
}

pub async fn delete<'e, E>(exec: E, id: i64) -> RepoResult<bool>
where
    E: SqliteExecutor<'e>,
{
    let result = sqlx::query("DELETE FROM report WHERE id = ?")
        .bind(id)
        .execute(exec)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Filtered list, newest date first
pub async fn list(pool: &SqlitePool, filter: &ReportFilter) -> RepoResult<Vec<Report>> {
    let mut qb = QueryBuilder::<Sqlite>::new("SELECT * FROM report WHERE 1 = 1");

    if let Some(statuses) = &filter.statuses {
        if statuses.is_empty() {
            return Ok(Vec::new());
        }
        qb.push(" AND status IN (");
        let mut separated = qb.separated(", ");
        for status in statuses {
            separated.push_bind(status.as_str());
        }
        separated.push_unseparated(")");
    }
    if let Some(status) = filter.status {
        qb.push(" AND status = ").push_bind(status.as_str());
    }
    if let Some(from) = &filter.date_from {
        qb.push(" AND report_date >= ").push_bind(from.as_str());
    }
    if let Some(to) = &filter.date_to {
        qb.push(" AND report_date <= ").push_bind(to.as_str());
    }
    if let Some(key) = &filter.site_key {
        qb.push(" AND instr(site_key, ").push_bind(key.as_str()).push(") > 0");
    }
    if let Some(code) = &filter.site_code {
        qb.push(" AND site_code = ").push_bind(code.as_str());
    }
    if let Some(location) = &filter.location {
        qb.push(" AND instr(location, ").push_bind(location.as_str()).push(") > 0");
    }
    if let Some(chief) = &filter.chief_name {
        qb.push(" AND chief_name = ").push_bind(chief.as_str());
    }

    qb.push(" ORDER BY report_date DESC, id DESC LIMIT ")
        .push_bind(filter.limit)
        .push(" OFFSET ")
        .push_bind(filter.offset);

    let reports = qb.build_query_as::<Report>().fetch_all(pool).await?;
    Ok(reports)
}

pub async fn count(pool: &SqlitePool) -> RepoResult<i64> {
    let n = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM report")
        .fetch_one(pool)
        .await?;
    Ok(n)
}
