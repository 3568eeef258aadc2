//! Staff Entry Repository
//!
//! Rows are keyed by (report_id, staff_name); the name is matched byte-exact.

use super::{RepoError, RepoResult};
use shared::models::{ReportStaffEntry, StaffEntryUpsert};
use sqlx::{QueryBuilder, Sqlite, SqliteExecutor, SqlitePool};

pub async fn list_for_report<'e, E>(exec: E, report_id: i64) -> RepoResult<Vec<ReportStaffEntry>>
where
    E: SqliteExecutor<'e>,
{
    let entries = sqlx::query_as::<_, ReportStaffEntry>(
        "SELECT * FROM report_staff_entry WHERE report_id = ? ORDER BY staff_name, id",
    )
    .bind(report_id)
    .fetch_all(exec)
    .await?;
    Ok(entries)
}

/// Create or update by (report_id, staff_name); absent fields keep their value
pub async fn upsert(
    pool: &SqlitePool,
    report_id: i64,
    staff_name: &str,
    data: &StaffEntryUpsert,
    now: i64,
) -> RepoResult<ReportStaffEntry> {
    let flags = data.flag_columns();

    let mut qb = QueryBuilder::<Sqlite>::new(
        "INSERT INTO report_staff_entry (report_id, staff_name, created_at, updated_at",
    );
    if data.report_content.is_some() {
        qb.push(", report_content");
    }
    for (column, _) in &flags {
        qb.push(", ").push(*column);
    }
    qb.push(") VALUES (");
    {
        let mut values = qb.separated(", ");
        values.push_bind(report_id);
        values.push_bind(staff_name);
        values.push_bind(now);
        values.push_bind(now);
        if let Some(content) = &data.report_content {
            values.push_bind(content.as_deref());
        }
        for (_, flag) in &flags {
            values.push_bind(*flag);
        }
    }
    qb.push(
        ") ON CONFLICT (report_id, staff_name) DO UPDATE SET updated_at = excluded.updated_at",
    );
    if data.report_content.is_some() {
        qb.push(", report_content = excluded.report_content");
    }
    for (column, _) in &flags {
        qb.push(format!(", {column} = excluded.{column}"));
    }
    qb.push(" RETURNING *");

    qb.build_query_as::<ReportStaffEntry>()
        .fetch_optional(pool)
        .await?
        .ok_or(RepoError::ReportNotFound(report_id))
}

/// Delete one entry of a report; false when the entry does not belong to it
pub async fn delete(pool: &SqlitePool, report_id: i64, entry_id: i64) -> RepoResult<bool> {
    let result = sqlx::query("DELETE FROM report_staff_entry WHERE id = ? AND report_id = ?")
        .bind(entry_id)
        .bind(report_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn delete_for_report<'e, E>(exec: E, report_id: i64) -> RepoResult<u64>
where
    E: SqliteExecutor<'e>,
{
    let result = sqlx::query("DELETE FROM report_staff_entry WHERE report_id = ?")
        .bind(report_id)
        .execute(exec)
        .await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use crate::db::repository::report::{self, NewReport};

    async fn seed(db: &DbService) -> i64 {
        let data = NewReport {
            report_date: "2025-11-01".into(),
            site_id: None,
            site_code: None,
            site_name: "Site A".into(),
            site_key: "sitea".into(),
            location: None,
            chief_name: None,
            created_by: "taro".into(),
        };
        report::find_or_create(&db.pool, &data, 1).await.unwrap().0.id
    }

    #[tokio::test]
    async fn test_upsert_same_name_updates_one_row() {
        let db = DbService::in_memory().await.unwrap();
        let report_id = seed(&db).await;

        let first = StaffEntryUpsert {
            report_content: Some(Some("morning shift".into())),
            driving_allowance: Some(true),
            ..Default::default()
        };
        let created = upsert(&db.pool, report_id, "Taro", &first, 1).await.unwrap();
        assert!(created.driving_allowance);
        assert_eq!(list_for_report(&db.pool, report_id).await.unwrap().len(), 1);

        let second = StaffEntryUpsert {
            laundry_allowance: Some(true),
            ..Default::default()
        };
        let updated = upsert(&db.pool, report_id, "Taro", &second, 2).await.unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.report_content.as_deref(), Some("morning shift"));
        assert!(updated.driving_allowance);
        assert!(updated.laundry_allowance);
        assert_eq!(list_for_report(&db.pool, report_id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_staff_name_is_case_sensitive() {
        let db = DbService::in_memory().await.unwrap();
        let report_id = seed(&db).await;
        let data = StaffEntryUpsert::default();

        upsert(&db.pool, report_id, "Taro", &data, 1).await.unwrap();
        upsert(&db.pool, report_id, "taro", &data, 1).await.unwrap();
        upsert(&db.pool, report_id, "Taro ", &data, 1).await.unwrap();
        assert_eq!(list_for_report(&db.pool, report_id).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_delete_checks_report_ownership() {
        let db = DbService::in_memory().await.unwrap();
        let report_id = seed(&db).await;
        let entry = upsert(&db.pool, report_id, "Taro", &StaffEntryUpsert::default(), 1)
            .await
            .unwrap();

        assert!(!delete(&db.pool, report_id + 1, entry.id).await.unwrap());
        assert!(delete(&db.pool, report_id, entry.id).await.unwrap());
        assert!(list_for_report(&db.pool, report_id).await.unwrap().is_empty());
    }
}
