//! 日报工作流 (Report Store + Status Transition Engine)
//!
//! 所有会改变报告可见状态的操作在持久化成功后通知 [`Notifier`]。
//! 多语句写入都在单个事务中执行；持有事务时不再使用连接池。

pub mod transition;

use std::sync::Arc;

use shared::models::{
    Actor, CommentType, PhotoSummary, Report, ReportComment, ReportCreate, ReportDetail,
    ReportStaffEntry, ReportTime, ReportTimeUpdate, ReportUpdate, StaffEntryUpsert,
};
use shared::util::{normalize_key, now_millis};
use sqlx::SqlitePool;

use crate::db::repository::report::{NewReport, ReportFilter};
use crate::db::repository::{
    RepoError, begin_write, comment, report, report_time, site, staff_entry,
};
use crate::realtime::Notifier;
use crate::services::PhotoStore;
use crate::utils::time::{normalize_date, parse_time_of_day};
use crate::utils::validation::{
    MAX_CONTENT_LEN, MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text,
    validate_patch_text, validate_required_text,
};
use crate::utils::{AppError, AppResult, ErrorCode};
pub use transition::TransitionPolicy;

/// Trim, treating blank as absent
fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn permission_check(actor: &Actor, action: &str) -> AppResult<()> {
    if actor.role.can_delete() {
        Ok(())
    } else {
        Err(AppError::permission_denied(format!(
            "Role {} may not {}",
            actor.role, action
        ))
        .with_detail("role", actor.role.as_str()))
    }
}

/// 报告聚合的读写入口
#[derive(Clone)]
pub struct ReportWorkflow {
    pool: SqlitePool,
    notifier: Notifier,
    photos: Arc<dyn PhotoStore>,
    policy: TransitionPolicy,
}

impl std::fmt::Debug for ReportWorkflow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportWorkflow")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl ReportWorkflow {
    pub fn new(
        pool: SqlitePool,
        notifier: Notifier,
        photos: Arc<dyn PhotoStore>,
        policy: TransitionPolicy,
    ) -> Self {
        Self {
            pool,
            notifier,
            photos,
            policy,
        }
    }

    pub fn policy(&self) -> TransitionPolicy {
        self.policy
    }

    /// Return the report for (date, normalized site name), creating it if absent.
    ///
    /// The boolean is true when this call created the row.
    pub async fn find_or_create(
        &self,
        data: ReportCreate,
        actor: &Actor,
    ) -> AppResult<(Report, bool)> {
        validate_required_text(&data.site_name, "site_name", MAX_NAME_LEN)?;
        validate_optional_text(&data.site_code, "site_code", MAX_SHORT_TEXT_LEN)?;
        validate_optional_text(&data.location, "location", MAX_SHORT_TEXT_LEN)?;
        validate_optional_text(&data.chief_name, "chief_name", MAX_NAME_LEN)?;
        let report_date = normalize_date(&data.report_date)?;

        let site_name = data.site_name.trim().to_string();
        let site_key = normalize_key(&site_name);
        let mut site_id = data.site_id;
        let mut site_code = trimmed(data.site_code);
        let mut location = trimmed(data.location);

        // 站点主数据补全
        if site_id.is_none() || site_code.is_none() || location.is_none() {
            let mut master = site::find_by_name_key(&self.pool, &site_key).await?;
            if master.is_none()
                && let Some(code) = &site_code
            {
                master = site::find_by_code(&self.pool, code).await?;
            }
            if let Some(master) = master {
                site_id = site_id.or(Some(master.id));
                site_code = site_code.or(master.code);
                location = location.or(master.location);
            }
        }

        let new_report = NewReport {
            report_date,
            site_id,
            site_code,
            site_name,
            site_key,
            location,
            chief_name: trimmed(data.chief_name),
            created_by: actor.name.clone(),
        };
        let (report, created) = report::find_or_create(&self.pool, &new_report, now_millis()).await?;

        if created {
            tracing::info!(
                report_id = report.id,
                report_date = %report.report_date,
                site = %report.site_name,
                actor = %actor.name,
                "Report created"
            );
            self.notifier.report_created(report.id);
        }
        Ok((report, created))
    }

    async fn require_report(&self, report_id: i64) -> AppResult<Report> {
        report::find_by_id(&self.pool, report_id)
            .await?
            .ok_or_else(|| AppError::report_not_found(report_id))
    }

    /// Header + time + staff entries + photo count
    pub async fn get(&self, report_id: i64) -> AppResult<ReportDetail> {
        let report = self.require_report(report_id).await?;
        let time = report_time::find(&self.pool, report_id).await?;
        let staff_entries = staff_entry::list_for_report(&self.pool, report_id).await?;
        let photo_count = self.photos.count(report_id).await?;
        Ok(ReportDetail {
            report,
            time,
            staff_entries,
            photo_count,
        })
    }

    pub async fn list(&self, filter: &ReportFilter) -> AppResult<Vec<Report>> {
        Ok(report::list(&self.pool, filter).await?)
    }

    /// Partial update through the field whitelist
    ///
    /// Content fields owned by another role are dropped silently. Under the
    /// strict policy only the roles owning the current status may edit.
    pub async fn update(
        &self,
        report_id: i64,
        data: ReportUpdate,
        actor: &Actor,
    ) -> AppResult<Report> {
        if self.policy == TransitionPolicy::Strict {
            let current = self.require_report(report_id).await?;
            self.policy.check_edit(current.status, actor.role)?;
        }
        let mut data = data.retain_owned_by(actor.role);

        validate_patch_text(&data.site_code, "site_code", MAX_SHORT_TEXT_LEN)?;
        validate_patch_text(&data.location, "location", MAX_SHORT_TEXT_LEN)?;
        validate_patch_text(&data.chief_name, "chief_name", MAX_NAME_LEN)?;
        for (field, value) in [
            ("staff_report_content", &data.staff_report_content),
            ("chief_report_content", &data.chief_report_content),
            ("sales_comment", &data.sales_comment),
            ("accounting_comment", &data.accounting_comment),
        ] {
            validate_patch_text(value, field, MAX_CONTENT_LEN)?;
        }

        let site_key = match data.site_name.take() {
            Some(name) => {
                validate_required_text(&name, "site_name", MAX_NAME_LEN)?;
                let name = name.trim().to_string();
                let key = normalize_key(&name);
                data.site_name = Some(name);
                Some(key)
            }
            None => None,
        };

        let affected = report::update_fields(
            &self.pool,
            report_id,
            &data,
            site_key.as_deref(),
            &actor.name,
            now_millis(),
        )
        .await?;
        if affected == 0 {
            return Err(AppError::report_not_found(report_id));
        }

        tracing::debug!(report_id, actor = %actor.name, role = %actor.role, "Report updated");
        self.notifier.report_updated(report_id);
        self.require_report(report_id).await
    }

    pub async fn upsert_time(
        &self,
        report_id: i64,
        data: ReportTimeUpdate,
        actor: &Actor,
    ) -> AppResult<ReportTime> {
        for (field, value) in data.columns() {
            if let Some(v) = value {
                parse_time_of_day(v, field)?;
            }
        }
        let time = report_time::upsert(&self.pool, report_id, &data, now_millis())
            .await
            .map_err(|e| e.for_report(report_id))?;
        tracing::debug!(report_id, actor = %actor.name, "Report time saved");
        self.notifier.report_updated(report_id);
        Ok(time)
    }

    /// Create or update the entry of `staff_name` (exact, case-sensitive)
    pub async fn upsert_staff_entry(
        &self,
        report_id: i64,
        staff_name: &str,
        data: StaffEntryUpsert,
        actor: &Actor,
    ) -> AppResult<ReportStaffEntry> {
        validate_required_text(staff_name, "staff_name", MAX_NAME_LEN)?;
        validate_patch_text(&data.report_content, "report_content", MAX_CONTENT_LEN)?;
        let entry = staff_entry::upsert(&self.pool, report_id, staff_name, &data, now_millis())
            .await
            .map_err(|e| e.for_report(report_id))?;
        tracing::debug!(report_id, entry_id = entry.id, actor = %actor.name, "Staff entry saved");
        self.notifier.staff_entry_updated(report_id);
        Ok(entry)
    }

    pub async fn delete_staff_entry(
        &self,
        report_id: i64,
        entry_id: i64,
        actor: &Actor,
    ) -> AppResult<()> {
        permission_check(actor, "delete staff entries")?;
        self.require_report(report_id).await?;

        if !staff_entry::delete(&self.pool, report_id, entry_id).await? {
            return Err(AppError::with_message(
                ErrorCode::StaffEntryNotFound,
                format!("Staff entry {} not found", entry_id),
            )
            .with_detail("entry_id", entry_id));
        }

        tracing::info!(report_id, entry_id, actor = %actor.name, "Staff entry deleted");
        self.notifier.staff_entry_updated(report_id);
        Ok(())
    }

    /// Delete a report with its time record, staff entries and comments
    ///
    /// Photos are removed through the photo store after commit; a failure there
    /// is logged and does not undo the delete.
    pub async fn delete_report(&self, report_id: i64, actor: &Actor) -> AppResult<()> {
        permission_check(actor, "delete reports")?;

        let mut tx = begin_write(&self.pool).await?;
        let comments = comment::delete_for_report(&mut *tx, report_id).await?;
        let entries = staff_entry::delete_for_report(&mut *tx, report_id).await?;
        report_time::delete_for_report(&mut *tx, report_id).await?;
        if !report::delete(&mut *tx, report_id).await? {
            return Err(AppError::report_not_found(report_id));
        }
        tx.commit().await.map_err(RepoError::from)?;

        tracing::info!(report_id, comments, entries, actor = %actor.name, "Report deleted");

        if let Err(e) = self.photos.delete_for_report(report_id).await {
            tracing::warn!(report_id, error = %e, "Failed to delete report photos");
        }
        // 订阅者重新拉取时得到 ReportNotFound，据此移除本地引用
        self.notifier.report_updated(report_id);
        Ok(())
    }

    /// Append a free comment
    pub async fn add_comment(
        &self,
        report_id: i64,
        text: &str,
        actor: &Actor,
    ) -> AppResult<ReportComment> {
        validate_required_text(text, "text", MAX_NOTE_LEN)?;

        let comment = comment::insert(
            &self.pool,
            report_id,
            CommentType::Comment,
            text.trim(),
            &actor.name,
            now_millis(),
        )
        .await
        .map_err(|e| e.for_report(report_id))?;
        self.notifier.report_updated(report_id);
        Ok(comment)
    }

    /// Audit trail in insertion order
    pub async fn list_comments(&self, report_id: i64) -> AppResult<Vec<ReportComment>> {
        self.require_report(report_id).await?;
        Ok(comment::list_for_report(&self.pool, report_id).await?)
    }

    pub async fn photos_summary(&self, report_id: i64) -> AppResult<PhotoSummary> {
        self.require_report(report_id).await?;
        Ok(PhotoSummary::new(self.photos.list(report_id).await?))
    }
}
