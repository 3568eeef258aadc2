//! Report API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use shared::models::{
    CommentCreate, PhotoSummary, Report, ReportComment, ReportCreate, ReportDetail,
    ReportStaffEntry, ReportStatus, ReportTime, ReportTimeUpdate, ReportUpdate, StaffEntryUpsert,
    StatusTransition, TransitionOutcome,
};
use shared::util::normalize_key;

use crate::auth::CurrentActor;
use crate::core::ServerState;
use crate::db::repository::report::ReportFilter;
use crate::utils::time::normalize_date;
use crate::utils::AppResult;

const DEFAULT_LIMIT: i64 = 100;
const MAX_LIMIT: i64 = 500;

/// `GET /api/reports` query
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub site_name: Option<String>,
    pub site_code: Option<String>,
    pub location: Option<String>,
    pub chief_name: Option<String>,
    pub status: Option<String>,
    /// Keep only reports assigned to this staff member
    pub assigned_staff: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl ListQuery {
    fn into_filter(self, actor: &CurrentActor) -> AppResult<(ReportFilter, Option<String>)> {
        let status = non_blank(self.status)
            .map(|s| s.parse::<ReportStatus>())
            .transpose()?;
        let date_from = non_blank(self.date_from)
            .map(|d| normalize_date(&d))
            .transpose()?;
        let date_to = non_blank(self.date_to)
            .map(|d| normalize_date(&d))
            .transpose()?;

        let filter = ReportFilter {
            statuses: actor.0.role.visible_statuses().map(|s| s.to_vec()),
            status,
            date_from,
            date_to,
            site_key: non_blank(self.site_name).map(|s| normalize_key(&s)),
            site_code: non_blank(self.site_code),
            location: non_blank(self.location),
            chief_name: non_blank(self.chief_name),
            limit: self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT),
            offset: self.offset.unwrap_or(0).max(0),
        };
        Ok((filter, non_blank(self.assigned_staff)))
    }
}

/// GET /api/reports - 按角色视图筛选报告
pub async fn list(
    State(state): State<ServerState>,
    actor: CurrentActor,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Report>>> {
    let (filter, assigned_staff) = query.into_filter(&actor)?;
    let reports = state.workflow.list(&filter).await?;

    let Some(staff_name) = assigned_staff else {
        return Ok(Json(reports));
    };

    let mut assigned = Vec::with_capacity(reports.len());
    for report in reports {
        if state.resolver.belongs_to(&report, &staff_name).await? {
            assigned.push(report);
        }
    }
    Ok(Json(assigned))
}

/// POST /api/reports - find-or-create (201 新建 / 200 已存在)
pub async fn create(
    State(state): State<ServerState>,
    CurrentActor(actor): CurrentActor,
    Json(payload): Json<ReportCreate>,
) -> AppResult<(StatusCode, Json<Report>)> {
    let (report, created) = state.workflow.find_or_create(payload, &actor).await?;
    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(report)))
}

/// GET /api/reports/:id - 报告详情
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ReportDetail>> {
    Ok(Json(state.workflow.get(id).await?))
}

/// PATCH /api/reports/:id - 部分更新
pub async fn update(
    State(state): State<ServerState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<i64>,
    Json(payload): Json<ReportUpdate>,
) -> AppResult<Json<Report>> {
    Ok(Json(state.workflow.update(id, payload, &actor).await?))
}

/// DELETE /api/reports/:id - 级联删除
pub async fn delete(
    State(state): State<ServerState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    state.workflow.delete_report(id, &actor).await?;
    Ok(Json(true))
}

/// POST /api/reports/:id/status - 状态迁移
pub async fn transition(
    State(state): State<ServerState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<i64>,
    Json(payload): Json<StatusTransition>,
) -> AppResult<Json<TransitionOutcome>> {
    Ok(Json(state.workflow.transition(id, payload, &actor).await?))
}

/// PUT /api/reports/:id/time
pub async fn upsert_time(
    State(state): State<ServerState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<i64>,
    Json(payload): Json<ReportTimeUpdate>,
) -> AppResult<Json<ReportTime>> {
    Ok(Json(state.workflow.upsert_time(id, payload, &actor).await?))
}

/// PUT /api/reports/:id/staff/:staff_name
pub async fn upsert_staff_entry(
    State(state): State<ServerState>,
    CurrentActor(actor): CurrentActor,
    Path((id, staff_name)): Path<(i64, String)>,
    Json(payload): Json<StaffEntryUpsert>,
) -> AppResult<Json<ReportStaffEntry>> {
    let entry = state
        .workflow
        .upsert_staff_entry(id, &staff_name, payload, &actor)
        .await?;
    Ok(Json(entry))
}

/// DELETE /api/reports/:id/staff-entries/:entry_id
pub async fn delete_staff_entry(
    State(state): State<ServerState>,
    CurrentActor(actor): CurrentActor,
    Path((id, entry_id)): Path<(i64, i64)>,
) -> AppResult<Json<bool>> {
    state
        .workflow
        .delete_staff_entry(id, entry_id, &actor)
        .await?;
    Ok(Json(true))
}

/// GET /api/reports/:id/comments - 审计记录 (时间顺序)
pub async fn list_comments(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<ReportComment>>> {
    Ok(Json(state.workflow.list_comments(id).await?))
}

/// POST /api/reports/:id/comments
pub async fn add_comment(
    State(state): State<ServerState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<i64>,
    Json(payload): Json<CommentCreate>,
) -> AppResult<Json<ReportComment>> {
    Ok(Json(state.workflow.add_comment(id, &payload.text, &actor).await?))
}

/// GET /api/reports/:id/photos
pub async fn photos(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<PhotoSummary>> {
    Ok(Json(state.workflow.photos_summary(id).await?))
}
