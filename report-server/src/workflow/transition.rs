//! Status Transition Engine
//!
//! 状态写入、审计评论写入在同一事务内完成；提交后才推送事件。

use serde::{Deserialize, Serialize};
use shared::models::{
    Actor, CommentType, ReportStatus, Role, StatusTransition, TransitionOutcome,
};
use shared::util::now_millis;

use super::ReportWorkflow;
use crate::db::repository::{RepoError, begin_write, comment, report};
use crate::utils::validation::{MAX_NOTE_LEN, validate_optional_text};
use crate::utils::{AppError, AppResult};

/// 迁移校验策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionPolicy {
    /// Any of the seven targets from any source; `completed` is not terminal
    #[default]
    Lenient,
    /// Only documented edges (plus self re-submission); `completed` is terminal
    Strict,
}

impl TransitionPolicy {
    pub fn check(&self, from: ReportStatus, to: ReportStatus) -> AppResult<()> {
        match self {
            TransitionPolicy::Lenient => Ok(()),
            TransitionPolicy::Strict => {
                if from == ReportStatus::Completed {
                    return Err(AppError::transition_not_allowed(from.as_str(), to.as_str()));
                }
                if from == to || from.allowed_next().contains(&to) {
                    Ok(())
                } else {
                    Err(AppError::transition_not_allowed(from.as_str(), to.as_str()))
                }
            }
        }
    }

    /// Strict 模式下只有当前状态的负责角色可以修改报告 (admin 除外)
    pub fn check_edit(&self, status: ReportStatus, role: Role) -> AppResult<()> {
        if *self == TransitionPolicy::Lenient
            || role == Role::Admin
            || status.editable_by().contains(&role)
        {
            return Ok(());
        }
        Err(AppError::permission_denied(format!(
            "Role {} may not edit a report in status {}",
            role, status
        ))
        .with_detail("status", status.as_str())
        .with_detail("role", role.as_str()))
    }
}

/// Audit text written on every status change
pub fn status_change_text(status: ReportStatus) -> String {
    format!("Status changed to {}", status)
}

impl ReportWorkflow {
    /// Move a report to `request.status`
    ///
    /// One `status_change` comment always, one `return_reason` comment when a
    /// non-empty reason is given; both commit or roll back with the status.
    pub async fn transition(
        &self,
        report_id: i64,
        request: StatusTransition,
        actor: &Actor,
    ) -> AppResult<TransitionOutcome> {
        let target: ReportStatus = request.status.trim().parse()?;
        validate_optional_text(&request.reason, "reason", MAX_NOTE_LEN)?;
        let reason = request
            .reason
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty());

        let now = now_millis();
        // 先读后写：写锁必须在第一条语句前取得
        let mut tx = begin_write(&self.pool).await?;

        let current = report::find_by_id(&mut *tx, report_id)
            .await?
            .ok_or(RepoError::ReportNotFound(report_id))?;
        self.policy.check(current.status, target)?;

        report::update_status(&mut *tx, report_id, target, reason, &actor.name, now).await?;

        let mut comments = Vec::with_capacity(2);
        comments.push(
            comment::insert(
                &mut *tx,
                report_id,
                CommentType::StatusChange,
                &status_change_text(target),
                &actor.name,
                now,
            )
            .await?,
        );
        if let Some(reason) = reason {
            comments.push(
                comment::insert(
                    &mut *tx,
                    report_id,
                    CommentType::ReturnReason,
                    reason,
                    &actor.name,
                    now,
                )
                .await?,
            );
        }

        let updated = report::find_by_id(&mut *tx, report_id)
            .await?
            .ok_or(RepoError::ReportNotFound(report_id))?;
        tx.commit().await.map_err(RepoError::from)?;

        tracing::info!(
            report_id,
            from = %current.status,
            status = %target,
            actor = %actor.name,
            role = %actor.role,
            "Report status changed"
        );
        self.notifier.report_status_changed(report_id, target);

        Ok(TransitionOutcome {
            report: updated,
            previous_status: current.status,
            comments,
        })
    }
}
