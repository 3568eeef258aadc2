//! 实时推送消息类型定义
//!
//! 这些类型在 report-server 和 clients 之间共享，用于
//! WebSocket 推送与订阅指令。事件只表示"有变化，请重新拉取"，
//! 不携带增量数据。

use serde::{Deserialize, Serialize};
use std::fmt;

use uuid::Uuid;

use crate::models::{ReportStatus, Role};

/// 订阅主题
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "key", rename_all = "snake_case")]
pub enum Topic {
    /// 所有连接自动加入
    Global,
    /// 单个报告
    Report(i64),
    /// 角色频道
    Role(Role),
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Topic::Global => write!(f, "global"),
            Topic::Report(id) => write!(f, "report:{}", id),
            Topic::Role(role) => write!(f, "role:{}", role),
        }
    }
}

/// 服务端推送事件
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RealtimeEvent {
    /// 连接建立
    Ready { connection_id: Uuid },
    /// 新报告已持久化
    ReportCreated { report_id: i64 },
    /// 报告字段更新（含时间记录）
    ReportUpdated { report_id: i64 },
    /// 状态变更已提交
    ReportStatusChanged {
        report_id: i64,
        status: ReportStatus,
    },
    /// 作业员记录更新
    ReportStaffEntryUpdated { report_id: i64 },
    /// 外部表格同步完成
    SheetSynced { sheet_id: String, row_count: u64 },
    /// 指令解析失败
    Error { message: String },
}

impl RealtimeEvent {
    /// 关联的报告 ID
    pub fn report_id(&self) -> Option<i64> {
        match self {
            RealtimeEvent::ReportCreated { report_id }
            | RealtimeEvent::ReportUpdated { report_id }
            | RealtimeEvent::ReportStatusChanged { report_id, .. }
            | RealtimeEvent::ReportStaffEntryUpdated { report_id } => Some(*report_id),
            _ => None,
        }
    }

    /// 事件名称（用于日志）
    pub fn name(&self) -> &'static str {
        match self {
            RealtimeEvent::Ready { .. } => "ready",
            RealtimeEvent::ReportCreated { .. } => "report_created",
            RealtimeEvent::ReportUpdated { .. } => "report_updated",
            RealtimeEvent::ReportStatusChanged { .. } => "report_status_changed",
            RealtimeEvent::ReportStaffEntryUpdated { .. } => "report_staff_entry_updated",
            RealtimeEvent::SheetSynced { .. } => "sheet_synced",
            RealtimeEvent::Error { .. } => "error",
        }
    }
}

/// 客户端订阅指令
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ClientCommand {
    SubscribeReport { report_id: i64 },
    UnsubscribeReport { report_id: i64 },
    SubscribeRole { role: Role },
    UnsubscribeRole { role: Role },
}

impl ClientCommand {
    /// 指令对应的主题
    pub fn topic(&self) -> Topic {
        match self {
            ClientCommand::SubscribeReport { report_id }
            | ClientCommand::UnsubscribeReport { report_id } => Topic::Report(*report_id),
            ClientCommand::SubscribeRole { role } | ClientCommand::UnsubscribeRole { role } => {
                Topic::Role(*role)
            }
        }
    }

    pub fn is_subscribe(&self) -> bool {
        matches!(
            self,
            ClientCommand::SubscribeReport { .. } | ClientCommand::SubscribeRole { .. }
        )
    }
}
