//! Notifier
//!
//! One method per event of the catalogue; each knows its own scope.
//! Publishing never fails the caller.

use std::sync::Arc;

use shared::message::{RealtimeEvent, Topic};
use shared::models::{ReportStatus, Role};

use super::SubscriberRegistry;

#[derive(Debug, Clone)]
pub struct Notifier {
    registry: Arc<SubscriberRegistry>,
}

impl Notifier {
    pub fn new(registry: Arc<SubscriberRegistry>) -> Self {
        Self { registry }
    }

    /// 全局 + chief 频道
    pub fn report_created(&self, report_id: i64) {
        self.send(
            &[Topic::Global, Topic::Role(Role::Chief)],
            RealtimeEvent::ReportCreated { report_id },
        );
    }

    pub fn report_updated(&self, report_id: i64) {
        self.send(
            &[Topic::Report(report_id)],
            RealtimeEvent::ReportUpdated { report_id },
        );
    }

    /// 报告订阅者 + sales + accounting，与新状态无关
    pub fn report_status_changed(&self, report_id: i64, status: ReportStatus) {
        self.send(
            &[
                Topic::Report(report_id),
                Topic::Role(Role::Sales),
                Topic::Role(Role::Accounting),
            ],
            RealtimeEvent::ReportStatusChanged { report_id, status },
        );
    }

    pub fn staff_entry_updated(&self, report_id: i64) {
        self.send(
            &[Topic::Report(report_id)],
            RealtimeEvent::ReportStaffEntryUpdated { report_id },
        );
    }

    pub fn sheet_synced(&self, sheet_id: impl Into<String>, row_count: u64) {
        self.send(
            &[Topic::Global],
            RealtimeEvent::SheetSynced {
                sheet_id: sheet_id.into(),
                row_count,
            },
        );
    }

    fn send(&self, topics: &[Topic], event: RealtimeEvent) {
        let delivered = self.registry.publish(topics, &event);
        tracing::debug!(event = event.name(), report_id = ?event.report_id(), delivered, "Realtime event published");
    }
}
