//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::sync::Arc;

use report_server::assignment::StaticAssignmentSource;
use report_server::db::DbService;
use report_server::{Config, ServerState};
use shared::models::{Actor, AssignmentRow, ReportCreate, Role};
use tempfile::TempDir;

pub struct TestServer {
    pub state: ServerState,
    pub dir: TempDir,
}

/// File-backed database in a fresh temp directory
pub async fn setup(rows: Vec<AssignmentRow>, strict: bool) -> TestServer {
    let dir = tempfile::tempdir().unwrap();
    let mut config = Config::with_overrides(dir.path().to_string_lossy().to_string(), 0);
    config.database_path = None;
    config.strict_transitions = strict;
    config.ensure_work_dir_structure().unwrap();

    let db = DbService::new(&config.database_file().to_string_lossy())
        .await
        .unwrap();
    let source = Arc::new(StaticAssignmentSource::new(rows));
    TestServer {
        state: ServerState::new(config, db, source),
        dir,
    }
}

pub fn actor(name: &str, role: Role) -> Actor {
    Actor::new(name, role)
}

pub fn create(date: &str, site: &str) -> ReportCreate {
    ReportCreate {
        report_date: date.into(),
        site_name: site.into(),
        ..Default::default()
    }
}

pub fn assignment(date: &str, site: &str, staff: &str) -> AssignmentRow {
    AssignmentRow {
        date: date.into(),
        job_id: None,
        site_name: site.into(),
        location: None,
        staff_name: staff.into(),
    }
}

pub async fn count(state: &ServerState, sql: &str, report_id: i64) -> i64 {
    sqlx::query_scalar(sql)
        .bind(report_id)
        .fetch_one(state.get_pool())
        .await
        .unwrap()
}
