//! Sheet sync API 模块
//!
//! 外部表格导入完成后调用，清空排班缓存并广播 `sheet_synced`。

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/sheets", routes())
}

fn routes() -> Router<ServerState> {
    Router::new().route("/{sheet_id}/synced", post(handler::synced))
}
