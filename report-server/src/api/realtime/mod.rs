//! Realtime WebSocket 模块
//!
//! GET /api/realtime/ws
//!
//! 协议:
//! - Server → Client: RealtimeEvent (Ready, ReportCreated, ReportUpdated, ...)
//! - Client → Server: ClientCommand (subscribe/unsubscribe report / role)

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/realtime", routes())
}

fn routes() -> Router<ServerState> {
    Router::new().route("/ws", get(handler::handle_ws))
}
