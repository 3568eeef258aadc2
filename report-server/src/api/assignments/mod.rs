//! Assignment API 模块

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/assignments", routes())
}

fn routes() -> Router<ServerState> {
    Router::new().route("/resolve", get(handler::resolve))
}
