//! Report API 模块
//!
//! 操作者身份由 `X-Actor-Name` / `X-Actor-Role` 请求头声明。

mod handler;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/reports", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .patch(handler::update)
                .delete(handler::delete),
        )
        .route("/{id}/status", post(handler::transition))
        .route("/{id}/time", put(handler::upsert_time))
        .route("/{id}/staff/{staff_name}", put(handler::upsert_staff_entry))
        .route(
            "/{id}/staff-entries/{entry_id}",
            delete(handler::delete_staff_entry),
        )
        .route(
            "/{id}/comments",
            get(handler::list_comments).post(handler::add_comment),
        )
        .route("/{id}/photos", get(handler::photos))
}
