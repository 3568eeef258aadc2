//! Sheet sync API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::utils::validation::{MAX_SHORT_TEXT_LEN, validate_required_text};
use crate::utils::AppResult;

#[derive(Debug, Deserialize)]
pub struct SheetSynced {
    pub row_count: u64,
}

/// POST /api/sheets/:sheet_id/synced
pub async fn synced(
    State(state): State<ServerState>,
    Path(sheet_id): Path<String>,
    Json(payload): Json<SheetSynced>,
) -> AppResult<Json<bool>> {
    validate_required_text(&sheet_id, "sheet_id", MAX_SHORT_TEXT_LEN)?;

    state.resolver.invalidate();
    tracing::info!(sheet_id = %sheet_id, row_count = payload.row_count, "Sheet synced");
    state.notifier.sheet_synced(sheet_id, payload.row_count);
    Ok(Json(true))
}
