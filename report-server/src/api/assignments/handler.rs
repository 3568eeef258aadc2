//! Assignment API Handlers

use axum::{
    Json,
    extract::{Query, State},
};
use shared::models::{Assignment, AssignmentQuery};

use crate::core::ServerState;
use crate::utils::time::normalize_date;
use crate::utils::validation::{MAX_NAME_LEN, validate_required_text};
use crate::utils::AppResult;

/// GET /api/assignments/resolve?date=&site_name=&job_id=&location=
pub async fn resolve(
    State(state): State<ServerState>,
    Query(mut query): Query<AssignmentQuery>,
) -> AppResult<Json<Assignment>> {
    validate_required_text(&query.site_name, "site_name", MAX_NAME_LEN)?;
    query.date = normalize_date(&query.date)?;
    Ok(Json(state.resolver.resolve(&query).await?))
}
