//! Summary and crawl-log endpoints

use axum::{extract::State, Json};

use cmx_common::docs::{Summary, UpdateLog};

use crate::error::ApiResult;
use crate::AppState;

/// GET /api/summary
///
/// The AI summary document; an absent document renders as empty sections.
pub async fn summary(State(state): State<AppState>) -> ApiResult<Json<Summary>> {
    let view = state.read_view()?;
    Ok(Json(view.summary.clone()))
}

/// GET /api/logs
///
/// Crawl update-log entries, newest first.
pub async fn update_logs(State(state): State<AppState>) -> ApiResult<Json<Vec<UpdateLog>>> {
    let view = state.read_view()?;
    Ok(Json(view.logs.clone()))
}
