//! Snapshot lifecycle endpoints
//!
//! Data is loaded once and held in memory; these endpoints expose the
//! explicit-reload lifecycle and the snapshot's status line.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::error::{ApiError, ApiResult};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct StateInfo {
    pub generation: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loaded_at: Option<String>,
    pub tag_count: usize,
    pub product_count: usize,
}

/// GET /api/state
pub async fn app_state_info(State(state): State<AppState>) -> ApiResult<Json<StateInfo>> {
    let view = state.read_view()?;
    Ok(Json(StateInfo {
        generation: view.generation,
        last_error: view.last_error.clone(),
        loaded_at: view.loaded_at.map(|t| t.to_rfc3339()),
        tag_count: view.tags.len(),
        product_count: view.products.len(),
    }))
}

/// POST /api/reload
///
/// Refresh the in-memory snapshot from the data root. A taxonomy failure
/// is blocking and retryable: the previous snapshot stays visible and the
/// error is returned.
pub async fn reload(State(state): State<AppState>) -> ApiResult<Json<StateInfo>> {
    state.reload().await;

    let view = state.read_view()?;
    if let Some(error) = &view.last_error {
        return Err(ApiError::Upstream(format!("Reload failed: {error}")));
    }

    Ok(Json(StateInfo {
        generation: view.generation,
        last_error: None,
        loaded_at: view.loaded_at.map(|t| t.to_rfc3339()),
        tag_count: view.tags.len(),
        product_count: view.products.len(),
    }))
}
