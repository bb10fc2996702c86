//! Admin console HTTP handlers
//!
//! Thin proxy surface between the embedded admin UI and the external
//! curation API. The session token never reaches the browser; it lives in
//! [`crate::admin::session::AdminSession`] and every remote 401 clears it.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::admin::client::{AdminError, JobKind};
use crate::error::{ApiError, ApiResult};
use crate::state::ViewEvent;
use crate::AppState;

const GET_RESOURCES: &[&str] = &["others", "untagged", "tags", "used-subtags", "logs"];

const FEATURE_ACTIONS: &[&str] = &["add", "edit", "delete", "update-tags", "mark-none"];

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub password: String,
}

/// POST /api/admin/login
///
/// Opens the server-held session; the browser only learns success/failure.
pub async fn login(
    State(state): State<AppState>,
    Json(form): Json<LoginForm>,
) -> ApiResult<Json<Value>> {
    match state.admin.login(&form.password).await {
        Ok(token) => {
            state.session.open(token);
            Ok(Json(json!({ "status": "ok" })))
        }
        Err(AdminError::Unauthorized) => {
            Err(ApiError::Unauthorized("Wrong password".to_string()))
        }
        Err(error) => Err(remote_error(&state, error)),
    }
}

/// POST /api/admin/logout
pub async fn logout(State(state): State<AppState>) -> Json<Value> {
    if let Some(token) = state.session.token() {
        // Best effort; the session is discarded either way
        let _ = state.admin.logout(&token).await;
    }
    state.session.close();
    Json(json!({ "status": "logged_out" }))
}

/// GET /api/admin/session
pub async fn session_info(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "authenticated": state.session.is_open() }))
}

/// GET /api/admin/:resource
///
/// Read proxy for the fixed set of curation list/document endpoints.
pub async fn admin_get(
    State(state): State<AppState>,
    Path(resource): Path<String>,
) -> ApiResult<Json<Value>> {
    if !GET_RESOURCES.contains(&resource.as_str()) {
        return Err(ApiError::NotFound(format!("Unknown admin resource: {resource}")));
    }
    let token = require_session(&state)?;
    let value = state
        .admin
        .get(&format!("/api/admin/{resource}"), &token)
        .await
        .map_err(|e| remote_error(&state, e))?;
    Ok(Json(value))
}

/// GET /api/admin/changelog - raw changelog text
pub async fn get_changelog(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let token = require_session(&state)?;
    let value = state
        .admin
        .get("/api/admin/changelog", &token)
        .await
        .map_err(|e| remote_error(&state, e))?;
    Ok(Json(value))
}

/// GET /api/admin/config - curation-side view config
pub async fn get_config(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let token = require_session(&state)?;
    let value = state
        .admin
        .get("/api/admin/config", &token)
        .await
        .map_err(|e| remote_error(&state, e))?;
    Ok(Json(value))
}

/// POST /api/admin/others/update
pub async fn update_others(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> ApiResult<Json<Value>> {
    let token = require_session(&state)?;
    let value = state
        .admin
        .post("/api/admin/others/update", &token, &body)
        .await
        .map_err(|e| remote_error(&state, e))?;
    Ok(Json(value))
}

/// POST /api/admin/feature/:action
pub async fn feature_action(
    State(state): State<AppState>,
    Path(action): Path<String>,
    Json(body): Json<Value>,
) -> ApiResult<Json<Value>> {
    if !FEATURE_ACTIONS.contains(&action.as_str()) {
        return Err(ApiError::BadRequest(format!("Unknown feature action: {action}")));
    }
    let token = require_session(&state)?;
    let value = state
        .admin
        .post(&format!("/api/admin/feature/{action}"), &token, &body)
        .await
        .map_err(|e| remote_error(&state, e))?;
    Ok(Json(value))
}

/// POST /api/admin/tag/rename
///
/// Bulk rename; the remote reports how many assignments were merged. The
/// rename is applied optimistically to the in-memory taxonomy so the
/// read-only views update without waiting for the next reload.
pub async fn rename_tag(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> ApiResult<Json<Value>> {
    let token = require_session(&state)?;
    let value = state
        .admin
        .post("/api/admin/tag/rename", &token, &body)
        .await
        .map_err(|e| remote_error(&state, e))?;

    if let (Some(from), Some(to)) = (field(&body, &["old_name", "from"]), field(&body, &["new_name", "to"])) {
        if let Some(merged) = value.get("merged_count").and_then(Value::as_u64) {
            info!(%from, %to, merged, "Tag renamed with merge");
        }
        state.view_write(ViewEvent::TagRenamed { from, to });
    }

    Ok(Json(value))
}

/// POST /api/admin/features - paginated feed item search
pub async fn search_features(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> ApiResult<Json<Value>> {
    let token = require_session(&state)?;
    let value = state
        .admin
        .post("/api/admin/features", &token, &body)
        .await
        .map_err(|e| remote_error(&state, e))?;
    Ok(Json(value))
}

/// POST /api/admin/changelog - save raw changelog text; the remote kicks
/// off its own parse and tag pass
pub async fn save_changelog(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> ApiResult<Json<Value>> {
    let token = require_session(&state)?;
    let value = state
        .admin
        .post("/api/admin/changelog", &token, &body)
        .await
        .map_err(|e| remote_error(&state, e))?;
    Ok(Json(value))
}

/// POST /api/admin/config
///
/// Saves the excluded-tags list remotely and applies it to the in-memory
/// snapshot immediately.
pub async fn save_config(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> ApiResult<Json<Value>> {
    let token = require_session(&state)?;
    let value = state
        .admin
        .post("/api/admin/config", &token, &body)
        .await
        .map_err(|e| remote_error(&state, e))?;

    if let Some(excluded) = body.get("exclude_tags").and_then(Value::as_array) {
        let exclude_tags = excluded
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect();
        state.view_write(ViewEvent::ExcludeTagsUpdated(exclude_tags));
    }

    Ok(Json(value))
}

/// POST /api/jobs/:kind/run
///
/// Triggers a long-running backend job and starts the bounded status
/// watcher. Trigger failure surfaces the manual fallback command, since
/// nothing guarantees the job runner is deployed next to the API.
pub async fn run_job(
    State(state): State<AppState>,
    Path(kind): Path<String>,
) -> ApiResult<Json<Value>> {
    let kind: JobKind = kind
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("Unknown job: {kind}")))?;

    let outcome = state.admin.run_job(kind).await.map_err(|error| {
        ApiError::Upstream(format!(
            "Could not start the {} job ({}). Run `{}` manually on the backend host.",
            kind.as_str(),
            error,
            kind.manual_command(),
        ))
    })?;

    state.jobs.clone().watch(
        state.admin.clone(),
        state.data.clone(),
        state.view.clone(),
        kind,
    );

    let status = if outcome.already_running() {
        "already_running"
    } else {
        "started"
    };
    info!(job = kind.as_str(), status, "Job trigger accepted");
    Ok(Json(json!({ "status": status })))
}

/// GET /api/jobs/status
pub async fn job_status(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let status = state
        .admin
        .status()
        .await
        .map_err(|e| remote_error(&state, e))?;
    Ok(Json(json!({
        "crawl_running": status.crawl_running,
        "summary_running": status.summary_running,
        "crawl_last_run": status.crawl_last_run,
        "summary_last_run": status.summary_last_run,
        "watching": {
            "crawl": state.jobs.is_watching(JobKind::Crawl),
            "summary": state.jobs.is_watching(JobKind::Summary),
        },
    })))
}

/// POST /api/jobs/:kind/cancel-watch
pub async fn cancel_watch(
    State(state): State<AppState>,
    Path(kind): Path<String>,
) -> ApiResult<Json<Value>> {
    let kind: JobKind = kind
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("Unknown job: {kind}")))?;
    let cancelled = state.jobs.cancel(kind);
    Ok(Json(json!({ "cancelled": cancelled })))
}

fn require_session(state: &AppState) -> ApiResult<String> {
    state
        .session
        .token()
        .ok_or_else(|| ApiError::Unauthorized("No admin session".to_string()))
}

/// Map a client error; a remote 401 discards the session (forced logout)
fn remote_error(state: &AppState, error: AdminError) -> ApiError {
    match error {
        AdminError::Unauthorized => {
            state.session.close();
            ApiError::Unauthorized("Session rejected by the curation API".to_string())
        }
        AdminError::Api { status, message } => {
            ApiError::Upstream(format!("Curation API returned {status}: {message}"))
        }
        AdminError::Network(message) | AdminError::Decode(message) => ApiError::Upstream(message),
    }
}

fn field(body: &Value, names: &[&str]) -> Option<String> {
    names
        .iter()
        .find_map(|name| body.get(name).and_then(Value::as_str))
        .map(str::to_string)
}
