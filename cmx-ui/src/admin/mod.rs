//! Admin console: curation API client, session, job watching, handlers

pub mod client;
pub mod handlers;
pub mod jobs;
pub mod session;

pub use client::{AdminClient, AdminError, JobKind, JobStatus};
pub use jobs::JobMonitor;
pub use session::AdminSession;

use axum::routing::{get, post};
use axum::Router;

use crate::AppState;

/// Build the admin console routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/admin/login", post(handlers::login))
        .route("/api/admin/logout", post(handlers::logout))
        .route("/api/admin/session", get(handlers::session_info))
        .route("/api/admin/:resource", get(handlers::admin_get))
        .route("/api/admin/others/update", post(handlers::update_others))
        .route("/api/admin/feature/:action", post(handlers::feature_action))
        .route("/api/admin/tag/rename", post(handlers::rename_tag))
        .route("/api/admin/features", post(handlers::search_features))
        .route(
            "/api/admin/changelog",
            get(handlers::get_changelog).post(handlers::save_changelog),
        )
        .route(
            "/api/admin/config",
            get(handlers::get_config).post(handlers::save_config),
        )
        .route("/api/jobs/status", get(handlers::job_status))
        .route("/api/jobs/:kind/run", post(handlers::run_job))
        .route("/api/jobs/:kind/cancel-watch", post(handlers::cancel_watch))
}
