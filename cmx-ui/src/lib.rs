//! cmx-ui library - Changelog Matrix web application
//!
//! Serves the read-only matrix/tags/products views over the static data
//! documents, and the admin console proxying the external curation API.

use std::sync::{Arc, RwLock, RwLockReadGuard};

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

pub mod admin;
pub mod api;
pub mod error;
pub mod loader;
pub mod state;

use admin::{AdminClient, AdminSession, JobMonitor};
use cmx_common::config::AppConfig;
use error::ApiError;
use loader::DataRoot;
use state::{ViewEvent, ViewState};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Data root the loader reads and `/data/` serves
    pub data: DataRoot,
    /// View snapshot, mutated only through [`ViewEvent`] transitions
    pub view: Arc<RwLock<ViewState>>,
    /// Curation API client
    pub admin: AdminClient,
    /// Explicit admin session (token holder)
    pub session: Arc<AdminSession>,
    /// Background job watchers
    pub jobs: Arc<JobMonitor>,
}

impl AppState {
    /// Create application state from resolved configuration
    pub fn new(config: &AppConfig) -> cmx_common::Result<Self> {
        let admin = AdminClient::new(&config.admin_api_base)
            .map_err(|e| cmx_common::Error::Config(e.to_string()))?;

        Ok(Self {
            data: DataRoot::new(&config.data_root),
            view: Arc::new(RwLock::new(ViewState::default())),
            admin,
            session: Arc::new(AdminSession::default()),
            jobs: Arc::new(JobMonitor::default()),
        })
    }

    /// Load a fresh snapshot and apply the outcome
    pub async fn reload(&self) {
        admin::jobs::reload_view(&self.data, &self.view).await;
    }

    /// Read access to the current snapshot
    pub fn read_view(&self) -> Result<RwLockReadGuard<'_, ViewState>, ApiError> {
        self.view
            .read()
            .map_err(|_| ApiError::Internal("View state lock poisoned".to_string()))
    }

    /// Apply one state transition
    pub fn view_write(&self, event: ViewEvent) {
        if let Ok(mut view) = self.view.write() {
            view.apply(event);
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    let data_dir = state.data.path().to_path_buf();

    Router::new()
        .route("/", get(api::serve_index))
        .route("/static/app.js", get(api::serve_app_js))
        .merge(api::health_routes())
        .route("/api/matrix", get(api::matrix))
        .route("/api/tags", get(api::tags))
        .route(
            "/api/tags/:primary/:secondary/features",
            get(api::tag_feature_list),
        )
        .route("/api/products", get(api::product_list))
        .route("/api/products/:name", get(api::product_detail))
        .route(
            "/api/products/:name/tags/:primary/:secondary/features",
            get(api::product_tag_feature_list),
        )
        .route("/api/summary", get(api::summary))
        .route("/api/logs", get(api::update_logs))
        .route("/api/export/matrix.csv", get(api::export_matrix_csv))
        .route("/api/state", get(api::app_state_info))
        .route("/api/reload", post(api::reload))
        .merge(admin::routes())
        .nest_service("/data", ServeDir::new(data_dir))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
