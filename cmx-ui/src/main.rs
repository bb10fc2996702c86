//! cmx-ui - Changelog Matrix web application
//!
//! Browses a crawled competitive changelog dataset as a tag matrix with
//! per-product and per-tag views, and hosts the admin console for tag
//! curation against the external curation API.

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};

use cmx_common::config::{check_data_root, AppConfig};
use cmx_ui::{build_router, AppState};

#[derive(Debug, Parser)]
#[command(name = "cmx-ui", version, about = "Changelog matrix browser and admin console")]
struct Args {
    /// Data root directory holding info/, storage/ and logs/
    #[arg(short = 'd', long)]
    data_root: Option<String>,

    /// Listen address (host:port)
    #[arg(long)]
    bind: Option<String>,

    /// Base URL of the curation API
    #[arg(long)]
    admin_api: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Starting Changelog Matrix (cmx-ui) v{}", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::resolve(
        args.data_root.as_deref(),
        args.bind.as_deref(),
        args.admin_api.as_deref(),
    )?;
    info!("Data root: {}", config.data_root.display());
    info!("Curation API: {}", config.admin_api_base);

    if let Err(error) = check_data_root(&config.data_root) {
        // The UI surfaces the resulting load failure as a blocking,
        // retryable error; the server still starts
        warn!(%error, "Data root check failed");
    }

    let state = AppState::new(&config)?;

    state.reload().await;
    match state.read_view() {
        Ok(view) => {
            if let Some(load_error) = &view.last_error {
                warn!(%load_error, "Initial load failed; views will prompt for retry");
            } else {
                info!(
                    tags = view.tags.len(),
                    products = view.products.len(),
                    "Initial snapshot loaded"
                );
            }
        }
        Err(error) => warn!(%error, "Could not inspect initial snapshot"),
    }

    let app = build_router(state.clone());

    let listener = tokio::net::TcpListener::bind(&config.bind).await?;
    info!("cmx-ui listening on http://{}", config.bind);
    info!("Health check: http://{}/health", config.bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(state))
        .await?;

    Ok(())
}

/// Wait for Ctrl-C, then stop background job watchers before the server
/// drains
async fn shutdown_signal(state: AppState) {
    if tokio::signal::ctrl_c().await.is_err() {
        warn!("Could not install Ctrl-C handler; running until killed");
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested, cancelling job watchers");
    state.jobs.cancel_all();
}
