use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use madrasah_dashboard::dashboard::{Dashboard, DashboardConfig, HttpSchoolApi};
use madrasah_dashboard::server::create_router;
use madrasah_dashboard::types::AppState;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG_PATH: &str = "dashboard.json";

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config_path = env::var("DASHBOARD_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));

    let config = DashboardConfig::load_or_default(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?
        .apply_overrides(|key| env::var(key).ok());

    info!(
        api = %config.api.base_url,
        config = %config_path.display(),
        "Starting madrasah dashboard"
    );

    let api = HttpSchoolApi::new(&config.api).context("Failed to create API client")?;
    let address = config.listen_address();
    let state = Arc::new(AppState {
        dashboard: Dashboard::new(Arc::new(api), config.limits),
    });

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    info!("Listening on http://{address}");

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    info!("Shutting down");
}
