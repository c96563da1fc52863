use std::path::PathBuf;

use anyhow::Result;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;
use tracing_subscriber::EnvFilter;
use vows_core::SiteConfig;
use vows_server::{AppState, app};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config_path = std::env::var_os("VOWS_CONFIG").map(PathBuf::from);
    let config = SiteConfig::load(config_path.as_deref())?;
    let addr = config.listen_addr;

    info!("Opening database {}", config.database_url);
    let state = AppState::new(config).await?;

    let listener = TcpListener::bind(addr).await?;
    info!("vows-server listening on http://{}", addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
