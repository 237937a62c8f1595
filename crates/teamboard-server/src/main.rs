use std::sync::Arc;

use anyhow::{Context, Result};
use teamboard_core::AppConfig;
use teamboard_server::{router, Coordinator};
use teamboard_store::JsonFileStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = AppConfig::load();
    let data_file = config.effective_data_file();
    tracing::info!(
        "Starting teamboard server with data file: {}",
        data_file.display()
    );

    let store = Arc::new(JsonFileStore::open(&data_file).await?);
    let coordinator = Arc::new(Coordinator::new(store.clone(), store));

    if let Some(team) = config.default_team.as_deref() {
        let (board, created) = coordinator.ensure_team_board(team).await?;
        if created {
            tracing::info!("Created default team board '{}' ({})", board.name, board.id);
        }
    }

    let app = router(coordinator);

    let addr = config.effective_bind_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server shut down gracefully");
    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received");
}
