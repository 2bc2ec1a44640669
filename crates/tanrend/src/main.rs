use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use tanrend::config::{AppConfig, CONFIG_ENV_VAR, DEFAULT_CONFIG_PATH};
use tanrend::server::create_router;
use tanrend::types::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().init();

    let config_path = std::env::var(CONFIG_ENV_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));
    let config = AppConfig::load_from_file(&config_path)
        .map_err(|e| anyhow::anyhow!("{e}"))
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    let state = Arc::new(AppState::from_config(&config)?);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_address))?;
    info!("Listening on {}", config.bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down");
        })
        .await?;

    Ok(())
}
