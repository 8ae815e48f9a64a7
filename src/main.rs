mod app;
mod config;
mod errors;
mod external;
mod logging;
mod models;
mod routes;
mod services;
mod state;

use std::sync::Arc;
use tokio::net::TcpListener;

use crate::config::AppConfig;
use crate::external::defillama::DefiLlamaProvider;
use crate::logging::LoggingConfig;
use crate::services::tvl_cache::TvlCache;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging FIRST
    logging::init_logging(LoggingConfig::from_env())
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    let config = AppConfig::from_env();
    config.validate().map_err(anyhow::Error::msg)?;

    let provider = DefiLlamaProvider::new(&config.api_base_url, config.http_timeout())?;
    tracing::info!("📊 Using TVL upstream: {}", config.api_base_url);

    let state = AppState {
        tvl_provider: Arc::new(provider),
        tvl_cache: TvlCache::new(config.cache_ttl().map_err(anyhow::Error::msg)?),
        fetch_concurrency: config.fetch_concurrency,
    };
    let app = app::create_app(state);

    let addr = config.bind_addr().map_err(anyhow::Error::msg)?;
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("🚀 TVL backend running at http://{}/", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("TVL backend stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
