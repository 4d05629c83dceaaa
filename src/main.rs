//! One Earth API - Main entry point

use anyhow::Result;
use one_earth_api::{
    create_router, AppState, AsyncSeriesClient, AsyncSeriesSource, CachedSeriesProvider, Config,
    Metrics, SeriesClient, SeriesFetcher, SeriesProvider, TtlCache,
};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    // RUST_LOG wins over LOG_LEVEL when both are set
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!(source = %config.source_url, "Starting One Earth API");

    let metrics = Metrics::new();
    let client = SeriesClient::new(&config, metrics.clone());
    let source = Arc::new(AsyncSeriesClient::new(client)) as Arc<dyn AsyncSeriesSource>;
    let fetcher = SeriesFetcher::new(source, config.retry_policy(), metrics.clone());

    let cache = TtlCache::new(config.cache_ttl());
    let provider = Arc::new(CachedSeriesProvider::new(cache, fetcher, metrics.clone()))
        as Arc<dyn SeriesProvider>;

    info!(
        "Cache TTL: {} minutes, {} fetch attempts",
        config.cache_ttl_minutes, config.fetch_max_attempts
    );

    let router = create_router(AppState::new(provider, config.source_url.as_str()));
    let addr = config.socket_addr()?;

    if let Err(e) = one_earth_api::server::run_server(router, addr).await {
        error!(error = %e, "Server error");
        return Err(e);
    }

    metrics.summary().log();
    info!("One Earth API shutdown complete");
    Ok(())
}
