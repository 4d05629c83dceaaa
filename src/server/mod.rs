//! HTTP server exposing the cached series.
//!
//! Routes:
//! - `GET /health`: liveness, plain `ok`
//! - `GET /api/hello`: greeting with server time
//! - `GET /api/metrics/co2`: newest point
//! - `GET /api/series/co2?days=N`: points from the last N days (default 30)

pub mod handlers;

pub use handlers::{ApiError, AppState, SeriesQuery, DEFAULT_SERIES_DAYS};

use anyhow::Result;
use axum::http::Method;
use axum::routing::get;
use axum::Router;
use std::net::SocketAddr;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};

/// Build the application router.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::HEAD, Method::OPTIONS])
        .allow_headers(Any)
        .max_age(Duration::from_secs(300));

    let api = Router::new()
        .route("/hello", get(handlers::hello))
        .route("/metrics/co2", get(handlers::latest))
        .route("/series/co2", get(handlers::series));

    Router::new()
        .route("/health", get(handlers::health))
        .nest("/api", api)
        .layer(cors)
        .with_state(state)
}

/// Serve `router` on `addr` until the process receives Ctrl-C.
pub async fn run_server(router: Router, addr: SocketAddr) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for shutdown signal");
                std::future::pending::<()>().await;
            }
            tracing::info!("Shutdown signal received");
        })
        .await?;

    Ok(())
}
