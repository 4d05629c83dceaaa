//! Request handlers for the HTTP API.
//!
//! Handlers only shape requests and responses; caching and fallback live in
//! the [`SeriesProvider`].

use crate::error::FetchError;
use crate::models::{filter_recent, LatestResponse, Point};
use crate::services::SeriesProvider;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{SecondsFormat, Utc};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Window used when `days` is absent, non-numeric or not positive.
pub const DEFAULT_SERIES_DAYS: i64 = 30;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn SeriesProvider>,
    pub source_url: Arc<str>,
}

impl AppState {
    pub fn new(provider: Arc<dyn SeriesProvider>, source_url: impl Into<Arc<str>>) -> Self {
        Self {
            provider,
            source_url: source_url.into(),
        }
    }
}

/// Query string of the series endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct SeriesQuery {
    /// Kept as text so a bad value falls back to the default instead of a 400
    pub days: Option<String>,
}

impl SeriesQuery {
    pub fn days(&self) -> i64 {
        self.days
            .as_deref()
            .and_then(|d| d.trim().parse::<i64>().ok())
            .filter(|d| *d > 0)
            .unwrap_or(DEFAULT_SERIES_DAYS)
    }
}

/// Error returned when no data can be served.
#[derive(Debug)]
pub struct ApiError(pub FetchError);

impl From<FetchError> for ApiError {
    fn from(err: FetchError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::warn!(error = %self.0, "Responding 503");
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "error": "Failed to fetch CO2 data and no cached data available"
            })),
        )
            .into_response()
    }
}

pub async fn health() -> &'static str {
    "ok"
}

pub async fn hello() -> Json<serde_json::Value> {
    Json(json!({
        "message": "Hello from One Earth API",
        "time": Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
    }))
}

/// `GET /api/metrics/co2`
pub async fn latest(State(state): State<AppState>) -> Result<Json<LatestResponse>, ApiError> {
    // Cancelled if the client goes away and this future is dropped
    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();

    let snapshot = state
        .provider
        .fetch_cached(&state.source_url, &cancel)
        .await?;

    Ok(Json(LatestResponse::from(&snapshot.latest)))
}

/// `GET /api/series/co2?days=N`
pub async fn series(
    State(state): State<AppState>,
    Query(query): Query<SeriesQuery>,
) -> Result<Json<Vec<Point>>, ApiError> {
    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();

    let snapshot = state
        .provider
        .fetch_cached(&state.source_url, &cancel)
        .await?;

    let days = query.days();
    let recent = filter_recent(&snapshot.series, days, Utc::now());
    tracing::debug!(days, total = snapshot.len(), returned = recent.len(), "Series request");

    Ok(Json(recent))
}
