//! HTTP client for the upstream measurement source.
//!
//! This module provides a synchronous HTTP client that can be used from async contexts
//! via `tokio::task::spawn_blocking`. A single call is a single attempt; retrying is
//! the fetcher's job.

mod async_wrapper;
pub use async_wrapper::{AsyncSeriesClient, AsyncSeriesSource};

use crate::config::Config;
use crate::error::{FetchError, FetchResult};
use crate::metrics::Metrics;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// HTTP client for plain-text upstream resources.
///
/// This client uses `ureq` for synchronous HTTP requests and can be called
/// from async contexts using `tokio::task::spawn_blocking`.
#[derive(Clone)]
pub struct SeriesClient {
    /// HTTP client agent
    agent: Arc<ureq::Agent>,

    /// Metrics collector
    metrics: Metrics,
}

impl SeriesClient {
    /// Create a new SeriesClient from configuration.
    pub fn new(config: &Config, metrics: Metrics) -> Self {
        Self::with_timeout(Duration::from_secs(config.request_timeout), metrics)
    }

    /// Create a SeriesClient with an explicit request timeout.
    pub fn with_timeout(timeout: Duration, metrics: Metrics) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();

        Self {
            agent: Arc::new(agent),
            metrics,
        }
    }

    /// Get a reference to the metrics collector.
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Execute a GET request and return the response body as text.
    pub fn fetch_text(&self, url: &str) -> FetchResult<String> {
        let start = Instant::now();

        let result = self
            .agent
            .get(url)
            .set("Accept", "text/csv, text/plain")
            .call()
            .map_err(Self::map_error)
            .and_then(|response| {
                response
                    .into_string()
                    .map_err(|e| FetchError::Transport(e.to_string()))
            });

        let duration = start.elapsed();
        match &result {
            Ok(body) => {
                tracing::debug!(url = %url, bytes = body.len(), "GET succeeded");
            }
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "GET failed");
                self.metrics.record_http_error();
            }
        }
        self.metrics.record_http_request(duration);

        result
    }

    /// Map a ureq error to a FetchError.
    fn map_error(error: ureq::Error) -> FetchError {
        match error {
            ureq::Error::Status(status, response) => FetchError::Status {
                status,
                message: response.status_text().to_string(),
            },
            ureq::Error::Transport(transport) => {
                if transport.kind() == ureq::ErrorKind::ConnectionFailed {
                    FetchError::Transport("Connection failed".to_string())
                } else {
                    FetchError::Transport(transport.to_string())
                }
            }
        }
    }
}

impl std::fmt::Debug for SeriesClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeriesClient").finish_non_exhaustive()
    }
}
