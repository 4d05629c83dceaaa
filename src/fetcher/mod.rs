//! Series fetcher: bounded retries with exponential backoff, then parsing.
//!
//! Both the in-flight request and the backoff sleep race the caller's
//! cancellation token, so a cancelled caller returns immediately.

mod parser;

pub use parser::{decimal_year_to_datetime, is_leap_year, parse_series, MISSING_VALUE_SENTINEL};

use crate::client::AsyncSeriesSource;
use crate::error::{FetchError, FetchResult};
use crate::metrics::Metrics;
use crate::models::SeriesSnapshot;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Retry schedule: `max_attempts` requests, waiting `base_delay * 2^attempt`
/// after each failed one. No jitter.
///
/// No wait follows the final failed attempt, so the default policy waits
/// 1, 2, 4 and 8 seconds and then reports the error at once instead of
/// sleeping another 16.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Wait after the zero-based `attempt` fails.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(1u32 << attempt.min(31))
    }
}

/// Fetches and parses the upstream series.
#[derive(Clone)]
pub struct SeriesFetcher {
    source: Arc<dyn AsyncSeriesSource>,
    policy: RetryPolicy,
    metrics: Metrics,
}

impl SeriesFetcher {
    pub fn new(source: Arc<dyn AsyncSeriesSource>, policy: RetryPolicy, metrics: Metrics) -> Self {
        Self {
            source,
            policy,
            metrics,
        }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Fetch the resource at `url` and parse it into a snapshot.
    ///
    /// # Errors
    /// - [`FetchError::Cancelled`] if `cancel` fires before a response arrives
    /// - [`FetchError::RetriesExhausted`] if every attempt failed
    /// - [`FetchError::Malformed`] / [`FetchError::NoValidData`] if the body is unusable
    pub async fn fetch(
        &self,
        url: &str,
        cancel: &CancellationToken,
    ) -> FetchResult<SeriesSnapshot> {
        let body = self.fetch_with_retry(url, cancel).await?;
        let snapshot = parse_series(&body)?;

        self.metrics.record_points_parsed(snapshot.len());
        tracing::info!(
            url = %url,
            points = snapshot.len(),
            latest = %snapshot.latest.timestamp,
            "Fetched series"
        );

        Ok(snapshot)
    }

    async fn fetch_with_retry(&self, url: &str, cancel: &CancellationToken) -> FetchResult<String> {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut last_error = None;

        for attempt in 0..max_attempts {
            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(FetchError::Cancelled),
                result = self.source.fetch_text(url) => result,
            };
            self.metrics.record_fetch_attempt();

            match result {
                Ok(body) => return Ok(body),
                Err(e) => {
                    tracing::warn!(
                        url = %url,
                        attempt = attempt + 1,
                        max_attempts,
                        error = %e,
                        "Upstream fetch attempt failed"
                    );
                    last_error = Some(e);
                }
            }

            if attempt + 1 < max_attempts {
                let delay = self.policy.delay_for(attempt);
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return Err(FetchError::Cancelled),
                    _ = tokio::time::sleep(delay) => {}
                }
            }
        }

        Err(FetchError::RetriesExhausted {
            attempts: max_attempts,
            last: Box::new(
                last_error.unwrap_or_else(|| FetchError::Transport("no attempt made".to_string())),
            ),
        })
    }
}
