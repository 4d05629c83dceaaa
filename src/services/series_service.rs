//! Cached series provider.
//!
//! Serves fresh cache entries directly, otherwise fetches upstream and writes
//! the result back. When the fetch fails, whatever the cache still holds for
//! the source (even if expired) is returned instead of the error.

use crate::cache::{Lookup, TtlCache};
use crate::error::FetchResult;
use crate::fetcher::SeriesFetcher;
use crate::metrics::Metrics;
use crate::models::SeriesSnapshot;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// Cache key for the snapshot of one upstream source.
pub fn cache_key(source: &str) -> String {
    format!("series:{}", source)
}

/// Provider trait for series data, implemented by the caching layer and by test doubles.
#[async_trait]
pub trait SeriesProvider: Send + Sync {
    /// Get the latest point and the full series for `source`.
    ///
    /// Only fails when the upstream fetch fails and nothing has ever been
    /// cached for this source.
    async fn fetch_cached(
        &self,
        source: &str,
        cancel: &CancellationToken,
    ) -> FetchResult<SeriesSnapshot>;
}

/// Default implementation of SeriesProvider backed by a [`TtlCache`].
///
/// Concurrent misses each fetch independently; the last write wins.
#[derive(Clone)]
pub struct CachedSeriesProvider {
    cache: TtlCache<String, SeriesSnapshot>,
    fetcher: SeriesFetcher,
    metrics: Metrics,
}

impl CachedSeriesProvider {
    /// Create a new provider. The cache is shared with the caller.
    pub fn new(
        cache: TtlCache<String, SeriesSnapshot>,
        fetcher: SeriesFetcher,
        metrics: Metrics,
    ) -> Self {
        Self {
            cache,
            fetcher,
            metrics,
        }
    }

    pub fn cache(&self) -> &TtlCache<String, SeriesSnapshot> {
        &self.cache
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }
}

#[async_trait]
impl SeriesProvider for CachedSeriesProvider {
    async fn fetch_cached(
        &self,
        source: &str,
        cancel: &CancellationToken,
    ) -> FetchResult<SeriesSnapshot> {
        let key = cache_key(source);

        let stale = match self.cache.lookup(&key) {
            Lookup::Fresh(snapshot) => {
                self.metrics.record_cache_access(true);
                tracing::trace!(key = %key, "Cache hit");
                return Ok(snapshot);
            }
            Lookup::Stale(snapshot) => Some(snapshot),
            Lookup::Missing => None,
        };

        self.metrics.record_cache_access(false);
        tracing::debug!(key = %key, has_stale = stale.is_some(), "Cache miss");

        match self.fetcher.fetch(source, cancel).await {
            Ok(snapshot) => {
                self.cache.set(key, snapshot.clone());
                Ok(snapshot)
            }
            Err(e) if e.is_cancelled() => {
                tracing::debug!(key = %key, "Fetch cancelled by caller");
                Err(e)
            }
            Err(e) => match stale.or_else(|| self.cache.lookup(&key).into_value()) {
                Some(snapshot) => {
                    self.metrics.record_stale_fallback();
                    tracing::warn!(
                        key = %key,
                        error = %e,
                        latest = %snapshot.latest.timestamp,
                        "Fetch failed, serving cached data"
                    );
                    Ok(snapshot)
                }
                None => {
                    tracing::error!(key = %key, error = %e, "Fetch failed with no cached fallback");
                    Err(e)
                }
            },
        }
    }
}
