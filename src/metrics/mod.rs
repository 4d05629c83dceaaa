//! Basic metrics instrumentation for tracking upstream and cache behaviour.
//!
//! Provides counters and duration tracking for upstream requests and cache accesses.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Metrics collector shared by the client, fetcher and provider.
#[derive(Debug, Clone)]
pub struct Metrics {
    /// Upstream attempts made by the retry loop
    fetch_attempts_total: Arc<AtomicU64>,

    /// Total number of upstream HTTP requests made
    http_requests_total: Arc<AtomicU64>,

    /// Total number of failed upstream requests
    http_errors_total: Arc<AtomicU64>,

    /// Total duration of all upstream requests in milliseconds
    http_duration_total_ms: Arc<AtomicU64>,

    /// Number of points that survived parsing
    points_parsed_total: Arc<AtomicU64>,

    /// Reads answered from a fresh cache entry
    cache_hits_total: Arc<AtomicU64>,

    /// Reads that had to go upstream
    cache_misses_total: Arc<AtomicU64>,

    /// Failed fetches answered with stale data
    stale_fallbacks_total: Arc<AtomicU64>,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    /// Create a new metrics collector.
    pub fn new() -> Self {
        Self {
            fetch_attempts_total: Arc::new(AtomicU64::new(0)),
            http_requests_total: Arc::new(AtomicU64::new(0)),
            http_errors_total: Arc::new(AtomicU64::new(0)),
            http_duration_total_ms: Arc::new(AtomicU64::new(0)),
            points_parsed_total: Arc::new(AtomicU64::new(0)),
            cache_hits_total: Arc::new(AtomicU64::new(0)),
            cache_misses_total: Arc::new(AtomicU64::new(0)),
            stale_fallbacks_total: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Record one pass through the fetch retry loop.
    pub fn record_fetch_attempt(&self) {
        self.fetch_attempts_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an HTTP request with duration.
    pub fn record_http_request(&self, duration: Duration) {
        self.http_requests_total.fetch_add(1, Ordering::Relaxed);
        self.http_duration_total_ms
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }

    /// Record an HTTP error.
    pub fn record_http_error(&self) {
        self.http_errors_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Record points produced by a successful parse.
    pub fn record_points_parsed(&self, count: usize) {
        self.points_parsed_total
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    /// Record a cache access.
    pub fn record_cache_access(&self, hit: bool) {
        if hit {
            self.cache_hits_total.fetch_add(1, Ordering::Relaxed);
        } else {
            self.cache_misses_total.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Record a stale value served in place of a failed fetch.
    pub fn record_stale_fallback(&self) {
        self.stale_fallbacks_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn fetch_attempts_total(&self) -> u64 {
        self.fetch_attempts_total.load(Ordering::Relaxed)
    }

    /// Get total HTTP requests.
    pub fn http_requests_total(&self) -> u64 {
        self.http_requests_total.load(Ordering::Relaxed)
    }

    /// Get total HTTP errors.
    pub fn http_errors_total(&self) -> u64 {
        self.http_errors_total.load(Ordering::Relaxed)
    }

    /// Get average HTTP request duration in milliseconds.
    pub fn http_duration_avg_ms(&self) -> f64 {
        let total = self.http_duration_total_ms.load(Ordering::Relaxed);
        let count = self.http_requests_total.load(Ordering::Relaxed);
        if count == 0 {
            0.0
        } else {
            total as f64 / count as f64
        }
    }

    pub fn points_parsed_total(&self) -> u64 {
        self.points_parsed_total.load(Ordering::Relaxed)
    }

    pub fn cache_hits_total(&self) -> u64 {
        self.cache_hits_total.load(Ordering::Relaxed)
    }

    pub fn cache_misses_total(&self) -> u64 {
        self.cache_misses_total.load(Ordering::Relaxed)
    }

    pub fn stale_fallbacks_total(&self) -> u64 {
        self.stale_fallbacks_total.load(Ordering::Relaxed)
    }

    /// Get the cache hit rate (0.0 to 1.0).
    pub fn cache_hit_rate(&self) -> f64 {
        let hits = self.cache_hits_total();
        let total = hits + self.cache_misses_total();
        if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64
        }
    }

    /// Get a summary of all metrics.
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            fetch_attempts_total: self.fetch_attempts_total(),
            http_requests_total: self.http_requests_total(),
            http_errors_total: self.http_errors_total(),
            http_duration_avg_ms: self.http_duration_avg_ms(),
            points_parsed_total: self.points_parsed_total(),
            cache_hits_total: self.cache_hits_total(),
            cache_misses_total: self.cache_misses_total(),
            stale_fallbacks_total: self.stale_fallbacks_total(),
        }
    }
}

/// A snapshot of metrics values.
#[derive(Debug, Clone)]
pub struct MetricsSummary {
    pub fetch_attempts_total: u64,
    pub http_requests_total: u64,
    pub http_errors_total: u64,
    pub http_duration_avg_ms: f64,
    pub points_parsed_total: u64,
    pub cache_hits_total: u64,
    pub cache_misses_total: u64,
    pub stale_fallbacks_total: u64,
}

impl MetricsSummary {
    /// Emit the summary as a single structured log line.
    pub fn log(&self) {
        tracing::info!(
            fetch_attempts = self.fetch_attempts_total,
            http_requests = self.http_requests_total,
            http_errors = self.http_errors_total,
            http_avg_ms = self.http_duration_avg_ms,
            points_parsed = self.points_parsed_total,
            cache_hits = self.cache_hits_total,
            cache_misses = self.cache_misses_total,
            stale_fallbacks = self.stale_fallbacks_total,
            "Metrics summary"
        );
    }
}
