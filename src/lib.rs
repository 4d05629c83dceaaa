//! One Earth API - serves atmospheric CO2 measurements over HTTP.
//!
//! The upstream CSV is fetched with bounded retries, parsed into a series of
//! points and kept in an in-memory TTL cache. When the upstream is unavailable
//! the last cached series is served instead of an error.
//!
//! # Architecture
//!
//! - **cache**: Generic thread-safe TTL cache
//! - **client**: Blocking HTTP client and its async wrapper
//! - **fetcher**: Retry/backoff loop and CSV parsing
//! - **services**: Cached series provider with stale fallback
//! - **server**: Axum routes and handlers
//! - **models**: Points, snapshots and response bodies
//! - **config**: Configuration from environment variables
//! - **error**: Error types
//! - **metrics**: Counters for upstream and cache behaviour

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod metrics;
pub mod models;
pub mod server;
pub mod services;

pub use cache::{Lookup, TtlCache};
pub use client::{AsyncSeriesClient, AsyncSeriesSource, SeriesClient};
pub use config::Config;
pub use error::{ConfigError, FetchError, FetchResult};
pub use fetcher::{RetryPolicy, SeriesFetcher};
pub use metrics::{Metrics, MetricsSummary};
pub use models::{LatestResponse, Point, SeriesSnapshot};
pub use server::{create_router, AppState};
pub use services::{CachedSeriesProvider, SeriesProvider};
