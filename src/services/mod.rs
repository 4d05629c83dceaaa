//! Application service layer.
//!
//! Services sit between the HTTP handlers and the fetcher, owning the cache
//! and the policy for when to use it.

mod series_service;

pub use series_service::{cache_key, CachedSeriesProvider, SeriesProvider};
