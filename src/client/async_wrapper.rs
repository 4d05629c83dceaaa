//! Async wrapper around synchronous SeriesClient.
//!
//! This module provides an async interface to the synchronous SeriesClient by using
//! `tokio::task::spawn_blocking` to run HTTP operations on a dedicated thread pool,
//! preventing blocking of the async runtime.

use crate::client::SeriesClient;
use crate::error::{FetchError, FetchResult};
use async_trait::async_trait;
use std::sync::Arc;

/// Source of raw series text.
///
/// The fetcher depends on this trait rather than on the HTTP client so that
/// tests can script upstream behaviour.
#[async_trait]
pub trait AsyncSeriesSource: Send + Sync {
    /// Perform one request for the resource at `url`.
    async fn fetch_text(&self, url: &str) -> FetchResult<String>;
}

/// Async wrapper around synchronous SeriesClient.
#[derive(Clone, Debug)]
pub struct AsyncSeriesClient {
    client: Arc<SeriesClient>,
}

impl AsyncSeriesClient {
    pub fn new(client: SeriesClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }
}

#[async_trait]
impl AsyncSeriesSource for AsyncSeriesClient {
    async fn fetch_text(&self, url: &str) -> FetchResult<String> {
        let client = self.client.clone();
        let url = url.to_string();

        tokio::task::spawn_blocking(move || client.fetch_text(&url))
            .await
            .map_err(|e| FetchError::Transport(format!("Task join error: {}", e)))?
    }
}
