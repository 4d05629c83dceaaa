use async_trait::async_trait;
use one_earth_api::error::{FetchError, FetchResult};
use one_earth_api::AsyncSeriesSource;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Scripted upstream for testing.
///
/// Queued responses are served first; once the queue is empty every call
/// gets the fallback response.
#[allow(dead_code)]
#[derive(Clone)]
pub struct MockSeriesSource {
    queued: Arc<Mutex<VecDeque<FetchResult<String>>>>,
    fallback: Arc<Mutex<FetchResult<String>>>,
    latency: Duration,
    calls: Arc<AtomicUsize>,
}

#[allow(dead_code)]
impl MockSeriesSource {
    /// Always answers with `body`.
    pub fn serving(body: &str) -> Self {
        Self {
            queued: Arc::new(Mutex::new(VecDeque::new())),
            fallback: Arc::new(Mutex::new(Ok(body.to_string()))),
            latency: Duration::ZERO,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Always fails with a connection error.
    pub fn unreachable() -> Self {
        let source = Self::serving("");
        source.go_offline();
        source
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn push_response(&self, response: FetchResult<String>) {
        self.queued.lock().unwrap().push_back(response);
    }

    pub fn go_offline(&self) {
        *self.fallback.lock().unwrap() =
            Err(FetchError::Transport("Connection failed".to_string()));
    }

    pub fn serve(&self, body: &str) {
        *self.fallback.lock().unwrap() = Ok(body.to_string());
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AsyncSeriesSource for MockSeriesSource {
    async fn fetch_text(&self, _url: &str) -> FetchResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let queued = self.queued.lock().unwrap().pop_front();
        match queued {
            Some(response) => response,
            None => self.fallback.lock().unwrap().clone(),
        }
    }
}
