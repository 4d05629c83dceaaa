//! End-to-end fetch tests: real HTTP client, retry loop and cache against a mockito upstream.

use chrono::{Datelike, TimeZone, Utc};
use mockito::Server;
use one_earth_api::{
    AsyncSeriesClient, AsyncSeriesSource, CachedSeriesProvider, FetchError, Metrics, RetryPolicy,
    SeriesClient, SeriesFetcher, SeriesProvider, TtlCache,
};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

const FIXTURE: &str = include_str!("fixtures/co2_mm_mlo.csv");

fn fetcher(metrics: &Metrics) -> SeriesFetcher {
    let client = SeriesClient::with_timeout(Duration::from_secs(5), metrics.clone());
    let source = Arc::new(AsyncSeriesClient::new(client)) as Arc<dyn AsyncSeriesSource>;
    let policy = RetryPolicy {
        max_attempts: 5,
        base_delay: Duration::from_millis(5),
    };
    SeriesFetcher::new(source, policy, metrics.clone())
}

#[tokio::test]
async fn test_fetch_fixture() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/co2_mm_mlo.csv")
        .with_status(200)
        .with_body(FIXTURE)
        .create_async()
        .await;

    let metrics = Metrics::new();
    let url = format!("{}/co2_mm_mlo.csv", server.url());
    let snapshot = fetcher(&metrics)
        .fetch(&url, &CancellationToken::new())
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(snapshot.len(), 7);
    assert_eq!(snapshot.latest.value, 424.87);
    assert_eq!(
        snapshot.latest.timestamp,
        Utc.with_ymd_and_hms(2025, 10, 16, 0, 0, 0).unwrap()
    );
    assert!(snapshot.series.iter().all(|p| p.timestamp.year() == 2025));
    assert_eq!(metrics.points_parsed_total(), 7);
}

#[tokio::test]
async fn test_fetch_retries_until_exhausted() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/co2_mm_mlo.csv")
        .with_status(500)
        .expect(5)
        .create_async()
        .await;

    let metrics = Metrics::new();
    let url = format!("{}/co2_mm_mlo.csv", server.url());
    let err = fetcher(&metrics)
        .fetch(&url, &CancellationToken::new())
        .await
        .unwrap_err();

    mock.assert_async().await;
    assert!(matches!(err, FetchError::RetriesExhausted { attempts: 5, .. }));
    assert_eq!(metrics.http_errors_total(), 5);
}

#[tokio::test]
async fn test_fetch_body_without_valid_rows() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/co2_mm_mlo.csv")
        .with_status(200)
        .with_body("year,month,decimal date,average\n2025,6,2025.4583,-99.99\n")
        .create_async()
        .await;

    let url = format!("{}/co2_mm_mlo.csv", server.url());
    let err = fetcher(&Metrics::new())
        .fetch(&url, &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(err, FetchError::NoValidData);
}

#[tokio::test]
async fn test_cache_hit_survives_upstream_going_away() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/co2_mm_mlo.csv")
        .with_status(200)
        .with_body(FIXTURE)
        .expect(1)
        .create_async()
        .await;

    let metrics = Metrics::new();
    let provider = CachedSeriesProvider::new(
        TtlCache::new(Duration::from_secs(60)),
        fetcher(&metrics),
        metrics.clone(),
    );
    let url = format!("{}/co2_mm_mlo.csv", server.url());
    let cancel = CancellationToken::new();

    let first = provider.fetch_cached(&url, &cancel).await.unwrap();
    mock.assert_async().await;
    mock.remove_async().await;

    let second = provider.fetch_cached(&url, &cancel).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(metrics.cache_hits_total(), 1);
}

#[tokio::test]
async fn test_stale_fallback_when_upstream_fails() {
    let mut server = Server::new_async().await;
    let ok = server
        .mock("GET", "/co2_mm_mlo.csv")
        .with_status(200)
        .with_body(FIXTURE)
        .create_async()
        .await;

    let metrics = Metrics::new();
    let cache = TtlCache::new(Duration::from_millis(30));
    let provider = CachedSeriesProvider::new(cache, fetcher(&metrics), metrics.clone());
    let url = format!("{}/co2_mm_mlo.csv", server.url());
    let cancel = CancellationToken::new();

    let first = provider.fetch_cached(&url, &cancel).await.unwrap();
    ok.remove_async().await;
    server
        .mock("GET", "/co2_mm_mlo.csv")
        .with_status(502)
        .create_async()
        .await;

    tokio::time::sleep(Duration::from_millis(60)).await;

    let second = provider.fetch_cached(&url, &cancel).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(metrics.stale_fallbacks_total(), 1);
}
