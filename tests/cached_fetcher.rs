//! Integration tests for the cached fetcher through the public API
//!
//! Uses a scripted transport and a settable clock in place of HTTP and wall time.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::json;

use carbondash::cache::Clock;
use carbondash::data::{
    load_dashboard, ApiError, CachedFetcher, ConfigurationError, ConnectionConfig, EndpointQuery,
    RequestSpec, Transport,
};

#[derive(Debug)]
struct SteppedClock(Mutex<DateTime<Utc>>);

impl SteppedClock {
    fn step(&self, seconds: i64) {
        *self.0.lock().unwrap() += Duration::seconds(seconds);
    }
}

impl Clock for SteppedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}

#[derive(Debug, Default)]
struct ScriptedTransport {
    calls: AtomicUsize,
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get(&self, request: &RequestSpec) -> Result<String, ApiError> {
        // Suspend once so joined callers all reach the transport before any body returns
        tokio::task::yield_now().await;
        self.calls.fetch_add(1, Ordering::SeqCst);
        let body = if request.url.ends_with("/generation") {
            json!({"data": {"generationmix": [
                {"fuel": "wind", "perc": 40.0},
                {"fuel": "gas", "perc": 35.0}
            ]}})
        } else {
            json!({"data": [{
                "from": "2023-01-01T00:00Z",
                "intensity": {"forecast": 200, "actual": 190, "index": "moderate"}
            }]})
        };
        Ok(body.to_string())
    }
}

fn setup() -> (CachedFetcher, Arc<ScriptedTransport>, Arc<SteppedClock>) {
    let transport = Arc::new(ScriptedTransport::default());
    let clock = Arc::new(SteppedClock(Mutex::new(
        Utc.with_ymd_and_hms(2023, 1, 1, 12, 0, 0).unwrap(),
    )));
    let fetcher = CachedFetcher::with_parts(
        ConnectionConfig::new("https://api.carbonintensity.org.uk"),
        transport.clone(),
        clock.clone(),
    );
    (fetcher, transport, clock)
}

#[tokio::test]
async fn test_one_network_call_per_ttl_window() {
    let (fetcher, transport, clock) = setup();

    let first = fetcher.query_endpoint("/generation", 1800).await.unwrap();
    let second = fetcher.query_endpoint("/generation", 1800).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(transport.calls.load(Ordering::SeqCst), 1);

    clock.step(1801);
    fetcher.query_endpoint("/generation", 1800).await.unwrap();
    assert_eq!(transport.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_params_partition_the_cache() {
    let (fetcher, transport, _clock) = setup();
    let today = EndpointQuery::builder()
        .path("/generation")
        .param("day", "today")
        .build()
        .unwrap();
    let plain = EndpointQuery::path("/generation").unwrap();

    fetcher.fetch(&today, 1800).await.unwrap();
    fetcher.fetch(&plain, 1800).await.unwrap();

    assert_eq!(transport.calls.load(Ordering::SeqCst), 2);
    assert_eq!(fetcher.cached_entries(), 2);
}

#[tokio::test]
async fn test_concurrent_cold_misses_are_not_merged() {
    let (fetcher, transport, _clock) = setup();

    let (first, second) = futures::future::join(
        fetcher.query_endpoint("/generation", 1800),
        fetcher.query_endpoint("/generation", 1800),
    )
    .await;

    assert_eq!(first.unwrap(), second.unwrap());
    assert_eq!(transport.calls.load(Ordering::SeqCst), 2);
    assert_eq!(fetcher.cached_entries(), 1);
}

#[tokio::test]
async fn test_dashboard_tables_match_payloads() {
    let (fetcher, _transport, _clock) = setup();

    let dashboard = load_dashboard(&fetcher, 1800).await.unwrap();

    let rows = dashboard.generation_mix.rows();
    assert_eq!(rows.len(), 2);
    assert_eq!((rows[0].fuel.as_str(), rows[0].perc), ("wind", 40.0));
    assert_eq!((rows[1].fuel.as_str(), rows[1].perc), ("gas", 35.0));

    let intensity = &dashboard.intensity;
    assert_eq!(intensity.index, vec!["2023-01-01T00:00Z"]);
    assert_eq!(intensity.column_names(), vec!["forecast", "actual"]);
}

#[test]
fn test_missing_path_fails_before_any_url_is_built() {
    let result = EndpointQuery::builder().param("day", "today").build();
    assert_eq!(result, Err(ConfigurationError::MissingPath));
}
