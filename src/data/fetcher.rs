//! Cached JSON fetcher for the carbon intensity REST API
//!
//! Wraps a GET call with a time-bounded in-memory cache keyed by the resolved
//! request, so identical requests within the TTL are served without network I/O.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::fmt::Debug;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

use super::endpoint::{
    ConfigurationError, ConnectionConfig, EndpointQuery, EndpointResolver, RequestSpec,
};
use crate::cache::{CacheManager, Clock, SystemClock};

/// Errors that can occur when fetching API data
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request could not be built from the given input
    #[error("Invalid request configuration: {0}")]
    Configuration(#[from] ConfigurationError),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// Response body was not JSON, or not the expected shape
    #[error("Failed to parse JSON response: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Performs the network half of a fetch
#[async_trait]
pub trait Transport: Debug + Send + Sync {
    /// Issues a GET for `request` and returns the raw response body
    async fn get(&self, request: &RequestSpec) -> Result<String, ApiError>;
}

/// [`Transport`] backed by a `reqwest` client
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, request: &RequestSpec) -> Result<String, ApiError> {
        let mut builder = self.client.get(&request.url).query(&request.params);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            // Error bodies are still JSON; the caller sees whatever shape comes back.
            warn!(url = %request.url, %status, "non-success response from API");
        }

        Ok(response.text().await?)
    }
}

/// Fetches JSON from a REST API, memoising each response for a caller-chosen TTL
#[derive(Debug)]
pub struct CachedFetcher {
    resolver: EndpointResolver,
    transport: Arc<dyn Transport>,
    cache: CacheManager<RequestSpec, Value>,
}

impl CachedFetcher {
    /// Create a fetcher using HTTP and the system clock
    pub fn new(config: ConnectionConfig) -> Self {
        Self::with_parts(config, Arc::new(HttpTransport::new()), Arc::new(SystemClock))
    }

    /// Create a fetcher with an injected transport and clock
    pub fn with_parts(
        config: ConnectionConfig,
        transport: Arc<dyn Transport>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            resolver: EndpointResolver::new(config),
            transport,
            cache: CacheManager::with_clock(clock),
        }
    }

    /// Fetch the JSON document for `query`
    ///
    /// # Arguments
    /// * `query` - Endpoint path, params and headers
    /// * `ttl_seconds` - How long a fetched response stays fresh (must be > 0)
    ///
    /// # Returns
    /// * `Ok(Value)` - The parsed body, from cache if a fresh entry exists
    /// * `Err(ApiError)` - Invalid TTL, transport failure or non-JSON body.
    ///   Failures are never cached or retried.
    pub async fn fetch(&self, query: &EndpointQuery, ttl_seconds: u64) -> Result<Value, ApiError> {
        if ttl_seconds == 0 {
            return Err(ConfigurationError::InvalidTtl(ttl_seconds).into());
        }

        let request = self.resolver.resolve(query);
        if let Some(value) = self.cache.read_fresh(&request) {
            debug!(url = %request.url, "cache hit");
            return Ok(value);
        }

        debug!(url = %request.url, ttl_seconds, "cache miss, fetching");
        let body = self
            .transport
            .get(&request)
            .await
            .inspect_err(|e| warn!(url = %request.url, error = %e, "request failed"))?;

        let value: Value = serde_json::from_str(&body).map_err(|e| {
            warn!(url = %request.url, error = %e, "response was not valid JSON");
            ApiError::from(e)
        })?;

        let purged = self.cache.purge_expired();
        if purged > 0 {
            debug!(purged, "dropped stale cache entries");
        }
        self.cache.write(request, value.clone(), ttl_seconds);
        Ok(value)
    }

    /// Fetch a relative path with default params and headers
    pub async fn query_endpoint(
        &self,
        relative_path: &str,
        ttl_seconds: u64,
    ) -> Result<Value, ApiError> {
        let query = EndpointQuery::path(relative_path)?;
        self.fetch(&query, ttl_seconds).await
    }

    /// Number of cached responses, fresh or stale
    pub fn cached_entries(&self) -> usize {
        self.cache.len()
    }

    /// Forget every cached response
    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}
