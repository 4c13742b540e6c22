//! Data access and reshaping for the carbon intensity dashboard
//!
//! This module resolves API requests, fetches them through a TTL cache, and
//! reshapes the two payloads the dashboard charts.

pub mod endpoint;
pub mod fetcher;
pub mod generation;
pub mod intensity;

pub use endpoint::{
    ConfigurationError, ConnectionConfig, EndpointQuery, EndpointQueryBuilder, EndpointResolver,
    RequestSpec,
};
pub use fetcher::{ApiError, CachedFetcher, HttpTransport, Transport};
pub use generation::{FuelShare, GenerationMix};
pub use intensity::{IntensityColumn, IntensityTable};

use serde::Serialize;

use crate::config::{GENERATION_ENDPOINT, INTENSITY_ENDPOINT};

/// Both tables shown on the dashboard
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Dashboard {
    /// Current generation mix, one row per fuel
    pub generation_mix: GenerationMix,
    /// Carbon intensity over the current day
    pub intensity: IntensityTable,
}

/// Fetches and reshapes both dashboard endpoints concurrently
///
/// # Arguments
/// * `fetcher` - Cached fetcher to query through
/// * `ttl_seconds` - Cache lifetime for each response
///
/// # Returns
/// * `Ok(Dashboard)` - When both endpoints load and have the expected shape
/// * `Err(ApiError)` - The first failure, generation mix checked first
pub async fn load_dashboard(
    fetcher: &CachedFetcher,
    ttl_seconds: u64,
) -> Result<Dashboard, ApiError> {
    let (generation, intensity) = futures::future::join(
        fetcher.query_endpoint(GENERATION_ENDPOINT, ttl_seconds),
        fetcher.query_endpoint(INTENSITY_ENDPOINT, ttl_seconds),
    )
    .await;

    Ok(Dashboard {
        generation_mix: GenerationMix::from_json(&generation?)?,
        intensity: IntensityTable::from_json(&intensity?)?,
    })
}
