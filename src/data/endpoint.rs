//! Request construction for the carbon intensity REST API
//!
//! An [`EndpointQuery`] names a relative path plus optional query parameters and
//! headers. An [`EndpointResolver`] joins it onto the configured base URL to
//! produce a [`RequestSpec`] describing a single GET call.

use std::collections::BTreeMap;
use thiserror::Error;

/// Errors raised while building a request from caller input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// No relative path was supplied, so no URL can be built
    #[error("Missing endpoint path: a relative path such as \"/generation\" is required")]
    MissingPath,

    /// A cache TTL of zero seconds was requested
    #[error("Invalid TTL: {0} seconds (must be greater than zero)")]
    InvalidTtl(u64),
}

/// Headers sent when the caller does not supply any
pub fn default_headers() -> BTreeMap<String, String> {
    BTreeMap::from([("Accept".to_string(), "application/json".to_string())])
}

/// Connection settings for a REST API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    base_url: String,
}

impl ConnectionConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// A fully resolved GET request
///
/// Equality and hashing are structural over all three fields, which makes a
/// `RequestSpec` usable directly as a cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestSpec {
    /// Absolute URL (`base_url` followed by the relative path)
    pub url: String,
    /// Query string parameters
    pub params: BTreeMap<String, String>,
    /// Request headers
    pub headers: BTreeMap<String, String>,
}

/// A validated description of which endpoint to call and how
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointQuery {
    relative_path: String,
    params: BTreeMap<String, String>,
    headers: BTreeMap<String, String>,
}

impl EndpointQuery {
    /// Shorthand for a query with default params and headers
    pub fn path(relative_path: impl Into<String>) -> Result<Self, ConfigurationError> {
        Self::builder().path(relative_path).build()
    }

    pub fn builder() -> EndpointQueryBuilder {
        EndpointQueryBuilder::default()
    }

    pub fn relative_path(&self) -> &str {
        &self.relative_path
    }

    pub fn params(&self) -> &BTreeMap<String, String> {
        &self.params
    }

    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }
}

/// Builder for [`EndpointQuery`]
///
/// Headers default to `Accept: application/json`. Supplying any header replaces
/// that default set rather than extending it.
#[derive(Debug, Clone, Default)]
pub struct EndpointQueryBuilder {
    relative_path: Option<String>,
    params: BTreeMap<String, String>,
    headers: Option<BTreeMap<String, String>>,
}

impl EndpointQueryBuilder {
    pub fn path(mut self, relative_path: impl Into<String>) -> Self {
        self.relative_path = Some(relative_path.into());
        self
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), value.into());
        self
    }

    /// Validates the collected input
    ///
    /// # Returns
    /// * `Ok(EndpointQuery)` when a non-empty relative path was given
    /// * `Err(ConfigurationError::MissingPath)` otherwise
    pub fn build(self) -> Result<EndpointQuery, ConfigurationError> {
        let relative_path = self
            .relative_path
            .filter(|path| !path.is_empty())
            .ok_or(ConfigurationError::MissingPath)?;

        Ok(EndpointQuery {
            relative_path,
            params: self.params,
            headers: self.headers.unwrap_or_else(default_headers),
        })
    }
}

/// Turns endpoint queries into concrete requests against one base URL
#[derive(Debug, Clone)]
pub struct EndpointResolver {
    config: ConnectionConfig,
}

impl EndpointResolver {
    pub fn new(config: ConnectionConfig) -> Self {
        Self { config }
    }

    /// Builds the request for `query`
    ///
    /// The URL is the plain concatenation of the base URL and the relative path;
    /// no separator is added or removed.
    pub fn resolve(&self, query: &EndpointQuery) -> RequestSpec {
        RequestSpec {
            url: format!("{}{}", self.config.base_url, query.relative_path),
            params: query.params.clone(),
            headers: query.headers.clone(),
        }
    }

    /// Builds a request straight from a builder, validating it first
    pub fn resolve_with(
        &self,
        builder: EndpointQueryBuilder,
    ) -> Result<RequestSpec, ConfigurationError> {
        let query = builder.build()?;
        Ok(self.resolve(&query))
    }
}
