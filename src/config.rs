//! Built-in defaults for the dashboard
//!
//! Everything here can be overridden from the command line (see [`crate::cli`]).

/// Public National Grid carbon intensity API
pub const DEFAULT_BASE_URL: &str = "https://api.carbonintensity.org.uk";

/// Responses are cached for 30 minutes, the length of a UK grid settlement
/// period and so the API's expected update frequency.
pub const DEFAULT_TTL_SECONDS: u64 = 60 * 30;

/// Current generation mix endpoint
pub const GENERATION_ENDPOINT: &str = "/generation";

/// Carbon intensity for the current day's half-hour periods
pub const INTENSITY_ENDPOINT: &str = "/intensity/date";
