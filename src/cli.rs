//! Command-line interface parsing for the carbon intensity dashboard
//!
//! Handles the API base URL, cache TTL, and the `--dump` switch that prints the
//! reshaped tables instead of opening the terminal UI.

use clap::Parser;
use thiserror::Error;

use crate::config::{DEFAULT_BASE_URL, DEFAULT_TTL_SECONDS};

/// Error types for CLI argument validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CliError {
    /// The cache TTL must be at least one second
    #[error("Invalid TTL: '{0}'. The cache TTL must be greater than zero seconds")]
    InvalidTtl(u64),

    /// The base URL was empty
    #[error("Invalid base URL: the API base URL must not be empty")]
    EmptyBaseUrl,
}

/// UK carbon intensity dashboard - current generation mix and 24h intensity
#[derive(Parser, Debug)]
#[command(name = "carbondash")]
#[command(about = "UK grid generation mix and carbon intensity dashboard")]
#[command(version)]
pub struct Cli {
    /// Base URL of the carbon intensity API
    #[arg(long, value_name = "URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// How long to cache each API response, in seconds
    #[arg(long, value_name = "SECONDS", default_value_t = DEFAULT_TTL_SECONDS)]
    pub ttl: u64,

    /// Print the reshaped tables as JSON and exit instead of opening the dashboard
    #[arg(long)]
    pub dump: bool,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupConfig {
    /// API base URL
    pub base_url: String,
    /// Cache lifetime for each response
    pub ttl_seconds: u64,
    /// Print tables and exit rather than running the TUI
    pub dump: bool,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            ttl_seconds: DEFAULT_TTL_SECONDS,
            dump: false,
        }
    }
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// # Returns
    /// * `Ok(StartupConfig)` with validated settings
    /// * `Err(CliError)` if the TTL is zero or the base URL is blank
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        if cli.ttl == 0 {
            return Err(CliError::InvalidTtl(cli.ttl));
        }

        let base_url = cli.base_url.trim();
        if base_url.is_empty() {
            return Err(CliError::EmptyBaseUrl);
        }

        Ok(StartupConfig {
            base_url: base_url.to_string(),
            ttl_seconds: cli.ttl,
            dump: cli.dump,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_no_args_uses_defaults() {
        let cli = Cli::parse_from(["carbondash"]);
        assert_eq!(cli.base_url, "https://api.carbonintensity.org.uk");
        assert_eq!(cli.ttl, 1800);
        assert!(!cli.dump);
    }

    #[test]
    fn test_cli_parse_overrides() {
        let cli = Cli::parse_from([
            "carbondash",
            "--base-url",
            "http://localhost:8080",
            "--ttl",
            "60",
            "--dump",
        ]);
        assert_eq!(cli.base_url, "http://localhost:8080");
        assert_eq!(cli.ttl, 60);
        assert!(cli.dump);
    }

    #[test]
    fn test_cli_rejects_non_numeric_ttl() {
        let result = Cli::try_parse_from(["carbondash", "--ttl", "soon"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_startup_config_default() {
        let config = StartupConfig::default();
        assert_eq!(config.ttl_seconds, 1800);
        assert!(!config.dump);
    }

    #[test]
    fn test_startup_config_from_cli() {
        let cli = Cli::parse_from(["carbondash", "--ttl", "90", "--base-url", " http://x "]);
        let config = StartupConfig::from_cli(&cli).unwrap();
        assert_eq!(config.ttl_seconds, 90);
        assert_eq!(config.base_url, "http://x");
    }

    #[test]
    fn test_startup_config_zero_ttl() {
        let cli = Cli::parse_from(["carbondash", "--ttl", "0"]);
        let err = StartupConfig::from_cli(&cli).unwrap_err();
        assert_eq!(err, CliError::InvalidTtl(0));
        assert!(err.to_string().contains("Invalid TTL"));
    }

    #[test]
    fn test_startup_config_blank_base_url() {
        let cli = Cli::parse_from(["carbondash", "--base-url", "  "]);
        assert_eq!(StartupConfig::from_cli(&cli), Err(CliError::EmptyBaseUrl));
    }
}
