//! Configuration management for the One Earth API.
//!
//! This module handles loading and validating configuration from environment variables,
//! reading a `.env` file first if one is present.

use crate::error::{ConfigError, ConfigResult};
use crate::fetcher::RetryPolicy;
use std::env;
use std::net::SocketAddr;
use std::time::Duration;

/// Upper bound for `CACHE_TTL_MINUTES` (one year).
pub const MAX_CACHE_TTL_MINUTES: u64 = 525_600;

/// Monthly mean CO2 at Mauna Loa, published by NOAA GML.
pub const DEFAULT_SOURCE_URL: &str = "https://gml.noaa.gov/webdata/ccgg/trends/co2/co2_mm_mlo.csv";

/// Configuration for the One Earth API.
#[derive(Debug, Clone)]
pub struct Config {
    /// Location of the upstream CSV resource
    pub source_url: String,

    /// Cache TTL in minutes (default: 30)
    pub cache_ttl_minutes: u64,

    /// HTTP request timeout in seconds (default: 10)
    pub request_timeout: u64,

    /// Maximum fetch attempts per cache miss (default: 5)
    pub fetch_max_attempts: u32,

    /// Backoff time unit in milliseconds (default: 1000)
    pub fetch_backoff_base_ms: u64,

    /// Interface to bind (default: "0.0.0.0")
    pub bind_addr: String,

    /// Port to listen on (default: 8080)
    pub port: u16,

    /// Log level (default: "info")
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// All variables are optional:
    /// - `SOURCE_URL`: Upstream CSV location (default: NOAA Mauna Loa monthly means)
    /// - `CACHE_TTL_MINUTES`: Cache TTL in minutes, at most one year (default: 30)
    /// - `REQUEST_TIMEOUT`: HTTP timeout in seconds (default: 10)
    /// - `FETCH_MAX_ATTEMPTS`: Attempts before giving up, 1-10 (default: 5)
    /// - `FETCH_BACKOFF_BASE_MS`: Backoff unit in milliseconds (default: 1000)
    /// - `BIND_ADDR`: Interface to bind (default: "0.0.0.0")
    /// - `PORT`: Port to listen on (default: 8080)
    /// - `LOG_LEVEL`: Logging level (default: "info")
    pub fn from_env() -> ConfigResult<Self> {
        let _ = dotenvy::dotenv();

        let source_url = env::var("SOURCE_URL").unwrap_or_else(|_| DEFAULT_SOURCE_URL.to_string());
        if !source_url.starts_with("http://") && !source_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                var: "SOURCE_URL".to_string(),
                reason: "Must start with http:// or https://".to_string(),
            });
        }

        let cache_ttl_minutes = Self::parse_env("CACHE_TTL_MINUTES", 30u64)?;
        let request_timeout = Self::parse_env("REQUEST_TIMEOUT", 10u64)?;
        let fetch_max_attempts = Self::parse_env("FETCH_MAX_ATTEMPTS", 5u32)?;
        let fetch_backoff_base_ms = Self::parse_env("FETCH_BACKOFF_BASE_MS", 1000u64)?;
        let port = Self::parse_env("PORT", 8080u16)?;

        if !(1..=10).contains(&fetch_max_attempts) {
            return Err(ConfigError::InvalidValue {
                var: "FETCH_MAX_ATTEMPTS".to_string(),
                reason: "Must be between 1 and 10".to_string(),
            });
        }

        if cache_ttl_minutes == 0 || cache_ttl_minutes > MAX_CACHE_TTL_MINUTES {
            return Err(ConfigError::InvalidValue {
                var: "CACHE_TTL_MINUTES".to_string(),
                reason: format!("Must be between 1 and {}", MAX_CACHE_TTL_MINUTES),
            });
        }

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0".to_string());
        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let config = Config {
            source_url,
            cache_ttl_minutes,
            request_timeout,
            fetch_max_attempts,
            fetch_backoff_base_ms,
            bind_addr,
            port,
            log_level,
        };

        // Fail at startup rather than at bind time
        config.socket_addr()?;

        Ok(config)
    }

    /// Cache TTL as a duration.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_minutes.saturating_mul(60))
    }

    /// Retry schedule for upstream fetches.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.fetch_max_attempts,
            base_delay: Duration::from_millis(self.fetch_backoff_base_ms),
        }
    }

    /// Address the HTTP server listens on.
    pub fn socket_addr(&self) -> ConfigResult<SocketAddr> {
        let addr = format!("{}:{}", self.bind_addr, self.port);
        addr.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue {
                var: "BIND_ADDR".to_string(),
                reason: format!("Invalid bind address {}: {}", addr, e),
            })
    }

    /// Parse an environment variable with a default value.
    fn parse_env<T: std::str::FromStr>(var_name: &str, default: T) -> ConfigResult<T> {
        match env::var(var_name) {
            Ok(val) => val.trim().parse::<T>().map_err(|_| ConfigError::InvalidValue {
                var: var_name.to_string(),
                reason: format!("Must be a positive number, got: {}", val),
            }),
            Err(_) => Ok(default),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            source_url: DEFAULT_SOURCE_URL.to_string(),
            cache_ttl_minutes: 30,
            request_timeout: 10,
            fetch_max_attempts: 5,
            fetch_backoff_base_ms: 1000,
            bind_addr: "0.0.0.0".to_string(),
            port: 8080,
            log_level: "info".to_string(),
        }
    }
}
