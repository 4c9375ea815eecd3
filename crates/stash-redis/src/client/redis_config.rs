//! Redis connection configuration.

use std::time::Duration;

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};

/// Configuration for Redis connections with sensible defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct RedisConfig {
    /// Redis server URL
    #[cfg_attr(feature = "config", arg(long = "redis-url", env = "REDIS_URL"))]
    pub redis_url: String,

    /// Client connection name for debugging and monitoring
    #[cfg_attr(
        feature = "config",
        arg(long = "redis-client-name", env = "REDIS_CLIENT_NAME")
    )]
    pub redis_client_name: Option<String>,

    /// Connection timeout in seconds (optional)
    #[cfg_attr(
        feature = "config",
        arg(long = "redis-connect-timeout", env = "REDIS_CONNECT_TIMEOUT_SECS")
    )]
    pub redis_connect_timeout: Option<u64>,

    /// Response timeout in seconds (optional)
    #[cfg_attr(
        feature = "config",
        arg(long = "redis-response-timeout", env = "REDIS_RESPONSE_TIMEOUT_SECS")
    )]
    pub redis_response_timeout: Option<u64>,

    /// Maximum reconnection attempts per lost connection (optional)
    #[cfg_attr(
        feature = "config",
        arg(long = "redis-max-reconnects", env = "REDIS_MAX_RECONNECTS")
    )]
    pub redis_max_reconnects: Option<usize>,
}

// Default values
const DEFAULT_URL: &str = "redis://127.0.0.1:6379";
const DEFAULT_NAME: &str = "stash-redis";

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            redis_url: DEFAULT_URL.to_string(),
            redis_client_name: None,
            redis_connect_timeout: None,
            redis_response_timeout: None,
            redis_max_reconnects: None,
        }
    }
}

impl RedisConfig {
    /// Create a new configuration with the given server URL.
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            redis_url: server_url.into(),
            ..Default::default()
        }
    }

    /// Create configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolve configuration through a variable lookup.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(url) = lookup("REDIS_URL") {
            config.redis_url = url;
        }

        if let Some(name) = lookup("REDIS_CLIENT_NAME") {
            config.redis_client_name = Some(name);
        }

        if let Some(timeout_str) = lookup("REDIS_CONNECT_TIMEOUT_SECS")
            && let Ok(timeout_secs) = timeout_str.parse::<u64>()
        {
            config.redis_connect_timeout = Some(timeout_secs);
        }

        if let Some(timeout_str) = lookup("REDIS_RESPONSE_TIMEOUT_SECS")
            && let Ok(timeout_secs) = timeout_str.parse::<u64>()
        {
            config.redis_response_timeout = Some(timeout_secs);
        }

        if let Some(max_str) = lookup("REDIS_MAX_RECONNECTS")
            && let Ok(max) = max_str.parse::<usize>()
        {
            config.redis_max_reconnects = Some(max);
        }

        config
    }

    /// Returns the client name, using the default if not set.
    #[inline]
    pub fn name(&self) -> &str {
        self.redis_client_name.as_deref().unwrap_or(DEFAULT_NAME)
    }

    /// Returns the connection timeout as a Duration, if set.
    #[inline]
    pub fn connect_timeout(&self) -> Option<Duration> {
        self.redis_connect_timeout.map(Duration::from_secs)
    }

    /// Returns the response timeout as a Duration, if set.
    #[inline]
    pub fn response_timeout(&self) -> Option<Duration> {
        self.redis_response_timeout.map(Duration::from_secs)
    }

    /// Returns the maximum reconnection attempts, if set.
    #[inline]
    pub fn max_reconnects(&self) -> Option<usize> {
        self.redis_max_reconnects
    }

    /// Set the server URL.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.redis_url = url.into();
        self
    }

    /// Set the client connection name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.redis_client_name = Some(name.into());
        self
    }

    /// Set the connection timeout in seconds.
    #[must_use]
    pub fn with_connect_timeout_secs(mut self, secs: u64) -> Self {
        self.redis_connect_timeout = Some(secs);
        self
    }

    /// Set the response timeout in seconds.
    #[must_use]
    pub fn with_response_timeout_secs(mut self, secs: u64) -> Self {
        self.redis_response_timeout = Some(secs);
        self
    }

    /// Set maximum reconnection attempts per lost connection.
    #[must_use]
    pub fn with_max_reconnects(mut self, max_reconnects: usize) -> Self {
        self.redis_max_reconnects = Some(max_reconnects);
        self
    }

    /// Validate the configuration and return any issues.
    pub fn validate(&self) -> Result<(), String> {
        let url = self.redis_url.trim();

        if url.is_empty() {
            return Err("Server URL cannot be empty".to_string());
        }

        if !url.starts_with("redis://")
            && !url.starts_with("rediss://")
            && !url.starts_with("redis+unix://")
            && !url.starts_with("unix://")
        {
            return Err(format!("Invalid server URL format: {}", url));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RedisConfig::default();
        assert_eq!(config.redis_url, DEFAULT_URL);
        assert_eq!(config.name(), DEFAULT_NAME);
        assert_eq!(config.connect_timeout(), None);
        assert_eq!(config.response_timeout(), None);
        assert_eq!(config.max_reconnects(), None);
    }

    #[test]
    fn test_config_builder() {
        let config = RedisConfig::new("redis://localhost:6379")
            .with_name("test-client")
            .with_connect_timeout_secs(5)
            .with_response_timeout_secs(15)
            .with_max_reconnects(5);

        assert_eq!(config.redis_url, "redis://localhost:6379");
        assert_eq!(config.name(), "test-client");
        assert_eq!(config.connect_timeout(), Some(Duration::from_secs(5)));
        assert_eq!(config.response_timeout(), Some(Duration::from_secs(15)));
        assert_eq!(config.max_reconnects(), Some(5));
    }

    #[test]
    fn test_config_validation() {
        let valid_config = RedisConfig::new("redis://localhost:6379");
        assert!(valid_config.validate().is_ok());

        let tls_config = RedisConfig::new("rediss://cache.internal:6380");
        assert!(tls_config.validate().is_ok());

        let empty_url = RedisConfig::new("");
        assert!(empty_url.validate().is_err());

        let invalid_url = RedisConfig::new("http://localhost:6379");
        assert!(invalid_url.validate().is_err());
    }

    #[test]
    fn test_env_resolution_applies_overrides() {
        let vars = [
            ("REDIS_URL", "redis://cache.internal:6380"),
            ("REDIS_CLIENT_NAME", "env-client"),
            ("REDIS_CONNECT_TIMEOUT_SECS", "5"),
            ("REDIS_RESPONSE_TIMEOUT_SECS", "15"),
            ("REDIS_MAX_RECONNECTS", "3"),
        ];
        let config = RedisConfig::from_lookup(|name| {
            vars.iter()
                .find(|(var, _)| *var == name)
                .map(|(_, value)| value.to_string())
        });

        assert_eq!(config.redis_url, "redis://cache.internal:6380");
        assert_eq!(config.name(), "env-client");
        assert_eq!(config.connect_timeout(), Some(Duration::from_secs(5)));
        assert_eq!(config.response_timeout(), Some(Duration::from_secs(15)));
        assert_eq!(config.max_reconnects(), Some(3));
    }

    #[test]
    fn test_env_resolution_defaults_when_unset() {
        let config = RedisConfig::from_lookup(|_| None);

        assert_eq!(config.redis_url, DEFAULT_URL);
        assert_eq!(config.name(), DEFAULT_NAME);
        assert_eq!(config.connect_timeout(), None);
        assert_eq!(config.response_timeout(), None);
        assert_eq!(config.max_reconnects(), None);
    }

    #[test]
    fn test_env_resolution_ignores_unparsable_numbers() {
        let config = RedisConfig::from_lookup(|name| match name {
            "REDIS_CONNECT_TIMEOUT_SECS" => Some("soon".to_string()),
            "REDIS_MAX_RECONNECTS" => Some("-1".to_string()),
            _ => None,
        });

        assert_eq!(config.connect_timeout(), None);
        assert_eq!(config.max_reconnects(), None);
    }

    #[test]
    fn test_with_url_overrides_target() {
        let config = RedisConfig::default().with_url("redis://cache.internal:6380");
        assert_eq!(config.redis_url, "redis://cache.internal:6380");
    }
}
