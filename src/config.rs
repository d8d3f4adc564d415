//! Configuration management for the Lanyard MCP Server
//!
//! Defaults point at the public Lanyard API. Environment variables and CLI
//! flags may override them; none are required.

use std::time::Duration;

use crate::error::{ConfigError, Result};

/// Environment variable overriding the API base URL
pub const ENV_API_BASE: &str = "LANYARD_API_BASE";

/// Environment variable overriding the request timeout (whole seconds)
pub const ENV_TIMEOUT_SECS: &str = "LANYARD_TIMEOUT_SECS";

/// Configuration for the Lanyard MCP Server
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the Lanyard REST API, without trailing slash
    pub api_base_url: String,

    /// Timeout applied to every outbound request
    pub request_timeout: Duration,

    /// User-Agent sent to Lanyard
    pub user_agent: String,
}

impl Config {
    /// Create a configuration from defaults and process environment overrides
    pub fn new() -> Result<Self> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Create a configuration using `lookup` to resolve environment overrides
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(base) = lookup(ENV_API_BASE) {
            config = config.with_api_base_url(base)?;
        }

        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            let secs: u64 = raw.trim().parse().map_err(|_| ConfigError::InvalidEnvVar {
                var: ENV_TIMEOUT_SECS.to_string(),
                message: format!("expected a whole number of seconds, got '{}'", raw),
            })?;
            config = config.with_request_timeout(Duration::from_secs(secs))?;
        }

        Ok(config)
    }

    /// Override the API base URL
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Result<Self> {
        let url = url.into();
        let trimmed = url.trim().trim_end_matches('/');

        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(ConfigError::InvalidConfig {
                message: format!("API base URL must start with http:// or https://: {}", url),
            }
            .into());
        }

        self.api_base_url = trimmed.to_string();
        Ok(self)
    }

    /// Override the request timeout
    pub fn with_request_timeout(mut self, timeout: Duration) -> Result<Self> {
        if timeout.is_zero() {
            return Err(ConfigError::InvalidConfig {
                message: "request timeout must be greater than zero".to_string(),
            }
            .into());
        }

        self.request_timeout = timeout;
        Ok(self)
    }

    /// URL of the presence endpoint for a (validated) user ID
    pub fn user_url(&self, user_id: &str) -> String {
        format!("{}/users/{}", self.api_base_url, user_id)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: lanyard::API_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(lanyard::REQUEST_TIMEOUT_SECS),
            user_agent: format!("lanyard-mcp-server/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Lanyard API constants
pub mod lanyard {
    /// Base URL for the Lanyard API
    pub const API_BASE_URL: &str = "https://api.lanyard.rest/v1";

    /// Default request timeout in seconds
    pub const REQUEST_TIMEOUT_SECS: u64 = 10;

    /// Shortest plausible Discord snowflake
    pub const USER_ID_MIN_LEN: usize = 17;

    /// Longest plausible Discord snowflake
    pub const USER_ID_MAX_LEN: usize = 20;

    /// Prefix for public Spotify track links
    pub const SPOTIFY_TRACK_URL: &str = "https://open.spotify.com/track/";
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LanyardMcpError;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api_base_url, "https://api.lanyard.rest/v1");
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert!(config.user_agent.starts_with("lanyard-mcp-server/"));
    }

    #[test]
    fn test_user_url() {
        let config = Config::default();
        assert_eq!(
            config.user_url("94490510688792576"),
            "https://api.lanyard.rest/v1/users/94490510688792576"
        );
    }

    #[test]
    fn test_lookup_overrides() {
        let config = Config::from_lookup(|var| match var {
            ENV_API_BASE => Some("http://localhost:4001/v1/".to_string()),
            ENV_TIMEOUT_SECS => Some("3".to_string()),
            _ => None,
        })
        .unwrap();

        assert_eq!(config.api_base_url, "http://localhost:4001/v1");
        assert_eq!(config.request_timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_lookup_without_overrides_uses_defaults() {
        let config = Config::from_lookup(|_| None).unwrap();
        assert_eq!(config.api_base_url, lanyard::API_BASE_URL);
    }

    #[test]
    fn test_invalid_timeout_rejected() {
        let err = Config::from_lookup(|var| (var == ENV_TIMEOUT_SECS).then(|| "soon".to_string()))
            .unwrap_err();
        assert!(matches!(err, LanyardMcpError::Config(ConfigError::InvalidEnvVar { .. })));

        let err = Config::default()
            .with_request_timeout(Duration::ZERO)
            .unwrap_err();
        assert!(matches!(err, LanyardMcpError::Config(ConfigError::InvalidConfig { .. })));
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        assert!(Config::default().with_api_base_url("api.lanyard.rest").is_err());
    }
}
