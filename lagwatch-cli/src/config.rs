//! Configuration module
//!
//! Handles CLI configuration: platform API root, token and request timeout.

use anyhow::{Context, Result};
use lagwatch_client::PlatformClient;
use std::time::Duration;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Platform API root
    pub api_url: String,
    /// Basic auth token, required only by commands that call the platform
    pub api_token: Option<String>,
    /// Timeout applied to every outbound request
    pub timeout: Duration,
}

impl Config {
    /// Builds a platform client from the configured URL, token and timeout
    pub fn platform_client(&self) -> Result<PlatformClient> {
        let token = self
            .api_token
            .as_deref()
            .context("Platform API token is required (--token or PLATFORM_API_TOKEN)")?;

        PlatformClient::with_timeout(self.api_url.clone(), token, self.timeout)
            .context("Failed to build platform client")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_client_requires_token() {
        let config = Config {
            api_url: "http://localhost:8080".to_string(),
            api_token: None,
            timeout: Duration::from_secs(5),
        };
        assert!(config.platform_client().is_err());

        let config = Config {
            api_token: Some("token".to_string()),
            ..config
        };
        assert_eq!(
            config.platform_client().unwrap().base_url(),
            "http://localhost:8080"
        );
    }
}
