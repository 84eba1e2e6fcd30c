//! Lagwatch HTTP Client
//!
//! A small, type-safe client for the data-pipeline platform's public REST API.
//!
//! Shared by the lag monitor (position reads) and the operations CLI
//! (object restarts and model runs).
//!
//! # Example
//!
//! ```no_run
//! use lagwatch_client::PlatformClient;
//! use lagwatch_core::domain::pipeline::PipelineId;
//!
//! #[tokio::main]
//! async fn main() -> lagwatch_client::Result<()> {
//!     let client = PlatformClient::new("https://us.hevodata.com/api/public/v2.0", "token");
//!
//!     let report = client.get_position(&PipelineId::from(683u64)).await?;
//!     println!("Display position: {}", report.display_position);
//!     Ok(())
//! }
//! ```

pub mod error;
mod models;
mod pipelines;

pub use error::{ClientError, Result};

use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Client, RequestBuilder, Url};
use std::time::Duration;

/// Status and body of a response that is reported verbatim, not interpreted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP client for the platform API
///
/// Endpoints are grouped by resource:
/// - Pipelines: position reads, object restarts
/// - Models: run-now triggers
#[derive(Debug, Clone)]
pub struct PlatformClient {
    /// API root (e.g., "https://us.hevodata.com/api/public/v2.0")
    base_url: String,
    /// Value sent as `Authorization: Basic <token>`
    token: String,
    /// HTTP client instance
    client: Client,
}

impl PlatformClient {
    /// Create a new platform client
    ///
    /// # Arguments
    /// * `base_url` - The API root
    /// * `token` - The Basic auth token
    ///
    /// # Example
    /// ```
    /// use lagwatch_client::PlatformClient;
    ///
    /// let client = PlatformClient::new("https://us.hevodata.com/api/public/v2.0/", "token");
    /// assert_eq!(client.base_url(), "https://us.hevodata.com/api/public/v2.0");
    /// ```
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self::with_client(base_url, token, Client::new())
    }

    /// Create a new platform client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    pub fn with_client(base_url: impl Into<String>, token: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.into(),
            client,
        }
    }

    /// Create a new platform client whose requests time out after `timeout`
    pub fn with_timeout(
        base_url: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(base_url, token, client))
    }

    /// Get the API root
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // =============================================================================
    // Request Helpers
    // =============================================================================

    /// Endpoint URL under the API root
    ///
    /// Each segment is percent-encoded, so identifiers containing `/`, `?`
    /// or `#` stay within their own path segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ClientError::InvalidRequest(format!("invalid API URL '{}': {}", self.base_url, e)))?;

        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidRequest(format!("API URL '{}' cannot have a path", self.base_url)))?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }

    /// Headers sent with every request
    fn default_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        let auth = HeaderValue::from_str(&format!("Basic {}", self.token))
            .map_err(|e| ClientError::InvalidRequest(format!("invalid API token: {}", e)))?;
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    fn get(&self, url: Url) -> Result<RequestBuilder> {
        Ok(self.client.get(url).headers(self.default_headers()?))
    }

    fn post(&self, url: Url) -> Result<RequestBuilder> {
        Ok(self.client.post(url).headers(self.default_headers()?))
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Read status and body without interpreting either
    async fn handle_raw_response(&self, response: reqwest::Response) -> Result<RawResponse> {
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(RawResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = PlatformClient::new("http://localhost:8080", "token");
        assert_eq!(client.base_url(), "http://localhost:8080");
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = PlatformClient::new("http://localhost:8080/", "token");
        assert_eq!(client.base_url(), "http://localhost:8080");
    }

    #[test]
    fn test_client_with_timeout() {
        let client =
            PlatformClient::with_timeout("http://localhost:8080", "token", Duration::from_secs(5))
                .unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080");
    }

    #[test]
    fn test_invalid_token_is_rejected() {
        let client = PlatformClient::new("http://localhost:8080", "bad\ntoken");
        assert!(matches!(
            client.default_headers(),
            Err(ClientError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_endpoint_keeps_api_root_path() {
        let client = PlatformClient::new("https://us.hevodata.com/api/public/v2.0/", "token");
        let url = client.endpoint(&["pipelines", "683", "position"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://us.hevodata.com/api/public/v2.0/pipelines/683/position"
        );
    }

    #[test]
    fn test_endpoint_escapes_segments() {
        let client = PlatformClient::new("http://localhost:8080", "token");
        let url = client
            .endpoint(&["pipelines", "683", "objects", "db/orders?v=1#x", "restart"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/pipelines/683/objects/db%2Forders%3Fv=1%23x/restart"
        );
    }

    #[test]
    fn test_endpoint_rejects_invalid_root() {
        let client = PlatformClient::new("not a url", "token");
        assert!(matches!(
            client.endpoint(&["models"]),
            Err(ClientError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_raw_response_success() {
        let ok = RawResponse {
            status: 202,
            body: String::new(),
        };
        let failed = RawResponse {
            status: 404,
            body: "not found".to_string(),
        };
        assert!(ok.is_success());
        assert!(!failed.is_success());
    }
}
