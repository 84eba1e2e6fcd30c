//! Error types for the platform client

use lagwatch_core::MonitorError;
use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when calling the platform API
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed (connection, timeout, body read)
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// API returned an error status code without a usable body
    #[error("API error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Response body as returned by the API
        message: String,
    },

    /// Response body did not have the expected shape
    #[error("Unexpected response: {0}")]
    ProtocolError(String),

    /// Request could not be built
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ClientError {
    /// Create an API error from status code and message
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            message: message.into(),
        }
    }
}

impl From<ClientError> for MonitorError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::ProtocolError(detail) => MonitorError::Protocol(detail),
            other => MonitorError::Transport(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lagwatch_core::ErrorKind;

    #[test]
    fn test_protocol_error_maps_to_protocol_kind() {
        let err: MonitorError = ClientError::ProtocolError("no data".to_string()).into();
        assert_eq!(err.kind(), ErrorKind::Protocol);
        assert_eq!(err.detail(), "no data");
    }

    #[test]
    fn test_api_error_maps_to_transport_kind() {
        let err: MonitorError = ClientError::api_error(502, "Bad Gateway").into();
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert!(err.detail().contains("502"));
    }
}
