//! Error taxonomy for lag checks and notification delivery

use thiserror::Error;

/// Result type alias for monitor operations
pub type Result<T> = std::result::Result<T, MonitorError>;

/// Failure of a single pipeline check or a single delivery
///
/// Every variant is recoverable at per-pipeline or per-target granularity:
/// the batch records it and moves on to the next item.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MonitorError {
    /// The network call failed or returned a non-success status without a usable body
    #[error("transport error: {0}")]
    Transport(String),

    /// The response did not have the expected shape
    #[error("protocol error: {0}")]
    Protocol(String),

    /// The embedded timestamp could not be isolated or parsed
    #[error("parse error: {0}")]
    Parse(String),

    /// A notification could not be delivered
    #[error("delivery error: {0}")]
    Delivery(String),
}

/// Discriminant of [`MonitorError`], for callers that branch on the category only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Transport,
    Protocol,
    Parse,
    Delivery,
}

impl MonitorError {
    pub fn transport(detail: impl Into<String>) -> Self {
        Self::Transport(detail.into())
    }

    pub fn protocol(detail: impl Into<String>) -> Self {
        Self::Protocol(detail.into())
    }

    pub fn parse(detail: impl Into<String>) -> Self {
        Self::Parse(detail.into())
    }

    pub fn delivery(detail: impl Into<String>) -> Self {
        Self::Delivery(detail.into())
    }

    /// Category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Transport(_) => ErrorKind::Transport,
            Self::Protocol(_) => ErrorKind::Protocol,
            Self::Parse(_) => ErrorKind::Parse,
            Self::Delivery(_) => ErrorKind::Delivery,
        }
    }

    /// Detail message without the category prefix
    pub fn detail(&self) -> &str {
        match self {
            Self::Transport(d) | Self::Protocol(d) | Self::Parse(d) | Self::Delivery(d) => d,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_matches_variant() {
        assert_eq!(MonitorError::transport("x").kind(), ErrorKind::Transport);
        assert_eq!(MonitorError::protocol("x").kind(), ErrorKind::Protocol);
        assert_eq!(MonitorError::parse("x").kind(), ErrorKind::Parse);
        assert_eq!(MonitorError::delivery("x").kind(), ErrorKind::Delivery);
    }

    #[test]
    fn test_display_includes_category_and_detail() {
        let err = MonitorError::protocol("API response does not contain 'data' key");
        assert_eq!(
            err.to_string(),
            "protocol error: API response does not contain 'data' key"
        );
        assert_eq!(err.detail(), "API response does not contain 'data' key");
    }
}
