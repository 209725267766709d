//! Routing error types

use thiserror::Error;

/// Errors that can occur during a routing request
#[derive(Debug, Error)]
pub enum RoutingError {
    /// Connection to the routing service failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// HTTP request to the routing service failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Failed to parse the response from the routing service
    #[error("Parse error: {0}")]
    ParseError(String),

    /// The service could not produce a route between the given points
    #[error("No route found: {0}")]
    NoRoute(String),

    /// Request timed out
    #[error("Routing request timed out")]
    Timeout,
}

impl RoutingError {
    /// Returns true if a later attempt could succeed
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed(_) | Self::RequestFailed(_) | Self::Timeout
        )
    }
}
