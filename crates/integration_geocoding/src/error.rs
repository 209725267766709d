//! Geocoding error types

use thiserror::Error;

/// Errors that can occur during a geocoding attempt
#[derive(Debug, Error)]
pub enum GeocodingError {
    /// Connection to the geocoding service failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// HTTP request to the geocoding service failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Failed to parse the response from the geocoding service
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Address could not be resolved to coordinates
    #[error("Address not found: {0}")]
    AddressNotFound(String),

    /// Provider credentials are absent or still the placeholder value
    #[error("Missing credentials for {0}")]
    MissingCredentials(&'static str),

    /// Request timed out
    #[error("Geocoding request timed out")]
    Timeout,
}

impl GeocodingError {
    /// Returns true if a later attempt against the same provider could
    /// succeed
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed(_) | Self::RequestFailed(_) | Self::Timeout
        )
    }
}
