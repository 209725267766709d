//! Application-level errors

use domain::DomainError;
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// A geocoding or routing provider failed, timed out, or has no
    /// usable credentials
    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// The route estimator has no shop/customer coordinates yet
    #[error("No route data yet")]
    NoDataYet,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Check if this error is retryable
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::ProviderUnavailable(_))
    }
}
