//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    /// Latitude or longitude is non-finite or out of range
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    /// Computed distance exceeds the plausibility bound, indicating bad
    /// input data rather than a real route
    #[error("Implausible distance: {computed_km:.1} km exceeds {limit_km:.1} km")]
    ImplausibleDistance {
        /// The distance that was computed
        computed_km: f64,
        /// The plausibility bound in effect
        limit_km: f64,
    },

    /// Charge tier table is empty or not strictly increasing
    #[error("Invalid charge schedule: {0}")]
    InvalidChargeSchedule(String),
}
