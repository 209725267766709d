//! Geocoding provider port
//!
//! One entry in the resolver's ordered provider chain. A provider makes a
//! single attempt per query; retrying and fallback are the resolver's job.

use async_trait::async_trait;
use domain::value_objects::GeoPoint;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for a single geocoding provider
#[cfg_attr(test, automock)]
#[async_trait]
pub trait GeocodingProviderPort: Send + Sync {
    /// Stable name used in logs and in `GeocodeSource::Provider`
    fn provider_name(&self) -> &'static str;

    /// Whether this provider can be queried at all
    ///
    /// Missing or placeholder credentials make a provider unavailable; the
    /// resolver skips it immediately without issuing a request.
    async fn is_available(&self) -> bool;

    /// Resolve a free-text address to a coordinate
    ///
    /// One network request with a bounded timeout. Any provider error,
    /// timeout, or empty result surfaces as `ProviderUnavailable`.
    async fn geocode(&self, address: &str) -> Result<GeoPoint, ApplicationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn _assert_object_safe(_: &dyn GeocodingProviderPort) {}

    #[test]
    fn trait_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn GeocodingProviderPort>();
    }
}
