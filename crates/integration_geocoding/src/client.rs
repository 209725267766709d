//! Shared trait for geocoding clients

use async_trait::async_trait;
use domain::value_objects::GeoPoint;

use crate::error::GeocodingError;

/// Trait for geocoding clients
#[async_trait]
pub trait GeocodeClient: Send + Sync {
    /// Stable provider name for logs and result provenance
    fn name(&self) -> &'static str;

    /// Whether the client has everything it needs to issue requests
    ///
    /// A client without usable credentials reports false so callers can
    /// skip it without a network round trip.
    fn is_configured(&self) -> bool;

    /// Convert a free-form address to geographic coordinates
    async fn geocode(&self, address: &str) -> Result<GeoPoint, GeocodingError>;
}
