//! Geocoding port adapter

use std::sync::Arc;

use application::error::ApplicationError;
use application::ports::GeocodingProviderPort;
use async_trait::async_trait;
use domain::value_objects::GeoPoint;
use integration_geocoding::GeocodeClient;
use tracing::debug;

/// Adapts any [`GeocodeClient`] to the application's provider port
pub struct GeocodingAdapter {
    client: Arc<dyn GeocodeClient>,
}

impl GeocodingAdapter {
    /// Wrap a geocoding client
    #[must_use]
    pub fn new(client: Arc<dyn GeocodeClient>) -> Self {
        Self { client }
    }
}

impl std::fmt::Debug for GeocodingAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeocodingAdapter")
            .field("provider", &self.client.name())
            .finish()
    }
}

#[async_trait]
impl GeocodingProviderPort for GeocodingAdapter {
    fn provider_name(&self) -> &'static str {
        self.client.name()
    }

    async fn is_available(&self) -> bool {
        self.client.is_configured()
    }

    async fn geocode(&self, address: &str) -> Result<GeoPoint, ApplicationError> {
        self.client.geocode(address).await.map_err(|e| {
            debug!(provider = self.client.name(), error = %e, "Geocoding attempt failed");
            ApplicationError::ProviderUnavailable(format!("{}: {e}", self.client.name()))
        })
    }
}
