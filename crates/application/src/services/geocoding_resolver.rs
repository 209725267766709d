//! Address-to-coordinate resolution with ordered provider fallback
//!
//! Tries each configured provider once, in priority order, and falls back to
//! a fixed city-center default when the chain is exhausted. Resolution never
//! fails: downstream charge and route computation must always have a
//! coordinate to work with, so degraded accuracy is signalled through the
//! result's source tag instead of an error.

use std::sync::Arc;

use domain::value_objects::GeoPoint;
use tracing::{debug, info, instrument, warn};

use crate::ports::GeocodingProviderPort;

/// Where a resolved coordinate came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeocodeSource {
    /// A provider returned this coordinate
    Provider(&'static str),
    /// All providers were exhausted; this is the configured default
    Default,
}

/// A resolved coordinate plus its provenance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeocodeResult {
    /// The resolved coordinate
    pub location: GeoPoint,
    /// Which provider produced it, or `Default` for the terminal fallback
    pub source: GeocodeSource,
}

impl GeocodeResult {
    /// Whether this result carries degraded accuracy (terminal fallback)
    ///
    /// Callers must surface this to the user rather than hide it.
    #[must_use]
    pub const fn is_degraded(&self) -> bool {
        matches!(self.source, GeocodeSource::Default)
    }
}

/// Configuration for the resolver
#[derive(Debug, Clone, Copy)]
pub struct ResolverConfig {
    /// Terminal fallback coordinate when every provider fails
    pub default_location: GeoPoint,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            default_location: GeoPoint::city_center_default(),
        }
    }
}

/// Resolves free-text addresses through an ordered provider chain
pub struct GeocodingResolver {
    providers: Vec<Arc<dyn GeocodingProviderPort>>,
    config: ResolverConfig,
}

impl std::fmt::Debug for GeocodingResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeocodingResolver")
            .field("providers", &self.providers.len())
            .field("config", &self.config)
            .finish()
    }
}

impl GeocodingResolver {
    /// Create a resolver over providers in priority order (first is tried
    /// first)
    #[must_use]
    pub fn new(providers: Vec<Arc<dyn GeocodingProviderPort>>, config: ResolverConfig) -> Self {
        Self { providers, config }
    }

    /// Resolve an address to a coordinate; never fails
    ///
    /// Each provider gets exactly one attempt. An unavailable provider
    /// (missing credentials) is skipped without a request; a provider error,
    /// timeout, or empty result moves the chain along. When the chain is
    /// exhausted the configured default is returned tagged
    /// [`GeocodeSource::Default`].
    #[instrument(skip(self))]
    pub async fn resolve(&self, address: &str) -> GeocodeResult {
        for provider in &self.providers {
            let name = provider.provider_name();

            if !provider.is_available().await {
                debug!(provider = name, "Provider unavailable, skipping");
                continue;
            }

            match provider.geocode(address).await {
                Ok(location) => {
                    debug!(provider = name, %location, "Geocoded address");
                    return GeocodeResult {
                        location,
                        source: GeocodeSource::Provider(name),
                    };
                },
                Err(e) => {
                    warn!(provider = name, error = %e, "Provider attempt failed");
                },
            }
        }

        info!(%address, "All geocoding providers exhausted, using default location");
        GeocodeResult {
            location: self.config.default_location,
            source: GeocodeSource::Default,
        }
    }
}
