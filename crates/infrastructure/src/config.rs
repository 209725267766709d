//! Application configuration
//!
//! Loaded from an optional `config.toml` plus `KIEZBOTE_*` environment
//! variables. Every section has working defaults so the service starts
//! with no configuration at all.

use application::services::{ChargeConfig, ResolverConfig, TrackingConfig};
use domain::value_objects::{
    ChargeSchedule, ChargeTier, GeoPoint, MAX_PLAUSIBLE_DISTANCE_KM,
};
use integration_geocoding::{NominatimConfig, PositionStackConfig};
use integration_routing::RoutingConfig;
use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Delivery charge tier table
    #[serde(default)]
    pub charges: ChargeAppConfig,

    /// Geocoding provider chain settings
    #[serde(default)]
    pub geocoding: GeocodingAppConfig,

    /// Routing service settings
    #[serde(default)]
    pub routing: RoutingConfig,

    /// Live-tracking estimator settings
    #[serde(default)]
    pub tracking: TrackingAppConfig,
}

impl AppConfig {
    /// Load configuration from environment and optional file
    ///
    /// # Errors
    ///
    /// Returns an error if the file or environment values cannot be parsed.
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            // Load from file if exists
            .add_source(config::File::with_name("config").required(false))
            // Override with environment variables (e.g., KIEZBOTE_ROUTING_TIMEOUT_SECS)
            .add_source(
                config::Environment::with_prefix("KIEZBOTE")
                    .separator("_")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Check cross-field constraints the type system cannot express
    ///
    /// # Errors
    ///
    /// Returns a message describing the first violated constraint.
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        self.charges
            .to_charge_config()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        if self.tracking.refresh_interval_secs == 0 {
            return Err(config::ConfigError::Message(
                "tracking.refresh_interval_secs must be at least 1".to_string(),
            ));
        }
        if self.tracking.min_driver_move_km < 0.0 {
            return Err(config::ConfigError::Message(
                "tracking.min_driver_move_km must not be negative".to_string(),
            ));
        }
        if let Some(location) = self.geocoding.default_location
            && location.to_geo_point().is_none()
        {
            return Err(config::ConfigError::Message(format!(
                "geocoding.default_location is out of range: ({}, {})",
                location.latitude, location.longitude
            )));
        }
        Ok(())
    }
}

/// Geographic coordinate pair as written in configuration
///
/// Configured as inline table: `{ latitude = 52.52, longitude = 13.405 }`
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GeoPointConfig {
    /// Latitude (-90.0 to 90.0)
    pub latitude: f64,
    /// Longitude (-180.0 to 180.0)
    pub longitude: f64,
}

impl GeoPointConfig {
    /// Convert to the validated domain coordinate
    ///
    /// Returns `None` if coordinates are invalid.
    #[must_use]
    pub fn to_geo_point(&self) -> Option<GeoPoint> {
        GeoPoint::new(self.latitude, self.longitude).ok()
    }
}

// ==============================
// Delivery Charges
// ==============================

/// One configured charge tier
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ChargeTierConfig {
    /// Inclusive upper distance bound in kilometers
    pub max_distance_km: f64,
    /// Flat charge within this tier
    pub charge: u32,
}

/// Delivery charge configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChargeAppConfig {
    /// Ascending tier table; distances beyond the last tier cost `beyond_charge`
    #[serde(default = "default_tiers")]
    pub tiers: Vec<ChargeTierConfig>,

    /// Charge for distances past the last tier
    #[serde(default = "default_beyond_charge")]
    pub beyond_charge: u32,

    /// Charge applied when a shop's distance cannot be computed
    #[serde(default = "default_fallback_charge")]
    pub fallback_charge: u32,

    /// Upper bound on a believable computed distance, in kilometers
    #[serde(default = "default_max_plausible_km")]
    pub max_plausible_km: f64,
}

fn default_tiers() -> Vec<ChargeTierConfig> {
    ChargeSchedule::default()
        .tiers()
        .iter()
        .map(|tier| ChargeTierConfig {
            max_distance_km: tier.max_distance_km,
            charge: tier.charge,
        })
        .collect()
}

fn default_beyond_charge() -> u32 {
    ChargeSchedule::default().beyond_charge()
}

const fn default_fallback_charge() -> u32 {
    30
}

const fn default_max_plausible_km() -> f64 {
    MAX_PLAUSIBLE_DISTANCE_KM
}

impl Default for ChargeAppConfig {
    fn default() -> Self {
        Self {
            tiers: default_tiers(),
            beyond_charge: default_beyond_charge(),
            fallback_charge: default_fallback_charge(),
            max_plausible_km: default_max_plausible_km(),
        }
    }
}

impl ChargeAppConfig {
    /// Build the validated application-layer charge configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the tier table is not strictly ascending.
    pub fn to_charge_config(&self) -> Result<ChargeConfig, domain::errors::DomainError> {
        let tiers = self
            .tiers
            .iter()
            .map(|tier| ChargeTier {
                max_distance_km: tier.max_distance_km,
                charge: tier.charge,
            })
            .collect();
        let schedule = ChargeSchedule::new(tiers, self.beyond_charge)?;
        Ok(ChargeConfig {
            schedule,
            fallback_charge: self.fallback_charge,
            max_plausible_km: self.max_plausible_km,
        })
    }
}

// ==============================
// Geocoding
// ==============================

/// Geocoding provider chain configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeocodingAppConfig {
    /// PositionStack settings (key-based primary provider)
    #[serde(default)]
    pub positionstack: PositionStackConfig,

    /// Nominatim settings (community fallback provider)
    #[serde(default)]
    pub nominatim: NominatimConfig,

    /// Terminal fallback location when every provider fails;
    /// city center when unset
    #[serde(default)]
    pub default_location: Option<GeoPointConfig>,
}

impl GeocodingAppConfig {
    /// Build the application-layer resolver configuration
    #[must_use]
    pub fn to_resolver_config(&self) -> ResolverConfig {
        let default_location = self
            .default_location
            .and_then(|location| location.to_geo_point())
            .unwrap_or_else(GeoPoint::city_center_default);
        ResolverConfig { default_location }
    }
}

// ==============================
// Live Tracking
// ==============================

/// Live-tracking estimator configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TrackingAppConfig {
    /// Seconds between periodic route refreshes
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,

    /// Minimum driver displacement (km) that triggers an immediate refresh
    #[serde(default = "default_min_driver_move_km")]
    pub min_driver_move_km: f64,
}

const fn default_refresh_interval_secs() -> u64 {
    60
}

const fn default_min_driver_move_km() -> f64 {
    0.01
}

impl Default for TrackingAppConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: default_refresh_interval_secs(),
            min_driver_move_km: default_min_driver_move_km(),
        }
    }
}

impl TrackingAppConfig {
    /// Build the application-layer tracking configuration
    #[must_use]
    pub const fn to_tracking_config(&self) -> TrackingConfig {
        TrackingConfig {
            refresh_interval_secs: self.refresh_interval_secs,
            min_driver_move_km: self.min_driver_move_km,
        }
    }
}
