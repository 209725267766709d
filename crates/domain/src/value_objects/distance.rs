//! Great-circle distance computation and formatting
//!
//! Haversine distance on a spherical Earth, with a plausibility bound that
//! turns obviously broken input data into an error instead of a "distance".

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;
use crate::value_objects::GeoPoint;

/// Mean Earth radius in kilometers
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Default sanity bound: half of Earth's circumference. No two points on the
/// sphere are further apart, so anything beyond this is corrupt input.
pub const MAX_PLAUSIBLE_DISTANCE_KM: f64 = 20_000.0;

/// A non-negative great-circle distance in kilometers
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct DistanceKm(f64);

impl DistanceKm {
    /// Create a distance from a raw kilometer value
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ImplausibleDistance` if the value is negative,
    /// non-finite, or beyond the default plausibility bound.
    pub fn new(km: f64) -> Result<Self, DomainError> {
        if !km.is_finite() || km < 0.0 || km > MAX_PLAUSIBLE_DISTANCE_KM {
            return Err(DomainError::ImplausibleDistance {
                computed_km: km,
                limit_km: MAX_PLAUSIBLE_DISTANCE_KM,
            });
        }
        Ok(Self(km))
    }

    /// Get the raw value in kilometers
    #[must_use]
    pub const fn value(&self) -> f64 {
        self.0
    }

    /// Round to one decimal place, the precision shown on charge estimates
    #[must_use]
    pub fn rounded_tenth(&self) -> f64 {
        (self.0 * 10.0).round() / 10.0
    }

    /// Render for display: whole meters below 1 km, otherwise kilometers
    /// with one decimal place
    #[must_use]
    pub fn format(&self) -> String {
        if self.0 < 1.0 {
            format!("{}m", (self.0 * 1000.0).round())
        } else {
            format!("{:.1}km", self.rounded_tenth())
        }
    }
}

impl fmt::Display for DistanceKm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format())
    }
}

/// Raw haversine distance between two validated coordinates in kilometers
#[must_use]
pub fn haversine_km(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let lat1_rad = a.latitude().to_radians();
    let lat2_rad = b.latitude().to_radians();
    let delta_lat = (b.latitude() - a.latitude()).to_radians();
    let delta_lon = (b.longitude() - a.longitude()).to_radians();

    let h = (lat1_rad.cos() * lat2_rad.cos()).mul_add(
        (delta_lon / 2.0).sin().powi(2),
        (delta_lat / 2.0).sin().powi(2),
    );
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

/// Great-circle distance between two validated coordinates, bounded by a
/// plausibility limit
///
/// # Errors
///
/// Returns `DomainError::ImplausibleDistance` when the computed magnitude
/// exceeds `max_plausible_km`. Such a value indicates bad input data rather
/// than a real route and must not be conflated with a genuine distance.
pub fn distance_km(
    a: &GeoPoint,
    b: &GeoPoint,
    max_plausible_km: f64,
) -> Result<DistanceKm, DomainError> {
    let computed = haversine_km(a, b);
    if computed > max_plausible_km {
        return Err(DomainError::ImplausibleDistance {
            computed_km: computed,
            limit_km: max_plausible_km,
        });
    }
    Ok(DistanceKm(computed))
}

/// Distance between two raw coordinate pairs, validating both first
///
/// The entry point for callers holding unvalidated data (external shop or
/// order records). Invalid input fails with `InvalidCoordinate` rather than
/// producing a false zero.
///
/// # Errors
///
/// Returns `DomainError::InvalidCoordinate` if either pair fails validation,
/// or `DomainError::ImplausibleDistance` per [`distance_km`].
pub fn distance_between(
    lat1: f64,
    lon1: f64,
    lat2: f64,
    lon2: f64,
    max_plausible_km: f64,
) -> Result<DistanceKm, DomainError> {
    let a = GeoPoint::new(lat1, lon1)?;
    let b = GeoPoint::new(lat2, lon2)?;
    distance_km(&a, &b, max_plausible_km)
}
