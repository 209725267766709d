//! Batch per-shop delivery-charge aggregation
//!
//! Applies the distance/tier arithmetic across a collection of shops against
//! one customer location. A single shop's bad coordinate data must never
//! abort the batch; such shops receive a fixed fallback estimate instead.

use std::collections::HashMap;

use domain::entities::ShopChargeEstimate;
use domain::value_objects::{
    ChargeSchedule, GeoPoint, MAX_PLAUSIBLE_DISTANCE_KM, ShopId, distance_between,
};
use tracing::{debug, instrument, warn};

/// One shop as supplied by the external shop data source
///
/// Coordinates are raw and possibly absent or malformed; validation happens
/// here, per shop.
#[derive(Debug, Clone, PartialEq)]
pub struct ShopLocation {
    /// The shop's identifier
    pub id: ShopId,
    /// Raw latitude, if the data source has one
    pub latitude: Option<f64>,
    /// Raw longitude, if the data source has one
    pub longitude: Option<f64>,
}

/// Configuration for charge estimation
#[derive(Debug, Clone)]
pub struct ChargeConfig {
    /// The tier table mapping distance to charge
    pub schedule: ChargeSchedule,
    /// Charge applied when a shop's coordinates are missing or invalid
    pub fallback_charge: u32,
    /// Plausibility bound for computed distances
    pub max_plausible_km: f64,
}

impl Default for ChargeConfig {
    fn default() -> Self {
        Self {
            schedule: ChargeSchedule::default(),
            fallback_charge: 30,
            max_plausible_km: MAX_PLAUSIBLE_DISTANCE_KM,
        }
    }
}

/// Stateless batch charge estimator
///
/// Pure apart from logging; safe to share across any number of concurrent
/// batch requests.
#[derive(Debug, Clone, Default)]
pub struct DeliveryChargeService {
    config: ChargeConfig,
}

impl DeliveryChargeService {
    /// Create a service with the given configuration
    #[must_use]
    pub const fn new(config: ChargeConfig) -> Self {
        Self { config }
    }

    /// Estimate the delivery charge for every shop against one customer
    /// location
    ///
    /// Shops with a valid coordinate get a real distance (rounded to one
    /// decimal place) and the tier charge for it. Shops with missing,
    /// malformed, or implausibly distant coordinates get the fixed fallback
    /// estimate (distance 0, fallback charge). Estimates are produced fresh
    /// per call; input order is irrelevant to the keyed result.
    #[instrument(skip(self, shops), fields(shop_count = shops.len()))]
    pub fn estimate_all(
        &self,
        customer: &GeoPoint,
        shops: &[ShopLocation],
    ) -> HashMap<ShopId, ShopChargeEstimate> {
        let mut estimates = HashMap::with_capacity(shops.len());
        for shop in shops {
            let estimate = self.estimate_one(customer, shop);
            estimates.insert(shop.id.clone(), estimate);
        }
        estimates
    }

    fn estimate_one(&self, customer: &GeoPoint, shop: &ShopLocation) -> ShopChargeEstimate {
        let (Some(lat), Some(lon)) = (shop.latitude, shop.longitude) else {
            debug!(shop_id = %shop.id, "Shop has no coordinates, using fallback estimate");
            return self.fallback_estimate(&shop.id);
        };

        match distance_between(
            lat,
            lon,
            customer.latitude(),
            customer.longitude(),
            self.config.max_plausible_km,
        ) {
            Ok(distance) => ShopChargeEstimate {
                shop_id: shop.id.clone(),
                distance_km: distance.rounded_tenth(),
                charge: self.config.schedule.charge_for(distance),
            },
            Err(e) => {
                warn!(shop_id = %shop.id, error = %e, "Bad shop coordinates, using fallback estimate");
                self.fallback_estimate(&shop.id)
            },
        }
    }

    fn fallback_estimate(&self, shop_id: &ShopId) -> ShopChargeEstimate {
        ShopChargeEstimate {
            shop_id: shop_id.clone(),
            distance_km: 0.0,
            charge: self.config.fallback_charge,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customer() -> GeoPoint {
        GeoPoint::new_unchecked(52.52, 13.405)
    }

    fn shop(id: &str, lat: f64, lon: f64) -> ShopLocation {
        ShopLocation {
            id: ShopId::new(id),
            latitude: Some(lat),
            longitude: Some(lon),
        }
    }

    #[test]
    fn valid_shop_gets_real_estimate() {
        let service = DeliveryChargeService::default();
        // ~3.3 km north of the customer
        let shops = [shop("nearby", 52.55, 13.405)];

        let estimates = service.estimate_all(&customer(), &shops);
        let estimate = &estimates[&ShopId::new("nearby")];
        assert!((estimate.distance_km - 3.3).abs() < 0.2);
        assert_eq!(estimate.charge, 30);
    }

    #[test]
    fn missing_coordinates_get_fallback() {
        let service = DeliveryChargeService::default();
        let shops = [ShopLocation {
            id: ShopId::new("no-coords"),
            latitude: None,
            longitude: None,
        }];

        let estimates = service.estimate_all(&customer(), &shops);
        let estimate = &estimates[&ShopId::new("no-coords")];
        assert!((estimate.distance_km - 0.0).abs() < f64::EPSILON);
        assert_eq!(estimate.charge, 30);
    }

    #[test]
    fn partial_failure_does_not_abort_batch() {
        let service = DeliveryChargeService::default();
        let shops = [
            ShopLocation {
                id: ShopId::new("broken"),
                latitude: Some(999.0),
                longitude: Some(13.4),
            },
            shop("fine", 52.53, 13.41),
        ];

        let estimates = service.estimate_all(&customer(), &shops);
        assert_eq!(estimates.len(), 2);

        let broken = &estimates[&ShopId::new("broken")];
        assert!((broken.distance_km - 0.0).abs() < f64::EPSILON);
        assert_eq!(broken.charge, 30);

        let fine = &estimates[&ShopId::new("fine")];
        assert!(fine.distance_km > 0.0);
    }

    #[test]
    fn nan_coordinates_get_fallback() {
        let service = DeliveryChargeService::default();
        let shops = [shop("nan-shop", f64::NAN, 13.4)];

        let estimates = service.estimate_all(&customer(), &shops);
        assert_eq!(estimates[&ShopId::new("nan-shop")].charge, 30);
    }

    #[test]
    fn tighter_plausibility_bound_triggers_fallback() {
        let config = ChargeConfig {
            max_plausible_km: 100.0,
            ..Default::default()
        };
        let service = DeliveryChargeService::new(config);
        // Munich is ~500 km from Berlin, beyond the tightened bound
        let shops = [shop("far", 48.137, 11.575)];

        let estimates = service.estimate_all(&customer(), &shops);
        let estimate = &estimates[&ShopId::new("far")];
        assert!((estimate.distance_km - 0.0).abs() < f64::EPSILON);
        assert_eq!(estimate.charge, 30);
    }

    #[test]
    fn custom_fallback_charge_respected() {
        let config = ChargeConfig {
            fallback_charge: 55,
            ..Default::default()
        };
        let service = DeliveryChargeService::new(config);
        let shops = [ShopLocation {
            id: ShopId::new("x"),
            latitude: None,
            longitude: Some(13.4),
        }];

        let estimates = service.estimate_all(&customer(), &shops);
        assert_eq!(estimates[&ShopId::new("x")].charge, 55);
    }

    #[test]
    fn empty_batch_yields_empty_map() {
        let service = DeliveryChargeService::default();
        assert!(service.estimate_all(&customer(), &[]).is_empty());
    }

    #[test]
    fn distance_rounded_to_one_decimal() {
        let service = DeliveryChargeService::default();
        let shops = [shop("s", 52.543, 13.42)];
        let estimates = service.estimate_all(&customer(), &shops);
        let d = estimates[&ShopId::new("s")].distance_km;
        assert!(((d * 10.0).round() - d * 10.0).abs() < 1e-9);
    }
}
