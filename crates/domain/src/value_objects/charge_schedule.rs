//! Tiered delivery-charge schedule
//!
//! Maps a delivery distance to a flat charge through an ordered table of
//! distance breakpoints, with a terminal charge for anything beyond the
//! last breakpoint.

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;
use crate::value_objects::DistanceKm;

/// One row of the tier table: every distance up to `max_distance_km` costs
/// `charge`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChargeTier {
    /// Inclusive upper distance bound for this tier, in kilometers
    pub max_distance_km: f64,
    /// Flat charge for distances within this tier
    pub charge: u32,
}

/// Validated, ascending tier table with a terminal unbounded charge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChargeSchedule {
    tiers: Vec<ChargeTier>,
    beyond_charge: u32,
}

impl ChargeSchedule {
    /// Create a schedule with validation
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidChargeSchedule` if the table is empty,
    /// not strictly increasing in both distance and charge, or the terminal
    /// charge does not exceed the last tier's charge.
    pub fn new(tiers: Vec<ChargeTier>, beyond_charge: u32) -> Result<Self, DomainError> {
        if tiers.is_empty() {
            return Err(DomainError::InvalidChargeSchedule(
                "tier table must not be empty".to_string(),
            ));
        }
        for tier in &tiers {
            if !tier.max_distance_km.is_finite() || tier.max_distance_km <= 0.0 {
                return Err(DomainError::InvalidChargeSchedule(format!(
                    "tier bound {} must be a positive finite distance",
                    tier.max_distance_km
                )));
            }
        }
        for pair in tiers.windows(2) {
            if pair[1].max_distance_km <= pair[0].max_distance_km {
                return Err(DomainError::InvalidChargeSchedule(format!(
                    "tier bounds must be strictly increasing: {} then {}",
                    pair[0].max_distance_km, pair[1].max_distance_km
                )));
            }
            if pair[1].charge <= pair[0].charge {
                return Err(DomainError::InvalidChargeSchedule(format!(
                    "tier charges must be strictly increasing: {} then {}",
                    pair[0].charge, pair[1].charge
                )));
            }
        }
        if let Some(last) = tiers.last()
            && beyond_charge <= last.charge
        {
            return Err(DomainError::InvalidChargeSchedule(format!(
                "terminal charge {} must exceed last tier charge {}",
                beyond_charge, last.charge
            )));
        }
        Ok(Self {
            tiers,
            beyond_charge,
        })
    }

    /// The charge for a given distance: the first tier whose bound is at
    /// least the distance, or the terminal charge when all bounds are
    /// exceeded. Total and deterministic.
    #[must_use]
    pub fn charge_for(&self, distance: DistanceKm) -> u32 {
        let d = distance.value();
        self.tiers
            .iter()
            .find(|tier| d <= tier.max_distance_km)
            .map_or(self.beyond_charge, |tier| tier.charge)
    }

    /// The tier rows, in ascending order
    #[must_use]
    pub fn tiers(&self) -> &[ChargeTier] {
        &self.tiers
    }

    /// The charge applied beyond the last tier bound
    #[must_use]
    pub const fn beyond_charge(&self) -> u32 {
        self.beyond_charge
    }
}

impl Default for ChargeSchedule {
    /// The product's fixed tier table
    fn default() -> Self {
        Self {
            tiers: vec![
                ChargeTier {
                    max_distance_km: 2.0,
                    charge: 20,
                },
                ChargeTier {
                    max_distance_km: 5.0,
                    charge: 30,
                },
                ChargeTier {
                    max_distance_km: 10.0,
                    charge: 45,
                },
                ChargeTier {
                    max_distance_km: 15.0,
                    charge: 60,
                },
                ChargeTier {
                    max_distance_km: 25.0,
                    charge: 80,
                },
            ],
            beyond_charge: 100,
        }
    }
}
