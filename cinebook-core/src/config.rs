//! Booking flow configuration
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::seat::SeatTier;

/// Row-based tier banding: the first `standard_rows` rows are standard, the
/// next `premium_rows` are premium, everything after is deluxe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeatBanding {
    pub standard_rows: usize,
    pub premium_rows: usize,
}

impl Default for SeatBanding {
    fn default() -> Self {
        Self {
            standard_rows: 3,
            premium_rows: 4,
        }
    }
}

impl SeatBanding {
    /// Tier for the zero-based row index.
    #[must_use]
    pub const fn tier_for_row(&self, row_index: usize) -> SeatTier {
        if row_index < self.standard_rows {
            SeatTier::Standard
        } else if row_index < self.standard_rows + self.premium_rows {
            SeatTier::Premium
        } else {
            SeatTier::Deluxe
        }
    }
}

/// Seat price per tier, in whole rupees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceBands {
    pub standard: i64,
    pub premium: i64,
    pub deluxe: i64,
}

impl Default for PriceBands {
    fn default() -> Self {
        Self {
            standard: 250,
            premium: 350,
            deluxe: 450,
        }
    }
}

impl PriceBands {
    #[must_use]
    pub const fn price_for(&self, tier: SeatTier) -> i64 {
        match tier {
            SeatTier::Standard => self.standard,
            SeatTier::Premium => self.premium,
            SeatTier::Deluxe => self.deluxe,
        }
    }
}

/// Odds (in percent) used when synthesising occupancy for demo venues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OccupancyOdds {
    pub occupied_pct: u8,
    pub blocked_pct: u8,
}

impl Default for OccupancyOdds {
    fn default() -> Self {
        Self {
            occupied_pct: 30,
            blocked_pct: 5,
        }
    }
}

/// Tunables for seat layout, selection limits and the payment stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookingConfig {
    /// Maximum seats in a single booking.
    pub max_seats: usize,
    pub seats_per_row: u32,
    pub banding: SeatBanding,
    pub prices: PriceBands,
    pub booking_id_prefix: String,
    /// Artificial wait applied by front-ends while "processing" payment.
    pub payment_delay_ms: u64,
    pub synthetic_occupancy: OccupancyOdds,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self::default_config()
    }
}

impl BookingConfig {
    #[must_use]
    pub fn default_config() -> Self {
        Self {
            max_seats: 8,
            seats_per_row: 20,
            banding: SeatBanding::default(),
            prices: PriceBands::default(),
            booking_id_prefix: "BK".to_string(),
            payment_delay_ms: 3_000,
            synthetic_occupancy: OccupancyOdds::default(),
        }
    }

    /// Parse configuration JSON; missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}
