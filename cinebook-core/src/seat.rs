//! Seat layout generation and availability.
use once_cell::sync::Lazy;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::config::{BookingConfig, OccupancyOdds, PriceBands, SeatBanding};
use crate::selection::SeatSelection;

static SEAT_ID: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"^([A-Z]+)([1-9][0-9]*)$").ok());

/// Availability of a seat for one layout render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeatStatus {
    Available,
    #[serde(alias = "booked")]
    Occupied,
    Blocked,
}

impl SeatStatus {
    #[must_use]
    pub const fn is_available(self) -> bool {
        matches!(self, Self::Available)
    }
}

/// Price/type band of a seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeatTier {
    Standard,
    Premium,
    Deluxe,
}

impl SeatTier {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Premium => "premium",
            Self::Deluxe => "deluxe",
        }
    }
}

/// A single seat in a rendered layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seat {
    /// Human readable code, e.g. `B7`.
    pub id: String,
    pub row: String,
    pub number: u32,
    pub status: SeatStatus,
    pub price: i64,
    #[serde(rename = "type")]
    pub tier: SeatTier,
    #[serde(default)]
    pub is_selected: bool,
}

impl Seat {
    #[must_use]
    pub const fn is_booked(&self) -> bool {
        !self.status.is_available()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatRow {
    pub label: String,
    pub seats: Vec<Seat>,
}

/// Ordered rows of seats for one venue render.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatLayout {
    pub rows: Vec<SeatRow>,
}

impl SeatLayout {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Total seats across every row.
    #[must_use]
    pub fn seat_count(&self) -> usize {
        self.rows.iter().map(|row| row.seats.len()).sum()
    }

    #[must_use]
    pub fn available_count(&self) -> usize {
        self.seats().filter(|seat| seat.status.is_available()).count()
    }

    pub fn seats(&self) -> impl Iterator<Item = &Seat> {
        self.rows.iter().flat_map(|row| row.seats.iter())
    }

    #[must_use]
    pub fn find(&self, seat_id: &str) -> Option<&Seat> {
        self.seats().find(|seat| seat.id == seat_id)
    }

    /// Refresh `is_selected` flags from the authoritative selection.
    pub fn apply_selection(&mut self, selection: &SeatSelection) {
        for seat in self.rows.iter_mut().flat_map(|row| row.seats.iter_mut()) {
            seat.is_selected = selection.contains(&seat.id);
        }
    }
}

/// Venue shape: total seats laid out `seats_per_row` at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutSpec {
    pub total_seats: i64,
    pub seats_per_row: u32,
}

impl LayoutSpec {
    #[must_use]
    pub const fn for_venue(total_seats: i64, seats_per_row: u32) -> Self {
        Self {
            total_seats,
            seats_per_row,
        }
    }

    /// Full `rows` x `seats_per_row` grid.
    #[must_use]
    pub fn grid(rows: u32, seats_per_row: u32) -> Self {
        Self {
            total_seats: i64::from(rows) * i64::from(seats_per_row),
            seats_per_row,
        }
    }

    /// Spread `total_seats` over `rows` rows; row width is the ceiling of the division.
    #[must_use]
    pub fn with_row_count(total_seats: i64, rows: u32) -> Self {
        let seats_per_row = if rows == 0 || total_seats <= 0 {
            0
        } else {
            let width = (total_seats + i64::from(rows) - 1) / i64::from(rows);
            u32::try_from(width).unwrap_or(u32::MAX)
        };
        Self {
            total_seats,
            seats_per_row,
        }
    }

    /// Number of rows; zero for degenerate shapes.
    #[must_use]
    pub fn row_count(&self) -> usize {
        if self.total_seats <= 0 || self.seats_per_row == 0 {
            return 0;
        }
        let width = i64::from(self.seats_per_row);
        usize::try_from((self.total_seats + width - 1) / width).unwrap_or(0)
    }

    /// Seats in the given row; only the last row may be short.
    #[must_use]
    pub fn seats_in_row(&self, row_index: usize) -> u32 {
        let rows = self.row_count();
        if row_index >= rows {
            return 0;
        }
        if row_index + 1 < rows {
            return self.seats_per_row;
        }
        let before = i64::try_from(row_index).unwrap_or(i64::MAX) * i64::from(self.seats_per_row);
        u32::try_from(self.total_seats - before).unwrap_or(0)
    }

    /// Seat ids in row-major order.
    pub fn seat_ids(&self) -> impl Iterator<Item = String> + '_ {
        (0..self.row_count()).flat_map(move |row| {
            let label = row_label(row);
            (1..=self.seats_in_row(row)).map(move |number| format!("{label}{number}"))
        })
    }
}

/// Seat ids that cannot be selected in a render.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    pub occupied: BTreeSet<String>,
    pub blocked: BTreeSet<String>,
}

impl Inventory {
    #[must_use]
    pub fn with_occupied<I, T>(ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            occupied: ids.into_iter().map(Into::into).collect(),
            blocked: BTreeSet::new(),
        }
    }

    #[must_use]
    pub fn status_of(&self, seat_id: &str) -> SeatStatus {
        if self.blocked.contains(seat_id) {
            SeatStatus::Blocked
        } else if self.occupied.contains(seat_id) {
            SeatStatus::Occupied
        } else {
            SeatStatus::Available
        }
    }
}

/// Source of seat availability for a venue.
///
/// This is where a real inventory service would attach; the bundled
/// implementations are either explicit or seeded-synthetic.
pub trait InventorySource {
    fn inventory(&mut self, spec: &LayoutSpec) -> Inventory;
}

/// Availability supplied explicitly, e.g. `booked_seat_numbers` from a show.
#[derive(Debug, Clone, Default)]
pub struct FixedInventory(pub Inventory);

impl InventorySource for FixedInventory {
    fn inventory(&mut self, _spec: &LayoutSpec) -> Inventory {
        self.0.clone()
    }
}

/// Deterministic pseudo-random availability for demo venues.
#[derive(Debug, Clone)]
pub struct SyntheticInventory {
    rng: ChaCha8Rng,
    odds: OccupancyOdds,
}

impl SyntheticInventory {
    #[must_use]
    pub fn new(seed: u64, odds: OccupancyOdds) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            odds,
        }
    }
}

impl InventorySource for SyntheticInventory {
    fn inventory(&mut self, spec: &LayoutSpec) -> Inventory {
        let mut inventory = Inventory::default();
        for id in spec.seat_ids() {
            let occupied = self.rng.gen_range(0..100) < u32::from(self.odds.occupied_pct);
            let blocked = self.rng.gen_range(0..100) < u32::from(self.odds.blocked_pct);
            if blocked {
                inventory.blocked.insert(id);
            } else if occupied {
                inventory.occupied.insert(id);
            }
        }
        inventory
    }
}

/// Spreadsheet-style row label: `A`..`Z`, then `AA`, `AB`, ...
#[must_use]
pub fn row_label(index: usize) -> String {
    let mut n = index + 1;
    let mut label = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        label.push(b'A' + u8::try_from(rem).unwrap_or(0));
        n = (n - 1) / 26;
    }
    label.reverse();
    String::from_utf8(label).unwrap_or_default()
}

/// Split a seat code like `B7` into its row label and number.
#[must_use]
pub fn parse_seat_id(seat_id: &str) -> Option<(String, u32)> {
    let caps = SEAT_ID.as_ref()?.captures(seat_id.trim())?;
    let number = caps.get(2)?.as_str().parse().ok()?;
    Some((caps.get(1)?.as_str().to_string(), number))
}

/// Build a layout. Degenerate shapes yield an empty layout rather than an error.
#[must_use]
pub fn generate_layout(
    spec: &LayoutSpec,
    banding: &SeatBanding,
    prices: &PriceBands,
    inventory: &Inventory,
    selection: &SeatSelection,
) -> SeatLayout {
    let rows = (0..spec.row_count())
        .map(|row_index| {
            let label = row_label(row_index);
            let tier = banding.tier_for_row(row_index);
            let price = prices.price_for(tier);
            let seats = (1..=spec.seats_in_row(row_index))
                .map(|number| {
                    let id = format!("{label}{number}");
                    Seat {
                        status: inventory.status_of(&id),
                        is_selected: selection.contains(&id),
                        id,
                        row: label.clone(),
                        number,
                        price,
                        tier,
                    }
                })
                .collect();
            SeatRow { label, seats }
        })
        .collect::<Vec<_>>();
    log::debug!(
        "generated seat layout: {} rows for {} seats",
        rows.len(),
        spec.total_seats
    );
    SeatLayout { rows }
}

/// Layout for a venue using the configured row width, banding and prices.
#[must_use]
pub fn venue_layout(
    total_seats: i64,
    config: &BookingConfig,
    inventory: &mut dyn InventorySource,
    selection: &SeatSelection,
) -> SeatLayout {
    let spec = LayoutSpec::for_venue(total_seats, config.seats_per_row);
    let availability = inventory.inventory(&spec);
    generate_layout(
        &spec,
        &config.banding,
        &config.prices,
        &availability,
        selection,
    )
}
