//! Booking drafts threaded between the flow screens.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::seat::{Seat, SeatTier};

/// Snapshot of the chosen venue; not a live reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TheaterSnapshot {
    pub name: String,
    #[serde(default)]
    pub location: String,
    pub total_seats: i64,
    #[serde(default)]
    pub rating: f32,
}

/// A seat as recorded on a draft or booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedSeat {
    pub id: String,
    pub price: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub tier: Option<SeatTier>,
}

impl From<&Seat> for SelectedSeat {
    fn from(seat: &Seat) -> Self {
        Self {
            id: seat.id.clone(),
            price: seat.price,
            row: Some(seat.row.clone()),
            tier: Some(seat.tier),
        }
    }
}

/// What the catalog screen knows when a show is picked.
#[derive(Debug, Clone, PartialEq)]
pub struct ShowContext {
    pub movie_id: u64,
    pub movie_title: String,
    pub theater: TheaterSnapshot,
    pub show_time: String,
    pub price: i64,
}

#[must_use]
pub fn sum_prices(seats: &[SelectedSeat]) -> i64 {
    seats.iter().map(|seat| seat.price).sum()
}

/// `prefix` followed by the epoch milliseconds of `now`.
#[must_use]
pub fn generate_booking_id(prefix: &str, now: DateTime<Utc>) -> String {
    format!("{prefix}{}", now.timestamp_millis())
}

/// In-progress booking. Seat changes replace the seat list wholesale and
/// recompute the total, so the total is never stale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingDraft {
    pub movie_id: u64,
    pub movie_title: String,
    pub theater: TheaterSnapshot,
    pub show_time: String,
    /// Base show price; seats carry their own banded price.
    #[serde(default)]
    pub price: i64,
    #[serde(default)]
    selected_seats: Vec<SelectedSeat>,
    #[serde(default)]
    total_amount: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    booking_id: Option<String>,
    /// Ticket count the user asked for, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    seat_count: Option<usize>,
}

impl BookingDraft {
    #[must_use]
    pub fn from_show(show: ShowContext) -> Self {
        Self {
            movie_id: show.movie_id,
            movie_title: show.movie_title,
            theater: show.theater,
            show_time: show.show_time,
            price: show.price,
            selected_seats: Vec::new(),
            total_amount: 0,
            booking_id: None,
            seat_count: None,
        }
    }

    /// Replace the seat list; the total follows.
    #[must_use]
    pub fn with_seats(mut self, seats: Vec<SelectedSeat>) -> Self {
        self.total_amount = sum_prices(&seats);
        self.selected_seats = seats;
        self
    }

    #[must_use]
    pub const fn with_seat_count(mut self, count: Option<usize>) -> Self {
        self.seat_count = count;
        self
    }

    #[must_use]
    pub const fn seat_count(&self) -> Option<usize> {
        self.seat_count
    }

    #[must_use]
    pub fn selected_seats(&self) -> &[SelectedSeat] {
        &self.selected_seats
    }

    #[must_use]
    pub const fn total_amount(&self) -> i64 {
        self.total_amount
    }

    #[must_use]
    pub fn booking_id(&self) -> Option<&str> {
        self.booking_id.as_deref()
    }

    #[must_use]
    pub fn seat_ids(&self) -> Vec<&str> {
        self.selected_seats.iter().map(|s| s.id.as_str()).collect()
    }

    /// Assign the booking id if none exists yet; an existing id is kept.
    pub fn ensure_booking_id(&mut self, prefix: &str, now: DateTime<Utc>) -> &str {
        self.booking_id
            .get_or_insert_with(|| generate_booking_id(prefix, now))
    }

    /// Re-derive the total after reading a draft from storage.
    #[must_use]
    pub fn normalized(self) -> Self {
        let seats = self.selected_seats.clone();
        self.with_seats(seats)
    }

    /// Check the draft can be paid for.
    ///
    /// # Errors
    ///
    /// Returns an error when no seats are selected, the stored total disagrees
    /// with the seat prices, or no booking id was assigned.
    pub fn validate_for_payment(&self) -> Result<(), ValidationError> {
        if self.selected_seats.is_empty() {
            return Err(ValidationError::NoSeatsSelected);
        }
        let expected = sum_prices(&self.selected_seats);
        if expected != self.total_amount {
            return Err(ValidationError::TotalMismatch {
                stored: self.total_amount,
                expected,
            });
        }
        if self.booking_id.is_none() {
            return Err(ValidationError::MissingBookingId);
        }
        Ok(())
    }
}
