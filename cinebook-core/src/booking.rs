//! Terminal booking records and the persisted bookings collection.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::KeyValueStore;
use crate::draft::{BookingDraft, SelectedSeat, TheaterSnapshot};
use crate::error::{StoreError, ValidationError};
use crate::format::format_seat_ids;
use crate::store::{read_json, write_json};

pub const BOOKINGS_KEY: &str = "cinebook.userBookings";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Confirmed,
    Booked,
    Cancelled,
}

impl BookingStatus {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Confirmed => "confirmed",
            Self::Booked => "booked",
            Self::Cancelled => "cancelled",
        }
    }

    #[must_use]
    pub const fn is_active(self) -> bool {
        !matches!(self, Self::Cancelled)
    }
}

/// A paid booking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub booking_id: String,
    pub movie_id: u64,
    pub movie_title: String,
    pub theater: TheaterSnapshot,
    pub show_time: String,
    pub selected_seats: Vec<SelectedSeat>,
    pub total_amount: i64,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    /// Convert a paid-for draft into a confirmed booking.
    ///
    /// # Errors
    ///
    /// Returns an error if the draft fails [`BookingDraft::validate_for_payment`].
    pub fn confirm(draft: &BookingDraft, now: DateTime<Utc>) -> Result<Self, ValidationError> {
        draft.validate_for_payment()?;
        let booking_id = draft
            .booking_id()
            .ok_or(ValidationError::MissingBookingId)?
            .to_string();
        Ok(Self {
            booking_id,
            movie_id: draft.movie_id,
            movie_title: draft.movie_title.clone(),
            theater: draft.theater.clone(),
            show_time: draft.show_time.clone(),
            selected_seats: draft.selected_seats().to_vec(),
            total_amount: draft.total_amount(),
            status: BookingStatus::Confirmed,
            created_at: now,
        })
    }

    #[must_use]
    pub fn seats_label(&self) -> String {
        format_seat_ids(&self.selected_seats)
    }
}

/// The persisted, append-only bookings collection. Only status changes are
/// applied in place.
#[derive(Debug, Clone)]
pub struct BookingLedger<S> {
    store: S,
}

impl<S: KeyValueStore> BookingLedger<S> {
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Raw records in insertion order. A collection that is not a JSON array
    /// is reported as `Serialization` so nothing gets written over it.
    fn records(&self) -> Result<Vec<Value>, StoreError> {
        Ok(read_json(&self.store, BOOKINGS_KEY)?.unwrap_or_default())
    }

    fn decode(record: &Value) -> Option<Booking> {
        match Booking::deserialize(record) {
            Ok(booking) => Some(booking),
            Err(err) => {
                log::warn!("skipping unreadable booking record: {err}");
                None
            }
        }
    }

    /// All readable bookings in insertion order. Undecodable records are
    /// skipped; a collection that is not JSON at all reads as empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend fails.
    pub fn load(&self) -> Result<Vec<Booking>, StoreError> {
        match self.records() {
            Ok(records) => Ok(records.iter().filter_map(Self::decode).collect()),
            Err(StoreError::Serialization(err)) => {
                log::warn!("stored bookings are unreadable: {err}");
                Ok(Vec::new())
            }
            Err(err) => Err(err),
        }
    }

    /// Append a booking. Records this build cannot decode are kept as they are.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be read or written, including
    /// when the stored collection is not a JSON array.
    pub fn append(&self, booking: Booking) -> Result<(), StoreError> {
        let mut records = self.records()?;
        log::info!(
            "persisting booking {} ({} seats)",
            booking.booking_id,
            booking.selected_seats.len()
        );
        records.push(serde_json::to_value(&booking)?);
        write_json(&self.store, BOOKINGS_KEY, &records)
    }

    /// Mark every booking with `booking_id` as cancelled. Returns whether any matched.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be read or written.
    pub fn mark_cancelled(&self, booking_id: &str) -> Result<bool, StoreError> {
        let mut records = self.records()?;
        let mut matched = false;
        for record in &mut records {
            let Some(mut booking) = Self::decode(record) else {
                continue;
            };
            if booking.booking_id == booking_id {
                booking.status = BookingStatus::Cancelled;
                *record = serde_json::to_value(&booking)?;
                matched = true;
            }
        }
        if matched {
            write_json(&self.store, BOOKINGS_KEY, &records)?;
        }
        Ok(matched)
    }
}
