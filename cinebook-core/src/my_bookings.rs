//! The "my bookings" view: remote bookings followed by local ones.
use serde::Serialize;

use crate::KeyValueStore;
use crate::booking::{Booking, BookingLedger, BookingStatus};
use crate::error::{GatewayError, StoreError};
use crate::gateway::{CatalogGateway, RemoteBooking};

/// One row of the bookings list, from either source.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum BookingEntry {
    Remote(RemoteBooking),
    Local(Booking),
}

impl BookingEntry {
    #[must_use]
    pub fn booking_id(&self) -> String {
        match self {
            Self::Remote(b) => b.id.to_string(),
            Self::Local(b) => b.booking_id.clone(),
        }
    }

    #[must_use]
    pub fn movie_title(&self) -> &str {
        let title = match self {
            Self::Remote(b) => b.movie_title.as_str(),
            Self::Local(b) => b.movie_title.as_str(),
        };
        if title.is_empty() { "Unknown Movie" } else { title }
    }

    #[must_use]
    pub fn theater(&self) -> &str {
        match self {
            Self::Remote(b) => &b.theater,
            Self::Local(b) => &b.theater.name,
        }
    }

    #[must_use]
    pub fn location(&self) -> Option<&str> {
        match self {
            Self::Remote(_) => None,
            Self::Local(b) => Some(b.theater.location.as_str()).filter(|l| !l.is_empty()),
        }
    }

    #[must_use]
    pub fn show_time(&self) -> &str {
        match self {
            Self::Remote(b) => &b.showtime,
            Self::Local(b) => &b.show_time,
        }
    }

    /// `Seats: B7, C6` for local bookings, `Seat #12` for remote ones.
    #[must_use]
    pub fn seats_label(&self) -> String {
        match self {
            Self::Remote(b) if b.seat_number.is_empty() => "Seat #TBD".to_string(),
            Self::Remote(b) => format!("Seat #{}", b.seat_number),
            Self::Local(b) => format!("Seats: {}", b.seats_label()),
        }
    }

    /// Seat codes only, comma separated.
    #[must_use]
    pub fn seats(&self) -> String {
        match self {
            Self::Remote(b) => b.seat_number.clone(),
            Self::Local(b) => b.seats_label(),
        }
    }

    #[must_use]
    pub const fn total_amount(&self) -> Option<i64> {
        match self {
            Self::Remote(_) => None,
            Self::Local(b) => Some(b.total_amount),
        }
    }

    /// When the booking was made, as reported by its source.
    #[must_use]
    pub fn booked_at(&self) -> Option<String> {
        match self {
            Self::Remote(b) => b.booking_time.clone(),
            Self::Local(b) => Some(b.created_at.to_rfc3339()),
        }
    }

    #[must_use]
    pub const fn status(&self) -> BookingStatus {
        match self {
            Self::Remote(b) => b.status,
            Self::Local(b) => b.status,
        }
    }

    #[must_use]
    pub const fn is_cancellable(&self) -> bool {
        self.status().is_active()
    }

    #[must_use]
    pub const fn is_local(&self) -> bool {
        matches!(self, Self::Local(_))
    }

    fn set_status(&mut self, status: BookingStatus) {
        match self {
            Self::Remote(b) => b.status = status,
            Self::Local(b) => b.status = status,
        }
    }
}

/// Informational message to show alongside the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingsNotice {
    Empty,
    /// The remote fetch failed; only locally stored bookings are shown.
    LocalOnly { count: usize },
}

impl BookingsNotice {
    #[must_use]
    pub fn message(self) -> String {
        match self {
            Self::Empty => "No bookings found. Book your first movie ticket!".to_string(),
            Self::LocalOnly { count } => format!("Found {count} booking(s) from local storage"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookingsOverview {
    pub entries: Vec<BookingEntry>,
    /// Why remote bookings are missing, if they are.
    pub remote_error: Option<GatewayError>,
}

impl BookingsOverview {
    #[must_use]
    pub fn notice(&self) -> Option<BookingsNotice> {
        if self.entries.is_empty() {
            Some(BookingsNotice::Empty)
        } else if self.remote_error.is_some() {
            Some(BookingsNotice::LocalOnly {
                count: self.entries.len(),
            })
        } else {
            None
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Mark every entry with `booking_id` cancelled. Returns whether any matched.
    pub fn mark_cancelled(&mut self, booking_id: &str) -> bool {
        let mut matched = false;
        for entry in self.entries.iter_mut().filter(|e| e.booking_id() == booking_id) {
            entry.set_status(BookingStatus::Cancelled);
            matched = true;
        }
        matched
    }
}

/// Remote bookings first, then the local collection, without de-duplication.
/// A remote failure degrades to local-only.
///
/// # Errors
///
/// Returns an error only if the local store fails.
pub async fn load_my_bookings<G, S>(
    gateway: &G,
    ledger: &BookingLedger<S>,
) -> Result<BookingsOverview, StoreError>
where
    G: CatalogGateway + ?Sized,
    S: KeyValueStore,
{
    let (remote, remote_error) = match gateway.my_bookings().await {
        Ok(remote) => (remote, None),
        Err(err) => {
            log::warn!("remote bookings unavailable, showing local bookings only: {err}");
            (Vec::new(), Some(err))
        }
    };
    let entries = remote
        .into_iter()
        .map(BookingEntry::Remote)
        .chain(ledger.load()?.into_iter().map(BookingEntry::Local))
        .collect();
    Ok(BookingsOverview {
        entries,
        remote_error,
    })
}

/// What happened on each side of a cancellation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancelReport {
    /// Whether a locally stored booking was marked cancelled.
    pub local_updated: bool,
    /// The backend's answer. A failure here does not undo the local change.
    pub remote: Result<String, GatewayError>,
}

impl CancelReport {
    #[must_use]
    pub const fn remote_confirmed(&self) -> bool {
        self.remote.is_ok()
    }
}

/// Cancel optimistically: the local collection is updated first and is not
/// rolled back if the backend refuses or is unreachable.
///
/// # Errors
///
/// Returns an error only if the local store fails.
pub async fn cancel_booking<G, S>(
    gateway: &G,
    ledger: &BookingLedger<S>,
    booking_id: &str,
) -> Result<CancelReport, StoreError>
where
    G: CatalogGateway + ?Sized,
    S: KeyValueStore,
{
    let local_updated = ledger.mark_cancelled(booking_id)?;
    let remote = gateway.cancel_booking(booking_id).await;
    if let Err(err) = &remote {
        log::warn!("remote cancellation of {booking_id} failed, keeping local change: {err}");
    }
    Ok(CancelReport {
        local_updated,
        remote,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::tests::booking;
    use crate::gateway::{
        AuthResponse, BookingRef, Credentials, MockGateway, Movie, SeatReceipt, Show,
        SignupRequest,
    };
    use crate::store::MemoryStore;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use futures::executor::block_on;

    /// Backend that is down for everything.
    struct Offline;

    fn down<T>() -> Result<T, GatewayError> {
        Err(GatewayError::Unavailable("connection refused".into()))
    }

    #[async_trait(?Send)]
    impl CatalogGateway for Offline {
        async fn movies(&self) -> Result<Vec<Movie>, GatewayError> {
            down()
        }
        async fn movie_shows(&self, _: u64) -> Result<Vec<Show>, GatewayError> {
            down()
        }
        async fn book_seat(&self, _: u64, _: &str) -> Result<SeatReceipt, GatewayError> {
            down()
        }
        async fn my_bookings(&self) -> Result<Vec<RemoteBooking>, GatewayError> {
            down()
        }
        async fn cancel_booking(&self, _: &str) -> Result<String, GatewayError> {
            down()
        }
        async fn login(&self, _: &Credentials) -> Result<AuthResponse, GatewayError> {
            down()
        }
        async fn signup(&self, _: &SignupRequest) -> Result<AuthResponse, GatewayError> {
            down()
        }
        fn is_mock(&self) -> bool {
            false
        }
    }

    fn remote_booked(id: u64) -> RemoteBooking {
        RemoteBooking {
            id: BookingRef::Number(id),
            movie_title: "Dune".to_string(),
            theater: "Screen 1".to_string(),
            showtime: "2026-10-18T19:00:00Z".to_string(),
            seat_number: "12".to_string(),
            booking_time: None,
            status: BookingStatus::Booked,
        }
    }

    fn at(hour: u32) -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 17, hour, 0, 0).unwrap()
    }

    #[test]
    fn remote_entries_come_first_and_duplicates_stay() {
        let store = MemoryStore::new();
        let ledger = BookingLedger::new(store.clone());
        let local = booking(at(9));
        ledger.append(local.clone()).unwrap();
        ledger.append(local).unwrap();

        let overview = block_on(load_my_bookings(&MockGateway::fixed(at(12)), &ledger)).unwrap();
        assert_eq!(overview.len(), 3);
        assert!(!overview.entries[0].is_local());
        assert!(overview.entries[1].is_local());
        assert_eq!(overview.entries[1], overview.entries[2]);
        assert_eq!(overview.notice(), None);
    }

    #[test]
    fn offline_backend_degrades_to_local_only() {
        let ledger = BookingLedger::new(MemoryStore::new());
        ledger.append(booking(at(9))).unwrap();
        let overview = block_on(load_my_bookings(&Offline, &ledger)).unwrap();
        assert_eq!(overview.len(), 1);
        assert_eq!(
            overview.notice(),
            Some(BookingsNotice::LocalOnly { count: 1 })
        );

        let empty = block_on(load_my_bookings(&Offline, &BookingLedger::new(MemoryStore::new())))
            .unwrap();
        assert_eq!(empty.notice(), Some(BookingsNotice::Empty));
    }

    #[test]
    fn failed_remote_cancel_keeps_local_cancellation() {
        let store = MemoryStore::new();
        let ledger = BookingLedger::new(store.clone());
        let mut stored = booking(at(9));
        stored.status = BookingStatus::Booked;
        ledger.append(stored.clone()).unwrap();

        let report = block_on(cancel_booking(&Offline, &ledger, &stored.booking_id)).unwrap();
        assert!(report.local_updated);
        assert!(!report.remote_confirmed());
        assert_eq!(ledger.load().unwrap()[0].status, BookingStatus::Cancelled);
    }

    #[test]
    fn overview_cancellation_touches_matching_entries_only() {
        let mut overview = BookingsOverview {
            entries: vec![
                BookingEntry::Remote(remote_booked(4)),
                BookingEntry::Remote(remote_booked(5)),
            ],
            remote_error: None,
        };
        assert!(overview.mark_cancelled("4"));
        assert!(!overview.mark_cancelled("99"));
        assert_eq!(overview.entries[0].status(), BookingStatus::Cancelled);
        assert!(overview.entries[1].is_cancellable());
        assert_eq!(overview.entries[1].seats_label(), "Seat #12");
    }
}
