//! Cinebook booking core
//!
//! Platform-agnostic logic for the movie-ticket booking flow: seat layouts,
//! seat selection, booking drafts handed between screens through a key-value
//! store, payment, and the "my bookings" view. Front-ends supply a
//! [`KeyValueStore`] and a [`CatalogGateway`]; nothing here touches a browser
//! or a terminal.

pub mod booking;
pub mod catalog;
pub mod config;
pub mod draft;
pub mod enrich;
pub mod error;
pub mod flow;
pub mod format;
pub mod gateway;
pub mod handoff;
pub mod messages;
pub mod my_bookings;
pub mod routes;
pub mod seat;
pub mod selection;
pub mod session;
pub mod store;
pub mod ticket;

// Re-export commonly used types
pub use booking::{BOOKINGS_KEY, Booking, BookingLedger, BookingStatus};
pub use catalog::{
    ShowSlot, Theater, demo_theaters, filter_movies, movie_genres, show_slots, slot_context,
};
pub use config::{BookingConfig, OccupancyOdds, PriceBands, SeatBanding};
pub use draft::{BookingDraft, SelectedSeat, ShowContext, TheaterSnapshot};
pub use enrich::{EnrichedMovie, Enricher, MetadataProvider, MovieMetadata, StaticMetadata};
pub use error::{ConfigError, FlowError, GatewayError, StoreError, ValidationError};
pub use flow::{PaymentScreen, PaymentStatus, Redirect, SeatScreen, select_show};
pub use gateway::{
    CatalogGateway, FallbackGateway, GatewayConfig, MockGateway, Movie, MultiSeatOutcome,
    RemoteBooking, Show,
};
pub use handoff::{Handoff, HandoffSlot};
pub use my_bookings::{BookingEntry, BookingsNotice, BookingsOverview, CancelReport};
pub use routes::{AppRoute, GuardDecision};
pub use seat::{
    FixedInventory, Inventory, InventorySource, Seat, SeatLayout, SeatStatus, SeatTier,
    SyntheticInventory,
};
pub use selection::{SeatSelection, ToggleOutcome};
pub use session::{Session, User};
pub use store::MemoryStore;
pub use ticket::{TicketSummary, render_ticket_text, validate_email};

#[cfg(feature = "remote")]
pub use enrich::OmdbProvider;
#[cfg(feature = "remote")]
pub use gateway::HttpGateway;

use chrono::{DateTime, Utc};

/// String key-value persistence that survives a reload, such as browser
/// `localStorage` or a profile file.
/// Platform-specific implementations should provide this
pub trait KeyValueStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Read a value
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, Self::Error>;

    /// Write a value, replacing any previous one
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error>;

    /// Remove a value; removing a missing key is not an error
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), Self::Error>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    type Error = S::Error;

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), Self::Error> {
        (**self).remove(key)
    }
}

/// Booking flow bound to one store and configuration
pub struct BookingEngine<S>
where
    S: KeyValueStore,
{
    config: BookingConfig,
    store: S,
}

impl<S> BookingEngine<S>
where
    S: KeyValueStore,
{
    /// Create a new engine with the provided configuration and storage
    pub const fn new(config: BookingConfig, store: S) -> Self {
        Self { config, store }
    }

    pub const fn config(&self) -> &BookingConfig {
        &self.config
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Start a booking for a show
    ///
    /// # Errors
    ///
    /// Returns an error if the draft cannot be stored.
    pub fn select_show(&self, show: ShowContext) -> Result<BookingDraft, StoreError> {
        flow::select_show(&self.store, show)
    }

    /// Open the seat screen for the current draft
    ///
    /// # Errors
    ///
    /// Returns a redirect when no show was selected.
    pub fn open_seats(&self, inventory: &mut dyn InventorySource) -> Result<SeatScreen, Redirect> {
        SeatScreen::mount(&self.store, &self.config, inventory)
    }

    /// Open the seat screen with seeded synthetic availability
    ///
    /// # Errors
    ///
    /// Returns a redirect when no show was selected.
    pub fn open_seats_seeded(&self, seed: u64) -> Result<SeatScreen, Redirect> {
        let mut inventory = SyntheticInventory::new(seed, self.config.synthetic_occupancy);
        self.open_seats(&mut inventory)
    }

    /// Open the payment screen for the finalized (or current) draft
    ///
    /// # Errors
    ///
    /// Returns a redirect when there is nothing to pay for.
    pub fn open_payment(&self, now: DateTime<Utc>) -> Result<PaymentScreen, Redirect> {
        PaymentScreen::mount(&self.store, &self.config, now)
    }

    #[must_use]
    pub const fn ledger(&self) -> BookingLedger<&S> {
        BookingLedger::new(&self.store)
    }

    /// Restore the signed-in user, if any
    #[must_use]
    pub fn session(&self) -> Session {
        Session::hydrate(&self.store)
    }
}
