//! Screen controllers for the catalog → seats → payment flow.
//!
//! Each screen mounts from the hand-off slots alone, so it works the same
//! after a reload as after in-app navigation. Missing context is not an
//! error: mounting returns the [`Redirect`] the front-end should follow.
use chrono::{DateTime, Utc};
use std::time::Duration;

use crate::KeyValueStore;
use crate::booking::{Booking, BookingLedger};
use crate::config::BookingConfig;
use crate::draft::{BookingDraft, ShowContext};
use crate::error::{FlowError, StoreError, ValidationError};
use crate::handoff::{Handoff, HandoffSlot, clear_all, clear_slot, publish, read_slot};
use crate::routes::{AppRoute, GuardDecision, guard};
use crate::seat::{InventorySource, SeatLayout, venue_layout};
use crate::selection::{SeatSelection, ToggleOutcome};
use crate::session::Session;
use crate::ticket::{TicketEmail, TicketSummary, email_ticket};

/// Where to send the user instead of rendering a screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redirect {
    Catalog,
    Login,
}

impl Redirect {
    #[must_use]
    pub const fn route(self) -> AppRoute {
        match self {
            Self::Catalog => AppRoute::Movies,
            Self::Login => AppRoute::Login,
        }
    }
}

/// Apply the route guard.
///
/// # Errors
///
/// Returns [`Redirect::Login`] for guarded routes without a session.
pub const fn enter(route: &AppRoute, session: &Session) -> Result<(), Redirect> {
    match guard(route, session) {
        GuardDecision::Allow => Ok(()),
        GuardDecision::RedirectToLogin => Err(Redirect::Login),
    }
}

/// Record the picked show as the current draft. Any stale finalized draft
/// from an earlier visit is dropped.
///
/// # Errors
///
/// Returns an error if the store rejects the write.
pub fn select_show<S>(store: &S, show: ShowContext) -> Result<BookingDraft, StoreError>
where
    S: KeyValueStore + ?Sized,
{
    let draft = BookingDraft::from_show(show);
    clear_slot(store, HandoffSlot::FinalizedBooking)?;
    publish(store, Handoff::ShowSelected(draft.clone()))?;
    log::info!(
        "selected {} at {} ({})",
        draft.movie_title,
        draft.theater.name,
        draft.show_time
    );
    Ok(draft)
}

fn read_context<S>(store: &S, slot: HandoffSlot) -> Option<BookingDraft>
where
    S: KeyValueStore + ?Sized,
{
    match read_slot(store, slot) {
        Ok(draft) => draft,
        Err(err) => {
            log::warn!("could not read {}: {err}", slot.key());
            None
        }
    }
}

/// Seat picking for the current draft.
#[derive(Debug, Clone)]
pub struct SeatScreen {
    draft: BookingDraft,
    layout: SeatLayout,
    selection: SeatSelection,
    config: BookingConfig,
}

impl SeatScreen {
    /// Mount from the current-booking slot; seats and the ticket count already
    /// on the draft are restored into the selection.
    ///
    /// # Errors
    ///
    /// Returns [`Redirect::Catalog`] when no show was selected.
    pub fn mount<S>(
        store: &S,
        config: &BookingConfig,
        inventory: &mut dyn InventorySource,
    ) -> Result<Self, Redirect>
    where
        S: KeyValueStore + ?Sized,
    {
        let draft = read_context(store, HandoffSlot::CurrentBooking).ok_or(Redirect::Catalog)?;
        let mut selection =
            SeatSelection::from_seats(draft.selected_seats().iter().cloned(), config.max_seats);
        if let Some(count) = draft.seat_count() {
            selection.set_seat_count(count);
        }
        let layout = venue_layout(draft.theater.total_seats, config, inventory, &selection);
        Ok(Self {
            draft,
            layout,
            selection,
            config: config.clone(),
        })
    }

    /// Mount for the seat route of `movie_id`. A draft for another movie is
    /// treated like a missing one.
    ///
    /// # Errors
    ///
    /// Returns [`Redirect::Catalog`] when no show was selected for `movie_id`.
    pub fn mount_for_movie<S>(
        store: &S,
        config: &BookingConfig,
        inventory: &mut dyn InventorySource,
        movie_id: u64,
    ) -> Result<Self, Redirect>
    where
        S: KeyValueStore + ?Sized,
    {
        let screen = Self::mount(store, config, inventory)?;
        if screen.draft.movie_id == movie_id {
            Ok(screen)
        } else {
            log::warn!(
                "seat route for movie {movie_id} but the booking is for movie {}",
                screen.draft.movie_id
            );
            Err(Redirect::Catalog)
        }
    }

    #[must_use]
    pub const fn draft(&self) -> &BookingDraft {
        &self.draft
    }

    #[must_use]
    pub const fn layout(&self) -> &SeatLayout {
        &self.layout
    }

    #[must_use]
    pub const fn selection(&self) -> &SeatSelection {
        &self.selection
    }

    #[must_use]
    pub fn total(&self) -> i64 {
        self.selection.total()
    }

    pub fn toggle(&mut self, seat_id: &str) -> ToggleOutcome {
        let outcome = self.selection.toggle_in(&self.layout, seat_id);
        if outcome.changed() {
            self.layout.apply_selection(&self.selection);
        }
        outcome
    }

    pub fn toggle_many<'a, I>(&mut self, seat_ids: I) -> Vec<(String, ToggleOutcome)>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let outcomes = self.selection.toggle_many(&self.layout, seat_ids);
        self.layout.apply_selection(&self.selection);
        outcomes
    }

    pub fn set_seat_count(&mut self, count: usize) -> usize {
        let count = self.selection.set_seat_count(count);
        self.layout.apply_selection(&self.selection);
        count
    }

    pub fn clear(&mut self) {
        self.selection.clear();
        self.layout.apply_selection(&self.selection);
    }

    /// Re-render availability; the selection is untouched.
    pub fn refresh_layout(&mut self, inventory: &mut dyn InventorySource) {
        self.layout = venue_layout(
            self.draft.theater.total_seats,
            &self.config,
            inventory,
            &self.selection,
        );
    }

    /// Write the in-progress selection and ticket count back to the
    /// current-booking slot so a later mount restores them.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the write.
    pub fn save_progress<S>(&self, store: &S) -> Result<(), StoreError>
    where
        S: KeyValueStore + ?Sized,
    {
        let draft = self
            .draft
            .clone()
            .with_seats(self.selection.seats().to_vec())
            .with_seat_count(self.selection.target());
        publish(store, Handoff::ShowSelected(draft))
    }

    /// Finalize the selection and hand it to the payment screen.
    ///
    /// # Errors
    ///
    /// Returns a validation error when nothing is selected, or a store error
    /// if the hand-off cannot be written.
    pub fn confirm<S>(&self, store: &S, now: DateTime<Utc>) -> Result<BookingDraft, FlowError>
    where
        S: KeyValueStore + ?Sized,
    {
        if self.selection.is_empty() {
            return Err(ValidationError::NoSeatsSelected.into());
        }
        let mut draft = self
            .draft
            .clone()
            .with_seats(self.selection.seats().to_vec());
        draft.ensure_booking_id(&self.config.booking_id_prefix, now);
        publish(store, Handoff::SeatsConfirmed(draft.clone()))?;
        Ok(draft)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PaymentStatus {
    Ready,
    Processing,
    Paid(Booking),
}

/// Payment for a finalized draft.
#[derive(Debug, Clone)]
pub struct PaymentScreen {
    draft: BookingDraft,
    status: PaymentStatus,
    delay: Duration,
}

impl PaymentScreen {
    /// Mount from the finalized slot, falling back to the current one. A draft
    /// taken from the current slot gets its booking id here and is written to
    /// the finalized slot, so later mounts keep the same id.
    ///
    /// # Errors
    ///
    /// Returns [`Redirect::Catalog`] when neither slot holds a draft.
    pub fn mount<S>(store: &S, config: &BookingConfig, now: DateTime<Utc>) -> Result<Self, Redirect>
    where
        S: KeyValueStore + ?Sized,
    {
        let draft = match read_context(store, HandoffSlot::FinalizedBooking) {
            Some(draft) if draft.booking_id().is_some() => draft,
            finalized => {
                let mut draft = finalized
                    .or_else(|| read_context(store, HandoffSlot::CurrentBooking))
                    .ok_or(Redirect::Catalog)?;
                draft.ensure_booking_id(&config.booking_id_prefix, now);
                if let Err(err) = publish(store, Handoff::SeatsConfirmed(draft.clone())) {
                    log::warn!("could not keep booking id {:?}: {err}", draft.booking_id());
                }
                draft
            }
        };
        Ok(Self {
            draft,
            status: PaymentStatus::Ready,
            delay: Duration::from_millis(config.payment_delay_ms),
        })
    }

    #[must_use]
    pub const fn draft(&self) -> &BookingDraft {
        &self.draft
    }

    #[must_use]
    pub const fn status(&self) -> &PaymentStatus {
        &self.status
    }

    /// How long front-ends should show the processing state.
    #[must_use]
    pub const fn processing_delay(&self) -> Duration {
        self.delay
    }

    /// Enter the processing state. Returns `false` if a payment is already
    /// in flight or done, so a second click does nothing.
    pub fn submit(&mut self) -> bool {
        if self.status == PaymentStatus::Ready {
            self.status = PaymentStatus::Processing;
            true
        } else {
            false
        }
    }

    /// Record the booking and clear both hand-off slots. Completing twice
    /// returns the first booking without storing it again.
    ///
    /// # Errors
    ///
    /// Returns an error if the draft is not payable or the store fails; the
    /// screen returns to `Ready` then.
    pub fn complete<S>(&mut self, store: &S, now: DateTime<Utc>) -> Result<Booking, FlowError>
    where
        S: KeyValueStore,
    {
        if let PaymentStatus::Paid(booking) = &self.status {
            return Ok(booking.clone());
        }
        match Self::record(&self.draft, store, now) {
            Ok(booking) => {
                self.status = PaymentStatus::Paid(booking.clone());
                Ok(booking)
            }
            Err(err) => {
                self.status = PaymentStatus::Ready;
                Err(err)
            }
        }
    }

    fn record<S: KeyValueStore>(
        draft: &BookingDraft,
        store: &S,
        now: DateTime<Utc>,
    ) -> Result<Booking, FlowError> {
        let booking = Booking::confirm(draft, now)?;
        BookingLedger::new(store).append(booking.clone())?;
        clear_all(store)?;
        Ok(booking)
    }

    #[must_use]
    pub fn ticket(&self) -> Option<TicketSummary> {
        match &self.status {
            PaymentStatus::Paid(booking) => Some(TicketSummary::from_booking(booking)),
            _ => None,
        }
    }

    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidEmail`] for an unusable address, or
    /// [`ValidationError::MissingBookingId`] before payment completed.
    pub fn email_ticket(&self, raw_email: &str) -> Result<TicketEmail, ValidationError> {
        let ticket = self.ticket().ok_or(ValidationError::MissingBookingId)?;
        email_ticket(raw_email, &ticket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::{BOOKINGS_KEY, BookingStatus};
    use crate::draft::tests::show;
    use crate::seat::{FixedInventory, Inventory};
    use crate::store::MemoryStore;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 17, 18, 0, 0).unwrap()
    }

    fn open_seats(store: &MemoryStore) -> SeatScreen {
        let mut inventory = FixedInventory(Inventory::with_occupied(["A1"]));
        SeatScreen::mount(store, &BookingConfig::default_config(), &mut inventory).unwrap()
    }

    #[test]
    fn seat_screen_without_context_redirects() {
        let store = MemoryStore::new();
        let mut inventory = FixedInventory::default();
        let mounted = SeatScreen::mount(&store, &BookingConfig::default_config(), &mut inventory);
        assert_eq!(mounted.unwrap_err(), Redirect::Catalog);
        assert_eq!(Redirect::Catalog.route().path(), "/movies");
    }

    #[test]
    fn occupied_seats_cannot_be_picked_and_totals_track_selection() {
        let store = MemoryStore::new();
        select_show(&store, show(350)).unwrap();
        let mut screen = open_seats(&store);
        assert_eq!(screen.layout().seat_count(), 180);

        assert!(matches!(screen.toggle("A1"), ToggleOutcome::Unavailable(_)));
        assert_eq!(screen.toggle("A2"), ToggleOutcome::Selected);
        assert_eq!(screen.toggle("D1"), ToggleOutcome::Selected);
        assert_eq!(screen.total(), 250 + 350);
        assert!(screen.layout().find("D1").is_some_and(|s| s.is_selected));

        assert_eq!(screen.toggle("D1"), ToggleOutcome::Deselected);
        assert_eq!(screen.total(), 250);
        assert!(screen.layout().find("D1").is_some_and(|s| !s.is_selected));
    }

    #[test]
    fn confirm_requires_a_seat_and_publishes_finalized_draft() {
        let store = MemoryStore::new();
        select_show(&store, show(350)).unwrap();
        let mut screen = open_seats(&store);
        assert!(matches!(
            screen.confirm(&store, now()),
            Err(FlowError::Validation(ValidationError::NoSeatsSelected))
        ));
        assert_eq!(read_slot(&store, HandoffSlot::FinalizedBooking).unwrap(), None);

        screen.toggle("B7");
        let draft = screen.confirm(&store, now()).unwrap();
        assert_eq!(draft.booking_id(), Some(format!("BK{}", now().timestamp_millis()).as_str()));
        assert_eq!(
            read_slot(&store, HandoffSlot::FinalizedBooking).unwrap(),
            Some(draft)
        );
    }

    #[test]
    fn refreshing_layout_keeps_selection() {
        let store = MemoryStore::new();
        select_show(&store, show(350)).unwrap();
        let mut screen = open_seats(&store);
        screen.toggle("B7");
        screen.refresh_layout(&mut FixedInventory(Inventory::with_occupied(["B7"])));
        assert_eq!(screen.selection().ids(), vec!["B7"]);
    }

    #[test]
    fn saved_progress_survives_a_remount() {
        let store = MemoryStore::new();
        select_show(&store, show(350)).unwrap();
        let mut screen = open_seats(&store);
        screen.toggle_many(["C3", "C4"]);
        screen.save_progress(&store).unwrap();

        let restored = open_seats(&store);
        assert_eq!(restored.selection().ids(), vec!["C3", "C4"]);
        assert_eq!(restored.total(), screen.total());
        assert!(restored.layout().find("C4").is_some_and(|s| s.is_selected));
    }

    #[test]
    fn seat_route_for_another_movie_redirects() {
        let store = MemoryStore::new();
        select_show(&store, show(350)).unwrap();
        let config = BookingConfig::default_config();
        let movie_id = show(350).movie_id;
        let mut inventory = FixedInventory::default();
        assert!(SeatScreen::mount_for_movie(&store, &config, &mut inventory, movie_id).is_ok());
        assert_eq!(
            SeatScreen::mount_for_movie(&store, &config, &mut inventory, movie_id + 1).unwrap_err(),
            Redirect::Catalog
        );
    }

    #[test]
    fn ticket_count_caps_selection_after_a_remount() {
        let store = MemoryStore::new();
        select_show(&store, show(350)).unwrap();
        let mut screen = open_seats(&store);
        assert_eq!(screen.set_seat_count(2), 2);
        screen.save_progress(&store).unwrap();

        let mut restored = open_seats(&store);
        assert_eq!(restored.selection().target(), Some(2));
        let outcomes = restored.toggle_many(["A2", "A3", "A4"]);
        assert_eq!(outcomes[1].1, ToggleOutcome::Selected);
        assert_eq!(outcomes[2].1, ToggleOutcome::LimitReached { cap: 2 });
        assert_eq!(restored.selection().ids(), vec!["A2", "A3"]);
    }

    #[test]
    fn payment_keeps_its_booking_id_across_mounts() {
        let store = MemoryStore::new();
        select_show(&store, show(350)).unwrap();
        let mut screen = open_seats(&store);
        screen.toggle("B7");
        screen.save_progress(&store).unwrap();

        let config = BookingConfig::default_config();
        let first = PaymentScreen::mount(&store, &config, now()).unwrap();
        let later = now() + chrono::Duration::seconds(30);
        let second = PaymentScreen::mount(&store, &config, later).unwrap();
        assert!(first.draft().booking_id().is_some());
        assert_eq!(first.draft().booking_id(), second.draft().booking_id());
        assert_eq!(
            read_slot(&store, HandoffSlot::FinalizedBooking)
                .unwrap()
                .and_then(|d| d.booking_id().map(str::to_string)),
            first.draft().booking_id().map(str::to_string)
        );
    }

    #[test]
    fn payment_falls_back_to_current_booking() {
        let store = MemoryStore::new();
        assert_eq!(
            PaymentScreen::mount(&store, &BookingConfig::default_config(), now()).unwrap_err(),
            Redirect::Catalog
        );

        select_show(&store, show(350)).unwrap();
        let mut payment =
            PaymentScreen::mount(&store, &BookingConfig::default_config(), now()).unwrap();
        assert!(payment.draft().booking_id().is_some());
        assert!(payment.submit());
        assert!(matches!(
            payment.complete(&store, now()),
            Err(FlowError::Validation(ValidationError::NoSeatsSelected))
        ));
        assert_eq!(payment.status(), &PaymentStatus::Ready);
        assert!(store.get(BOOKINGS_KEY).unwrap().is_none());
    }

    #[test]
    fn paying_twice_stores_one_booking() {
        let store = MemoryStore::new();
        select_show(&store, show(350)).unwrap();
        let mut screen = open_seats(&store);
        screen.toggle("B7");
        screen.confirm(&store, now()).unwrap();

        let mut payment =
            PaymentScreen::mount(&store, &BookingConfig::default_config(), now()).unwrap();
        assert_eq!(payment.processing_delay(), Duration::from_millis(3_000));
        assert!(payment.submit());
        assert!(!payment.submit());
        let first = payment.complete(&store, now()).unwrap();
        let second = payment.complete(&store, now()).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.status, BookingStatus::Confirmed);
        assert_eq!(BookingLedger::new(&store).load().unwrap().len(), 1);
        assert!(store.keys().iter().all(|k| k == BOOKINGS_KEY));

        assert!(payment.email_ticket("nope").is_err());
        assert_eq!(payment.email_ticket("asha@demo.com").unwrap().to, "asha@demo.com");
    }

    #[test]
    fn guarded_routes_redirect_to_login() {
        let anon = Session::anonymous();
        assert_eq!(enter(&AppRoute::MyBookings, &anon), Err(Redirect::Login));
        assert_eq!(enter(&AppRoute::Payment, &anon), Ok(()));
    }
}
