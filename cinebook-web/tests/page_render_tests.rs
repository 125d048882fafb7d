use chrono::{DateTime, TimeZone, Utc};
use cinebook_core::gateway::Movie;
use cinebook_core::{
    Booking, BookingConfig, BookingDraft, BookingEngine, BookingEntry, CatalogGateway,
    EnrichedMovie, MemoryStore, MockGateway, PaymentStatus, ShowSlot, demo_theaters, show_slots,
    slot_context,
};
use cinebook_web::pages::{
    home::{HomePage, Props as HomeProps},
    login::{LoginPage, Props as LoginProps},
    movies::{MoviesPage, Props as MoviesProps},
    my_bookings::{MyBookingsPage, Props as MyBookingsProps},
    not_found::{NotFound, Props as NotFoundProps},
    payment::{PaymentPage, Props as PaymentProps},
    seat_booking::{Props as SeatBookingProps, SeatBookingPage},
    signup::{Props as SignupProps, SignupPage},
};
use futures::executor::block_on;
use yew::{Callback, LocalServerRenderer};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 17, 9, 0, 0).unwrap()
}

fn demo_movies() -> Vec<Movie> {
    block_on(MockGateway::fixed(now()).movies()).unwrap()
}

fn enriched() -> Vec<EnrichedMovie> {
    demo_movies()
        .into_iter()
        .map(|movie| EnrichedMovie::merge(movie, None))
        .collect()
}

fn slot() -> ShowSlot {
    ShowSlot {
        time: "7:00 PM".into(),
        available: true,
        price: 350,
    }
}

/// Engine with a show selected and seats `A1`, `A2` confirmed.
fn confirmed_draft() -> (BookingEngine<MemoryStore>, BookingDraft) {
    let engine = BookingEngine::new(BookingConfig::default_config(), MemoryStore::new());
    let theater = demo_theaters().remove(0);
    engine
        .select_show(slot_context(&demo_movies()[0], &theater, &slot()))
        .unwrap();
    let mut seats = engine.open_seats(&mut cinebook_core::FixedInventory::default()).unwrap();
    seats.toggle("A1");
    seats.toggle("A2");
    let draft = seats.confirm(engine.store(), now()).unwrap();
    (engine, draft)
}

fn paid_booking() -> Booking {
    let (engine, _) = confirmed_draft();
    let mut payment = engine.open_payment(now()).unwrap();
    payment.complete(engine.store(), now()).unwrap()
}

#[test]
fn home_page_greets_signed_in_user_and_flags_demo_mode() {
    let props = HomeProps {
        user: Some("asha".into()),
        mock_mode: true,
        on_browse: Callback::noop(),
        on_my_bookings: Callback::noop(),
    };
    let html = block_on(LocalServerRenderer::<HomePage>::with_props(props).render());
    assert!(html.contains("Welcome back, asha!"));
    assert!(html.contains("Demo Mode Active"));
    assert!(html.contains("My Bookings"));

    let anonymous = HomeProps {
        user: None,
        mock_mode: false,
        on_browse: Callback::noop(),
        on_my_bookings: Callback::noop(),
    };
    let html = block_on(LocalServerRenderer::<HomePage>::with_props(anonymous).render());
    assert!(html.contains("Browse Movies"));
    assert!(!html.contains("My Bookings"));
    assert!(!html.contains("Demo Mode Active"));
}

#[test]
fn movies_page_lists_cards_and_expands_demo_showtimes() {
    let props = MoviesProps {
        movies: enriched(),
        loading: false,
        error: None,
        expanded: Some(1),
        theaters: demo_theaters(),
        slots: show_slots(8, 4),
        shows: Vec::new(),
        query: String::new(),
        genre: String::new(),
        on_expand: Callback::noop(),
        on_pick: Callback::noop(),
        on_query: Callback::noop(),
        on_genre: Callback::noop(),
    };
    let html = block_on(LocalServerRenderer::<MoviesPage>::with_props(props).render());
    assert!(html.contains("Demo Movie 1"));
    assert!(html.contains("Demo Movie 2"));
    assert!(html.contains("Hide Showtimes"));
    assert!(html.contains("Cineplex Downtown"));
    assert!(html.contains("Royal Theater"));
    assert!(html.contains("10:00 PM"));
    assert!(html.contains("via.placeholder.com"));
}

#[test]
fn movies_page_filters_by_search_and_genre() {
    let props = |query: &str, genre: &str| MoviesProps {
        movies: enriched(),
        loading: false,
        error: None,
        expanded: None,
        theaters: demo_theaters(),
        slots: Vec::new(),
        shows: Vec::new(),
        query: query.to_string(),
        genre: genre.to_string(),
        on_expand: Callback::noop(),
        on_pick: Callback::noop(),
        on_query: Callback::noop(),
        on_genre: Callback::noop(),
    };
    let render = |p: MoviesProps| block_on(LocalServerRenderer::<MoviesPage>::with_props(p).render());

    let html = render(props("movie 2", ""));
    assert!(html.contains("Demo Movie 2"));
    assert!(!html.contains("Demo Movie 1"));

    let html = render(props("", "Action"));
    assert!(html.contains("Demo Movie 1"));
    assert!(!html.contains("Demo Movie 2"));
    assert!(html.contains("All Genres"));

    let html = render(props("no such film", ""));
    assert!(html.contains("No movies match your search."));
}

#[test]
fn movies_page_shows_loading_and_late_night_states() {
    let loading = MoviesProps {
        movies: Vec::new(),
        loading: true,
        error: None,
        expanded: None,
        theaters: demo_theaters(),
        slots: Vec::new(),
        shows: Vec::new(),
        query: String::new(),
        genre: String::new(),
        on_expand: Callback::noop(),
        on_pick: Callback::noop(),
        on_query: Callback::noop(),
        on_genre: Callback::noop(),
    };
    let html = block_on(LocalServerRenderer::<MoviesPage>::with_props(loading).render());
    assert!(html.contains("Loading movies..."));

    let late = MoviesProps {
        movies: enriched(),
        loading: false,
        error: None,
        expanded: Some(2),
        theaters: demo_theaters(),
        slots: show_slots(23, 4),
        shows: Vec::new(),
        query: String::new(),
        genre: String::new(),
        on_expand: Callback::noop(),
        on_pick: Callback::noop(),
        on_query: Callback::noop(),
        on_genre: Callback::noop(),
    };
    let html = block_on(LocalServerRenderer::<MoviesPage>::with_props(late).render());
    assert!(html.contains("No more shows today"));
}

#[test]
fn movies_page_prefers_backend_shows_when_present() {
    let shows = block_on(MockGateway::fixed(now()).movie_shows(1)).unwrap();
    let props = MoviesProps {
        movies: enriched(),
        loading: false,
        error: None,
        expanded: Some(1),
        theaters: demo_theaters(),
        slots: show_slots(8, 4),
        shows,
        query: String::new(),
        genre: String::new(),
        on_expand: Callback::noop(),
        on_pick: Callback::noop(),
        on_query: Callback::noop(),
        on_genre: Callback::noop(),
    };
    let html = block_on(LocalServerRenderer::<MoviesPage>::with_props(props).render());
    assert!(html.contains("Demo Theater 1"));
    assert!(html.contains("50 seats left"));
    assert!(!html.contains("Cineplex Downtown"));
}

#[test]
fn seat_booking_page_renders_grid_summary_and_limit_message() {
    let engine = BookingEngine::new(BookingConfig::default_config(), MemoryStore::new());
    let theater = demo_theaters().remove(3);
    engine
        .select_show(slot_context(&demo_movies()[1], &theater, &slot()))
        .unwrap();
    let mut screen = engine.open_seats_seeded(11).unwrap();
    let free: Vec<String> = screen
        .layout()
        .seats()
        .filter(|seat| seat.status.is_available())
        .take(2)
        .map(|seat| seat.id.clone())
        .collect();
    screen.toggle_many(free.iter().map(String::as_str));

    let props = SeatBookingProps {
        draft: screen.draft().clone(),
        layout: screen.layout().clone(),
        selected: screen.selection().seats().to_vec(),
        total: screen.total(),
        max_seats: 8,
        seat_count: Some(4),
        message: Some("You can select at most 8 seats.".into()),
        on_toggle: Callback::noop(),
        on_seat_count: Callback::noop(),
        on_clear: Callback::noop(),
        on_confirm: Callback::noop(),
        on_back: Callback::noop(),
    };
    let html = block_on(LocalServerRenderer::<SeatBookingPage>::with_props(props).render());
    assert!(html.contains("Demo Movie 2"));
    assert!(html.contains("Metro Cinema Palace"));
    assert!(html.contains("SCREEN"));
    assert!(html.contains(&format!("data-seat=\"{}\"", free[0])));
    assert!(html.contains(&format!("Selected: {}, {}", free[0], free[1])));
    assert!(html.contains("Select 2 more seat(s)"));
    assert!(html.contains("You can select at most 8 seats."));
    assert!(html.contains("Proceed to Payment"));
}

#[test]
fn payment_page_walks_through_each_status() {
    let (engine, draft) = confirmed_draft();
    let ready = PaymentProps {
        draft: draft.clone(),
        status: PaymentStatus::Ready,
        error: None,
        notice: None,
        on_pay: Callback::noop(),
        on_download: Callback::noop(),
        on_email: Callback::noop(),
        on_view_bookings: Callback::noop(),
        on_back: Callback::noop(),
    };
    let html = block_on(LocalServerRenderer::<PaymentPage>::with_props(ready.clone()).render());
    assert!(html.contains("Pay ₹500"));
    assert!(html.contains("A1, A2"));
    assert!(html.contains(draft.booking_id().unwrap()));

    let processing = PaymentProps {
        status: PaymentStatus::Processing,
        ..ready.clone()
    };
    let html = block_on(LocalServerRenderer::<PaymentPage>::with_props(processing).render());
    assert!(html.contains("Processing payment..."));
    assert!(!html.contains("Pay ₹500"));

    let booking = engine.open_payment(now()).unwrap().complete(engine.store(), now()).unwrap();
    let paid = PaymentProps {
        status: PaymentStatus::Paid(booking.clone()),
        notice: Some("Ticket sent to asha@demo.com".into()),
        ..ready
    };
    let html = block_on(LocalServerRenderer::<PaymentPage>::with_props(paid).render());
    assert!(html.contains("Payment Successful!"));
    assert!(html.contains(&format!("Booking {} is confirmed.", booking.booking_id)));
    assert!(html.contains("Download Ticket"));
    assert!(html.contains("Ticket sent to asha@demo.com"));
}

#[test]
fn my_bookings_page_lists_entries_and_hides_cancel_for_cancelled() {
    let active = paid_booking();
    let mut cancelled = paid_booking();
    cancelled.booking_id = "BK1".into();
    cancelled.status = cinebook_core::BookingStatus::Cancelled;

    let props = MyBookingsProps {
        entries: vec![
            BookingEntry::Local(active.clone()),
            BookingEntry::Local(cancelled),
        ],
        loading: false,
        notice: Some("Found 2 booking(s) from local storage".into()),
        cancelling: None,
        on_cancel: Callback::noop(),
        on_download: Callback::noop(),
        on_browse: Callback::noop(),
    };
    let html = block_on(LocalServerRenderer::<MyBookingsPage>::with_props(props).render());
    assert!(html.contains("Found 2 booking(s) from local storage"));
    assert!(html.contains(&active.booking_id));
    assert!(html.contains("Seats: A1, A2"));
    assert!(html.contains("status-cancelled"));
    assert_eq!(html.matches("Cancel Booking").count(), 1);
    assert_eq!(html.matches("Download Ticket").count(), 2);
}

#[test]
fn my_bookings_page_offers_browsing_when_empty() {
    let props = MyBookingsProps {
        entries: Vec::new(),
        loading: false,
        notice: Some("No bookings found. Book your first movie ticket!".into()),
        cancelling: None,
        on_cancel: Callback::noop(),
        on_download: Callback::noop(),
        on_browse: Callback::noop(),
    };
    let html = block_on(LocalServerRenderer::<MyBookingsPage>::with_props(props).render());
    assert!(html.contains("No bookings found."));
    assert!(html.contains("Browse Movies"));
}

#[test]
fn auth_pages_render_forms_and_errors() {
    let login = LoginProps {
        busy: false,
        error: Some("Invalid credentials".into()),
        mock_mode: true,
        on_submit: Callback::noop(),
        on_signup: Callback::noop(),
    };
    let html = block_on(LocalServerRenderer::<LoginPage>::with_props(login).render());
    assert!(html.contains("Invalid credentials"));
    assert!(html.contains("Demo mode"));
    assert!(html.contains("login-password"));

    let signup = SignupProps {
        busy: true,
        error: None,
        on_submit: Callback::noop(),
        on_login: Callback::noop(),
    };
    let html = block_on(LocalServerRenderer::<SignupPage>::with_props(signup).render());
    assert!(html.contains("Creating account..."));
    assert!(html.contains("signup-confirm"));
}

#[test]
fn not_found_page_offers_way_home() {
    let props = NotFoundProps {
        on_go_home: Callback::noop(),
    };
    let html = block_on(LocalServerRenderer::<NotFound>::with_props(props).render());
    assert!(html.contains("Page not found"));
    assert!(html.contains("Back to home"));
}
