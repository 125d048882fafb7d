//! Route containers: each owns the state for one screen and drives the core
//! flow, then hands plain props to a page.
use cinebook_core::catalog::{DEFAULT_VENUE_SEATS, find_theater, remote_show_context};
use cinebook_core::flow::enter;
use cinebook_core::messages::{
    cancel_message, email_message, gateway_message, reservation_message, toggle_message,
};
use cinebook_core::gateway::{Credentials, SignupRequest};
use cinebook_core::my_bookings::{cancel_booking, load_my_bookings};
use cinebook_core::ticket::{render_ticket_text, ticket_file_name};
use cinebook_core::{
    BookingLedger, BookingsOverview, CatalogGateway, EnrichedMovie, GatewayError,
    InventorySource, PaymentScreen, SeatScreen, Show, SyntheticInventory, TicketSummary, User,
    demo_theaters, select_show, show_slots, slot_context,
};
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use super::state::AppState;
use crate::dom::{console_error, download_text, js_error_message, now, sleep_ms};
use crate::pages::home::HomePage;
use crate::pages::login::LoginPage;
use crate::pages::movies::{MoviesPage, ShowPick};
use crate::pages::my_bookings::MyBookingsPage;
use crate::pages::not_found::NotFound;
use crate::pages::payment::PaymentPage;
use crate::pages::seat_booking::SeatBookingPage;
use crate::pages::signup::SignupPage;
use crate::router::Route;

pub fn render(state: &AppState, route: &Route, on_navigate: &Callback<Route>) -> Html {
    if let Err(redirect) = enter(&route.to_app(), &state.session) {
        let to = Route::from_app(&redirect.route());
        return html! { <yew_router::prelude::Redirect<Route> {to} /> };
    }
    let go = |target: Route| {
        let cb = on_navigate.clone();
        Callback::from(move |()| cb.emit(target.clone()))
    };
    let state = state.clone();
    let on_navigate = on_navigate.clone();
    match route {
        Route::Home => html! {
            <HomePage
                user={state.session.user().map(|user| AttrValue::from(user.username.clone()))}
                mock_mode={*state.mock_mode}
                on_browse={go(Route::Movies)}
                on_my_bookings={go(Route::MyBookings)}
            />
        },
        Route::Movies => html! { <MoviesScreen {state} {on_navigate} /> },
        Route::SeatBooking { movie_id } => {
            html! { <SeatsScreen key={movie_id.to_string()} {state} {on_navigate} movie_id={*movie_id} /> }
        }
        Route::Payment => html! { <PaymentView {state} {on_navigate} /> },
        Route::MyBookings => html! { <BookingsScreen {state} {on_navigate} /> },
        Route::Login => html! { <LoginScreen {state} {on_navigate} /> },
        Route::Signup => html! { <SignupScreen {state} {on_navigate} /> },
        Route::NotFound => html! { <NotFound on_go_home={go(Route::Home)} /> },
    }
}

#[derive(Properties, PartialEq, Clone)]
pub struct ScreenProps {
    pub state: AppState,
    pub on_navigate: Callback<Route>,
}

fn local_hour() -> u32 {
    js_sys::Date::new_0().get_hours()
}

/// Slot availability is stable for a calendar day.
#[allow(clippy::cast_sign_loss)]
fn daily_seed() -> u64 {
    (now().timestamp() / 86_400) as u64
}

#[function_component(MoviesScreen)]
fn movies_screen(p: &ScreenProps) -> Html {
    let movies = use_state(Vec::<EnrichedMovie>::new);
    let loading = use_state(|| true);
    let error = use_state(|| None::<AttrValue>);
    let expanded = use_state(|| None::<u64>);
    let shows = use_state(Vec::<Show>::new);
    let query = use_state(String::new);
    let genre = use_state(String::new);

    {
        let gateway = p.state.services.gateway.clone();
        let enricher = p.state.services.enricher.clone();
        let mock_mode = p.state.mock_mode.clone();
        let (movies, loading, error) = (movies.clone(), loading.clone(), error.clone());
        use_effect_with((), move |()| {
            spawn_local(async move {
                match gateway.movies().await {
                    Ok(list) => movies.set(enricher.enrich_all(list).await),
                    Err(err) => error.set(Some(gateway_message(&err).into())),
                }
                mock_mode.set(gateway.is_mock());
                loading.set(false);
            });
            || ()
        });
    }

    let on_expand = {
        let gateway = p.state.services.gateway.clone();
        let (expanded, shows) = (expanded.clone(), shows.clone());
        Callback::from(move |movie_id: u64| {
            if *expanded == Some(movie_id) {
                expanded.set(None);
                return;
            }
            expanded.set(Some(movie_id));
            shows.set(Vec::new());
            if gateway.is_mock() {
                return;
            }
            let (gateway, shows) = (gateway.clone(), shows.clone());
            spawn_local(async move {
                match gateway.movie_shows(movie_id).await {
                    Ok(list) if !gateway.is_mock() => shows.set(list),
                    Ok(_) => {}
                    Err(err) => log::warn!("shows for movie {movie_id}: {err}"),
                }
            });
        })
    };

    let on_pick = {
        let state = p.state.clone();
        let movies = movies.clone();
        let error = error.clone();
        let on_navigate = p.on_navigate.clone();
        Callback::from(move |pick: ShowPick| {
            let (movie_id, remote) = match &pick {
                ShowPick::Demo { movie_id, .. } => (*movie_id, None),
                ShowPick::Remote { movie_id, show } => (*movie_id, Some(show.clone())),
            };
            let Some(movie) = movies.iter().find(|m| m.movie.id == movie_id) else {
                return;
            };
            let context = match &pick {
                ShowPick::Demo {
                    theater_id, slot, ..
                } => match find_theater(*theater_id) {
                    Some(theater) => slot_context(&movie.movie, &theater, slot),
                    None => return,
                },
                ShowPick::Remote { show, .. } => {
                    remote_show_context(&movie.movie, show, DEFAULT_VENUE_SEATS)
                }
            };
            match select_show(&state.services.store, context) {
                Ok(_) => {
                    state.remote_show.set(remote);
                    on_navigate.emit(Route::SeatBooking { movie_id });
                }
                Err(err) => error.set(Some(format!("Could not start booking: {err}").into())),
            }
        })
    };

    html! {
        <MoviesPage
            movies={(*movies).clone()}
            loading={*loading}
            error={(*error).clone()}
            expanded={*expanded}
            theaters={demo_theaters()}
            slots={show_slots(local_hour(), daily_seed())}
            shows={(*shows).clone()}
            query={(*query).clone()}
            genre={(*genre).clone()}
            {on_expand}
            {on_pick}
            on_query={Callback::from(move |text: String| query.set(text))}
            on_genre={Callback::from(move |name: String| genre.set(name))}
        />
    }
}

#[derive(Properties, PartialEq, Clone)]
pub struct SeatsProps {
    pub state: AppState,
    pub on_navigate: Callback<Route>,
    pub movie_id: u64,
}

#[function_component(SeatsScreen)]
fn seats_screen(p: &SeatsProps) -> Html {
    let store = p.state.services.store;
    let config = p.state.services.config.clone();
    let remote_show = (*p.state.remote_show).clone();
    let movie_id = p.movie_id;
    let screen = use_state(move || {
        // Booked seats of the picked backend show, or seeded demo occupancy.
        let mut inventory: Box<dyn InventorySource> = match remote_show {
            Some(show) => Box::new(show),
            None => Box::new(SyntheticInventory::new(
                daily_seed(),
                config.synthetic_occupancy,
            )),
        };
        SeatScreen::mount_for_movie(&store, &config, inventory.as_mut(), movie_id)
    });
    let message = use_state(|| None::<AttrValue>);

    {
        let on_navigate = p.on_navigate.clone();
        let redirect = (*screen).as_ref().err().copied();
        use_effect_with(redirect, move |redirect| {
            if let Some(redirect) = redirect {
                on_navigate.emit(Route::from_app(&redirect.route()));
            }
            || ()
        });
    }

    let Ok(current) = (*screen).clone() else {
        return html! {};
    };

    let update = {
        let screen = screen.clone();
        move |edit: &dyn Fn(&mut SeatScreen)| {
            if let Ok(mut next) = (*screen).clone() {
                edit(&mut next);
                if let Err(err) = next.save_progress(&store) {
                    log::warn!("could not save seat selection: {err}");
                }
                screen.set(Ok(next));
            }
        }
    };
    let update = Rc::new(update);

    let on_toggle = {
        let update = update.clone();
        let message = message.clone();
        Callback::from(move |seat_id: String| {
            update(&|s: &mut SeatScreen| {
                let outcome = s.toggle(&seat_id);
                message.set(toggle_message(outcome).map(AttrValue::from));
            });
        })
    };
    let on_seat_count = {
        let update = update.clone();
        Callback::from(move |count: usize| {
            update(&|s: &mut SeatScreen| {
                s.set_seat_count(count);
            });
        })
    };
    let on_clear = {
        let update = update.clone();
        let message = message.clone();
        Callback::from(move |()| {
            update(&|s: &mut SeatScreen| s.clear());
            message.set(None);
        })
    };
    let on_confirm = {
        let state = p.state.clone();
        let message = message.clone();
        let on_navigate = p.on_navigate.clone();
        let current = current.clone();
        Callback::from(move |()| {
            if let Err(err) = current.confirm(&state.services.store, now()) {
                message.set(Some(err.to_string().into()));
                return;
            }
            let remote = (*state.remote_show)
                .clone()
                .filter(|_| !state.services.gateway.is_mock());
            let Some(show) = remote else {
                on_navigate.emit(Route::Payment);
                return;
            };
            let seats: Vec<String> = current
                .selection()
                .ids()
                .into_iter()
                .map(str::to_string)
                .collect();
            let gateway = state.services.gateway.clone();
            let (message, on_navigate) = (message.clone(), on_navigate.clone());
            spawn_local(async move {
                let outcome = gateway.book_multiple_seats(show.id, &seats).await;
                match reservation_message(&outcome) {
                    Ok(notice) => {
                        if let Some(notice) = notice {
                            log::warn!("{notice}");
                        }
                        on_navigate.emit(Route::Payment);
                    }
                    Err(problem) => message.set(Some(problem.into())),
                }
            });
        })
    };
    let on_back = {
        let cb = p.on_navigate.clone();
        Callback::from(move |()| cb.emit(Route::Movies))
    };

    let selection = current.selection();
    html! {
        <SeatBookingPage
            draft={current.draft().clone()}
            layout={current.layout().clone()}
            selected={selection.seats().to_vec()}
            total={current.total()}
            max_seats={selection.max_seats()}
            seat_count={selection.target()}
            message={(*message).clone()}
            {on_toggle}
            {on_seat_count}
            {on_clear}
            {on_confirm}
            {on_back}
        />
    }
}

fn save_ticket(ticket: &TicketSummary) {
    let text = render_ticket_text(ticket);
    if let Err(err) = download_text(&ticket_file_name(&ticket.booking_id), &text) {
        console_error(&format!("ticket download failed: {}", js_error_message(&err)));
    }
}

#[function_component(PaymentView)]
fn payment_view(p: &ScreenProps) -> Html {
    let store = p.state.services.store;
    let config = p.state.services.config.clone();
    let payment = use_state(move || PaymentScreen::mount(&store, &config, now()));
    let error = use_state(|| None::<AttrValue>);
    let notice = use_state(|| None::<AttrValue>);

    {
        let on_navigate = p.on_navigate.clone();
        let redirect = (*payment).as_ref().err().copied();
        use_effect_with(redirect, move |redirect| {
            if let Some(redirect) = redirect {
                on_navigate.emit(Route::from_app(&redirect.route()));
            }
            || ()
        });
    }

    let Ok(current) = (*payment).clone() else {
        return html! {};
    };

    let on_pay = {
        let payment = payment.clone();
        let error = error.clone();
        let current = current.clone();
        Callback::from(move |()| {
            let mut next = current.clone();
            if !next.submit() {
                return;
            }
            payment.set(Ok(next.clone()));
            error.set(None);
            let (payment, error) = (payment.clone(), error.clone());
            spawn_local(async move {
                let delay = i32::try_from(next.processing_delay().as_millis()).unwrap_or(i32::MAX);
                if let Err(err) = sleep_ms(delay).await {
                    console_error(&js_error_message(&err));
                }
                match next.complete(&store, now()) {
                    Ok(booking) => log::info!("booking {} paid", booking.booking_id),
                    Err(err) => error.set(Some(format!("Payment failed: {err}").into())),
                }
                payment.set(Ok(next));
            });
        })
    };
    let on_download = {
        let current = current.clone();
        Callback::from(move |()| {
            if let Some(ticket) = current.ticket() {
                save_ticket(&ticket);
            }
        })
    };
    let on_email = {
        let current = current.clone();
        let notice = notice.clone();
        Callback::from(move |raw: String| {
            let result = current.email_ticket(&raw);
            if let Ok(mail) = &result {
                log::info!("emailing ticket to {}: {}", mail.to, mail.subject);
            }
            notice.set(Some(email_message(&result).into()));
        })
    };
    let on_view_bookings = {
        let cb = p.on_navigate.clone();
        Callback::from(move |()| cb.emit(Route::MyBookings))
    };
    let on_back = {
        let cb = p.on_navigate.clone();
        let movie_id = current.draft().movie_id;
        Callback::from(move |()| cb.emit(Route::SeatBooking { movie_id }))
    };

    html! {
        <PaymentPage
            draft={current.draft().clone()}
            status={current.status().clone()}
            error={(*error).clone()}
            notice={(*notice).clone()}
            {on_pay}
            {on_download}
            {on_email}
            {on_view_bookings}
            {on_back}
        />
    }
}

#[function_component(BookingsScreen)]
fn bookings_screen(p: &ScreenProps) -> Html {
    let overview = use_state(BookingsOverview::default);
    let loading = use_state(|| true);
    let notice = use_state(|| None::<AttrValue>);
    let cancelling = use_state(|| None::<AttrValue>);

    {
        let state = p.state.clone();
        let (overview, loading, notice) = (overview.clone(), loading.clone(), notice.clone());
        use_effect_with((), move |()| {
            spawn_local(async move {
                let ledger = BookingLedger::new(state.services.store);
                match load_my_bookings(state.services.gateway.as_ref(), &ledger).await {
                    Ok(loaded) => {
                        if let Some(err) = &loaded.remote_error {
                            expire_session(&state, err);
                        }
                        notice.set(loaded.notice().map(|n| n.message().into()));
                        overview.set(loaded);
                    }
                    Err(err) => {
                        notice.set(Some(format!("Could not read saved bookings: {err}").into()));
                    }
                }
                state.mock_mode.set(state.services.gateway.is_mock());
                loading.set(false);
            });
            || ()
        });
    }

    let on_cancel = {
        let state = p.state.clone();
        let (overview, notice, cancelling) = (overview.clone(), notice.clone(), cancelling.clone());
        Callback::from(move |booking_id: String| {
            if cancelling.is_some() {
                return;
            }
            cancelling.set(Some(booking_id.clone().into()));
            let state = state.clone();
            let (overview, notice, cancelling) =
                (overview.clone(), notice.clone(), cancelling.clone());
            spawn_local(async move {
                let ledger = BookingLedger::new(state.services.store);
                match cancel_booking(state.services.gateway.as_ref(), &ledger, &booking_id).await {
                    Ok(report) => {
                        if let Err(err) = &report.remote {
                            expire_session(&state, err);
                        }
                        if report.local_updated || report.remote_confirmed() {
                            let mut next = (*overview).clone();
                            next.mark_cancelled(&booking_id);
                            overview.set(next);
                        }
                        notice.set(Some(cancel_message(&report).into()));
                    }
                    Err(err) => {
                        notice.set(Some(format!("Could not cancel booking: {err}").into()));
                    }
                }
                cancelling.set(None);
            });
        })
    };
    let on_download = {
        let overview = overview.clone();
        Callback::from(move |booking_id: String| {
            if let Some(entry) = overview
                .entries
                .iter()
                .find(|entry| entry.booking_id() == booking_id)
            {
                save_ticket(&TicketSummary::from_entry(entry));
            }
        })
    };
    let on_browse = {
        let cb = p.on_navigate.clone();
        Callback::from(move |()| cb.emit(Route::Movies))
    };

    html! {
        <MyBookingsPage
            entries={overview.entries.clone()}
            loading={*loading}
            notice={(*notice).clone()}
            cancelling={(*cancelling).clone()}
            {on_cancel}
            {on_download}
            {on_browse}
        />
    }
}

/// Sign out when the backend rejected the session token.
fn expire_session(state: &AppState, err: &GatewayError) {
    let mut session = (*state.session).clone();
    match session.expire_if_unauthorized(&state.services.store, err) {
        Ok(true) => state.session.set(session),
        Ok(false) => {}
        Err(err) => console_error(&format!("sign-out: {err}")),
    }
}

/// Adopt a token issued by login or signup.
fn adopt(state: &AppState, token: String, user: User) -> Result<(), String> {
    let mut session = (*state.session).clone();
    session
        .sign_in(&state.services.store, token, user)
        .map_err(|err| format!("Could not save your session: {err}"))?;
    state.session.set(session);
    Ok(())
}

#[function_component(LoginScreen)]
fn login_screen(p: &ScreenProps) -> Html {
    let busy = use_state(|| false);
    let error = use_state(|| None::<AttrValue>);

    let on_submit = {
        let state = p.state.clone();
        let on_navigate = p.on_navigate.clone();
        let (busy, error) = (busy.clone(), error.clone());
        Callback::from(move |credentials: Credentials| {
            busy.set(true);
            let state = state.clone();
            let on_navigate = on_navigate.clone();
            let (busy, error) = (busy.clone(), error.clone());
            spawn_local(async move {
                let result = match state.services.gateway.login(&credentials).await {
                    Ok(auth) => adopt(&state, auth.token, auth.user),
                    Err(err) => Err(gateway_message(&err)),
                };
                state.mock_mode.set(state.services.gateway.is_mock());
                busy.set(false);
                match result {
                    Ok(()) => on_navigate.emit(Route::Movies),
                    Err(message) => error.set(Some(message.into())),
                }
            });
        })
    };
    let on_signup = {
        let cb = p.on_navigate.clone();
        Callback::from(move |()| cb.emit(Route::Signup))
    };

    html! {
        <LoginPage
            busy={*busy}
            error={(*error).clone()}
            mock_mode={*p.state.mock_mode}
            {on_submit}
            {on_signup}
        />
    }
}

#[function_component(SignupScreen)]
fn signup_screen(p: &ScreenProps) -> Html {
    let busy = use_state(|| false);
    let error = use_state(|| None::<AttrValue>);

    let on_submit = {
        let state = p.state.clone();
        let on_navigate = p.on_navigate.clone();
        let (busy, error) = (busy.clone(), error.clone());
        Callback::from(move |request: SignupRequest| {
            busy.set(true);
            let state = state.clone();
            let on_navigate = on_navigate.clone();
            let (busy, error) = (busy.clone(), error.clone());
            spawn_local(async move {
                let result = match state.services.gateway.signup(&request).await {
                    Ok(auth) => adopt(&state, auth.token, auth.user),
                    Err(err) => Err(gateway_message(&err)),
                };
                busy.set(false);
                match result {
                    Ok(()) => on_navigate.emit(Route::Movies),
                    Err(message) => error.set(Some(message.into())),
                }
            });
        })
    };
    let on_login = {
        let cb = p.on_navigate.clone();
        Callback::from(move |()| cb.emit(Route::Login))
    };

    html! { <SignupPage busy={*busy} error={(*error).clone()} {on_submit} {on_login} /> }
}
