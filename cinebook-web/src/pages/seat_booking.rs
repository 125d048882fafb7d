use cinebook_core::format::{format_rupees, format_seat_ids, format_show_time};
use cinebook_core::{BookingDraft, SeatLayout, SelectedSeat};
use yew::prelude::*;

use crate::components::seat_grid::SeatGrid;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub draft: BookingDraft,
    pub layout: SeatLayout,
    pub selected: Vec<SelectedSeat>,
    pub total: i64,
    pub max_seats: usize,
    /// Ticket count the user asked for, if any.
    #[prop_or_default]
    pub seat_count: Option<usize>,
    #[prop_or_default]
    pub message: Option<AttrValue>,
    pub on_toggle: Callback<String>,
    pub on_seat_count: Callback<usize>,
    pub on_clear: Callback<()>,
    pub on_confirm: Callback<()>,
    pub on_back: Callback<()>,
}

#[function_component(SeatBookingPage)]
pub fn seat_booking_page(p: &Props) -> Html {
    let draft = &p.draft;
    let on_count = {
        let cb = p.on_seat_count.clone();
        Callback::from(move |e: Event| {
            let value = e
                .target()
                .and_then(|t| wasm_bindgen::JsCast::dyn_into::<web_sys::HtmlSelectElement>(t).ok())
                .and_then(|select| select.value().parse::<usize>().ok());
            if let Some(count) = value {
                cb.emit(count);
            }
        })
    };
    let clear = {
        let cb = p.on_clear.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let confirm = {
        let cb = p.on_confirm.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let back = {
        let cb = p.on_back.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let remaining = p
        .seat_count
        .map(|target| target.saturating_sub(p.selected.len()))
        .filter(|n| *n > 0);

    html! {
        <section class="panel seat-booking">
            <header class="show-summary">
                <button type="button" class="btn-link" onclick={back}>{ "← Back to movies" }</button>
                <h1>{ draft.movie_title.clone() }</h1>
                <p>{ format!("{} · {}", draft.theater.name, format_show_time(&draft.show_time)) }</p>
            </header>
            <label class="seat-count">
                { "Tickets" }
                <select onchange={on_count}>
                    { for (1..=p.max_seats).map(|n| html! {
                        <option value={n.to_string()} selected={p.seat_count == Some(n)}>{ n.to_string() }</option>
                    }) }
                </select>
            </label>
            if let Some(message) = p.message.clone() {
                <p class="notice" role="status">{ message }</p>
            }
            <SeatGrid layout={p.layout.clone()} on_toggle={p.on_toggle.clone()} />
            <aside class="selection-summary">
                if p.selected.is_empty() {
                    <p>{ "No seats selected" }</p>
                } else {
                    <p class="selected-seats">{ format!("Selected: {}", format_seat_ids(&p.selected)) }</p>
                }
                if let Some(n) = remaining {
                    <p class="remaining">{ format!("Select {n} more seat(s)") }</p>
                }
                <p class="total">{ format!("Total: {}", format_rupees(p.total)) }</p>
                <button type="button" class="btn-secondary" onclick={clear} disabled={p.selected.is_empty()}>
                    { "Clear" }
                </button>
                <button type="button" class="btn-primary" onclick={confirm} disabled={p.selected.is_empty()}>
                    { "Proceed to Payment" }
                </button>
            </aside>
        </section>
    }
}
