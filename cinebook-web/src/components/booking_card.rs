use cinebook_core::BookingEntry;
use cinebook_core::format::{format_rupees, format_show_time};
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub entry: BookingEntry,
    /// Booking id awaiting a cancel round-trip.
    #[prop_or_default]
    pub cancelling: bool,
    pub on_cancel: Callback<String>,
    pub on_download: Callback<String>,
}

#[function_component(BookingCard)]
pub fn booking_card(p: &Props) -> Html {
    let entry = &p.entry;
    let id = entry.booking_id();
    let cancel = {
        let cb = p.on_cancel.clone();
        let id = id.clone();
        Callback::from(move |_| cb.emit(id.clone()))
    };
    let download = {
        let cb = p.on_download.clone();
        let id = id.clone();
        Callback::from(move |_| cb.emit(id.clone()))
    };
    let status = entry.status().label();
    html! {
        <article class={classes!("booking-card", format!("status-{status}"))} data-booking={id.clone()}>
            <header>
                <h3>{ entry.movie_title().to_string() }</h3>
                <span class="status-badge">{ status }</span>
            </header>
            <dl>
                <dt>{ "Booking ID" }</dt><dd>{ id }</dd>
                <dt>{ "Theater" }</dt><dd>{ entry.theater().to_string() }</dd>
                if let Some(location) = entry.location() {
                    <dt>{ "Address" }</dt><dd>{ location.to_string() }</dd>
                }
                <dt>{ "Show Time" }</dt><dd>{ format_show_time(entry.show_time()) }</dd>
                <dt>{ "Seats" }</dt><dd>{ entry.seats_label() }</dd>
                if let Some(total) = entry.total_amount() {
                    <dt>{ "Total" }</dt><dd>{ format_rupees(total) }</dd>
                }
            </dl>
            <footer>
                <button type="button" class="btn-secondary" onclick={download}>{ "Download Ticket" }</button>
                if entry.is_cancellable() {
                    <button type="button" class="btn-danger" onclick={cancel} disabled={p.cancelling}>
                        { if p.cancelling { "Cancelling..." } else { "Cancel Booking" } }
                    </button>
                }
            </footer>
        </article>
    }
}
