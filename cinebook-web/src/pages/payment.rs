use cinebook_core::format::{format_rupees, format_seat_ids, format_show_time};
use cinebook_core::{BookingDraft, PaymentStatus};
use yew::prelude::*;

use super::bind;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub draft: BookingDraft,
    pub status: PaymentStatus,
    #[prop_or_default]
    pub error: Option<AttrValue>,
    /// Outcome of the last e-mail attempt.
    #[prop_or_default]
    pub notice: Option<AttrValue>,
    pub on_pay: Callback<()>,
    pub on_download: Callback<()>,
    pub on_email: Callback<String>,
    pub on_view_bookings: Callback<()>,
    pub on_back: Callback<()>,
}

fn order_summary(draft: &BookingDraft) -> Html {
    html! {
        <dl class="order-summary">
            <dt>{ "Movie" }</dt><dd>{ draft.movie_title.clone() }</dd>
            <dt>{ "Theater" }</dt><dd>{ draft.theater.name.clone() }</dd>
            if !draft.theater.location.is_empty() {
                <dt>{ "Address" }</dt><dd>{ draft.theater.location.clone() }</dd>
            }
            <dt>{ "Show Time" }</dt><dd>{ format_show_time(&draft.show_time) }</dd>
            <dt>{ "Seats" }</dt><dd>{ format_seat_ids(draft.selected_seats()) }</dd>
            if let Some(id) = draft.booking_id() {
                <dt>{ "Booking ID" }</dt><dd>{ id.to_string() }</dd>
            }
            <dt>{ "Total" }</dt><dd class="total">{ format_rupees(draft.total_amount()) }</dd>
        </dl>
    }
}

#[function_component(PaymentPage)]
pub fn payment_page(p: &Props) -> Html {
    let email = use_state(String::new);
    let pay = {
        let cb = p.on_pay.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let back = {
        let cb = p.on_back.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let download = {
        let cb = p.on_download.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let view_bookings = {
        let cb = p.on_view_bookings.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let send = {
        let cb = p.on_email.clone();
        let email = email.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            cb.emit((*email).clone());
        })
    };

    let body = match &p.status {
        PaymentStatus::Ready => html! {
            <div class="payment-actions">
                <button type="button" class="btn-secondary" onclick={back}>{ "Back" }</button>
                <button type="button" class="btn-primary" onclick={pay}>
                    { format!("Pay {}", format_rupees(p.draft.total_amount())) }
                </button>
            </div>
        },
        PaymentStatus::Processing => html! {
            <p class="processing" aria-live="polite">{ "Processing payment..." }</p>
        },
        PaymentStatus::Paid(booking) => html! {
            <div class="payment-success" aria-live="polite">
                <h2>{ "Payment Successful!" }</h2>
                <p>{ format!("Booking {} is confirmed.", booking.booking_id) }</p>
                <button type="button" class="btn-secondary" onclick={download}>{ "Download Ticket" }</button>
                <form class="email-ticket" onsubmit={send}>
                    <label for="ticket-email">{ "Email ticket to" }</label>
                    <input id="ticket-email" type="email" value={(*email).clone()} oninput={bind(&email)} />
                    <button type="submit">{ "Send" }</button>
                </form>
                if let Some(notice) = p.notice.clone() {
                    <p class="notice" role="status">{ notice }</p>
                }
                <button type="button" class="btn-primary" onclick={view_bookings}>{ "View My Bookings" }</button>
            </div>
        },
    };

    html! {
        <section class="panel payment">
            <h1>{ "Payment" }</h1>
            { order_summary(&p.draft) }
            if let Some(error) = p.error.clone() {
                <p class="error" role="alert">{ error }</p>
            }
            { body }
        </section>
    }
}
