use cinebook_core::BookingEntry;
use yew::prelude::*;

use crate::components::booking_card::BookingCard;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub entries: Vec<BookingEntry>,
    #[prop_or_default]
    pub loading: bool,
    #[prop_or_default]
    pub notice: Option<AttrValue>,
    /// Booking whose cancellation is in flight.
    #[prop_or_default]
    pub cancelling: Option<AttrValue>,
    pub on_cancel: Callback<String>,
    pub on_download: Callback<String>,
    pub on_browse: Callback<()>,
}

#[function_component(MyBookingsPage)]
pub fn my_bookings_page(p: &Props) -> Html {
    if p.loading {
        return html! { <section class="panel"><p class="loading">{ "Loading your bookings..." }</p></section> };
    }
    let browse = {
        let cb = p.on_browse.clone();
        Callback::from(move |_| cb.emit(()))
    };
    html! {
        <section class="panel my-bookings">
            <h1>{ "My Bookings" }</h1>
            if let Some(notice) = p.notice.clone() {
                <p class="notice" role="status">{ notice }</p>
            }
            if p.entries.is_empty() {
                <button type="button" class="btn-primary" onclick={browse}>{ "Browse Movies" }</button>
            }
            <div class="booking-list">
                { for p.entries.iter().enumerate().map(|(index, entry)| {
                    let id = entry.booking_id();
                    let cancelling = p.cancelling.as_deref() == Some(id.as_str());
                    html! {
                        <BookingCard
                            key={format!("{index}-{id}")}
                            entry={entry.clone()}
                            {cancelling}
                            on_cancel={p.on_cancel.clone()}
                            on_download={p.on_download.clone()}
                        />
                    }
                }) }
            </div>
        </section>
    }
}
