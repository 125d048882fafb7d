use cinebook_core::format::format_rupees;
use cinebook_core::{Seat, SeatLayout, SeatStatus};
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub layout: SeatLayout,
    pub on_toggle: Callback<String>,
}

#[must_use]
pub fn seat_class(seat: &Seat) -> String {
    let state = if seat.is_selected {
        "selected"
    } else {
        match seat.status {
            SeatStatus::Available => "available",
            SeatStatus::Occupied => "occupied",
            SeatStatus::Blocked => "blocked",
        }
    };
    format!("seat seat-{state} tier-{}", seat.tier.label())
}

#[function_component(SeatGrid)]
pub fn seat_grid(p: &Props) -> Html {
    if p.layout.is_empty() {
        return html! { <p class="seat-grid-empty">{ "No seats for this show." }</p> };
    }
    html! {
        <div class="seat-grid" role="grid" aria-label="Seat map">
            <div class="screen" aria-hidden="true">{ "SCREEN" }</div>
            { for p.layout.rows.iter().map(|row| html! {
                <div class="seat-row" role="row" key={row.label.clone()}>
                    <span class="row-label">{ row.label.clone() }</span>
                    { for row.seats.iter().map(|seat| {
                        let onclick = {
                            let cb = p.on_toggle.clone();
                            let id = seat.id.clone();
                            Callback::from(move |_| cb.emit(id.clone()))
                        };
                        let title = format!(
                            "{} · {} · {}",
                            seat.id,
                            seat.tier.label(),
                            format_rupees(seat.price)
                        );
                        html! {
                            <button
                                type="button"
                                class={seat_class(seat)}
                                data-seat={seat.id.clone()}
                                aria-pressed={seat.is_selected.to_string()}
                                disabled={seat.is_booked()}
                                {title}
                                {onclick}
                            >
                                { seat.number.to_string() }
                            </button>
                        }
                    }) }
                </div>
            }) }
            <ul class="seat-legend">
                <li class="seat seat-available">{ "Available" }</li>
                <li class="seat seat-selected">{ "Selected" }</li>
                <li class="seat seat-occupied">{ "Occupied" }</li>
                <li class="seat seat-blocked">{ "Blocked" }</li>
            </ul>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinebook_core::SeatTier;

    fn seat(status: SeatStatus, is_selected: bool) -> Seat {
        Seat {
            id: "C4".into(),
            row: "C".into(),
            number: 4,
            status,
            price: 350,
            tier: SeatTier::Premium,
            is_selected,
        }
    }

    #[test]
    fn selection_wins_over_status_in_class() {
        assert_eq!(
            seat_class(&seat(SeatStatus::Available, true)),
            "seat seat-selected tier-premium"
        );
        assert_eq!(
            seat_class(&seat(SeatStatus::Blocked, false)),
            "seat seat-blocked tier-premium"
        );
    }
}
