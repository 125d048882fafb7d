//! Plain-text views of catalog, seat and booking state.
use cinebook_core::format::{
    format_currency, format_duration, format_rupees, format_seat_ids, format_show_time,
};
use cinebook_core::{
    BookingDraft, BookingEntry, EnrichedMovie, SeatLayout, SeatSelection, SeatStatus, Show,
    ShowSlot, Theater,
};
use std::fmt::{self, Write};

#[must_use]
pub fn movie_line(movie: &EnrichedMovie) -> String {
    let mut line = format!("{:>3}  {}", movie.movie.id, movie.movie.title);
    let mut details: Vec<String> = Vec::new();
    if !movie.genres.is_empty() {
        details.push(movie.genres.join(", "));
    }
    let duration = format_duration(movie.movie.duration);
    if !duration.is_empty() {
        details.push(duration);
    }
    if !movie.rating.is_empty() {
        details.push(format!("★ {}", movie.rating));
    }
    if !details.is_empty() {
        line.push_str(&format!("  ({})", details.join(" · ")));
    }
    line
}

/// Demo venues with the slots still on offer today.
pub fn slot_table(theaters: &[Theater], slots: &[ShowSlot]) -> Result<String, fmt::Error> {
    if slots.is_empty() {
        return Ok("No more shows today. Check back tomorrow!\n".to_string());
    }
    let mut out = String::new();
    for theater in theaters {
        writeln!(
            out,
            "{:>3}  {} - {} (★ {:.1})",
            theater.id, theater.name, theater.location, theater.rating
        )?;
        for slot in slots {
            let price = if slot.available {
                format_rupees(slot.price)
            } else {
                "sold out".to_string()
            };
            writeln!(out, "       {:<9} {price}", slot.time)?;
        }
    }
    Ok(out)
}

#[must_use]
pub fn remote_show_line(show: &Show) -> String {
    format!(
        "{:>3}  {}  {}  {}  {} seats left",
        show.id,
        show.theater,
        format_show_time(&show.showtime),
        format_currency(show.price),
        show.available_seats
    )
}

fn seat_cell(status: SeatStatus, selected: bool, number: u32) -> String {
    match status {
        _ if selected => format!("[{number:>2}]"),
        SeatStatus::Available => format!(" {number:>2} "),
        SeatStatus::Occupied => " xx ".to_string(),
        SeatStatus::Blocked => " -- ".to_string(),
    }
}

/// Row-by-row seat map: selected seats are bracketed, taken seats are `xx`,
/// blocked seats `--`.
pub fn seat_map(layout: &SeatLayout) -> Result<String, fmt::Error> {
    if layout.is_empty() {
        return Ok("No seats for this show.\n".to_string());
    }
    let mut out = String::new();
    let width = layout
        .rows
        .iter()
        .map(|row| row.seats.len())
        .max()
        .unwrap_or(0)
        * 4;
    writeln!(out, "    {:^width$}", "SCREEN")?;
    for row in &layout.rows {
        let cells: String = row
            .seats
            .iter()
            .map(|seat| seat_cell(seat.status, seat.is_selected, seat.number))
            .collect();
        let band = row
            .seats
            .first()
            .map(|seat| format!("  {} {}", seat.tier.label(), format_rupees(seat.price)))
            .unwrap_or_default();
        writeln!(out, "{:>3} {cells:<width$}{band}", row.label)?;
    }
    writeln!(out, "    [nn] selected   xx taken   -- blocked")?;
    Ok(out)
}

#[must_use]
pub fn selection_summary(selection: &SeatSelection) -> String {
    if selection.is_empty() {
        return "No seats selected.".to_string();
    }
    let mut line = format!(
        "Selected: {}  Total: {}",
        format_seat_ids(selection.seats()),
        format_rupees(selection.total())
    );
    let remaining = selection.remaining();
    if remaining > 0 {
        line.push_str(&format!("  (select {remaining} more seat(s))"));
    }
    line
}

pub fn draft_summary(draft: &BookingDraft) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(out, "Movie:    {}", draft.movie_title)?;
    writeln!(out, "Theater:  {}", draft.theater.name)?;
    if !draft.theater.location.is_empty() {
        writeln!(out, "Address:  {}", draft.theater.location)?;
    }
    writeln!(out, "Show:     {}", format_show_time(&draft.show_time))?;
    if !draft.selected_seats().is_empty() {
        writeln!(out, "Seats:    {}", format_seat_ids(draft.selected_seats()))?;
        writeln!(out, "Total:    {}", format_rupees(draft.total_amount()))?;
    }
    if let Some(id) = draft.booking_id() {
        writeln!(out, "Booking:  {id}")?;
    }
    Ok(out)
}

pub fn booking_block(entry: &BookingEntry) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(
        out,
        "{}  {}  [{}]",
        entry.booking_id(),
        entry.movie_title(),
        entry.status().label()
    )?;
    writeln!(out, "    {}", entry.theater())?;
    if let Some(location) = entry.location() {
        writeln!(out, "    {location}")?;
    }
    writeln!(out, "    {}", format_show_time(entry.show_time()))?;
    writeln!(out, "    {}", entry.seats_label())?;
    if let Some(total) = entry.total_amount() {
        writeln!(out, "    Total: {}", format_rupees(total))?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinebook_core::gateway::{BookingRef, RemoteBooking};
    use cinebook_core::seat::{LayoutSpec, generate_layout};
    use cinebook_core::{BookingConfig, BookingStatus, Inventory, demo_theaters};

    fn layout(occupied: &[&str], selected: &[&str]) -> SeatLayout {
        let config = BookingConfig::default_config();
        let inventory = Inventory::with_occupied(occupied.iter().copied());
        let mut selection = SeatSelection::new(config.max_seats);
        let mut layout = generate_layout(
            &LayoutSpec::grid(2, 3),
            &config.banding,
            &config.prices,
            &inventory,
            &selection,
        );
        selection.toggle_many(&layout, selected.iter().copied());
        layout.apply_selection(&selection);
        layout
    }

    #[test]
    fn seat_map_marks_selected_and_taken_seats() {
        let map = seat_map(&layout(&["B3"], &["A2"])).unwrap();
        let lines: Vec<&str> = map.lines().collect();
        assert!(lines[0].contains("SCREEN"));
        assert!(lines[1].starts_with("  A   1 [ 2]  3 "));
        assert!(lines[2].starts_with("  B   1   2  xx "));
        assert!(lines[1].contains("standard ₹"));
        assert!(map.ends_with("-- blocked\n"));
    }

    #[test]
    fn empty_layout_says_so() {
        assert_eq!(seat_map(&SeatLayout::default()).unwrap(), "No seats for this show.\n");
    }

    #[test]
    fn sold_out_slots_show_no_price() {
        let theaters = demo_theaters();
        let slots = vec![
            ShowSlot {
                time: "7:00 PM".into(),
                available: true,
                price: 350,
            },
            ShowSlot {
                time: "10:00 PM".into(),
                available: false,
                price: 300,
            },
        ];
        let table = slot_table(&theaters[..1], &slots).unwrap();
        assert!(table.contains("Cineplex Downtown"));
        assert!(table.contains("7:00 PM   ₹350"));
        assert!(table.contains("10:00 PM  sold out"));
        assert!(slot_table(&theaters, &[]).unwrap().contains("Check back tomorrow"));
    }

    #[test]
    fn remote_booking_block_omits_unknown_total() {
        let entry = BookingEntry::Remote(RemoteBooking {
            id: BookingRef::Number(7),
            movie_title: String::new(),
            theater: "Demo Theater 1".into(),
            showtime: "7:00 PM".into(),
            seat_number: "A1".into(),
            booking_time: None,
            status: BookingStatus::Booked,
        });
        let block = booking_block(&entry).unwrap();
        assert!(block.starts_with("7  Unknown Movie  [booked]"));
        assert!(block.contains("Seat #A1"));
        assert!(!block.contains("Total"));
    }
}
