//! Downloadable ticket text and e-mailed tickets.
use chrono::{DateTime, Utc};

use crate::booking::Booking;
use crate::error::ValidationError;
use crate::format::{format_date, format_rupees};
use crate::my_bookings::BookingEntry;

/// Everything printed on a ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketSummary {
    pub booking_id: String,
    pub movie_title: String,
    pub theater: String,
    pub location: String,
    pub show_time: String,
    pub seats: String,
    pub total_amount: Option<i64>,
    pub booking_date: String,
    pub qr_code: String,
}

impl TicketSummary {
    #[must_use]
    pub fn from_booking(booking: &Booking) -> Self {
        Self::from_entry(&BookingEntry::Local(booking.clone()))
    }

    #[must_use]
    pub fn from_entry(entry: &BookingEntry) -> Self {
        let booking_id = entry.booking_id();
        let booking_date = entry
            .booked_at()
            .and_then(|raw| DateTime::parse_from_rfc3339(&raw).ok())
            .map_or_else(
                || "N/A".to_string(),
                |at| format_date(at.with_timezone(&Utc)),
            );
        Self {
            qr_code: format!("QR-{booking_id}"),
            movie_title: entry.movie_title().to_string(),
            theater: entry.theater().to_string(),
            location: entry.location().unwrap_or("N/A").to_string(),
            show_time: entry.show_time().to_string(),
            seats: entry.seats(),
            total_amount: entry.total_amount(),
            booking_date,
            booking_id,
        }
    }
}

const RULE: &str = "================================";

#[must_use]
pub fn render_ticket_text(ticket: &TicketSummary) -> String {
    let total = ticket
        .total_amount
        .map_or_else(|| "N/A".to_string(), format_rupees);
    let lines = [
        "🎬 MOVIE TICKET CONFIRMATION 🎬".to_string(),
        RULE.to_string(),
        String::new(),
        format!("Booking ID: {}", ticket.booking_id),
        format!("Movie: {}", ticket.movie_title),
        format!("Theater: {}", ticket.theater),
        format!("Address: {}", ticket.location),
        format!("Show Time: {}", ticket.show_time),
        format!("Seats: {}", ticket.seats),
        format!("Total Amount: {total}"),
        format!("Booking Date: {}", ticket.booking_date),
        format!("QR Code: {}", ticket.qr_code),
        String::new(),
        RULE.to_string(),
        "Please present this ticket at the theater.".to_string(),
        "Enjoy your movie! 🍿".to_string(),
        RULE.to_string(),
        String::new(),
    ];
    lines.join("\n")
}

#[must_use]
pub fn ticket_file_name(booking_id: &str) -> String {
    format!("ticket-{booking_id}.txt")
}

/// Trimmed address; it must be non-empty and contain `@`.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidEmail`] otherwise.
pub fn validate_email(raw: &str) -> Result<String, ValidationError> {
    let email = raw.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(email.to_string())
}

/// A ticket addressed to someone; delivery is up to the front-end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// # Errors
///
/// Returns [`ValidationError::InvalidEmail`] for an unusable address.
pub fn email_ticket(raw_email: &str, ticket: &TicketSummary) -> Result<TicketEmail, ValidationError> {
    let to = validate_email(raw_email)?;
    Ok(TicketEmail {
        subject: format!("Your ticket for {} ({})", ticket.movie_title, ticket.booking_id),
        body: render_ticket_text(ticket),
        to,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::BookingStatus;
    use crate::booking::tests::booking;
    use crate::gateway::{BookingRef, RemoteBooking};
    use chrono::TimeZone;

    #[test]
    fn local_ticket_lists_every_field() {
        let at = Utc.with_ymd_and_hms(2026, 10, 17, 9, 30, 0).unwrap();
        let booking = booking(at);
        let text = render_ticket_text(&TicketSummary::from_booking(&booking));
        assert!(text.contains(&format!("Booking ID: {}", booking.booking_id)));
        assert!(text.contains("Theater: Cineplex Downtown"));
        assert!(text.contains("Address: 123 Main Street, Downtown"));
        assert!(text.contains("Seats: B7, C6"));
        assert!(text.contains("Total Amount: ₹700"));
        assert!(text.contains("Booking Date: 17 October 2026"));
        assert!(text.contains(&format!("QR Code: QR-{}", booking.booking_id)));
    }

    #[test]
    fn remote_ticket_fills_gaps_with_na() {
        let entry = BookingEntry::Remote(RemoteBooking {
            id: BookingRef::Number(42),
            movie_title: String::new(),
            theater: "Screen 1".to_string(),
            showtime: "2026-10-18T19:00:00Z".to_string(),
            seat_number: "12".to_string(),
            booking_time: None,
            status: BookingStatus::Booked,
        });
        let ticket = TicketSummary::from_entry(&entry);
        assert_eq!(ticket.movie_title, "Unknown Movie");
        assert_eq!(ticket.location, "N/A");
        assert_eq!(ticket.booking_date, "N/A");
        assert_eq!(ticket.qr_code, "QR-42");
        assert!(render_ticket_text(&ticket).contains("Total Amount: N/A"));
        assert_eq!(ticket_file_name(&ticket.booking_id), "ticket-42.txt");
    }

    #[test]
    fn email_needs_an_at_sign() {
        assert_eq!(validate_email("   "), Err(ValidationError::InvalidEmail));
        assert_eq!(validate_email("asha.demo.com"), Err(ValidationError::InvalidEmail));
        assert_eq!(validate_email(" asha@demo.com ").unwrap(), "asha@demo.com");

        let at = Utc.with_ymd_and_hms(2026, 10, 17, 9, 30, 0).unwrap();
        let ticket = TicketSummary::from_booking(&booking(at));
        let mail = email_ticket("asha@demo.com", &ticket).unwrap();
        assert_eq!(mail.to, "asha@demo.com");
        assert!(mail.subject.contains("Demo Movie 1"));
    }
}
