//! User-facing wording for seat clicks, gateway, cancellation and ticket
//! outcomes, shared by every front-end.
use crate::error::{GatewayError, ValidationError};
use crate::gateway::MultiSeatOutcome;
use crate::my_bookings::CancelReport;
use crate::seat::SeatStatus;
use crate::selection::ToggleOutcome;
use crate::ticket::TicketEmail;

/// Feedback for a seat click that did not change the selection.
#[must_use]
pub fn toggle_message(outcome: ToggleOutcome) -> Option<String> {
    match outcome {
        ToggleOutcome::Selected | ToggleOutcome::Deselected => None,
        ToggleOutcome::LimitReached { cap } => {
            Some(format!("You can select at most {cap} seats."))
        }
        ToggleOutcome::Unavailable(SeatStatus::Blocked) => {
            Some("That seat is not available for booking.".to_string())
        }
        ToggleOutcome::Unavailable(_) => Some("That seat is already taken.".to_string()),
        ToggleOutcome::UnknownSeat => Some("That seat does not exist in this theater.".to_string()),
    }
}

#[must_use]
pub fn gateway_message(err: &GatewayError) -> String {
    match err {
        GatewayError::Unauthorized => "Your session has expired. Please log in again.".to_string(),
        GatewayError::Rejected(message) | GatewayError::Status { message, .. } => message.clone(),
        GatewayError::Unavailable(_) => "The booking service is not reachable.".to_string(),
        GatewayError::Decode(_) => "Unexpected response from the booking service.".to_string(),
    }
}

#[must_use]
pub fn cancel_message(report: &CancelReport) -> String {
    match &report.remote {
        Ok(message) => message.clone(),
        Err(_) if report.local_updated => {
            "Booking cancelled on this device; the server could not be updated.".to_string()
        }
        Err(err) => format!("Could not cancel booking: {}", gateway_message(err)),
    }
}

/// `Err` when no seat could be reserved at all.
///
/// # Errors
///
/// Returns the message listing the failures.
pub fn reservation_message(outcome: &MultiSeatOutcome) -> Result<Option<String>, String> {
    let failed = outcome
        .errors
        .iter()
        .map(|failure| failure.seat_number.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    if outcome.is_complete() {
        Ok(None)
    } else if outcome.success_count() == 0 {
        Err(format!("Could not reserve seats {failed}."))
    } else {
        Ok(Some(format!(
            "Reserved {} seat(s); {failed} could not be booked.",
            outcome.success_count()
        )))
    }
}

#[must_use]
pub fn email_message(result: &Result<TicketEmail, ValidationError>) -> String {
    match result {
        Ok(mail) => format!("Ticket sent to {}", mail.to),
        Err(ValidationError::InvalidEmail) => "Please enter a valid email address".to_string(),
        Err(err) => err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{BookingRef, SeatBooked, SeatFailed, SeatReceipt};

    #[test]
    fn only_refusals_produce_messages() {
        assert_eq!(toggle_message(ToggleOutcome::Selected), None);
        assert_eq!(toggle_message(ToggleOutcome::Deselected), None);
        assert_eq!(
            toggle_message(ToggleOutcome::LimitReached { cap: 8 }).as_deref(),
            Some("You can select at most 8 seats.")
        );
        assert!(
            toggle_message(ToggleOutcome::Unavailable(SeatStatus::Occupied))
                .is_some_and(|m| m.contains("taken"))
        );
    }

    #[test]
    fn cancellation_wording_follows_both_sides() {
        let confirmed = CancelReport {
            local_updated: false,
            remote: Ok("Booking cancelled successfully".into()),
        };
        assert_eq!(cancel_message(&confirmed), "Booking cancelled successfully");

        let local_only = CancelReport {
            local_updated: true,
            remote: Err(GatewayError::Unavailable("offline".into())),
        };
        assert!(cancel_message(&local_only).contains("on this device"));

        let neither = CancelReport {
            local_updated: false,
            remote: Err(GatewayError::Rejected("Already cancelled".into())),
        };
        assert_eq!(cancel_message(&neither), "Could not cancel booking: Already cancelled");
    }

    #[test]
    fn partial_reservations_still_proceed() {
        let partial = MultiSeatOutcome {
            results: vec![SeatBooked {
                seat_number: "A1".into(),
                receipt: SeatReceipt {
                    booking_id: BookingRef::Number(101),
                    seat_number: "A1".into(),
                    status: None,
                    message: None,
                },
            }],
            errors: vec![SeatFailed {
                seat_number: "A2".into(),
                error: "taken".into(),
            }],
        };
        assert_eq!(
            reservation_message(&partial),
            Ok(Some("Reserved 1 seat(s); A2 could not be booked.".to_string()))
        );

        let none = MultiSeatOutcome {
            results: Vec::new(),
            errors: partial.errors.clone(),
        };
        assert_eq!(reservation_message(&none), Err("Could not reserve seats A2.".to_string()));
    }

    #[test]
    fn bad_addresses_are_explained() {
        assert_eq!(
            email_message(&Err(ValidationError::InvalidEmail)),
            "Please enter a valid email address"
        );
    }
}
