//! Display formatting for amounts, dates and durations.
use chrono::{DateTime, Utc};

use crate::draft::SelectedSeat;

/// Approximate USD to INR rate applied by [`format_currency`].
pub const USD_TO_INR: f64 = 83.0;

/// Group digits the Indian way: last three, then pairs (`12,34,567`).
#[must_use]
pub fn group_indian(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let sign = if value < 0 { "-" } else { "" };
    if digits.len() <= 3 {
        return format!("{sign}{digits}");
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();
    format!("{sign}{},{tail}", groups.join(","))
}

#[allow(clippy::cast_possible_truncation)]
fn round_to_i64(value: f64) -> i64 {
    if value.is_finite() {
        value.round() as i64
    } else {
        0
    }
}

/// Rupee amount, rounded: `₹1,250`.
#[must_use]
pub fn format_amount(amount: f64) -> String {
    format!("₹{}", group_indian(round_to_i64(amount)))
}

/// Whole-rupee amount: `₹700`.
#[must_use]
pub fn format_rupees(amount: i64) -> String {
    format!("₹{}", group_indian(amount))
}

/// USD price shown in rupees at [`USD_TO_INR`].
#[must_use]
pub fn format_currency(usd: f64) -> String {
    format_amount(usd * USD_TO_INR)
}

/// `2h 5m`, `2h`, `45m`; empty for zero.
#[must_use]
pub fn format_duration(minutes: u32) -> String {
    let hours = minutes / 60;
    let mins = minutes % 60;
    match (hours, mins) {
        (0, 0) => String::new(),
        (0, m) => format!("{m}m"),
        (h, 0) => format!("{h}h"),
        (h, m) => format!("{h}h {m}m"),
    }
}

/// `17 October 2026`
#[must_use]
pub fn format_date(at: DateTime<Utc>) -> String {
    at.format("%-d %B %Y").to_string()
}

/// `07:00 pm`
#[must_use]
pub fn format_time(at: DateTime<Utc>) -> String {
    at.format("%I:%M %P").to_string()
}

/// `Sat, 17 Oct 2026, 07:00 pm`
#[must_use]
pub fn format_date_time(at: DateTime<Utc>) -> String {
    at.format("%a, %-d %b %Y, %I:%M %P").to_string()
}

/// Show times are either RFC 3339 timestamps or display strings like `7:00 PM`;
/// the latter pass through unchanged.
#[must_use]
pub fn format_show_time(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw).map_or_else(
        |_| raw.to_string(),
        |at| format_date_time(at.with_timezone(&Utc)),
    )
}

/// `B7, C6`
#[must_use]
pub fn format_seat_ids(seats: &[SelectedSeat]) -> String {
    seats
        .iter()
        .map(|seat| seat.id.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn indian_grouping() {
        assert_eq!(group_indian(0), "0");
        assert_eq!(group_indian(999), "999");
        assert_eq!(group_indian(1_000), "1,000");
        assert_eq!(group_indian(123_456), "1,23,456");
        assert_eq!(group_indian(12_345_678), "1,23,45,678");
        assert_eq!(group_indian(-1_500), "-1,500");
    }

    #[test]
    fn amounts_round_and_convert() {
        assert_eq!(format_amount(700.0), "₹700");
        assert_eq!(format_amount(1249.6), "₹1,250");
        assert_eq!(format_rupees(2_450), "₹2,450");
        assert_eq!(format_currency(12.5), "₹1,038");
        assert_eq!(format_amount(f64::NAN), "₹0");
    }

    #[test]
    fn durations() {
        assert_eq!(format_duration(0), "");
        assert_eq!(format_duration(45), "45m");
        assert_eq!(format_duration(120), "2h");
        assert_eq!(format_duration(125), "2h 5m");
    }

    #[test]
    fn dates_and_show_times() {
        let at = Utc.with_ymd_and_hms(2026, 10, 17, 19, 0, 0).unwrap();
        assert_eq!(format_date(at), "17 October 2026");
        assert_eq!(format_time(at), "07:00 pm");
        assert_eq!(format_date_time(at), "Sat, 17 Oct 2026, 07:00 pm");
        assert_eq!(
            format_show_time("2026-10-17T19:00:00Z"),
            "Sat, 17 Oct 2026, 07:00 pm"
        );
        assert_eq!(format_show_time("7:00 PM"), "7:00 PM");
    }
}
