//! Remote movie/booking API.
//!
//! [`CatalogGateway`] is the seam between the flow and whatever serves the
//! catalog: the HTTP backend ([`HttpGateway`], feature `remote`), the bundled
//! [`MockGateway`], or [`FallbackGateway`], which tries the former and sticks
//! to the latter once the backend turns out to be unreachable.
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::booking::BookingStatus;
use crate::error::GatewayError;
use crate::seat::{Inventory, InventorySource, LayoutSpec};
use crate::session::User;

mod fallback;
#[cfg(feature = "remote")]
mod http;
mod mock;

pub use fallback::FallbackGateway;
#[cfg(feature = "remote")]
pub use http::HttpGateway;
pub use mock::MockGateway;

/// Backends answer with strings where the mock uses numbers and vice versa
/// (`"8.5"` vs `8.5`, `12` vs `"A1"`).
mod lenient {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Int(i64),
        Float(f64),
        Text(String),
    }

    impl Scalar {
        fn into_text(self) -> String {
            match self {
                Self::Int(n) => n.to_string(),
                Self::Float(n) => n.to_string(),
                Self::Text(s) => s,
            }
        }
    }

    pub fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        Ok(Option::<Scalar>::deserialize(deserializer)?
            .map(Scalar::into_text)
            .unwrap_or_default())
    }

    pub fn texts<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
        Ok(Option::<Vec<Scalar>>::deserialize(deserializer)?
            .unwrap_or_default()
            .into_iter()
            .map(Scalar::into_text)
            .collect())
    }

    #[allow(clippy::cast_precision_loss)]
    pub fn amount<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(match Option::<Scalar>::deserialize(deserializer)? {
            Some(Scalar::Int(n)) => n as f64,
            Some(Scalar::Float(n)) => n,
            Some(Scalar::Text(s)) => s.trim().parse().unwrap_or(0.0),
            None => 0.0,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default, alias = "duration_minutes")]
    pub duration: u32,
    /// Certification (`PG-13`) or score (`8.5`), depending on the backend.
    #[serde(default, deserialize_with = "lenient::text")]
    pub rating: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Show {
    pub id: u64,
    #[serde(default)]
    pub movie: u64,
    #[serde(default, alias = "screen_name")]
    pub theater: String,
    #[serde(default, alias = "date_time", alias = "start_time")]
    pub showtime: String,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub price: f64,
    #[serde(default)]
    pub available_seats: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_seats: Option<i64>,
    #[serde(default, deserialize_with = "lenient::texts")]
    pub booked_seat_numbers: Vec<String>,
}

impl Show {
    /// Occupied seats for a layout. Numeric seat numbers count seats in
    /// row-major order (`1` is `A1`); codes like `B7` are taken as-is.
    #[must_use]
    pub fn inventory(&self, spec: &LayoutSpec) -> Inventory {
        let ids: Vec<String> = spec.seat_ids().collect();
        Inventory::with_occupied(self.booked_seat_numbers.iter().filter_map(|raw| {
            match raw.parse::<usize>() {
                Ok(n) if n >= 1 => ids.get(n - 1).cloned(),
                Ok(_) => None,
                Err(_) => Some(raw.clone()),
            }
        }))
    }
}

impl InventorySource for Show {
    fn inventory(&mut self, spec: &LayoutSpec) -> Inventory {
        Show::inventory(self, spec)
    }
}

/// Booking identifier as the backend reports it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BookingRef {
    Number(u64),
    Text(String),
}

impl fmt::Display for BookingRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Response to a single-seat booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatReceipt {
    #[serde(alias = "id")]
    pub booking_id: BookingRef,
    #[serde(default, deserialize_with = "lenient::text")]
    pub seat_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<BookingStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// A booking as listed by `/my-bookings/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteBooking {
    pub id: BookingRef,
    #[serde(default)]
    pub movie_title: String,
    #[serde(default, alias = "screen_name")]
    pub theater: String,
    #[serde(default, alias = "show_datetime")]
    pub showtime: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub seat_number: String,
    #[serde(default, alias = "created_at", skip_serializing_if = "Option::is_none")]
    pub booking_time: Option<String>,
    pub status: BookingStatus,
}

/// List responses come paged (`{"results": [...]}`) or bare.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Listing<T> {
    Paged { results: Vec<T> },
    Bare(Vec<T>),
}

impl<T> Listing<T> {
    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::Paged { results } | Self::Bare(results) => results,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatBooked {
    pub seat_number: String,
    pub receipt: SeatReceipt,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatFailed {
    pub seat_number: String,
    pub error: String,
}

/// Per-seat outcome of a multi-seat request; partial success is normal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultiSeatOutcome {
    pub results: Vec<SeatBooked>,
    pub errors: Vec<SeatFailed>,
}

impl MultiSeatOutcome {
    #[must_use]
    pub fn success_count(&self) -> usize {
        self.results.len()
    }

    #[must_use]
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthResponse {
    #[serde(alias = "access")]
    pub token: String,
    pub user: User,
}

/// Where the API lives. No base URL means mock mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub base_url: Option<String>,
    pub timeout_ms: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_ms: 10_000,
        }
    }
}

impl GatewayConfig {
    /// Build from a user-supplied URL. Blank values and the deploy-template
    /// placeholder (`your-backend-url`) leave the gateway in mock mode.
    #[must_use]
    pub fn from_url(raw: Option<&str>) -> Self {
        let base_url = raw
            .map(str::trim)
            .filter(|url| !url.is_empty() && !url.contains("your-backend-url"))
            .map(|url| url.trim_end_matches('/').to_string());
        Self {
            base_url,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn is_mock(&self) -> bool {
        self.base_url.is_none()
    }
}

#[async_trait(?Send)]
pub trait CatalogGateway {
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be fetched.
    async fn movies(&self) -> Result<Vec<Movie>, GatewayError>;

    /// # Errors
    ///
    /// Returns an error if the shows cannot be fetched.
    async fn movie_shows(&self, movie_id: u64) -> Result<Vec<Show>, GatewayError>;

    /// # Errors
    ///
    /// Returns an error if the seat could not be booked.
    async fn book_seat(&self, show_id: u64, seat_number: &str)
    -> Result<SeatReceipt, GatewayError>;

    /// Book seats one after another, collecting each seat's outcome.
    async fn book_multiple_seats(&self, show_id: u64, seat_numbers: &[String]) -> MultiSeatOutcome {
        let mut outcome = MultiSeatOutcome::default();
        for seat_number in seat_numbers {
            match self.book_seat(show_id, seat_number).await {
                Ok(receipt) => outcome.results.push(SeatBooked {
                    seat_number: seat_number.clone(),
                    receipt,
                }),
                Err(err) => {
                    log::warn!("booking seat {seat_number} for show {show_id} failed: {err}");
                    outcome.errors.push(SeatFailed {
                        seat_number: seat_number.clone(),
                        error: err.to_string(),
                    });
                }
            }
        }
        outcome
    }

    /// # Errors
    ///
    /// Returns an error if the bookings cannot be fetched.
    async fn my_bookings(&self) -> Result<Vec<RemoteBooking>, GatewayError>;

    /// Returns the backend's confirmation message.
    ///
    /// # Errors
    ///
    /// Returns an error if the cancellation was not accepted.
    async fn cancel_booking(&self, booking_id: &str) -> Result<String, GatewayError>;

    /// # Errors
    ///
    /// Returns an error if the credentials are rejected.
    async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, GatewayError>;

    /// # Errors
    ///
    /// Returns an error if the account cannot be created.
    async fn signup(&self, request: &SignupRequest) -> Result<AuthResponse, GatewayError>;

    /// Bearer token sent with subsequent requests.
    fn set_token(&self, _token: Option<&str>) {}

    /// Whether answers come from bundled demo data.
    fn is_mock(&self) -> bool;
}
