use async_trait::async_trait;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use std::cell::Cell;

use super::{
    AuthResponse, BookingRef, CatalogGateway, Credentials, Movie, RemoteBooking, SeatReceipt,
    Show, SignupRequest,
};
use crate::booking::BookingStatus;
use crate::enrich::placeholder_poster;
use crate::error::GatewayError;
use crate::session::User;

/// Demo data served when no backend is configured or reachable.
pub struct MockGateway {
    clock: Box<dyn Fn() -> DateTime<Utc>>,
    next_id: Cell<u64>,
}

impl MockGateway {
    pub fn new(clock: impl Fn() -> DateTime<Utc> + 'static) -> Self {
        Self {
            clock: Box::new(clock),
            next_id: Cell::new(100),
        }
    }

    /// A mock whose clock never moves.
    #[must_use]
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self::new(move || at)
    }

    fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    fn issue_id(&self) -> u64 {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        id
    }

    fn stamp(at: DateTime<Utc>) -> String {
        at.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    fn token(&self) -> String {
        format!("mock-jwt-token-{}", self.now().timestamp_millis())
    }

    fn demo_movie(id: u64, title: &str, genre: &str, duration: u32, rating: &str, blurb: &str) -> Movie {
        Movie {
            id,
            title: title.to_string(),
            genre: genre.to_string(),
            duration,
            rating: rating.to_string(),
            description: blurb.to_string(),
            poster_url: Some(placeholder_poster(title)),
            release_date: None,
        }
    }
}

impl std::fmt::Debug for MockGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockGateway")
            .field("next_id", &self.next_id.get())
            .finish_non_exhaustive()
    }
}

#[async_trait(?Send)]
impl CatalogGateway for MockGateway {
    async fn movies(&self) -> Result<Vec<Movie>, GatewayError> {
        Ok(vec![
            Self::demo_movie(
                1,
                "Demo Movie 1",
                "Action",
                120,
                "PG-13",
                "This is a demo movie for testing purposes.",
            ),
            Self::demo_movie(
                2,
                "Demo Movie 2",
                "Comedy",
                105,
                "PG",
                "Another demo movie for testing purposes.",
            ),
        ])
    }

    async fn movie_shows(&self, movie_id: u64) -> Result<Vec<Show>, GatewayError> {
        let now = self.now();
        let show = |id: u64, theater: &str, hours: i64, price: f64, available_seats: i64| Show {
            id,
            movie: movie_id,
            theater: theater.to_string(),
            showtime: Self::stamp(now + Duration::hours(hours)),
            price,
            available_seats,
            total_seats: None,
            booked_seat_numbers: Vec::new(),
        };
        Ok(vec![
            show(1, "Demo Theater 1", 2, 12.5, 50),
            show(2, "Demo Theater 2", 5, 15.0, 30),
        ])
    }

    async fn book_seat(
        &self,
        _show_id: u64,
        seat_number: &str,
    ) -> Result<SeatReceipt, GatewayError> {
        Ok(SeatReceipt {
            booking_id: BookingRef::Number(self.issue_id()),
            seat_number: seat_number.to_string(),
            status: Some(BookingStatus::Confirmed),
            message: Some("Seat booked successfully".to_string()),
        })
    }

    async fn my_bookings(&self) -> Result<Vec<RemoteBooking>, GatewayError> {
        let now = self.now();
        Ok(vec![RemoteBooking {
            id: BookingRef::Number(1),
            movie_title: "Demo Movie 1".to_string(),
            theater: "Demo Theater 1".to_string(),
            showtime: Self::stamp(now + Duration::days(1)),
            seat_number: "A1".to_string(),
            booking_time: Some(Self::stamp(now)),
            status: BookingStatus::Confirmed,
        }])
    }

    async fn cancel_booking(&self, _booking_id: &str) -> Result<String, GatewayError> {
        Ok("Booking cancelled successfully".to_string())
    }

    async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, GatewayError> {
        if credentials.username.trim().is_empty() || credentials.password.is_empty() {
            return Err(GatewayError::Rejected("Invalid credentials".to_string()));
        }
        let username = credentials.username.trim().to_string();
        let email = credentials
            .email
            .clone()
            .filter(|email| !email.trim().is_empty())
            .unwrap_or_else(|| format!("{username}@demo.com"));
        Ok(AuthResponse {
            token: self.token(),
            user: User {
                id: 1,
                username,
                email,
            },
        })
    }

    async fn signup(&self, request: &SignupRequest) -> Result<AuthResponse, GatewayError> {
        if request.username.trim().is_empty()
            || request.email.trim().is_empty()
            || request.password.is_empty()
        {
            return Err(GatewayError::Rejected(
                "Please fill all required fields".to_string(),
            ));
        }
        Ok(AuthResponse {
            token: self.token(),
            user: User {
                id: self.issue_id(),
                username: request.username.trim().to_string(),
                email: request.email.trim().to_string(),
            },
        })
    }

    fn is_mock(&self) -> bool {
        true
    }
}
