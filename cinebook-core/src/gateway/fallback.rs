use async_trait::async_trait;
use std::cell::Cell;

use super::{
    AuthResponse, CatalogGateway, Credentials, MockGateway, Movie, RemoteBooking, SeatReceipt,
    Show, SignupRequest,
};
use crate::error::GatewayError;

/// Remote gateway with a mock behind it. The first "backend unavailable"
/// failure switches every later call to the mock for the rest of the
/// gateway's life.
#[derive(Debug)]
pub struct FallbackGateway<R> {
    remote: Option<R>,
    mock: MockGateway,
    mock_mode: Cell<bool>,
}

impl<R: CatalogGateway> FallbackGateway<R> {
    /// `None` for `remote` starts in mock mode.
    pub fn new(remote: Option<R>, mock: MockGateway) -> Self {
        let mock_mode = Cell::new(remote.is_none());
        Self {
            remote,
            mock,
            mock_mode,
        }
    }

    pub const fn remote(&self) -> Option<&R> {
        self.remote.as_ref()
    }

    fn live(&self) -> Option<&R> {
        if self.mock_mode.get() {
            None
        } else {
            self.remote.as_ref()
        }
    }

    /// Decide whether `err` sends this call (and all later ones) to the mock.
    fn fall_back(&self, err: &GatewayError) -> bool {
        if err.is_unavailable() {
            log::warn!("backend not available, switching to mock data: {err}");
            self.mock_mode.set(true);
            true
        } else {
            false
        }
    }
}

#[async_trait(?Send)]
impl<R: CatalogGateway> CatalogGateway for FallbackGateway<R> {
    async fn movies(&self) -> Result<Vec<Movie>, GatewayError> {
        if let Some(remote) = self.live() {
            match remote.movies().await {
                Err(err) if self.fall_back(&err) => {}
                other => return other,
            }
        }
        self.mock.movies().await
    }

    async fn movie_shows(&self, movie_id: u64) -> Result<Vec<Show>, GatewayError> {
        if let Some(remote) = self.live() {
            match remote.movie_shows(movie_id).await {
                Err(err) if self.fall_back(&err) => {}
                other => return other,
            }
        }
        self.mock.movie_shows(movie_id).await
    }

    async fn book_seat(
        &self,
        show_id: u64,
        seat_number: &str,
    ) -> Result<SeatReceipt, GatewayError> {
        if let Some(remote) = self.live() {
            match remote.book_seat(show_id, seat_number).await {
                Err(err) if self.fall_back(&err) => {}
                other => return other,
            }
        }
        self.mock.book_seat(show_id, seat_number).await
    }

    async fn my_bookings(&self) -> Result<Vec<RemoteBooking>, GatewayError> {
        if let Some(remote) = self.live() {
            match remote.my_bookings().await {
                Err(err) if self.fall_back(&err) => {}
                other => return other,
            }
        }
        self.mock.my_bookings().await
    }

    async fn cancel_booking(&self, booking_id: &str) -> Result<String, GatewayError> {
        if let Some(remote) = self.live() {
            match remote.cancel_booking(booking_id).await {
                Err(err) if self.fall_back(&err) => {}
                other => return other,
            }
        }
        self.mock.cancel_booking(booking_id).await
    }

    async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, GatewayError> {
        if let Some(remote) = self.live() {
            match remote.login(credentials).await {
                Err(err) if self.fall_back(&err) => {}
                other => return other,
            }
        }
        self.mock.login(credentials).await
    }

    async fn signup(&self, request: &SignupRequest) -> Result<AuthResponse, GatewayError> {
        if let Some(remote) = self.live() {
            match remote.signup(request).await {
                Err(err) if self.fall_back(&err) => {}
                other => return other,
            }
        }
        self.mock.signup(request).await
    }

    fn set_token(&self, token: Option<&str>) {
        if let Some(remote) = &self.remote {
            remote.set_token(token);
        }
    }

    fn is_mock(&self) -> bool {
        self.mock_mode.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use futures::executor::block_on;
    use std::cell::RefCell;

    /// Remote double that fails with a queued error, then counts calls.
    #[derive(Default)]
    struct FlakyRemote {
        failure: RefCell<Option<GatewayError>>,
        calls: Cell<usize>,
    }

    #[async_trait(?Send)]
    impl CatalogGateway for FlakyRemote {
        async fn movies(&self) -> Result<Vec<Movie>, GatewayError> {
            self.calls.set(self.calls.get() + 1);
            match self.failure.borrow_mut().take() {
                Some(err) => Err(err),
                None => Ok(Vec::new()),
            }
        }
        async fn movie_shows(&self, _movie_id: u64) -> Result<Vec<Show>, GatewayError> {
            Ok(Vec::new())
        }
        async fn book_seat(&self, _: u64, _: &str) -> Result<SeatReceipt, GatewayError> {
            Err(GatewayError::Status {
                status: 400,
                message: "Seat already booked".into(),
            })
        }
        async fn my_bookings(&self) -> Result<Vec<RemoteBooking>, GatewayError> {
            Ok(Vec::new())
        }
        async fn cancel_booking(&self, _: &str) -> Result<String, GatewayError> {
            Ok(String::new())
        }
        async fn login(&self, _: &Credentials) -> Result<AuthResponse, GatewayError> {
            Err(GatewayError::Unauthorized)
        }
        async fn signup(&self, _: &SignupRequest) -> Result<AuthResponse, GatewayError> {
            Err(GatewayError::Unauthorized)
        }
        fn is_mock(&self) -> bool {
            false
        }
    }

    fn mock() -> MockGateway {
        MockGateway::fixed(Utc.with_ymd_and_hms(2026, 10, 17, 12, 0, 0).unwrap())
    }

    #[test]
    fn unreachable_backend_switches_to_mock_for_good() {
        let remote = FlakyRemote::default();
        *remote.failure.borrow_mut() = Some(GatewayError::Unavailable("refused".into()));
        let gateway = FallbackGateway::new(Some(remote), mock());

        let movies = block_on(gateway.movies()).unwrap();
        assert_eq!(movies.len(), 2);
        assert!(gateway.is_mock());

        block_on(gateway.movies()).unwrap();
        assert_eq!(gateway.remote().map(|r| r.calls.get()), Some(1));
    }

    #[test]
    fn backend_errors_are_passed_through() {
        let gateway = FallbackGateway::new(Some(FlakyRemote::default()), mock());
        let err = block_on(gateway.book_seat(1, "A1")).unwrap_err();
        assert!(matches!(err, GatewayError::Status { status: 400, .. }));
        assert!(!gateway.is_mock());

        let seats = vec!["A1".to_string(), "A2".to_string()];
        let outcome = block_on(gateway.book_multiple_seats(1, &seats));
        assert_eq!(outcome.error_count(), 2);
        assert_eq!(outcome.errors[0].seat_number, "A1");
    }

    #[test]
    fn no_remote_means_mock_from_the_start() {
        let gateway: FallbackGateway<FlakyRemote> = FallbackGateway::new(None, mock());
        assert!(gateway.is_mock());
        assert_eq!(block_on(gateway.my_bookings()).unwrap().len(), 1);
    }
}
