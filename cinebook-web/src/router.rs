use cinebook_core::AppRoute;
use yew_router::prelude::*;

#[derive(Clone, Debug, Routable, PartialEq, Eq)]
pub enum Route {
    #[at("/")]
    Home,
    #[at("/movies")]
    Movies,
    #[at("/booking/seats/:movie_id")]
    SeatBooking { movie_id: u64 },
    #[at("/booking/payment")]
    Payment,
    #[at("/my-bookings")]
    MyBookings,
    #[at("/login")]
    Login,
    #[at("/signup")]
    Signup,
    #[at("/404")]
    #[not_found]
    NotFound,
}

impl Route {
    #[must_use]
    pub const fn from_app(route: &AppRoute) -> Self {
        match route {
            AppRoute::Home => Self::Home,
            AppRoute::Movies => Self::Movies,
            AppRoute::SeatBooking { movie_id } => Self::SeatBooking {
                movie_id: *movie_id,
            },
            AppRoute::Payment => Self::Payment,
            AppRoute::MyBookings => Self::MyBookings,
            AppRoute::Login => Self::Login,
            AppRoute::Signup => Self::Signup,
            AppRoute::NotFound => Self::NotFound,
        }
    }

    #[must_use]
    pub const fn to_app(&self) -> AppRoute {
        match self {
            Self::Home => AppRoute::Home,
            Self::Movies => AppRoute::Movies,
            Self::SeatBooking { movie_id } => AppRoute::SeatBooking {
                movie_id: *movie_id,
            },
            Self::Payment => AppRoute::Payment,
            Self::MyBookings => AppRoute::MyBookings,
            Self::Login => AppRoute::Login,
            Self::Signup => AppRoute::Signup,
            Self::NotFound => AppRoute::NotFound,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_agree_with_core_routes() {
        let routes = [
            Route::Home,
            Route::Movies,
            Route::SeatBooking { movie_id: 7 },
            Route::Payment,
            Route::MyBookings,
            Route::Login,
            Route::Signup,
            Route::NotFound,
        ];
        for route in routes {
            let app = route.to_app();
            assert_eq!(route.to_path(), app.path());
            assert_eq!(Route::from_app(&app), route);
        }
    }

    #[test]
    fn unknown_paths_fall_through_to_not_found() {
        assert_eq!(
            Route::recognize("/booking/seats/12"),
            Some(Route::SeatBooking { movie_id: 12 })
        );
        assert_eq!(Route::recognize("/nowhere"), Some(Route::NotFound));
    }
}
