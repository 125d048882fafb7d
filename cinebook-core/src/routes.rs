//! Application routes and the authentication guard.
use crate::session::Session;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppRoute {
    Home,
    Movies,
    SeatBooking { movie_id: u64 },
    Payment,
    MyBookings,
    Login,
    Signup,
    NotFound,
}

impl AppRoute {
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Home => "/".to_string(),
            Self::Movies => "/movies".to_string(),
            Self::SeatBooking { movie_id } => format!("/booking/seats/{movie_id}"),
            Self::Payment => "/booking/payment".to_string(),
            Self::MyBookings => "/my-bookings".to_string(),
            Self::Login => "/login".to_string(),
            Self::Signup => "/signup".to_string(),
            Self::NotFound => "/404".to_string(),
        }
    }

    #[must_use]
    pub const fn requires_auth(&self) -> bool {
        matches!(self, Self::MyBookings)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    RedirectToLogin,
}

#[must_use]
pub const fn guard(route: &AppRoute, session: &Session) -> GuardDecision {
    if route.requires_auth() && !session.is_authenticated() {
        GuardDecision::RedirectToLogin
    } else {
        GuardDecision::Allow
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::User;
    use crate::store::MemoryStore;

    #[test]
    fn only_my_bookings_is_guarded() {
        let anon = Session::anonymous();
        assert_eq!(guard(&AppRoute::MyBookings, &anon), GuardDecision::RedirectToLogin);
        assert_eq!(guard(&AppRoute::Payment, &anon), GuardDecision::Allow);
        assert_eq!(
            guard(&AppRoute::SeatBooking { movie_id: 3 }, &anon),
            GuardDecision::Allow
        );

        let store = MemoryStore::new();
        let mut session = Session::anonymous();
        session
            .sign_in(
                &store,
                "t".to_string(),
                User {
                    id: 1,
                    username: "u".to_string(),
                    email: String::new(),
                },
            )
            .unwrap();
        assert_eq!(guard(&AppRoute::MyBookings, &session), GuardDecision::Allow);
    }

    #[test]
    fn paths() {
        assert_eq!(AppRoute::SeatBooking { movie_id: 7 }.path(), "/booking/seats/7");
        assert_eq!(AppRoute::Movies.path(), "/movies");
    }
}
