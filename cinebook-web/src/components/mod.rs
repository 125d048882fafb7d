pub mod booking_card;
pub mod movie_card;
pub mod navbar;
pub mod seat_grid;
