//! Demo venues and show-time slots for the catalog screen.
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::draft::{ShowContext, TheaterSnapshot};
use crate::enrich::EnrichedMovie;
use crate::format::USD_TO_INR;
use crate::gateway::{Movie, Show};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theater {
    pub id: u32,
    pub name: String,
    pub location: String,
    pub total_seats: i64,
    pub rating: f32,
}

impl Theater {
    fn new(id: u32, name: &str, location: &str, total_seats: i64, rating: f32) -> Self {
        Self {
            id,
            name: name.to_string(),
            location: location.to_string(),
            total_seats,
            rating,
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> TheaterSnapshot {
        TheaterSnapshot {
            name: self.name.clone(),
            location: self.location.clone(),
            total_seats: self.total_seats,
            rating: self.rating,
        }
    }
}

#[must_use]
pub fn demo_theaters() -> Vec<Theater> {
    vec![
        Theater::new(1, "Cineplex Downtown", "123 Main Street, Downtown", 180, 4.8),
        Theater::new(2, "Starlight Cinema", "456 Oak Avenue, Central Plaza", 220, 4.6),
        Theater::new(3, "Galaxy Multiplex", "789 Pine Street, Mall Complex", 300, 4.7),
        Theater::new(4, "Metro Cinema Palace", "321 Broadway, Arts District", 150, 4.5),
        Theater::new(5, "Sunset Drive-In", "654 Highway 101, Outskirts", 200, 4.4),
        Theater::new(6, "Royal Theater", "987 King Street, Historic District", 250, 4.9),
    ]
}

#[must_use]
pub fn find_theater(id: u32) -> Option<Theater> {
    demo_theaters().into_iter().find(|theater| theater.id == id)
}

pub const BASE_SHOW_TIMES: [&str; 5] = ["10:00 AM", "1:00 PM", "4:00 PM", "7:00 PM", "10:00 PM"];

/// 24-hour clock hour of a `7:00 PM` style time.
#[must_use]
pub fn show_hour(time: &str) -> Option<u32> {
    let (clock, meridiem) = time.trim().split_once(' ')?;
    let hour: u32 = clock.split(':').next()?.parse().ok()?;
    if !(1..=12).contains(&hour) {
        return None;
    }
    match meridiem.to_ascii_uppercase().as_str() {
        "AM" if hour == 12 => Some(0),
        "AM" => Some(hour),
        "PM" if hour == 12 => Some(12),
        "PM" => Some(hour + 12),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowSlot {
    pub time: String,
    pub available: bool,
    pub price: i64,
}

/// Slots still ahead of `current_hour`, with seeded availability (about 70%)
/// and a price between 250 and 449.
#[must_use]
pub fn show_slots(current_hour: u32, seed: u64) -> Vec<ShowSlot> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    BASE_SHOW_TIMES
        .iter()
        .filter(|time| show_hour(time).is_some_and(|hour| hour > current_hour))
        .map(|time| ShowSlot {
            time: (*time).to_string(),
            available: rng.gen_range(0..100) >= 30,
            price: rng.gen_range(250..450),
        })
        .collect()
}

/// Hand-off context for a demo slot.
#[must_use]
pub fn slot_context(movie: &Movie, theater: &Theater, slot: &ShowSlot) -> ShowContext {
    ShowContext {
        movie_id: movie.id,
        movie_title: movie.title.clone(),
        theater: theater.snapshot(),
        show_time: slot.time.clone(),
        price: slot.price,
    }
}

/// Seat count assumed for backend venues that do not report one.
pub const DEFAULT_VENUE_SEATS: i64 = 100;

/// Hand-off context for a backend show. Backend prices are USD; venues
/// without a seat count get `default_seats`.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn remote_show_context(movie: &Movie, show: &Show, default_seats: i64) -> ShowContext {
    let price = (show.price * USD_TO_INR).round();
    ShowContext {
        movie_id: movie.id,
        movie_title: movie.title.clone(),
        theater: TheaterSnapshot {
            name: show.theater.clone(),
            location: String::new(),
            total_seats: show.total_seats.unwrap_or(default_seats),
            rating: 0.0,
        },
        show_time: show.showtime.clone(),
        price: if price.is_finite() { price as i64 } else { 0 },
    }
}

fn movie_genre_names(movie: &EnrichedMovie) -> impl Iterator<Item = &str> {
    std::iter::once(movie.movie.genre.as_str())
        .chain(movie.genres.iter().map(String::as_str))
        .filter(|genre| !genre.is_empty())
}

/// Every genre in `movies`, first-seen order, compared case-insensitively.
#[must_use]
pub fn movie_genres(movies: &[EnrichedMovie]) -> Vec<String> {
    let mut genres: Vec<String> = Vec::new();
    for genre in movies.iter().flat_map(movie_genre_names) {
        if !genres.iter().any(|known| known.eq_ignore_ascii_case(genre)) {
            genres.push(genre.to_string());
        }
    }
    genres
}

/// Movies whose title, genre, plot or cast contains `query` (case-insensitive)
/// and, when `genre` is given, that carry that genre. A blank query or genre
/// matches everything.
#[must_use]
pub fn filter_movies(movies: &[EnrichedMovie], query: &str, genre: Option<&str>) -> Vec<EnrichedMovie> {
    let query = query.trim().to_lowercase();
    let genre = genre.map(str::trim).filter(|g| !g.is_empty());
    movies
        .iter()
        .filter(|movie| {
            let matches_query = query.is_empty()
                || movie.movie.title.to_lowercase().contains(&query)
                || movie_genre_names(movie).any(|g| g.to_lowercase().contains(&query))
                || movie.plot.to_lowercase().contains(&query)
                || movie.cast.iter().any(|actor| actor.to_lowercase().contains(&query));
            let matches_genre = genre.is_none_or(|wanted| {
                movie_genre_names(movie).any(|g| g.eq_ignore_ascii_case(wanted))
            });
            matches_query && matches_genre
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrich::MovieMetadata;

    #[test]
    fn six_demo_theaters_with_distinct_ids() {
        let theaters = demo_theaters();
        assert_eq!(theaters.len(), 6);
        assert_eq!(find_theater(6).map(|t| t.total_seats), Some(250));
        assert!(find_theater(7).is_none());
    }

    #[test]
    fn meridiem_hours() {
        assert_eq!(show_hour("10:00 AM"), Some(10));
        assert_eq!(show_hour("1:00 PM"), Some(13));
        assert_eq!(show_hour("12:00 PM"), Some(12));
        assert_eq!(show_hour("12:30 AM"), Some(0));
        assert_eq!(show_hour("19:00"), None);
    }

    #[test]
    fn only_later_slots_are_offered() {
        let slots = show_slots(14, 7);
        let times: Vec<&str> = slots.iter().map(|s| s.time.as_str()).collect();
        assert_eq!(times, vec!["4:00 PM", "7:00 PM", "10:00 PM"]);
        assert!(slots.iter().all(|s| (250..450).contains(&s.price)));
        assert_eq!(show_slots(14, 7), slots);
        assert!(show_slots(22, 7).is_empty());
    }

    #[test]
    fn backend_prices_convert_to_rupees() {
        let movie = Movie {
            id: 1,
            title: "Demo Movie 1".into(),
            genre: String::new(),
            duration: 0,
            rating: String::new(),
            description: String::new(),
            poster_url: None,
            release_date: None,
        };
        let show = Show {
            id: 1,
            movie: 1,
            theater: "Demo Theater 1".into(),
            showtime: "2026-10-17T14:00:00Z".into(),
            price: 12.5,
            available_seats: 50,
            total_seats: None,
            booked_seat_numbers: Vec::new(),
        };
        let context = remote_show_context(&movie, &show, DEFAULT_VENUE_SEATS);
        assert_eq!(context.price, 1038);
        assert_eq!(context.theater.total_seats, 100);
    }

    fn listed(id: u64, title: &str, genre: &str, metadata: Option<MovieMetadata>) -> EnrichedMovie {
        let movie = Movie {
            id,
            title: title.into(),
            genre: genre.into(),
            duration: 120,
            rating: String::new(),
            description: String::new(),
            poster_url: None,
            release_date: None,
        };
        EnrichedMovie::merge(movie, metadata)
    }

    fn catalog() -> Vec<EnrichedMovie> {
        vec![
            listed(1, "Dune", "Sci-Fi", Some(MovieMetadata {
                genres: vec!["Sci-Fi".into(), "Adventure".into()],
                cast: vec!["Zendaya".into()],
                plot: Some("A desert planet.".into()),
                ..MovieMetadata::default()
            })),
            listed(2, "Demo Movie 2", "Comedy", None),
            listed(3, "Heat", "", None),
        ]
    }

    fn ids(movies: &[EnrichedMovie]) -> Vec<u64> {
        movies.iter().map(|m| m.movie.id).collect()
    }

    #[test]
    fn search_matches_title_genre_plot_and_cast() {
        let movies = catalog();
        assert_eq!(ids(&filter_movies(&movies, "", None)), vec![1, 2, 3]);
        assert_eq!(ids(&filter_movies(&movies, "  heat ", None)), vec![3]);
        assert_eq!(ids(&filter_movies(&movies, "comedy", None)), vec![2]);
        assert_eq!(ids(&filter_movies(&movies, "DESERT", None)), vec![1]);
        assert_eq!(ids(&filter_movies(&movies, "zend", None)), vec![1]);
        assert!(filter_movies(&movies, "western", None).is_empty());
    }

    #[test]
    fn genre_filter_is_exact_and_combines_with_search() {
        let movies = catalog();
        assert_eq!(ids(&filter_movies(&movies, "", Some("adventure"))), vec![1]);
        assert!(filter_movies(&movies, "", Some("Adv")).is_empty());
        assert_eq!(ids(&filter_movies(&movies, "", Some(""))), vec![1, 2, 3]);
        assert!(filter_movies(&movies, "heat", Some("Comedy")).is_empty());
        assert_eq!(movie_genres(&movies), vec!["Sci-Fi", "Adventure", "Comedy"]);
    }
}
