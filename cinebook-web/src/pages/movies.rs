use cinebook_core::format::{format_currency, format_rupees, format_show_time};
use cinebook_core::{EnrichedMovie, Show, ShowSlot, Theater, filter_movies, movie_genres};
use yew::prelude::*;

use super::input_value;
use crate::components::movie_card::MovieCard;

/// A show-time the user clicked.
#[derive(Debug, Clone, PartialEq)]
pub enum ShowPick {
    /// A generated slot at one of the demo theaters.
    Demo {
        movie_id: u64,
        theater_id: u32,
        slot: ShowSlot,
    },
    /// A show listed by the backend.
    Remote { movie_id: u64, show: Show },
}

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub movies: Vec<EnrichedMovie>,
    #[prop_or_default]
    pub loading: bool,
    #[prop_or_default]
    pub error: Option<AttrValue>,
    /// Movie whose show-times are expanded.
    #[prop_or_default]
    pub expanded: Option<u64>,
    pub theaters: Vec<Theater>,
    pub slots: Vec<ShowSlot>,
    /// Backend shows for the expanded movie; empty in demo mode.
    #[prop_or_default]
    pub shows: Vec<Show>,
    /// Search text matched against title, genre, plot and cast.
    #[prop_or_default]
    pub query: String,
    /// Genre filter; empty means every genre.
    #[prop_or_default]
    pub genre: String,
    pub on_expand: Callback<u64>,
    pub on_pick: Callback<ShowPick>,
    #[prop_or_default]
    pub on_query: Callback<String>,
    #[prop_or_default]
    pub on_genre: Callback<String>,
}

fn demo_showtimes(p: &Props, movie_id: u64) -> Html {
    if p.slots.is_empty() {
        return html! { <p class="no-shows">{ "No more shows today. Check back tomorrow!" }</p> };
    }
    html! {
        <div class="theater-list">
            { for p.theaters.iter().map(|theater| html! {
                <div class="theater" key={theater.id.to_string()}>
                    <h4>{ theater.name.clone() }</h4>
                    <p class="location">{ theater.location.clone() }</p>
                    <div class="slots">
                        { for p.slots.iter().map(|slot| {
                            let onclick = {
                                let cb = p.on_pick.clone();
                                let pick = ShowPick::Demo {
                                    movie_id,
                                    theater_id: theater.id,
                                    slot: slot.clone(),
                                };
                                Callback::from(move |_| cb.emit(pick.clone()))
                            };
                            html! {
                                <button type="button" class="slot" disabled={!slot.available} {onclick}>
                                    <span class="slot-time">{ slot.time.clone() }</span>
                                    <span class="slot-price">{ format_rupees(slot.price) }</span>
                                </button>
                            }
                        }) }
                    </div>
                </div>
            }) }
        </div>
    }
}

fn remote_showtimes(p: &Props, movie_id: u64) -> Html {
    html! {
        <ul class="show-list">
            { for p.shows.iter().map(|show| {
                let onclick = {
                    let cb = p.on_pick.clone();
                    let pick = ShowPick::Remote { movie_id, show: show.clone() };
                    Callback::from(move |_| cb.emit(pick.clone()))
                };
                html! {
                    <li key={show.id.to_string()}>
                        <span class="show-theater">{ show.theater.clone() }</span>
                        <span class="show-time">{ format_show_time(&show.showtime) }</span>
                        <span class="show-price">{ format_currency(show.price) }</span>
                        <span class="show-seats">{ format!("{} seats left", show.available_seats) }</span>
                        <button type="button" class="btn-primary" disabled={show.available_seats <= 0} {onclick}>
                            { "Select Seats" }
                        </button>
                    </li>
                }
            }) }
        </ul>
    }
}

#[function_component(MoviesPage)]
pub fn movies_page(p: &Props) -> Html {
    if p.loading {
        return html! { <section class="panel"><p class="loading">{ "Loading movies..." }</p></section> };
    }
    let on_query = {
        let cb = p.on_query.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(value) = input_value(&e) {
                cb.emit(value);
            }
        })
    };
    let on_genre = {
        let cb = p.on_genre.clone();
        Callback::from(move |e: Event| {
            let value = e
                .target()
                .and_then(|t| wasm_bindgen::JsCast::dyn_into::<web_sys::HtmlSelectElement>(t).ok())
                .map(|select| select.value());
            if let Some(genre) = value {
                cb.emit(genre);
            }
        })
    };
    let visible = filter_movies(&p.movies, &p.query, Some(p.genre.as_str()));

    html! {
        <section class="panel movies">
            <h1>{ "Now Showing" }</h1>
            if let Some(error) = p.error.clone() {
                <p class="error" role="alert">{ error }</p>
            }
            <div class="movie-filters">
                <input
                    type="search"
                    class="movie-search"
                    placeholder="Search movies, genres, cast..."
                    value={p.query.clone()}
                    oninput={on_query}
                />
                <select class="genre-filter" onchange={on_genre}>
                    <option value="" selected={p.genre.is_empty()}>{ "All Genres" }</option>
                    { for movie_genres(&p.movies).into_iter().map(|genre| html! {
                        <option value={genre.clone()} selected={genre.eq_ignore_ascii_case(&p.genre)}>
                            { genre.clone() }
                        </option>
                    }) }
                </select>
            </div>
            if p.movies.is_empty() {
                <p class="empty">{ "No movies are showing right now." }</p>
            } else if visible.is_empty() {
                <p class="empty">{ "No movies match your search." }</p>
            }
            <div class="movie-grid">
                { for visible.iter().map(|movie| {
                    let id = movie.movie.id;
                    let expanded = p.expanded == Some(id);
                    html! {
                        <div class="movie-entry" key={id.to_string()}>
                            <MovieCard movie={movie.clone()} selected={expanded} on_select={p.on_expand.clone()} />
                            if expanded {
                                if p.shows.is_empty() {
                                    { demo_showtimes(p, id) }
                                } else {
                                    { remote_showtimes(p, id) }
                                }
                            }
                        </div>
                    }
                }) }
            </div>
        </section>
    }
}
