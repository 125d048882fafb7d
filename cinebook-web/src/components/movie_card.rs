use cinebook_core::EnrichedMovie;
use cinebook_core::format::format_duration;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub movie: EnrichedMovie,
    #[prop_or_default]
    pub selected: bool,
    pub on_select: Callback<u64>,
}

#[function_component(MovieCard)]
pub fn movie_card(p: &Props) -> Html {
    let movie = &p.movie;
    let onclick = {
        let cb = p.on_select.clone();
        let id = movie.movie.id;
        Callback::from(move |_| cb.emit(id))
    };
    let class = if p.selected {
        "movie-card selected"
    } else {
        "movie-card"
    };
    let duration = format_duration(movie.movie.duration);
    html! {
        <article {class} data-movie={movie.movie.id.to_string()}>
            <img class="poster" src={movie.poster.clone()} alt={movie.movie.title.clone()} loading="lazy" />
            <div class="movie-card-body">
                <h3>{ movie.movie.title.clone() }</h3>
                <p class="movie-meta">
                    <span class="genres">{ movie.genres.join(", ") }</span>
                    if !duration.is_empty() {
                        <span class="duration">{ duration }</span>
                    }
                    if !movie.rating.is_empty() {
                        <span class="rating">{ format!("★ {}", movie.rating) }</span>
                    }
                </p>
                if !movie.plot.is_empty() {
                    <p class="plot">{ movie.plot.clone() }</p>
                }
                <p class="director">{ format!("Director: {}", movie.director) }</p>
                <button type="button" class="btn-primary" {onclick}>
                    { if p.selected { "Hide Showtimes" } else { "View Showtimes" } }
                </button>
            </div>
        </article>
    }
}
