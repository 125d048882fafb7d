//! Best-effort movie metadata enrichment.
//!
//! Providers are tried in order and the first one that knows the title wins;
//! a movie nobody knows still gets a placeholder poster and its own catalog
//! fields.
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::HashMap;

use crate::gateway::Movie;

const PLACEHOLDER_POSTER: &str = "https://via.placeholder.com/300x450/1a1a1a/ffffff";

/// Third-party facts about a title. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MovieMetadata {
    pub title: String,
    pub year: Option<i32>,
    pub genres: Vec<String>,
    pub director: Option<String>,
    pub cast: Vec<String>,
    pub plot: Option<String>,
    pub poster: Option<String>,
    pub imdb_rating: Option<f32>,
    pub runtime: Option<String>,
    pub awards: Option<String>,
}

#[async_trait(?Send)]
pub trait MetadataProvider {
    fn name(&self) -> &str;

    /// `None` when the provider has nothing for `title` or failed to answer.
    async fn lookup(&self, title: &str) -> Option<MovieMetadata>;
}

/// Ask each provider in turn; the first answer wins.
pub async fn first_success(
    providers: &[Box<dyn MetadataProvider>],
    title: &str,
) -> Option<MovieMetadata> {
    for provider in providers {
        if let Some(metadata) = provider.lookup(title).await {
            log::debug!("{} provided metadata for {title}", provider.name());
            return Some(metadata);
        }
    }
    None
}

#[must_use]
pub fn placeholder_poster(title: &str) -> String {
    format!("{PLACEHOLDER_POSTER}?text={}", urlencoding::encode(title))
}

/// Catalog movie plus whatever enrichment found.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedMovie {
    pub movie: Movie,
    pub poster: String,
    pub rating: String,
    pub plot: String,
    pub cast: Vec<String>,
    pub director: String,
    pub awards: Option<String>,
    pub genres: Vec<String>,
    pub metadata: Option<MovieMetadata>,
}

impl EnrichedMovie {
    /// Fill gaps in `movie` from `metadata`; catalog fields are only replaced
    /// where the metadata has a value.
    #[must_use]
    pub fn merge(movie: Movie, metadata: Option<MovieMetadata>) -> Self {
        let meta = metadata.clone().unwrap_or_default();
        let poster = meta
            .poster
            .or_else(|| movie.poster_url.clone())
            .unwrap_or_else(|| placeholder_poster(&movie.title));
        let rating = meta
            .imdb_rating
            .map_or_else(|| movie.rating.clone(), |r| r.to_string());
        let plot = meta
            .plot
            .filter(|plot| !plot.is_empty())
            .unwrap_or_else(|| movie.description.clone());
        let genres = if meta.genres.is_empty() {
            if movie.genre.is_empty() {
                Vec::new()
            } else {
                vec![movie.genre.clone()]
            }
        } else {
            meta.genres
        };
        Self {
            poster,
            rating,
            plot,
            cast: meta.cast,
            director: meta.director.unwrap_or_else(|| "Unknown".to_string()),
            awards: meta.awards,
            genres,
            metadata,
            movie,
        }
    }
}

/// Provider chain with a per-title cache of successful lookups.
pub struct Enricher {
    providers: Vec<Box<dyn MetadataProvider>>,
    cache: RefCell<HashMap<String, MovieMetadata>>,
}

impl Enricher {
    #[must_use]
    pub fn new(providers: Vec<Box<dyn MetadataProvider>>) -> Self {
        Self {
            providers,
            cache: RefCell::new(HashMap::new()),
        }
    }

    pub async fn metadata(&self, title: &str) -> Option<MovieMetadata> {
        if let Some(hit) = self.cache.borrow().get(title) {
            return Some(hit.clone());
        }
        let found = first_success(&self.providers, title).await?;
        self.cache
            .borrow_mut()
            .insert(title.to_string(), found.clone());
        Some(found)
    }

    pub async fn enrich(&self, movie: Movie) -> EnrichedMovie {
        let metadata = self.metadata(&movie.title).await;
        EnrichedMovie::merge(movie, metadata)
    }

    pub async fn enrich_all(&self, movies: Vec<Movie>) -> Vec<EnrichedMovie> {
        let mut enriched = Vec::with_capacity(movies.len());
        for movie in movies {
            enriched.push(self.enrich(movie).await);
        }
        enriched
    }

    pub fn clear_cache(&self) {
        self.cache.borrow_mut().clear();
    }

    #[must_use]
    pub fn cached(&self) -> usize {
        self.cache.borrow().len()
    }
}

impl std::fmt::Debug for Enricher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.providers.iter().map(|p| p.name()).collect();
        f.debug_struct("Enricher")
            .field("providers", &names)
            .field("cached", &self.cached())
            .finish()
    }
}

/// Metadata known ahead of time, keyed by exact title.
#[derive(Debug, Clone, Default)]
pub struct StaticMetadata {
    entries: HashMap<String, MovieMetadata>,
}

impl StaticMetadata {
    #[must_use]
    pub fn new(entries: impl IntoIterator<Item = MovieMetadata>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|meta| (meta.title.clone(), meta))
                .collect(),
        }
    }
}

#[async_trait(?Send)]
impl MetadataProvider for StaticMetadata {
    fn name(&self) -> &str {
        "static"
    }

    async fn lookup(&self, title: &str) -> Option<MovieMetadata> {
        self.entries.get(title).cloned()
    }
}

#[cfg(feature = "remote")]
pub use omdb::OmdbProvider;

#[cfg(feature = "remote")]
mod omdb {
    use async_trait::async_trait;
    use reqwest::Client;
    use serde::Deserialize;

    use super::{MetadataProvider, MovieMetadata};

    const OMDB_URL: &str = "https://www.omdbapi.com/";

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "PascalCase")]
    struct OmdbTitle {
        response: String,
        #[serde(default)]
        title: String,
        #[serde(default)]
        year: String,
        #[serde(default)]
        genre: String,
        #[serde(default)]
        director: String,
        #[serde(default)]
        actors: String,
        #[serde(default)]
        plot: String,
        #[serde(default)]
        poster: String,
        #[serde(default, rename = "imdbRating")]
        imdb_rating: String,
        #[serde(default)]
        runtime: String,
        #[serde(default)]
        awards: String,
        #[serde(default)]
        error: Option<String>,
    }

    fn known(value: String) -> Option<String> {
        (!value.is_empty() && value != "N/A").then_some(value)
    }

    fn split_list(value: &str) -> Vec<String> {
        if value.is_empty() || value == "N/A" {
            return Vec::new();
        }
        value.split(", ").map(str::to_string).collect()
    }

    impl From<OmdbTitle> for MovieMetadata {
        fn from(title: OmdbTitle) -> Self {
            Self {
                year: title.year.get(..4).and_then(|year| year.parse().ok()),
                genres: split_list(&title.genre),
                cast: split_list(&title.actors),
                imdb_rating: title.imdb_rating.parse().ok(),
                director: known(title.director),
                plot: known(title.plot),
                poster: known(title.poster),
                runtime: known(title.runtime),
                awards: known(title.awards),
                title: title.title,
            }
        }
    }

    /// OMDB title lookup (`?t=<title>&plot=full`).
    #[derive(Debug, Clone)]
    pub struct OmdbProvider {
        client: Client,
        api_key: String,
    }

    impl OmdbProvider {
        #[must_use]
        pub fn new(api_key: impl Into<String>) -> Self {
            Self {
                client: Client::new(),
                api_key: api_key.into(),
            }
        }

        async fn fetch(&self, title: &str) -> Result<OmdbTitle, reqwest::Error> {
            self.client
                .get(OMDB_URL)
                .query(&[("t", title), ("apikey", self.api_key.as_str()), ("plot", "full")])
                .send()
                .await?
                .error_for_status()?
                .json()
                .await
        }
    }

    #[async_trait(?Send)]
    impl MetadataProvider for OmdbProvider {
        fn name(&self) -> &str {
            "omdb"
        }

        async fn lookup(&self, title: &str) -> Option<MovieMetadata> {
            match self.fetch(title).await {
                Ok(found) if found.response == "True" => Some(found.into()),
                Ok(missing) => {
                    log::debug!(
                        "omdb has no entry for {title}: {}",
                        missing.error.unwrap_or_default()
                    );
                    None
                }
                Err(err) => {
                    log::warn!("omdb lookup for {title} failed: {err}");
                    None
                }
            }
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn omdb_fields_are_cleaned() {
            let raw: OmdbTitle = serde_json::from_str(
                r#"{"Response":"True","Title":"Dune","Year":"2021","Genre":"Action, Adventure",
                    "Director":"Denis Villeneuve","Actors":"Timothée Chalamet, Zendaya",
                    "Plot":"N/A","Poster":"N/A","imdbRating":"8.0","Runtime":"155 min","Awards":"N/A"}"#,
            )
            .unwrap();
            let meta = MovieMetadata::from(raw);
            assert_eq!(meta.year, Some(2021));
            assert_eq!(meta.genres, vec!["Action", "Adventure"]);
            assert_eq!(meta.cast.len(), 2);
            assert_eq!(meta.plot, None);
            assert_eq!(meta.poster, None);
            assert_eq!(meta.imdb_rating, Some(8.0));
        }
    }
}
