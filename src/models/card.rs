use serde::{Deserialize, Serialize};

use super::{DisplayRecord, Movie, MovieId};

const TMDB_SEARCH_URL: &str = "https://www.themoviedb.org/search";

/// A catalog movie paired with its resolved display metadata
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MovieCard {
    pub movie_id: MovieId,
    /// Title as it appears in the catalog
    pub catalog_title: String,
    pub details: DisplayRecord,
    /// TMDB search page for the displayed title
    pub tmdb_link: String,
}

impl MovieCard {
    pub fn new(movie: &Movie, details: DisplayRecord) -> Self {
        let tmdb_link = reqwest::Url::parse_with_params(TMDB_SEARCH_URL, &[("query", &details.title)])
            .map(String::from)
            .unwrap_or_else(|_| TMDB_SEARCH_URL.to_string());

        Self {
            movie_id: movie.id,
            catalog_title: movie.title.clone(),
            details,
            tmdb_link,
        }
    }
}
