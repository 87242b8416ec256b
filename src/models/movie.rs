use serde::{Deserialize, Serialize};

/// TMDB movie identifier, used as the key for metadata lookups
pub type MovieId = u64;

/// A movie known to the catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Movie {
    /// External metadata key
    #[serde(rename = "movie_id", alias = "id")]
    pub id: MovieId,
    /// Display title, unique within the catalog for user-facing lookup
    pub title: String,
}

impl Movie {
    /// Creates a new movie entry
    pub fn new(id: MovieId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
        }
    }
}
