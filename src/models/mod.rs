use serde::{Deserialize, Serialize};
use std::fmt::Display;

mod card;
mod movie;

pub use card::MovieCard;
pub use movie::{Movie, MovieId};

pub const NO_POSTER_PLACEHOLDER: &str = "https://via.placeholder.com/300x450?text=No+Poster";
pub const ERROR_POSTER_PLACEHOLDER: &str = "https://via.placeholder.com/300x450?text=Error";

const UNKNOWN_TITLE: &str = "Unknown Title";
const NOT_AVAILABLE: &str = "N/A";
const UNKNOWN_YEAR: &str = "----";

/// Fidelity of fetched display assets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetailTier {
    /// Smaller posters, quicker page loads
    Fast,
    /// Full-size posters
    Full,
}

impl DetailTier {
    /// Maps the fast-mode toggle onto a tier
    pub fn from_fast_mode(fast_mode: bool) -> Self {
        if fast_mode {
            DetailTier::Fast
        } else {
            DetailTier::Full
        }
    }

    /// TMDB image size segment for posters at this tier
    pub fn poster_size(&self) -> &'static str {
        match self {
            DetailTier::Fast => "w300",
            DetailTier::Full => "w500",
        }
    }
}

impl Display for DetailTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DetailTier::Fast => write!(f, "fast"),
            DetailTier::Full => write!(f, "full"),
        }
    }
}

/// Human-facing metadata for one movie
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DisplayRecord {
    pub title: String,
    pub poster: String,
    pub rating: String,
    pub year: String,
    pub genres: String,
}

impl DisplayRecord {
    /// Fixed record substituted whenever metadata resolution fails
    pub fn sentinel() -> Self {
        Self {
            title: "Error".to_string(),
            poster: ERROR_POSTER_PLACEHOLDER.to_string(),
            rating: NOT_AVAILABLE.to_string(),
            year: UNKNOWN_YEAR.to_string(),
            genres: NOT_AVAILABLE.to_string(),
        }
    }

    pub fn is_sentinel(&self) -> bool {
        *self == Self::sentinel()
    }
}

// ============================================================================
// TMDB API Types
// ============================================================================

/// API response from GET /movie/{id}
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovieDetails {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Kept as the JSON number TMDB sent so it renders without rounding
    #[serde(default)]
    pub vote_average: Option<serde_json::Number>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub genres: Vec<TmdbGenre>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbGenre {
    pub name: String,
}

impl TmdbMovieDetails {
    /// Converts the raw payload into a display record
    ///
    /// `image_url` is the TMDB image base (e.g. `https://image.tmdb.org/t/p`);
    /// the poster size segment comes from the tier.
    pub fn into_display_record(self, image_url: &str, tier: DetailTier) -> DisplayRecord {
        let title = self
            .title
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| UNKNOWN_TITLE.to_string());

        let poster = match self.poster_path.as_deref().map(|p| p.trim_start_matches('/')) {
            Some(path) if !path.is_empty() => format!(
                "{}/{}/{}",
                image_url.trim_end_matches('/'),
                tier.poster_size(),
                path
            ),
            _ => NO_POSTER_PLACEHOLDER.to_string(),
        };

        let rating = self
            .vote_average
            .map(|v| v.to_string())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());

        let year = match self.release_date.as_deref() {
            Some(date) if !date.is_empty() => date.chars().take(4).collect(),
            _ => UNKNOWN_YEAR.to_string(),
        };

        let genres = self
            .genres
            .iter()
            .map(|g| g.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let genres = if genres.is_empty() {
            NOT_AVAILABLE.to_string()
        } else {
            genres
        };

        DisplayRecord {
            title,
            poster,
            rating,
            year,
            genres,
        }
    }
}
