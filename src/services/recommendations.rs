use std::cmp::Ordering;

use crate::{models::Movie, store::CatalogStore};

/// Number of similar movies returned per lookup
pub const RECOMMENDATION_COUNT: usize = 5;

/// Outcome of a recommendation lookup
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    /// Most similar movies, best first
    Found(Vec<Movie>),
    /// The title is not in the catalog
    NotFound,
}

impl Lookup {
    /// Recommended movies; empty when the title was not found
    pub fn movies(&self) -> &[Movie] {
        match self {
            Lookup::Found(movies) => movies,
            Lookup::NotFound => &[],
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Lookup::NotFound)
    }
}

/// Column indices of a similarity row ordered by descending score
///
/// The sort is stable: equal scores keep ascending column order.
pub fn rank_row(row: &[f64]) -> Vec<usize> {
    let mut ranked: Vec<(usize, f64)> = row.iter().copied().enumerate().collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    ranked.into_iter().map(|(index, _)| index).collect()
}

/// Finds the movies most similar to `title`
///
/// The title must match a catalog entry exactly. The full row is ranked and
/// sorted positions `1..=RECOMMENDATION_COUNT` are returned; position 0 is
/// taken to be the movie itself and skipped by position, not by identity.
pub fn recommend(catalog: &CatalogStore, title: &str) -> Lookup {
    let Some(index) = catalog.position_of(title) else {
        tracing::info!(title = %title, "Title not found in catalog");
        return Lookup::NotFound;
    };

    let Some(row) = catalog.similarity_row(index) else {
        return Lookup::NotFound;
    };

    let movies: Vec<Movie> = rank_row(row)
        .into_iter()
        .skip(1)
        .take(RECOMMENDATION_COUNT)
        .filter_map(|column| catalog.movie(column).cloned())
        .collect();

    tracing::debug!(
        title = %title,
        index = index,
        results = movies.len(),
        "Recommendations ranked"
    );

    Lookup::Found(movies)
}
