use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use super::{artifacts::ensure_assembled, CatalogError};
use crate::models::Movie;

/// Square matrix of pairwise similarity scores, one row per catalog entry
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct SimilarityMatrix {
    rows: Vec<Vec<f64>>,
}

impl SimilarityMatrix {
    pub fn new(rows: Vec<Vec<f64>>) -> Self {
        Self { rows }
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Scores of entry `index` against every entry, in catalog order
    pub fn row(&self, index: usize) -> Option<&[f64]> {
        self.rows.get(index).map(Vec::as_slice)
    }
}

/// Immutable catalog of movies plus the similarity matrix indexed alongside it
///
/// Built once at startup and shared read-only for the process lifetime.
#[derive(Debug)]
pub struct CatalogStore {
    movies: Vec<Movie>,
    similarity: SimilarityMatrix,
    /// Title → first catalog index carrying that title
    title_index: HashMap<String, usize>,
}

impl CatalogStore {
    /// Builds a store after checking that the matrix is `N × N` for `N` movies
    pub fn new(movies: Vec<Movie>, similarity: SimilarityMatrix) -> Result<Self, CatalogError> {
        if movies.is_empty() {
            return Err(CatalogError::EmptyCatalog);
        }

        if similarity.len() != movies.len() {
            return Err(CatalogError::DimensionMismatch {
                movies: movies.len(),
                rows: similarity.len(),
            });
        }

        for (row_index, row) in similarity.rows.iter().enumerate() {
            if row.len() != movies.len() {
                return Err(CatalogError::RaggedRow {
                    row: row_index,
                    expected: movies.len(),
                    found: row.len(),
                });
            }
            if let Some(column) = row.iter().position(|score| !score.is_finite()) {
                return Err(CatalogError::NonFiniteScore {
                    row: row_index,
                    column,
                });
            }
        }

        let mut title_index = HashMap::with_capacity(movies.len());
        for (index, movie) in movies.iter().enumerate() {
            title_index.entry(movie.title.clone()).or_insert(index);
        }

        Ok(Self {
            movies,
            similarity,
            title_index,
        })
    }

    /// Loads both artifacts from `dir`, reassembling chunked files first
    pub fn load(dir: &Path, catalog_file: &str, similarity_file: &str) -> Result<Self, CatalogError> {
        let catalog_path = dir.join(catalog_file);
        let similarity_path = dir.join(similarity_file);

        tracing::info!(
            catalog = %catalog_path.display(),
            similarity = %similarity_path.display(),
            "Loading catalog artifacts"
        );

        ensure_assembled(&catalog_path)?;
        ensure_assembled(&similarity_path)?;

        let movies: Vec<Movie> = read_json(&catalog_path)?;
        let similarity: SimilarityMatrix = read_json(&similarity_path)?;

        let store = Self::new(movies, similarity)?;

        tracing::info!(movies = store.len(), "Catalog loaded");

        Ok(store)
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    /// All movies in catalog order
    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn movie(&self, index: usize) -> Option<&Movie> {
        self.movies.get(index)
    }

    /// Index of the first movie whose title matches exactly
    pub fn position_of(&self, title: &str) -> Option<usize> {
        self.title_index.get(title).copied()
    }

    pub fn similarity_row(&self, index: usize) -> Option<&[f64]> {
        self.similarity.row(index)
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, CatalogError> {
    let bytes = fs::read(path).map_err(|e| CatalogError::io(path, e))?;
    serde_json::from_slice(&bytes).map_err(|e| CatalogError::Corrupt {
        path: path.display().to_string(),
        source: e,
    })
}
