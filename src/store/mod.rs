//! Load-time storage for the movie catalog and its similarity matrix.
//!
//! Both artifacts are produced offline and read once at startup. Anything
//! that goes wrong here is fatal: the server refuses to start rather than
//! serve a partial catalog.

pub mod artifacts;
pub mod catalog;

pub use artifacts::{chunk_path, ensure_assembled, Assembly};
pub use catalog::{CatalogStore, SimilarityMatrix};

/// Errors raised while loading the catalog artifacts
#[derive(thiserror::Error, Debug)]
pub enum CatalogError {
    #[error("Artifact not found: {path}")]
    MissingArtifact { path: String },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Corrupt artifact {path}: {source}")]
    Corrupt {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Catalog is empty")]
    EmptyCatalog,

    #[error("Catalog has {movies} movies but the similarity matrix has {rows} rows")]
    DimensionMismatch { movies: usize, rows: usize },

    #[error("Similarity row {row} has {found} columns, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Similarity score at ({row}, {column}) is not a finite number")]
    NonFiniteScore { row: usize, column: usize },
}

impl CatalogError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        CatalogError::Io {
            path: path.display().to_string(),
            source,
        }
    }
}
