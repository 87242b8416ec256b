/// Movie metadata provider abstraction
///
/// The recommendation core only needs one thing from the outside world: turn
/// a catalog identifier into display metadata. Providers implement that call
/// and report failures as errors; substituting the sentinel record is the
/// resolver's job, not the provider's.
use crate::{
    error::AppResult,
    models::{DetailTier, DisplayRecord, MovieId},
};

pub mod tmdb;

pub use tmdb::TmdbProvider;

/// Trait for movie metadata providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Fetch display metadata for one movie at the requested detail tier
    async fn fetch_details(&self, id: MovieId, tier: DetailTier) -> AppResult<DisplayRecord>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
