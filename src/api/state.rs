use std::sync::Arc;

use crate::services::{MetadataResolver, TopPicks};
use crate::store::CatalogStore;

/// Shared application state
///
/// The catalog is read-only after startup and shared without locking.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogStore>,
    pub resolver: MetadataResolver,
    pub top_picks: TopPicks,
    /// Default for requests that do not choose a detail tier
    pub fast_mode: bool,
}

impl AppState {
    pub fn new(
        catalog: Arc<CatalogStore>,
        resolver: MetadataResolver,
        top_picks: TopPicks,
        fast_mode: bool,
    ) -> Self {
        Self {
            catalog,
            resolver,
            top_picks,
            fast_mode,
        }
    }
}
