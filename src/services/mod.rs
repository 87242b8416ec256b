pub mod metadata;
pub mod providers;
pub mod recommendations;
pub mod refresh;
pub mod title_search;

pub use metadata::MetadataResolver;
pub use recommendations::{recommend, Lookup, RECOMMENDATION_COUNT};
pub use refresh::{RefreshControl, RefreshHandle, RefreshSettings, TopPicks, TopPicksSnapshot};
pub use title_search::search_titles;
