use std::sync::Arc;

use crate::{
    cache::{Cache, CacheKey},
    cached,
    error::AppResult,
    models::{DetailTier, DisplayRecord, MovieId},
    services::providers::MetadataProvider,
};

/// Resolves movie identifiers into display records
///
/// Resolution never fails from the caller's point of view: any provider
/// error is replaced by [`DisplayRecord::sentinel`]. Successful lookups are
/// cached per `(id, tier)`; failures are not, so the next interaction tries
/// the provider again.
#[derive(Clone)]
pub struct MetadataResolver {
    provider: Arc<dyn MetadataProvider>,
    cache: Cache,
    ttl: u64,
}

impl MetadataResolver {
    pub fn new(provider: Arc<dyn MetadataProvider>, cache: Cache, ttl: u64) -> Self {
        Self {
            provider,
            cache,
            ttl,
        }
    }

    /// Resolves one movie, substituting the sentinel record on failure
    pub async fn resolve(&self, id: MovieId, tier: DetailTier) -> DisplayRecord {
        match self.fetch_through_cache(id, tier).await {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    movie_id = id,
                    tier = %tier,
                    "Metadata resolution failed, using fallback record"
                );
                DisplayRecord::sentinel()
            }
        }
    }

    /// Resolves a batch concurrently, returning records in input order
    pub async fn resolve_all(&self, ids: &[MovieId], tier: DetailTier) -> Vec<DisplayRecord> {
        let tasks: Vec<_> = ids
            .iter()
            .map(|&id| {
                let resolver = self.clone();
                tokio::spawn(async move { resolver.resolve(id, tier).await })
            })
            .collect();

        let mut records = Vec::with_capacity(tasks.len());
        for task in tasks {
            match task.await {
                Ok(record) => records.push(record),
                Err(e) => {
                    tracing::error!(error = %e, "Metadata task join error");
                    records.push(DisplayRecord::sentinel());
                }
            }
        }

        records
    }

    async fn fetch_through_cache(&self, id: MovieId, tier: DetailTier) -> AppResult<DisplayRecord> {
        cached!(
            self.cache,
            CacheKey::Metadata { id, tier },
            self.ttl,
            async move { self.provider.fetch_details(id, tier).await }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::services::providers::MockMetadataProvider;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn record(id: MovieId, tier: DetailTier) -> DisplayRecord {
        DisplayRecord {
            title: format!("Movie {}", id),
            poster: format!("https://image.tmdb.org/t/p/{}/{}.jpg", tier.poster_size(), id),
            rating: "7.0".to_string(),
            year: "2001".to_string(),
            genres: "Drama".to_string(),
        }
    }

    fn resolver(provider: impl MetadataProvider + 'static) -> MetadataResolver {
        let (cache, _handle) = Cache::in_memory();
        MetadataResolver::new(Arc::new(provider), cache, 3600)
    }

    #[tokio::test]
    async fn test_resolve_success_is_cached() {
        let mut provider = MockMetadataProvider::new();
        provider
            .expect_fetch_details()
            .times(1)
            .returning(|id, tier| Ok(record(id, tier)));
        let resolver = resolver(provider);

        let miss = resolver.resolve(7, DetailTier::Fast).await;
        let hit = resolver.resolve(7, DetailTier::Fast).await;

        assert_eq!(miss, record(7, DetailTier::Fast));
        assert_eq!(hit, miss);
    }

    #[tokio::test]
    async fn test_resolve_failure_returns_sentinel() {
        let mut provider = MockMetadataProvider::new();
        provider
            .expect_fetch_details()
            .returning(|_, _| Err(AppError::ExternalApi("boom".to_string())));
        let resolver = resolver(provider);

        let result = resolver.resolve(7, DetailTier::Full).await;

        assert!(result.is_sentinel());
        assert_eq!(result.rating, "N/A");
        assert_eq!(result.year, "----");
        assert_eq!(result.genres, "N/A");
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let mut provider = MockMetadataProvider::new();
        provider.expect_fetch_details().returning(move |id, tier| {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(AppError::ExternalApi("timeout".to_string()))
            } else {
                Ok(record(id, tier))
            }
        });
        let resolver = resolver(provider);

        assert!(resolver.resolve(3, DetailTier::Fast).await.is_sentinel());
        assert_eq!(
            resolver.resolve(3, DetailTier::Fast).await,
            record(3, DetailTier::Fast)
        );
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_tiers_are_cached_separately() {
        let mut provider = MockMetadataProvider::new();
        provider
            .expect_fetch_details()
            .times(2)
            .returning(|id, tier| Ok(record(id, tier)));
        let resolver = resolver(provider);

        let fast = resolver.resolve(1, DetailTier::Fast).await;
        let full = resolver.resolve(1, DetailTier::Full).await;
        resolver.resolve(1, DetailTier::Fast).await;
        resolver.resolve(1, DetailTier::Full).await;

        assert_ne!(fast.poster, full.poster);
    }

    #[tokio::test]
    async fn test_resolve_all_partial_failure() {
        let mut provider = MockMetadataProvider::new();
        provider.expect_fetch_details().returning(|id, tier| {
            if id == 2 {
                Err(AppError::ExternalApi("missing".to_string()))
            } else {
                Ok(record(id, tier))
            }
        });
        let resolver = resolver(provider);

        let records = resolver.resolve_all(&[1, 2, 3], DetailTier::Fast).await;

        assert_eq!(records.len(), 3);
        assert_eq!(records[0], record(1, DetailTier::Fast));
        assert!(records[1].is_sentinel());
        assert_eq!(records[2], record(3, DetailTier::Fast));
    }

    /// Answers slower for smaller ids, so completion order is reversed
    struct SlowProvider;

    #[async_trait::async_trait]
    impl MetadataProvider for SlowProvider {
        async fn fetch_details(&self, id: MovieId, tier: DetailTier) -> AppResult<DisplayRecord> {
            tokio::time::sleep(Duration::from_millis(60 - id * 10)).await;
            Ok(record(id, tier))
        }

        fn name(&self) -> &'static str {
            "slow"
        }
    }

    #[tokio::test]
    async fn test_resolve_all_preserves_rank_order() {
        let resolver = resolver(SlowProvider);

        let records = resolver.resolve_all(&[1, 2, 3, 4, 5], DetailTier::Full).await;

        let titles: Vec<&str> = records.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["Movie 1", "Movie 2", "Movie 3", "Movie 4", "Movie 5"]
        );
    }

    #[tokio::test]
    async fn test_resolve_all_empty() {
        let resolver = resolver(MockMetadataProvider::new());
        assert!(resolver.resolve_all(&[], DetailTier::Fast).await.is_empty());
    }
}
