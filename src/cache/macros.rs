/// A macro to wrap a fallible computation with a read-through cache.
///
/// Checks the cache first and returns the hit. On a miss, or when the cache
/// itself fails to answer, executes the block, stores a successful result in
/// the background, and returns it. Errors from the block propagate with `?`
/// and are never cached.
///
/// # Arguments
/// * `$cache`: A [`Cache`](crate::cache::Cache) handle.
/// * `$key`: The [`CacheKey`](crate::cache::CacheKey) for the value.
/// * `$ttl`: The time-to-live for the cached value in seconds.
/// * `$block`: A future computing the value on a miss.
///
/// # Example
/// ```rust,ignore
/// async fn lookup(&self, id: MovieId, tier: DetailTier) -> AppResult<DisplayRecord> {
///     cached!(self.cache, CacheKey::Metadata { id, tier }, 3600, async move {
///         self.provider.fetch_details(id, tier).await
///     })
/// }
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        let key = $key;
        match $cache.get_from_cache(&key).await {
            Ok(Some(cached)) => Ok(cached),
            lookup => {
                if let Err(e) = lookup {
                    tracing::warn!(error = %e, key = %key, "Cache read failed, treating as miss");
                }
                let value = $block.await?;
                $cache.set_in_background(&key, &value, $ttl);
                Ok(value)
            }
        }
    }};
}
