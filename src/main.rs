use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use marquee_api::{
    api::{create_router, AppState},
    cache::{create_redis_client, Cache},
    config::Config,
    models::DetailTier,
    services::{
        providers::{MetadataProvider, TmdbProvider},
        MetadataResolver, RefreshSettings, TopPicks,
    },
    store::CatalogStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("marquee_api=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    // The catalog is all-or-nothing: refuse to serve without it
    let artifact_root = config.artifact_root();
    let catalog = match CatalogStore::load(
        &artifact_root,
        &config.catalog_file,
        &config.similarity_file,
    ) {
        Ok(catalog) => Arc::new(catalog),
        Err(e) => {
            tracing::error!(
                error = %e,
                artifact_dir = %artifact_root.display(),
                "Failed to load model files"
            );
            return Err(e).context("failed to load catalog artifacts");
        }
    };

    let (cache, cache_handle) = match &config.redis_url {
        Some(url) => Cache::redis(create_redis_client(url)?),
        None => Cache::in_memory(),
    };

    let provider = TmdbProvider::new(
        config.tmdb_api_key.clone(),
        config.tmdb_api_url.clone(),
        config.tmdb_image_url.clone(),
        config.tmdb_language.clone(),
        config.request_timeout(),
    )?;

    tracing::info!(
        provider = provider.name(),
        cache = cache.backend_name(),
        ttl_secs = config.metadata_cache_ttl(),
        "Metadata resolver configured"
    );

    let resolver = MetadataResolver::new(Arc::new(provider), cache, config.metadata_cache_ttl());

    let top_picks = TopPicks::new(config.auto_refresh);
    let refresh_handle = top_picks.spawn(
        catalog.clone(),
        resolver.clone(),
        RefreshSettings {
            interval: config.refresh_interval(),
            sample_size: config.top_picks_count,
            tier: DetailTier::from_fast_mode(config.fast_mode),
        },
    );

    let state = AppState::new(catalog, resolver, top_picks, config.fast_mode);
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!(address = %addr, "Server running");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    refresh_handle.shutdown().await;
    cache_handle.shutdown().await;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
