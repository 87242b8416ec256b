//! Periodically refreshed "top picks" panel.
//!
//! A background task samples random catalog entries on a fixed interval,
//! resolves their metadata, and publishes a snapshot for the page to poll.
//! The panel is decoration: it can be paused, and when it fails it shows
//! nothing plus a warning while the recommendation flow carries on.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, RwLock};
use tokio::time::MissedTickBehavior;

use crate::{
    error::{AppError, AppResult},
    models::{DetailTier, Movie, MovieCard},
    services::metadata::MetadataResolver,
    store::CatalogStore,
};

/// Process-wide pause toggle for the refresher
#[derive(Debug)]
pub struct RefreshControl {
    paused: AtomicBool,
}

impl RefreshControl {
    pub fn new(auto_refresh: bool) -> Self {
        Self {
            paused: AtomicBool::new(!auto_refresh),
        }
    }

    pub fn pause(&self) {
        self.paused.store(true, Ordering::SeqCst);
    }

    pub fn resume(&self) {
        self.paused.store(false, Ordering::SeqCst);
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }
}

/// How often and how much the panel refreshes
#[derive(Debug, Clone, Copy)]
pub struct RefreshSettings {
    pub interval: Duration,
    pub sample_size: usize,
    pub tier: DetailTier,
}

/// What the panel currently shows
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct TopPicksSnapshot {
    pub picks: Vec<MovieCard>,
    /// Set when the last refresh failed; the panel is then empty
    pub warning: Option<String>,
    pub refreshed_at: Option<DateTime<Utc>>,
}

/// Shared handle to the panel snapshot and its pause toggle
#[derive(Clone)]
pub struct TopPicks {
    snapshot: Arc<RwLock<TopPicksSnapshot>>,
    control: Arc<RefreshControl>,
}

/// Handle for stopping the refresh loop
pub struct RefreshHandle {
    shutdown_tx: mpsc::Sender<()>,
}

impl RefreshHandle {
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
        tracing::info!("Top picks refresher shutdown signal sent");
    }
}

impl TopPicks {
    pub fn new(auto_refresh: bool) -> Self {
        Self {
            snapshot: Arc::new(RwLock::new(TopPicksSnapshot::default())),
            control: Arc::new(RefreshControl::new(auto_refresh)),
        }
    }

    pub fn control(&self) -> &RefreshControl {
        &self.control
    }

    pub async fn snapshot(&self) -> TopPicksSnapshot {
        self.snapshot.read().await.clone()
    }

    /// Samples, resolves and publishes one panel
    pub async fn refresh_once(
        &self,
        catalog: &CatalogStore,
        resolver: &MetadataResolver,
        settings: &RefreshSettings,
    ) {
        let snapshot = match sample_movies(catalog, settings.sample_size) {
            Ok(movies) => {
                let ids: Vec<_> = movies.iter().map(|m| m.id).collect();
                let records = resolver.resolve_all(&ids, settings.tier).await;
                let picks = movies
                    .iter()
                    .zip(records)
                    .map(|(movie, details)| MovieCard::new(movie, details))
                    .collect();

                TopPicksSnapshot {
                    picks,
                    warning: None,
                    refreshed_at: Some(Utc::now()),
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to build top picks");
                TopPicksSnapshot {
                    picks: Vec::new(),
                    warning: Some(format!("Could not load top picks: {}", e)),
                    refreshed_at: Some(Utc::now()),
                }
            }
        };

        *self.snapshot.write().await = snapshot;
    }

    /// Starts the background refresh loop
    ///
    /// Ticks while paused are skipped; the last snapshot stays visible.
    pub fn spawn(
        &self,
        catalog: Arc<CatalogStore>,
        resolver: MetadataResolver,
        settings: RefreshSettings,
    ) -> RefreshHandle {
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel(1);
        let panel = self.clone();

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(settings.interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            tracing::info!(
                interval_ms = settings.interval.as_millis() as u64,
                sample_size = settings.sample_size,
                "Top picks refresher started"
            );

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        if panel.control.is_paused() {
                            continue;
                        }
                        panel.refresh_once(&catalog, &resolver, &settings).await;
                    }
                    _ = shutdown_rx.recv() => {
                        tracing::info!("Top picks refresher stopped");
                        break;
                    }
                }
            }
        });

        RefreshHandle { shutdown_tx }
    }
}

/// Draws `count` distinct movies uniformly at random
fn sample_movies(catalog: &CatalogStore, count: usize) -> AppResult<Vec<Movie>> {
    if count > catalog.len() {
        return Err(AppError::InvalidInput(format!(
            "cannot sample {} movies from a catalog of {}",
            count,
            catalog.len()
        )));
    }

    let mut rng = rand::rng();
    Ok(rand::seq::index::sample(&mut rng, catalog.len(), count)
        .into_iter()
        .filter_map(|index| catalog.movie(index).cloned())
        .collect())
}
