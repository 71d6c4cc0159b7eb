//! In-memory caching using moka
//!
//! Holds the current pricing snapshot. Every quote reads the cached
//! snapshot; a background warmer replaces it periodically so edits to the
//! pricing tables reach the engine without a restart.

use moka::future::Cache;
use serde::Serialize;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tracing::{info, warn};

use crate::pricing::queries;
use crate::pricing::PricingSnapshot;

const SNAPSHOT_KEY: &str = "pricing";

/// Application cache holding the active pricing snapshot
#[derive(Clone)]
pub struct AppCache {
    /// Pricing snapshot (singleton)
    pub snapshots: Cache<String, Arc<PricingSnapshot>>,
}

impl AppCache {
    /// Create a cache whose snapshot expires after `ttl`
    pub fn new(ttl: Duration) -> Self {
        Self {
            snapshots: Cache::builder()
                .max_capacity(1)
                .time_to_live(ttl)
                .build(),
        }
    }

    /// Snapshot currently in use, if one is cached
    pub async fn current(&self) -> Option<Arc<PricingSnapshot>> {
        self.snapshots.get(SNAPSHOT_KEY).await
    }

    /// Swap in a new snapshot. Calculations holding the old one finish with it.
    pub async fn store(&self, snapshot: Arc<PricingSnapshot>) {
        self.snapshots
            .insert(SNAPSHOT_KEY.to_string(), snapshot)
            .await;
    }

    /// Get cache statistics for monitoring
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            snapshot_entries: self.snapshots.entry_count(),
        }
    }

    /// Invalidate all caches
    pub fn invalidate_all(&self) {
        self.snapshots.invalidate_all();
        info!("All caches invalidated");
    }
}

impl Default for AppCache {
    fn default() -> Self {
        // Twice the default warmer period
        Self::new(Duration::from_secs(20 * 60))
    }
}

/// Cache statistics for monitoring endpoint
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub snapshot_entries: u64,
}

/// Start background snapshot warmer
///
/// Loads a snapshot on startup and reloads it every `period`.
pub async fn start_snapshot_warmer(cache: AppCache, db: PgPool, period: Duration) {
    let mut interval = interval(period);
    loop {
        // First tick completes immediately
        interval.tick().await;
        warm_snapshot(&cache, &db).await;
    }
}

/// Load a fresh snapshot from the database into the cache
async fn warm_snapshot(cache: &AppCache, db: &PgPool) {
    info!("Refreshing pricing snapshot...");

    match queries::load_snapshot(db).await {
        Ok(snapshot) => {
            cache.store(Arc::new(snapshot)).await;
            info!("Pricing snapshot refreshed. Stats: {:?}", cache.stats());
        }
        Err(e) => warn!("Failed to refresh pricing snapshot: {}", e),
    }
}
