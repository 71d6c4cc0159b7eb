//! Pricing service functions with database access.
//!
//! These functions resolve the active snapshot (cache first, database on a
//! miss) and hand it to the pure engine.

use rust_decimal::Decimal;
use sqlx::PgPool;
use std::sync::Arc;

use crate::cache::AppCache;
use crate::error::{AppError, Result};

use super::engine::{calculate_quote, QuoteInput, QuoteResult};
use super::queries;
use super::reference::{Material, MaterialId};
use super::snapshot::PricingSnapshot;

/// Snapshot to price against.
///
/// Reads the cached snapshot; on a miss, loads one from the database and
/// caches it.
pub async fn current_snapshot(pool: &PgPool, cache: &AppCache) -> Result<Arc<PricingSnapshot>> {
    if let Some(snapshot) = cache.current().await {
        tracing::debug!("Cache HIT for pricing snapshot");
        return Ok(snapshot);
    }

    tracing::debug!("Cache MISS for pricing snapshot");
    let snapshot = Arc::new(queries::load_snapshot(pool).await?);
    cache.store(snapshot.clone()).await;
    Ok(snapshot)
}

/// Price one order line.
///
/// # Arguments
/// * `pool` - Database connection pool
/// * `cache` - Application cache holding the snapshot
/// * `input` - Order line to price
pub async fn quote(pool: &PgPool, cache: &AppCache, input: &QuoteInput) -> Result<QuoteResult> {
    let snapshot = current_snapshot(pool, cache).await?;
    let result = calculate_quote(&snapshot, input)?;
    Ok(result)
}

/// Reload the snapshot from the database and make it current.
pub async fn refresh_snapshot(pool: &PgPool, cache: &AppCache) -> Result<Arc<PricingSnapshot>> {
    let snapshot = Arc::new(queries::load_snapshot(pool).await?);
    cache.store(snapshot.clone()).await;
    tracing::info!("Pricing snapshot refreshed on request");
    Ok(snapshot)
}

/// Name and ascending `(tier, price per meter)` list of a material.
pub fn material_tiers(
    snapshot: &PricingSnapshot,
    material_id: MaterialId,
) -> Result<(&Material, Vec<(i32, Decimal)>)> {
    let material = snapshot
        .reference
        .material(material_id)
        .ok_or_else(|| AppError::NotFound(format!("material {}", material_id)))?;

    Ok((material, snapshot.tables.price_tiers.tiers(material_id)))
}
