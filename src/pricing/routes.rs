//! Pricing API route handlers

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};

use crate::error::Result;
use crate::AppState;

use super::reference::MaterialId;
use super::requests::QuoteRequest;
use super::responses::{
    MaterialTiersResponse, QuoteResponse, SnapshotResponse, TierPriceResponse,
};
use super::services;

/// Routes mounted under `/api/pricing`
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/quote", post(quote))
        .route("/materials/:id/tiers", get(material_tiers))
        .route("/snapshot", get(snapshot_status))
        .route("/snapshot/refresh", post(refresh_snapshot))
}

/// Calculate a quote for one order line
pub async fn quote(
    State(state): State<AppState>,
    Json(req): Json<QuoteRequest>,
) -> Result<Json<QuoteResponse>> {
    let input = req.into();
    let result = services::quote(&state.db, &state.cache, &input).await?;
    Ok(Json(result.into()))
}

/// Tier price list of a material
pub async fn material_tiers(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MaterialTiersResponse>> {
    let snapshot = services::current_snapshot(&state.db, &state.cache).await?;
    let material_id = MaterialId(id);
    let (material, tiers) = services::material_tiers(&snapshot, material_id)?;

    Ok(Json(MaterialTiersResponse {
        material_id,
        material_name: material.name.clone(),
        active: material.active,
        tiers: tiers
            .into_iter()
            .map(|(tier, price_per_meter)| TierPriceResponse {
                tier,
                price_per_meter,
            })
            .collect(),
    }))
}

/// Counts and load time of the active snapshot
pub async fn snapshot_status(State(state): State<AppState>) -> Result<Json<SnapshotResponse>> {
    let snapshot = services::current_snapshot(&state.db, &state.cache).await?;
    Ok(Json(SnapshotResponse {
        snapshot: snapshot.info(),
        cache: state.cache.stats(),
    }))
}

/// Reload pricing tables from the database
pub async fn refresh_snapshot(State(state): State<AppState>) -> Result<Json<SnapshotResponse>> {
    let snapshot = services::refresh_snapshot(&state.db, &state.cache).await?;
    Ok(Json(SnapshotResponse {
        snapshot: snapshot.info(),
        cache: state.cache.stats(),
    }))
}
