//! Request DTOs for pricing API endpoints.

use serde::Deserialize;

use super::engine::QuoteInput;
use super::factors::ClientCategory;
use super::reference::{CutTypeId, FinishId, MaterialId};

/// Request to price one label order line
#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    pub material_id: MaterialId,
    pub width_mm: i32,
    pub length_mm: i32,
    pub linear_meters: i32,
    #[serde(default)]
    pub tier_override: Option<i32>,
    pub cut_type_id: CutTypeId,
    #[serde(default)]
    pub finish_id: Option<FinishId>,
    #[serde(default)]
    pub client_category: ClientCategory,
    #[serde(default)]
    pub ultrasonic: bool,
    #[serde(default)]
    pub unit_quantity: i32,
    /// Per-color unit quantities; only their sum is priced
    #[serde(default)]
    pub color_units: Vec<i64>,
}

impl From<QuoteRequest> for QuoteInput {
    fn from(req: QuoteRequest) -> Self {
        QuoteInput {
            material_id: req.material_id,
            width_mm: req.width_mm,
            length_mm: req.length_mm,
            linear_meters: req.linear_meters,
            tier_override: req.tier_override,
            cut_type_id: req.cut_type_id,
            finish_id: req.finish_id,
            client_category: req.client_category,
            ultrasonic: req.ultrasonic,
            unit_quantity: req.unit_quantity,
            color_units: req
                .color_units
                .iter()
                .fold(0i64, |total, units| total.saturating_add(*units)),
        }
    }
}
