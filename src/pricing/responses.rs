//! Response DTOs for pricing API endpoints.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::cache::CacheStats;

use super::engine::QuoteResult;
use super::reference::MaterialId;
use super::snapshot::SnapshotInfo;
use super::trace::Trace;

/// Final prices of a quote
#[derive(Debug, Serialize)]
pub struct QuotePricesResponse {
    #[serde(with = "rust_decimal::serde::str")]
    pub meter_price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub thousand_price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub unit_price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub total_price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub unit_count: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub thousands_count: Decimal,
}

/// Factors that went into a quote
#[derive(Debug, Serialize)]
pub struct QuoteFactorsResponse {
    #[serde(with = "rust_decimal::serde::str")]
    pub base_price: Decimal,
    pub base_tier: Option<i32>,
    #[serde(with = "rust_decimal::serde::str")]
    pub width_coefficient: Decimal,
    pub coefficient_width: Option<i32>,
    pub cut_code: i32,
    #[serde(with = "rust_decimal::serde::str")]
    pub finish_surcharge: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub special_cut_surcharge: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub width_exception: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub client_factor: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub ultrasonic_factor: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub general_increase: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub cut_coefficient: Decimal,
}

/// Breakdown-only values
#[derive(Debug, Serialize)]
pub struct QuoteDiagnosticsResponse {
    pub effective_width: i32,
    #[serde(with = "rust_decimal::serde::str")]
    pub label_area_m2: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub ribbon_factor: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub color_density: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub metric_constant: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub meter_base: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub meter_final: Decimal,
}

/// Response for a quote calculation
#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub prices: QuotePricesResponse,
    pub factors: QuoteFactorsResponse,
    pub diagnostics: QuoteDiagnosticsResponse,
    pub trace: Trace,
}

impl From<QuoteResult> for QuoteResponse {
    fn from(result: QuoteResult) -> Self {
        let QuoteResult {
            prices,
            factors,
            diagnostics,
            trace,
        } = result;

        QuoteResponse {
            prices: QuotePricesResponse {
                meter_price: prices.meter_price,
                thousand_price: prices.thousand_price,
                unit_price: prices.unit_price,
                total_price: prices.total_price,
                unit_count: prices.unit_count,
                thousands_count: prices.thousands_count,
            },
            factors: QuoteFactorsResponse {
                base_price: factors.base_price,
                base_tier: factors.base_tier,
                width_coefficient: factors.width_coefficient,
                coefficient_width: factors.coefficient_width,
                cut_code: factors.cut_code,
                finish_surcharge: factors.finish_surcharge,
                special_cut_surcharge: factors.special_cut_surcharge,
                width_exception: factors.width_exception,
                client_factor: factors.client_factor,
                ultrasonic_factor: factors.ultrasonic_factor,
                general_increase: factors.general_increase,
                cut_coefficient: factors.cut_coefficient,
            },
            diagnostics: QuoteDiagnosticsResponse {
                effective_width: diagnostics.effective_width,
                label_area_m2: diagnostics.label_area_m2,
                ribbon_factor: diagnostics.ribbon_factor,
                color_density: diagnostics.color_density,
                metric_constant: diagnostics.metric_constant,
                meter_base: diagnostics.meter_base,
                meter_final: diagnostics.meter_final,
            },
            trace,
        }
    }
}

/// One length tier of a material's price table
#[derive(Debug, Serialize)]
pub struct TierPriceResponse {
    pub tier: i32,
    #[serde(with = "rust_decimal::serde::str")]
    pub price_per_meter: Decimal,
}

/// Response for a material's tier listing
#[derive(Debug, Serialize)]
pub struct MaterialTiersResponse {
    pub material_id: MaterialId,
    pub material_name: String,
    /// False once the material is retired from the catalogue
    pub active: bool,
    pub tiers: Vec<TierPriceResponse>,
}

/// Response for snapshot status and refresh
#[derive(Debug, Serialize)]
pub struct SnapshotResponse {
    pub snapshot: SnapshotInfo,
    pub cache: CacheStats,
}

/// Generic pricing error response
#[derive(Debug, Serialize)]
pub struct PricingErrorResponse {
    pub error_type: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}
