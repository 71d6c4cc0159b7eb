//! Shared fixtures for integration tests.

#![allow(dead_code)]

use etiqueta_pricing::pricing::reference::{CutTypeId, MaterialId};
use etiqueta_pricing::pricing::snapshot::SnapshotBuilder;
use etiqueta_pricing::pricing::{ClientCategory, PricingSnapshot, QuoteInput};
use rust_decimal_macros::dec;

pub const TAFETA: i64 = 1;
pub const CANVAS: i64 = 6;
pub const CETIM: i64 = 7;

pub const CORTE: i64 = 1;
pub const DOBRA_CANTOS: i64 = 3;

/// Small pricing table: Tafetá with two tiers, Canvas and Cetim special cuts.
pub fn builder() -> SnapshotBuilder {
    PricingSnapshot::builder()
        .material(TAFETA, "Tafetá")
        .material(CANVAS, "Canvas")
        .material(CETIM, "Cetim")
        .cut_type(CORTE, "CORTE", 5)
        .cut_type(2, "DOBRA MEIO", 10)
        .cut_type(DOBRA_CANTOS, "DOBRA CANTOS", 13)
        .finish(1, "Goma F")
        .price_tier(TAFETA, 300, dec!(20.40))
        .price_tier(TAFETA, 1000, dec!(10.44))
        .price_tier(CETIM, 1000, dec!(12.00))
        .coefficient(30, TAFETA, 5, dec!(0.97))
        .coefficient(30, TAFETA, 12, dec!(0.90))
        .coefficient(30, TAFETA, 13, dec!(0.85))
        .finish_surcharge(30, 1, dec!(0.1))
        .special_cut(10, dec!(0.189), dec!(0.087))
        .ribbon_factor(30, dec!(33.2))
}

pub fn snapshot() -> PricingSnapshot {
    builder().build()
}

/// Tafetá 30x50mm, 1000m, plain cut, new commerce client
pub fn tafeta_input() -> QuoteInput {
    QuoteInput {
        material_id: MaterialId(TAFETA),
        width_mm: 30,
        length_mm: 50,
        linear_meters: 1000,
        tier_override: None,
        cut_type_id: CutTypeId(CORTE),
        finish_id: None,
        client_category: ClientCategory::CommerceNew,
        ultrasonic: false,
        unit_quantity: 0,
        color_units: 0,
    }
}
