//! Seeded reference data used across unit tests.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::engine::QuoteInput;
use super::factors::ClientCategory;
use super::reference::{CutTypeId, FinishId, MaterialId};
use super::settings::{SettingValue, GENERAL_INCREASE_PERCENT, ULTRASONIC_PERCENT};
use super::snapshot::PricingSnapshot;

pub const TAFETA: MaterialId = MaterialId(1);
pub const SARJA: MaterialId = MaterialId(2);
pub const ALTA_DEFINICAO: MaterialId = MaterialId(3);
pub const DUPLA_DENSIDADE: MaterialId = MaterialId(4);
pub const CANVAS: MaterialId = MaterialId(6);
pub const CORTE: CutTypeId = CutTypeId(1);
pub const GOMA_F: FinishId = FinishId(1);

const TIERS: [i32; 8] = [300, 500, 1000, 2500, 5000, 10000, 15000, 30000];
const WIDTHS: [i32; 14] = [10, 12, 15, 18, 20, 21, 24, 28, 30, 33, 40, 50, 67, 100];

pub fn seeded_snapshot() -> PricingSnapshot {
    let tafeta = [
        dec!(20.40), dec!(15.69), dec!(10.44), dec!(10.11),
        dec!(9.35), dec!(8.39), dec!(8.04), dec!(7.72),
    ];
    let sarja = [
        dec!(22.50), dec!(17.29), dec!(11.48), dec!(11.12),
        dec!(10.29), dec!(9.22), dec!(8.84), dec!(8.48),
    ];
    let alta_definicao = [
        dec!(26.84), dec!(20.64), dec!(14.36), dec!(13.21),
        dec!(12.58), dec!(11.89), dec!(11.35), dec!(10.89),
    ];
    let goma_f = [
        dec!(0.029), dec!(0.035), dec!(0.043), dec!(0.051), dec!(0.058), dec!(0.065), dec!(0.073),
        dec!(0.085), dec!(0.1), dec!(0.1), dec!(0.116), dec!(0.145), dec!(0.194), dec!(0.29),
    ];
    let ribbon: [(i32, Decimal); 15] = [
        (10, dec!(78.2)), (12, dec!(67.0)), (15, dec!(61.0)), (18, dec!(47.6)),
        (20, dec!(47.6)), (21, dec!(45.4)), (24, dec!(43.4)), (28, dec!(38.3)),
        (30, dec!(33.2)), (33, dec!(33.2)), (40, dec!(28.1)), (50, dec!(23.0)),
        (67, dec!(13.5)), (100, dec!(11.5)), (200, dec!(5.9)),
    ];

    let mut builder = PricingSnapshot::builder()
        .material(TAFETA.0, "Tafetá")
        .material(SARJA.0, "Sarja")
        .material(ALTA_DEFINICAO.0, "Alta Definição")
        .material(DUPLA_DENSIDADE.0, "Dupla Densidade")
        .material(CANVAS.0, "Canvas")
        .material(7, "Cetim")
        .cut_type(CORTE.0, "CORTE", 5)
        .cut_type(2, "DOBRA MEIO", 10)
        .cut_type(3, "DOBRA CANTOS", 13)
        .finish(GOMA_F.0, "Goma F")
        .setting(ULTRASONIC_PERCENT, SettingValue::Decimal(dec!(1.15)))
        .setting(GENERAL_INCREASE_PERCENT, SettingValue::Decimal(dec!(1.00)));

    for (i, tier) in TIERS.iter().enumerate() {
        builder = builder
            .price_tier(TAFETA.0, *tier, tafeta[i])
            .price_tier(SARJA.0, *tier, sarja[i])
            .price_tier(ALTA_DEFINICAO.0, *tier, alta_definicao[i]);
    }
    for (i, width) in WIDTHS.iter().enumerate() {
        builder = builder
            .coefficient(*width, TAFETA.0, 5, dec!(0.97))
            .finish_surcharge(*width, GOMA_F.0, goma_f[i])
            .special_cut(*width, dec!(0.189), dec!(0.087));
    }
    for (width, factor) in ribbon {
        builder = builder.ribbon_factor(width, factor);
    }
    builder.build()
}

/// Tafetá 30x50mm, 1000m, plain cut, new commerce client
pub fn tafeta_input() -> QuoteInput {
    QuoteInput {
        material_id: TAFETA,
        width_mm: 30,
        length_mm: 50,
        linear_meters: 1000,
        tier_override: None,
        cut_type_id: CORTE,
        finish_id: None,
        client_category: ClientCategory::CommerceNew,
        ultrasonic: false,
        unit_quantity: 0,
        color_units: 0,
    }
}
