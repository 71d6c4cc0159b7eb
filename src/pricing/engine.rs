//! Quote calculation entry point.
//!
//! `calculate_quote` is a pure function of the input and a snapshot:
//! validate, derive quantities, resolve factors, combine, round. It performs
//! no I/O and never mutates the snapshot.

use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use super::calculators::{self, Prices, RawPrices, Rounding};
use super::derivation::{self, Derived};
use super::factors::{self, ClientCategory, Factors};
use super::reference::{CutType, CutTypeId, FinishId, Material, MaterialId};
use super::snapshot::PricingSnapshot;
use super::trace::Trace;

/// Caller input errors. Raised before any calculation happens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PricingError {
    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: i64 },

    #[error("unknown material {0}")]
    UnknownMaterial(MaterialId),

    #[error("unknown cut type {0}")]
    UnknownCutType(CutTypeId),
}

impl PricingError {
    /// Input field the error refers to
    pub fn field(&self) -> &'static str {
        match self {
            PricingError::NonPositive { field, .. } => field,
            PricingError::UnknownMaterial(_) => "material_id",
            PricingError::UnknownCutType(_) => "cut_type_id",
        }
    }
}

/// One label order line to price
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteInput {
    pub material_id: MaterialId,
    pub width_mm: i32,
    pub length_mm: i32,
    pub linear_meters: i32,
    /// Manual length-tier override; the ordered meters are used when absent
    pub tier_override: Option<i32>,
    pub cut_type_id: CutTypeId,
    pub finish_id: Option<FinishId>,
    pub client_category: ClientCategory,
    pub ultrasonic: bool,
    /// Units to use when no length is available
    pub unit_quantity: i32,
    /// Sum of per-color unit quantities
    pub color_units: i64,
}

/// Values shown in the breakdown that do not feed the final price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Diagnostics {
    pub effective_width: i32,
    pub label_area_m2: Decimal,
    pub ribbon_factor: Decimal,
    pub color_density: Decimal,
    pub metric_constant: Decimal,
    pub meter_base: Decimal,
    pub meter_final: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteResult {
    pub prices: Prices,
    pub factors: Factors,
    pub diagnostics: Diagnostics,
    pub trace: Trace,
}

/// Check the input against the snapshot's reference set.
pub fn validate<'a>(
    snapshot: &'a PricingSnapshot,
    input: &QuoteInput,
) -> Result<(&'a Material, &'a CutType), PricingError> {
    for (field, value) in [
        ("width_mm", input.width_mm),
        ("length_mm", input.length_mm),
        ("linear_meters", input.linear_meters),
    ] {
        if value <= 0 {
            return Err(PricingError::NonPositive {
                field,
                value: i64::from(value),
            });
        }
    }

    let material = snapshot
        .reference
        .material(input.material_id)
        .ok_or(PricingError::UnknownMaterial(input.material_id))?;
    let cut_type = snapshot
        .reference
        .cut_type(input.cut_type_id)
        .ok_or(PricingError::UnknownCutType(input.cut_type_id))?;

    Ok((material, cut_type))
}

/// Price one order line against a snapshot.
pub fn calculate_quote(
    snapshot: &PricingSnapshot,
    input: &QuoteInput,
) -> Result<QuoteResult, PricingError> {
    let (material, cut_type) = validate(snapshot, input)?;

    let derived = derivation::derive(
        material,
        input.width_mm,
        input.length_mm,
        input.linear_meters,
        input.unit_quantity,
    );
    let factors = factors::resolve_factors(snapshot, input, material, cut_type, &derived);
    let raw = calculators::combine(&factors, &derived, input.linear_meters);
    let prices = raw.finalize(&derived);

    let ribbon_factor = snapshot
        .tables
        .ribbon_factors
        .resolve(derived.effective_width)
        .map(|found| found.value)
        .unwrap_or(Decimal::ZERO);

    let diagnostics = Diagnostics {
        effective_width: derived.effective_width,
        label_area_m2: derived.label_area_m2,
        ribbon_factor,
        color_density: calculators::color_density(
            input.color_units,
            factors.base_price,
            ribbon_factor,
            input.length_mm,
        ),
        metric_constant: snapshot.settings.metric_constant(),
        meter_base: raw.meter_base,
        meter_final: raw.meter_final,
    };

    let trace = build_trace(input, &derived, &factors, &raw, &diagnostics);

    debug!(
        "Quote material={} width={} length={} meters={} total={}",
        material.id, input.width_mm, input.length_mm, input.linear_meters, prices.total_price
    );

    Ok(QuoteResult {
        prices,
        factors,
        diagnostics,
        trace,
    })
}

fn money(value: Decimal) -> Decimal {
    Rounding::HalfEven(5).apply(value)
}

fn build_trace(
    input: &QuoteInput,
    derived: &Derived,
    factors: &Factors,
    raw: &RawPrices,
    diagnostics: &Diagnostics,
) -> Trace {
    let mut trace = Trace::new();
    trace.push("Linear meters", format!("{} m", input.linear_meters));
    trace.push("Width", format!("{} mm", input.width_mm));
    trace.push("Effective width", format!("{} mm", derived.effective_width));
    trace.push("Length", format!("{} mm", input.length_mm));
    trace.push("Color units", format!("{} un", input.color_units));
    trace.push("Unit count", format!("{} un", derived.unit_count));
    trace.push("Base price (tier)", money(factors.base_price));
    match factors.base_tier {
        Some(tier) => trace.push("Base price tier", tier),
        None => trace.push("Base price tier", "none (zero price)"),
    }
    trace.push("Width coefficient", money(factors.width_coefficient));
    if factors.coefficient_width.is_none() {
        trace.push("Width coefficient source", "default");
    }
    trace.push("Ribbon factor", diagnostics.ribbon_factor);
    trace.push(
        "Color density",
        Rounding::HalfEven(9).apply(diagnostics.color_density),
    );
    trace.push("Meter base", money(factors.base_price * factors.width_coefficient));
    trace.push("Finish surcharge", money(factors.finish_surcharge));
    trace.push("Special cut surcharge", money(factors.special_cut_surcharge));
    trace.push("Width exception factor", factors.width_exception);
    trace.push("Client factor", factors.client_factor);
    trace.push("Ultrasonic factor", factors.ultrasonic_factor);
    trace.push("Cut coefficient (CC)", money(factors.cut_coefficient));
    trace.push("General increase", factors.general_increase);
    trace.push("Meter final", money(raw.meter_final));
    trace.push("Thousands", derived.thousands_count);
    trace
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::fixtures::{
        seeded_snapshot, tafeta_input, ALTA_DEFINICAO, DUPLA_DENSIDADE, SARJA, TAFETA,
    };
    use rust_decimal_macros::dec;

    #[test]
    fn test_reference_scenario() {
        let result = calculate_quote(&seeded_snapshot(), &tafeta_input()).unwrap();

        assert_eq!(result.prices.unit_count.to_string(), "20000.00");
        assert_eq!(result.prices.thousands_count.to_string(), "20.00");
        assert_eq!(result.factors.base_price, dec!(10.44));
        assert_eq!(result.factors.width_coefficient, dec!(0.97));
        assert_eq!(result.diagnostics.meter_base, dec!(10.1268));
        assert_eq!(result.factors.cut_coefficient, dec!(0.72));
        assert_eq!(result.diagnostics.meter_final, dec!(8.0204256));
        assert_eq!(result.prices.unit_price.to_string(), "0.40102");
        assert_eq!(result.prices.total_price.to_string(), "8020.43");
        assert_eq!(result.prices.meter_price.to_string(), "8.02043");
        assert_eq!(result.prices.thousand_price.to_string(), "401.02");
    }

    #[test]
    fn test_determinism() {
        let snapshot = seeded_snapshot();
        let first = calculate_quote(&snapshot, &tafeta_input()).unwrap();
        let second = calculate_quote(&snapshot, &tafeta_input()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_validation_rejects_non_positive_dimensions() {
        let snapshot = seeded_snapshot();

        let input = QuoteInput {
            width_mm: 0,
            ..tafeta_input()
        };
        let err = calculate_quote(&snapshot, &input).unwrap_err();
        assert_eq!(err.field(), "width_mm");

        let input = QuoteInput {
            length_mm: -5,
            ..tafeta_input()
        };
        let err = calculate_quote(&snapshot, &input).unwrap_err();
        assert_eq!(
            err,
            PricingError::NonPositive {
                field: "length_mm",
                value: -5
            }
        );

        let input = QuoteInput {
            linear_meters: 0,
            ..tafeta_input()
        };
        assert_eq!(
            calculate_quote(&snapshot, &input).unwrap_err().field(),
            "linear_meters"
        );
    }

    #[test]
    fn test_validation_rejects_unknown_references() {
        let snapshot = seeded_snapshot();

        let input = QuoteInput {
            material_id: MaterialId(999),
            ..tafeta_input()
        };
        assert_eq!(
            calculate_quote(&snapshot, &input).unwrap_err(),
            PricingError::UnknownMaterial(MaterialId(999))
        );

        let input = QuoteInput {
            cut_type_id: CutTypeId(999),
            ..tafeta_input()
        };
        assert_eq!(
            calculate_quote(&snapshot, &input).unwrap_err().field(),
            "cut_type_id"
        );
    }

    #[test]
    fn test_material_without_tiers_prices_at_zero() {
        // Canvas is a known material with no tier rows
        let input = QuoteInput {
            material_id: crate::pricing::fixtures::CANVAS,
            ..tafeta_input()
        };
        let result = calculate_quote(&seeded_snapshot(), &input).unwrap();

        assert_eq!(result.factors.base_price, Decimal::ZERO);
        assert_eq!(result.factors.base_tier, None);
        // Special-cut surcharge still applies on top of the zero base
        assert_eq!(result.factors.special_cut_surcharge, dec!(0.189));
        assert_eq!(result.trace.get("Base price tier"), Some("none (zero price)"));
    }

    #[test]
    fn test_width_sixty_applies_exception() {
        let snapshot = seeded_snapshot();
        for (width, expected) in [(59, dec!(1.0)), (60, dec!(1.49)), (61, dec!(1.0))] {
            let input = QuoteInput {
                width_mm: width,
                ..tafeta_input()
            };
            let result = calculate_quote(&snapshot, &input).unwrap();
            assert_eq!(result.factors.width_exception, expected, "width {}", width);
        }
    }

    #[test]
    fn test_double_density_halves_effective_width() {
        let input = QuoteInput {
            material_id: DUPLA_DENSIDADE,
            width_mm: 60,
            length_mm: 50,
            ..tafeta_input()
        };
        let result = calculate_quote(&seeded_snapshot(), &input).unwrap();

        assert_eq!(result.diagnostics.effective_width, 30);
        // (30 / 50) * 1.2
        assert_eq!(result.factors.cut_coefficient, dec!(0.72));
        // Ribbon factor is looked up with the effective width
        assert_eq!(result.diagnostics.ribbon_factor, dec!(33.2));
        // The width exception still keys on the nominal width
        assert_eq!(result.factors.width_exception, dec!(1.49));
    }

    #[test]
    fn test_coefficient_fallback_chain() {
        let snapshot = seeded_snapshot();

        // 35mm has no row; 33mm is the greatest width below it
        let input = QuoteInput {
            width_mm: 35,
            ..tafeta_input()
        };
        let result = calculate_quote(&snapshot, &input).unwrap();
        assert_eq!(result.factors.coefficient_width, Some(33));
        assert_eq!(result.factors.width_coefficient, dec!(0.97));

        // Below every configured width: default coefficient
        let input = QuoteInput {
            width_mm: 8,
            ..tafeta_input()
        };
        let result = calculate_quote(&snapshot, &input).unwrap();
        assert_eq!(result.factors.coefficient_width, None);
        assert_eq!(result.factors.width_coefficient, dec!(0.75));
        assert_eq!(result.trace.get("Width coefficient source"), Some("default"));
    }

    #[test]
    fn test_tier_override_replaces_meters_as_key() {
        let input = QuoteInput {
            tier_override: Some(300),
            ..tafeta_input()
        };
        let result = calculate_quote(&seeded_snapshot(), &input).unwrap();
        assert_eq!(result.factors.base_tier, Some(300));
        assert_eq!(result.factors.base_price, dec!(20.40));
    }

    #[test]
    fn test_non_positive_tier_override_is_ignored() {
        let snapshot = seeded_snapshot();
        let plain = calculate_quote(&snapshot, &tafeta_input()).unwrap();

        for tier in [0, -300] {
            let input = QuoteInput {
                tier_override: Some(tier),
                ..tafeta_input()
            };
            let result = calculate_quote(&snapshot, &input).unwrap();
            assert_eq!(result.factors.base_tier, Some(1000), "override {}", tier);
            assert_eq!(result.factors.base_price, dec!(10.44));
            assert_eq!(result.prices, plain.prices);
        }
    }

    #[test]
    fn test_saturated_color_units_only_affect_density() {
        let snapshot = seeded_snapshot();
        let plain = calculate_quote(&snapshot, &tafeta_input()).unwrap();
        let input = QuoteInput {
            color_units: i64::MAX,
            ..tafeta_input()
        };

        let result = calculate_quote(&snapshot, &input).unwrap();
        assert!(result.diagnostics.color_density > Decimal::ZERO);
        assert_eq!(result.prices, plain.prices);
    }

    #[test]
    fn test_finish_and_ultrasonic_factors() {
        let input = QuoteInput {
            finish_id: Some(crate::pricing::fixtures::GOMA_F),
            ultrasonic: true,
            ..tafeta_input()
        };
        let result = calculate_quote(&seeded_snapshot(), &input).unwrap();

        assert_eq!(result.factors.finish_surcharge, dec!(0.1));
        assert_eq!(result.factors.ultrasonic_factor, dec!(1.15));
        // 10.44 * 0.97 + 0.1
        assert_eq!(result.diagnostics.meter_base, dec!(10.2268));
    }

    #[test]
    fn test_small_order_forces_minimum_thousands() {
        // 1 meter of 200mm labels = 5 units; base price falls back to the 300m tier
        let input = QuoteInput {
            linear_meters: 1,
            length_mm: 200,
            ..tafeta_input()
        };
        let result = calculate_quote(&seeded_snapshot(), &input).unwrap();

        assert_eq!(result.factors.base_tier, Some(300));
        assert_eq!(result.factors.cut_coefficient, dec!(0.5));
        assert_eq!(result.prices.unit_count, dec!(5));
        assert_eq!(result.prices.thousands_count, dec!(0.01));
        // 20.40 * 0.97 * 1.10 * 0.5 = 10.8834 per meter
        assert_eq!(result.prices.unit_price.to_string(), "2.17668");
        assert_eq!(result.prices.total_price.to_string(), "10.88");
        assert_eq!(result.prices.meter_price.to_string(), "10.88340");
        assert_eq!(result.prices.thousand_price.to_string(), "1088.34");
    }

    #[test]
    fn test_trace_order() {
        let result = calculate_quote(&seeded_snapshot(), &tafeta_input()).unwrap();
        let labels: Vec<&str> = result.trace.labels().collect();

        assert_eq!(labels.first(), Some(&"Linear meters"));
        assert_eq!(labels.last(), Some(&"Thousands"));
        let base = labels.iter().position(|l| *l == "Base price (tier)").unwrap();
        let meter_final = labels.iter().position(|l| *l == "Meter final").unwrap();
        assert!(base < meter_final);
        assert_eq!(result.trace.get("Effective width"), Some("30 mm"));
        assert_eq!(result.trace.get("Thousands"), Some("20.00"));
    }

    #[test]
    fn test_tier_monotonicity_for_seeded_materials() {
        let snapshot = seeded_snapshot();
        let meters_grid = [
            1, 300, 450, 500, 999, 1000, 2500, 4000, 5000, 10000, 15000, 30000, 100000,
        ];
        for material in [TAFETA, SARJA, ALTA_DEFINICAO] {
            let mut previous: Option<Decimal> = None;
            for meters in meters_grid {
                let input = QuoteInput {
                    material_id: material,
                    linear_meters: meters,
                    ..tafeta_input()
                };
                let base = calculate_quote(&snapshot, &input).unwrap().factors.base_price;
                if let Some(prev) = previous {
                    assert!(base <= prev, "material {} meters {}", material, meters);
                }
                previous = Some(base);
            }
        }
    }
}
