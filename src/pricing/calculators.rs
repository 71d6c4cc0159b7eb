//! Core pricing calculation functions.
//!
//! Pure functions for pricing math - no database access.
//! The combination order reproduces the legacy spreadsheet formula exactly;
//! nothing is rounded until the final per-field quantization.

use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use super::derivation::Derived;
use super::factors::Factors;

/// Round to specified decimal places using banker's rounding (ROUND_HALF_EVEN).
///
/// Banker's rounding rounds to the nearest even number when the value is exactly
/// halfway between two possibilities. This reduces cumulative rounding bias.
///
/// # Examples
/// ```
/// use rust_decimal_macros::dec;
/// use etiqueta_pricing::pricing::round_money;
///
/// assert_eq!(round_money(dec!(2.5), 0), dec!(2));   // rounds to even
/// assert_eq!(round_money(dec!(3.5), 0), dec!(4));   // rounds to even
/// assert_eq!(round_money(dec!(1.234), 2), dec!(1.23));
/// ```
pub fn round_money(amount: Decimal, places: u32) -> Decimal {
    amount.round_dp_with_strategy(places, RoundingStrategy::MidpointNearestEven)
}

/// Truncate toward zero to specified decimal places (spreadsheet ROUNDDOWN).
///
/// # Examples
/// ```
/// use rust_decimal_macros::dec;
/// use etiqueta_pricing::pricing::round_down;
///
/// assert_eq!(round_down(dec!(1.999), 2), dec!(1.99));
/// ```
pub fn round_down(amount: Decimal, places: u32) -> Decimal {
    amount.round_dp_with_strategy(places, RoundingStrategy::ToZero)
}

/// Rounding applied to one output field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rounding {
    /// Banker's rounding to N places
    HalfEven(u32),
    /// Truncation to N places
    Down(u32),
}

impl Rounding {
    /// Quantize `amount`, always returning exactly the declared scale.
    pub fn apply(self, amount: Decimal) -> Decimal {
        let (mut rounded, places) = match self {
            Rounding::HalfEven(places) => (round_money(amount, places), places),
            Rounding::Down(places) => (round_down(amount, places), places),
        };
        rounded.rescale(places);
        rounded
    }
}

/// Per-field rounding policy of a quote result.
pub mod policy {
    use super::Rounding;

    pub const METER_PRICE: Rounding = Rounding::HalfEven(5);
    pub const UNIT_PRICE: Rounding = Rounding::HalfEven(5);
    pub const TOTAL_PRICE: Rounding = Rounding::HalfEven(2);
    pub const THOUSAND_PRICE: Rounding = Rounding::HalfEven(2);
    pub const UNIT_COUNT: Rounding = Rounding::HalfEven(2);
    pub const THOUSANDS_COUNT: Rounding = Rounding::Down(2);
}

/// Unrounded pipeline values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawPrices {
    pub meter_base: Decimal,
    pub meter_final: Decimal,
    pub unit_price: Decimal,
    pub total_price: Decimal,
    pub meter_price: Decimal,
    pub thousand_price: Decimal,
}

/// Final prices after per-field rounding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Prices {
    pub meter_price: Decimal,
    pub thousand_price: Decimal,
    pub unit_price: Decimal,
    pub total_price: Decimal,
    pub unit_count: Decimal,
    pub thousands_count: Decimal,
}

/// Combine resolved factors into prices, in spreadsheet order.
///
/// # Arguments
/// * `factors` - Resolved multiplicative/additive factors
/// * `derived` - Unit/thousand counts and length in meters
/// * `linear_meters` - Meters ordered
pub fn combine(factors: &Factors, derived: &Derived, linear_meters: i32) -> RawPrices {
    let meter_base = factors.base_price * factors.width_coefficient
        + factors.finish_surcharge
        + factors.special_cut_surcharge;

    let meter_final = factors.width_exception
        * meter_base
        * factors.client_factor
        * factors.ultrasonic_factor
        * factors.cut_coefficient
        * factors.general_increase;

    let unit_price = meter_final * derived.length_m;
    let total_price = unit_price * derived.unit_count;

    let meters = Decimal::from(linear_meters);
    let meter_price = if meters > Decimal::ZERO {
        total_price / meters
    } else {
        Decimal::ZERO
    };

    // Thousands is forced to at least 0.01 during derivation
    let thousand_price = if derived.thousands_count > Decimal::ZERO {
        total_price / derived.thousands_count
    } else {
        Decimal::ZERO
    };

    RawPrices {
        meter_base,
        meter_final,
        unit_price,
        total_price,
        meter_price,
        thousand_price,
    }
}

impl RawPrices {
    /// Apply the final rounding policy.
    pub fn finalize(&self, derived: &Derived) -> Prices {
        Prices {
            meter_price: policy::METER_PRICE.apply(self.meter_price),
            thousand_price: policy::THOUSAND_PRICE.apply(self.thousand_price),
            unit_price: policy::UNIT_PRICE.apply(self.unit_price),
            total_price: policy::TOTAL_PRICE.apply(self.total_price),
            unit_count: policy::UNIT_COUNT.apply(derived.unit_count),
            thousands_count: policy::THOUSANDS_COUNT.apply(derived.thousands_count),
        }
    }
}

/// Color density metric shown in the calculation breakdown.
///
/// `(color_units * base_price) / ribbon_factor / length_mm`, or zero when the
/// ribbon factor or the length is not positive.
pub fn color_density(
    color_units: i64,
    base_price: Decimal,
    ribbon_factor: Decimal,
    length_mm: i32,
) -> Decimal {
    if ribbon_factor <= Decimal::ZERO || length_mm <= 0 {
        return Decimal::ZERO;
    }
    Decimal::from(color_units) * base_price / ribbon_factor / Decimal::from(length_mm)
}

/// Ratio-based cut coefficient with a 0.5 floor; 1.0 without a length.
pub fn cut_coefficient(effective_width: i32, length_mm: i32) -> Decimal {
    if length_mm <= 0 {
        return Decimal::ONE;
    }
    let ratio = Decimal::from(effective_width) / Decimal::from(length_mm);
    (ratio * dec!(1.2)).max(dec!(0.5))
}
