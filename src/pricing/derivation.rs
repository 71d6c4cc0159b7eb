//! Physical quantities derived from the linear order specification.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::calculators::policy;
use super::reference::Material;

const MM_PER_METER: Decimal = dec!(1000);
const UNITS_PER_THOUSAND: Decimal = dec!(1000);
const MM2_PER_M2: Decimal = dec!(1000000);
const MIN_THOUSANDS: Decimal = dec!(0.01);

/// Quantities derived before any factor is resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Derived {
    pub effective_width: i32,
    pub length_m: Decimal,
    pub unit_count: Decimal,
    pub thousands_count: Decimal,
    pub label_area_m2: Decimal,
}

/// Nominal width, halved (floor) for double-density materials.
pub fn effective_width(nominal_width: i32, material: &Material) -> i32 {
    if material.double_density {
        nominal_width.div_euclid(2)
    } else {
        nominal_width
    }
}

/// Labels produced by `linear_meters` of ribbon.
///
/// Without a length the caller-supplied unit quantity is used as is.
pub fn unit_count(linear_meters: i32, length_mm: i32, fallback_units: i32) -> Decimal {
    let length_m = Decimal::from(length_mm) / MM_PER_METER;
    if length_m > Decimal::ZERO {
        Decimal::from(linear_meters) / length_m
    } else {
        Decimal::from(fallback_units)
    }
}

/// ROUNDDOWN(units / 1000, 2), never below 0.01.
pub fn thousands_count(unit_count: Decimal) -> Decimal {
    let thousands = policy::THOUSANDS_COUNT.apply(unit_count / UNITS_PER_THOUSAND);
    if thousands.is_zero() {
        MIN_THOUSANDS
    } else {
        thousands
    }
}

pub fn label_area_m2(width_mm: i32, length_mm: i32) -> Decimal {
    Decimal::from(width_mm) * Decimal::from(length_mm) / MM2_PER_M2
}

/// Run every derivation for one order line.
pub fn derive(
    material: &Material,
    width_mm: i32,
    length_mm: i32,
    linear_meters: i32,
    fallback_units: i32,
) -> Derived {
    let units = unit_count(linear_meters, length_mm, fallback_units);
    Derived {
        effective_width: effective_width(width_mm, material),
        length_m: Decimal::from(length_mm) / MM_PER_METER,
        unit_count: units,
        thousands_count: thousands_count(units),
        label_area_m2: label_area_m2(width_mm, length_mm),
    }
}
