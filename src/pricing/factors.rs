//! Resolution of the multiplicative and additive pricing factors.
//!
//! Every factor has a documented fallback, so resolution never fails: a
//! missing tier prices at zero, a missing coefficient uses the configured
//! default, missing surcharges are zero.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use super::calculators;
use super::derivation::Derived;
use super::engine::QuoteInput;
use super::reference::{CutType, Material};
use super::settings::CutCodePolicy;
use super::snapshot::PricingSnapshot;

/// Client pricing category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum ClientCategory {
    #[serde(rename = "industria_novo")]
    IndustryNew,
    #[serde(rename = "industria_antigo")]
    IndustryExisting,
    #[default]
    #[serde(rename = "comercio_novo")]
    CommerceNew,
    #[serde(rename = "comercio_antigo")]
    CommerceExisting,
    /// Any category the pricing table does not know
    #[serde(rename = "desconhecido")]
    Unknown,
}

impl ClientCategory {
    /// Unrecognised codes map to `Unknown`.
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_lowercase().as_str() {
            "industria_novo" => ClientCategory::IndustryNew,
            "industria_antigo" => ClientCategory::IndustryExisting,
            "comercio_novo" => ClientCategory::CommerceNew,
            "comercio_antigo" => ClientCategory::CommerceExisting,
            _ => ClientCategory::Unknown,
        }
    }

    pub fn factor(&self) -> Decimal {
        match self {
            ClientCategory::IndustryNew => dec!(1.00),
            ClientCategory::IndustryExisting => dec!(0.95),
            ClientCategory::CommerceNew => dec!(1.10),
            ClientCategory::CommerceExisting => dec!(1.05),
            ClientCategory::Unknown => dec!(1.00),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ClientCategory::IndustryNew => "industria_novo",
            ClientCategory::IndustryExisting => "industria_antigo",
            ClientCategory::CommerceNew => "comercio_novo",
            ClientCategory::CommerceExisting => "comercio_antigo",
            ClientCategory::Unknown => "desconhecido",
        }
    }
}

impl fmt::Display for ClientCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClientCategory {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(ClientCategory::from_code(s))
    }
}

impl<'de> Deserialize<'de> for ClientCategory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        Ok(ClientCategory::from_code(&code))
    }
}

/// Which nominal widths a rule applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidthMatch {
    Exactly(i32),
    /// Inclusive range
    Between { min: i32, max: i32 },
}

/// Width predicate mapped to a price multiplier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidthRule {
    pub matches: WidthMatch,
    pub factor: Decimal,
}

impl WidthRule {
    pub fn exact(width: i32, factor: Decimal) -> Self {
        Self {
            matches: WidthMatch::Exactly(width),
            factor,
        }
    }

    pub fn between(min: i32, max: i32, factor: Decimal) -> Self {
        Self {
            matches: WidthMatch::Between { min, max },
            factor,
        }
    }

    pub fn applies_to(&self, width: i32) -> bool {
        match self.matches {
            WidthMatch::Exactly(w) => width == w,
            WidthMatch::Between { min, max } => (min..=max).contains(&width),
        }
    }
}

/// The spreadsheet's only width exception: 60mm labels cost 1.49x.
pub fn legacy_width_rules() -> Vec<WidthRule> {
    vec![WidthRule::exact(60, dec!(1.49))]
}

/// First matching rule wins; 1.0 when none match.
pub fn width_exception_factor(rules: &[WidthRule], nominal_width: i32) -> Decimal {
    rules
        .iter()
        .find(|rule| rule.applies_to(nominal_width))
        .map(|rule| rule.factor)
        .unwrap_or(Decimal::ONE)
}

/// Resolved factors of one calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Factors {
    pub width_exception: Decimal,
    pub base_price: Decimal,
    /// Tier the base price was taken from, if the material has any tiers
    pub base_tier: Option<i32>,
    pub width_coefficient: Decimal,
    /// Width row the coefficient came from; `None` means the configured default
    pub coefficient_width: Option<i32>,
    pub cut_code: i32,
    pub finish_surcharge: Decimal,
    pub special_cut_surcharge: Decimal,
    pub client_factor: Decimal,
    pub ultrasonic_factor: Decimal,
    pub general_increase: Decimal,
    pub cut_coefficient: Decimal,
}

pub fn cut_code(cut_type: &CutType, policy: CutCodePolicy) -> i32 {
    match policy {
        CutCodePolicy::NameLength => cut_type.name_length_code(),
        CutCodePolicy::Stored => cut_type.stored_code,
    }
}

/// Resolve every factor for a validated input.
pub fn resolve_factors(
    snapshot: &PricingSnapshot,
    input: &QuoteInput,
    material: &Material,
    cut_type: &CutType,
    derived: &Derived,
) -> Factors {
    let tables = &snapshot.tables;
    let settings = &snapshot.settings;

    // Base price per meter from the length tier; a non-positive override is no override
    let tier_key = input
        .tier_override
        .filter(|tier| *tier > 0)
        .unwrap_or(input.linear_meters);
    let base = tables.price_tiers.resolve(tier_key, material.id);
    match &base {
        Some(found) if found.is_fallback() => debug!(
            "Tier {} for material {} resolved to {} ({:?})",
            tier_key, material.id, found.key, found.kind
        ),
        None => debug!("Material {} has no price tiers, base price is zero", material.id),
        _ => {}
    }

    // Coefficient by width/material/cut code
    let code = cut_code(cut_type, settings.cut_code_policy());
    let coefficient = tables
        .coefficients
        .resolve(input.width_mm, material.id, code);
    if coefficient.is_none() {
        debug!(
            "No coefficient for width {} material {} cut code {}, using default",
            input.width_mm, material.id, code
        );
    }

    let finish_surcharge = input
        .finish_id
        .and_then(|finish| tables.finish_surcharges.resolve(input.width_mm, finish))
        .map(|found| found.value)
        .unwrap_or(Decimal::ZERO);

    let special_cut_surcharge = material
        .special_cut
        .and_then(|family| tables.special_cuts.resolve(input.width_mm, family))
        .map(|found| found.value)
        .unwrap_or(Decimal::ZERO);

    let ultrasonic_factor = if input.ultrasonic {
        settings.ultrasonic_percent()
    } else {
        Decimal::ONE
    };

    Factors {
        width_exception: width_exception_factor(&snapshot.width_rules, input.width_mm),
        base_price: base.map(|found| found.value).unwrap_or(Decimal::ZERO),
        base_tier: base.map(|found| found.key),
        width_coefficient: coefficient
            .map(|found| found.value)
            .unwrap_or_else(|| settings.default_coefficient()),
        coefficient_width: coefficient.map(|found| found.key),
        cut_code: code,
        finish_surcharge,
        special_cut_surcharge,
        client_factor: input.client_category.factor(),
        ultrasonic_factor,
        general_increase: settings.general_increase_percent(),
        cut_coefficient: calculators::cut_coefficient(derived.effective_width, input.length_mm),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::reference::CutTypeId;

    #[test]
    fn test_client_category_factors() {
        assert_eq!(ClientCategory::IndustryNew.factor(), dec!(1.00));
        assert_eq!(ClientCategory::IndustryExisting.factor(), dec!(0.95));
        assert_eq!(ClientCategory::CommerceNew.factor(), dec!(1.10));
        assert_eq!(ClientCategory::CommerceExisting.factor(), dec!(1.05));
        assert_eq!(ClientCategory::Unknown.factor(), dec!(1.00));
    }

    #[test]
    fn test_client_category_parsing() {
        assert_eq!(
            "comercio_antigo".parse::<ClientCategory>().unwrap(),
            ClientCategory::CommerceExisting
        );
        assert_eq!(
            "atacado".parse::<ClientCategory>().unwrap(),
            ClientCategory::Unknown
        );
    }

    #[test]
    fn test_client_category_deserializes_unknown() {
        let category: ClientCategory = serde_json::from_str("\"industria_novo\"").unwrap();
        assert_eq!(category, ClientCategory::IndustryNew);

        let category: ClientCategory = serde_json::from_str("\"varejo\"").unwrap();
        assert_eq!(category, ClientCategory::Unknown);
    }

    #[test]
    fn test_width_sixty_exception() {
        let rules = legacy_width_rules();
        assert_eq!(width_exception_factor(&rules, 60), dec!(1.49));
        assert_eq!(width_exception_factor(&rules, 59), Decimal::ONE);
        assert_eq!(width_exception_factor(&rules, 61), Decimal::ONE);
    }

    #[test]
    fn test_width_rules_first_match_wins() {
        let rules = vec![
            WidthRule::between(50, 70, dec!(1.2)),
            WidthRule::exact(60, dec!(1.49)),
        ];
        assert_eq!(width_exception_factor(&rules, 60), dec!(1.2));
        assert_eq!(width_exception_factor(&rules, 70), dec!(1.2));
        assert_eq!(width_exception_factor(&rules, 71), Decimal::ONE);
        assert_eq!(width_exception_factor(&[], 60), Decimal::ONE);
    }

    #[test]
    fn test_cut_code_policy() {
        let cut = CutType::new(CutTypeId(3), "DOBRA CANTOS", 13);
        assert_eq!(cut_code(&cut, CutCodePolicy::NameLength), 12);
        assert_eq!(cut_code(&cut, CutCodePolicy::Stored), 13);
    }
}
