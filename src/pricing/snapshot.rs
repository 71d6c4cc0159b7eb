//! Immutable snapshot of everything a calculation reads.
//!
//! A snapshot is assembled once (from the database or by hand in tests) and
//! shared behind an `Arc`. Refreshing builds a new snapshot rather than
//! mutating the current one, so calculations in flight keep a consistent view.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use super::factors::{legacy_width_rules, WidthRule};
use super::reference::{
    CutType, CutTypeId, Finish, FinishId, Material, MaterialId, ReferenceData,
};
use super::settings::{SettingValue, Settings, SettingsError};
use super::tables::{LookupTables, SpecialCutRates};

#[derive(Debug, Clone)]
pub struct PricingSnapshot {
    pub reference: ReferenceData,
    pub tables: LookupTables,
    pub settings: Settings,
    pub width_rules: Vec<WidthRule>,
    pub loaded_at: DateTime<Utc>,
}

/// Row counts of a snapshot, for monitoring
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnapshotInfo {
    pub loaded_at: DateTime<Utc>,
    pub materials: usize,
    pub cut_types: usize,
    pub finishes: usize,
    pub price_tiers: usize,
    pub coefficients: usize,
    pub finish_surcharges: usize,
    pub special_cuts: usize,
    pub ribbon_factors: usize,
    pub settings: usize,
}

impl PricingSnapshot {
    pub fn builder() -> SnapshotBuilder {
        SnapshotBuilder::default()
    }

    pub fn info(&self) -> SnapshotInfo {
        SnapshotInfo {
            loaded_at: self.loaded_at,
            materials: self.reference.material_count(),
            cut_types: self.reference.cut_type_count(),
            finishes: self.reference.finish_count(),
            price_tiers: self.tables.price_tiers.len(),
            coefficients: self.tables.coefficients.len(),
            finish_surcharges: self.tables.finish_surcharges.len(),
            special_cuts: self.tables.special_cuts.len(),
            ribbon_factors: self.tables.ribbon_factors.len(),
            settings: self.settings.len(),
        }
    }
}

/// Incremental construction of a [`PricingSnapshot`]
#[derive(Debug, Default)]
pub struct SnapshotBuilder {
    reference: ReferenceData,
    tables: LookupTables,
    settings: Settings,
    width_rules: Option<Vec<WidthRule>>,
}

impl SnapshotBuilder {
    pub fn material(mut self, id: i64, name: &str) -> Self {
        self.reference
            .insert_material(Material::new(MaterialId(id), name));
        self
    }

    pub fn cut_type(mut self, id: i64, name: &str, stored_code: i32) -> Self {
        self.reference
            .insert_cut_type(CutType::new(CutTypeId(id), name, stored_code));
        self
    }

    pub fn finish(mut self, id: i64, name: &str) -> Self {
        self.reference.insert_finish(Finish::new(FinishId(id), name));
        self
    }

    /// Mark a material as retired. It stays priceable for existing orders.
    pub fn deactivate_material(mut self, id: i64) -> Self {
        self.reference.set_material_active(MaterialId(id), false);
        self
    }

    pub fn deactivate_cut_type(mut self, id: i64) -> Self {
        self.reference.set_cut_type_active(CutTypeId(id), false);
        self
    }

    pub fn deactivate_finish(mut self, id: i64) -> Self {
        self.reference.set_finish_active(FinishId(id), false);
        self
    }

    pub fn price_tier(mut self, material: i64, tier: i32, price: Decimal) -> Self {
        self.tables
            .price_tiers
            .insert(MaterialId(material), tier, price);
        self
    }

    pub fn coefficient(
        mut self,
        width: i32,
        material: i64,
        cut_code: i32,
        coefficient: Decimal,
    ) -> Self {
        self.tables
            .coefficients
            .insert(width, MaterialId(material), cut_code, coefficient);
        self
    }

    pub fn finish_surcharge(mut self, width: i32, finish: i64, price: Decimal) -> Self {
        self.tables
            .finish_surcharges
            .insert(width, FinishId(finish), price);
        self
    }

    pub fn special_cut(mut self, width: i32, canvas: Decimal, satin: Decimal) -> Self {
        self.tables
            .special_cuts
            .insert(width, SpecialCutRates { canvas, satin });
        self
    }

    pub fn ribbon_factor(mut self, width: i32, factor: Decimal) -> Self {
        self.tables.ribbon_factors.insert(width, factor);
        self
    }

    pub fn setting(mut self, key: &str, value: SettingValue) -> Self {
        self.settings.insert(key, value);
        self
    }

    /// Decode a stored `(key, raw, data type)` setting row.
    pub fn raw_setting(mut self, key: &str, raw: &str, kind: &str) -> Result<Self, SettingsError> {
        self.settings.insert_raw(key, raw, kind)?;
        Ok(self)
    }

    /// Replace the legacy width rules.
    pub fn width_rules(mut self, rules: Vec<WidthRule>) -> Self {
        self.width_rules = Some(rules);
        self
    }

    pub fn build(self) -> PricingSnapshot {
        PricingSnapshot {
            reference: self.reference,
            tables: self.tables,
            settings: self.settings,
            width_rules: self.width_rules.unwrap_or_else(legacy_width_rules),
            loaded_at: Utc::now(),
        }
    }
}
