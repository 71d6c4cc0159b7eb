//! Read-only lookup tables used by the quote calculation.
//!
//! Each table answers a single `resolve` query and reports how the match was
//! made, so the caller can decide on fallbacks and note them in the trace.
//! Tables are keyed by integer thresholds (length tier or width in mm) and
//! resolve with spreadsheet VLOOKUP semantics: the greatest key less than or
//! equal to the requested one.

use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use super::reference::{FinishId, MaterialId, SpecialCutFamily};

/// How a lookup key was matched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// Requested key exists in the table
    Exact,
    /// Greatest key below the requested one
    Floor,
    /// Nothing below the requested key; smallest key available
    Ascending,
}

/// A value found in a table together with the key it was found under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved<V> {
    pub key: i32,
    pub value: V,
    pub kind: MatchKind,
}

impl<V> Resolved<V> {
    pub fn is_fallback(&self) -> bool {
        self.kind != MatchKind::Exact
    }

    pub fn map<U>(self, f: impl FnOnce(V) -> U) -> Resolved<U> {
        Resolved {
            key: self.key,
            value: f(self.value),
            kind: self.kind,
        }
    }
}

/// Ordered index over integer thresholds.
#[derive(Debug, Clone)]
pub struct FloorIndex<V> {
    entries: BTreeMap<i32, V>,
}

impl<V> Default for FloorIndex<V> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<V: Copy> FloorIndex<V> {
    pub fn insert(&mut self, key: i32, value: V) {
        self.entries.insert(key, value);
    }

    /// Greatest key <= `key`. An equal key is reported as an exact match.
    pub fn floor(&self, key: i32) -> Option<Resolved<V>> {
        self.entries
            .range(..=key)
            .next_back()
            .map(|(&found, &value)| Resolved {
                key: found,
                value,
                kind: if found == key {
                    MatchKind::Exact
                } else {
                    MatchKind::Floor
                },
            })
    }

    /// Smallest key in the index.
    pub fn lowest(&self) -> Option<Resolved<V>> {
        self.entries
            .iter()
            .next()
            .map(|(&found, &value)| Resolved {
                key: found,
                value,
                kind: MatchKind::Ascending,
            })
    }

    pub fn iter(&self) -> impl Iterator<Item = (i32, V)> + '_ {
        self.entries.iter().map(|(&k, &v)| (k, v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Price per meter by (length tier, material)
#[derive(Debug, Clone, Default)]
pub struct PriceTierTable {
    by_material: HashMap<MaterialId, FloorIndex<Decimal>>,
}

impl PriceTierTable {
    pub fn insert(&mut self, material: MaterialId, tier: i32, price: Decimal) {
        self.by_material.entry(material).or_default().insert(tier, price);
    }

    /// Greatest tier <= requested; otherwise the material's smallest tier.
    ///
    /// `None` only when the material has no tiers at all.
    pub fn resolve(&self, tier: i32, material: MaterialId) -> Option<Resolved<Decimal>> {
        let index = self.by_material.get(&material)?;
        index.floor(tier).or_else(|| index.lowest())
    }

    /// All tiers of a material in ascending order
    pub fn tiers(&self, material: MaterialId) -> Vec<(i32, Decimal)> {
        self.by_material
            .get(&material)
            .map(|index| index.iter().collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.by_material.values().map(FloorIndex::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Coefficient by (width, material, cut code)
#[derive(Debug, Clone, Default)]
pub struct WidthCoefficientTable {
    by_key: HashMap<(MaterialId, i32), FloorIndex<Decimal>>,
}

impl WidthCoefficientTable {
    pub fn insert(
        &mut self,
        width: i32,
        material: MaterialId,
        cut_code: i32,
        coefficient: Decimal,
    ) {
        self.by_key
            .entry((material, cut_code))
            .or_default()
            .insert(width, coefficient);
    }

    /// Exact width, else the greatest configured width below it for the same
    /// material and cut code.
    pub fn resolve(
        &self,
        width: i32,
        material: MaterialId,
        cut_code: i32,
    ) -> Option<Resolved<Decimal>> {
        self.by_key.get(&(material, cut_code))?.floor(width)
    }

    pub fn len(&self) -> usize {
        self.by_key.values().map(FloorIndex::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Finish surcharge per meter by (width, finish)
#[derive(Debug, Clone, Default)]
pub struct FinishSurchargeTable {
    by_finish: HashMap<FinishId, FloorIndex<Decimal>>,
}

impl FinishSurchargeTable {
    pub fn insert(&mut self, width: i32, finish: FinishId, price: Decimal) {
        self.by_finish.entry(finish).or_default().insert(width, price);
    }

    pub fn resolve(&self, width: i32, finish: FinishId) -> Option<Resolved<Decimal>> {
        self.by_finish.get(&finish)?.floor(width)
    }

    pub fn len(&self) -> usize {
        self.by_finish.values().map(FloorIndex::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Special-cut surcharges for one width row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecialCutRates {
    pub canvas: Decimal,
    pub satin: Decimal,
}

impl SpecialCutRates {
    pub fn for_family(&self, family: SpecialCutFamily) -> Decimal {
        match family {
            SpecialCutFamily::Canvas => self.canvas,
            SpecialCutFamily::Satin => self.satin,
        }
    }
}

/// Special-cut surcharge per meter by width
#[derive(Debug, Clone, Default)]
pub struct SpecialCutTable {
    rates: FloorIndex<SpecialCutRates>,
}

impl SpecialCutTable {
    pub fn insert(&mut self, width: i32, rates: SpecialCutRates) {
        self.rates.insert(width, rates);
    }

    pub fn resolve(&self, width: i32, family: SpecialCutFamily) -> Option<Resolved<Decimal>> {
        self.rates
            .floor(width)
            .map(|found| found.map(|rates| rates.for_family(family)))
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

/// Ribbon conversion factor by width
#[derive(Debug, Clone, Default)]
pub struct RibbonFactorTable {
    factors: FloorIndex<Decimal>,
}

impl RibbonFactorTable {
    pub fn insert(&mut self, width: i32, factor: Decimal) {
        self.factors.insert(width, factor);
    }

    pub fn resolve(&self, width: i32) -> Option<Resolved<Decimal>> {
        self.factors.floor(width)
    }

    pub fn len(&self) -> usize {
        self.factors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }
}

/// All five lookup tables of a snapshot
#[derive(Debug, Clone, Default)]
pub struct LookupTables {
    pub price_tiers: PriceTierTable,
    pub coefficients: WidthCoefficientTable,
    pub finish_surcharges: FinishSurchargeTable,
    pub special_cuts: SpecialCutTable,
    pub ribbon_factors: RibbonFactorTable,
}
