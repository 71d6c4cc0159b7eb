//! Database models for the legacy pricing tables.
//!
//! These models use sqlx's FromRow derive for direct database deserialization.
//! Column names are aliased to English in the queries; the tables themselves
//! keep the `orcamento_*` names of the spreadsheet-era schema.

use rust_decimal::Decimal;
use sqlx::FromRow;

/// Material from orcamento_tipomaterial
#[derive(Debug, Clone, FromRow)]
pub struct MaterialRow {
    pub id: i64,
    pub name: String,
    pub active: bool,
}

/// Cut type from orcamento_tipocorte
#[derive(Debug, Clone, FromRow)]
pub struct CutTypeRow {
    pub id: i64,
    pub name: String,
    /// `codigo_calc`, only used under the stored cut-code policy
    pub cut_code: i32,
    pub active: bool,
}

/// Finish from orcamento_acabamento
#[derive(Debug, Clone, FromRow)]
pub struct FinishRow {
    pub id: i64,
    pub name: String,
    pub active: bool,
}

/// Price per meter from orcamento_tabelapreco
#[derive(Debug, Clone, FromRow)]
pub struct PriceTierRow {
    pub material_id: i64,
    pub tier: i32,
    pub price: Decimal,
}

/// Width coefficient from orcamento_coeficientefator, joined to its cut code
#[derive(Debug, Clone, FromRow)]
pub struct CoefficientRow {
    pub width: i32,
    pub material_id: i64,
    pub cut_code: i32,
    pub coefficient: Decimal,
}

/// Finish surcharge from orcamento_precoacabamento
#[derive(Debug, Clone, FromRow)]
pub struct FinishPriceRow {
    pub width: i32,
    pub finish_id: i64,
    pub price: Decimal,
}

/// Special cut rates from orcamento_valorcorte
#[derive(Debug, Clone, FromRow)]
pub struct SpecialCutRow {
    pub width: i32,
    pub canvas: Decimal,
    pub satin: Decimal,
}

/// Ribbon factor from orcamento_fita
#[derive(Debug, Clone, FromRow)]
pub struct RibbonRow {
    pub width: i32,
    pub factor: Decimal,
}

/// Setting from orcamento_configuracao
#[derive(Debug, Clone, FromRow)]
pub struct SettingRow {
    pub key: String,
    pub value: String,
    pub data_type: String,
}
