//! Typed pricing settings.
//!
//! Settings are stored as `(key, raw text, data type)` rows and decoded once
//! when a snapshot is built. Every accessor takes a default, so a missing or
//! mistyped setting never stops a calculation.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use std::str::FromStr;
use thiserror::Error;
use tracing::warn;

pub const ULTRASONIC_PERCENT: &str = "perc_ultrassonico";
pub const GENERAL_INCREASE_PERCENT: &str = "perc_aumento_geral";
pub const DEFAULT_COEFFICIENT: &str = "coeficiente_padrao";
pub const METRIC_CONSTANT: &str = "coeficiente_metragem_cm";
pub const CUT_CODE_POLICY: &str = "politica_codigo_corte";

pub const DEFAULT_ULTRASONIC_PERCENT: Decimal = dec!(1.15);
pub const DEFAULT_GENERAL_INCREASE_PERCENT: Decimal = dec!(1.0);
pub const DEFAULT_COEFFICIENT_FALLBACK: Decimal = dec!(0.75);
pub const DEFAULT_METRIC_CONSTANT: Decimal = dec!(0.330);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    #[error("unknown setting data type '{0}'")]
    UnknownType(String),

    #[error("invalid {kind} value '{raw}'")]
    InvalidValue { kind: SettingType, raw: String },

    #[error("unknown cut code policy '{0}'")]
    UnknownCutCodePolicy(String),
}

/// Declared data type of a stored setting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingType {
    Decimal,
    Integer,
    Text,
    Boolean,
}

impl std::fmt::Display for SettingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettingType::Decimal => write!(f, "decimal"),
            SettingType::Integer => write!(f, "integer"),
            SettingType::Text => write!(f, "text"),
            SettingType::Boolean => write!(f, "boolean"),
        }
    }
}

impl FromStr for SettingType {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "decimal" => Ok(SettingType::Decimal),
            "integer" => Ok(SettingType::Integer),
            "text" => Ok(SettingType::Text),
            "boolean" => Ok(SettingType::Boolean),
            other => Err(SettingsError::UnknownType(other.to_string())),
        }
    }
}

/// A decoded setting value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingValue {
    Decimal(Decimal),
    Integer(i64),
    Text(String),
    Boolean(bool),
}

impl SettingValue {
    /// Decode raw stored text according to its declared type.
    pub fn decode(raw: &str, kind: SettingType) -> Result<Self, SettingsError> {
        let invalid = || SettingsError::InvalidValue {
            kind,
            raw: raw.to_string(),
        };
        match kind {
            SettingType::Decimal => Decimal::from_str(raw.trim())
                .map(SettingValue::Decimal)
                .map_err(|_| invalid()),
            SettingType::Integer => raw
                .trim()
                .parse::<i64>()
                .map(SettingValue::Integer)
                .map_err(|_| invalid()),
            SettingType::Boolean => Ok(SettingValue::Boolean(matches!(
                raw.trim().to_lowercase().as_str(),
                "true" | "1" | "yes" | "sim"
            ))),
            SettingType::Text => Ok(SettingValue::Text(raw.to_string())),
        }
    }

    /// Numeric view; integers widen to decimals.
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            SettingValue::Decimal(value) => Some(*value),
            SettingValue::Integer(value) => Some(Decimal::from(*value)),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            SettingValue::Text(value) => Some(value),
            _ => None,
        }
    }
}

/// Which cut code keys the coefficient table lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CutCodePolicy {
    /// Character count of the cut type's display name
    #[default]
    NameLength,
    /// The code stored on the cut type
    Stored,
}

impl FromStr for CutCodePolicy {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "name_length" => Ok(CutCodePolicy::NameLength),
            "stored" => Ok(CutCodePolicy::Stored),
            other => Err(SettingsError::UnknownCutCodePolicy(other.to_string())),
        }
    }
}

/// Immutable set of decoded settings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    values: HashMap<String, SettingValue>,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: SettingValue) {
        self.values.insert(key.into(), value);
    }

    /// Decode and insert a stored row.
    pub fn insert_raw(&mut self, key: &str, raw: &str, kind: &str) -> Result<(), SettingsError> {
        let kind = kind.parse::<SettingType>()?;
        let value = SettingValue::decode(raw, kind)?;
        self.insert(key, value);
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&SettingValue> {
        self.values.get(key)
    }

    pub fn get_decimal(&self, key: &str, default: Decimal) -> Decimal {
        match self.values.get(key) {
            Some(value) => value.as_decimal().unwrap_or_else(|| {
                warn!("Setting {} is not numeric, using default {}", key, default);
                default
            }),
            None => default,
        }
    }

    pub fn get_text<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.values
            .get(key)
            .and_then(SettingValue::as_text)
            .unwrap_or(default)
    }

    pub fn ultrasonic_percent(&self) -> Decimal {
        self.get_decimal(ULTRASONIC_PERCENT, DEFAULT_ULTRASONIC_PERCENT)
    }

    pub fn general_increase_percent(&self) -> Decimal {
        self.get_decimal(GENERAL_INCREASE_PERCENT, DEFAULT_GENERAL_INCREASE_PERCENT)
    }

    pub fn default_coefficient(&self) -> Decimal {
        self.get_decimal(DEFAULT_COEFFICIENT, DEFAULT_COEFFICIENT_FALLBACK)
    }

    pub fn metric_constant(&self) -> Decimal {
        self.get_decimal(METRIC_CONSTANT, DEFAULT_METRIC_CONSTANT)
    }

    pub fn cut_code_policy(&self) -> CutCodePolicy {
        let raw = self.get_text(CUT_CODE_POLICY, "name_length");
        raw.parse().unwrap_or_else(|e| {
            warn!("{}, falling back to name_length", e);
            CutCodePolicy::NameLength
        })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
