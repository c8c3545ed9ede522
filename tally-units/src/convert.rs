//! Conversion evaluator

use thiserror::Error;
use tracing::debug;
use tally_core::TallyError;
use crate::category::{CategoryKind, ConversionCategory};
use crate::registry::CATEGORIES;
use crate::temperature::{convert_temperature, TemperatureScale};
use crate::UnitDefinition;

/// Conversion failures
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    #[error("unit '{unit}' is not part of category '{category}'")]
    InvalidUnit { category: String, unit: String },

    #[error("value {0} is not a finite number")]
    InvalidInput(f64),

    #[error("unknown conversion category '{0}'")]
    UnknownCategory(String),

    #[error("{value} {from} is too large to express in {to}")]
    Overflow { value: f64, from: String, to: String },
}

impl From<ConversionError> for TallyError {
    fn from(e: ConversionError) -> Self {
        match e {
            ConversionError::InvalidUnit { category, unit } => TallyError::invalid_unit(&category, &unit),
            ConversionError::InvalidInput(v) => TallyError::invalid_input(format!("{} is not a finite number", v)),
            ConversionError::UnknownCategory(name) => TallyError::unknown_category(&name),
            e @ ConversionError::Overflow { .. } => TallyError::invalid_input(e.to_string()),
        }
    }
}

fn resolve<'a>(category: &'a ConversionCategory, unit: &str) -> Result<&'a UnitDefinition, ConversionError> {
    category.unit(unit).ok_or_else(|| ConversionError::InvalidUnit {
        category: category.name.to_string(),
        unit: unit.to_string(),
    })
}

/// Convert `value` from one unit of `category` to another.
///
/// Both units must belong to the category and `value` must be finite.
/// Same unit on both sides returns `value` untouched. Results are never rounded.
pub fn convert(category: &ConversionCategory, from: &str, to: &str, value: f64) -> Result<f64, ConversionError> {
    if !value.is_finite() {
        return Err(ConversionError::InvalidInput(value));
    }
    let from_unit = resolve(category, from)?;
    let to_unit = resolve(category, to)?;

    if from_unit.name == to_unit.name {
        return Ok(value);
    }

    let result = match category.kind {
        CategoryKind::Multiplicative => value * from_unit.factor / to_unit.factor,
        CategoryKind::Temperature => {
            match (from_unit.name.parse::<TemperatureScale>(), to_unit.name.parse::<TemperatureScale>()) {
                (Ok(f), Ok(t)) => convert_temperature(value, f, t),
                _ => value,
            }
        }
    };

    if !result.is_finite() {
        return Err(ConversionError::Overflow {
            value,
            from: from_unit.name.to_string(),
            to: to_unit.name.to_string(),
        });
    }

    debug!(category = category.name, from = from_unit.name, to = to_unit.name, value, result, "converted");
    Ok(result)
}

/// Look the category up by name, then convert
pub fn convert_in(category: &str, from: &str, to: &str, value: f64) -> Result<f64, ConversionError> {
    let cat = CATEGORIES.get(category)
        .ok_or_else(|| ConversionError::UnknownCategory(category.to_string()))?;
    convert(cat, from, to, value)
}

/// One conversion asked for by a caller, consumed by `evaluate`
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    pub category: String,
    pub from_unit: String,
    pub to_unit: String,
    pub value: f64,
}

impl ConversionRequest {
    pub fn new(category: impl Into<String>, from_unit: impl Into<String>, to_unit: impl Into<String>, value: f64) -> Self {
        ConversionRequest {
            category: category.into(),
            from_unit: from_unit.into(),
            to_unit: to_unit.into(),
            value,
        }
    }

    pub fn evaluate(self) -> Result<f64, ConversionError> {
        convert_in(&self.category, &self.from_unit, &self.to_unit, self.value)
    }
}
