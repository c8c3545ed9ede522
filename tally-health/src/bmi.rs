//! Body mass index

use std::fmt;
use std::str::FromStr;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;
use tally_core::{number::round_to, TallyError};

const CM_PER_M: f64 = 100.0;
const M_PER_INCH: f64 = 0.0254;
const KG_PER_POUND: f64 = 0.453592;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum HealthError {
    #[error("height must be greater than zero, got {0}")]
    NonPositiveHeight(f64),

    #[error("weight must be greater than zero, got {0}")]
    NonPositiveWeight(f64),

    #[error("{0} is not a finite number")]
    NotFinite(f64),

    #[error("unknown unit system '{0}', expected metric or imperial")]
    UnknownUnitSystem(String),
}

impl From<HealthError> for TallyError {
    fn from(e: HealthError) -> Self {
        TallyError::invalid_input(e.to_string()).in_calculator("bmi")
    }
}

/// Units for height and weight inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    /// Centimeters and kilograms
    #[default]
    Metric,
    /// Inches and pounds
    Imperial,
}

impl FromStr for UnitSystem {
    type Err = HealthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "metric" | "si" => Ok(UnitSystem::Metric),
            "imperial" | "us" => Ok(UnitSystem::Imperial),
            other => Err(HealthError::UnknownUnitSystem(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiCategory {
    pub const ALL: [BmiCategory; 4] = [
        BmiCategory::Underweight,
        BmiCategory::Normal,
        BmiCategory::Overweight,
        BmiCategory::Obese,
    ];

    /// Left-closed bands: [.., 18.5), [18.5, 25), [25, 30), [30, ..)
    pub fn classify(bmi: f64) -> Self {
        if bmi < 18.5 {
            BmiCategory::Underweight
        } else if bmi < 25.0 {
            BmiCategory::Normal
        } else if bmi < 30.0 {
            BmiCategory::Overweight
        } else {
            BmiCategory::Obese
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::Normal => "Normal weight",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese",
        }
    }

    /// Reference range as shown next to the result
    pub fn range_label(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Below 18.5",
            BmiCategory::Normal => "18.5 - 24.9",
            BmiCategory::Overweight => "25.0 - 29.9",
            BmiCategory::Obese => "30.0 and above",
        }
    }
}

impl fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BmiReading {
    /// Unrounded index, kg/m²
    pub value: f64,
    pub category: BmiCategory,
}

impl BmiReading {
    /// Index rounded to one decimal for display
    pub fn display_value(&self) -> f64 {
        round_to(self.value, 1)
    }
}

/// Compute BMI. Height is cm (metric) or inches (imperial); weight is kg or lb.
pub fn bmi(height: f64, weight: f64, system: UnitSystem) -> Result<BmiReading, HealthError> {
    for v in [height, weight] {
        if !v.is_finite() {
            return Err(HealthError::NotFinite(v));
        }
    }
    if height <= 0.0 {
        return Err(HealthError::NonPositiveHeight(height));
    }
    if weight <= 0.0 {
        return Err(HealthError::NonPositiveWeight(weight));
    }

    let (height_m, weight_kg) = match system {
        UnitSystem::Metric => (height / CM_PER_M, weight),
        UnitSystem::Imperial => (height * M_PER_INCH, weight * KG_PER_POUND),
    };

    let value = weight_kg / (height_m * height_m);
    let category = BmiCategory::classify(value);
    debug!(value, %category, "bmi computed");
    Ok(BmiReading { value, category })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_metric_bmi() {
        let reading = bmi(180.0, 90.0, UnitSystem::Metric).unwrap();
        assert_relative_eq!(reading.value, 27.777777777777, epsilon = 1e-9);
        assert_eq!(reading.display_value(), 27.8);
        assert_eq!(reading.category, BmiCategory::Overweight);
    }

    #[test]
    fn test_imperial_bmi() {
        let reading = bmi(70.0, 154.0, UnitSystem::Imperial).unwrap();
        assert_eq!(reading.display_value(), 22.1);
        assert_eq!(reading.category, BmiCategory::Normal);
    }

    #[test]
    fn test_boundaries_are_left_closed() {
        assert_eq!(BmiCategory::classify(18.4999), BmiCategory::Underweight);
        assert_eq!(BmiCategory::classify(18.5), BmiCategory::Normal);
        assert_eq!(BmiCategory::classify(24.9999), BmiCategory::Normal);
        assert_eq!(BmiCategory::classify(25.0), BmiCategory::Overweight);
        assert_eq!(BmiCategory::classify(29.9999), BmiCategory::Overweight);
        assert_eq!(BmiCategory::classify(30.0), BmiCategory::Obese);
    }

    #[test]
    fn test_classification_uses_unrounded_value() {
        // 24.96 displays as 25.0 but is still Normal
        let reading = bmi(100.0, 24.96, UnitSystem::Metric).unwrap();
        assert_eq!(reading.display_value(), 25.0);
        assert_eq!(reading.category, BmiCategory::Normal);
    }

    #[test]
    fn test_rejects_non_positive_height() {
        assert_eq!(bmi(0.0, 70.0, UnitSystem::Metric), Err(HealthError::NonPositiveHeight(0.0)));
        assert_eq!(bmi(-170.0, 70.0, UnitSystem::Metric), Err(HealthError::NonPositiveHeight(-170.0)));
        assert_eq!(bmi(170.0, 0.0, UnitSystem::Metric), Err(HealthError::NonPositiveWeight(0.0)));
        assert!(matches!(bmi(f64::NAN, 70.0, UnitSystem::Metric), Err(HealthError::NotFinite(_))));
    }

    #[test]
    fn test_labels() {
        assert_eq!(BmiCategory::Normal.to_string(), "Normal weight");
        assert_eq!(BmiCategory::Obese.range_label(), "30.0 and above");
    }

    #[test]
    fn test_unit_system_parse() {
        assert_eq!("Imperial".parse::<UnitSystem>(), Ok(UnitSystem::Imperial));
        assert_eq!("metric".parse::<UnitSystem>(), Ok(UnitSystem::Metric));
        assert!("cubits".parse::<UnitSystem>().is_err());
    }
}
