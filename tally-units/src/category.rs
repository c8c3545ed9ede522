//! Conversion categories

use std::fmt;
use serde::Serialize;
use crate::UnitDefinition;

/// How values move between units of a category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryKind {
    /// `value * from.factor / to.factor`
    Multiplicative,
    /// Affine Celsius/Fahrenheit/Kelvin formulas; factors are unused
    Temperature,
}

/// A family of comparable quantities sharing a base unit
#[derive(Debug, Clone, Serialize)]
pub struct ConversionCategory {
    /// Slug used in routes and lookups (e.g. "angular-velocity")
    pub name: &'static str,
    /// Display title (e.g. "Angular Velocity")
    pub title: &'static str,
    pub kind: CategoryKind,
    pub units: Vec<UnitDefinition>,
}

impl ConversionCategory {
    pub fn multiplicative(name: &'static str, title: &'static str, units: &[UnitDefinition]) -> Self {
        ConversionCategory { name, title, kind: CategoryKind::Multiplicative, units: units.to_vec() }
    }

    pub fn temperature(name: &'static str, title: &'static str, units: &[UnitDefinition]) -> Self {
        ConversionCategory { name, title, kind: CategoryKind::Temperature, units: units.to_vec() }
    }

    /// Find a unit by exact name, case-insensitive name, or symbol
    pub fn unit(&self, query: &str) -> Option<&UnitDefinition> {
        self.units.iter().find(|u| u.name == query.trim())
            .or_else(|| self.units.iter().find(|u| u.matches(query)))
    }

    /// The unit whose factor is 1 (None for temperature)
    pub fn base_unit(&self) -> Option<&UnitDefinition> {
        match self.kind {
            CategoryKind::Multiplicative => self.units.iter().find(|u| u.is_base()),
            CategoryKind::Temperature => None,
        }
    }

    pub fn unit_names(&self) -> Vec<&'static str> {
        self.units.iter().map(|u| u.name).collect()
    }
}

impl fmt::Display for ConversionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn length() -> ConversionCategory {
        ConversionCategory::multiplicative("length", "Length", &[
            UnitDefinition::new("Meter", "m", 1.0),
            UnitDefinition::new("Foot", "ft", 0.3048),
            UnitDefinition::new("Minute of arc", "m'", 2.0),
        ])
    }

    #[test]
    fn test_unit_lookup() {
        let cat = length();
        assert_eq!(cat.unit("Foot").map(|u| u.symbol), Some("ft"));
        assert_eq!(cat.unit("foot").map(|u| u.symbol), Some("ft"));
        assert_eq!(cat.unit("ft").map(|u| u.name), Some("Foot"));
        assert!(cat.unit("furlong").is_none());
    }

    #[test]
    fn test_exact_name_wins_over_symbol() {
        let cat = length();
        assert_eq!(cat.unit("Meter").map(|u| u.factor), Some(1.0));
    }

    #[test]
    fn test_base_unit() {
        assert_eq!(length().base_unit().map(|u| u.name), Some("Meter"));
        let temp = ConversionCategory::temperature("temperature", "Temperature", &[
            UnitDefinition::new("Celsius", "°C", 1.0),
            UnitDefinition::new("Kelvin", "K", 1.0),
        ]);
        assert!(temp.base_unit().is_none());
    }
}
