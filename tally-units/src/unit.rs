//! Unit representation with conversion factors

use std::fmt;
use serde::Serialize;

/// A unit within one conversion category
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UnitDefinition {
    /// Display name, unique within its category (e.g. "Meter")
    pub name: &'static str,
    /// Symbol (e.g. "m")
    pub symbol: &'static str,
    /// How many category base units one of this unit is worth
    pub factor: f64,
}

impl UnitDefinition {
    pub const fn new(name: &'static str, symbol: &'static str, factor: f64) -> Self {
        UnitDefinition { name, symbol, factor }
    }

    /// Check if this is the category base unit
    pub fn is_base(&self) -> bool {
        self.factor == 1.0
    }

    /// Whether `query` names this unit: exact name, name ignoring case, or symbol
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim();
        self.name == query || self.name.eq_ignore_ascii_case(query) || self.symbol == query
    }

    /// Convert a value in this unit to the category base unit
    pub fn to_base(&self, value: f64) -> f64 {
        value * self.factor
    }

    /// Convert a value in the category base unit to this unit
    pub fn from_base(&self, value: f64) -> f64 {
        value / self.factor
    }
}

impl fmt::Display for UnitDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const METER: UnitDefinition = UnitDefinition::new("Meter", "m", 1.0);
    const KILOMETER: UnitDefinition = UnitDefinition::new("Kilometer", "km", 1000.0);

    #[test]
    fn test_base_unit() {
        assert!(METER.is_base());
        assert!(!KILOMETER.is_base());
    }

    #[test]
    fn test_matches_name_case_and_symbol() {
        assert!(KILOMETER.matches("Kilometer"));
        assert!(KILOMETER.matches("kilometer"));
        assert!(KILOMETER.matches("km"));
        assert!(!KILOMETER.matches("KM"));
        assert!(!KILOMETER.matches("meter"));
    }

    #[test]
    fn test_to_and_from_base() {
        assert_eq!(KILOMETER.to_base(5.0), 5000.0);
        assert_eq!(KILOMETER.from_base(5000.0), 5.0);
    }

    #[test]
    fn test_display() {
        assert_eq!(KILOMETER.to_string(), "Kilometer (km)");
    }
}
