//! Numeric input parsing and display rounding
//!
//! Calculators work on plain `f64`. Rounding only ever happens at the
//! presentation edge, never inside a formula.

use thiserror::Error;

/// Error type for number parsing
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NumberError {
    #[error("Invalid number format: {0}")]
    ParseError(String),

    #[error("Number is not finite: {0}")]
    NotFinite(String),
}

/// Parse user text into a finite `f64`.
///
/// Accepts surrounding whitespace around any decimal or scientific
/// literal. `NaN` and infinities are rejected.
pub fn parse_finite(s: &str) -> Result<f64, NumberError> {
    let trimmed = s.trim();
    let value: f64 = trimmed
        .parse()
        .map_err(|_| NumberError::ParseError(trimmed.to_string()))?;
    ensure_finite(value)
}

/// Reject NaN and infinities
pub fn ensure_finite(value: f64) -> Result<f64, NumberError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(NumberError::NotFinite(value.to_string()))
    }
}

/// Round half away from zero to `decimals` places
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    (value * scale).round() / scale
}

/// Fixed-point rendering, e.g. `format_fixed(3.28084, 2) == "3.28"`
pub fn format_fixed(value: f64, decimals: u32) -> String {
    format!("{:.*}", decimals as usize, round_to(value, decimals))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_finite() {
        assert_eq!(parse_finite("42"), Ok(42.0));
        assert_eq!(parse_finite(" 1.5e2 "), Ok(150.0));
        assert_eq!(parse_finite("-0.25"), Ok(-0.25));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(parse_finite("12abc"), Err(NumberError::ParseError(_))));
        assert!(matches!(parse_finite(""), Err(NumberError::ParseError(_))));
    }

    #[test]
    fn test_parse_rejects_non_finite() {
        assert!(matches!(parse_finite("NaN"), Err(NumberError::NotFinite(_))));
        assert!(matches!(parse_finite("inf"), Err(NumberError::NotFinite(_))));
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(22.857, 1), 22.9);
        assert_eq!(round_to(4339.12, 0), 4339.0);
        assert_eq!(round_to(-2.5, 0), -3.0);
    }

    #[test]
    fn test_format_fixed() {
        assert_eq!(format_fixed(3.28084, 2), "3.28");
        assert_eq!(format_fixed(85.0, 2), "85.00");
        assert_eq!(format_fixed(0.85, 4), "0.8500");
    }
}
