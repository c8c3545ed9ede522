//! Exchange-rate snapshots and the conversion rule

use std::collections::HashMap;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use crate::catalogue::{format_amount, format_rate};
use crate::error::{normalize_code, CurrencyError};

/// Multipliers from one base currency, replaced wholesale on every fetch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRateSnapshot {
    pub base: String,
    pub rates: HashMap<String, f64>,
    pub fetched_at: DateTime<Utc>,
}

impl ExchangeRateSnapshot {
    /// Codes are uppercased; non-finite or non-positive rates are dropped
    pub fn new(base: &str, rates: impl IntoIterator<Item = (String, f64)>) -> Self {
        ExchangeRateSnapshot {
            base: base.trim().to_ascii_uppercase(),
            rates: rates.into_iter()
                .filter(|(_, r)| r.is_finite() && *r > 0.0)
                .map(|(code, r)| (code.trim().to_ascii_uppercase(), r))
                .collect(),
            fetched_at: Utc::now(),
        }
    }

    pub fn with_fetched_at(mut self, at: DateTime<Utc>) -> Self {
        self.fetched_at = at;
        self
    }

    pub fn rate(&self, to: &str) -> Option<f64> {
        self.rates.get(&to.trim().to_ascii_uppercase()).copied()
    }

    pub fn is_for(&self, base: &str) -> bool {
        self.base.eq_ignore_ascii_case(base.trim())
    }
}

/// A converted amount with the rate used
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conversion {
    pub amount: f64,
    pub from: String,
    pub to: String,
    pub rate: f64,
    pub result: f64,
}

impl Conversion {
    /// "100.00 USD = 85.00 EUR"
    pub fn display(&self) -> String {
        format!("{} {} = {} {}", format_amount(self.amount), self.from, format_amount(self.result), self.to)
    }

    /// "1 USD = 0.8500 EUR"
    pub fn rate_display(&self) -> String {
        format!("1 {} = {} {}", self.from, format_rate(self.rate), self.to)
    }
}

/// Convert with the rate looked up in a snapshot keyed by `from`
pub fn convert(amount: f64, from: &str, to: &str, snapshot: &ExchangeRateSnapshot) -> Result<f64, CurrencyError> {
    convert_detailed(amount, from, to, snapshot).map(|c| c.result)
}

pub fn convert_detailed(amount: f64, from: &str, to: &str, snapshot: &ExchangeRateSnapshot) -> Result<Conversion, CurrencyError> {
    if !amount.is_finite() {
        return Err(CurrencyError::InvalidAmount(amount));
    }
    let from = normalize_code(from)?;
    let to = normalize_code(to)?;

    if !snapshot.is_for(&from) {
        return Err(CurrencyError::RateUnavailable(format!(
            "rates are for {}, not {}", snapshot.base, from
        )));
    }

    let rate = if from == to {
        1.0
    } else {
        snapshot.rate(&to).ok_or_else(|| {
            CurrencyError::RateUnavailable(format!("no {} rate in the {} snapshot", to, from))
        })?
    };

    let result = amount * rate;
    debug!(amount, %from, %to, rate, result, "currency converted");
    Ok(Conversion { amount, from, to, rate, result })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn usd() -> ExchangeRateSnapshot {
        ExchangeRateSnapshot::new("USD", [("EUR".to_string(), 0.85)])
    }

    #[test]
    fn test_usd_to_eur() {
        assert_relative_eq!(convert(100.0, "USD", "EUR", &usd()).unwrap(), 85.0, epsilon = 1e-12);
    }

    #[test]
    fn test_unknown_target_is_rate_unavailable() {
        let err = convert(100.0, "USD", "GBP", &usd()).unwrap_err();
        assert!(err.is_rate_unavailable());
    }

    #[test]
    fn test_snapshot_for_other_base_is_rate_unavailable() {
        let err = convert(100.0, "EUR", "USD", &usd()).unwrap_err();
        assert!(err.is_rate_unavailable());
    }

    #[test]
    fn test_same_currency() {
        assert_eq!(convert(42.0, "usd", "USD", &usd()), Ok(42.0));
    }

    #[test]
    fn test_non_finite_amount() {
        assert_eq!(convert(f64::NAN, "USD", "EUR", &usd()).map_err(|e| e.is_rate_unavailable()), Err(false));
    }

    #[test]
    fn test_bad_rates_are_dropped() {
        let snap = ExchangeRateSnapshot::new("usd", [
            ("eur".to_string(), 0.85),
            ("XXX".to_string(), f64::NAN),
            ("YYY".to_string(), -1.0),
        ]);
        assert_eq!(snap.base, "USD");
        assert_eq!(snap.rates.len(), 1);
        assert_eq!(snap.rate("EUR"), Some(0.85));
    }

    #[test]
    fn test_display() {
        let c = convert_detailed(100.0, "USD", "EUR", &usd()).unwrap();
        assert_eq!(c.display(), "100.00 USD = 85.00 EUR");
        assert_eq!(c.rate_display(), "1 USD = 0.8500 EUR");
    }
}
