//! Server configuration read from the environment at start-up

use std::env;
use tally_currency::{HttpRateSource, RateSource, StaticRateSource, DEFAULT_RATES_URL};
use tally_plugin::DEFAULT_DECIMALS;
use tracing::warn;

pub const RATES_URL_VAR: &str = "TALLY_RATES_URL";
pub const DECIMALS_VAR: &str = "TALLY_DECIMALS";

/// Value of `TALLY_RATES_URL` that selects the built-in reference table
pub const REFERENCE_RATES: &str = "reference";

/// Largest accepted `TALLY_DECIMALS`
pub const MAX_DECIMALS: u32 = 15;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RatesConfig {
    Http(String),
    Reference,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub rates: RatesConfig,
    pub decimals: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            rates: RatesConfig::Http(DEFAULT_RATES_URL.to_string()),
            decimals: DEFAULT_DECIMALS,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup. Invalid values fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(url) = lookup(RATES_URL_VAR).map(|s| s.trim().to_string()) {
            if url.eq_ignore_ascii_case(REFERENCE_RATES) {
                config.rates = RatesConfig::Reference;
            } else if url.starts_with("http://") || url.starts_with("https://") {
                config.rates = RatesConfig::Http(url);
            } else {
                warn!(var = RATES_URL_VAR, value = %url, "not an http(s) url, using default");
            }
        }

        if let Some(raw) = lookup(DECIMALS_VAR) {
            match raw.trim().parse::<u32>() {
                Ok(d) if d <= MAX_DECIMALS => config.decimals = d,
                _ => warn!(var = DECIMALS_VAR, value = %raw, default = DEFAULT_DECIMALS, "invalid decimals, using default"),
            }
        }

        config
    }

    pub fn rate_source(&self) -> Box<dyn RateSource> {
        match &self.rates {
            RatesConfig::Http(url) => Box::new(HttpRateSource::new(url.clone())),
            RatesConfig::Reference => Box::new(StaticRateSource::reference()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[]));
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.rates, RatesConfig::Http(DEFAULT_RATES_URL.to_string()));
        assert_eq!(config.decimals, 6);
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(lookup(&[
            (RATES_URL_VAR, "http://localhost:8080/latest"),
            (DECIMALS_VAR, " 3 "),
        ]));
        assert_eq!(config.rates, RatesConfig::Http("http://localhost:8080/latest".to_string()));
        assert_eq!(config.decimals, 3);
    }

    #[test]
    fn test_reference_rates() {
        let config = ServerConfig::from_lookup(lookup(&[(RATES_URL_VAR, "Reference")]));
        assert_eq!(config.rates, RatesConfig::Reference);
        assert_eq!(config.rate_source().name(), "reference");
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = ServerConfig::from_lookup(lookup(&[
            (RATES_URL_VAR, "ftp://rates"),
            (DECIMALS_VAR, "many"),
        ]));
        assert_eq!(config, ServerConfig::default());

        let config = ServerConfig::from_lookup(lookup(&[(DECIMALS_VAR, "99")]));
        assert_eq!(config.decimals, DEFAULT_DECIMALS);
    }
}
