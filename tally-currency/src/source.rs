//! Rate sources: the live HTTP endpoint and a fixed reference table

use std::collections::HashMap;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};
use crate::error::{normalize_code, CurrencyError};
use crate::snapshot::ExchangeRateSnapshot;

pub const DEFAULT_RATES_URL: &str = "https://api.exchangerate.host/latest";

/// Where exchange-rate snapshots come from. One attempt per call, no retry.
#[async_trait]
pub trait RateSource: Send + Sync {
    fn name(&self) -> &'static str;

    async fn fetch(&self, base: &str) -> Result<ExchangeRateSnapshot, CurrencyError>;
}

/// Upstream payload: `{ "success": true, "base": "USD", "date": "...", "rates": {...} }`
#[derive(Debug, Deserialize)]
struct RatesResponse {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    base: Option<String>,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    rates: Option<HashMap<String, f64>>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

/// Decode an upstream body into a snapshot for `requested_base`
pub fn parse_response(body: &str, requested_base: &str) -> Result<ExchangeRateSnapshot, CurrencyError> {
    let response: RatesResponse = serde_json::from_str(body)
        .map_err(|e| CurrencyError::RateUnavailable(format!("malformed rate response: {}", e)))?;

    if response.success == Some(false) {
        let detail = response.error
            .map(|e| e.to_string())
            .unwrap_or_else(|| "no detail".to_string());
        return Err(CurrencyError::RateUnavailable(format!("rate source reported failure: {}", detail)));
    }

    let rates = response.rates
        .filter(|r| !r.is_empty())
        .ok_or_else(|| CurrencyError::RateUnavailable("rate response carried no rates".to_string()))?;

    let base = response.base.unwrap_or_else(|| requested_base.to_string());
    if !base.eq_ignore_ascii_case(requested_base) {
        return Err(CurrencyError::RateUnavailable(format!(
            "asked for {} rates, received {}", requested_base, base
        )));
    }

    debug!(%base, date = response.date.as_deref().unwrap_or("-"), count = rates.len(), "rates decoded");
    Ok(ExchangeRateSnapshot::new(&base, rates))
}

/// Live rates over HTTP: `GET <url>?base=<CODE>`
pub struct HttpRateSource {
    client: reqwest::Client,
    url: String,
}

impl HttpRateSource {
    pub fn new(url: impl Into<String>) -> Self {
        HttpRateSource { client: reqwest::Client::new(), url: url.into() }
    }

    pub fn with_client(client: reqwest::Client, url: impl Into<String>) -> Self {
        HttpRateSource { client, url: url.into() }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Default for HttpRateSource {
    fn default() -> Self {
        Self::new(DEFAULT_RATES_URL)
    }
}

#[async_trait]
impl RateSource for HttpRateSource {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn fetch(&self, base: &str) -> Result<ExchangeRateSnapshot, CurrencyError> {
        let base = normalize_code(base)?;
        debug!(url = %self.url, %base, "fetching rates");

        let response = self.client
            .get(&self.url)
            .query(&[("base", base.as_str())])
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, %base, "rate request failed");
                CurrencyError::RateUnavailable(format!("rate request failed: {}", e))
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CurrencyError::RateUnavailable(format!("could not read rate response: {}", e)))?;

        if !status.is_success() {
            warn!(%status, %base, "rate source returned an error status");
            return Err(CurrencyError::RateUnavailable(format!("rate source returned {}", status)));
        }

        parse_response(&body, &base)
    }
}

/// Fixed cross-rate table among the catalogue currencies, for offline use
pub struct StaticRateSource {
    table: HashMap<String, HashMap<String, f64>>,
}

impl StaticRateSource {
    pub fn new(table: HashMap<String, HashMap<String, f64>>) -> Self {
        StaticRateSource { table }
    }

    /// Indicative rates between the seven catalogue currencies
    pub fn reference() -> Self {
        const TABLE: [(&str, [(&str, f64); 6]); 7] = [
            ("USD", [("EUR", 0.85), ("GBP", 0.73), ("JPY", 110.0), ("INR", 74.5), ("AUD", 1.35), ("CAD", 1.25)]),
            ("EUR", [("USD", 1.18), ("GBP", 0.86), ("JPY", 129.5), ("INR", 87.8), ("AUD", 1.59), ("CAD", 1.47)]),
            ("GBP", [("USD", 1.37), ("EUR", 1.16), ("JPY", 150.8), ("INR", 102.1), ("AUD", 1.85), ("CAD", 1.71)]),
            ("JPY", [("USD", 0.0091), ("EUR", 0.0077), ("GBP", 0.0066), ("INR", 0.68), ("AUD", 0.012), ("CAD", 0.011)]),
            ("INR", [("USD", 0.013), ("EUR", 0.011), ("GBP", 0.0098), ("JPY", 1.48), ("AUD", 0.018), ("CAD", 0.017)]),
            ("AUD", [("USD", 0.74), ("EUR", 0.63), ("GBP", 0.54), ("JPY", 81.5), ("INR", 55.2), ("CAD", 0.93)]),
            ("CAD", [("USD", 0.80), ("EUR", 0.68), ("GBP", 0.58), ("JPY", 88.0), ("INR", 59.6), ("AUD", 1.08)]),
        ];
        let table = TABLE.iter()
            .map(|(base, rates)| {
                let rates = rates.iter().map(|(code, r)| (code.to_string(), *r)).collect();
                (base.to_string(), rates)
            })
            .collect();
        StaticRateSource { table }
    }
}

#[async_trait]
impl RateSource for StaticRateSource {
    fn name(&self) -> &'static str {
        "reference"
    }

    async fn fetch(&self, base: &str) -> Result<ExchangeRateSnapshot, CurrencyError> {
        let base = normalize_code(base)?;
        let rates = self.table.get(&base)
            .ok_or_else(|| CurrencyError::RateUnavailable(format!("no reference rates for {}", base)))?;
        Ok(ExchangeRateSnapshot::new(&base, rates.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_success() {
        let body = r#"{"success":true,"base":"USD","date":"2024-05-01","rates":{"EUR":0.93,"INR":83.4}}"#;
        let snap = parse_response(body, "USD").unwrap();
        assert_eq!(snap.base, "USD");
        assert_eq!(snap.rate("INR"), Some(83.4));
    }

    #[test]
    fn test_parse_reported_failure() {
        let body = r#"{"success":false,"error":{"code":101,"type":"missing_access_key"}}"#;
        let err = parse_response(body, "USD").unwrap_err();
        assert!(err.is_rate_unavailable());
        assert!(err.to_string().contains("missing_access_key"));
    }

    #[test]
    fn test_parse_missing_rates() {
        assert!(parse_response(r#"{"success":true,"base":"USD"}"#, "USD").unwrap_err().is_rate_unavailable());
        assert!(parse_response(r#"{"success":true,"rates":{}}"#, "USD").unwrap_err().is_rate_unavailable());
    }

    #[test]
    fn test_parse_garbage() {
        assert!(parse_response("<html>rate limited</html>", "USD").unwrap_err().is_rate_unavailable());
    }

    #[test]
    fn test_parse_base_mismatch() {
        let body = r#"{"success":true,"base":"EUR","rates":{"USD":1.08}}"#;
        assert!(parse_response(body, "USD").is_err());
    }

    #[test]
    fn test_parse_without_base_uses_request() {
        let snap = parse_response(r#"{"rates":{"EUR":0.9}}"#, "USD").unwrap();
        assert_eq!(snap.base, "USD");
    }

    #[tokio::test]
    async fn test_reference_source() {
        let source = StaticRateSource::reference();
        let snap = source.fetch("usd").await.unwrap();
        assert_eq!(snap.rate("EUR"), Some(0.85));
        assert_eq!(snap.rates.len(), 6);
        assert!(source.fetch("XYZ").await.unwrap_err().is_rate_unavailable());
    }
}
