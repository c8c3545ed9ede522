use thiserror::Error;
use tally_core::TallyError;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CurrencyError {
    /// No usable rate: snapshot missing, keyed by another base, or lacking the target
    #[error("{0}")]
    RateUnavailable(String),

    #[error("amount {0} is not a finite number")]
    InvalidAmount(f64),

    #[error("'{0}' is not a three-letter currency code")]
    InvalidCode(String),
}

impl CurrencyError {
    pub fn is_rate_unavailable(&self) -> bool {
        matches!(self, CurrencyError::RateUnavailable(_))
    }
}

impl From<CurrencyError> for TallyError {
    fn from(e: CurrencyError) -> Self {
        match e {
            CurrencyError::RateUnavailable(msg) => TallyError::rate_unavailable(msg),
            other => TallyError::invalid_input(other.to_string()),
        }
    }
}

/// Uppercase and validate an ISO 4217 style code
pub fn normalize_code(code: &str) -> Result<String, CurrencyError> {
    let code = code.trim();
    if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(code.to_ascii_uppercase())
    } else {
        Err(CurrencyError::InvalidCode(code.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_code() {
        assert_eq!(normalize_code(" usd "), Ok("USD".to_string()));
        assert!(normalize_code("US").is_err());
        assert!(normalize_code("U5D").is_err());
    }

    #[test]
    fn test_rate_unavailable_is_warning() {
        let err: TallyError = CurrencyError::RateUnavailable("loading".into()).into();
        assert!(err.is_warning());
        assert_eq!(err.code, tally_core::codes::RATE_UNAVAILABLE);
    }
}
