use thiserror::Error;
use tally_core::TallyError;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FinanceError {
    #[error("{field} must be a finite number, got {value}")]
    NotFinite { field: &'static str, value: f64 },

    #[error("principal must be greater than zero, got {0}")]
    NonPositivePrincipal(f64),

    #[error("annual interest rate cannot be negative, got {0}%")]
    NegativeRate(f64),

    #[error("tenure must be at least one month")]
    ZeroTenure,

    #[error("{field} cannot be negative, got {value}")]
    Negative { field: &'static str, value: f64 },

    #[error("tenure must be a whole number of months, got {0}")]
    FractionalMonths(f64),

    #[error("{0} years is not a whole number of months")]
    PartialMonthTenure(f64),

    #[error("tenure of {months} months exceeds the {max}-month limit")]
    TenureTooLong { months: f64, max: u32 },

    #[error("unknown tenure unit '{0}', expected months or years")]
    UnknownTenureUnit(String),

    #[error("{field} must be at most {max}, got {value}")]
    AgeOutOfRange { field: &'static str, value: u32, max: u32 },

    #[error("{0} is too large to represent")]
    NotRepresentable(&'static str),
}

impl FinanceError {
    pub(crate) fn check_finite(field: &'static str, value: f64) -> Result<f64, FinanceError> {
        if value.is_finite() {
            Ok(value)
        } else {
            Err(FinanceError::NotFinite { field, value })
        }
    }

    pub(crate) fn check_non_negative(field: &'static str, value: f64) -> Result<f64, FinanceError> {
        let value = Self::check_finite(field, value)?;
        if value < 0.0 {
            Err(FinanceError::Negative { field, value })
        } else {
            Ok(value)
        }
    }
}

impl From<FinanceError> for TallyError {
    fn from(e: FinanceError) -> Self {
        TallyError::invalid_input(e.to_string())
    }
}
