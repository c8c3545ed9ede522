//! Equated monthly installment (EMI) for an amortizing loan

use std::str::FromStr;
use serde::Serialize;
use tracing::debug;
use tally_core::number::round_to;
use crate::FinanceError;

/// Longest accepted tenure: 100 years
pub const MAX_TENURE_MONTHS: u32 = 1_200;

/// Loan tenure, in whole months or in years that add up to whole months
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "unit", content = "count", rename_all = "lowercase")]
pub enum Tenure {
    Months(u32),
    Years(f64),
}

impl Tenure {
    /// Tenure in months. `Years(2.5)` is 30 months; `Years(2.55)` is rejected.
    pub fn months(&self) -> Result<u32, FinanceError> {
        match *self {
            Tenure::Months(m) => Ok(m),
            Tenure::Years(y) => {
                let months = FinanceError::check_non_negative("tenure", y)? * 12.0;
                let whole = months.round();
                if (months - whole).abs() > 1e-9 {
                    return Err(FinanceError::PartialMonthTenure(y));
                }
                if whole > f64::from(MAX_TENURE_MONTHS) {
                    return Err(FinanceError::TenureTooLong { months: whole, max: MAX_TENURE_MONTHS });
                }
                Ok(whole as u32)
            }
        }
    }

    /// Build from a count and a unit name ("months" / "years")
    pub fn from_unit(count: f64, unit: &str) -> Result<Self, FinanceError> {
        let count = FinanceError::check_non_negative("tenure", count)?;
        match TenureUnit::from_str(unit)? {
            TenureUnit::Months => {
                if count.fract() != 0.0 {
                    return Err(FinanceError::FractionalMonths(count));
                }
                if count > f64::from(MAX_TENURE_MONTHS) {
                    return Err(FinanceError::TenureTooLong { months: count, max: MAX_TENURE_MONTHS });
                }
                Ok(Tenure::Months(count as u32))
            }
            TenureUnit::Years => Ok(Tenure::Years(count)),
        }
    }
}

enum TenureUnit {
    Months,
    Years,
}

impl FromStr for TenureUnit {
    type Err = FinanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "m" | "month" | "months" => Ok(TenureUnit::Months),
            "y" | "year" | "years" => Ok(TenureUnit::Years),
            other => Err(FinanceError::UnknownTenureUnit(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LoanParameters {
    pub principal: f64,
    pub annual_rate_percent: f64,
    pub tenure: Tenure,
}

impl LoanParameters {
    pub fn new(principal: f64, annual_rate_percent: f64, tenure: Tenure) -> Self {
        LoanParameters { principal, annual_rate_percent, tenure }
    }

    pub fn tenure_months(&self) -> Result<u32, FinanceError> {
        self.tenure.months()
    }

    pub fn monthly_rate(&self) -> f64 {
        self.annual_rate_percent / 100.0 / 12.0
    }

    /// Checks every input and returns the tenure in months
    fn validate(&self) -> Result<u32, FinanceError> {
        FinanceError::check_finite("principal", self.principal)?;
        FinanceError::check_finite("annual rate", self.annual_rate_percent)?;
        if self.principal <= 0.0 {
            return Err(FinanceError::NonPositivePrincipal(self.principal));
        }
        if self.annual_rate_percent < 0.0 {
            return Err(FinanceError::NegativeRate(self.annual_rate_percent));
        }
        let months = self.tenure_months()?;
        if months == 0 {
            return Err(FinanceError::ZeroTenure);
        }
        if months > MAX_TENURE_MONTHS {
            return Err(FinanceError::TenureTooLong { months: f64::from(months), max: MAX_TENURE_MONTHS });
        }
        Ok(months)
    }

    /// Monthly payment and totals
    pub fn breakdown(&self) -> Result<EmiBreakdown, FinanceError> {
        let n = self.validate()?;
        let monthly = monthly_payment(self.principal, self.monthly_rate(), n);
        let total_payment = monthly * f64::from(n);
        if !monthly.is_finite() || !total_payment.is_finite() {
            return Err(FinanceError::NotRepresentable("monthly payment"));
        }
        let breakdown = EmiBreakdown {
            monthly,
            total_interest: total_payment - self.principal,
            total_payment,
        };
        debug!(principal = self.principal, rate = self.annual_rate_percent, months = n, monthly, "emi computed");
        Ok(breakdown)
    }

    /// Month-by-month split of each payment into interest and principal
    pub fn amortization_schedule(&self) -> Result<Vec<AmortizationRow>, FinanceError> {
        let breakdown = self.breakdown()?;
        let rate = self.monthly_rate();
        let n = self.validate()?;

        let mut balance = self.principal;
        let mut rows = Vec::with_capacity(n as usize);
        for month in 1..=n {
            let interest = balance * rate;
            let principal = breakdown.monthly - interest;
            balance -= principal;
            if month == n {
                // absorb floating-point drift on the final payment
                balance = 0.0;
            }
            rows.push(AmortizationRow {
                month,
                payment: breakdown.monthly,
                principal,
                interest,
                balance,
            });
        }
        Ok(rows)
    }
}

/// `P·r·(1+r)^n / ((1+r)^n − 1)`, with `(1+r)^n − 1` taken as `expm1(n·ln1p(r))`
/// so tiny rates keep their precision. A zero denominator means P/n.
fn monthly_payment(principal: f64, monthly_rate: f64, months: u32) -> f64 {
    let n = f64::from(months);
    let exponent = n * monthly_rate.ln_1p();
    let growth_less_one = exponent.exp_m1();
    if growth_less_one == 0.0 {
        return principal / n;
    }
    principal * monthly_rate * exponent.exp() / growth_less_one
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EmiBreakdown {
    pub monthly: f64,
    pub total_interest: f64,
    pub total_payment: f64,
}

impl EmiBreakdown {
    /// Whole-currency rounding for display
    pub fn rounded(&self) -> EmiBreakdown {
        EmiBreakdown {
            monthly: round_to(self.monthly, 0),
            total_interest: round_to(self.total_interest, 0),
            total_payment: round_to(self.total_payment, 0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AmortizationRow {
    pub month: u32,
    pub payment: f64,
    pub principal: f64,
    pub interest: f64,
    /// Outstanding principal after this payment
    pub balance: f64,
}

/// EMI for a tenure given in months
pub fn emi(principal: f64, annual_rate_percent: f64, tenure_months: u32) -> Result<EmiBreakdown, FinanceError> {
    LoanParameters::new(principal, annual_rate_percent, Tenure::Months(tenure_months)).breakdown()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_home_loan_emi() {
        let b = emi(500_000.0, 8.5, 240).unwrap();
        assert!(b.monthly > 4338.0 && b.monthly < 4341.0, "monthly was {}", b.monthly);
        assert_relative_eq!(b.total_payment, b.monthly * 240.0, max_relative = 1e-12);
        assert_relative_eq!(b.total_interest, b.total_payment - 500_000.0, max_relative = 1e-12);
        assert_eq!(b.rounded().monthly, 4339.0);
    }

    #[test]
    fn test_years_tenure_matches_months() {
        let years = LoanParameters::new(500_000.0, 8.5, Tenure::Years(20.0)).breakdown().unwrap();
        let months = emi(500_000.0, 8.5, 240).unwrap();
        assert_eq!(years, months);
    }

    #[test]
    fn test_zero_rate_divides_evenly() {
        let b = emi(120_000.0, 0.0, 24).unwrap();
        assert_eq!(b.monthly, 120_000.0 / 24.0);
        assert_eq!(b.total_interest, 0.0);
        assert!(b.monthly.is_finite());
    }

    #[test]
    fn test_invalid_parameters() {
        assert_eq!(emi(0.0, 8.5, 12), Err(FinanceError::NonPositivePrincipal(0.0)));
        assert_eq!(emi(1000.0, -1.0, 12), Err(FinanceError::NegativeRate(-1.0)));
        assert_eq!(emi(1000.0, 8.5, 0), Err(FinanceError::ZeroTenure));
        assert!(matches!(emi(f64::NAN, 8.5, 12), Err(FinanceError::NotFinite { .. })));
    }

    #[test]
    fn test_amortization_schedule_pays_off_loan() {
        let params = LoanParameters::new(100_000.0, 12.0, Tenure::Years(1.0));
        let schedule = params.amortization_schedule().unwrap();
        assert_eq!(schedule.len(), 12);
        assert_relative_eq!(schedule[0].interest, 1000.0, epsilon = 1e-9);
        let principal_paid: f64 = schedule.iter().map(|r| r.principal).sum();
        assert_relative_eq!(principal_paid, 100_000.0, epsilon = 1e-6);
        assert_eq!(schedule.last().map(|r| r.balance), Some(0.0));
        assert!(schedule.windows(2).all(|w| w[1].interest < w[0].interest));
    }

    #[test]
    fn test_tenure_from_unit() {
        assert_eq!(Tenure::from_unit(5.0, "years"), Ok(Tenure::Years(5.0)));
        assert_eq!(Tenure::from_unit(5.0, "Months"), Ok(Tenure::Months(5)));
        assert_eq!(
            Tenure::from_unit(5.0, "fortnights"),
            Err(FinanceError::UnknownTenureUnit("fortnights".to_string()))
        );
        assert_eq!(Tenure::Years(5.0).months(), Ok(60));
    }

    #[test]
    fn test_fractional_years_tenure() {
        let tenure = Tenure::from_unit(2.5, "years").unwrap();
        assert_eq!(tenure.months(), Ok(30));
        let by_years = LoanParameters::new(500_000.0, 8.5, tenure).breakdown().unwrap();
        assert_eq!(by_years, emi(500_000.0, 8.5, 30).unwrap());

        assert_eq!(Tenure::Years(2.55).months(), Err(FinanceError::PartialMonthTenure(2.55)));
        assert_eq!(Tenure::from_unit(2.5, "months"), Err(FinanceError::FractionalMonths(2.5)));
        assert!(matches!(Tenure::from_unit(-1.0, "years"), Err(FinanceError::Negative { .. })));
    }

    #[test]
    fn test_tenure_limit() {
        let too_long = FinanceError::TenureTooLong { months: 100_000.0, max: MAX_TENURE_MONTHS };
        assert_eq!(emi(1000.0, 12.0, 100_000), Err(too_long));
        assert!(matches!(emi(1000.0, 12.0, 3_000_000_000), Err(FinanceError::TenureTooLong { .. })));
        let years = LoanParameters::new(1000.0, 12.0, Tenure::Years(200_000_000.0));
        assert!(matches!(years.breakdown(), Err(FinanceError::TenureTooLong { .. })));
        assert!(matches!(Tenure::from_unit(1_201.0, "months"), Err(FinanceError::TenureTooLong { .. })));

        let longest = emi(1000.0, 12.0, MAX_TENURE_MONTHS).unwrap();
        assert_relative_eq!(longest.monthly, 10.0, max_relative = 1e-4);
    }

    #[test]
    fn test_schedule_rejects_long_tenure_before_allocating() {
        let params = LoanParameters::new(1000.0, 12.0, Tenure::Months(u32::MAX));
        assert!(matches!(params.amortization_schedule(), Err(FinanceError::TenureTooLong { .. })));
    }

    #[test]
    fn test_tiny_rate_stays_finite() {
        let b = emi(1000.0, 1e-300, 12).unwrap();
        assert!(b.monthly.is_finite());
        assert_relative_eq!(b.monthly, 1000.0 / 12.0, max_relative = 1e-12);
    }

    #[test]
    fn test_overflowing_payment_is_error() {
        assert_eq!(emi(1000.0, 1e308, 1_200), Err(FinanceError::NotRepresentable("monthly payment")));
        assert_eq!(emi(f64::MAX, 12.0, 1), Err(FinanceError::NotRepresentable("monthly payment")));
    }
}
