//! Employees' Provident Fund (EPF) projection
//!
//! Contributions accrue monthly but interest is credited once a year on
//! `opening balance + that year's contributions`. Compounding is annual.

use serde::Serialize;
use tracing::debug;
use crate::FinanceError;

/// Monthly wage ceiling for percentage-based contributions
pub const WAGE_CONTRIBUTION_CAP: f64 = 21_600.0;
/// Monthly ceiling on the pension share of the employer contribution
pub const PENSION_CAP: f64 = 1_500.0;
pub const STANDARD_RATE_PERCENT: f64 = 12.0;
pub const FIXED_CONTRIBUTION: f64 = 1_800.0;
pub const DEFAULT_PENSION_RATE_PERCENT: f64 = 8.33;
pub const DEFAULT_INTEREST_PERCENT: f64 = 8.15;
/// Upper bound on current and retirement age
pub const MAX_AGE: u32 = 120;

/// How monthly contributions are derived from the wage
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ContributionMode {
    /// 12% employee + 12% employer, each capped
    #[default]
    Standard,
    /// Flat monthly amounts, independent of wage
    Fixed { employee: f64, employer: f64 },
    /// Caller-chosen percentages, each capped
    Custom { employee_rate_percent: f64, employer_rate_percent: f64 },
}

impl ContributionMode {
    pub fn fixed() -> Self {
        ContributionMode::Fixed { employee: FIXED_CONTRIBUTION, employer: FIXED_CONTRIBUTION }
    }

    /// Monthly (employee, employer) contributions for a wage
    pub fn monthly_contributions(&self, wage: f64) -> (f64, f64) {
        let capped = |rate: f64| (wage * rate / 100.0).min(WAGE_CONTRIBUTION_CAP);
        match *self {
            ContributionMode::Standard => (capped(STANDARD_RATE_PERCENT), capped(STANDARD_RATE_PERCENT)),
            ContributionMode::Fixed { employee, employer } => (employee, employer),
            ContributionMode::Custom { employee_rate_percent, employer_rate_percent } => {
                (capped(employee_rate_percent), capped(employer_rate_percent))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EpfParameters {
    pub basic_salary: f64,
    pub dearness_allowance: f64,
    pub current_age: u32,
    pub retirement_age: u32,
    pub annual_interest_percent: f64,
    pub mode: ContributionMode,
    pub pension_rate_percent: f64,
}

impl EpfParameters {
    /// Standard contributions at the default interest and pension rates
    pub fn new(basic_salary: f64, current_age: u32, retirement_age: u32) -> Self {
        EpfParameters {
            basic_salary,
            dearness_allowance: 0.0,
            current_age,
            retirement_age,
            annual_interest_percent: DEFAULT_INTEREST_PERCENT,
            mode: ContributionMode::Standard,
            pension_rate_percent: DEFAULT_PENSION_RATE_PERCENT,
        }
    }

    pub fn with_dearness_allowance(mut self, da: f64) -> Self {
        self.dearness_allowance = da;
        self
    }

    pub fn with_interest(mut self, annual_interest_percent: f64) -> Self {
        self.annual_interest_percent = annual_interest_percent;
        self
    }

    pub fn with_mode(mut self, mode: ContributionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_pension_rate(mut self, pension_rate_percent: f64) -> Self {
        self.pension_rate_percent = pension_rate_percent;
        self
    }

    pub fn wage(&self) -> f64 {
        self.basic_salary + self.dearness_allowance
    }

    pub fn years(&self) -> u32 {
        self.retirement_age.saturating_sub(self.current_age)
    }

    fn validate(&self) -> Result<(), FinanceError> {
        for (field, value) in [("current age", self.current_age), ("retirement age", self.retirement_age)] {
            if value > MAX_AGE {
                return Err(FinanceError::AgeOutOfRange { field, value, max: MAX_AGE });
            }
        }
        FinanceError::check_non_negative("basic salary", self.basic_salary)?;
        FinanceError::check_non_negative("dearness allowance", self.dearness_allowance)?;
        FinanceError::check_non_negative("interest rate", self.annual_interest_percent)?;
        FinanceError::check_non_negative("pension rate", self.pension_rate_percent)?;
        match self.mode {
            ContributionMode::Standard => {}
            ContributionMode::Fixed { employee, employer } => {
                FinanceError::check_non_negative("employee contribution", employee)?;
                FinanceError::check_non_negative("employer contribution", employer)?;
            }
            ContributionMode::Custom { employee_rate_percent, employer_rate_percent } => {
                FinanceError::check_non_negative("employee rate", employee_rate_percent)?;
                FinanceError::check_non_negative("employer rate", employer_rate_percent)?;
            }
        }
        Ok(())
    }
}

/// One year of the ledger
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EpfYear {
    pub year: u32,
    pub opening_balance: f64,
    pub contribution: f64,
    pub interest: f64,
    pub closing_balance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EpfProjection {
    /// Monthly amounts
    pub employee_contribution: f64,
    pub employer_contribution: f64,
    pub pension_contribution: f64,
    pub total_contribution: f64,
    /// Totals over the whole ledger
    pub interest_earned: f64,
    pub maturity_amount: f64,
    pub pension_amount: f64,
    /// Maturity plus accumulated pension
    pub total_benefit: f64,
    pub ledger: Vec<EpfYear>,
}

/// Project the fund balance up to retirement.
///
/// `retirement_age <= current_age` yields an empty ledger and zero maturity.
pub fn epf(params: &EpfParameters) -> Result<EpfProjection, FinanceError> {
    params.validate()?;

    let (employee, employer) = params.mode.monthly_contributions(params.wage());
    let pension = (employer * params.pension_rate_percent / 100.0).min(PENSION_CAP);
    let monthly_total = employee + employer;
    let rate = params.annual_interest_percent / 100.0;

    let mut balance = 0.0;
    let mut interest_earned = 0.0;
    let mut pension_amount = 0.0;
    let mut ledger = Vec::with_capacity(params.years() as usize);

    for year in 1..=params.years() {
        let opening_balance = balance;
        let contribution = monthly_total * 12.0;
        let interest = (opening_balance + contribution) * rate;
        balance = opening_balance + contribution + interest;
        interest_earned += interest;
        pension_amount += pension * 12.0;

        ledger.push(EpfYear {
            year,
            opening_balance,
            contribution,
            interest,
            closing_balance: balance,
        });
    }

    if !balance.is_finite() || !pension_amount.is_finite() {
        return Err(FinanceError::NotRepresentable("maturity amount"));
    }
    debug!(years = ledger.len(), maturity = balance, "epf projected");

    Ok(EpfProjection {
        employee_contribution: employee,
        employer_contribution: employer,
        pension_contribution: pension,
        total_contribution: monthly_total,
        interest_earned,
        maturity_amount: balance,
        pension_amount,
        total_benefit: balance + pension_amount,
        ledger,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn default_params() -> EpfParameters {
        EpfParameters::new(15_000.0, 25, 58)
    }

    #[test]
    fn test_first_year_closing() {
        let p = epf(&default_params()).unwrap();
        let first = p.ledger[0];
        assert_eq!(first.year, 1);
        assert_eq!(first.opening_balance, 0.0);
        assert_relative_eq!(first.contribution, 43_200.0, epsilon = 1e-9);
        assert_relative_eq!(first.interest, 3_520.8, epsilon = 1e-9);
        assert_relative_eq!(first.closing_balance, 46_720.8, epsilon = 1e-9);
    }

    #[test]
    fn test_ledger_is_sequential() {
        let p = epf(&default_params()).unwrap();
        assert_eq!(p.ledger.len(), 33);
        for pair in p.ledger.windows(2) {
            assert_eq!(pair[1].opening_balance, pair[0].closing_balance);
            assert_eq!(pair[1].year, pair[0].year + 1);
        }
        assert_eq!(p.maturity_amount, p.ledger[32].closing_balance);
        let interest: f64 = p.ledger.iter().map(|y| y.interest).sum();
        assert_relative_eq!(p.interest_earned, interest, max_relative = 1e-12);
    }

    #[test]
    fn test_monthly_contributions() {
        let p = epf(&default_params()).unwrap();
        assert_relative_eq!(p.employee_contribution, 1_800.0, epsilon = 1e-9);
        assert_relative_eq!(p.employer_contribution, 1_800.0, epsilon = 1e-9);
        assert_relative_eq!(p.pension_contribution, 149.94, epsilon = 1e-9);
        assert_relative_eq!(p.total_contribution, 3_600.0, epsilon = 1e-9);
        assert_relative_eq!(p.pension_amount, 149.94 * 12.0 * 33.0, max_relative = 1e-12);
    }

    #[test]
    fn test_wage_cap_applies() {
        let p = epf(&EpfParameters::new(500_000.0, 30, 31)).unwrap();
        assert_eq!(p.employee_contribution, WAGE_CONTRIBUTION_CAP);
        assert_eq!(p.employer_contribution, WAGE_CONTRIBUTION_CAP);
        assert_eq!(p.pension_contribution, PENSION_CAP);
    }

    #[test]
    fn test_fixed_and_custom_modes() {
        let fixed = epf(&EpfParameters::new(90_000.0, 30, 31).with_mode(ContributionMode::fixed())).unwrap();
        assert_eq!(fixed.total_contribution, 3_600.0);

        let custom = ContributionMode::Custom { employee_rate_percent: 10.0, employer_rate_percent: 5.0 };
        let p = epf(&EpfParameters::new(20_000.0, 30, 31).with_dearness_allowance(5_000.0).with_mode(custom)).unwrap();
        assert_relative_eq!(p.employee_contribution, 2_500.0, epsilon = 1e-9);
        assert_relative_eq!(p.employer_contribution, 1_250.0, epsilon = 1e-9);
    }

    #[test]
    fn test_retirement_not_after_current_age() {
        let p = epf(&EpfParameters::new(15_000.0, 60, 58)).unwrap();
        assert!(p.ledger.is_empty());
        assert_eq!(p.maturity_amount, 0.0);
        assert!(epf(&EpfParameters::new(15_000.0, 58, 58)).unwrap().ledger.is_empty());
    }

    #[test]
    fn test_rejects_negative_salary() {
        assert!(matches!(
            epf(&EpfParameters::new(-1.0, 25, 58)),
            Err(FinanceError::Negative { field: "basic salary", .. })
        ));
    }

    #[test]
    fn test_total_benefit_adds_pension() {
        let p = epf(&default_params()).unwrap();
        assert_relative_eq!(p.total_benefit, p.maturity_amount + p.pension_amount, max_relative = 1e-12);
        assert_eq!(epf(&EpfParameters::new(15_000.0, 60, 58)).unwrap().total_benefit, 0.0);
    }

    #[test]
    fn test_age_limits() {
        let err = epf(&EpfParameters::new(15_000.0, 0, 4_000_000_000)).unwrap_err();
        assert_eq!(err, FinanceError::AgeOutOfRange { field: "retirement age", value: 4_000_000_000, max: MAX_AGE });
        assert!(matches!(
            epf(&EpfParameters::new(15_000.0, 500, 600)),
            Err(FinanceError::AgeOutOfRange { field: "current age", .. })
        ));

        let p = epf(&EpfParameters::new(15_000.0, 18, MAX_AGE)).unwrap();
        assert_eq!(p.ledger.len(), 102);
    }

    #[test]
    fn test_overflowing_contributions() {
        let huge = ContributionMode::Fixed { employee: f64::MAX, employer: f64::MAX };
        let err = epf(&EpfParameters::new(15_000.0, 30, 58).with_mode(huge)).unwrap_err();
        assert_eq!(err, FinanceError::NotRepresentable("maturity amount"));
    }
}
