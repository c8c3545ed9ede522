//! Tally Finance - Loan EMI and provident fund calculators

mod error;
mod emi;
mod epf;
mod functions;

pub use error::FinanceError;
pub use emi::{emi, AmortizationRow, EmiBreakdown, LoanParameters, Tenure, MAX_TENURE_MONTHS};
pub use epf::{
    epf, ContributionMode, EpfParameters, EpfProjection, EpfYear,
    DEFAULT_INTEREST_PERCENT, DEFAULT_PENSION_RATE_PERCENT, FIXED_CONTRIBUTION,
    MAX_AGE, PENSION_CAP, STANDARD_RATE_PERCENT, WAGE_CONTRIBUTION_CAP,
};

use tally_plugin::PluginRegistry;

/// Load finance functions into registry
pub fn load_finance_library(registry: PluginRegistry) -> PluginRegistry {
    registry
        // Loans
        .with_function(functions::Emi)
        .with_function(functions::AmortizationSchedule)

        // Provident fund
        .with_function(functions::Epf)
}
