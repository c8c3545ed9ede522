//! Finance functions exposed through the plugin registry

use std::collections::HashMap;
use tally_plugin::prelude::*;
use crate::emi::{LoanParameters, Tenure};
use crate::epf::{epf, ContributionMode, EpfParameters, FIXED_CONTRIBUTION};

fn object(fields: Vec<(&str, Value)>) -> Value {
    Value::Object(fields.into_iter().map(|(k, v)| (k.to_string(), v)).collect::<HashMap<_, _>>())
}

fn extract_count(value: &Value, func: &str, arg: &str) -> Result<u32, TallyError> {
    let n = extract_integer(value, func, arg)?;
    u32::try_from(n).map_err(|_| {
        TallyError::invalid_input(format!("{} must be between 0 and {}, got {}", arg, u32::MAX, n))
            .in_calculator(func)
            .for_argument(arg)
    })
}

fn loan_from_args(args: &[Value], func: &str) -> Result<LoanParameters, TallyError> {
    require_args(args, 3, func)?;
    let principal = extract_number(&args[0], func, "principal")?;
    let rate = extract_number(&args[1], func, "annual_rate_percent")?;
    let count = extract_number(&args[2], func, "tenure")?;
    let unit = extract_optional_text(args, 3, func, "tenure_unit")?.unwrap_or_else(|| "months".to_string());
    let tenure = Tenure::from_unit(count, &unit)
        .map_err(|e| TallyError::from(e).in_calculator(func).for_argument("tenure"))?;
    Ok(LoanParameters::new(principal, rate, tenure))
}

// ============ emi ============

pub struct Emi;

static EMI_ARGS: [ArgMeta; 4] = [
    ArgMeta::required("principal", "Number", "Loan amount"),
    ArgMeta::required("annual_rate_percent", "Number", "Interest rate, percent per annum"),
    ArgMeta::required("tenure", "Number", "Loan tenure: whole months, or years adding up to whole months"),
    ArgMeta::optional("tenure_unit", "Text", "\"months\" or \"years\"", "months"),
];

static EMI_EXAMPLES: [&str; 3] = [
    "emi(500000, 8.5, 240) → {monthly: 4339.12, total_payment: 1041388.8, ...}",
    "emi(500000, 8.5, 20, \"years\") → same as above",
    "emi(500000, 8.5, 2.5, \"years\") → 30 months",
];

static EMI_RELATED: [&str; 1] = ["amortization_schedule"];

impl FunctionPlugin for Emi {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "emi",
            description: "Equated monthly installment with total interest and total payment",
            usage: "emi(principal, annual_rate_percent, tenure, [tenure_unit])",
            args: &EMI_ARGS,
            returns: "Object",
            examples: &EMI_EXAMPLES,
            category: "finance",
            related: &EMI_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        into_value((|| -> Result<Value, TallyError> {
            let loan = loan_from_args(args, "emi")?;
            let b = loan.breakdown().map_err(|e| TallyError::from(e).in_calculator("emi"))?;
            let months = loan.tenure_months().map_err(|e| TallyError::from(e).in_calculator("emi"))?;
            let r = b.rounded();
            Ok(object(vec![
                ("monthly", Value::Number(b.monthly)),
                ("total_interest", Value::Number(b.total_interest)),
                ("total_payment", Value::Number(b.total_payment)),
                ("tenure_months", Value::from(months)),
                ("display", object(vec![
                    ("monthly", Value::Number(r.monthly)),
                    ("total_interest", Value::Number(r.total_interest)),
                    ("total_payment", Value::Number(r.total_payment)),
                ])),
            ]))
        })())
    }
}

// ============ amortization_schedule ============

pub struct AmortizationSchedule;

static AMORTIZATION_ARGS: [ArgMeta; 5] = [
    ArgMeta::required("principal", "Number", "Loan amount"),
    ArgMeta::required("annual_rate_percent", "Number", "Interest rate, percent per annum"),
    ArgMeta::required("tenure", "Number", "Loan tenure: whole months, or years adding up to whole months"),
    ArgMeta::optional("tenure_unit", "Text", "\"months\" or \"years\"", "months"),
    ArgMeta::optional("months_to_show", "Number", "Number of rows to include", "all"),
];

static AMORTIZATION_EXAMPLES: [&str; 1] = ["amortization_schedule(100000, 12, 1, \"years\", 3)"];

static AMORTIZATION_RELATED: [&str; 1] = ["emi"];

impl FunctionPlugin for AmortizationSchedule {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "amortization_schedule",
            description: "Month-by-month split of each EMI into interest and principal",
            usage: "amortization_schedule(principal, annual_rate_percent, tenure, [tenure_unit], [months_to_show])",
            args: &AMORTIZATION_ARGS,
            returns: "Object",
            examples: &AMORTIZATION_EXAMPLES,
            category: "finance",
            related: &AMORTIZATION_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        into_value((|| -> Result<Value, TallyError> {
            let func = "amortization_schedule";
            let loan = loan_from_args(args, func)?;
            let show = match args.get(4) {
                None | Some(Value::Null) => None,
                Some(v) => Some(extract_count(v, func, "months_to_show")? as usize),
            };
            let rows = loan.amortization_schedule()
                .map_err(|e| TallyError::from(e).in_calculator(func))?;

            let total_interest: f64 = rows.iter().map(|r| r.interest).sum();
            let payment = rows.first().map(|r| r.payment).unwrap_or(0.0);
            let schedule = rows.iter()
                .take(show.unwrap_or(rows.len()))
                .map(|r| object(vec![
                    ("month", Value::from(r.month)),
                    ("payment", Value::Number(r.payment)),
                    ("principal", Value::Number(r.principal)),
                    ("interest", Value::Number(r.interest)),
                    ("balance", Value::Number(r.balance)),
                ]))
                .collect();

            Ok(object(vec![
                ("payment", Value::Number(payment)),
                ("total_interest", Value::Number(total_interest)),
                ("schedule", Value::List(schedule)),
            ]))
        })())
    }
}

// ============ epf ============

pub struct Epf;

static EPF_ARGS: [ArgMeta; 9] = [
    ArgMeta::required("basic_salary", "Number", "Monthly basic salary"),
    ArgMeta::required("current_age", "Number", "Age today, in whole years"),
    ArgMeta::required("retirement_age", "Number", "Age at retirement, in whole years"),
    ArgMeta::optional("dearness_allowance", "Number", "Monthly dearness allowance", "0"),
    ArgMeta::optional("interest_percent", "Number", "Annual EPF interest rate, percent", "8.15"),
    ArgMeta::optional("mode", "Text", "\"standard\", \"fixed\" or \"custom\"", "standard"),
    ArgMeta::optional("employee", "Number", "Employee rate percent (custom) or monthly amount (fixed)", "12 / 1800"),
    ArgMeta::optional("employer", "Number", "Employer rate percent (custom) or monthly amount (fixed)", "12 / 1800"),
    ArgMeta::optional("pension_rate_percent", "Number", "Share of employer contribution routed to pension", "8.33"),
];

static EPF_EXAMPLES: [&str; 2] = [
    "epf(15000, 25, 58) → {maturity_amount: ..., ledger: [{year: 1, closing_balance: 46720.8}, ...]}",
    "epf(30000, 30, 58, 0, 8.25, \"custom\", 10, 12)",
];

static EPF_RELATED: [&str; 0] = [];

fn mode_from_args(args: &[Value], func: &str) -> Result<ContributionMode, TallyError> {
    let employee = extract_optional_number(args, 6, func, "employee")?;
    let employer = extract_optional_number(args, 7, func, "employer")?;
    let mode = extract_optional_text(args, 5, func, "mode")?.unwrap_or_else(|| "standard".to_string());
    match mode.trim().to_lowercase().as_str() {
        "standard" => Ok(ContributionMode::Standard),
        "fixed" => Ok(ContributionMode::Fixed {
            employee: employee.unwrap_or(FIXED_CONTRIBUTION),
            employer: employer.unwrap_or(FIXED_CONTRIBUTION),
        }),
        "custom" => Ok(ContributionMode::Custom {
            employee_rate_percent: employee.unwrap_or(12.0),
            employer_rate_percent: employer.unwrap_or(12.0),
        }),
        other => Err(TallyError::invalid_input(format!("unknown contribution mode '{}'", other))
            .in_calculator(func)
            .for_argument("mode")
            .with_suggestion("Use \"standard\", \"fixed\" or \"custom\"")),
    }
}

impl FunctionPlugin for Epf {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "epf",
            description: "Provident fund projection with a year-by-year ledger",
            usage: "epf(basic_salary, current_age, retirement_age, [dearness_allowance], [interest_percent], [mode], [employee], [employer], [pension_rate_percent])",
            args: &EPF_ARGS,
            returns: "Object",
            examples: &EPF_EXAMPLES,
            category: "finance",
            related: &EPF_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        into_value((|| -> Result<Value, TallyError> {
            let func = "epf";
            require_args(args, 3, func)?;
            let basic = extract_number(&args[0], func, "basic_salary")?;
            let current_age = extract_count(&args[1], func, "current_age")?;
            let retirement_age = extract_count(&args[2], func, "retirement_age")?;

            let mut params = EpfParameters::new(basic, current_age, retirement_age)
                .with_mode(mode_from_args(args, func)?);
            if let Some(da) = extract_optional_number(args, 3, func, "dearness_allowance")? {
                params = params.with_dearness_allowance(da);
            }
            if let Some(rate) = extract_optional_number(args, 4, func, "interest_percent")? {
                params = params.with_interest(rate);
            }
            if let Some(rate) = extract_optional_number(args, 8, func, "pension_rate_percent")? {
                params = params.with_pension_rate(rate);
            }

            let p = epf(&params).map_err(|e| TallyError::from(e).in_calculator(func))?;
            let ledger = p.ledger.iter().map(|y| object(vec![
                ("year", Value::from(y.year)),
                ("opening_balance", Value::Number(y.opening_balance)),
                ("contribution", Value::Number(y.contribution)),
                ("interest", Value::Number(y.interest)),
                ("closing_balance", Value::Number(y.closing_balance)),
            ])).collect();

            Ok(object(vec![
                ("employee_contribution", Value::Number(p.employee_contribution)),
                ("employer_contribution", Value::Number(p.employer_contribution)),
                ("pension_contribution", Value::Number(p.pension_contribution)),
                ("total_contribution", Value::Number(p.total_contribution)),
                ("interest_earned", Value::Number(p.interest_earned)),
                ("maturity_amount", Value::Number(p.maturity_amount)),
                ("pension_amount", Value::Number(p.pension_amount)),
                ("total_benefit", Value::Number(p.total_benefit)),
                ("ledger", Value::List(ledger)),
            ]))
        })())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(x: f64) -> Value {
        Value::Number(x)
    }

    #[test]
    fn test_emi_plugin() {
        let out = Emi.call(&[n(500_000.0), n(8.5), n(20.0), Value::from("years")], &EvalContext::default());
        assert_eq!(out.get("tenure_months").as_number(), Some(240.0));
        assert_eq!(out.get("display").get("monthly").as_number(), Some(4339.0));
    }

    #[test]
    fn test_emi_plugin_rejects_fractional_months() {
        let out = Emi.call(&[n(1000.0), n(8.5), n(2.5)], &EvalContext::default());
        assert!(out.is_error());
    }

    #[test]
    fn test_emi_plugin_fractional_years() {
        let out = Emi.call(&[n(500_000.0), n(8.5), n(2.5), Value::from("years")], &EvalContext::default());
        assert_eq!(out.get("tenure_months").as_number(), Some(30.0));
        assert!(!out.get("monthly").is_error());
    }

    #[test]
    fn test_emi_plugin_tenure_limit() {
        match Emi.call(&[n(1000.0), n(12.0), n(100_000.0)], &EvalContext::default()) {
            Value::Error(e) => assert_eq!(e.code, codes::INVALID_INPUT),
            other => panic!("expected error, got {:?}", other),
        }
    }

    #[test]
    fn test_emi_plugin_tenure_unit_must_be_text() {
        match Emi.call(&[n(1000.0), n(12.0), n(12.0), n(5.0)], &EvalContext::default()) {
            Value::Error(e) => assert_eq!(e.code, codes::ARG_TYPE),
            other => panic!("expected error, got {:?}", other),
        }
    }

    #[test]
    fn test_emi_plugin_zero_principal() {
        match Emi.call(&[n(0.0), n(8.5), n(12.0)], &EvalContext::default()) {
            Value::Error(e) => assert_eq!(e.code, codes::INVALID_INPUT),
            other => panic!("expected error, got {:?}", other),
        }
    }

    #[test]
    fn test_amortization_rows_limited() {
        let args = [n(100_000.0), n(12.0), n(1.0), Value::from("years"), n(3.0)];
        let out = AmortizationSchedule.call(&args, &EvalContext::default());
        assert_eq!(out.get("schedule").as_list().map(|l| l.len()), Some(3));
    }

    #[test]
    fn test_epf_plugin_defaults() {
        let out = Epf.call(&[n(15_000.0), n(25.0), n(58.0)], &EvalContext::default());
        let ledger = out.get("ledger");
        let first = &ledger.as_list().unwrap()[0];
        let closing = first.get("closing_balance").as_number().unwrap();
        assert!((closing - 46_720.8).abs() < 1e-6);
    }

    #[test]
    fn test_epf_plugin_total_benefit() {
        let out = Epf.call(&[n(15_000.0), n(25.0), n(58.0)], &EvalContext::default());
        let maturity = out.get("maturity_amount").as_number().unwrap();
        let pension = out.get("pension_amount").as_number().unwrap();
        let total = out.get("total_benefit").as_number().unwrap();
        assert!((total - (maturity + pension)).abs() < 1e-6);
    }

    #[test]
    fn test_epf_plugin_age_limit() {
        let out = Epf.call(&[n(15_000.0), n(0.0), n(4_000_000_000.0)], &EvalContext::default());
        assert!(out.is_error());
    }

    #[test]
    fn test_epf_plugin_fixed_mode() {
        let args = [n(90_000.0), n(30.0), n(31.0), Value::Null, Value::Null, Value::from("fixed")];
        let out = Epf.call(&args, &EvalContext::default());
        assert_eq!(out.get("total_contribution").as_number(), Some(3_600.0));
    }

    #[test]
    fn test_epf_plugin_unknown_mode() {
        let args = [n(15_000.0), n(25.0), n(58.0), Value::Null, Value::Null, Value::from("generous")];
        assert!(Epf.call(&args, &EvalContext::default()).is_error());
    }
}
