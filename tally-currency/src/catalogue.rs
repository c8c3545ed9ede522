//! Supported currencies and display formatting

use serde::Serialize;
use tally_core::number::format_fixed;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Currency {
    pub code: &'static str,
    pub name: &'static str,
    pub symbol: &'static str,
}

pub const CURRENCIES: [Currency; 7] = [
    Currency { code: "USD", name: "US Dollar", symbol: "$" },
    Currency { code: "EUR", name: "Euro", symbol: "€" },
    Currency { code: "GBP", name: "British Pound", symbol: "£" },
    Currency { code: "JPY", name: "Japanese Yen", symbol: "¥" },
    Currency { code: "INR", name: "Indian Rupee", symbol: "₹" },
    Currency { code: "AUD", name: "Australian Dollar", symbol: "A$" },
    Currency { code: "CAD", name: "Canadian Dollar", symbol: "C$" },
];

pub const AMOUNT_DECIMALS: u32 = 2;
pub const RATE_DECIMALS: u32 = 4;

pub fn currency(code: &str) -> Option<&'static Currency> {
    CURRENCIES.iter().find(|c| c.code.eq_ignore_ascii_case(code.trim()))
}

pub fn format_amount(amount: f64) -> String {
    format_fixed(amount, AMOUNT_DECIMALS)
}

pub fn format_rate(rate: f64) -> String {
    format_fixed(rate, RATE_DECIMALS)
}
