//! Currency functions exposed through the plugin registry

use std::collections::HashMap;
use tally_plugin::prelude::*;
use crate::catalogue::{format_amount, format_rate, CURRENCIES};
use crate::snapshot::{convert_detailed, Conversion, ExchangeRateSnapshot};

/// Build a snapshot for `from` out of either `{CODE: rate}` or `{FROM: {CODE: rate}}`
pub fn snapshot_from_value(rates: &Value, from: &str, func: &str) -> Result<ExchangeRateSnapshot, TallyError> {
    let map = rates.as_object()
        .ok_or_else(|| TallyError::arg_type(func, "rates", "Object", rates.type_name()))?;

    let nested = map.iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(from.trim()))
        .and_then(|(_, v)| v.as_object());
    let flat = nested.unwrap_or(map);

    let mut pairs = Vec::with_capacity(flat.len());
    for (code, rate) in flat {
        if let Some(r) = rate.as_number() {
            pairs.push((code.clone(), r));
        }
    }
    Ok(ExchangeRateSnapshot::new(from, pairs))
}

/// Object view of a conversion, shared with the live server tool
pub fn conversion_value(c: &Conversion) -> Value {
    let mut out = HashMap::new();
    out.insert("amount".to_string(), Value::Number(c.amount));
    out.insert("from".to_string(), Value::Text(c.from.clone()));
    out.insert("to".to_string(), Value::Text(c.to.clone()));
    out.insert("rate".to_string(), Value::Number(c.rate));
    out.insert("result".to_string(), Value::Number(c.result));
    out.insert("result_display".to_string(), Value::Text(format_amount(c.result)));
    out.insert("rate_display".to_string(), Value::Text(format_rate(c.rate)));
    out.insert("display".to_string(), Value::Text(c.display()));
    Value::Object(out)
}

// ============ convert_currency ============

pub struct ConvertCurrency;

static CONVERT_ARGS: [ArgMeta; 4] = [
    ArgMeta::required("amount", "Number", "Amount in the source currency"),
    ArgMeta::required("from", "Text", "Source currency code (e.g. \"USD\")"),
    ArgMeta::required("to", "Text", "Target currency code (e.g. \"EUR\")"),
    ArgMeta::required("rates", "Object", "Rates keyed by target code, or {FROM: {TO: rate}}"),
];

static CONVERT_EXAMPLES: [&str; 2] = [
    "convert_currency(100, \"USD\", \"EUR\", {\"EUR\": 0.85}) → {result: 85, display: \"100.00 USD = 85.00 EUR\"}",
    "convert_currency(100, \"USD\", \"EUR\", {\"USD\": {\"EUR\": 0.85}}) → {result: 85, ...}",
];

static CONVERT_RELATED: [&str; 1] = ["currencies"];

impl FunctionPlugin for ConvertCurrency {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "convert_currency",
            description: "Convert an amount with a caller-supplied exchange-rate snapshot",
            usage: "convert_currency(amount, from, to, rates)",
            args: &CONVERT_ARGS,
            returns: "Object",
            examples: &CONVERT_EXAMPLES,
            category: "currency",
            related: &CONVERT_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        into_value((|| -> Result<Value, TallyError> {
            let func = "convert_currency";
            require_args(args, 4, func)?;
            let amount = extract_number(&args[0], func, "amount")?;
            let from = extract_text(&args[1], func, "from")?;
            let to = extract_text(&args[2], func, "to")?;
            let snapshot = snapshot_from_value(&args[3], &from, func)?;
            let conversion = convert_detailed(amount, &from, &to, &snapshot)
                .map_err(|e| TallyError::from(e).in_calculator(func))?;
            Ok(conversion_value(&conversion))
        })())
    }
}

// ============ currencies ============

pub struct Currencies;

static CURRENCIES_EXAMPLES: [&str; 1] = ["currencies() → [{code: \"USD\", name: \"US Dollar\", symbol: \"$\"}, ...]"];

impl FunctionPlugin for Currencies {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "currencies",
            description: "Supported currencies with names and symbols",
            usage: "currencies()",
            args: &[],
            returns: "List",
            examples: &CURRENCIES_EXAMPLES,
            category: "currency",
            related: &["convert_currency"],
        }
    }

    fn call(&self, _args: &[Value], _ctx: &EvalContext) -> Value {
        Value::List(CURRENCIES.iter().map(|c| {
            let mut row = HashMap::new();
            row.insert("code".to_string(), Value::from(c.code));
            row.insert("name".to_string(), Value::from(c.name));
            row.insert("symbol".to_string(), Value::from(c.symbol));
            Value::Object(row)
        }).collect())
    }
}
