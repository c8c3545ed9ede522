//! Timestamp functions exposed through the plugin registry

use std::collections::HashMap;
use tally_plugin::prelude::*;
use crate::timestamp::{now_epoch_seconds, parse_epoch_seconds, parse_in, render_in, RenderedInstant, Zone};

fn zone_arg(args: &[Value], index: usize, func: &str) -> Result<Zone, TallyError> {
    match extract_optional_text(args, index, func, "zone")? {
        Some(z) => z.parse::<Zone>().map_err(|e| TallyError::from(e).in_calculator(func).for_argument("zone")),
        None => Ok(Zone::default()),
    }
}

fn instant_value(r: RenderedInstant, zone: Zone) -> Value {
    let mut out = HashMap::new();
    out.insert("seconds".to_string(), Value::from(r.seconds));
    out.insert("display".to_string(), Value::Text(r.display));
    out.insert("iso".to_string(), Value::Text(r.iso));
    out.insert("zone".to_string(), Value::Text(zone.to_string()));
    Value::Object(out)
}

/// Seconds may arrive as a number or as typed text
fn seconds_arg(value: &Value, func: &str) -> Result<i64, TallyError> {
    match value {
        Value::Text(s) => parse_epoch_seconds(s)
            .map_err(|e| TallyError::from(e).in_calculator(func).for_argument("seconds")),
        other => extract_integer(other, func, "seconds"),
    }
}

const ZONE_HELP: &str = "\"local\", \"utc\" or an offset like \"+05:30\"";

// ============ epoch_to_datetime ============

pub struct EpochToDatetime;

static EPOCH_TO_DATETIME_ARGS: [ArgMeta; 2] = [
    ArgMeta::required("seconds", "Number", "Seconds since 1970-01-01T00:00:00Z"),
    ArgMeta::optional("zone", "Text", ZONE_HELP, "local"),
];

static EPOCH_TO_DATETIME_EXAMPLES: [&str; 1] = [
    "epoch_to_datetime(1700000000, \"utc\") → {display: \"2023-11-14 22:13:20 +00:00\", iso: \"2023-11-14T22:13:20Z\"}",
];

static EPOCH_TO_DATETIME_RELATED: [&str; 2] = ["datetime_to_epoch", "now_epoch"];

impl FunctionPlugin for EpochToDatetime {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "epoch_to_datetime",
            description: "Render Unix epoch seconds as a calendar date-time",
            usage: "epoch_to_datetime(seconds, [zone])",
            args: &EPOCH_TO_DATETIME_ARGS,
            returns: "Object",
            examples: &EPOCH_TO_DATETIME_EXAMPLES,
            category: "time",
            related: &EPOCH_TO_DATETIME_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        into_value((|| -> Result<Value, TallyError> {
            let func = "epoch_to_datetime";
            require_args(args, 1, func)?;
            let seconds = seconds_arg(&args[0], func)?;
            let zone = zone_arg(args, 1, func)?;
            let rendered = render_in(seconds, zone).map_err(|e| TallyError::from(e).in_calculator(func))?;
            Ok(instant_value(rendered, zone))
        })())
    }
}

// ============ datetime_to_epoch ============

pub struct DatetimeToEpoch;

static DATETIME_TO_EPOCH_ARGS: [ArgMeta; 2] = [
    ArgMeta::required("datetime", "Text", "YYYY-MM-DDTHH:MM[:SS], YYYY-MM-DD HH:MM[:SS], YYYY-MM-DD or RFC 3339"),
    ArgMeta::optional("zone", "Text", ZONE_HELP, "local"),
];

static DATETIME_TO_EPOCH_EXAMPLES: [&str; 2] = [
    "datetime_to_epoch(\"2023-11-14T22:13:20Z\") → 1700000000",
    "datetime_to_epoch(\"2023-11-14 22:13\", \"utc\") → 1699999980",
];

static DATETIME_TO_EPOCH_RELATED: [&str; 1] = ["epoch_to_datetime"];

impl FunctionPlugin for DatetimeToEpoch {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "datetime_to_epoch",
            description: "Unix epoch seconds for a calendar date-time",
            usage: "datetime_to_epoch(datetime, [zone])",
            args: &DATETIME_TO_EPOCH_ARGS,
            returns: "Number",
            examples: &DATETIME_TO_EPOCH_EXAMPLES,
            category: "time",
            related: &DATETIME_TO_EPOCH_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        into_value((|| -> Result<Value, TallyError> {
            let func = "datetime_to_epoch";
            require_args(args, 1, func)?;
            let text = extract_text(&args[0], func, "datetime")?;
            let zone = zone_arg(args, 1, func)?;
            let seconds = parse_in(&text, zone).map_err(|e| TallyError::from(e).in_calculator(func))?;
            Ok(Value::from(seconds))
        })())
    }
}

// ============ now_epoch ============

pub struct NowEpoch;

static NOW_EPOCH_EXAMPLES: [&str; 1] = ["now_epoch() → {seconds: 1700000000, display: ...}"];

impl FunctionPlugin for NowEpoch {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "now_epoch",
            description: "Current time as epoch seconds, with its rendering",
            usage: "now_epoch([zone])",
            args: &EPOCH_TO_DATETIME_ARGS[1..],
            returns: "Object",
            examples: &NOW_EPOCH_EXAMPLES,
            category: "time",
            related: &EPOCH_TO_DATETIME_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        into_value((|| -> Result<Value, TallyError> {
            let zone = zone_arg(args, 0, "now_epoch")?;
            let rendered = render_in(now_epoch_seconds(), zone).map_err(TallyError::from)?;
            Ok(instant_value(rendered, zone))
        })())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epoch_to_datetime_utc() {
        let out = EpochToDatetime.call(&[Value::Number(1_700_000_000.0), Value::from("utc")], &EvalContext::default());
        assert_eq!(out.get("display").as_text(), Some("2023-11-14 22:13:20 +00:00"));
        assert_eq!(out.get("zone").as_text(), Some("utc"));
    }

    #[test]
    fn test_epoch_as_text() {
        let out = EpochToDatetime.call(&[Value::from("0"), Value::from("utc")], &EvalContext::default());
        assert_eq!(out.get("iso").as_text(), Some("1970-01-01T00:00:00Z"));
    }

    #[test]
    fn test_epoch_garbage() {
        match EpochToDatetime.call(&[Value::from("soon")], &EvalContext::default()) {
            Value::Error(e) => assert_eq!(e.code, codes::INVALID_TIMESTAMP),
            other => panic!("expected error, got {:?}", other),
        }
    }

    #[test]
    fn test_zone_must_be_text() {
        match EpochToDatetime.call(&[Value::Number(0.0), Value::Number(5.5)], &EvalContext::default()) {
            Value::Error(e) => assert_eq!(e.code, codes::ARG_TYPE),
            other => panic!("expected error, got {:?}", other),
        }
    }

    #[test]
    fn test_datetime_to_epoch() {
        let out = DatetimeToEpoch.call(&[Value::from("2023-11-14 22:13"), Value::from("utc")], &EvalContext::default());
        assert_eq!(out.as_number(), Some(1_699_999_980.0));
    }

    #[test]
    fn test_datetime_to_epoch_invalid() {
        match DatetimeToEpoch.call(&[Value::from("not a date")], &EvalContext::default()) {
            Value::Error(e) => assert_eq!(e.code, codes::INVALID_DATE),
            other => panic!("expected error, got {:?}", other),
        }
    }

    #[test]
    fn test_now_epoch() {
        let out = NowEpoch.call(&[Value::from("utc")], &EvalContext::default());
        assert!(out.get("seconds").as_number().is_some_and(|s| s > 1_700_000_000.0));
    }
}
