//! Argument extraction shared by every calculator library

use tally_core::{number, TallyError, Value};

/// Fail with ARG_COUNT unless at least `expected` arguments were passed
pub fn require_args(args: &[Value], expected: usize, func: &str) -> Result<(), TallyError> {
    if args.len() < expected {
        return Err(TallyError::arg_count(func, expected, args.len()));
    }
    Ok(())
}

/// Extract a finite number. Text is parsed as user input.
pub fn extract_number(value: &Value, func: &str, arg: &str) -> Result<f64, TallyError> {
    match value {
        Value::Number(n) => number::ensure_finite(*n)
            .map_err(|e| TallyError::from(e).in_calculator(func).for_argument(arg)),
        Value::Text(s) => number::parse_finite(s)
            .map_err(|e| TallyError::from(e).in_calculator(func).for_argument(arg)),
        Value::Null => Err(TallyError::arg_type(func, arg, "Number", "Null")),
        Value::Error(e) => Err(e.clone()),
        other => Err(TallyError::arg_type(func, arg, "Number", other.type_name())),
    }
}

/// Extract a whole number (ages, months, epoch seconds)
pub fn extract_integer(value: &Value, func: &str, arg: &str) -> Result<i64, TallyError> {
    let n = extract_number(value, func, arg)?;
    if n.fract() != 0.0 || n < i64::MIN as f64 || n > i64::MAX as f64 {
        return Err(TallyError::invalid_input(format!("{} must be a whole number, got {}", arg, n))
            .in_calculator(func)
            .for_argument(arg));
    }
    Ok(n as i64)
}

/// Extract a Text string
pub fn extract_text(value: &Value, func: &str, arg: &str) -> Result<String, TallyError> {
    match value {
        Value::Text(s) => Ok(s.clone()),
        Value::Null => Err(TallyError::arg_type(func, arg, "Text", "Null")),
        Value::Error(e) => Err(e.clone()),
        other => Err(TallyError::arg_type(func, arg, "Text", other.type_name())),
    }
}

/// Extract optional Number (missing or null yields None)
pub fn extract_optional_number(args: &[Value], index: usize, func: &str, arg: &str) -> Result<Option<f64>, TallyError> {
    match args.get(index) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => extract_number(v, func, arg).map(Some),
    }
}

/// Extract optional Text string (missing or null yields None)
pub fn extract_optional_text(args: &[Value], index: usize, func: &str, arg: &str) -> Result<Option<String>, TallyError> {
    match args.get(index) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => extract_text(v, func, arg).map(Some),
    }
}

/// Collapse a `Result` into the `Value` returned by `FunctionPlugin::call`
pub fn into_value(result: Result<Value, TallyError>) -> Value {
    result.unwrap_or_else(Value::Error)
}
