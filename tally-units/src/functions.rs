//! Unit conversion functions exposed through the plugin registry

use std::collections::HashMap;
use tally_plugin::prelude::*;
use tally_core::number::format_fixed;
use crate::convert::convert_in;
use crate::registry::CATEGORIES;
use crate::{CategoryKind, ConversionCategory};

fn lookup(category: &str) -> Result<&'static ConversionCategory, TallyError> {
    CATEGORIES.get(category).ok_or_else(|| TallyError::unknown_category(category))
}

/// Drop trailing fractional zeros: "1.500" → "1.5", "2.000" → "2"
fn trim_decimals(s: String) -> String {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}

// ============ convert_units ============

pub struct Convert;

static CONVERT_ARGS: [ArgMeta; 4] = [
    ArgMeta::required("value", "Number", "Value to convert"),
    ArgMeta::required("category", "Text", "Conversion category (e.g. \"length\")"),
    ArgMeta::required("from_unit", "Text", "Source unit name or symbol (e.g. \"Kilometer\", \"km\")"),
    ArgMeta::required("to_unit", "Text", "Target unit name or symbol"),
];

static CONVERT_EXAMPLES: [&str; 3] = [
    "convert_units(100, \"length\", \"Kilometer\", \"Mile\") → 62.137119",
    "convert_units(100, \"temperature\", \"Celsius\", \"Fahrenheit\") → 212",
    "convert_units(1, \"pressure\", \"atm\", \"psi\") → 14.695949",
];

static CONVERT_RELATED: [&str; 3] = ["describe_conversion", "categories", "units"];

impl FunctionPlugin for Convert {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "convert_units",
            description: "Convert a value between two units of the same category",
            usage: "convert_units(value, category, from_unit, to_unit)",
            args: &CONVERT_ARGS,
            returns: "Number",
            examples: &CONVERT_EXAMPLES,
            category: "units",
            related: &CONVERT_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        into_value((|| -> Result<Value, TallyError> {
            require_args(args, 4, "convert_units")?;
            let value = extract_number(&args[0], "convert_units", "value")?;
            let category = extract_text(&args[1], "convert_units", "category")?;
            let from = extract_text(&args[2], "convert_units", "from_unit")?;
            let to = extract_text(&args[3], "convert_units", "to_unit")?;
            let result = convert_in(&category, &from, &to, value)
                .map_err(|e| TallyError::from(e).in_calculator("convert_units"))?;
            Ok(Value::Number(result))
        })())
    }
}

// ============ describe_conversion ============

pub struct DescribeConversion;

static DESCRIBE_EXAMPLES: [&str; 1] = [
    "describe_conversion(1, \"length\", \"Mile\", \"Kilometer\") → {value: 1.609344, display: \"1 Mile = 1.609344 Kilometer\"}",
];

static DESCRIBE_RELATED: [&str; 1] = ["convert_units"];

impl FunctionPlugin for DescribeConversion {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "describe_conversion",
            description: "Convert a value and render it with the configured number of decimals",
            usage: "describe_conversion(value, category, from_unit, to_unit)",
            args: &CONVERT_ARGS,
            returns: "Object",
            examples: &DESCRIBE_EXAMPLES,
            category: "units",
            related: &DESCRIBE_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &EvalContext) -> Value {
        into_value((|| -> Result<Value, TallyError> {
            require_args(args, 4, "describe_conversion")?;
            let value = extract_number(&args[0], "describe_conversion", "value")?;
            let category = lookup(&extract_text(&args[1], "describe_conversion", "category")?)?;
            let from = extract_text(&args[2], "describe_conversion", "from_unit")?;
            let to = extract_text(&args[3], "describe_conversion", "to_unit")?;

            let result = crate::convert(category, &from, &to, value)
                .map_err(|e| TallyError::from(e).in_calculator("describe_conversion"))?;
            let from_name = category.unit(&from).map(|u| u.name).unwrap_or_default();
            let to_name = category.unit(&to).map(|u| u.name).unwrap_or_default();

            let mut out = HashMap::new();
            out.insert("value".to_string(), Value::Number(result));
            out.insert("from_unit".to_string(), Value::from(from_name));
            out.insert("to_unit".to_string(), Value::from(to_name));
            out.insert("display".to_string(), Value::Text(format!(
                "{} {} = {} {}",
                trim_decimals(format_fixed(value, ctx.decimals)),
                from_name,
                format_fixed(result, ctx.decimals),
                to_name,
            )));
            Ok(Value::Object(out))
        })())
    }
}

// ============ categories ============

pub struct Categories;

static CATEGORIES_EXAMPLES: [&str; 1] = ["categories() → [{name: \"length\", title: \"Length\", ...}, ...]"];
static CATEGORIES_RELATED: [&str; 1] = ["units"];

impl FunctionPlugin for Categories {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "categories",
            description: "List every conversion category",
            usage: "categories()",
            args: &[],
            returns: "List",
            examples: &CATEGORIES_EXAMPLES,
            category: "units",
            related: &CATEGORIES_RELATED,
        }
    }

    fn call(&self, _args: &[Value], _ctx: &EvalContext) -> Value {
        let list = CATEGORIES.iter().map(|cat| {
            let mut entry = HashMap::new();
            entry.insert("name".to_string(), Value::from(cat.name));
            entry.insert("title".to_string(), Value::from(cat.title));
            entry.insert("units".to_string(), Value::Number(cat.units.len() as f64));
            Value::Object(entry)
        }).collect();
        Value::List(list)
    }
}

// ============ category ============

pub struct Category;

static CATEGORY_EXAMPLES: [&str; 1] = ["category(\"temperature\") → {name: \"temperature\", kind: \"temperature\", base_unit: null, ...}"];

impl FunctionPlugin for Category {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "category",
            description: "Describe one conversion category: title, kind and base unit",
            usage: "category(name)",
            args: &UNITS_ARGS,
            returns: "Object",
            examples: &CATEGORY_EXAMPLES,
            category: "units",
            related: &UNITS_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        into_value((|| -> Result<Value, TallyError> {
            require_args(args, 1, "category")?;
            let cat = lookup(&extract_text(&args[0], "category", "category")?)?;
            let kind = match cat.kind {
                CategoryKind::Multiplicative => "multiplicative",
                CategoryKind::Temperature => "temperature",
            };
            let mut out = HashMap::new();
            out.insert("name".to_string(), Value::from(cat.name));
            out.insert("title".to_string(), Value::from(cat.title));
            out.insert("kind".to_string(), Value::from(kind));
            out.insert("base_unit".to_string(), cat.base_unit().map(|u| Value::from(u.name)).unwrap_or(Value::Null));
            out.insert("units".to_string(), Value::from(cat.unit_names()));
            Ok(Value::Object(out))
        })())
    }
}

// ============ units ============

pub struct Units;

static UNITS_ARGS: [ArgMeta; 1] = [
    ArgMeta::required("category", "Text", "Conversion category (e.g. \"torque\")"),
];
static UNITS_EXAMPLES: [&str; 1] = ["units(\"length\") → [{name: \"Meter\", symbol: \"m\", factor: 1}, ...]"];
static UNITS_RELATED: [&str; 2] = ["categories", "convert_units"];

impl FunctionPlugin for Units {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "units",
            description: "List the units of a conversion category, in display order",
            usage: "units(category)",
            args: &UNITS_ARGS,
            returns: "List",
            examples: &UNITS_EXAMPLES,
            category: "units",
            related: &UNITS_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        into_value((|| -> Result<Value, TallyError> {
            require_args(args, 1, "units")?;
            let category = lookup(&extract_text(&args[0], "units", "category")?)?;
            let list = category.units.iter().map(|unit| {
                let mut entry = HashMap::new();
                entry.insert("name".to_string(), Value::from(unit.name));
                entry.insert("symbol".to_string(), Value::from(unit.symbol));
                entry.insert("factor".to_string(), Value::Number(unit.factor));
                Value::Object(entry)
            }).collect();
            Ok(Value::List(list))
        })())
    }
}
