//! BMI functions exposed through the plugin registry

use std::collections::HashMap;
use tally_plugin::prelude::*;
use crate::bmi::{bmi, BmiCategory, UnitSystem};

// ============ bmi ============

pub struct Bmi;

static BMI_ARGS: [ArgMeta; 3] = [
    ArgMeta::required("height", "Number", "Height in centimeters (metric) or inches (imperial)"),
    ArgMeta::required("weight", "Number", "Weight in kilograms (metric) or pounds (imperial)"),
    ArgMeta::optional("unit_system", "Text", "\"metric\" or \"imperial\"", "metric"),
];

static BMI_EXAMPLES: [&str; 2] = [
    "bmi(175, 70) → {value: 22.857, display: 22.9, category: \"Normal weight\"}",
    "bmi(70, 154, \"imperial\") → {display: 22.1, category: \"Normal weight\"}",
];

static BMI_RELATED: [&str; 1] = ["bmi_categories"];

impl FunctionPlugin for Bmi {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "bmi",
            description: "Body mass index with its weight category",
            usage: "bmi(height, weight, [unit_system])",
            args: &BMI_ARGS,
            returns: "Object",
            examples: &BMI_EXAMPLES,
            category: "health",
            related: &BMI_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        into_value((|| -> Result<Value, TallyError> {
            require_args(args, 2, "bmi")?;
            let height = extract_number(&args[0], "bmi", "height")?;
            let weight = extract_number(&args[1], "bmi", "weight")?;
            let system = match extract_optional_text(args, 2, "bmi", "unit_system")? {
                Some(s) => s.parse::<UnitSystem>().map_err(TallyError::from)?,
                None => UnitSystem::default(),
            };

            let reading = bmi(height, weight, system)?;

            let mut out = HashMap::new();
            out.insert("value".to_string(), Value::Number(reading.value));
            out.insert("display".to_string(), Value::Number(reading.display_value()));
            out.insert("category".to_string(), Value::from(reading.category.label()));
            out.insert("range".to_string(), Value::from(reading.category.range_label()));
            Ok(Value::Object(out))
        })())
    }
}

// ============ bmi_categories ============

pub struct BmiCategories;

static BMI_CATEGORIES_EXAMPLES: [&str; 1] = [
    "bmi_categories() → [{category: \"Underweight\", range: \"Below 18.5\"}, ...]",
];

impl FunctionPlugin for BmiCategories {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "bmi_categories",
            description: "Reference table of BMI categories and their ranges",
            usage: "bmi_categories()",
            args: &[],
            returns: "List",
            examples: &BMI_CATEGORIES_EXAMPLES,
            category: "health",
            related: &["bmi"],
        }
    }

    fn call(&self, _args: &[Value], _ctx: &EvalContext) -> Value {
        Value::List(BmiCategory::ALL.iter().map(|c| {
            let mut row = HashMap::new();
            row.insert("category".to_string(), Value::from(c.label()));
            row.insert("range".to_string(), Value::from(c.range_label()));
            Value::Object(row)
        }).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bmi_plugin_metric_default() {
        let out = Bmi.call(&[Value::Number(175.0), Value::Number(70.0)], &EvalContext::default());
        assert_eq!(out.get("display").as_number(), Some(22.9));
        assert_eq!(out.get("category").as_text(), Some("Normal weight"));
    }

    #[test]
    fn test_bmi_plugin_imperial() {
        let args = [Value::Number(70.0), Value::Number(154.0), Value::from("imperial")];
        let out = Bmi.call(&args, &EvalContext::default());
        assert_eq!(out.get("display").as_number(), Some(22.1));
    }

    #[test]
    fn test_bmi_plugin_zero_height() {
        match Bmi.call(&[Value::Number(0.0), Value::Number(70.0)], &EvalContext::default()) {
            Value::Error(e) => assert_eq!(e.code, codes::INVALID_INPUT),
            other => panic!("expected error, got {:?}", other),
        }
    }

    #[test]
    fn test_bmi_plugin_non_text_unit_system() {
        let args = [Value::Number(175.0), Value::Number(70.0), Value::Number(1.0)];
        match Bmi.call(&args, &EvalContext::default()) {
            Value::Error(e) => assert_eq!(e.code, codes::ARG_TYPE),
            other => panic!("expected error, got {:?}", other),
        }
    }

    #[test]
    fn test_bmi_categories_table() {
        let out = BmiCategories.call(&[], &EvalContext::default());
        let rows = out.as_list().unwrap();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[1].get("range").as_text(), Some("18.5 - 24.9"));
    }
}
