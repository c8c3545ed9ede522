//! Tally - everyday calculators as pure functions
//!
//! Bundles every calculator library into one registry and adds the
//! landing-page catalog and route resolution.

pub mod catalog;
pub mod route;

pub use catalog::{search, next_section, previous_section, CatalogItem, SearchHit, Section, SECTIONS};
pub use route::{Route, DEFAULT_UNITS_CATEGORY};

pub use tally_core::{TallyError, Value};
pub use tally_plugin::{EvalContext, FunctionMeta, PluginRegistry};

use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;
use tally_units::CATEGORIES;

/// Registry with every calculator library loaded
pub fn standard_registry() -> PluginRegistry {
    let registry = PluginRegistry::new();
    let registry = tally_units::load_units_library(registry);
    let registry = tally_health::load_health_library(registry);
    let registry = tally_finance::load_finance_library(registry);
    let registry = tally_currency::load_currency_library(registry);
    tally_time::load_time_library(registry)
}

/// Main Tally engine
pub struct Tally {
    registry: Arc<PluginRegistry>,
    decimals: u32,
}

impl Tally {
    pub fn new(registry: PluginRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
            decimals: tally_plugin::DEFAULT_DECIMALS,
        }
    }

    pub fn with_standard_library() -> Self {
        Self::new(standard_registry())
    }

    /// Decimal places used in rendered unit conversions
    pub fn with_decimals(mut self, decimals: u32) -> Self {
        self.decimals = decimals;
        self
    }

    pub fn registry(&self) -> &Arc<PluginRegistry> {
        &self.registry
    }

    fn context(&self) -> EvalContext {
        EvalContext::new().with_decimals(self.decimals)
    }

    /// Call a function with positional arguments
    pub fn call(&self, name: &str, args: &[Value]) -> Value {
        debug!(function = name, argc = args.len(), "call");
        self.registry.call_function(name, args, &self.context())
    }

    /// Call a function with arguments keyed by name
    pub fn call_named(&self, name: &str, args: &HashMap<String, Value>) -> Value {
        debug!(function = name, argc = args.len(), "call_named");
        self.registry.call_named(name, args, &self.context())
    }

    pub fn help(&self, name: Option<&str>) -> Value {
        self.registry.help(name)
    }

    pub fn list_functions(&self, category: Option<&str>) -> Value {
        self.registry.list_functions(category)
    }

    /// Catalog sections, or search hits when `query` is given
    pub fn catalog(&self, query: Option<&str>) -> Value {
        match query {
            Some(q) => Value::List(search(q).iter().map(hit_value).collect()),
            None => Value::List(SECTIONS.iter().enumerate().map(|(i, s)| section_value(i, s)).collect()),
        }
    }

    /// Resolve an href to its route and the functions behind it
    pub fn open_route(&self, href: &str) -> Value {
        let route = Route::parse(href);
        if let Route::NotFound { path } = &route {
            return Value::Error(TallyError::not_found(format!("No page at '{}'", path))
                .with_suggestion("Use catalog() to list available pages"));
        }

        let mut out = HashMap::new();
        out.insert("href".to_string(), Value::Text(route.href()));
        out.insert("functions".to_string(), Value::from(route.functions().to_vec()));
        let name = match &route {
            Route::Units { category } => {
                if let Some(cat) = CATEGORIES.get(category) {
                    out.insert("category".to_string(), Value::from(cat.name));
                    out.insert("title".to_string(), Value::from(cat.title));
                    out.insert("units".to_string(), Value::from(cat.unit_names()));
                }
                "units"
            }
            Route::Home => "home",
            Route::Bmi => "bmi",
            Route::Emi => "emi",
            Route::Currency => "currency",
            Route::Timestamp => "timestamp",
            Route::Epf => "epf",
            Route::Info => "info",
            Route::NotFound { .. } => "not_found",
        };
        out.insert("route".to_string(), Value::from(name));
        Value::Object(out)
    }
}

impl Default for Tally {
    fn default() -> Self {
        Self::with_standard_library()
    }
}

fn item_value(item: &CatalogItem) -> Value {
    let mut out = HashMap::new();
    out.insert("title".to_string(), Value::from(item.title));
    out.insert("description".to_string(), Value::from(item.description));
    out.insert("href".to_string(), Value::from(item.href));
    Value::Object(out)
}

fn hit_value(hit: &SearchHit) -> Value {
    let mut out = match item_value(&hit.item) {
        Value::Object(map) => map,
        _ => HashMap::new(),
    };
    out.insert("section".to_string(), Value::from(hit.section));
    Value::Object(out)
}

fn section_value(index: usize, section: &Section) -> Value {
    let mut out = HashMap::new();
    out.insert("index".to_string(), Value::Number(index as f64));
    out.insert("title".to_string(), Value::from(section.title));
    out.insert("items".to_string(), Value::List(section.items.iter().map(item_value).collect()));
    Value::Object(out)
}

/// Build a named-argument map for `Tally::call_named`
#[macro_export]
macro_rules! named {
    {} => { std::collections::HashMap::new() };
    { $($key:ident : $value:expr),* $(,)? } => {{
        let mut map = std::collections::HashMap::new();
        $(
            map.insert(stringify!($key).to_string(), $crate::Value::from($value));
        )*
        map
    }};
}
