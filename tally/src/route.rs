//! Route resolution: hrefs from the catalog to the calculator they open

use std::fmt;
use serde::Serialize;
use tally_units::CATEGORIES;

/// Category shown by `/units` with no `type`
pub const DEFAULT_UNITS_CATEGORY: &str = "length";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "route", rename_all = "snake_case")]
pub enum Route {
    Home,
    Bmi,
    Emi,
    Currency,
    Timestamp,
    Epf,
    Info,
    /// Unit converter for a registered category slug
    Units { category: String },
    NotFound { path: String },
}

impl Route {
    /// Resolve an href such as `/units?type=torque` or `#/bmi`.
    /// Paths match case-insensitively; unknown unit categories are NotFound.
    pub fn parse(href: &str) -> Route {
        let href = href.trim().trim_start_matches('#');
        let (path, query) = match href.split_once('?') {
            Some((p, q)) => (p, Some(q)),
            None => (href, None),
        };
        let normalized = path.trim_end_matches('/').to_lowercase();

        match normalized.as_str() {
            "" => Route::Home,
            "/bmi" => Route::Bmi,
            "/emi" => Route::Emi,
            "/currency" => Route::Currency,
            "/timestamp" => Route::Timestamp,
            "/epf" => Route::Epf,
            "/info" => Route::Info,
            "/units" => {
                let requested = query
                    .and_then(|q| q.split('&').find_map(|pair| pair.strip_prefix("type=")))
                    .filter(|t| !t.is_empty())
                    .unwrap_or(DEFAULT_UNITS_CATEGORY);
                match CATEGORIES.get(requested) {
                    Some(cat) => Route::Units { category: cat.name.to_string() },
                    None => Route::NotFound { path: href.to_string() },
                }
            }
            _ => Route::NotFound { path: href.to_string() },
        }
    }

    /// Canonical href for this route
    pub fn href(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Bmi => "/bmi".to_string(),
            Route::Emi => "/emi".to_string(),
            Route::Currency => "/currency".to_string(),
            Route::Timestamp => "/timestamp".to_string(),
            Route::Epf => "/epf".to_string(),
            Route::Info => "/info".to_string(),
            Route::Units { category } => format!("/units?type={}", category),
            Route::NotFound { path } => path.clone(),
        }
    }

    /// Registry functions backing this route
    pub fn functions(&self) -> &'static [&'static str] {
        match self {
            Route::Home | Route::Info | Route::NotFound { .. } => &[],
            Route::Bmi => &["bmi", "bmi_categories"],
            Route::Emi => &["emi", "amortization_schedule"],
            Route::Currency => &["convert_currency", "currencies"],
            Route::Timestamp => &["epoch_to_datetime", "datetime_to_epoch", "now_epoch"],
            Route::Epf => &["epf"],
            Route::Units { .. } => &["convert_units", "describe_conversion", "units", "category"],
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.href())
    }
}
