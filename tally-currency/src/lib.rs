//! Tally Currency - Exchange-rate snapshots and conversion
//!
//! - `convert` is a pure function over a snapshot keyed by the source currency.
//! - `RateSource` fetches snapshots (HTTP or the fixed reference table).
//! - `CurrencySession` sequences fetches so only the latest response is applied.

mod error;
mod catalogue;
mod snapshot;
mod source;
mod session;
mod functions;

pub use error::{normalize_code, CurrencyError};
pub use catalogue::{currency, format_amount, format_rate, Currency, AMOUNT_DECIMALS, CURRENCIES, RATE_DECIMALS};
pub use snapshot::{convert, convert_detailed, Conversion, ExchangeRateSnapshot};
pub use source::{parse_response, HttpRateSource, RateSource, StaticRateSource, DEFAULT_RATES_URL};
pub use session::{ApplyOutcome, CurrencySession, FetchTicket};
pub use functions::{conversion_value, snapshot_from_value};

use tally_plugin::PluginRegistry;

/// Load currency functions into registry
pub fn load_currency_library(registry: PluginRegistry) -> PluginRegistry {
    registry
        .with_function(functions::ConvertCurrency)
        .with_function(functions::Currencies)
}
