//! Tally Units - Unit registry and conversion evaluator
//!
//! Every category is a fixed table of units, each holding a factor relative
//! to the category base unit. Multiplicative categories convert through that
//! base; temperature is tagged separately and uses affine formulas.
//!
//! Groups:
//! - Engineering (length, weight, pressure, torque, angular velocity, ...)
//! - Heat (heat transfer, thermal conductivity, heat capacity)
//! - Fluid (flow rate, viscosity, surface tension)
//! - Light (luminance, illuminance, luminous intensity)
//! - Electricity, Magnetism, Radiology

mod unit;
mod category;
mod registry;
mod temperature;
mod convert;
mod functions;

pub use unit::UnitDefinition;
pub use category::{CategoryKind, ConversionCategory};
pub use registry::{CategoryRegistry, CATEGORIES};
pub use temperature::{
    convert_temperature, TemperatureScale,
    celsius_to_fahrenheit, fahrenheit_to_celsius,
    celsius_to_kelvin, kelvin_to_celsius,
    fahrenheit_to_kelvin, kelvin_to_fahrenheit,
};
pub use convert::{convert, convert_in, ConversionError, ConversionRequest};

use tally_plugin::PluginRegistry;

/// Load unit functions into registry
pub fn load_units_library(registry: PluginRegistry) -> PluginRegistry {
    registry
        .with_function(functions::Convert)
        .with_function(functions::DescribeConversion)
        .with_function(functions::Categories)
        .with_function(functions::Category)
        .with_function(functions::Units)
}
