//! Tally Health - Body mass index calculator

mod bmi;
mod functions;

pub use bmi::{bmi, BmiCategory, BmiReading, HealthError, UnitSystem};

use tally_plugin::PluginRegistry;

/// Load health functions into registry
pub fn load_health_library(registry: PluginRegistry) -> PluginRegistry {
    registry
        .with_function(functions::Bmi)
        .with_function(functions::BmiCategories)
}
