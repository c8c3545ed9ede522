//! Tally Time - Unix timestamp conversion
//!
//! Epoch seconds render in the local zone by default; UTC and fixed
//! offsets are available for deterministic output.

mod timestamp;
mod functions;

pub use timestamp::{
    datetime_to_epoch_seconds_in, epoch_seconds_to_datetime, epoch_seconds_to_local,
    format_epoch_seconds_in, local_to_epoch_seconds, now_epoch_seconds, parse_epoch_seconds,
    parse_in, render_in, RenderedInstant, TimestampError, Zone, DISPLAY_FORMAT,
};

use tally_plugin::PluginRegistry;

/// Load timestamp functions into registry
pub fn load_time_library(registry: PluginRegistry) -> PluginRegistry {
    registry
        .with_function(functions::EpochToDatetime)
        .with_function(functions::DatetimeToEpoch)
        .with_function(functions::NowEpoch)
}
