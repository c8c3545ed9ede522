//! Tally Plugin System
//!
//! Every calculator is exposed to callers as a `FunctionPlugin`: a pure
//! function over `Value` arguments with metadata describing its arguments.
//! Library crates register their functions into a `PluginRegistry`.

mod traits;
mod registry;
mod context;
pub mod args;

pub use traits::{FunctionPlugin, FunctionMeta, ArgMeta};
pub use registry::PluginRegistry;
pub use context::{EvalContext, DEFAULT_DECIMALS};

/// Re-export core types for plugin authors
pub mod prelude {
    pub use crate::{
        FunctionPlugin, FunctionMeta, ArgMeta, PluginRegistry, EvalContext,
    };
    pub use crate::args::*;
    pub use tally_core::prelude::*;
}
