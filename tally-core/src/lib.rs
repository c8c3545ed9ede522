//! Tally Core - Fundamental types
//!
//! This crate provides the core types used throughout Tally:
//! - `Value`: Runtime values (numbers, text, objects, errors)
//! - `TallyError`: Structured errors for tool consumption
//! - `number`: parsing and display rounding for `f64` inputs

pub mod number;
mod value;
mod error;

pub use number::NumberError;
pub use value::Value;
pub use error::{TallyError, ErrorContext, Severity, codes};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{Value, TallyError, Severity, NumberError};
    pub use crate::error::codes;
}
