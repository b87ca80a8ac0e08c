//! Units Core - Fundamental types
//!
//! This crate provides the core types used throughout the units provider:
//! - `Number`: Arbitrary precision decimal numbers
//! - `Value`: Runtime values (numbers, text, objects, errors)
//! - `UnitsError`: Structured errors surfaced as diagnostics

mod number;
mod value;
mod error;

pub use number::{Number, NumberError};
pub use value::Value;
pub use error::{UnitsError, ErrorContext, Severity, codes};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{Number, Value, UnitsError, Severity};
    pub use crate::error::codes;
}
