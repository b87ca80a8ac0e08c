//! Units Plugin System
//!
//! Provides traits for extending the provider with:
//! - Functions (pure computation over arguments)
//! - Data sources (configuration in, state out)
//! - Config validators (cross-attribute checks run before a read)

mod traits;
mod validator;
mod registry;

pub use traits::{
    FunctionPlugin, FunctionMeta,
    DataSourcePlugin, DataSourceMeta,
    AttributeSchema, ArgMeta,
};
pub use validator::{ConfigValidator, ExactlyOneOf};
pub use registry::PluginRegistry;

/// Re-export core types for plugin authors
pub mod prelude {
    pub use crate::{
        FunctionPlugin, FunctionMeta,
        DataSourcePlugin, DataSourceMeta,
        AttributeSchema, ArgMeta,
        ConfigValidator, ExactlyOneOf,
        PluginRegistry,
    };
    pub use units_core::prelude::*;
}
