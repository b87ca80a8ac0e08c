//! Plugin traits

use units_core::{UnitsError, Value};
use crate::ConfigValidator;
use serde::Serialize;
use std::collections::HashMap;

/// Metadata about a function argument
#[derive(Debug, Clone, Serialize)]
pub struct ArgMeta {
    pub name: &'static str,
    pub typ: &'static str,
    pub description: &'static str,
    pub markdown_description: &'static str,
}

impl ArgMeta {
    pub const fn required(
        name: &'static str,
        typ: &'static str,
        description: &'static str,
        markdown_description: &'static str,
    ) -> Self {
        Self { name, typ, description, markdown_description }
    }
}

/// Metadata for a function plugin
#[derive(Debug, Clone, Serialize)]
pub struct FunctionMeta {
    pub name: &'static str,
    pub summary: &'static str,
    pub description: &'static str,
    pub markdown_description: &'static str,
    pub usage: &'static str,
    pub args: &'static [ArgMeta],
    pub returns: &'static str,
    pub examples: &'static [&'static str],
    pub category: &'static str,
    pub related: &'static [&'static str],
}

/// Pure function plugin
pub trait FunctionPlugin: Send + Sync {
    fn meta(&self) -> FunctionMeta;
    fn call(&self, args: &[Value]) -> Value;
}

/// Schema entry for one data source attribute
#[derive(Debug, Clone, Serialize)]
pub struct AttributeSchema {
    pub name: String,
    pub typ: &'static str,
    pub description: String,
    /// May be set in configuration
    pub optional: bool,
    /// Filled in by the data source when left unset
    pub computed: bool,
}

impl AttributeSchema {
    pub fn optional_computed(name: impl Into<String>, typ: &'static str, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            typ,
            description: description.into(),
            optional: true,
            computed: true,
        }
    }
}

/// Metadata for a data source plugin
#[derive(Debug, Clone, Serialize)]
pub struct DataSourceMeta {
    /// Name without the provider prefix, e.g. `data_size`
    pub name: &'static str,
    pub description: &'static str,
    pub markdown_description: &'static str,
}

/// Data source plugin: reads a configuration object and produces state
pub trait DataSourcePlugin: Send + Sync {
    fn meta(&self) -> DataSourceMeta;

    fn schema(&self) -> Vec<AttributeSchema>;

    /// Cross-attribute checks run before `read`
    fn config_validators(&self) -> Vec<Box<dyn ConfigValidator>> {
        Vec::new()
    }

    /// Produce the state for an already validated configuration
    fn read(&self, config: &HashMap<String, Value>) -> Result<HashMap<String, Value>, UnitsError>;
}
