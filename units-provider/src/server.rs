//! JSON-RPC request handling for the units provider

use std::collections::HashMap;
use std::env;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use units_core::{Number, UnitsError, Value};
use units_plugin::PluginRegistry;

pub const TYPE_NAME: &str = "units";

const DESCRIPTION: &str = "This provider gives you a possibility to convert categorized units in an interoperable manner. \
Use data sources as containers for measurement units and converting them. \
Or, convert them using provider-defined functions. ";

const MARKDOWN_DESCRIPTION: &str = r#"
This provider gives you a possibility to convert categorized units in an interoperable manner.
Use [data sources](https://developer.hashicorp.com/terraform/language/data-sources) as containers for measurement units and converting them.
Or, convert them using [provider-defined functions](https://www.hashicorp.com/blog/terraform-1-8-improves-extensibility-with-provider-defined-functions).

## Problem to solve

- Tired of lacking possibility of an easy definition of quantities?
- One resource asks for disk size in GiB and other resource outputs it in MB?
- Tired of writing code like this?

```terraform
resource "cloud_provider_disk" "this" {
  size = var.disk_size_gib * 1024 * 1024 * 1024
}

resource "another_cloud_provider_disk" "that" {
  size_gb = ceil((var.disk_size_gib * (1024 * 1024 * 1024)) / (1000 * 1000 * 1000))
}
```

## Solution

### Data source

> With data sources, you can store converted values in a container, which will be stored in your state.

```terraform
data "units_data_size" "disk" {
  gibibytes = var.disk_size_gib
}

resource "cloud_provider_disk" "this" {
  size = data.units_data_size.disk.bytes
}

resource "another_cloud_provider_disk" "that" {
  size_gb = ceil(data.units_data_size.disk.gigabytes)
}
```

### Functions

> Converter function results are being computed during `plan`, and won't be stored in the state.

```terraform
resource "cloud_provider_disk" "this" {
  size = provider::units::from_gib(var.disk_size_gib)
}

resource "another_cloud_provider_disk" "that" {
  size_gb = ceil(provider::units::to_gb(provider::units::from_gib(var.disk_size_gib)))
}
```

## Liability

This provider is not intended to do automatic rounding and outputs conversion results as is.
Since results are `number`s, they can be both `int`s and `float`s.

Do not forget checking computed values and provide additional handling logic.
"#;

/// Reported provider version: `UNITS_PROVIDER_VERSION`, else the crate version
pub fn provider_version() -> String {
    env::var("UNITS_PROVIDER_VERSION")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string())
}

/// Registry with every library the provider serves
pub fn create_registry() -> PluginRegistry {
    units_datasize::load_data_size_library(PluginRegistry::new(TYPE_NAME))
}

// JSON-RPC types
#[derive(Debug, Deserialize)]
pub struct RpcRequest {
    #[allow(dead_code)]
    pub jsonrpc: String,
    pub id: Option<JsonValue>,
    pub method: String,
    #[serde(default)]
    pub params: Option<JsonValue>,
}

#[derive(Debug, Serialize)]
pub struct RpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

#[derive(Debug, Serialize)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<JsonValue>,
}

impl RpcError {
    pub fn parse_error(details: impl std::fmt::Display) -> Self {
        Self { code: -32700, message: format!("Parse error: {}", details), data: None }
    }

    fn method_not_found(method: &str) -> Self {
        Self { code: -32601, message: format!("Method not found: {}", method), data: None }
    }

    fn invalid_params(message: impl Into<String>) -> Self {
        Self { code: -32602, message: message.into(), data: None }
    }
}

impl RpcResponse {
    pub fn error(id: Option<JsonValue>, error: RpcError) -> Self {
        Self { jsonrpc: "2.0".to_string(), id, result: None, error: Some(error) }
    }
}

pub fn handle_request(registry: &PluginRegistry, request: &RpcRequest) -> RpcResponse {
    let result = match request.method.as_str() {
        // Lifecycle
        "initialize" => handle_initialize(&request.params),
        "initialized" => Ok(json!({})),
        "ping" => Ok(json!({})),

        // Schema
        "getProviderSchema" => Ok(provider_schema(registry)),

        // Data sources
        "validateDataSourceConfig" => handle_validate(registry, &request.params),
        "readDataSource" => handle_read(registry, &request.params),

        // Functions
        "callFunction" => handle_call(registry, &request.params),
        "help" => handle_help(registry, &request.params),

        _ => Err(RpcError::method_not_found(&request.method)),
    };

    match result {
        Ok(r) => RpcResponse {
            jsonrpc: "2.0".to_string(),
            id: request.id.clone(),
            result: Some(r),
            error: None,
        },
        Err(e) => {
            tracing::warn!(method = %request.method, code = e.code, "request failed: {}", e.message);
            RpcResponse::error(request.id.clone(), e)
        }
    }
}

fn handle_initialize(params: &Option<JsonValue>) -> Result<JsonValue, RpcError> {
    let client_info = params.as_ref()
        .and_then(|p| p.get("clientInfo"))
        .and_then(|c| c.get("name"))
        .and_then(|n| n.as_str())
        .unwrap_or("unknown");

    tracing::info!(client = client_info, "client connected");

    Ok(json!({
        "serverInfo": {
            "name": TYPE_NAME,
            "version": provider_version(),
            "description": DESCRIPTION
        },
        "capabilities": {
            "dataSources": true,
            "functions": true,
            "resources": false
        }
    }))
}

/// Provider metadata, data source schemas and function definitions
pub fn provider_schema(registry: &PluginRegistry) -> JsonValue {
    let mut data_sources = serde_json::Map::new();
    for name in registry.data_source_names() {
        if let Some(source) = registry.get_data_source(&name) {
            let meta = source.meta();
            let attributes: Vec<JsonValue> = source.schema().into_iter()
                .map(|a| json!({
                    "name": a.name,
                    "type": a.typ,
                    "description": a.description,
                    "optional": a.optional,
                    "computed": a.computed
                }))
                .collect();
            data_sources.insert(name, json!({
                "description": meta.description,
                "markdownDescription": meta.markdown_description,
                "attributes": attributes
            }));
        }
    }

    let mut functions = serde_json::Map::new();
    for name in registry.function_names() {
        if let Some(f) = registry.get_function(&name) {
            let meta = f.meta();
            let parameters: Vec<JsonValue> = meta.args.iter()
                .map(|a| json!({
                    "name": a.name,
                    "type": a.typ,
                    "description": a.description,
                    "markdownDescription": a.markdown_description
                }))
                .collect();
            functions.insert(name, json!({
                "summary": meta.summary,
                "description": meta.description,
                "markdownDescription": meta.markdown_description,
                "parameters": parameters,
                "return": { "type": meta.returns }
            }));
        }
    }

    json!({
        "provider": {
            "typeName": registry.type_name(),
            "version": provider_version(),
            "description": DESCRIPTION,
            "markdownDescription": MARKDOWN_DESCRIPTION,
            "attributes": []
        },
        "resources": {},
        "dataSources": data_sources,
        "functions": functions
    })
}

/// `{typeName, config}` from request params
fn data_source_params(params: &Option<JsonValue>) -> Result<(String, HashMap<String, Value>), RpcError> {
    let params = params.as_ref()
        .ok_or_else(|| RpcError::invalid_params("Missing params"))?;

    let type_name = params.get("typeName")
        .and_then(|t| t.as_str())
        .ok_or_else(|| RpcError::invalid_params("Missing 'typeName' parameter"))?;

    let config = match params.get("config") {
        None | Some(JsonValue::Null) => HashMap::new(),
        Some(JsonValue::Object(obj)) => obj.iter()
            .map(|(k, v)| (k.clone(), json_to_value(v)))
            .collect(),
        Some(_) => return Err(RpcError::invalid_params("'config' must be an object")),
    };

    Ok((type_name.to_string(), config))
}

fn handle_validate(registry: &PluginRegistry, params: &Option<JsonValue>) -> Result<JsonValue, RpcError> {
    let (type_name, config) = data_source_params(params)?;
    let diagnostics = registry.validate_data_source_config(&type_name, &config);
    Ok(json!({ "diagnostics": diagnostics.iter().map(diagnostic_to_json).collect::<Vec<_>>() }))
}

fn handle_read(registry: &PluginRegistry, params: &Option<JsonValue>) -> Result<JsonValue, RpcError> {
    let (type_name, config) = data_source_params(params)?;
    match registry.read_data_source(&type_name, &config) {
        Ok(state) => {
            let state: serde_json::Map<String, JsonValue> = state.iter()
                .map(|(k, v)| (k.clone(), value_to_json(v)))
                .collect();
            Ok(json!({ "state": state, "diagnostics": [] }))
        }
        Err(diagnostics) => Ok(json!({
            "state": null,
            "diagnostics": diagnostics.iter().map(diagnostic_to_json).collect::<Vec<_>>()
        })),
    }
}

fn handle_call(registry: &PluginRegistry, params: &Option<JsonValue>) -> Result<JsonValue, RpcError> {
    let params = params.as_ref()
        .ok_or_else(|| RpcError::invalid_params("Missing params"))?;

    let name = params.get("name")
        .and_then(|n| n.as_str())
        .ok_or_else(|| RpcError::invalid_params("Missing 'name' parameter"))?;

    let args: Vec<Value> = match params.get("arguments") {
        None | Some(JsonValue::Null) => Vec::new(),
        Some(JsonValue::Array(arr)) => arr.iter().map(json_to_value).collect(),
        Some(_) => return Err(RpcError::invalid_params("'arguments' must be an array")),
    };

    match registry.call_function(name, &args) {
        Value::Error(e) => Ok(json!({ "result": null, "error": diagnostic_to_json(&e) })),
        value => Ok(json!({ "result": value_to_json(&value) })),
    }
}

fn handle_help(registry: &PluginRegistry, params: &Option<JsonValue>) -> Result<JsonValue, RpcError> {
    let name = params.as_ref()
        .and_then(|p| p.get("name"))
        .and_then(|n| n.as_str());
    Ok(value_to_json(&registry.help(name)))
}

fn diagnostic_to_json(error: &UnitsError) -> JsonValue {
    let context = error.context.as_ref();
    json!({
        "severity": error.severity,
        "code": error.code,
        "summary": error.summary,
        "detail": error.message,
        "suggestion": error.suggestion,
        "source": context.and_then(|c| c.source.clone()),
        "attribute": context.and_then(|c| c.attribute.clone())
    })
}

/// JSON numbers and numeric strings both become numbers
pub fn json_to_value(json: &JsonValue) -> Value {
    match json {
        JsonValue::Null => Value::Null,
        JsonValue::Bool(b) => Value::Bool(*b),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Value::Number(Number::from_i64(i));
            }
            match Number::from_str(&n.to_string()) {
                Ok(num) => Value::Number(num),
                Err(_) => Value::Text(n.to_string()),
            }
        }
        JsonValue::String(s) => match Number::from_str(s) {
            Ok(n) => Value::Number(n),
            Err(_) => Value::Text(s.clone()),
        },
        JsonValue::Array(arr) => Value::List(arr.iter().map(json_to_value).collect()),
        JsonValue::Object(obj) => Value::Object(obj.iter().map(|(k, v)| (k.clone(), json_to_value(v))).collect()),
    }
}

/// Numbers leave as exact decimal strings
pub fn value_to_json(value: &Value) -> JsonValue {
    match value {
        Value::Null => JsonValue::Null,
        Value::Bool(b) => JsonValue::Bool(*b),
        Value::Number(n) => JsonValue::String(n.to_string()),
        Value::Text(s) => JsonValue::String(s.clone()),
        Value::List(l) => JsonValue::Array(l.iter().map(value_to_json).collect()),
        Value::Object(o) => JsonValue::Object(o.iter().map(|(k, v)| (k.clone(), value_to_json(v))).collect()),
        Value::Error(e) => json!({"_error": diagnostic_to_json(e)}),
    }
}
