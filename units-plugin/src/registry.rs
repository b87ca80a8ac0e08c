//! Plugin Registry

use crate::{FunctionPlugin, DataSourcePlugin, FunctionMeta, DataSourceMeta, AttributeSchema};
use units_core::{UnitsError, Value};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Central plugin registry
pub struct PluginRegistry {
    type_name: String,
    functions: HashMap<String, Arc<dyn FunctionPlugin>>,
    data_sources: HashMap<String, Arc<dyn DataSourcePlugin>>,
}

impl PluginRegistry {
    /// `type_name` prefixes every data source, e.g. `units` → `units_data_size`
    pub fn new(type_name: &str) -> Self {
        Self {
            type_name: type_name.to_lowercase(),
            functions: HashMap::new(),
            data_sources: HashMap::new(),
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn with_function<F: FunctionPlugin + 'static>(mut self, f: F) -> Self {
        let name = f.meta().name.to_lowercase();
        self.functions.insert(name, Arc::new(f));
        self
    }

    pub fn with_data_source<D: DataSourcePlugin + 'static>(mut self, d: D) -> Self {
        let name = self.full_type_name(d.meta().name);
        self.data_sources.insert(name, Arc::new(d));
        self
    }

    fn full_type_name(&self, name: &str) -> String {
        format!("{}_{}", self.type_name, name.to_lowercase())
    }

    pub fn get_function(&self, name: &str) -> Option<&dyn FunctionPlugin> {
        self.functions.get(&name.to_lowercase()).map(|f| f.as_ref())
    }

    /// Look up by full type name (`units_data_size`) or short name (`data_size`)
    pub fn get_data_source(&self, name: &str) -> Option<&dyn DataSourcePlugin> {
        let name = name.to_lowercase();
        self.data_sources.get(&name)
            .or_else(|| self.data_sources.get(&self.full_type_name(&name)))
            .map(|d| d.as_ref())
    }

    /// Sorted function names
    pub fn function_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.functions.keys().cloned().collect();
        names.sort();
        names
    }

    /// Sorted full data source type names
    pub fn data_source_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.data_sources.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn call_function(&self, name: &str, args: &[Value]) -> Value {
        match self.get_function(name) {
            Some(f) => {
                tracing::debug!(function = name, args = args.len(), "calling function");
                f.call(args)
            }
            None => {
                let similar = self.find_similar_functions(name);
                let mut err = UnitsError::undefined_func(name);
                if !similar.is_empty() {
                    let suggestions: Vec<&str> = similar.iter().take(5).map(|s| s.as_str()).collect();
                    err = err.with_suggestion(format!(
                        "Similar: {}. Use help() for full list.",
                        suggestions.join(", ")
                    ));
                }
                Value::Error(err)
            }
        }
    }

    /// Run schema and config validators; empty when the configuration is valid
    pub fn validate_data_source_config(&self, name: &str, config: &HashMap<String, Value>) -> Vec<UnitsError> {
        let source = match self.get_data_source(name) {
            Some(s) => s,
            None => return vec![UnitsError::undefined_data_source(name)],
        };

        let schema = source.schema();
        let known: HashSet<&str> = schema.iter().map(|a| a.name.as_str()).collect();

        let mut unknown: Vec<&String> = config.keys()
            .filter(|k| !known.contains(k.as_str()))
            .collect();
        unknown.sort();

        let mut diagnostics: Vec<UnitsError> = unknown.into_iter()
            .map(|k| UnitsError::unknown_attribute(k).in_source(name))
            .collect();

        for validator in source.config_validators() {
            diagnostics.extend(validator.validate(config).into_iter().map(|e| e.in_source(name)));
        }

        diagnostics
    }

    /// Validate then read; the state holds every schema attribute
    pub fn read_data_source(&self, name: &str, config: &HashMap<String, Value>) -> Result<HashMap<String, Value>, Vec<UnitsError>> {
        let diagnostics = self.validate_data_source_config(name, config);
        if !diagnostics.is_empty() {
            tracing::warn!(data_source = name, count = diagnostics.len(), "configuration rejected");
            return Err(diagnostics);
        }

        let source = self.get_data_source(name)
            .ok_or_else(|| vec![UnitsError::undefined_data_source(name)])?;

        tracing::debug!(data_source = name, "reading data source");
        source.read(config).map_err(|e| vec![e.in_source(name)])
    }

    /// Find function names similar to the given name (for error suggestions)
    fn find_similar_functions(&self, name: &str) -> Vec<String> {
        let name_lower = name.to_lowercase();
        let mut matches: Vec<(String, usize)> = self.functions.keys()
            .filter_map(|func_name| {
                let score = Self::similarity_score(&name_lower, func_name);
                if score > 0 {
                    Some((func_name.clone(), score))
                } else {
                    None
                }
            })
            .collect();

        // Higher score first, then alphabetical for stable output
        matches.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        matches.into_iter().map(|(name, _)| name).collect()
    }

    /// Calculate similarity score between two strings
    fn similarity_score(query: &str, candidate: &str) -> usize {
        let mut score = 0;

        if candidate.starts_with(query) {
            score += 100;
        } else if candidate.contains(query) {
            score += 50;
        } else if query.contains(candidate) {
            score += 30;
        }

        // Count shared characters
        let query_chars: HashSet<char> = query.chars().collect();
        let candidate_chars: HashSet<char> = candidate.chars().collect();
        let common = query_chars.intersection(&candidate_chars).count();
        score += common * 2;

        // Penalize length difference
        let len_diff = (query.len() as i32 - candidate.len() as i32).unsigned_abs() as usize;
        if len_diff < 5 && score > 0 {
            score += 5 - len_diff;
        }

        score
    }

    pub fn help(&self, name: Option<&str>) -> Value {
        match name {
            Some(n) => self.help_for(n),
            None => self.general_help(),
        }
    }

    fn help_for(&self, name: &str) -> Value {
        if let Some(f) = self.get_function(name) {
            return Value::Object(Self::function_to_help(f.meta()));
        }
        if let Some(d) = self.get_data_source(name) {
            return Value::Object(self.data_source_to_help(d.meta(), d.schema()));
        }

        Value::Error(UnitsError::new("NOT_FOUND", format!("No function or data source named '{}'", name)))
    }

    fn general_help(&self) -> Value {
        let mut help = HashMap::new();

        let mut funcs_by_cat: HashMap<String, Vec<String>> = HashMap::new();
        for name in self.function_names() {
            if let Some(f) = self.functions.get(&name) {
                funcs_by_cat.entry(f.meta().category.to_string()).or_default().push(name);
            }
        }
        help.insert("functions".to_string(),
            Value::Object(funcs_by_cat.into_iter()
                .map(|(k, v)| (k, Value::List(v.into_iter().map(Value::Text).collect())))
                .collect()));

        help.insert("data_sources".to_string(),
            Value::List(self.data_source_names().into_iter().map(Value::Text).collect()));

        help.insert("usage".to_string(),
            Value::Text("Call help('name') for detailed help.".to_string()));

        Value::Object(help)
    }

    fn function_to_help(meta: FunctionMeta) -> HashMap<String, Value> {
        let mut help = HashMap::new();
        help.insert("name".to_string(), Value::Text(meta.name.to_string()));
        help.insert("type".to_string(), Value::Text("function".to_string()));
        help.insert("summary".to_string(), Value::Text(meta.summary.to_string()));
        help.insert("description".to_string(), Value::Text(meta.description.to_string()));
        help.insert("markdown_description".to_string(), Value::Text(meta.markdown_description.to_string()));
        help.insert("usage".to_string(), Value::Text(meta.usage.to_string()));
        help.insert("returns".to_string(), Value::Text(meta.returns.to_string()));
        help.insert("category".to_string(), Value::Text(meta.category.to_string()));
        help.insert("args".to_string(), Value::List(
            meta.args.iter().map(|a| {
                let mut arg = HashMap::new();
                arg.insert("name".to_string(), Value::Text(a.name.to_string()));
                arg.insert("type".to_string(), Value::Text(a.typ.to_string()));
                arg.insert("description".to_string(), Value::Text(a.description.to_string()));
                arg.insert("markdown_description".to_string(), Value::Text(a.markdown_description.to_string()));
                Value::Object(arg)
            }).collect()
        ));
        help.insert("examples".to_string(), Value::List(
            meta.examples.iter().map(|e| Value::Text(e.to_string())).collect()
        ));
        help.insert("related".to_string(), Value::List(
            meta.related.iter().map(|r| Value::Text(r.to_string())).collect()
        ));
        help
    }

    fn data_source_to_help(&self, meta: DataSourceMeta, schema: Vec<AttributeSchema>) -> HashMap<String, Value> {
        let mut help = HashMap::new();
        help.insert("name".to_string(), Value::Text(self.full_type_name(meta.name)));
        help.insert("type".to_string(), Value::Text("data_source".to_string()));
        help.insert("description".to_string(), Value::Text(meta.description.to_string()));
        help.insert("attributes".to_string(), Value::List(
            schema.into_iter().map(|a| Value::Text(a.name)).collect()
        ));
        help
    }

    pub fn list_functions(&self, category: Option<&str>) -> Value {
        let funcs: Vec<Value> = self.function_names().into_iter()
            .filter_map(|name| self.functions.get(&name))
            .filter(|f| category.map_or(true, |c| f.meta().category == c))
            .map(|f| {
                let meta = f.meta();
                let mut obj = HashMap::new();
                obj.insert("name".to_string(), Value::Text(meta.name.to_string()));
                obj.insert("summary".to_string(), Value::Text(meta.summary.to_string()));
                obj.insert("usage".to_string(), Value::Text(meta.usage.to_string()));
                obj.insert("category".to_string(), Value::Text(meta.category.to_string()));
                Value::Object(obj)
            })
            .collect();
        Value::List(funcs)
    }
}
