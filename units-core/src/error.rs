//! Structured errors surfaced as diagnostics
//!
//! Errors never crash the provider. They are values that propagate through
//! adapters and carry enough information to be shown to the user as-is.

use crate::NumberError;
use serde::{Deserialize, Serialize};

/// Standard error codes (machine-readable)
pub mod codes {
    pub const PARSE_ERROR: &str = "PARSE_ERROR";
    pub const DIV_ZERO: &str = "DIV_ZERO";
    pub const OVERFLOW: &str = "OVERFLOW";
    pub const UNDEFINED_FUNC: &str = "UNDEFINED_FUNC";
    pub const UNDEFINED_DATA_SOURCE: &str = "UNDEFINED_DATA_SOURCE";
    pub const UNDEFINED_FIELD: &str = "UNDEFINED_FIELD";
    pub const TYPE_ERROR: &str = "TYPE_ERROR";
    pub const ARG_COUNT: &str = "ARG_COUNT";
    pub const ARG_TYPE: &str = "ARG_TYPE";
    pub const ARG_NULL: &str = "ARG_NULL";
    pub const UNKNOWN_ATTRIBUTE: &str = "UNKNOWN_ATTRIBUTE";
    pub const INVALID_ATTRIBUTE_COMBINATION: &str = "INVALID_ATTRIBUTE_COMBINATION";
    pub const MISSING_ATTRIBUTE_CONFIGURATION: &str = "MISSING_ATTRIBUTE_CONFIGURATION";
    pub const INTERNAL: &str = "INTERNAL";
}

/// Severity level of an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Operation failed
    Error,
    /// Provider cannot serve the request at all
    Fatal,
}

/// Context about where an error occurred
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorContext {
    /// Data source or function that raised the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    /// Attribute or argument the error is about
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,

    /// Propagation notes
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub notes: Vec<String>,
}

/// Structured error for diagnostics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitsError {
    /// Machine-readable error code
    pub code: String,

    /// Short human-readable summary
    pub summary: String,

    /// Human-readable error message
    pub message: String,

    /// Suggestion for fixing the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,

    /// Where the error occurred
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<ErrorContext>,

    pub severity: Severity,
}

impl UnitsError {
    /// Create a new error; the summary defaults to the message
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            code: code.into(),
            summary: message.clone(),
            message,
            suggestion: None,
            context: None,
            severity: Severity::Error,
        }
    }

    /// Builder: set summary line
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    /// Builder: add suggestion
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Builder: set source context
    pub fn in_source(mut self, source: impl Into<String>) -> Self {
        let ctx = self.context.get_or_insert_with(ErrorContext::default);
        ctx.source = Some(source.into());
        self
    }

    /// Builder: set attribute context
    pub fn at_attribute(mut self, attribute: impl Into<String>) -> Self {
        let ctx = self.context.get_or_insert_with(ErrorContext::default);
        ctx.attribute = Some(attribute.into());
        self
    }

    /// Builder: add propagation note
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        let ctx = self.context.get_or_insert_with(ErrorContext::default);
        ctx.notes.push(note.into());
        self
    }

    /// Builder: set severity
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    // ========== Common Error Constructors ==========

    pub fn parse_error(details: impl Into<String>) -> Self {
        Self::new(codes::PARSE_ERROR, format!("Parse error: {}", details.into()))
            .with_suggestion("Use a plain decimal such as 1024 or 1.5")
    }

    pub fn div_zero() -> Self {
        Self::new(codes::DIV_ZERO, "Division by zero")
    }

    pub fn undefined_func(name: &str) -> Self {
        Self::new(codes::UNDEFINED_FUNC, format!("Unknown function: {}", name))
            .with_suggestion("Use help() to list available functions")
    }

    pub fn undefined_data_source(name: &str) -> Self {
        Self::new(codes::UNDEFINED_DATA_SOURCE, format!("Unknown data source: {}", name))
            .with_suggestion("Use getProviderSchema to list available data sources")
    }

    pub fn undefined_field(name: &str) -> Self {
        Self::new(codes::UNDEFINED_FIELD, format!("Undefined field: {}", name))
    }

    pub fn type_error(expected: &str, got: &str) -> Self {
        Self::new(codes::TYPE_ERROR, format!("Expected {}, got {}", expected, got))
    }

    pub fn arg_count(func: &str, expected: usize, got: usize) -> Self {
        Self::new(codes::ARG_COUNT,
            format!("{}() expects {} arguments, got {}", func, expected, got))
            .with_suggestion(format!("Use help('{}') for usage", func))
    }

    pub fn arg_type(func: &str, arg: &str, expected: &str, got: &str) -> Self {
        Self::new(codes::ARG_TYPE,
            format!("{}() argument '{}': expected {}, got {}", func, arg, expected, got))
    }

    /// Required argument passed as null
    pub fn arg_null(func: &str, arg: &str) -> Self {
        Self::new(codes::ARG_NULL,
            format!("Invalid value for \"{}\" parameter: argument must not be null.", arg))
            .with_summary("Invalid function argument")
            .in_source(func)
            .at_attribute(arg)
    }

    pub fn unknown_attribute(name: &str) -> Self {
        Self::new(codes::UNKNOWN_ATTRIBUTE, format!("An attribute named \"{}\" is not expected here.", name))
            .with_summary("Unsupported argument")
            .at_attribute(name)
    }

    /// More than one of a mutually exclusive attribute set was configured
    pub fn invalid_attribute_combination(expected: &[String], found: &[String]) -> Self {
        Self::new(codes::INVALID_ATTRIBUTE_COMBINATION,
            format!("2 or more attributes specified when only one of [{}] is allowed (found: {})",
                expected.join(","), found.join(",")))
            .with_summary("Invalid Attribute Combination")
            .with_suggestion("Specify exactly one of the attributes")
    }

    /// None of a required attribute set was configured
    pub fn missing_attribute_configuration(expected: &[String]) -> Self {
        Self::new(codes::MISSING_ATTRIBUTE_CONFIGURATION,
            format!("No attribute specified when one (and only one) of [{}] is required",
                expected.join(",")))
            .with_summary("Missing Attribute Configuration")
            .with_suggestion("Specify exactly one of the attributes")
    }

    pub fn internal(details: impl Into<String>) -> Self {
        Self::new(codes::INTERNAL, format!("Internal error: {}", details.into()))
            .with_suggestion("This is a bug, please report it")
            .with_severity(Severity::Fatal)
    }
}

impl std::fmt::Display for UnitsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, " (suggestion: {})", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for UnitsError {}

impl From<NumberError> for UnitsError {
    fn from(err: NumberError) -> Self {
        match err {
            NumberError::ParseError(s) => Self::parse_error(s),
            NumberError::DivisionByZero => Self::div_zero(),
            NumberError::Overflow => Self::new(codes::OVERFLOW, "Numeric overflow"),
        }
    }
}
