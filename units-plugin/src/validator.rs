//! Configuration validators for data sources

use units_core::{UnitsError, Value};
use std::collections::HashMap;

/// Check over a whole data source configuration
pub trait ConfigValidator: Send + Sync {
    fn description(&self) -> String;

    /// Returns one diagnostic per problem found, empty when valid
    fn validate(&self, config: &HashMap<String, Value>) -> Vec<UnitsError>;
}

/// Exactly one of the listed attributes must be set.
///
/// Absent and null attributes both count as unset.
#[derive(Debug, Clone)]
pub struct ExactlyOneOf {
    attributes: Vec<String>,
}

impl ExactlyOneOf {
    pub fn new<I, S>(attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { attributes: attributes.into_iter().map(Into::into).collect() }
    }

    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }
}

impl ConfigValidator for ExactlyOneOf {
    fn description(&self) -> String {
        format!("Ensure that one and only one attribute from this collection is set: [{}]",
            self.attributes.join(","))
    }

    fn validate(&self, config: &HashMap<String, Value>) -> Vec<UnitsError> {
        let set: Vec<String> = self.attributes.iter()
            .filter(|name| config.get(name.as_str()).map_or(false, |v| !v.is_null()))
            .cloned()
            .collect();

        match set.len() {
            1 => Vec::new(),
            0 => vec![UnitsError::missing_attribute_configuration(&self.attributes)],
            _ => vec![UnitsError::invalid_attribute_combination(&self.attributes, &set)],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use units_core::codes;

    fn validator() -> ExactlyOneOf {
        ExactlyOneOf::new(["bytes", "kibibytes", "kilobytes"])
    }

    fn config(pairs: &[(&str, Value)]) -> HashMap<String, Value> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    #[test]
    fn test_exactly_one_set() {
        let cfg = config(&[("bytes", Value::from(0_i64)), ("kibibytes", Value::Null)]);
        assert!(validator().validate(&cfg).is_empty());
    }

    #[test]
    fn test_none_set() {
        let cfg = config(&[("bytes", Value::Null)]);
        let errors = validator().validate(&cfg);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, codes::MISSING_ATTRIBUTE_CONFIGURATION);
        assert_eq!(errors[0].summary, "Missing Attribute Configuration");
    }

    #[test]
    fn test_empty_config() {
        let errors = validator().validate(&HashMap::new());
        assert_eq!(errors[0].code, codes::MISSING_ATTRIBUTE_CONFIGURATION);
    }

    #[test]
    fn test_two_set() {
        let cfg = config(&[("bytes", Value::from(0_i64)), ("kilobytes", Value::from(0_i64))]);
        let errors = validator().validate(&cfg);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, codes::INVALID_ATTRIBUTE_COMBINATION);
        assert!(errors[0].message.contains("bytes,kilobytes"));
    }

    #[test]
    fn test_description_lists_attributes() {
        assert!(validator().description().contains("[bytes,kibibytes,kilobytes]"));
    }
}
