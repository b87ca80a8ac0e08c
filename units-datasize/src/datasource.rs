//! `data_size` data source: a container holding one size in every unit

use std::collections::HashMap;
use units_plugin::prelude::*;
use crate::{convert, ConversionRequest, DataSizeUnit};

const DESCRIPTION: &str = "Container for data sizes. \
This data source is capable of taking data size in one unit (e.g. MiB) and convert it to other units (e.g. KB). \
This is done by converting input size to bytes and then converting it back to other units. \
NOTE: Specify exactly one of provided attributes to get others converted.";

const MARKDOWN_DESCRIPTION: &str = "
## Container for data sizes

This data source is capable of taking data size in one unit (e.g. `MiB`) and convert it to other units (e.g. `KB`).

This is done by converting input size to bytes and then converting it back to other units.

**NOTE**:
Specify exactly one of provided attributes to get others converted.
";

pub struct DataSizeSource;

impl DataSizeSource {
    /// Build the sparse request from configuration; null and absent are unset
    pub fn request_from_config(config: &HashMap<String, Value>) -> Result<ConversionRequest, UnitsError> {
        let mut request = ConversionRequest::new();
        for unit in DataSizeUnit::ALL {
            let value = match config.get(unit.name()) {
                None | Some(Value::Null) => continue,
                Some(v) => v.to_number(),
            };
            match value {
                Value::Number(n) => request.set(unit, Some(n)),
                Value::Error(e) => return Err(e.at_attribute(unit.name())),
                other => {
                    return Err(UnitsError::type_error("Number", other.type_name())
                        .at_attribute(unit.name()));
                }
            }
        }
        Ok(request)
    }
}

impl DataSourcePlugin for DataSizeSource {
    fn meta(&self) -> DataSourceMeta {
        DataSourceMeta {
            name: "data_size",
            description: DESCRIPTION,
            markdown_description: MARKDOWN_DESCRIPTION,
        }
    }

    fn schema(&self) -> Vec<AttributeSchema> {
        DataSizeUnit::ALL.iter()
            .map(|unit| AttributeSchema::optional_computed(
                unit.name(),
                "Number",
                format!("Data size in {}.", unit.name()),
            ))
            .collect()
    }

    fn config_validators(&self) -> Vec<Box<dyn ConfigValidator>> {
        vec![Box::new(ExactlyOneOf::new(DataSizeUnit::ALL.map(DataSizeUnit::name)))]
    }

    fn read(&self, config: &HashMap<String, Value>) -> Result<HashMap<String, Value>, UnitsError> {
        let request = Self::request_from_config(config)?;
        Ok(convert(&request).to_state())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use units_core::{codes, Number};

    fn registry() -> PluginRegistry {
        PluginRegistry::new("units").with_data_source(DataSizeSource)
    }

    fn config(pairs: &[(&str, Value)]) -> HashMap<String, Value> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    fn text(state: &HashMap<String, Value>, name: &str) -> String {
        state[name].as_number().map(Number::to_string).unwrap_or_default()
    }

    #[test]
    fn test_registered_type_name() {
        assert_eq!(registry().data_source_names(), vec!["units_data_size".to_string()]);
    }

    #[test]
    fn test_schema_lists_every_unit() {
        let schema = DataSizeSource.schema();
        assert_eq!(schema.len(), DataSizeUnit::ALL.len());
        assert!(schema.iter().all(|a| a.optional && a.computed && a.typ == "Number"));
        assert_eq!(schema[3].description, "Data size in gibibytes.");
    }

    #[test]
    fn test_read_base_1000() {
        for cfg in [
            config(&[("bytes", Value::from(1_000_000_000_000_000_i64))]),
            config(&[("petabytes", Value::from(1_i64))]),
        ] {
            let state = registry().read_data_source("units_data_size", &cfg).unwrap();
            assert_eq!(text(&state, "bytes"), "1000000000000000");
            assert_eq!(text(&state, "kilobytes"), "1000000000000");
            assert_eq!(text(&state, "megabytes"), "1000000000");
            assert_eq!(text(&state, "gigabytes"), "1000000");
            assert_eq!(text(&state, "terabytes"), "1000");
            assert_eq!(text(&state, "petabytes"), "1");
            assert_eq!(text(&state, "kibibytes"), "976562500000");
            assert_eq!(text(&state, "mebibytes"), "953674316.40625");
            assert!(text(&state, "gibibytes").starts_with("931322.5746154785"));
            assert!(text(&state, "tebibytes").starts_with("909.4947017729282"));
            assert!(text(&state, "pebibytes").starts_with("0.8881784197001252"));
        }
    }

    #[test]
    fn test_read_base_1024() {
        for cfg in [
            config(&[("bytes", Value::from(1_125_899_906_842_624_i64))]),
            config(&[("pebibytes", Value::from(1_i64))]),
        ] {
            let state = registry().read_data_source("units_data_size", &cfg).unwrap();
            assert_eq!(text(&state, "bytes"), "1125899906842624");
            assert_eq!(text(&state, "kilobytes"), "1125899906842.624");
            assert_eq!(text(&state, "megabytes"), "1125899906.842624");
            assert_eq!(text(&state, "gigabytes"), "1125899.906842624");
            assert_eq!(text(&state, "terabytes"), "1125.899906842624");
            assert_eq!(text(&state, "petabytes"), "1.125899906842624");
            assert_eq!(text(&state, "kibibytes"), "1099511627776");
            assert_eq!(text(&state, "mebibytes"), "1073741824");
            assert_eq!(text(&state, "gibibytes"), "1048576");
            assert_eq!(text(&state, "tebibytes"), "1024");
            assert_eq!(text(&state, "pebibytes"), "1");
        }
    }

    #[test]
    fn test_read_from_zero() {
        for cfg in [
            config(&[("bytes", Value::from(0_i64))]),
            config(&[("pebibytes", Value::from(0_i64))]),
        ] {
            let state = registry().read_data_source("units_data_size", &cfg).unwrap();
            assert_eq!(state.len(), DataSizeUnit::ALL.len());
            for unit in DataSizeUnit::ALL {
                assert_eq!(text(&state, unit.name()), "0", "{}", unit);
            }
        }
    }

    #[test]
    fn test_multiple_attributes_provided() {
        let cfg = config(&[("bytes", Value::from(0_i64)), ("pebibytes", Value::from(0_i64))]);
        let errors = registry().read_data_source("units_data_size", &cfg).unwrap_err();
        assert_eq!(errors[0].summary, "Invalid Attribute Combination");
    }

    #[test]
    fn test_no_attributes_provided() {
        let errors = registry().read_data_source("units_data_size", &HashMap::new()).unwrap_err();
        assert_eq!(errors[0].summary, "Missing Attribute Configuration");
    }

    #[test]
    fn test_nulls_count_as_unset() {
        let cfg = config(&[("bytes", Value::Null), ("kibibytes", Value::from(2_i64)), ("kilobytes", Value::Null)]);
        let state = registry().read_data_source("units_data_size", &cfg).unwrap();
        assert_eq!(text(&state, "bytes"), "2048");
    }

    #[test]
    fn test_text_values_are_parsed() {
        let cfg = config(&[("mebibytes", Value::from("1.5"))]);
        let state = registry().read_data_source("units_data_size", &cfg).unwrap();
        assert_eq!(text(&state, "kibibytes"), "1536");
    }

    #[test]
    fn test_non_numeric_value_rejected() {
        let cfg = config(&[("gigabytes", Value::Bool(true))]);
        let errors = registry().read_data_source("units_data_size", &cfg).unwrap_err();
        assert_eq!(errors[0].code, codes::TYPE_ERROR);
        assert_eq!(errors[0].context.as_ref().unwrap().attribute.as_deref(), Some("gigabytes"));
    }

    #[test]
    fn test_request_from_config_tie_break() {
        let cfg = config(&[("petabytes", Value::from(1_i64)), ("gibibytes", Value::from(1_i64))]);
        let request = DataSizeSource::request_from_config(&cfg).unwrap();
        assert_eq!(request.resolve().unwrap().unit, DataSizeUnit::Gibibytes);
    }
}
