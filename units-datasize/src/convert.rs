//! Conversion dispatcher: one populated unit in, every unit out

use std::collections::HashMap;
use units_core::{Number, Value};
use crate::unit::{DataSizeUnit, UNIT_COUNT};

/// A single resolved `(unit, value)` pair.
///
/// This is what the exactly-one-of configuration collapses to once it has
/// been validated.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSize {
    pub unit: DataSizeUnit,
    pub value: Number,
}

impl DataSize {
    pub fn new(unit: DataSizeUnit, value: Number) -> Self {
        Self { unit, value }
    }

    pub fn bytes(value: Number) -> Self {
        Self::new(DataSizeUnit::Bytes, value)
    }

    /// Canonical value in bytes
    pub fn to_bytes(&self) -> Number {
        if self.unit.is_canonical() {
            return self.value.clone();
        }
        self.unit.scale().to_canonical(&self.value)
    }

    /// Project into every unit of the catalog
    pub fn convert(&self) -> ConversionResult {
        ConversionResult::from_bytes(self.to_bytes())
    }
}

/// Sparse input: each unit may or may not carry a value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversionRequest {
    values: [Option<Number>; UNIT_COUNT],
}

impl ConversionRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set one unit
    pub fn with(mut self, unit: DataSizeUnit, value: Number) -> Self {
        self.set(unit, Some(value));
        self
    }

    pub fn set(&mut self, unit: DataSizeUnit, value: Option<Number>) {
        self.values[unit.index()] = value;
    }

    pub fn get(&self, unit: DataSizeUnit) -> Option<&Number> {
        self.values[unit.index()].as_ref()
    }

    /// Units carrying a value, in scan order
    pub fn populated(&self) -> Vec<DataSizeUnit> {
        DataSizeUnit::ALL.into_iter()
            .filter(|unit| self.get(*unit).is_some())
            .collect()
    }

    /// First populated unit in scan order.
    ///
    /// With several populated units the earliest one wins; callers are
    /// expected to have rejected that configuration already.
    pub fn resolve(&self) -> Option<DataSize> {
        DataSizeUnit::ALL.into_iter()
            .find_map(|unit| self.get(unit).map(|value| DataSize::new(unit, value.clone())))
    }
}

impl From<DataSize> for ConversionRequest {
    fn from(size: DataSize) -> Self {
        ConversionRequest::new().with(size.unit, size.value)
    }
}

/// Every unit of the catalog, derived from one byte count
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionResult {
    values: [Number; UNIT_COUNT],
}

impl ConversionResult {
    pub fn from_bytes(bytes: Number) -> Self {
        let values = DataSizeUnit::ALL.map(|unit| {
            if unit.is_canonical() {
                bytes.clone()
            } else {
                unit.scale().from_canonical(&bytes)
            }
        });
        Self { values }
    }

    pub fn get(&self, unit: DataSizeUnit) -> &Number {
        &self.values[unit.index()]
    }

    pub fn bytes(&self) -> &Number {
        self.get(DataSizeUnit::Bytes)
    }

    pub fn iter(&self) -> impl Iterator<Item = (DataSizeUnit, &Number)> {
        DataSizeUnit::ALL.into_iter().zip(self.values.iter())
    }

    /// Attribute name → number, the shape stored as data source state
    pub fn to_state(&self) -> HashMap<String, Value> {
        self.iter()
            .map(|(unit, value)| (unit.name().to_string(), Value::Number(value.clone())))
            .collect()
    }
}

/// Resolve the request and derive every unit.
///
/// An empty request converts as zero bytes.
pub fn convert(request: &ConversionRequest) -> ConversionResult {
    let bytes = match request.resolve() {
        Some(size) => {
            tracing::trace!(unit = %size.unit, value = %size.value, "resolved data size");
            size.to_bytes()
        }
        None => Number::zero(),
    };
    ConversionResult::from_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(s: &str) -> Number {
        Number::from_str(s).unwrap()
    }

    fn assert_close(actual: &Number, expected: f64) {
        let actual = actual.to_f64().unwrap();
        let tolerance = expected.abs() * 1e-12;
        assert!((actual - expected).abs() <= tolerance, "expected ~{}, got {}", expected, actual);
    }

    #[test]
    fn test_one_petabyte_of_bytes() {
        let result = convert(&ConversionRequest::new().with(DataSizeUnit::Bytes, num("1000000000000000")));

        assert_eq!(result.get(DataSizeUnit::Bytes).to_string(), "1000000000000000");
        assert_eq!(result.get(DataSizeUnit::Kilobytes).to_string(), "1000000000000");
        assert_eq!(result.get(DataSizeUnit::Megabytes).to_string(), "1000000000");
        assert_eq!(result.get(DataSizeUnit::Gigabytes).to_string(), "1000000");
        assert_eq!(result.get(DataSizeUnit::Terabytes).to_string(), "1000");
        assert_eq!(result.get(DataSizeUnit::Petabytes).to_string(), "1");
        assert_eq!(result.get(DataSizeUnit::Kibibytes).to_string(), "976562500000");
        assert_eq!(result.get(DataSizeUnit::Mebibytes).to_string(), "953674316.40625");
        assert_close(result.get(DataSizeUnit::Gibibytes), 931322.5746154785);
        assert_close(result.get(DataSizeUnit::Tebibytes), 909.4947017729282);
        assert_close(result.get(DataSizeUnit::Pebibytes), 0.8881784197001252);
    }

    #[test]
    fn test_binary_results_are_exact_decimals() {
        // 10^15 / 2^50 has a finite decimal expansion
        let result = DataSize::bytes(num("1000000000000000")).convert();
        assert_eq!(result.get(DataSizeUnit::Pebibytes).to_string(), "0.88817841970012523233890533447265625");
        assert_eq!(result.get(DataSizeUnit::Gibibytes).to_string(), "931322.574615478515625");
    }

    #[test]
    fn test_one_petabyte_unit() {
        let from_bytes = DataSize::bytes(num("1000000000000000")).convert();
        let from_peta = DataSize::new(DataSizeUnit::Petabytes, num("1")).convert();
        assert_eq!(from_bytes, from_peta);
    }

    #[test]
    fn test_one_pebibyte() {
        let result = convert(&ConversionRequest::new().with(DataSizeUnit::Pebibytes, num("1")));

        assert_eq!(result.get(DataSizeUnit::Bytes).to_string(), "1125899906842624");
        assert_eq!(result.get(DataSizeUnit::Kibibytes).to_string(), "1099511627776");
        assert_eq!(result.get(DataSizeUnit::Mebibytes).to_string(), "1073741824");
        assert_eq!(result.get(DataSizeUnit::Gibibytes).to_string(), "1048576");
        assert_eq!(result.get(DataSizeUnit::Tebibytes).to_string(), "1024");
        assert_eq!(result.get(DataSizeUnit::Pebibytes).to_string(), "1");
        assert_eq!(result.get(DataSizeUnit::Kilobytes).to_string(), "1125899906842.624");
        assert_eq!(result.get(DataSizeUnit::Megabytes).to_string(), "1125899906.842624");
        assert_eq!(result.get(DataSizeUnit::Gigabytes).to_string(), "1125899.906842624");
        assert_eq!(result.get(DataSizeUnit::Terabytes).to_string(), "1125.899906842624");
        assert_eq!(result.get(DataSizeUnit::Petabytes).to_string(), "1.125899906842624");
    }

    #[test]
    fn test_zero_everywhere() {
        for unit in DataSizeUnit::ALL {
            let result = DataSize::new(unit, Number::zero()).convert();
            for (other, value) in result.iter() {
                assert!(value.is_zero(), "{} = 0 gave {} = {}", unit, other, value);
                assert_eq!(value.to_string(), "0");
            }
        }
    }

    #[test]
    fn test_empty_request_is_zero() {
        let result = convert(&ConversionRequest::new());
        assert!(result.iter().all(|(_, v)| v.is_zero()));
    }

    #[test]
    fn test_scan_order_tie_break() {
        let request = ConversionRequest::new()
            .with(DataSizeUnit::Kilobytes, num("1"))
            .with(DataSizeUnit::Kibibytes, num("1"));
        assert_eq!(request.populated(), vec![DataSizeUnit::Kibibytes, DataSizeUnit::Kilobytes]);
        assert_eq!(request.resolve().unwrap().unit, DataSizeUnit::Kibibytes);
        assert_eq!(convert(&request).bytes().to_string(), "1024");
    }

    #[test]
    fn test_round_trip_idempotence() {
        let original = DataSize::new(DataSizeUnit::Gibibytes, num("3.5")).convert();
        for (unit, value) in original.iter() {
            let again = DataSize::new(unit, value.clone()).convert();
            for (other, expected) in original.iter() {
                assert_close(again.get(other), expected.to_f64().unwrap());
            }
        }
    }

    #[test]
    fn test_scale_round_trip() {
        let q = num("123.456");
        for unit in DataSizeUnit::ALL {
            let scale = unit.scale();
            assert_eq!(scale.from_canonical(&scale.to_canonical(&q)), q, "round trip through {}", unit);
        }
    }

    #[test]
    fn test_cross_consistency() {
        let q = num("7");
        for from in DataSizeUnit::ALL {
            let result = DataSize::new(from, q.clone()).convert();
            for to in DataSizeUnit::ALL {
                let direct = q.mul(&from.coefficient()).checked_div(&to.coefficient()).unwrap();
                assert_eq!(result.get(to), &direct, "{} -> {}", from, to);
            }
        }
    }

    #[test]
    fn test_family_boundary_exactness() {
        let pib = DataSize::new(DataSizeUnit::Pebibytes, num("1")).to_bytes();
        assert_eq!(pib.to_i64(), Some(1_125_899_906_842_624));
        let pb = DataSize::new(DataSizeUnit::Petabytes, num("1")).to_bytes();
        assert_eq!(pb.to_i64(), Some(1_000_000_000_000_000));
    }

    #[test]
    fn test_state_has_every_attribute() {
        let state = DataSize::bytes(num("2048")).convert().to_state();
        assert_eq!(state.len(), UNIT_COUNT);
        assert_eq!(state["kibibytes"].as_number().unwrap().to_i64(), Some(2));
        assert_eq!(state["kilobytes"].as_number().unwrap().to_string(), "2.048");
    }

    #[test]
    fn test_request_from_data_size() {
        let request: ConversionRequest = DataSize::new(DataSizeUnit::Terabytes, num("2")).into();
        assert_eq!(request.populated(), vec![DataSizeUnit::Terabytes]);
    }
}
