//! Data size unit catalog

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use serde::{Serialize, Deserialize};
use units_core::Number;
use crate::Scale;

/// Grouping of units sharing a scaling base
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Family {
    /// IEC prefixes, powers of 1024
    Binary,
    /// SI prefixes, powers of 1000
    Decimal,
}

impl Family {
    pub const fn base(self) -> i64 {
        match self {
            Family::Binary => 1024,
            Family::Decimal => 1000,
        }
    }
}

/// One entry of the fixed data size catalog.
///
/// Declaration order is the scan priority used when resolving a request:
/// bytes first, then the binary family, then the decimal family, each by
/// ascending exponent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSizeUnit {
    Bytes,
    Kibibytes,
    Mebibytes,
    Gibibytes,
    Tebibytes,
    Pebibytes,
    Kilobytes,
    Megabytes,
    Gigabytes,
    Terabytes,
    Petabytes,
}

/// Number of catalog entries
pub const UNIT_COUNT: usize = 11;

static SCALES: LazyLock<[Scale; UNIT_COUNT]> = LazyLock::new(|| {
    DataSizeUnit::ALL.map(|unit| Scale::new(unit.coefficient()).unwrap_or_default())
});

impl DataSizeUnit {
    /// The whole catalog in scan order
    pub const ALL: [DataSizeUnit; UNIT_COUNT] = [
        DataSizeUnit::Bytes,
        DataSizeUnit::Kibibytes,
        DataSizeUnit::Mebibytes,
        DataSizeUnit::Gibibytes,
        DataSizeUnit::Tebibytes,
        DataSizeUnit::Pebibytes,
        DataSizeUnit::Kilobytes,
        DataSizeUnit::Megabytes,
        DataSizeUnit::Gigabytes,
        DataSizeUnit::Terabytes,
        DataSizeUnit::Petabytes,
    ];

    /// The canonical unit every conversion goes through
    pub const CANONICAL: DataSizeUnit = DataSizeUnit::Bytes;

    /// Attribute name, e.g. `kibibytes`
    pub const fn name(self) -> &'static str {
        match self {
            DataSizeUnit::Bytes => "bytes",
            DataSizeUnit::Kibibytes => "kibibytes",
            DataSizeUnit::Mebibytes => "mebibytes",
            DataSizeUnit::Gibibytes => "gibibytes",
            DataSizeUnit::Tebibytes => "tebibytes",
            DataSizeUnit::Pebibytes => "pebibytes",
            DataSizeUnit::Kilobytes => "kilobytes",
            DataSizeUnit::Megabytes => "megabytes",
            DataSizeUnit::Gigabytes => "gigabytes",
            DataSizeUnit::Terabytes => "terabytes",
            DataSizeUnit::Petabytes => "petabytes",
        }
    }

    /// Function suffix, e.g. `kib` in `from_kib`. Bytes has none.
    pub const fn abbreviation(self) -> Option<&'static str> {
        match self {
            DataSizeUnit::Bytes => None,
            DataSizeUnit::Kibibytes => Some("kib"),
            DataSizeUnit::Mebibytes => Some("mib"),
            DataSizeUnit::Gibibytes => Some("gib"),
            DataSizeUnit::Tebibytes => Some("tib"),
            DataSizeUnit::Pebibytes => Some("pib"),
            DataSizeUnit::Kilobytes => Some("kb"),
            DataSizeUnit::Megabytes => Some("mb"),
            DataSizeUnit::Gigabytes => Some("gb"),
            DataSizeUnit::Terabytes => Some("tb"),
            DataSizeUnit::Petabytes => Some("pb"),
        }
    }

    /// Bytes belongs to both families and reports none
    pub const fn family(self) -> Option<Family> {
        match self {
            DataSizeUnit::Bytes => None,
            DataSizeUnit::Kibibytes
            | DataSizeUnit::Mebibytes
            | DataSizeUnit::Gibibytes
            | DataSizeUnit::Tebibytes
            | DataSizeUnit::Pebibytes => Some(Family::Binary),
            DataSizeUnit::Kilobytes
            | DataSizeUnit::Megabytes
            | DataSizeUnit::Gigabytes
            | DataSizeUnit::Terabytes
            | DataSizeUnit::Petabytes => Some(Family::Decimal),
        }
    }

    pub const fn exponent(self) -> u32 {
        match self {
            DataSizeUnit::Bytes => 0,
            DataSizeUnit::Kibibytes | DataSizeUnit::Kilobytes => 1,
            DataSizeUnit::Mebibytes | DataSizeUnit::Megabytes => 2,
            DataSizeUnit::Gibibytes | DataSizeUnit::Gigabytes => 3,
            DataSizeUnit::Tebibytes | DataSizeUnit::Terabytes => 4,
            DataSizeUnit::Pebibytes | DataSizeUnit::Petabytes => 5,
        }
    }

    /// Position in `ALL`
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn is_canonical(self) -> bool {
        matches!(self, DataSizeUnit::Bytes)
    }

    /// Bytes per one of this unit: `base^exponent`
    pub fn coefficient(self) -> Number {
        match self.family() {
            Some(family) => Number::from_i64(family.base()).pow(self.exponent()),
            None => Number::from_i64(1),
        }
    }

    /// Cached scaling functions for this unit
    pub fn scale(self) -> &'static Scale {
        &SCALES[self.index()]
    }

    /// Look up by attribute name or function abbreviation (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_lowercase();
        Self::ALL.into_iter()
            .find(|unit| unit.name() == name || unit.abbreviation() == Some(name.as_str()))
    }
}

impl fmt::Display for DataSizeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Unknown data size unit name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownUnit(pub String);

impl fmt::Display for UnknownUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown data size unit: {}", self.0)
    }
}

impl std::error::Error for UnknownUnit {}

impl FromStr for DataSizeUnit {
    type Err = UnknownUnit;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| UnknownUnit(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_order() {
        let names: Vec<&str> = DataSizeUnit::ALL.iter().map(|u| u.name()).collect();
        assert_eq!(names, vec![
            "bytes",
            "kibibytes", "mebibytes", "gibibytes", "tebibytes", "pebibytes",
            "kilobytes", "megabytes", "gigabytes", "terabytes", "petabytes",
        ]);
    }

    #[test]
    fn test_index_matches_position() {
        for (i, unit) in DataSizeUnit::ALL.iter().enumerate() {
            assert_eq!(unit.index(), i);
        }
    }

    #[test]
    fn test_canonical_is_bytes() {
        assert!(DataSizeUnit::CANONICAL.is_canonical());
        assert_eq!(DataSizeUnit::Bytes.exponent(), 0);
        assert_eq!(DataSizeUnit::Bytes.family(), None);
        assert_eq!(DataSizeUnit::Bytes.abbreviation(), None);
        assert_eq!(DataSizeUnit::Bytes.coefficient(), Number::from_i64(1));
    }

    #[test]
    fn test_binary_coefficients() {
        assert_eq!(DataSizeUnit::Kibibytes.coefficient().to_i64(), Some(1024));
        assert_eq!(DataSizeUnit::Mebibytes.coefficient().to_i64(), Some(1_048_576));
        assert_eq!(DataSizeUnit::Gibibytes.coefficient().to_i64(), Some(1_073_741_824));
        assert_eq!(DataSizeUnit::Tebibytes.coefficient().to_i64(), Some(1_099_511_627_776));
        assert_eq!(DataSizeUnit::Pebibytes.coefficient().to_i64(), Some(1_125_899_906_842_624));
    }

    #[test]
    fn test_decimal_coefficients() {
        assert_eq!(DataSizeUnit::Kilobytes.coefficient().to_i64(), Some(1_000));
        assert_eq!(DataSizeUnit::Megabytes.coefficient().to_i64(), Some(1_000_000));
        assert_eq!(DataSizeUnit::Gigabytes.coefficient().to_i64(), Some(1_000_000_000));
        assert_eq!(DataSizeUnit::Terabytes.coefficient().to_i64(), Some(1_000_000_000_000));
        assert_eq!(DataSizeUnit::Petabytes.coefficient().to_i64(), Some(1_000_000_000_000_000));
    }

    #[test]
    fn test_family_bases() {
        assert_eq!(DataSizeUnit::Gibibytes.family().map(Family::base), Some(1024));
        assert_eq!(DataSizeUnit::Gigabytes.family().map(Family::base), Some(1000));
    }

    #[test]
    fn test_from_name() {
        assert_eq!(DataSizeUnit::from_name("gibibytes"), Some(DataSizeUnit::Gibibytes));
        assert_eq!(DataSizeUnit::from_name("GiB"), Some(DataSizeUnit::Gibibytes));
        assert_eq!(DataSizeUnit::from_name("pb"), Some(DataSizeUnit::Petabytes));
        assert_eq!(DataSizeUnit::from_name("nibbles"), None);
        assert!("exabytes".parse::<DataSizeUnit>().is_err());
    }

    #[test]
    fn test_scale_is_cached_per_unit() {
        let scale = DataSizeUnit::Tebibytes.scale();
        assert_eq!(scale.coefficient(), &DataSizeUnit::Tebibytes.coefficient());
        assert!(std::ptr::eq(scale, DataSizeUnit::Tebibytes.scale()));
    }
}
