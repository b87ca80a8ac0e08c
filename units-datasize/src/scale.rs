//! Scaling between a unit and bytes

use units_core::Number;

/// Pair of pure conversions for one unit, parameterized by its coefficient
/// (bytes per unit).
///
/// Zero passes through both directions untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct Scale {
    coefficient: Number,
}

impl Scale {
    /// `None` unless the coefficient is strictly positive
    pub fn new(coefficient: Number) -> Option<Self> {
        if coefficient.is_zero() || coefficient.is_negative() {
            return None;
        }
        Some(Self { coefficient })
    }

    pub fn coefficient(&self) -> &Number {
        &self.coefficient
    }

    /// Unit → bytes: `value * coefficient`
    pub fn to_canonical(&self, value: &Number) -> Number {
        if value.is_zero() {
            return value.clone();
        }
        value.mul(&self.coefficient)
    }

    /// Bytes → unit: `value / coefficient`
    pub fn from_canonical(&self, value: &Number) -> Number {
        if value.is_zero() {
            return value.clone();
        }
        // coefficient is non-zero by construction
        value.checked_div(&self.coefficient).unwrap_or_else(|_| value.clone())
    }
}

impl Default for Scale {
    /// Identity scale, the one bytes uses
    fn default() -> Self {
        Self { coefficient: Number::from_i64(1) }
    }
}
