//! Leaf comparator built from a [`CompareConfig`].

use std::convert::Infallible;

use deepeq_engine::LeafComparator;
use deepeq_types::Value;

use crate::config::CompareConfig;

/// Strict equality, relaxed for numbers and strings as configured.
#[derive(Clone, Copy, Debug)]
pub struct ConfiguredLeaf {
    number_tolerance: f64,
    ignore_case: bool,
}

impl From<&CompareConfig> for ConfiguredLeaf {
    fn from(config: &CompareConfig) -> Self {
        Self {
            number_tolerance: config.number_tolerance,
            ignore_case: config.ignore_case,
        }
    }
}

impl LeafComparator for ConfiguredLeaf {
    type Error = Infallible;

    fn compare(&self, actual: &Value, expected: &Value) -> Result<bool, Infallible> {
        let equal = match (actual, expected) {
            (Value::Number(a), Value::Number(b)) => a == b || (a - b).abs() <= self.number_tolerance,
            (Value::String(a), Value::String(b)) if self.ignore_case => {
                a == b || a.to_lowercase() == b.to_lowercase()
            }
            _ => actual.strict_equals(expected),
        };
        Ok(equal)
    }
}
