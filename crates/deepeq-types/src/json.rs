//! Bridge between [`Value`] and `serde_json::Value`.
//!
//! Import is total. Export fails on anything JSON cannot express: cycles,
//! `undefined`, maps, sets, regexes and non-finite numbers.

use serde_json::{Map as JsonMap, Number};

use crate::container::Identity;
use crate::error::TypeError;
use crate::value::Value;

/// Largest integer an `f64` holds exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(entries) => {
                Value::object(entries.into_iter().map(|(k, v)| (k, Value::from(v))))
            }
        }
    }
}

impl Value {
    /// Export as JSON. Integral numbers in the safe range become JSON integers.
    pub fn to_json(&self) -> Result<serde_json::Value, TypeError> {
        to_json(self, &mut Vec::new())
    }
}

fn number_to_json(n: f64) -> Result<serde_json::Value, TypeError> {
    if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        return Ok(serde_json::Value::Number(Number::from(n as i64)));
    }
    Number::from_f64(n)
        .map(serde_json::Value::Number)
        .ok_or_else(|| TypeError::Unrepresentable(format!("non-finite number {n}")))
}

fn enter(stack: &mut Vec<Identity>, id: Identity) -> Result<(), TypeError> {
    if stack.contains(&id) {
        return Err(TypeError::Circular);
    }
    stack.push(id);
    Ok(())
}

fn to_json(value: &Value, stack: &mut Vec<Identity>) -> Result<serde_json::Value, TypeError> {
    match value {
        Value::Null => Ok(serde_json::Value::Null),
        Value::Bool(b) => Ok(serde_json::Value::Bool(*b)),
        Value::Number(n) => number_to_json(*n),
        Value::String(s) => Ok(serde_json::Value::String(s.clone())),
        Value::Array(a) => {
            enter(stack, a.identity())?;
            let items = a
                .snapshot()
                .iter()
                .map(|item| to_json(item, stack))
                .collect::<Result<Vec<_>, _>>()?;
            stack.pop();
            Ok(serde_json::Value::Array(items))
        }
        Value::Object(o) => {
            enter(stack, o.identity())?;
            let mut entries = JsonMap::new();
            for (key, item) in o.snapshot() {
                entries.insert(key, to_json(&item, stack)?);
            }
            stack.pop();
            Ok(serde_json::Value::Object(entries))
        }
        Value::Undefined => Err(TypeError::Unrepresentable("undefined".into())),
        Value::Regex(r) => Err(TypeError::Unrepresentable(format!("regex {}", r.pattern()))),
        Value::Map(_) => Err(TypeError::Unrepresentable("map".into())),
        Value::Set(_) => Err(TypeError::Unrepresentable("set".into())),
    }
}
