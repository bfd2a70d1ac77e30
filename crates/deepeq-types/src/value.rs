use std::collections::HashMap;

use crate::container::{ArrayRef, Identity, MapRef, ObjectRef, RegexRef, SetRef};
use crate::kind::ContainerKind;

/// A dynamically-typed value.
///
/// Primitives are held inline; containers and regexes are shared handles
/// with identity (see [`crate::container`]). `Value` deliberately has no
/// `PartialEq`: which equality applies (strict, same-value-zero, deep) is
/// always the caller's choice.
#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Regex(RegexRef),
    Array(ArrayRef),
    Object(ObjectRef),
    Map(MapRef),
    Set(SetRef),
}

impl Value {
    pub fn string(s: impl Into<String>) -> Self {
        Self::String(s.into())
    }

    pub fn regex(source: impl Into<String>, flags: impl Into<String>) -> Self {
        Self::Regex(RegexRef::new(source, flags))
    }

    pub fn array(items: Vec<Value>) -> Self {
        Self::Array(ArrayRef::from_vec(items))
    }

    pub fn object<K: Into<String>>(entries: impl IntoIterator<Item = (K, Value)>) -> Self {
        Self::Object(ObjectRef::from_entries(
            entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        ))
    }

    /// Build a map; later duplicate keys overwrite earlier ones.
    pub fn map(entries: impl IntoIterator<Item = (Value, Value)>) -> Self {
        let map = MapRef::new();
        for (k, v) in entries {
            map.insert(k, v);
        }
        Self::Map(map)
    }

    /// Build a set; duplicate members are dropped.
    pub fn set(members: impl IntoIterator<Item = Value>) -> Self {
        let set = SetRef::new();
        for v in members {
            set.insert(v);
        }
        Self::Set(set)
    }

    pub fn kind(&self) -> ContainerKind {
        match self {
            Self::Array(_) => ContainerKind::Array,
            Self::Object(_) => ContainerKind::PlainObject,
            Self::Map(_) => ContainerKind::Map,
            Self::Set(_) => ContainerKind::Set,
            _ => ContainerKind::Leaf,
        }
    }

    /// Identity of a container or regex; `None` for primitives.
    pub fn identity(&self) -> Option<Identity> {
        match self {
            Self::Array(a) => Some(a.identity()),
            Self::Object(o) => Some(o.identity()),
            Self::Map(m) => Some(m.identity()),
            Self::Set(s) => Some(s.identity()),
            Self::Regex(r) => Some(r.identity()),
            _ => None,
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_regex(&self) -> Option<&RegexRef> {
        match self {
            Self::Regex(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayRef> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Self::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&MapRef> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_set(&self) -> Option<&SetRef> {
        match self {
            Self::Set(s) => Some(s),
            _ => None,
        }
    }

    /// Strict equality (`===`).
    ///
    /// Numbers compare by IEEE equality, so `NaN` is unequal to itself and
    /// `0.0` equals `-0.0`. Containers and regexes compare by identity.
    pub fn strict_equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Self::Undefined, Self::Undefined) | (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Regex(a), Self::Regex(b)) => a.ptr_eq(b),
            (Self::Array(a), Self::Array(b)) => a.ptr_eq(b),
            (Self::Object(a), Self::Object(b)) => a.ptr_eq(b),
            (Self::Map(a), Self::Map(b)) => a.ptr_eq(b),
            (Self::Set(a), Self::Set(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    /// Key equality used by maps and sets: strict equality, except that
    /// `NaN` equals `NaN`.
    pub fn same_value_zero(&self, other: &Value) -> bool {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) if a.is_nan() && b.is_nan() => true,
            _ => self.strict_equals(other),
        }
    }

    /// Copy the whole graph reachable from `self` into fresh containers.
    ///
    /// Shared and cyclic references are preserved: a container reached twice
    /// in the source is a single container in the copy.
    pub fn deep_clone(&self) -> Value {
        let mut copies = HashMap::new();
        self.copy_with(&mut copies)
    }

    fn copy_with(&self, copies: &mut HashMap<Identity, Value>) -> Value {
        if let Some(copy) = self.identity().and_then(|id| copies.get(&id)) {
            return copy.clone();
        }
        match self {
            Self::Regex(r) => {
                let copy = Value::regex(r.source(), r.flags());
                copies.insert(r.identity(), copy.clone());
                copy
            }
            Self::Array(a) => {
                let fresh = ArrayRef::new();
                copies.insert(a.identity(), Value::Array(fresh.clone()));
                for item in a.snapshot() {
                    fresh.push(item.copy_with(copies));
                }
                Value::Array(fresh)
            }
            Self::Object(o) => {
                let fresh = ObjectRef::new();
                copies.insert(o.identity(), Value::Object(fresh.clone()));
                for (key, item) in o.snapshot() {
                    fresh.insert(key, item.copy_with(copies));
                }
                Value::Object(fresh)
            }
            Self::Map(m) => {
                let fresh = MapRef::new();
                copies.insert(m.identity(), Value::Map(fresh.clone()));
                for (key, item) in m.snapshot() {
                    let key = key.copy_with(copies);
                    fresh.insert(key, item.copy_with(copies));
                }
                Value::Map(fresh)
            }
            Self::Set(s) => {
                let fresh = SetRef::new();
                copies.insert(s.identity(), Value::Set(fresh.clone()));
                for member in s.snapshot() {
                    fresh.insert(member.copy_with(copies));
                }
                Value::Set(fresh)
            }
            primitive => primitive.clone(),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::array(items)
    }
}
