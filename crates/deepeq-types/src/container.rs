//! Shared container handles.
//!
//! Every container is a reference-counted, interior-mutable handle. Cloning
//! a handle aliases the same container, which is what gives a container an
//! [`Identity`] and makes self-referential graphs constructible:
//!
//! ```rust
//! use deepeq_types::{ObjectRef, Value};
//!
//! let o = ObjectRef::new();
//! o.insert("self", Value::Object(o.clone()));
//! assert!(o.get("self").unwrap().as_object().unwrap().ptr_eq(&o));
//! ```
//!
//! Reads hand out snapshots (cheap handle clones) instead of guards, so no
//! lock is ever held while a caller recurses into a nested value. A cyclic
//! graph keeps itself alive until one of its edges is removed.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use crate::value::Value;

/// Address of a container, stable for as long as any handle to it lives.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identity(usize);

impl Identity {
    fn of<T>(arc: &Arc<T>) -> Self {
        Self(Arc::as_ptr(arc) as *const () as usize)
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identity({:#x})", self.0)
    }
}

// ---------------------------------------------------------------------------
// ArrayRef
// ---------------------------------------------------------------------------

/// Ordered, index-addressed list of values.
#[derive(Clone, Default)]
pub struct ArrayRef(Arc<RwLock<Vec<Value>>>);

impl ArrayRef {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_vec(items: Vec<Value>) -> Self {
        Self(Arc::new(RwLock::new(items)))
    }

    pub fn identity(&self) -> Identity {
        Identity::of(&self.0)
    }

    /// Returns `true` if both handles alias the same array.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub fn len(&self) -> usize {
        self.0.read().expect("lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Option<Value> {
        self.0.read().expect("lock poisoned").get(index).cloned()
    }

    pub fn push(&self, value: Value) {
        self.0.write().expect("lock poisoned").push(value);
    }

    /// Overwrite the element at `index`. Returns `false` if out of bounds.
    pub fn set(&self, index: usize, value: Value) -> bool {
        let mut items = self.0.write().expect("lock poisoned");
        match items.get_mut(index) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Clone out the current elements.
    pub fn snapshot(&self) -> Vec<Value> {
        self.0.read().expect("lock poisoned").clone()
    }
}

// ---------------------------------------------------------------------------
// ObjectRef
// ---------------------------------------------------------------------------

/// Plain object: string keys to values, iterated in sorted key order.
#[derive(Clone, Default)]
pub struct ObjectRef(Arc<RwLock<BTreeMap<String, Value>>>);

impl ObjectRef {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: BTreeMap<String, Value>) -> Self {
        Self(Arc::new(RwLock::new(entries)))
    }

    pub fn identity(&self) -> Identity {
        Identity::of(&self.0)
    }

    /// Returns `true` if both handles alias the same object.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub fn len(&self) -> usize {
        self.0.read().expect("lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.0.read().expect("lock poisoned").get(key).cloned()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.read().expect("lock poisoned").contains_key(key)
    }

    /// Insert or replace a property, returning the previous value.
    pub fn insert(&self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.write().expect("lock poisoned").insert(key.into(), value)
    }

    pub fn remove(&self, key: &str) -> Option<Value> {
        self.0.write().expect("lock poisoned").remove(key)
    }

    pub fn keys(&self) -> Vec<String> {
        self.0.read().expect("lock poisoned").keys().cloned().collect()
    }

    /// Clone out the current properties in key order.
    pub fn snapshot(&self) -> Vec<(String, Value)> {
        self.0
            .read()
            .expect("lock poisoned")
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Clone out the current properties as a map.
    pub fn entries(&self) -> BTreeMap<String, Value> {
        self.0.read().expect("lock poisoned").clone()
    }
}

// ---------------------------------------------------------------------------
// MapRef
// ---------------------------------------------------------------------------

/// Keyed collection with arbitrary value keys, in insertion order.
///
/// Keys are matched with [`Value::same_value_zero`]: primitives by value,
/// containers by identity.
#[derive(Clone, Default)]
pub struct MapRef(Arc<RwLock<Vec<(Value, Value)>>>);

impl MapRef {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn identity(&self) -> Identity {
        Identity::of(&self.0)
    }

    /// Returns `true` if both handles alias the same map.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub fn len(&self) -> usize {
        self.0.read().expect("lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, key: &Value) -> Option<Value> {
        self.0
            .read()
            .expect("lock poisoned")
            .iter()
            .find(|(k, _)| k.same_value_zero(key))
            .map(|(_, v)| v.clone())
    }

    pub fn contains_key(&self, key: &Value) -> bool {
        self.0
            .read()
            .expect("lock poisoned")
            .iter()
            .any(|(k, _)| k.same_value_zero(key))
    }

    /// Insert an entry. An existing key keeps its position and gets the new
    /// value, which is returned in place of the old one.
    pub fn insert(&self, key: Value, value: Value) -> Option<Value> {
        let mut entries = self.0.write().expect("lock poisoned");
        match entries.iter_mut().find(|(k, _)| k.same_value_zero(&key)) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                entries.push((key, value));
                None
            }
        }
    }

    /// Clone out the current entries in insertion order.
    pub fn snapshot(&self) -> Vec<(Value, Value)> {
        self.0.read().expect("lock poisoned").clone()
    }
}

// ---------------------------------------------------------------------------
// SetRef
// ---------------------------------------------------------------------------

/// Collection of unique values in insertion order.
///
/// Uniqueness follows [`Value::same_value_zero`].
#[derive(Clone, Default)]
pub struct SetRef(Arc<RwLock<Vec<Value>>>);

impl SetRef {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn identity(&self) -> Identity {
        Identity::of(&self.0)
    }

    /// Returns `true` if both handles alias the same set.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub fn len(&self) -> usize {
        self.0.read().expect("lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, value: &Value) -> bool {
        self.0
            .read()
            .expect("lock poisoned")
            .iter()
            .any(|v| v.same_value_zero(value))
    }

    /// Add a value. Returns `false` if an equal member was already present.
    pub fn insert(&self, value: Value) -> bool {
        let mut members = self.0.write().expect("lock poisoned");
        if members.iter().any(|v| v.same_value_zero(&value)) {
            return false;
        }
        members.push(value);
        true
    }

    /// Clone out the current members in insertion order.
    pub fn snapshot(&self) -> Vec<Value> {
        self.0.read().expect("lock poisoned").clone()
    }
}

// ---------------------------------------------------------------------------
// RegexRef
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct RegexLiteral {
    source: String,
    flags: String,
}

/// A regular expression literal. Immutable; carries identity like any other
/// object but is compared as a leaf.
#[derive(Clone)]
pub struct RegexRef(Arc<RegexLiteral>);

impl RegexRef {
    pub fn new(source: impl Into<String>, flags: impl Into<String>) -> Self {
        Self(Arc::new(RegexLiteral {
            source: source.into(),
            flags: flags.into(),
        }))
    }

    pub fn identity(&self) -> Identity {
        Identity::of(&self.0)
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub fn source(&self) -> &str {
        &self.0.source
    }

    pub fn flags(&self) -> &str {
        &self.0.flags
    }

    /// The literal form, `/source/flags`.
    pub fn pattern(&self) -> String {
        format!("/{}/{}", self.0.source, self.0.flags)
    }
}
