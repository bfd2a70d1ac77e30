//! Sparse structural diff.
//!
//! `diff_values(a, b)` walks both values with the engine's container-kind
//! dispatch and keeps only what disagrees:
//!
//! - objects: the union of keys is visited in key order. A key on one side
//!   only lands in that side's partial; a key on both sides whose values
//!   differ lands in both, holding the nested diff.
//! - arrays: the union of indices is visited in ascending order with the
//!   same rules. Agreeing indices are dropped, so partials are compacted.
//! - maps and sets: compared whole with the deep-equality engine.
//! - anything else: leaf equality (`===` unless overridden). Regexes are
//!   equal when their `/source/flags` literals are.
//!
//! A container diffed against itself has no diff, whatever its leaves hold.
//! A pair of containers already being diffed higher up is treated as equal,
//! so cyclic inputs terminate.

use std::collections::BTreeSet;
use std::convert::Infallible;

use deepeq_engine::{compare_deep, ContainerPair, LeafComparator, Shape, StrictEquals, Visited};
use deepeq_types::{ArrayRef, ObjectRef, Value};
use tracing::{debug, trace};

use crate::error::DiffResult;

/// The disagreeing parts of two values.
#[derive(Clone, Debug)]
pub struct SparseDiff {
    /// Partial of the left-hand value.
    pub left: Value,
    /// Partial of the right-hand value.
    pub right: Value,
}

impl SparseDiff {
    pub fn new(left: Value, right: Value) -> Self {
        Self { left, right }
    }

    pub fn into_pair(self) -> (Value, Value) {
        (self.left, self.right)
    }

    /// `[left, right]` as JSON.
    pub fn to_json(&self) -> DiffResult<serde_json::Value> {
        Ok(serde_json::Value::Array(vec![
            self.left.to_json()?,
            self.right.to_json()?,
        ]))
    }
}

/// Leaf equality with the regex special case layered over a caller's
/// comparator: two regexes are equal when their literals are, since two
/// separately built regexes are never identical.
struct RegexAware<'c, C: ?Sized>(&'c C);

impl<C> LeafComparator for RegexAware<'_, C>
where
    C: LeafComparator + ?Sized,
{
    type Error = C::Error;

    fn compare(&self, actual: &Value, expected: &Value) -> Result<bool, C::Error> {
        match (actual, expected) {
            (Value::Regex(a), Value::Regex(b)) => Ok(a.pattern() == b.pattern()),
            _ => self.0.compare(actual, expected),
        }
    }
}

fn infallible<T>(result: Result<T, Infallible>) -> T {
    match result {
        Ok(value) => value,
        Err(never) => match never {},
    }
}

/// Diff two arbitrary values with `===` on leaves.
pub fn diff_values(left: &Value, right: &Value) -> Option<SparseDiff> {
    infallible(diff_values_with(left, right, &StrictEquals))
}

/// Diff two arbitrary values with a caller-supplied leaf equality.
pub fn diff_values_with<C>(
    left: &Value,
    right: &Value,
    leaf: &C,
) -> Result<Option<SparseDiff>, C::Error>
where
    C: LeafComparator + ?Sized,
{
    diff_value(left, right, &RegexAware(leaf), &Visited::root())
}

/// Diff two plain objects with `===` on leaves.
pub fn diff_objects(left: &ObjectRef, right: &ObjectRef) -> Option<SparseDiff> {
    infallible(diff_objects_with(left, right, &StrictEquals))
}

pub fn diff_objects_with<C>(
    left: &ObjectRef,
    right: &ObjectRef,
    leaf: &C,
) -> Result<Option<SparseDiff>, C::Error>
where
    C: LeafComparator + ?Sized,
{
    diff_containers(
        ContainerPair::Objects(left, right),
        &RegexAware(leaf),
        &Visited::root(),
    )
}

/// Diff two arrays with `===` on leaves.
pub fn diff_arrays(left: &ArrayRef, right: &ArrayRef) -> Option<SparseDiff> {
    infallible(diff_arrays_with(left, right, &StrictEquals))
}

pub fn diff_arrays_with<C>(
    left: &ArrayRef,
    right: &ArrayRef,
    leaf: &C,
) -> Result<Option<SparseDiff>, C::Error>
where
    C: LeafComparator + ?Sized,
{
    diff_containers(
        ContainerPair::Arrays(left, right),
        &RegexAware(leaf),
        &Visited::root(),
    )
}

fn diff_value<C>(
    left: &Value,
    right: &Value,
    leaf: &C,
    path: &Visited<'_>,
) -> Result<Option<SparseDiff>, C::Error>
where
    C: LeafComparator + ?Sized,
{
    match Shape::of(left, right) {
        Shape::Containers(pair) => diff_containers(pair, leaf, path),
        Shape::Mismatch { actual, expected } => {
            trace!(left = %actual, right = %expected, "container kind mismatch");
            Ok(Some(SparseDiff::new(left.clone(), right.clone())))
        }
        Shape::Leaves => {
            if leaf.compare(left, right)? {
                Ok(None)
            } else {
                Ok(Some(SparseDiff::new(left.clone(), right.clone())))
            }
        }
    }
}

fn diff_containers<C>(
    pair: ContainerPair<'_>,
    leaf: &C,
    path: &Visited<'_>,
) -> Result<Option<SparseDiff>, C::Error>
where
    C: LeafComparator + ?Sized,
{
    let (a, b) = pair.identities();
    if a == b {
        trace!(kind = %pair.kind(), "same container on both sides");
        return Ok(None);
    }
    if path.contains(a, b) {
        debug!(kind = %pair.kind(), "cycle detected, treating pair as equal");
        return Ok(None);
    }
    let inner = path.enter(a, b);

    match pair {
        ContainerPair::Arrays(a, b) => diff_array_entries(a, b, leaf, &inner),
        ContainerPair::Objects(a, b) => diff_object_entries(a, b, leaf, &inner),
        ContainerPair::Maps(a, b) => {
            let (left, right) = (Value::Map(a.clone()), Value::Map(b.clone()));
            diff_whole(left, right, leaf)
        }
        ContainerPair::Sets(a, b) => {
            let (left, right) = (Value::Set(a.clone()), Value::Set(b.clone()));
            diff_whole(left, right, leaf)
        }
    }
}

fn diff_whole<C>(left: Value, right: Value, leaf: &C) -> Result<Option<SparseDiff>, C::Error>
where
    C: LeafComparator + ?Sized,
{
    if compare_deep(&left, &right, leaf)? {
        Ok(None)
    } else {
        Ok(Some(SparseDiff::new(left, right)))
    }
}

fn diff_object_entries<C>(
    left: &ObjectRef,
    right: &ObjectRef,
    leaf: &C,
    path: &Visited<'_>,
) -> Result<Option<SparseDiff>, C::Error>
where
    C: LeafComparator + ?Sized,
{
    let (left, right) = (left.entries(), right.entries());
    let keys: BTreeSet<&String> = left.keys().chain(right.keys()).collect();
    let (left_partial, right_partial) = (ObjectRef::new(), ObjectRef::new());

    for key in keys {
        match (left.get(key), right.get(key)) {
            (Some(x), Some(y)) => {
                if let Some(diff) = diff_value(x, y, leaf, path)? {
                    left_partial.insert(key, diff.left);
                    right_partial.insert(key, diff.right);
                }
            }
            (Some(x), None) => {
                left_partial.insert(key, x.clone());
            }
            (None, Some(y)) => {
                right_partial.insert(key, y.clone());
            }
            (None, None) => {}
        }
    }

    if left_partial.is_empty() && right_partial.is_empty() {
        return Ok(None);
    }
    Ok(Some(SparseDiff::new(
        Value::Object(left_partial),
        Value::Object(right_partial),
    )))
}

fn diff_array_entries<C>(
    left: &ArrayRef,
    right: &ArrayRef,
    leaf: &C,
    path: &Visited<'_>,
) -> Result<Option<SparseDiff>, C::Error>
where
    C: LeafComparator + ?Sized,
{
    let (left, right) = (left.snapshot(), right.snapshot());
    let (left_partial, right_partial) = (ArrayRef::new(), ArrayRef::new());

    for index in 0..left.len().max(right.len()) {
        match (left.get(index), right.get(index)) {
            (Some(x), Some(y)) => {
                if let Some(diff) = diff_value(x, y, leaf, path)? {
                    left_partial.push(diff.left);
                    right_partial.push(diff.right);
                }
            }
            (Some(x), None) => left_partial.push(x.clone()),
            (None, Some(y)) => right_partial.push(y.clone()),
            (None, None) => {}
        }
    }

    if left_partial.is_empty() && right_partial.is_empty() {
        return Ok(None);
    }
    Ok(Some(SparseDiff::new(
        Value::Array(left_partial),
        Value::Array(right_partial),
    )))
}
