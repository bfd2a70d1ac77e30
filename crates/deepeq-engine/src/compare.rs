//! Synchronous deep comparison.

use deepeq_types::{ArrayRef, MapRef, ObjectRef, SetRef, Value};
use tracing::{debug, trace};

use crate::leaf::{LeafComparator, StrictEquals};
use crate::shape::{ContainerPair, Shape};
use crate::visited::Visited;

/// Recursively compare `actual` with `expected`.
///
/// - Arrays: equal length, every index pairwise equal.
/// - Maps: equal size, every key of `actual` present in `expected` (native
///   key equality) with a deeply equal value. Insertion order is ignored.
/// - Sets: equal size, every member of `actual` has some deeply equal member
///   in `expected`. This is not a one-to-one matching.
/// - Plain objects: identical key sets, every value deeply equal.
/// - Containers of different kinds, or a container against a leaf: unequal,
///   without consulting `leaf`.
/// - Two leaves: `leaf.compare(actual, expected)`.
///
/// A pair of containers already being compared higher up the recursion is
/// treated as equal, so cyclic graphs terminate. Errors from `leaf` are
/// returned unchanged.
pub fn compare_deep<C>(actual: &Value, expected: &Value, leaf: &C) -> Result<bool, C::Error>
where
    C: LeafComparator + ?Sized,
{
    compare_value(actual, expected, leaf, &Visited::root())
}

/// [`compare_deep`] with [`StrictEquals`] on leaves.
pub fn deep_equals(actual: &Value, expected: &Value) -> bool {
    match compare_deep(actual, expected, &StrictEquals) {
        Ok(equal) => equal,
        Err(never) => match never {},
    }
}

fn compare_value<C>(
    actual: &Value,
    expected: &Value,
    leaf: &C,
    path: &Visited<'_>,
) -> Result<bool, C::Error>
where
    C: LeafComparator + ?Sized,
{
    let pair = match Shape::of(actual, expected) {
        Shape::Containers(pair) => pair,
        Shape::Mismatch { actual, expected } => {
            debug!(%actual, %expected, "container kind mismatch");
            return Ok(false);
        }
        Shape::Leaves => {
            trace!("delegating to leaf comparator");
            return leaf.compare(actual, expected);
        }
    };

    let (a, b) = pair.identities();
    if path.contains(a, b) {
        debug!(kind = %pair.kind(), depth = path.depth(), "cycle detected, treating pair as equal");
        return Ok(true);
    }
    let inner = path.enter(a, b);

    match pair {
        ContainerPair::Arrays(a, b) => compare_arrays(a, b, leaf, &inner),
        ContainerPair::Objects(a, b) => compare_objects(a, b, leaf, &inner),
        ContainerPair::Maps(a, b) => compare_maps(a, b, leaf, &inner),
        ContainerPair::Sets(a, b) => compare_sets(a, b, leaf, &inner),
    }
}

fn compare_arrays<C>(
    actual: &ArrayRef,
    expected: &ArrayRef,
    leaf: &C,
    path: &Visited<'_>,
) -> Result<bool, C::Error>
where
    C: LeafComparator + ?Sized,
{
    let (left, right) = (actual.snapshot(), expected.snapshot());
    if left.len() != right.len() {
        debug!(actual = left.len(), expected = right.len(), "array length mismatch");
        return Ok(false);
    }
    for (x, y) in left.iter().zip(&right) {
        if !compare_value(x, y, leaf, path)? {
            return Ok(false);
        }
    }
    Ok(true)
}

fn compare_objects<C>(
    actual: &ObjectRef,
    expected: &ObjectRef,
    leaf: &C,
    path: &Visited<'_>,
) -> Result<bool, C::Error>
where
    C: LeafComparator + ?Sized,
{
    // Both snapshots are in key order, so equal key sets line up pairwise.
    let (left, right) = (actual.snapshot(), expected.snapshot());
    let same_keys = left.len() == right.len()
        && left.iter().zip(&right).all(|((k1, _), (k2, _))| k1 == k2);
    if !same_keys {
        debug!("object key sets differ");
        return Ok(false);
    }
    for ((_, x), (_, y)) in left.iter().zip(&right) {
        if !compare_value(x, y, leaf, path)? {
            return Ok(false);
        }
    }
    Ok(true)
}

fn compare_maps<C>(
    actual: &MapRef,
    expected: &MapRef,
    leaf: &C,
    path: &Visited<'_>,
) -> Result<bool, C::Error>
where
    C: LeafComparator + ?Sized,
{
    if actual.len() != expected.len() {
        debug!(actual = actual.len(), expected = expected.len(), "map size mismatch");
        return Ok(false);
    }
    for (key, x) in actual.snapshot() {
        let Some(y) = expected.get(&key) else {
            debug!(%key, "map key missing");
            return Ok(false);
        };
        if !compare_value(&x, &y, leaf, path)? {
            return Ok(false);
        }
    }
    Ok(true)
}

fn compare_sets<C>(
    actual: &SetRef,
    expected: &SetRef,
    leaf: &C,
    path: &Visited<'_>,
) -> Result<bool, C::Error>
where
    C: LeafComparator + ?Sized,
{
    if actual.len() != expected.len() {
        debug!(actual = actual.len(), expected = expected.len(), "set size mismatch");
        return Ok(false);
    }
    let candidates = expected.snapshot();
    for member in actual.snapshot() {
        let mut found = false;
        for candidate in &candidates {
            if compare_value(&member, candidate, leaf, path)? {
                found = true;
                break;
            }
        }
        if !found {
            debug!(%member, "set member has no equal counterpart");
            return Ok(false);
        }
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leaf::SameValueZero;
    use deepeq_types::{ArrayRef, ObjectRef};
    use proptest::prelude::*;
    use serde_json::json;
    use std::cell::Cell;

    fn s(text: &str) -> Value {
        Value::from(text)
    }

    /// `{hi: 'bye', nested: <self>}`
    fn self_nested(hi: &str) -> ObjectRef {
        let o = ObjectRef::new();
        o.insert("hi", s(hi));
        o.insert("nested", Value::Object(o.clone()));
        o
    }

    // -----------------------------------------------------------------------
    // Leaves and kinds
    // -----------------------------------------------------------------------

    #[test]
    fn leaves_use_the_comparator() {
        assert!(deep_equals(&s("a"), &s("a")));
        assert!(!deep_equals(&Value::from(1), &s("1")));
        assert_eq!(
            compare_deep(&Value::Number(f64::NAN), &Value::Number(f64::NAN), &SameValueZero),
            Ok(true)
        );
    }

    #[test]
    fn container_kind_mismatch_is_unequal() {
        let obj = Value::object(Vec::<(String, Value)>::new());
        assert!(!deep_equals(&obj, &Value::array(vec![])));
        assert!(!deep_equals(&Value::map(vec![]), &Value::set(vec![])));
        assert!(!deep_equals(&Value::array(vec![]), &Value::Null));
    }

    #[test]
    fn kind_mismatch_never_calls_the_leaf() {
        let calls = Cell::new(0);
        let always_true = |_: &Value, _: &Value| -> Result<bool, ()> {
            calls.set(calls.get() + 1);
            Ok(true)
        };
        let empty = Value::array(vec![]);
        assert_eq!(compare_deep(&empty, &s("x"), &always_true), Ok(false));
        assert_eq!(compare_deep(&s("x"), &empty, &always_true), Ok(false));
        let obj = Value::object(Vec::<(String, Value)>::new());
        assert_eq!(compare_deep(&obj, &empty, &always_true), Ok(false));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn regexes_are_leaves() {
        let r = Value::regex("a", "g");
        assert!(deep_equals(&r, &r.clone()));
        assert!(!deep_equals(&r, &Value::regex("a", "g")));
        let by_pattern = |a: &Value, b: &Value| -> Result<bool, ()> {
            Ok(a.to_string() == b.to_string())
        };
        assert_eq!(compare_deep(&r, &Value::regex("a", "g"), &by_pattern), Ok(true));
    }

    // -----------------------------------------------------------------------
    // Arrays and objects
    // -----------------------------------------------------------------------

    #[test]
    fn arrays_compare_pairwise() {
        let a = Value::array(vec![s("a"), s("a")]);
        assert!(deep_equals(&a, &Value::array(vec![s("a"), s("a")])));
        assert!(!deep_equals(&a, &Value::array(vec![s("a"), s("b")])));
    }

    #[test]
    fn array_length_mismatch() {
        let a = Value::array(vec![s("a"), s("a")]);
        let b = Value::array(vec![s("a"), s("a"), s("c")]);
        assert!(!deep_equals(&a, &b));
    }

    #[test]
    fn objects_need_identical_key_sets() {
        let a = Value::from(json!({"a": 1, "b": 2}));
        assert!(deep_equals(&a, &Value::from(json!({"b": 2, "a": 1}))));
        assert!(!deep_equals(&a, &Value::from(json!({"a": 1, "c": 2}))));
        assert!(!deep_equals(&a, &Value::from(json!({"a": 1}))));
    }

    #[test]
    fn nested_difference_is_found() {
        let a = Value::from(json!({"a": [1, {"b": "x"}]}));
        let b = Value::from(json!({"a": [1, {"b": "y"}]}));
        assert!(!deep_equals(&a, &b));
        assert!(deep_equals(&a, &a.deep_clone()));
    }

    // -----------------------------------------------------------------------
    // Maps and sets
    // -----------------------------------------------------------------------

    #[test]
    fn map_insertion_order_is_irrelevant() {
        let a = Value::map(vec![(s("a"), s("b")), (s("c"), s("d"))]);
        let b = Value::map(vec![(s("c"), s("d")), (s("a"), s("b"))]);
        assert!(deep_equals(&a, &b));
    }

    #[test]
    fn map_values_compare_deeply_and_keys_natively() {
        let a = Value::map(vec![(s("k"), Value::array(vec![s("v")]))]);
        let b = Value::map(vec![(s("k"), Value::array(vec![s("v")]))]);
        assert!(deep_equals(&a, &b));

        // Container keys match by identity only.
        let ka = Value::map(vec![(Value::array(vec![]), s("v"))]);
        let kb = Value::map(vec![(Value::array(vec![]), s("v"))]);
        assert!(!deep_equals(&ka, &kb));
    }

    #[test]
    fn map_size_and_missing_key() {
        let a = Value::map(vec![(s("a"), s("b"))]);
        assert!(!deep_equals(&a, &Value::map(vec![])));
        assert!(!deep_equals(&a, &Value::map(vec![(s("x"), s("b"))])));
    }

    #[test]
    fn set_equality() {
        let a = Value::set(vec![s("a"), s("b"), s("c")]);
        assert!(deep_equals(&a, &Value::set(vec![s("c"), s("b"), s("a")])));
        assert!(!deep_equals(&a, &Value::set(vec![s("a"), s("b"), s("d")])));
        assert!(!deep_equals(&a, &Value::set(vec![s("a"), s("b")])));
    }

    #[test]
    fn set_members_compare_deeply() {
        let a = Value::set(vec![Value::from(json!({"id": 1})), Value::from(json!({"id": 2}))]);
        let b = Value::set(vec![Value::from(json!({"id": 2})), Value::from(json!({"id": 1}))]);
        assert!(deep_equals(&a, &b));
    }

    #[test]
    fn set_check_is_not_a_one_to_one_matching() {
        // Every member of `a` finds an equal in `b`, though `b`'s second
        // member is never matched.
        let a = Value::set(vec![Value::from(json!([1])), Value::from(json!([1]))]);
        let b = Value::set(vec![Value::from(json!([1])), Value::from(json!([2]))]);
        assert!(deep_equals(&a, &b));
    }

    // -----------------------------------------------------------------------
    // Cycles
    // -----------------------------------------------------------------------

    #[test]
    fn self_referential_value_equals_itself() {
        let o = ObjectRef::new();
        o.insert("self", Value::Object(o.clone()));
        let v = Value::Object(o);
        assert!(deep_equals(&v, &v));
    }

    #[test]
    fn identically_built_cycles_are_equal() {
        let a = Value::Object(self_nested("bye"));
        let b = Value::Object(self_nested("bye"));
        assert!(deep_equals(&a, &b));
    }

    #[test]
    fn cycles_with_different_leaves_are_unequal() {
        let a = Value::Object(self_nested("bye"));
        let b = Value::Object(self_nested("hello"));
        assert!(!deep_equals(&a, &b));
    }

    #[test]
    fn difference_behind_a_cycle_is_found() {
        // b.nested is a distinct object whose `hi` differs.
        let a = Value::Object(self_nested("bye"));
        let inner = ObjectRef::new();
        let b = ObjectRef::new();
        b.insert("hi", s("bye"));
        b.insert("nested", Value::Object(inner.clone()));
        inner.insert("hi", s("changed"));
        inner.insert("nested", Value::Object(b.clone()));
        assert!(!deep_equals(&a, &Value::Object(b)));
    }

    #[test]
    fn array_containing_itself() {
        let arr = ArrayRef::new();
        arr.push(Value::Array(arr.clone()));
        let v = Value::Array(arr);
        assert!(deep_equals(&v, &v));
        assert!(deep_equals(&v, &v.deep_clone()));
    }

    #[test]
    fn cycle_through_map_and_set() {
        let m = deepeq_types::MapRef::new();
        let set = deepeq_types::SetRef::new();
        set.insert(Value::Map(m.clone()));
        m.insert(s("members"), Value::Set(set));
        let v = Value::Map(m);
        assert!(deep_equals(&v, &v.deep_clone()));
    }

    // -----------------------------------------------------------------------
    // Errors
    // -----------------------------------------------------------------------

    #[test]
    fn leaf_errors_propagate_unchanged() {
        #[derive(Debug, PartialEq)]
        struct Refused(String);

        let refusing = |a: &Value, _: &Value| -> Result<bool, Refused> {
            Err(Refused(a.to_string()))
        };
        let a = Value::from(json!({"k": "v"}));
        let b = Value::from(json!({"k": "v"}));
        assert_eq!(compare_deep(&a, &b, &refusing), Err(Refused("'v'".into())));
    }

    #[test]
    fn structural_mismatch_short_circuits_before_leaf_errors() {
        let refusing = |_: &Value, _: &Value| -> Result<bool, ()> { Err(()) };
        let a = Value::from(json!(["x"]));
        let b = Value::from(json!(["x", "y"]));
        assert_eq!(compare_deep(&a, &b, &refusing), Ok(false));
    }

    #[test]
    fn trait_objects_are_accepted() {
        let leaf: &dyn LeafComparator<Error = std::convert::Infallible> = &StrictEquals;
        assert_eq!(compare_deep(&s("a"), &s("a"), leaf), Ok(true));
    }

    // -----------------------------------------------------------------------
    // Properties
    // -----------------------------------------------------------------------

    fn arb_value() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            Just(Value::Undefined),
            any::<bool>().prop_map(Value::Bool),
            (-1000i32..1000).prop_map(Value::from),
            "[a-z]{0,6}".prop_map(Value::String),
        ];
        leaf.prop_recursive(4, 48, 5, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..5).prop_map(Value::array),
                prop::collection::btree_map("[a-z]{1,3}", inner.clone(), 0..5)
                    .prop_map(|entries| Value::object(entries)),
                prop::collection::vec(inner.clone(), 0..4).prop_map(|members| Value::set(members)),
                prop::collection::vec(("[a-z]{1,3}", inner), 0..4).prop_map(|entries| {
                    Value::map(entries.into_iter().map(|(k, v)| (Value::String(k), v)))
                }),
            ]
        })
    }

    proptest! {
        #[test]
        fn reflexive(v in arb_value()) {
            prop_assert!(deep_equals(&v, &v));
        }

        #[test]
        fn equal_to_its_deep_clone(v in arb_value()) {
            prop_assert!(deep_equals(&v, &v.deep_clone()));
        }
    }
}
