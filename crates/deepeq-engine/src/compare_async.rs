//! Asynchronous deep comparison.
//!
//! Same rules as [`compare_deep`](crate::compare_deep). Structural
//! mismatches (kind, length, size, key sets, a missing map key) are decided
//! before any leaf is awaited. Otherwise every branch of a container is
//! joined and the container is equal only if all of them are; the first
//! leaf error fails the whole comparison.

use deepeq_types::{ArrayRef, MapRef, ObjectRef, SetRef, Value};
use futures::future::{try_join_all, BoxFuture, FutureExt};
use tracing::{debug, trace};

use crate::leaf::AsyncLeafComparator;
use crate::shape::{ContainerPair, Shape};
use crate::visited::Visited;

type Branch<'a, E> = BoxFuture<'a, Result<bool, E>>;

/// Recursively compare `actual` with `expected` using an async leaf comparator.
pub async fn compare_deep_async<C>(
    actual: &Value,
    expected: &Value,
    leaf: &C,
) -> Result<bool, C::Error>
where
    C: AsyncLeafComparator + ?Sized,
{
    let root = Visited::root();
    compare_value(actual, expected, leaf, &root).await
}

fn compare_value<'a, C>(
    actual: &'a Value,
    expected: &'a Value,
    leaf: &'a C,
    path: &'a Visited<'a>,
) -> Branch<'a, C::Error>
where
    C: AsyncLeafComparator + ?Sized,
{
    async move {
        let pair = match Shape::of(actual, expected) {
            Shape::Containers(pair) => pair,
            Shape::Mismatch { actual, expected } => {
                debug!(%actual, %expected, "container kind mismatch");
                return Ok(false);
            }
            Shape::Leaves => {
                trace!("awaiting leaf comparator");
                return leaf.compare(actual, expected).await;
            }
        };

        let (a, b) = pair.identities();
        if path.contains(a, b) {
            debug!(kind = %pair.kind(), depth = path.depth(), "cycle detected, treating pair as equal");
            return Ok(true);
        }
        let inner = path.enter(a, b);

        match pair {
            ContainerPair::Arrays(a, b) => compare_arrays(a, b, leaf, &inner).await,
            ContainerPair::Objects(a, b) => compare_objects(a, b, leaf, &inner).await,
            ContainerPair::Maps(a, b) => compare_maps(a, b, leaf, &inner).await,
            ContainerPair::Sets(a, b) => compare_sets(a, b, leaf, &inner).await,
        }
    }
    .boxed()
}

/// Join all branches; equal only if every branch is.
async fn all_equal<E>(branches: Vec<Branch<'_, E>>) -> Result<bool, E> {
    let results = try_join_all(branches).await?;
    Ok(results.into_iter().all(|equal| equal))
}

async fn compare_arrays<C>(
    actual: &ArrayRef,
    expected: &ArrayRef,
    leaf: &C,
    path: &Visited<'_>,
) -> Result<bool, C::Error>
where
    C: AsyncLeafComparator + ?Sized,
{
    let (left, right) = (actual.snapshot(), expected.snapshot());
    if left.len() != right.len() {
        debug!(actual = left.len(), expected = right.len(), "array length mismatch");
        return Ok(false);
    }
    let branches: Vec<_> = left
        .iter()
        .zip(&right)
        .map(|(x, y)| compare_value(x, y, leaf, path))
        .collect();
    all_equal(branches).await
}

async fn compare_objects<C>(
    actual: &ObjectRef,
    expected: &ObjectRef,
    leaf: &C,
    path: &Visited<'_>,
) -> Result<bool, C::Error>
where
    C: AsyncLeafComparator + ?Sized,
{
    let (left, right) = (actual.snapshot(), expected.snapshot());
    let same_keys = left.len() == right.len()
        && left.iter().zip(&right).all(|((k1, _), (k2, _))| k1 == k2);
    if !same_keys {
        debug!("object key sets differ");
        return Ok(false);
    }
    let branches: Vec<_> = left
        .iter()
        .zip(&right)
        .map(|((_, x), (_, y))| compare_value(x, y, leaf, path))
        .collect();
    all_equal(branches).await
}

async fn compare_maps<C>(
    actual: &MapRef,
    expected: &MapRef,
    leaf: &C,
    path: &Visited<'_>,
) -> Result<bool, C::Error>
where
    C: AsyncLeafComparator + ?Sized,
{
    if actual.len() != expected.len() {
        debug!(actual = actual.len(), expected = expected.len(), "map size mismatch");
        return Ok(false);
    }
    let mut pairs = Vec::with_capacity(actual.len());
    for (key, x) in actual.snapshot() {
        let Some(y) = expected.get(&key) else {
            debug!(%key, "map key missing");
            return Ok(false);
        };
        pairs.push((x, y));
    }
    let branches: Vec<_> = pairs
        .iter()
        .map(|(x, y)| compare_value(x, y, leaf, path))
        .collect();
    all_equal(branches).await
}

async fn compare_sets<C>(
    actual: &SetRef,
    expected: &SetRef,
    leaf: &C,
    path: &Visited<'_>,
) -> Result<bool, C::Error>
where
    C: AsyncLeafComparator + ?Sized,
{
    if actual.len() != expected.len() {
        debug!(actual = actual.len(), expected = expected.len(), "set size mismatch");
        return Ok(false);
    }
    let (members, candidates) = (actual.snapshot(), expected.snapshot());
    for member in &members {
        let branches: Vec<_> = candidates
            .iter()
            .map(|candidate| compare_value(member, candidate, leaf, path))
            .collect();
        let results = try_join_all(branches).await?;
        if !results.into_iter().any(|equal| equal) {
            debug!(%member, "set member has no equal counterpart");
            return Ok(false);
        }
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leaf::{Blocking, StrictEquals};
    use async_trait::async_trait;
    use deepeq_types::{ArrayRef, ObjectRef};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// `async (a, b) => a === b`, yielding to the runtime first.
    struct AsyncStrict;

    #[async_trait]
    impl AsyncLeafComparator for AsyncStrict {
        type Error = String;

        async fn compare(&self, actual: &Value, expected: &Value) -> Result<bool, String> {
            tokio::task::yield_now().await;
            Ok(actual.strict_equals(expected))
        }
    }

    /// Fails on one poisoned string, strict equality otherwise.
    struct FailsOn(&'static str);

    #[async_trait]
    impl AsyncLeafComparator for FailsOn {
        type Error = String;

        async fn compare(&self, actual: &Value, expected: &Value) -> Result<bool, String> {
            if actual.as_str() == Some(self.0) {
                return Err(format!("cannot compare {actual}"));
            }
            Ok(actual.strict_equals(expected))
        }
    }

    /// Counts leaf calls and sleeps a little on each.
    struct Slow(AtomicUsize);

    #[async_trait]
    impl AsyncLeafComparator for Slow {
        type Error = ();

        async fn compare(&self, actual: &Value, expected: &Value) -> Result<bool, ()> {
            self.0.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(1)).await;
            Ok(actual.strict_equals(expected))
        }
    }

    #[tokio::test]
    async fn async_leaf_resolves_true() {
        let a = Value::from(json!({"a": "a"}));
        let b = Value::from(json!({"a": "a"}));
        assert_eq!(compare_deep_async(&a, &b, &AsyncStrict).await, Ok(true));
    }

    #[tokio::test]
    async fn async_leaf_resolves_false() {
        let a = Value::from(json!({"a": ["x", "y"]}));
        let b = Value::from(json!({"a": ["x", "z"]}));
        assert_eq!(compare_deep_async(&a, &b, &AsyncStrict).await, Ok(false));
    }

    #[tokio::test]
    async fn async_leaf_error_rejects_the_whole_call() {
        let a = Value::from(json!({"ok": "fine", "bad": "boom"}));
        let b = Value::from(json!({"ok": "fine", "bad": "boom"}));
        let result = compare_deep_async(&a, &b, &FailsOn("boom")).await;
        assert_eq!(result, Err("cannot compare 'boom'".to_string()));
    }

    #[tokio::test]
    async fn error_is_not_masked_by_a_sibling_false() {
        // One branch is unequal, another fails: the failure still surfaces.
        let a = Value::from(json!(["different", "boom"]));
        let b = Value::from(json!(["other", "boom"]));
        assert!(compare_deep_async(&a, &b, &FailsOn("boom")).await.is_err());
    }

    #[tokio::test]
    async fn structural_mismatch_skips_the_leaf() {
        let leaf = Slow(AtomicUsize::new(0));
        let a = Value::from(json!(["a", "b"]));
        let b = Value::from(json!(["a", "b", "c"]));
        assert_eq!(compare_deep_async(&a, &b, &leaf).await, Ok(false));

        let a = Value::from(json!({"a": 1}));
        let b = Value::from(json!({"b": 1}));
        assert_eq!(compare_deep_async(&a, &b, &leaf).await, Ok(false));
        assert_eq!(leaf.0.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn every_branch_is_awaited() {
        let leaf = Slow(AtomicUsize::new(0));
        let a = Value::from(json!({"a": 1, "b": [2, 3], "c": {"d": 4}}));
        assert_eq!(compare_deep_async(&a, &a.deep_clone(), &leaf).await, Ok(true));
        assert_eq!(leaf.0.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn maps_and_sets() {
        let s = |t: &str| Value::from(t);
        let a = Value::map(vec![(s("a"), s("b")), (s("c"), s("d"))]);
        let b = Value::map(vec![(s("c"), s("d")), (s("a"), s("b"))]);
        assert_eq!(compare_deep_async(&a, &b, &AsyncStrict).await, Ok(true));

        let a = Value::set(vec![s("a"), s("b"), s("c")]);
        let b = Value::set(vec![s("a"), s("b"), s("d")]);
        assert_eq!(compare_deep_async(&a, &b, &AsyncStrict).await, Ok(false));

        let missing = Value::map(vec![(s("a"), s("b")), (s("x"), s("d"))]);
        let b = Value::map(vec![(s("c"), s("d")), (s("a"), s("b"))]);
        assert_eq!(compare_deep_async(&missing, &b, &AsyncStrict).await, Ok(false));
    }

    #[tokio::test]
    async fn kind_mismatch() {
        let obj = Value::object(Vec::<(String, Value)>::new());
        assert_eq!(compare_deep_async(&obj, &Value::array(vec![]), &AsyncStrict).await, Ok(false));
        assert_eq!(
            compare_deep_async(&Value::map(vec![]), &Value::set(vec![]), &AsyncStrict).await,
            Ok(false)
        );
    }

    #[tokio::test]
    async fn cycles_terminate() {
        let build = |hi: &str| {
            let o = ObjectRef::new();
            o.insert("hi", Value::from(hi));
            o.insert("nested", Value::Object(o.clone()));
            Value::Object(o)
        };
        let a = build("bye");
        assert_eq!(compare_deep_async(&a, &a, &AsyncStrict).await, Ok(true));
        assert_eq!(compare_deep_async(&a, &build("bye"), &AsyncStrict).await, Ok(true));
        assert_eq!(compare_deep_async(&a, &build("hello"), &AsyncStrict).await, Ok(false));

        let arr = ArrayRef::new();
        arr.push(Value::Array(arr.clone()));
        let arr = Value::Array(arr);
        assert_eq!(compare_deep_async(&arr, &arr, &AsyncStrict).await, Ok(true));
    }

    #[tokio::test]
    async fn blocking_comparator_matches_sync_engine() {
        let a = Value::from(json!({"x": [1, {"y": null}], "z": "w"}));
        let b = a.deep_clone();
        let sync = crate::compare_deep(&a, &b, &StrictEquals);
        let concurrent = compare_deep_async(&a, &b, &Blocking(StrictEquals)).await;
        assert_eq!(sync, concurrent);
    }

    #[tokio::test]
    async fn future_is_send() {
        let a = Value::from(json!({"k": ["v"]}));
        let b = a.deep_clone();
        let handle = tokio::spawn(async move { compare_deep_async(&a, &b, &AsyncStrict).await });
        assert_eq!(handle.await.unwrap(), Ok(true));
    }
}
