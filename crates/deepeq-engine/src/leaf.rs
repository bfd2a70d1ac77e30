//! Leaf comparators.
//!
//! A leaf comparator decides equality for values the engine does not
//! traverse (primitives, regexes) and is consulted for nothing else. Its
//! error type is the engine's error type: whatever it returns is handed back
//! to the caller unchanged.

use std::convert::Infallible;

use async_trait::async_trait;
use deepeq_types::Value;

/// A synchronous leaf comparator.
///
/// Any `Fn(&Value, &Value) -> Result<bool, E>` is a comparator.
pub trait LeafComparator {
    type Error;

    fn compare(&self, actual: &Value, expected: &Value) -> Result<bool, Self::Error>;
}

impl<F, E> LeafComparator for F
where
    F: Fn(&Value, &Value) -> Result<bool, E>,
{
    type Error = E;

    fn compare(&self, actual: &Value, expected: &Value) -> Result<bool, E> {
        self(actual, expected)
    }
}

/// `===` on leaves.
#[derive(Clone, Copy, Debug, Default)]
pub struct StrictEquals;

impl LeafComparator for StrictEquals {
    type Error = Infallible;

    fn compare(&self, actual: &Value, expected: &Value) -> Result<bool, Infallible> {
        Ok(actual.strict_equals(expected))
    }
}

/// Strict equality where `NaN` equals `NaN`.
#[derive(Clone, Copy, Debug, Default)]
pub struct SameValueZero;

impl LeafComparator for SameValueZero {
    type Error = Infallible;

    fn compare(&self, actual: &Value, expected: &Value) -> Result<bool, Infallible> {
        Ok(actual.same_value_zero(expected))
    }
}

/// An asynchronous leaf comparator.
///
/// The trait is object-safe and `Send + Sync` so the async engine's
/// future can move across threads.
#[async_trait]
pub trait AsyncLeafComparator: Send + Sync {
    type Error: Send;

    async fn compare(&self, actual: &Value, expected: &Value) -> Result<bool, Self::Error>;
}

/// Runs a synchronous comparator under [`compare_deep_async`](crate::compare_deep_async).
#[derive(Clone, Copy, Debug, Default)]
pub struct Blocking<C>(pub C);

#[async_trait]
impl<C> AsyncLeafComparator for Blocking<C>
where
    C: LeafComparator + Send + Sync,
    C::Error: Send,
{
    type Error = C::Error;

    async fn compare(&self, actual: &Value, expected: &Value) -> Result<bool, C::Error> {
        self.0.compare(actual, expected)
    }
}
