//! Deep equality engine for deepeq.
//!
//! Recursively compares two [`Value`](deepeq_types::Value)s. Arrays, plain
//! objects, maps and sets are traversed; everything else is handed to a
//! caller-supplied leaf comparator. Cyclic graphs terminate: a pair of
//! containers already being compared further up the path counts as equal.
//!
//! Two entry points cover the two calling conventions:
//!
//! - [`compare_deep`] — synchronous, for [`LeafComparator`]s
//! - [`compare_deep_async`] — asynchronous, for [`AsyncLeafComparator`]s
//!
//! # Quick Start
//!
//! ```rust
//! use deepeq_engine::{compare_deep, StrictEquals};
//! use deepeq_types::Value;
//!
//! let a = Value::map(vec![(Value::from("a"), Value::from("b")), (Value::from("c"), Value::from("d"))]);
//! let b = Value::map(vec![(Value::from("c"), Value::from("d")), (Value::from("a"), Value::from("b"))]);
//! assert_eq!(compare_deep(&a, &b, &StrictEquals), Ok(true));
//! ```

pub mod compare;
pub mod compare_async;
pub mod leaf;
pub mod shape;
pub mod visited;

pub use compare::{compare_deep, deep_equals};
pub use compare_async::compare_deep_async;
pub use leaf::{AsyncLeafComparator, Blocking, LeafComparator, SameValueZero, StrictEquals};
pub use shape::{ContainerPair, Shape};
pub use visited::Visited;
