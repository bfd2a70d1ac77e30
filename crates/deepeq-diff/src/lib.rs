//! Structural diff for deepeq.
//!
//! Compares two values and keeps only what disagrees: the result is a pair
//! of sparse partials, one per side, or `None` when nothing differs.
//!
//! # Key Types
//!
//! - [`SparseDiff`] -- Left/right partials of a difference
//! - [`diff_values`] / [`diff_objects`] / [`diff_arrays`] -- Entry points

pub mod error;
pub mod sparse;

pub use error::{DiffError, DiffResult};
pub use sparse::{
    diff_arrays, diff_arrays_with, diff_objects, diff_objects_with, diff_values,
    diff_values_with, SparseDiff,
};
