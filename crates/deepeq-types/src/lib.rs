//! Foundation types for deepeq.
//!
//! This crate provides the dynamic value model compared and diffed by the
//! rest of the workspace. Every other deepeq crate depends on `deepeq-types`.
//!
//! # Key Types
//!
//! - [`Value`] — Closed sum type over primitives, regexes and containers
//! - [`ArrayRef`] / [`ObjectRef`] / [`MapRef`] / [`SetRef`] — Shared container handles with identity
//! - [`RegexRef`] — Regular expression literal (a leaf, never traversed)
//! - [`Identity`] — Address of a container, used for cycle tracking
//! - [`ContainerKind`] — Runtime-shape classification driving traversal

pub mod container;
pub mod error;
pub mod json;
pub mod kind;
mod render;
pub mod value;

pub use container::{ArrayRef, Identity, MapRef, ObjectRef, RegexRef, SetRef};
pub use error::TypeError;
pub use kind::ContainerKind;
pub use value::Value;
