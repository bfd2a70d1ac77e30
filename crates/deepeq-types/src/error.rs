use thiserror::Error;

/// Errors produced by value conversions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("value contains a circular reference")]
    Circular,

    #[error("value has no JSON representation: {0}")]
    Unrepresentable(String),
}
