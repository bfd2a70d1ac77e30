//! Error types for the diff crate.

use deepeq_types::TypeError;

/// Errors that can occur while exporting a diff.
#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    /// One side of the diff has no JSON form (a map, a set, a cycle...).
    #[error("diff is not representable as JSON: {0}")]
    Unrepresentable(#[from] TypeError),
}

/// Convenience alias for diff results.
pub type DiffResult<T> = Result<T, DiffError>;
