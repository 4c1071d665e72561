//! Error types for the diff crate.

use rcs_mapping::MappingError;

/// Errors that can occur while computing a dirty diff.
///
/// Both variants are configuration errors: they are never transient and
/// retrying the same diff fails the same way.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DiffError {
    /// A relation names a target metadata key the mapping does not know.
    #[error("relation {class}.{relation} targets unknown class metadata {target:?}")]
    MissingRelationTarget {
        class: String,
        relation: String,
        target: String,
    },

    /// The related metadata is unusable (e.g. it has no identifier).
    #[error("mapping error: {0}")]
    Mapping(#[from] MappingError),
}

/// Convenience alias for diff results.
pub type DiffResult<T> = Result<T, DiffError>;
