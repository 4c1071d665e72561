//! Error types for mapping operations.

use thiserror::Error;

/// Errors that can occur while building or loading a mapping.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MappingError {
    /// An attribute list was set without any identifier attribute.
    #[error("class metadata {key:?} has no identifier attribute")]
    NoIdentifier { key: String },

    /// More than one attribute claims to be the identifier.
    #[error("class metadata {key:?} has several identifier attributes: {attributes:?}")]
    MultipleIdentifiers { key: String, attributes: Vec<String> },

    /// The identifier was requested before a valid attribute list was set.
    #[error("class metadata {key:?} has no identifier attribute set yet")]
    IdentifierNotSet { key: String },

    /// An attribute or relation was declared with an empty wire key.
    #[error("class metadata {key:?} declares a field with an empty serialized key")]
    EmptySerializedKey { key: String },

    /// A class metadata was declared with an empty key.
    #[error("class metadata key must not be empty")]
    EmptyKey,

    /// A mapping document could not be parsed.
    #[error("invalid mapping document: {0}")]
    Document(String),
}

/// Convenience type alias for mapping operations.
pub type Result<T> = std::result::Result<T, MappingError>;
