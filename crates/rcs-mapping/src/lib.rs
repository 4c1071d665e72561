//! Entity mapping for the REST client SDK.
//!
//! A [`Mapping`] is the registry describing every entity type the client
//! talks to. Each type is described by a [`ClassMetadata`]: its plain
//! [`Attribute`]s, its [`Relation`]s to other types, and the attribute that
//! identifies an instance.
//!
//! # Architecture
//!
//! - **Attributes** describe scalar and object fields by wire key.
//! - **Relations** describe associations. The four wire cardinalities collapse
//!   into a two-valued [`RelationKind`] used by the diff engine. Every relation
//!   also registers a companion attribute so that iterating attributes visits
//!   relation fields too.
//! - **Mapping validation** is advisory: [`Mapping::is_mapping_valid`] reports
//!   broken targets and naming-convention violations but nothing enforces it.
//!
//! # Modules
//!
//! - [`error`]: Error types for schema construction and document loading
//! - [`attribute`]: [`Attribute`]
//! - [`relation`]: [`Relation`], [`Cardinality`], [`RelationKind`]
//! - [`metadata`]: [`ClassMetadata`]
//! - [`mapping`]: [`Mapping`], [`MappingConfig`], [`MappingIssue`]
//! - [`naming`]: Plural/singular naming conventions for relation names
//! - [`document`]: Serde mapping documents loadable from JSON or TOML

pub mod attribute;
pub mod document;
pub mod error;
pub mod mapping;
pub mod metadata;
pub mod naming;
pub mod relation;

pub use attribute::Attribute;
pub use document::{ClassMetadataDef, MappingDocument};
pub use error::{MappingError, Result};
pub use mapping::{Mapping, MappingConfig, MappingIssue};
pub use metadata::ClassMetadata;
pub use relation::{Cardinality, Relation, RelationKind};
