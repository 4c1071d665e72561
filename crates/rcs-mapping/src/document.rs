//! Declarative mapping documents.
//!
//! A document describes a whole [`Mapping`] in JSON or TOML:
//!
//! ```toml
//! id_prefix = "/v1"
//!
//! [[classes]]
//! key = "carts"
//! path_root = "/v1/carts"
//! attributes = [
//!     { serialized_key = "@id", attribute_name = "id", is_identifier = true },
//!     { serialized_key = "status" },
//! ]
//! relations = [
//!     { cardinality = "MANY_TO_ONE", target = "orders", serialized_key = "order" },
//! ]
//! ```

use serde::{Deserialize, Serialize};

use crate::attribute::Attribute;
use crate::error::{MappingError, Result};
use crate::mapping::{Mapping, MappingConfig};
use crate::metadata::ClassMetadata;
use crate::relation::Relation;

/// Serializable description of one [`ClassMetadata`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassMetadataDef {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_root: Option<String>,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
    #[serde(default)]
    pub relations: Vec<Relation>,
}

impl ClassMetadataDef {
    /// Build the metadata, enforcing the identifier invariant.
    pub fn into_metadata(self) -> Result<ClassMetadata> {
        let mut meta = ClassMetadata::new(self.key);
        if let Some(path_root) = self.path_root {
            meta = meta.with_path_root(path_root);
        }
        meta.set_attribute_list(self.attributes)?;
        meta.set_relation_list(self.relations)?;
        Ok(meta)
    }
}

/// Serializable description of a whole [`Mapping`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingDocument {
    #[serde(default)]
    pub id_prefix: String,
    #[serde(default)]
    pub config: MappingConfig,
    #[serde(default)]
    pub classes: Vec<ClassMetadataDef>,
}

impl MappingDocument {
    pub fn from_json_str(input: &str) -> Result<Self> {
        serde_json::from_str(input).map_err(|e| MappingError::Document(e.to_string()))
    }

    pub fn from_toml_str(input: &str) -> Result<Self> {
        toml::from_str(input).map_err(|e| MappingError::Document(e.to_string()))
    }

    /// Build the registry. Fails on the first schema error.
    pub fn into_mapping(self) -> Result<Mapping> {
        let classes = self
            .classes
            .into_iter()
            .map(ClassMetadataDef::into_metadata)
            .collect::<Result<Vec<_>>>()?;
        Ok(Mapping::new(self.id_prefix, self.config).with_classes(classes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CART_TOML: &str = r#"
        id_prefix = "/v1"

        [config]
        collection_key = "items"

        [[classes]]
        key = "carts"
        path_root = "/v1/carts"
        attributes = [
            { serialized_key = "@id", attribute_name = "id", is_identifier = true },
            { serialized_key = "status" },
            { serialized_key = "data", type = "object" },
        ]
        relations = [
            { cardinality = "MANY_TO_ONE", target = "orders", serialized_key = "order" },
            { cardinality = "ONE_TO_MANY", target = "cart_items", serialized_key = "cartItemList" },
        ]

        [[classes]]
        key = "orders"
        attributes = [{ serialized_key = "@id", is_identifier = true }]

        [[classes]]
        key = "cart_items"
        attributes = [{ serialized_key = "@id", is_identifier = true }]
    "#;

    #[test]
    fn toml_document() {
        let mapping = MappingDocument::from_toml_str(CART_TOML)
            .unwrap()
            .into_mapping()
            .unwrap();
        assert_eq!(mapping.id_prefix(), "/v1");
        assert_eq!(mapping.config().collection_key, "items");

        let cart = mapping.class_metadata_by_key("carts").unwrap();
        assert_eq!(cart.path_root(), "/v1/carts");
        assert_eq!(cart.identifier_key().unwrap(), "@id");
        assert!(cart.attribute("data").unwrap().is_object());
        assert!(cart.relation("cartItemList").unwrap().is_to_many());
        assert!(mapping.is_mapping_valid());
    }

    #[test]
    fn json_document() {
        let doc = MappingDocument::from_json_str(
            r#"{"classes": [{"key": "orders", "attributes": [{"serialized_key": "id", "is_identifier": true}]}]}"#,
        )
        .unwrap();
        let mapping = doc.into_mapping().unwrap();
        assert_eq!(mapping.id_prefix(), "");
        assert_eq!(mapping.config().collection_key, "hydra:member");
        assert!(mapping.class_metadata_by_key("orders").is_some());
    }

    #[test]
    fn schema_errors_surface() {
        let doc = MappingDocument::from_json_str(
            r#"{"classes": [{"key": "orders", "attributes": [{"serialized_key": "id"}]}]}"#,
        )
        .unwrap();
        assert_eq!(
            doc.into_mapping().unwrap_err(),
            MappingError::NoIdentifier { key: "orders".into() }
        );
    }

    #[test]
    fn empty_key_is_rejected() {
        let def = ClassMetadataDef {
            key: String::new(),
            path_root: None,
            attributes: vec![Attribute::identifier("@id")],
            relations: vec![],
        };
        assert_eq!(def.into_metadata().unwrap_err(), MappingError::EmptyKey);
    }

    #[test]
    fn malformed_documents_are_rejected() {
        assert!(matches!(
            MappingDocument::from_json_str("{not json"),
            Err(MappingError::Document(_))
        ));
        assert!(matches!(
            MappingDocument::from_toml_str("classes = 3"),
            Err(MappingError::Document(_))
        ));
    }
}
