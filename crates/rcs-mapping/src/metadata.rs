//! Per-type schema: attributes, relations and the identifier.

use indexmap::IndexMap;
use serde_json::Value;

use rcs_types::Model;

use crate::attribute::Attribute;
use crate::error::{MappingError, Result};
use crate::relation::Relation;

/// Schema of one entity type.
///
/// The attribute list seen by callers is the declared attributes followed by
/// one companion attribute per relation, so a single pass over
/// [`attribute_list`](Self::attribute_list) visits every wire field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassMetadata {
    key: String,
    path_root: Option<String>,
    declared: IndexMap<String, Attribute>,
    attributes: IndexMap<String, Attribute>,
    relations: IndexMap<String, Relation>,
    identifier: Option<String>,
}

impl ClassMetadata {
    /// Create an empty schema for the type registered under `key`.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            path_root: None,
            declared: IndexMap::new(),
            attributes: IndexMap::new(),
            relations: IndexMap::new(),
            identifier: None,
        }
    }

    /// Set the URL path under which entities of this type live.
    pub fn with_path_root(mut self, path_root: impl Into<String>) -> Self {
        self.path_root = Some(path_root.into());
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// The URL path root, defaulting to the key.
    pub fn path_root(&self) -> &str {
        self.path_root.as_deref().unwrap_or(&self.key)
    }

    /// Replace the declared attributes and recompute the identifier.
    ///
    /// Fails when the metadata key is empty, or when no attribute (or more
    /// than one) is flagged as identifier. On failure the metadata is left
    /// unchanged.
    pub fn set_attribute_list(&mut self, attributes: Vec<Attribute>) -> Result<()> {
        if self.key.is_empty() {
            return Err(MappingError::EmptyKey);
        }
        let mut declared = IndexMap::with_capacity(attributes.len());
        let mut identifiers = Vec::new();
        for attribute in attributes {
            if attribute.serialized_key().is_empty() {
                return Err(MappingError::EmptySerializedKey {
                    key: self.key.clone(),
                });
            }
            if attribute.is_identifier() {
                identifiers.push(attribute.serialized_key().to_string());
            }
            declared.insert(attribute.serialized_key().to_string(), attribute);
        }

        let identifier = match identifiers.len() {
            0 => {
                return Err(MappingError::NoIdentifier {
                    key: self.key.clone(),
                })
            }
            1 => identifiers.remove(0),
            _ => {
                return Err(MappingError::MultipleIdentifiers {
                    key: self.key.clone(),
                    attributes: identifiers,
                })
            }
        };

        self.declared = declared;
        self.identifier = Some(identifier);
        self.rebuild_attributes();
        Ok(())
    }

    /// Replace the relations, registering a companion attribute for each.
    pub fn set_relation_list(&mut self, relations: Vec<Relation>) -> Result<()> {
        let mut by_key = IndexMap::with_capacity(relations.len());
        for relation in relations {
            if relation.serialized_key().is_empty() {
                return Err(MappingError::EmptySerializedKey {
                    key: self.key.clone(),
                });
            }
            by_key.insert(relation.serialized_key().to_string(), relation);
        }
        self.relations = by_key;
        self.rebuild_attributes();
        Ok(())
    }

    fn rebuild_attributes(&mut self) {
        let mut attributes = self.declared.clone();
        for (key, relation) in &self.relations {
            attributes.insert(key.clone(), relation.companion_attribute());
        }
        self.attributes = attributes;
    }

    /// Every attribute, declared ones first, then relation companions.
    pub fn attribute_list(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes.values()
    }

    pub fn attribute(&self, serialized_key: &str) -> Option<&Attribute> {
        self.attributes.get(serialized_key)
    }

    pub fn relation_list(&self) -> impl Iterator<Item = &Relation> {
        self.relations.values()
    }

    pub fn relation(&self, serialized_key: &str) -> Option<&Relation> {
        self.relations.get(serialized_key)
    }

    /// The attribute holding the entity identifier.
    pub fn identifier_attribute(&self) -> Result<&Attribute> {
        self.identifier
            .as_deref()
            .and_then(|key| self.attributes.get(key))
            .ok_or_else(|| MappingError::IdentifierNotSet {
                key: self.key.clone(),
            })
    }

    /// Wire key of the identifier attribute.
    pub fn identifier_key(&self) -> Result<&str> {
        self.identifier_attribute().map(Attribute::serialized_key)
    }

    pub fn has_identifier(&self) -> bool {
        self.identifier.is_some()
    }

    /// The "never seen" shape used as the baseline for creates: every
    /// attribute is `null`, every to-many relation is an empty list.
    pub fn default_serialized_model(&self) -> Model {
        let mut model = Model::new();
        for key in self.attributes.keys() {
            model.insert(key.clone(), Value::Null);
        }
        for (key, relation) in &self.relations {
            if relation.is_to_many() {
                model.insert(key.clone(), Value::Array(Vec::new()));
            }
        }
        model
    }
}
