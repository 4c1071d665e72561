//! Associations between entity types.

use serde::{Deserialize, Serialize};

use crate::attribute::{Attribute, TYPE_ARRAY, TYPE_OBJECT};

/// Wire cardinality of a relation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Cardinality {
    OneToOne,
    OneToMany,
    ManyToOne,
    ManyToMany,
}

impl Cardinality {
    /// Collapse the cardinality into the diff engine's behavioral class.
    pub fn kind(self) -> RelationKind {
        match self {
            Self::OneToOne | Self::ManyToOne => RelationKind::ToOne,
            Self::OneToMany | Self::ManyToMany => RelationKind::ToMany,
        }
    }
}

/// Behavioral class of a relation: a single nested entity, or a list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RelationKind {
    ToOne,
    ToMany,
}

/// An association field pointing at another [`ClassMetadata`](crate::ClassMetadata).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    cardinality: Cardinality,
    #[serde(alias = "target")]
    target_metadata_key: String,
    serialized_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    attribute_name: Option<String>,
}

impl Relation {
    pub fn new(
        cardinality: Cardinality,
        target_metadata_key: impl Into<String>,
        serialized_key: impl Into<String>,
    ) -> Self {
        Self {
            cardinality,
            target_metadata_key: target_metadata_key.into(),
            serialized_key: serialized_key.into(),
            attribute_name: None,
        }
    }

    pub fn one_to_one(target: impl Into<String>, serialized_key: impl Into<String>) -> Self {
        Self::new(Cardinality::OneToOne, target, serialized_key)
    }

    pub fn one_to_many(target: impl Into<String>, serialized_key: impl Into<String>) -> Self {
        Self::new(Cardinality::OneToMany, target, serialized_key)
    }

    pub fn many_to_one(target: impl Into<String>, serialized_key: impl Into<String>) -> Self {
        Self::new(Cardinality::ManyToOne, target, serialized_key)
    }

    pub fn many_to_many(target: impl Into<String>, serialized_key: impl Into<String>) -> Self {
        Self::new(Cardinality::ManyToMany, target, serialized_key)
    }

    /// Set the in-memory name.
    pub fn named(mut self, attribute_name: impl Into<String>) -> Self {
        self.attribute_name = Some(attribute_name.into());
        self
    }

    pub fn cardinality(&self) -> Cardinality {
        self.cardinality
    }

    pub fn kind(&self) -> RelationKind {
        self.cardinality.kind()
    }

    pub fn is_to_many(&self) -> bool {
        self.kind() == RelationKind::ToMany
    }

    pub fn target_metadata_key(&self) -> &str {
        &self.target_metadata_key
    }

    pub fn serialized_key(&self) -> &str {
        &self.serialized_key
    }

    pub fn attribute_name(&self) -> &str {
        self.attribute_name.as_deref().unwrap_or(&self.serialized_key)
    }

    /// The attribute registered alongside this relation in its owner.
    pub(crate) fn companion_attribute(&self) -> Attribute {
        let attribute_type = match self.kind() {
            RelationKind::ToOne => TYPE_OBJECT,
            RelationKind::ToMany => TYPE_ARRAY,
        };
        let attribute = Attribute::new(self.serialized_key.clone()).with_type(attribute_type);
        match &self.attribute_name {
            Some(name) => attribute.named(name.clone()),
            None => attribute,
        }
    }
}
