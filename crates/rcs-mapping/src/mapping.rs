//! The registry of every [`ClassMetadata`] known to a client.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::metadata::ClassMetadata;
use crate::naming::{to_many_name_violation, to_one_name_violation};
use crate::relation::RelationKind;

/// Default key under which collection responses list their members.
pub const DEFAULT_COLLECTION_KEY: &str = "hydra:member";

fn default_collection_key() -> String {
    DEFAULT_COLLECTION_KEY.to_string()
}

/// Mapping-wide settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingConfig {
    /// Key of the member list in collection responses.
    #[serde(default = "default_collection_key")]
    pub collection_key: String,
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            collection_key: default_collection_key(),
        }
    }
}

/// A convention or consistency problem found by [`Mapping::issues`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MappingIssue {
    /// A relation points at a metadata key that is not registered.
    MissingTarget {
        class: String,
        relation: String,
        target: String,
    },
    /// A to-one relation has a collection-looking name.
    PluralToOne {
        class: String,
        relation: String,
        reason: String,
    },
    /// A to-many relation has a single-entity-looking name.
    SingularToMany {
        class: String,
        relation: String,
        reason: String,
    },
    /// A metadata has no identifier attribute.
    MissingIdentifier { class: String },
}

impl fmt::Display for MappingIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingTarget {
                class,
                relation,
                target,
            } => write!(
                f,
                "{class}.{relation}: relation target {target:?} is not registered in the mapping"
            ),
            Self::PluralToOne {
                class,
                relation,
                reason,
            } => write!(f, "{class}.{relation}: to-one relation name {reason}"),
            Self::SingularToMany {
                class,
                relation,
                reason,
            } => write!(f, "{class}.{relation}: to-many relation name {reason}"),
            Self::MissingIdentifier { class } => {
                write!(f, "{class}: no identifier attribute")
            }
        }
    }
}

/// Registry of class metadata keyed by [`ClassMetadata::key`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Mapping {
    id_prefix: String,
    config: MappingConfig,
    classes: IndexMap<String, ClassMetadata>,
}

impl Mapping {
    /// Create an empty mapping.
    ///
    /// `id_prefix` is the path prefix shared by every entity IRI
    /// (e.g. `/v1`), used to recognize identifiers that already are URIs.
    pub fn new(id_prefix: impl Into<String>, config: MappingConfig) -> Self {
        Self {
            id_prefix: id_prefix.into(),
            config,
            classes: IndexMap::new(),
        }
    }

    pub fn id_prefix(&self) -> &str {
        &self.id_prefix
    }

    pub fn config(&self) -> &MappingConfig {
        &self.config
    }

    /// Replace the whole registry.
    pub fn set_mapping(&mut self, classes: Vec<ClassMetadata>) {
        self.classes = classes
            .into_iter()
            .map(|meta| (meta.key().to_string(), meta))
            .collect();
    }

    /// Builder form of [`set_mapping`](Self::set_mapping).
    pub fn with_classes(mut self, classes: Vec<ClassMetadata>) -> Self {
        self.set_mapping(classes);
        self
    }

    pub fn class_metadata_by_key(&self, key: &str) -> Option<&ClassMetadata> {
        self.classes.get(key)
    }

    pub fn mapping_keys(&self) -> impl Iterator<Item = &str> {
        self.classes.keys().map(String::as_str)
    }

    pub fn class_metadata_list(&self) -> impl Iterator<Item = &ClassMetadata> {
        self.classes.values()
    }

    /// Collect every consistency and naming problem in the registry.
    pub fn issues(&self) -> Vec<MappingIssue> {
        let mut issues = Vec::new();
        for meta in self.classes.values() {
            if !meta.has_identifier() {
                issues.push(MappingIssue::MissingIdentifier {
                    class: meta.key().to_string(),
                });
            }

            for relation in meta.relation_list() {
                let class = meta.key().to_string();
                let name = relation.attribute_name();

                if !self.classes.contains_key(relation.target_metadata_key()) {
                    issues.push(MappingIssue::MissingTarget {
                        class: class.clone(),
                        relation: name.to_string(),
                        target: relation.target_metadata_key().to_string(),
                    });
                }

                match relation.kind() {
                    RelationKind::ToOne => {
                        if let Some(reason) = to_one_name_violation(name) {
                            issues.push(MappingIssue::PluralToOne {
                                class,
                                relation: name.to_string(),
                                reason,
                            });
                        }
                    }
                    RelationKind::ToMany => {
                        if let Some(reason) = to_many_name_violation(name) {
                            issues.push(MappingIssue::SingularToMany {
                                class,
                                relation: name.to_string(),
                                reason,
                            });
                        }
                    }
                }
            }
        }
        issues
    }

    /// Advisory health check. Each problem found is logged as a warning.
    pub fn is_mapping_valid(&self) -> bool {
        let issues = self.issues();
        for issue in &issues {
            warn!(%issue, "invalid mapping");
        }
        issues.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::Attribute;
    use crate::relation::Relation;

    fn meta(key: &str, relations: Vec<Relation>) -> ClassMetadata {
        let mut meta = ClassMetadata::new(key);
        meta.set_attribute_list(vec![Attribute::identifier("@id")])
            .unwrap();
        meta.set_relation_list(relations).unwrap();
        meta
    }

    fn valid_mapping() -> Mapping {
        Mapping::new("/v1", MappingConfig::default()).with_classes(vec![
            meta(
                "carts",
                vec![
                    Relation::many_to_one("orders", "order"),
                    Relation::one_to_many("cart_items", "cartItemList"),
                ],
            ),
            meta("cart_items", vec![Relation::many_to_one("carts", "cart")]),
            meta("orders", vec![Relation::one_to_many("carts", "carts")]),
        ])
    }

    #[test]
    fn default_config() {
        assert_eq!(MappingConfig::default().collection_key, "hydra:member");
    }

    #[test]
    fn lookup_by_key() {
        let mapping = valid_mapping();
        assert_eq!(mapping.id_prefix(), "/v1");
        assert!(mapping.class_metadata_by_key("carts").is_some());
        assert!(mapping.class_metadata_by_key("nope").is_none());
        let keys: Vec<&str> = mapping.mapping_keys().collect();
        assert_eq!(keys, vec!["carts", "cart_items", "orders"]);
    }

    #[test]
    fn set_mapping_replaces_registry() {
        let mut mapping = valid_mapping();
        mapping.set_mapping(vec![meta("products", vec![])]);
        assert!(mapping.class_metadata_by_key("carts").is_none());
        assert!(mapping.class_metadata_by_key("products").is_some());
    }

    #[test]
    fn valid_mapping_has_no_issues() {
        let mapping = valid_mapping();
        assert!(mapping.issues().is_empty());
        assert!(mapping.is_mapping_valid());
    }

    #[test]
    fn missing_target_is_reported() {
        let mapping = Mapping::default()
            .with_classes(vec![meta("carts", vec![Relation::many_to_one("orders", "order")])]);
        assert!(!mapping.is_mapping_valid());
        assert_eq!(
            mapping.issues(),
            vec![MappingIssue::MissingTarget {
                class: "carts".into(),
                relation: "order".into(),
                target: "orders".into(),
            }]
        );
    }

    #[test]
    fn naming_conventions_are_reported() {
        let mapping = Mapping::default().with_classes(vec![
            meta(
                "carts",
                vec![
                    Relation::many_to_one("orders", "orders"),
                    Relation::one_to_many("cart_items", "cartItem"),
                ],
            ),
            meta("orders", vec![]),
            meta("cart_items", vec![]),
        ]);
        let issues = mapping.issues();
        assert_eq!(issues.len(), 2);
        assert!(matches!(issues[0], MappingIssue::PluralToOne { .. }));
        assert!(matches!(issues[1], MappingIssue::SingularToMany { .. }));
        assert!(!mapping.is_mapping_valid());
    }

    #[test]
    fn attribute_name_is_checked_not_wire_key() {
        let mapping = Mapping::default().with_classes(vec![
            meta(
                "carts",
                vec![Relation::one_to_many("cart_items", "cart_item").named("cartItemList")],
            ),
            meta("cart_items", vec![]),
        ]);
        assert!(mapping.is_mapping_valid());
    }

    #[test]
    fn missing_identifier_is_reported() {
        let mapping = Mapping::default().with_classes(vec![ClassMetadata::new("carts")]);
        assert_eq!(
            mapping.issues(),
            vec![MappingIssue::MissingIdentifier {
                class: "carts".into()
            }]
        );
    }

    #[test]
    fn issue_display() {
        let issue = MappingIssue::MissingTarget {
            class: "carts".into(),
            relation: "order".into(),
            target: "orders".into(),
        };
        assert_eq!(
            issue.to_string(),
            "carts.order: relation target \"orders\" is not registered in the mapping"
        );
    }
}
