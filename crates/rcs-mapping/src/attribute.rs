//! Plain entity fields.

use serde::{Deserialize, Serialize};

/// Type tag of a plain string attribute. This is the default.
pub const TYPE_STRING: &str = "string";
/// Type tag of an integer attribute.
pub const TYPE_INTEGER: &str = "integer";
/// Type tag of a nested-object attribute, compared by deep equality.
pub const TYPE_OBJECT: &str = "object";
/// Type tag of a list attribute.
pub const TYPE_ARRAY: &str = "array";

fn default_type() -> String {
    TYPE_STRING.to_string()
}

/// One field of an entity type.
///
/// `serialized_key` is the wire name and the key used in normalized models.
/// `attribute_name` is the in-memory name and falls back to the wire name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    serialized_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    attribute_name: Option<String>,
    #[serde(rename = "type", default = "default_type")]
    attribute_type: String,
    #[serde(default)]
    is_identifier: bool,
}

impl Attribute {
    /// A string attribute named after its wire key.
    pub fn new(serialized_key: impl Into<String>) -> Self {
        Self {
            serialized_key: serialized_key.into(),
            attribute_name: None,
            attribute_type: default_type(),
            is_identifier: false,
        }
    }

    /// Shorthand for an identifier attribute.
    pub fn identifier(serialized_key: impl Into<String>) -> Self {
        Self::new(serialized_key).as_identifier()
    }

    /// Set the in-memory name.
    pub fn named(mut self, attribute_name: impl Into<String>) -> Self {
        self.attribute_name = Some(attribute_name.into());
        self
    }

    /// Set the type tag.
    pub fn with_type(mut self, attribute_type: impl Into<String>) -> Self {
        self.attribute_type = attribute_type.into();
        self
    }

    /// Mark this attribute as the identifier.
    pub fn as_identifier(mut self) -> Self {
        self.is_identifier = true;
        self
    }

    pub fn serialized_key(&self) -> &str {
        &self.serialized_key
    }

    pub fn attribute_name(&self) -> &str {
        self.attribute_name.as_deref().unwrap_or(&self.serialized_key)
    }

    pub fn attribute_type(&self) -> &str {
        &self.attribute_type
    }

    pub fn is_identifier(&self) -> bool {
        self.is_identifier
    }

    /// Whether values of this attribute are compared structurally.
    pub fn is_object(&self) -> bool {
        self.attribute_type == TYPE_OBJECT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults() {
        let attr = Attribute::new("status");
        assert_eq!(attr.serialized_key(), "status");
        assert_eq!(attr.attribute_name(), "status");
        assert_eq!(attr.attribute_type(), "string");
        assert!(!attr.is_identifier());
        assert!(!attr.is_object());
    }

    #[test]
    fn builder() {
        let attr = Attribute::identifier("@id").named("id");
        assert_eq!(attr.serialized_key(), "@id");
        assert_eq!(attr.attribute_name(), "id");
        assert!(attr.is_identifier());

        let data = Attribute::new("data").with_type(TYPE_OBJECT);
        assert!(data.is_object());
    }

    #[test]
    fn deserializes_with_defaults() {
        let attr: Attribute = serde_json::from_value(json!({"serialized_key": "total"})).unwrap();
        assert_eq!(attr, Attribute::new("total"));

        let attr: Attribute = serde_json::from_value(json!({
            "serialized_key": "@id",
            "attribute_name": "id",
            "type": "string",
            "is_identifier": true,
        }))
        .unwrap();
        assert_eq!(attr, Attribute::identifier("@id").named("id"));
    }
}
