//! Conversion between caller entities and normalized models.

use serde_json::Value;

use rcs_mapping::ClassMetadata;
use rcs_types::Model;

use crate::error::SdkResult;

/// Converts entities to and from the normalized [`Model`] shape the diff
/// engine works on, and models to and from request and response bodies.
pub trait Serializer: Send + Sync {
    type Entity: Send;

    /// Entity to model, keyed by serialized keys.
    fn normalize(&self, entity: &Self::Entity, meta: &ClassMetadata) -> SdkResult<Model>;

    /// Model to entity.
    fn denormalize(&self, model: Model, meta: &ClassMetadata) -> SdkResult<Self::Entity>;

    /// Model to request body.
    fn encode(&self, model: &Model) -> SdkResult<String>;

    /// Response body to JSON value.
    fn decode(&self, body: &str) -> SdkResult<Value>;
}

/// Works on models directly: entities are plain JSON objects.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonSerializer;

impl Serializer for JsonSerializer {
    type Entity = Model;

    fn normalize(&self, entity: &Model, _meta: &ClassMetadata) -> SdkResult<Model> {
        Ok(entity.clone())
    }

    fn denormalize(&self, model: Model, _meta: &ClassMetadata) -> SdkResult<Model> {
        Ok(model)
    }

    fn encode(&self, model: &Model) -> SdkResult<String> {
        Ok(serde_json::to_string(model)?)
    }

    fn decode(&self, body: &str) -> SdkResult<Value> {
        Ok(serde_json::from_str(body)?)
    }
}
