//! The normalized model: a plain key→value JSON object keyed by wire names.

use serde_json::{Map, Value};

use crate::error::TypeError;

/// A normalized, wire-shaped entity.
///
/// Values are scalars, `null`, nested models (to-one relations) or arrays of
/// scalars and models (to-many relations).
pub type Model = Map<String, Value>;

/// Unwrap a JSON value into a [`Model`], failing for anything but an object.
pub fn into_model(value: Value) -> Result<Model, TypeError> {
    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Err(TypeError::NotAnObject("null")),
        Value::Bool(_) => Err(TypeError::NotAnObject("boolean")),
        Value::Number(_) => Err(TypeError::NotAnObject("number")),
        Value::String(_) => Err(TypeError::NotAnObject("string")),
        Value::Array(_) => Err(TypeError::NotAnObject("array")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn object_becomes_model() {
        let model = into_model(json!({"@id": "/carts/1", "status": "waiting"})).unwrap();
        assert_eq!(model.len(), 2);
        assert_eq!(model["status"], json!("waiting"));
    }

    #[test]
    fn non_objects_are_rejected() {
        assert_eq!(into_model(json!([])), Err(TypeError::NotAnObject("array")));
        assert_eq!(into_model(json!(null)), Err(TypeError::NotAnObject("null")));
        assert_eq!(into_model(json!("x")), Err(TypeError::NotAnObject("string")));
    }
}
