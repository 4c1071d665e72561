//! Dirty-field detection: compare a mutated model with its clean snapshot.
//!
//! Both sides are normalized models keyed by wire names. The diff walks the
//! attributes declared on the [`ClassMetadata`] (not the keys present in
//! either model) and keeps only fields whose value changed:
//!
//! - A field absent from the new model is ignored, never treated as cleared.
//! - Plain attributes are compared structurally; `null` is a real value.
//! - To-one relations emit `null` on clear, the raw value when either side is
//!   a bare identifier, and otherwise a recursive diff carrying the target's
//!   identifier.
//! - To-many relations emit the identifier list when the length changed, and
//!   when any element changed they emit every element's identifier with the
//!   element diffs merged on top.

use serde_json::Value;

use rcs_mapping::{ClassMetadata, Mapping, Relation, RelationKind};
use rcs_types::Model;

use crate::error::{DiffError, DiffResult};

/// Compute the fields of `new` that differ from `old`.
///
/// `old` is the clean snapshot of the same entity, or
/// [`ClassMetadata::default_serialized_model`] when the entity was never
/// fetched (a create). The returned model is empty when nothing changed.
///
/// # Errors
///
/// Fails with [`DiffError::MissingRelationTarget`] when a relation present in
/// `new` targets a key that `mapping` does not contain.
pub fn dirty_data(
    mapping: &Mapping,
    new: &Model,
    old: &Model,
    meta: &ClassMetadata,
) -> DiffResult<Model> {
    let mut dirty = Model::new();

    for attribute in meta.attribute_list() {
        let key = attribute.serialized_key();
        let Some(new_value) = new.get(key) else {
            continue;
        };
        let old_value = old.get(key);

        let change = match meta.relation(key) {
            None => plain_change(new_value, old_value),
            Some(relation) => {
                let target = target_metadata(mapping, meta, relation)?;
                match relation.kind() {
                    RelationKind::ToOne => to_one_change(mapping, new_value, old_value, target)?,
                    RelationKind::ToMany => to_many_change(mapping, new_value, old_value, target)?,
                }
            }
        };

        if let Some(value) = change {
            dirty.insert(key.to_string(), value);
        }
    }

    Ok(dirty)
}

fn target_metadata<'m>(
    mapping: &'m Mapping,
    meta: &ClassMetadata,
    relation: &Relation,
) -> DiffResult<&'m ClassMetadata> {
    mapping
        .class_metadata_by_key(relation.target_metadata_key())
        .ok_or_else(|| DiffError::MissingRelationTarget {
            class: meta.key().to_string(),
            relation: relation.serialized_key().to_string(),
            target: relation.target_metadata_key().to_string(),
        })
}

/// Plain attributes. `serde_json` equality is structural, so object-typed
/// attributes get the deep comparison they need, and a missing old value
/// always counts as a change.
fn plain_change(new: &Value, old: Option<&Value>) -> Option<Value> {
    match old {
        Some(old) if old == new => None,
        _ => Some(new.clone()),
    }
}

fn to_one_change(
    mapping: &Mapping,
    new: &Value,
    old: Option<&Value>,
    target: &ClassMetadata,
) -> DiffResult<Option<Value>> {
    if !new.is_object() && Some(new) == old {
        return Ok(None);
    }
    if new.is_null() {
        return Ok(Some(Value::Null));
    }

    match (new, old) {
        (Value::Object(new_model), Some(Value::Object(old_model))) => {
            nested_change(mapping, new_model, old_model, target)
        }
        (Value::Object(new_model), None | Some(Value::Null)) => {
            let baseline = target.default_serialized_model();
            nested_change(mapping, new_model, &baseline, target)
        }
        // One side is a bare identifier: replace the relation wholesale.
        _ => Ok(Some(new.clone())),
    }
}

/// Recursive diff of two related entities, tagged with the identifier.
fn nested_change(
    mapping: &Mapping,
    new: &Model,
    old: &Model,
    target: &ClassMetadata,
) -> DiffResult<Option<Value>> {
    let mut diff = dirty_data(mapping, new, old, target)?;
    if diff.is_empty() {
        return Ok(None);
    }
    let id_key = target.identifier_key()?;
    if let Some(id) = present_identifier(new, id_key).or_else(|| present_identifier(old, id_key)) {
        diff.insert(id_key.to_string(), id.clone());
    }
    Ok(Some(Value::Object(diff)))
}

fn to_many_change(
    mapping: &Mapping,
    new: &Value,
    old: Option<&Value>,
    target: &ClassMetadata,
) -> DiffResult<Option<Value>> {
    let id_key = target.identifier_key()?;
    let new_items = as_items(Some(new));
    let old_items = as_items(old);
    let length_changed = new_items.len() != old_items.len();

    let mut baseline: Option<Model> = None;
    let mut element_diffs: Vec<(usize, Value)> = Vec::new();

    for (index, item) in new_items.iter().enumerate() {
        let counterpart = find_counterpart(item, old_items, id_key);

        match (item, counterpart) {
            (Value::Object(item_model), Some(Value::Object(old_model))) => {
                if let Some(diff) = nested_change(mapping, item_model, old_model, target)? {
                    element_diffs.push((index, diff));
                }
            }
            (Value::Object(item_model), None) => {
                let baseline = baseline.get_or_insert_with(|| target.default_serialized_model());
                if let Some(diff) = nested_change(mapping, item_model, baseline, target)? {
                    element_diffs.push((index, diff));
                }
            }
            (item, Some(counterpart)) => {
                if item != counterpart {
                    element_diffs.push((index, item.clone()));
                }
            }
            // A bare identifier that was not in the old list.
            (item, None) => element_diffs.push((index, item.clone())),
        }
    }

    if element_diffs.is_empty() {
        return Ok(length_changed.then(|| identifier_projection(new_items, id_key)));
    }

    let mut merged = match identifier_projection(new_items, id_key) {
        Value::Array(items) => items,
        _ => Vec::new(),
    };
    for (index, diff) in element_diffs {
        if let Some(slot) = merged.get_mut(index) {
            let base = std::mem::take(slot);
            *slot = merge_element(base, diff);
        }
    }
    Ok(Some(Value::Array(merged)))
}

/// List elements of a to-many value. `null`, absent and non-list values are
/// treated as an empty list.
fn as_items(value: Option<&Value>) -> &[Value] {
    match value {
        Some(Value::Array(items)) => items,
        _ => &[],
    }
}

/// The identifier of a model, unless missing or `null`.
fn present_identifier<'v>(model: &'v Model, id_key: &str) -> Option<&'v Value> {
    model.get(id_key).filter(|id| !id.is_null())
}

/// Identifier of a list element: the element itself when it is a bare
/// identifier, the identifier attribute when it is an entity.
fn element_identifier<'v>(item: &'v Value, id_key: &str) -> Option<&'v Value> {
    match item {
        Value::String(_) | Value::Number(_) => Some(item),
        Value::Object(model) => present_identifier(model, id_key),
        _ => None,
    }
}

fn find_counterpart<'o>(item: &Value, old_items: &'o [Value], id_key: &str) -> Option<&'o Value> {
    let id = element_identifier(item, id_key)?;
    old_items
        .iter()
        .find(|old| element_identifier(old, id_key) == Some(id))
}

/// Reduce a list to the minimum that still addresses each element.
fn identifier_projection(items: &[Value], id_key: &str) -> Value {
    let projected = items
        .iter()
        .map(|item| match item {
            Value::Object(model) => {
                let mut only_id = Model::new();
                if let Some(id) = present_identifier(model, id_key) {
                    only_id.insert(id_key.to_string(), id.clone());
                }
                Value::Object(only_id)
            }
            other => other.clone(),
        })
        .collect();
    Value::Array(projected)
}

/// Overlay an element diff on its projected slot. Objects merge key by key,
/// anything else replaces the slot.
fn merge_element(base: Value, diff: Value) -> Value {
    match (base, diff) {
        (Value::Object(mut base), Value::Object(diff)) => {
            base.extend(diff);
            Value::Object(base)
        }
        (_, diff) => diff,
    }
}
