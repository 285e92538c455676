//! Path-addressed reads and writes over a JSON value tree

use super::field::{FieldPath, PathSegment};
use crate::error::FormError;
use serde_json::{Map, Value};

/// Largest array index a write may create. Guards against a typo such as
/// `ports.99999999` allocating a huge padded array.
pub const MAX_ARRAY_INDEX: usize = 10_000;

/// Read the value at `path`, if every segment resolves
pub fn get<'a>(root: &'a Value, path: &FieldPath) -> Option<&'a Value> {
    let mut current = root;
    for segment in path.segments() {
        current = match (current, segment) {
            (Value::Object(map), segment) => map.get(&segment.as_key())?,
            (Value::Array(items), PathSegment::Index(index)) => items.get(*index)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Write `value` at `path`, creating intermediate containers.
///
/// Numeric segments create arrays (padded with `null`) unless the parent is
/// already an object. Scalars in the way are replaced by containers. Sibling
/// keys are preserved.
pub fn set(root: &mut Value, path: &FieldPath, value: Value) -> Result<(), FormError> {
    let too_large = path
        .segments()
        .iter()
        .any(|s| matches!(s, PathSegment::Index(i) if *i > MAX_ARRAY_INDEX));
    if too_large {
        return Err(FormError::InvalidPath {
            path: path.to_string(),
            reason: "array index too large",
        });
    }
    set_in(root, path.segments(), value);
    Ok(())
}

fn set_in(node: &mut Value, segments: &[PathSegment], value: Value) {
    let Some((first, rest)) = segments.split_first() else {
        *node = value;
        return;
    };

    match first {
        PathSegment::Index(index) if !node.is_object() => {
            if !node.is_array() {
                *node = Value::Array(Vec::new());
            }
            if let Value::Array(items) = node {
                if items.len() <= *index {
                    items.resize(*index + 1, Value::Null);
                }
                set_in(&mut items[*index], rest, value);
            }
        }
        segment => {
            if !node.is_object() {
                *node = Value::Object(Map::new());
            }
            if let Value::Object(map) = node {
                let child = map.entry(segment.as_key()).or_insert(Value::Null);
                set_in(child, rest, value);
            }
        }
    }
}

/// Remove the value at `path`. Array elements after the removed one shift
/// down. Removing the root resets it to `null`.
pub fn remove(root: &mut Value, path: &FieldPath) -> Option<Value> {
    let Some((last, parents)) = path.segments().split_last() else {
        return Some(std::mem::take(root));
    };

    let mut current = root;
    for segment in parents {
        current = match (current, segment) {
            (Value::Object(map), segment) => map.get_mut(&segment.as_key())?,
            (Value::Array(items), PathSegment::Index(index)) => items.get_mut(*index)?,
            _ => return None,
        };
    }

    match (current, last) {
        (Value::Object(map), segment) => map.remove(&segment.as_key()),
        (Value::Array(items), PathSegment::Index(index)) if *index < items.len() => {
            Some(items.remove(*index))
        }
        _ => None,
    }
}
