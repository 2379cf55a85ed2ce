//! Reference resolution - replaces `$ref` pointers with their definitions.
//!
//! The resolver walks an untyped schema tree and substitutes every internal
//! `#/definitions/...` pointer with the definition it names, producing a new
//! tree. The input document is never mutated. A substituted definition is
//! itself resolved before substitution, so definitions may reference other
//! definitions in any order; cycles between definitions are a hard failure.

use serde_json::{Map, Value};

use crate::error::ResolveError;

/// Extract the Definitions Table from a schema document.
///
/// Reads the top-level `definitions` key; an absent or non-object value
/// yields an empty table.
pub fn definitions_table(document: &Value) -> Map<String, Value> {
    document
        .get("definitions")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default()
}

/// Resolve every reference in `value` against the Definitions Table.
///
/// Returns a new tree in which no reference nodes remain.
///
/// # Errors
///
/// Returns `ResolveError::InvalidReference` for a pointer that is not of the
/// `#/definitions/...` shape or names a missing definition, and
/// `ResolveError::CircularReference` when definitions reference each other
/// in a cycle.
pub fn resolve(value: &Value, definitions: &Map<String, Value>) -> Result<Value, ResolveError> {
    resolve_node(value, definitions, &mut Vec::new())
}

/// Resolve a whole schema document against its own `definitions` section.
pub fn resolve_document(document: &Value) -> Result<Value, ResolveError> {
    let definitions = definitions_table(document);
    resolve(document, &definitions)
}

fn resolve_node(
    value: &Value,
    definitions: &Map<String, Value>,
    in_flight: &mut Vec<String>,
) -> Result<Value, ResolveError> {
    match value {
        Value::Object(map) => {
            if let Some(pointer) = map.get("$ref").and_then(Value::as_str) {
                return resolve_reference(pointer, definitions, in_flight);
            }

            let mut result = Map::new();
            for (key, child) in map {
                result.insert(key.clone(), resolve_node(child, definitions, in_flight)?);
            }
            Ok(Value::Object(result))
        }
        Value::Array(arr) => {
            let mut result = Vec::with_capacity(arr.len());
            for item in arr {
                result.push(resolve_node(item, definitions, in_flight)?);
            }
            Ok(Value::Array(result))
        }
        // Primitives pass through unchanged
        other => Ok(other.clone()),
    }
}

fn resolve_reference(
    pointer: &str,
    definitions: &Map<String, Value>,
    in_flight: &mut Vec<String>,
) -> Result<Value, ResolveError> {
    let key = definition_key(pointer).ok_or_else(|| ResolveError::InvalidReference {
        pointer: pointer.to_string(),
    })?;

    let target = definitions
        .get(&key)
        .ok_or_else(|| ResolveError::InvalidReference {
            pointer: pointer.to_string(),
        })?;

    if in_flight.contains(&key) {
        return Err(ResolveError::CircularReference {
            pointer: pointer.to_string(),
        });
    }

    tracing::debug!(pointer, key = key.as_str(), "resolving reference");

    in_flight.push(key);
    let resolved = resolve_node(target, definitions, in_flight)?;
    in_flight.pop();

    Ok(resolved)
}

/// Turn a `#/definitions/<name>` pointer into a Definitions Table key.
///
/// The leading `#` segment is optional; the `definitions` segment is
/// mandatory. Remaining segments are rejoined with `/` to form a compound
/// key, looked up flat (a pointer `#/definitions/a/b` matches only a
/// definition literally named `a/b`). Any other shape yields `None`.
fn definition_key(pointer: &str) -> Option<String> {
    let mut parts = pointer.split('/').peekable();

    if parts.peek() == Some(&"#") {
        parts.next();
    }
    if parts.next() != Some("definitions") {
        return None;
    }

    Some(parts.collect::<Vec<_>>().join("/"))
}
