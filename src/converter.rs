//! Recursive-descent conversion from resolved JSON Schema trees into
//! validator descriptors.
//!
//! Dispatch is a closed match over the `type` tag. Required-field marking is
//! applied by the parent while converting an object's properties: the
//! property list is converted against the node's own `required` array, and a
//! named property gets the presence flag layered onto the already-converted
//! child. Numeric and length bounds use presence checks, so a declared bound
//! of `0` applies.

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::descriptor::Descriptor;
use crate::error::ConvertError;
use crate::types::json_type_name;

/// Convert a fully-resolved JSON Schema node into a [`Descriptor`].
///
/// The input must contain no unresolved `$ref` nodes (see
/// [`crate::resolver::resolve`]).
///
/// # Errors
///
/// Returns `ConvertError::InvalidSchema` when the node is not an object or
/// is structurally malformed, and `ConvertError::UnsupportedType` for a
/// `type` tag with no conversion rule.
pub fn convert(schema: &Value) -> Result<Descriptor, ConvertError> {
    let Some(map) = schema.as_object() else {
        return Err(ConvertError::InvalidSchema {
            message: format!(
                "expected a schema object, got {}",
                json_type_name(schema)
            ),
        });
    };

    let type_tag = match map.get("type") {
        Some(Value::String(tag)) => tag.as_str(),
        Some(other) => {
            return Err(ConvertError::UnsupportedType {
                type_name: other.to_string(),
            })
        }
        None => {
            return Err(ConvertError::InvalidSchema {
                message: "schema is missing the \"type\" keyword".to_string(),
            })
        }
    };

    tracing::trace!(type_tag, "converting schema node");

    match type_tag {
        "object" => convert_object(map),
        "array" => convert_array(map),
        "string" => convert_string(map),
        "number" | "integer" => convert_number(map, type_tag == "integer"),
        "boolean" => Ok(Descriptor::boolean()),
        "null" => Ok(Descriptor::null()),
        other => Err(ConvertError::UnsupportedType {
            type_name: other.to_string(),
        }),
    }
}

fn convert_object(map: &Map<String, Value>) -> Result<Descriptor, ConvertError> {
    let mut descriptor = Descriptor::object();

    if let Some(properties) = map.get("properties") {
        let Some(properties) = properties.as_object() else {
            return Err(ConvertError::InvalidSchema {
                message: format!(
                    "\"properties\" must be an object, got {}",
                    json_type_name(properties)
                ),
            });
        };

        let required = required_names(map);
        descriptor = descriptor.keys(convert_keys(properties, &required)?);
    }

    Ok(descriptor)
}

/// Convert an object's properties, marking those named in `required`.
fn convert_keys(
    properties: &Map<String, Value>,
    required: &[String],
) -> Result<IndexMap<String, Descriptor>, ConvertError> {
    let mut keys = IndexMap::with_capacity(properties.len());

    for (name, property) in properties {
        let mut child = convert(property)?;
        if required.iter().any(|r| r == name) {
            child = child.required();
        }
        keys.insert(name.clone(), child);
    }

    Ok(keys)
}

fn required_names(map: &Map<String, Value>) -> Vec<String> {
    map.get("required")
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .filter_map(|v| v.as_str().map(String::from))
                .collect()
        })
        .unwrap_or_default()
}

fn convert_array(map: &Map<String, Value>) -> Result<Descriptor, ConvertError> {
    let mut descriptor = Descriptor::array();

    if let Some(items) = map.get("items") {
        descriptor = descriptor.items(convert(items)?);
    }

    Ok(descriptor)
}

fn convert_string(map: &Map<String, Value>) -> Result<Descriptor, ConvertError> {
    let mut descriptor = Descriptor::string();

    if let Some(min) = length_bound(map, "minLength")? {
        descriptor = descriptor.min_length(min);
    }
    if let Some(max) = length_bound(map, "maxLength")? {
        descriptor = descriptor.max_length(max);
    }
    if let Some(pattern) = map.get("pattern") {
        let Some(source) = pattern.as_str() else {
            return Err(ConvertError::InvalidSchema {
                message: format!(
                    "\"pattern\" must be a string, got {}",
                    json_type_name(pattern)
                ),
            });
        };
        regex::Regex::new(source).map_err(|e| ConvertError::InvalidSchema {
            message: format!("invalid \"pattern\": {e}"),
        })?;
        descriptor = descriptor.pattern(source);
    }

    Ok(descriptor)
}

fn convert_number(map: &Map<String, Value>, integer: bool) -> Result<Descriptor, ConvertError> {
    let mut descriptor = Descriptor::number();
    if integer {
        descriptor = descriptor.integer();
    }

    if let Some(min) = numeric_bound(map, "minimum")? {
        descriptor = descriptor.minimum(min);
    }
    if let Some(max) = numeric_bound(map, "maximum")? {
        descriptor = descriptor.maximum(max);
    }

    Ok(descriptor)
}

/// Read an optional non-negative integer bound, distinguishing absent from
/// present (a zero bound applies).
fn length_bound(map: &Map<String, Value>, keyword: &str) -> Result<Option<u64>, ConvertError> {
    match map.get(keyword) {
        None => Ok(None),
        Some(value) => value.as_u64().map(Some).ok_or_else(|| {
            ConvertError::InvalidSchema {
                message: format!("\"{keyword}\" must be a non-negative integer, got {value}"),
            }
        }),
    }
}

fn numeric_bound(map: &Map<String, Value>, keyword: &str) -> Result<Option<f64>, ConvertError> {
    match map.get(keyword) {
        None => Ok(None),
        Some(value) => value.as_f64().map(Some).ok_or_else(|| {
            ConvertError::InvalidSchema {
                message: format!("\"{keyword}\" must be a number, got {value}"),
            }
        }),
    }
}
