//! End-to-end transcoding between schema dialects, plus the output sink.

use std::path::Path;

use serde_json::Value;

use crate::converter::convert;
use crate::descriptor::Descriptor;
use crate::error::{Error, PersistError};
use crate::resolver::resolve_document;
use crate::types::SchemaDialect;

/// Transcode a schema document from one dialect to another.
///
/// A JSON Schema flavor converts to a validator description by resolving
/// references and walking the tree; a validator description converts to any
/// JSON Schema flavor by compiling it and re-emitting. Every other pairing
/// fails with `Error::UnknownConversion`.
///
/// # Errors
///
/// Propagates the stage errors of resolution, conversion, or description
/// compilation unchanged.
pub fn transcode(
    document: &Value,
    source_type: SchemaDialect,
    output_type: SchemaDialect,
) -> Result<Value, Error> {
    match (source_type, output_type) {
        (source, SchemaDialect::Joi) if source.is_json_flavor() => {
            let resolved = resolve_document(document)?;
            let descriptor = convert(&resolved)?;
            Ok(descriptor.describe())
        }
        (SchemaDialect::Joi, output) if output.is_json_flavor() => {
            let descriptor = Descriptor::from_describe(document)?;
            Ok(descriptor.to_json_schema(output))
        }
        (source_type, output_type) => Err(Error::UnknownConversion {
            source_type,
            output_type,
        }),
    }
}

/// Write a transcoded result to a file as pretty-printed JSON.
///
/// # Errors
///
/// Returns `PersistError` when serialization or the write fails.
pub fn save_description(path: &Path, result: &Value) -> Result<(), PersistError> {
    let pretty = serde_json::to_string_pretty(result)
        .map_err(|source| PersistError::Serialize { source })?;

    std::fs::write(path, pretty).map_err(|source| PersistError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!(path = %path.display(), "saved transcoded schema");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_to_joi_resolves_and_converts() {
        let document = json!({
            "type": "object",
            "properties": {
                "home": { "$ref": "#/definitions/Address" }
            },
            "required": ["home"],
            "definitions": {
                "Address": {
                    "type": "object",
                    "properties": { "street": { "type": "string" } }
                }
            }
        });

        let described = transcode(&document, SchemaDialect::Json, SchemaDialect::Joi).unwrap();
        assert_eq!(described["keys"]["home"]["type"], "object");
        assert_eq!(described["keys"]["home"]["flags"]["presence"], "required");
        assert_eq!(
            described["keys"]["home"]["keys"]["street"]["type"],
            "string"
        );
    }

    #[test]
    fn joi_to_draft_04_reemits() {
        let description = json!({
            "type": "object",
            "keys": {
                "name": { "type": "string", "flags": { "presence": "required" } }
            }
        });

        let schema = transcode(&description, SchemaDialect::Joi, SchemaDialect::JsonDraft04)
            .unwrap();
        assert_eq!(schema["$schema"], "http://json-schema.org/draft-04/schema#");
        assert_eq!(schema["required"], json!(["name"]));
    }

    #[test]
    fn joi_to_joi_is_unknown() {
        let result = transcode(&json!({ "type": "object" }), SchemaDialect::Joi, SchemaDialect::Joi);
        assert!(matches!(result, Err(Error::UnknownConversion { .. })));
    }

    #[test]
    fn json_to_json_is_unknown() {
        let result = transcode(
            &json!({ "type": "object" }),
            SchemaDialect::Json,
            SchemaDialect::JsonDraft04,
        );
        assert!(matches!(result, Err(Error::UnknownConversion { .. })));
    }

    #[test]
    fn unresolved_reference_aborts_transcode() {
        let document = json!({
            "type": "object",
            "properties": {
                "home": { "$ref": "#/definitions/Missing" }
            }
        });
        let result = transcode(&document, SchemaDialect::Json, SchemaDialect::Joi);
        assert!(matches!(result, Err(Error::Resolve(_))));
    }

    #[test]
    fn save_description_writes_pretty_json() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("out.json");

        save_description(&path, &json!({ "type": "object" })).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("{\n"));
        assert!(content.contains(r#""type": "object""#));
    }

    #[test]
    fn save_description_missing_dir_fails() {
        let result = save_description(
            Path::new("/nonexistent/dir/out.json"),
            &json!({ "type": "object" }),
        );
        assert!(matches!(result, Err(PersistError::Write { .. })));
    }
}
