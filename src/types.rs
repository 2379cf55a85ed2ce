//! Core types shared across the transcoding pipeline.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Returns the JSON type name for error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// A schema vocabulary the transcoder can read or emit.
///
/// `Joi` is the validator-description side; the remaining variants are
/// JSON Schema flavors that differ in their `$schema` declaration and in
/// how a literal-null schema is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SchemaDialect {
    /// Joi-style structural description (`describe()` output).
    Joi,
    /// Current JSON Schema draft (2020-12).
    Json,
    /// JSON Schema draft-04.
    #[serde(rename = "json-draft-04")]
    JsonDraft04,
    /// JSON Schema draft 2019-09.
    #[serde(rename = "json-draft-2019-09")]
    JsonDraft2019_09,
    /// OpenAPI 3.0 style schema object.
    OpenApi,
}

impl SchemaDialect {
    /// Parse a dialect name as used by the CLI's `--source-type` and
    /// `--output-type` flags.
    ///
    /// Returns `None` for unknown names (caller should error).
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "joi" => Some(SchemaDialect::Joi),
            "json" => Some(SchemaDialect::Json),
            "json-draft-04" => Some(SchemaDialect::JsonDraft04),
            "json-draft-2019-09" => Some(SchemaDialect::JsonDraft2019_09),
            "open-api" => Some(SchemaDialect::OpenApi),
            _ => None,
        }
    }

    /// The CLI name for this dialect.
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaDialect::Joi => "joi",
            SchemaDialect::Json => "json",
            SchemaDialect::JsonDraft04 => "json-draft-04",
            SchemaDialect::JsonDraft2019_09 => "json-draft-2019-09",
            SchemaDialect::OpenApi => "open-api",
        }
    }

    /// Whether this dialect is one of the JSON Schema flavors.
    pub fn is_json_flavor(&self) -> bool {
        !matches!(self, SchemaDialect::Joi)
    }

    /// The `$schema` URI emitted at the document root, if the dialect
    /// declares one. OpenAPI schema objects carry no `$schema`.
    pub fn schema_uri(&self) -> Option<&'static str> {
        match self {
            SchemaDialect::Json => Some("https://json-schema.org/draft/2020-12/schema"),
            SchemaDialect::JsonDraft04 => Some("http://json-schema.org/draft-04/schema#"),
            SchemaDialect::JsonDraft2019_09 => Some("https://json-schema.org/draft/2019-09/schema"),
            SchemaDialect::Joi | SchemaDialect::OpenApi => None,
        }
    }
}

impl std::fmt::Display for SchemaDialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
