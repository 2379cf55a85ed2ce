//! The validator-schema vocabulary.
//!
//! [`Descriptor`] is the target of forward conversion and the source of the
//! reverse direction. It is a closed set of schema kinds with a presence
//! flag layered on by the parent object. Three representations hang off it:
//!
//! - [`Descriptor::describe`] - the canonical structural JSON description
//!   (Joi `describe()` shaped), which is what gets persisted;
//! - [`Descriptor::from_describe`] - compiles a description document back
//!   into a descriptor;
//! - [`Descriptor::to_json_schema`] - re-emits the descriptor as a JSON
//!   Schema document in a selectable dialect.
//!
//! [`Descriptor::compile`] produces a live validator for instance checks.

use indexmap::IndexMap;
use serde_json::{json, Map, Value};

use crate::error::DescribeError;
use crate::types::{json_type_name, SchemaDialect};

/// One node of a validator-schema description.
#[derive(Debug, Clone, PartialEq)]
pub struct Descriptor {
    kind: Kind,
    required: bool,
}

#[derive(Debug, Clone, PartialEq)]
enum Kind {
    Object {
        keys: IndexMap<String, Descriptor>,
    },
    Array {
        items: Option<Box<Descriptor>>,
    },
    String {
        min_length: Option<u64>,
        max_length: Option<u64>,
        pattern: Option<String>,
    },
    Number {
        integer: bool,
        minimum: Option<f64>,
        maximum: Option<f64>,
    },
    Boolean,
    Null,
}

impl Descriptor {
    /// An object schema accepting any object.
    pub fn object() -> Self {
        Self::new(Kind::Object {
            keys: IndexMap::new(),
        })
    }

    /// An array schema accepting any array.
    pub fn array() -> Self {
        Self::new(Kind::Array { items: None })
    }

    /// An unconstrained string schema.
    pub fn string() -> Self {
        Self::new(Kind::String {
            min_length: None,
            max_length: None,
            pattern: None,
        })
    }

    /// An unconstrained number schema.
    pub fn number() -> Self {
        Self::new(Kind::Number {
            integer: false,
            minimum: None,
            maximum: None,
        })
    }

    /// A boolean schema.
    pub fn boolean() -> Self {
        Self::new(Kind::Boolean)
    }

    /// A schema accepting exactly the literal `null`.
    pub fn null() -> Self {
        Self::new(Kind::Null)
    }

    fn new(kind: Kind) -> Self {
        Self {
            kind,
            required: false,
        }
    }

    /// Attach named key schemas to an object descriptor.
    ///
    /// No-op on other kinds.
    pub fn keys(mut self, keys: IndexMap<String, Descriptor>) -> Self {
        if let Kind::Object { keys: k } = &mut self.kind {
            *k = keys;
        }
        self
    }

    /// Attach an item schema to an array descriptor.
    pub fn items(mut self, item: Descriptor) -> Self {
        if let Kind::Array { items } = &mut self.kind {
            *items = Some(Box::new(item));
        }
        self
    }

    /// Apply a minimum-length constraint to a string descriptor.
    pub fn min_length(mut self, limit: u64) -> Self {
        if let Kind::String { min_length, .. } = &mut self.kind {
            *min_length = Some(limit);
        }
        self
    }

    /// Apply a maximum-length constraint to a string descriptor.
    pub fn max_length(mut self, limit: u64) -> Self {
        if let Kind::String { max_length, .. } = &mut self.kind {
            *max_length = Some(limit);
        }
        self
    }

    /// Apply a pattern constraint to a string descriptor.
    pub fn pattern(mut self, source: impl Into<String>) -> Self {
        if let Kind::String { pattern, .. } = &mut self.kind {
            *pattern = Some(source.into());
        }
        self
    }

    /// Constrain a number descriptor to integers.
    pub fn integer(mut self) -> Self {
        if let Kind::Number { integer, .. } = &mut self.kind {
            *integer = true;
        }
        self
    }

    /// Apply a minimum bound to a number descriptor.
    pub fn minimum(mut self, bound: f64) -> Self {
        if let Kind::Number { minimum, .. } = &mut self.kind {
            *minimum = Some(bound);
        }
        self
    }

    /// Apply a maximum bound to a number descriptor.
    pub fn maximum(mut self, bound: f64) -> Self {
        if let Kind::Number { maximum, .. } = &mut self.kind {
            *maximum = Some(bound);
        }
        self
    }

    /// Mark this schema as mandatory within its parent object.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Whether this schema carries the mandatory presence flag.
    pub fn is_required(&self) -> bool {
        self.required
    }

    // --- describe ---

    /// Produce the canonical structural description of this descriptor.
    pub fn describe(&self) -> Value {
        let mut doc = Map::new();

        match &self.kind {
            Kind::Object { keys } => {
                doc.insert("type".into(), json!("object"));
                if !keys.is_empty() {
                    let mut described = Map::new();
                    for (name, child) in keys {
                        described.insert(name.clone(), child.describe());
                    }
                    doc.insert("keys".into(), Value::Object(described));
                }
            }
            Kind::Array { items } => {
                doc.insert("type".into(), json!("array"));
                if let Some(item) = items {
                    doc.insert("items".into(), json!([item.describe()]));
                }
            }
            Kind::String {
                min_length,
                max_length,
                pattern,
            } => {
                doc.insert("type".into(), json!("string"));
                let mut rules = Vec::new();
                if let Some(limit) = min_length {
                    rules.push(json!({ "name": "min", "args": { "limit": limit } }));
                }
                if let Some(limit) = max_length {
                    rules.push(json!({ "name": "max", "args": { "limit": limit } }));
                }
                if let Some(source) = pattern {
                    rules.push(json!({ "name": "pattern", "args": { "regex": source } }));
                }
                if !rules.is_empty() {
                    doc.insert("rules".into(), Value::Array(rules));
                }
            }
            Kind::Number {
                integer,
                minimum,
                maximum,
            } => {
                doc.insert("type".into(), json!("number"));
                let mut rules = Vec::new();
                if *integer {
                    rules.push(json!({ "name": "integer" }));
                }
                if let Some(bound) = minimum {
                    rules.push(json!({ "name": "min", "args": { "limit": number_value(*bound) } }));
                }
                if let Some(bound) = maximum {
                    rules.push(json!({ "name": "max", "args": { "limit": number_value(*bound) } }));
                }
                if !rules.is_empty() {
                    doc.insert("rules".into(), Value::Array(rules));
                }
            }
            Kind::Boolean => {
                doc.insert("type".into(), json!("boolean"));
            }
            Kind::Null => {
                doc.insert("type".into(), json!("any"));
                doc.insert("flags".into(), json!({ "only": true }));
                doc.insert("allow".into(), json!([null]));
            }
        }

        if self.required {
            let flags = doc
                .entry("flags".to_string())
                .or_insert_with(|| json!({}));
            flags["presence"] = json!("required");
        }

        Value::Object(doc)
    }

    // --- compile (reverse direction) ---

    /// Compile a structural description document back into a descriptor.
    ///
    /// Accepts the output of [`Descriptor::describe`], including pattern
    /// sources wrapped in `/` delimiters as real Joi emits them.
    ///
    /// # Errors
    ///
    /// Returns `DescribeError::InvalidDescription` for structurally malformed
    /// documents and `DescribeError::UnknownType` for an unrecognized `type`.
    pub fn from_describe(doc: &Value) -> Result<Self, DescribeError> {
        let Some(map) = doc.as_object() else {
            return Err(DescribeError::InvalidDescription {
                message: format!("expected an object, got {}", json_type_name(doc)),
            });
        };

        let type_name = map
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| DescribeError::InvalidDescription {
                message: "description is missing the \"type\" field".to_string(),
            })?;

        let mut descriptor = match type_name {
            "object" => compile_object(map)?,
            "array" => compile_array(map)?,
            "string" => compile_string(map)?,
            "number" => compile_number(map)?,
            "boolean" => Descriptor::boolean(),
            "any" => compile_any(map)?,
            other => {
                return Err(DescribeError::UnknownType {
                    type_name: other.to_string(),
                })
            }
        };

        let presence = map
            .get("flags")
            .and_then(|flags| flags.get("presence"))
            .and_then(Value::as_str);
        if presence == Some("required") {
            descriptor = descriptor.required();
        }

        Ok(descriptor)
    }

    /// Produce a live validator for this descriptor.
    ///
    /// The validator is compiled from the current-draft JSON Schema
    /// re-emission.
    pub fn compile(&self) -> Result<jsonschema::Validator, DescribeError> {
        let schema = self.to_json_schema(SchemaDialect::Json);
        jsonschema::validator_for(&schema).map_err(|e| DescribeError::Compile {
            message: e.to_string(),
        })
    }

    // --- re-emission ---

    /// Re-emit this descriptor as a JSON Schema document in the given
    /// dialect.
    ///
    /// The dialects differ in the `$schema` declaration at the root and in
    /// how the literal-null schema is rendered (`{"type": "null"}` for the
    /// drafts, `nullable` for OpenAPI). Passing `SchemaDialect::Joi` yields
    /// the bare current-draft body with no `$schema`.
    pub fn to_json_schema(&self, dialect: SchemaDialect) -> Value {
        let body = self.emit(dialect);

        match dialect.schema_uri() {
            Some(uri) => {
                let mut doc = Map::new();
                doc.insert("$schema".into(), json!(uri));
                if let Value::Object(map) = body {
                    doc.extend(map);
                }
                Value::Object(doc)
            }
            None => body,
        }
    }

    fn emit(&self, dialect: SchemaDialect) -> Value {
        match &self.kind {
            Kind::Object { keys } => {
                let mut doc = Map::new();
                doc.insert("type".into(), json!("object"));
                if !keys.is_empty() {
                    let mut properties = Map::new();
                    let mut required = Vec::new();
                    for (name, child) in keys {
                        properties.insert(name.clone(), child.emit(dialect));
                        if child.required {
                            required.push(json!(name));
                        }
                    }
                    doc.insert("properties".into(), Value::Object(properties));
                    if !required.is_empty() {
                        doc.insert("required".into(), Value::Array(required));
                    }
                }
                Value::Object(doc)
            }
            Kind::Array { items } => {
                let mut doc = Map::new();
                doc.insert("type".into(), json!("array"));
                if let Some(item) = items {
                    doc.insert("items".into(), item.emit(dialect));
                }
                Value::Object(doc)
            }
            Kind::String {
                min_length,
                max_length,
                pattern,
            } => {
                let mut doc = Map::new();
                doc.insert("type".into(), json!("string"));
                if let Some(limit) = min_length {
                    doc.insert("minLength".into(), json!(limit));
                }
                if let Some(limit) = max_length {
                    doc.insert("maxLength".into(), json!(limit));
                }
                if let Some(source) = pattern {
                    doc.insert("pattern".into(), json!(source));
                }
                Value::Object(doc)
            }
            Kind::Number {
                integer,
                minimum,
                maximum,
            } => {
                let mut doc = Map::new();
                doc.insert(
                    "type".into(),
                    json!(if *integer { "integer" } else { "number" }),
                );
                if let Some(bound) = minimum {
                    doc.insert("minimum".into(), number_value(*bound));
                }
                if let Some(bound) = maximum {
                    doc.insert("maximum".into(), number_value(*bound));
                }
                Value::Object(doc)
            }
            Kind::Boolean => json!({ "type": "boolean" }),
            Kind::Null => match dialect {
                SchemaDialect::OpenApi => json!({ "enum": [null], "nullable": true }),
                _ => json!({ "type": "null" }),
            },
        }
    }
}

/// Render a bound as an integer when it is integral, keeping emitted
/// schemas free of `0.0`-style literals.
fn number_value(bound: f64) -> Value {
    if bound.fract() == 0.0 && bound.abs() < i64::MAX as f64 {
        json!(bound as i64)
    } else {
        json!(bound)
    }
}

fn compile_object(map: &Map<String, Value>) -> Result<Descriptor, DescribeError> {
    let mut descriptor = Descriptor::object();

    if let Some(keys) = map.get("keys") {
        let Some(keys) = keys.as_object() else {
            return Err(DescribeError::InvalidDescription {
                message: format!("\"keys\" must be an object, got {}", json_type_name(keys)),
            });
        };

        let mut compiled = IndexMap::with_capacity(keys.len());
        for (name, child) in keys {
            compiled.insert(name.clone(), Descriptor::from_describe(child)?);
        }
        descriptor = descriptor.keys(compiled);
    }

    Ok(descriptor)
}

fn compile_array(map: &Map<String, Value>) -> Result<Descriptor, DescribeError> {
    let mut descriptor = Descriptor::array();

    if let Some(items) = map.get("items") {
        let Some(items) = items.as_array() else {
            return Err(DescribeError::InvalidDescription {
                message: format!("\"items\" must be an array, got {}", json_type_name(items)),
            });
        };
        if items.len() > 1 {
            return Err(DescribeError::InvalidDescription {
                message: "multiple item schemas are not supported".to_string(),
            });
        }
        if let Some(item) = items.first() {
            descriptor = descriptor.items(Descriptor::from_describe(item)?);
        }
    }

    Ok(descriptor)
}

fn compile_string(map: &Map<String, Value>) -> Result<Descriptor, DescribeError> {
    let mut descriptor = Descriptor::string();

    for rule in rules(map) {
        let name = rule_name(rule)?;
        match name {
            "min" => descriptor = descriptor.min_length(limit_arg(rule)?),
            "max" => descriptor = descriptor.max_length(limit_arg(rule)?),
            "pattern" => {
                let source = rule
                    .get("args")
                    .and_then(|args| args.get("regex"))
                    .and_then(Value::as_str)
                    .ok_or_else(|| DescribeError::InvalidDescription {
                        message: "pattern rule is missing its \"regex\" argument".to_string(),
                    })?;
                descriptor = descriptor.pattern(strip_regex_delimiters(source));
            }
            other => {
                return Err(DescribeError::InvalidDescription {
                    message: format!("unsupported string rule: {other}"),
                })
            }
        }
    }

    Ok(descriptor)
}

fn compile_number(map: &Map<String, Value>) -> Result<Descriptor, DescribeError> {
    let mut descriptor = Descriptor::number();

    for rule in rules(map) {
        let name = rule_name(rule)?;
        match name {
            "integer" => descriptor = descriptor.integer(),
            "min" => descriptor = descriptor.minimum(bound_arg(rule)?),
            "max" => descriptor = descriptor.maximum(bound_arg(rule)?),
            other => {
                return Err(DescribeError::InvalidDescription {
                    message: format!("unsupported number rule: {other}"),
                })
            }
        }
    }

    Ok(descriptor)
}

/// A `type: "any"` description is only meaningful as the literal-null
/// schema: `flags.only` with an `allow` list of exactly `[null]`.
fn compile_any(map: &Map<String, Value>) -> Result<Descriptor, DescribeError> {
    let only = map
        .get("flags")
        .and_then(|flags| flags.get("only"))
        .and_then(Value::as_bool)
        .unwrap_or(false);
    let allows_null = map
        .get("allow")
        .and_then(Value::as_array)
        .is_some_and(|allow| allow.len() == 1 && allow[0].is_null());

    if only && allows_null {
        Ok(Descriptor::null())
    } else {
        Err(DescribeError::InvalidDescription {
            message: "\"any\" descriptions are only supported as literal null".to_string(),
        })
    }
}

fn rules(map: &Map<String, Value>) -> impl Iterator<Item = &Value> {
    map.get("rules")
        .and_then(Value::as_array)
        .map(|arr| arr.iter())
        .into_iter()
        .flatten()
}

fn rule_name(rule: &Value) -> Result<&str, DescribeError> {
    rule.get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| DescribeError::InvalidDescription {
            message: "rule is missing its \"name\" field".to_string(),
        })
}

fn limit_arg(rule: &Value) -> Result<u64, DescribeError> {
    rule.get("args")
        .and_then(|args| args.get("limit"))
        .and_then(Value::as_u64)
        .ok_or_else(|| DescribeError::InvalidDescription {
            message: "rule is missing a non-negative integer \"limit\"".to_string(),
        })
}

fn bound_arg(rule: &Value) -> Result<f64, DescribeError> {
    rule.get("args")
        .and_then(|args| args.get("limit"))
        .and_then(Value::as_f64)
        .ok_or_else(|| DescribeError::InvalidDescription {
            message: "rule is missing a numeric \"limit\"".to_string(),
        })
}

/// Joi renders pattern sources as `/source/`; accept both delimited and
/// bare forms.
fn strip_regex_delimiters(source: &str) -> &str {
    source
        .strip_prefix('/')
        .and_then(|s| s.strip_suffix('/'))
        .unwrap_or(source)
}

#[cfg(test)]
mod tests {
    use super::*;

    // === Describe Tests ===

    #[test]
    fn describe_object_with_required_key() {
        let descriptor = Descriptor::object().keys(IndexMap::from([
            ("name".to_string(), Descriptor::string().required()),
            ("age".to_string(), Descriptor::number().integer()),
        ]));

        let described = descriptor.describe();
        assert_eq!(described["type"], "object");
        assert_eq!(described["keys"]["name"]["type"], "string");
        assert_eq!(described["keys"]["name"]["flags"]["presence"], "required");
        assert_eq!(
            described["keys"]["age"]["rules"],
            json!([{ "name": "integer" }])
        );
    }

    #[test]
    fn describe_empty_object_has_no_keys() {
        let described = Descriptor::object().describe();
        assert_eq!(described, json!({ "type": "object" }));
    }

    #[test]
    fn describe_string_rules() {
        let described = Descriptor::string()
            .min_length(3)
            .max_length(10)
            .pattern("^a")
            .describe();

        assert_eq!(
            described["rules"],
            json!([
                { "name": "min", "args": { "limit": 3 } },
                { "name": "max", "args": { "limit": 10 } },
                { "name": "pattern", "args": { "regex": "^a" } }
            ])
        );
    }

    #[test]
    fn describe_null_is_only_allow_null() {
        let described = Descriptor::null().describe();
        assert_eq!(
            described,
            json!({ "type": "any", "flags": { "only": true }, "allow": [null] })
        );
    }

    #[test]
    fn describe_required_null_merges_flags() {
        let described = Descriptor::null().required().describe();
        assert_eq!(described["flags"]["only"], json!(true));
        assert_eq!(described["flags"]["presence"], json!("required"));
    }

    #[test]
    fn describe_array_items() {
        let described = Descriptor::array().items(Descriptor::boolean()).describe();
        assert_eq!(described["items"], json!([{ "type": "boolean" }]));
    }

    // === from_describe Tests ===

    #[test]
    fn from_describe_round_trips() {
        let descriptor = Descriptor::object().keys(IndexMap::from([
            (
                "name".to_string(),
                Descriptor::string().min_length(1).required(),
            ),
            ("age".to_string(), Descriptor::number().integer().minimum(0.0)),
            (
                "tags".to_string(),
                Descriptor::array().items(Descriptor::string()),
            ),
            ("gone".to_string(), Descriptor::null()),
        ]));

        let compiled = Descriptor::from_describe(&descriptor.describe()).unwrap();
        assert_eq!(compiled, descriptor);
    }

    #[test]
    fn from_describe_accepts_delimited_pattern() {
        let doc = json!({
            "type": "string",
            "rules": [{ "name": "pattern", "args": { "regex": "/^a/" } }]
        });
        let compiled = Descriptor::from_describe(&doc).unwrap();
        assert_eq!(compiled, Descriptor::string().pattern("^a"));
    }

    #[test]
    fn from_describe_unknown_type_fails() {
        let result = Descriptor::from_describe(&json!({ "type": "symbol" }));
        assert!(matches!(
            result,
            Err(DescribeError::UnknownType { type_name }) if type_name == "symbol"
        ));
    }

    #[test]
    fn from_describe_missing_type_fails() {
        let result = Descriptor::from_describe(&json!({ "keys": {} }));
        assert!(matches!(result, Err(DescribeError::InvalidDescription { .. })));
    }

    #[test]
    fn from_describe_non_object_fails() {
        let result = Descriptor::from_describe(&json!("string"));
        assert!(matches!(result, Err(DescribeError::InvalidDescription { .. })));
    }

    #[test]
    fn from_describe_plain_any_fails() {
        let result = Descriptor::from_describe(&json!({ "type": "any" }));
        assert!(matches!(result, Err(DescribeError::InvalidDescription { .. })));
    }

    // === Re-emission Tests ===

    #[test]
    fn to_json_schema_current_draft() {
        let descriptor = Descriptor::object().keys(IndexMap::from([(
            "name".to_string(),
            Descriptor::string().required(),
        )]));

        let schema = descriptor.to_json_schema(SchemaDialect::Json);
        assert_eq!(
            schema["$schema"],
            "https://json-schema.org/draft/2020-12/schema"
        );
        assert_eq!(schema["properties"]["name"], json!({ "type": "string" }));
        assert_eq!(schema["required"], json!(["name"]));
    }

    #[test]
    fn to_json_schema_draft_04_uri() {
        let schema = Descriptor::boolean().to_json_schema(SchemaDialect::JsonDraft04);
        assert_eq!(schema["$schema"], "http://json-schema.org/draft-04/schema#");
        assert_eq!(schema["type"], "boolean");
    }

    #[test]
    fn to_json_schema_openapi_null() {
        let schema = Descriptor::null().to_json_schema(SchemaDialect::OpenApi);
        assert_eq!(schema, json!({ "enum": [null], "nullable": true }));
        assert!(schema.get("$schema").is_none());
    }

    #[test]
    fn to_json_schema_draft_null() {
        let schema = Descriptor::null().to_json_schema(SchemaDialect::JsonDraft2019_09);
        assert_eq!(schema["type"], "null");
        assert_eq!(
            schema["$schema"],
            "https://json-schema.org/draft/2019-09/schema"
        );
    }

    #[test]
    fn to_json_schema_integral_bounds_stay_integers() {
        let schema = Descriptor::number()
            .integer()
            .minimum(0.0)
            .to_json_schema(SchemaDialect::Json);
        assert_eq!(schema["type"], "integer");
        assert_eq!(schema["minimum"], json!(0));
    }

    // === Compile (instance-level) Tests ===

    #[test]
    fn compiled_string_constraints_reject_out_of_range() {
        let validator = Descriptor::string()
            .min_length(3)
            .max_length(10)
            .pattern("^a")
            .compile()
            .unwrap();

        assert!(validator.is_valid(&json!("abcd")));
        assert!(!validator.is_valid(&json!("")));
        assert!(!validator.is_valid(&json!("a2345678901")));
        assert!(!validator.is_valid(&json!("bcdef")));
    }

    #[test]
    fn compiled_integer_minimum_zero() {
        let validator = Descriptor::number().integer().minimum(0.0).compile().unwrap();

        assert!(validator.is_valid(&json!(0)));
        assert!(validator.is_valid(&json!(7)));
        assert!(!validator.is_valid(&json!(-1)));
        assert!(!validator.is_valid(&json!(1.5)));
    }

    #[test]
    fn compiled_null_accepts_only_null() {
        let validator = Descriptor::null().compile().unwrap();

        assert!(validator.is_valid(&json!(null)));
        assert!(!validator.is_valid(&json!(0)));
        assert!(!validator.is_valid(&json!("")));
        assert!(!validator.is_valid(&json!(false)));
    }

    #[test]
    fn compiled_object_enforces_required_keys() {
        let validator = Descriptor::object()
            .keys(IndexMap::from([
                ("name".to_string(), Descriptor::string().required()),
                (
                    "age".to_string(),
                    Descriptor::number().integer().minimum(0.0),
                ),
            ]))
            .compile()
            .unwrap();

        assert!(validator.is_valid(&json!({ "name": "Al" })));
        assert!(validator.is_valid(&json!({ "name": "Al", "age": 5 })));
        assert!(!validator.is_valid(&json!({ "age": 5 })));
        assert!(!validator.is_valid(&json!({ "name": "Al", "age": -2 })));
    }
}
