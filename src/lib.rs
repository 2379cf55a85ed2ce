//! JSON Schema / Joi-style validator description transcoder.
//!
//! This library converts JSON-Schema-shaped documents into equivalent
//! validator-schema descriptions and back. The forward direction resolves
//! every internal `#/definitions/...` reference, then walks the resolved
//! tree node-by-node into a [`Descriptor`]; the reverse direction compiles a
//! structural description and re-emits it as a JSON Schema document in a
//! selectable dialect.
//!
//! # Example
//!
//! ```
//! use joi_schema::{transcode, SchemaDialect};
//! use serde_json::json;
//!
//! let document = json!({
//!     "type": "object",
//!     "properties": {
//!         "name": { "type": "string" },
//!         "age": { "type": "integer", "minimum": 0 }
//!     },
//!     "required": ["name"]
//! });
//!
//! let described = transcode(&document, SchemaDialect::Json, SchemaDialect::Joi).unwrap();
//!
//! // "name" carries the mandatory presence flag; "age" does not.
//! assert_eq!(described["keys"]["name"]["flags"]["presence"], "required");
//! assert!(described["keys"]["age"].get("flags").is_none());
//! ```
//!
//! # Reference resolution
//!
//! A source document may point into its own top-level `definitions` section
//! with `#/definitions/<name>` pointers. Resolution produces a new tree with
//! every pointer replaced by its (recursively resolved) definition; an
//! unresolvable pointer or a definition cycle aborts the conversion.

mod converter;
mod descriptor;
mod error;
mod loader;
mod resolver;
mod transcode;
mod types;

pub use converter::convert;
pub use descriptor::Descriptor;
pub use error::{ConvertError, DescribeError, Error, LoadError, PersistError, ResolveError};
pub use loader::{is_url, load_schema, load_schema_auto, load_schema_str};
pub use resolver::{definitions_table, resolve, resolve_document};
pub use transcode::{save_description, transcode};
pub use types::SchemaDialect;

#[cfg(feature = "remote")]
pub use loader::load_schema_url;
