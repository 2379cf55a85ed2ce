//! Error types for schema loading, resolution, conversion, and persistence.

use std::path::PathBuf;
use thiserror::Error;

use crate::types::SchemaDialect;

/// Errors while obtaining the source schema document.
#[derive(Debug, Error)]
pub enum LoadError {
    // IO errors (exit code 3)
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[cfg(feature = "remote")]
    #[error("failed to fetch {url}: {source}")]
    NetworkError {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to fetch {url}: {status}")]
    HttpStatus { url: String, status: String },

    // Parse errors (exit code 2)
    #[error("invalid JSON: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },
}

/// Errors during reference resolution.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("invalid reference: {pointer}")]
    InvalidReference { pointer: String },

    #[error("circular reference: {pointer}")]
    CircularReference { pointer: String },
}

/// Errors during JSON Schema to descriptor conversion.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("invalid JSON schema: {message}")]
    InvalidSchema { message: String },

    #[error("unsupported JSON schema type: {type_name}")]
    UnsupportedType { type_name: String },
}

/// Errors compiling a structural description back into a descriptor.
#[derive(Debug, Error)]
pub enum DescribeError {
    #[error("invalid schema description: {message}")]
    InvalidDescription { message: String },

    #[error("unknown description type: {type_name}")]
    UnknownType { type_name: String },

    #[error("failed to compile validator: {message}")]
    Compile { message: String },
}

/// Errors writing the converted result to a file.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot serialize output: {source}")]
    Serialize {
        #[source]
        source: serde_json::Error,
    },
}

/// Unifying error for the full transcoding pipeline.
///
/// Stage errors pass through transparently so programmatic callers can still
/// match on the specific kind.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Convert(#[from] ConvertError),

    #[error(transparent)]
    Describe(#[from] DescribeError),

    #[error(transparent)]
    Persist(#[from] PersistError),

    #[error("unknown conversion type: {source_type} -> {output_type}")]
    UnknownConversion {
        source_type: SchemaDialect,
        output_type: SchemaDialect,
    },
}

impl LoadError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            LoadError::FileNotFound { .. } | LoadError::ReadError { .. } => 3,
            #[cfg(feature = "remote")]
            LoadError::NetworkError { .. } => 3,
            LoadError::HttpStatus { .. } => 3,
            LoadError::InvalidJson { .. } => 2,
        }
    }
}

impl Error {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Load(e) => e.exit_code(),
            Error::Persist(_) => 3,
            _ => 2,
        }
    }
}
