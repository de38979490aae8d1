//! Error types for the schema-cpp-gen crate.

use std::path::PathBuf;

/// Errors that can occur while resolving a schema or generating C++.
///
/// Every resolution error names the definition (or property) being resolved
/// when the failure was detected.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A `type` value outside the supported subset.
    #[error("definition '{name}': unsupported type '{type_name}'")]
    UnsupportedType { name: String, type_name: String },

    /// A schema node with none of `$ref`, `type` or `enum`.
    #[error("definition '{name}': schema has none of `$ref`, `type` or `enum`")]
    UnrecognizedField { name: String },

    /// A `$ref` that does not point into the document's own `definitions`.
    #[error("definition '{name}': malformed reference '{reference}'")]
    MalformedRef { name: String, reference: String },

    /// An `enum` listing a value that is not a string.
    #[error("definition '{name}': unsupported enum value {value}")]
    UnsupportedEnumValue { name: String, value: String },

    /// An `array` schema without `items`.
    #[error("definition '{name}': array type has no `items`")]
    MissingItems { name: String },

    /// Code emission error.
    #[error("codegen error: {0}")]
    Codegen(String),

    /// Failed to write a generated artifact.
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to read a file from disk.
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// JSON parse error with context.
    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
