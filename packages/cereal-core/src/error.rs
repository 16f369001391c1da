//! Marshalling error types.

use cereal_types::LayoutError;
use thiserror::Error;

/// Errors returned by the serialize and deserialize entry points.
///
/// Per-field problems (unknown types, missing keys, mismatched JSON kinds)
/// are not errors: they are logged and the walk continues.
#[derive(Error, Debug)]
pub enum CodecError {
    /// Input text is not valid JSON. No instance was built.
    #[error("JSON parse failure: {0}")]
    Parse(#[from] serde_json::Error),

    /// Rendering the document to text failed
    #[error("JSON render failure: {0}")]
    Render(#[source] serde_json::Error),

    /// A typed entry point was used with a type the schema does not describe
    #[error("schema '{schema}' describes {expected}, got {got}")]
    SchemaMismatch {
        schema: String,
        expected: &'static str,
        got: &'static str,
    },
}

/// Errors raised while building schemas or the schema registry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// Field layout is inconsistent with the structure
    #[error(transparent)]
    Layout(#[from] LayoutError),

    /// A nested field's child schema describes another type
    #[error("field '{field}' of schema '{schema}' holds {expected}, child schema describes {got}")]
    ChildTypeMismatch {
        schema: String,
        field: String,
        expected: &'static str,
        got: &'static str,
    },

    /// An opaque field was declared with a tag the walks interpret
    #[error("field '{field}' of schema '{schema}' declared opaque with known type tag {tag}")]
    KnownTagDeclaredOpaque {
        schema: String,
        field: String,
        tag: u32,
    },

    /// A different schema is already registered under this name
    #[error("schema '{name}' already registered")]
    AlreadyRegistered { name: String },

    /// The process-wide registry can only be installed once
    #[error("global schema registry already installed")]
    RegistryAlreadyInstalled,
}
