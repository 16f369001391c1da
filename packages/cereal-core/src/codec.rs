//! Typed entry points: text and document in, text and document out.

use std::any::{type_name, Any};

use serde_json::Value;

use crate::config::CodecConfig;
use crate::error::CodecError;
use crate::marshal::marshal_object;
use crate::schema::StructSchema;
use crate::unmarshal::unmarshal_object;

/// Serializer/deserializer bound to a [`CodecConfig`].
///
/// The codec holds no state besides its configuration; one value can be
/// shared across threads and used with any number of schemas.
#[derive(Debug, Clone, Default)]
pub struct Codec {
    config: CodecConfig,
}

impl Codec {
    /// Creates a codec with the given configuration.
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    /// Returns the codec configuration.
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Builds the JSON document for `data`.
    ///
    /// # Errors
    /// `CodecError::SchemaMismatch` if `schema` does not describe `T`.
    pub fn to_document<T: Any>(&self, data: &T, schema: &StructSchema) -> Result<Value, CodecError> {
        check_schema::<T>(schema)?;
        tracing::debug!(schema = %schema.name(), "marshalling instance");
        Ok(Value::Object(marshal_object(data, schema)))
    }

    /// Renders `data` as JSON text. The returned string is owned by the caller.
    ///
    /// # Errors
    /// `CodecError::SchemaMismatch` if `schema` does not describe `T`.
    pub fn serialize<T: Any>(&self, data: &T, schema: &StructSchema) -> Result<String, CodecError> {
        let document = self.to_document(data, schema)?;
        let text = if self.config.pretty {
            serde_json::to_string_pretty(&document)
        } else {
            serde_json::to_string(&document)
        };
        text.map_err(CodecError::Render)
    }

    /// Builds a new `T` from a parsed JSON document.
    ///
    /// # Errors
    /// `CodecError::SchemaMismatch` if `schema` does not describe `T`.
    pub fn from_document<T: Any>(
        &self,
        document: &Value,
        schema: &StructSchema,
    ) -> Result<T, CodecError> {
        check_schema::<T>(schema)?;
        tracing::debug!(schema = %schema.name(), "unmarshalling document");

        let instance = unmarshal_object(document, schema, &self.config);
        instance
            .downcast::<T>()
            .map(|boxed| *boxed)
            .map_err(|_| mismatch::<T>(schema))
    }

    /// Parses `text` and builds a new `T` from it.
    ///
    /// # Errors
    /// `CodecError::Parse` if `text` is not valid JSON (no instance is built),
    /// `CodecError::SchemaMismatch` if `schema` does not describe `T`.
    pub fn deserialize<T: Any>(&self, text: &str, schema: &StructSchema) -> Result<T, CodecError> {
        check_schema::<T>(schema)?;
        let document: Value = serde_json::from_str(text)?;
        self.from_document(&document, schema)
    }
}

/// Renders `data` as compact JSON text.
///
/// # Example
/// ```
/// use std::mem::offset_of;
/// use cereal_core::{schema::SchemaBuilder, serialize};
///
/// #[derive(Default)]
/// struct Person {
///     name: Option<String>,
///     age: i32,
/// }
///
/// let schema = SchemaBuilder::<Person>::new("Person")
///     .string("name", offset_of!(Person, name), |p| p.name.as_deref(), |p, v| p.name = v)
///     .int32("age", offset_of!(Person, age), |p| p.age, |p, v| p.age = v)
///     .build()
///     .unwrap();
///
/// let alice = Person { name: Some("Alice".to_string()), age: 30 };
/// assert_eq!(serialize(&alice, &schema).unwrap(), r#"{"name":"Alice","age":30}"#);
/// ```
pub fn serialize<T: Any>(data: &T, schema: &StructSchema) -> Result<String, CodecError> {
    Codec::default().serialize(data, schema)
}

/// Parses `text` into a new `T` using the default configuration.
pub fn deserialize<T: Any>(text: &str, schema: &StructSchema) -> Result<T, CodecError> {
    Codec::default().deserialize(text, schema)
}

/// Builds the JSON document for `data` without rendering it.
pub fn to_document<T: Any>(data: &T, schema: &StructSchema) -> Result<Value, CodecError> {
    Codec::default().to_document(data, schema)
}

/// Builds a new `T` from a JSON document using the default configuration.
pub fn from_document<T: Any>(document: &Value, schema: &StructSchema) -> Result<T, CodecError> {
    Codec::default().from_document(document, schema)
}

fn check_schema<T: Any>(schema: &StructSchema) -> Result<(), CodecError> {
    if schema.describes::<T>() {
        Ok(())
    } else {
        Err(mismatch::<T>(schema))
    }
}

fn mismatch<T: Any>(schema: &StructSchema) -> CodecError {
    CodecError::SchemaMismatch {
        schema: schema.name().to_string(),
        expected: schema.type_name(),
        got: type_name::<T>(),
    }
}
