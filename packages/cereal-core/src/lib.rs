//! Schema-driven JSON marshalling for structures without reflection.
//!
//! A [`StructSchema`] describes one Rust structure: each field's JSON key,
//! type tag, byte offset and typed accessor, plus a child schema for nested
//! structures. The generic walks in this crate use a schema to turn any
//! instance into a JSON document and to build a fresh instance from one.
//! No per-type serialization code is needed.

pub mod codec;
pub mod config;
pub mod error;
mod marshal;
pub mod schema;
mod unmarshal;

pub use cereal_types::{FieldInfo, FieldType, SchemaInfo};
pub use codec::{deserialize, from_document, serialize, to_document, Codec};
pub use config::CodecConfig;
pub use error::{CodecError, SchemaError};
pub use schema::{FieldDescriptor, SchemaBuilder, SchemaRegistry, StructSchema};
