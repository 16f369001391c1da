//! Shared types for the cereal marshalling crates.
//!
//! This crate defines the closed set of field type tags and the serializable
//! metadata view of a structure schema.

pub mod field;
pub mod types;

pub use field::{FieldInfo, LayoutError, SchemaInfo};
pub use types::{FieldType, TagError};
