//! Serializable metadata describing a structure schema.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::FieldType;

/// Layout errors detected when checking schema metadata.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// The field does not fit inside the structure.
    #[error(
        "field '{field}' (offset={offset}, width={width}) exceeds size {size} of struct '{schema}'"
    )]
    FieldExceedsStructSize {
        /// Schema name.
        schema: String,
        /// Field name.
        field: String,
        /// Field offset.
        offset: usize,
        /// Field width.
        width: usize,
        /// Structure size.
        size: usize,
    },

    /// `offset + width` overflows `usize`.
    #[error("field '{field}' end offset overflows in struct '{schema}'")]
    OffsetOverflow {
        /// Schema name.
        schema: String,
        /// Field name.
        field: String,
    },

    /// Two fields share a JSON key.
    #[error("field '{field}' declared twice in struct '{schema}'")]
    DuplicateField {
        /// Schema name.
        schema: String,
        /// Field name.
        field: String,
    },
}

/// Metadata for one field of a schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldInfo {
    /// JSON key of the field.
    pub name: String,
    /// Byte offset of the field within the owning structure.
    pub offset: usize,
    /// Byte width of the field's storage.
    pub width: usize,
    /// Declared type.
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Name of the child schema, present for nested structures only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child: Option<String>,
}

impl FieldInfo {
    /// Returns the end offset (offset + width), or `None` on overflow.
    pub fn end_offset_checked(&self) -> Option<usize> {
        self.offset.checked_add(self.width)
    }
}

/// Metadata for a whole schema.
///
/// This is a plain data view; it can be printed, compared against an
/// expected layout, or stored next to generated schema tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaInfo {
    /// Schema name.
    pub name: String,
    /// Byte size of one instance.
    pub size: usize,
    /// Fields in declaration order.
    pub fields: Vec<FieldInfo>,
}

impl SchemaInfo {
    /// Checks that every field lies within `size` and that no key repeats.
    pub fn check_layout(&self) -> Result<(), LayoutError> {
        let mut seen = HashSet::with_capacity(self.fields.len());

        for field in &self.fields {
            if !seen.insert(field.name.as_str()) {
                return Err(LayoutError::DuplicateField {
                    schema: self.name.clone(),
                    field: field.name.clone(),
                });
            }

            let end = field
                .end_offset_checked()
                .ok_or_else(|| LayoutError::OffsetOverflow {
                    schema: self.name.clone(),
                    field: field.name.clone(),
                })?;

            if end > self.size {
                return Err(LayoutError::FieldExceedsStructSize {
                    schema: self.name.clone(),
                    field: field.name.clone(),
                    offset: field.offset,
                    width: field.width,
                    size: self.size,
                });
            }
        }

        Ok(())
    }

    /// Returns the field with the given key.
    pub fn field(&self, name: &str) -> Option<&FieldInfo> {
        self.fields.iter().find(|f| f.name == name)
    }
}
