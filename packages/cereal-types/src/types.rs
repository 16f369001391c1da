//! Field type tags.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned by the strict tag conversion.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TagError {
    /// The tag is outside the known tag range.
    #[error("unknown field type tag {0}")]
    Unknown(u32),
}

/// Field types a schema can declare.
///
/// Each known variant carries a stable numeric tag so that schema tables
/// produced by external generators keep their meaning. Tags outside the
/// known range are preserved as [`FieldType::Unrecognized`] instead of being
/// rejected; the marshalling walks skip such fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    /// 32-bit signed integer
    Integer32,
    /// 32-bit floating point number
    Float32,
    /// Owned UTF-8 text, possibly absent
    Utf8String,
    /// Owned reference to a child structure, possibly absent
    NestedStruct,
    /// Boolean flag (1 byte)
    Boolean,
    /// 64-bit signed integer
    Integer64,
    /// 64-bit floating point number
    Float64,
    /// Enumeration stored as a 32-bit signed discriminant
    Enum,
    /// Tag this crate does not know how to handle
    Unrecognized(u32),
}

impl FieldType {
    /// All known variants in tag order.
    pub const KNOWN: [FieldType; 8] = [
        FieldType::Integer32,
        FieldType::Float32,
        FieldType::Utf8String,
        FieldType::NestedStruct,
        FieldType::Boolean,
        FieldType::Integer64,
        FieldType::Float64,
        FieldType::Enum,
    ];

    /// Returns the numeric tag of this type.
    pub fn tag(&self) -> u32 {
        match self {
            FieldType::Integer32 => 0,
            FieldType::Float32 => 1,
            FieldType::Utf8String => 2,
            FieldType::NestedStruct => 3,
            FieldType::Boolean => 4,
            FieldType::Integer64 => 5,
            FieldType::Float64 => 6,
            FieldType::Enum => 7,
            FieldType::Unrecognized(tag) => *tag,
        }
    }

    /// Decodes a numeric tag, keeping unknown tags as `Unrecognized`.
    pub fn from_tag(tag: u32) -> Self {
        Self::KNOWN
            .get(tag as usize)
            .copied()
            .unwrap_or(FieldType::Unrecognized(tag))
    }

    /// Returns `true` unless this is an `Unrecognized` tag.
    pub fn is_known(&self) -> bool {
        !matches!(self, FieldType::Unrecognized(_))
    }
}

impl TryFrom<u32> for FieldType {
    type Error = TagError;

    fn try_from(tag: u32) -> Result<Self, Self::Error> {
        match FieldType::from_tag(tag) {
            FieldType::Unrecognized(tag) => Err(TagError::Unknown(tag)),
            known => Ok(known),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Integer32 => write!(f, "int"),
            FieldType::Float32 => write!(f, "float"),
            FieldType::Utf8String => write!(f, "string"),
            FieldType::NestedStruct => write!(f, "struct"),
            FieldType::Boolean => write!(f, "bool"),
            FieldType::Integer64 => write!(f, "long"),
            FieldType::Float64 => write!(f, "double"),
            FieldType::Enum => write!(f, "enum"),
            FieldType::Unrecognized(tag) => write!(f, "unknown({tag})"),
        }
    }
}
