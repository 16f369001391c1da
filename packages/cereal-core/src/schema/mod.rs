//! Structure schemas: field layout, typed accessors and the schema registry.

mod builder;
mod field;
pub mod registry;

use std::any::{Any, TypeId};
use std::fmt;

use cereal_types::SchemaInfo;

pub use builder::SchemaBuilder;
pub(crate) use field::FieldAccessor;
pub use field::FieldDescriptor;
pub use registry::{SchemaRegistry, SchemaRegistryBuilder};

/// Immutable description of one structure type.
///
/// Built once with [`SchemaBuilder`], then shared by reference (`Arc` or
/// `&'static`) with every marshal and unmarshal call. Child schemas must be
/// built before their parents, so the schema graph is always acyclic.
pub struct StructSchema {
    name: String,
    size: usize,
    type_id: TypeId,
    type_name: &'static str,
    fields: Vec<FieldDescriptor>,
    construct: fn() -> Box<dyn Any>,
}

impl fmt::Debug for StructSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StructSchema")
            .field("name", &self.name)
            .field("size", &self.size)
            .field("type_name", &self.type_name)
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}

impl StructSchema {
    /// Returns the schema name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the byte size of one instance.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns the fields in declaration order.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Returns the field with the given JSON key.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name() == name)
    }

    /// Returns the `TypeId` of the described Rust type.
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Returns the name of the described Rust type.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns `true` if this schema describes `T`.
    pub fn describes<T: Any>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    /// Returns the serializable metadata of this schema.
    pub fn describe(&self) -> SchemaInfo {
        SchemaInfo {
            name: self.name.clone(),
            size: self.size,
            fields: self.fields.iter().map(FieldDescriptor::info).collect(),
        }
    }

    /// Allocates a zero instance of the described type.
    pub(crate) fn instantiate(&self) -> Box<dyn Any> {
        (self.construct)()
    }
}
