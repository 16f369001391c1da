//! Field descriptors and their typed accessors.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use cereal_types::{FieldInfo, FieldType};

use super::StructSchema;

/// Reads a value of type `V` from an instance. `None` means the instance is
/// not of the type the accessor was built for.
pub(crate) type GetterFn<V> = dyn Fn(&dyn Any) -> Option<V> + Send + Sync;

/// Writes a value of type `V` into an instance. Returns `false` if the value
/// was not stored.
pub(crate) type SetterFn<V> = dyn Fn(&mut dyn Any, V) -> bool + Send + Sync;

/// Borrows the child instance of a nested field, if any.
pub(crate) type ChildGetterFn = dyn for<'a> Fn(&'a dyn Any) -> Option<&'a dyn Any> + Send + Sync;

/// Stores a freshly built child instance (or none) into a nested field.
pub(crate) type ChildSetterFn = dyn Fn(&mut dyn Any, Option<Box<dyn Any>>) -> bool + Send + Sync;

/// Getter/setter pair for a scalar or string field.
pub(crate) struct Accessor<V> {
    get: Arc<GetterFn<V>>,
    set: Arc<SetterFn<V>>,
}

impl<V> Accessor<V> {
    pub(crate) fn new(get: Arc<GetterFn<V>>, set: Arc<SetterFn<V>>) -> Self {
        Self { get, set }
    }

    pub(crate) fn read(&self, instance: &dyn Any) -> Option<V> {
        (self.get)(instance)
    }

    pub(crate) fn write(&self, instance: &mut dyn Any, value: V) -> bool {
        (self.set)(instance, value)
    }
}

/// Getter/setter pair for a nested structure field.
pub(crate) struct ChildAccessor {
    get: Arc<ChildGetterFn>,
    set: Arc<ChildSetterFn>,
}

impl ChildAccessor {
    pub(crate) fn new(get: Arc<ChildGetterFn>, set: Arc<ChildSetterFn>) -> Self {
        Self { get, set }
    }

    pub(crate) fn read<'a>(&self, instance: &'a dyn Any) -> Option<&'a dyn Any> {
        (self.get)(instance)
    }

    pub(crate) fn write(&self, instance: &mut dyn Any, child: Option<Box<dyn Any>>) -> bool {
        (self.set)(instance, child)
    }
}

/// Typed access to one field, one variant per storage kind.
pub(crate) enum FieldAccessor {
    Integer32(Accessor<i32>),
    Float32(Accessor<f32>),
    Utf8String(Accessor<Option<String>>),
    NestedStruct(ChildAccessor),
    Boolean(Accessor<bool>),
    Integer64(Accessor<i64>),
    Float64(Accessor<f64>),
    Enum(Accessor<i32>),
    /// Storage this crate does not interpret; carries the raw type tag.
    Opaque(u32),
}

impl FieldAccessor {
    pub(crate) fn field_type(&self) -> FieldType {
        match self {
            FieldAccessor::Integer32(_) => FieldType::Integer32,
            FieldAccessor::Float32(_) => FieldType::Float32,
            FieldAccessor::Utf8String(_) => FieldType::Utf8String,
            FieldAccessor::NestedStruct(_) => FieldType::NestedStruct,
            FieldAccessor::Boolean(_) => FieldType::Boolean,
            FieldAccessor::Integer64(_) => FieldType::Integer64,
            FieldAccessor::Float64(_) => FieldType::Float64,
            FieldAccessor::Enum(_) => FieldType::Enum,
            FieldAccessor::Opaque(tag) => FieldType::Unrecognized(*tag),
        }
    }
}

/// One entry of a structure schema.
///
/// The offset and width describe where the field lives in the structure's
/// memory layout. Reads and writes go through the accessor bound when the
/// schema was built, never through the offset.
pub struct FieldDescriptor {
    name: String,
    offset: usize,
    width: usize,
    child_schema: Option<Arc<StructSchema>>,
    accessor: FieldAccessor,
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("offset", &self.offset)
            .field("width", &self.width)
            .field("type", &self.field_type())
            .field("child", &self.child_schema.as_ref().map(|c| c.name()))
            .finish_non_exhaustive()
    }
}

impl FieldDescriptor {
    pub(crate) fn new(
        name: String,
        offset: usize,
        width: usize,
        child_schema: Option<Arc<StructSchema>>,
        accessor: FieldAccessor,
    ) -> Self {
        Self {
            name,
            offset,
            width,
            child_schema,
            accessor,
        }
    }

    /// Returns the JSON key of the field.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the byte offset of the field within the structure.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Returns the byte width of the field's storage.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the declared type of the field.
    pub fn field_type(&self) -> FieldType {
        self.accessor.field_type()
    }

    /// Returns the child schema. Present iff the type is `NestedStruct`.
    pub fn child_schema(&self) -> Option<&Arc<StructSchema>> {
        self.child_schema.as_ref()
    }

    pub(crate) fn accessor(&self) -> &FieldAccessor {
        &self.accessor
    }

    /// Returns the serializable metadata of this field.
    pub fn info(&self) -> FieldInfo {
        FieldInfo {
            name: self.name.clone(),
            offset: self.offset,
            width: self.width,
            field_type: self.field_type(),
            child: self.child_schema.as_ref().map(|c| c.name().to_string()),
        }
    }
}
