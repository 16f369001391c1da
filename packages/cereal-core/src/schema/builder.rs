use std::any::{type_name, Any, TypeId};
use std::marker::PhantomData;
use std::mem::size_of;
use std::sync::Arc;

use cereal_types::FieldType;

use super::field::{Accessor, ChildAccessor, ChildGetterFn, FieldAccessor, FieldDescriptor};
use super::StructSchema;
use crate::error::SchemaError;

/// Builder for a [`StructSchema`] describing the Rust type `T`.
///
/// Each field method takes the JSON key, the field's byte offset (normally
/// `std::mem::offset_of!(T, field)`), a getter and a setter. The accessors
/// are the only way the marshalling walks touch an instance.
///
/// `T::default()` must be the zero instance: numbers zero, strings and
/// children `None`, flags `false`. Deserialization starts from it.
///
/// # Example
/// ```
/// use std::mem::offset_of;
/// use cereal_core::schema::SchemaBuilder;
///
/// #[derive(Default)]
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// let schema = SchemaBuilder::<Point>::new("Point")
///     .int32("x", offset_of!(Point, x), |p| p.x, |p, v| p.x = v)
///     .int32("y", offset_of!(Point, y), |p| p.y, |p, v| p.y = v)
///     .build()
///     .unwrap();
/// assert_eq!(schema.fields().len(), 2);
/// ```
pub struct SchemaBuilder<T> {
    name: String,
    fields: Vec<FieldDescriptor>,
    error: Option<SchemaError>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Any + Default> SchemaBuilder<T> {
    /// Creates an empty builder for a schema called `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            error: None,
            _marker: PhantomData,
        }
    }

    /// Adds a 32-bit signed integer field.
    #[must_use]
    pub fn int32<G, S>(self, name: &str, offset: usize, get: G, set: S) -> Self
    where
        G: Fn(&T) -> i32 + Send + Sync + 'static,
        S: Fn(&mut T, i32) + Send + Sync + 'static,
    {
        let accessor = FieldAccessor::Integer32(scalar::<T, _, _, _>(get, set));
        self.push(name, offset, size_of::<i32>(), None, accessor)
    }

    /// Adds a 32-bit floating point field.
    #[must_use]
    pub fn float32<G, S>(self, name: &str, offset: usize, get: G, set: S) -> Self
    where
        G: Fn(&T) -> f32 + Send + Sync + 'static,
        S: Fn(&mut T, f32) + Send + Sync + 'static,
    {
        let accessor = FieldAccessor::Float32(scalar::<T, _, _, _>(get, set));
        self.push(name, offset, size_of::<f32>(), None, accessor)
    }

    /// Adds a text field stored as `Option<String>`.
    ///
    /// The getter borrows the text; `None` is emitted as JSON `null`.
    #[must_use]
    pub fn string<G, S>(self, name: &str, offset: usize, get: G, set: S) -> Self
    where
        G: Fn(&T) -> Option<&str> + Send + Sync + 'static,
        S: Fn(&mut T, Option<String>) + Send + Sync + 'static,
    {
        let accessor = FieldAccessor::Utf8String(scalar::<T, _, _, _>(
            move |target: &T| get(target).map(str::to_owned),
            set,
        ));
        self.push(name, offset, size_of::<Option<String>>(), None, accessor)
    }

    /// Adds a nested structure field stored as `Option<Box<C>>`.
    ///
    /// `child` must describe `C`. The parent owns the child exclusively;
    /// deserialization moves each freshly built child into the parent.
    #[must_use]
    pub fn nested<C, G, S>(
        mut self,
        name: &str,
        offset: usize,
        child: Arc<StructSchema>,
        get: G,
        set: S,
    ) -> Self
    where
        C: Any,
        G: Fn(&T) -> Option<&C> + Send + Sync + 'static,
        S: Fn(&mut T, Option<Box<C>>) + Send + Sync + 'static,
    {
        if !child.describes::<C>() {
            self.record_error(SchemaError::ChildTypeMismatch {
                schema: self.name.clone(),
                field: name.to_string(),
                expected: type_name::<C>(),
                got: child.type_name(),
            });
        }

        let get_child = child_getter(move |instance| {
            instance
                .downcast_ref::<T>()
                .and_then(|target| get(target))
                .map(|c| c as &dyn Any)
        });
        let set_child = Arc::new(
            move |instance: &mut dyn Any, value: Option<Box<dyn Any>>| {
                let Some(target) = instance.downcast_mut::<T>() else {
                    return false;
                };
                match value.map(|boxed| boxed.downcast::<C>()) {
                    None => set(target, None),
                    Some(Ok(child)) => set(target, Some(child)),
                    Some(Err(_)) => return false,
                }
                true
            },
        );

        let accessor = FieldAccessor::NestedStruct(ChildAccessor::new(get_child, set_child));
        self.push(
            name,
            offset,
            size_of::<Option<Box<C>>>(),
            Some(child),
            accessor,
        )
    }

    /// Adds a boolean field.
    #[must_use]
    pub fn boolean<G, S>(self, name: &str, offset: usize, get: G, set: S) -> Self
    where
        G: Fn(&T) -> bool + Send + Sync + 'static,
        S: Fn(&mut T, bool) + Send + Sync + 'static,
    {
        let accessor = FieldAccessor::Boolean(scalar::<T, _, _, _>(get, set));
        self.push(name, offset, size_of::<bool>(), None, accessor)
    }

    /// Adds a 64-bit signed integer field.
    ///
    /// Values are emitted through double precision: magnitudes above 2^53
    /// lose precision in the JSON text.
    #[must_use]
    pub fn int64<G, S>(self, name: &str, offset: usize, get: G, set: S) -> Self
    where
        G: Fn(&T) -> i64 + Send + Sync + 'static,
        S: Fn(&mut T, i64) + Send + Sync + 'static,
    {
        let accessor = FieldAccessor::Integer64(scalar::<T, _, _, _>(get, set));
        self.push(name, offset, size_of::<i64>(), None, accessor)
    }

    /// Adds a 64-bit floating point field.
    #[must_use]
    pub fn float64<G, S>(self, name: &str, offset: usize, get: G, set: S) -> Self
    where
        G: Fn(&T) -> f64 + Send + Sync + 'static,
        S: Fn(&mut T, f64) + Send + Sync + 'static,
    {
        let accessor = FieldAccessor::Float64(scalar::<T, _, _, _>(get, set));
        self.push(name, offset, size_of::<f64>(), None, accessor)
    }

    /// Adds an enumeration field, emitted as its `i32` discriminant.
    ///
    /// A discriminant that `E` rejects during deserialization leaves the field
    /// at its default.
    #[must_use]
    pub fn enumeration<E, G, S>(self, name: &str, offset: usize, get: G, set: S) -> Self
    where
        E: Copy + Into<i32> + TryFrom<i32> + 'static,
        G: Fn(&T) -> E + Send + Sync + 'static,
        S: Fn(&mut T, E) + Send + Sync + 'static,
    {
        let get = move |instance: &dyn Any| {
            instance
                .downcast_ref::<T>()
                .map(|t| Into::<i32>::into(get(t)))
        };
        let set = move |instance: &mut dyn Any, raw: i32| {
            match (instance.downcast_mut::<T>(), E::try_from(raw)) {
                (Some(target), Ok(value)) => {
                    set(target, value);
                    true
                }
                _ => false,
            }
        };
        let accessor = FieldAccessor::Enum(Accessor::new(Arc::new(get), Arc::new(set)));
        self.push(name, offset, size_of::<E>(), None, accessor)
    }

    /// Declares a field whose type tag this crate does not interpret.
    ///
    /// The field stays part of the layout metadata; both marshalling walks
    /// skip it with a diagnostic. Tags of the known field types must be
    /// declared through their typed methods instead.
    #[must_use]
    pub fn opaque(mut self, name: &str, offset: usize, tag: u32) -> Self {
        if FieldType::from_tag(tag).is_known() {
            let err = SchemaError::KnownTagDeclaredOpaque {
                schema: self.name.clone(),
                field: name.to_string(),
                tag,
            };
            self.record_error(err);
        }
        self.push(name, offset, 0, None, FieldAccessor::Opaque(tag))
    }

    /// Finishes the schema, checking that every field fits the structure.
    pub fn build(self) -> Result<StructSchema, SchemaError> {
        if let Some(err) = self.error {
            return Err(err);
        }

        let schema = StructSchema {
            name: self.name,
            size: size_of::<T>(),
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            fields: self.fields,
            construct: construct_default::<T>,
        };
        schema.describe().check_layout()?;

        tracing::debug!(
            schema = %schema.name,
            fields = schema.fields.len(),
            size = schema.size,
            "schema built"
        );
        Ok(schema)
    }

    fn push(
        mut self,
        name: &str,
        offset: usize,
        width: usize,
        child: Option<Arc<StructSchema>>,
        accessor: FieldAccessor,
    ) -> Self {
        self.fields.push(FieldDescriptor::new(
            name.to_string(),
            offset,
            width,
            child,
            accessor,
        ));
        self
    }

    fn record_error(&mut self, err: SchemaError) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }
}

fn construct_default<T: Any + Default>() -> Box<dyn Any> {
    Box::new(T::default())
}

/// Wraps typed accessors into type-erased ones bound to `T`.
fn scalar<T, V, G, S>(get: G, set: S) -> Accessor<V>
where
    T: Any,
    V: 'static,
    G: Fn(&T) -> V + Send + Sync + 'static,
    S: Fn(&mut T, V) + Send + Sync + 'static,
{
    Accessor::new(
        Arc::new(move |instance: &dyn Any| instance.downcast_ref::<T>().map(&get)),
        Arc::new(
            move |instance: &mut dyn Any, value: V| match instance.downcast_mut::<T>() {
                Some(target) => {
                    set(target, value);
                    true
                }
                None => false,
            },
        ),
    )
}

// Pins the higher-ranked signature so the returned borrow is tied to the input.
fn child_getter<F>(f: F) -> Arc<ChildGetterFn>
where
    F: for<'a> Fn(&'a dyn Any) -> Option<&'a dyn Any> + Send + Sync + 'static,
{
    Arc::new(f)
}
