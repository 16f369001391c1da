//! Instance → JSON document walk.
//!
//! The walk visits fields in declaration order and never fails as a whole:
//! a field it cannot read is skipped with a diagnostic and the remaining
//! fields are still emitted.

use std::any::Any;

use serde_json::{Map, Number, Value};

use crate::schema::{FieldAccessor, FieldDescriptor, StructSchema};

/// Builds the JSON object for one instance of `schema`.
pub(crate) fn marshal_object(data: &dyn Any, schema: &StructSchema) -> Map<String, Value> {
    let mut object = Map::with_capacity(schema.fields().len());

    for field in schema.fields() {
        if let Some(value) = marshal_field(data, field, schema) {
            object.insert(field.name().to_string(), value);
        }
    }

    object
}

fn marshal_field(data: &dyn Any, field: &FieldDescriptor, schema: &StructSchema) -> Option<Value> {
    let value = match field.accessor() {
        FieldAccessor::Integer32(access) | FieldAccessor::Enum(access) => {
            access.read(data).map(Value::from)
        }
        FieldAccessor::Float32(access) => access
            .read(data)
            .map(|v| float_to_value(f64::from(v), field, schema)),
        FieldAccessor::Utf8String(access) => access
            .read(data)
            .map(|text| text.map_or(Value::Null, Value::String)),
        FieldAccessor::NestedStruct(access) => {
            let child = access.read(data);
            match (child, field.child_schema()) {
                (Some(child), Some(child_schema)) => {
                    Some(Value::Object(marshal_object(child, child_schema)))
                }
                _ => Some(Value::Null),
            }
        }
        FieldAccessor::Boolean(access) => access.read(data).map(Value::Bool),
        FieldAccessor::Integer64(access) => access.read(data).map(long_to_value),
        FieldAccessor::Float64(access) => access
            .read(data)
            .map(|v| float_to_value(v, field, schema)),
        FieldAccessor::Opaque(tag) => {
            tracing::warn!(
                schema = %schema.name(),
                field = %field.name(),
                tag,
                "unknown type for field, skipped"
            );
            return None;
        }
    };

    if value.is_none() {
        tracing::warn!(
            schema = %schema.name(),
            field = %field.name(),
            "field accessor rejected the instance, skipped"
        );
    }
    value
}

/// JSON has no NaN or infinity; such values are emitted as `null`.
fn float_to_value(v: f64, field: &FieldDescriptor, schema: &StructSchema) -> Value {
    match Number::from_f64(v) {
        Some(n) => Value::Number(n),
        None => {
            tracing::warn!(
                schema = %schema.name(),
                field = %field.name(),
                value = %v,
                "non-finite float emitted as null"
            );
            Value::Null
        }
    }
}

/// Emits a 64-bit integer through double precision.
///
/// The value is rounded to the nearest `f64` first, so magnitudes above 2^53
/// lose precision. The rounded value is written as an integer when it is
/// representable as `i64`, otherwise as a float.
pub(crate) fn long_to_value(v: i64) -> Value {
    const TWO_POW_63: f64 = 9_223_372_036_854_775_808.0;

    let rounded = v as f64;
    if (-TWO_POW_63..TWO_POW_63).contains(&rounded) {
        Value::from(rounded as i64)
    } else {
        Number::from_f64(rounded).map_or(Value::Null, Value::Number)
    }
}
