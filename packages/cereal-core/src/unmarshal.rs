//! JSON document → new instance walk.
//!
//! The walk starts from the schema's zero instance and fills in every field
//! the document carries. Missing keys keep their zero default. A value whose
//! JSON kind does not match the declared type is converted when the
//! conversion keeps the value's meaning (number ↔ number); otherwise the
//! default is kept and a warning is logged. One bad field never affects its
//! siblings.

use std::any::Any;

use serde_json::Value;

use crate::config::CodecConfig;
use crate::schema::{FieldAccessor, FieldDescriptor, StructSchema};

/// Builds a new instance of `schema` from `document`.
///
/// A document that is not a JSON object is read as an object with every key
/// missing.
pub(crate) fn unmarshal_object(
    document: &Value,
    schema: &StructSchema,
    config: &CodecConfig,
) -> Box<dyn Any> {
    let mut instance = schema.instantiate();

    let Some(object) = document.as_object() else {
        tracing::warn!(
            schema = %schema.name(),
            found = json_kind(document),
            "expected a JSON object, using defaults"
        );
        return instance;
    };

    for field in schema.fields() {
        match object.get(field.name()) {
            Some(value) => {
                let walk = FieldWalk {
                    schema,
                    field,
                    config,
                };
                walk.populate(&mut *instance, value);
            }
            None => {
                tracing::trace!(
                    schema = %schema.name(),
                    field = %field.name(),
                    "field missing, keeping default"
                );
            }
        }
    }

    instance
}

/// Per-field context, carried for diagnostics.
struct FieldWalk<'a> {
    schema: &'a StructSchema,
    field: &'a FieldDescriptor,
    config: &'a CodecConfig,
}

impl FieldWalk<'_> {
    fn populate(&self, instance: &mut dyn Any, value: &Value) {
        let stored = match self.field.accessor() {
            FieldAccessor::Integer32(access) | FieldAccessor::Enum(access) => self
                .read_integer(value)
                .map(|v| access.write(instance, saturate_i32(v))),
            FieldAccessor::Float32(access) => self
                .read_float(value)
                .and_then(|v| self.narrow_f32(v))
                .map(|v| access.write(instance, v)),
            FieldAccessor::Utf8String(access) => {
                let text = match value {
                    Value::String(s) => Some(s.clone()),
                    other => {
                        self.reject(other);
                        None
                    }
                };
                Some(access.write(instance, text))
            }
            FieldAccessor::NestedStruct(access) => {
                let child = match (value, self.field.child_schema()) {
                    (Value::Object(_), Some(child_schema)) => {
                        Some(unmarshal_object(value, child_schema, self.config))
                    }
                    (other, _) => {
                        self.reject(other);
                        None
                    }
                };
                Some(access.write(instance, child))
            }
            FieldAccessor::Boolean(access) => {
                let flag = match value {
                    Value::Bool(b) => *b,
                    other => {
                        self.reject(other);
                        false
                    }
                };
                Some(access.write(instance, flag))
            }
            FieldAccessor::Integer64(access) => self
                .read_integer(value)
                .map(|v| access.write(instance, v)),
            FieldAccessor::Float64(access) => {
                self.read_float(value).map(|v| access.write(instance, v))
            }
            FieldAccessor::Opaque(tag) => {
                tracing::warn!(
                    schema = %self.schema.name(),
                    field = %self.field.name(),
                    tag,
                    "unknown type for field, skipped"
                );
                None
            }
        };

        if stored == Some(false) {
            tracing::warn!(
                schema = %self.schema.name(),
                field = %self.field.name(),
                value = %value,
                "value rejected by field, keeping default"
            );
        }
    }

    /// Reads an integer. Integral floats are accepted with saturation;
    /// fractional floats are truncated toward zero unless number coercion
    /// is disabled.
    fn read_integer(&self, value: &Value) -> Option<i64> {
        let Value::Number(number) = value else {
            self.reject(value);
            return None;
        };

        if let Some(v) = number.as_i64() {
            return Some(v);
        }

        // u64 beyond i64::MAX or a float
        let v = number.as_f64()?;
        if v.fract() != 0.0 {
            if !self.config.coerce_numbers {
                self.reject(value);
                return None;
            }
            tracing::debug!(
                schema = %self.schema.name(),
                field = %self.field.name(),
                value = %v,
                "fractional number truncated"
            );
        }
        Some(v as i64)
    }

    fn read_float(&self, value: &Value) -> Option<f64> {
        match value {
            Value::Number(number) => number.as_f64(),
            other => {
                self.reject(other);
                None
            }
        }
    }

    /// Narrows to `f32`. A value beyond the `f32` range keeps the default.
    fn narrow_f32(&self, v: f64) -> Option<f32> {
        let narrowed = v as f32;
        if narrowed.is_infinite() && v.is_finite() {
            tracing::warn!(
                schema = %self.schema.name(),
                field = %self.field.name(),
                value = %v,
                "number out of float range, keeping default"
            );
            return None;
        }
        Some(narrowed)
    }

    /// Logs a JSON kind that does not match the declared field type. `null`
    /// is an expected way to say "no value" and is only logged at debug.
    fn reject(&self, value: &Value) {
        if value.is_null() {
            tracing::debug!(
                schema = %self.schema.name(),
                field = %self.field.name(),
                "null value, keeping default"
            );
            return;
        }

        tracing::warn!(
            schema = %self.schema.name(),
            field = %self.field.name(),
            expected = %self.field.field_type(),
            found = json_kind(value),
            "type mismatch, keeping default"
        );
    }
}

fn saturate_i32(v: i64) -> i32 {
    v.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Returns the JSON kind name of a value.
pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
