//! Process-wide schema registry.
//!
//! The registry is assembled once with [`SchemaRegistryBuilder`] and is
//! immutable afterwards, so lookups need no locking. A single registry can
//! be installed as the process-wide table with [`install_global`].

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use super::StructSchema;
use crate::error::SchemaError;

static GLOBAL: OnceLock<SchemaRegistry> = OnceLock::new();

/// Collects schemas before freezing them into a [`SchemaRegistry`].
#[derive(Debug, Default)]
pub struct SchemaRegistryBuilder {
    schemas: HashMap<String, Arc<StructSchema>>,
    by_type: HashMap<TypeId, Arc<StructSchema>>,
}

impl SchemaRegistryBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a schema together with every child schema it reaches.
    ///
    /// Registering the same `Arc` twice is a no-op. A different schema under
    /// an already used name is rejected.
    ///
    /// # Returns
    /// The builder on success, `Err(SchemaError::AlreadyRegistered)` on a
    /// name clash.
    pub fn register(mut self, schema: Arc<StructSchema>) -> Result<Self, SchemaError> {
        self.insert(schema)?;
        Ok(self)
    }

    fn insert(&mut self, schema: Arc<StructSchema>) -> Result<(), SchemaError> {
        if let Some(existing) = self.schemas.get(schema.name()) {
            if Arc::ptr_eq(existing, &schema) {
                return Ok(());
            }
            return Err(SchemaError::AlreadyRegistered {
                name: schema.name().to_string(),
            });
        }

        // children first so a failing child leaves the parent unregistered
        for child in schema.fields().iter().filter_map(|f| f.child_schema()) {
            self.insert(Arc::clone(child))?;
        }

        tracing::debug!(schema = %schema.name(), "schema registered");
        self.by_type
            .entry(schema.type_id())
            .or_insert_with(|| Arc::clone(&schema));
        self.schemas.insert(schema.name().to_string(), schema);
        Ok(())
    }

    /// Freezes the collected schemas.
    pub fn build(self) -> SchemaRegistry {
        SchemaRegistry {
            schemas: self.schemas,
            by_type: self.by_type,
        }
    }
}

/// Immutable table of schemas, keyed by schema name.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    schemas: HashMap<String, Arc<StructSchema>>,
    by_type: HashMap<TypeId, Arc<StructSchema>>,
}

impl SchemaRegistry {
    /// Starts a new registry.
    pub fn builder() -> SchemaRegistryBuilder {
        SchemaRegistryBuilder::new()
    }

    /// Retrieves a schema by name.
    pub fn get(&self, name: &str) -> Option<&Arc<StructSchema>> {
        self.schemas.get(name)
    }

    /// Retrieves the first schema registered for `T`.
    pub fn for_type<T: Any>(&self) -> Option<&Arc<StructSchema>> {
        self.by_type.get(&TypeId::of::<T>())
    }

    /// Checks if a schema is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    /// Returns all registered schema names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.schemas.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Returns the number of registered schemas.
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Returns `true` if no schema is registered.
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

/// Installs `registry` as the process-wide schema table.
///
/// # Returns
/// A `'static` reference to the installed registry, or
/// `Err(SchemaError::RegistryAlreadyInstalled)` if one was installed before.
pub fn install_global(registry: SchemaRegistry) -> Result<&'static SchemaRegistry, SchemaError> {
    let mut installed = false;
    let global = GLOBAL.get_or_init(|| {
        installed = true;
        registry
    });

    if installed {
        tracing::debug!(schemas = global.len(), "global schema registry installed");
        Ok(global)
    } else {
        Err(SchemaError::RegistryAlreadyInstalled)
    }
}

/// Returns the process-wide schema table, if installed.
pub fn global() -> Option<&'static SchemaRegistry> {
    GLOBAL.get()
}
