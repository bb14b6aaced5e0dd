//! Schema registry
//!
//! The registry is built once and never mutated afterwards. Each entry pairs
//! a schema with the material used to demonstrate it: a headline, a short
//! explanation, a sample form input and, for most schemas, an input that
//! fails validation.
//!
//! Copyright (c) 2025 SchemaDeck Team
//! Licensed under the Apache-2.0 license

mod builtin;

use crate::adapter::{AdapterError, FormInput};
use crate::schema::{SchemaDefinition, SchemaError};
use std::sync::OnceLock;
use thiserror::Error;
use tracing::debug;

/// Registry lookup and assembly errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegistryError {
    #[error("unknown schema '{name}'")]
    UnknownSchema { name: String },

    #[error("schema '{name}' is registered twice")]
    Duplicate { name: String },

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("invalid field pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("invalid sample input: {0}")]
    Sample(#[from] AdapterError),
}

/// A registered schema with its demonstration material
#[derive(Debug, Clone)]
pub struct RegistryEntry {
    pub schema: SchemaDefinition,
    /// One-line summary of the feature the schema shows
    pub headline: String,
    pub explanation: String,
    /// Input that passes validation
    pub sample: FormInput,
    /// Input that fails validation
    pub invalid_sample: Option<FormInput>,
}

impl RegistryEntry {
    pub fn new<H, E>(schema: SchemaDefinition, headline: H, explanation: E, sample: FormInput) -> Self
    where
        H: Into<String>,
        E: Into<String>,
    {
        Self {
            schema,
            headline: headline.into(),
            explanation: explanation.into(),
            sample,
            invalid_sample: None,
        }
    }

    pub fn with_invalid_sample(mut self, sample: FormInput) -> Self {
        self.invalid_sample = Some(sample);
        self
    }

    pub fn name(&self) -> &str {
        &self.schema.name
    }
}

/// Ordered, immutable collection of schemas
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    entries: Vec<RegistryEntry>,
}

static BUILTIN: OnceLock<Result<SchemaRegistry, RegistryError>> = OnceLock::new();

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry; names must be unique
    pub fn register(&mut self, entry: RegistryEntry) -> Result<(), RegistryError> {
        if self.entries.iter().any(|e| e.name() == entry.name()) {
            return Err(RegistryError::Duplicate {
                name: entry.name().to_string(),
            });
        }
        debug!(schema = %entry.name(), "registered schema");
        self.entries.push(entry);
        Ok(())
    }

    /// The demonstration schemas, built on first use
    pub fn builtin() -> Result<&'static SchemaRegistry, RegistryError> {
        BUILTIN
            .get_or_init(builtin::registry)
            .as_ref()
            .map_err(Clone::clone)
    }

    pub fn get_schema(&self, name: &str) -> Result<&SchemaDefinition, RegistryError> {
        self.entry(name).map(|e| &e.schema)
    }

    pub fn entry(&self, name: &str) -> Result<&RegistryEntry, RegistryError> {
        self.entries
            .iter()
            .find(|e| e.name() == name)
            .ok_or_else(|| RegistryError::UnknownSchema {
                name: name.to_string(),
            })
    }

    /// Schema names in registration order
    pub fn list_schemas(&self) -> Vec<&str> {
        self.entries.iter().map(RegistryEntry::name).collect()
    }

    pub fn entries(&self) -> &[RegistryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Look up a built-in schema by name
pub fn get_schema(name: &str) -> Result<&'static SchemaDefinition, RegistryError> {
    SchemaRegistry::builtin()?.get_schema(name)
}

/// Names of the built-in schemas in a stable order
pub fn list_schemas() -> Result<Vec<&'static str>, RegistryError> {
    Ok(SchemaRegistry::builtin()?.list_schemas())
}

/// Look up a built-in registry entry by name
pub fn entry(name: &str) -> Result<&'static RegistryEntry, RegistryError> {
    SchemaRegistry::builtin()?.entry(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldSpec, FieldType};

    fn entry_named(name: &str) -> RegistryEntry {
        let schema = SchemaDefinition::builder(name)
            .field(FieldSpec::new("x", FieldType::Integer))
            .build()
            .unwrap();
        RegistryEntry::new(schema, "headline", "explanation", FormInput::new())
    }

    #[test]
    fn test_register_rejects_duplicates() {
        let mut registry = SchemaRegistry::new();
        registry.register(entry_named("a")).unwrap();
        registry.register(entry_named("b")).unwrap();
        assert_eq!(
            registry.register(entry_named("a")),
            Err(RegistryError::Duplicate { name: "a".into() })
        );
        assert_eq!(registry.list_schemas(), vec!["a", "b"]);
    }

    #[test]
    fn test_unknown_schema() {
        let registry = SchemaRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(
            registry.get_schema("missing").unwrap_err(),
            RegistryError::UnknownSchema { name: "missing".into() }
        );
    }

    #[test]
    fn test_builtin_listing_comes_from_the_registry() {
        let names = list_schemas().unwrap();
        assert!(!names.is_empty());
        assert_eq!(names, SchemaRegistry::builtin().unwrap().list_schemas());
    }

    #[test]
    fn test_builtin_is_shared() {
        let first = SchemaRegistry::builtin().unwrap();
        let second = SchemaRegistry::builtin().unwrap();
        assert!(std::ptr::eq(first, second));
    }
}
