//! Schema definitions and their post-validation hooks
//!
//! A [`SchemaDefinition`] is an ordered list of [`FieldSpec`]s plus two
//! ordered hook lists: model validators (cross-field rules) and computed
//! fields. Hooks are pure functions over the candidate instance.
//!
//! Copyright (c) 2025 SchemaDeck Team
//! Licensed under the Apache-2.0 license

use crate::schema::field::{FieldSpec, FieldType};
use crate::schema::value::{FieldValue, ValidatedInstance};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Signature of a cross-field rule: `Err` carries the failure message
pub type RuleFn = Arc<dyn Fn(&ValidatedInstance) -> Result<(), String> + Send + Sync>;

/// Signature of a computed-field derivation
pub type ComputeFn = Arc<dyn Fn(&ValidatedInstance) -> FieldValue + Send + Sync>;

/// What to do with payload keys the schema does not declare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtraPolicy {
    /// Drop them silently
    #[default]
    Ignore,
    /// Fail validation, reporting each one
    Forbid,
}

/// Errors raised while assembling a schema
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("schema '{schema}' declares field '{field}' more than once")]
    DuplicateField { schema: String, field: String },

    #[error("schema '{schema}' has two fields accepting input key '{key}'")]
    DuplicateInputKey { schema: String, key: String },

    #[error("computed field '{field}' of schema '{schema}' shadows another field")]
    ComputedShadowsField { schema: String, field: String },
}

/// A rule evaluated after every field passed its own checks
#[derive(Clone)]
pub struct ModelValidator {
    pub name: String,
    pub description: String,
    check: RuleFn,
}

impl ModelValidator {
    pub fn check(&self, instance: &ValidatedInstance) -> Result<(), String> {
        (self.check)(instance)
    }
}

impl fmt::Debug for ModelValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelValidator")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// A read-only output field derived from a fully valid instance
#[derive(Clone)]
pub struct ComputedField {
    pub name: String,
    pub field_type: FieldType,
    pub description: String,
    compute: ComputeFn,
}

impl ComputedField {
    pub fn compute(&self, instance: &ValidatedInstance) -> FieldValue {
        (self.compute)(instance)
    }
}

impl fmt::Debug for ComputedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComputedField")
            .field("name", &self.name)
            .field("field_type", &self.field_type)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Immutable declarative description of a data shape and its rules
#[derive(Debug, Clone)]
pub struct SchemaDefinition {
    /// Registry name (`item`, `user`, ...)
    pub name: String,
    /// Display title (`Item`, `User`, ...)
    pub title: String,
    pub description: Option<String>,
    pub fields: Vec<FieldSpec>,
    pub extra: ExtraPolicy,
    /// Also accept internal names for aliased fields
    pub populate_by_name: bool,
    pub validators: Vec<ModelValidator>,
    pub computed: Vec<ComputedField>,
}

impl SchemaDefinition {
    /// Start building a schema
    pub fn builder<N: Into<String>>(name: N) -> SchemaBuilder {
        SchemaBuilder::new(name)
    }

    /// Field by internal name
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Field a payload key feeds, honoring aliases
    pub fn field_for_key(&self, key: &str) -> Option<&FieldSpec> {
        self.fields
            .iter()
            .find(|f| f.external_name() == key)
            .or_else(|| {
                if self.populate_by_name {
                    self.fields.iter().find(|f| f.name == key)
                } else {
                    None
                }
            })
    }

    /// Whether a payload key is declared
    pub fn accepts_key(&self, key: &str) -> bool {
        self.field_for_key(key).is_some()
    }

    pub fn has_aliases(&self) -> bool {
        self.fields.iter().any(|f| f.alias.is_some())
    }

    pub fn computed_field(&self, name: &str) -> Option<&ComputedField> {
        self.computed.iter().find(|c| c.name == name)
    }

    /// Dump an instance keyed by external names, computed fields included
    pub fn dump_by_alias(&self, instance: &ValidatedInstance) -> Value {
        self.dump(instance, true)
    }

    /// Turn an instance back into a raw payload: aliasing reversed, computed
    /// fields dropped. Feeding it back through validation yields an equal
    /// instance.
    pub fn to_payload(&self, instance: &ValidatedInstance) -> Value {
        self.dump(instance, false)
    }

    fn dump(&self, instance: &ValidatedInstance, include_computed: bool) -> Value {
        let mut map = Map::new();
        for field in instance.fields() {
            if field.computed {
                if include_computed {
                    map.insert(field.name.clone(), field.value.to_json());
                }
                continue;
            }
            let Some(spec) = self.field(&field.name) else {
                continue;
            };
            map.insert(
                spec.external_name().to_string(),
                dump_value(&spec.field_type, &field.value, include_computed),
            );
        }
        Value::Object(map)
    }
}

fn dump_value(field_type: &FieldType, value: &FieldValue, include_computed: bool) -> Value {
    match (field_type, value) {
        (FieldType::Model(schema), FieldValue::Model(inner)) => schema.dump(inner, include_computed),
        (FieldType::List(item_type), FieldValue::List(items)) => Value::Array(
            items
                .iter()
                .map(|item| dump_value(item_type, item, include_computed))
                .collect(),
        ),
        _ => value.to_json(),
    }
}

/// Builder for [`SchemaDefinition`]
pub struct SchemaBuilder {
    schema: SchemaDefinition,
}

impl SchemaBuilder {
    pub fn new<N: Into<String>>(name: N) -> Self {
        let name = name.into();
        Self {
            schema: SchemaDefinition {
                title: name.clone(),
                name,
                description: None,
                fields: Vec::new(),
                extra: ExtraPolicy::Ignore,
                populate_by_name: false,
                validators: Vec::new(),
                computed: Vec::new(),
            },
        }
    }

    pub fn title<T: Into<String>>(mut self, title: T) -> Self {
        self.schema.title = title.into();
        self
    }

    pub fn description<D: Into<String>>(mut self, description: D) -> Self {
        self.schema.description = Some(description.into());
        self
    }

    pub fn field(mut self, field: FieldSpec) -> Self {
        self.schema.fields.push(field);
        self
    }

    pub fn forbid_extra(mut self) -> Self {
        self.schema.extra = ExtraPolicy::Forbid;
        self
    }

    pub fn populate_by_name(mut self) -> Self {
        self.schema.populate_by_name = true;
        self
    }

    /// Append a cross-field rule
    pub fn model_validator<N, D, F>(mut self, name: N, description: D, check: F) -> Self
    where
        N: Into<String>,
        D: Into<String>,
        F: Fn(&ValidatedInstance) -> Result<(), String> + Send + Sync + 'static,
    {
        self.schema.validators.push(ModelValidator {
            name: name.into(),
            description: description.into(),
            check: Arc::new(check),
        });
        self
    }

    /// Append a computed field
    pub fn computed<N, D, F>(mut self, name: N, field_type: FieldType, description: D, compute: F) -> Self
    where
        N: Into<String>,
        D: Into<String>,
        F: Fn(&ValidatedInstance) -> FieldValue + Send + Sync + 'static,
    {
        self.schema.computed.push(ComputedField {
            name: name.into(),
            field_type,
            description: description.into(),
            compute: Arc::new(compute),
        });
        self
    }

    /// Check names and finish the schema
    pub fn build(self) -> Result<SchemaDefinition, SchemaError> {
        let schema = self.schema;

        let mut names = HashSet::new();
        for field in &schema.fields {
            if !names.insert(field.name.as_str()) {
                return Err(SchemaError::DuplicateField {
                    schema: schema.name.clone(),
                    field: field.name.clone(),
                });
            }
        }

        let mut keys = HashSet::new();
        for field in &schema.fields {
            if !keys.insert(field.external_name()) {
                return Err(SchemaError::DuplicateInputKey {
                    schema: schema.name.clone(),
                    key: field.external_name().to_string(),
                });
            }
        }

        for computed in &schema.computed {
            if !names.insert(computed.name.as_str()) {
                return Err(SchemaError::ComputedShadowsField {
                    schema: schema.name.clone(),
                    field: computed.name.clone(),
                });
            }
        }

        Ok(schema)
    }
}
