//! Field specifications: declared type, presence, constraints and alias
//!
//! Copyright (c) 2025 SchemaDeck Team
//! Licensed under the Apache-2.0 license

use crate::schema::definition::SchemaDefinition;
use crate::schema::value::FieldValue;
use regex::Regex;
use std::sync::Arc;

/// Declared type of a field
#[derive(Debug, Clone)]
pub enum FieldType {
    String,
    Integer,
    Float,
    Boolean,
    /// Calendar date written as `YYYY-MM-DD`
    Date,
    /// String holding an email address
    Email,
    /// Absolute `http` or `https` URL
    Url,
    List(Box<FieldType>),
    /// Closed set of string literals
    Enum { name: String, values: Vec<String> },
    /// Value validated by another schema
    Model(Arc<SchemaDefinition>),
}

impl FieldType {
    /// List of the given item type
    pub fn list_of(item: FieldType) -> Self {
        FieldType::List(Box::new(item))
    }

    /// Enum over the given literals
    pub fn one_of<N, I, V>(name: N, values: I) -> Self
    where
        N: Into<String>,
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        FieldType::Enum {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Nested model
    pub fn model(schema: SchemaDefinition) -> Self {
        FieldType::Model(Arc::new(schema))
    }

    /// Display name of the type
    pub fn type_name(&self) -> String {
        match self {
            FieldType::String => "string".to_string(),
            FieldType::Integer => "integer".to_string(),
            FieldType::Float => "float".to_string(),
            FieldType::Boolean => "boolean".to_string(),
            FieldType::Date => "date".to_string(),
            FieldType::Email => "email".to_string(),
            FieldType::Url => "url".to_string(),
            FieldType::List(item) => format!("list<{}>", item.type_name()),
            FieldType::Enum { name, .. } => name.clone(),
            FieldType::Model(schema) => schema.name.clone(),
        }
    }

    pub fn is_string(&self) -> bool {
        matches!(self, FieldType::String)
    }

    pub fn is_list(&self) -> bool {
        matches!(self, FieldType::List(_))
    }

    /// Nested schema, if this is a model type
    pub fn nested_schema(&self) -> Option<&SchemaDefinition> {
        match self {
            FieldType::Model(schema) => Some(schema),
            _ => None,
        }
    }
}

/// Whether a field must be supplied
#[derive(Debug, Clone, PartialEq)]
pub enum Presence {
    Required,
    /// Used as-is when the field is absent; defaults are not validated
    Default(FieldValue),
}

/// Constraints checked after a value has been coerced
#[derive(Debug, Clone, Default)]
pub struct Constraints {
    /// Exclusive lower bound
    pub gt: Option<f64>,
    /// Inclusive lower bound
    pub ge: Option<f64>,
    /// Exclusive upper bound
    pub lt: Option<f64>,
    /// Inclusive upper bound
    pub le: Option<f64>,
    /// Minimum string length in characters, or list length
    pub min_length: Option<usize>,
    /// Maximum string length in characters, or list length
    pub max_length: Option<usize>,
    /// Pattern a string must match
    pub pattern: Option<Regex>,
}

impl Constraints {
    pub fn is_empty(&self) -> bool {
        self.gt.is_none()
            && self.ge.is_none()
            && self.lt.is_none()
            && self.le.is_none()
            && self.min_length.is_none()
            && self.max_length.is_none()
            && self.pattern.is_none()
    }
}

/// One entry of a schema's field list
#[derive(Debug, Clone)]
pub struct FieldSpec {
    /// Internal field name; validated instances are keyed by it
    pub name: String,
    /// External name used at the input boundary
    pub alias: Option<String>,
    pub field_type: FieldType,
    /// Whether `null` is an accepted value
    pub nullable: bool,
    pub presence: Presence,
    pub constraints: Constraints,
    /// Disable coercion for this field
    pub strict: bool,
    pub description: Option<String>,
}

impl FieldSpec {
    /// A required, non-nullable field
    pub fn new<N: Into<String>>(name: N, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            alias: None,
            field_type,
            nullable: false,
            presence: Presence::Required,
            constraints: Constraints::default(),
            strict: false,
            description: None,
        }
    }

    /// `Optional[T] = None`
    pub fn optional(mut self) -> Self {
        self.nullable = true;
        self.presence = Presence::Default(FieldValue::Null);
        self
    }

    /// Accept `null` without changing presence
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn default_value(mut self, value: FieldValue) -> Self {
        self.presence = Presence::Default(value);
        self
    }

    pub fn alias<A: Into<String>>(mut self, alias: A) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    pub fn describe<D: Into<String>>(mut self, description: D) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn gt(mut self, bound: f64) -> Self {
        self.constraints.gt = Some(bound);
        self
    }

    pub fn ge(mut self, bound: f64) -> Self {
        self.constraints.ge = Some(bound);
        self
    }

    pub fn lt(mut self, bound: f64) -> Self {
        self.constraints.lt = Some(bound);
        self
    }

    pub fn le(mut self, bound: f64) -> Self {
        self.constraints.le = Some(bound);
        self
    }

    pub fn min_length(mut self, len: usize) -> Self {
        self.constraints.min_length = Some(len);
        self
    }

    pub fn max_length(mut self, len: usize) -> Self {
        self.constraints.max_length = Some(len);
        self
    }

    pub fn pattern(mut self, pattern: Regex) -> Self {
        self.constraints.pattern = Some(pattern);
        self
    }

    /// Name the field is looked up by in a raw payload
    pub fn external_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }

    pub fn is_required(&self) -> bool {
        matches!(self.presence, Presence::Required)
    }

    /// Field may be left out or set to null
    pub fn is_optional(&self) -> bool {
        !self.is_required() || self.nullable
    }

    pub fn declared_default(&self) -> Option<&FieldValue> {
        match &self.presence {
            Presence::Required => None,
            Presence::Default(value) => Some(value),
        }
    }

    /// Type name with nullability, e.g. `integer | null`
    pub fn type_label(&self) -> String {
        if self.nullable {
            format!("{} | null", self.field_type.type_name())
        } else {
            self.field_type.type_name()
        }
    }
}
