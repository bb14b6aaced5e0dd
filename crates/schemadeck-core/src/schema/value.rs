//! Coerced values and validated instances
//!
//! Copyright (c) 2025 SchemaDeck Team
//! Licensed under the Apache-2.0 license

use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use url::Url;

/// A type-correct value produced by validation
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Date(NaiveDate),
    Email(String),
    Url(Url),
    List(Vec<FieldValue>),
    /// Member of a closed literal set
    Enum(String),
    Model(ValidatedInstance),
}

impl FieldValue {
    /// Runtime type name, matching [`FieldType::type_name`](crate::FieldType::type_name)
    /// for scalar types
    pub fn type_name(&self) -> String {
        match self {
            FieldValue::Null => "null".to_string(),
            FieldValue::Str(_) => "string".to_string(),
            FieldValue::Int(_) => "integer".to_string(),
            FieldValue::Float(_) => "float".to_string(),
            FieldValue::Bool(_) => "boolean".to_string(),
            FieldValue::Date(_) => "date".to_string(),
            FieldValue::Email(_) => "email".to_string(),
            FieldValue::Url(_) => "url".to_string(),
            FieldValue::List(items) => match items.first() {
                Some(first) => format!("list<{}>", first.type_name()),
                None => "list".to_string(),
            },
            FieldValue::Enum(_) => "enum".to_string(),
            FieldValue::Model(instance) => instance.schema.clone(),
        }
    }

    /// Plain JSON rendering (the "dump" of the value)
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Null => Value::Null,
            FieldValue::Str(s) | FieldValue::Email(s) | FieldValue::Enum(s) => Value::String(s.clone()),
            FieldValue::Int(n) => Value::from(*n),
            FieldValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            FieldValue::Bool(b) => Value::Bool(*b),
            FieldValue::Date(d) => Value::String(d.format("%Y-%m-%d").to_string()),
            FieldValue::Url(u) => Value::String(u.to_string()),
            FieldValue::List(items) => Value::Array(items.iter().map(FieldValue::to_json).collect()),
            FieldValue::Model(instance) => instance.to_json(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// String content of string-like values
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Str(s) | FieldValue::Email(s) | FieldValue::Enum(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            FieldValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Numeric value of integers and floats
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Int(n) => Some(*n as f64),
            FieldValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            FieldValue::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[FieldValue]> {
        match self {
            FieldValue::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    pub fn as_model(&self) -> Option<&ValidatedInstance> {
        match self {
            FieldValue::Model(instance) => Some(instance),
            _ => None,
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Str(value.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Int(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

/// A field of a validated instance
#[derive(Debug, Clone, PartialEq)]
pub struct InstanceField {
    /// Internal field name
    pub name: String,
    pub value: FieldValue,
    /// Derived after validation rather than read from input
    pub computed: bool,
}

/// The result of a successful validation, keyed by internal field names
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedInstance {
    /// Name of the schema that produced the instance
    pub schema: String,
    fields: Vec<InstanceField>,
}

impl ValidatedInstance {
    pub(crate) fn new<S: Into<String>>(schema: S, fields: Vec<InstanceField>) -> Self {
        Self {
            schema: schema.into(),
            fields,
        }
    }

    pub(crate) fn push_computed<N: Into<String>>(&mut self, name: N, value: FieldValue) {
        self.fields.push(InstanceField {
            name: name.into(),
            value,
            computed: true,
        });
    }

    /// Value of a field by internal name
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|f| f.name == name).map(|f| &f.value)
    }

    /// Fields in schema order, computed fields last
    pub fn fields(&self) -> &[InstanceField] {
        &self.fields
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    pub fn computed_fields(&self) -> impl Iterator<Item = &InstanceField> {
        self.fields.iter().filter(|f| f.computed)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// JSON object keyed by internal names, computed fields included
    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .fields
            .iter()
            .map(|f| (f.name.clone(), f.value.to_json()))
            .collect();
        Value::Object(map)
    }
}

impl Serialize for ValidatedInstance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> ValidatedInstance {
        let mut instance = ValidatedInstance::new(
            "order_item",
            vec![
                InstanceField {
                    name: "price".to_string(),
                    value: FieldValue::Float(2.5),
                    computed: false,
                },
                InstanceField {
                    name: "quantity".to_string(),
                    value: FieldValue::Int(4),
                    computed: false,
                },
            ],
        );
        instance.push_computed("total_cost", FieldValue::Float(10.0));
        instance
    }

    #[test]
    fn test_instance_dump_keeps_field_order() {
        let dumped = serde_json::to_string(&sample()).unwrap();
        assert_eq!(dumped, r#"{"price":2.5,"quantity":4,"total_cost":10.0}"#);
    }

    #[test]
    fn test_computed_fields_are_flagged() {
        let instance = sample();
        let computed: Vec<&str> = instance.computed_fields().map(|f| f.name.as_str()).collect();
        assert_eq!(computed, vec!["total_cost"]);
        assert_eq!(instance.get("quantity").and_then(FieldValue::as_int), Some(4));
        assert_eq!(instance.get("quantity").and_then(FieldValue::as_f64), Some(4.0));
    }

    #[test]
    fn test_value_json_rendering() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        assert_eq!(FieldValue::Date(date).to_json(), json!("2024-02-01"));
        let url = Url::parse("https://example.dev").unwrap();
        assert_eq!(FieldValue::Url(url).to_json(), json!("https://example.dev/"));
        assert_eq!(FieldValue::Float(f64::NAN).to_json(), Value::Null);
        assert_eq!(
            FieldValue::List(vec!["a".into(), "b".into()]).type_name(),
            "list<string>"
        );
    }
}
