//! Input adapter: form values to raw payloads
//!
//! The adapter only shapes input. It applies the empty/absent rule and
//! splits comma-separated list text, and leaves every other decision about
//! types to the validation engine.
//!
//! Copyright (c) 2025 SchemaDeck Team
//! Licensed under the Apache-2.0 license

use crate::schema::{FieldSpec, FieldType, SchemaDefinition};
use chrono::NaiveDate;
use serde_json::{Map, Number, Value};
use thiserror::Error;
use tracing::trace;

/// Errors raised while assembling form input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdapterError {
    #[error("invalid assignment '{input}', expected key=value")]
    InvalidAssignment { input: String },

    #[error("empty key in assignment '{input}'")]
    EmptyKey { input: String },

    #[error("'{path}' is already set to a value and cannot hold nested keys")]
    ConflictingPath { path: String },

    #[error("'{value}' is not a number")]
    InvalidNumber { value: String },
}

/// Value of a single form widget
#[derive(Debug, Clone, PartialEq)]
pub enum FormValue {
    /// Free text
    Text(String),
    /// Text the form could not classify; sent as an integer when it parses
    LooseInteger(String),
    /// Native numeric widget
    Number(Number),
    /// Checkbox
    Flag(bool),
    /// Date picker
    Date(NaiveDate),
    /// Multi-value widget
    Items(Vec<String>),
    /// Nested form
    Group(FormInput),
    /// Widget left empty, sent as `null`
    Absent,
}

impl FormValue {
    pub fn text<S: Into<String>>(value: S) -> Self {
        FormValue::Text(value.into())
    }

    /// Parse a native number from its text
    pub fn number(value: &str) -> Result<Self, AdapterError> {
        value
            .trim()
            .parse::<Number>()
            .map(FormValue::Number)
            .map_err(|_| AdapterError::InvalidNumber {
                value: value.to_string(),
            })
    }
}

impl From<i64> for FormValue {
    fn from(value: i64) -> Self {
        FormValue::Number(Number::from(value))
    }
}

/// NaN and infinities have no JSON number form and are refused
impl TryFrom<f64> for FormValue {
    type Error = AdapterError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Number::from_f64(value)
            .map(FormValue::Number)
            .ok_or_else(|| AdapterError::InvalidNumber {
                value: value.to_string(),
            })
    }
}

impl From<bool> for FormValue {
    fn from(value: bool) -> Self {
        FormValue::Flag(value)
    }
}

impl From<NaiveDate> for FormValue {
    fn from(value: NaiveDate) -> Self {
        FormValue::Date(value)
    }
}

/// Ordered widget values keyed by external field name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormInput {
    entries: Vec<(String, FormValue)>,
}

impl FormInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`FormInput::assign`]
    pub fn with<K: Into<String>, V: Into<FormValue>>(mut self, key: K, value: V) -> Self {
        self.assign(key, value.into());
        self
    }

    /// Set a value, replacing an earlier one in place
    pub fn assign<K: Into<String>>(&mut self, key: K, value: FormValue) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Set a value at a dotted path, creating nested groups on the way
    pub fn assign_path(&mut self, path: &str, value: FormValue) -> Result<(), AdapterError> {
        let segments: Vec<&str> = path.split('.').map(str::trim).collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Err(AdapterError::EmptyKey {
                input: path.to_string(),
            });
        }
        self.assign_segments(&segments, path, value)
    }

    fn assign_segments(&mut self, segments: &[&str], path: &str, value: FormValue) -> Result<(), AdapterError> {
        match segments {
            [] => Ok(()),
            [last] => {
                self.assign(*last, value);
                Ok(())
            }
            [head, rest @ ..] => {
                if self.get(head).is_none() {
                    self.assign(*head, FormValue::Group(FormInput::new()));
                }
                match self.get_mut(head) {
                    Some(FormValue::Group(group)) => group.assign_segments(rest, path, value),
                    _ => Err(AdapterError::ConflictingPath {
                        path: path.to_string(),
                    }),
                }
            }
        }
    }

    /// Apply a `key=value` or `a.b=value` assignment as text
    pub fn parse_assignment(&mut self, assignment: &str) -> Result<(), AdapterError> {
        let (key, value) = split_assignment(assignment)?;
        self.assign_path(key, FormValue::text(value))
    }

    pub fn get(&self, key: &str) -> Option<&FormValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    fn get_mut(&mut self, key: &str) -> Option<&mut FormValue> {
        self.entries.iter_mut().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FormValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Split `key=value` at the first `=`
pub fn split_assignment(assignment: &str) -> Result<(&str, &str), AdapterError> {
    let (key, value) = assignment
        .split_once('=')
        .ok_or_else(|| AdapterError::InvalidAssignment {
            input: assignment.to_string(),
        })?;
    let key = key.trim();
    if key.is_empty() {
        return Err(AdapterError::EmptyKey {
            input: assignment.to_string(),
        });
    }
    Ok((key, value))
}

/// Convert form input into the raw payload a schema expects
pub fn to_payload(schema: &SchemaDefinition, input: &FormInput) -> Value {
    let mut payload = Map::new();
    for (key, value) in input.iter() {
        let field = schema.field_for_key(key);
        match adapt_value(field, value) {
            Some(raw) => {
                payload.insert(key.to_string(), raw);
            }
            None => trace!(key, "empty optional input omitted"),
        }
    }
    Value::Object(payload)
}

/// `None` means the key is left out of the payload
fn adapt_value(field: Option<&FieldSpec>, value: &FormValue) -> Option<Value> {
    match value {
        FormValue::Text(text) => adapt_text(field, text),
        FormValue::LooseInteger(text) => Some(match text.trim().parse::<i64>() {
            Ok(n) => Value::from(n),
            Err(_) => Value::String(text.clone()),
        }),
        FormValue::Number(n) => Some(Value::Number(n.clone())),
        FormValue::Flag(b) => Some(Value::Bool(*b)),
        FormValue::Date(d) => Some(Value::String(d.format("%Y-%m-%d").to_string())),
        FormValue::Items(items) => Some(Value::Array(items.iter().cloned().map(Value::String).collect())),
        FormValue::Group(group) => Some(match field.and_then(|f| f.field_type.nested_schema()) {
            Some(nested) => to_payload(nested, group),
            None => untyped_payload(group),
        }),
        FormValue::Absent => Some(Value::Null),
    }
}

fn adapt_text(field: Option<&FieldSpec>, text: &str) -> Option<Value> {
    let Some(field) = field else {
        return Some(Value::String(text.to_string()));
    };

    if text.trim().is_empty() && field.is_optional() && !field.field_type.is_string() {
        return None;
    }

    match &field.field_type {
        FieldType::List(_) => Some(Value::Array(
            text.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| Value::String(s.to_string()))
                .collect(),
        )),
        _ => Some(Value::String(text.to_string())),
    }
}

/// Groups the schema does not describe are passed through as-is
fn untyped_payload(input: &FormInput) -> Value {
    let map: Map<String, Value> = input
        .iter()
        .filter_map(|(key, value)| adapt_value(None, value).map(|raw| (key.to_string(), raw)))
        .collect();
    Value::Object(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldValue;
    use serde_json::json;

    fn item() -> SchemaDefinition {
        SchemaDefinition::builder("item")
            .field(FieldSpec::new("name", FieldType::String))
            .field(FieldSpec::new("description", FieldType::String).optional())
            .field(FieldSpec::new("quantity", FieldType::Integer).default_value(FieldValue::Int(1)))
            .field(FieldSpec::new("tags", FieldType::list_of(FieldType::String)).default_value(FieldValue::List(vec![])))
            .build()
            .unwrap()
    }

    #[test]
    fn test_empty_text_omitted_for_optional_non_string() {
        let input = FormInput::new()
            .with("name", FormValue::text(""))
            .with("description", FormValue::text(""))
            .with("quantity", FormValue::text(" "));
        let payload = to_payload(&item(), &input);
        assert_eq!(payload, json!({"name": "", "description": ""}));
    }

    #[test]
    fn test_list_text_is_split() {
        let input = FormInput::new().with("tags", FormValue::text("tech, cool,, "));
        assert_eq!(to_payload(&item(), &input), json!({"tags": ["tech", "cool"]}));
    }

    #[test]
    fn test_numeric_text_is_not_converted() {
        let input = FormInput::new().with("quantity", FormValue::text("3"));
        assert_eq!(to_payload(&item(), &input), json!({"quantity": "3"}));
    }

    #[test]
    fn test_loose_integer() {
        let input = FormInput::new()
            .with("a", FormValue::LooseInteger("123".into()))
            .with("b", FormValue::LooseInteger("12x".into()));
        assert_eq!(to_payload(&item(), &input), json!({"a": 123, "b": "12x"}));
    }

    #[test]
    fn test_unknown_keys_pass_through() {
        let input = FormInput::new()
            .with("foo", FormValue::text(""))
            .with("when", NaiveDate::from_ymd_opt(2024, 5, 1).unwrap())
            .with("gone", FormValue::Absent);
        assert_eq!(
            to_payload(&item(), &input),
            json!({"foo": "", "when": "2024-05-01", "gone": null})
        );
    }

    #[test]
    fn test_parse_assignment_builds_groups() {
        let mut input = FormInput::new();
        input.parse_assignment("address.city=Anytown").unwrap();
        input.parse_assignment("address.zip_code=98765").unwrap();
        input.parse_assignment("name=a=b").unwrap();

        match input.get("address") {
            Some(FormValue::Group(group)) => assert_eq!(group.len(), 2),
            other => panic!("expected a group, got {:?}", other),
        }
        assert_eq!(input.get("name"), Some(&FormValue::text("a=b")));
    }

    #[test]
    fn test_parse_assignment_errors() {
        let mut input = FormInput::new();
        assert!(matches!(input.parse_assignment("novalue"), Err(AdapterError::InvalidAssignment { .. })));
        assert!(matches!(input.parse_assignment("=x"), Err(AdapterError::EmptyKey { .. })));
        input.parse_assignment("a=1").unwrap();
        assert!(matches!(input.parse_assignment("a.b=2"), Err(AdapterError::ConflictingPath { .. })));
    }

    #[test]
    fn test_number_widget() {
        assert_eq!(FormValue::number("1200.0").unwrap(), FormValue::try_from(1200.0_f64).unwrap());
        assert!(FormValue::number("abc").is_err());
    }

    #[test]
    fn test_non_finite_numbers_are_refused() {
        for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(
                FormValue::try_from(value),
                Err(AdapterError::InvalidNumber { .. })
            ));
        }
    }
}
