//! Structural descriptions generated from schema definitions
//!
//! Two views are produced without touching any payload:
//! - [`SchemaDescription`], a serde round-trippable table of fields,
//!   constraints, rules and computed fields;
//! - a JSON Schema (draft 2020-12) document for the input side of the schema.
//!
//! Copyright (c) 2025 SchemaDeck Team
//! Licensed under the Apache-2.0 license

use crate::schema::definition::{ExtraPolicy, SchemaDefinition};
use crate::schema::field::{Constraints, FieldSpec, FieldType};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Map, Value};

const JSON_SCHEMA_DIALECT: &str = "https://json-schema.org/draft/2020-12/schema";

/// Keeps an explicit `null` as `Some(Value::Null)`
fn present_value<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

/// One constraint as `{rule, value}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstraintDescription {
    pub rule: String,
    pub value: Value,
}

/// Description of a declared field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescription {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(rename = "type")]
    pub type_name: String,
    pub required: bool,
    pub nullable: bool,
    /// Declared default; `Some(null)` for `Optional` fields
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present_value"
    )]
    pub default: Option<Value>,
    pub strict: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<ConstraintDescription>,
    /// Accepted literals of an enum field
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<String>>,
    /// Description of a nested model field
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nested: Option<Box<SchemaDescription>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Description of a computed field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputedDescription {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub description: String,
}

/// Description of a cross-field rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleDescription {
    pub name: String,
    pub description: String,
}

/// Static structural description of a schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaDescription {
    pub name: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub extra: ExtraPolicy,
    pub populate_by_name: bool,
    pub fields: Vec<FieldDescription>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<RuleDescription>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub computed: Vec<ComputedDescription>,
}

impl SchemaDescription {
    pub fn field(&self, name: &str) -> Option<&FieldDescription> {
        self.fields.iter().find(|f| f.name == name)
    }
}

impl SchemaDefinition {
    /// Generate the structural description
    pub fn describe(&self) -> SchemaDescription {
        SchemaDescription {
            name: self.name.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            extra: self.extra,
            populate_by_name: self.populate_by_name,
            fields: self.fields.iter().map(describe_field).collect(),
            rules: self
                .validators
                .iter()
                .map(|v| RuleDescription {
                    name: v.name.clone(),
                    description: v.description.clone(),
                })
                .collect(),
            computed: self
                .computed
                .iter()
                .map(|c| ComputedDescription {
                    name: c.name.clone(),
                    type_name: c.field_type.type_name(),
                    description: c.description.clone(),
                })
                .collect(),
        }
    }

    /// Generate a JSON Schema for the input accepted by this schema.
    ///
    /// Properties are keyed by external names. Nested models and enums are
    /// placed under `$defs` by title, suffixed `_2`, `_3`... when distinct
    /// definitions share a title. Computed fields are output-only and are
    /// left out.
    pub fn json_schema(&self) -> Value {
        let mut defs = Map::new();
        let mut root = object_schema(self, &mut defs);
        if let Value::Object(map) = &mut root {
            let mut document = Map::new();
            document.insert("$schema".to_string(), json!(JSON_SCHEMA_DIALECT));
            document.append(map);
            if !defs.is_empty() {
                document.insert("$defs".to_string(), Value::Object(defs));
            }
            return Value::Object(document);
        }
        root
    }
}

fn describe_field(field: &FieldSpec) -> FieldDescription {
    let choices = match &field.field_type {
        FieldType::Enum { values, .. } => Some(values.clone()),
        _ => None,
    };
    let nested = field
        .field_type
        .nested_schema()
        .map(|schema| Box::new(schema.describe()));

    FieldDescription {
        name: field.name.clone(),
        alias: field.alias.clone(),
        type_name: field.field_type.type_name(),
        required: field.is_required(),
        nullable: field.nullable,
        default: field.declared_default().map(|v| v.to_json()),
        strict: field.strict,
        constraints: describe_constraints(&field.constraints),
        choices,
        nested,
        description: field.description.clone(),
    }
}

fn describe_constraints(constraints: &Constraints) -> Vec<ConstraintDescription> {
    let mut described = Vec::new();
    let mut push = |rule: &str, value: Value| {
        described.push(ConstraintDescription {
            rule: rule.to_string(),
            value,
        })
    };

    if let Some(v) = constraints.gt {
        push("gt", number(v));
    }
    if let Some(v) = constraints.ge {
        push("ge", number(v));
    }
    if let Some(v) = constraints.lt {
        push("lt", number(v));
    }
    if let Some(v) = constraints.le {
        push("le", number(v));
    }
    if let Some(v) = constraints.min_length {
        push("min_length", json!(v));
    }
    if let Some(v) = constraints.max_length {
        push("max_length", json!(v));
    }
    if let Some(pattern) = &constraints.pattern {
        push("pattern", json!(pattern.as_str()));
    }
    described
}

/// Render whole-number bounds as JSON integers
fn number(value: f64) -> Value {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        json!(value as i64)
    } else {
        json!(value)
    }
}

fn object_schema(schema: &SchemaDefinition, defs: &mut Map<String, Value>) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();

    for field in &schema.fields {
        let key = field.external_name().to_string();
        if field.is_required() {
            required.push(json!(key));
        }
        properties.insert(key, field_schema(field, defs));
    }

    let mut object = Map::new();
    object.insert("title".to_string(), json!(schema.title));
    if let Some(description) = &schema.description {
        object.insert("description".to_string(), json!(description));
    }
    object.insert("type".to_string(), json!("object"));
    object.insert("properties".to_string(), Value::Object(properties));
    if !required.is_empty() {
        object.insert("required".to_string(), Value::Array(required));
    }
    if schema.extra == ExtraPolicy::Forbid {
        object.insert("additionalProperties".to_string(), json!(false));
    }
    Value::Object(object)
}

fn field_schema(field: &FieldSpec, defs: &mut Map<String, Value>) -> Value {
    let mut base = type_schema(&field.field_type, defs);
    if let Value::Object(map) = &mut base {
        apply_constraints(map, &field.field_type, &field.constraints);
    }

    let mut schema = if field.nullable {
        json!({ "anyOf": [base, { "type": "null" }] })
    } else {
        base
    };

    if let Value::Object(map) = &mut schema {
        if let Some(default) = field.declared_default() {
            map.insert("default".to_string(), default.to_json());
        }
        if let Some(description) = &field.description {
            map.insert("description".to_string(), json!(description));
        }
    }
    schema
}

fn type_schema(field_type: &FieldType, defs: &mut Map<String, Value>) -> Value {
    match field_type {
        FieldType::String => json!({ "type": "string" }),
        FieldType::Integer => json!({ "type": "integer" }),
        FieldType::Float => json!({ "type": "number" }),
        FieldType::Boolean => json!({ "type": "boolean" }),
        FieldType::Date => json!({ "type": "string", "format": "date" }),
        FieldType::Email => json!({ "type": "string", "format": "email" }),
        FieldType::Url => json!({ "type": "string", "format": "uri", "minLength": 1 }),
        FieldType::List(item) => json!({ "type": "array", "items": type_schema(item, defs) }),
        FieldType::Enum { name, values } => {
            let key = define(defs, name, json!({ "title": name, "type": "string", "enum": values }));
            json!({ "$ref": format!("#/$defs/{}", key) })
        }
        FieldType::Model(schema) => {
            let nested = object_schema(schema, defs);
            let key = define(defs, &schema.title, nested);
            json!({ "$ref": format!("#/$defs/{}", key) })
        }
    }
}

/// Store a definition under `name`, reusing an identical entry. A different
/// definition already holding the name pushes this one to `name_2`, `name_3`...
fn define(defs: &mut Map<String, Value>, name: &str, definition: Value) -> String {
    let mut key = name.to_string();
    let mut suffix = 1;
    loop {
        match defs.get(&key) {
            None => {
                defs.insert(key.clone(), definition);
                return key;
            }
            Some(existing) if *existing == definition => return key,
            Some(_) => {
                suffix += 1;
                key = format!("{}_{}", name, suffix);
            }
        }
    }
}

fn apply_constraints(map: &mut Map<String, Value>, field_type: &FieldType, constraints: &Constraints) {
    if let Some(v) = constraints.gt {
        map.insert("exclusiveMinimum".to_string(), number(v));
    }
    if let Some(v) = constraints.ge {
        map.insert("minimum".to_string(), number(v));
    }
    if let Some(v) = constraints.lt {
        map.insert("exclusiveMaximum".to_string(), number(v));
    }
    if let Some(v) = constraints.le {
        map.insert("maximum".to_string(), number(v));
    }

    let (min_key, max_key) = if field_type.is_list() {
        ("minItems", "maxItems")
    } else {
        ("minLength", "maxLength")
    };
    if let Some(v) = constraints.min_length {
        map.insert(min_key.to_string(), json!(v));
    }
    if let Some(v) = constraints.max_length {
        map.insert(max_key.to_string(), json!(v));
    }
    if let Some(pattern) = &constraints.pattern {
        map.insert("pattern".to_string(), json!(pattern.as_str()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::value::FieldValue;

    fn order() -> SchemaDefinition {
        SchemaDefinition::builder("order")
            .title("Order")
            .field(FieldSpec::new("price", FieldType::Float).gt(0.0))
            .field(FieldSpec::new("quantity", FieldType::Integer).ge(1.0).default_value(FieldValue::Int(1)))
            .field(FieldSpec::new("note", FieldType::String).optional())
            .forbid_extra()
            .computed("total", FieldType::Float, "price times quantity", |_| FieldValue::Float(0.0))
            .build()
            .unwrap()
    }

    #[test]
    fn test_describe_lists_constraints_and_defaults() {
        let description = order().describe();
        let price = description.field("price").unwrap();
        assert!(price.required);
        assert_eq!(price.constraints, vec![ConstraintDescription { rule: "gt".into(), value: json!(0) }]);

        let quantity = description.field("quantity").unwrap();
        assert!(!quantity.required);
        assert_eq!(quantity.default, Some(json!(1)));

        let note = description.field("note").unwrap();
        assert!(note.nullable);
        assert_eq!(note.default, Some(Value::Null));

        assert_eq!(description.computed[0].name, "total");
        assert_eq!(description.extra, ExtraPolicy::Forbid);
    }

    #[test]
    fn test_null_default_survives_round_trip() {
        let description = order().describe();
        let text = serde_json::to_string(&description).unwrap();
        let back: SchemaDescription = serde_json::from_str(&text).unwrap();
        assert_eq!(back.field("note").unwrap().default, Some(Value::Null));
        assert_eq!(back.field("price").unwrap().default, None);
    }

    #[test]
    fn test_json_schema_shape() {
        let schema = order().json_schema();
        assert_eq!(schema["$schema"], JSON_SCHEMA_DIALECT);
        assert_eq!(schema["title"], "Order");
        assert_eq!(schema["required"], json!(["price"]));
        assert_eq!(schema["additionalProperties"], json!(false));
        assert_eq!(schema["properties"]["price"]["exclusiveMinimum"], json!(0));
        assert_eq!(schema["properties"]["note"]["anyOf"][1], json!({"type": "null"}));
        assert!(schema["properties"].get("total").is_none());
    }

    #[test]
    fn test_same_titled_definitions_get_distinct_keys() {
        let home = SchemaDefinition::builder("home")
            .title("Address")
            .field(FieldSpec::new("street", FieldType::String))
            .build()
            .unwrap();
        let office = SchemaDefinition::builder("office")
            .title("Address")
            .field(FieldSpec::new("building", FieldType::Integer))
            .build()
            .unwrap();
        let schema = SchemaDefinition::builder("contact")
            .field(FieldSpec::new("home", FieldType::model(home.clone())))
            .field(FieldSpec::new("office", FieldType::model(office)))
            .field(FieldSpec::new("billing", FieldType::model(home)))
            .field(FieldSpec::new("state", FieldType::one_of("Status", ["open", "closed"])))
            .field(FieldSpec::new("phase", FieldType::one_of("Status", ["draft", "final"])))
            .build()
            .unwrap()
            .json_schema();

        let properties = &schema["properties"];
        assert_eq!(properties["home"]["$ref"], "#/$defs/Address");
        assert_eq!(properties["office"]["$ref"], "#/$defs/Address_2");
        assert_eq!(properties["billing"]["$ref"], "#/$defs/Address");
        assert_eq!(schema["$defs"]["Address_2"]["required"], json!(["building"]));

        assert_eq!(properties["state"]["$ref"], "#/$defs/Status");
        assert_eq!(properties["phase"]["$ref"], "#/$defs/Status_2");
        assert_eq!(schema["$defs"]["Status_2"]["enum"], json!(["draft", "final"]));
    }
}
