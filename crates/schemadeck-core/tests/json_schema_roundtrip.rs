//! Cross-checks of generated schema metadata
//!
//! The JSON Schema documents are compiled with an independent validator and
//! must agree with the engine on canonical payloads. Structural descriptions
//! must survive serde round trips.

use schemadeck_core::adapter::to_payload;
use schemadeck_core::{registry, SchemaDescription, SchemaRegistry, SchemaValidator};
use serde_json::{json, Value};

fn compiled(name: &str) -> jsonschema::Validator {
    let schema = registry::get_schema(name).unwrap().json_schema();
    jsonschema::validator_for(&schema).unwrap()
}

#[test]
fn test_generated_schemas_compile() {
    for name in registry::list_schemas().unwrap() {
        let schema = registry::get_schema(name).unwrap().json_schema();
        assert!(
            jsonschema::validator_for(&schema).is_ok(),
            "schema for {} does not compile: {}",
            name,
            schema
        );
    }
}

#[test]
fn test_canonical_samples_accepted() {
    for entry in SchemaRegistry::builtin().unwrap().entries() {
        let instance = entry.schema.validate(&to_payload(&entry.schema, &entry.sample)).unwrap();
        let canonical = entry.schema.to_payload(&instance);
        assert!(
            compiled(entry.name()).is_valid(&canonical),
            "{} rejected its canonical sample {}",
            entry.name(),
            canonical
        );
    }
}

#[test]
fn test_enum_violation_rejected_by_both() {
    let payload = json!({"task_id": "task-abc-123", "status": "unknown"});
    assert!(!compiled("task").is_valid(&payload));
    assert!(!registry::get_schema("task").unwrap().is_valid(&payload));
}

#[test]
fn test_extra_field_rejected_by_both() {
    let payload = json!({"expected_field": "x", "foo": 1});
    assert!(!compiled("configured").is_valid(&payload));
    assert!(!registry::get_schema("configured").unwrap().is_valid(&payload));

    let payload = json!({"item_name": "Laptop", "price": 5.0, "quantity": 1, "total_cost": 5.0});
    assert!(!compiled("order_item").is_valid(&payload));
    assert!(compiled("line_item").is_valid(&payload));
}

#[test]
fn test_bounds_and_patterns_agree() {
    let item = compiled("item");
    assert!(!item.is_valid(&json!({"name": "x", "price": 0})));
    assert!(item.is_valid(&json!({"name": "x", "price": 0.5, "quantity": 0})));
    assert!(!item.is_valid(&json!({"name": "x", "price": 0.5, "quantity": -1})));

    let user = compiled("user");
    let mut payload = json!({
        "username": "john_doe",
        "email": "john.doe@example.com",
        "address": {"street": "123 Main St", "city": "Anytown", "zip_code": "98765"}
    });
    assert!(user.is_valid(&payload));
    payload["address"]["zip_code"] = json!("ABCDE");
    assert!(!user.is_valid(&payload));
}

#[test]
fn test_nested_models_and_enums_live_in_defs() {
    let user = registry::get_schema("user").unwrap().json_schema();
    assert_eq!(user["properties"]["address"]["$ref"], "#/$defs/Address");
    assert_eq!(user["$defs"]["Address"]["required"], json!(["street", "city", "zip_code"]));

    let task = registry::get_schema("task").unwrap().json_schema();
    assert_eq!(
        task["$defs"]["TaskStatus"]["enum"],
        json!(["pending", "running", "completed", "failed"])
    );
}

#[test]
fn test_aliases_are_property_names() {
    let product = registry::get_schema("product").unwrap().json_schema();
    let properties: Vec<&String> = product["properties"].as_object().unwrap().keys().collect();
    assert_eq!(properties, vec!["productId", "itemName", "stockCount"]);
    assert_eq!(product["properties"]["stockCount"]["minimum"], json!(0));
}

#[test]
fn test_descriptions_round_trip_through_serde() {
    for name in registry::list_schemas().unwrap() {
        let description = registry::get_schema(name).unwrap().describe();

        let as_json = serde_json::to_string(&description).unwrap();
        let back: SchemaDescription = serde_json::from_str(&as_json).unwrap();
        assert_eq!(back, description);

        let as_yaml = serde_yaml::to_string(&description).unwrap();
        let back: SchemaDescription = serde_yaml::from_str(&as_yaml).unwrap();
        assert_eq!(back, description);
    }
}

#[test]
fn test_description_shape() {
    let description = registry::get_schema("order_item").unwrap().describe();
    let value: Value = serde_json::to_value(&description).unwrap();
    assert_eq!(value["extra"], "forbid");
    assert_eq!(value["computed"][0]["name"], "total_cost");
    assert_eq!(value["fields"][1]["type"], "float");
    assert_eq!(value["fields"][1]["constraints"][0], json!({"rule": "gt", "value": 0}));

    let user = registry::get_schema("user").unwrap().describe();
    let address = user.field("address").unwrap();
    assert_eq!(address.type_name, "address");
    assert_eq!(address.nested.as_ref().unwrap().fields.len(), 3);
}
