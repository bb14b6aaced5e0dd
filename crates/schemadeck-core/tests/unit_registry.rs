//! Unit tests for the built-in schema registry and its demonstration samples

use schemadeck_core::adapter::to_payload;
use schemadeck_core::{registry, ErrorKind, ExtraPolicy, RegistryError, SchemaRegistry, SchemaValidator};

#[test]
fn test_list_schemas_is_stable() {
    let names = registry::list_schemas().unwrap();
    assert_eq!(
        names,
        vec![
            "item",
            "user",
            "event",
            "order_item",
            "product",
            "strict_data",
            "task",
            "configured",
            "line_item",
        ]
    );
    assert_eq!(names, registry::list_schemas().unwrap());
}

#[test]
fn test_get_schema_unknown_name() {
    assert_eq!(
        registry::get_schema("nope").unwrap_err(),
        RegistryError::UnknownSchema { name: "nope".to_string() }
    );
}

#[test]
fn test_schema_features() {
    let registry = SchemaRegistry::builtin().unwrap();

    assert_eq!(registry.get_schema("configured").unwrap().extra, ExtraPolicy::Forbid);
    assert_eq!(registry.get_schema("order_item").unwrap().extra, ExtraPolicy::Forbid);
    assert_eq!(registry.get_schema("line_item").unwrap().extra, ExtraPolicy::Ignore);
    assert!(registry.get_schema("product").unwrap().has_aliases());
    assert_eq!(registry.get_schema("event").unwrap().validators.len(), 1);
    assert!(registry.get_schema("strict_data").unwrap().field("strict_user_id").unwrap().strict);
    assert!(registry.get_schema("user").unwrap().field("address").unwrap().field_type.nested_schema().is_some());
}

#[test]
fn test_samples_pass_and_invalid_samples_fail() {
    let registry = SchemaRegistry::builtin().unwrap();
    for entry in registry.entries() {
        let payload = to_payload(&entry.schema, &entry.sample);
        assert!(entry.schema.is_valid(&payload), "sample of {} should validate", entry.name());

        let invalid = entry.invalid_sample.as_ref().expect("every built-in entry has an invalid sample");
        let payload = to_payload(&entry.schema, invalid);
        assert!(entry.schema.collect_errors(&payload).is_some(), "invalid sample of {} should fail", entry.name());
    }
}

#[test]
fn test_invalid_samples_show_their_feature() {
    let check = |name: &str, kind: ErrorKind, path: &str| {
        let entry = registry::entry(name).unwrap();
        let payload = to_payload(&entry.schema, entry.invalid_sample.as_ref().unwrap());
        let report = entry.schema.validate(&payload).unwrap_err();
        assert!(
            report.iter().any(|e| e.kind == kind && e.path == path),
            "{}: expected {} at {}, got {}",
            name,
            kind,
            path,
            report
        );
    };

    check("item", ErrorKind::TypeMismatch, "price");
    check("user", ErrorKind::ConstraintViolation, "address.zip_code");
    check("event", ErrorKind::CrossFieldViolation, "");
    check("order_item", ErrorKind::ConstraintViolation, "quantity");
    check("product", ErrorKind::TypeMismatch, "productId");
    check("strict_data", ErrorKind::TypeMismatch, "strict_user_id");
    check("task", ErrorKind::ConstraintViolation, "status");
    check("configured", ErrorKind::UnexpectedField, "extra_field");
    check("line_item", ErrorKind::ConstraintViolation, "price");
}

#[test]
fn test_entries_have_explanations() {
    for entry in SchemaRegistry::builtin().unwrap().entries() {
        assert!(!entry.headline.is_empty());
        assert!(!entry.explanation.is_empty());
    }
}
