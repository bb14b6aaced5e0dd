//! Unit tests for the validation engine against the built-in schemas
//!
//! Each module exercises one behavior of the validate-and-report cycle,
//! checking both the accepted instance and the exact shape of the error
//! report.

use serde_json::{json, Value};
use schemadeck_core::{
    registry, ErrorKind, FieldValue, SchemaDefinition, SchemaValidator, ValidationContext,
    ValidationMode,
};

fn schema(name: &str) -> &'static SchemaDefinition {
    registry::get_schema(name).unwrap()
}

fn kinds(report: &schemadeck_core::ValidationErrors) -> Vec<ErrorKind> {
    report.iter().map(|e| e.kind).collect()
}

#[cfg(test)]
mod coercion {
    use super::*;

    #[test]
    fn test_numeric_string_coerces_in_lax_schema() {
        let instance = schema("item")
            .validate(&json!({"name": "Gadget", "price": "19.99", "quantity": "42"}))
            .unwrap();
        assert_eq!(instance.get("quantity"), Some(&FieldValue::Int(42)));
        assert_eq!(instance.get("price"), Some(&FieldValue::Float(19.99)));
    }

    #[test]
    fn test_numeric_string_rejected_by_strict_mode() {
        let context = ValidationContext::new(ValidationMode::Strict);
        let report = schema("item")
            .validate_with_context(&json!({"name": "Gadget", "price": 19.99, "quantity": "42"}), &context)
            .unwrap_err();
        assert_eq!(report.len(), 1);
        assert_eq!(report.errors[0].path, "quantity");
        assert_eq!(report.errors[0].kind, ErrorKind::TypeMismatch);
    }

    #[test]
    fn test_numeric_string_rejected_by_strict_field() {
        let report = schema("strict_data")
            .validate(&json!({"strict_user_id": "42", "user_email": "test@example.com"}))
            .unwrap_err();
        assert_eq!(report.len(), 1);
        assert_eq!(report.errors[0].path, "strict_user_id");
        assert_eq!(report.errors[0].kind, ErrorKind::TypeMismatch);
        assert_eq!(report.errors[0].input, Some(json!("42")));
    }

    #[test]
    fn test_strict_field_accepts_native_integer() {
        let instance = schema("strict_data")
            .validate(&json!({"strict_user_id": 42, "user_email": "test@example.com"}))
            .unwrap();
        assert_eq!(instance.get("strict_user_id"), Some(&FieldValue::Int(42)));
        assert_eq!(instance.get("website"), Some(&FieldValue::Null));
    }

    #[test]
    fn test_special_strings() {
        let report = schema("strict_data")
            .validate(&json!({
                "strict_user_id": 1,
                "user_email": "not-an-email",
                "website": "example"
            }))
            .unwrap_err();
        assert_eq!(kinds(&report), vec![ErrorKind::ConstraintViolation, ErrorKind::ConstraintViolation]);
        assert_eq!(report.errors[0].path, "user_email");
        assert_eq!(report.errors[1].path, "website");
    }
}

#[cfg(test)]
mod required_fields {
    use super::*;

    #[test]
    fn test_missing_field_reported_with_other_errors() {
        let report = schema("item")
            .validate(&json!({"price": "-5", "quantity": "many"}))
            .unwrap_err();

        assert_eq!(
            kinds(&report),
            vec![
                ErrorKind::MissingRequiredField,
                ErrorKind::ConstraintViolation,
                ErrorKind::TypeMismatch,
            ]
        );
        assert_eq!(report.errors[0].path, "name");
        assert_eq!(report.errors[1].path, "price");
        assert_eq!(report.errors[2].path, "quantity");
    }

    #[test]
    fn test_missing_aliased_field_uses_external_name() {
        let report = schema("product")
            .validate(&json!({"productId": 1, "itemName": "Mouse"}))
            .unwrap_err();
        assert_eq!(report.len(), 1);
        assert_eq!(report.errors[0].path, "stockCount");
    }

    #[test]
    fn test_defaults_are_used_as_declared() {
        let instance = schema("item").validate(&json!({"name": "Gadget", "price": 1})).unwrap();
        assert_eq!(instance.get("description"), Some(&FieldValue::Null));
        assert_eq!(instance.get("quantity"), Some(&FieldValue::Int(1)));
        assert_eq!(instance.get("tags"), Some(&FieldValue::List(vec![])));
    }
}

#[cfg(test)]
mod cross_field {
    use super::*;

    #[test]
    fn test_reversed_dates_fail_with_cross_field_only() {
        let report = schema("event")
            .validate(&json!({"name": "Conference", "start_date": "2024-02-01", "end_date": "2024-01-01"}))
            .unwrap_err();
        assert_eq!(kinds(&report), vec![ErrorKind::CrossFieldViolation]);
        assert_eq!(report.errors[0].path, "");
        assert_eq!(report.errors[0].message, "End date cannot be before start date");
        assert_eq!(report.errors[0].violations[0].rule, "check_dates");
    }

    #[test]
    fn test_rule_skipped_when_a_field_fails() {
        let report = schema("event")
            .validate(&json!({"name": "Conference", "start_date": "2024-02-30", "end_date": "2024-01-01"}))
            .unwrap_err();
        assert_eq!(kinds(&report), vec![ErrorKind::TypeMismatch]);
        assert_eq!(report.errors[0].path, "start_date");
    }

    #[test]
    fn test_same_day_is_accepted() {
        assert!(schema("event")
            .validate(&json!({"name": "Meetup", "start_date": "2024-02-01", "end_date": "2024-02-01"}))
            .is_ok());
    }
}

#[cfg(test)]
mod extra_fields {
    use super::*;

    #[test]
    fn test_undeclared_key_rejected() {
        let report = schema("configured")
            .validate(&json!({"expected_field": "some value", "foo": 1}))
            .unwrap_err();
        assert_eq!(kinds(&report), vec![ErrorKind::UnexpectedField]);
        assert_eq!(report.errors[0].path, "foo");
    }

    #[test]
    fn test_unexpected_fields_follow_field_errors_in_payload_order() {
        let report = schema("configured")
            .validate(&json!({"zeta": 1, "optional_field": "x", "alpha": 2}))
            .unwrap_err();
        let paths: Vec<&str> = report.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["expected_field", "optional_field", "zeta", "alpha"]);
    }

    #[test]
    fn test_permissive_schema_drops_extras() {
        let instance = schema("task")
            .validate(&json!({"task_id": "t-1", "status": "running", "foo": true}))
            .unwrap();
        assert_eq!(instance.field_names(), vec!["task_id", "status"]);
    }

    #[test]
    fn test_internal_name_is_extra_for_aliased_schema() {
        let report = schema("product")
            .validate(&json!({"productId": 1, "item_name": "x", "stockCount": 3}))
            .unwrap_err();
        assert_eq!(kinds(&report), vec![ErrorKind::MissingRequiredField]);
        assert_eq!(report.errors[0].path, "itemName");
    }
}

#[cfg(test)]
mod nested {
    use super::*;

    fn user(zip: &str) -> Value {
        json!({
            "username": "john_doe",
            "email": "john.doe@example.com",
            "address": {"street": "123 Main St", "city": "Anytown", "zip_code": zip}
        })
    }

    #[test]
    fn test_inner_error_carries_full_path() {
        let report = schema("user").validate(&user("ABCDE")).unwrap_err();
        assert_eq!(report.len(), 1);
        assert_eq!(report.errors[0].path, "address.zip_code");
        assert_eq!(report.errors[0].kind, ErrorKind::ConstraintViolation);
        assert_eq!(report.errors[0].violations[0].rule, "pattern");
    }

    #[test]
    fn test_nested_instance() {
        let instance = schema("user").validate(&user("12345-6789")).unwrap();
        let address = instance.get("address").and_then(FieldValue::as_model).unwrap();
        assert_eq!(address.schema, "address");
        assert_eq!(address.get("city").and_then(FieldValue::as_str), Some("Anytown"));
    }

    #[test]
    fn test_list_item_paths() {
        let mut payload = user("12345");
        payload["hobbies"] = json!(["coding", 3, "hiking", null]);
        let report = schema("user").validate(&payload).unwrap_err();
        let paths: Vec<&str> = report.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["hobbies[1]", "hobbies[3]"]);
    }

    #[test]
    fn test_nested_object_must_be_an_object() {
        let mut payload = user("12345");
        payload["address"] = json!("123 Main St");
        let report = schema("user").validate(&payload).unwrap_err();
        assert_eq!(report.errors[0].path, "address");
        assert_eq!(report.errors[0].kind, ErrorKind::TypeMismatch);
    }
}

#[cfg(test)]
mod computed {
    use super::*;

    #[test]
    fn test_total_cost_is_derived() {
        let instance = schema("order_item")
            .validate(&json!({"item_name": "Laptop", "price": 1200.0, "quantity": 2}))
            .unwrap();
        assert_eq!(instance.get("total_cost"), Some(&FieldValue::Float(2400.0)));
        let computed: Vec<&str> = instance.computed_fields().map(|f| f.name.as_str()).collect();
        assert_eq!(computed, vec!["total_cost"]);
    }

    #[test]
    fn test_supplied_computed_value_rejected_when_extras_forbidden() {
        let report = schema("order_item")
            .validate(&json!({"item_name": "Laptop", "price": 10.0, "quantity": 2, "total_cost": 1}))
            .unwrap_err();
        assert_eq!(kinds(&report), vec![ErrorKind::UnexpectedField]);
        assert_eq!(report.errors[0].path, "total_cost");
    }

    #[test]
    fn test_supplied_computed_value_ignored_when_permissive() {
        let instance = schema("line_item")
            .validate(&json!({"item_name": "Laptop", "price": 10.0, "quantity": 2, "total_cost": 1}))
            .unwrap();
        assert_eq!(instance.get("total_cost"), Some(&FieldValue::Float(20.0)));
    }

    #[test]
    fn test_not_computed_when_invalid() {
        let report = schema("order_item")
            .validate(&json!({"item_name": "Laptop", "price": 10.0, "quantity": 0}))
            .unwrap_err();
        assert_eq!(report.errors[0].path, "quantity");
        assert_eq!(report.errors[0].message, "Input should be greater than or equal to 1");
    }
}

#[cfg(test)]
mod enums {
    use super::*;

    #[test]
    fn test_enum_membership() {
        assert!(schema("task").validate(&json!({"task_id": "t", "status": "failed"})).is_ok());

        let report = schema("task")
            .validate(&json!({"task_id": "t", "status": "unknown"}))
            .unwrap_err();
        assert_eq!(kinds(&report), vec![ErrorKind::ConstraintViolation]);
        assert_eq!(report.errors[0].path, "status");
        assert_eq!(report.errors[0].violations[0].rule, "enum");
    }
}

#[cfg(test)]
mod aliases {
    use super::*;

    #[test]
    fn test_instance_uses_internal_names() {
        let product = schema("product");
        let instance = product
            .validate(&json!({"productId": "101", "itemName": "Wireless Mouse", "stockCount": "50"}))
            .unwrap();
        assert_eq!(instance.field_names(), vec!["product_id", "item_name", "stock_count"]);
        assert_eq!(instance.to_json(), json!({"product_id": 101, "item_name": "Wireless Mouse", "stock_count": 50}));
        assert_eq!(
            product.dump_by_alias(&instance),
            json!({"productId": 101, "itemName": "Wireless Mouse", "stockCount": 50})
        );
    }
}

#[cfg(test)]
mod round_trip {
    use super::*;

    #[test]
    fn test_refeeding_instances_yields_equal_instances() {
        let cases = [
            ("item", json!({"name": "Gadget", "price": "19.99", "tags": ["a", "b"]})),
            ("user", json!({
                "username": "john_doe",
                "email": "john.doe@example.com",
                "address": {"street": "1 Way", "city": "Town", "zip_code": "12345"},
                "hobbies": ["coding"]
            })),
            ("event", json!({"name": "E", "start_date": "2024-01-01", "end_date": "2024-01-02"})),
            ("order_item", json!({"item_name": "Laptop", "price": "1200", "quantity": "3"})),
            ("product", json!({"productId": "101", "itemName": "Mouse", "stockCount": 0})),
            ("strict_data", json!({"strict_user_id": 7, "user_email": "a@b.io", "website": "https://example.dev"})),
            ("task", json!({"task_id": "t", "status": "completed"})),
            ("configured", json!({"expected_field": "x", "optional_field": "4"})),
        ];

        for (name, payload) in cases {
            let schema = schema(name);
            let first = schema.validate(&payload).unwrap();
            let again = schema.validate(&schema.to_payload(&first)).unwrap();
            assert_eq!(first, again, "instance of {} changed when re-fed", name);
        }
    }
}

#[cfg(test)]
mod reports {
    use super::*;

    #[test]
    fn test_exactly_one_outcome() {
        let payloads = [json!(null), json!([]), json!("x"), json!({}), json!({"task_id": "t", "status": "pending"})];
        for payload in &payloads {
            let result = schema("task").validate(payload);
            match result {
                Ok(instance) => assert!(!instance.is_empty()),
                Err(report) => assert!(!report.is_empty()),
            }
        }
    }

    #[test]
    fn test_validation_is_deterministic() {
        let payload = json!({"price": "x", "quantity": -1, "tags": [1, 2]});
        let first = schema("item").validate(&payload).unwrap_err();
        let second = schema("item").validate(&payload).unwrap_err();
        assert_eq!(first, second);
    }

    #[test]
    fn test_report_serializes_kinds_in_snake_case() {
        let report = schema("task").validate(&json!({})).unwrap_err();
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["schema"], "task");
        assert_eq!(value["errors"][0]["kind"], "missing_required_field");
        assert_eq!(value["errors"][0]["path"], "task_id");
    }
}
