//! Built-in demonstration schemas
//!
//! Copyright (c) 2025 SchemaDeck Team
//! Licensed under the Apache-2.0 license

use super::{RegistryEntry, RegistryError, SchemaRegistry};
use crate::adapter::{FormInput, FormValue};
use crate::schema::{FieldSpec, FieldType, FieldValue, SchemaDefinition, ValidatedInstance};
use chrono::NaiveDate;
use regex::Regex;

pub(super) const ZIP_CODE_PATTERN: &str = r"^\d{5}(-\d{4})?$";

pub(super) const TASK_STATUSES: [&str; 4] = ["pending", "running", "completed", "failed"];

pub(super) fn registry() -> Result<SchemaRegistry, RegistryError> {
    let mut registry = SchemaRegistry::new();
    for entry in [item()?, user()?, event()?, order_item()?, product()?, strict_data()?, task()?, configured()?, line_item()?] {
        registry.register(entry)?;
    }
    Ok(registry)
}

fn text(value: &str) -> FormValue {
    FormValue::text(value)
}

fn float(value: f64) -> Result<FormValue, RegistryError> {
    Ok(FormValue::try_from(value)?)
}

fn date(y: i32, m: u32, d: u32) -> FormValue {
    NaiveDate::from_ymd_opt(y, m, d)
        .map(FormValue::Date)
        .unwrap_or(FormValue::Absent)
}

fn item() -> Result<RegistryEntry, RegistryError> {
    let schema = SchemaDefinition::builder("item")
        .title("Item")
        .description("A catalogue item")
        .field(FieldSpec::new("name", FieldType::String))
        .field(FieldSpec::new("description", FieldType::String).optional())
        .field(FieldSpec::new("price", FieldType::Float).gt(0.0))
        .field(
            FieldSpec::new("quantity", FieldType::Integer)
                .ge(0.0)
                .default_value(FieldValue::Int(1)),
        )
        .field(
            FieldSpec::new("tags", FieldType::list_of(FieldType::String))
                .default_value(FieldValue::List(Vec::new())),
        )
        .build()?;

    let sample = FormInput::new()
        .with("name", text("Gadget"))
        .with("price", text("19.99"))
        .with("description", text("A cool gadget."))
        .with("quantity", text("1"))
        .with("tags", text("tech, cool"));
    let invalid = sample
        .clone()
        .with("price", text("free"))
        .with("quantity", text("-1"));

    Ok(RegistryEntry::new(
        schema,
        "Basic validation, defaults and optional fields",
        "Required fields (name, price), an optional description, defaults for \
         quantity and tags, numeric text coerced to numbers, and the bounds \
         price > 0 and quantity >= 0.",
        sample,
    )
    .with_invalid_sample(invalid))
}

fn address() -> Result<SchemaDefinition, RegistryError> {
    Ok(SchemaDefinition::builder("address")
        .title("Address")
        .field(FieldSpec::new("street", FieldType::String))
        .field(FieldSpec::new("city", FieldType::String))
        .field(
            FieldSpec::new("zip_code", FieldType::String)
                .pattern(Regex::new(ZIP_CODE_PATTERN)?)
                .describe("US zip code, 12345 or 12345-6789"),
        )
        .build()?)
}

fn user() -> Result<RegistryEntry, RegistryError> {
    let schema = SchemaDefinition::builder("user")
        .title("User")
        .field(FieldSpec::new("username", FieldType::String))
        .field(FieldSpec::new("email", FieldType::Email))
        .field(FieldSpec::new("address", FieldType::model(address()?)))
        .field(
            FieldSpec::new("hobbies", FieldType::list_of(FieldType::String))
                .default_value(FieldValue::List(Vec::new())),
        )
        .build()?;

    let home = FormInput::new()
        .with("street", text("123 Main St"))
        .with("city", text("Anytown"))
        .with("zip_code", text("98765"));
    let sample = FormInput::new()
        .with("username", text("john_doe"))
        .with("email", text("john.doe@example.com"))
        .with("hobbies", text("coding, hiking"))
        .with("address", FormValue::Group(home.clone()));
    let invalid = sample
        .clone()
        .with("email", text("john.doe"))
        .with("address", FormValue::Group(home.with("zip_code", text("ABCDE"))));

    Ok(RegistryEntry::new(
        schema,
        "Nested models",
        "A user holds an address validated by its own schema; errors inside \
         the address carry the full path, e.g. address.zip_code.",
        sample,
    )
    .with_invalid_sample(invalid))
}

fn dates_in_order(instance: &ValidatedInstance) -> Result<(), String> {
    let start = instance.get("start_date").and_then(FieldValue::as_date);
    let end = instance.get("end_date").and_then(FieldValue::as_date);
    match (start, end) {
        (Some(start), Some(end)) if end < start => Err("End date cannot be before start date".to_string()),
        _ => Ok(()),
    }
}

fn event() -> Result<RegistryEntry, RegistryError> {
    let schema = SchemaDefinition::builder("event")
        .title("Event")
        .field(FieldSpec::new("name", FieldType::String))
        .field(FieldSpec::new("start_date", FieldType::Date))
        .field(FieldSpec::new("end_date", FieldType::Date))
        .model_validator("check_dates", "end_date must not precede start_date", dates_in_order)
        .build()?;

    let sample = FormInput::new()
        .with("name", text("Conference"))
        .with("start_date", date(2024, 6, 1))
        .with("end_date", date(2024, 6, 3));
    let invalid = sample.clone().with("end_date", date(2024, 5, 30));

    Ok(RegistryEntry::new(
        schema,
        "Cross-field model validators",
        "A rule over several fields runs after every field passed its own \
         checks: the end date cannot precede the start date.",
        sample,
    )
    .with_invalid_sample(invalid))
}

fn total_cost(instance: &ValidatedInstance) -> FieldValue {
    let price = instance.get("price").and_then(FieldValue::as_f64).unwrap_or(0.0);
    let quantity = instance.get("quantity").and_then(FieldValue::as_f64).unwrap_or(0.0);
    FieldValue::Float(price * quantity)
}

fn order_fields(name: &str) -> crate::schema::SchemaBuilder {
    SchemaDefinition::builder(name)
        .field(FieldSpec::new("item_name", FieldType::String))
        .field(FieldSpec::new("price", FieldType::Float).gt(0.0))
        .field(FieldSpec::new("quantity", FieldType::Integer).ge(1.0))
        .computed("total_cost", FieldType::Float, "price * quantity", total_cost)
}

fn order_sample() -> Result<FormInput, RegistryError> {
    Ok(FormInput::new()
        .with("item_name", text("Laptop"))
        .with("price", float(1200.0)?)
        .with("quantity", FormValue::from(1_i64)))
}

fn order_item() -> Result<RegistryEntry, RegistryError> {
    let schema = order_fields("order_item").title("OrderItem").forbid_extra().build()?;

    let invalid = order_sample()?
        .with("quantity", FormValue::from(0_i64))
        .with("total_cost", float(5.0)?);

    Ok(RegistryEntry::new(
        schema,
        "Computed fields",
        "total_cost is derived from price and quantity after validation. It is \
         never read from input, and this schema rejects it as an extra field.",
        order_sample()?,
    )
    .with_invalid_sample(invalid))
}

fn line_item() -> Result<RegistryEntry, RegistryError> {
    let schema = order_fields("line_item").title("LineItem").build()?;

    let sample = order_sample()?.with("total_cost", float(1.0)?);
    let invalid = order_sample()?.with("price", float(0.0)?);

    Ok(RegistryEntry::new(
        schema,
        "Computed fields on a permissive schema",
        "The same order line with extra fields ignored: a supplied total_cost \
         is dropped and recomputed.",
        sample,
    )
    .with_invalid_sample(invalid))
}

fn product() -> Result<RegistryEntry, RegistryError> {
    let schema = SchemaDefinition::builder("product")
        .title("Product")
        .field(FieldSpec::new("product_id", FieldType::Integer).alias("productId"))
        .field(FieldSpec::new("item_name", FieldType::String).alias("itemName"))
        .field(
            FieldSpec::new("stock_count", FieldType::Integer)
                .alias("stockCount")
                .ge(0.0),
        )
        .build()?;

    let sample = FormInput::new()
        .with("productId", text("101"))
        .with("itemName", text("Wireless Mouse"))
        .with("stockCount", text("50"));
    let invalid = sample
        .clone()
        .with("productId", text("abc"))
        .with("stockCount", text("-3"));

    Ok(RegistryEntry::new(
        schema,
        "Field aliases",
        "Input uses camelCase names (productId, itemName, stockCount) while the \
         validated instance uses snake_case; the instance can be dumped back by \
         alias.",
        sample,
    )
    .with_invalid_sample(invalid))
}

fn strict_data() -> Result<RegistryEntry, RegistryError> {
    let schema = SchemaDefinition::builder("strict_data")
        .title("StrictData")
        .field(
            FieldSpec::new("strict_user_id", FieldType::Integer)
                .strict()
                .describe("No coercion from text"),
        )
        .field(FieldSpec::new("user_email", FieldType::Email))
        .field(FieldSpec::new("website", FieldType::Url).optional())
        .build()?;

    let sample = FormInput::new()
        .with("strict_user_id", FormValue::LooseInteger("123".to_string()))
        .with("user_email", text("test@example.com"))
        .with("website", text("https://example.dev"));
    let invalid = FormInput::new()
        .with("strict_user_id", text("123"))
        .with("user_email", text("not-an-email"))
        .with("website", text("ftp://example.dev"));

    Ok(RegistryEntry::new(
        schema,
        "Strict types and special strings",
        "strict_user_id accepts only a real integer, so the text \"123\" fails. \
         user_email must be an email address and website an http(s) URL.",
        sample,
    )
    .with_invalid_sample(invalid))
}

fn task() -> Result<RegistryEntry, RegistryError> {
    let schema = SchemaDefinition::builder("task")
        .title("Task")
        .field(FieldSpec::new("task_id", FieldType::String))
        .field(FieldSpec::new("status", FieldType::one_of("TaskStatus", TASK_STATUSES)))
        .build()?;

    let sample = FormInput::new()
        .with("task_id", text("task-abc-123"))
        .with("status", text("pending"));
    let invalid = sample.clone().with("status", text("unknown"));

    Ok(RegistryEntry::new(
        schema,
        "Enum validation",
        "status must be one of pending, running, completed or failed.",
        sample,
    )
    .with_invalid_sample(invalid))
}

fn configured() -> Result<RegistryEntry, RegistryError> {
    let schema = SchemaDefinition::builder("configured")
        .title("ConfiguredModel")
        .field(FieldSpec::new("expected_field", FieldType::String))
        .field(FieldSpec::new("optional_field", FieldType::Integer).optional())
        .forbid_extra()
        .build()?;

    let sample = FormInput::new()
        .with("expected_field", text("some value"))
        .with("optional_field", FormValue::Absent);
    let invalid = sample
        .clone()
        .with("extra_field", text("this should not be allowed"));

    Ok(RegistryEntry::new(
        schema,
        "Model configuration: forbidding extra fields",
        "Keys the schema does not declare are rejected instead of being \
         silently dropped.",
        sample,
    )
    .with_invalid_sample(invalid))
}
