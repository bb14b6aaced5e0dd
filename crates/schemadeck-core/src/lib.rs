//! SchemaDeck Core - declarative schemas and the validate-and-report cycle
//!
//! This crate provides a small declarative validation engine and the
//! demonstration schemas built on it:
//! - **Schema model**: ordered field specifications with types, presence,
//!   constraints, aliases and strictness, plus model validators and
//!   computed fields
//! - **Validation engine**: one generic routine that turns a raw JSON payload
//!   into either a validated instance or an ordered error report
//! - **Registry**: the built-in demonstration schemas with sample input
//! - **Input adapter**: form-style values to raw payloads
//!
//! ## Features
//!
//! - **Lax and strict modes**: safe coercions, or exact JSON types only
//! - **Exhaustive reporting**: every field error in one pass, with full
//!   paths into nested models and lists
//! - **Structural descriptions**: a serde-friendly field table and a JSON
//!   Schema (draft 2020-12) document per schema
//! - **Batch processing**: many payloads against one schema
//!
//! ## Quick Start
//!
//! ```rust
//! use schemadeck_core::{registry, ErrorKind, SchemaValidator};
//! use serde_json::json;
//!
//! let schema = registry::get_schema("item").unwrap();
//!
//! // "19.99" is coerced to a float, quantity takes its default
//! let instance = schema.validate(&json!({"name": "Gadget", "price": "19.99"})).unwrap();
//! assert_eq!(instance.get("price").and_then(|v| v.as_f64()), Some(19.99));
//!
//! // Every failing field is reported
//! let report = schema.validate(&json!({"price": 0})).unwrap_err();
//! assert_eq!(report.errors[0].kind, ErrorKind::MissingRequiredField);
//! assert_eq!(report.errors[1].kind, ErrorKind::ConstraintViolation);
//! ```
//!
//! Copyright (c) 2025 SchemaDeck Team
//! Licensed under the Apache-2.0 license

pub mod adapter;
pub mod registry;
pub mod schema;
pub mod validation;

// Re-export commonly used types for convenience
pub use adapter::{AdapterError, FormInput, FormValue};
pub use registry::{RegistryEntry, RegistryError, SchemaRegistry};
pub use schema::{
    ExtraPolicy, FieldSpec, FieldType, FieldValue, SchemaDefinition, SchemaDescription,
    SchemaError, ValidatedInstance,
};
pub use validation::{
    validate, validate_batch, validate_batch_with, BatchOutcome, BatchReport, ErrorKind,
    SchemaValidator, ValidationConfig, ValidationContext, ValidationError, ValidationErrors,
    ValidationMode, ValidationResult, Violation,
};
