//! Declarative schema model
//!
//! A schema is a tagged field-specification list interpreted by the generic
//! validation routine in [`crate::validation`]; there is no per-type code.
//!
//! Copyright (c) 2025 SchemaDeck Team
//! Licensed under the Apache-2.0 license

pub mod definition;
pub mod describe;
pub mod field;
pub mod value;

pub use definition::{
    ComputedField, ExtraPolicy, ModelValidator, SchemaBuilder, SchemaDefinition, SchemaError,
};
pub use describe::{
    ComputedDescription, ConstraintDescription, FieldDescription, RuleDescription,
    SchemaDescription,
};
pub use field::{Constraints, FieldSpec, FieldType, Presence};
pub use value::{FieldValue, InstanceField, ValidatedInstance};
