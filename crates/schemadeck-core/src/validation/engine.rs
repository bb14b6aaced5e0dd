//! The generic validation routine
//!
//! One interpreter walks a schema's field list; there is no per-schema code.
//! Order of work for a payload:
//!
//! 1. every declared field, in declaration order (presence, null, coercion,
//!    constraints)
//! 2. undeclared keys, in payload order, when extras are forbidden
//! 3. model validators, only if steps 1 and 2 produced no error
//! 4. computed fields, only if every model validator passed
//!
//! Copyright (c) 2025 SchemaDeck Team
//! Licensed under the Apache-2.0 license

use crate::schema::{ExtraPolicy, FieldSpec, FieldValue, InstanceField, SchemaDefinition, ValidatedInstance};
use crate::validation::base::{SchemaValidator, ValidationContext};
use crate::validation::coerce::coerce;
use crate::validation::constraints::check_constraints;
use crate::validation::error::{ErrorKind, ValidationError, ValidationErrors};
use serde_json::{Map, Value};
use tracing::{debug, debug_span, trace};

impl SchemaValidator for SchemaDefinition {
    type Output = ValidatedInstance;

    fn validate_with_context(
        &self,
        input: &Value,
        context: &ValidationContext,
    ) -> Result<ValidatedInstance, ValidationErrors> {
        let span = debug_span!("validate", schema = %self.name, mode = ?context.mode);
        let _guard = span.enter();

        let result = validate_model(self, input, context);
        match &result {
            Ok(instance) => debug!(fields = instance.len(), "payload accepted"),
            Err(report) => debug!(errors = report.len(), "payload rejected"),
        }
        result
    }
}

/// Validate a payload against a schema at the context's location
pub(crate) fn validate_model(
    schema: &SchemaDefinition,
    input: &Value,
    context: &ValidationContext,
) -> Result<ValidatedInstance, ValidationErrors> {
    let mut report = ValidationErrors::new(schema.name.clone());

    let Value::Object(payload) = input else {
        report.add(ValidationError::type_mismatch(
            &context.path,
            format!("Input should be a valid dictionary or instance of {}", schema.title),
            input,
        ));
        return Err(report);
    };

    let mut fields = Vec::with_capacity(schema.fields.len());
    for spec in &schema.fields {
        match validate_field(schema, spec, payload, context) {
            Ok(value) => fields.push(InstanceField {
                name: spec.name.clone(),
                value,
                computed: false,
            }),
            Err(errors) => report.errors.extend(errors),
        }
    }

    if schema.extra == ExtraPolicy::Forbid {
        for (key, value) in payload {
            if !schema.accepts_key(key) {
                report.add(ValidationError::unexpected(context.child(key).path, value));
            }
        }
    } else {
        for key in payload.keys().filter(|key| !schema.accepts_key(key)) {
            trace!(key = %key, "ignoring undeclared key");
        }
    }

    if !report.is_empty() {
        return Err(report);
    }

    let mut instance = ValidatedInstance::new(schema.name.clone(), fields);

    for validator in &schema.validators {
        if let Err(message) = validator.check(&instance) {
            debug!(rule = %validator.name, "cross-field rule failed");
            report.add(ValidationError::cross_field(&context.path, &validator.name, message));
        }
    }
    if !report.is_empty() {
        return Err(report);
    }

    for computed in &schema.computed {
        match computed.compute(&instance) {
            FieldValue::Float(f) if !f.is_finite() => {
                debug!(field = %computed.name, "computed value is not finite");
                report.add(non_finite_computed(context, &computed.name, f));
            }
            value => instance.push_computed(computed.name.clone(), value),
        }
    }
    if !report.is_empty() {
        return Err(report);
    }

    Ok(instance)
}

/// A derivation overflowed; JSON has no representation for the result
fn non_finite_computed(context: &ValidationContext, name: &str, value: f64) -> ValidationError {
    let mut error = ValidationError::new(
        context.child(name).path,
        ErrorKind::ConstraintViolation,
        format!("Computed field {} is not a finite number", name),
    );
    error.add_violation(ValidationError::create_violation(name, "a finite number", value.to_string()));
    error
}

/// Look a field up in the payload; aliased fields may also be found by
/// internal name when the schema populates by name
fn lookup<'a>(schema: &SchemaDefinition, spec: &'a FieldSpec, payload: &'a Map<String, Value>) -> Option<(&'a str, &'a Value)> {
    if let Some(value) = payload.get(spec.external_name()) {
        return Some((spec.external_name(), value));
    }
    if schema.populate_by_name && spec.alias.is_some() {
        if let Some(value) = payload.get(&spec.name) {
            return Some((spec.name.as_str(), value));
        }
    }
    None
}

fn validate_field(
    schema: &SchemaDefinition,
    spec: &FieldSpec,
    payload: &Map<String, Value>,
    context: &ValidationContext,
) -> Result<FieldValue, Vec<ValidationError>> {
    let Some((key, raw)) = lookup(schema, spec, payload) else {
        return match spec.declared_default() {
            Some(default) => Ok(default.clone()),
            None => Err(vec![ValidationError::missing(context.child(spec.external_name()).path)]),
        };
    };

    let field_context = context.child(key);

    if raw.is_null() && spec.nullable {
        return Ok(FieldValue::Null);
    }

    let value = coerce(
        &spec.field_type,
        raw,
        field_context.is_strict(spec.strict),
        &field_context,
    )?;

    let violations = check_constraints(&value, &spec.constraints);
    if violations.is_empty() {
        Ok(value)
    } else {
        Err(vec![ValidationError::constraint(field_context.path, raw, violations)])
    }
}
