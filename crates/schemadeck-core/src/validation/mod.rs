//! Validation engine and error reporting
//!
//! The engine interprets a [`SchemaDefinition`]'s field list against a raw
//! JSON payload and yields exactly one of a [`ValidatedInstance`] or a
//! [`ValidationErrors`] report. Two modes are supported:
//!
//! - **Lax**: safe coercions are applied, except on fields marked strict
//! - **Strict**: every field is treated as strict
//!
//! Copyright (c) 2025 SchemaDeck Team
//! Licensed under the Apache-2.0 license

pub mod base;
mod coerce;
mod constraints;
mod engine;
pub mod error;

// Re-export commonly used types
pub use base::{SchemaValidator, ValidationContext, ValidationMode};
pub use error::{ErrorKind, ValidationError, ValidationErrors, ValidationResult, Violation, MODEL_LOCATION};

use crate::schema::{SchemaDefinition, ValidatedInstance};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info_span};

/// Validate a payload against a schema in lax mode
///
/// # Examples
///
/// ```rust
/// use schemadeck_core::{registry, validation};
/// use serde_json::json;
///
/// let schema = registry::get_schema("item").unwrap();
/// let instance = validation::validate(schema, &json!({"name": "Gadget", "price": "19.99"})).unwrap();
/// assert_eq!(instance.get("quantity").and_then(|v| v.as_int()), Some(1));
/// ```
pub fn validate(schema: &SchemaDefinition, payload: &Value) -> Result<ValidatedInstance, ValidationErrors> {
    schema.validate(payload)
}

/// Validation configuration for batch operations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Validation mode to use
    pub mode: ValidationMode,
    /// Stop at the first rejected payload
    pub fail_fast: bool,
    /// Stop once this many payloads were rejected (0 = unlimited)
    pub max_errors: usize,
}

impl ValidationConfig {
    /// Create a configuration for strict validation
    pub fn strict() -> Self {
        Self {
            mode: ValidationMode::Strict,
            ..Self::default()
        }
    }

    /// Create a configuration for lax validation
    pub fn lax() -> Self {
        Self::default()
    }

    /// Enable fail-fast mode
    pub fn with_fail_fast(mut self) -> Self {
        self.fail_fast = true;
        self
    }

    /// Set maximum number of rejected payloads to collect
    pub fn with_max_errors(mut self, max_errors: usize) -> Self {
        self.max_errors = max_errors;
        self
    }
}

/// Outcome for one payload of a batch
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    /// Position of the payload in the batch
    pub index: usize,
    pub result: Result<ValidatedInstance, ValidationErrors>,
}

/// Outcomes of a batch validation, in payload order
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub outcomes: Vec<BatchOutcome>,
    /// Whether validation stopped before the last payload
    pub stopped_early: bool,
}

impl BatchReport {
    pub fn valid_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn invalid_count(&self) -> usize {
        self.outcomes.len() - self.valid_count()
    }

    /// Rejected payloads with their reports
    pub fn failures(&self) -> impl Iterator<Item = (usize, &ValidationErrors)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|report| (o.index, report)))
    }

    pub fn all_valid(&self) -> bool {
        self.invalid_count() == 0
    }
}

/// Validate many payloads against one schema
pub fn validate_batch(schema: &SchemaDefinition, payloads: &[Value], config: &ValidationConfig) -> BatchReport {
    validate_batch_with(schema, payloads, config, |_| {})
}

/// Validate many payloads, calling `on_outcome` after each one
pub fn validate_batch_with<F>(
    schema: &SchemaDefinition,
    payloads: &[Value],
    config: &ValidationConfig,
    mut on_outcome: F,
) -> BatchReport
where
    F: FnMut(&BatchOutcome),
{
    let span = info_span!("validate_batch", schema = %schema.name, payloads = payloads.len());
    let _guard = span.enter();

    let context = ValidationContext::new(config.mode);
    let mut report = BatchReport::default();
    let mut rejected = 0;

    for (index, payload) in payloads.iter().enumerate() {
        let outcome = BatchOutcome {
            index,
            result: schema.validate_with_context(payload, &context),
        };
        on_outcome(&outcome);

        let failed = outcome.result.is_err();
        report.outcomes.push(outcome);

        if failed {
            rejected += 1;

            if config.fail_fast {
                break;
            }

            if config.max_errors > 0 && rejected >= config.max_errors {
                break;
            }
        }
    }

    report.stopped_early = report.outcomes.len() < payloads.len();
    debug!(
        valid = report.valid_count(),
        invalid = report.invalid_count(),
        stopped_early = report.stopped_early,
        "batch validated"
    );
    report
}
