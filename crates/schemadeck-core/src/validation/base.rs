//! Base validation trait and context
//!
//! Copyright (c) 2025 SchemaDeck Team
//! Licensed under the Apache-2.0 license

use crate::validation::error::ValidationErrors;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// How much coercion the engine may apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    /// Coerce wherever a field allows it; per-field strict flags still apply
    #[default]
    Lax,
    /// Treat every field as strict
    Strict,
}

/// Validation context carrying the current location and mode
#[derive(Debug, Clone)]
pub struct ValidationContext {
    /// Dotted path of the value being validated; empty at the model root
    pub path: String,
    /// Validation mode
    pub mode: ValidationMode,
}

impl ValidationContext {
    /// Create a root context
    pub fn new(mode: ValidationMode) -> Self {
        Self {
            path: String::new(),
            mode,
        }
    }

    /// Create a child context with updated path
    pub fn child<P: AsRef<str>>(&self, path_segment: P) -> Self {
        let new_path = if self.path.is_empty() {
            path_segment.as_ref().to_string()
        } else {
            format!("{}.{}", self.path, path_segment.as_ref())
        };

        Self {
            path: new_path,
            mode: self.mode,
        }
    }

    /// Create a child context for array index
    pub fn child_index(&self, index: usize) -> Self {
        Self {
            path: format!("{}[{}]", self.path, index),
            mode: self.mode,
        }
    }

    /// Whether coercion is disabled for a field with the given strict flag
    pub fn is_strict(&self, field_strict: bool) -> bool {
        field_strict || self.mode == ValidationMode::Strict
    }
}

impl Default for ValidationContext {
    fn default() -> Self {
        Self::new(ValidationMode::Lax)
    }
}

/// Base trait for schema validators
pub trait SchemaValidator {
    /// The value produced by a successful validation
    type Output;

    /// Validate a raw payload with default (lax) settings
    fn validate(&self, input: &Value) -> Result<Self::Output, ValidationErrors> {
        let context = ValidationContext::new(ValidationMode::Lax);
        self.validate_with_context(input, &context)
    }

    /// Validate with specific context and mode
    fn validate_with_context(
        &self,
        input: &Value,
        context: &ValidationContext,
    ) -> Result<Self::Output, ValidationErrors>;

    /// Validate with coercion disabled for every field
    fn validate_strict(&self, input: &Value) -> Result<Self::Output, ValidationErrors> {
        let context = ValidationContext::new(ValidationMode::Strict);
        self.validate_with_context(input, &context)
    }

    /// Collect all validation errors (non-failing)
    fn collect_errors(&self, input: &Value) -> Option<ValidationErrors> {
        self.validate(input).err()
    }

    /// Whether the payload passes validation
    fn is_valid(&self, input: &Value) -> bool {
        self.validate(input).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_context_child() {
        let context = ValidationContext::new(ValidationMode::Lax);
        let child = context.child("address");
        assert_eq!(child.path, "address");

        let grandchild = child.child("zip_code");
        assert_eq!(grandchild.path, "address.zip_code");
    }

    #[test]
    fn test_validation_context_child_index() {
        let context = ValidationContext::new(ValidationMode::Lax).child("tags");
        let indexed = context.child_index(0);
        assert_eq!(indexed.path, "tags[0]");
        assert_eq!(indexed.child("name").path, "tags[0].name");
    }

    #[test]
    fn test_strict_mode_overrides_field_flag() {
        let lax = ValidationContext::new(ValidationMode::Lax);
        assert!(!lax.is_strict(false));
        assert!(lax.is_strict(true));

        let strict = ValidationContext::new(ValidationMode::Strict).child("x");
        assert!(strict.is_strict(false));
    }
}
