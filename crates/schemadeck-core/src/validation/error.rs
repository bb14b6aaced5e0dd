//! Validation error report types
//!
//! A failed validation produces a [`ValidationErrors`] report: an ordered list
//! of per-location [`ValidationError`] entries, each tagged with an
//! [`ErrorKind`].
//!
//! Copyright (c) 2025 SchemaDeck Team
//! Licensed under the Apache-2.0 license

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Category of an input-driven validation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// A required field is absent from the payload
    MissingRequiredField,
    /// The value cannot be coerced to the declared type
    TypeMismatch,
    /// The value fails a bound, format, or enum-membership check
    ConstraintViolation,
    /// A rule spanning several fields failed on otherwise valid fields
    CrossFieldViolation,
    /// The payload holds a key the schema does not declare
    UnexpectedField,
}

impl ErrorKind {
    /// Short machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::MissingRequiredField => "missing",
            ErrorKind::TypeMismatch => "type_mismatch",
            ErrorKind::ConstraintViolation => "constraint_violation",
            ErrorKind::CrossFieldViolation => "cross_field_violation",
            ErrorKind::UnexpectedField => "unexpected_field",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A violated rule with detailed context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// The validation rule that was violated
    pub rule: String,
    /// What was expected
    pub expected: String,
    /// What was actually found
    pub actual: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Rule '{}' violated: expected {}, but found {}",
            self.rule, self.expected, self.actual
        )
    }
}

/// One entry of a validation error report
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub struct ValidationError {
    /// Dotted location of the offending value (`address.zip_code`, `tags[2]`);
    /// empty for model-level errors
    pub path: String,
    /// Error category
    pub kind: ErrorKind,
    /// Human-readable error message
    pub message: String,
    /// The raw input that was rejected, when there was one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<Value>,
    /// Detailed rule violations
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<Violation>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at '{}': {}", self.kind, self.location(), self.message)?;

        if !self.violations.is_empty() {
            write!(f, "\nViolations:")?;
            for violation in &self.violations {
                write!(f, "\n  - {}", violation)?;
            }
        }

        Ok(())
    }
}

/// Label used for errors that belong to the model as a whole
pub const MODEL_LOCATION: &str = "<model>";

impl ValidationError {
    /// Create a new validation error
    pub fn new<P, M>(path: P, kind: ErrorKind, message: M) -> Self
    where
        P: Into<String>,
        M: Into<String>,
    {
        Self {
            path: path.into(),
            kind,
            message: message.into(),
            input: None,
            violations: Vec::new(),
        }
    }

    /// A required field is absent
    pub fn missing<P: Into<String>>(path: P) -> Self {
        Self::new(path, ErrorKind::MissingRequiredField, "Field required")
    }

    /// The value has the wrong type
    pub fn type_mismatch<P, M>(path: P, message: M, input: &Value) -> Self
    where
        P: Into<String>,
        M: Into<String>,
    {
        Self::new(path, ErrorKind::TypeMismatch, message).with_input(input.clone())
    }

    /// The value broke one or more constraints; the message comes from the first
    pub fn constraint<P: Into<String>>(path: P, input: &Value, violations: Vec<Violation>) -> Self {
        let message = violations
            .first()
            .map(|v| format!("Input should be {}", v.expected))
            .unwrap_or_else(|| "Input violates a constraint".to_string());

        Self {
            path: path.into(),
            kind: ErrorKind::ConstraintViolation,
            message,
            input: Some(input.clone()),
            violations,
        }
    }

    /// A model-level rule failed
    pub fn cross_field<P, R, M>(path: P, rule: R, message: M) -> Self
    where
        P: Into<String>,
        R: Into<String>,
        M: Into<String>,
    {
        let message = message.into();
        let mut error = Self::new(path, ErrorKind::CrossFieldViolation, message.clone());
        error.add_violation(Self::create_violation(rule, "rule to hold", message));
        error
    }

    /// The payload carried an undeclared key
    pub fn unexpected<P: Into<String>>(path: P, input: &Value) -> Self {
        Self::new(path, ErrorKind::UnexpectedField, "Extra inputs are not permitted")
            .with_input(input.clone())
    }

    /// Attach the rejected input
    pub fn with_input(mut self, input: Value) -> Self {
        self.input = Some(input);
        self
    }

    /// Add a violation to this error
    pub fn add_violation(&mut self, violation: Violation) {
        self.violations.push(violation);
    }

    /// Create a violation for a specific rule
    pub fn create_violation<R, E, A>(rule: R, expected: E, actual: A) -> Violation
    where
        R: Into<String>,
        E: Into<String>,
        A: Into<String>,
    {
        Violation {
            rule: rule.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Path for display; model-level errors have no field path
    pub fn location(&self) -> &str {
        if self.path.is_empty() {
            MODEL_LOCATION
        } else {
            &self.path
        }
    }
}

/// Result type for single-value validation steps
pub type ValidationResult<T> = Result<T, ValidationError>;

/// The ordered error report produced by a failed validation
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub struct ValidationErrors {
    /// Name of the schema that rejected the payload
    pub schema: String,
    /// Errors in the order the engine produced them
    pub errors: Vec<ValidationError>,
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let noun = if self.errors.len() == 1 { "error" } else { "errors" };
        write!(f, "{} validation {} for {}", self.errors.len(), noun, self.schema)?;
        for (i, error) in self.errors.iter().enumerate() {
            write!(f, "\n{}. {}", i + 1, error)?;
        }
        Ok(())
    }
}

impl ValidationErrors {
    /// Create an empty report for a schema
    pub fn new<S: Into<String>>(schema: S) -> Self {
        Self {
            schema: schema.into(),
            errors: Vec::new(),
        }
    }

    /// Add an error to the report
    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Append every error of another report, keeping their order
    pub fn extend(&mut self, other: ValidationErrors) {
        self.errors.extend(other.errors);
    }

    /// Check if there are any errors
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Get the number of errors
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Iterate over the errors in report order
    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.errors.iter()
    }

    /// Whether any error has the given kind
    pub fn has_kind(&self, kind: ErrorKind) -> bool {
        self.errors.iter().any(|e| e.kind == kind)
    }

    /// Errors of one kind, in report order
    pub fn of_kind(&self, kind: ErrorKind) -> Vec<&ValidationError> {
        self.errors.iter().filter(|e| e.kind == kind).collect()
    }

    /// First error reported at a path
    pub fn at(&self, path: &str) -> Option<&ValidationError> {
        self.errors.iter().find(|e| e.path == path)
    }

    /// Errors grouped by path. Groups appear in the order their first error
    /// was reported and keep the report order inside each group.
    pub fn grouped_by_path(&self) -> Vec<(&str, Vec<&ValidationError>)> {
        let mut groups: Vec<(&str, Vec<&ValidationError>)> = Vec::new();
        for error in &self.errors {
            match groups.iter_mut().find(|(path, _)| *path == error.location()) {
                Some((_, members)) => members.push(error),
                None => groups.push((error.location(), vec![error])),
            }
        }
        groups
    }

    /// Convert to result - Ok if no errors, Err if any errors exist
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a ValidationError;
    type IntoIter = std::slice::Iter<'a, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}
