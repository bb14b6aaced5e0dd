//! Type coercion from raw JSON values to declared field types
//!
//! Lax coercions: numeric strings to numbers, integral floats to integers,
//! boolean-like strings and 0/1 to booleans, integers to floats. A strict
//! field accepts only the exact JSON type (a strict float still takes an
//! integer).
//!
//! Copyright (c) 2025 SchemaDeck Team
//! Licensed under the Apache-2.0 license

use crate::schema::{FieldType, FieldValue, SchemaDefinition};
use crate::validation::base::ValidationContext;
use crate::validation::error::ValidationError;
use crate::validation::engine::validate_model;
use chrono::NaiveDate;
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;
use url::Url;

static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)+$")
            .unwrap()
    })
}

type CoerceResult = Result<FieldValue, Vec<ValidationError>>;

/// Coerce a raw value to the declared type
pub(crate) fn coerce(
    field_type: &FieldType,
    raw: &Value,
    strict: bool,
    ctx: &ValidationContext,
) -> CoerceResult {
    match field_type {
        FieldType::String => coerce_string(raw, ctx),
        FieldType::Integer => coerce_integer(raw, strict, ctx),
        FieldType::Float => coerce_float(raw, strict, ctx),
        FieldType::Boolean => coerce_bool(raw, strict, ctx),
        FieldType::Date => coerce_date(raw, ctx),
        FieldType::Email => coerce_email(raw, ctx),
        FieldType::Url => coerce_url(raw, ctx),
        FieldType::List(item_type) => coerce_list(item_type, raw, strict, ctx),
        FieldType::Enum { values, .. } => coerce_enum(values, raw, ctx),
        FieldType::Model(schema) => coerce_model(schema, raw, ctx),
    }
}

fn mismatch(ctx: &ValidationContext, message: &str, raw: &Value) -> Vec<ValidationError> {
    vec![ValidationError::type_mismatch(&ctx.path, message, raw)]
}

fn format_error(ctx: &ValidationContext, rule: &str, expected: &str, raw: &Value, actual: String) -> Vec<ValidationError> {
    vec![ValidationError::constraint(
        &ctx.path,
        raw,
        vec![ValidationError::create_violation(rule, expected, actual)],
    )]
}

fn coerce_string(raw: &Value, ctx: &ValidationContext) -> CoerceResult {
    match raw {
        Value::String(s) => Ok(FieldValue::Str(s.clone())),
        _ => Err(mismatch(ctx, "Input should be a valid string", raw)),
    }
}

const INTEGER_OUT_OF_RANGE: &str = "Input should be a valid integer, the number is too large to represent exactly";

fn coerce_integer(raw: &Value, strict: bool, ctx: &ValidationContext) -> CoerceResult {
    match raw {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Ok(FieldValue::Int(i));
            }
            if strict {
                return Err(mismatch(ctx, "Input should be a valid integer", raw));
            }
            match n.as_f64() {
                Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => {
                    Ok(FieldValue::Int(f as i64))
                }
                Some(f) if f.is_finite() && f.fract() != 0.0 => Err(mismatch(
                    ctx,
                    "Input should be a valid integer, got a number with a fractional part",
                    raw,
                )),
                Some(f) if f.is_finite() => Err(mismatch(ctx, INTEGER_OUT_OF_RANGE, raw)),
                _ => Err(mismatch(ctx, "Input should be a valid integer", raw)),
            }
        }
        Value::String(s) if !strict => {
            let trimmed = s.trim();
            if let Ok(i) = trimmed.parse::<i64>() {
                return Ok(FieldValue::Int(i));
            }
            match trimmed.parse::<f64>() {
                Ok(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 9.0e15 => Ok(FieldValue::Int(f as i64)),
                Ok(f) if f.is_finite() && f.fract() == 0.0 => Err(mismatch(ctx, INTEGER_OUT_OF_RANGE, raw)),
                Ok(f) if f.is_finite() => Err(mismatch(
                    ctx,
                    "Input should be a valid integer, got a number with a fractional part",
                    raw,
                )),
                _ => Err(mismatch(ctx, "Input should be a valid integer, unable to parse string as an integer", raw)),
            }
        }
        _ => Err(mismatch(ctx, "Input should be a valid integer", raw)),
    }
}

fn coerce_float(raw: &Value, strict: bool, ctx: &ValidationContext) -> CoerceResult {
    match raw {
        Value::Number(n) => n
            .as_f64()
            .map(FieldValue::Float)
            .ok_or_else(|| mismatch(ctx, "Input should be a valid number", raw)),
        Value::String(s) if !strict => match s.trim().parse::<f64>() {
            Ok(f) if f.is_finite() => Ok(FieldValue::Float(f)),
            _ => Err(mismatch(ctx, "Input should be a valid number, unable to parse string as a number", raw)),
        },
        _ => Err(mismatch(ctx, "Input should be a valid number", raw)),
    }
}

fn coerce_bool(raw: &Value, strict: bool, ctx: &ValidationContext) -> CoerceResult {
    match raw {
        Value::Bool(b) => Ok(FieldValue::Bool(*b)),
        Value::String(s) if !strict => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" | "t" | "y" => Ok(FieldValue::Bool(true)),
            "false" | "no" | "off" | "0" | "f" | "n" => Ok(FieldValue::Bool(false)),
            _ => Err(mismatch(ctx, "Input should be a valid boolean, unable to interpret input", raw)),
        },
        Value::Number(n) if !strict => match n.as_i64() {
            Some(0) => Ok(FieldValue::Bool(false)),
            Some(1) => Ok(FieldValue::Bool(true)),
            _ => Err(mismatch(ctx, "Input should be a valid boolean", raw)),
        },
        _ => Err(mismatch(ctx, "Input should be a valid boolean", raw)),
    }
}

fn coerce_date(raw: &Value, ctx: &ValidationContext) -> CoerceResult {
    match raw {
        Value::String(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(FieldValue::Date)
            .map_err(|_| mismatch(ctx, "Input should be a valid date in the format YYYY-MM-DD", raw)),
        _ => Err(mismatch(ctx, "Input should be a valid date", raw)),
    }
}

fn coerce_email(raw: &Value, ctx: &ValidationContext) -> CoerceResult {
    match raw {
        Value::String(s) => {
            let candidate = s.trim();
            if email_regex().is_match(candidate) {
                Ok(FieldValue::Email(candidate.to_string()))
            } else {
                Err(format_error(ctx, "email", "a valid email address", raw, format!("'{}'", s)))
            }
        }
        _ => Err(mismatch(ctx, "Input should be a valid string", raw)),
    }
}

fn coerce_url(raw: &Value, ctx: &ValidationContext) -> CoerceResult {
    let Value::String(s) = raw else {
        return Err(mismatch(ctx, "URL input should be a string or URL", raw));
    };

    match Url::parse(s.trim()) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => Ok(FieldValue::Url(url)),
        Ok(url) if !matches!(url.scheme(), "http" | "https") => Err(format_error(
            ctx,
            "url_scheme",
            "a URL with scheme 'http' or 'https'",
            raw,
            format!("scheme '{}'", url.scheme()),
        )),
        Ok(_) => Err(format_error(ctx, "url_host", "a URL with a host", raw, "no host".to_string())),
        Err(e) => Err(format_error(ctx, "url", "a valid URL", raw, e.to_string())),
    }
}

fn coerce_list(item_type: &FieldType, raw: &Value, strict: bool, ctx: &ValidationContext) -> CoerceResult {
    let Value::Array(items) = raw else {
        return Err(mismatch(ctx, "Input should be a valid list", raw));
    };

    let mut values = Vec::with_capacity(items.len());
    let mut errors = Vec::new();
    for (i, item) in items.iter().enumerate() {
        match coerce(item_type, item, strict, &ctx.child_index(i)) {
            Ok(value) => values.push(value),
            Err(item_errors) => errors.extend(item_errors),
        }
    }

    if errors.is_empty() {
        Ok(FieldValue::List(values))
    } else {
        Err(errors)
    }
}

fn coerce_enum(values: &[String], raw: &Value, ctx: &ValidationContext) -> CoerceResult {
    if let Value::String(s) = raw {
        if values.iter().any(|v| v == s) {
            return Ok(FieldValue::Enum(s.clone()));
        }
    }

    Err(format_error(
        ctx,
        "enum",
        &expected_literals(values),
        raw,
        raw.to_string(),
    ))
}

/// `'a', 'b' or 'c'`
fn expected_literals(values: &[String]) -> String {
    let quoted: Vec<String> = values.iter().map(|v| format!("'{}'", v)).collect();
    match quoted.split_last() {
        Some((last, rest)) if !rest.is_empty() => format!("{} or {}", rest.join(", "), last),
        Some((last, _)) => last.clone(),
        None => "one of no values".to_string(),
    }
}

fn coerce_model(schema: &SchemaDefinition, raw: &Value, ctx: &ValidationContext) -> CoerceResult {
    if !raw.is_object() {
        return Err(mismatch(
            ctx,
            &format!("Input should be a valid dictionary or instance of {}", schema.title),
            raw,
        ));
    }

    validate_model(schema, raw, ctx)
        .map(FieldValue::Model)
        .map_err(|report| report.errors)
}
