//! Constraint checks on coerced values
//!
//! Every violated constraint is reported, in declaration order: bounds,
//! then lengths, then pattern.
//!
//! Copyright (c) 2025 SchemaDeck Team
//! Licensed under the Apache-2.0 license

use crate::schema::{Constraints, FieldValue};
use crate::validation::error::{ValidationError, Violation};

/// Check a coerced value against its field's constraints
pub(crate) fn check_constraints(value: &FieldValue, constraints: &Constraints) -> Vec<Violation> {
    let mut violations = Vec::new();
    if constraints.is_empty() {
        return violations;
    }

    if let Some(n) = value.as_f64() {
        check_bounds(n, constraints, &mut violations);
    }

    let (length, unit) = match value {
        FieldValue::List(items) => (Some(items.len()), "items"),
        other => (other.as_str().map(|s| s.chars().count()), "characters"),
    };
    if let Some(length) = length {
        check_length(length, unit, constraints, &mut violations);
    }

    if let (Some(pattern), Some(s)) = (&constraints.pattern, value.as_str()) {
        if !pattern.is_match(s) {
            violations.push(ValidationError::create_violation(
                "pattern",
                format!("a string matching the pattern '{}'", pattern.as_str()),
                format!("'{}'", s),
            ));
        }
    }

    violations
}

fn check_bounds(n: f64, constraints: &Constraints, violations: &mut Vec<Violation>) {
    let actual = format_number(n);
    if let Some(gt) = constraints.gt {
        if n <= gt {
            violations.push(ValidationError::create_violation(
                "gt",
                format!("greater than {}", format_number(gt)),
                actual.clone(),
            ));
        }
    }
    if let Some(ge) = constraints.ge {
        if n < ge {
            violations.push(ValidationError::create_violation(
                "ge",
                format!("greater than or equal to {}", format_number(ge)),
                actual.clone(),
            ));
        }
    }
    if let Some(lt) = constraints.lt {
        if n >= lt {
            violations.push(ValidationError::create_violation(
                "lt",
                format!("less than {}", format_number(lt)),
                actual.clone(),
            ));
        }
    }
    if let Some(le) = constraints.le {
        if n > le {
            violations.push(ValidationError::create_violation(
                "le",
                format!("less than or equal to {}", format_number(le)),
                actual,
            ));
        }
    }
}

fn check_length(length: usize, unit: &str, constraints: &Constraints, violations: &mut Vec<Violation>) {
    if let Some(min) = constraints.min_length {
        if length < min {
            violations.push(ValidationError::create_violation(
                "min_length",
                format!("at least {} {}", min, plural(min, unit)),
                format!("{} {}", length, plural(length, unit)),
            ));
        }
    }
    if let Some(max) = constraints.max_length {
        if length > max {
            violations.push(ValidationError::create_violation(
                "max_length",
                format!("at most {} {}", max, plural(max, unit)),
                format!("{} {}", length, plural(length, unit)),
            ));
        }
    }
}

fn plural(count: usize, unit: &str) -> &str {
    if count == 1 {
        unit.strip_suffix('s').unwrap_or(unit)
    } else {
        unit
    }
}

/// `3` rather than `3.0` for whole numbers
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    fn bounded() -> Constraints {
        Constraints {
            gt: Some(0.0),
            le: Some(100.0),
            ..Default::default()
        }
    }

    #[test]
    fn test_numeric_bounds() {
        assert!(check_constraints(&FieldValue::Float(19.99), &bounded()).is_empty());
        assert!(check_constraints(&FieldValue::Int(100), &bounded()).is_empty());

        let violations = check_constraints(&FieldValue::Float(0.0), &bounded());
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].rule, "gt");
        assert_eq!(violations[0].expected, "greater than 0");
        assert_eq!(violations[0].actual, "0");

        let violations = check_constraints(&FieldValue::Int(101), &bounded());
        assert_eq!(violations[0].rule, "le");
    }

    #[test]
    fn test_string_length_counts_characters() {
        let constraints = Constraints {
            min_length: Some(3),
            max_length: Some(4),
            ..Default::default()
        };
        assert!(check_constraints(&FieldValue::Str("héllo".chars().take(4).collect()), &constraints).is_empty());
        let violations = check_constraints(&FieldValue::Str("ab".into()), &constraints);
        assert_eq!(violations[0].expected, "at least 3 characters");
        assert_eq!(violations[0].actual, "2 characters");
    }

    #[test]
    fn test_list_length_counts_items() {
        let constraints = Constraints {
            min_length: Some(1),
            ..Default::default()
        };
        let violations = check_constraints(&FieldValue::List(vec![]), &constraints);
        assert_eq!(violations[0].expected, "at least 1 item");
    }

    #[test]
    fn test_all_violations_are_reported() {
        let constraints = Constraints {
            max_length: Some(3),
            pattern: Some(Regex::new(r"^\d+$").unwrap()),
            ..Default::default()
        };
        let violations = check_constraints(&FieldValue::Str("abcd".into()), &constraints);
        let rules: Vec<&str> = violations.iter().map(|v| v.rule.as_str()).collect();
        assert_eq!(rules, vec!["max_length", "pattern"]);
    }
}
