//! Shared utilities for command handlers

use crate::cli::ValidateArgs;
use crate::config::Config;
use crate::error::{Error, Result};
use chrono::NaiveDate;
use schemadeck_core::adapter::split_assignment;
use schemadeck_core::{FormInput, FormValue, ValidationConfig, ValidationMode};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Load a JSON or YAML payload file
pub fn load_payload(path: &Path) -> Result<Value> {
    if !path.exists() {
        return Err(Error::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = fs::read_to_string(path)?;

    let is_yaml = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s == "yaml" || s == "yml")
        .unwrap_or(false);

    let payload = if is_yaml {
        serde_yaml::from_str(&content)?
    } else {
        serde_json::from_str(&content)?
    };

    tracing::debug!(path = %path.display(), bytes = content.len(), "Loaded payload file");
    Ok(payload)
}

/// Apply the widget flags of `validate` on top of `form`
pub fn apply_form_args(form: &mut FormInput, args: &ValidateArgs) -> Result<()> {
    for assignment in &args.set {
        form.parse_assignment(assignment)?;
    }

    for assignment in &args.number {
        let (key, value) = split_assignment(assignment)?;
        form.assign_path(key, FormValue::number(value.trim())?)?;
    }

    for assignment in &args.flag {
        let (key, checked) = match assignment.split_once('=') {
            Some((key, value)) => (key, parse_flag(value)?),
            None => (assignment.as_str(), true),
        };
        form.assign_path(key.trim(), FormValue::Flag(checked))?;
    }

    for assignment in &args.date {
        let (key, value) = split_assignment(assignment)?;
        let date = NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
            .map_err(|_| Error::invalid_args(format!("'{}' is not a YYYY-MM-DD date", value)))?;
        form.assign_path(key, FormValue::Date(date))?;
    }

    for key in &args.absent {
        form.assign_path(key, FormValue::Absent)?;
    }

    Ok(())
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        other => Err(Error::invalid_args(format!("'{}' is not a checkbox value", other))),
    }
}

/// Merge configured validation defaults with command-line flags
pub fn validation_config(
    config: &Config,
    strict: bool,
    fail_fast: bool,
    max_errors: Option<usize>,
) -> ValidationConfig {
    let mut validation = config.validation.clone();
    if strict {
        validation.mode = ValidationMode::Strict;
    }
    if fail_fast {
        validation.fail_fast = true;
    }
    if let Some(max_errors) = max_errors {
        validation.max_errors = max_errors;
    }
    validation
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use serde_json::json;
    use tempfile::TempDir;

    fn validate_args(argv: &[&str]) -> ValidateArgs {
        let mut full = vec!["schemadeck", "validate"];
        full.extend_from_slice(argv);
        match Cli::parse_from(full).command {
            Commands::Validate(args) => args,
            _ => panic!("expected validate"),
        }
    }

    #[test]
    fn test_form_args_build_widget_values() {
        let args = validate_args(&[
            "event",
            "--set",
            "name=Conference",
            "--date",
            "start_date=2024-06-01",
            "--number",
            "quantity=3",
            "--flag",
            "active",
            "--flag",
            "archived=no",
            "--absent",
            "notes",
            "--set",
            "address.city=Anytown",
        ]);
        let mut form = FormInput::new();
        apply_form_args(&mut form, &args).unwrap();

        assert_eq!(form.get("name"), Some(&FormValue::text("Conference")));
        assert_eq!(
            form.get("start_date"),
            Some(&FormValue::Date(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()))
        );
        assert_eq!(form.get("quantity"), Some(&FormValue::from(3_i64)));
        assert_eq!(form.get("active"), Some(&FormValue::Flag(true)));
        assert_eq!(form.get("archived"), Some(&FormValue::Flag(false)));
        assert_eq!(form.get("notes"), Some(&FormValue::Absent));
        assert!(matches!(form.get("address"), Some(FormValue::Group(_))));
    }

    #[test]
    fn test_bad_form_args_are_argument_errors() {
        let mut form = FormInput::new();
        let error = apply_form_args(&mut form, &validate_args(&["event", "--date", "start_date=June 1st"]))
            .unwrap_err();
        assert_eq!(error.exit_code(), 6);

        let error = apply_form_args(&mut form, &validate_args(&["item", "--set", "no-equals-sign"]))
            .unwrap_err();
        assert_eq!(error.exit_code(), 6);

        let error = apply_form_args(&mut form, &validate_args(&["item", "--flag", "x=maybe"]))
            .unwrap_err();
        assert_eq!(error.exit_code(), 6);
    }

    #[test]
    fn test_validation_config_flags_override_config() {
        let mut config = Config::default();
        config.validation.max_errors = 5;

        let merged = validation_config(&config, true, false, None);
        assert_eq!(merged.mode, ValidationMode::Strict);
        assert_eq!(merged.max_errors, 5);

        let merged = validation_config(&config, false, true, Some(0));
        assert_eq!(merged.mode, ValidationMode::Lax);
        assert!(merged.fail_fast);
        assert_eq!(merged.max_errors, 0);
    }

    #[test]
    fn test_load_payload_json_and_yaml() {
        let dir = TempDir::new().unwrap();
        let json_path = dir.path().join("payload.json");
        fs::write(&json_path, r#"{"name": "Gadget", "price": "19.99"}"#).unwrap();
        assert_eq!(
            load_payload(&json_path).unwrap(),
            json!({"name": "Gadget", "price": "19.99"})
        );

        let yaml_path = dir.path().join("payload.yaml");
        fs::write(&yaml_path, "- name: A\n  price: 1.5\n- name: B\n").unwrap();
        let batch = load_payload(&yaml_path).unwrap();
        assert_eq!(batch.as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn test_load_payload_errors() {
        let missing = load_payload(Path::new("/no/such/payload.json")).unwrap_err();
        assert!(matches!(missing, Error::FileNotFound { .. }));

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{not json").unwrap();
        assert_eq!(load_payload(&path).unwrap_err().exit_code(), 12);
    }
}
