//! Validate command handler: one validate-and-report cycle

use super::utils;
use crate::cli::ValidateArgs;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::logging::timing::Timer;
use crate::output::{BatchView, OutputWriter};
use schemadeck_core::adapter::to_payload;
use schemadeck_core::registry::{self, RegistryEntry};
use schemadeck_core::{
    validate_batch_with, FormInput, SchemaDefinition, SchemaValidator, ValidationConfig,
    ValidationContext,
};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

/// Handle the validate command
#[instrument(skip(args, config, output), fields(schema = %args.schema, strict = args.strict))]
pub fn handle_validate(args: ValidateArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let _timer = Timer::with_details("validate_command", &args.schema);

    let entry = registry::entry(&args.schema)?;
    let validation = utils::validation_config(config, args.strict, args.fail_fast, args.max_errors);
    debug!(config = ?validation, "Resolved validation settings");

    if let Some(path) = &args.payload {
        if args.has_form_input() {
            return Err(Error::invalid_args(
                "--payload cannot be combined with --set/--flag/--number/--date/--absent",
            ));
        }

        output.info(&format!("Validating {} against {}", path.display(), entry.name()))?;
        return match utils::load_payload(path)? {
            Value::Array(payloads) => run_batch(&entry.schema, &payloads, &validation, output),
            payload => run_single(&entry.schema, &payload, &validation, output),
        };
    }

    let mut form = starting_form(entry, &args)?;
    utils::apply_form_args(&mut form, &args)?;
    let payload = to_payload(&entry.schema, &form);

    output.section("Payload")?;
    if output.is_human() {
        output.data(&payload)?;
    }

    run_single(&entry.schema, &payload, &validation, output)
}

fn starting_form(entry: &RegistryEntry, args: &ValidateArgs) -> Result<FormInput> {
    if args.sample {
        return Ok(entry.sample.clone());
    }
    if args.invalid_sample {
        return entry.invalid_sample.clone().ok_or_else(|| {
            Error::invalid_args(format!("schema '{}' has no invalid sample", entry.name()))
        });
    }
    Ok(FormInput::new())
}

/// Validate one payload and render whichever outcome it produced
fn run_single(
    schema: &SchemaDefinition,
    payload: &Value,
    validation: &ValidationConfig,
    output: &mut OutputWriter,
) -> Result<()> {
    let context = ValidationContext::new(validation.mode);

    match schema.validate_with_context(payload, &context) {
        Ok(instance) => {
            info!(fields = instance.len(), "Payload accepted");
            output.section("Validated instance")?;
            output.instance(schema, &instance)
        }
        Err(errors) => {
            warn!(errors = errors.len(), "Payload rejected");
            output.section("Validation errors")?;
            output.report(&errors)?;
            output.error(&format!("{} rejected the payload", schema.name))?;
            Err(Error::ValidationFailed { rejected: 1, total: 1 })
        }
    }
}

/// Validate every element of an array payload
fn run_batch(
    schema: &SchemaDefinition,
    payloads: &[Value],
    validation: &ValidationConfig,
    output: &mut OutputWriter,
) -> Result<()> {
    let progress = output.progress_bar(payloads.len() as u64, &schema.name);

    let report = validate_batch_with(schema, payloads, validation, |_| {
        if let Some(pb) = &progress {
            pb.inc(1);
        }
    });

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    info!(
        total = payloads.len(),
        valid = report.valid_count(),
        invalid = report.invalid_count(),
        stopped_early = report.stopped_early,
        "Batch finished"
    );

    if output.is_human() {
        for outcome in &report.outcomes {
            output.section(&format!("Payload [{}]", outcome.index))?;
            match &outcome.result {
                Ok(instance) => output.instance(schema, instance)?,
                Err(errors) => output.report(errors)?,
            }
        }

        output.section("Summary")?;
        let summary = format!(
            "{} valid, {} invalid, {} of {} checked",
            report.valid_count(),
            report.invalid_count(),
            report.outcomes.len(),
            payloads.len()
        );
        if report.all_valid() {
            output.success(&summary)?;
        } else {
            output.error(&summary)?;
        }
        if report.stopped_early {
            output.warning("Stopped early; remaining payloads were not checked")?;
        }
    } else {
        output.data(&BatchView::new(&schema.name, payloads.len(), &report))?;
    }

    if report.all_valid() {
        Ok(())
    } else {
        Err(Error::ValidationFailed {
            rejected: report.invalid_count(),
            total: payloads.len(),
        })
    }
}
