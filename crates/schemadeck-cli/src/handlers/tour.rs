//! Tour command handler: every schema's sample and invalid sample

use crate::cli::TourArgs;
use crate::error::{Error, Result};
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use schemadeck_core::adapter::to_payload;
use schemadeck_core::{
    FormInput, RegistryEntry, SchemaRegistry, SchemaValidator, ValidationContext, ValidationError,
    ValidationMode,
};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, instrument, warn};

/// Which sample a tour step ran
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum Case {
    Sample,
    InvalidSample,
}

impl Case {
    fn expects_valid(self) -> bool {
        self == Case::Sample
    }

    fn label(self) -> &'static str {
        match self {
            Case::Sample => "sample",
            Case::InvalidSample => "invalid sample",
        }
    }
}

#[derive(Debug, Serialize)]
struct TourStep {
    schema: String,
    case: Case,
    payload: Value,
    valid: bool,
    as_expected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<ValidationError>,
}

/// Handle the tour command
#[instrument(skip(args, output), fields(schemas = args.schemas.len(), strict = args.strict))]
pub fn handle_tour(args: TourArgs, output: &mut OutputWriter) -> Result<()> {
    let _timer = Timer::new("tour_command");
    let registry = SchemaRegistry::builtin()?;

    let entries: Vec<&RegistryEntry> = if args.schemas.is_empty() {
        registry.entries().iter().collect()
    } else {
        args.schemas
            .iter()
            .map(|name| registry.entry(name))
            .collect::<std::result::Result<_, _>>()?
    };

    let mode = if args.strict {
        ValidationMode::Strict
    } else {
        ValidationMode::Lax
    };
    let context = ValidationContext::new(mode);

    let mut steps = Vec::new();
    for entry in entries {
        output.section(&format!("{}: {}", entry.name(), entry.headline))?;
        output.info(&entry.explanation)?;

        steps.push(run_step(entry, Case::Sample, &entry.sample, &context, output)?);
        if let Some(invalid) = &entry.invalid_sample {
            steps.push(run_step(entry, Case::InvalidSample, invalid, &context, output)?);
        }
    }

    let surprises = steps.iter().filter(|s| !s.as_expected).count();
    info!(steps = steps.len(), surprises, "Tour finished");

    if !output.is_human() {
        output.data(&steps)?;
    } else {
        output.section("Summary")?;
        let summary = format!("{} step(s), {} behaved unexpectedly", steps.len(), surprises);
        if surprises == 0 {
            output.success(&summary)?;
        } else {
            output.warning(&summary)?;
        }
    }

    if surprises == 0 {
        Ok(())
    } else {
        Err(Error::ValidationFailed {
            rejected: surprises,
            total: steps.len(),
        })
    }
}

fn run_step(
    entry: &RegistryEntry,
    case: Case,
    form: &FormInput,
    context: &ValidationContext,
    output: &mut OutputWriter,
) -> Result<TourStep> {
    let payload = to_payload(&entry.schema, form);
    let result = entry.schema.validate_with_context(&payload, context);
    let valid = result.is_ok();
    let as_expected = valid == case.expects_valid();

    if output.is_human() {
        output.writeln("")?;
        output.writeln(&format!("▶ {}: {}", case.label(), serde_json::to_string(&payload)?))?;
        match &result {
            Ok(instance) => output.instance(&entry.schema, instance)?,
            Err(errors) => output.report(errors)?,
        }
        if !as_expected {
            output.warning(&format!(
                "expected the {} to be {}",
                case.label(),
                if case.expects_valid() { "accepted" } else { "rejected" }
            ))?;
        }
    }

    if !as_expected {
        warn!(schema = %entry.name(), case = case.label(), "Sample did not behave as expected");
    }

    let (data, errors) = match result {
        Ok(instance) => (Some(instance.to_json()), Vec::new()),
        Err(errors) => (None, errors.errors),
    };

    Ok(TourStep {
        schema: entry.name().to_string(),
        case,
        payload,
        valid,
        as_expected,
        data,
        errors,
    })
}
