//! Output formatting and writing utilities
//!
//! This module provides utilities for formatting and writing output
//! in various formats (JSON, YAML, human-readable) with support for
//! validated instances, error reports, schema descriptions, and
//! progress indicators for payload batches.

use crate::cli::OutputFormat;
use crate::error::Result;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use is_terminal::IsTerminal;
use schemadeck_core::validation::MODEL_LOCATION;
use schemadeck_core::{
    BatchReport, FieldValue, SchemaDefinition, SchemaDescription, ValidatedInstance,
    ValidationError, ValidationErrors,
};
use serde::Serialize;
use serde_json::Value;
use std::io::{self, Write};
use tracing::trace;

/// One row of a rendered instance
#[derive(Debug, Clone, Serialize)]
pub struct FieldView {
    /// Dotted field path; nested model fields are flattened
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub value: Value,
    pub computed: bool,
}

/// Machine-readable form of a successful cycle
#[derive(Debug, Clone, Serialize)]
pub struct InstanceView {
    pub schema: String,
    pub valid: bool,
    pub data: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub by_alias: Option<Value>,
    pub fields: Vec<FieldView>,
}

impl InstanceView {
    pub fn new(schema: &SchemaDefinition, instance: &ValidatedInstance) -> Self {
        let mut fields = Vec::new();
        flatten_fields("", instance, &mut fields);

        Self {
            schema: instance.schema.clone(),
            valid: true,
            data: instance.to_json(),
            by_alias: schema
                .has_aliases()
                .then(|| schema.dump_by_alias(instance)),
            fields,
        }
    }
}

fn flatten_fields(prefix: &str, instance: &ValidatedInstance, rows: &mut Vec<FieldView>) {
    for field in instance.fields() {
        let name = if prefix.is_empty() {
            field.name.clone()
        } else {
            format!("{}.{}", prefix, field.name)
        };
        match &field.value {
            FieldValue::Model(nested) => flatten_fields(&name, nested, rows),
            value => rows.push(FieldView {
                name,
                type_name: value.type_name(),
                value: value.to_json(),
                computed: field.computed,
            }),
        }
    }
}

/// Machine-readable form of a failed cycle
#[derive(Debug, Clone, Serialize)]
pub struct ReportView<'a> {
    pub schema: &'a str,
    pub valid: bool,
    pub error_count: usize,
    pub errors: &'a [ValidationError],
}

impl<'a> ReportView<'a> {
    pub fn new(errors: &'a ValidationErrors) -> Self {
        Self {
            schema: &errors.schema,
            valid: false,
            error_count: errors.len(),
            errors: &errors.errors,
        }
    }
}

/// Machine-readable form of a payload batch
#[derive(Debug, Clone, Serialize)]
pub struct BatchView<'a> {
    pub schema: &'a str,
    pub total: usize,
    pub checked: usize,
    pub valid: usize,
    pub invalid: usize,
    pub stopped_early: bool,
    pub results: Vec<BatchItemView<'a>>,
}

/// One payload's outcome within a batch
#[derive(Debug, Clone, Serialize)]
pub struct BatchItemView<'a> {
    pub index: usize,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<&'a [ValidationError]>,
}

impl<'a> BatchView<'a> {
    pub fn new(schema: &'a str, total: usize, report: &'a BatchReport) -> Self {
        let results = report
            .outcomes
            .iter()
            .map(|outcome| match &outcome.result {
                Ok(instance) => BatchItemView {
                    index: outcome.index,
                    valid: true,
                    data: Some(instance.to_json()),
                    errors: None,
                },
                Err(errors) => BatchItemView {
                    index: outcome.index,
                    valid: false,
                    data: None,
                    errors: Some(&errors.errors),
                },
            })
            .collect();

        Self {
            schema,
            total,
            checked: report.outcomes.len(),
            valid: report.valid_count(),
            invalid: report.invalid_count(),
            stopped_early: report.stopped_early,
            results,
        }
    }
}

/// Trait for formatting output with specialized support for common types
pub trait OutputFormatter {
    /// Format a serializable value
    fn format<T: Serialize>(&self, value: &T) -> Result<String>;

    /// Format a validated instance with every field, computed ones included
    fn format_instance(&self, view: &InstanceView) -> Result<String>;

    /// Format an error report grouped by path
    fn format_report(&self, errors: &ValidationErrors) -> Result<String>;

    /// Format a structural schema description
    fn format_description(&self, description: &SchemaDescription) -> Result<String>;
}

impl OutputFormatter for OutputFormat {
    fn format<T: Serialize>(&self, value: &T) -> Result<String> {
        match self {
            OutputFormat::Json => Ok(serde_json::to_string(value)?),
            OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(value)?),
            OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
            OutputFormat::Human => {
                // For human format, use pretty JSON as fallback
                Ok(serde_json::to_string_pretty(value)?)
            }
        }
    }

    fn format_instance(&self, view: &InstanceView) -> Result<String> {
        match self {
            OutputFormat::Human => format_instance_human(view),
            _ => self.format(view),
        }
    }

    fn format_report(&self, errors: &ValidationErrors) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(format_report_human(errors)),
            _ => self.format(&ReportView::new(errors)),
        }
    }

    fn format_description(&self, description: &SchemaDescription) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(format_description_human(description)),
            _ => self.format(description),
        }
    }
}

/// Output writer that handles different output formats and colors
pub struct OutputWriter {
    format: OutputFormat,
    use_color: bool,
    show_progress: bool,
    quiet: bool,
    writer: Box<dyn Write>,
}

impl OutputWriter {
    /// Create a new output writer
    pub fn new(format: OutputFormat, use_color: bool, quiet: bool, progress: bool) -> Self {
        Self {
            format,
            use_color,
            show_progress: progress && !quiet && std::io::stderr().is_terminal(),
            quiet,
            writer: Box::new(io::stdout()),
        }
    }

    /// Create an output writer with a custom writer
    #[cfg(test)]
    pub fn with_writer(format: OutputFormat, use_color: bool, quiet: bool, writer: Box<dyn Write>) -> Self {
        Self {
            format,
            use_color,
            show_progress: false, // No progress bars with custom writers
            quiet,
            writer,
        }
    }

    /// Whether human-oriented chatter is written
    pub fn is_human(&self) -> bool {
        self.format == OutputFormat::Human
    }

    /// Write raw output
    pub fn write(&mut self, content: &str) -> Result<()> {
        write!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write a line of output
    pub fn writeln(&mut self, content: &str) -> Result<()> {
        writeln!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write an info message
    pub fn info(&mut self, message: &str) -> Result<()> {
        if self.quiet || !self.is_human() {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&format!("{} {}", "ℹ".blue(), message))
        } else {
            self.writeln(&format!("INFO: {}", message))
        }
    }

    /// Write a success message
    pub fn success(&mut self, message: &str) -> Result<()> {
        if self.quiet || !self.is_human() {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.green().to_string())
        } else {
            self.writeln(message)
        }
    }

    /// Write a warning message
    pub fn warning(&mut self, message: &str) -> Result<()> {
        if !self.is_human() {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.yellow().to_string())
        } else {
            self.writeln(&format!("WARNING: {}", message))
        }
    }

    /// Write an error message
    pub fn error(&mut self, message: &str) -> Result<()> {
        if !self.is_human() {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.red().to_string())
        } else {
            self.writeln(&format!("ERROR: {}", message))
        }
    }

    /// Write a section header
    pub fn section(&mut self, title: &str) -> Result<()> {
        if self.quiet || !self.is_human() {
            return Ok(());
        }

        self.writeln("")?;
        if self.use_color {
            self.writeln(&format!("═══ {} ═══", title).bright_blue().to_string())
        } else {
            self.writeln(&format!("=== {} ===", title))
        }
    }

    /// Write data in the configured format
    pub fn data<T: Serialize>(&mut self, value: &T) -> Result<()> {
        let formatted = self.format.format(value)?;
        trace!(bytes = formatted.len(), "Outputting data");

        if self.is_human() {
            self.writeln(&formatted)
        } else {
            // For machine formats, write as-is
            self.write(&formatted)?;
            if self.format != OutputFormat::Yaml {
                self.writeln("")?;
            }
            Ok(())
        }
    }

    /// Write a validated instance
    pub fn instance(&mut self, schema: &SchemaDefinition, instance: &ValidatedInstance) -> Result<()> {
        let view = InstanceView::new(schema, instance);
        let formatted = self.format.format_instance(&view)?;
        self.emit(formatted)
    }

    /// Write an error report
    pub fn report(&mut self, errors: &ValidationErrors) -> Result<()> {
        let formatted = self.format.format_report(errors)?;
        if self.is_human() && self.use_color {
            let mut lines = formatted.lines();
            if let Some(headline) = lines.next() {
                self.writeln(&headline.red().bold().to_string())?;
            }
            let rest: Vec<&str> = lines.collect();
            return self.writeln(&rest.join("\n"));
        }
        self.emit(formatted)
    }

    /// Write a schema description
    pub fn description(&mut self, description: &SchemaDescription) -> Result<()> {
        let formatted = self.format.format_description(description)?;
        self.emit(formatted)
    }

    fn emit(&mut self, formatted: String) -> Result<()> {
        if formatted.ends_with('\n') {
            self.write(&formatted)
        } else {
            self.writeln(&formatted)
        }
    }

    /// Create a progress bar for payload batches
    pub fn progress_bar(&self, length: u64, message: &str) -> Option<ProgressBar> {
        if !self.show_progress {
            return None;
        }

        let pb = ProgressBar::new(length);
        if let Some(style) = default_progress_style() {
            pb.set_style(style);
        }
        pb.set_message(message.to_string());
        Some(pb)
    }

    /// Write a table (for human format)
    pub fn table(&mut self, headers: &[&str], rows: Vec<Vec<String>>) -> Result<()> {
        if !self.is_human() {
            return Ok(());
        }

        let rendered = render_table(headers, &rows);
        let mut lines = rendered.lines();
        if let Some(header_row) = lines.next() {
            if self.use_color {
                self.writeln(&header_row.bold().to_string())?;
            } else {
                self.writeln(header_row)?;
            }
        }
        for line in lines {
            self.writeln(line)?;
        }

        Ok(())
    }
}

/// Helper function to create a progress bar style
pub fn default_progress_style() -> Option<ProgressStyle> {
    ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .ok()
        .map(|style| style.progress_chars("#>-"))
}

/// Lay out rows under headers with aligned columns
fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    // Calculate column widths
    let mut widths = headers.iter().map(|h| h.chars().count()).collect::<Vec<_>>();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }
    }

    let pad = |cell: &str, width: usize| format!("{:width$}", cell, width = width);

    let mut output = String::new();
    let header_row = headers
        .iter()
        .enumerate()
        .map(|(i, h)| pad(h, widths[i]))
        .collect::<Vec<_>>()
        .join(" │ ");
    output.push_str(header_row.trim_end());
    output.push('\n');

    let separator = widths
        .iter()
        .map(|w| "─".repeat(*w))
        .collect::<Vec<_>>()
        .join("─┼─");
    output.push_str(&separator);
    output.push('\n');

    for row in rows {
        let row_str = row
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                if i < widths.len() {
                    pad(cell, widths[i])
                } else {
                    cell.clone()
                }
            })
            .collect::<Vec<_>>()
            .join(" │ ");
        output.push_str(row_str.trim_end());
        output.push('\n');
    }

    output
}

/// Format a validated instance for human reading
fn format_instance_human(view: &InstanceView) -> Result<String> {
    let mut output = String::new();

    output.push_str(&format!("✅ Valid {}\n\n", view.schema));

    let rows = view
        .fields
        .iter()
        .map(|field| {
            vec![
                field.name.clone(),
                format_value_compact(&field.value),
                field.type_name.clone(),
                if field.computed { "computed".to_string() } else { String::new() },
            ]
        })
        .collect::<Vec<_>>();
    output.push_str(&render_table(&["Field", "Value", "Type", ""], &rows));

    if let Some(by_alias) = &view.by_alias {
        output.push_str("\n🏷️  Dumped by alias:\n");
        output.push_str(&serde_json::to_string_pretty(by_alias)?);
        output.push('\n');
    }

    Ok(output)
}

/// Format an error report for human reading, grouped by field path
fn format_report_human(errors: &ValidationErrors) -> String {
    let mut output = String::new();

    let noun = if errors.len() == 1 { "error" } else { "errors" };
    output.push_str(&format!(
        "❌ {} validation {} for {}\n",
        errors.len(),
        noun,
        errors.schema
    ));

    for (path, group) in errors.grouped_by_path() {
        let location = if path.is_empty() { MODEL_LOCATION } else { path };
        output.push_str(&format!("\n📍 {}\n", location));

        for error in group {
            output.push_str(&format!("  • [{}] {}\n", error.kind, error.message));
            if let Some(input) = &error.input {
                output.push_str(&format!("    input: {}\n", format_value_compact(input)));
            }
            for violation in &error.violations {
                output.push_str(&format!(
                    "    {}: expected {}, got {}\n",
                    violation.rule, violation.expected, violation.actual
                ));
            }
        }
    }

    output
}

/// Format a schema description for human reading
fn format_description_human(description: &SchemaDescription) -> String {
    let mut output = String::new();
    describe_into(description, &mut output);
    output
}

fn describe_into(description: &SchemaDescription, output: &mut String) {
    output.push_str(&format!("📋 {} ({})\n", description.title, description.name));
    if let Some(text) = &description.description {
        output.push_str(&format!("   {}\n", text));
    }
    output.push_str(&format!("   extra fields: {:?}", description.extra).to_lowercase());
    if description.populate_by_name {
        output.push_str(", populate by name");
    }
    output.push_str("\n\n");

    let rows = description
        .fields
        .iter()
        .map(|field| {
            let mut constraints = field
                .constraints
                .iter()
                .map(|c| format!("{}={}", c.rule, format_value_compact(&c.value)))
                .collect::<Vec<_>>();
            if let Some(choices) = &field.choices {
                constraints.push(format!("one of {}", choices.join("|")));
            }
            if field.strict {
                constraints.push("strict".to_string());
            }
            let type_name = if field.nullable {
                format!("{}?", field.type_name)
            } else {
                field.type_name.clone()
            };
            vec![
                field.name.clone(),
                field.alias.clone().unwrap_or_default(),
                type_name,
                if field.required { "yes".to_string() } else { "no".to_string() },
                field
                    .default
                    .as_ref()
                    .map(format_value_compact)
                    .unwrap_or_default(),
                constraints.join(", "),
            ]
        })
        .collect::<Vec<_>>();
    output.push_str(&render_table(
        &["Field", "Alias", "Type", "Required", "Default", "Constraints"],
        &rows,
    ));

    if !description.rules.is_empty() {
        output.push_str("\n🔗 Rules:\n");
        for rule in &description.rules {
            output.push_str(&format!("  • {}: {}\n", rule.name, rule.description));
        }
    }

    if !description.computed.is_empty() {
        output.push_str("\n🧮 Computed:\n");
        for computed in &description.computed {
            output.push_str(&format!(
                "  • {} ({}): {}\n",
                computed.name, computed.type_name, computed.description
            ));
        }
    }

    for field in &description.fields {
        if let Some(nested) = &field.nested {
            output.push_str(&format!("\n↳ {}\n", field.name));
            describe_into(nested, output);
        }
    }
}

/// Format a JSON value in a compact, human-readable way
fn format_value_compact(value: &Value) -> String {
    match value {
        Value::String(s) => format!("\"{}\"", s),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(arr) => {
            if arr.len() <= 3 {
                format!(
                    "[{}]",
                    arr.iter()
                        .map(format_value_compact)
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            } else {
                format!("[{} items]", arr.len())
            }
        }
        Value::Object(obj) => {
            if obj.len() <= 2 {
                let items: Vec<String> = obj
                    .iter()
                    .map(|(k, v)| format!("{}: {}", k, format_value_compact(v)))
                    .collect();
                format!("{{{}}}", items.join(", "))
            } else {
                format!("{{{} fields}}", obj.len())
            }
        }
    }
}
