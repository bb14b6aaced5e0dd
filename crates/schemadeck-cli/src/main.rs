//! SchemaDeck CLI - see how a declarative validation engine treats your input
//!
//! This is the main entry point for the SchemaDeck CLI application, providing
//! commands for listing and describing the built-in schemas and for running
//! validate-and-report cycles against them.

mod cli;
mod config;
mod error;
mod handlers;
mod logging;
mod output;

use cli::{Cli, Commands, OutputFormat};
use colored::control;
use config::Config;
use error::{Error, Result};
use logging::{timing::Timer, LoggingConfig, LoggingGuard};
use output::OutputWriter;
use std::process;
use tracing::instrument;

fn main() {
    // Parse command-line arguments
    let cli = Cli::parse_args();

    // Load configuration before logging so its settings can apply
    let config = Config::load_with_file(cli.config.as_deref());

    // Set up colored output
    let use_color = cli.use_color() && config.as_ref().map(|c| c.output.color).unwrap_or(true);
    control::set_override(use_color);

    // Initialize logging
    let guard = match init_logging(&cli, config.as_ref().ok()) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            None
        }
    };

    // Run the application
    let code = match config.and_then(|config| run(cli, config, use_color)) {
        Ok(()) => 0,
        Err(e) => {
            if !e.is_reported() {
                eprintln!("{}", error::format_error(&e, use_color));

                if e.should_show_help() {
                    eprintln!("\nFor more information, try '--help'");
                }
            }

            e.exit_code()
        }
    };

    // Flush the log file before exiting
    drop(guard);
    process::exit(code);
}

/// Main application logic
#[instrument(skip(cli, config), fields(command = ?cli.command))]
fn run(cli: Cli, config: Config, use_color: bool) -> Result<()> {
    let _timer = Timer::new("cli_execution");

    let format = resolve_output_format(cli.output, &config)?;
    let mut output = OutputWriter::new(format, use_color, cli.quiet, config.output.progress);

    tracing::info!(
        command = ?cli.command,
        verbosity = cli.verbosity_level(),
        format = ?format,
        "Executing command"
    );

    // Handle the subcommand
    match cli.command {
        Commands::List => handlers::handle_list(&mut output),
        Commands::Describe(args) => handlers::handle_describe(args, &mut output),
        Commands::Validate(args) => handlers::handle_validate(args, &config, &mut output),
        Commands::Tour(args) => handlers::handle_tour(args, &mut output),
        Commands::Config(args) => handlers::handle_config(args, &config, &mut output),
        Commands::Completions(args) => handlers::handle_completions(args),
    }
}

/// Pick the output format: the flag wins over the configured default
fn resolve_output_format(flag: Option<OutputFormat>, config: &Config) -> Result<OutputFormat> {
    match flag {
        Some(format) => Ok(format),
        None => OutputFormat::from_name(&config.output.format).ok_or_else(|| {
            Error::config(format!("unknown output format '{}'", config.output.format))
        }),
    }
}

/// Initialize the logging system
fn init_logging(cli: &Cli, config: Option<&Config>) -> Result<LoggingGuard> {
    let verbosity = cli.verbosity_level();

    // Create logging configuration from CLI args, config file and environment
    let mut logging_config = LoggingConfig::from_verbosity(verbosity);
    if let Some(config) = config {
        logging_config.merge_with_file(&config.logging, verbosity);
    }
    logging_config.merge_with_env();

    // If quiet mode, only log errors
    if cli.quiet {
        logging_config.level = "error".to_string();
        logging_config.console = false;
    }

    logging::init_logging(logging_config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_parsing() {
        // Test verbose flag
        let cli = Cli::parse_from(["schemadeck", "-vv", "validate", "item"]);
        assert_eq!(cli.verbosity_level(), 2);

        // Test quiet flag
        let cli = Cli::parse_from(["schemadeck", "--quiet", "describe", "user"]);
        assert_eq!(cli.verbosity_level(), 0);
    }

    #[test]
    fn test_output_format_resolution() {
        let mut config = Config::default();
        assert_eq!(resolve_output_format(None, &config).unwrap(), OutputFormat::Human);
        assert_eq!(
            resolve_output_format(Some(OutputFormat::Yaml), &config).unwrap(),
            OutputFormat::Yaml
        );

        config.output.format = "json-pretty".to_string();
        assert_eq!(resolve_output_format(None, &config).unwrap(), OutputFormat::JsonPretty);

        config.output.format = "xml".to_string();
        assert_eq!(resolve_output_format(None, &config).unwrap_err().exit_code(), 5);
    }
}
