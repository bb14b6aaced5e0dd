//! Command-line interface argument parsing and definitions
//!
//! This module defines the CLI structure using clap's derive API,
//! providing a type-safe and well-documented command interface.

use clap::{Parser, Subcommand, ValueEnum};
use is_terminal::IsTerminal;
use std::path::PathBuf;

/// SchemaDeck CLI - see how a declarative validation engine treats your input
///
/// Pick one of the built-in schemas, feed it form-style values or a JSON/YAML
/// payload, and get back either the validated instance or every error found.
#[derive(Parser, Debug)]
#[command(
    name = "schemadeck",
    version,
    author,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Enable verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "SCHEMADECK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format for results (defaults to the configured format)
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the built-in schemas
    List,

    /// Show the structure of a schema without validating anything
    Describe(DescribeArgs),

    /// Run one validate-and-report cycle against a schema
    Validate(ValidateArgs),

    /// Validate every schema's sample and invalid sample
    Tour(TourArgs),

    /// Manage configuration files and settings
    Config(ConfigArgs),

    /// Generate shell completions for the specified shell
    Completions(CompletionsArgs),
}

/// Arguments for the describe command
#[derive(Parser, Debug)]
pub struct DescribeArgs {
    /// Schema name (see `schemadeck list`)
    #[arg(value_name = "SCHEMA")]
    pub schema: String,

    /// Print the generated JSON Schema document instead of the field table
    #[arg(long)]
    pub json_schema: bool,
}

/// Arguments for the validate command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Schema name (see `schemadeck list`)
    #[arg(value_name = "SCHEMA")]
    pub schema: String,

    /// Text input, e.g. `--set price=19.99` or `--set address.city=Anytown`
    #[arg(short, long = "set", value_name = "KEY=VALUE")]
    pub set: Vec<String>,

    /// Checkbox input, `--flag key` or `--flag key=false`
    #[arg(long = "flag", value_name = "KEY[=BOOL]")]
    pub flag: Vec<String>,

    /// Numeric widget input, sent as a native number
    #[arg(long = "number", value_name = "KEY=NUMBER")]
    pub number: Vec<String>,

    /// Date picker input in YYYY-MM-DD form
    #[arg(long = "date", value_name = "KEY=DATE")]
    pub date: Vec<String>,

    /// Widget left empty, sent as null
    #[arg(long = "absent", value_name = "KEY")]
    pub absent: Vec<String>,

    /// Raw payload file (JSON or YAML); an array validates each element
    #[arg(short, long, value_name = "FILE", conflicts_with_all = ["sample", "invalid_sample"])]
    pub payload: Option<PathBuf>,

    /// Start from the schema's sample input
    #[arg(long, conflicts_with = "invalid_sample")]
    pub sample: bool,

    /// Start from the schema's failing sample input
    #[arg(long)]
    pub invalid_sample: bool,

    /// Disable coercion for every field
    #[arg(long)]
    pub strict: bool,

    /// Stop a batch at the first rejected payload
    #[arg(long)]
    pub fail_fast: bool,

    /// Stop a batch after this many rejected payloads (0 = unlimited)
    #[arg(long, value_name = "N")]
    pub max_errors: Option<usize>,
}

impl ValidateArgs {
    /// Whether any form-style input was given
    pub fn has_form_input(&self) -> bool {
        !(self.set.is_empty()
            && self.flag.is_empty()
            && self.number.is_empty()
            && self.date.is_empty()
            && self.absent.is_empty())
    }
}

/// Arguments for the tour command
#[derive(Parser, Debug)]
pub struct TourArgs {
    /// Only tour these schemas
    #[arg(value_name = "SCHEMA")]
    pub schemas: Vec<String>,

    /// Disable coercion for every field
    #[arg(long)]
    pub strict: bool,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration management actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Write a default configuration file
    Init(ConfigInitArgs),

    /// Show current configuration values
    Show(ConfigShowArgs),

    /// List the configuration files that are checked, in order
    Paths,
}

/// Arguments for config init
#[derive(Parser, Debug)]
pub struct ConfigInitArgs {
    /// Write the user config instead of ./.schemadeck.toml
    #[arg(long)]
    pub user: bool,

    /// File format to write
    #[arg(short, long, value_enum, default_value = "toml")]
    pub format: ConfigFormat,

    /// Force overwrite existing config files
    #[arg(long)]
    pub force: bool,
}

/// Arguments for config show
#[derive(Parser, Debug)]
pub struct ConfigShowArgs {
    /// Show configuration in specified format
    #[arg(short, long, value_enum, default_value = "toml")]
    pub format: ConfigFormat,
}

/// Configuration file formats
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ConfigFormat {
    /// TOML format
    Toml,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

impl ConfigFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ConfigFormat::Toml => "toml",
            ConfigFormat::Json => "json",
            ConfigFormat::Yaml => "yaml",
        }
    }
}

/// Arguments for generating shell completions
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Output format options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable formatted output
    Human,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
    /// Pretty-printed JSON output
    JsonPretty,
}

impl OutputFormat {
    /// Parse a configured format name
    pub fn from_name(name: &str) -> Option<Self> {
        <Self as ValueEnum>::from_str(name, true).ok()
    }
}

/// Supported shells for completion generation
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    /// PowerShell
    PowerShell,
    /// Elvish shell
    Elvish,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective verbosity level (considering quiet flag)
    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }

    /// Check if colored output should be used
    pub fn use_color(&self) -> bool {
        !self.no_color && std::io::stdout().is_terminal()
    }
}

impl Shell {
    /// Convert to clap_complete shell type
    pub fn to_clap_shell(self) -> clap_complete::Shell {
        match self {
            Shell::Bash => clap_complete::Shell::Bash,
            Shell::Zsh => clap_complete::Shell::Zsh,
            Shell::Fish => clap_complete::Shell::Fish,
            Shell::PowerShell => clap_complete::Shell::PowerShell,
            Shell::Elvish => clap_complete::Shell::Elvish,
        }
    }
}
