//! Command-line interface argument parsing and definitions
//!
//! This module defines the CLI structure using clap's derive API.

use clap::{Parser, Subcommand, ValueEnum};
use locus_core::PathFormat;
use serde::{Deserialize, Serialize};
use std::io::IsTerminal;
use std::path::PathBuf;

/// Locus - find where JSON problems live
///
/// Validates JSON documents with line-accurate diagnostics, converts paths
/// between notations, and maps paths back to source positions.
#[derive(Parser, Debug)]
#[command(
    name = "locus",
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
    #[arg(short, long, global = true, env = "LOCUS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format for results [default: human, or the configured format]
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
    /// Validate one or more JSON documents
    Validate(ValidateArgs),

    /// Convert a path between notations
    Convert(ConvertArgs),

    /// Show where a path appears in a JSON file
    Locate(LocateArgs),

    /// Name the field responsible for an error message
    Detect(DetectArgs),

    /// Evaluate a path query against a JSON file
    Query(QueryArgs),

    /// Generate shell completions for the specified shell
    Completions(CompletionsArgs),
}

/// Arguments for the validate command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// JSON documents to validate
    #[arg(value_name = "FILES", required = true)]
    pub files: Vec<PathBuf>,

    /// JSON Schema (JSON or YAML) every document must satisfy
    #[arg(long, value_name = "SCHEMA")]
    pub schema: Option<PathBuf>,

    /// Reject documents larger than this many bytes
    #[arg(long, value_name = "BYTES")]
    pub max_bytes: Option<usize>,

    /// Skip the platform support checks
    #[arg(long)]
    pub no_platform_checks: bool,
}

/// Arguments for the convert command
#[derive(Parser, Debug)]
pub struct ConvertArgs {
    /// Path to convert
    pub path: String,

    /// Target notation
    #[arg(short, long, value_enum)]
    pub to: PathNotation,

    /// Source notation (detected when omitted)
    #[arg(short, long, value_enum)]
    pub from: Option<PathNotation>,
}

/// Arguments for the locate command
#[derive(Parser, Debug)]
pub struct LocateArgs {
    /// JSON file to search
    pub file: PathBuf,

    /// Path in any supported notation
    pub path: String,
}

/// Arguments for the detect command
#[derive(Parser, Debug)]
pub struct DetectArgs {
    /// Error message as reported by a validator
    pub message: String,

    /// Path the error was raised at
    #[arg(short, long, default_value = "")]
    pub path: String,
}

/// Arguments for the query command
#[derive(Parser, Debug)]
pub struct QueryArgs {
    /// JSON file to query
    pub file: PathBuf,

    /// Path expression; `[*]` and `.*` select every child
    pub expression: String,

    /// Never shell out to jq, always use the built-in evaluator
    #[arg(long)]
    pub no_native: bool,
}

/// Arguments for generating shell completions
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Output format options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
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

/// Path notations accepted on the command line
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum PathNotation {
    /// JSON Pointer: /a/0/b
    Pointer,
    /// Property Path: a[0].b
    Property,
    /// JSONPath: $.a[0].b
    Jsonpath,
    /// jq: .a[0].b
    Jq,
    /// Dot notation: a.0.b
    Dot,
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

impl From<PathNotation> for PathFormat {
    fn from(notation: PathNotation) -> Self {
        match notation {
            PathNotation::Pointer => PathFormat::JsonPointer,
            PathNotation::Property => PathFormat::PropertyPath,
            PathNotation::Jsonpath => PathFormat::JsonPath,
            PathNotation::Jq => PathFormat::Jq,
            PathNotation::Dot => PathFormat::DotNotation,
        }
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
