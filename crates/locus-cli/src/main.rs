//! Locus CLI - line-accurate JSON validation and path tooling
//!
//! This is the main entry point for the Locus CLI application, providing
//! commands for validating documents, converting paths between notations,
//! locating paths in source text and querying JSON files.

mod cli;
mod config;
mod error;
mod handlers;
mod logging;
mod output;

use cli::{Cli, Commands};
use colored::control;
use config::Config;
use error::Result;
use logging::{timing::Timer, LoggingConfig};
use output::OutputWriter;
use std::process;
use tracing::instrument;

#[tokio::main]
async fn main() {
    // Parse command-line arguments
    let cli = Cli::parse_args();

    // Configuration decides colors and log level, so it loads before anything prints
    let config = match Config::load_with_file(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", error::format_error(&e, cli.use_color()));
            process::exit(e.exit_code());
        }
    };

    // Set up colored output
    control::set_override(cli.use_color() && config.output.color);

    // Initialize logging
    if let Err(e) = init_logging(&cli, &config) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    // Run the application
    let result = run(cli, config).await;

    match result {
        Ok(()) => {
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}", error::format_error(&e, control::SHOULD_COLORIZE.should_colorize()));

            if e.should_show_help() {
                eprintln!("\nFor more information, try '--help'");
            }

            process::exit(e.exit_code());
        }
    }
}

/// Main application logic
#[instrument(skip(cli, config), fields(command = ?cli.command))]
async fn run(cli: Cli, config: Config) -> Result<()> {
    let _timer = Timer::new("cli_execution");

    let format = cli.output.unwrap_or(config.output.format);
    let use_color = control::SHOULD_COLORIZE.should_colorize();
    let mut output = OutputWriter::new(format, use_color, cli.quiet);

    tracing::info!(
        command = ?cli.command,
        verbosity = cli.verbosity_level(),
        format = ?format,
        "Executing command"
    );

    match cli.command {
        Commands::Validate(args) => handlers::handle_validate(args, &config, &mut output).await,
        Commands::Convert(args) => handlers::handle_convert(args, &mut output),
        Commands::Locate(args) => handlers::handle_locate(args, &config, &mut output),
        Commands::Detect(args) => handlers::handle_detect(args, &mut output),
        Commands::Query(args) => handlers::handle_query(args, &config, &mut output),
        Commands::Completions(args) => handlers::handle_completions(args),
    }
}

/// Initialize the logging system
fn init_logging(cli: &Cli, config: &Config) -> Result<()> {
    let mut logging_config = LoggingConfig::from_verbosity(cli.verbosity_level());

    // File settings first, then environment overrides
    logging_config.merge_with_file(&config.logging, cli.verbosity_level());
    logging_config.merge_with_env();

    // If quiet mode, only log errors
    if cli.quiet {
        logging_config.level = "error".to_string();
        logging_config.console = false;
    }

    logging::init_logging(logging_config)
}
