//! Logging utilities for the Locus CLI
//!
//! This module provides:
//! - Structured logging setup (compact, full or JSON output)
//! - A run ID attached to every operation span
//! - Drop-guard timers that record `duration_ms`
//!
//! Library crates log through the `log` facade; those records are bridged
//! into the tracing subscriber installed here.

use crate::config::LoggingConfig as FileLoggingConfig;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::io::IsTerminal;
use std::str::FromStr;
use std::sync::OnceLock;
use tracing::{field, Span};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

/// Run ID for the current invocation
static RUN_ID: OnceLock<String> = OnceLock::new();

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter
    pub level: String,
    /// Output format: compact, full, json
    pub format: LogFormat,
    /// Write ANSI colors when stderr is a terminal
    pub console: bool,
    /// Include thread IDs
    pub thread_ids: bool,
    /// Include file and line numbers
    pub source_location: bool,
}

/// Log output format
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Compact format for everyday use
    Compact,
    /// Full format with all details
    Full,
    /// JSON structured format
    Json,
}

impl FromStr for LogFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "compact" => Ok(LogFormat::Compact),
            "full" => Ok(LogFormat::Full),
            "json" => Ok(LogFormat::Json),
            other => Err(Error::config(format!("Invalid log format: {other}"))),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::Compact,
            console: true,
            thread_ids: false,
            source_location: false,
        }
    }
}

impl LoggingConfig {
    /// Create logging config from verbosity level
    pub fn from_verbosity(verbosity: u8) -> Self {
        let mut config = Self::default();

        match verbosity {
            0 => {}
            1 => {
                config.level = "info".to_string();
            }
            2 => {
                config.level = "debug".to_string();
                config.source_location = true;
            }
            _ => {
                config.level = "trace".to_string();
                config.format = LogFormat::Full;
                config.source_location = true;
                config.thread_ids = true;
            }
        }

        config
    }

    /// Apply the config file's logging section; `-v` flags win over its level
    pub fn merge_with_file(&mut self, file: &FileLoggingConfig, verbosity: u8) {
        if verbosity == 0 {
            if let Some(level) = &file.level {
                self.level = level.clone();
            }
        }
        if let Some(format) = &file.format {
            match format.parse() {
                Ok(format) => self.format = format,
                Err(e) => eprintln!("Warning: {e}, using {:?}", self.format),
            }
        }
    }

    /// Apply `RUST_LOG` and `LOCUS_LOG_FORMAT`
    pub fn merge_with_env(&mut self) {
        if let Ok(rust_log) = std::env::var("RUST_LOG") {
            self.level = rust_log;
        }

        if let Ok(format) = std::env::var("LOCUS_LOG_FORMAT") {
            match format.parse() {
                Ok(format) => self.format = format,
                Err(e) => eprintln!("Warning: {e}, using {:?}", self.format),
            }
        }
    }
}

/// Initialize the global logging system
pub fn init_logging(config: LoggingConfig) -> Result<()> {
    let env_filter = EnvFilter::try_new(&config.level)
        .map_err(|e| Error::config(format!("Invalid log filter '{}': {}", config.level, e)))?;
    let ansi = config.console && std::io::stderr().is_terminal();

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(config.thread_ids)
        .with_file(config.source_location)
        .with_line_number(config.source_location);

    // try_init also installs the log-to-tracing bridge
    let installed = match config.format {
        LogFormat::Compact => builder.with_ansi(ansi).compact().try_init(),
        LogFormat::Full => builder.with_ansi(ansi).try_init(),
        LogFormat::Json => builder.with_ansi(false).json().try_init(),
    };
    installed.map_err(|e| Error::other(format!("Failed to initialize logging: {}", e)))?;

    let run_id = RUN_ID.get_or_init(generate_run_id);
    tracing::debug!(run_id = %run_id, config = ?config, "Logging system initialized");

    Ok(())
}

/// Generate a unique ID for this invocation
pub fn generate_run_id() -> String {
    format!("run_{}", Uuid::new_v4().simple())
}

/// Get the current run ID
pub fn current_run_id() -> Option<&'static str> {
    RUN_ID.get().map(|s| s.as_str())
}

/// Create a span with run ID and an empty duration field
pub fn create_operation_span(operation: &str, details: Option<&str>) -> Span {
    tracing::info_span!(
        "operation",
        operation = operation,
        run_id = current_run_id().unwrap_or("unknown"),
        details = details.unwrap_or(""),
        duration_ms = field::Empty,
    )
}

/// Performance timing utilities
pub mod timing {
    use std::time::Instant;
    use tracing::Span;

    /// A timer that records its duration on its span when dropped
    pub struct Timer {
        start: Instant,
        span: Span,
        operation: String,
    }

    impl Timer {
        pub fn new(operation: &str) -> Self {
            Self {
                start: Instant::now(),
                span: super::create_operation_span(operation, None),
                operation: operation.to_string(),
            }
        }

        pub fn with_details(operation: &str, details: &str) -> Self {
            Self {
                start: Instant::now(),
                span: super::create_operation_span(operation, Some(details)),
                operation: operation.to_string(),
            }
        }

        /// Get elapsed time without finishing the timer
        pub fn elapsed(&self) -> std::time::Duration {
            self.start.elapsed()
        }
    }

    impl Drop for Timer {
        fn drop(&mut self) {
            let duration = self.start.elapsed();
            self.span.record("duration_ms", duration.as_millis() as u64);

            tracing::debug!(
                operation = %self.operation,
                duration_ms = duration.as_millis() as u64,
                "Operation completed"
            );
        }
    }
}
