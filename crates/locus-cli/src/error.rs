//! Error types and handling for the CLI
//!
//! Every variant maps to a distinct process exit code.

use std::io;
use std::path::PathBuf;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for CLI operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error (file operations, etc.)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Path or query error from locus-core
    #[error("{0}")]
    Core(#[from] locus_core::Error),

    /// A validation run aborted (plugin failure, unreadable schema)
    #[error("{0}")]
    Validate(#[from] locus_validate::ValidateError),

    /// File not found
    #[error("File not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input larger than the configured source limit
    #[error("{} is {size} bytes, larger than the {limit} byte limit", path.display())]
    TooLarge { path: PathBuf, size: u64, limit: usize },

    /// One or more documents failed validation
    #[error("{invalid} of {total} document(s) failed validation")]
    ValidationFailed { invalid: usize, total: usize },

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Generic error with context
    #[error("{message}")]
    Other { message: String },
}

impl Error {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a generic error with message
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Io(_) => 1,
            Self::Core(_) => 2,
            Self::FileNotFound { .. } => 3,
            Self::Validate(_) => 4,
            Self::Config(_) => 5,
            Self::TooLarge { .. } => 6,
            Self::ValidationFailed { .. } => 10,
            Self::Json(_) => 12,
            Self::Yaml(_) => 13,
            Self::Other { .. } => 99,
        }
    }

    /// Check if this error should display usage help
    pub fn should_show_help(&self) -> bool {
        matches!(self, Self::Core(locus_core::Error::UnsupportedFormat { .. }))
    }
}

/// Format an error for display to the user
pub fn format_error(error: &Error, use_color: bool) -> String {
    if use_color {
        use colored::Colorize;
        format!("{} {}", "Error:".red().bold(), error)
    } else {
        format!("Error: {}", error)
    }
}
